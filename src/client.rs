//! HTTP transport for a single strip controller.

use log::debug;
use reqwest::StatusCode;
use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::command::Command;
use crate::errors::Error;
use crate::status::{DeviceInfo, DeviceState};

type Result<T> = std::result::Result<T, Error>;

pub(crate) const INFO_PATH: &str = "/info";
pub(crate) const STATE_PATH: &str = "/state";
pub(crate) const CONTROL_PATH: &str = "/control";

/// HTTP client for one strip controller.
///
/// Wraps the process-wide [`reqwest::Client`] with a device address. Cloning
/// is cheap and keeps sharing the underlying connection pool.
///
/// # Example
///
/// ```
/// use neopixel_lights_rs::DeviceClient;
///
/// let client = DeviceClient::new(reqwest::Client::new(), "192.168.1.40", 80);
/// assert_eq!(client.base_url(), "http://192.168.1.40:80");
/// ```
#[derive(Debug, Clone)]
pub struct DeviceClient {
    http: reqwest::Client,
    host: String,
    port: u16,
}

impl DeviceClient {
    /// Default HTTP port of the controller firmware.
    pub const DEFAULT_PORT: u16 = 80;

    pub fn new(http: reqwest::Client, host: impl Into<String>, port: u16) -> Self {
        DeviceClient {
            http,
            host: host.into(),
            port,
        }
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// Base URL for the device.
    pub fn base_url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }

    /// Fetch the live lighting state.
    pub async fn get_state(&self) -> Result<DeviceState> {
        self.get_json(STATE_PATH).await
    }

    /// Fetch the static device info and capability set.
    pub async fn get_info(&self) -> Result<DeviceInfo> {
        self.get_json(INFO_PATH).await
    }

    /// Send a control command and return the device's reply.
    pub async fn send_command(&self, command: &Command) -> Result<ControlResponse> {
        let url = format!("{}{}", self.base_url(), CONTROL_PATH);
        debug!("POST {url}: {command:?}");

        let response = self
            .http
            .post(&url)
            .json(command)
            .send()
            .await
            .map_err(|err| Error::from_reqwest(&self.host, err))?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(Error::unexpected_status(&self.host, status.as_u16()));
        }

        response
            .json()
            .await
            .map_err(|err| Error::from_reqwest(&self.host, err))
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = format!("{}{}", self.base_url(), path);
        debug!("GET {url}");

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|err| Error::from_reqwest(&self.host, err))?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(Error::unexpected_status(&self.host, status.as_u16()));
        }

        response
            .json()
            .await
            .map_err(|err| Error::from_reqwest(&self.host, err))
    }
}

/// Reply to a control command.
///
/// Successful commands echo the resulting lighting state; firmware builds
/// that omit it still count as success.
#[derive(Debug, Deserialize, Clone)]
pub struct ControlResponse {
    #[serde(default)]
    pub state: Option<DeviceState>,
}
