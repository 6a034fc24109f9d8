//! Polling data coordinator for one strip controller.

use std::time::Duration;

use log::debug;

use crate::client::DeviceClient;
use crate::command::Command;
use crate::errors::Error;
use crate::status::{Capabilities, DeviceSnapshot};

type Result<T> = std::result::Result<T, Error>;

/// Owns the cached state of a single device and mediates all of its I/O.
///
/// The coordinator keeps one [`DeviceSnapshot`] fresh through scheduled
/// polling and refreshes it from command replies. The snapshot is replaced
/// wholesale on every successful exchange and left untouched on failure, and
/// [`Coordinator::available`] is true exactly when the most recent
/// communication attempt succeeded; consumers must check it before trusting
/// the snapshot.
///
/// All mutating operations take `&mut self`, so a poll cycle and a command
/// dispatch can never interleave their effects on the cache.
#[derive(Debug)]
pub struct Coordinator {
    client: DeviceClient,
    poll_interval: Duration,
    request_timeout: Duration,
    snapshot: Option<DeviceSnapshot>,
    available: bool,
}

impl Coordinator {
    /// Default delay between poll cycles.
    pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(10);

    /// Default overall deadline for one poll cycle or one command dispatch.
    pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

    pub fn new(client: DeviceClient) -> Self {
        Self::with_poll_interval(client, Self::DEFAULT_POLL_INTERVAL)
    }

    pub fn with_poll_interval(client: DeviceClient, poll_interval: Duration) -> Self {
        Coordinator {
            client,
            poll_interval,
            request_timeout: Self::DEFAULT_REQUEST_TIMEOUT,
            snapshot: None,
            available: false,
        }
    }

    /// Override the per-operation deadline.
    pub fn with_request_timeout(mut self, request_timeout: Duration) -> Self {
        self.request_timeout = request_timeout;
        self
    }

    pub fn host(&self) -> &str {
        self.client.host()
    }

    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    /// Last committed snapshot, if any exchange has succeeded yet.
    pub fn snapshot(&self) -> Option<&DeviceSnapshot> {
        self.snapshot.as_ref()
    }

    /// Whether the most recent communication attempt succeeded.
    pub fn available(&self) -> bool {
        self.available
    }

    /// First refresh, run once at setup time.
    ///
    /// Unlike later cycles a failure here is fatal: callers must abort setup
    /// rather than register a device that was never reachable.
    pub async fn first_refresh(&mut self) -> Result<()> {
        self.refresh().await
    }

    /// Run one poll cycle.
    ///
    /// Fetches the live state and the static info and commits the merged
    /// snapshot only if both succeed. On failure the previous snapshot stays
    /// untouched, the device is marked unavailable, and the error is returned
    /// for the scheduler to log; the next cycle runs at the normal interval.
    pub async fn refresh(&mut self) -> Result<()> {
        let client = self.client.clone();
        let fetched = tokio::time::timeout(self.request_timeout, async move {
            let state = client.get_state().await?;
            let info = client.get_info().await?;
            Ok(DeviceSnapshot { state, info })
        })
        .await
        .unwrap_or_else(|_| Err(Error::timeout(self.client.host())));

        match fetched {
            Ok(snapshot) => {
                debug!("poll cycle for {} committed", self.host());
                self.snapshot = Some(snapshot);
                self.available = true;
                Ok(())
            }
            Err(err) => {
                debug!("poll cycle for {} failed: {err}", self.host());
                self.available = false;
                Err(err)
            }
        }
    }

    /// Send one control command.
    ///
    /// On success, a `state` block in the reply replaces the cached state
    /// while the previously cached info block is kept as-is; info does not
    /// change on commands and is not worth a second round trip. On any
    /// failure the cache stays untouched and the device is marked
    /// unavailable; the error is recoverable and the next poll cycle may
    /// bring the device back.
    pub async fn send_command(&mut self, command: &Command) -> Result<()> {
        let client = self.client.clone();
        let command = command.clone();
        let sent = tokio::time::timeout(self.request_timeout, async move {
            client.send_command(&command).await
        })
        .await
        .unwrap_or_else(|_| Err(Error::timeout(self.client.host())));

        match sent {
            Ok(response) => {
                if let Some(state) = response.state {
                    if let Some(previous) = self.snapshot.take() {
                        self.snapshot = Some(DeviceSnapshot {
                            state,
                            info: previous.info,
                        });
                    }
                }
                self.available = true;
                Ok(())
            }
            Err(err) => {
                debug!("command to {} failed: {err}", self.host());
                self.available = false;
                Err(err)
            }
        }
    }

    /// Query the device's current capability set.
    ///
    /// A live read for configuration layers that need to enumerate choices;
    /// the cached snapshot and the availability flag are left alone.
    pub async fn capabilities(&self) -> Result<Capabilities> {
        let info = tokio::time::timeout(self.request_timeout, self.client.get_info())
            .await
            .unwrap_or_else(|_| Err(Error::timeout(self.client.host())))?;
        Ok(info.capabilities)
    }
}
