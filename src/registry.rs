//! Registration store tying configured devices to running coordinators.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use log::{info, warn};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::client::DeviceClient;
use crate::coordinator::Coordinator;
use crate::errors::Error;

/// Configuration record for one registered device.
///
/// This is what a host application persists between runs; one record maps to
/// one coordinator for the device's registered lifetime.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct DeviceConfig {
    pub host: String,
    pub port: u16,
    pub name: String,
    /// Stable identity token, from discovery or setup validation.
    pub device_id: String,
}

/// Shared handle to a running coordinator.
///
/// The mutex serializes polls, commands, and reads, so a reader always
/// observes a complete snapshot.
pub type SharedCoordinator = Arc<Mutex<Coordinator>>;

struct Registration {
    config: DeviceConfig,
    coordinator: SharedCoordinator,
    poller: JoinHandle<()>,
}

/// Owns every registered device's coordinator and its polling task.
///
/// One registry lives at the composition root; there is no ambient global
/// state. Registering a device runs the fatal-on-failure first refresh and
/// starts the periodic poll task; removing it stops the task and drops the
/// coordinator. Coordinators are fully independent of each other; the only
/// shared resource is the process-wide HTTP client.
///
/// # Example
///
/// ```ignore
/// use neopixel_lights_rs::{Command, DeviceConfig, DeviceRegistry};
///
/// let mut registry = DeviceRegistry::new();
/// let id = registry
///     .register(DeviceConfig {
///         host: "192.168.1.40".into(),
///         port: 80,
///         name: "Desk strip".into(),
///         device_id: "pico-a1b2c3".into(),
///     })
///     .await?;
///
/// let coordinator = registry.get(&id).unwrap();
/// coordinator.lock().await.send_command(&Command::on()).await?;
/// ```
pub struct DeviceRegistry {
    http: reqwest::Client,
    entries: HashMap<Uuid, Registration>,
}

impl DeviceRegistry {
    /// Create a registry with its own HTTP client.
    pub fn new() -> Self {
        Self::with_http(reqwest::Client::new())
    }

    /// Create a registry on an existing HTTP client, to share the connection
    /// pool with a [`Scanner`](crate::Scanner).
    pub fn with_http(http: reqwest::Client) -> Self {
        DeviceRegistry {
            http,
            entries: HashMap::new(),
        }
    }

    /// The HTTP client shared by every coordinator this registry creates.
    pub fn http(&self) -> &reqwest::Client {
        &self.http
    }

    /// Register a device and start polling it.
    pub async fn register(&mut self, config: DeviceConfig) -> Result<Uuid, Error> {
        self.register_with_interval(config, Coordinator::DEFAULT_POLL_INTERVAL)
            .await
    }

    /// Register a device with a custom poll interval.
    ///
    /// The first refresh runs inline before anything is stored: a device
    /// that cannot be reached at add-time fails registration outright
    /// instead of lingering as an unavailable entry.
    pub async fn register_with_interval(
        &mut self,
        config: DeviceConfig,
        poll_interval: Duration,
    ) -> Result<Uuid, Error> {
        let client = DeviceClient::new(self.http.clone(), config.host.clone(), config.port);
        let mut coordinator = Coordinator::with_poll_interval(client, poll_interval);
        coordinator.first_refresh().await?;

        let coordinator = Arc::new(Mutex::new(coordinator));
        let poller = tokio::spawn(poll_loop(Arc::clone(&coordinator), poll_interval));

        let id = Uuid::new_v4();
        info!("registered device {} at {} as {id}", config.name, config.host);
        self.entries.insert(
            id,
            Registration {
                config,
                coordinator,
                poller,
            },
        );
        Ok(id)
    }

    /// Coordinator handle for a registration, for presentation-layer reads
    /// and command dispatch.
    pub fn get(&self, id: &Uuid) -> Option<SharedCoordinator> {
        self.entries
            .get(id)
            .map(|registration| Arc::clone(&registration.coordinator))
    }

    /// Configuration record for a registration.
    pub fn config(&self, id: &Uuid) -> Option<&DeviceConfig> {
        self.entries.get(id).map(|registration| &registration.config)
    }

    /// Ids of all registrations.
    pub fn ids(&self) -> Vec<Uuid> {
        self.entries.keys().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Deregister a device, stopping its poll task.
    ///
    /// The device's configuration is the caller's to keep or discard; an
    /// unavailable device is only removed when the user asks for it.
    pub fn remove(&mut self, id: &Uuid) -> bool {
        match self.entries.remove(id) {
            Some(registration) => {
                registration.poller.abort();
                info!("removed device registration {id}");
                true
            }
            None => false,
        }
    }
}

impl Default for DeviceRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for DeviceRegistry {
    fn drop(&mut self) {
        for registration in self.entries.values() {
            registration.poller.abort();
        }
    }
}

/// Drives one coordinator's poll cycle at a fixed interval, forever.
///
/// Refresh failures are recoverable by design: log and let the next cycle
/// run at the normal interval.
async fn poll_loop(coordinator: SharedCoordinator, poll_interval: Duration) {
    loop {
        tokio::time::sleep(poll_interval).await;
        if let Err(err) = coordinator.lock().await.refresh().await {
            warn!("scheduled refresh failed: {err}");
        }
    }
}
