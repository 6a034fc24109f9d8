//! Device discovery via an HTTP subnet sweep.
//!
//! Strip controllers announce nothing on the network, so discovery probes
//! every host of the local subnets for the `/info` endpoint instead, with
//! bounded parallelism and a total deadline. The sweep runs once at device
//! setup time; afterwards the chosen address belongs to a
//! [`Coordinator`](crate::Coordinator).

use std::collections::HashMap;
use std::net::Ipv4Addr;
use std::time::Duration;

use futures::future::join_all;
use ipnet::Ipv4Net;
use log::{debug, info, warn};
use reqwest::StatusCode;
use tokio::task::JoinHandle;
use tokio::time::Instant;

use crate::client::{DeviceClient, INFO_PATH};
use crate::errors::{Error, SetupError};
use crate::status::{Capabilities, DeviceInfo};

/// Subnets probed when the host only has an isolated bridge address and the
/// real home network is invisible to it.
const FALLBACK_SUBNETS: [&str; 8] = [
    "192.168.0.0/24",
    "192.168.1.0/24",
    "192.168.2.0/24",
    "192.168.10.0/24",
    "192.168.100.0/24",
    "192.168.178.0/24",
    "10.0.0.0/24",
    "10.0.1.0/24",
];

/// An IPv4 address assigned to a local network interface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ipv4Interface {
    pub addr: Ipv4Addr,
    pub prefix_len: u8,
}

/// Source of local interface addresses.
///
/// The scanner only needs addresses and prefixes; abstracting the OS lookup
/// keeps sweeps testable against synthetic networks.
pub trait InterfaceSource: Send + Sync {
    fn ipv4_interfaces(&self) -> Vec<Ipv4Interface>;
}

/// Interface addresses read from the operating system's interface table.
#[derive(Debug, Default)]
pub struct SystemInterfaces;

impl InterfaceSource for SystemInterfaces {
    fn ipv4_interfaces(&self) -> Vec<Ipv4Interface> {
        let Ok(interfaces) = if_addrs::get_if_addrs() else {
            return Vec::new();
        };
        interfaces
            .into_iter()
            .filter_map(|interface| match interface.addr {
                if_addrs::IfAddr::V4(v4) => Some(Ipv4Interface {
                    addr: v4.ip,
                    prefix_len: u32::from(v4.netmask).count_ones() as u8,
                }),
                if_addrs::IfAddr::V6(_) => None,
            })
            .collect()
    }
}

/// Tuning knobs for a discovery sweep.
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// Port probed on every candidate address.
    pub port: u16,
    /// Timeout for a single probe.
    pub probe_timeout: Duration,
    /// Hard cap on simultaneously in-flight probes.
    pub max_parallel: usize,
    /// Total sweep deadline, measured from scan start.
    pub total_timeout: Duration,
    /// Sweep exactly these subnets instead of consulting the interface table.
    pub subnets: Option<Vec<Ipv4Net>>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        ScanConfig {
            port: DeviceClient::DEFAULT_PORT,
            probe_timeout: Duration::from_millis(1500),
            max_parallel: 30,
            total_timeout: Duration::from_secs(60),
            subnets: None,
        }
    }
}

/// A strip controller that answered a discovery probe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredDevice {
    pub host: Ipv4Addr,
    pub port: u16,
    /// Stable identity token reported by the firmware.
    pub device_id: String,
    pub name: String,
}

impl DiscoveredDevice {
    /// Delay before talking to a freshly discovered device again; the sweep
    /// itself can briefly overload the controller.
    pub const SETTLE_DELAY: Duration = Duration::from_secs(2);

    /// Convert this discovered device into a [`DeviceClient`].
    pub fn into_client(self, http: reqwest::Client) -> DeviceClient {
        DeviceClient::new(http, self.host.to_string(), self.port)
    }

    /// Validate this device before registering it.
    ///
    /// Waits out [`Self::SETTLE_DELAY`] first, then runs [`validate_device`].
    pub async fn confirm(&self, http: reqwest::Client) -> Result<ValidatedDevice, SetupError> {
        tokio::time::sleep(Self::SETTLE_DELAY).await;
        let client = DeviceClient::new(http, self.host.to_string(), self.port);
        validate_device(&client).await
    }
}

/// Sweeps local subnets for strip controllers.
///
/// # Examples
///
/// ```ignore
/// use neopixel_lights_rs::Scanner;
///
/// let scan = Scanner::new(reqwest::Client::new()).spawn();
/// // ... drive a UI while the sweep runs; `scan.is_done()` says when ...
/// let devices = scan.wait().await;
/// println!("found {} device(s)", devices.len());
/// ```
pub struct Scanner {
    http: reqwest::Client,
    config: ScanConfig,
    interfaces: Box<dyn InterfaceSource>,
}

impl Scanner {
    pub fn new(http: reqwest::Client) -> Self {
        Scanner {
            http,
            config: ScanConfig::default(),
            interfaces: Box::new(SystemInterfaces),
        }
    }

    pub fn with_config(mut self, config: ScanConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_interface_source(mut self, source: impl InterfaceSource + 'static) -> Self {
        self.interfaces = Box::new(source);
        self
    }

    /// Run the sweep to completion.
    ///
    /// Returns responding devices keyed by identity token; a device reachable
    /// via several addresses keeps whichever probe answered last. Individual
    /// probe failures are silently "no device there", and a machine with no
    /// usable interfaces yields an empty map rather than an error.
    pub async fn run(&self) -> HashMap<String, DiscoveredDevice> {
        let started = Instant::now();
        let (subnets, local_addrs) = self.candidate_subnets();
        if subnets.is_empty() {
            warn!("no usable subnets to sweep");
            return HashMap::new();
        }
        info!(
            "sweeping {} subnet(s): {}",
            subnets.len(),
            subnets
                .iter()
                .map(|net| net.to_string())
                .collect::<Vec<_>>()
                .join(", ")
        );

        let mut discovered: HashMap<String, DiscoveredDevice> = HashMap::new();
        let mut batch = Vec::new();

        'sweep: for subnet in &subnets {
            for host in subnet.hosts() {
                if local_addrs.contains(&host) {
                    continue;
                }
                batch.push(self.probe(host));

                if batch.len() >= self.config.max_parallel {
                    // The deadline is advisory: checked between batches, never
                    // preempting probes already in flight.
                    if started.elapsed() > self.config.total_timeout {
                        warn!("discovery deadline reached, stopping sweep");
                        batch.clear();
                        break 'sweep;
                    }
                    for device in join_all(batch.drain(..)).await.into_iter().flatten() {
                        discovered.insert(device.device_id.clone(), device);
                    }
                }
            }
        }

        // The last partial batch runs under whatever budget is left.
        if !batch.is_empty() {
            let remaining = self.config.total_timeout.saturating_sub(started.elapsed());
            if remaining.is_zero() {
                warn!("discovery deadline reached, dropping final batch");
            } else {
                match tokio::time::timeout(remaining, join_all(batch)).await {
                    Ok(results) => {
                        for device in results.into_iter().flatten() {
                            discovered.insert(device.device_id.clone(), device);
                        }
                    }
                    Err(_) => warn!("final discovery batch timed out"),
                }
            }
        }

        info!(
            "network sweep completed in {:.1}s, found {} device(s)",
            started.elapsed().as_secs_f64(),
            discovered.len()
        );
        discovered
    }

    /// Start the sweep as a one-shot background task.
    pub fn spawn(self) -> DiscoveryScan {
        DiscoveryScan {
            handle: tokio::spawn(async move { self.run().await }),
        }
    }

    /// Build the candidate subnet list and the scanner's own addresses.
    ///
    /// Loopback interfaces are ignored. Addresses in the isolated-bridge
    /// range contribute no subnet (the bridge network holds no devices);
    /// when they are all we have, the common home subnets are swept as a
    /// best-effort guess.
    fn candidate_subnets(&self) -> (Vec<Ipv4Net>, Vec<Ipv4Addr>) {
        if let Some(subnets) = &self.config.subnets {
            return (subnets.clone(), Vec::new());
        }

        let mut subnets: Vec<Ipv4Net> = Vec::new();
        let mut local_addrs = Vec::new();
        let mut bridge_seen = false;

        for interface in self.interfaces.ipv4_interfaces() {
            if interface.addr.is_loopback() {
                continue;
            }
            local_addrs.push(interface.addr);

            if in_bridge_range(interface.addr) {
                debug!("skipping bridge address {}", interface.addr);
                bridge_seen = true;
                continue;
            }

            match Ipv4Net::new(interface.addr, interface.prefix_len) {
                Ok(net) => {
                    let net = net.trunc();
                    if !subnets.contains(&net) {
                        subnets.push(net);
                    }
                }
                Err(err) => {
                    debug!("could not derive subnet from {}: {err}", interface.addr);
                }
            }
        }

        if subnets.is_empty() && bridge_seen {
            info!("only bridge networking detected, falling back to common home subnets");
            subnets.extend(
                FALLBACK_SUBNETS
                    .iter()
                    .filter_map(|subnet| subnet.parse::<Ipv4Net>().ok()),
            );
        }

        (subnets, local_addrs)
    }

    /// Probe one address for a strip controller.
    ///
    /// Success requires HTTP 200 and an info body with a non-empty device
    /// id; every other outcome means "no device here".
    async fn probe(&self, host: Ipv4Addr) -> Option<DiscoveredDevice> {
        let url = format!("http://{}:{}{}", host, self.config.port, INFO_PATH);
        let response = self
            .http
            .get(&url)
            .timeout(self.config.probe_timeout)
            .send()
            .await
            .ok()?;

        if response.status() != StatusCode::OK {
            return None;
        }

        let info: DeviceInfo = response.json().await.ok()?;
        if info.device.id.is_empty() {
            return None;
        }

        debug!("found device at {host}: {}", info.device.display_name());
        Some(DiscoveredDevice {
            host,
            port: self.config.port,
            name: info.device.display_name().to_string(),
            device_id: info.device.id,
        })
    }
}

/// Handle to a one-shot background discovery sweep.
///
/// The sweep keeps running after [`Scanner::spawn`] returns; a setup flow can
/// poll [`DiscoveryScan::is_done`] while it renders progress and call
/// [`DiscoveryScan::wait`] when it is ready to branch on the results.
#[derive(Debug)]
pub struct DiscoveryScan {
    handle: JoinHandle<HashMap<String, DiscoveredDevice>>,
}

impl DiscoveryScan {
    /// Whether the sweep has finished.
    pub fn is_done(&self) -> bool {
        self.handle.is_finished()
    }

    /// Wait for the sweep to finish and take its results.
    ///
    /// A sweep task that died counts as "found nothing"; discovery never
    /// propagates failures.
    pub async fn wait(self) -> HashMap<String, DiscoveredDevice> {
        self.handle.await.unwrap_or_default()
    }
}

/// Identity and capabilities confirmed during setup validation.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedDevice {
    pub device_id: String,
    pub name: String,
    pub capabilities: Capabilities,
}

/// Validate that an address hosts a strip controller we can talk to.
///
/// A single attempt against `/info`, classified for the setup flow:
/// [`SetupError::CannotConnect`] when the device is unreachable or does not
/// answer like a controller, [`SetupError::Unknown`] otherwise. Unlike poll
/// failures, a validation failure blocks the device from being added.
pub async fn validate_device(client: &DeviceClient) -> Result<ValidatedDevice, SetupError> {
    const VALIDATE_TIMEOUT: Duration = Duration::from_secs(10);

    debug!("validating device at {}:{}", client.host(), client.port());
    let info = tokio::time::timeout(VALIDATE_TIMEOUT, client.get_info())
        .await
        .unwrap_or_else(|_| Err(Error::timeout(client.host())))
        .map_err(SetupError::classify)?;

    if info.device.id.is_empty() {
        return Err(SetupError::CannotConnect(Error::missing_identity(
            client.host(),
        )));
    }

    let name = info.device.display_name().to_string();
    Ok(ValidatedDevice {
        device_id: info.device.id,
        name,
        capabilities: info.capabilities,
    })
}

/// The 172.16.0.0/12 block, used by container hosts for isolated bridges.
fn in_bridge_range(addr: Ipv4Addr) -> bool {
    let octets = addr.octets();
    octets[0] == 172 && (16..=31).contains(&octets[1])
}
