//! # neopixel_lights_rs
//!
//! An async Rust library for discovering and controlling networked NeoPixel
//! LED strip controllers over HTTP.
//!
//! This crate talks to strip controllers that expose the small JSON API of
//! the PicoW NeoPixel firmware (`/info`, `/state`, `/control`). It covers the
//! full device lifecycle: a time-bounded subnet sweep to find controllers
//! without typing addresses, setup-time validation with classified errors,
//! and a per-device [`Coordinator`] that keeps a cached state snapshot fresh
//! through scheduled polling and serializes outbound commands.
//!
//! ## Quick Start
//!
//! ```ignore
//! use neopixel_lights_rs::{Brightness, Color, Command, DeviceConfig, DeviceRegistry, Scanner};
//!
//! async fn set_up() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut registry = DeviceRegistry::new();
//!
//!     // One-shot background sweep of the local subnets.
//!     let devices = Scanner::new(registry.http().clone()).spawn().wait().await;
//!     let device = devices.values().next().expect("no strip found");
//!     let confirmed = device.confirm(registry.http().clone()).await?;
//!
//!     // Register: first refresh runs inline, then polling starts.
//!     let id = registry
//!         .register(DeviceConfig {
//!             host: device.host.to_string(),
//!             port: device.port,
//!             name: confirmed.name,
//!             device_id: confirmed.device_id,
//!         })
//!         .await?;
//!
//!     // Commands go through the coordinator so the cache stays coherent.
//!     let mut command = Command::on();
//!     command.brightness(&Brightness::from_scaled(200));
//!     command.color(&Color::rgb(255, 96, 0));
//!     registry.get(&id).unwrap().lock().await.send_command(&command).await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Discovery**: concurrent HTTP sweep of the local subnets with bounded
//!   parallelism and a total deadline, via [`Scanner`]
//! - **Polling coordinator**: one [`Coordinator`] per device owns a cached
//!   [`DeviceSnapshot`] and an availability flag derived from the most recent
//!   communication outcome
//! - **Commands**: declarative [`Command`] payloads for power, brightness,
//!   color, and effects, with device replies folded back into the cache
//! - **Registry**: an explicit [`DeviceRegistry`] at the composition root
//!   maps configuration records to running coordinators
//! - **Value types**: validated [`Brightness`], [`Color`], [`Effect`],
//!   [`Power`], and [`Speed`] with the firmware's scale conventions
//!
//! ## Communication
//!
//! All communication is plain HTTP with JSON bodies on the local network,
//! port 80 by default. One [`reqwest::Client`] is shared by every coordinator
//! and the scanner; coordinators are otherwise fully independent.

mod client;
mod command;
mod coordinator;
mod discovery;
mod errors;
mod registry;
mod status;
mod types;

// Re-export public API
pub use client::{ControlResponse, DeviceClient};
pub use command::Command;
pub use coordinator::Coordinator;
pub use discovery::{
    DiscoveredDevice, DiscoveryScan, InterfaceSource, Ipv4Interface, ScanConfig, Scanner,
    SystemInterfaces, ValidatedDevice, validate_device,
};
pub use errors::{Error, SetupError};
pub use registry::{DeviceConfig, DeviceRegistry, SharedCoordinator};
pub use status::{Capabilities, DeviceIdentity, DeviceInfo, DeviceSnapshot, DeviceState};
pub use types::{Brightness, Color, Effect, Power, Speed};
