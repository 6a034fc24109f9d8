//! CLI application for controlling strip controllers.
//!
//! This example demonstrates a small command-line interface on top of the
//! discovery scanner and the coordinator.
//!
//! Run with: cargo run --example strip_cli -- --help

use clap::{Parser, Subcommand};
use std::net::Ipv4Addr;
use std::str::FromStr;
use std::time::Duration;

use neopixel_lights_rs::{
    Brightness, Color, Command, Coordinator, DeviceClient, Effect, ScanConfig, Scanner, Speed,
    validate_device,
};

#[derive(Parser)]
#[command(name = "strip-cli")]
#[command(about = "Control NeoPixel strip controllers from the command line", long_about = None)]
struct Cli {
    /// IP address of the controller (not required for discover)
    #[arg(short = 'H', long, global = true)]
    host: Option<Ipv4Addr>,

    /// HTTP port of the controller
    #[arg(short, long, global = true, default_value = "80")]
    port: u16,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Discover all strip controllers on the network
    Discover {
        /// Total sweep deadline in seconds (default: 60)
        #[arg(short, long, default_value = "60")]
        timeout: u64,
    },

    /// Show the current state and info of the controller
    Status,

    /// Turn the strip on
    On,

    /// Turn the strip off
    Off,

    /// Set RGB color (0-255 for each component)
    Color {
        /// Red component (0-255)
        red: u8,
        /// Green component (0-255)
        green: u8,
        /// Blue component (0-255)
        blue: u8,
    },

    /// Set brightness (1-100 percent)
    Brightness {
        /// Brightness level (1-100)
        #[arg(value_parser = clap::value_parser!(u8).range(1..=100))]
        level: u8,
    },

    /// Start an effect
    Effect {
        /// Effect name (static, rainbow, fade, chase, breathing, twinkle,
        /// scanner, strobe, or any name the device reports)
        name: String,

        /// Animation speed (1-100)
        #[arg(short, long, value_parser = clap::value_parser!(u8).range(1..=100))]
        speed: Option<u8>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let http = reqwest::Client::new();

    let command = match cli.command {
        Commands::Discover { timeout } => {
            let config = ScanConfig {
                total_timeout: Duration::from_secs(timeout),
                ..ScanConfig::default()
            };
            println!("Sweeping local subnets (up to {timeout}s)...");
            let devices = Scanner::new(http).with_config(config).run().await;
            if devices.is_empty() {
                println!("No controllers found.");
            }
            for device in devices.values() {
                println!(
                    "  {} at {}:{} ({})",
                    device.name, device.host, device.port, device.device_id
                );
            }
            return Ok(());
        }
        command => command,
    };

    let host = cli.host.ok_or("--host is required for this command")?;
    let client = DeviceClient::new(http, host.to_string(), cli.port);

    match command {
        Commands::Discover { .. } => unreachable!(),
        Commands::Status => {
            let validated = validate_device(&client).await?;
            let mut coordinator = Coordinator::new(client);
            coordinator.first_refresh().await?;
            let snapshot = coordinator.snapshot().expect("refresh just succeeded");
            println!("{} ({})", validated.name, validated.device_id);
            println!("  power:      {}", if snapshot.is_on() { "on" } else { "off" });
            println!("  brightness: {}%", snapshot.state.brightness);
            let color = snapshot.color();
            println!("  color:      {},{},{}", color.red(), color.green(), color.blue());
            println!("  effect:     {}", snapshot.active_effect().unwrap_or("none"));
            if let Some(num_leds) = snapshot.num_leds() {
                println!("  leds:       {num_leds}");
            }
        }
        Commands::On => send(client, Command::on()).await?,
        Commands::Off => send(client, Command::off()).await?,
        Commands::Color { red, green, blue } => {
            let mut command = Command::on();
            command.color(&Color::from_str(&format!("{red},{green},{blue}"))?);
            send(client, command).await?;
        }
        Commands::Brightness { level } => {
            let mut command = Command::on();
            command.brightness(&Brightness::create(level).ok_or("invalid brightness")?);
            send(client, command).await?;
        }
        Commands::Effect { name, speed } => {
            let mut command = Command::on();
            match Effect::create(&name) {
                Some(effect) => command.effect(&effect),
                None => command.effect_named(&name),
            }
            if let Some(speed) = speed {
                command.speed(&Speed::create(speed).ok_or("invalid speed")?);
            }
            send(client, command).await?;
        }
    }

    Ok(())
}

async fn send(client: DeviceClient, command: Command) -> Result<(), Box<dyn std::error::Error>> {
    let mut coordinator = Coordinator::new(client);
    coordinator.first_refresh().await?;
    coordinator.send_command(&command).await?;
    println!("ok");
    Ok(())
}
