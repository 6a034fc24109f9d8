//! Discover all strip controllers on the network and turn them on in orange.
//!
//! This example demonstrates:
//! - The one-shot background subnet sweep
//! - Setup validation of a discovered device
//! - Sending a command through a coordinator
//!
//! Run with: cargo run --example discover_and_turn_on

use neopixel_lights_rs::{Brightness, Color, Command, Coordinator, Scanner};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("Sweeping the local network for strip controllers...");

    let http = reqwest::Client::new();
    let scan = Scanner::new(http.clone()).spawn();
    let devices = scan.wait().await;

    if devices.is_empty() {
        println!("No strip controllers found on the network.");
        return Ok(());
    }

    println!("Found {} device(s):", devices.len());
    for device in devices.values() {
        println!("  - {} at {} ({})", device.name, device.host, device.device_id);
    }

    let mut command = Command::on();
    command.brightness(&Brightness::from_scaled(200));
    command.color(&Color::rgb(255, 96, 0));

    println!("\nTurning every strip on...");

    for device in devices.into_values() {
        let validated = match device.confirm(http.clone()).await {
            Ok(validated) => validated,
            Err(e) => {
                eprintln!("  ✗ could not validate {}: {}", device.host, e);
                continue;
            }
        };

        let mut coordinator = Coordinator::new(device.into_client(http.clone()));
        let sent = async {
            coordinator.first_refresh().await?;
            coordinator.send_command(&command).await
        }
        .await;
        match sent {
            Ok(()) => println!("  ✓ {} is now on", validated.name),
            Err(e) => eprintln!("  ✗ {} did not accept the command: {}", validated.name, e),
        }
    }

    println!("\nDone!");
    Ok(())
}
