//! Integration tests for the random sensor firmware.
//!
//! Run after flashing the firmware. Scans for the device over BLE, reads
//! the sensor characteristic and checks it against the generator sequence.

mod ble_client;
mod sequence;

use std::time::Duration;

use clap::Parser;
use colored::Colorize;

use ble_client::SensorClient;
use tests::{print_results, run_all_tests};

#[derive(Parser)]
#[command(name = "integration-tests")]
#[command(about = "BLE integration tests for the random sensor firmware")]
struct Args {
    /// Advertised device name
    #[arg(short, long, default_value = "RngSense")]
    name: String,

    /// BLE scan timeout in seconds
    #[arg(long, default_value = "10")]
    scan_timeout: u64,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    println!("{}", "Random Sensor Integration Tests".bold());
    println!("Device: BLE (scanning for \"{}\")", args.name);
    println!();

    println!("Scanning...");
    let client =
        SensorClient::connect_by_name(&args.name, Duration::from_secs(args.scan_timeout)).await?;
    println!("{}", "Connected!".green());

    println!("\nRunning tests...\n");

    let results = run_all_tests(&client).await;
    print_results(&results);

    client.disconnect().await?;

    // Exit with error code if any tests failed
    let failed = results.iter().filter(|r| !r.passed).count();
    if failed > 0 {
        std::process::exit(1);
    }

    Ok(())
}
