// SPDX-License-Identifier: MPL-2.0

//! Test program: Read and print the full state of a station.
//!
//! # Usage
//!
//! ```bash
//! cargo run --example get_info -- <host>
//! ```
//!
//! Set `RUST_LOG=technove=debug` to see request logs.

use std::env;
use technove::Station;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args: Vec<String> = env::args().collect();

    if args.len() != 2 {
        eprintln!("Usage: {} <host>", args[0]);
        eprintln!();
        eprintln!("Example:");
        eprintln!("  cargo run --example get_info -- 192.168.1.100");
        std::process::exit(1);
    }

    let host = &args[1];
    println!("Reading station at {host}...");

    let info = Station::new(host.as_str())
        .scoped(async |station| station.update().await)
        .await?;

    println!();
    println!("Name:               {}", info.name);
    println!("MAC address:        {}", info.mac_address);
    println!("Firmware:           {} (up to date: {})", info.version, info.is_up_to_date);
    println!("Status:             {}", info.status);
    println!("Network:            {} ({} dBm)", info.network_ssid, info.rssi);
    println!("Voltage in/out:     {} V / {} V", info.voltage_in, info.voltage_out);
    println!("Current:            {} A", info.current);
    println!(
        "Max current:        {} A (station: {} A)",
        info.max_current, info.max_station_current
    );
    println!("Auto-charge:        {}", info.auto_charge);
    println!("Sharing mode:       {}", info.in_sharing_mode);
    println!("Session energy:     {} kWh", info.energy_session);
    println!("Total energy:       {} kWh", info.energy_total);
    println!();
    println!("{}", serde_json::to_string_pretty(&info)?);

    Ok(())
}
