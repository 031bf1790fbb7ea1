// SPDX-License-Identifier: MPL-2.0

//! Test program: Enable or disable auto-charge on a station.
//!
//! # Usage
//!
//! ```bash
//! cargo run --example set_auto_charge -- <host> <on|off>
//! ```

use std::env;
use technove::Station;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let enabled = match args.get(2).map(String::as_str) {
        Some("on") if args.len() == 3 => true,
        Some("off") if args.len() == 3 => false,
        _ => {
            eprintln!("Usage: {} <host> <on|off>", args[0]);
            eprintln!();
            eprintln!("Example:");
            eprintln!("  cargo run --example set_auto_charge -- 192.168.1.100 on");
            std::process::exit(1);
        }
    };

    let mut station = Station::new(args[1].as_str());

    station.set_auto_charge(enabled).await?;
    let info = station.update().await?;
    println!("Auto-charge is now {}", if info.auto_charge { "on" } else { "off" });

    station.close();
    Ok(())
}
