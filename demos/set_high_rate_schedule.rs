// SPDX-License-Identifier: MPL-2.0

//! Test program: Enable or disable the high-rate schedule on a station.
//!
//! # Usage
//!
//! ```bash
//! cargo run --example set_high_rate_schedule -- <host> <on|off>
//! ```

use std::env;
use std::time::Duration;
use technove::{HttpConfig, Station};

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
            eprintln!("  cargo run --example set_high_rate_schedule -- 192.168.1.100 off");
            std::process::exit(1);
        }
    };

    let config = HttpConfig::new(args[1].as_str()).with_timeout(Duration::from_secs(3));

    Station::from_config(config)
        .scoped(async |station| station.set_high_rate_schedule(enabled).await)
        .await?;

    println!("High-rate schedule {}", if enabled { "enabled" } else { "disabled" });
    Ok(())
}
