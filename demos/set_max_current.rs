// SPDX-License-Identifier: MPL-2.0

//! Test program: Set the max current of a station.
//!
//! The station state is read first so the value is checked against the
//! station rating and sharing mode before anything is sent.
//!
//! # Usage
//!
//! ```bash
//! cargo run --example set_max_current -- <host> <amperes>
//! ```

use std::env;
use technove::{Error, MIN_CURRENT, Station};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    if args.len() != 3 {
        eprintln!("Usage: {} <host> <amperes>", args[0]);
        eprintln!();
        eprintln!("Example:");
        eprintln!("  cargo run --example set_max_current -- 192.168.1.100 16");
        std::process::exit(1);
    }

    let max_current: u32 = args[2].parse()?;
    let mut station = Station::new(args[1].as_str());

    let info = station.update().await?;
    println!(
        "Current limit: {} A (allowed: {MIN_CURRENT}..={} A)",
        info.max_current, info.max_station_current
    );

    match station.set_max_current(max_current).await {
        Ok(()) => println!("Max current set to {max_current} A"),
        Err(Error::OutOfBound(e)) => println!("Rejected: {e}"),
        Err(e) => return Err(e.into()),
    }

    station.close();
    Ok(())
}
