//! Print the shoppers report.
//!
//! Usage: `shoppers [config.json]`. Without a config file the inputs are read
//! from `data/shoppers/`. Set `RUST_LOG` to change log verbosity.

use anyhow::Result;
use env_logger::Env;
use shopflow::shoppers::{self, ShoppersConfig};

fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let cfg = match std::env::args_os().nth(1) {
        Some(path) => ShoppersConfig::from_json_file(path)?,
        None => ShoppersConfig::default(),
    };
    let report = shoppers::run(&cfg)?;
    println!("{report}");
    Ok(())
}
