use std::{env::current_dir, fs::write, path::PathBuf};

use anyhow::Result;
use clap::Parser;
use fdl_core::festival_client::{self, DEFAULT_YEAR};
use log::{info, warn};

mod config;

use config::Config;

#[derive(Debug, Parser)]
pub struct Arguments {
    /// the festival listing URL (overrides the config file)
    #[arg(long)]
    pub url: Option<String>,
    /// path to the TOML configuration file holding the listing URL
    #[arg(long, default_value = "config.toml")]
    pub config: PathBuf,
    /// the reference year applied to all date tokens
    #[arg(long, default_value_t = DEFAULT_YEAR)]
    pub year: i32,
    /// where to write the JSON output (defaults to festivals_<year>.json)
    #[arg(long)]
    pub output: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    let args = Arguments::parse();
    let url = match args.url {
        Some(url) => url,
        None => Config::load(&args.config)?.url,
    };
    let harvest = festival_client::get(&url, args.year).await?;
    for skipped in &harvest.skipped {
        warn!("row {} skipped: {}", skipped.row, skipped.reason);
    }
    info!(
        "extracted {} festivals, skipped {} rows",
        harvest.festivals.len(),
        harvest.skipped.len()
    );
    let path = match args.output {
        Some(path) => path,
        None => {
            let mut path = current_dir()?;
            path.push(format!("festivals_{}.json", args.year));
            path
        }
    };
    write(&path, serde_json::to_string_pretty(&harvest.festivals)?)?;
    info!("wrote {}", path.display());
    Ok(())
}
