extern crate log;
pub mod config;
pub mod dissolve;
pub mod geofile;
use crate::config::{load_config, Config};
use crate::dissolve::dissolver::{run, DissolveParams};
use clap::Parser;
use std::path::PathBuf;

/// Merge constituency polygons into district polygons.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to an optional YAML config file. Without it the built-in paths are used.
    #[arg(short, long)]
    config_filepath: Option<PathBuf>,
}

fn try_main() -> anyhow::Result<()> {
    let args = Args::try_parse()?;
    let config = match &args.config_filepath {
        Some(config_filepath) => load_config(config_filepath)?,
        None => Config::default(),
    };
    log::debug!("{:?}", config);

    let summary = run(&DissolveParams::from(config))?;
    log::info!(
        "Dissolved {} features into {} districts",
        summary.input_feature_count,
        summary.output_feature_count
    );
    Ok(())
}

fn main() {
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "info")
    }
    env_logger::init();
    if let Err(e) = try_main() {
        eprintln!("Error: {:?}", e);
        std::process::exit(1)
    }
}
