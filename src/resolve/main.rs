//! One-shot zone price resolution.
//!
//! Decodes a zone dataset file, matches a coordinate and prints the
//! resolved pricing as JSON.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use zonefare::models::DefaultPricing;
use zonefare::{dataset, pip, pricing, Coordinate};

#[derive(Parser, Debug)]
#[command(name = "resolve")]
#[command(about = "Resolve a delivery price for a coordinate")]
struct Args {
    /// Zone dataset JSON file
    #[arg(short, long)]
    dataset: PathBuf,

    /// Query latitude
    #[arg(long, allow_hyphen_values = true)]
    lat: f64,

    /// Query longitude
    #[arg(long, allow_hyphen_values = true)]
    lon: f64,

    /// Fallback price for zones without one
    #[arg(long)]
    default_price: Option<i64>,

    /// Fallback period start
    #[arg(long)]
    default_period_from: Option<i64>,

    /// Fallback period end
    #[arg(long)]
    default_period_to: Option<i64>,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: Level,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(args.log_level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let raw = fs::read_to_string(&args.dataset)
        .with_context(|| format!("Failed to read dataset {}", args.dataset.display()))?;

    let zones = dataset::decode(&raw)?;
    info!("Decoded {} zones from {}", zones.len(), args.dataset.display());

    let point = Coordinate::new(args.lat, args.lon);
    let matched = pip::resolve(&zones, &point)?;
    info!("Matched zone '{}'", matched.title);

    let defaults = DefaultPricing {
        price: args.default_price,
        period_from: args.default_period_from,
        period_to: args.default_period_to,
    };
    let resolved = pricing::resolve_pricing(matched, &defaults)
        .with_context(|| format!("Failed to price zone '{}'", matched.title))?;

    println!("{}", serde_json::to_string_pretty(&resolved)?);

    Ok(())
}
