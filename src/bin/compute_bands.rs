//! Compute statistical bands for a basket of OHLCV points and print them as JSON.

use std::io::{BufWriter, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use sigma_bands::analysis::compute_bands;
use sigma_bands::config::PERSISTENCE;
use sigma_bands::data::{ConfigStore, JsonFileSource, JsonFileStore, PointSource};
use sigma_bands::domain::point::instrument_ids;
use sigma_bands::domain::{InstrumentId, TimestampRange, VisibilitySet};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// JSON array of OHLCV points
    points: PathBuf,

    /// Directory holding the persisted band configuration
    #[arg(long, default_value = PERSISTENCE.state_directory)]
    state_dir: PathBuf,

    /// Instruments to include (default: all)
    #[arg(long, value_delimiter = ',')]
    instruments: Vec<String>,

    /// Force cumulative mode regardless of the stored config
    #[arg(long)]
    cumulative: bool,

    /// Cumulative rebase point as a fraction of the time range
    #[arg(long, default_value_t = 0.0)]
    anchor: f64,

    /// Pretty-print the output
    #[arg(long)]
    pretty: bool,
}

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let args = Args::parse();

    let points = JsonFileSource {
        path: args.points.clone(),
    }
    .load_points()?;

    let mut config = ConfigStore::new(JsonFileStore::new(&args.state_dir)).load();
    if args.cumulative {
        config.use_cumulative_mode = true;
    }

    let visible: VisibilitySet = if args.instruments.is_empty() {
        instrument_ids(&points).into_iter().collect()
    } else {
        args.instruments.iter().map(InstrumentId::new).collect()
    };

    let bands = compute_bands(
        &points,
        &visible,
        &config,
        Some(args.anchor),
        TimestampRange::of_points(&points),
    );
    log::info!(
        "{} points, {} visible instruments -> {} band points",
        points.len(),
        visible.len(),
        bands.len()
    );

    let stdout = std::io::stdout();
    let mut writer = BufWriter::new(stdout.lock());
    if args.pretty {
        serde_json::to_writer_pretty(&mut writer, &bands)
    } else {
        serde_json::to_writer(&mut writer, &bands)
    }
    .context("Failed to write bands")?;
    writeln!(writer).context("Failed to write bands")?;
    Ok(())
}
