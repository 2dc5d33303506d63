#![allow(clippy::collapsible_if)]
#![allow(clippy::collapsible_else_if)]

// Core modules
pub mod analysis;
pub mod config;
pub mod data;
pub mod domain;
pub mod engine;
pub mod ui;
pub mod utils;

use std::path::PathBuf;

// Re-export commonly used types
pub use analysis::compute_bands;
pub use data::{ConfigStore, JsonFileStore, KeyValueStore, MemoryStore};
pub use domain::{BandPoint, OhlcvPoint, StatisticalBandConfig, VisibilitySet};
pub use engine::{ChartBackend, ChartCoordinator, ChartInput};
pub use ui::SigmaBandsApp;
pub use utils::app_time;

// CLI argument parsing
use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Directory holding the persisted band configuration
    #[arg(long, default_value = config::PERSISTENCE.state_directory)]
    pub state_dir: PathBuf,

    /// JSON array of OHLCV points to show instead of the demo basket
    #[arg(long)]
    pub points: Option<PathBuf>,
}

/// Main application entry point - creates the GUI app
/// This is the public API for the binary to call
pub fn run_app(
    cc: &eframe::CreationContext,
    points: Vec<OhlcvPoint>,
    data_signature: &'static str,
    state_directory: PathBuf,
) -> Box<dyn eframe::App> {
    let app = ui::SigmaBandsApp::new(cc, points, data_signature, state_directory);
    Box::new(app)
}
