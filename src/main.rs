#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")] // hide console window on Windows in release

use std::path::PathBuf;

use clap::Parser;
use eframe::NativeOptions;

use sigma_bands::config::{DEMO, PERSISTENCE};
use sigma_bands::data::{DemoSource, JsonFileSource, PointSource, load_first_available};
use sigma_bands::ui::ui_text::UI_TEXT;
use sigma_bands::{Cli, run_app};

fn main() -> eframe::Result {
    // A. Init Logging
    std::panic::set_hook(Box::new(|panic_info| {
        eprintln!("Application panicked: {:?}", panic_info);
    }));
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    // B. Parse Args
    let args = Cli::parse();
    #[cfg(debug_assertions)]
    log::info!("Parsed arguments: {:?}", args);

    // C. Data Loading: a points file if given, the demo basket otherwise
    let mut sources: Vec<Box<dyn PointSource>> = Vec::new();
    if let Some(path) = &args.points {
        sources.push(Box::new(JsonFileSource { path: path.clone() }));
    }
    sources.push(Box::new(DemoSource { config: &DEMO }));

    let (points, signature) = match load_first_available(&sources) {
        Ok(loaded) => loaded,
        Err(e) => {
            log::error!("{:#}", e);
            (Vec::new(), "none")
        }
    };
    log::info!("Loaded {} points from {}", points.len(), signature);

    // D. Run Native App
    let options = NativeOptions {
        persistence_path: Some(PathBuf::from(PERSISTENCE.app_state_path)),
        ..Default::default()
    };

    let state_directory = args.state_dir.clone();
    eframe::run_native(
        UI_TEXT.app_title,
        options,
        Box::new(move |cc| Ok(run_app(cc, points, signature, state_directory))),
    )
}
