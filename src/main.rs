use std::path::Path;

use eframe::egui;
use log::{debug, info, warn};
use mimalloc::MiMalloc;

mod app;
mod config;
mod controls;
mod debounce;
mod editor;
mod error;
mod filter;
mod flow;
mod index;
mod selection;
mod sidecar;
mod thumbnails;

use app::DatasetTagger;
use config::{Config, ConfigError, CONFIG_FILE};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

fn main() -> Result<(), eframe::Error> {
    let loaded = Config::from_file(Path::new(CONFIG_FILE));
    let config = match &loaded {
        Ok(config) => config.clone(),
        Err(_) => Config::default(),
    };

    env_logger::Builder::new()
        .filter_level(config.log_level.to_level_filter())
        .parse_default_env()
        .init();

    match loaded {
        Ok(_) => info!("Loaded settings from {}", CONFIG_FILE),
        Err(ConfigError::Io(err)) if err.kind() == std::io::ErrorKind::NotFound => {
            debug!("No {} found, using defaults", CONFIG_FILE)
        }
        Err(err) => warn!("Ignoring {}: {}", CONFIG_FILE, err),
    }

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size(config.window_size),
        ..Default::default()
    };

    eframe::run_native(
        "Dataset Tagger",
        native_options,
        Box::new(move |cc| Ok(Box::new(DatasetTagger::new(cc, config)))),
    )
}
