mod app;
mod color;
mod config;
mod data;
mod state;
mod ui;

use std::path::Path;

use anyhow::{anyhow, Context, Result};
use app::DashboardApp;
use config::{Config, CONFIG_FILE};
use eframe::egui;
use state::AppState;

fn main() -> Result<()> {
    env_logger::init();

    // Both are fatal: the window never opens without a dataset.
    let config = Config::load(Path::new(CONFIG_FILE)).inspect_err(|e| {
        log::error!("Invalid settings: {e:#}");
    })?;
    let dataset = data::loader::load_file(&config.data_path)
        .with_context(|| format!("loading {}", config.data_path.display()))
        .inspect_err(|e| log::error!("Failed to load dataset: {e:#}"))?;

    let state = AppState::new(dataset, &config);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 860.0])
            .with_min_inner_size([640.0, 420.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Vehicle Dashboard – Listados de vehículos",
        options,
        Box::new(|_cc| Ok(Box::new(DashboardApp::new(state)))),
    )
    .map_err(|e| anyhow!("running dashboard: {e}"))
}
