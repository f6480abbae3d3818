mod app;
mod color;
mod config;
mod data;
mod format;
mod state;
mod ui;

use anyhow::Context;
use app::DashboardApp;
use clap::Parser;
use config::Config;
use eframe::egui;
use state::AppState;

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let config = Config::parse();

    // Without the dataset there is nothing to show: fail before opening a window.
    let dataset = data::loader::load_file(&config.data).map_err(|e| {
        log::error!("Cannot start dashboard: {e}");
        e
    })?;

    let mut state = AppState::new(config.currency.clone());
    let initial = config.initial_range(&dataset);
    state.set_dataset(dataset, config.data.clone(), initial);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 900.0])
            .with_min_inner_size([700.0, 500.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Bike Sharing Dashboard",
        options,
        Box::new(|_cc| Ok(Box::new(DashboardApp::new(state)))),
    )
    .map_err(|e| anyhow::anyhow!("{e}"))
    .context("running the dashboard window")
}
