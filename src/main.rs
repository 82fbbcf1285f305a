mod app;
mod color;
mod config;
mod data;
mod state;
mod ui;

use anyhow::Context;
use app::DashboardApp;
use config::Config;
use eframe::egui;
use state::AppState;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let config = Config::from_env();
    let table = data::loader::load_file(&config.data_path)
        .with_context(|| format!("loading dataset {}", config.data_path.display()))?;
    if table.is_empty() {
        log::warn!("{} has no restaurants with cuisines", config.data_path.display());
    }

    let mut state = AppState::default();
    state.set_table(table, config.data_path);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 860.0])
            .with_min_inner_size([720.0, 480.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Restaurant Rating Dashboard",
        options,
        Box::new(|_cc| Ok(Box::new(DashboardApp::new(state)))),
    )
    .map_err(|e| anyhow::anyhow!("running dashboard: {e}"))
}
