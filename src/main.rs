mod app;
mod color;
mod config;
mod data;
mod state;
mod ui;

use app::CsvLensApp;
use config::ViewerConfig;
use eframe::egui;

fn main() -> eframe::Result {
    env_logger::init();

    let config = ViewerConfig::from_env();
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([config.window_width, config.window_height])
            .with_min_inner_size([800.0, 500.0]),
        ..Default::default()
    };

    eframe::run_native(
        "CSV Data Visualizer",
        options,
        Box::new(|_cc| Ok(Box::new(CsvLensApp::new(config)))),
    )
}
