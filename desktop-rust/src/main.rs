mod app;
mod io;
mod model;

use app::DesktopApp;
use bbox_viewer_common::Config;
use eframe::egui;
use tracing_subscriber::EnvFilter;

fn main() -> eframe::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::load().unwrap_or_else(|err| {
        tracing::warn!("config not loaded, using defaults: {err}");
        Config::default()
    });

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([1100.0, 760.0]),
        ..Default::default()
    };
    eframe::run_native(
        "bbox-viewer",
        options,
        Box::new(move |_cc| Box::new(DesktopApp::new(config))),
    )
}
