mod app;

use eframe::egui;
use tracing::info;

use fractus_app::app_dir::preferences_path;
use fractus_app::ExplorerPreferences;

use app::ExplorerApp;

fn main() -> eframe::Result {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Starting Fractus");

    let prefs = ExplorerPreferences::load();
    if !preferences_path().exists() {
        // Leave an editable copy of the defaults behind.
        prefs.save();
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Fractus")
            .with_inner_size([prefs.window_width, prefs.window_height]),
        ..Default::default()
    };

    let explorer_options = prefs.to_options();
    eframe::run_native(
        "Fractus",
        options,
        Box::new(move |_cc| Ok(Box::new(ExplorerApp::new(explorer_options)))),
    )
}
