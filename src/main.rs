use eframe::egui;

use telemarketing_analysis::app::TelemarketingApp;
use telemarketing_analysis::config::AppConfig;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = AppConfig::load()?;

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Telemarketing Analysis")
            .with_inner_size(config.window_size)
            .with_min_inner_size([800.0, 500.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Telemarketing Analysis",
        options,
        Box::new(|cc| Ok(Box::new(TelemarketingApp::new(cc, config)))),
    )
    .map_err(|e| anyhow::anyhow!("running the dashboard: {e}"))
}
