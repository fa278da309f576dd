//! Retail Insights - Online Sales Insights Dashboard
//!
//! A Rust application for exploring top-selling products by country and period.

mod gui;

use eframe::egui;
use gui::RetailInsightsApp;
use retail_insights::config::{AppConfig, APP_TITLE};
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let config = AppConfig::default();
    tracing::debug!(?config, "starting dashboard");

    // Configure native options
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size(config.window_size)
            .with_min_inner_size(config.min_window_size)
            .with_title(APP_TITLE),
        ..Default::default()
    };

    // Run the application
    eframe::run_native(
        APP_TITLE,
        options,
        Box::new(|cc| Ok(Box::new(RetailInsightsApp::new(cc, config)))),
    )
    .map_err(|e| anyhow::anyhow!("dashboard exited with error: {e}"))
}
