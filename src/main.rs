//! DocAdjust - desktop DOCX/RTF document adjuster
//!
//! Load a Word or RTF document, review its properties, and apply page,
//! margin, font, and line-spacing changes to a saved copy.

mod app;
mod core;
mod ui;

use app::AdjusterApp;
use eframe::egui;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> eframe::Result<()> {
    // Initialize logging; APP_DEBUG turns on verbose output
    let debug = std::env::var("APP_DEBUG")
        .map(|v| matches!(v.to_lowercase().as_str(), "1" | "true" | "yes"))
        .unwrap_or(false);
    let level = if debug {
        tracing_subscriber::filter::LevelFilter::DEBUG
    } else {
        tracing_subscriber::filter::LevelFilter::INFO
    };
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(level)
        .init();

    tracing::info!("Starting DocAdjust...");

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1000.0, 700.0])
            .with_min_inner_size([800.0, 600.0])
            .with_title("DocAdjust"),
        ..Default::default()
    };

    eframe::run_native(
        "DocAdjust",
        native_options,
        Box::new(|cc| Ok(Box::new(AdjusterApp::new(cc)))),
    )
}
