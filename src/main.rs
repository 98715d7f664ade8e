//! Startdeck - a widget dashboard start page
//!
//! Pages of bookmarks, notes, calendars, todo lists, clocks and calculators,
//! laid out in three columns and saved locally on every change.

mod app;
mod core;
mod ui;
mod widgets;

use app::StartdeckApp;
use eframe::egui;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::core::config::AppConfig;

fn main() -> eframe::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::filter::LevelFilter::INFO)
        .init();

    tracing::info!("Starting Startdeck...");

    let config = AppConfig::load().unwrap_or_else(|e| {
        tracing::warn!("Using default config: {:#}", e);
        AppConfig::default()
    });

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([config.ui.window_width, config.ui.window_height])
            .with_min_inner_size([720.0, 480.0])
            .with_title("Startdeck"),
        ..Default::default()
    };

    eframe::run_native(
        "Startdeck",
        native_options,
        Box::new(move |cc| Ok(Box::new(StartdeckApp::new(cc, config)))),
    )
}
