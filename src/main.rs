// Hide console window on Windows in release builds
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

//! Codepad - Main Entry Point
//!
//! A VS Code-style scratch editor: a file explorer, tabs, syntax highlighting
//! and drag-and-drop import, with everything kept in local storage.

mod app;
mod config;
mod debounce;
mod editor;
mod error;
mod explorer;
mod files;
mod import_gate;
mod panel;
mod state;
mod storage;
mod tabs;
mod theme;
mod ui;

use app::{CodepadApp, APP_TITLE};
use config::load_config;
use log::info;

fn main() -> eframe::Result<()> {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    info!("Starting {}", APP_TITLE);

    // Load settings to get window configuration
    let settings = load_config();
    let window_size = &settings.window_size;

    info!(
        "Window configuration: {}x{}, maximized: {}",
        window_size.width, window_size.height, window_size.maximized
    );

    let mut viewport = eframe::egui::ViewportBuilder::default()
        .with_title(APP_TITLE)
        .with_inner_size([window_size.width, window_size.height])
        .with_min_inner_size([640.0, 400.0])
        .with_drag_and_drop(true)
        .with_maximized(window_size.maximized);

    if let (Some(x), Some(y)) = (window_size.x, window_size.y) {
        viewport = viewport.with_position([x, y]);
    }

    let native_options = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };

    eframe::run_native(
        APP_TITLE,
        native_options,
        Box::new(|cc| Ok(Box::new(CodepadApp::new(cc)))),
    )
}
