use leptos::{mount_to_body, view};
use wasm_bindgen::prelude::*;

use crate::config::DashboardConfig;
use crate::domain::logging::{LogComponent, get_logger};

pub mod app;
pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod time_utils;

/// Install the console logger and browser clock. Safe to call twice.
#[wasm_bindgen]
pub fn initialize() {
    let console_logger: Box<dyn domain::logging::Logger> = if cfg!(debug_assertions) {
        Box::new(infrastructure::services::ConsoleLogger::new_development())
    } else {
        Box::new(infrastructure::services::ConsoleLogger::new_production())
    };
    domain::logging::init_logger(console_logger);
    domain::logging::init_time_provider(Box::new(infrastructure::services::BrowserTimeProvider::new()));
}

/// Load and validate the configuration, then mount the dashboard.
pub fn run() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    initialize();

    let config = DashboardConfig::load().and_then(|config| config.validate().map(|_| config))?;
    domain::logging::set_max_level(config.log_level()?);

    get_logger().info(
        LogComponent::Presentation("Run"),
        &format!("🚀 Dashboard starting: {} clocks, table {}", config.clocks.len(), config.feed.table),
    );

    mount_to_body(move || view! { <app::App config=config/> });
    Ok(())
}
