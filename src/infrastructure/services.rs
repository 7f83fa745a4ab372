//! Browser-backed logging sink and clock for the domain logging seam.

use crate::domain::logging::{LogEntry, LogLevel, Logger, TimeProvider};

/// Writes entries to the devtools console, one console method per level
pub struct ConsoleLogger {
    min_level: LogLevel,
}

impl ConsoleLogger {
    pub fn new(min_level: LogLevel) -> Self {
        Self { min_level }
    }

    pub fn new_production() -> Self {
        Self::new(LogLevel::Info)
    }

    pub fn new_development() -> Self {
        Self::new(LogLevel::Debug)
    }
}

impl Logger for ConsoleLogger {
    fn log(&self, entry: LogEntry) {
        if entry.level < self.min_level {
            return;
        }
        let line = entry.render().into();
        match entry.level {
            LogLevel::Trace | LogLevel::Debug => web_sys::console::debug_1(&line),
            LogLevel::Info => web_sys::console::info_1(&line),
            LogLevel::Warn => web_sys::console::warn_1(&line),
            LogLevel::Error => web_sys::console::error_1(&line),
        }
    }
}

/// Wall-clock milliseconds from `Date.now()`
pub struct BrowserTimeProvider;

impl BrowserTimeProvider {
    pub fn new() -> Self {
        Self
    }
}

impl Default for BrowserTimeProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeProvider for BrowserTimeProvider {
    fn current_timestamp(&self) -> u64 {
        js_sys::Date::now() as u64
    }

    fn format_timestamp(&self, timestamp: u64) -> String {
        let date = js_sys::Date::new(&(timestamp as f64).into());
        format!(
            "{:02}:{:02}:{:02}.{:03}",
            date.get_hours(),
            date.get_minutes(),
            date.get_seconds(),
            date.get_milliseconds()
        )
    }
}
