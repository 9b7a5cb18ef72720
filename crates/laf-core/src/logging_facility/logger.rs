//! Component-scoped loggers
//!
//! A `Logger` tags every event with its component name and drops events
//! below its minimum level before they reach the subscriber. The registry
//! hands one to each connection pool (`"db"`, warnings and up) and keeps a
//! process-wide one (`"server"`) for everything else.

use std::sync::Arc;
use tracing::Level;

/// Default minimum level for loggers created without an explicit one
pub const DEFAULT_LEVEL: Level = Level::INFO;

/// Shared handle to the logging sink for one component
#[derive(Debug, Clone)]
pub struct Logger {
    component: Arc<str>,
    min_level: Level,
}

/// Create a logger for `component`, optionally overriding the minimum level
///
/// # Example
///
/// ```
/// use laf_core::logging_facility::create_logger;
/// use tracing::Level;
///
/// let logger = create_logger("db", Some(Level::WARN));
/// assert!(!logger.enabled(Level::INFO));
/// assert!(logger.enabled(Level::ERROR));
/// ```
pub fn create_logger(component: &str, level: Option<Level>) -> Logger {
    Logger {
        component: Arc::from(component),
        min_level: level.unwrap_or(DEFAULT_LEVEL),
    }
}

impl Logger {
    /// Component name attached to every event
    pub fn component(&self) -> &str {
        &self.component
    }

    /// Least severe level this logger lets through
    pub fn min_level(&self) -> Level {
        self.min_level
    }

    /// Whether an event at `level` passes this logger's threshold
    ///
    /// `tracing` orders levels from most to least verbose, so ERROR is the
    /// smallest value.
    pub fn enabled(&self, level: Level) -> bool {
        level <= self.min_level
    }

    pub fn debug(&self, message: &str) {
        if self.enabled(Level::DEBUG) {
            tracing::debug!(component = %self.component, "{}", message);
        }
    }

    pub fn info(&self, message: &str) {
        if self.enabled(Level::INFO) {
            tracing::info!(component = %self.component, "{}", message);
        }
    }

    pub fn warn(&self, message: &str) {
        if self.enabled(Level::WARN) {
            tracing::warn!(component = %self.component, "{}", message);
        }
    }

    pub fn error(&self, message: &str) {
        if self.enabled(Level::ERROR) {
            tracing::error!(component = %self.component, "{}", message);
        }
    }
}
