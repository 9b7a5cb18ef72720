//! Error handling for laf-store
//!
//! Wraps laf-core ExError with store-specific helpers

use laf_core::errors::{ExError, ExErrorKind, ResourceError};
use std::time::Duration;

/// Result type alias using ExError
pub type Result<T> = std::result::Result<T, ExError>;

/// Create a database error from rusqlite::Error
pub fn from_rusqlite(err: rusqlite::Error) -> ExError {
    ExError::new(ExErrorKind::Persistence)
        .with_op("sqlite")
        .with_message(err.to_string())
}

/// Create a connection error for a pool that could not be opened
pub fn connection_failed(database: &str, err: rusqlite::Error) -> ExError {
    ResourceError::Connection {
        database: database.to_string(),
        message: err.to_string(),
    }
    .into()
}

/// Create an error for a checkout against a pool that never ran `init`
pub fn pool_not_initialized(database: &str) -> ExError {
    ExError::new(ExErrorKind::Precondition)
        .with_op("checkout")
        .with_entity_id(database)
        .with_message("accessor is not initialized, run init() first")
}

/// Create a checkout timeout error
pub fn checkout_timeout(database: &str, waited: Duration) -> ExError {
    ExError::new(ExErrorKind::Timeout)
        .with_op("checkout")
        .with_entity_id(database)
        .with_message(format!(
            "no idle connection after {} ms",
            waited.as_millis()
        ))
}

/// Create an error for a pool whose lock was poisoned by a panicking holder
pub fn pool_poisoned(database: &str) -> ExError {
    ExError::new(ExErrorKind::Internal)
        .with_op("checkout")
        .with_entity_id(database)
        .with_message("connection pool lock poisoned")
}

/// Create an error for a pool configured with no connections
pub fn empty_pool(database: &str) -> ExError {
    ExError::from(ResourceError::InvalidConfig {
        reason: format!("pool_size for {} must be at least 1", database),
    })
    .with_op("accessor_init")
    .with_entity_id(database)
}

/// Create a settings error from config::ConfigError
pub fn from_config(err: config::ConfigError) -> ExError {
    ResourceError::InvalidConfig {
        reason: err.to_string(),
    }
    .into()
}
