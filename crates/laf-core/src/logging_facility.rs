//! Structured logging facility for laf
//!
//! This module provides a canonical logging facility with:
//! - Single initialization point via `init(profile)`
//! - Structured logging macros (`log_op_start!`, `log_op_end!`, `log_op_error!`)
//! - Component-scoped loggers with a minimum level (`create_logger`)
//! - Test capture mode for deterministic assertions
//!
//! # Usage
//!
//! ```rust
//! use laf_core::logging_facility::{create_logger, init, Profile};
//! use tracing::Level;
//!
//! // Initialize once at process startup
//! init(Profile::Development);
//!
//! let db_logger = create_logger("db", Some(Level::WARN));
//! db_logger.warn("pool nearly exhausted");
//! ```

pub mod init;
pub mod logger;
pub mod macros;
pub mod test_capture;

pub use init::{init, Profile};
pub use laf_core_types::schema;
pub use logger::{create_logger, Logger};
pub use test_capture::{capture_events, init_test_capture, CapturedEvent, TestCapture};

#[doc(hidden)]
pub use tracing as __tracing;
