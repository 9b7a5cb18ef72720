//! laf Core - shared facilities for the laf service processes
//!
//! This crate provides:
//! - The canonical error facility (`ExError`, `ExErrorKind`, `ResourceError`)
//! - The structured logging facility and component-scoped `Logger`
//! - `FunctionConsole`, the per-execution output buffer for user functions
//! - `FunctionResult`, the payload relayed back after an execution

pub mod console;
pub mod errors;
pub mod logging_facility;
pub mod result;

// Re-export commonly used types
pub use console::FunctionConsole;
pub use errors::{ExError, ExErrorKind, ResourceError, Result};
pub use logging_facility::{create_logger, Logger};
pub use result::{invoke, FunctionResult};
