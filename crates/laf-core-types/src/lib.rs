//! Core types shared across laf facilities
//!
//! This crate provides foundational types used by the error, logging and
//! storage layers:
//!
//! - **Correlation types**: ExecutionId for one run of user code
//! - **Sensitive data**: Sensitive<T> marker for connection strings and secrets
//! - **Schema constants**: Canonical field keys and event names

pub mod correlation;
pub mod schema;
pub mod sensitive;

pub use correlation::ExecutionId;
pub use sensitive::Sensitive;
