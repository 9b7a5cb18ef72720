//! laf Store - process-wide storage resources
//!
//! Provides:
//! - Store settings loaded from the environment (`settings`)
//! - SQLite connection pools (`accessor`) and the query handle layered on
//!   them (`db`)
//! - `ResourceRegistry`, which builds the system and application stores in
//!   order at startup and freezes once they are live

pub mod accessor;
pub mod db;
pub mod errors;
pub mod registry;
pub mod settings;

// Re-export key types
pub use accessor::{Accessor, AccessorOptions, PooledConnection};
pub use db::Db;
pub use errors::Result;
pub use registry::{RegistryState, Resource, ResourceRegistry};
pub use settings::{DbConfig, Settings};
