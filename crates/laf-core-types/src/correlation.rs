//! Correlation types for execution tracking
//!
//! An `ExecutionId` ties the captured console output of one function run to
//! the result payload handed back to the caller.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a single execution unit
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ExecutionId(String);

impl ExecutionId {
    /// Generate a new ExecutionId using UUIDv7 (time ordered)
    pub fn new() -> Self {
        Self(Uuid::now_v7().to_string())
    }

    /// Get the string representation
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Create from an existing string (for ids handed in by a caller)
    pub fn from_string(s: String) -> Self {
        Self(s)
    }
}

impl Default for ExecutionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ExecutionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_execution_id_generation() {
        let id1 = ExecutionId::new();
        let id2 = ExecutionId::new();

        assert_ne!(id1, id2);
        assert!(!id1.as_str().is_empty());
    }

    #[test]
    fn test_execution_id_display() {
        let id = ExecutionId::from_string("exec-1".to_string());
        assert_eq!(format!("{}", id), "exec-1");
    }

    #[test]
    fn test_serialization() {
        let id = ExecutionId::new();
        let json = serde_json::to_string(&id).unwrap();
        let deserialized: ExecutionId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, deserialized);
    }
}
