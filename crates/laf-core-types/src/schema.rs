//! Canonical schema constants for structured logging and events
//!
//! These constants keep field names stable across every crate that logs.

// Canonical field keys for structured logging
pub const FIELD_COMPONENT: &str = "component";
pub const FIELD_OP: &str = "op";
pub const FIELD_EVENT: &str = "event";
pub const FIELD_DURATION_MS: &str = "duration_ms";
pub const FIELD_EXECUTION_ID: &str = "execution_id";

// Storage identifiers
pub const FIELD_DATABASE: &str = "database";
pub const FIELD_SLOT: &str = "slot";
pub const FIELD_POOL_SIZE: &str = "pool_size";

// Component names shared by op events and component loggers
pub const COMPONENT_SERVER: &str = "server";
pub const COMPONENT_DB: &str = "db";
pub const COMPONENT_FUNCTION: &str = "function";

// Error fields
pub const FIELD_ERR_KIND: &str = "err_kind";
pub const FIELD_ERR_CODE: &str = "err_code";

// Canonical event names
pub const EVENT_START: &str = "start";
pub const EVENT_END: &str = "end";
pub const EVENT_END_ERROR: &str = "end_error";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constants_accessibility() {
        assert!(!FIELD_COMPONENT.is_empty());
        assert!(!FIELD_OP.is_empty());
        assert!(!FIELD_DATABASE.is_empty());
        assert!(!EVENT_START.is_empty());
        assert!(!EVENT_END.is_empty());
        assert!(!EVENT_END_ERROR.is_empty());
    }

    #[test]
    fn test_component_names_are_distinct() {
        assert_ne!(COMPONENT_SERVER, COMPONENT_DB);
        assert_ne!(COMPONENT_SERVER, COMPONENT_FUNCTION);
        assert_ne!(COMPONENT_DB, COMPONENT_FUNCTION);
    }

    #[test]
    fn test_event_names_are_distinct() {
        assert_ne!(EVENT_START, EVENT_END);
        assert_ne!(EVENT_START, EVENT_END_ERROR);
        assert_ne!(EVENT_END, EVENT_END_ERROR);
    }
}
