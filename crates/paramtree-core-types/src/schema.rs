//! Canonical schema constants for structured logging and events
//!
//! These constants ensure consistency across all logging and error reporting.

// Canonical field keys for structured logging
pub const FIELD_COMPONENT: &str = "component";
pub const FIELD_OP: &str = "op";
pub const FIELD_EVENT: &str = "event";
pub const FIELD_DURATION_MS: &str = "duration_ms";

// Parameter addressing
pub const FIELD_PARAM_PATH: &str = "param_path";
pub const FIELD_PARAM_KIND: &str = "param_kind";

// Checkpoint layout
pub const FIELD_CHECKPOINT_DIR: &str = "checkpoint_dir";
pub const FIELD_CHECKPOINT_FILE: &str = "checkpoint_file";
pub const FIELD_LINE: &str = "line";

// Collection sizes
pub const FIELD_APPLIED: &str = "applied";
pub const FIELD_PROBLEMS: &str = "problems";

// Error fields
pub const FIELD_ERR_KIND: &str = "err.kind";
pub const FIELD_ERR_CODE: &str = "err.code";

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
        assert!(!FIELD_PARAM_PATH.is_empty());
        assert!(!EVENT_START.is_empty());
        assert!(!EVENT_END.is_empty());
        assert!(!EVENT_END_ERROR.is_empty());
    }

    #[test]
    fn test_event_names_are_distinct() {
        assert_ne!(EVENT_START, EVENT_END);
        assert_ne!(EVENT_START, EVENT_END_ERROR);
        assert_ne!(EVENT_END, EVENT_END_ERROR);
    }

    #[test]
    fn test_checkpoint_fields_are_distinct() {
        assert_ne!(FIELD_CHECKPOINT_DIR, FIELD_CHECKPOINT_FILE);
        assert_ne!(FIELD_PARAM_PATH, FIELD_PARAM_KIND);
    }
}
