//! Domain layer for rask-log-router.
//!
//! Contains the canonical types shared across all modules:
//! - `LogLevel` / `LevelMask`: severities and severity sets
//! - `FieldSet`: the structured key/value payload of one event
//! - `RouterError`: programmer-usage errors

pub mod error;
pub mod field;
pub mod handler_id;
pub mod log_level;

pub use error::RouterError;
pub use field::{
    DOMAIN_KEY, Field, FieldSet, FieldSetBuilder, FieldValue, MESSAGE_KEY, PRIORITY_KEY,
    compare_fields,
};
pub use handler_id::HandlerId;
pub use log_level::{LevelMask, LevelParseError, LogLevel};
