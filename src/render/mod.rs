//! Console rendering of log records.

pub mod escape;
pub mod format;

pub use escape::escape_message;
pub use format::LineFormat;
