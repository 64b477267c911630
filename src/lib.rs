#![deny(warnings, rust_2024_compatibility)]
// Specific pedantic lints enforced (not blanket allow):
#![deny(
    clippy::explicit_iter_loop,
    clippy::manual_let_else,
    clippy::semicolon_if_nothing_returned,
    clippy::inconsistent_struct_constructor
)]
// Noisy pedantic lints suppressed with justification:
#![allow(
    clippy::module_name_repetitions, // e.g. RouterError in router module
    clippy::must_use_candidate,      // Annotated selectively on critical APIs
    clippy::missing_errors_doc,      // Errors are documented on RouterError
    clippy::doc_markdown
)]

//! Domain- and severity-routed logging.
//!
//! Log calls are tagged with a domain and a [`LogLevel`]. The [`LogRouter`]
//! hands each call to the per-domain handlers registered for it (or the
//! default handler), pushes structured events through a single writer, gates
//! Info/Debug output on the `RASK_MESSAGES_DEBUG` allowlist and terminates the
//! process for fatal levels.
//!
//! The free functions and macros of this crate operate on
//! [`LogRouter::global`]; build a separate router with [`LogRouter::builder`]
//! to embed one with its own console and termination behaviour.

pub mod app;
pub mod domain;
pub mod macros;
pub mod render;
pub mod router;

pub use domain::{
    DOMAIN_KEY, Field, FieldSet, FieldSetBuilder, FieldValue, HandlerId, LevelMask, LogLevel,
    MESSAGE_KEY, PRIORITY_KEY, RouterError, compare_fields,
};
pub use router::{
    CaptureConsole, Console, DestroyNotify, FatalEvent, FatalPanic, HandlerPolicy, JsonWriter,
    LogHandler, LogRecord, LogRouter, LogWriter, PanicTerminator, PrintFunc, ProcessAbort,
    StdConsole, Terminator, TracingWriter, WriterOutput,
};

use std::sync::Arc;

/// The default domain. Always admitted by the debug-domain allowlist.
pub const DEFAULT_DOMAIN: &str = "";

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub fn log(domain: &str, level: LogLevel, message: impl AsRef<[u8]>) {
    LogRouter::global().log(domain, level, message);
}

pub fn log_structured(event: FieldSetBuilder<'_>) {
    LogRouter::global().log_structured(event);
}

pub fn log_structured_array(level: LogLevel, fields: &FieldSet<'_>) {
    LogRouter::global().log_structured_array(level, fields);
}

pub fn add_handler(
    domain: &str,
    mask: impl Into<LevelMask>,
    handler: impl LogHandler + 'static,
) -> Result<HandlerId, RouterError> {
    LogRouter::global().add_handler(domain, mask, handler)
}

pub fn remove_handler(domain: &str, id: HandlerId) -> Result<(), RouterError> {
    LogRouter::global().remove_handler(domain, id)
}

pub fn set_default_handler(handler: Option<Arc<dyn LogHandler>>) -> Option<Arc<dyn LogHandler>> {
    LogRouter::global().set_default_handler(handler)
}

pub fn set_handler_policy(policy: HandlerPolicy) {
    LogRouter::global().set_handler_policy(policy);
}

pub fn set_writer(writer: Option<Arc<dyn LogWriter>>, on_replace: Option<DestroyNotify>) {
    LogRouter::global().set_writer(writer, on_replace);
}

pub fn set_fatal_mask(domain: &str, mask: impl Into<LevelMask>) -> LevelMask {
    LogRouter::global().set_fatal_mask(domain, mask)
}

pub fn set_always_fatal(mask: impl Into<LevelMask>) -> LevelMask {
    LogRouter::global().set_always_fatal(mask)
}

pub fn set_print_handler(sink: Option<PrintFunc>) -> Option<PrintFunc> {
    LogRouter::global().set_print_handler(sink)
}

pub fn set_printerr_handler(sink: Option<PrintFunc>) -> Option<PrintFunc> {
    LogRouter::global().set_printerr_handler(sink)
}

pub fn print(text: &str) {
    LogRouter::global().print(text);
}

pub fn printerr(text: &str) {
    LogRouter::global().printerr(text);
}

/// Restores the global router's startup state.
pub fn reset() {
    LogRouter::global().reset();
}

/// Used by [`return_if_fail!`] and [`return_val_if_fail!`].
pub fn return_if_fail_warning(location: &str, expression: &str) {
    log(
        DEFAULT_DOMAIN,
        LogLevel::Critical,
        format!("{location}: assertion '{expression}' failed"),
    );
}

/// Used by [`warn_if_fail!`] and [`warn_if_reached!`].
pub fn warn_message(file: &str, line: u32, location: &str, expression: Option<&str>) {
    let message = match expression {
        Some(expression) => format!("{file}:{line}:{location}: runtime check failed: ({expression})"),
        None => format!("{file}:{line}:{location}: code should not be reached"),
    };
    log(DEFAULT_DOMAIN, LogLevel::Warning, message);
}
