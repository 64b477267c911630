use super::config::DiagnosticLevel;
use std::sync::Once;
use std::sync::atomic::{AtomicBool, Ordering};
use thiserror::Error;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Error, Debug)]
pub enum LoggingError {
    #[error("Failed to create EnvFilter with '{filter}': {source}")]
    InvalidFilter {
        filter: String,
        #[source]
        source: tracing_subscriber::filter::ParseError,
    },
    #[error("Failed to set global tracing subscriber: {0}")]
    SetGlobal(#[from] tracing::subscriber::SetGlobalDefaultError),
    #[error("Logging system initialization failed")]
    InitFailed,
}

/// Filter directives for the router's own diagnostics: the requested level
/// for this crate, warnings and above for everything else.
pub fn build_filter_string(level: DiagnosticLevel) -> String {
    format!("warn,{}={}", env!("CARGO_CRATE_NAME"), level.as_str())
}

/// Installs a stderr `fmt` subscriber. Fails if one is already installed.
pub fn initialize_tracing(level: DiagnosticLevel) -> Result<(), LoggingError> {
    let filter = build_filter_string(level);
    let env_filter = EnvFilter::try_new(&filter).map_err(|source| LoggingError::InvalidFilter {
        filter: filter.clone(),
        source,
    })?;

    let subscriber = tracing_subscriber::registry().with(env_filter).with(
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_level(true)
            .with_ansi(false)
            .compact(),
    );

    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

/// Initializes diagnostics once per process; later calls report the result
/// of the first one.
pub fn setup_logging_safe(level: DiagnosticLevel) -> Result<(), LoggingError> {
    static INIT: Once = Once::new();
    static INIT_SUCCESS: AtomicBool = AtomicBool::new(false);

    INIT.call_once(|| match initialize_tracing(level) {
        Ok(()) => INIT_SUCCESS.store(true, Ordering::Release),
        Err(e) => eprintln!("Warning: {e}"),
    });

    if INIT_SUCCESS.load(Ordering::Acquire) {
        Ok(())
    } else {
        Err(LoggingError::InitFailed)
    }
}
