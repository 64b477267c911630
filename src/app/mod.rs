//! Command-line front end: routes each message argument through the global
//! router with the configured domain, level, masks and writer.

pub mod config;
pub mod logging_system;

pub use config::{Config, ConfigError, DiagnosticLevel, RouterConfig, WriterKind};
pub use logging_system::{LoggingError, setup_logging_safe};

use crate::domain::FieldSetBuilder;
use crate::router::LogRouter;
use std::process;
use tracing::{debug, info};

pub struct App {
    config: Config,
    router: &'static LogRouter,
}

impl App {
    pub fn from_args<I, T>(args: I) -> Result<Self, Box<dyn std::error::Error + Send + Sync>>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        let config = Config::from_args(args)?;
        Self::from_config(config)
    }

    pub fn from_config(config: Config) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        setup_logging_safe(config.log_level)?;

        let router = LogRouter::global();
        if let Some(config_file) = &config.config_file {
            debug!(path = %config_file.display(), "Loading router configuration");
            RouterConfig::from_file(config_file)?.apply(router);
        }
        config.apply(router);

        info!(
            "Starting rask-log-router v{} (domain={:?}, level={}, writer={:?})",
            get_version(),
            config.domain(),
            config.level,
            config.writer
        );

        Ok(Self { config, router })
    }

    /// Emits every message. Does not return for fatal levels.
    pub fn run(self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let domain = self.config.domain();
        let level = self.config.level;

        for message in self.config.message_bytes() {
            if self.config.fields.is_empty() {
                self.router.log(domain, level, &message);
            } else {
                let event = self
                    .config
                    .fields
                    .iter()
                    .fold(FieldSetBuilder::new(domain, level), |event, (key, value)| {
                        event.field(key.as_str(), value.as_str())
                    })
                    .message_bytes(message);
                self.router.log_structured(event);
            }
        }

        Ok(())
    }

    pub fn config(&self) -> &Config {
        &self.config
    }
}

pub fn get_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

// Main entry point for the application
pub fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    match App::from_args(std::env::args_os()) {
        Ok(app) => app.run(),
        Err(e) => {
            eprintln!("Configuration error: {e}");
            process::exit(1);
        }
    }
}
