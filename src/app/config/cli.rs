use super::{ConfigError, DiagnosticLevel, WriterKind};
use crate::DEFAULT_DOMAIN;
use crate::domain::{LevelMask, LogLevel};
use crate::router::{HandlerPolicy, JsonWriter, LogRouter, TracingWriter};
use clap::Parser;
use std::borrow::Cow;
use std::ffi::OsString;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser, Debug, Clone)]
#[command(name = "rask-log-router", author, version, about, long_about = None)]
pub struct Config {
    /// Log domain (empty for the default domain)
    #[arg(long, short = 'd', env = "RASK_LOG_DOMAIN")]
    pub domain: Option<String>,

    /// Severity: error, critical, warning, message, info, debug or a raw level such as 0x400
    #[arg(long, short = 'l', default_value = "message")]
    pub level: LogLevel,

    /// Fatal mask for the domain, comma separated (Error is always fatal)
    #[arg(long, value_delimiter = ',')]
    pub fatal_mask: Vec<LogLevel>,

    /// Levels fatal in every domain, comma separated
    #[arg(long, value_delimiter = ',')]
    pub always_fatal: Vec<LogLevel>,

    /// Extra structured field; switches to a structured call
    #[arg(long = "field", value_name = "KEY=VALUE", value_parser = parse_field)]
    pub fields: Vec<(String, String)>,

    /// Structured writer
    #[arg(long, env = "RASK_LOG_WRITER", default_value = "text")]
    pub writer: WriterKind,

    /// Which matching domain handlers run for a call
    #[arg(long)]
    pub policy: Option<HandlerPolicy>,

    /// Program name used in alert-level line prefixes
    #[arg(long)]
    pub program_name: Option<String>,

    /// Router configuration file (TOML)
    #[arg(long = "config", env = "RASK_ROUTER_CONFIG")]
    pub config_file: Option<PathBuf>,

    /// Verbosity of the router's own diagnostics
    #[arg(long, env = "LOG_LEVEL", default_value = "warn", ignore_case = true)]
    pub log_level: DiagnosticLevel,

    /// Messages to log, one call each
    pub messages: Vec<OsString>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            domain: None,
            level: LogLevel::Message,
            fatal_mask: Vec::new(),
            always_fatal: Vec::new(),
            fields: Vec::new(),
            writer: WriterKind::Text,
            policy: None,
            program_name: None,
            config_file: None,
            log_level: DiagnosticLevel::Warn,
            messages: Vec::new(),
        }
    }
}

impl Config {
    pub fn from_args<I, T>(args: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let config = Config::parse_from(args);
        config.validate()?;
        Ok(config)
    }

    pub fn domain(&self) -> &str {
        self.domain.as_deref().unwrap_or(DEFAULT_DOMAIN)
    }

    /// Message arguments as raw bytes. Invalid UTF-8 is passed through on
    /// Unix so that escaping can be observed end to end.
    pub fn message_bytes(&self) -> impl Iterator<Item = Cow<'_, [u8]>> {
        self.messages.iter().map(os_bytes)
    }

    /// Applies the command-line settings on top of whatever the router
    /// already holds.
    pub fn apply(&self, router: &LogRouter) {
        if !self.fatal_mask.is_empty() {
            let mask: LevelMask = self.fatal_mask.iter().copied().collect();
            router.set_fatal_mask(self.domain(), mask);
        }
        if !self.always_fatal.is_empty() {
            let mask: LevelMask = self.always_fatal.iter().copied().collect();
            router.set_always_fatal(mask);
        }
        if let Some(policy) = self.policy {
            router.set_handler_policy(policy);
        }
        if let Some(program_name) = &self.program_name {
            router.set_program_name(program_name);
        }
        match self.writer {
            WriterKind::Text => {}
            WriterKind::Json => router.set_writer(Some(Arc::new(JsonWriter::new(std::io::stdout()))), None),
            WriterKind::Tracing => router.set_writer(Some(Arc::new(TracingWriter)), None),
        }
    }
}

fn parse_field(raw: &str) -> Result<(String, String), ConfigError> {
    match raw.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(ConfigError::InvalidField(raw.to_string())),
    }
}

#[cfg(unix)]
fn os_bytes(value: &OsString) -> Cow<'_, [u8]> {
    use std::os::unix::ffi::OsStrExt;
    Cow::Borrowed(value.as_bytes())
}

#[cfg(not(unix))]
fn os_bytes(value: &OsString) -> Cow<'_, [u8]> {
    Cow::Owned(value.to_string_lossy().into_owned().into_bytes())
}
