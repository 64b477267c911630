//! Structured writers: the sink that receives every structured event.

use crate::domain::{DOMAIN_KEY, FieldSet, FieldValue, LogLevel, MESSAGE_KEY, PRIORITY_KEY};
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::Serialize;
use serde_json::{Map, Value};
use std::io::Write;
use std::sync::Arc;

/// Disposition returned by a writer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriterOutput {
    Handled,
    /// The router falls back to its built-in console writer.
    Unhandled,
}

pub trait LogWriter: Send + Sync {
    fn write(&self, level: LogLevel, fields: &FieldSet<'_>) -> WriterOutput;
}

impl<F> LogWriter for F
where
    F: Fn(LogLevel, &FieldSet<'_>) -> WriterOutput + Send + Sync,
{
    fn write(&self, level: LogLevel, fields: &FieldSet<'_>) -> WriterOutput {
        self(level, fields)
    }
}

/// Notifier run when a writer registration is replaced.
pub type DestroyNotify = Box<dyn FnOnce() + Send + Sync>;

pub(crate) struct WriterRegistration {
    pub(crate) writer: Arc<dyn LogWriter>,
    pub(crate) on_replace: Option<DestroyNotify>,
}

#[derive(Serialize)]
struct JsonEvent<'a> {
    timestamp: DateTime<Utc>,
    level: &'a str,
    #[serde(flatten)]
    fields: Map<String, Value>,
}

/// Writes one JSON object per event, one per line.
///
/// Text values and UTF-8 binary values become strings, other binary values
/// arrays of byte values. Repeated keys collect into an array.
pub struct JsonWriter<W: Write + Send> {
    out: Mutex<W>,
}

impl<W: Write + Send> JsonWriter<W> {
    pub fn new(out: W) -> Self {
        Self { out: Mutex::new(out) }
    }

    pub fn into_inner(self) -> W {
        self.out.into_inner()
    }

    pub fn render(level: LogLevel, fields: &FieldSet<'_>) -> Result<String, serde_json::Error> {
        let mut map = Map::new();
        for field in fields {
            let value = json_value(field.value());
            match map.get_mut(field.key()) {
                Some(Value::Array(existing)) => existing.push(value),
                Some(existing) => {
                    let first = existing.take();
                    *existing = Value::Array(vec![first, value]);
                }
                None => {
                    map.insert(field.key().to_string(), value);
                }
            }
        }

        let level = level.as_str();
        let event = JsonEvent {
            timestamp: Utc::now(),
            level: &level,
            fields: map,
        };
        serde_json::to_string(&event)
    }
}

impl<W: Write + Send> LogWriter for JsonWriter<W> {
    fn write(&self, level: LogLevel, fields: &FieldSet<'_>) -> WriterOutput {
        let line = match Self::render(level, fields) {
            Ok(line) => line,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to serialize log event");
                return WriterOutput::Unhandled;
            }
        };

        let mut out = self.out.lock();
        match writeln!(out, "{line}").and_then(|()| out.flush()) {
            Ok(()) => WriterOutput::Handled,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to write log event");
                WriterOutput::Unhandled
            }
        }
    }
}

fn json_value(value: &FieldValue<'_>) -> Value {
    match value.as_str() {
        Some(text) => Value::String(text.to_string()),
        None => Value::Array(
            value
                .significant_bytes()
                .iter()
                .map(|b| Value::from(*b))
                .collect(),
        ),
    }
}

/// Forwards events into `tracing`, mapping severities onto tracing levels.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingWriter;

impl LogWriter for TracingWriter {
    fn write(&self, level: LogLevel, fields: &FieldSet<'_>) -> WriterOutput {
        let domain = fields.domain();
        let message = fields
            .message()
            .map(FieldValue::to_string_lossy)
            .unwrap_or_default();
        let extra = fields
            .iter()
            .filter(|f| f.key() != DOMAIN_KEY && f.key() != PRIORITY_KEY && f.key() != MESSAGE_KEY)
            .map(|f| format!("{}={}", f.key(), f.value().to_string_lossy()))
            .collect::<Vec<_>>()
            .join(" ");

        match level {
            LogLevel::Error | LogLevel::Critical => {
                tracing::error!(domain, severity = %level, fields = %extra, "{}", message);
            }
            LogLevel::Warning => tracing::warn!(domain, fields = %extra, "{}", message),
            LogLevel::Message | LogLevel::Info => {
                tracing::info!(domain, severity = %level, fields = %extra, "{}", message);
            }
            LogLevel::Debug => tracing::debug!(domain, fields = %extra, "{}", message),
            LogLevel::Custom(_) => {
                tracing::trace!(domain, severity = %level, fields = %extra, "{}", message);
            }
        }
        WriterOutput::Handled
    }
}
