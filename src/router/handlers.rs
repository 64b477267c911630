//! Registry of per-domain handlers plus the default handler.

use crate::domain::{HandlerId, LevelMask, LogLevel, RouterError};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::num::NonZeroU64;
use std::sync::Arc;

/// One legacy log call as seen by handlers.
#[derive(Debug, Clone, Copy)]
pub struct LogRecord<'a> {
    domain: &'a str,
    level: LogLevel,
    message: &'a [u8],
    fatal: bool,
}

impl<'a> LogRecord<'a> {
    pub fn new(domain: &'a str, level: LogLevel, message: &'a [u8]) -> Self {
        Self {
            domain,
            level,
            message,
            fatal: false,
        }
    }

    pub(crate) fn with_fatal(mut self, fatal: bool) -> Self {
        self.fatal = fatal;
        self
    }

    pub fn domain(&self) -> &'a str {
        self.domain
    }

    pub fn level(&self) -> LogLevel {
        self.level
    }

    /// Message text; invalid UTF-8 is replaced.
    pub fn message(&self) -> Cow<'a, str> {
        String::from_utf8_lossy(self.message)
    }

    pub fn message_bytes(&self) -> &'a [u8] {
        self.message
    }

    /// The process terminates once dispatch of this record completes.
    pub fn is_fatal(&self) -> bool {
        self.fatal
    }
}

/// Receives legacy log calls for the domains and levels it was registered for.
pub trait LogHandler: Send + Sync {
    fn handle(&self, record: &LogRecord<'_>);
}

impl<F> LogHandler for F
where
    F: Fn(&LogRecord<'_>) + Send + Sync,
{
    fn handle(&self, record: &LogRecord<'_>) {
        self(record);
    }
}

/// Which matching per-domain handlers run for one call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HandlerPolicy {
    /// Every matching handler, in registration order.
    #[default]
    FanOut,
    /// Only the earliest registered matching handler.
    FirstMatch,
}

struct Registration {
    id: HandlerId,
    domain: String,
    mask: LevelMask,
    handler: Arc<dyn LogHandler>,
}

/// Per-domain handler table. `None` as default handler means the router's
/// built-in handler.
pub struct HandlerRegistry {
    entries: Vec<Registration>,
    next_id: u64,
    default_handler: Option<Arc<dyn LogHandler>>,
    policy: HandlerPolicy,
}

impl Default for HandlerRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            next_id: 1,
            default_handler: None,
            policy: HandlerPolicy::default(),
        }
    }

    pub fn add(
        &mut self,
        domain: &str,
        mask: LevelMask,
        handler: Arc<dyn LogHandler>,
    ) -> Result<HandlerId, RouterError> {
        if mask.is_empty() {
            return Err(RouterError::EmptyLevelMask {
                domain: domain.to_string(),
            });
        }

        let raw = NonZeroU64::new(self.next_id).unwrap_or(NonZeroU64::MIN);
        self.next_id = raw.get().wrapping_add(1).max(1);
        let id = HandlerId::new(raw);

        self.entries.push(Registration {
            id,
            domain: domain.to_string(),
            mask,
            handler,
        });

        tracing::debug!(domain = domain, id = id.get(), mask = mask.bits(), "Registered log handler");
        Ok(id)
    }

    /// Removes the registration with exactly this domain and id.
    pub fn remove(&mut self, domain: &str, id: HandlerId) -> Result<(), RouterError> {
        let position = self
            .entries
            .iter()
            .position(|entry| entry.id == id && entry.domain == domain)
            .ok_or_else(|| RouterError::HandlerNotFound {
                domain: domain.to_string(),
                id,
            })?;
        self.entries.remove(position);

        tracing::debug!(domain = domain, id = id.get(), "Removed log handler");
        Ok(())
    }

    /// Handlers registered for `domain` whose mask covers `level`, in
    /// registration order and limited by the policy.
    pub fn matching(&self, domain: &str, level: LogLevel) -> Vec<Arc<dyn LogHandler>> {
        let matches = self
            .entries
            .iter()
            .filter(|entry| entry.domain == domain && entry.mask.contains(level))
            .map(|entry| Arc::clone(&entry.handler));

        match self.policy {
            HandlerPolicy::FanOut => matches.collect(),
            HandlerPolicy::FirstMatch => matches.take(1).collect(),
        }
    }

    pub fn set_default(&mut self, handler: Option<Arc<dyn LogHandler>>) -> Option<Arc<dyn LogHandler>> {
        std::mem::replace(&mut self.default_handler, handler)
    }

    pub fn default_handler(&self) -> Option<Arc<dyn LogHandler>> {
        self.default_handler.clone()
    }

    pub fn set_policy(&mut self, policy: HandlerPolicy) {
        self.policy = policy;
    }

    pub fn policy(&self) -> HandlerPolicy {
        self.policy
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
