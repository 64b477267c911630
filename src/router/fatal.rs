use crate::domain::{LevelMask, LogLevel};
use std::collections::HashMap;

/// Per-domain sets of severities that terminate the process after dispatch.
///
/// Error is part of every mask and cannot be removed.
#[derive(Debug, Clone)]
pub struct FatalMasks {
    always: LevelMask,
    domains: HashMap<String, LevelMask>,
}

impl FatalMasks {
    pub fn new() -> Self {
        Self {
            always: LogLevel::Error.into(),
            domains: HashMap::new(),
        }
    }

    /// Replaces the mask of `domain` and returns the previous one.
    pub fn set_domain_mask(&mut self, domain: &str, mask: LevelMask) -> LevelMask {
        let mask = mask | LogLevel::Error;
        self.domains
            .insert(domain.to_string(), mask)
            .unwrap_or_else(|| LogLevel::Error.into())
    }

    /// Replaces the mask applied to every domain and returns the previous one.
    pub fn set_always_fatal(&mut self, mask: LevelMask) -> LevelMask {
        std::mem::replace(&mut self.always, mask | LogLevel::Error)
    }

    pub fn domain_mask(&self, domain: &str) -> LevelMask {
        self.domains
            .get(domain)
            .copied()
            .unwrap_or_else(|| LogLevel::Error.into())
    }

    pub fn always_fatal(&self) -> LevelMask {
        self.always
    }

    pub fn is_fatal(&self, domain: &str, level: LogLevel) -> bool {
        level == LogLevel::Error
            || self.always.contains(level)
            || self.domain_mask(domain).contains(level)
    }
}

impl Default for FatalMasks {
    fn default() -> Self {
        Self::new()
    }
}
