use super::ConfigError;
use crate::domain::{LevelMask, LogLevel};
use crate::router::{FixedAllowlist, HandlerPolicy, LogRouter};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

/// Router settings loaded from a TOML file.
///
/// ```toml
/// debug_domains = "foo bar baz"
/// always_fatal = ["critical"]
/// handler_policy = "first-match"
/// program_name = "demo"
///
/// [fatal_masks]
/// bu = ["info"]
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RouterConfig {
    /// Replaces the environment allowlist when set.
    pub debug_domains: Option<String>,
    pub always_fatal: Vec<LogLevel>,
    pub handler_policy: Option<HandlerPolicy>,
    pub program_name: Option<String>,
    pub fatal_masks: BTreeMap<String, Vec<LogLevel>>,
}

impl RouterConfig {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: RouterConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn apply(&self, router: &LogRouter) {
        if let Some(domains) = &self.debug_domains {
            router.set_allowlist_source(Arc::new(FixedAllowlist(Some(domains.clone()))));
        }
        if !self.always_fatal.is_empty() {
            router.set_always_fatal(self.always_fatal.iter().copied().collect::<LevelMask>());
        }
        if let Some(policy) = self.handler_policy {
            router.set_handler_policy(policy);
        }
        if let Some(program_name) = &self.program_name {
            router.set_program_name(program_name);
        }
        for (domain, levels) in &self.fatal_masks {
            router.set_fatal_mask(domain, levels.iter().copied().collect::<LevelMask>());
        }
        tracing::debug!(
            fatal_masks = self.fatal_masks.len(),
            allowlist = ?self.debug_domains,
            "Applied router configuration"
        );
    }
}
