//! Debug-domain allowlist gating Info and Debug output.

use crate::DEFAULT_DOMAIN;

/// Environment variable holding the allowlist.
pub const DEBUG_DOMAINS_ENV: &str = "RASK_MESSAGES_DEBUG";

/// Wildcard admitting every domain. Case-sensitive.
pub const ALL_DOMAINS: &str = "all";

/// Where the raw allowlist string comes from.
pub trait AllowlistSource: Send + Sync {
    fn read(&self) -> Option<String>;
}

/// Reads an environment variable on every call, so changes made by the
/// process itself are picked up.
#[derive(Debug, Clone)]
pub struct EnvAllowlist {
    var: String,
}

impl EnvAllowlist {
    pub fn new(var: impl Into<String>) -> Self {
        Self { var: var.into() }
    }
}

impl Default for EnvAllowlist {
    fn default() -> Self {
        Self::new(DEBUG_DOMAINS_ENV)
    }
}

impl AllowlistSource for EnvAllowlist {
    fn read(&self) -> Option<String> {
        std::env::var_os(&self.var).map(|value| value.to_string_lossy().into_owned())
    }
}

/// A fixed allowlist, e.g. from a configuration file.
#[derive(Debug, Clone, Default)]
pub struct FixedAllowlist(pub Option<String>);

impl AllowlistSource for FixedAllowlist {
    fn read(&self) -> Option<String> {
        self.0.clone()
    }
}

/// Parsed allowlist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainFilter {
    All,
    Domains(Vec<String>),
}

impl DomainFilter {
    /// Whitespace-separated domain names, or `all`.
    pub fn parse(raw: Option<&str>) -> Self {
        let Some(raw) = raw else {
            return DomainFilter::Domains(Vec::new());
        };
        let mut domains = Vec::new();
        for token in raw.split_whitespace() {
            if token == ALL_DOMAINS {
                return DomainFilter::All;
            }
            domains.push(token.to_string());
        }
        DomainFilter::Domains(domains)
    }

    /// The default domain is always admitted.
    pub fn admits(&self, domain: &str) -> bool {
        if domain == DEFAULT_DOMAIN {
            return true;
        }
        match self {
            DomainFilter::All => true,
            DomainFilter::Domains(domains) => domains.iter().any(|d| d == domain),
        }
    }
}
