use super::escape::escape_message;
use crate::domain::LogLevel;

/// Renders `(domain, level, message)` triples into console lines:
///
/// `[(prgname:pid): ][domain-]LABEL **: message\n`
///
/// The process prefix is only written for alert levels, the domain prefix
/// only for non-empty domains.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineFormat {
    program_name: String,
    pid: u32,
}

impl LineFormat {
    pub fn new(program_name: impl Into<String>, pid: u32) -> Self {
        Self {
            program_name: program_name.into(),
            pid,
        }
    }

    /// Format for the running process.
    pub fn current() -> Self {
        Self::new(current_program_name(), std::process::id())
    }

    pub fn program_name(&self) -> &str {
        &self.program_name
    }

    pub fn set_program_name(&mut self, program_name: impl Into<String>) {
        self.program_name = program_name.into();
    }

    pub fn render(&self, domain: &str, level: LogLevel, message: &[u8]) -> String {
        self.render_inner(domain, level, message, false)
    }

    /// Line for a message emitted from inside a handler or writer.
    pub fn render_recursed(&self, domain: &str, level: LogLevel, message: &[u8]) -> String {
        self.render_inner(domain, level, message, true)
    }

    fn render_inner(&self, domain: &str, level: LogLevel, message: &[u8], recursed: bool) -> String {
        let escaped = escape_message(message);
        let mut line = String::with_capacity(escaped.len() + domain.len() + 32);

        if level.is_alert() {
            line.push('(');
            line.push_str(&self.program_name);
            line.push(':');
            line.push_str(&self.pid.to_string());
            line.push_str("): ");
        }
        if !domain.is_empty() {
            line.push_str(domain);
            line.push('-');
        }
        line.push_str(&level.label());
        if recursed {
            line.push_str(" (recursed)");
        }
        line.push_str(" **: ");
        line.push_str(&escaped);
        if !line.ends_with('\n') {
            line.push('\n');
        }
        line
    }
}

impl Default for LineFormat {
    fn default() -> Self {
        Self::current()
    }
}

fn current_program_name() -> String {
    std::env::args_os()
        .next()
        .as_deref()
        .map(std::path::Path::new)
        .and_then(std::path::Path::file_name)
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "process".to_string())
}
