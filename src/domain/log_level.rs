use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;
use std::ops::{BitOr, BitOrAssign};
use std::str::FromStr;
use thiserror::Error;

/// Severity of a single log call.
///
/// Each known level occupies one bit so that levels compose into a
/// [`LevelMask`]. Raw levels outside the known set are carried as
/// [`LogLevel::Custom`] and still dispatch and render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum LogLevel {
    Error,
    Critical,
    Warning,
    Message,
    Info,
    Debug,
    /// Raw level bits, e.g. `1 << 10`.
    Custom(u32),
}

impl LogLevel {
    pub const ERROR_BIT: u32 = 1 << 2;
    pub const CRITICAL_BIT: u32 = 1 << 3;
    pub const WARNING_BIT: u32 = 1 << 4;
    pub const MESSAGE_BIT: u32 = 1 << 5;
    pub const INFO_BIT: u32 = 1 << 6;
    pub const DEBUG_BIT: u32 = 1 << 7;

    /// All known levels, most fatal first.
    pub const KNOWN: [LogLevel; 6] = [
        LogLevel::Error,
        LogLevel::Critical,
        LogLevel::Warning,
        LogLevel::Message,
        LogLevel::Info,
        LogLevel::Debug,
    ];

    pub fn bits(self) -> u32 {
        match self {
            LogLevel::Error => Self::ERROR_BIT,
            LogLevel::Critical => Self::CRITICAL_BIT,
            LogLevel::Warning => Self::WARNING_BIT,
            LogLevel::Message => Self::MESSAGE_BIT,
            LogLevel::Info => Self::INFO_BIT,
            LogLevel::Debug => Self::DEBUG_BIT,
            LogLevel::Custom(bits) => bits,
        }
    }

    /// Maps raw level bits back to a level. Anything that is not exactly one
    /// of the known bits becomes [`LogLevel::Custom`].
    pub fn from_bits(bits: u32) -> Self {
        match bits {
            Self::ERROR_BIT => LogLevel::Error,
            Self::CRITICAL_BIT => LogLevel::Critical,
            Self::WARNING_BIT => LogLevel::Warning,
            Self::MESSAGE_BIT => LogLevel::Message,
            Self::INFO_BIT => LogLevel::Info,
            Self::DEBUG_BIT => LogLevel::Debug,
            other => LogLevel::Custom(other),
        }
    }

    /// Human readable tag used by the console renderers.
    pub fn label(self) -> Cow<'static, str> {
        match self {
            LogLevel::Error => Cow::Borrowed("ERROR"),
            LogLevel::Critical => Cow::Borrowed("CRITICAL"),
            LogLevel::Warning => Cow::Borrowed("WARNING"),
            LogLevel::Message => Cow::Borrowed("Message"),
            LogLevel::Info => Cow::Borrowed("INFO"),
            LogLevel::Debug => Cow::Borrowed("DEBUG"),
            LogLevel::Custom(bits) => Cow::Owned(format!("LOG-0x{bits:x}")),
        }
    }

    /// Syslog priority digit stored in the `PRIORITY` field.
    pub fn priority(self) -> &'static str {
        match self {
            LogLevel::Error => "3",
            LogLevel::Critical | LogLevel::Warning => "4",
            LogLevel::Message => "5",
            LogLevel::Info => "6",
            LogLevel::Debug => "7",
            LogLevel::Custom(_) => "5",
        }
    }

    /// Levels that get the `(prgname:pid): ` prefix when rendered.
    pub fn is_alert(self) -> bool {
        matches!(self, LogLevel::Error | LogLevel::Critical | LogLevel::Warning)
    }

    /// Levels gated by the debug-domain allowlist.
    pub fn is_verbose(self) -> bool {
        matches!(self, LogLevel::Info | LogLevel::Debug)
    }

    /// Levels the built-in renderers send to the error console.
    pub fn uses_stderr(self) -> bool {
        matches!(
            self,
            LogLevel::Error | LogLevel::Critical | LogLevel::Warning | LogLevel::Message
        )
    }

    pub fn as_str(self) -> Cow<'static, str> {
        match self {
            LogLevel::Error => Cow::Borrowed("error"),
            LogLevel::Critical => Cow::Borrowed("critical"),
            LogLevel::Warning => Cow::Borrowed("warning"),
            LogLevel::Message => Cow::Borrowed("message"),
            LogLevel::Info => Cow::Borrowed("info"),
            LogLevel::Debug => Cow::Borrowed("debug"),
            LogLevel::Custom(bits) => Cow::Owned(format!("0x{bits:x}")),
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid log level '{input}'. Valid levels: error, critical, warning, message, info, debug or a numeric level")]
pub struct LevelParseError {
    pub input: String,
}

impl FromStr for LogLevel {
    type Err = LevelParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let level = match trimmed.to_ascii_lowercase().as_str() {
            "error" => LogLevel::Error,
            "critical" => LogLevel::Critical,
            "warning" | "warn" => LogLevel::Warning,
            "message" => LogLevel::Message,
            "info" => LogLevel::Info,
            "debug" => LogLevel::Debug,
            other => {
                let parsed = match other.strip_prefix("0x") {
                    Some(hex) => u32::from_str_radix(hex, 16),
                    None => other.parse::<u32>(),
                };
                match parsed {
                    Ok(bits) if bits > 0b11 => LogLevel::from_bits(bits),
                    _ => {
                        return Err(LevelParseError {
                            input: s.to_string(),
                        });
                    }
                }
            }
        };
        Ok(level)
    }
}

impl TryFrom<String> for LogLevel {
    type Error = LevelParseError;

    fn try_from(value: String) -> Result<Self, LevelParseError> {
        value.parse()
    }
}

impl From<LogLevel> for String {
    fn from(level: LogLevel) -> Self {
        level.as_str().into_owned()
    }
}

/// Set of severities, composed with `|`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct LevelMask(u32);

impl LevelMask {
    pub const EMPTY: LevelMask = LevelMask(0);
    /// Every level bit; the two lowest bits are reserved for record flags.
    pub const ALL: LevelMask = LevelMask(!0b11);

    pub const fn from_bits(bits: u32) -> Self {
        LevelMask(bits & !0b11)
    }

    pub const fn bits(self) -> u32 {
        self.0
    }

    pub fn contains(self, level: LogLevel) -> bool {
        self.0 & level.bits() != 0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn with(self, level: LogLevel) -> Self {
        LevelMask::from_bits(self.0 | level.bits())
    }

    /// Known levels present in the mask, most fatal first.
    pub fn levels(self) -> impl Iterator<Item = LogLevel> {
        LogLevel::KNOWN
            .into_iter()
            .filter(move |level| self.contains(*level))
    }
}

impl From<LogLevel> for LevelMask {
    fn from(level: LogLevel) -> Self {
        LevelMask::from_bits(level.bits())
    }
}

impl BitOr for LevelMask {
    type Output = LevelMask;

    fn bitor(self, rhs: LevelMask) -> LevelMask {
        LevelMask(self.0 | rhs.0)
    }
}

impl BitOr<LogLevel> for LevelMask {
    type Output = LevelMask;

    fn bitor(self, rhs: LogLevel) -> LevelMask {
        self.with(rhs)
    }
}

impl BitOr for LogLevel {
    type Output = LevelMask;

    fn bitor(self, rhs: LogLevel) -> LevelMask {
        LevelMask::from(self).with(rhs)
    }
}

impl BitOrAssign<LogLevel> for LevelMask {
    fn bitor_assign(&mut self, rhs: LogLevel) {
        *self = self.with(rhs);
    }
}

impl FromIterator<LogLevel> for LevelMask {
    fn from_iter<I: IntoIterator<Item = LogLevel>>(iter: I) -> Self {
        iter.into_iter().fold(LevelMask::EMPTY, LevelMask::with)
    }
}
