//! Structured key/value fields carried by every structured log event.

use super::error::RouterError;
use super::log_level::LogLevel;
use std::borrow::Cow;
use std::fmt;

/// Key of the synthetic field naming the emitting domain.
pub const DOMAIN_KEY: &str = "GLIB_DOMAIN";
/// Key of the synthetic one-byte syslog priority field.
pub const PRIORITY_KEY: &str = "PRIORITY";
/// Key of the rendered message text.
pub const MESSAGE_KEY: &str = "MESSAGE";

/// Value of a single field.
///
/// `Text` is a string whose significant part ends at the first NUL, `Bytes`
/// is an opaque buffer with an explicit length. A zero-length `Bytes` value is
/// valid and passed through untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue<'a> {
    Text(Cow<'a, str>),
    Bytes(Cow<'a, [u8]>),
}

impl<'a> FieldValue<'a> {
    pub fn text(value: impl Into<Cow<'a, str>>) -> Self {
        FieldValue::Text(value.into())
    }

    pub fn bytes(value: impl Into<Cow<'a, [u8]>>) -> Self {
        FieldValue::Bytes(value.into())
    }

    pub fn is_text(&self) -> bool {
        matches!(self, FieldValue::Text(_))
    }

    /// Explicit length of a `Bytes` value; `None` for text.
    pub fn explicit_len(&self) -> Option<usize> {
        match self {
            FieldValue::Text(_) => None,
            FieldValue::Bytes(bytes) => Some(bytes.len()),
        }
    }

    /// Bytes that take part in comparison and rendering.
    pub fn significant_bytes(&self) -> &[u8] {
        match self {
            FieldValue::Text(text) => {
                let bytes = text.as_bytes();
                match bytes.iter().position(|b| *b == 0) {
                    Some(nul) => &bytes[..nul],
                    None => bytes,
                }
            }
            FieldValue::Bytes(bytes) => bytes,
        }
    }

    /// The value as UTF-8, if it is.
    pub fn as_str(&self) -> Option<&str> {
        std::str::from_utf8(self.significant_bytes()).ok()
    }

    pub fn to_string_lossy(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(self.significant_bytes())
    }

    /// Same kind and byte-equal significant content.
    pub fn matches(&self, other: &FieldValue<'_>) -> bool {
        match (self, other) {
            (FieldValue::Text(_), FieldValue::Text(_)) | (FieldValue::Bytes(_), FieldValue::Bytes(_)) => {
                self.significant_bytes() == other.significant_bytes()
            }
            _ => false,
        }
    }

    pub fn into_owned(self) -> FieldValue<'static> {
        match self {
            FieldValue::Text(text) => FieldValue::Text(Cow::Owned(text.into_owned())),
            FieldValue::Bytes(bytes) => FieldValue::Bytes(Cow::Owned(bytes.into_owned())),
        }
    }
}

impl<'a> From<&'a str> for FieldValue<'a> {
    fn from(value: &'a str) -> Self {
        FieldValue::Text(Cow::Borrowed(value))
    }
}

impl From<String> for FieldValue<'_> {
    fn from(value: String) -> Self {
        FieldValue::Text(Cow::Owned(value))
    }
}

impl<'a> From<&'a [u8]> for FieldValue<'a> {
    fn from(value: &'a [u8]) -> Self {
        FieldValue::Bytes(Cow::Borrowed(value))
    }
}

impl<'a, const N: usize> From<&'a [u8; N]> for FieldValue<'a> {
    fn from(value: &'a [u8; N]) -> Self {
        FieldValue::Bytes(Cow::Borrowed(value.as_slice()))
    }
}

impl From<Vec<u8>> for FieldValue<'_> {
    fn from(value: Vec<u8>) -> Self {
        FieldValue::Bytes(Cow::Owned(value))
    }
}

/// Keys are ASCII identifiers: a letter or underscore followed by letters,
/// digits or underscores.
pub fn is_valid_key(key: &str) -> bool {
    let mut chars = key.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Keys the router fills in itself.
pub fn is_reserved_key(key: &str) -> bool {
    key == DOMAIN_KEY || key == PRIORITY_KEY || key == MESSAGE_KEY
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field<'a> {
    key: Cow<'a, str>,
    value: FieldValue<'a>,
}

impl<'a> Field<'a> {
    pub fn new(key: impl Into<Cow<'a, str>>, value: impl Into<FieldValue<'a>>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn value(&self) -> &FieldValue<'a> {
        &self.value
    }

    pub fn matches(&self, other: &Field<'_>) -> bool {
        self.key == other.key && self.value.matches(&other.value)
    }

    pub fn into_owned(self) -> Field<'static> {
        Field {
            key: Cow::Owned(self.key.into_owned()),
            value: self.value.into_owned(),
        }
    }
}

/// Ordered collection of fields describing one structured event.
///
/// Duplicate keys are allowed. Equality ignores order: see [`compare_fields`].
#[derive(Debug, Clone, Default)]
pub struct FieldSet<'a> {
    fields: Vec<Field<'a>>,
}

impl<'a> FieldSet<'a> {
    pub fn new() -> Self {
        Self { fields: Vec::new() }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            fields: Vec::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, field: Field<'a>) {
        self.fields.push(field);
    }

    /// Appends a field and returns the set, for literal construction.
    pub fn with(mut self, key: impl Into<Cow<'a, str>>, value: impl Into<FieldValue<'a>>) -> Self {
        self.fields.push(Field::new(key, value));
        self
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Field<'a>> {
        self.fields.iter()
    }

    /// Most recently added value for `key`.
    pub fn get(&self, key: &str) -> Option<&FieldValue<'a>> {
        self.fields
            .iter()
            .rev()
            .find(|field| field.key() == key)
            .map(Field::value)
    }

    pub fn get_all<'s>(&'s self, key: &'s str) -> impl Iterator<Item = &'s FieldValue<'a>> + 's {
        self.fields
            .iter()
            .filter(move |field| field.key() == key)
            .map(Field::value)
    }

    /// Domain named by the `GLIB_DOMAIN` field, or the default domain.
    pub fn domain(&self) -> &str {
        self.get(DOMAIN_KEY)
            .and_then(FieldValue::as_str)
            .unwrap_or(crate::DEFAULT_DOMAIN)
    }

    pub fn message(&self) -> Option<&FieldValue<'a>> {
        self.get(MESSAGE_KEY)
    }

    /// The field set of a legacy call: `GLIB_DOMAIN`, `PRIORITY`, `MESSAGE`.
    pub fn for_message(domain: &'a str, level: LogLevel, message: &'a [u8]) -> Self {
        let mut set = FieldSet::synthetic(Cow::Borrowed(domain), level, 3);
        set.push(Field::new(MESSAGE_KEY, message_value(Cow::Borrowed(message))));
        set
    }

    fn synthetic(domain: Cow<'a, str>, level: LogLevel, capacity: usize) -> Self {
        let mut set = FieldSet::with_capacity(capacity);
        if !domain.is_empty() {
            set.push(Field::new(DOMAIN_KEY, FieldValue::Text(domain)));
        }
        set.push(Field::new(
            PRIORITY_KEY,
            FieldValue::Bytes(Cow::Borrowed(level.priority().as_bytes())),
        ));
        set
    }

    pub fn into_owned(self) -> FieldSet<'static> {
        FieldSet {
            fields: self.fields.into_iter().map(Field::into_owned).collect(),
        }
    }
}

impl PartialEq for FieldSet<'_> {
    fn eq(&self, other: &Self) -> bool {
        compare_fields(self, other)
    }
}

impl<'a> FromIterator<Field<'a>> for FieldSet<'a> {
    fn from_iter<I: IntoIterator<Item = Field<'a>>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().collect(),
        }
    }
}

impl<'a> Extend<Field<'a>> for FieldSet<'a> {
    fn extend<I: IntoIterator<Item = Field<'a>>>(&mut self, iter: I) {
        self.fields.extend(iter);
    }
}

impl<'s, 'a> IntoIterator for &'s FieldSet<'a> {
    type Item = &'s Field<'a>;
    type IntoIter = std::slice::Iter<'s, Field<'a>>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.iter()
    }
}

/// Order-insensitive comparison of two field sets.
///
/// Every field of each set must find the first field with the same key in the
/// other set, with a value of the same kind and equal significant bytes, and
/// both sets must hold the same number of fields.
pub fn compare_fields(left: &FieldSet<'_>, right: &FieldSet<'_>) -> bool {
    left.len() == right.len() && covers(left, right) && covers(right, left)
}

fn covers(left: &FieldSet<'_>, right: &FieldSet<'_>) -> bool {
    left.iter().all(|field| {
        right
            .iter()
            .find(|candidate| candidate.key() == field.key())
            .is_some_and(|candidate| candidate.value().matches(field.value()))
    })
}

/// Builds the field set of one structured call: caller fields plus the
/// synthetic `GLIB_DOMAIN`, `PRIORITY` and the expanded `MESSAGE`.
#[derive(Debug)]
pub struct FieldSetBuilder<'a> {
    domain: Cow<'a, str>,
    level: LogLevel,
    fields: Vec<Field<'a>>,
    message: Option<FieldValue<'a>>,
    error: Option<RouterError>,
}

impl<'a> FieldSetBuilder<'a> {
    pub fn new(domain: impl Into<Cow<'a, str>>, level: LogLevel) -> Self {
        Self {
            domain: domain.into(),
            level,
            fields: Vec::new(),
            message: None,
            error: None,
        }
    }

    pub fn field(mut self, key: impl Into<Cow<'a, str>>, value: impl Into<FieldValue<'a>>) -> Self {
        let key = key.into();
        if self.error.is_none() {
            if !is_valid_key(&key) {
                self.error = Some(RouterError::InvalidKey {
                    key: key.into_owned(),
                });
            } else if is_reserved_key(&key) {
                self.error = Some(RouterError::ReservedKey {
                    key: key.into_owned(),
                });
            } else {
                self.fields.push(Field::new(key, value));
            }
        }
        self
    }

    /// Expands the message template. Formatting happens here, once.
    pub fn message(mut self, message: impl fmt::Display) -> Self {
        self.message = Some(FieldValue::Text(Cow::Owned(message.to_string())));
        self
    }

    /// Raw message bytes, which may not be valid UTF-8.
    pub fn message_bytes(mut self, message: impl Into<Cow<'a, [u8]>>) -> Self {
        self.message = Some(message_value(message.into()));
        self
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }

    pub fn level(&self) -> LogLevel {
        self.level
    }

    pub fn build(self) -> Result<FieldSet<'a>, RouterError> {
        if let Some(err) = self.error {
            return Err(err);
        }
        let message = self.message.ok_or(RouterError::MissingMessage)?;
        if message.significant_bytes().is_empty() {
            return Err(RouterError::EmptyMessage);
        }

        let mut set = FieldSet::synthetic(self.domain, self.level, self.fields.len() + 3);
        set.extend(self.fields);
        set.push(Field::new(MESSAGE_KEY, message));
        Ok(set)
    }
}

/// Text when the bytes are UTF-8, an explicit-length value otherwise.
fn message_value(message: Cow<'_, [u8]>) -> FieldValue<'_> {
    match message {
        Cow::Borrowed(bytes) => match std::str::from_utf8(bytes) {
            Ok(text) => FieldValue::Text(Cow::Borrowed(text)),
            Err(_) => FieldValue::Bytes(Cow::Borrowed(bytes)),
        },
        Cow::Owned(bytes) => match String::from_utf8(bytes) {
            Ok(text) => FieldValue::Text(Cow::Owned(text)),
            Err(err) => FieldValue::Bytes(Cow::Owned(err.into_bytes())),
        },
    }
}
