//! Pluggable value-transformation policies.
//!
//! Strategies are plain configuration values carried by
//! [`DecodeOptions`](crate::DecodeOptions) and
//! [`EncodeOptions`](crate::EncodeOptions). Closure-based variants are stored
//! behind `Arc`, so cloning an options struct is cheap and the same options
//! can drive calls on several threads at once.

use crate::decode::DecodeContext;
use crate::document::{Node, ObjectRef};
use crate::encode::EncodeContext;
use crate::error::Result;
use crate::path::CodingPath;
use chrono::{DateTime, Utc};
use std::fmt;
use std::sync::Arc;

/// Maps a coding path (whose last segment is the key being converted) to a key.
pub type KeyTransform = Arc<dyn Fn(&CodingPath) -> String + Send + Sync>;

/// Decodes a date from the node in `ctx`.
pub type DateDecoder = Arc<dyn Fn(DecodeContext<'_>) -> Result<DateTime<Utc>> + Send + Sync>;

/// Encodes a date into the node in `ctx`.
pub type DateEncoder = Arc<dyn Fn(&DateTime<Utc>, EncodeContext<'_>) -> Result<()> + Send + Sync>;

/// Decodes binary data from the node in `ctx`.
pub type DataDecoder = Arc<dyn Fn(DecodeContext<'_>) -> Result<Vec<u8>> + Send + Sync>;

/// Encodes binary data into the node in `ctx`.
pub type DataEncoder = Arc<dyn Fn(&[u8], EncodeContext<'_>) -> Result<()> + Send + Sync>;

/// How wire keys map to the keys a type asks for when decoding.
#[derive(Clone, Default)]
pub enum KeyDecodingStrategy {
    /// Keys are used as they appear on the wire.
    #[default]
    UseDefaultKeys,
    /// `snake_case` wire keys are read as `camelCase` keys.
    ConvertFromSnakeCase,
    /// The closure receives the path of each wire key and returns the
    /// logical key. Lookups scan every wire key of the object.
    Custom(KeyTransform),
}

impl KeyDecodingStrategy {
    pub fn custom<F>(f: F) -> Self
    where
        F: Fn(&CodingPath) -> String + Send + Sync + 'static,
    {
        KeyDecodingStrategy::Custom(Arc::new(f))
    }

    /// The logical key for `wire`, found in the object at `parent`.
    pub(crate) fn logical_key(&self, wire: &str, parent: &CodingPath) -> String {
        match self {
            KeyDecodingStrategy::UseDefaultKeys => wire.to_string(),
            KeyDecodingStrategy::ConvertFromSnakeCase => convert_from_snake_case(wire),
            KeyDecodingStrategy::Custom(f) => f(&parent.push_key(wire)),
        }
    }

    /// Finds the first member whose wire key maps to `key`.
    pub(crate) fn lookup<'a>(
        &self,
        object: ObjectRef<'a>,
        key: &str,
        parent: &CodingPath,
    ) -> Option<Node<'a>> {
        match self {
            KeyDecodingStrategy::UseDefaultKeys => object.get(key),
            KeyDecodingStrategy::ConvertFromSnakeCase => {
                object.get(&convert_to_snake_case(key)).or_else(|| {
                    object
                        .iter()
                        .find(|(wire, _)| convert_from_snake_case(wire) == key)
                        .map(|(_, node)| node)
                })
            }
            KeyDecodingStrategy::Custom(f) => object
                .iter()
                .find(|(wire, _)| f(&parent.push_key(wire)) == key)
                .map(|(_, node)| node),
        }
    }
}

impl fmt::Debug for KeyDecodingStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyDecodingStrategy::UseDefaultKeys => f.write_str("UseDefaultKeys"),
            KeyDecodingStrategy::ConvertFromSnakeCase => f.write_str("ConvertFromSnakeCase"),
            KeyDecodingStrategy::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// How the keys a type writes become wire keys when encoding.
#[derive(Clone, Default)]
pub enum KeyEncodingStrategy {
    #[default]
    UseDefaultKeys,
    /// `camelCase` keys are written as `snake_case`.
    ConvertToSnakeCase,
    /// The closure receives the path of each key and returns the wire key.
    Custom(KeyTransform),
}

impl KeyEncodingStrategy {
    pub fn custom<F>(f: F) -> Self
    where
        F: Fn(&CodingPath) -> String + Send + Sync + 'static,
    {
        KeyEncodingStrategy::Custom(Arc::new(f))
    }

    pub(crate) fn wire_key(&self, key: &str, parent: &CodingPath) -> String {
        match self {
            KeyEncodingStrategy::UseDefaultKeys => key.to_string(),
            KeyEncodingStrategy::ConvertToSnakeCase => convert_to_snake_case(key),
            KeyEncodingStrategy::Custom(f) => f(&parent.push_key(key)),
        }
    }
}

impl fmt::Debug for KeyEncodingStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyEncodingStrategy::UseDefaultKeys => f.write_str("UseDefaultKeys"),
            KeyEncodingStrategy::ConvertToSnakeCase => f.write_str("ConvertToSnakeCase"),
            KeyEncodingStrategy::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// How `DateTime<Utc>` values are read.
#[derive(Clone, Default)]
pub enum DateDecodingStrategy {
    /// The date's own representation: an RFC 3339 string.
    #[default]
    Deferred,
    /// RFC 3339, with or without fractional seconds.
    Iso8601,
    /// A number of seconds since the Unix epoch.
    SecondsSince1970,
    /// A number of milliseconds since the Unix epoch.
    MillisecondsSince1970,
    /// A `chrono` format string such as `"%Y-%m-%d %H:%M:%S"`.
    Formatted(String),
    Custom(DateDecoder),
}

impl DateDecodingStrategy {
    pub fn custom<F>(f: F) -> Self
    where
        F: Fn(DecodeContext<'_>) -> Result<DateTime<Utc>> + Send + Sync + 'static,
    {
        DateDecodingStrategy::Custom(Arc::new(f))
    }
}

impl fmt::Debug for DateDecodingStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DateDecodingStrategy::Deferred => f.write_str("Deferred"),
            DateDecodingStrategy::Iso8601 => f.write_str("Iso8601"),
            DateDecodingStrategy::SecondsSince1970 => f.write_str("SecondsSince1970"),
            DateDecodingStrategy::MillisecondsSince1970 => f.write_str("MillisecondsSince1970"),
            DateDecodingStrategy::Formatted(format) => {
                f.debug_tuple("Formatted").field(format).finish()
            }
            DateDecodingStrategy::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// How `DateTime<Utc>` values are written.
#[derive(Clone, Default)]
pub enum DateEncodingStrategy {
    /// The date's own representation: an RFC 3339 string.
    #[default]
    Deferred,
    /// RFC 3339 in UTC with millisecond precision, e.g. `2024-03-01T12:00:00.000Z`.
    Iso8601,
    SecondsSince1970,
    MillisecondsSince1970,
    Formatted(String),
    Custom(DateEncoder),
}

impl DateEncodingStrategy {
    pub fn custom<F>(f: F) -> Self
    where
        F: Fn(&DateTime<Utc>, EncodeContext<'_>) -> Result<()> + Send + Sync + 'static,
    {
        DateEncodingStrategy::Custom(Arc::new(f))
    }
}

impl fmt::Debug for DateEncodingStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DateEncodingStrategy::Deferred => f.write_str("Deferred"),
            DateEncodingStrategy::Iso8601 => f.write_str("Iso8601"),
            DateEncodingStrategy::SecondsSince1970 => f.write_str("SecondsSince1970"),
            DateEncodingStrategy::MillisecondsSince1970 => f.write_str("MillisecondsSince1970"),
            DateEncodingStrategy::Formatted(format) => {
                f.debug_tuple("Formatted").field(format).finish()
            }
            DateEncodingStrategy::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// How [`Bytes`](crate::Bytes) values are read.
#[derive(Clone, Default)]
pub enum DataDecodingStrategy {
    /// A standard, padded base64 string.
    #[default]
    Base64,
    /// An array of byte-valued integers.
    Deferred,
    Custom(DataDecoder),
}

impl DataDecodingStrategy {
    pub fn custom<F>(f: F) -> Self
    where
        F: Fn(DecodeContext<'_>) -> Result<Vec<u8>> + Send + Sync + 'static,
    {
        DataDecodingStrategy::Custom(Arc::new(f))
    }
}

impl fmt::Debug for DataDecodingStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataDecodingStrategy::Base64 => f.write_str("Base64"),
            DataDecodingStrategy::Deferred => f.write_str("Deferred"),
            DataDecodingStrategy::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// How [`Bytes`](crate::Bytes) values are written.
#[derive(Clone, Default)]
pub enum DataEncodingStrategy {
    #[default]
    Base64,
    Deferred,
    Custom(DataEncoder),
}

impl DataEncodingStrategy {
    pub fn custom<F>(f: F) -> Self
    where
        F: Fn(&[u8], EncodeContext<'_>) -> Result<()> + Send + Sync + 'static,
    {
        DataEncodingStrategy::Custom(Arc::new(f))
    }
}

impl fmt::Debug for DataEncodingStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataEncodingStrategy::Base64 => f.write_str("Base64"),
            DataEncodingStrategy::Deferred => f.write_str("Deferred"),
            DataEncodingStrategy::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// What to do with NaN and infinite values found while decoding floats.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum NonConformingFloatDecodingStrategy {
    /// Reject them with an invalid-data error.
    #[default]
    Throw,
    /// Accept them, and also accept these strings in place of them.
    ConvertFromString {
        positive_infinity: String,
        negative_infinity: String,
        nan: String,
    },
}

impl NonConformingFloatDecodingStrategy {
    /// `"Infinity"`, `"-Infinity"` and `"NaN"`.
    #[must_use]
    pub fn convert_from_default_strings() -> Self {
        NonConformingFloatDecodingStrategy::ConvertFromString {
            positive_infinity: "Infinity".to_string(),
            negative_infinity: "-Infinity".to_string(),
            nan: "NaN".to_string(),
        }
    }

    pub(crate) fn allows_non_finite(&self) -> bool {
        matches!(self, NonConformingFloatDecodingStrategy::ConvertFromString { .. })
    }

    pub(crate) fn from_sentinel(&self, text: &str) -> Option<f64> {
        match self {
            NonConformingFloatDecodingStrategy::Throw => None,
            NonConformingFloatDecodingStrategy::ConvertFromString {
                positive_infinity,
                negative_infinity,
                nan,
            } => {
                if text == positive_infinity {
                    Some(f64::INFINITY)
                } else if text == negative_infinity {
                    Some(f64::NEG_INFINITY)
                } else if text == nan {
                    Some(f64::NAN)
                } else {
                    None
                }
            }
        }
    }
}

/// What to do with NaN and infinite values found while encoding floats.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum NonConformingFloatEncodingStrategy {
    /// Store them as numbers; the write options decide whether they print.
    #[default]
    Throw,
    /// Write these strings in place of them.
    ConvertToString {
        positive_infinity: String,
        negative_infinity: String,
        nan: String,
    },
}

impl NonConformingFloatEncodingStrategy {
    #[must_use]
    pub fn convert_to_default_strings() -> Self {
        NonConformingFloatEncodingStrategy::ConvertToString {
            positive_infinity: "Infinity".to_string(),
            negative_infinity: "-Infinity".to_string(),
            nan: "NaN".to_string(),
        }
    }

    pub(crate) fn sentinel_for(&self, value: f64) -> Option<&str> {
        match self {
            NonConformingFloatEncodingStrategy::Throw => None,
            NonConformingFloatEncodingStrategy::ConvertToString {
                positive_infinity,
                negative_infinity,
                nan,
            } => {
                if value.is_nan() {
                    Some(nan)
                } else if value == f64::INFINITY {
                    Some(positive_infinity)
                } else if value == f64::NEG_INFINITY {
                    Some(negative_infinity)
                } else {
                    None
                }
            }
        }
    }
}

/// `myURLProperty` becomes `my_url_property`.
///
/// A word boundary is placed before an uppercase letter that follows a
/// non-uppercase character, and before the last letter of an uppercase run
/// that is followed by a lowercase letter.
pub fn convert_to_snake_case(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    let mut out = String::with_capacity(key.len() + 4);
    for (i, &c) in chars.iter().enumerate() {
        if !c.is_uppercase() {
            out.push(c);
            continue;
        }
        if i > 0 {
            let prev = chars[i - 1];
            let next_is_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
            let boundary = if prev.is_uppercase() {
                next_is_lower
            } else {
                prev != '_'
            };
            if boundary {
                out.push('_');
            }
        }
        out.extend(c.to_lowercase());
    }
    out
}

/// `my_url_property` becomes `myUrlProperty`.
///
/// Leading and trailing underscores are kept. A key with a single word is
/// returned unchanged.
pub fn convert_from_snake_case(key: &str) -> String {
    let Some(first) = key.find(|c| c != '_') else {
        return key.to_string();
    };
    let last = key.rfind(|c| c != '_').unwrap_or(first);
    let end = last + key[last..].chars().next().map_or(1, char::len_utf8);
    let (leading, core, trailing) = (&key[..first], &key[first..end], &key[end..]);

    let words: Vec<&str> = core.split('_').filter(|w| !w.is_empty()).collect();
    if words.len() <= 1 {
        return key.to_string();
    }

    let mut out = String::with_capacity(key.len());
    out.push_str(leading);
    out.push_str(&words[0].to_lowercase());
    for word in &words[1..] {
        let mut chars = word.chars();
        if let Some(head) = chars.next() {
            out.extend(head.to_uppercase());
            out.push_str(&chars.as_str().to_lowercase());
        }
    }
    out.push_str(trailing);
    out
}
