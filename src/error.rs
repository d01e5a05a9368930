//! Error types shared by the reader, the printer and both coding engines.
//!
//! Every failure is reported as one [`Error`] value. Decode and encode
//! errors carry the coding path rendered at the point of failure, so a
//! mismatch deep inside a nested document can be located directly:
//!
//! ```rust
//! use codable_json::{decode, Error};
//!
//! let result: Result<Vec<i32>, Error> = decode(br#"[1, "x", 3]"#);
//! let err = result.unwrap_err();
//! assert_eq!(err.path(), Some("Index 1"));
//! assert!(err.to_string().contains("Expected integer, got string"));
//! ```
//!
//! ## Error Categories
//!
//! - **Parse**: the input bytes are not a well-formed document
//! - **Missing value / missing key**: a required value or object key is absent
//! - **Type mismatch**: the node kind cannot satisfy the requested type
//! - **Invalid data**: the value is present and well-typed but semantically wrong
//! - **Write**: the printer refused to serialize the finished tree

use crate::path::CodingPath;
use std::fmt;
use thiserror::Error;

/// Failure codes reported by the reader.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ParseErrorCode {
    /// The input is empty or contains only whitespace and comments.
    EmptyContent,
    /// Content remains after the first complete value.
    UnexpectedContent,
    /// The input ended inside a value.
    UnexpectedEnd,
    /// A byte that cannot start or continue the current token.
    UnexpectedCharacter,
    /// Containers are nested deeper than the reader accepts.
    JsonStructure,
    /// An unterminated or malformed comment.
    InvalidComment,
    /// A malformed or out-of-range number.
    InvalidNumber,
    /// A malformed string: bad escape, control character or invalid UTF-8.
    InvalidString,
    /// A misspelled `true`, `false`, `null` or non-finite literal.
    Literal,
}

impl ParseErrorCode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            ParseErrorCode::EmptyContent => "Empty content",
            ParseErrorCode::UnexpectedContent => "Unexpected content",
            ParseErrorCode::UnexpectedEnd => "Unexpected end of input",
            ParseErrorCode::UnexpectedCharacter => "Unexpected character",
            ParseErrorCode::JsonStructure => "Invalid JSON structure",
            ParseErrorCode::InvalidComment => "Invalid comment",
            ParseErrorCode::InvalidNumber => "Invalid number",
            ParseErrorCode::InvalidString => "Invalid string",
            ParseErrorCode::Literal => "Invalid literal",
        }
    }
}

impl fmt::Display for ParseErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Failure codes reported by the printer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum WriteErrorCode {
    /// A node was allocated but never given a value.
    InvalidValueType,
    /// A NaN or infinite number with no inf/nan write flag selected.
    NanOrInf,
    /// An I/O sink rejected the output.
    Io,
}

/// Coarse classification of an [`Error`], convenient for matching.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Parse,
    MissingValue,
    MissingKey,
    TypeMismatch,
    InvalidData,
    Write,
}

/// Represents all errors produced while reading, decoding, encoding or writing.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum Error {
    /// Malformed input bytes.
    #[error("{message} at byte {position}")]
    Parse {
        code: ParseErrorCode,
        position: usize,
        message: String,
    },

    /// Expected a value, found none (absent or null root, exhausted array).
    #[error("Value is null or missing{}", located(.path))]
    MissingValue { path: String },

    /// A required object key was not present.
    #[error("Missing key '{key}'{}", located(.path))]
    MissingKey { key: String, path: String },

    /// The node kind is incompatible with the requested type.
    #[error("Expected {expected}, got {actual}{}", located(.path))]
    TypeMismatch {
        expected: String,
        actual: String,
        path: String,
    },

    /// The value is present and well-typed but semantically invalid.
    #[error("{message}{}", located(.path))]
    InvalidData { message: String, path: String },

    /// The printer refused to serialize the tree.
    #[error("{message}")]
    Write { code: WriteErrorCode, message: String },
}

fn located(path: &str) -> String {
    if path.is_empty() {
        String::new()
    } else {
        format!(" (at {path})")
    }
}

impl Error {
    pub(crate) fn parse(code: ParseErrorCode, position: usize) -> Self {
        Error::Parse {
            code,
            position,
            message: code.as_str().to_string(),
        }
    }

    pub(crate) fn parse_with(code: ParseErrorCode, position: usize, detail: &str) -> Self {
        Error::Parse {
            code,
            position,
            message: format!("{}: {detail}", code.as_str()),
        }
    }

    /// Creates a missing-value error at `path`.
    pub fn missing_value(path: &CodingPath) -> Self {
        Error::MissingValue {
            path: path.render(),
        }
    }

    /// Creates a missing-key error. `path` is the path of the key itself.
    pub fn missing_key(key: &str, path: &CodingPath) -> Self {
        Error::MissingKey {
            key: key.to_string(),
            path: path.render(),
        }
    }

    /// Creates a type mismatch error.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use codable_json::{CodingPath, Error};
    ///
    /// let path = CodingPath::root().push_key("user").push_key("name");
    /// let err = Error::type_mismatch("string", "number", &path);
    /// assert_eq!(err.to_string(), "Expected string, got number (at user.name)");
    /// ```
    pub fn type_mismatch(expected: &str, actual: &str, path: &CodingPath) -> Self {
        Error::TypeMismatch {
            expected: expected.to_string(),
            actual: actual.to_string(),
            path: path.render(),
        }
    }

    /// Creates an invalid-data error.
    pub fn invalid_data(message: impl Into<String>, path: &CodingPath) -> Self {
        Error::InvalidData {
            message: message.into(),
            path: path.render(),
        }
    }

    pub(crate) fn write(code: WriteErrorCode, message: impl Into<String>) -> Self {
        Error::Write {
            code,
            message: message.into(),
        }
    }

    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Error::Parse { .. } => ErrorKind::Parse,
            Error::MissingValue { .. } => ErrorKind::MissingValue,
            Error::MissingKey { .. } => ErrorKind::MissingKey,
            Error::TypeMismatch { .. } => ErrorKind::TypeMismatch,
            Error::InvalidData { .. } => ErrorKind::InvalidData,
            Error::Write { .. } => ErrorKind::Write,
        }
    }

    /// Returns the rendered coding path, or `None` for parse and write errors.
    #[must_use]
    pub fn path(&self) -> Option<&str> {
        match self {
            Error::MissingValue { path }
            | Error::MissingKey { path, .. }
            | Error::TypeMismatch { path, .. }
            | Error::InvalidData { path, .. } => Some(path),
            Error::Parse { .. } | Error::Write { .. } => None,
        }
    }

    /// Fills in the path of errors raised without one (serde-originated
    /// errors know their message but not where they happened).
    pub(crate) fn at_path(self, path: &CodingPath) -> Self {
        match self {
            Error::MissingValue { path: p } if p.is_empty() => Error::missing_value(path),
            Error::MissingKey { key, path: p } if p.is_empty() => {
                let located = path.push_key(&key);
                Error::missing_key(&key, &located)
            }
            Error::TypeMismatch {
                expected,
                actual,
                path: p,
            } if p.is_empty() => Error::TypeMismatch {
                expected,
                actual,
                path: path.render(),
            },
            Error::InvalidData { message, path: p } if p.is_empty() => {
                Error::invalid_data(message, path)
            }
            other => other,
        }
    }
}

impl serde::de::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::InvalidData {
            message: msg.to_string(),
            path: String::new(),
        }
    }

    fn invalid_type(unexp: serde::de::Unexpected<'_>, exp: &dyn serde::de::Expected) -> Self {
        Error::TypeMismatch {
            expected: exp.to_string(),
            actual: unexp.to_string(),
            path: String::new(),
        }
    }

    fn missing_field(field: &'static str) -> Self {
        Error::MissingKey {
            key: field.to_string(),
            path: String::new(),
        }
    }
}

impl serde::ser::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::InvalidData {
            message: msg.to_string(),
            path: String::new(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
