//! Read and write flag sets, and the relaxed-syntax toggles.
//!
//! [`ReadOptions`] and [`WriteOptions`] are bit sets composed with `|`:
//!
//! ```rust
//! use codable_json::{ReadOptions, WriteOptions};
//!
//! let read = ReadOptions::ALLOW_COMMENTS | ReadOptions::ALLOW_TRAILING_COMMAS;
//! assert!(read.contains(ReadOptions::ALLOW_COMMENTS));
//! assert!(!read.contains(ReadOptions::ALLOW_UNQUOTED_KEYS));
//!
//! let write = WriteOptions::PRETTY | WriteOptions::SORTED_KEYS;
//! assert!(write.contains(WriteOptions::SORTED_KEYS));
//! ```

use std::fmt;
use std::ops::{BitOr, BitOrAssign};

macro_rules! flag_set {
    ($name:ident { $($(#[$doc:meta])* $flag:ident = $bit:expr;)* }) => {
        #[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
        pub struct $name(u32);

        impl $name {
            /// No flags set.
            pub const DEFAULT: Self = Self(0);
            $(
                $(#[$doc])*
                pub const $flag: Self = Self($bit);
            )*

            #[inline]
            #[must_use]
            pub const fn bits(self) -> u32 {
                self.0
            }

            /// Builds a set from raw bits, dropping bits with no meaning.
            #[must_use]
            pub const fn from_bits_truncate(bits: u32) -> Self {
                Self(bits & (0 $(| $bit)*))
            }

            #[inline]
            #[must_use]
            pub const fn contains(self, other: Self) -> bool {
                self.0 & other.0 == other.0
            }

            #[inline]
            #[must_use]
            pub const fn union(self, other: Self) -> Self {
                Self(self.0 | other.0)
            }

            #[inline]
            #[must_use]
            pub const fn is_empty(self) -> bool {
                self.0 == 0
            }

            #[inline]
            pub fn insert(&mut self, other: Self) {
                self.0 |= other.0;
            }

            #[inline]
            pub fn remove(&mut self, other: Self) {
                self.0 &= !other.0;
            }
        }

        impl BitOr for $name {
            type Output = Self;

            fn bitor(self, rhs: Self) -> Self {
                self.union(rhs)
            }
        }

        impl BitOrAssign for $name {
            fn bitor_assign(&mut self, rhs: Self) {
                self.insert(rhs);
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                let mut set = f.debug_set();
                $(
                    if self.contains(Self::$flag) {
                        set.entry(&stringify!($flag));
                    }
                )*
                set.finish()
            }
        }
    };
}

flag_set!(ReadOptions {
    /// Accepted for compatibility; zero-copy reading is provided by
    /// [`Document::parse_owned`](crate::Document::parse_owned).
    IN_SITU = 1 << 0;
    /// Stop after the first complete value instead of rejecting trailing content.
    STOP_WHEN_DONE = 1 << 1;
    /// Allow a single trailing comma at the end of an object or array.
    ALLOW_TRAILING_COMMAS = 1 << 2;
    /// Allow C-style `//` and `/* */` comments.
    ALLOW_COMMENTS = 1 << 3;
    /// Allow `inf`/`infinity`/`nan` literals, case-insensitive, optionally signed.
    ALLOW_INF_AND_NAN = 1 << 4;
    /// Keep every number as its raw literal text.
    NUMBER_AS_RAW = 1 << 5;
    /// Replace invalid UTF-8 and lone surrogates with U+FFFD instead of failing.
    ALLOW_INVALID_UNICODE = 1 << 6;
    /// Keep numbers that overflow 64-bit integers or `f64` as raw text.
    BIG_NUMBER_AS_RAW = 1 << 7;
    /// Skip a leading UTF-8 byte order mark.
    ALLOW_BOM = 1 << 8;
    /// Allow hex integers, a leading `+` and leading or trailing decimal points.
    ALLOW_EXTENDED_NUMBERS = 1 << 9;
    /// Allow JSON5 escapes: `\'`, `\v`, `\0`, `\xHH`, line continuations.
    ALLOW_EXTENDED_ESCAPES = 1 << 10;
    /// Allow the Unicode whitespace characters JSON5 accepts.
    ALLOW_EXTENDED_WHITESPACE = 1 << 11;
    /// Allow strings enclosed in single quotes.
    ALLOW_SINGLE_QUOTED_STRINGS = 1 << 12;
    /// Allow identifier-shaped object keys without quotes.
    ALLOW_UNQUOTED_KEYS = 1 << 13;
});

impl ReadOptions {
    /// Every JSON5 relaxation: trailing commas, comments, inf/nan, extended
    /// numbers, escapes and whitespace, single quotes and unquoted keys.
    pub const JSON5: Self = Self(
        Self::ALLOW_TRAILING_COMMAS.0
            | Self::ALLOW_COMMENTS.0
            | Self::ALLOW_INF_AND_NAN.0
            | Self::ALLOW_EXTENDED_NUMBERS.0
            | Self::ALLOW_EXTENDED_ESCAPES.0
            | Self::ALLOW_EXTENDED_WHITESPACE.0
            | Self::ALLOW_SINGLE_QUOTED_STRINGS.0
            | Self::ALLOW_UNQUOTED_KEYS.0,
    );
}

flag_set!(WriteOptions {
    /// Pretty-print with 4-space indentation.
    PRETTY = 1 << 0;
    /// Escape non-ASCII characters as `\uXXXX`.
    ESCAPE_UNICODE = 1 << 1;
    /// Escape `/` as `\/`.
    ESCAPE_SLASHES = 1 << 2;
    /// Write non-finite floats as `Infinity`, `-Infinity` and `NaN`.
    ALLOW_INF_AND_NAN = 1 << 3;
    /// Write non-finite floats as `null`.
    INF_AND_NAN_AS_NULL = 1 << 4;
    /// Pretty-print with 2-space indentation; wins over `PRETTY`.
    PRETTY_TWO_SPACES = 1 << 5;
    /// Terminate the output with `\n`.
    NEWLINE_AT_END = 1 << 6;
    /// Sort object keys by byte order before writing. Applied by the
    /// encoder, not by the printer.
    SORTED_KEYS = 1 << 7;
});

impl WriteOptions {
    pub(crate) fn indent_width(self) -> Option<usize> {
        if self.contains(Self::PRETTY_TWO_SPACES) {
            Some(2)
        } else if self.contains(Self::PRETTY) {
            Some(4)
        } else {
            None
        }
    }
}

/// Individually switchable JSON5 relaxations for decoding.
///
/// # Examples
///
/// ```rust
/// use codable_json::{Json5Options, ReadOptions};
///
/// let selective = Json5Options {
///     trailing_commas: true,
///     comments: true,
///     ..Json5Options::none()
/// };
/// assert_eq!(
///     selective.read_options(),
///     ReadOptions::ALLOW_TRAILING_COMMAS | ReadOptions::ALLOW_COMMENTS
/// );
/// assert_eq!(Json5Options::all().read_options(), ReadOptions::JSON5);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Json5Options {
    pub trailing_commas: bool,
    pub comments: bool,
    pub inf_and_nan: bool,
    pub extended_numbers: bool,
    pub extended_escapes: bool,
    pub extended_whitespace: bool,
    pub single_quoted_strings: bool,
    pub unquoted_keys: bool,
}

impl Json5Options {
    #[must_use]
    pub const fn none() -> Self {
        Self::uniform(false)
    }

    #[must_use]
    pub const fn all() -> Self {
        Self::uniform(true)
    }

    const fn uniform(value: bool) -> Self {
        Json5Options {
            trailing_commas: value,
            comments: value,
            inf_and_nan: value,
            extended_numbers: value,
            extended_escapes: value,
            extended_whitespace: value,
            single_quoted_strings: value,
            unquoted_keys: value,
        }
    }

    #[must_use]
    pub fn read_options(&self) -> ReadOptions {
        let toggles = [
            (self.trailing_commas, ReadOptions::ALLOW_TRAILING_COMMAS),
            (self.comments, ReadOptions::ALLOW_COMMENTS),
            (self.inf_and_nan, ReadOptions::ALLOW_INF_AND_NAN),
            (self.extended_numbers, ReadOptions::ALLOW_EXTENDED_NUMBERS),
            (self.extended_escapes, ReadOptions::ALLOW_EXTENDED_ESCAPES),
            (self.extended_whitespace, ReadOptions::ALLOW_EXTENDED_WHITESPACE),
            (self.single_quoted_strings, ReadOptions::ALLOW_SINGLE_QUOTED_STRINGS),
            (self.unquoted_keys, ReadOptions::ALLOW_UNQUOTED_KEYS),
        ];
        toggles
            .into_iter()
            .filter(|(enabled, _)| *enabled)
            .fold(ReadOptions::DEFAULT, |acc, (_, flag)| acc | flag)
    }
}

impl From<bool> for Json5Options {
    fn from(value: bool) -> Self {
        Self::uniform(value)
    }
}
