//! Numeric values as stored in documents and build trees.

use std::fmt;

/// A JSON number.
///
/// Integers without a fraction or exponent are kept exactly: non-negative
/// values as [`Number::PosInt`], negative values as [`Number::NegInt`].
/// Everything else is a [`Number::Float`], which may be non-finite when the
/// document was read with inf/nan literals allowed.
///
/// # Examples
///
/// ```rust
/// use codable_json::Number;
///
/// assert_eq!(Number::from(-3i64), Number::NegInt(-3));
/// assert_eq!(Number::from(3i64), Number::PosInt(3));
/// assert_eq!(Number::from(u64::MAX).as_u64(), Some(u64::MAX));
/// assert_eq!(Number::Float(2.0).as_i64(), Some(2));
/// assert_eq!(Number::Float(2.5).as_i64(), None);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Number {
    PosInt(u64),
    NegInt(i64),
    Float(f64),
}

impl Number {
    #[inline]
    #[must_use]
    pub const fn is_integer(&self) -> bool {
        matches!(self, Number::PosInt(_) | Number::NegInt(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_float(&self) -> bool {
        matches!(self, Number::Float(_))
    }

    #[inline]
    #[must_use]
    pub fn is_finite(&self) -> bool {
        match self {
            Number::Float(f) => f.is_finite(),
            _ => true,
        }
    }

    /// Returns the value as `i64` when it is an integer in range, or an
    /// integral float in range.
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match *self {
            Number::PosInt(u) => i64::try_from(u).ok(),
            Number::NegInt(i) => Some(i),
            Number::Float(f) => integral_i128(f).and_then(|v| i64::try_from(v).ok()),
        }
    }

    #[must_use]
    pub fn as_u64(&self) -> Option<u64> {
        match *self {
            Number::PosInt(u) => Some(u),
            Number::NegInt(_) => None,
            Number::Float(f) => integral_i128(f).and_then(|v| u64::try_from(v).ok()),
        }
    }

    /// Returns the value as an integer wide enough for both `i64` and `u64`.
    #[must_use]
    pub fn as_i128(&self) -> Option<i128> {
        match *self {
            Number::PosInt(u) => Some(i128::from(u)),
            Number::NegInt(i) => Some(i128::from(i)),
            Number::Float(f) => integral_i128(f),
        }
    }

    #[must_use]
    pub fn as_f64(&self) -> f64 {
        match *self {
            Number::PosInt(u) => u as f64,
            Number::NegInt(i) => i as f64,
            Number::Float(f) => f,
        }
    }
}

// -2^63 and 2^64 bound every value that can land in i64 or u64.
const I64_MIN_F: f64 = -9_223_372_036_854_775_808.0;
const U64_END_F: f64 = 18_446_744_073_709_551_616.0;

fn integral_i128(f: f64) -> Option<i128> {
    if f.is_finite() && f.fract() == 0.0 && (I64_MIN_F..U64_END_F).contains(&f) {
        Some(f as i128)
    } else {
        None
    }
}

/// Number literal text kept raw by the reader, classified once so every
/// scalar coercion reads it the same way.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum RawNumber {
    /// Decimal or `0x` hex integer text, optionally signed.
    Integer(i128),
    /// Text with a fraction or exponent, or digits too wide for `i128`.
    Float(f64),
    /// An `inf`, `infinity` or `nan` literal, optionally signed.
    Named(f64),
}

impl RawNumber {
    pub(crate) fn parse(text: &str) -> Option<Self> {
        if let Ok(value) = text.parse::<i128>() {
            return Some(RawNumber::Integer(value));
        }
        let unsigned = text.strip_prefix('+').unwrap_or(text);
        let (negative, body) = match unsigned.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, unsigned),
        };
        if let Some(hex) = body.strip_prefix("0x").or_else(|| body.strip_prefix("0X")) {
            let magnitude = i128::from_str_radix(hex, 16).ok()?;
            return Some(RawNumber::Integer(if negative { -magnitude } else { magnitude }));
        }
        let value = text.parse::<f64>().ok()?;
        if body.starts_with(|c: char| c.is_ascii_alphabetic()) {
            Some(RawNumber::Named(value))
        } else {
            Some(RawNumber::Float(value))
        }
    }

    /// The integer value, for integer text or an integral float.
    pub(crate) fn as_i128(self) -> Option<i128> {
        match self {
            RawNumber::Integer(value) => Some(value),
            RawNumber::Float(f) => integral_i128(f),
            RawNumber::Named(_) => None,
        }
    }

    pub(crate) fn as_f64(self) -> f64 {
        match self {
            RawNumber::Integer(value) => value as f64,
            RawNumber::Float(f) | RawNumber::Named(f) => f,
        }
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Number::PosInt(u) => f.write_str(itoa::Buffer::new().format(u)),
            Number::NegInt(i) => f.write_str(itoa::Buffer::new().format(i)),
            Number::Float(v) if v.is_nan() => f.write_str("NaN"),
            Number::Float(v) if v.is_infinite() => {
                f.write_str(if v > 0.0 { "Infinity" } else { "-Infinity" })
            }
            Number::Float(v) => f.write_str(ryu::Buffer::new().format_finite(v)),
        }
    }
}

macro_rules! number_from_signed {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Number {
                fn from(value: $ty) -> Self {
                    let value = value as i64;
                    if value < 0 {
                        Number::NegInt(value)
                    } else {
                        Number::PosInt(value as u64)
                    }
                }
            }
        )*
    };
}

macro_rules! number_from_unsigned {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Number {
                fn from(value: $ty) -> Self {
                    Number::PosInt(value as u64)
                }
            }
        )*
    };
}

number_from_signed!(i8, i16, i32, i64, isize);
number_from_unsigned!(u8, u16, u32, u64, usize);

impl From<f32> for Number {
    fn from(value: f32) -> Self {
        Number::Float(f64::from(value))
    }
}

impl From<f64> for Number {
    fn from(value: f64) -> Self {
        Number::Float(value)
    }
}
