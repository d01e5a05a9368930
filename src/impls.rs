//! [`Decode`] and [`Encode`] for standard library and third-party types.

use crate::decode::{Decode, DecodeContext};
use crate::document::NodeKind;
use crate::encode::{Encode, EncodeContext};
use crate::error::{Error, Result};
use crate::path::CodingPath;
use crate::strategy::{DataDecodingStrategy, DataEncodingStrategy, DateDecodingStrategy, DateEncodingStrategy};
use base64::{engine::general_purpose, Engine as _};
use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use indexmap::IndexMap;
use num_bigint::BigInt;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};
use std::fmt::{self, Write as _};
use std::hash::Hash;
use std::ops::Deref;
use std::rc::Rc;
use std::sync::Arc;

impl Decode for bool {
    fn decode(ctx: DecodeContext<'_>) -> Result<Self> {
        ctx.single_value().decode_bool()
    }
}

impl Encode for bool {
    fn encode(&self, ctx: EncodeContext<'_>) -> Result<()> {
        ctx.single_value().encode_bool(*self)
    }
}

macro_rules! signed {
    ($($ty:ident)*) => {
        $(
            impl Decode for $ty {
                fn decode(ctx: DecodeContext<'_>) -> Result<Self> {
                    ctx.single_value().integer("integer", stringify!($ty))
                }
            }

            impl Encode for $ty {
                fn encode(&self, ctx: EncodeContext<'_>) -> Result<()> {
                    ctx.single_value().encode_i64(*self as i64)
                }
            }
        )*
    };
}

macro_rules! unsigned {
    ($($ty:ident)*) => {
        $(
            impl Decode for $ty {
                fn decode(ctx: DecodeContext<'_>) -> Result<Self> {
                    ctx.single_value().integer("unsigned integer", stringify!($ty))
                }
            }

            impl Encode for $ty {
                fn encode(&self, ctx: EncodeContext<'_>) -> Result<()> {
                    ctx.single_value().encode_u64(*self as u64)
                }
            }
        )*
    };
}

signed!(i8 i16 i32 i64 isize);
unsigned!(u8 u16 u32 u64 usize);

/// Text of a raw-number or string node, for types wider than 64 bits.
fn wide_text<'a>(ctx: &DecodeContext<'a>) -> Option<&'a str> {
    let node = ctx.node()?;
    node.as_raw().or_else(|| node.as_str())
}

fn text_mismatch(expected: &str, ctx: &DecodeContext<'_>) -> Error {
    Error::type_mismatch(expected, kind_name(ctx.node().map(|node| node.kind())), ctx.path())
}

impl Decode for i128 {
    fn decode(ctx: DecodeContext<'_>) -> Result<Self> {
        match wide_text(&ctx) {
            Some(text) => text.parse().map_err(|_| text_mismatch("integer", &ctx)),
            None => ctx.single_value().integer("integer", "i128"),
        }
    }
}

impl Encode for i128 {
    fn encode(&self, ctx: EncodeContext<'_>) -> Result<()> {
        match i64::try_from(*self) {
            Ok(small) => ctx.single_value().encode_i64(small),
            Err(_) => match u64::try_from(*self) {
                Ok(small) => ctx.single_value().encode_u64(small),
                Err(_) => ctx.single_value().encode_raw_number(&self.to_string()),
            },
        }
    }
}

impl Decode for u128 {
    fn decode(ctx: DecodeContext<'_>) -> Result<Self> {
        match wide_text(&ctx) {
            Some(text) => text.parse().map_err(|_| text_mismatch("unsigned integer", &ctx)),
            None => ctx.single_value().integer("unsigned integer", "u128"),
        }
    }
}

impl Encode for u128 {
    fn encode(&self, ctx: EncodeContext<'_>) -> Result<()> {
        match u64::try_from(*self) {
            Ok(small) => ctx.single_value().encode_u64(small),
            Err(_) => ctx.single_value().encode_raw_number(&self.to_string()),
        }
    }
}

impl Decode for BigInt {
    fn decode(ctx: DecodeContext<'_>) -> Result<Self> {
        match wide_text(&ctx) {
            Some(text) => text.parse().map_err(|_| text_mismatch("integer", &ctx)),
            None => ctx.single_value().integer::<i128>("integer", "i128").map(BigInt::from),
        }
    }
}

impl Encode for BigInt {
    fn encode(&self, ctx: EncodeContext<'_>) -> Result<()> {
        if let Ok(small) = i64::try_from(self) {
            return ctx.single_value().encode_i64(small);
        }
        if let Ok(small) = u64::try_from(self) {
            return ctx.single_value().encode_u64(small);
        }
        ctx.single_value().encode_raw_number(&self.to_string())
    }
}

impl Decode for f64 {
    fn decode(ctx: DecodeContext<'_>) -> Result<Self> {
        ctx.single_value().decode_f64()
    }
}

impl Encode for f64 {
    fn encode(&self, ctx: EncodeContext<'_>) -> Result<()> {
        ctx.single_value().encode_f64(*self)
    }
}

impl Decode for f32 {
    fn decode(ctx: DecodeContext<'_>) -> Result<Self> {
        ctx.single_value().decode_f32()
    }
}

impl Encode for f32 {
    fn encode(&self, ctx: EncodeContext<'_>) -> Result<()> {
        ctx.single_value().encode_f32(*self)
    }
}

impl Decode for String {
    fn decode(ctx: DecodeContext<'_>) -> Result<Self> {
        ctx.single_value().decode_string()
    }
}

impl Encode for String {
    fn encode(&self, ctx: EncodeContext<'_>) -> Result<()> {
        ctx.single_value().encode_str(self)
    }
}

impl Encode for str {
    fn encode(&self, ctx: EncodeContext<'_>) -> Result<()> {
        ctx.single_value().encode_str(self)
    }
}

impl Decode for char {
    fn decode(ctx: DecodeContext<'_>) -> Result<Self> {
        ctx.single_value().decode_char()
    }
}

impl Encode for char {
    fn encode(&self, ctx: EncodeContext<'_>) -> Result<()> {
        ctx.single_value().encode_str(self.encode_utf8(&mut [0; 4]))
    }
}

/// `()` is `null` on the wire.
impl Decode for () {
    fn decode(ctx: DecodeContext<'_>) -> Result<Self> {
        match ctx.node() {
            Some(node) if !node.is_null() => {
                Err(Error::type_mismatch("null", node.kind().type_name(), ctx.path()))
            }
            _ => Ok(()),
        }
    }
}

impl Encode for () {
    fn encode(&self, ctx: EncodeContext<'_>) -> Result<()> {
        ctx.single_value().encode_null()
    }
}

impl<T: Decode> Decode for Option<T> {
    fn decode(ctx: DecodeContext<'_>) -> Result<Self> {
        if ctx.is_null() {
            Ok(None)
        } else {
            T::decode(ctx).map(Some)
        }
    }

    fn absent() -> Option<Self> {
        Some(None)
    }
}

impl<T: Encode> Encode for Option<T> {
    fn encode(&self, ctx: EncodeContext<'_>) -> Result<()> {
        match self {
            Some(value) => value.encode(ctx),
            None => ctx.single_value().encode_null(),
        }
    }
}

impl<T: Encode + ?Sized> Encode for &T {
    fn encode(&self, ctx: EncodeContext<'_>) -> Result<()> {
        (**self).encode(ctx)
    }
}

macro_rules! pointer {
    ($($ptr:ident)*) => {
        $(
            impl<T: Decode> Decode for $ptr<T> {
                fn decode(ctx: DecodeContext<'_>) -> Result<Self> {
                    T::decode(ctx).map($ptr::new)
                }

                fn absent() -> Option<Self> {
                    T::absent().map($ptr::new)
                }
            }

            impl<T: Encode + ?Sized> Encode for $ptr<T> {
                fn encode(&self, ctx: EncodeContext<'_>) -> Result<()> {
                    (**self).encode(ctx)
                }
            }
        )*
    };
}

pointer!(Box Rc Arc);

macro_rules! sequence {
    ($($seq:ident<T $(: $bound:ident $(+ $rest:ident)*)?> => $push:ident),* $(,)?) => {
        $(
            impl<T: Decode $(+ $bound $(+ $rest)*)?> Decode for $seq<T> {
                fn decode(ctx: DecodeContext<'_>) -> Result<Self> {
                    let mut indexed = ctx.indexed()?;
                    let mut out = $seq::new();
                    while !indexed.is_at_end() {
                        out.$push(indexed.decode_next()?);
                    }
                    Ok(out)
                }
            }

            impl<T: Encode> Encode for $seq<T> {
                fn encode(&self, ctx: EncodeContext<'_>) -> Result<()> {
                    let mut indexed = ctx.indexed();
                    for item in self {
                        indexed.encode(item)?;
                    }
                    Ok(())
                }
            }
        )*
    };
}

sequence! {
    Vec<T> => push,
    VecDeque<T> => push_back,
    BTreeSet<T: Ord> => insert,
    HashSet<T: Eq + Hash> => insert,
}

impl<T: Encode> Encode for [T] {
    fn encode(&self, ctx: EncodeContext<'_>) -> Result<()> {
        let mut indexed = ctx.indexed();
        for item in self {
            indexed.encode(item)?;
        }
        Ok(())
    }
}

impl<T: Encode, const N: usize> Encode for [T; N] {
    fn encode(&self, ctx: EncodeContext<'_>) -> Result<()> {
        self.as_slice().encode(ctx)
    }
}

macro_rules! string_map {
    ($($map:ident),*) => {
        $(
            /// Keys pass through the key strategy. Duplicate keys keep their
            /// first value.
            impl<V: Decode> Decode for $map<String, V> {
                fn decode(ctx: DecodeContext<'_>) -> Result<Self> {
                    let keyed = ctx.keyed()?;
                    let mut out = $map::new();
                    for (key, value) in keyed.entries() {
                        if !out.contains_key(&key) {
                            let value = V::decode(value)?;
                            out.insert(key, value);
                        }
                    }
                    Ok(out)
                }
            }

            impl<V: Encode> Encode for $map<String, V> {
                fn encode(&self, ctx: EncodeContext<'_>) -> Result<()> {
                    let mut keyed = ctx.keyed();
                    for (key, value) in self {
                        keyed.encode(key, value)?;
                    }
                    Ok(())
                }
            }
        )*
    };
}

string_map!(HashMap, BTreeMap, IndexMap);

macro_rules! tuple {
    ($(($($name:ident)+))*) => {
        $(
            impl<$($name: Decode),+> Decode for ($($name,)+) {
                fn decode(ctx: DecodeContext<'_>) -> Result<Self> {
                    let mut indexed = ctx.indexed()?;
                    let value = ($(indexed.decode_next::<$name>()?,)+);
                    indexed.ensure_at_end()?;
                    Ok(value)
                }
            }

            impl<$($name: Encode),+> Encode for ($($name,)+) {
                #[allow(non_snake_case)]
                fn encode(&self, ctx: EncodeContext<'_>) -> Result<()> {
                    let ($($name,)+) = self;
                    let mut indexed = ctx.indexed();
                    $(indexed.encode($name)?;)+
                    Ok(())
                }
            }
        )*
    };
}

tuple! {
    (A)
    (A B)
    (A B C)
    (A B C D)
}

/// Decodes according to [`DateDecodingStrategy`].
impl Decode for DateTime<Utc> {
    fn decode(ctx: DecodeContext<'_>) -> Result<Self> {
        let path = ctx.path().clone();
        match &ctx.options().date_strategy {
            DateDecodingStrategy::Deferred | DateDecodingStrategy::Iso8601 => {
                let text = ctx.single_value().decode_str()?;
                DateTime::parse_from_rfc3339(&text)
                    .map(|date| date.with_timezone(&Utc))
                    .map_err(|_| {
                        Error::invalid_data("expected date string to be ISO8601-formatted", &path)
                    })
            }
            DateDecodingStrategy::SecondsSince1970 => {
                let seconds = ctx.single_value().decode_f64()?;
                from_epoch_seconds(seconds, &path)
            }
            DateDecodingStrategy::MillisecondsSince1970 => {
                let millis = ctx.single_value().decode_f64()?;
                from_epoch_seconds(millis / 1000.0, &path)
            }
            DateDecodingStrategy::Formatted(format) => {
                let text = ctx.single_value().decode_str()?;
                parse_formatted(&text, format).ok_or_else(|| {
                    Error::invalid_data(
                        format!("date string {text:?} does not match format {format:?}"),
                        &path,
                    )
                })
            }
            DateDecodingStrategy::Custom(decoder) => decoder(ctx),
        }
    }
}

/// Encodes according to [`DateEncodingStrategy`].
impl Encode for DateTime<Utc> {
    fn encode(&self, ctx: EncodeContext<'_>) -> Result<()> {
        match &ctx.options().date_strategy {
            DateEncodingStrategy::Deferred => ctx
                .single_value()
                .encode_str(&self.to_rfc3339_opts(SecondsFormat::AutoSi, true)),
            DateEncodingStrategy::Iso8601 => ctx
                .single_value()
                .encode_str(&self.to_rfc3339_opts(SecondsFormat::Millis, true)),
            DateEncodingStrategy::SecondsSince1970 => {
                ctx.single_value().encode_f64(epoch_seconds(self))
            }
            DateEncodingStrategy::MillisecondsSince1970 => {
                ctx.single_value().encode_f64(epoch_seconds(self) * 1000.0)
            }
            DateEncodingStrategy::Formatted(format) => {
                let mut text = String::new();
                if write!(text, "{}", self.format(format)).is_err() {
                    return Err(Error::invalid_data(
                        format!("invalid date format {format:?}"),
                        ctx.path(),
                    ));
                }
                ctx.single_value().encode_str(&text)
            }
            DateEncodingStrategy::Custom(encoder) => encoder(self, ctx),
        }
    }
}

fn epoch_seconds(date: &DateTime<Utc>) -> f64 {
    date.timestamp() as f64 + f64::from(date.timestamp_subsec_nanos()) / 1e9
}

fn from_epoch_seconds(seconds: f64, path: &CodingPath) -> Result<DateTime<Utc>> {
    let out_of_range = || Error::invalid_data(format!("timestamp {seconds} is out of range"), path);
    if !seconds.is_finite() || seconds.abs() >= 9.2e18 {
        return Err(out_of_range());
    }
    let nanos_total = (seconds * 1e9).round();
    let (whole, nanos) = if nanos_total.abs() < 9.2e18 {
        let nanos_total = nanos_total as i64;
        (
            nanos_total.div_euclid(1_000_000_000),
            nanos_total.rem_euclid(1_000_000_000) as u32,
        )
    } else {
        (seconds.floor() as i64, 0)
    };
    DateTime::from_timestamp(whole, nanos).ok_or_else(out_of_range)
}

/// Tries the format as a zoned date-time, a naive date-time (UTC), then a
/// bare date at midnight UTC.
fn parse_formatted(text: &str, format: &str) -> Option<DateTime<Utc>> {
    if let Ok(date) = DateTime::parse_from_str(text, format) {
        return Some(date.with_timezone(&Utc));
    }
    if let Ok(date) = NaiveDateTime::parse_from_str(text, format) {
        return Some(date.and_utc());
    }
    NaiveDate::parse_from_str(text, format)
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|date| date.and_utc())
}

/// Binary data, coded according to the data strategy in effect.
///
/// # Examples
///
/// ```rust
/// use codable_json::{encode_to_string, Bytes};
///
/// let json = encode_to_string(&Bytes::from(b"hi!".to_vec()))?;
/// assert_eq!(json, r#""aGkh""#);
/// # Ok::<(), codable_json::Error>(())
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Bytes(pub Vec<u8>);

impl Bytes {
    #[must_use]
    pub fn into_inner(self) -> Vec<u8> {
        self.0
    }
}

impl From<Vec<u8>> for Bytes {
    fn from(bytes: Vec<u8>) -> Self {
        Bytes(bytes)
    }
}

impl From<&[u8]> for Bytes {
    fn from(bytes: &[u8]) -> Self {
        Bytes(bytes.to_vec())
    }
}

impl Deref for Bytes {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        &self.0
    }
}

impl AsRef<[u8]> for Bytes {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl Decode for Bytes {
    fn decode(ctx: DecodeContext<'_>) -> Result<Self> {
        decode_bytes(ctx).map(Bytes)
    }
}

impl Encode for Bytes {
    fn encode(&self, ctx: EncodeContext<'_>) -> Result<()> {
        encode_bytes(&self.0, ctx)
    }
}

/// Reads binary data according to the data strategy in effect.
pub(crate) fn decode_bytes(ctx: DecodeContext<'_>) -> Result<Vec<u8>> {
    match &ctx.options().data_strategy {
        DataDecodingStrategy::Base64 => {
            let path = ctx.path().clone();
            let text = ctx.single_value().decode_str()?;
            general_purpose::STANDARD
                .decode(text.as_bytes())
                .map_err(|_| Error::invalid_data("encountered data is not valid base64", &path))
        }
        DataDecodingStrategy::Deferred => Vec::<u8>::decode(ctx),
        DataDecodingStrategy::Custom(decoder) => decoder(ctx),
    }
}

/// Writes binary data according to the data strategy in effect.
pub(crate) fn encode_bytes(data: &[u8], ctx: EncodeContext<'_>) -> Result<()> {
    match &ctx.options().data_strategy {
        DataEncodingStrategy::Base64 => ctx
            .single_value()
            .encode_str(&general_purpose::STANDARD.encode(data)),
        DataEncodingStrategy::Deferred => data.encode(ctx),
        DataEncodingStrategy::Custom(encoder) => encoder(data, ctx),
    }
}

/// Serialized with `serialize_bytes`, so serde-driven encoding applies the
/// data strategy too.
impl Serialize for Bytes {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_bytes(&self.0)
    }
}

impl<'de> Deserialize<'de> for Bytes {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct BytesVisitor;

        impl<'de> serde::de::Visitor<'de> for BytesVisitor {
            type Value = Bytes;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("bytes")
            }

            fn visit_bytes<E: serde::de::Error>(self, v: &[u8]) -> std::result::Result<Bytes, E> {
                Ok(Bytes(v.to_vec()))
            }

            fn visit_byte_buf<E: serde::de::Error>(self, v: Vec<u8>) -> std::result::Result<Bytes, E> {
                Ok(Bytes(v))
            }

            fn visit_seq<A: serde::de::SeqAccess<'de>>(
                self,
                mut seq: A,
            ) -> std::result::Result<Bytes, A::Error> {
                let mut out = Vec::with_capacity(seq.size_hint().unwrap_or(0));
                while let Some(byte) = seq.next_element()? {
                    out.push(byte);
                }
                Ok(Bytes(out))
            }
        }

        deserializer.deserialize_byte_buf(BytesVisitor)
    }
}

/// A kind name for diagnostics about a possibly absent node.
pub(crate) fn kind_name(kind: Option<NodeKind>) -> &'static str {
    kind.map_or("nothing", NodeKind::type_name)
}

#[cfg(test)]
mod tests {
    use crate::{
        decode, decode_with_options, encode_to_string, encode_to_string_with_options, DecodeOptions,
        EncodeOptions, ErrorKind, ReadOptions,
    };
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_integer_widths() {
        assert_eq!(decode::<u8>(b"255").unwrap(), 255);
        assert_eq!(decode::<u8>(b"256").unwrap_err().kind(), ErrorKind::InvalidData);
        assert_eq!(decode::<i16>(b"-32768").unwrap(), i16::MIN);
        assert_eq!(decode::<usize>(b"\"12\"").unwrap(), 12);
        assert_eq!(encode_to_string(&-5i8).unwrap(), "-5");
        assert_eq!(encode_to_string(&u64::MAX).unwrap(), "18446744073709551615");
    }

    #[test]
    fn test_wide_integers_use_raw_text() {
        let big = i128::MAX;
        let json = encode_to_string(&big).unwrap();
        assert_eq!(json, big.to_string());

        let options = DecodeOptions::new().with_read_options(ReadOptions::BIG_NUMBER_AS_RAW);
        assert_eq!(decode_with_options::<i128>(json.as_bytes(), &options).unwrap(), big);
        assert_eq!(decode::<u128>(b"\"340282366920938463463374607431768211455\"").unwrap(), u128::MAX);
        assert_eq!(decode::<i128>(b"-12").unwrap(), -12);

        let huge: BigInt = "-123456789012345678901234567890".parse().unwrap();
        let json = encode_to_string(&huge).unwrap();
        assert_eq!(decode_with_options::<BigInt>(json.as_bytes(), &options).unwrap(), huge);
        assert_eq!(decode::<BigInt>(b"42").unwrap(), BigInt::from(42));
    }

    #[test]
    fn test_option_and_unit() {
        assert_eq!(decode::<Option<u8>>(b"null").unwrap(), None);
        assert_eq!(decode::<Option<u8>>(b"7").unwrap(), Some(7));
        assert_eq!(encode_to_string(&None::<u8>).unwrap(), "null");
        assert!(decode::<()>(b"null").is_ok());
        assert_eq!(decode::<()>(b"1").unwrap_err().kind(), ErrorKind::TypeMismatch);
    }

    #[test]
    fn test_collections() {
        let set: BTreeSet<String> = decode(br#"["b","a","b"]"#).unwrap();
        assert_eq!(set.into_iter().collect::<Vec<_>>(), vec!["a", "b"]);

        let deque: VecDeque<i32> = decode(b"[1,2]").unwrap();
        assert_eq!(encode_to_string(&deque).unwrap(), "[1,2]");
        assert_eq!(encode_to_string(&[true, false]).unwrap(), "[true,false]");

        let tuple: (u8, String, Option<bool>) = decode(br#"[1,"x",null]"#).unwrap();
        assert_eq!(tuple, (1, "x".to_string(), None));
        assert_eq!(encode_to_string(&tuple).unwrap(), r#"[1,"x",null]"#);
    }

    #[test]
    fn test_maps_keep_first_duplicate_and_order() {
        let map: IndexMap<String, i32> = decode(br#"{"z":1,"a":2,"z":3}"#).unwrap();
        assert_eq!(map.len(), 2);
        assert_eq!(map["z"], 1);
        assert_eq!(map.keys().collect::<Vec<_>>(), vec!["z", "a"]);

        let sorted: BTreeMap<String, i32> = map.clone().into_iter().collect();
        assert_eq!(encode_to_string(&sorted).unwrap(), r#"{"a":2,"z":1}"#);
    }

    #[test]
    fn test_date_strategies() {
        let date = Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 0).unwrap();
        let cases = [
            (DateEncodingStrategy::Deferred, DateDecodingStrategy::Deferred, r#""2024-03-01T12:30:00Z""#),
            (DateEncodingStrategy::Iso8601, DateDecodingStrategy::Iso8601, r#""2024-03-01T12:30:00.000Z""#),
            (DateEncodingStrategy::SecondsSince1970, DateDecodingStrategy::SecondsSince1970, "1709296200.0"),
            (
                DateEncodingStrategy::MillisecondsSince1970,
                DateDecodingStrategy::MillisecondsSince1970,
                "1709296200000.0",
            ),
            (
                DateEncodingStrategy::Formatted("%Y-%m-%d %H:%M".into()),
                DateDecodingStrategy::Formatted("%Y-%m-%d %H:%M".into()),
                r#""2024-03-01 12:30""#,
            ),
        ];
        for (encode_strategy, decode_strategy, expected) in cases {
            let options = EncodeOptions::new().with_date_strategy(encode_strategy);
            let json = encode_to_string_with_options(&date, &options).unwrap();
            assert_eq!(json, expected);

            let options = DecodeOptions::new().with_date_strategy(decode_strategy);
            let back: DateTime<Utc> = decode_with_options(json.as_bytes(), &options).unwrap();
            assert_eq!(back, date);
        }
    }

    #[test]
    fn test_date_errors_carry_paths() {
        let err = decode::<Vec<DateTime<Utc>>>(br#"["yesterday"]"#).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidData);
        assert_eq!(err.path(), Some("Index 0"));

        let options = DecodeOptions::new().with_date_strategy(DateDecodingStrategy::Formatted("%Y-%m-%d".into()));
        let date: DateTime<Utc> = decode_with_options(br#""2020-02-29""#, &options).unwrap();
        assert_eq!(date, Utc.with_ymd_and_hms(2020, 2, 29, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_epoch_before_1970() {
        let path = CodingPath::root();
        let date = from_epoch_seconds(-1.5, &path).unwrap();
        assert_eq!(date.timestamp(), -2);
        assert_eq!(date.timestamp_subsec_millis(), 500);
        assert!(from_epoch_seconds(f64::NAN, &path).is_err());
        assert!(from_epoch_seconds(1e300, &path).is_err());
    }

    #[test]
    fn test_bytes_strategies() {
        let bytes = Bytes(vec![0, 1, 254, 255]);
        assert_eq!(encode_to_string(&bytes).unwrap(), r#""AAH+/w==""#);
        assert_eq!(decode::<Bytes>(br#""AAH+/w==""#).unwrap(), bytes);

        let err = decode::<Bytes>(br#""not base64!""#).unwrap_err();
        assert_eq!(err.to_string(), "encountered data is not valid base64");

        let options = EncodeOptions::new().with_data_strategy(DataEncodingStrategy::Deferred);
        assert_eq!(encode_to_string_with_options(&bytes, &options).unwrap(), "[0,1,254,255]");
        let options = DecodeOptions::new().with_data_strategy(DataDecodingStrategy::Deferred);
        assert_eq!(decode_with_options::<Bytes>(b"[0,1,254,255]", &options).unwrap(), bytes);

        let options = EncodeOptions::new().with_data_strategy(DataEncodingStrategy::custom(
            |data, ctx| ctx.single_value().encode_u64(data.len() as u64),
        ));
        assert_eq!(encode_to_string_with_options(&bytes, &options).unwrap(), "4");
    }

    #[test]
    fn test_char() {
        assert_eq!(decode::<char>("\"\u{e9}\"".as_bytes()).unwrap(), '\u{e9}');
        assert_eq!(decode::<char>(br#""ab""#).unwrap_err().kind(), ErrorKind::InvalidData);
        assert_eq!(encode_to_string(&'x').unwrap(), r#""x""#);
    }

    #[test]
    fn test_kind_name() {
        assert_eq!(kind_name(None), "nothing");
        assert_eq!(kind_name(Some(NodeKind::Array)), "array");
    }
}
