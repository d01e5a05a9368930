//! Deserialize any `serde::Deserialize` type from a parsed [`Document`].
//!
//! The [`Deserializer`] reads through a [`DecodeContext`], so serde types
//! get the same coercion rules, key strategies, data strategy, non-finite
//! float policy and error paths as hand-written [`Decode`] impls.
//!
//! ```rust
//! use codable_json::from_str;
//! use serde::Deserialize;
//!
//! #[derive(Deserialize, Debug, PartialEq)]
//! struct User {
//!     id: u32,
//!     name: String,
//!     #[serde(default)]
//!     tags: Vec<String>,
//! }
//!
//! let user: User = from_str(r#"{"id": "7", "name": "Ada"}"#)?;
//! assert_eq!(user, User { id: 7, name: "Ada".into(), tags: vec![] });
//! # Ok::<(), codable_json::Error>(())
//! ```
//!
//! Enums are read externally tagged, as the serializer writes them.

use crate::decode::{decode_document, decode_owned, decode_with_options, Decode, DecodeContext, DecodeOptions, IndexedDecoder};
use crate::document::{Document, NodeKind};
use crate::error::{Error, Result};
use crate::impls::{decode_bytes, kind_name};
use crate::number::{Number, RawNumber};
use crate::path::CodingPath;
use crate::ser::Serde;
use serde::de::{self, DeserializeOwned, DeserializeSeed, IntoDeserializer, Visitor};
use std::borrow::Cow;
use std::collections::HashSet;
use std::io;
use std::vec;

impl<T: DeserializeOwned> Decode for Serde<T> {
    fn decode(ctx: DecodeContext<'_>) -> Result<Self> {
        T::deserialize(Deserializer::new(ctx)).map(Serde)
    }
}

/// Deserializes a `T` from JSON bytes.
///
/// # Errors
///
/// Returns a parse error for malformed input, or a decode error locating
/// the first value `T` could not accept.
pub fn from_slice<T: DeserializeOwned>(input: &[u8]) -> Result<T> {
    from_slice_with_options(input, &DecodeOptions::default())
}

/// Deserializes a `T` from JSON bytes with the given options.
///
/// # Errors
///
/// Same as [`from_slice`].
pub fn from_slice_with_options<T: DeserializeOwned>(input: &[u8], options: &DecodeOptions) -> Result<T> {
    decode_with_options::<Serde<T>>(input, options).map(|Serde(value)| value)
}

/// Deserializes a `T` from a JSON string.
///
/// # Errors
///
/// Same as [`from_slice`].
pub fn from_str<T: DeserializeOwned>(input: &str) -> Result<T> {
    from_slice(input.as_bytes())
}

/// Reads the whole of `reader` and deserializes a `T` from it.
///
/// # Errors
///
/// Same as [`from_slice`], plus [`Error::InvalidData`] when reading fails.
pub fn from_reader<R, T>(mut reader: R) -> Result<T>
where
    R: io::Read,
    T: DeserializeOwned,
{
    let mut buffer = Vec::new();
    reader
        .read_to_end(&mut buffer)
        .map_err(|err| Error::invalid_data(format!("read failed: {err}"), &CodingPath::root()))?;
    decode_owned::<Serde<T>>(buffer, &DecodeOptions::default()).map(|Serde(value)| value)
}

/// Deserializes a `T` from an already parsed document.
///
/// # Errors
///
/// Same as [`from_slice`], minus parse errors.
pub fn from_document<T: DeserializeOwned>(document: &Document, options: &DecodeOptions) -> Result<T> {
    decode_document::<Serde<T>>(document, options).map(|Serde(value)| value)
}

/// A `serde::Deserializer` reading one node through a [`DecodeContext`].
pub struct Deserializer<'de> {
    ctx: DecodeContext<'de>,
}

impl<'de> Deserializer<'de> {
    #[must_use]
    pub fn new(ctx: DecodeContext<'de>) -> Self {
        Deserializer { ctx }
    }

    fn kind(&self) -> Option<NodeKind> {
        self.ctx.node().map(|node| node.kind())
    }

    fn mismatch(&self, expected: &str) -> Error {
        Error::type_mismatch(expected, kind_name(self.kind()), self.ctx.path())
    }
}

/// Runs a visitor, giving path-less errors the path of `ctx`.
fn located<T>(path: &CodingPath, result: Result<T>) -> Result<T> {
    result.map_err(|err| err.at_path(path))
}

macro_rules! deserialize_integer {
    ($($method:ident => $visit:ident: $ty:ident, $expected:literal;)*) => {
        $(
            fn $method<V>(self, visitor: V) -> Result<V::Value>
            where
                V: Visitor<'de>,
            {
                let path = self.ctx.path().clone();
                let value: $ty = self.ctx.single_value().integer($expected, stringify!($ty))?;
                located(&path, visitor.$visit(value))
            }
        )*
    };
}

impl<'de> de::Deserializer<'de> for Deserializer<'de> {
    type Error = Error;

    fn deserialize_any<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        let path = self.ctx.path().clone();
        let Some(node) = self.ctx.node() else {
            return located(&path, visitor.visit_unit());
        };
        let result = match node.kind() {
            NodeKind::Null => visitor.visit_unit(),
            NodeKind::Bool => visitor.visit_bool(node.as_bool().unwrap_or_default()),
            NodeKind::Number => match node.as_number() {
                Some(Number::PosInt(u)) => visitor.visit_u64(u),
                Some(Number::NegInt(i)) => visitor.visit_i64(i),
                _ => visitor.visit_f64(self.ctx.single_value().decode_f64()?),
            },
            NodeKind::Raw => {
                let text = node.as_raw().unwrap_or_default();
                match RawNumber::parse(text) {
                    Some(RawNumber::Integer(i)) => match (u64::try_from(i), i64::try_from(i)) {
                        (Ok(u), _) => visitor.visit_u64(u),
                        (_, Ok(i)) => visitor.visit_i64(i),
                        _ => visitor.visit_i128(i),
                    },
                    Some(RawNumber::Float(f)) if f.is_finite() => visitor.visit_f64(f),
                    Some(RawNumber::Named(_)) => visitor.visit_f64(self.ctx.single_value().decode_f64()?),
                    _ => visitor.visit_borrowed_str(text),
                }
            }
            NodeKind::String => visitor.visit_borrowed_str(node.as_str().unwrap_or_default()),
            NodeKind::Array => return self.deserialize_seq(visitor),
            NodeKind::Object => return self.deserialize_map(visitor),
        };
        located(&path, result)
    }

    fn deserialize_bool<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        let path = self.ctx.path().clone();
        let value = self.ctx.single_value().decode_bool()?;
        located(&path, visitor.visit_bool(value))
    }

    deserialize_integer! {
        deserialize_i8 => visit_i8: i8, "integer";
        deserialize_i16 => visit_i16: i16, "integer";
        deserialize_i32 => visit_i32: i32, "integer";
        deserialize_i64 => visit_i64: i64, "integer";
        deserialize_u8 => visit_u8: u8, "unsigned integer";
        deserialize_u16 => visit_u16: u16, "unsigned integer";
        deserialize_u32 => visit_u32: u32, "unsigned integer";
        deserialize_u64 => visit_u64: u64, "unsigned integer";
    }

    fn deserialize_i128<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        let path = self.ctx.path().clone();
        let value = i128::decode(self.ctx)?;
        located(&path, visitor.visit_i128(value))
    }

    fn deserialize_u128<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        let path = self.ctx.path().clone();
        let value = u128::decode(self.ctx)?;
        located(&path, visitor.visit_u128(value))
    }

    fn deserialize_f32<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        let path = self.ctx.path().clone();
        let value = self.ctx.single_value().decode_f32()?;
        located(&path, visitor.visit_f32(value))
    }

    fn deserialize_f64<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        let path = self.ctx.path().clone();
        let value = self.ctx.single_value().decode_f64()?;
        located(&path, visitor.visit_f64(value))
    }

    fn deserialize_char<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        let path = self.ctx.path().clone();
        let value = self.ctx.single_value().decode_char()?;
        located(&path, visitor.visit_char(value))
    }

    fn deserialize_str<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        let path = self.ctx.path().clone();
        let result = match self.ctx.single_value().decode_str()? {
            Cow::Borrowed(text) => visitor.visit_borrowed_str(text),
            Cow::Owned(text) => visitor.visit_string(text),
        };
        located(&path, result)
    }

    fn deserialize_string<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        self.deserialize_str(visitor)
    }

    fn deserialize_bytes<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        self.deserialize_byte_buf(visitor)
    }

    fn deserialize_byte_buf<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        let path = self.ctx.path().clone();
        let bytes = decode_bytes(self.ctx)?;
        located(&path, visitor.visit_byte_buf(bytes))
    }

    fn deserialize_option<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        if self.ctx.is_null() {
            let path = self.ctx.path().clone();
            located(&path, visitor.visit_none())
        } else {
            visitor.visit_some(self)
        }
    }

    fn deserialize_unit<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        let path = self.ctx.path().clone();
        <()>::decode(self.ctx)?;
        located(&path, visitor.visit_unit())
    }

    fn deserialize_unit_struct<V>(self, _name: &'static str, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        self.deserialize_unit(visitor)
    }

    fn deserialize_newtype_struct<V>(self, _name: &'static str, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_seq<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        let path = self.ctx.path().clone();
        let mut access = SeqAccess {
            indexed: self.ctx.indexed()?,
        };
        let value = located(&path, visitor.visit_seq(&mut access))?;
        access.indexed.ensure_at_end()?;
        Ok(value)
    }

    fn deserialize_tuple<V>(self, _len: usize, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        self.deserialize_seq(visitor)
    }

    fn deserialize_tuple_struct<V>(
        self,
        _name: &'static str,
        _len: usize,
        visitor: V,
    ) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        self.deserialize_seq(visitor)
    }

    fn deserialize_map<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        let path = self.ctx.path().clone();
        let keyed = self.ctx.keyed()?;

        // Later duplicates of a key are skipped, matching keyed lookup.
        let mut seen = HashSet::new();
        let entries: Vec<_> = keyed
            .entries()
            .filter(|(key, _)| seen.insert(key.clone()))
            .collect();
        located(
            &path,
            visitor.visit_map(MapAccess {
                entries: entries.into_iter(),
                value: None,
            }),
        )
    }

    fn deserialize_struct<V>(
        self,
        _name: &'static str,
        _fields: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        self.deserialize_map(visitor)
    }

    fn deserialize_enum<V>(
        self,
        _name: &'static str,
        _variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        let path = self.ctx.path().clone();
        match self.kind() {
            Some(NodeKind::String) => {
                let variant = self.ctx.single_value().decode_str()?;
                let variant: de::value::StrDeserializer<'_, Error> = variant.as_ref().into_deserializer();
                located(&path, visitor.visit_enum(variant))
            }
            Some(NodeKind::Object) => {
                let keyed = self.ctx.keyed()?;
                let mut entries = keyed.entries();
                let (variant, ctx) = match (entries.next(), entries.next()) {
                    (Some(entry), None) => entry,
                    _ => {
                        return Err(Error::invalid_data(
                            "expected an object with exactly one key for an enum variant",
                            &path,
                        ))
                    }
                };
                located(&path, visitor.visit_enum(EnumAccess { variant, ctx }))
            }
            _ => Err(self.mismatch("string or object")),
        }
    }

    fn deserialize_identifier<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        self.deserialize_str(visitor)
    }

    fn deserialize_ignored_any<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        visitor.visit_unit()
    }
}

struct SeqAccess<'de> {
    indexed: IndexedDecoder<'de>,
}

impl<'de> de::SeqAccess<'de> for SeqAccess<'de> {
    type Error = Error;

    fn next_element_seed<T>(&mut self, seed: T) -> Result<Option<T::Value>>
    where
        T: DeserializeSeed<'de>,
    {
        if self.indexed.is_at_end() {
            return Ok(None);
        }
        let ctx = self.indexed.next_decoder()?;
        seed.deserialize(Deserializer::new(ctx)).map(Some)
    }

    fn size_hint(&self) -> Option<usize> {
        self.indexed
            .count()
            .map(|count| count.saturating_sub(self.indexed.current_index()))
    }
}

struct MapAccess<'de> {
    entries: vec::IntoIter<(String, DecodeContext<'de>)>,
    value: Option<DecodeContext<'de>>,
}

impl<'de> de::MapAccess<'de> for MapAccess<'de> {
    type Error = Error;

    fn next_key_seed<K>(&mut self, seed: K) -> Result<Option<K::Value>>
    where
        K: DeserializeSeed<'de>,
    {
        match self.entries.next() {
            Some((key, ctx)) => {
                let path = ctx.path().clone();
                self.value = Some(ctx);
                seed.deserialize(MapKeyDeserializer { key, path: &path }).map(Some)
            }
            None => Ok(None),
        }
    }

    fn next_value_seed<V>(&mut self, seed: V) -> Result<V::Value>
    where
        V: DeserializeSeed<'de>,
    {
        let ctx = self
            .value
            .take()
            .ok_or_else(|| Error::invalid_data("value requested before key", &CodingPath::root()))?;
        seed.deserialize(Deserializer::new(ctx))
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.entries.len())
    }
}

struct EnumAccess<'de> {
    variant: String,
    ctx: DecodeContext<'de>,
}

impl<'de> de::EnumAccess<'de> for EnumAccess<'de> {
    type Error = Error;
    type Variant = VariantAccess<'de>;

    fn variant_seed<V>(self, seed: V) -> Result<(V::Value, VariantAccess<'de>)>
    where
        V: DeserializeSeed<'de>,
    {
        let deserializer: de::value::StringDeserializer<Error> = self.variant.into_deserializer();
        let variant = seed.deserialize(deserializer)?;
        Ok((variant, VariantAccess { ctx: self.ctx }))
    }
}

struct VariantAccess<'de> {
    ctx: DecodeContext<'de>,
}

impl<'de> de::VariantAccess<'de> for VariantAccess<'de> {
    type Error = Error;

    fn unit_variant(self) -> Result<()> {
        <()>::decode(self.ctx)
    }

    fn newtype_variant_seed<T>(self, seed: T) -> Result<T::Value>
    where
        T: DeserializeSeed<'de>,
    {
        seed.deserialize(Deserializer::new(self.ctx))
    }

    fn tuple_variant<V>(self, _len: usize, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        de::Deserializer::deserialize_seq(Deserializer::new(self.ctx), visitor)
    }

    fn struct_variant<V>(self, _fields: &'static [&'static str], visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        de::Deserializer::deserialize_map(Deserializer::new(self.ctx), visitor)
    }
}

/// Object keys are text; integer and boolean targets parse it.
struct MapKeyDeserializer<'p> {
    key: String,
    path: &'p CodingPath,
}

macro_rules! deserialize_parsed_key {
    ($($method:ident => $visit:ident: $ty:ty),*) => {
        $(
            fn $method<V>(self, visitor: V) -> Result<V::Value>
            where
                V: Visitor<'de>,
            {
                match self.key.parse::<$ty>() {
                    Ok(value) => visitor.$visit(value),
                    Err(_) => Err(Error::type_mismatch(stringify!($ty), "string", self.path)),
                }
            }
        )*
    };
}

impl<'de> de::Deserializer<'de> for MapKeyDeserializer<'_> {
    type Error = Error;

    fn deserialize_any<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        visitor.visit_string(self.key)
    }

    deserialize_parsed_key! {
        deserialize_bool => visit_bool: bool,
        deserialize_i8 => visit_i8: i8,
        deserialize_i16 => visit_i16: i16,
        deserialize_i32 => visit_i32: i32,
        deserialize_i64 => visit_i64: i64,
        deserialize_i128 => visit_i128: i128,
        deserialize_u8 => visit_u8: u8,
        deserialize_u16 => visit_u16: u16,
        deserialize_u32 => visit_u32: u32,
        deserialize_u64 => visit_u64: u64,
        deserialize_u128 => visit_u128: u128
    }

    fn deserialize_option<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        visitor.visit_some(self)
    }

    fn deserialize_newtype_struct<V>(self, _name: &'static str, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_enum<V>(
        self,
        _name: &'static str,
        _variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        let variant: de::value::StringDeserializer<Error> = self.key.into_deserializer();
        visitor.visit_enum(variant)
    }

    serde::forward_to_deserialize_any! {
        f32 f64 char str string bytes byte_buf unit unit_struct seq tuple
        tuple_struct map struct identifier ignored_any
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::options::ReadOptions;
    use crate::strategy::{DataDecodingStrategy, KeyDecodingStrategy, NonConformingFloatDecodingStrategy};
    use crate::Bytes;
    use serde::Deserialize;
    use std::collections::{BTreeMap, HashMap};

    #[derive(Deserialize, Debug, PartialEq)]
    struct Inner {
        b: Vec<i32>,
    }

    #[derive(Deserialize, Debug, PartialEq)]
    struct Outer {
        a: Inner,
    }

    #[derive(Deserialize, Debug, PartialEq)]
    enum Shape {
        Empty,
        Circle(f64),
        Point(i32, i32),
        Rect { width: u32, height: u32 },
    }

    #[test]
    fn test_nested_type_mismatch_path() {
        let err = from_str::<Outer>(r#"{"a":{"b":[1,"x",3]}}"#).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TypeMismatch);
        assert_eq!(err.path(), Some("a.b.Index 1"));
    }

    #[test]
    fn test_missing_field_path() {
        let err = from_str::<Outer>(r#"{"a":{}}"#).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingKey);
        assert_eq!(err.path(), Some("a.b"));
    }

    #[test]
    fn test_scalar_coercions() {
        #[derive(Deserialize)]
        struct Loose {
            flag: bool,
            count: u8,
            ratio: f32,
            label: String,
        }
        let loose: Loose = from_str(r#"{"flag":"TRUE","count":"12","ratio":1,"label":3.5}"#).unwrap();
        assert!(loose.flag);
        assert_eq!(loose.count, 12);
        assert_eq!(loose.ratio, 1.0);
        assert_eq!(loose.label, "3.5");

        let err = from_str::<u8>("300").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidData);
    }

    #[test]
    fn test_enums() {
        let shapes: Vec<Shape> = from_str(
            r#"["Empty",{"Circle":1.5},{"Point":[1,-2]},{"Rect":{"width":3,"height":4}}]"#,
        )
        .unwrap();
        assert_eq!(
            shapes,
            vec![
                Shape::Empty,
                Shape::Circle(1.5),
                Shape::Point(1, -2),
                Shape::Rect { width: 3, height: 4 },
            ]
        );
        let err = from_str::<Shape>(r#"{"Circle":1,"Empty":null}"#).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidData);
    }

    #[test]
    fn test_duplicate_keys_keep_first() {
        #[derive(Deserialize)]
        struct Keyed {
            key: String,
        }
        let keyed: Keyed = from_str(r#"{"key":"first","key":"second"}"#).unwrap();
        assert_eq!(keyed.key, "first");
    }

    #[test]
    fn test_snake_case_keys() {
        #[derive(Deserialize)]
        #[serde(rename_all = "camelCase")]
        struct Profile {
            user_name: String,
            avatar_url: Option<String>,
        }
        let options = DecodeOptions::new().with_key_strategy(KeyDecodingStrategy::ConvertFromSnakeCase);
        let profile: Profile =
            from_slice_with_options(br#"{"user_name":"ada","avatar_url":null}"#, &options).unwrap();
        assert_eq!(profile.user_name, "ada");
        assert_eq!(profile.avatar_url, None);
    }

    #[test]
    fn test_map_keys_parse() {
        let map: BTreeMap<u32, bool> = from_str(r#"{"2":true,"10":false}"#).unwrap();
        assert_eq!(map.into_iter().collect::<Vec<_>>(), vec![(2, true), (10, false)]);

        let err = from_str::<HashMap<u32, bool>>(r#"{"x":true}"#).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TypeMismatch);
    }

    #[test]
    fn test_bytes_and_floats_follow_strategies() {
        let bytes: Bytes = from_str(r#""AQID""#).unwrap();
        assert_eq!(bytes.0, vec![1, 2, 3]);

        let options = DecodeOptions::new().with_data_strategy(DataDecodingStrategy::Deferred);
        let bytes: Bytes = from_slice_with_options(b"[1,2,3]", &options).unwrap();
        assert_eq!(bytes.0, vec![1, 2, 3]);

        let options = DecodeOptions::new()
            .with_float_strategy(NonConformingFloatDecodingStrategy::convert_from_default_strings());
        let values: Vec<f64> = from_slice_with_options(br#"["Infinity", 2]"#, &options).unwrap();
        assert_eq!(values, vec![f64::INFINITY, 2.0]);
    }

    #[test]
    fn test_any_reads_raw_numbers_as_numbers() {
        let options = DecodeOptions::new().with_read_options(ReadOptions::NUMBER_AS_RAW);
        let value: serde_json::Value =
            from_slice_with_options(br#"[1, -1, 1.5, {"k": true}]"#, &options).unwrap();
        assert_eq!(value, serde_json::json!([1, -1, 1.5, {"k": true}]));
    }

    #[test]
    fn test_absent_optional_fields() {
        #[derive(Deserialize, Debug, PartialEq)]
        struct AllOptional {
            a: Option<i32>,
            b: Option<String>,
        }
        let value: AllOptional = from_str("{}").unwrap();
        assert_eq!(value, AllOptional { a: None, b: None });
    }

    #[test]
    fn test_from_document_is_shareable() {
        let document = Document::parse_str(r#"{"b":[1,2]}"#, ReadOptions::DEFAULT).unwrap();
        let options = DecodeOptions::default();
        let first: Inner = from_document(&document, &options).unwrap();
        let second: Inner = from_document(&document, &options).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_from_reader() {
        let input: &[u8] = br#"{"b":[3]}"#;
        let inner: Inner = from_reader(input).unwrap();
        assert_eq!(inner, Inner { b: vec![3] });
    }
}
