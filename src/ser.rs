//! Serialize any `serde::Serialize` type through the encode engine.
//!
//! The [`Serializer`] writes into an [`EncodeContext`], so serde types get
//! the same key strategies, data strategy, non-finite float policy and
//! write options as hand-written [`Encode`] impls:
//!
//! ```rust
//! use codable_json::{to_string, to_string_pretty};
//! use serde::Serialize;
//!
//! #[derive(Serialize)]
//! struct Data { x: i32, y: i32 }
//!
//! let data = Data { x: 1, y: 2 };
//! assert_eq!(to_string(&data)?, r#"{"x":1,"y":2}"#);
//! assert_eq!(to_string_pretty(&data)?, "{\n    \"x\": 1,\n    \"y\": 2\n}");
//! # Ok::<(), codable_json::Error>(())
//! ```
//!
//! Enums are externally tagged: a unit variant is its name as a string, any
//! other variant is a one-member object keyed by the variant name.

use crate::encode::{
    build_tree, encode_to_writer, encode_with_options, Encode, EncodeContext, EncodeOptions, IndexedEncoder,
    KeyedEncoder,
};
use crate::error::{Error, Result};
use crate::impls::encode_bytes;
use crate::path::CodingPath;
use crate::value::{from_tree, Value};
use serde::{ser, Serialize};
use std::io;

/// Adapts a serde type to [`Encode`] and [`Decode`](crate::Decode).
///
/// # Examples
///
/// ```rust
/// use codable_json::{decode, encode_to_string, Serde};
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Serialize, Deserialize, PartialEq, Debug)]
/// struct User { id: u32, name: String }
///
/// let json = encode_to_string(&Serde(User { id: 1, name: "Ada".into() }))?;
/// let Serde(user) = decode::<Serde<User>>(json.as_bytes())?;
/// assert_eq!(user.name, "Ada");
/// # Ok::<(), codable_json::Error>(())
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Serde<T>(pub T);

impl<T: Serialize> Encode for Serde<T> {
    fn encode(&self, ctx: EncodeContext<'_>) -> Result<()> {
        self.0.serialize(Serializer::new(ctx))
    }
}

/// Serializes `value` to compact JSON bytes.
///
/// # Errors
///
/// Returns an error if `T`'s `Serialize` impl fails, or if the result
/// cannot be printed (for example a NaN under the default options).
pub fn to_vec<T>(value: &T) -> Result<Vec<u8>>
where
    T: ?Sized + Serialize,
{
    to_vec_with_options(value, &EncodeOptions::default())
}

/// Serializes `value` with the given options.
///
/// # Errors
///
/// Same as [`to_vec`].
pub fn to_vec_with_options<T>(value: &T, options: &EncodeOptions) -> Result<Vec<u8>>
where
    T: ?Sized + Serialize,
{
    encode_with_options(&Serde(value), options)
}

/// Serializes `value` to a compact JSON string.
///
/// # Errors
///
/// Same as [`to_vec`].
pub fn to_string<T>(value: &T) -> Result<String>
where
    T: ?Sized + Serialize,
{
    to_string_with_options(value, &EncodeOptions::default())
}

/// Serializes `value` to a JSON string indented with four spaces.
///
/// # Errors
///
/// Same as [`to_vec`].
pub fn to_string_pretty<T>(value: &T) -> Result<String>
where
    T: ?Sized + Serialize,
{
    to_string_with_options(value, &EncodeOptions::pretty())
}

/// Serializes `value` to a string with the given options.
///
/// # Errors
///
/// Same as [`to_vec`].
pub fn to_string_with_options<T>(value: &T, options: &EncodeOptions) -> Result<String>
where
    T: ?Sized + Serialize,
{
    let bytes = to_vec_with_options(value, options)?;
    String::from_utf8(bytes).map_err(|err| Error::invalid_data(err.to_string(), &CodingPath::root()))
}

/// Serializes `value` into an I/O sink.
///
/// # Errors
///
/// Same as [`to_vec`], plus a write error when the sink fails.
pub fn to_writer<W, T>(writer: W, value: &T) -> Result<()>
where
    W: io::Write,
    T: ?Sized + Serialize,
{
    encode_to_writer(writer, &Serde(value), &EncodeOptions::default())
}

/// Serializes `value` into a dynamic [`Value`] without printing it.
///
/// Non-finite floats are kept as they are; only printing rejects them.
///
/// # Errors
///
/// Returns an error if `T`'s `Serialize` impl fails.
pub fn to_value<T>(value: &T) -> Result<Value>
where
    T: ?Sized + Serialize,
{
    let (builder, root) = build_tree(&Serde(value), &EncodeOptions::default())?;
    Ok(from_tree(&builder, root))
}

/// A `serde::Serializer` writing one value into an [`EncodeContext`].
pub struct Serializer<'a> {
    ctx: EncodeContext<'a>,
}

impl<'a> Serializer<'a> {
    #[must_use]
    pub fn new(ctx: EncodeContext<'a>) -> Self {
        Serializer { ctx }
    }
}

/// Serializes `value` into `ctx`, attributing path-less errors to `ctx`.
fn serialize_into<T>(value: &T, ctx: EncodeContext<'_>) -> Result<()>
where
    T: ?Sized + Serialize,
{
    let path = ctx.path().clone();
    value
        .serialize(Serializer::new(ctx))
        .map_err(|err| err.at_path(&path))
}

impl<'a> ser::Serializer for Serializer<'a> {
    type Ok = ();
    type Error = Error;

    type SerializeSeq = SerializeVec<'a>;
    type SerializeTuple = SerializeVec<'a>;
    type SerializeTupleStruct = SerializeVec<'a>;
    type SerializeTupleVariant = SerializeVec<'a>;
    type SerializeMap = SerializeMap<'a>;
    type SerializeStruct = SerializeStruct<'a>;
    type SerializeStructVariant = SerializeStruct<'a>;

    fn serialize_bool(self, v: bool) -> Result<()> {
        self.ctx.single_value().encode_bool(v)
    }

    fn serialize_i8(self, v: i8) -> Result<()> {
        self.serialize_i64(i64::from(v))
    }

    fn serialize_i16(self, v: i16) -> Result<()> {
        self.serialize_i64(i64::from(v))
    }

    fn serialize_i32(self, v: i32) -> Result<()> {
        self.serialize_i64(i64::from(v))
    }

    fn serialize_i64(self, v: i64) -> Result<()> {
        self.ctx.single_value().encode_i64(v)
    }

    fn serialize_i128(self, v: i128) -> Result<()> {
        v.encode(self.ctx)
    }

    fn serialize_u8(self, v: u8) -> Result<()> {
        self.serialize_u64(u64::from(v))
    }

    fn serialize_u16(self, v: u16) -> Result<()> {
        self.serialize_u64(u64::from(v))
    }

    fn serialize_u32(self, v: u32) -> Result<()> {
        self.serialize_u64(u64::from(v))
    }

    fn serialize_u64(self, v: u64) -> Result<()> {
        self.ctx.single_value().encode_u64(v)
    }

    fn serialize_u128(self, v: u128) -> Result<()> {
        v.encode(self.ctx)
    }

    fn serialize_f32(self, v: f32) -> Result<()> {
        self.ctx.single_value().encode_f32(v)
    }

    fn serialize_f64(self, v: f64) -> Result<()> {
        self.ctx.single_value().encode_f64(v)
    }

    fn serialize_char(self, v: char) -> Result<()> {
        v.encode(self.ctx)
    }

    fn serialize_str(self, v: &str) -> Result<()> {
        self.ctx.single_value().encode_str(v)
    }

    fn serialize_bytes(self, v: &[u8]) -> Result<()> {
        encode_bytes(v, self.ctx)
    }

    fn serialize_none(self) -> Result<()> {
        self.serialize_unit()
    }

    fn serialize_some<T>(self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<()> {
        self.ctx.single_value().encode_null()
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<()> {
        self.serialize_unit()
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<()> {
        self.serialize_str(variant)
    }

    fn serialize_newtype_struct<T>(self, _name: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T>(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        value: &T,
    ) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        let mut keyed = self.ctx.keyed();
        serialize_into(value, keyed.encoder_for(variant))
    }

    fn serialize_seq(self, _len: Option<usize>) -> Result<SerializeVec<'a>> {
        Ok(SerializeVec {
            indexed: self.ctx.indexed(),
        })
    }

    fn serialize_tuple(self, len: usize) -> Result<SerializeVec<'a>> {
        self.serialize_seq(Some(len))
    }

    fn serialize_tuple_struct(self, _name: &'static str, len: usize) -> Result<SerializeVec<'a>> {
        self.serialize_seq(Some(len))
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        _len: usize,
    ) -> Result<SerializeVec<'a>> {
        let mut keyed = self.ctx.keyed();
        Ok(SerializeVec {
            indexed: keyed.nested_indexed(variant),
        })
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<SerializeMap<'a>> {
        Ok(SerializeMap {
            keyed: self.ctx.keyed(),
            key: None,
        })
    }

    fn serialize_struct(self, _name: &'static str, _len: usize) -> Result<SerializeStruct<'a>> {
        Ok(SerializeStruct {
            keyed: self.ctx.keyed(),
        })
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        _len: usize,
    ) -> Result<SerializeStruct<'a>> {
        let mut keyed = self.ctx.keyed();
        Ok(SerializeStruct {
            keyed: keyed.nested_keyed(variant),
        })
    }
}

/// Sequences, tuples and tuple variants.
pub struct SerializeVec<'a> {
    indexed: IndexedEncoder<'a>,
}

impl SerializeVec<'_> {
    fn element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        serialize_into(value, self.indexed.encoder_for_next())
    }
}

impl ser::SerializeSeq for SerializeVec<'_> {
    type Ok = ();
    type Error = Error;

    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.element(value)
    }

    fn end(self) -> Result<()> {
        Ok(())
    }
}

impl ser::SerializeTuple for SerializeVec<'_> {
    type Ok = ();
    type Error = Error;

    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.element(value)
    }

    fn end(self) -> Result<()> {
        Ok(())
    }
}

impl ser::SerializeTupleStruct for SerializeVec<'_> {
    type Ok = ();
    type Error = Error;

    fn serialize_field<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.element(value)
    }

    fn end(self) -> Result<()> {
        Ok(())
    }
}

impl ser::SerializeTupleVariant for SerializeVec<'_> {
    type Ok = ();
    type Error = Error;

    fn serialize_field<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.element(value)
    }

    fn end(self) -> Result<()> {
        Ok(())
    }
}

/// Maps. Keys must serialize as strings, numbers, booleans or chars.
pub struct SerializeMap<'a> {
    keyed: KeyedEncoder<'a>,
    key: Option<String>,
}

impl ser::SerializeMap for SerializeMap<'_> {
    type Ok = ();
    type Error = Error;

    fn serialize_key<T>(&mut self, key: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        let path = self.keyed.path().clone();
        self.key = Some(key.serialize(MapKeySerializer { path: &path })?);
        Ok(())
    }

    fn serialize_value<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        let key = self.key.take().ok_or_else(|| {
            Error::invalid_data("serialize_value called without serialize_key", self.keyed.path())
        })?;
        serialize_into(value, self.keyed.encoder_for(&key))
    }

    fn end(self) -> Result<()> {
        Ok(())
    }
}

/// Structs and struct variants. Field names pass through the key strategy.
pub struct SerializeStruct<'a> {
    keyed: KeyedEncoder<'a>,
}

impl ser::SerializeStruct for SerializeStruct<'_> {
    type Ok = ();
    type Error = Error;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        serialize_into(value, self.keyed.encoder_for(key))
    }

    fn end(self) -> Result<()> {
        Ok(())
    }
}

impl ser::SerializeStructVariant for SerializeStruct<'_> {
    type Ok = ();
    type Error = Error;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        serialize_into(value, self.keyed.encoder_for(key))
    }

    fn end(self) -> Result<()> {
        Ok(())
    }
}

/// Turns a map key into object key text.
struct MapKeySerializer<'p> {
    path: &'p CodingPath,
}

impl MapKeySerializer<'_> {
    fn unsupported(&self, kind: &str) -> Error {
        Error::invalid_data(format!("map key must be a string, got {kind}"), self.path)
    }
}

macro_rules! key_to_string {
    ($($method:ident: $ty:ty),*) => {
        $(
            fn $method(self, v: $ty) -> Result<String> {
                Ok(v.to_string())
            }
        )*
    };
}

impl ser::Serializer for MapKeySerializer<'_> {
    type Ok = String;
    type Error = Error;

    type SerializeSeq = ser::Impossible<String, Error>;
    type SerializeTuple = ser::Impossible<String, Error>;
    type SerializeTupleStruct = ser::Impossible<String, Error>;
    type SerializeTupleVariant = ser::Impossible<String, Error>;
    type SerializeMap = ser::Impossible<String, Error>;
    type SerializeStruct = ser::Impossible<String, Error>;
    type SerializeStructVariant = ser::Impossible<String, Error>;

    key_to_string! {
        serialize_bool: bool,
        serialize_i8: i8,
        serialize_i16: i16,
        serialize_i32: i32,
        serialize_i64: i64,
        serialize_i128: i128,
        serialize_u8: u8,
        serialize_u16: u16,
        serialize_u32: u32,
        serialize_u64: u64,
        serialize_u128: u128,
        serialize_char: char
    }

    fn serialize_f32(self, _v: f32) -> Result<String> {
        Err(self.unsupported("float"))
    }

    fn serialize_f64(self, _v: f64) -> Result<String> {
        Err(self.unsupported("float"))
    }

    fn serialize_str(self, v: &str) -> Result<String> {
        Ok(v.to_string())
    }

    fn serialize_bytes(self, _v: &[u8]) -> Result<String> {
        Err(self.unsupported("bytes"))
    }

    fn serialize_none(self) -> Result<String> {
        Err(self.unsupported("null"))
    }

    fn serialize_some<T>(self, value: &T) -> Result<String>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<String> {
        Err(self.unsupported("null"))
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<String> {
        Err(self.unsupported("null"))
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<String> {
        Ok(variant.to_string())
    }

    fn serialize_newtype_struct<T>(self, _name: &'static str, value: &T) -> Result<String>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T>(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _value: &T,
    ) -> Result<String>
    where
        T: ?Sized + Serialize,
    {
        Err(self.unsupported("enum"))
    }

    fn serialize_seq(self, _len: Option<usize>) -> Result<Self::SerializeSeq> {
        Err(self.unsupported("array"))
    }

    fn serialize_tuple(self, _len: usize) -> Result<Self::SerializeTuple> {
        Err(self.unsupported("array"))
    }

    fn serialize_tuple_struct(
        self,
        _name: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleStruct> {
        Err(self.unsupported("array"))
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleVariant> {
        Err(self.unsupported("enum"))
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<Self::SerializeMap> {
        Err(self.unsupported("object"))
    }

    fn serialize_struct(self, _name: &'static str, _len: usize) -> Result<Self::SerializeStruct> {
        Err(self.unsupported("object"))
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStructVariant> {
        Err(self.unsupported("enum"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::options::WriteOptions;
    use crate::strategy::{DataEncodingStrategy, KeyEncodingStrategy};
    use crate::Bytes;
    use serde::Serialize;
    use std::collections::BTreeMap;

    #[derive(Serialize)]
    struct Account {
        account_id: u64,
        display_name: String,
        tags: Vec<String>,
        limit: Option<f64>,
    }

    #[derive(Serialize)]
    enum Shape {
        Empty,
        Circle(f64),
        Point(i32, i32),
        Rect { width: u32, height: u32 },
    }

    #[test]
    fn test_struct_and_option() {
        let account = Account {
            account_id: 7,
            display_name: "Ada".into(),
            tags: vec!["a".into()],
            limit: None,
        };
        assert_eq!(
            to_string(&account).unwrap(),
            r#"{"account_id":7,"display_name":"Ada","tags":["a"],"limit":null}"#
        );
    }

    #[test]
    fn test_enum_tagging() {
        let shapes = vec![
            Shape::Empty,
            Shape::Circle(1.5),
            Shape::Point(1, -2),
            Shape::Rect { width: 3, height: 4 },
        ];
        assert_eq!(
            to_string(&shapes).unwrap(),
            r#"["Empty",{"Circle":1.5},{"Point":[1,-2]},{"Rect":{"width":3,"height":4}}]"#
        );
    }

    #[test]
    fn test_key_strategy_applies_to_fields_and_map_keys() {
        #[derive(Serialize)]
        struct Wrapper {
            #[serde(rename = "innerValue")]
            inner_value: BTreeMap<String, u8>,
        }
        let mut map = BTreeMap::new();
        map.insert("someKey".to_string(), 1);
        let options = EncodeOptions::new().with_key_strategy(KeyEncodingStrategy::ConvertToSnakeCase);
        assert_eq!(
            to_string_with_options(&Wrapper { inner_value: map }, &options).unwrap(),
            r#"{"inner_value":{"some_key":1}}"#
        );
    }

    #[test]
    fn test_map_keys_are_stringified() {
        let mut map = BTreeMap::new();
        map.insert(2u32, "b");
        map.insert(1u32, "a");
        assert_eq!(to_string(&map).unwrap(), r#"{"1":"a","2":"b"}"#);

        let mut bad = BTreeMap::new();
        bad.insert(vec![1u8], 1);
        let err = to_string(&bad).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidData);
    }

    #[test]
    fn test_bytes_use_data_strategy() {
        let bytes = Bytes(vec![1, 2, 3]);
        assert_eq!(to_string(&bytes).unwrap(), r#""AQID""#);
        let options = EncodeOptions::new().with_data_strategy(DataEncodingStrategy::Deferred);
        assert_eq!(to_string_with_options(&bytes, &options).unwrap(), "[1,2,3]");
    }

    #[test]
    fn test_pretty_two_spaces() {
        let mut map = BTreeMap::new();
        map.insert("b", vec![1]);
        map.insert("a", vec![]);
        let options =
            EncodeOptions::new().with_write_options(WriteOptions::PRETTY | WriteOptions::PRETTY_TWO_SPACES);
        assert_eq!(
            to_string_with_options(&map, &options).unwrap(),
            "{\n  \"a\": [],\n  \"b\": [\n    1\n  ]\n}"
        );
    }

    #[test]
    fn test_custom_errors_are_located() {
        struct Failing;
        impl Serialize for Failing {
            fn serialize<S: ser::Serializer>(&self, _s: S) -> std::result::Result<S::Ok, S::Error> {
                Err(<S::Error as ser::Error>::custom("refused"))
            }
        }
        let mut map = BTreeMap::new();
        map.insert("field", vec![Failing]);
        let err = to_string(&map).unwrap_err();
        assert_eq!(err.path(), Some("field.Index 0"));
        assert_eq!(err.to_string(), "refused (at field.Index 0)");
    }

    #[test]
    fn test_to_writer() {
        let mut out = Vec::new();
        to_writer(&mut out, &(1, "two")).unwrap();
        assert_eq!(out, br#"[1,"two"]"#);
    }

    #[test]
    fn test_to_value_keeps_non_finite_floats() {
        let value = to_value(&(f64::INFINITY, "x", Some(3u8))).unwrap();
        assert_eq!(value[0].as_f64(), Some(f64::INFINITY));
        assert_eq!(value[1].as_str(), Some("x"));
        assert_eq!(value[2].as_u64(), Some(3));
        assert!(to_vec(&f64::INFINITY).is_err());
    }
}
