//! Dynamic JSON values.
//!
//! [`Value`] is an owned, untyped tree for data whose shape is not known at
//! compile time. It converts from any parsed [`Node`], takes part in both
//! coding engines, and works with serde in either direction.
//!
//! ```rust
//! use codable_json::{ReadOptions, Value};
//!
//! let value = Value::parse(br#"{"name": "Alice", "tags": ["a", "b"]}"#, ReadOptions::DEFAULT)?;
//! assert_eq!(value["name"].as_str(), Some("Alice"));
//! assert_eq!(value["tags"][1].as_str(), Some("b"));
//! assert!(value["missing"].is_null());
//! # Ok::<(), codable_json::Error>(())
//! ```

use crate::build::{Builder, MutId, MutNode};
use crate::decode::{Decode, DecodeContext};
use crate::document::{Document, Node, NodeKind};
use crate::encode::{encode_with_options, Encode, EncodeContext, EncodeOptions};
use crate::error::{Error, Result};
use crate::map::Map;
use crate::number::{Number, RawNumber};
use crate::options::{ReadOptions, WriteOptions};
use crate::path::CodingPath;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::ops::Index;

/// Any JSON value.
///
/// Objects keep member order. Numbers that arrive as raw text (see
/// [`ReadOptions::NUMBER_AS_RAW`]) become [`Value::Number`] when they fit a
/// 64-bit integer or a finite float, and [`Value::String`] otherwise, so
/// no digits are lost.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    Array(Vec<Value>),
    Object(Map),
}

static NULL: Value = Value::Null;

impl Value {
    /// Parses a document of any shape, scalar roots included.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Parse`] if the input is not accepted under `options`.
    pub fn parse(input: &[u8], options: ReadOptions) -> Result<Value> {
        let document = Document::parse(input, options)?;
        Ok(document.root().map_or(Value::Null, Value::from))
    }

    /// Parses a document whose root must be an array or an object unless
    /// `allow_fragments` is set.
    ///
    /// ```rust
    /// use codable_json::{ErrorKind, ReadOptions, Value};
    ///
    /// let err = Value::parse_container(b"42", ReadOptions::DEFAULT, false).unwrap_err();
    /// assert_eq!(err.kind(), ErrorKind::InvalidData);
    ///
    /// let value = Value::parse_container(b"42", ReadOptions::DEFAULT, true)?;
    /// assert_eq!(value.as_i64(), Some(42));
    /// # Ok::<(), codable_json::Error>(())
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`Error::Parse`] for malformed input and
    /// [`Error::InvalidData`] for a scalar root when fragments are not allowed.
    pub fn parse_container(input: &[u8], options: ReadOptions, allow_fragments: bool) -> Result<Value> {
        let value = Value::parse(input, options)?;
        if !allow_fragments && !value.is_container() {
            return Err(Error::invalid_data(
                format!("top-level {} is not an array or object", value.type_name()),
                &CodingPath::root(),
            ));
        }
        Ok(value)
    }

    /// Prints the value with the given write flags.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Write`] for non-finite numbers without an inf/nan
    /// write flag.
    pub fn to_vec(&self, options: WriteOptions) -> Result<Vec<u8>> {
        encode_with_options(self, &EncodeOptions::new().with_write_options(options))
    }

    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    #[must_use]
    pub fn is_bool(&self) -> bool {
        matches!(self, Value::Bool(_))
    }

    #[must_use]
    pub fn is_number(&self) -> bool {
        matches!(self, Value::Number(_))
    }

    #[must_use]
    pub fn is_string(&self) -> bool {
        matches!(self, Value::String(_))
    }

    #[must_use]
    pub fn is_array(&self) -> bool {
        matches!(self, Value::Array(_))
    }

    #[must_use]
    pub fn is_object(&self) -> bool {
        matches!(self, Value::Object(_))
    }

    /// True for arrays and objects.
    #[must_use]
    pub fn is_container(&self) -> bool {
        self.is_array() || self.is_object()
    }

    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_number(&self) -> Option<Number> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// The value as an `i64`, if it is an integer in range.
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        self.as_number().and_then(|n| n.as_i64())
    }

    /// The value as a `u64`, if it is a non-negative integer.
    #[must_use]
    pub fn as_u64(&self) -> Option<u64> {
        self.as_number().and_then(|n| n.as_u64())
    }

    /// The value as an `f64`. Integers widen.
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        self.as_number().map(|n| n.as_f64())
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_array(&self) -> Option<&Vec<Value>> {
        match self {
            Value::Array(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_array_mut(&mut self) -> Option<&mut Vec<Value>> {
        match self {
            Value::Array(a) => Some(a),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_object(&self) -> Option<&Map> {
        match self {
            Value::Object(o) => Some(o),
            _ => None,
        }
    }

    pub fn as_object_mut(&mut self) -> Option<&mut Map> {
        match self {
            Value::Object(o) => Some(o),
            _ => None,
        }
    }

    /// Member lookup on objects. Anything else yields `None`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_object().and_then(|o| o.get(key))
    }

    /// Name of the value's kind, as used in error messages.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
        }
    }
}

fn raw_number(text: &str) -> Value {
    match RawNumber::parse(text) {
        Some(RawNumber::Integer(i)) => match (u64::try_from(i), i64::try_from(i)) {
            (Ok(u), _) => Value::Number(Number::PosInt(u)),
            (_, Ok(i)) => Value::Number(Number::from(i)),
            _ => Value::String(text.to_string()),
        },
        Some(RawNumber::Float(f)) if f.is_finite() && text.contains(['.', 'e', 'E']) => {
            Value::Number(Number::Float(f))
        }
        Some(RawNumber::Named(f)) => Value::Number(Number::Float(f)),
        _ => Value::String(text.to_string()),
    }
}

impl From<Node<'_>> for Value {
    fn from(node: Node<'_>) -> Self {
        match node.kind() {
            NodeKind::Null => Value::Null,
            NodeKind::Bool => node.as_bool().map_or(Value::Null, Value::Bool),
            NodeKind::Number => node.as_number().map_or(Value::Null, Value::Number),
            NodeKind::Raw => node.as_raw().map_or(Value::Null, raw_number),
            NodeKind::String => node.as_str().map_or(Value::Null, Value::from),
            NodeKind::Array => Value::Array(
                node.as_array()
                    .map(|array| array.iter().map(Value::from).collect())
                    .unwrap_or_default(),
            ),
            NodeKind::Object => {
                let mut map = Map::new();
                if let Some(object) = node.as_object() {
                    for (key, child) in object.iter() {
                        // Duplicate keys resolve to the first occurrence.
                        if !map.contains_key(key) {
                            map.insert(key.to_string(), Value::from(child));
                        }
                    }
                }
                Value::Object(map)
            }
        }
    }
}

/// Converts a finished build tree into a [`Value`].
pub(crate) fn from_tree(builder: &Builder, id: MutId) -> Value {
    match builder.node(id) {
        MutNode::Pending | MutNode::Null => Value::Null,
        MutNode::Bool(b) => Value::Bool(*b),
        MutNode::Number(n) => Value::Number(*n),
        MutNode::Raw(text) => raw_number(text),
        MutNode::String(s) => Value::String(s.clone()),
        MutNode::Array(elements) => Value::Array(elements.iter().map(|&child| from_tree(builder, child)).collect()),
        MutNode::Object(members) => Value::Object(
            members
                .iter()
                .map(|(key, &child)| (key.clone(), from_tree(builder, child)))
                .collect(),
        ),
    }
}

impl Decode for Value {
    fn decode(ctx: DecodeContext<'_>) -> Result<Self> {
        let Some(node) = ctx.node() else {
            return Err(Error::missing_value(ctx.path()));
        };
        match node.kind() {
            NodeKind::Object => {
                let keyed = ctx.keyed()?;
                let mut map = Map::with_capacity(keyed.len());
                for (key, child) in keyed.entries() {
                    if !map.contains_key(&key) {
                        let value = Value::decode(child)?;
                        map.insert(key, value);
                    }
                }
                Ok(Value::Object(map))
            }
            NodeKind::Array => {
                let mut indexed = ctx.indexed()?;
                let mut values = Vec::with_capacity(indexed.count().unwrap_or(0));
                while !indexed.is_at_end() {
                    values.push(indexed.decode_next()?);
                }
                Ok(Value::Array(values))
            }
            // Sentinel strings stay strings; the float strategy only
            // applies when a float is requested.
            _ => Ok(Value::from(node)),
        }
    }
}

impl Encode for Value {
    fn encode(&self, ctx: EncodeContext<'_>) -> Result<()> {
        match self {
            Value::Null => ctx.single_value().encode_null(),
            Value::Bool(b) => ctx.single_value().encode_bool(*b),
            Value::Number(Number::PosInt(n)) => ctx.single_value().encode_u64(*n),
            Value::Number(Number::NegInt(n)) => ctx.single_value().encode_i64(*n),
            Value::Number(Number::Float(f)) => ctx.single_value().encode_f64(*f),
            Value::String(s) => ctx.single_value().encode_str(s),
            Value::Array(values) => {
                let mut indexed = ctx.indexed();
                for value in values {
                    indexed.encode(value)?;
                }
                Ok(())
            }
            Value::Object(map) => {
                let mut keyed = ctx.keyed();
                for (key, value) in map {
                    keyed.encode(key, value)?;
                }
                Ok(())
            }
        }
    }
}

impl fmt::Display for Value {
    /// Compact JSON. Non-finite floats print as `NaN` and `Infinity`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let bytes = self.to_vec(WriteOptions::ALLOW_INF_AND_NAN).map_err(|_| fmt::Error)?;
        f.write_str(&String::from_utf8_lossy(&bytes))
    }
}

impl Index<&str> for Value {
    type Output = Value;

    /// Missing members and non-objects index to `Null`.
    fn index(&self, key: &str) -> &Value {
        self.get(key).unwrap_or(&NULL)
    }
}

impl Index<usize> for Value {
    type Output = Value;

    fn index(&self, index: usize) -> &Value {
        self.as_array().and_then(|a| a.get(index)).unwrap_or(&NULL)
    }
}

impl Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Number(Number::PosInt(n)) => serializer.serialize_u64(*n),
            Value::Number(Number::NegInt(n)) => serializer.serialize_i64(*n),
            Value::Number(Number::Float(f)) => serializer.serialize_f64(*f),
            Value::String(s) => serializer.serialize_str(s),
            Value::Array(values) => {
                use serde::ser::SerializeSeq;
                let mut seq = serializer.serialize_seq(Some(values.len()))?;
                for value in values {
                    seq.serialize_element(value)?;
                }
                seq.end()
            }
            Value::Object(map) => {
                use serde::ser::SerializeMap;
                let mut out = serializer.serialize_map(Some(map.len()))?;
                for (key, value) in map {
                    out.serialize_entry(key, value)?;
                }
                out.end()
            }
        }
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct ValueVisitor;

        impl<'de> de::Visitor<'de> for ValueVisitor {
            type Value = Value;

            fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
                formatter.write_str("any valid JSON value")
            }

            fn visit_bool<E>(self, value: bool) -> std::result::Result<Value, E> {
                Ok(Value::Bool(value))
            }

            fn visit_i64<E>(self, value: i64) -> std::result::Result<Value, E> {
                Ok(Value::from(value))
            }

            fn visit_u64<E>(self, value: u64) -> std::result::Result<Value, E> {
                Ok(Value::from(value))
            }

            fn visit_i128<E>(self, value: i128) -> std::result::Result<Value, E> {
                Ok(i64::try_from(value)
                    .map(Value::from)
                    .or_else(|_| u64::try_from(value).map(Value::from))
                    .unwrap_or_else(|_| Value::String(value.to_string())))
            }

            fn visit_u128<E>(self, value: u128) -> std::result::Result<Value, E> {
                Ok(u64::try_from(value).map_or_else(|_| Value::String(value.to_string()), Value::from))
            }

            fn visit_f64<E>(self, value: f64) -> std::result::Result<Value, E> {
                Ok(Value::from(value))
            }

            fn visit_str<E>(self, value: &str) -> std::result::Result<Value, E> {
                Ok(Value::String(value.to_string()))
            }

            fn visit_string<E>(self, value: String) -> std::result::Result<Value, E> {
                Ok(Value::String(value))
            }

            fn visit_unit<E>(self) -> std::result::Result<Value, E> {
                Ok(Value::Null)
            }

            fn visit_none<E>(self) -> std::result::Result<Value, E> {
                Ok(Value::Null)
            }

            fn visit_some<D>(self, deserializer: D) -> std::result::Result<Value, D::Error>
            where
                D: Deserializer<'de>,
            {
                Deserialize::deserialize(deserializer)
            }

            fn visit_seq<A>(self, mut seq: A) -> std::result::Result<Value, A::Error>
            where
                A: de::SeqAccess<'de>,
            {
                let mut values = Vec::with_capacity(seq.size_hint().unwrap_or(0));
                while let Some(element) = seq.next_element()? {
                    values.push(element);
                }
                Ok(Value::Array(values))
            }

            fn visit_map<A>(self, mut access: A) -> std::result::Result<Value, A::Error>
            where
                A: de::MapAccess<'de>,
            {
                let mut map = Map::new();
                while let Some((key, value)) = access.next_entry::<String, Value>()? {
                    if !map.contains_key(&key) {
                        map.insert(key, value);
                    }
                }
                Ok(Value::Object(map))
            }
        }

        deserializer.deserialize_any(ValueVisitor)
    }
}

macro_rules! from_integer {
    ($($ty:ident)*) => {
        $(
            impl From<$ty> for Value {
                fn from(n: $ty) -> Self {
                    Value::Number(Number::from(n))
                }
            }
        )*
    };
}

from_integer!(i8 i16 i32 i64 isize u8 u16 u32 u64 usize);

impl From<f32> for Value {
    fn from(f: f32) -> Self {
        Value::Number(Number::Float(f64::from(f)))
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Number(Number::Float(f))
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<Number> for Value {
    fn from(n: Number) -> Self {
        Value::Number(n)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<()> for Value {
    fn from((): ()) -> Self {
        Value::Null
    }
}

impl From<Map> for Value {
    fn from(map: Map) -> Self {
        Value::Object(map)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(values: Vec<T>) -> Self {
        Value::Array(values.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}

impl<T: Into<Value>> FromIterator<T> for Value {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Value::Array(iter.into_iter().map(Into::into).collect())
    }
}

impl TryFrom<Value> for i64 {
    type Error = Error;

    fn try_from(value: Value) -> Result<Self> {
        match value {
            Value::Number(n) => n
                .as_i64()
                .ok_or_else(|| Error::invalid_data(format!("{n} does not fit i64"), &CodingPath::root())),
            other => Err(Error::type_mismatch("integer", other.type_name(), &CodingPath::root())),
        }
    }
}

impl TryFrom<Value> for f64 {
    type Error = Error;

    fn try_from(value: Value) -> Result<Self> {
        match value {
            Value::Number(n) => Ok(n.as_f64()),
            other => Err(Error::type_mismatch("number", other.type_name(), &CodingPath::root())),
        }
    }
}

impl TryFrom<Value> for bool {
    type Error = Error;

    fn try_from(value: Value) -> Result<Self> {
        match value {
            Value::Bool(b) => Ok(b),
            other => Err(Error::type_mismatch("bool", other.type_name(), &CodingPath::root())),
        }
    }
}

impl TryFrom<Value> for String {
    type Error = Error;

    fn try_from(value: Value) -> Result<Self> {
        match value {
            Value::String(s) => Ok(s),
            other => Err(Error::type_mismatch("string", other.type_name(), &CodingPath::root())),
        }
    }
}
