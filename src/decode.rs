//! The decode engine: typed values reconstructed from a [`Document`].
//!
//! A type implements [`Decode`] by asking its [`DecodeContext`] for exactly
//! one container shape and reading from it:
//!
//! ```rust
//! use codable_json::{decode, Decode, DecodeContext, Result};
//!
//! #[derive(Debug, PartialEq)]
//! struct Point {
//!     x: f64,
//!     y: f64,
//!     label: Option<String>,
//! }
//!
//! impl Decode for Point {
//!     fn decode(ctx: DecodeContext<'_>) -> Result<Self> {
//!         let keyed = ctx.keyed()?;
//!         Ok(Point {
//!             x: keyed.decode("x")?,
//!             y: keyed.decode("y")?,
//!             label: keyed.decode_optional("label")?,
//!         })
//!     }
//! }
//!
//! let point: Point = decode(br#"{"x": 1, "y": 2.5}"#)?;
//! assert_eq!(point, Point { x: 1.0, y: 2.5, label: None });
//! # Ok::<(), codable_json::Error>(())
//! ```
//!
//! Scalar reads go through one set of coercion rules no matter which
//! container they come from: numbers decode into `bool`, numeric strings
//! decode into integers and floats, numbers and booleans decode into
//! strings. Integer targets are range-checked; a value that does not fit
//! fails with [`Error::InvalidData`].

use crate::document::{ArrayRef, Document, Node, NodeKind, ObjectRef};
use crate::error::{Error, Result};
use crate::number::RawNumber;
use crate::options::{Json5Options, ReadOptions};
use crate::path::CodingPath;
use crate::strategy::{
    DataDecodingStrategy, DateDecodingStrategy, KeyDecodingStrategy,
    NonConformingFloatDecodingStrategy,
};
use std::borrow::Cow;

/// Configuration for one decode call.
///
/// # Examples
///
/// ```rust
/// use codable_json::{DecodeOptions, KeyDecodingStrategy, ReadOptions};
///
/// let options = DecodeOptions::new()
///     .with_read_options(ReadOptions::ALLOW_COMMENTS)
///     .with_json5(true)
///     .with_key_strategy(KeyDecodingStrategy::ConvertFromSnakeCase);
///
/// assert!(options.effective_read_options().contains(ReadOptions::ALLOW_UNQUOTED_KEYS));
/// ```
#[derive(Clone, Debug, Default)]
pub struct DecodeOptions {
    /// Flags handed to the reader.
    pub read_options: ReadOptions,
    /// Relaxed-syntax toggles, added to `read_options`.
    pub json5: Json5Options,
    pub key_strategy: KeyDecodingStrategy,
    pub date_strategy: DateDecodingStrategy,
    pub data_strategy: DataDecodingStrategy,
    pub float_strategy: NonConformingFloatDecodingStrategy,
}

impl DecodeOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_read_options(mut self, read_options: ReadOptions) -> Self {
        self.read_options = read_options;
        self
    }

    /// Sets the JSON5 toggles; `true` and `false` switch all of them.
    #[must_use]
    pub fn with_json5(mut self, json5: impl Into<Json5Options>) -> Self {
        self.json5 = json5.into();
        self
    }

    #[must_use]
    pub fn with_key_strategy(mut self, strategy: KeyDecodingStrategy) -> Self {
        self.key_strategy = strategy;
        self
    }

    #[must_use]
    pub fn with_date_strategy(mut self, strategy: DateDecodingStrategy) -> Self {
        self.date_strategy = strategy;
        self
    }

    #[must_use]
    pub fn with_data_strategy(mut self, strategy: DataDecodingStrategy) -> Self {
        self.data_strategy = strategy;
        self
    }

    #[must_use]
    pub fn with_float_strategy(mut self, strategy: NonConformingFloatDecodingStrategy) -> Self {
        self.float_strategy = strategy;
        self
    }

    /// The flags the reader actually runs with.
    #[must_use]
    pub fn effective_read_options(&self) -> ReadOptions {
        self.read_options | self.json5.read_options()
    }
}

/// A type that can rebuild itself from a decoded node.
pub trait Decode: Sized {
    fn decode(ctx: DecodeContext<'_>) -> Result<Self>;

    /// The value to use when a keyed container has no entry for the key.
    /// `None` makes the key required.
    fn absent() -> Option<Self> {
        None
    }
}

/// Decodes `input` with default options.
///
/// # Errors
///
/// Returns a parse error for malformed input, or the first decode error
/// raised by `T`.
pub fn decode<T: Decode>(input: &[u8]) -> Result<T> {
    decode_with_options(input, &DecodeOptions::default())
}

/// Decodes `input` with the given options.
///
/// # Errors
///
/// Returns a parse error for malformed input, or the first decode error
/// raised by `T`.
pub fn decode_with_options<T: Decode>(input: &[u8], options: &DecodeOptions) -> Result<T> {
    tracing::trace!(
        target_type = std::any::type_name::<T>(),
        bytes = input.len(),
        "decode"
    );
    let document = Document::parse(input, options.effective_read_options())?;
    decode_document(&document, options)
}

/// Decodes `input`, handing the buffer to the document instead of copying it.
///
/// # Errors
///
/// Returns a parse error for malformed input, or the first decode error
/// raised by `T`.
pub fn decode_owned<T: Decode>(input: Vec<u8>, options: &DecodeOptions) -> Result<T> {
    let document = Document::parse_owned(input, options.effective_read_options())?;
    decode_document(&document, options)
}

/// Decodes a value from an already parsed document.
///
/// The document is only read, so several threads may decode from one
/// document at the same time.
///
/// # Errors
///
/// Returns [`Error::MissingValue`] for a document without a root, or the
/// first decode error raised by `T`.
pub fn decode_document<T: Decode>(document: &Document, options: &DecodeOptions) -> Result<T> {
    let root = document
        .root()
        .ok_or_else(|| Error::missing_value(&CodingPath::root()))?;
    let result = T::decode(DecodeContext::new(Some(root), CodingPath::root(), options));
    if let Err(err) = &result {
        tracing::debug!(
            target_type = std::any::type_name::<T>(),
            kind = ?err.kind(),
            path = err.path().unwrap_or_default(),
            "decode failed"
        );
    }
    result
}

/// Where the decoder is: the current node (if any), its path, and the
/// options of the call.
#[derive(Clone)]
pub struct DecodeContext<'a> {
    node: Option<Node<'a>>,
    path: CodingPath,
    options: &'a DecodeOptions,
}

impl<'a> DecodeContext<'a> {
    /// A context over `node`. `None` stands for a value that is not there.
    #[must_use]
    pub fn new(node: Option<Node<'a>>, path: CodingPath, options: &'a DecodeOptions) -> Self {
        DecodeContext {
            node,
            path,
            options,
        }
    }

    #[must_use]
    pub fn node(&self) -> Option<Node<'a>> {
        self.node
    }

    #[must_use]
    pub fn path(&self) -> &CodingPath {
        &self.path
    }

    #[must_use]
    pub fn options(&self) -> &'a DecodeOptions {
        self.options
    }

    /// `true` when the value is absent or `null`.
    #[must_use]
    pub fn is_null(&self) -> bool {
        self.node.map_or(true, |node| node.is_null())
    }

    fn present(&self) -> Result<Node<'a>> {
        match self.node {
            Some(node) if !node.is_null() => Ok(node),
            _ => Err(Error::missing_value(&self.path)),
        }
    }

    /// The node as an object.
    ///
    /// # Errors
    ///
    /// [`Error::MissingValue`] for an absent or null value,
    /// [`Error::TypeMismatch`] for any other non-object.
    pub fn keyed(self) -> Result<KeyedDecoder<'a>> {
        let node = self.present()?;
        let object = node
            .as_object()
            .ok_or_else(|| Error::type_mismatch("object", node.kind().type_name(), &self.path))?;
        Ok(KeyedDecoder {
            object,
            path: self.path,
            options: self.options,
        })
    }

    /// The node as an array.
    ///
    /// # Errors
    ///
    /// [`Error::MissingValue`] for an absent or null value,
    /// [`Error::TypeMismatch`] for any other non-array.
    pub fn indexed(self) -> Result<IndexedDecoder<'a>> {
        let node = self.present()?;
        let array = node
            .as_array()
            .ok_or_else(|| Error::type_mismatch("array", node.kind().type_name(), &self.path))?;
        Ok(IndexedDecoder {
            array,
            index: 0,
            path: self.path,
            options: self.options,
        })
    }

    #[must_use]
    pub fn single_value(self) -> SingleValueDecoder<'a> {
        SingleValueDecoder { ctx: self }
    }

    /// Decodes the node as `T`.
    pub fn decode<T: Decode>(self) -> Result<T> {
        T::decode(self)
    }
}

/// Reads an object by logical key.
pub struct KeyedDecoder<'a> {
    object: ObjectRef<'a>,
    path: CodingPath,
    options: &'a DecodeOptions,
}

impl<'a> KeyedDecoder<'a> {
    #[must_use]
    pub fn path(&self) -> &CodingPath {
        &self.path
    }

    /// Number of members, duplicates included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.object.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.object.is_empty()
    }

    fn lookup(&self, key: &str) -> Option<Node<'a>> {
        self.options.key_strategy.lookup(self.object, key, &self.path)
    }

    fn required(&self, key: &str) -> Result<Node<'a>> {
        self.lookup(key)
            .ok_or_else(|| Error::missing_key(key, &self.path.push_key(key)))
    }

    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.lookup(key).is_some()
    }

    /// Every key of the object, mapped through the key strategy.
    #[must_use]
    pub fn all_keys(&self) -> Vec<String> {
        self.object
            .keys()
            .map(|wire| self.options.key_strategy.logical_key(wire, &self.path))
            .collect()
    }

    /// A context for `key`, whose node is `None` when the key is absent.
    #[must_use]
    pub fn decoder_for(&self, key: &str) -> DecodeContext<'a> {
        DecodeContext {
            node: self.lookup(key),
            path: self.path.push_key(key),
            options: self.options,
        }
    }

    /// Decodes the value for `key`.
    ///
    /// # Errors
    ///
    /// [`Error::MissingKey`] when the key is absent and `T` has no
    /// [`absent`](Decode::absent) value, or any error raised by `T`.
    pub fn decode<T: Decode>(&self, key: &str) -> Result<T> {
        match self.lookup(key) {
            Some(node) => T::decode(self.decoder_at(node, key)),
            None => T::absent().ok_or_else(|| Error::missing_key(key, &self.path.push_key(key))),
        }
    }

    /// Decodes the value for `key`, treating absent and `null` alike as `None`.
    pub fn decode_optional<T: Decode>(&self, key: &str) -> Result<Option<T>> {
        match self.lookup(key) {
            Some(node) if !node.is_null() => T::decode(self.decoder_at(node, key)).map(Some),
            _ => Ok(None),
        }
    }

    /// Decodes the value for `key`, or returns `default` when it is absent or null.
    pub fn decode_or<T: Decode>(&self, key: &str, default: T) -> Result<T> {
        Ok(self.decode_optional(key)?.unwrap_or(default))
    }

    /// `true` if `key` is absent or its value is `null`.
    #[must_use]
    pub fn decode_null(&self, key: &str) -> bool {
        self.lookup(key).map_or(true, |node| node.is_null())
    }

    pub fn nested_keyed(&self, key: &str) -> Result<KeyedDecoder<'a>> {
        let node = self.required(key)?;
        self.decoder_at(node, key).keyed()
    }

    pub fn nested_indexed(&self, key: &str) -> Result<IndexedDecoder<'a>> {
        let node = self.required(key)?;
        self.decoder_at(node, key).indexed()
    }

    /// Members in document order as `(logical key, context)` pairs.
    pub fn entries(&self) -> impl Iterator<Item = (String, DecodeContext<'a>)> + '_ {
        self.object.iter().map(move |(wire, node)| {
            let key = self.options.key_strategy.logical_key(wire, &self.path);
            let path = self.path.push_key(&key);
            (
                key,
                DecodeContext {
                    node: Some(node),
                    path,
                    options: self.options,
                },
            )
        })
    }

    fn decoder_at(&self, node: Node<'a>, key: &str) -> DecodeContext<'a> {
        DecodeContext {
            node: Some(node),
            path: self.path.push_key(key),
            options: self.options,
        }
    }
}

/// Reads an array front to back.
///
/// The cursor advances once per successful read; a failed read leaves it
/// where it was.
pub struct IndexedDecoder<'a> {
    array: ArrayRef<'a>,
    index: usize,
    path: CodingPath,
    options: &'a DecodeOptions,
}

impl<'a> IndexedDecoder<'a> {
    #[must_use]
    pub fn path(&self) -> &CodingPath {
        &self.path
    }

    /// Number of elements. Always known for parsed documents.
    #[must_use]
    pub fn count(&self) -> Option<usize> {
        Some(self.array.len())
    }

    #[must_use]
    pub fn is_at_end(&self) -> bool {
        self.index >= self.array.len()
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.index
    }

    /// Fails with [`Error::InvalidData`] if elements remain, for fixed-size
    /// shapes such as tuples.
    pub fn ensure_at_end(&self) -> Result<()> {
        if self.is_at_end() {
            Ok(())
        } else {
            Err(Error::invalid_data(
                format!(
                    "expected {} elements, found {}",
                    self.index,
                    self.array.len()
                ),
                &self.path,
            ))
        }
    }

    fn current(&self) -> Result<(Node<'a>, CodingPath)> {
        let path = self.path.push_index(self.index);
        match self.array.get(self.index) {
            Some(node) => Ok((node, path)),
            None => Err(Error::missing_value(&path)),
        }
    }

    fn advance_on_success<T>(&mut self, result: Result<T>) -> Result<T> {
        if result.is_ok() {
            self.index += 1;
        }
        result
    }

    /// Decodes the next element.
    ///
    /// # Errors
    ///
    /// [`Error::MissingValue`] past the end, or any error raised by `T`.
    pub fn decode_next<T: Decode>(&mut self) -> Result<T> {
        let (node, path) = self.current()?;
        let result = T::decode(self.context(node, path));
        self.advance_on_success(result)
    }

    /// Decodes the next element, mapping `null` to `None`.
    pub fn decode_next_optional<T: Decode>(&mut self) -> Result<Option<T>> {
        let (node, path) = self.current()?;
        if node.is_null() {
            self.index += 1;
            return Ok(None);
        }
        let result = T::decode(self.context(node, path)).map(Some);
        self.advance_on_success(result)
    }

    /// Consumes the next element only if it is `null`.
    pub fn decode_next_null(&mut self) -> Result<bool> {
        let (node, _) = self.current()?;
        if node.is_null() {
            self.index += 1;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    pub fn nested_keyed(&mut self) -> Result<KeyedDecoder<'a>> {
        let (node, path) = self.current()?;
        let result = self.context(node, path).keyed();
        self.advance_on_success(result)
    }

    pub fn nested_indexed(&mut self) -> Result<IndexedDecoder<'a>> {
        let (node, path) = self.current()?;
        let result = self.context(node, path).indexed();
        self.advance_on_success(result)
    }

    /// A context for the next element; the cursor moves past it.
    pub fn next_decoder(&mut self) -> Result<DecodeContext<'a>> {
        let (node, path) = self.current()?;
        self.index += 1;
        Ok(self.context(node, path))
    }

    fn context(&self, node: Node<'a>, path: CodingPath) -> DecodeContext<'a> {
        DecodeContext {
            node: Some(node),
            path,
            options: self.options,
        }
    }
}

/// Reads the node as one scalar, applying the coercion rules.
pub struct SingleValueDecoder<'a> {
    ctx: DecodeContext<'a>,
}

impl<'a> SingleValueDecoder<'a> {
    #[must_use]
    pub fn path(&self) -> &CodingPath {
        &self.ctx.path
    }

    #[must_use]
    pub fn node(&self) -> Option<Node<'a>> {
        self.ctx.node
    }

    #[must_use]
    pub fn options(&self) -> &'a DecodeOptions {
        self.ctx.options
    }

    fn mismatch(&self, expected: &str, node: Node<'_>) -> Error {
        Error::type_mismatch(expected, node.kind().type_name(), &self.ctx.path)
    }

    fn invalid(&self, message: impl Into<String>) -> Error {
        Error::invalid_data(message, &self.ctx.path)
    }

    /// `true` when the value is absent or `null`.
    #[must_use]
    pub fn decode_null(&self) -> bool {
        self.ctx.is_null()
    }

    pub fn decode_bool(&self) -> Result<bool> {
        let node = self.ctx.present()?;
        match node.kind() {
            NodeKind::Bool => Ok(node.as_bool().unwrap_or_default()),
            NodeKind::Number => Ok(node.as_f64().map_or(false, |f| f != 0.0)),
            NodeKind::Raw => node
                .as_raw()
                .and_then(RawNumber::parse)
                .map(|number| number.as_f64() != 0.0)
                .ok_or_else(|| self.mismatch("bool", node)),
            NodeKind::String => {
                let text = node.as_str().unwrap_or_default();
                if text.eq_ignore_ascii_case("true") || text == "1" {
                    Ok(true)
                } else if text.eq_ignore_ascii_case("false") || text == "0" {
                    Ok(false)
                } else {
                    Err(self.mismatch("bool", node))
                }
            }
            _ => Err(self.mismatch("bool", node)),
        }
    }

    /// The node as an integer wider than any supported target.
    fn wide_integer(&self, expected: &str) -> Result<i128> {
        let node = self.ctx.present()?;
        match node.kind() {
            NodeKind::Number => {
                let number = node.as_number().ok_or_else(|| self.mismatch(expected, node))?;
                if let Some(value) = number.as_i128() {
                    return Ok(value);
                }
                let f = number.as_f64();
                if f.is_finite() && f.fract() == 0.0 {
                    Err(self.invalid(format!("number {number} does not fit in 64 bits")))
                } else {
                    Err(self.mismatch(expected, node))
                }
            }
            NodeKind::Raw => node
                .as_raw()
                .and_then(RawNumber::parse)
                .and_then(RawNumber::as_i128)
                .ok_or_else(|| self.mismatch(expected, node)),
            NodeKind::String => node
                .as_str()
                .and_then(|text| text.parse::<i128>().ok())
                .ok_or_else(|| self.mismatch(expected, node)),
            _ => Err(self.mismatch(expected, node)),
        }
    }

    /// Decodes an integer and checks that it fits `T`.
    pub(crate) fn integer<T: TryFrom<i128>>(&self, expected: &str, target: &str) -> Result<T> {
        let value = self.wide_integer(expected)?;
        T::try_from(value).map_err(|_| self.invalid(format!("number {value} does not fit in {target}")))
    }

    pub fn decode_i64(&self) -> Result<i64> {
        self.integer("integer", "i64")
    }

    pub fn decode_u64(&self) -> Result<u64> {
        self.integer("unsigned integer", "u64")
    }

    pub fn decode_f64(&self) -> Result<f64> {
        let node = self.ctx.present()?;
        let strategy = &self.ctx.options.float_strategy;
        let value = match node.kind() {
            NodeKind::Number => node.as_f64().ok_or_else(|| self.mismatch("float", node))?,
            NodeKind::Raw => node
                .as_raw()
                .and_then(RawNumber::parse)
                .map(RawNumber::as_f64)
                .ok_or_else(|| self.mismatch("float", node))?,
            NodeKind::String => {
                let text = node.as_str().unwrap_or_default();
                match strategy.from_sentinel(text) {
                    Some(value) => return Ok(value),
                    None => text.parse::<f64>().map_err(|_| self.mismatch("float", node))?,
                }
            }
            _ => return Err(self.mismatch("float", node)),
        };
        if !value.is_finite() && !strategy.allows_non_finite() {
            return Err(self.invalid(format!(
                "parsed number {value} does not fit; use a non-conforming float strategy"
            )));
        }
        Ok(value)
    }

    pub fn decode_f32(&self) -> Result<f32> {
        let value = self.decode_f64()?;
        let narrowed = value as f32;
        if value.is_finite() && narrowed.is_infinite() {
            return Err(self.invalid(format!("number {value} does not fit in f32")));
        }
        Ok(narrowed)
    }

    /// The node as text, borrowed from the document when it is a string.
    pub fn decode_str(&self) -> Result<Cow<'a, str>> {
        let node = self.ctx.present()?;
        match node.kind() {
            NodeKind::String => Ok(Cow::Borrowed(node.as_str().unwrap_or_default())),
            NodeKind::Raw => Ok(Cow::Borrowed(node.as_raw().unwrap_or_default())),
            NodeKind::Number => node
                .as_number()
                .map(|number| Cow::Owned(number.to_string()))
                .ok_or_else(|| self.mismatch("string", node)),
            NodeKind::Bool => Ok(Cow::Borrowed(if node.as_bool().unwrap_or_default() {
                "true"
            } else {
                "false"
            })),
            _ => Err(self.mismatch("string", node)),
        }
    }

    pub fn decode_string(&self) -> Result<String> {
        self.decode_str().map(Cow::into_owned)
    }

    /// Decodes a single character from a one-character string.
    pub fn decode_char(&self) -> Result<char> {
        let text = self.decode_str()?;
        let mut chars = text.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Ok(c),
            _ => Err(self.invalid(format!("expected a single character, got {:?}", text))),
        }
    }

    /// Hands the node to `T`'s own decoding logic.
    pub fn decode<T: Decode>(self) -> Result<T> {
        T::decode(self.ctx)
    }
}
