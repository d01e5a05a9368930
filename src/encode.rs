//! The encode engine: typed values written into a build tree, then printed.
//!
//! A type implements [`Encode`] by asking its [`EncodeContext`] for one
//! container shape and writing into it:
//!
//! ```rust
//! use codable_json::{encode_to_string, Encode, EncodeContext, Result};
//!
//! struct Point {
//!     x: f64,
//!     y: f64,
//!     label: Option<String>,
//! }
//!
//! impl Encode for Point {
//!     fn encode(&self, ctx: EncodeContext<'_>) -> Result<()> {
//!         let mut keyed = ctx.keyed();
//!         keyed.encode("x", &self.x)?;
//!         keyed.encode("y", &self.y)?;
//!         keyed.encode_if_present("label", &self.label)
//!     }
//! }
//!
//! let json = encode_to_string(&Point { x: 1.0, y: 2.5, label: None })?;
//! assert_eq!(json, r#"{"x":1.0,"y":2.5}"#);
//! # Ok::<(), codable_json::Error>(())
//! ```

use crate::build::{Builder, MutId, MutNode};
use crate::error::{Error, Result, WriteErrorCode};
use crate::number::Number;
use crate::options::WriteOptions;
use crate::path::CodingPath;
use crate::strategy::{
    DataEncodingStrategy, DateEncodingStrategy, KeyEncodingStrategy,
    NonConformingFloatEncodingStrategy,
};
use crate::write::write_tree;
use std::cell::RefCell;
use std::io;

/// Configuration for one encode call.
///
/// # Examples
///
/// ```rust
/// use codable_json::{EncodeOptions, KeyEncodingStrategy, WriteOptions};
///
/// let options = EncodeOptions::new()
///     .with_write_options(WriteOptions::PRETTY | WriteOptions::SORTED_KEYS)
///     .with_key_strategy(KeyEncodingStrategy::ConvertToSnakeCase);
///
/// assert!(options.write_options.contains(WriteOptions::SORTED_KEYS));
/// ```
#[derive(Clone, Debug, Default)]
pub struct EncodeOptions {
    /// Formatting flags. `SORTED_KEYS` is applied to the tree before printing.
    pub write_options: WriteOptions,
    pub key_strategy: KeyEncodingStrategy,
    pub date_strategy: DateEncodingStrategy,
    pub data_strategy: DataEncodingStrategy,
    pub float_strategy: NonConformingFloatEncodingStrategy,
}

impl EncodeOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Default options with pretty printing.
    #[must_use]
    pub fn pretty() -> Self {
        Self::default().with_write_options(WriteOptions::PRETTY)
    }

    #[must_use]
    pub fn with_write_options(mut self, write_options: WriteOptions) -> Self {
        self.write_options = write_options;
        self
    }

    #[must_use]
    pub fn with_key_strategy(mut self, strategy: KeyEncodingStrategy) -> Self {
        self.key_strategy = strategy;
        self
    }

    #[must_use]
    pub fn with_date_strategy(mut self, strategy: DateEncodingStrategy) -> Self {
        self.date_strategy = strategy;
        self
    }

    #[must_use]
    pub fn with_data_strategy(mut self, strategy: DataEncodingStrategy) -> Self {
        self.data_strategy = strategy;
        self
    }

    #[must_use]
    pub fn with_float_strategy(mut self, strategy: NonConformingFloatEncodingStrategy) -> Self {
        self.float_strategy = strategy;
        self
    }
}

/// A type that can write itself into a build tree.
pub trait Encode {
    fn encode(&self, ctx: EncodeContext<'_>) -> Result<()>;
}

/// Encodes `value` to compact JSON bytes.
///
/// # Errors
///
/// Returns the first error raised by `T`, an invalid-data error if some
/// value wrote nothing, or a write error from the printer.
pub fn encode<T: Encode + ?Sized>(value: &T) -> Result<Vec<u8>> {
    encode_with_options(value, &EncodeOptions::default())
}

/// Encodes `value` with the given options.
///
/// # Errors
///
/// Returns the first error raised by `T`, an invalid-data error if some
/// value wrote nothing, or a write error from the printer.
pub fn encode_with_options<T: Encode + ?Sized>(value: &T, options: &EncodeOptions) -> Result<Vec<u8>> {
    tracing::trace!(source_type = std::any::type_name::<T>(), "encode");
    let (builder, root) = build_tree(value, options)?;
    write_tree(&builder, root, options.write_options)
}

/// Encodes `value` to a `String`.
///
/// # Errors
///
/// Same as [`encode_with_options`].
pub fn encode_to_string<T: Encode + ?Sized>(value: &T) -> Result<String> {
    encode_to_string_with_options(value, &EncodeOptions::default())
}

/// Encodes `value` to a `String` with the given options.
///
/// # Errors
///
/// Same as [`encode_with_options`].
pub fn encode_to_string_with_options<T: Encode + ?Sized>(
    value: &T,
    options: &EncodeOptions,
) -> Result<String> {
    let bytes = encode_with_options(value, options)?;
    String::from_utf8(bytes).map_err(|err| Error::invalid_data(err.to_string(), &CodingPath::root()))
}

/// Encodes `value` into an I/O sink.
///
/// # Errors
///
/// Same as [`encode_with_options`], plus a write error when the sink fails.
pub fn encode_to_writer<W, T>(mut writer: W, value: &T, options: &EncodeOptions) -> Result<()>
where
    W: io::Write,
    T: Encode + ?Sized,
{
    let bytes = encode_with_options(value, options)?;
    writer
        .write_all(&bytes)
        .map_err(|err| Error::write(WriteErrorCode::Io, err.to_string()))
}

/// Runs `value`'s encoder and returns the finished, optionally sorted tree.
pub(crate) fn build_tree<T: Encode + ?Sized>(
    value: &T,
    options: &EncodeOptions,
) -> Result<(Builder, MutId)> {
    let cell = RefCell::new(Builder::new());
    let root = cell.borrow_mut().alloc();
    let result = value.encode(EncodeContext::new(&cell, root, CodingPath::root(), options));
    if let Err(err) = result {
        tracing::debug!(
            source_type = std::any::type_name::<T>(),
            kind = ?err.kind(),
            path = err.path().unwrap_or_default(),
            "encode failed"
        );
        return Err(err);
    }

    let mut builder = cell.into_inner();
    if let Some(path) = builder.pending_path(root) {
        return Err(Error::invalid_data("value did not encode anything", &path));
    }
    if options.write_options.contains(WriteOptions::SORTED_KEYS) {
        builder.sort_keys(root);
    }
    Ok((builder, root))
}

/// Where the encoder is: the node being written, its path, and the options
/// of the call.
#[derive(Clone)]
pub struct EncodeContext<'a> {
    builder: &'a RefCell<Builder>,
    node: MutId,
    path: CodingPath,
    options: &'a EncodeOptions,
}

impl<'a> EncodeContext<'a> {
    pub(crate) fn new(
        builder: &'a RefCell<Builder>,
        node: MutId,
        path: CodingPath,
        options: &'a EncodeOptions,
    ) -> Self {
        EncodeContext {
            builder,
            node,
            path,
            options,
        }
    }

    #[must_use]
    pub fn path(&self) -> &CodingPath {
        &self.path
    }

    #[must_use]
    pub fn options(&self) -> &'a EncodeOptions {
        self.options
    }

    /// Makes the node an object (reusing it if it already is one).
    #[must_use]
    pub fn keyed(self) -> KeyedEncoder<'a> {
        self.builder.borrow_mut().make_object(self.node);
        KeyedEncoder { ctx: self }
    }

    /// Makes the node an array (reusing it if it already is one).
    #[must_use]
    pub fn indexed(self) -> IndexedEncoder<'a> {
        self.builder.borrow_mut().make_array(self.node);
        IndexedEncoder { ctx: self }
    }

    #[must_use]
    pub fn single_value(self) -> SingleValueEncoder<'a> {
        SingleValueEncoder { ctx: self }
    }

    /// Writes `value` into this node.
    pub fn encode<T: Encode + ?Sized>(self, value: &T) -> Result<()> {
        value.encode(self)
    }

    fn set(&self, node: MutNode) {
        self.builder.borrow_mut().set(self.node, node);
    }

    fn child(&self, node: MutId, path: CodingPath) -> EncodeContext<'a> {
        EncodeContext {
            builder: self.builder,
            node,
            path,
            options: self.options,
        }
    }
}

/// Writes object members. Keys pass through the key strategy.
pub struct KeyedEncoder<'a> {
    ctx: EncodeContext<'a>,
}

impl<'a> KeyedEncoder<'a> {
    #[must_use]
    pub fn path(&self) -> &CodingPath {
        &self.ctx.path
    }

    /// Attaches a pending member for `key` and returns its context.
    pub fn encoder_for(&mut self, key: &str) -> EncodeContext<'a> {
        let wire = self.ctx.options.key_strategy.wire_key(key, &self.ctx.path);
        let child = self.ctx.builder.borrow_mut().insert(self.ctx.node, wire);
        self.ctx.child(child, self.ctx.path.push_key(key))
    }

    pub fn encode<T: Encode + ?Sized>(&mut self, key: &str, value: &T) -> Result<()> {
        value.encode(self.encoder_for(key))
    }

    pub fn encode_null(&mut self, key: &str) -> Result<()> {
        self.encoder_for(key).single_value().encode_null()
    }

    /// Writes `value` if it is `Some`; writes nothing for `None`.
    pub fn encode_if_present<T: Encode>(&mut self, key: &str, value: &Option<T>) -> Result<()> {
        match value {
            Some(value) => self.encode(key, value),
            None => Ok(()),
        }
    }

    pub fn nested_keyed(&mut self, key: &str) -> KeyedEncoder<'a> {
        self.encoder_for(key).keyed()
    }

    pub fn nested_indexed(&mut self, key: &str) -> IndexedEncoder<'a> {
        self.encoder_for(key).indexed()
    }
}

/// Appends array elements in call order.
pub struct IndexedEncoder<'a> {
    ctx: EncodeContext<'a>,
}

impl<'a> IndexedEncoder<'a> {
    #[must_use]
    pub fn path(&self) -> &CodingPath {
        &self.ctx.path
    }

    /// Elements written so far.
    #[must_use]
    pub fn count(&self) -> usize {
        self.ctx
            .builder
            .borrow()
            .elements(self.ctx.node)
            .map_or(0, <[MutId]>::len)
    }

    /// Appends a pending element and returns its context.
    pub fn encoder_for_next(&mut self) -> EncodeContext<'a> {
        let index = self.count();
        let child = self.ctx.builder.borrow_mut().append(self.ctx.node);
        self.ctx.child(child, self.ctx.path.push_index(index))
    }

    pub fn encode<T: Encode + ?Sized>(&mut self, value: &T) -> Result<()> {
        value.encode(self.encoder_for_next())
    }

    pub fn encode_null(&mut self) -> Result<()> {
        self.encoder_for_next().single_value().encode_null()
    }

    pub fn nested_keyed(&mut self) -> KeyedEncoder<'a> {
        self.encoder_for_next().keyed()
    }

    pub fn nested_indexed(&mut self) -> IndexedEncoder<'a> {
        self.encoder_for_next().indexed()
    }
}

/// Writes the node as one scalar.
pub struct SingleValueEncoder<'a> {
    ctx: EncodeContext<'a>,
}

impl<'a> SingleValueEncoder<'a> {
    #[must_use]
    pub fn path(&self) -> &CodingPath {
        &self.ctx.path
    }

    #[must_use]
    pub fn options(&self) -> &'a EncodeOptions {
        self.ctx.options
    }

    pub fn encode_null(self) -> Result<()> {
        self.ctx.set(MutNode::Null);
        Ok(())
    }

    pub fn encode_bool(self, value: bool) -> Result<()> {
        self.ctx.set(MutNode::Bool(value));
        Ok(())
    }

    pub fn encode_i64(self, value: i64) -> Result<()> {
        self.ctx.set(MutNode::Number(Number::from(value)));
        Ok(())
    }

    pub fn encode_u64(self, value: u64) -> Result<()> {
        self.ctx.set(MutNode::Number(Number::from(value)));
        Ok(())
    }

    /// Writes a float. NaN and infinities become the strategy's sentinel
    /// strings when one is configured, and are left to the printer otherwise.
    pub fn encode_f64(self, value: f64) -> Result<()> {
        let node = match self.ctx.options.float_strategy.sentinel_for(value) {
            Some(sentinel) => MutNode::String(sentinel.to_string()),
            None => MutNode::Number(Number::Float(value)),
        };
        self.ctx.set(node);
        Ok(())
    }

    pub fn encode_f32(self, value: f32) -> Result<()> {
        self.encode_f64(f64::from(value))
    }

    pub fn encode_str(self, value: &str) -> Result<()> {
        self.ctx.set(MutNode::String(value.to_string()));
        Ok(())
    }

    /// Writes number text verbatim. The text must be a valid JSON number.
    pub fn encode_raw_number(self, text: &str) -> Result<()> {
        if !is_number_literal(text) {
            return Err(Error::invalid_data(
                format!("{text:?} is not a number literal"),
                &self.ctx.path,
            ));
        }
        self.ctx.set(MutNode::Raw(text.to_string()));
        Ok(())
    }

    /// Hands the node to `T`'s own encoding logic.
    pub fn encode<T: Encode + ?Sized>(self, value: &T) -> Result<()> {
        value.encode(self.ctx)
    }
}

fn is_number_literal(text: &str) -> bool {
    let digits = text.strip_prefix('-').unwrap_or(text);
    !digits.is_empty()
        && digits.bytes().next().is_some_and(|b| b.is_ascii_digit())
        && digits
            .bytes()
            .all(|b| b.is_ascii_digit() || matches!(b, b'.' | b'e' | b'E' | b'+' | b'-'))
}
