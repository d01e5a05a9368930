//! The immutable value model produced by the reader.
//!
//! A [`Document`] owns the input buffer and every node parsed from it.
//! Nodes are addressed through [`Node`] handles, which borrow the document
//! and are therefore valid exactly as long as it is. A document never
//! changes after construction, so it can be shared across threads (for
//! example behind an `Arc`) and read concurrently without locking.
//!
//! ```rust
//! use codable_json::{Document, NodeKind, ReadOptions};
//!
//! let doc = Document::parse(br#"{"name": "Ada", "tags": ["math", "code"]}"#, ReadOptions::DEFAULT)?;
//! let root = doc.root().unwrap();
//! let object = root.as_object().unwrap();
//!
//! assert_eq!(object.get("name").and_then(|n| n.as_str()), Some("Ada"));
//! let tags = object.get("tags").and_then(|n| n.as_array()).unwrap();
//! assert_eq!(tags.len(), 2);
//! assert_eq!(tags.get(1).map(|n| n.kind()), Some(NodeKind::String));
//! # Ok::<(), codable_json::Error>(())
//! ```

use crate::error::{Error, Result};
use crate::number::Number;
use crate::options::ReadOptions;
use crate::read::{self, Parts};
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Text {
    Span { start: usize, end: usize },
    Owned(usize),
}

#[derive(Clone, Copy, Debug)]
pub(crate) enum Slot {
    Null,
    Bool(bool),
    Number(Number),
    Raw(Text),
    String(Text),
    Array { start: usize, len: usize },
    Object { start: usize, len: usize },
}

#[derive(Clone, Copy, Debug)]
pub(crate) struct Member {
    pub(crate) key: Text,
    pub(crate) value: usize,
}

/// The kind of a node, without its payload.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Null,
    Bool,
    Number,
    /// A number kept as its literal text (see [`ReadOptions::NUMBER_AS_RAW`]).
    Raw,
    String,
    Array,
    Object,
}

impl NodeKind {
    /// The name used in type mismatch errors.
    #[must_use]
    pub const fn type_name(self) -> &'static str {
        match self {
            NodeKind::Null => "null",
            NodeKind::Bool => "bool",
            NodeKind::Number => "number",
            NodeKind::Raw => "raw",
            NodeKind::String => "string",
            NodeKind::Array => "array",
            NodeKind::Object => "object",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name())
    }
}

/// A parsed, immutable JSON document.
pub struct Document {
    buf: Vec<u8>,
    nodes: Vec<Slot>,
    children: Vec<usize>,
    members: Vec<Member>,
    owned: Vec<String>,
    root: Option<usize>,
}

impl Document {
    /// Parses a copy of `input`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Parse`] when the input is not well-formed under `options`.
    pub fn parse(input: &[u8], options: ReadOptions) -> Result<Self> {
        Self::parse_owned(input.to_vec(), options)
    }

    /// Parses `input` and keeps it as the document's backing buffer, so
    /// unescaped strings are served from it without copying.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Parse`] when the input is not well-formed under `options`.
    pub fn parse_owned(input: Vec<u8>, options: ReadOptions) -> Result<Self> {
        let parts = match read::read(&input, options) {
            Ok(parts) => parts,
            Err(err) => {
                if let Error::Parse { code, position, .. } = &err {
                    tracing::debug!(?code, position, len = input.len(), "document parse failed");
                }
                return Err(err);
            }
        };
        let Parts {
            nodes,
            children,
            members,
            owned,
            root,
        } = parts;
        tracing::trace!(nodes = nodes.len(), bytes = input.len(), "document parsed");
        Ok(Document {
            buf: input,
            nodes,
            children,
            members,
            owned,
            root,
        })
    }

    /// Parses a string slice.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Parse`] when the input is not well-formed under `options`.
    pub fn parse_str(input: &str, options: ReadOptions) -> Result<Self> {
        Self::parse(input.as_bytes(), options)
    }

    /// The root node. `None` only for a document without a value, which the
    /// reader never produces for accepted input.
    #[must_use]
    pub fn root(&self) -> Option<Node<'_>> {
        self.root.map(|index| Node { doc: self, index })
    }

    /// The root as an object, if it is one.
    #[must_use]
    pub fn root_object(&self) -> Option<ObjectRef<'_>> {
        self.root().and_then(|node| node.as_object())
    }

    /// The root as an array, if it is one.
    #[must_use]
    pub fn root_array(&self) -> Option<ArrayRef<'_>> {
        self.root().and_then(|node| node.as_array())
    }

    /// Total number of nodes in the document.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    fn text(&self, text: Text) -> &str {
        match text {
            Text::Span { start, end } => self
                .buf
                .get(start..end)
                .and_then(|bytes| std::str::from_utf8(bytes).ok())
                .unwrap_or_default(),
            Text::Owned(index) => self.owned.get(index).map(String::as_str).unwrap_or_default(),
        }
    }
}

impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Document")
            .field("bytes", &self.buf.len())
            .field("nodes", &self.nodes.len())
            .field("root", &self.root().map(|node| node.kind()))
            .finish()
    }
}

/// A handle to one node inside a [`Document`].
#[derive(Clone, Copy)]
pub struct Node<'a> {
    doc: &'a Document,
    index: usize,
}

impl<'a> Node<'a> {
    fn slot(&self) -> Slot {
        self.doc.nodes.get(self.index).copied().unwrap_or(Slot::Null)
    }

    #[must_use]
    pub fn kind(&self) -> NodeKind {
        match self.slot() {
            Slot::Null => NodeKind::Null,
            Slot::Bool(_) => NodeKind::Bool,
            Slot::Number(_) => NodeKind::Number,
            Slot::Raw(_) => NodeKind::Raw,
            Slot::String(_) => NodeKind::String,
            Slot::Array { .. } => NodeKind::Array,
            Slot::Object { .. } => NodeKind::Object,
        }
    }

    /// The document this node belongs to.
    #[must_use]
    pub fn document(&self) -> &'a Document {
        self.doc
    }

    #[inline]
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self.slot(), Slot::Null)
    }

    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self.slot() {
            Slot::Bool(b) => Some(b),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_number(&self) -> Option<Number> {
        match self.slot() {
            Slot::Number(n) => Some(n),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        self.as_number().map(|n| n.as_f64())
    }

    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        self.as_number().and_then(|n| n.as_i64())
    }

    #[must_use]
    pub fn as_u64(&self) -> Option<u64> {
        self.as_number().and_then(|n| n.as_u64())
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&'a str> {
        match self.slot() {
            Slot::String(text) => Some(self.doc.text(text)),
            _ => None,
        }
    }

    /// The literal text of a raw number.
    #[must_use]
    pub fn as_raw(&self) -> Option<&'a str> {
        match self.slot() {
            Slot::Raw(text) => Some(self.doc.text(text)),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_object(&self) -> Option<ObjectRef<'a>> {
        match self.slot() {
            Slot::Object { start, len } => Some(ObjectRef {
                doc: self.doc,
                start,
                len,
            }),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_array(&self) -> Option<ArrayRef<'a>> {
        match self.slot() {
            Slot::Array { start, len } => Some(ArrayRef {
                doc: self.doc,
                start,
                len,
            }),
            _ => None,
        }
    }

    /// Shorthand for looking up `key` when this node is an object.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<Node<'a>> {
        self.as_object().and_then(|object| object.get(key))
    }

    /// Shorthand for indexing when this node is an array.
    #[must_use]
    pub fn at(&self, index: usize) -> Option<Node<'a>> {
        self.as_array().and_then(|array| array.get(index))
    }
}

impl fmt::Debug for Node<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.slot() {
            Slot::Null => f.write_str("Null"),
            Slot::Bool(b) => write!(f, "Bool({b})"),
            Slot::Number(n) => write!(f, "Number({n})"),
            Slot::Raw(text) => write!(f, "Raw({})", self.doc.text(text)),
            Slot::String(text) => write!(f, "String({:?})", self.doc.text(text)),
            Slot::Array { len, .. } => write!(f, "Array(len = {len})"),
            Slot::Object { len, .. } => write!(f, "Object(len = {len})"),
        }
    }
}

/// An object node: ordered `(key, value)` members.
///
/// Duplicate keys from the input are kept in input order; lookups return
/// the first match.
#[derive(Clone, Copy)]
pub struct ObjectRef<'a> {
    doc: &'a Document,
    start: usize,
    len: usize,
}

impl<'a> ObjectRef<'a> {
    fn members(&self) -> &'a [Member] {
        let end = self.start.saturating_add(self.len);
        self.doc.members.get(self.start..end).unwrap_or(&[])
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the first member named `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<Node<'a>> {
        self.iter().find(|(k, _)| *k == key).map(|(_, node)| node)
    }

    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.iter().any(|(k, _)| k == key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &'a str> + 'a {
        self.iter().map(|(key, _)| key)
    }

    #[must_use]
    pub fn iter(&self) -> ObjectIter<'a> {
        ObjectIter {
            doc: self.doc,
            members: self.members().iter(),
        }
    }
}

impl<'a> IntoIterator for ObjectRef<'a> {
    type Item = (&'a str, Node<'a>);
    type IntoIter = ObjectIter<'a>;

    fn into_iter(self) -> ObjectIter<'a> {
        self.iter()
    }
}

impl fmt::Debug for ObjectRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

pub struct ObjectIter<'a> {
    doc: &'a Document,
    members: std::slice::Iter<'a, Member>,
}

impl<'a> Iterator for ObjectIter<'a> {
    type Item = (&'a str, Node<'a>);

    fn next(&mut self) -> Option<Self::Item> {
        let member = self.members.next()?;
        Some((
            self.doc.text(member.key),
            Node {
                doc: self.doc,
                index: member.value,
            },
        ))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.members.size_hint()
    }
}

impl ExactSizeIterator for ObjectIter<'_> {}

/// An array node: ordered elements.
#[derive(Clone, Copy)]
pub struct ArrayRef<'a> {
    doc: &'a Document,
    start: usize,
    len: usize,
}

impl<'a> ArrayRef<'a> {
    fn indices(&self) -> &'a [usize] {
        let end = self.start.saturating_add(self.len);
        self.doc.children.get(self.start..end).unwrap_or(&[])
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<Node<'a>> {
        self.indices().get(index).map(|&index| Node {
            doc: self.doc,
            index,
        })
    }

    #[must_use]
    pub fn iter(&self) -> ArrayIter<'a> {
        ArrayIter {
            doc: self.doc,
            indices: self.indices().iter(),
        }
    }
}

impl<'a> IntoIterator for ArrayRef<'a> {
    type Item = Node<'a>;
    type IntoIter = ArrayIter<'a>;

    fn into_iter(self) -> ArrayIter<'a> {
        self.iter()
    }
}

impl fmt::Debug for ArrayRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

pub struct ArrayIter<'a> {
    doc: &'a Document,
    indices: std::slice::Iter<'a, usize>,
}

impl<'a> Iterator for ArrayIter<'a> {
    type Item = Node<'a>;

    fn next(&mut self) -> Option<Node<'a>> {
        self.indices.next().map(|&index| Node {
            doc: self.doc,
            index,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.indices.size_hint()
    }
}

impl ExactSizeIterator for ArrayIter<'_> {}
