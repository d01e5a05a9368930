//! The mutable, append-only tree the encoder builds.
//!
//! Nodes live in the [`Builder`]'s arena and are addressed by [`MutId`].
//! Children are always allocated through their parent ([`Builder::insert`],
//! [`Builder::append`]), so a child is attached before anything is written
//! into it and a partially built subtree stays reachable from the root.

use crate::number::Number;
use crate::path::CodingPath;
use indexmap::IndexMap;

/// Handle to a node in a [`Builder`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MutId(usize);

/// One node of the build tree.
#[derive(Clone, Debug, PartialEq)]
pub enum MutNode {
    /// Allocated and attached, but no value written yet.
    Pending,
    Null,
    Bool(bool),
    Number(Number),
    /// Number text written verbatim.
    Raw(String),
    String(String),
    Array(Vec<MutId>),
    Object(IndexMap<String, MutId>),
}

/// Arena owning every node of one encode call.
#[derive(Debug, Default)]
pub struct Builder {
    nodes: Vec<MutNode>,
}

impl Builder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocates a detached, pending node. Used for roots; children come
    /// from [`insert`](Self::insert) and [`append`](Self::append).
    pub fn alloc(&mut self) -> MutId {
        self.nodes.push(MutNode::Pending);
        MutId(self.nodes.len() - 1)
    }

    #[must_use]
    pub fn node(&self, id: MutId) -> &MutNode {
        &self.nodes[id.0]
    }

    pub fn set(&mut self, id: MutId, node: MutNode) {
        self.nodes[id.0] = node;
    }

    /// Number of nodes allocated so far, including orphaned ones.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Turns `id` into an empty object unless it already is one.
    pub fn make_object(&mut self, id: MutId) {
        if !matches!(self.nodes[id.0], MutNode::Object(_)) {
            self.nodes[id.0] = MutNode::Object(IndexMap::new());
        }
    }

    /// Turns `id` into an empty array unless it already is one.
    pub fn make_array(&mut self, id: MutId) {
        if !matches!(self.nodes[id.0], MutNode::Array(_)) {
            self.nodes[id.0] = MutNode::Array(Vec::new());
        }
    }

    /// Attaches a pending child under `key`. Writing an existing key
    /// replaces its value and keeps its position.
    pub fn insert(&mut self, object: MutId, key: String) -> MutId {
        self.make_object(object);
        let child = self.alloc();
        if let MutNode::Object(map) = &mut self.nodes[object.0] {
            map.insert(key, child);
        }
        child
    }

    /// Appends a pending child to `array`.
    pub fn append(&mut self, array: MutId) -> MutId {
        self.make_array(array);
        let child = self.alloc();
        if let MutNode::Array(items) = &mut self.nodes[array.0] {
            items.push(child);
        }
        child
    }

    /// Sorts the keys of every object reachable from `root` by byte order.
    /// Array elements keep their order; their descendants are sorted too.
    pub fn sort_keys(&mut self, root: MutId) {
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            match &mut self.nodes[id.0] {
                MutNode::Object(map) => {
                    map.sort_keys();
                    stack.extend(map.values().copied());
                }
                MutNode::Array(items) => stack.extend(items.iter().copied()),
                _ => {}
            }
        }
    }

    /// Object members of `id` in order, or `None` if it is not an object.
    #[must_use]
    pub fn members(&self, id: MutId) -> Option<&IndexMap<String, MutId>> {
        match self.node(id) {
            MutNode::Object(map) => Some(map),
            _ => None,
        }
    }

    /// Elements of `id`, or `None` if it is not an array.
    #[must_use]
    pub fn elements(&self, id: MutId) -> Option<&[MutId]> {
        match self.node(id) {
            MutNode::Array(items) => Some(items),
            _ => None,
        }
    }

    /// Path (by wire key) of the first node under `root` still waiting
    /// for a value.
    pub(crate) fn pending_path(&self, root: MutId) -> Option<CodingPath> {
        let mut stack = vec![(root, CodingPath::root())];
        while let Some((id, path)) = stack.pop() {
            match self.node(id) {
                MutNode::Pending => return Some(path),
                MutNode::Object(map) => stack.extend(
                    map.iter()
                        .rev()
                        .map(|(key, &child)| (child, path.push_key(key))),
                ),
                MutNode::Array(items) => stack.extend(
                    items
                        .iter()
                        .enumerate()
                        .rev()
                        .map(|(i, &child)| (child, path.push_index(i))),
                ),
                _ => {}
            }
        }
        None
    }
}
