//! Coding paths: where in the document the engine currently is.
//!
//! A [`CodingPath`] is an immutable, shared-prefix list of segments. Pushing
//! a segment returns a new path and leaves the receiver untouched, so every
//! recursive call owns its own view without copying its ancestors.

use std::fmt;
use std::sync::Arc;

/// One step in a coding path: an object key or an array index.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum PathSegment {
    Key(String),
    Index(usize),
}

impl PathSegment {
    /// Returns the key text, or `None` for index segments.
    #[must_use]
    pub fn as_key(&self) -> Option<&str> {
        match self {
            PathSegment::Key(key) => Some(key),
            PathSegment::Index(_) => None,
        }
    }

    #[must_use]
    pub const fn as_index(&self) -> Option<usize> {
        match self {
            PathSegment::Key(_) => None,
            PathSegment::Index(index) => Some(*index),
        }
    }
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSegment::Key(key) => f.write_str(key),
            PathSegment::Index(index) => write!(f, "Index {index}"),
        }
    }
}

#[derive(Debug)]
struct Link {
    segment: PathSegment,
    parent: Option<Arc<Link>>,
}

/// The ordered sequence of segments leading to the current node.
///
/// # Examples
///
/// ```rust
/// use codable_json::CodingPath;
///
/// let parent = CodingPath::root().push_key("a").push_key("b");
/// let child = parent.push_index(1);
///
/// assert_eq!(parent.render(), "a.b");
/// assert_eq!(child.render(), "a.b.Index 1");
/// assert_eq!(child.len(), 3);
/// ```
#[derive(Clone, Default)]
pub struct CodingPath {
    tail: Option<Arc<Link>>,
    len: usize,
}

impl CodingPath {
    /// The empty path, positioned at the document root.
    #[must_use]
    pub fn root() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn push(&self, segment: PathSegment) -> Self {
        CodingPath {
            tail: Some(Arc::new(Link {
                segment,
                parent: self.tail.clone(),
            })),
            len: self.len + 1,
        }
    }

    #[must_use]
    pub fn push_key(&self, key: &str) -> Self {
        self.push(PathSegment::Key(key.to_string()))
    }

    #[must_use]
    pub fn push_index(&self, index: usize) -> Self {
        self.push(PathSegment::Index(index))
    }

    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The innermost segment.
    #[must_use]
    pub fn last(&self) -> Option<&PathSegment> {
        self.tail.as_deref().map(|link| &link.segment)
    }

    /// Segments from the root outwards.
    #[must_use]
    pub fn segments(&self) -> Vec<&PathSegment> {
        let mut out = Vec::with_capacity(self.len);
        let mut cursor = self.tail.as_deref();
        while let Some(link) = cursor {
            out.push(&link.segment);
            cursor = link.parent.as_deref();
        }
        out.reverse();
        out
    }

    /// Joins the segments with `.` for diagnostics.
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = String::new();
        for (i, segment) in self.segments().into_iter().enumerate() {
            if i > 0 {
                out.push('.');
            }
            out.push_str(&segment.to_string());
        }
        out
    }
}

impl PartialEq for CodingPath {
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len && self.segments() == other.segments()
    }
}

impl Eq for CodingPath {}

impl fmt::Display for CodingPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

impl fmt::Debug for CodingPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.segments()).finish()
    }
}
