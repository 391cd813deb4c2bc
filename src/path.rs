//! Paths locating values in nested inputs.
//!
//! Every [`crate::Issue`] carries a [`FieldPath`] pointing at the value that
//! failed, built from field-name and array-index [`Segment`]s.

use std::fmt::{self, Display};

/// One step of a [`FieldPath`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Segment {
    /// An object field, e.g. `email`.
    Key(String),
    /// An array position, e.g. `[3]`.
    Index(usize),
}

/// An ordered path into a nested value, e.g. `users[0].email`.
///
/// Paths are immutable; [`child`](FieldPath::child) and
/// [`element`](FieldPath::element) return extended copies so sibling paths
/// can be derived from a shared prefix.
///
/// # Example
///
/// ```rust
/// use triage::FieldPath;
///
/// let path = FieldPath::root().child("users").element(0).child("email");
/// assert_eq!(path.to_string(), "users[0].email");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct FieldPath {
    segments: Vec<Segment>,
}

impl FieldPath {
    /// The empty path addressing the root value.
    pub fn root() -> Self {
        Self::default()
    }

    /// Returns this path extended by a field segment.
    pub fn child(&self, name: impl Into<String>) -> Self {
        let mut segments = self.segments.clone();
        segments.push(Segment::Key(name.into()));
        Self { segments }
    }

    /// Returns this path extended by an array-index segment.
    pub fn element(&self, index: usize) -> Self {
        let mut segments = self.segments.clone();
        segments.push(Segment::Index(index));
        Self { segments }
    }

    /// True if this path addresses the root value.
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Number of segments.
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// True if the path has no segments.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Iterates the segments from the root outward.
    pub fn segments(&self) -> impl Iterator<Item = &Segment> {
        self.segments.iter()
    }

    /// The first segment, used to group issues by top-level field.
    pub fn first(&self) -> Option<&Segment> {
        self.segments.first()
    }

    /// The last segment, or `None` at the root.
    pub fn last(&self) -> Option<&Segment> {
        self.segments.last()
    }
}

impl Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            match segment {
                Segment::Key(name) => {
                    if i > 0 {
                        write!(f, ".")?;
                    }
                    write!(f, "{}", name)?;
                }
                Segment::Index(index) => write!(f, "[{}]", index)?,
            }
        }
        Ok(())
    }
}

impl Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::Key(name) => write!(f, "{}", name),
            Segment::Index(index) => write!(f, "[{}]", index),
        }
    }
}
