//! Aggregate parse errors and their derived views.

use std::fmt::{self, Display};

use indexmap::IndexMap;
use serde_json::{json, Value};
use stillwater::prelude::*;

use crate::path::{FieldPath, Segment};

use super::issue::{Issue, IssueCode};

/// A non-empty, ordered collection of validation issues.
///
/// `ParseError` is what [`validate`](crate::SchemaLike::validate) fails with
/// and what [`safe_parse`](crate::SchemaLike::safe_parse) accumulates into.
/// The non-empty guarantee comes from wrapping `NonEmptyVec`, so a failure
/// always explains itself.
///
/// Two derived views are available: [`flatten`](ParseError::flatten) groups
/// messages by top-level field for form-style consumers, and
/// [`format`](ParseError::format) mirrors the input's nesting with an
/// `_errors` list per level.
///
/// # Combining
///
/// `ParseError` implements `Semigroup`, so failures from independent
/// validations merge in order:
///
/// ```rust
/// use triage::{FieldPath, Issue, IssueCode, ParseError};
/// use stillwater::prelude::*;
///
/// let a = ParseError::single(Issue::new(
///     IssueCode::MissingField,
///     FieldPath::root().child("name"),
///     "required field 'name' is missing",
/// ));
/// let b = ParseError::single(Issue::new(
///     IssueCode::TypeMismatch,
///     FieldPath::root().child("age"),
///     "expected number",
/// ));
///
/// assert_eq!(a.combine(b).len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ParseError(NonEmptyVec<Issue>);

impl ParseError {
    /// Wraps a single issue.
    pub fn single(issue: Issue) -> Self {
        Self(NonEmptyVec::singleton(issue))
    }

    /// Builds a `ParseError` from a vec of issues.
    ///
    /// # Panics
    ///
    /// Panics if `issues` is empty. Callers hold the invariant that a
    /// failure carries at least one issue.
    pub fn from_vec(issues: Vec<Issue>) -> Self {
        Self(NonEmptyVec::from_vec(issues).expect("ParseError requires at least one issue"))
    }

    /// Number of issues.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false; the collection is non-empty by construction.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// The first issue in input order.
    pub fn first(&self) -> &Issue {
        self.0.head()
    }

    /// Iterates the issues in input order.
    pub fn iter(&self) -> impl Iterator<Item = &Issue> {
        self.0.iter()
    }

    /// All issues located at `path`.
    pub fn at_path(&self, path: &FieldPath) -> Vec<&Issue> {
        self.0.iter().filter(|i| &i.path == path).collect()
    }

    /// All issues carrying `code`.
    pub fn with_code(&self, code: IssueCode) -> Vec<&Issue> {
        self.0.iter().filter(|i| i.code == code).collect()
    }

    /// Consumes this error into a plain `Vec`.
    pub fn into_vec(self) -> Vec<Issue> {
        self.0.into_vec()
    }

    /// Groups issues by top-level field.
    ///
    /// Issues at the root path land in `form_errors`; everything else is
    /// keyed by its first path segment (array positions at the top level key
    /// by index). Insertion order follows the issue order.
    ///
    /// # Example
    ///
    /// ```rust
    /// use triage::{Schema, SchemaLike};
    /// use serde_json::json;
    ///
    /// let schema = Schema::object()
    ///     .field("name", Schema::string())
    ///     .field("age", Schema::number());
    ///
    /// let err = schema
    ///     .safe_parse(&json!({"name": 42, "age": "NaN"}))
    ///     .into_result()
    ///     .unwrap_err();
    ///
    /// let flat = err.flatten();
    /// assert!(flat.form_errors.is_empty());
    /// assert!(flat.field_errors.contains_key("name"));
    /// assert!(flat.field_errors.contains_key("age"));
    /// ```
    pub fn flatten(&self) -> FlattenedError {
        let mut flat = FlattenedError::default();
        for issue in self.iter() {
            match issue.path.first() {
                None => flat.form_errors.push(issue.message.clone()),
                Some(segment) => {
                    let key = match segment {
                        Segment::Key(name) => name.clone(),
                        Segment::Index(index) => index.to_string(),
                    };
                    flat.field_errors
                        .entry(key)
                        .or_default()
                        .push(issue.message.clone());
                }
            }
        }
        flat
    }

    /// Builds a nested error tree mirroring the input's structure.
    ///
    /// Every level carries its own `_errors` message list; child levels are
    /// keyed by field name or stringified array index. Use
    /// [`FormattedError::to_value`] for the JSON projection.
    pub fn format(&self) -> FormattedError {
        let mut root = FormattedError::default();
        for issue in self.iter() {
            let segments: Vec<&Segment> = issue.path.segments().collect();
            root.insert(&segments, &issue.message);
        }
        root
    }
}

impl Semigroup for ParseError {
    fn combine(self, other: Self) -> Self {
        ParseError(self.0.combine(other.0))
    }
}

impl Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "validation failed with {} issue(s):", self.len())?;
        for (i, issue) in self.iter().enumerate() {
            writeln!(f, "  {}. {}", i + 1, issue)?;
        }
        Ok(())
    }
}

impl std::error::Error for ParseError {}

impl IntoIterator for ParseError {
    type Item = Issue;
    type IntoIter = std::vec::IntoIter<Issue>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_vec().into_iter()
    }
}

impl<'a> IntoIterator for &'a ParseError {
    type Item = &'a Issue;
    type IntoIter = Box<dyn Iterator<Item = &'a Issue> + 'a>;

    fn into_iter(self) -> Self::IntoIter {
        Box::new(self.0.iter())
    }
}

const _: () = {
    const fn assert_send<T: Send>() {}
    const fn assert_sync<T: Sync>() {}
    assert_send::<ParseError>();
    assert_sync::<ParseError>();
};

/// Issues grouped by top-level field.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FlattenedError {
    /// Messages for issues at the root path (the form as a whole).
    pub form_errors: Vec<String>,
    /// Messages grouped by top-level field name or index.
    pub field_errors: IndexMap<String, Vec<String>>,
}

/// A nested error tree with an `_errors` message list per level.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FormattedError {
    errors: Vec<String>,
    children: IndexMap<String, FormattedError>,
}

impl FormattedError {
    fn insert(&mut self, segments: &[&Segment], message: &str) {
        match segments.split_first() {
            None => self.errors.push(message.to_string()),
            Some((head, rest)) => {
                let key = match head {
                    Segment::Key(name) => name.clone(),
                    Segment::Index(index) => index.to_string(),
                };
                self.children.entry(key).or_default().insert(rest, message);
            }
        }
    }

    /// Messages attached at this level.
    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    /// The subtree under `key`, if any issue descends through it.
    pub fn child(&self, key: &str) -> Option<&FormattedError> {
        self.children.get(key)
    }

    /// Child keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.children.keys()
    }

    /// Projects the tree to JSON: `{"_errors": [...], "<key>": {...}}`.
    pub fn to_value(&self) -> Value {
        let mut object = serde_json::Map::new();
        object.insert("_errors".to_string(), json!(self.errors));
        for (key, child) in &self.children {
            object.insert(key.clone(), child.to_value());
        }
        Value::Object(object)
    }
}
