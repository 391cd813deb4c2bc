//! Union schema and its precompiled discriminator.
//!
//! Trying every member per value is O(n×k). Instead, each `variant` push
//! recompiles [`CompiledUnion`]: members are bucketed by the runtime types
//! their [`TypeProfile`] covers, so dispatch is a direct branch on the
//! input's type: O(1) for primitives, a short candidate scan for arrays
//! and objects.

use serde_json::{json, Value};
use stillwater::Validation;

use crate::error::{Issue, IssueCode, ParseError};
use crate::interop::ToJsonSchema;
use crate::path::FieldPath;

use super::traits::{SchemaKind, SchemaLike, TypeProfile, ValidationResult};
use super::value_type_name;

/// Build-time member buckets.
///
/// Primitive buckets hold at most one member index each; the array and
/// object lists may hold several, since shape still has to be checked
/// against each candidate.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct CompiledUnion {
    string: Option<usize>,
    number: Option<usize>,
    boolean: Option<usize>,
    arrays: Vec<usize>,
    objects: Vec<usize>,
}

impl CompiledUnion {
    fn compile(members: &[Box<dyn SchemaLike>]) -> Self {
        let mut compiled = Self::default();
        for (index, member) in members.iter().enumerate() {
            let profile = member.type_profile();
            // A primitive bucket belongs to the earliest member covering
            // that type; later claimants are ignored (first-registered-wins).
            if profile.string && compiled.string.is_none() {
                compiled.string = Some(index);
            }
            if profile.number && compiled.number.is_none() {
                compiled.number = Some(index);
            }
            if profile.boolean && compiled.boolean.is_none() {
                compiled.boolean = Some(index);
            }
            if profile.array {
                compiled.arrays.push(index);
            }
            if profile.object {
                compiled.objects.push(index);
            }
        }
        compiled
    }
}

/// A schema accepting whatever its members accept.
///
/// Members are registered in order with [`variant`](UnionSchema::variant).
/// When two members accept the same primitive runtime type, the earlier one
/// owns that bucket; overlap resolves to first-registered-wins and the
/// later member is unreachable for that type.
///
/// # Example
///
/// ```rust
/// use triage::{Schema, SchemaLike};
/// use serde_json::json;
///
/// let schema = Schema::union()
///     .variant(Schema::string())
///     .variant(Schema::number());
///
/// let verdicts = schema.validate_batch(&[
///     json!("a"),
///     json!(1),
///     json!(true),
///     json!([1, 2]),
/// ]);
/// assert_eq!(verdicts, vec![true, true, false, false]);
/// ```
#[derive(Default)]
pub struct UnionSchema {
    members: Vec<Box<dyn SchemaLike>>,
    compiled: CompiledUnion,
}

impl UnionSchema {
    /// Creates a union with no members. An empty union accepts nothing.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a member and recompiles the dispatch buckets.
    pub fn variant<S>(mut self, schema: S) -> Self
    where
        S: SchemaLike + 'static,
    {
        self.members.push(Box::new(schema));
        self.compiled = CompiledUnion::compile(&self.members);
        self
    }

    /// Number of members.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// True if the union has no members.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// The member at `index`, in registration order.
    pub fn member(&self, index: usize) -> Option<&dyn SchemaLike> {
        self.members.get(index).map(|m| m.as_ref())
    }

    /// Selects the member that would handle `value`, by registration index.
    ///
    /// Dispatch branches on the value's runtime type: primitives resolve to
    /// their single bucket; arrays and objects scan their candidate list for
    /// the first member that accepts the value. Returns `None` when nothing
    /// accepts. Deterministic: the same union and value always resolve to
    /// the same member.
    pub fn discriminate(&self, value: &Value) -> Option<usize> {
        match value {
            Value::String(_) => self.compiled.string,
            Value::Number(_) => self.compiled.number,
            Value::Bool(_) => self.compiled.boolean,
            Value::Array(_) => self
                .compiled
                .arrays
                .iter()
                .copied()
                .find(|&index| self.members[index].matches(value)),
            Value::Object(_) => self
                .compiled
                .objects
                .iter()
                .copied()
                .find(|&index| self.members[index].matches(value)),
            Value::Null => None,
        }
    }

    fn no_match_issue(&self, value: &Value, path: &FieldPath) -> Issue {
        Issue::new(
            IssueCode::NoMatchingVariant,
            path.clone(),
            format!(
                "no matching variant among {} members, got {}",
                self.members.len(),
                value_type_name(value)
            ),
        )
    }
}

impl SchemaLike for UnionSchema {
    fn kind(&self) -> SchemaKind {
        SchemaKind::Union
    }

    fn type_profile(&self) -> TypeProfile {
        self.members
            .iter()
            .fold(TypeProfile::default(), |acc, member| {
                acc.merge(member.type_profile())
            })
    }

    fn validate_at(&self, value: &Value, path: &FieldPath) -> Result<Value, Issue> {
        match self.discriminate(value) {
            Some(index) => self.members[index]
                .validate_at(value, path)
                .map_err(|_| self.no_match_issue(value, path)),
            None => Err(self.no_match_issue(value, path)),
        }
    }

    fn check_at(&self, value: &Value, path: &FieldPath) -> ValidationResult<Value> {
        match self.discriminate(value) {
            Some(index) => match self.members[index].check_at(value, path) {
                Validation::Success(v) => Validation::Success(v),
                Validation::Failure(_) => {
                    Validation::Failure(ParseError::single(self.no_match_issue(value, path)))
                }
            },
            None => Validation::Failure(ParseError::single(self.no_match_issue(value, path))),
        }
    }

    fn matches(&self, value: &Value) -> bool {
        match value {
            Value::String(_) => self
                .compiled
                .string
                .is_some_and(|index| self.members[index].matches(value)),
            Value::Number(_) => self
                .compiled
                .number
                .is_some_and(|index| self.members[index].matches(value)),
            Value::Bool(_) => self
                .compiled
                .boolean
                .is_some_and(|index| self.members[index].matches(value)),
            Value::Array(_) => self
                .compiled
                .arrays
                .iter()
                .any(|&index| self.members[index].matches(value)),
            Value::Object(_) => self
                .compiled
                .objects
                .iter()
                .any(|&index| self.members[index].matches(value)),
            Value::Null => false,
        }
    }
}

impl ToJsonSchema for UnionSchema {
    fn to_json_schema(&self) -> Value {
        let variants: Vec<Value> = self
            .members
            .iter()
            .map(|member| member.to_json_schema())
            .collect();
        json!({ "anyOf": variants })
    }
}
