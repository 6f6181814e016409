//! The [`Type`] sum type and its parse dispatcher.
//!
//! Each variant is an immutable configuration struct. Builder methods take the
//! struct by value and return the updated copy, so a shared `Type` is never
//! mutated. Parsing always goes through [`Type::parse`], which routes to the
//! variant implementation; composite variants call it again for their
//! children without knowing their concrete kind.

use std::borrow::Cow;

use tracing::trace;

use crate::error::ValidationError;
use crate::issue::{Issue, IssueKind};
use crate::template::{self, context};
use crate::value::Value;

pub mod any;
pub mod atom;
pub mod boolean;
pub mod list;
pub mod literal;
pub mod map;
pub mod number;
pub mod optional;
pub mod record;
pub mod refine;
pub mod string;
pub mod temporal;
pub mod tuple;
pub mod union;

pub use any::AnyType;
pub use atom::{AtomType, EnumType};
pub use boolean::BooleanType;
pub use list::ListType;
pub use literal::LiteralType;
pub use map::{MapType, Mode, StructDef, StructType};
pub use number::{
    DecimalKind, DecimalType, FloatKind, FloatType, IntegerKind, IntegerType, NumberKind,
    NumberType, Numeric, NumericKind,
};
pub use optional::{DefaultValue, OptionalType};
pub use record::RecordType;
pub use refine::{Predicate, RefineType, TransformFn, TransformType};
pub use string::{StringType, TrailingSlash};
pub use temporal::{DateKind, DateTimeKind, DateTimeType, DateType, Temporal, TemporalKind};
pub use tuple::TupleType;
pub use union::UnionType;

pub(crate) const REQUIRED: &str = "is required";
pub(crate) const TYPE_MISMATCH: &str = "expected {{expected}}, got {{actual}}";
pub(crate) const COERCION_FAILED: &str = "cannot coerce {{value}} into {{expected}}";

/// Variant-level parse implementation, only reachable through [`Type::parse`].
pub(crate) trait Parser {
    fn parse_value(&self, value: &Value) -> Result<Value, Issue>;
}

/// Conversion policy of a kind marker, kept out of the public kind traits.
pub(crate) trait Convert {
    fn convert(value: &Value) -> Coercion;
}

pub(crate) mod sealed {
    /// Closes [`NumericKind`](super::NumericKind) and
    /// [`TemporalKind`](super::TemporalKind) to the kinds defined here.
    pub trait Sealed {}
}

/// Outcome of a best-effort conversion.
pub(crate) enum Coercion {
    /// The input was converted.
    Converted(Value),
    /// The input is already the target kind, or not a source this variant
    /// converts from; the type check decides.
    Unchanged,
    /// The input is a compatible source but could not be converted.
    Failed,
}

/// A schema describing how to validate and coerce one category of value.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub enum Type {
    Any(AnyType),
    Boolean(BooleanType),
    Atom(AtomType),
    Enum(EnumType),
    String(StringType),
    Integer(IntegerType),
    Float(FloatType),
    Decimal(DecimalType),
    Number(NumberType),
    Date(DateType),
    DateTime(DateTimeType),
    Literal(LiteralType),
    List(ListType),
    Tuple(TupleType),
    Map(MapType),
    Struct(StructType),
    Record(RecordType),
    Optional(OptionalType),
    Refine(RefineType),
    Transform(TransformType),
    Union(UnionType),
}

impl Type {
    /// Parse `value`, returning the accepted (possibly coerced) value or the
    /// issue tree describing why it was rejected.
    pub fn parse(&self, value: &Value) -> Result<Value, Issue> {
        trace!(type_name = self.name(), kind = value.kind(), "Parsing value");
        match self {
            Self::Any(t) => t.parse_value(value),
            Self::Boolean(t) => t.parse_value(value),
            Self::Atom(t) => t.parse_value(value),
            Self::Enum(t) => t.parse_value(value),
            Self::String(t) => t.parse_value(value),
            Self::Integer(t) => t.parse_value(value),
            Self::Float(t) => t.parse_value(value),
            Self::Decimal(t) => t.parse_value(value),
            Self::Number(t) => t.parse_value(value),
            Self::Date(t) => t.parse_value(value),
            Self::DateTime(t) => t.parse_value(value),
            Self::Literal(t) => t.parse_value(value),
            Self::List(t) => t.parse_value(value),
            Self::Tuple(t) => t.parse_value(value),
            Self::Map(t) => t.parse_value(value),
            Self::Struct(t) => t.parse_value(value),
            Self::Record(t) => t.parse_value(value),
            Self::Optional(t) => t.parse_value(value),
            Self::Refine(t) => t.parse_value(value),
            Self::Transform(t) => t.parse_value(value),
            Self::Union(t) => t.parse_value(value),
        }
    }

    /// Parse `value`, converting a failure into a [`ValidationError`] that
    /// renders every flattened leaf.
    pub fn validate(&self, value: &Value) -> Result<Value, ValidationError> {
        self.parse(value).map_err(ValidationError::from)
    }

    /// The variant name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Any(_) => "any",
            Self::Boolean(_) => "boolean",
            Self::Atom(_) => "atom",
            Self::Enum(_) => "enum",
            Self::String(_) => "string",
            Self::Integer(_) => "integer",
            Self::Float(_) => "float",
            Self::Decimal(_) => "decimal",
            Self::Number(_) => "number",
            Self::Date(_) => "date",
            Self::DateTime(_) => "datetime",
            Self::Literal(_) => "literal",
            Self::List(_) => "list",
            Self::Tuple(_) => "tuple",
            Self::Map(_) => "map",
            Self::Struct(_) => "struct",
            Self::Record(_) => "record",
            Self::Optional(_) => "optional",
            Self::Refine(_) => "refine",
            Self::Transform(_) => "transform",
            Self::Union(_) => "union",
        }
    }

    /// Whether every value this type accepts is a string or an atom.
    pub(crate) fn is_string_like(&self) -> bool {
        match self {
            Self::String(_) | Self::Atom(_) => true,
            Self::Enum(t) => t
                .values()
                .iter()
                .all(|v| matches!(v, Value::Str(_) | Value::Atom(_))),
            Self::Literal(t) => matches!(t.value(), Value::Str(_) | Value::Atom(_)),
            Self::Optional(t) => t.inner().is_string_like(),
            Self::Refine(t) => t.inner().is_string_like(),
            Self::Transform(t) => t.inner().is_string_like(),
            Self::Union(t) => t.alternatives().iter().all(Type::is_string_like),
            _ => false,
        }
    }
}

macro_rules! impl_into_type {
    ($($variant:ident => $ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for Type {
                fn from(t: $ty) -> Self {
                    Type::$variant(t)
                }
            }
        )*
    };
}

impl_into_type! {
    Any => AnyType,
    Boolean => BooleanType,
    Atom => AtomType,
    Enum => EnumType,
    String => StringType,
    Integer => IntegerType,
    Float => FloatType,
    Decimal => DecimalType,
    Number => NumberType,
    Date => DateType,
    DateTime => DateTimeType,
    Literal => LiteralType,
    List => ListType,
    Tuple => TupleType,
    Map => MapType,
    Struct => StructType,
    Record => RecordType,
    Optional => OptionalType,
    Refine => RefineType,
    Transform => TransformType,
    Union => UnionType,
}

// =============================================================================
// Shared pipeline steps
// =============================================================================

pub(crate) fn required_issue() -> Issue {
    Issue::new(IssueKind::Required, REQUIRED)
}

pub(crate) fn type_issue(expected: &str, value: &Value) -> Issue {
    let ctx = context([
        ("expected", Value::atom(expected)),
        ("actual", Value::atom(value.kind())),
    ]);
    Issue::new(IssueKind::TypeMismatch, template::render(TYPE_MISMATCH, &ctx))
}

pub(crate) fn coercion_issue(expected: &str, value: &Value) -> Issue {
    let ctx = context([("expected", Value::atom(expected)), ("value", value.clone())]);
    Issue::new(IssueKind::Coercion, template::render(COERCION_FAILED, &ctx))
}

/// Required and coercion steps of the scalar pipeline.
///
/// Returns the value to type-check: the input itself, or its coerced form.
pub(crate) fn prepare<'a>(
    value: &'a Value,
    coerce: bool,
    expected: &str,
    convert: impl FnOnce(&Value) -> Coercion,
) -> Result<Cow<'a, Value>, Issue> {
    if value.is_null() {
        return Err(required_issue());
    }
    if !coerce {
        return Ok(Cow::Borrowed(value));
    }
    match convert(value) {
        Coercion::Converted(converted) => Ok(Cow::Owned(converted)),
        Coercion::Unchanged => Ok(Cow::Borrowed(value)),
        Coercion::Failed => {
            trace!(expected = expected, kind = value.kind(), "Coercion failed");
            Err(coercion_issue(expected, value))
        }
    }
}

/// Parse every item, collecting successes and path-prefixed failures.
///
/// Never stops at the first failure.
pub(crate) fn parse_items<'a, I, F>(items: I, type_at: F) -> (Vec<Value>, Vec<Issue>)
where
    I: IntoIterator<Item = &'a Value>,
    F: Fn(usize) -> &'a Type,
{
    let mut parsed = Vec::new();
    let mut issues = Vec::new();
    for (index, item) in items.into_iter().enumerate() {
        match type_at(index).parse(item) {
            Ok(value) => parsed.push(value),
            Err(issue) => issues.push(issue.prefixed(index.to_string())),
        }
    }
    (parsed, issues)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build::{integer, list, optional, string, union};

    #[test]
    fn test_type_issue_names_both_kinds() {
        let issue = type_issue("integer", &Value::from(3.14));
        assert_eq!(issue.kind, IssueKind::TypeMismatch);
        assert_eq!(issue.message, "expected integer, got float");
    }

    #[test]
    fn test_prepare_short_circuits_on_null() {
        let result = prepare(&Value::Null, true, "integer", |_| Coercion::Unchanged);
        assert_eq!(result.unwrap_err().kind, IssueKind::Required);
    }

    #[test]
    fn test_prepare_skips_conversion_when_disabled() {
        let value = Value::from("12");
        let result = prepare(&value, false, "integer", |_| Coercion::Failed).unwrap();
        assert_eq!(result.as_ref(), &value);
    }

    #[test]
    fn test_parse_items_collects_every_failure() {
        let ty: Type = integer().into();
        let items = vec![Value::from("a"), Value::from(1), Value::from("b")];
        let (parsed, issues) = parse_items(items.iter(), |_| &ty);
        assert_eq!(parsed, vec![Value::from(1)]);
        let paths: Vec<_> = issues.iter().map(|i| i.path.clone()).collect();
        assert_eq!(paths, vec![vec!["0".to_string()], vec!["2".to_string()]]);
    }

    #[test]
    fn test_string_like_detection() {
        assert!(Type::from(string()).is_string_like());
        assert!(Type::from(optional(string())).is_string_like());
        assert!(!Type::from(integer()).is_string_like());
        assert!(!Type::from(list(string())).is_string_like());
        let mixed: Type = union([Type::from(string()), Type::from(integer())])
            .unwrap()
            .into();
        assert!(!mixed.is_string_like());
    }

    #[test]
    fn test_types_are_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Type>();
    }
}
