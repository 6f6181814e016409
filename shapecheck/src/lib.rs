//! # shapecheck
//!
//! Runtime schema validation and coercion for dynamic values.
//!
//! A schema is an immutable [`Type`]: a tree of variant configurations built
//! with the free functions in [`build`] (re-exported at the crate root).
//! Parsing a [`Value`] against it returns the accepted, possibly coerced,
//! value or an [`Issue`] tree describing every failure.
//!
//! ## Quick Start
//!
//! ```rust
//! use shapecheck::{integer, list, map, string, Type, Value};
//!
//! let user: Type = map([
//!     ("name", Type::from(string().min_length(1))),
//!     ("scores", Type::from(list(integer().gte(0)))),
//! ])
//! .unwrap()
//! .strict()
//! .into();
//!
//! let input = Value::map([
//!     ("name", Value::from("")),
//!     ("scores", Value::List(vec![Value::from(3), Value::from(-1)])),
//!     ("admin", Value::Bool(true)),
//! ]);
//!
//! let issue = user.parse(&input).unwrap_err();
//! let leaves: Vec<String> = issue.issues.iter().map(ToString::to_string).collect();
//! assert_eq!(
//!     leaves,
//!     vec![
//!         "name: must have at least 1 character, got 0 characters",
//!         "scores.1: must be greater than or equal to 0",
//!         "admin: unknown field",
//!     ]
//! );
//! ```
//!
//! ## Variants
//!
//! | Builder | Accepts |
//! |---------|---------|
//! | [`any`] | any present value |
//! | [`boolean`] | `true` / `false` |
//! | [`atom`], [`enum_of`] | atoms, or one of a fixed set of values |
//! | [`string`], [`email`], [`uuid`], [`uri`] | strings |
//! | [`integer`], [`float`], [`decimal`], [`number`] | numbers |
//! | [`date`], [`datetime`] | dates and zoned timestamps |
//! | [`literal`] | a single value |
//! | [`list`], [`tuple`] | sequences |
//! | [`map`], [`struct_of`], [`record`] | keyed shapes |
//! | [`optional`], [`refine`], [`transform`], [`union`] | modifiers |
//!
//! ## Failures
//!
//! Scalars stop at the first failing step. Composites parse every child and
//! report all failures in one flattened aggregate. A [`union`] reports the
//! failure of the alternative that got furthest, measured by
//! [`Value::parse_score`].
//!
//! Misuse while building a type (an empty shape, a one-member union, ...)
//! is a [`BuildError`], returned when the type is built.
//!
//! ## Features
//!
//! | Feature | Description | Default |
//! |---------|-------------|---------|
//! | `serde-compat` | JSON conversions, serializable issues, [`descriptor`] | ✅ |

pub mod build;
#[cfg(feature = "serde-compat")]
pub mod descriptor;
pub mod error;
pub mod inflect;
pub mod issue;
pub mod param;
pub mod template;
pub mod types;
pub mod value;

pub use build::*;
pub use error::{BuildError, BuildResult, ValidationError};
pub use issue::{Issue, IssueKind};
pub use param::{ErrorConfig, Param};
pub use types::{
    AnyType, AtomType, BooleanType, DateTimeType, DateType, DecimalType, DefaultValue, EnumType,
    FloatType, IntegerType, ListType, LiteralType, MapType, Mode, NumberType, OptionalType,
    RecordType, RefineType, StringType, StructDef, StructType, TrailingSlash, TransformType,
    TupleType, Type, UnionType,
};
pub use value::{MapKey, Opaque, Value};

/// Parse `value` against `ty`.
pub fn parse(ty: &Type, value: &Value) -> Result<Value, Issue> {
    ty.parse(value)
}
