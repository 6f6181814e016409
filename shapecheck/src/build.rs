//! Free builder functions, one per variant.
//!
//! ```rust
//! use shapecheck::{integer, list, map, optional, string, Type, Value};
//!
//! let user: Type = map([
//!     ("name", Type::from(string().min_length(1))),
//!     ("age", Type::from(optional(integer().gte(0)))),
//!     ("tags", Type::from(list(string()))),
//! ])
//! .unwrap()
//! .into();
//!
//! let input = Value::string_map([
//!     ("name", Value::from("Ada")),
//!     ("tags", Value::List(vec![Value::from("math")])),
//! ]);
//! assert!(user.parse(&input).is_ok());
//! ```
//!
//! Builders for variants with construction-time invariants return a
//! [`BuildResult`].

use crate::error::BuildResult;
use crate::param::ErrorConfig;
use crate::types::{
    AnyType, AtomType, BooleanType, DateTimeType, DateType, DecimalType, EnumType, FloatType,
    IntegerType, ListType, LiteralType, MapType, NumberType, OptionalType, RecordType, RefineType,
    StringType, StructDef, StructType, TransformType, TupleType, Type, UnionType,
};
use crate::value::{MapKey, Value};

pub fn any() -> AnyType {
    AnyType::new()
}

pub fn boolean() -> BooleanType {
    BooleanType::new()
}

pub fn atom() -> AtomType {
    AtomType::new()
}

/// One of `values`. Fails if `values` is empty.
pub fn enum_of(values: Vec<Value>) -> BuildResult<EnumType> {
    EnumType::new(values)
}

pub fn string() -> StringType {
    StringType::new()
}

pub fn email() -> StringType {
    StringType::email()
}

pub fn uuid() -> StringType {
    StringType::uuid()
}

pub fn uri() -> StringType {
    StringType::uri()
}

pub fn integer() -> IntegerType {
    IntegerType::new()
}

pub fn float() -> FloatType {
    FloatType::new()
}

pub fn decimal() -> DecimalType {
    DecimalType::new()
}

/// Integer or float.
pub fn number() -> NumberType {
    NumberType::new()
}

pub fn date() -> DateType {
    DateType::new()
}

pub fn datetime() -> DateTimeType {
    DateTimeType::new()
}

/// Exactly `value`. Fails for `Null`.
pub fn literal(value: impl Into<Value>) -> BuildResult<LiteralType> {
    LiteralType::new(value)
}

pub fn list(inner: impl Into<Type>) -> ListType {
    ListType::new(inner)
}

/// Fails with fewer than two elements.
pub fn tuple<I, T>(elements: I) -> BuildResult<TupleType>
where
    I: IntoIterator<Item = T>,
    T: Into<Type>,
{
    TupleType::new(elements)
}

/// Fails for an empty shape.
pub fn map<K, T, I>(shape: I) -> BuildResult<MapType>
where
    K: Into<MapKey>,
    T: Into<Type>,
    I: IntoIterator<Item = (K, T)>,
{
    MapType::new(shape)
}

/// Fails for an empty shape or a field `def` does not declare.
pub fn struct_of<K, T, I>(def: StructDef, shape: I) -> BuildResult<StructType>
where
    K: Into<MapKey>,
    T: Into<Type>,
    I: IntoIterator<Item = (K, T)>,
{
    StructType::new(def, shape)
}

/// Record with any values. Fails for a non string-like key type.
pub fn record(keys: impl Into<Type>) -> BuildResult<RecordType> {
    RecordType::new(keys)
}

pub fn record_of(keys: impl Into<Type>, values: impl Into<Type>) -> BuildResult<RecordType> {
    RecordType::with_values(keys, values)
}

pub fn optional(inner: impl Into<Type>) -> OptionalType {
    OptionalType::new(inner)
}

pub fn refine<F>(inner: impl Into<Type>, predicate: F) -> RefineType
where
    F: Fn(&Value) -> bool + Send + Sync + 'static,
{
    RefineType::new(inner, predicate)
}

pub fn refine_with<F>(
    inner: impl Into<Type>,
    predicate: F,
    error: impl Into<ErrorConfig>,
) -> RefineType
where
    F: Fn(&Value) -> bool + Send + Sync + 'static,
{
    RefineType::with_error(inner, predicate, error)
}

pub fn transform<F>(inner: impl Into<Type>, f: F) -> TransformType
where
    F: Fn(Value) -> Value + Send + Sync + 'static,
{
    TransformType::new(inner, f)
}

/// Fails with fewer than two alternatives.
pub fn union<I, T>(alternatives: I) -> BuildResult<UnionType>
where
    I: IntoIterator<Item = T>,
    T: Into<Type>,
{
    UnionType::new(alternatives)
}
