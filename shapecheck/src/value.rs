//! Dynamic values accepted and produced by the parser.
//!
//! Inputs arrive already deserialized, so the parser works over a closed
//! [`Value`] sum type instead of bytes or text. Maps are keyed by [`MapKey`],
//! which keeps symbolic keys ([`MapKey::Atom`]) distinct from string keys
//! ([`MapKey::Str`]) so a shape declared with symbolic field names can still
//! read string-keyed input.
//!
//! ## Example
//!
//! ```rust
//! use shapecheck::{MapKey, Value};
//!
//! let user = Value::map([("name", Value::from("Ada")), ("age", Value::from(36))]);
//! assert_eq!(user.kind(), "map");
//! assert_eq!(user.get(&MapKey::atom("name")), Some(&Value::from("Ada")));
//! assert_eq!(user.parse_score(), 3);
//! ```

use std::any::Any;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, FixedOffset, NaiveDate, SecondsFormat};
use rust_decimal::Decimal;

/// Key of a [`Value::Map`] entry.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MapKey {
    /// Symbolic key, the form shapes use by default.
    Atom(String),
    /// Plain string key, the form JSON objects deserialize into.
    Str(String),
    /// Integer key.
    Int(i64),
    /// Boolean key.
    Bool(bool),
}

impl MapKey {
    /// Create a symbolic key.
    pub fn atom(name: impl Into<String>) -> Self {
        Self::Atom(name.into())
    }

    /// Create a string key.
    pub fn str(name: impl Into<String>) -> Self {
        Self::Str(name.into())
    }

    /// The key rendered as an issue path segment.
    pub fn as_segment(&self) -> String {
        match self {
            Self::Atom(name) | Self::Str(name) => name.clone(),
            Self::Int(n) => n.to_string(),
            Self::Bool(b) => b.to_string(),
        }
    }

    /// The string-keyed equivalent of this key.
    pub fn string_form(&self) -> MapKey {
        match self {
            Self::Str(_) => self.clone(),
            other => Self::Str(other.as_segment()),
        }
    }

    /// The key as a standalone value, used when a key schema parses it.
    pub fn to_value(&self) -> Value {
        match self {
            Self::Atom(name) => Value::Atom(name.clone()),
            Self::Str(name) => Value::Str(name.clone()),
            Self::Int(n) => Value::Int(*n),
            Self::Bool(b) => Value::Bool(*b),
        }
    }

    /// Convert a value back into a key. Only scalars that can key a map qualify.
    pub fn from_value(value: &Value) -> Option<MapKey> {
        match value {
            Value::Atom(name) => Some(Self::Atom(name.clone())),
            Value::Str(name) => Some(Self::Str(name.clone())),
            Value::Int(n) => Some(Self::Int(*n)),
            Value::Bool(b) => Some(Self::Bool(*b)),
            _ => None,
        }
    }
}

impl From<&str> for MapKey {
    fn from(name: &str) -> Self {
        Self::Atom(name.to_string())
    }
}

impl From<String> for MapKey {
    fn from(name: String) -> Self {
        Self::Atom(name)
    }
}

impl From<i64> for MapKey {
    fn from(n: i64) -> Self {
        Self::Int(n)
    }
}

impl fmt::Display for MapKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Atom(name) => write!(f, "{}", name),
            Self::Str(name) => write!(f, "{:?}", name),
            Self::Int(n) => write!(f, "{}", n),
            Self::Bool(b) => write!(f, "{}", b),
        }
    }
}

/// A handle to a host value the parser carries through without inspecting.
///
/// Equality is identity: two handles are equal when they share an allocation.
#[derive(Clone)]
pub struct Opaque(Arc<dyn Any + Send + Sync>);

impl Opaque {
    /// Wrap a host value.
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        Self(Arc::new(value))
    }

    /// Borrow the wrapped value if it has type `T`.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.0.downcast_ref::<T>()
    }
}

impl PartialEq for Opaque {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for Opaque {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Opaque(..)")
    }
}

/// A dynamic value of unknown shape.
///
/// # Nesting depth
///
/// Cloning, comparing, dropping and displaying a value recurse into its
/// children, as does parsing it against a composite type. Nesting depth is
/// therefore bounded by the stack of the calling thread: a few thousand
/// levels are fine on the default 2 MiB thread stack, hundreds of thousands
/// are not. [`Value::parse_score`] is the exception and walks iteratively.
/// Run validation of untrusted, unbounded input on a thread with a larger
/// stack, or reject it by depth before parsing.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// The absent value.
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Decimal(Decimal),
    Str(String),
    /// A symbolic constant, distinct from a string with the same text.
    Atom(String),
    List(Vec<Value>),
    /// A fixed-arity sequence.
    Tuple(Vec<Value>),
    Map(BTreeMap<MapKey, Value>),
    /// An instance of a named record shape.
    Struct {
        name: String,
        fields: BTreeMap<String, Value>,
    },
    Date(NaiveDate),
    DateTime(DateTime<FixedOffset>),
    Opaque(Opaque),
}

/// Shared `Null` for lookups that need a borrowed absent value.
pub(crate) static NULL: Value = Value::Null;

impl Value {
    /// Create a string value.
    pub fn str(s: impl Into<String>) -> Self {
        Self::Str(s.into())
    }

    /// Create an atom value.
    pub fn atom(name: impl Into<String>) -> Self {
        Self::Atom(name.into())
    }

    /// Create a map from key/value pairs. `&str` keys become atoms.
    pub fn map<K, I>(entries: I) -> Self
    where
        K: Into<MapKey>,
        I: IntoIterator<Item = (K, Value)>,
    {
        Self::Map(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// Create a map keyed by plain strings, the way JSON objects arrive.
    pub fn string_map<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (&'static str, Value)>,
    {
        Self::Map(
            entries
                .into_iter()
                .map(|(k, v)| (MapKey::str(k), v))
                .collect(),
        )
    }

    /// Create a struct instance.
    pub fn structure<I>(name: impl Into<String>, fields: I) -> Self
    where
        I: IntoIterator<Item = (&'static str, Value)>,
    {
        Self::Struct {
            name: name.into(),
            fields: fields
                .into_iter()
                .map(|(k, v)| (k.to_string(), v))
                .collect(),
        }
    }

    /// Returns true for [`Value::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Name of the concrete kind, as used in type-mismatch messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "boolean",
            Self::Int(_) => "integer",
            Self::Float(_) => "float",
            Self::Decimal(_) => "decimal",
            Self::Str(_) => "string",
            Self::Atom(_) => "atom",
            Self::List(_) => "list",
            Self::Tuple(_) => "tuple",
            Self::Map(_) => "map",
            Self::Struct { .. } => "struct",
            Self::Date(_) => "date",
            Self::DateTime(_) => "datetime",
            Self::Opaque(_) => "opaque",
        }
    }

    /// Look up a map entry. Returns `None` for non-map values.
    pub fn get(&self, key: &MapKey) -> Option<&Value> {
        match self {
            Self::Map(entries) => entries.get(key),
            _ => None,
        }
    }

    /// Structural progress estimate used to rank competing failures.
    ///
    /// - null scores 0
    /// - any scalar scores 1
    /// - a tuple of arity n scores 1 + n
    /// - a list, map or struct scores 1 plus the scores of its elements
    ///
    /// Walks with an explicit stack so deeply nested input cannot overflow.
    pub fn parse_score(&self) -> u64 {
        let mut score = 0u64;
        let mut pending: Vec<&Value> = vec![self];
        while let Some(value) = pending.pop() {
            match value {
                Self::Null => {}
                Self::Tuple(items) => score += 1 + items.len() as u64,
                Self::List(items) => {
                    score += 1;
                    pending.extend(items.iter());
                }
                Self::Map(entries) => {
                    score += 1;
                    pending.extend(entries.values());
                }
                Self::Struct { fields, .. } => {
                    score += 1;
                    pending.extend(fields.values());
                }
                _ => score += 1,
            }
        }
        score
    }
}

fn write_seq<'a>(
    f: &mut fmt::Formatter<'_>,
    open: &str,
    close: &str,
    items: impl Iterator<Item = &'a Value>,
) -> fmt::Result {
    f.write_str(open)?;
    for (i, item) in items.enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{}", item)?;
    }
    f.write_str(close)
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::Bool(b) => write!(f, "{}", b),
            Self::Int(n) => write!(f, "{}", n),
            Self::Float(x) => write!(f, "{:?}", x),
            Self::Decimal(d) => write!(f, "{}", d),
            Self::Str(s) => write!(f, "{:?}", s),
            Self::Atom(name) => f.write_str(name),
            Self::List(items) => write_seq(f, "[", "]", items.iter()),
            Self::Tuple(items) => write_seq(f, "(", ")", items.iter()),
            Self::Map(entries) => {
                f.write_str("{")?;
                for (i, (key, value)) in entries.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}: {}", key, value)?;
                }
                f.write_str("}")
            }
            Self::Struct { name, fields } => {
                write!(f, "{} {{", name)?;
                for (i, (key, value)) in fields.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, " {}: {}", key, value)?;
                }
                f.write_str(" }")
            }
            Self::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            Self::DateTime(dt) => f.write_str(&dt.to_rfc3339_opts(SecondsFormat::AutoSi, true)),
            Self::Opaque(_) => f.write_str("<opaque>"),
        }
    }
}

// =============================================================================
// Conversions from Rust scalars
// =============================================================================

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Self::Int(n.into())
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Self::Int(n)
    }
}

impl From<u32> for Value {
    fn from(n: u32) -> Self {
        Self::Int(n.into())
    }
}

impl From<usize> for Value {
    fn from(n: usize) -> Self {
        i64::try_from(n).map_or(Self::Float(n as f64), Self::Int)
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Self::Float(x)
    }
}

impl From<Decimal> for Value {
    fn from(d: Decimal) -> Self {
        Self::Decimal(d)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Str(s)
    }
}

impl From<NaiveDate> for Value {
    fn from(d: NaiveDate) -> Self {
        Self::Date(d)
    }
}

impl From<DateTime<FixedOffset>> for Value {
    fn from(dt: DateTime<FixedOffset>) -> Self {
        Self::DateTime(dt)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Self::List(items)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

// =============================================================================
// serde_json interop
// =============================================================================

#[cfg(feature = "serde-compat")]
impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        use serde_json::Value as Json;

        match json {
            Json::Null => Self::Null,
            Json::Bool(b) => Self::Bool(b),
            Json::Number(n) => match n.as_i64() {
                Some(i) => Self::Int(i),
                None => Self::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            Json::String(s) => Self::Str(s),
            Json::Array(items) => Self::List(items.into_iter().map(Value::from).collect()),
            Json::Object(entries) => Self::Map(
                entries
                    .into_iter()
                    .map(|(k, v)| (MapKey::Str(k), Value::from(v)))
                    .collect(),
            ),
        }
    }
}

#[cfg(feature = "serde-compat")]
impl Value {
    /// Convert into JSON.
    ///
    /// Atoms and decimals render as strings, tuples as arrays, structs as
    /// objects, dates as ISO-8601 strings. Opaque handles and non-finite
    /// floats have no JSON form and become `null`.
    pub fn to_json(&self) -> serde_json::Value {
        use serde_json::Value as Json;

        match self {
            Self::Null | Self::Opaque(_) => Json::Null,
            Self::Bool(b) => Json::Bool(*b),
            Self::Int(n) => Json::from(*n),
            Self::Float(x) => serde_json::Number::from_f64(*x).map_or(Json::Null, Json::Number),
            Self::Decimal(d) => Json::String(d.to_string()),
            Self::Str(s) | Self::Atom(s) => Json::String(s.clone()),
            Self::List(items) | Self::Tuple(items) => {
                Json::Array(items.iter().map(Value::to_json).collect())
            }
            Self::Map(entries) => Json::Object(
                entries
                    .iter()
                    .map(|(k, v)| (k.as_segment(), v.to_json()))
                    .collect(),
            ),
            Self::Struct { fields, .. } => Json::Object(
                fields
                    .iter()
                    .map(|(k, v)| (k.clone(), v.to_json()))
                    .collect(),
            ),
            Self::Date(_) | Self::DateTime(_) => Json::String(self.to_string()),
        }
    }
}
