//! Keyed shapes: maps with declared fields, and named structs built on them.

use std::collections::{BTreeMap, BTreeSet};

use crate::error::{BuildError, BuildResult};
use crate::issue::{Issue, IssueKind};
use crate::template::{self, context};
use crate::types::{Coercion, Parser, TYPE_MISMATCH, Type, prepare, required_issue, type_issue};
use crate::value::{MapKey, NULL, Value};

const FIELDS_FAILED: &str = "one or more fields failed validation";
const UNKNOWN_FIELD: &str = "unknown field";

/// How a map treats input fields its shape does not declare.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Mode {
    /// Drop them from the output.
    #[default]
    Strip,
    /// Report each one as an unknown field.
    Strict,
}

/// A map with a declared set of fields.
///
/// A declared field is looked up under its own key first, then under its
/// string form, so a shape declared with atom keys reads JSON-style string
/// keyed input. Fields that are absent and parse to `Null` are left out of
/// the output.
#[derive(Debug, Clone)]
pub struct MapType {
    shape: BTreeMap<MapKey, Type>,
    mode: Mode,
    coerce: bool,
}

impl MapType {
    /// Fails if `shape` is empty.
    pub fn new<K, T, I>(shape: I) -> BuildResult<Self>
    where
        K: Into<MapKey>,
        T: Into<Type>,
        I: IntoIterator<Item = (K, T)>,
    {
        let shape: BTreeMap<MapKey, Type> = shape
            .into_iter()
            .map(|(k, t)| (k.into(), t.into()))
            .collect();
        if shape.is_empty() {
            return Err(BuildError::EmptyShape { kind: "map" });
        }
        Ok(Self {
            shape,
            mode: Mode::default(),
            coerce: false,
        })
    }

    pub fn mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    /// Shorthand for `mode(Mode::Strict)`.
    pub fn strict(self) -> Self {
        self.mode(Mode::Strict)
    }

    /// Accept struct instances and lists of key/value pairs as maps.
    pub fn coerce(mut self, coerce: bool) -> Self {
        self.coerce = coerce;
        self
    }

    pub fn shape(&self) -> &BTreeMap<MapKey, Type> {
        &self.shape
    }

    /// Parse every declared field of `entries`, plus the unknown-field check
    /// in strict mode.
    pub(crate) fn parse_fields(
        &self,
        entries: &BTreeMap<MapKey, Value>,
    ) -> (BTreeMap<MapKey, Value>, Vec<Issue>) {
        let mut parsed = BTreeMap::new();
        let mut issues = Vec::new();
        let mut seen = BTreeSet::new();

        for (key, ty) in &self.shape {
            let found = entries
                .get_key_value(key)
                .or_else(|| entries.get_key_value(&key.string_form()));
            if let Some((input_key, _)) = found {
                seen.insert(input_key);
            }
            let input = found.map_or(&NULL, |(_, v)| v);

            match ty.parse(input) {
                Ok(value) if value.is_null() && found.is_none() => {}
                Ok(value) => {
                    parsed.insert(key.clone(), value);
                }
                Err(issue) => issues.push(issue.prefixed(key.as_segment())),
            }
        }

        if self.mode == Mode::Strict {
            for key in entries.keys().filter(|k| !seen.contains(k)) {
                let issue = Issue::new(IssueKind::UnknownField, UNKNOWN_FIELD);
                issues.push(issue.prefixed(key.as_segment()));
            }
        }
        (parsed, issues)
    }
}

fn coerce_map(value: &Value) -> Coercion {
    match value {
        Value::Struct { fields, .. } => Coercion::Converted(Value::Map(
            fields
                .iter()
                .map(|(k, v)| (MapKey::atom(k.as_str()), v.clone()))
                .collect(),
        )),
        Value::List(items) => items
            .iter()
            .map(|item| match item {
                Value::Tuple(pair) | Value::List(pair) if pair.len() == 2 => {
                    MapKey::from_value(&pair[0]).map(|k| (k, pair[1].clone()))
                }
                _ => None,
            })
            .collect::<Option<BTreeMap<_, _>>>()
            .map_or(Coercion::Failed, |entries| Coercion::Converted(Value::Map(entries))),
        _ => Coercion::Unchanged,
    }
}

impl Parser for MapType {
    fn parse_value(&self, value: &Value) -> Result<Value, Issue> {
        let value = prepare(value, self.coerce, "map", coerce_map)?;
        let Value::Map(entries) = value.as_ref() else {
            return Err(type_issue("map", &value));
        };
        let (parsed, issues) = self.parse_fields(entries);
        if issues.is_empty() {
            Ok(Value::Map(parsed))
        } else {
            Err(Issue::aggregate(FIELDS_FAILED, issues, &Value::Map(parsed)))
        }
    }
}

/// A named record definition: its field names and their default values.
#[derive(Debug, Clone, PartialEq)]
pub struct StructDef {
    name: String,
    fields: BTreeMap<String, Value>,
}

impl StructDef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: BTreeMap::new(),
        }
    }

    /// Declare a field and its default.
    pub fn field(mut self, name: impl Into<String>, default: impl Into<Value>) -> Self {
        self.fields.insert(name.into(), default.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn has_field(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }
}

/// A strict map that produces an instance of a [`StructDef`].
///
/// Accepts a map, or an instance of the same struct. Fields not covered by
/// the shape take their default from the definition.
#[derive(Debug, Clone)]
pub struct StructType {
    def: StructDef,
    map: MapType,
}

impl StructType {
    /// Fails if the shape is empty or names a field `def` lacks.
    pub fn new<K, T, I>(def: StructDef, shape: I) -> BuildResult<Self>
    where
        K: Into<MapKey>,
        T: Into<Type>,
        I: IntoIterator<Item = (K, T)>,
    {
        let map = MapType::new(shape).map_err(|_| BuildError::EmptyShape { kind: "struct" })?;
        if let Some(key) = map.shape.keys().find(|k| !def.has_field(&k.as_segment())) {
            return Err(BuildError::UnknownStructField {
                name: def.name.clone(),
                field: key.as_segment(),
            });
        }
        Ok(Self {
            def,
            map: map.strict(),
        })
    }

    pub fn def(&self) -> &StructDef {
        &self.def
    }

    fn mismatch(&self, value: &Value) -> Issue {
        let actual = match value {
            Value::Struct { name, .. } => Value::atom(name.as_str()),
            other => Value::atom(other.kind()),
        };
        let ctx = context([("expected", Value::atom(self.def.name.as_str())), ("actual", actual)]);
        Issue::new(IssueKind::TypeMismatch, template::render(TYPE_MISMATCH, &ctx))
    }
}

impl Parser for StructType {
    fn parse_value(&self, value: &Value) -> Result<Value, Issue> {
        let converted;
        let entries = match value {
            Value::Null => return Err(required_issue()),
            Value::Map(entries) => entries,
            Value::Struct { name, fields } if *name == self.def.name => {
                converted = fields
                    .iter()
                    .map(|(k, v)| (MapKey::atom(k.as_str()), v.clone()))
                    .collect::<BTreeMap<_, _>>();
                &converted
            }
            other => return Err(self.mismatch(other)),
        };

        let (parsed, issues) = self.map.parse_fields(entries);
        if !issues.is_empty() {
            return Err(Issue::aggregate(FIELDS_FAILED, issues, &Value::Map(parsed)));
        }

        let mut fields = self.def.fields.clone();
        fields.extend(parsed.into_iter().map(|(k, v)| (k.as_segment(), v)));
        Ok(Value::Struct {
            name: self.def.name.clone(),
            fields,
        })
    }
}
