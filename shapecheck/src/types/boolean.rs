use crate::issue::Issue;
use crate::types::{Coercion, Parser, prepare, type_issue};
use crate::value::Value;

/// Accepts `true` and `false`.
///
/// With coercion enabled, the strings `true`/`false`, `yes`/`no`, `on`/`off`
/// and `1`/`0` (case-insensitive) and the integers `1` and `0` are converted.
#[derive(Debug, Clone, Default)]
pub struct BooleanType {
    coerce: bool,
}

impl BooleanType {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable coercion.
    pub fn coerce(mut self, coerce: bool) -> Self {
        self.coerce = coerce;
        self
    }
}

fn coerce_bool(value: &Value) -> Coercion {
    let converted = match value {
        Value::Str(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "yes" | "on" | "1" => Some(true),
            "false" | "no" | "off" | "0" => Some(false),
            _ => None,
        },
        Value::Int(1) => Some(true),
        Value::Int(0) => Some(false),
        Value::Int(_) => None,
        _ => return Coercion::Unchanged,
    };
    converted.map_or(Coercion::Failed, |b| Coercion::Converted(Value::Bool(b)))
}

impl Parser for BooleanType {
    fn parse_value(&self, value: &Value) -> Result<Value, Issue> {
        let value = prepare(value, self.coerce, "boolean", coerce_bool)?;
        match value.as_ref() {
            Value::Bool(_) => Ok(value.into_owned()),
            other => Err(type_issue("boolean", other)),
        }
    }
}
