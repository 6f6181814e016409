//! Symbolic constants: any atom, or one of a fixed set of values.

use crate::error::{BuildError, BuildResult};
use crate::issue::{Issue, IssueKind};
use crate::param::{ErrorConfig, Param};
use crate::template::context;
use crate::types::{Coercion, Parser, prepare, type_issue};
use crate::value::Value;

const ONE_OF: &str = "must be one of {{values}}";

/// Accepts any atom. Coerces strings into atoms of the same name.
#[derive(Debug, Clone, Default)]
pub struct AtomType {
    coerce: bool,
}

impl AtomType {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable coercion.
    pub fn coerce(mut self, coerce: bool) -> Self {
        self.coerce = coerce;
        self
    }
}

impl Parser for AtomType {
    fn parse_value(&self, value: &Value) -> Result<Value, Issue> {
        let value = prepare(value, self.coerce, "atom", |v| match v {
            Value::Str(s) => Coercion::Converted(Value::atom(s.as_str())),
            _ => Coercion::Unchanged,
        })?;
        match value.as_ref() {
            Value::Atom(_) => Ok(value.into_owned()),
            other => Err(type_issue("atom", other)),
        }
    }
}

/// Accepts exactly one of a fixed list of values.
///
/// With coercion enabled, a string naming an atom member is converted into
/// that atom.
#[derive(Debug, Clone)]
pub struct EnumType {
    values: Param<Vec<Value>>,
    coerce: bool,
}

impl EnumType {
    /// Build an enum over `values`. Fails if the list is empty.
    pub fn new(values: Vec<Value>) -> BuildResult<Self> {
        Self::with_error(values, ErrorConfig::default())
    }

    /// Like [`EnumType::new`] with a custom membership message.
    pub fn with_error(values: Vec<Value>, error: impl Into<ErrorConfig>) -> BuildResult<Self> {
        if values.is_empty() {
            return Err(BuildError::EmptyEnum);
        }
        Ok(Self {
            values: Param::merge(values, ONE_OF, error.into()),
            coerce: false,
        })
    }

    /// Enable or disable coercion.
    pub fn coerce(mut self, coerce: bool) -> Self {
        self.coerce = coerce;
        self
    }

    /// The accepted values, in declaration order.
    pub fn values(&self) -> &[Value] {
        &self.values.value
    }

    fn coerce_member(&self, value: &Value) -> Coercion {
        match value {
            Value::Str(s) if !self.values().contains(value) => {
                let atom = Value::atom(s.as_str());
                if self.values().contains(&atom) {
                    Coercion::Converted(atom)
                } else {
                    Coercion::Unchanged
                }
            }
            _ => Coercion::Unchanged,
        }
    }
}

impl Parser for EnumType {
    fn parse_value(&self, value: &Value) -> Result<Value, Issue> {
        let value = prepare(value, self.coerce, "enum", |v| self.coerce_member(v))?;
        if self.values().contains(value.as_ref()) {
            return Ok(value.into_owned());
        }
        let ctx = context([
            ("values", Value::List(self.values.value.clone())),
            ("value", value.into_owned()),
        ]);
        Err(Issue::new(IssueKind::Constraint, self.values.render(ctx)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build::{atom, enum_of};
    use crate::types::Type;

    fn colors() -> Vec<Value> {
        vec![Value::atom("red"), Value::atom("green")]
    }

    #[test]
    fn test_atom_rejects_strings_without_coercion() {
        let ty: Type = atom().into();
        assert_eq!(ty.parse(&Value::atom("ok")), Ok(Value::atom("ok")));
        assert_eq!(
            ty.parse(&Value::from("ok")).unwrap_err().message,
            "expected atom, got string"
        );
        let coercing: Type = atom().coerce(true).into();
        assert_eq!(coercing.parse(&Value::from("ok")), Ok(Value::atom("ok")));
    }

    #[test]
    fn test_enum_membership() {
        let ty: Type = enum_of(colors()).unwrap().into();
        assert_eq!(ty.parse(&Value::atom("red")), Ok(Value::atom("red")));
        let issue = ty.parse(&Value::atom("blue")).unwrap_err();
        assert_eq!(issue.kind, IssueKind::Constraint);
        assert_eq!(issue.message, "must be one of [red, green]");
    }

    #[test]
    fn test_enum_coerces_string_to_member_atom() {
        let ty: Type = enum_of(colors()).unwrap().coerce(true).into();
        assert_eq!(ty.parse(&Value::from("green")), Ok(Value::atom("green")));
        assert!(ty.parse(&Value::from("blue")).is_err());
    }

    #[test]
    fn test_enum_string_members_stay_strings() {
        let ty: Type = enum_of(vec![Value::from("a"), Value::atom("a")])
            .unwrap()
            .coerce(true)
            .into();
        assert_eq!(ty.parse(&Value::from("a")), Ok(Value::from("a")));
    }

    #[test]
    fn test_empty_enum_is_a_build_error() {
        assert_eq!(enum_of(Vec::new()).unwrap_err(), BuildError::EmptyEnum);
    }

    #[test]
    fn test_custom_enum_message() {
        let ty: Type = EnumType::with_error(colors(), "{{value}} is not a color")
            .unwrap()
            .into();
        assert_eq!(
            ty.parse(&Value::atom("blue")).unwrap_err().message,
            "blue is not a color"
        );
    }
}
