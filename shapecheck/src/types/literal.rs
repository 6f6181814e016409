use crate::error::{BuildError, BuildResult};
use crate::issue::{Issue, IssueKind};
use crate::param::{ErrorConfig, Param};
use crate::template::context;
use crate::types::{Parser, required_issue};
use crate::value::Value;

const EXACTLY: &str = "must be exactly {{expected}}";

/// Accepts a single value, compared by equality.
#[derive(Debug, Clone)]
pub struct LiteralType {
    value: Value,
    error: Param<()>,
}

impl LiteralType {
    /// Fails for `Null`; an absent literal is expressed with an optional.
    pub fn new(value: impl Into<Value>) -> BuildResult<Self> {
        Self::with_error(value, ErrorConfig::default())
    }

    pub fn with_error(value: impl Into<Value>, error: impl Into<ErrorConfig>) -> BuildResult<Self> {
        let value = value.into();
        if value.is_null() {
            return Err(BuildError::NullLiteral);
        }
        Ok(Self {
            value,
            error: Param::merge((), EXACTLY, error.into()),
        })
    }

    pub fn value(&self) -> &Value {
        &self.value
    }
}

impl Parser for LiteralType {
    fn parse_value(&self, value: &Value) -> Result<Value, Issue> {
        if value.is_null() {
            return Err(required_issue());
        }
        if *value == self.value {
            return Ok(value.clone());
        }
        let ctx = context([("expected", self.value.clone()), ("value", value.clone())]);
        Err(Issue::new(IssueKind::Constraint, self.error.render(ctx)))
    }
}
