use std::fmt;
use std::sync::Arc;

use crate::error::{BuildError, BuildResult};
use crate::issue::Issue;
use crate::types::{Parser, Type};
use crate::value::Value;

/// Value substituted for `Null` by an [`OptionalType`].
#[derive(Clone)]
pub enum DefaultValue {
    /// A fixed value, checked against the inner type when it is configured.
    Value(Value),
    /// A callback evaluated on every substitution.
    Lazy(Arc<dyn Fn() -> Value + Send + Sync>),
}

impl DefaultValue {
    fn resolve(&self) -> Value {
        match self {
            Self::Value(value) => value.clone(),
            Self::Lazy(f) => f(),
        }
    }
}

impl fmt::Debug for DefaultValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(value) => f.debug_tuple("Value").field(value).finish(),
            Self::Lazy(_) => f.write_str("Lazy(..)"),
        }
    }
}

/// Makes the inner type accept `Null`.
///
/// Without a default `Null` is accepted as-is. With one, `Null` is replaced
/// by the default and the result goes through the inner type, so a callback
/// that produces a bad value is reported as an issue at parse time.
#[derive(Debug, Clone)]
pub struct OptionalType {
    inner: Box<Type>,
    default: Option<DefaultValue>,
}

impl OptionalType {
    pub fn new(inner: impl Into<Type>) -> Self {
        Self {
            inner: Box::new(inner.into()),
            default: None,
        }
    }

    /// Substitute `value` for `Null`. Fails if the inner type rejects it.
    pub fn with_default(mut self, value: impl Into<Value>) -> BuildResult<Self> {
        let value = value.into();
        if let Err(issue) = self.inner.parse(&value) {
            return Err(BuildError::InvalidDefault {
                message: issue.to_string(),
            });
        }
        self.default = Some(DefaultValue::Value(value));
        Ok(self)
    }

    /// Substitute the result of `f` for `Null`, evaluated on each parse.
    pub fn with_default_fn<F>(mut self, f: F) -> Self
    where
        F: Fn() -> Value + Send + Sync + 'static,
    {
        self.default = Some(DefaultValue::Lazy(Arc::new(f)));
        self
    }

    pub fn inner(&self) -> &Type {
        &self.inner
    }

    pub fn default_value(&self) -> Option<&DefaultValue> {
        self.default.as_ref()
    }
}

impl Parser for OptionalType {
    fn parse_value(&self, value: &Value) -> Result<Value, Issue> {
        match (value, &self.default) {
            (Value::Null, None) => Ok(Value::Null),
            (Value::Null, Some(default)) => self.inner.parse(&default.resolve()),
            (value, _) => self.inner.parse(value),
        }
    }
}
