//! Modifiers that post-process the inner type's result.

use std::fmt;
use std::sync::Arc;

use crate::issue::{Issue, IssueKind};
use crate::param::{ErrorConfig, Param};
use crate::template::context;
use crate::types::{Parser, Type};
use crate::value::Value;

const REFINEMENT_FAILED: &str = "failed refinement";

/// Predicate run by [`RefineType`] over the inner type's result.
pub type Predicate = Arc<dyn Fn(&Value) -> bool + Send + Sync>;

/// Mapping run by [`TransformType`] over the inner type's result.
pub type TransformFn = Arc<dyn Fn(Value) -> Value + Send + Sync>;

/// Runs the inner type, then rejects results for which the predicate is false.
///
/// The rejection carries the score of the parsed value, so a refinement that
/// fails late still ranks well inside a union.
#[derive(Clone)]
pub struct RefineType {
    inner: Box<Type>,
    predicate: Predicate,
    error: Param<()>,
}

impl RefineType {
    pub fn new<F>(inner: impl Into<Type>, predicate: F) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        Self::with_error(inner, predicate, ErrorConfig::default())
    }

    pub fn with_error<F>(
        inner: impl Into<Type>,
        predicate: F,
        error: impl Into<ErrorConfig>,
    ) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        Self {
            inner: Box::new(inner.into()),
            predicate: Arc::new(predicate),
            error: Param::merge((), REFINEMENT_FAILED, error.into()),
        }
    }

    pub fn inner(&self) -> &Type {
        &self.inner
    }
}

impl fmt::Debug for RefineType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RefineType")
            .field("inner", &self.inner)
            .field("error", &self.error)
            .finish_non_exhaustive()
    }
}

impl Parser for RefineType {
    fn parse_value(&self, value: &Value) -> Result<Value, Issue> {
        let parsed = self.inner.parse(value)?;
        if (self.predicate)(&parsed) {
            return Ok(parsed);
        }
        let score = parsed.parse_score();
        let message = self.error.render(context([("value", parsed)]));
        Err(Issue::new(IssueKind::Refinement, message).with_score(score))
    }
}

/// Runs the inner type, then maps its result. Never fails on its own.
#[derive(Clone)]
pub struct TransformType {
    inner: Box<Type>,
    f: TransformFn,
}

impl TransformType {
    pub fn new<F>(inner: impl Into<Type>, f: F) -> Self
    where
        F: Fn(Value) -> Value + Send + Sync + 'static,
    {
        Self {
            inner: Box::new(inner.into()),
            f: Arc::new(f),
        }
    }

    pub fn inner(&self) -> &Type {
        &self.inner
    }
}

impl fmt::Debug for TransformType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransformType")
            .field("inner", &self.inner)
            .finish_non_exhaustive()
    }
}

impl Parser for TransformType {
    fn parse_value(&self, value: &Value) -> Result<Value, Issue> {
        self.inner.parse(value).map(|parsed| (self.f)(parsed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build::{integer, list, refine, refine_with, string, transform};

    #[test]
    fn test_refine_passes_and_fails() {
        let even: Type = refine(integer(), |v| matches!(v, Value::Int(n) if n % 2 == 0)).into();
        assert_eq!(even.parse(&Value::from(4)), Ok(Value::from(4)));

        let issue = even.parse(&Value::from(3)).unwrap_err();
        assert_eq!(issue.kind, IssueKind::Refinement);
        assert_eq!(issue.message, "failed refinement");
        assert_eq!(issue.parse_score, 1);
    }

    #[test]
    fn test_refine_scores_the_parsed_value() {
        let non_empty: Type = refine(list(integer()), |_| false).into();
        let input = Value::List(vec![Value::from(1), Value::from(2)]);
        assert_eq!(non_empty.parse(&input).unwrap_err().parse_score, 3);
    }

    #[test]
    fn test_refine_custom_message_and_inner_failure() {
        let ty: Type = refine_with(integer(), |_| false, "{{value}} is not allowed").into();
        assert_eq!(ty.parse(&Value::from(9)).unwrap_err().message, "9 is not allowed");
        assert_eq!(
            ty.parse(&Value::from("x")).unwrap_err().kind,
            IssueKind::TypeMismatch
        );
    }

    #[test]
    fn test_transform_maps_result() {
        let upper: Type = transform(string(), |v| match v {
            Value::Str(s) => Value::Str(s.to_uppercase()),
            other => other,
        })
        .into();
        assert_eq!(upper.parse(&Value::from("ab")), Ok(Value::from("AB")));
        assert!(upper.parse(&Value::from(1)).is_err());
    }
}
