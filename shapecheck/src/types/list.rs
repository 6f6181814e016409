//! Variable-length homogeneous sequences.

use crate::issue::{Issue, IssueKind};
use crate::param::{ErrorConfig, Param};
use crate::template::context;
use crate::types::{Coercion, Parser, Type, parse_items, prepare, type_issue};
use crate::value::Value;

const MIN_LENGTH: &str = "must have at least {{min_length | item}}, got {{actual | item}}";
const MAX_LENGTH: &str = "must have at most {{max_length | item}}, got {{actual | item}}";
const LENGTH: &str = "must have exactly {{length | item}}, got {{actual | item}}";
const ITEMS_FAILED: &str = "one or more items failed validation";

/// A list whose every item satisfies `inner`.
///
/// Length constraints are checked before any item is parsed. Every item is
/// then parsed, and all failures are reported together under their index.
#[derive(Debug, Clone)]
pub struct ListType {
    inner: Box<Type>,
    coerce: bool,
    min_length: Option<Param<usize>>,
    max_length: Option<Param<usize>>,
    length: Option<Param<usize>>,
}

impl ListType {
    pub fn new(inner: impl Into<Type>) -> Self {
        Self {
            inner: Box::new(inner.into()),
            coerce: false,
            min_length: None,
            max_length: None,
            length: None,
        }
    }

    /// Accept tuples as lists.
    pub fn coerce(mut self, coerce: bool) -> Self {
        self.coerce = coerce;
        self
    }

    pub fn min_length(self, n: usize) -> Self {
        self.min_length_with(n, ErrorConfig::default())
    }

    pub fn min_length_with(mut self, n: usize, error: impl Into<ErrorConfig>) -> Self {
        self.min_length = Some(Param::merge(n, MIN_LENGTH, error.into()));
        self
    }

    pub fn max_length(self, n: usize) -> Self {
        self.max_length_with(n, ErrorConfig::default())
    }

    pub fn max_length_with(mut self, n: usize, error: impl Into<ErrorConfig>) -> Self {
        self.max_length = Some(Param::merge(n, MAX_LENGTH, error.into()));
        self
    }

    pub fn length(self, n: usize) -> Self {
        self.length_with(n, ErrorConfig::default())
    }

    pub fn length_with(mut self, n: usize, error: impl Into<ErrorConfig>) -> Self {
        self.length = Some(Param::merge(n, LENGTH, error.into()));
        self
    }

    pub fn inner(&self) -> &Type {
        &self.inner
    }

    fn check_length(&self, items: &[Value]) -> Result<(), Issue> {
        let actual = items.len();
        let checks: [(&'static str, &Option<Param<usize>>, fn(usize, usize) -> bool); 3] = [
            ("min_length", &self.min_length, |n, limit| n >= limit),
            ("max_length", &self.max_length, |n, limit| n <= limit),
            ("length", &self.length, |n, limit| n == limit),
        ];
        for (name, param, holds) in checks {
            let Some(param) = param else { continue };
            if !holds(actual, param.value) {
                let ctx = context([(name, param.value.into()), ("actual", actual.into())]);
                return Err(Issue::new(IssueKind::Constraint, param.render(ctx)));
            }
        }
        Ok(())
    }
}

impl Parser for ListType {
    fn parse_value(&self, value: &Value) -> Result<Value, Issue> {
        let value = prepare(value, self.coerce, "list", |v| match v {
            Value::Tuple(items) => Coercion::Converted(Value::List(items.clone())),
            _ => Coercion::Unchanged,
        })?;
        let Value::List(items) = value.as_ref() else {
            return Err(type_issue("list", &value));
        };
        self.check_length(items)?;

        let (parsed, issues) = parse_items(items, |_| self.inner.as_ref());
        if issues.is_empty() {
            Ok(Value::List(parsed))
        } else {
            Err(Issue::aggregate(ITEMS_FAILED, issues, &Value::List(parsed)))
        }
    }
}
