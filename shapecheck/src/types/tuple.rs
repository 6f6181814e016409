use crate::error::{BuildError, BuildResult};
use crate::issue::{Issue, IssueKind};
use crate::template::{self, context};
use crate::types::{Coercion, Parser, Type, parse_items, prepare, type_issue};
use crate::value::Value;

const ARITY: &str = "expected {{expected | element}}, got {{actual | element}}";
const ELEMENTS_FAILED: &str = "one or more elements failed validation";

/// A fixed-arity sequence validated positionally.
///
/// An arity mismatch is reported as a single issue without looking at the
/// elements.
#[derive(Debug, Clone)]
pub struct TupleType {
    elements: Vec<Type>,
    coerce: bool,
}

impl TupleType {
    /// Fails with fewer than two elements.
    pub fn new<I, T>(elements: I) -> BuildResult<Self>
    where
        I: IntoIterator<Item = T>,
        T: Into<Type>,
    {
        let elements: Vec<Type> = elements.into_iter().map(Into::into).collect();
        if elements.len() < 2 {
            return Err(BuildError::TooFewMembers {
                kind: "tuple",
                min: 2,
                got: elements.len(),
            });
        }
        Ok(Self {
            elements,
            coerce: false,
        })
    }

    /// Accept lists of the right length as tuples.
    pub fn coerce(mut self, coerce: bool) -> Self {
        self.coerce = coerce;
        self
    }

    pub fn elements(&self) -> &[Type] {
        &self.elements
    }
}

impl Parser for TupleType {
    fn parse_value(&self, value: &Value) -> Result<Value, Issue> {
        let value = prepare(value, self.coerce, "tuple", |v| match v {
            Value::List(items) => Coercion::Converted(Value::Tuple(items.clone())),
            _ => Coercion::Unchanged,
        })?;
        let Value::Tuple(items) = value.as_ref() else {
            return Err(type_issue("tuple", &value));
        };

        if items.len() != self.elements.len() {
            let ctx = context([
                ("expected", self.elements.len().into()),
                ("actual", items.len().into()),
            ]);
            return Err(Issue::new(IssueKind::Constraint, template::render(ARITY, &ctx)));
        }

        let (parsed, issues) = parse_items(items, |i| &self.elements[i]);
        if issues.is_empty() {
            Ok(Value::Tuple(parsed))
        } else {
            Err(Issue::aggregate(ELEMENTS_FAILED, issues, &Value::Tuple(parsed)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build::{integer, string, tuple};

    fn pair() -> Type {
        tuple([Type::from(string()), Type::from(integer())]).unwrap().into()
    }

    #[test]
    fn test_positional_parse() {
        let input = Value::Tuple(vec![Value::from("a"), Value::from(1)]);
        assert_eq!(pair().parse(&input), Ok(input.clone()));
    }

    #[test]
    fn test_arity_mismatch_is_single_issue() {
        let input = Value::Tuple(vec![Value::from(1)]);
        let issue = pair().parse(&input).unwrap_err();
        assert!(issue.is_leaf());
        assert_eq!(issue.message, "expected 2 elements, got 1 element");
    }

    #[test]
    fn test_element_failures_are_aggregated() {
        let input = Value::Tuple(vec![Value::from(1), Value::from("b")]);
        let issue = pair().parse(&input).unwrap_err();
        assert_eq!(issue.message, "one or more elements failed validation");
        let paths: Vec<_> = issue.issues.iter().map(|i| i.path.join(".")).collect();
        assert_eq!(paths, vec!["0", "1"]);
        // fixed arity: 1 + 0 parsed elements
        assert_eq!(issue.parse_score, 1);
    }

    #[test]
    fn test_list_coercion_and_too_few_elements() {
        let ty: Type = tuple([Type::from(string()), Type::from(integer())])
            .unwrap()
            .coerce(true)
            .into();
        let list = Value::List(vec![Value::from("a"), Value::from(1)]);
        assert_eq!(ty.parse(&list), Ok(Value::Tuple(vec![Value::from("a"), Value::from(1)])));

        assert!(matches!(
            tuple([Type::from(string())]),
            Err(BuildError::TooFewMembers { kind: "tuple", min: 2, got: 1 })
        ));
    }
}
