//! Validation issues.
//!
//! An [`Issue`] is both a single failure and a tree: composite types return a
//! parent issue whose `issues` hold one entry per failing child, each child
//! path already prefixed with the child's key or index.
//!
//! # Issue Kinds
//!
//! Every issue carries an [`IssueKind`]. When serialized, kinds are written
//! to the `code` field in SCREAMING_SNAKE_CASE (e.g. `TypeMismatch` becomes
//! `"TYPE_MISMATCH"`).
//!
//! # Example
//! ```rust
//! use shapecheck::{Issue, IssueKind};
//!
//! let inner = Issue::new(IssueKind::Required, "is required").prefixed("name");
//! let middle = Issue::new(IssueKind::Aggregate, "one or more fields failed validation")
//!     .with_issues(vec![inner])
//!     .prefixed("user");
//! let root = Issue::new(IssueKind::Aggregate, "one or more fields failed validation")
//!     .with_issues(vec![middle])
//!     .flatten();
//!
//! assert_eq!(root.issues.len(), 1);
//! assert_eq!(root.issues[0].path, vec!["user", "name"]);
//! ```

use std::fmt;

use thiserror::Error;
use tracing::debug;

use crate::value::Value;

/// Category of a validation failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde-compat",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "SCREAMING_SNAKE_CASE")
)]
#[non_exhaustive]
pub enum IssueKind {
    /// An absent value where one is mandatory
    Required,
    /// Best-effort conversion into the target kind failed
    Coercion,
    /// The value has the wrong concrete kind
    TypeMismatch,
    /// A bound, length, pattern, affix or membership check failed
    Constraint,
    /// A strict mapping received a field its shape does not declare
    UnknownField,
    /// A composite wrapping one or more child issues
    Aggregate,
    /// A refinement predicate returned false
    Refinement,
}

impl IssueKind {
    /// Returns the string representation of the kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Required => "REQUIRED",
            Self::Coercion => "COERCION",
            Self::TypeMismatch => "TYPE_MISMATCH",
            Self::Constraint => "CONSTRAINT",
            Self::UnknownField => "UNKNOWN_FIELD",
            Self::Aggregate => "AGGREGATE",
            Self::Refinement => "REFINEMENT",
        }
    }
}

impl fmt::Display for IssueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A node in the validation-failure tree.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}", format_issue(.path, .message))]
#[cfg_attr(feature = "serde-compat", derive(serde::Serialize, serde::Deserialize))]
pub struct Issue {
    /// Location of the failure, root is empty
    pub path: Vec<String>,
    /// Rendered, human-readable message
    pub message: String,
    /// Failure category
    #[cfg_attr(feature = "serde-compat", serde(rename = "code"))]
    pub kind: IssueKind,
    /// Child issues, empty for leaves
    pub issues: Vec<Issue>,
    /// How much of the candidate value was legitimately shaped
    pub parse_score: u64,
}

fn format_issue(path: &[String], message: &str) -> String {
    if path.is_empty() {
        message.to_string()
    } else {
        format!("{}: {}", path.join("."), message)
    }
}

impl Issue {
    /// Create a leaf issue at the root path.
    pub fn new(kind: IssueKind, message: impl Into<String>) -> Self {
        Self {
            path: Vec::new(),
            message: message.into(),
            kind,
            issues: Vec::new(),
            parse_score: 0,
        }
    }

    /// Create an aggregate issue over child failures.
    ///
    /// The score is taken from `partial`, the portion of the input that did
    /// parse, so that a union can rank the alternative that got furthest.
    /// The result is flattened.
    pub fn aggregate(message: impl Into<String>, issues: Vec<Issue>, partial: &Value) -> Self {
        let issue = Self::new(IssueKind::Aggregate, message)
            .with_issues(issues)
            .with_score(partial.parse_score())
            .flatten();
        debug!(
            errors = issue.issues.len(),
            score = issue.parse_score,
            paths = ?issue.issues.iter().map(|i| i.path.join(".")).collect::<Vec<_>>(),
            "Aggregated child issues"
        );
        issue
    }

    /// Replace the path.
    pub fn with_path(mut self, path: Vec<String>) -> Self {
        self.path = path;
        self
    }

    /// Replace the children.
    pub fn with_issues(mut self, issues: Vec<Issue>) -> Self {
        self.issues = issues;
        self
    }

    /// Replace the parse score.
    pub fn with_score(mut self, parse_score: u64) -> Self {
        self.parse_score = parse_score;
        self
    }

    /// Put `segment` in front of the path.
    pub fn prefixed(mut self, segment: impl Into<String>) -> Self {
        self.path.insert(0, segment.into());
        self
    }

    /// Returns true if this issue has no children.
    pub fn is_leaf(&self) -> bool {
        self.issues.is_empty()
    }

    /// Collapse the tree into one level.
    ///
    /// Every leaf below the root is hoisted into `issues`, its path becoming
    /// the concatenation of the paths of all its ancestors below the root plus
    /// its own. The root keeps its own path, message, kind and score.
    /// Flattening an already-flat issue returns it unchanged.
    pub fn flatten(self) -> Issue {
        let Issue {
            path,
            message,
            kind,
            issues,
            parse_score,
        } = self;

        let mut leaves = Vec::with_capacity(issues.len());
        for child in issues {
            collect_leaves(child, &[], &mut leaves);
        }

        Issue {
            path,
            message,
            kind,
            issues: leaves,
            parse_score,
        }
    }

    /// Iterate over the leaves of the tree in depth-first order.
    pub fn leaves(&self) -> Vec<&Issue> {
        let mut out = Vec::new();
        let mut pending = vec![self];
        while let Some(issue) = pending.pop() {
            if issue.is_leaf() {
                out.push(issue);
            } else {
                pending.extend(issue.issues.iter().rev());
            }
        }
        out
    }
}

fn collect_leaves(issue: Issue, prefix: &[String], out: &mut Vec<Issue>) {
    let mut path = Vec::with_capacity(prefix.len() + issue.path.len());
    path.extend_from_slice(prefix);
    path.extend(issue.path);

    if issue.issues.is_empty() {
        out.push(Issue {
            path,
            message: issue.message,
            kind: issue.kind,
            issues: Vec::new(),
            parse_score: issue.parse_score,
        });
    } else {
        for child in issue.issues {
            collect_leaves(child, &path, out);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(path: &[&str], message: &str) -> Issue {
        Issue::new(IssueKind::Constraint, message)
            .with_path(path.iter().map(|s| s.to_string()).collect())
    }

    #[test]
    fn test_display_with_and_without_path() {
        assert_eq!(Issue::new(IssueKind::Required, "is required").to_string(), "is required");
        assert_eq!(leaf(&["a", "0"], "too small").to_string(), "a.0: too small");
    }

    #[test]
    fn test_flatten_concatenates_paths() {
        let tree = Issue::new(IssueKind::Aggregate, "root").with_issues(vec![
            Issue::new(IssueKind::Aggregate, "mid")
                .with_path(vec!["users".into()])
                .with_issues(vec![
                    Issue::new(IssueKind::Aggregate, "inner")
                        .with_path(vec!["0".into()])
                        .with_issues(vec![leaf(&["name"], "is required")]),
                    leaf(&["1"], "expected map, got integer"),
                ]),
            leaf(&["id"], "must be greater than 0"),
        ]);

        let flat = tree.flatten();
        assert_eq!(flat.message, "root");
        let paths: Vec<_> = flat.issues.iter().map(|i| i.path.join(".")).collect();
        assert_eq!(paths, vec!["users.0.name", "users.1", "id"]);
        assert!(flat.issues.iter().all(Issue::is_leaf));
    }

    #[test]
    fn test_flatten_is_idempotent() {
        let tree = Issue::new(IssueKind::Aggregate, "root")
            .with_path(vec!["outer".into()])
            .with_issues(vec![
                Issue::new(IssueKind::Aggregate, "mid")
                    .with_path(vec!["a".into()])
                    .with_issues(vec![leaf(&["b"], "bad")]),
            ]);
        let once = tree.flatten();
        let twice = once.clone().flatten();
        assert_eq!(once, twice);
        assert_eq!(once.path, vec!["outer"]);
        assert_eq!(once.issues[0].path, vec!["a", "b"]);
    }

    #[test]
    fn test_aggregate_scores_partial_result() {
        let partial = Value::List(vec![Value::from(1), Value::from(2)]);
        let issue = Issue::aggregate("one or more items failed validation", vec![], &partial);
        assert_eq!(issue.parse_score, 3);
        assert_eq!(issue.kind, IssueKind::Aggregate);
    }

    #[test]
    fn test_leaves_in_order() {
        let tree = Issue::new(IssueKind::Aggregate, "root").with_issues(vec![
            leaf(&["a"], "first"),
            Issue::new(IssueKind::Aggregate, "mid").with_issues(vec![leaf(&["b"], "second")]),
            leaf(&["c"], "third"),
        ]);
        let messages: Vec<_> = tree.leaves().iter().map(|i| i.message.as_str()).collect();
        assert_eq!(messages, vec!["first", "second", "third"]);
    }

    #[test]
    fn test_kind_strings() {
        assert_eq!(IssueKind::TypeMismatch.as_str(), "TYPE_MISMATCH");
        assert_eq!(IssueKind::UnknownField.to_string(), "UNKNOWN_FIELD");
    }

    #[cfg(feature = "serde-compat")]
    #[test]
    fn test_serialized_shape() {
        let issue = leaf(&["extra"], "unknown field");
        let json = serde_json::to_value(&issue).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "path": ["extra"],
                "message": "unknown field",
                "code": "CONSTRAINT",
                "issues": [],
                "parse_score": 0
            })
        );
    }
}
