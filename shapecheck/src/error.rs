//! Error types.
//!
//! Two classes of failure are kept apart:
//!
//! - [`BuildError`]: programmer errors raised while a [`Type`](crate::Type)
//!   is being built (empty shapes, too few union members, a null literal,
//!   unknown descriptor options, ...). These never surface at parse time.
//! - [`ValidationError`]: the data error returned by the parse-or-raise
//!   convenience [`Type::validate`](crate::Type::validate), wrapping the
//!   flattened [`Issue`] tree.

use thiserror::Error;

use crate::issue::Issue;

/// Result type alias for type construction.
pub type BuildResult<T> = Result<T, BuildError>;

/// Misuse detected while building a type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum BuildError {
    /// A map or struct shape declares no fields.
    #[error("{kind} shape must declare at least one field")]
    EmptyShape { kind: &'static str },

    /// A tuple or union has fewer members than it needs.
    #[error("{kind} requires at least {min} members, got {got}")]
    TooFewMembers {
        kind: &'static str,
        min: usize,
        got: usize,
    },

    /// A literal was built from null.
    #[error("literal value cannot be null, wrap the type in optional instead")]
    NullLiteral,

    /// A record key schema does not produce strings.
    #[error("record keys must be string-like, got {kind}")]
    NonStringKeys { kind: &'static str },

    /// A struct shape names a field its definition lacks.
    #[error("struct {name} has no field `{field}`")]
    UnknownStructField { name: String, field: String },

    /// An enum was built with no members.
    #[error("enum requires at least one value")]
    EmptyEnum,

    /// An eager optional default is rejected by the inner type.
    #[error("default value does not satisfy the inner type: {message}")]
    InvalidDefault { message: String },

    /// A descriptor carries an option the type does not understand.
    #[error("unknown option `{key}` for type {kind}")]
    UnknownOption { kind: String, key: String },

    /// A descriptor lacks an option the type needs.
    #[error("missing option `{key}` for type {kind}")]
    MissingOption { kind: String, key: String },

    /// A descriptor option has the wrong shape.
    #[error("invalid option `{key}` for type {kind}: {message}")]
    InvalidOption {
        kind: String,
        key: String,
        message: String,
    },

    /// A descriptor names a type that does not exist.
    #[error("unknown type `{name}`")]
    UnknownType { name: String },

    /// A regular expression failed to compile.
    #[error("invalid pattern `{pattern}`: {message}")]
    InvalidPattern { pattern: String, message: String },
}

impl BuildError {
    /// Create an unknown option error.
    pub fn unknown_option(kind: impl Into<String>, key: impl Into<String>) -> Self {
        Self::UnknownOption {
            kind: kind.into(),
            key: key.into(),
        }
    }

    /// Create a missing option error.
    pub fn missing_option(kind: impl Into<String>, key: impl Into<String>) -> Self {
        Self::MissingOption {
            kind: kind.into(),
            key: key.into(),
        }
    }

    /// Create an invalid option error.
    pub fn invalid_option(
        kind: impl Into<String>,
        key: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::InvalidOption {
            kind: kind.into(),
            key: key.into(),
            message: message.into(),
        }
    }
}

/// A failed parse, raised by [`Type::validate`](crate::Type::validate).
///
/// Displays every leaf of the flattened issue as `path: message`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}", format_leaves(.issue))]
pub struct ValidationError {
    /// The flattened root issue
    pub issue: Issue,
}

impl ValidationError {
    /// Borrow the issue tree.
    pub fn issue(&self) -> &Issue {
        &self.issue
    }

    /// Take the issue tree.
    pub fn into_issue(self) -> Issue {
        self.issue
    }
}

impl From<Issue> for ValidationError {
    fn from(issue: Issue) -> Self {
        Self {
            issue: issue.flatten(),
        }
    }
}

fn format_leaves(issue: &Issue) -> String {
    if issue.is_leaf() {
        return issue.to_string();
    }
    let leaves = issue
        .issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ");
    format!("{}: {}", issue, leaves)
}
