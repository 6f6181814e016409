//! Text values with length, affix and pattern constraints.
//!
//! Constraints are checked in a fixed order regardless of the order the
//! builder methods were called in: minimum length, maximum length, exact
//! length, prefix, suffix, then each pattern in the order added. Lengths
//! count Unicode scalar values. Trimming happens before any check and the
//! trailing-slash policy is applied only once every check has passed.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{BuildError, BuildResult};
use crate::issue::{Issue, IssueKind};
use crate::param::{ErrorConfig, Param};
use crate::template::context;
use crate::types::{Coercion, Parser, prepare, type_issue};
use crate::value::Value;

const MIN_LENGTH: &str =
    "must have at least {{min_length | character}}, got {{actual | character}}";
const MAX_LENGTH: &str = "must have at most {{max_length | character}}, got {{actual | character}}";
const LENGTH: &str = "must have exactly {{length | character}}, got {{actual | character}}";
const STARTS_WITH: &str = "must start with {{prefix}}";
const ENDS_WITH: &str = "must end with {{suffix}}";
const PATTERN: &str = "must match the pattern {{regex}}";

const EMAIL_MESSAGE: &str = "must be a valid email address";
const UUID_MESSAGE: &str = "must be a valid UUID";
const URI_MESSAGE: &str = "must be a valid URI";

static EMAIL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is a valid regex")
});

static UUID: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}$")
        .expect("uuid pattern is a valid regex")
});

static URI: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z][A-Za-z0-9+.\-]*://[^\s/?#]+[^\s]*$")
        .expect("uri pattern is a valid regex")
});

/// What to do with a trailing `/` once the string is accepted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TrailingSlash {
    /// Leave the string as it is.
    #[default]
    Keep,
    /// Remove every trailing slash.
    Trim,
    /// Append a slash if there is none.
    Enforce,
}

impl TrailingSlash {
    fn apply(self, s: String) -> String {
        match self {
            Self::Keep => s,
            Self::Trim => s.trim_end_matches('/').to_string(),
            Self::Enforce if s.ends_with('/') => s,
            Self::Enforce => s + "/",
        }
    }
}

/// Accepts strings.
#[derive(Debug, Clone, Default)]
pub struct StringType {
    coerce: bool,
    trim: bool,
    min_length: Option<Param<usize>>,
    max_length: Option<Param<usize>>,
    length: Option<Param<usize>>,
    starts_with: Option<Param<String>>,
    ends_with: Option<Param<String>>,
    patterns: Vec<Param<Regex>>,
    trailing_slash: TrailingSlash,
}

impl StringType {
    pub fn new() -> Self {
        Self::default()
    }

    /// A string holding an email address. Input is trimmed first.
    pub fn email() -> Self {
        Self::new()
            .trim(true)
            .max_length(254)
            .regex_with(EMAIL.clone(), EMAIL_MESSAGE)
    }

    /// A string holding a hyphenated hexadecimal UUID.
    pub fn uuid() -> Self {
        Self::new().regex_with(UUID.clone(), UUID_MESSAGE)
    }

    /// A string holding an absolute URI with a scheme and an authority.
    pub fn uri() -> Self {
        Self::new().trim(true).regex_with(URI.clone(), URI_MESSAGE)
    }

    /// Enable or disable coercion from scalars.
    pub fn coerce(mut self, coerce: bool) -> Self {
        self.coerce = coerce;
        self
    }

    /// Strip surrounding whitespace before checking.
    pub fn trim(mut self, trim: bool) -> Self {
        self.trim = trim;
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

    pub fn starts_with(self, prefix: impl Into<String>) -> Self {
        self.starts_with_with(prefix, ErrorConfig::default())
    }

    pub fn starts_with_with(
        mut self,
        prefix: impl Into<String>,
        error: impl Into<ErrorConfig>,
    ) -> Self {
        self.starts_with = Some(Param::merge(prefix.into(), STARTS_WITH, error.into()));
        self
    }

    pub fn ends_with(self, suffix: impl Into<String>) -> Self {
        self.ends_with_with(suffix, ErrorConfig::default())
    }

    pub fn ends_with_with(
        mut self,
        suffix: impl Into<String>,
        error: impl Into<ErrorConfig>,
    ) -> Self {
        self.ends_with = Some(Param::merge(suffix.into(), ENDS_WITH, error.into()));
        self
    }

    /// Add a pattern compiled from `pattern`.
    pub fn pattern(self, pattern: &str) -> BuildResult<Self> {
        self.pattern_with(pattern, ErrorConfig::default())
    }

    pub fn pattern_with(self, pattern: &str, error: impl Into<ErrorConfig>) -> BuildResult<Self> {
        let regex = Regex::new(pattern).map_err(|e| BuildError::InvalidPattern {
            pattern: pattern.to_string(),
            message: e.to_string(),
        })?;
        Ok(self.regex_with(regex, error))
    }

    /// Add an already compiled pattern.
    pub fn regex(self, regex: Regex) -> Self {
        self.regex_with(regex, ErrorConfig::default())
    }

    pub fn regex_with(mut self, regex: Regex, error: impl Into<ErrorConfig>) -> Self {
        self.patterns.push(Param::merge(regex, PATTERN, error.into()));
        self
    }

    pub fn trailing_slash(mut self, policy: TrailingSlash) -> Self {
        self.trailing_slash = policy;
        self
    }

    fn check(&self, s: &str) -> Result<(), Issue> {
        let actual = s.chars().count();
        let value = || Value::str(s);

        let holds = |param: &Option<Param<usize>>, ok: fn(usize, usize) -> bool| {
            param.as_ref().is_none_or(|p| ok(actual, p.value))
        };
        let lengths = [
            ("min_length", &self.min_length, holds(&self.min_length, |a, n| a >= n)),
            ("max_length", &self.max_length, holds(&self.max_length, |a, n| a <= n)),
            ("length", &self.length, holds(&self.length, |a, n| a == n)),
        ];
        for (name, param, holds) in lengths {
            if let (Some(param), false) = (param, holds) {
                let ctx = context([
                    (name, param.value.into()),
                    ("actual", actual.into()),
                    ("value", value()),
                ]);
                return Err(Issue::new(IssueKind::Constraint, param.render(ctx)));
            }
        }

        if let Some(param) = &self.starts_with {
            if !s.starts_with(param.value.as_str()) {
                let ctx = context([
                    ("prefix", Value::str(param.value.as_str())),
                    ("value", value()),
                ]);
                return Err(Issue::new(IssueKind::Constraint, param.render(ctx)));
            }
        }
        if let Some(param) = &self.ends_with {
            if !s.ends_with(param.value.as_str()) {
                let ctx = context([
                    ("suffix", Value::str(param.value.as_str())),
                    ("value", value()),
                ]);
                return Err(Issue::new(IssueKind::Constraint, param.render(ctx)));
            }
        }

        for param in &self.patterns {
            if !param.value.is_match(s) {
                let ctx = context([
                    ("regex", Value::str(param.value.as_str())),
                    ("value", value()),
                ]);
                return Err(Issue::new(IssueKind::Constraint, param.render(ctx)));
            }
        }
        Ok(())
    }
}

fn coerce_string(value: &Value) -> Coercion {
    match value {
        Value::Int(_) | Value::Float(_) | Value::Decimal(_) | Value::Bool(_) => {
            Coercion::Converted(Value::Str(value.to_string()))
        }
        Value::Date(_) | Value::DateTime(_) => Coercion::Converted(Value::Str(value.to_string())),
        Value::Atom(name) => Coercion::Converted(Value::str(name.as_str())),
        _ => Coercion::Unchanged,
    }
}

impl Parser for StringType {
    fn parse_value(&self, value: &Value) -> Result<Value, Issue> {
        let value = prepare(value, self.coerce, "string", coerce_string)?;
        let Value::Str(s) = value.as_ref() else {
            return Err(type_issue("string", &value));
        };
        let s = if self.trim { s.trim() } else { s.as_str() };
        self.check(s)?;
        Ok(Value::Str(self.trailing_slash.apply(s.to_string())))
    }
}
