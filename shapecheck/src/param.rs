//! Constraint values bundled with their error-message template.
//!
//! Every bounded constraint on a type is stored as a [`Param`]: the limit
//! value plus the template used when the constraint fails. The template is
//! the variant's default unless the caller supplied an override through
//! [`ErrorConfig`]. Both are resolved once, when the type is built.
//!
//! # Example
//! ```rust
//! use shapecheck::{integer, ErrorConfig, Type, Value};
//!
//! let age: Type = integer()
//!     .gte_with(18, ErrorConfig::new().with_message("must be an adult, got {{value}}"))
//!     .into();
//! let issue = age.parse(&Value::from(12)).unwrap_err();
//! assert_eq!(issue.message, "must be an adult, got 12");
//! ```

use std::collections::BTreeMap;

use crate::template::{self, Context};
use crate::value::Value;

/// Caller overrides for a constraint's error reporting.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ErrorConfig {
    /// Replacement message template
    pub message: Option<String>,
    /// Extra values made available to the template
    pub meta: BTreeMap<String, Value>,
}

impl ErrorConfig {
    /// Create an empty configuration (keeps the default message).
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the message template.
    pub fn with_message(mut self, template: impl Into<String>) -> Self {
        self.message = Some(template.into());
        self
    }

    /// Attach a metadata value, usable as `{{name}}` in the template.
    pub fn with_meta(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.meta.insert(name.into(), value.into());
        self
    }

    /// Combine two configurations; entries in `other` win.
    pub fn merge(mut self, other: ErrorConfig) -> Self {
        if other.message.is_some() {
            self.message = other.message;
        }
        self.meta.extend(other.meta);
        self
    }
}

impl From<&str> for ErrorConfig {
    fn from(template: &str) -> Self {
        Self::new().with_message(template)
    }
}

impl From<String> for ErrorConfig {
    fn from(template: String) -> Self {
        Self::new().with_message(template)
    }
}

/// A value together with its resolved error template and metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct Param<T> {
    pub value: T,
    pub error: String,
    pub meta: BTreeMap<String, Value>,
}

impl<T> Param<T> {
    /// Resolve `overrides` against the variant's `default_template`.
    pub fn merge(value: T, default_template: &str, overrides: ErrorConfig) -> Self {
        Self {
            value,
            error: overrides
                .message
                .unwrap_or_else(|| default_template.to_string()),
            meta: overrides.meta,
        }
    }

    /// Render the template. Context entries shadow metadata of the same name.
    pub fn render(&self, ctx: Context) -> String {
        if self.meta.is_empty() {
            return template::render(&self.error, &ctx);
        }
        let mut merged = self.meta.clone();
        merged.extend(ctx);
        template::render(&self.error, &merged)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::context;

    #[test]
    fn test_default_template_used_without_override() {
        let param = Param::merge(3, "must be greater than {{gt}}", ErrorConfig::new());
        assert_eq!(param.render(context([("gt", Value::from(3))])), "must be greater than 3");
    }

    #[test]
    fn test_override_replaces_template() {
        let param = Param::merge(3, "default", ErrorConfig::from("custom {{gt}}"));
        assert_eq!(param.error, "custom {{gt}}");
        assert_eq!(param.render(context([("gt", Value::from(3))])), "custom 3");
    }

    #[test]
    fn test_meta_available_but_shadowed_by_context() {
        let config = ErrorConfig::new()
            .with_message("{{field}} must exceed {{gt}}")
            .with_meta("field", Value::atom("age"))
            .with_meta("gt", Value::from(-1));
        let param = Param::merge(10, "unused", config);
        assert_eq!(param.render(context([("gt", Value::from(10))])), "age must exceed 10");
    }

    #[test]
    fn test_merge_error_configs() {
        let base = ErrorConfig::new().with_message("a").with_meta("x", 1);
        let merged = base.merge(ErrorConfig::new().with_meta("y", 2));
        assert_eq!(merged.message.as_deref(), Some("a"));
        assert_eq!(merged.meta.len(), 2);
    }
}
