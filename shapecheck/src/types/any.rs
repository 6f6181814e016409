//! The accept-anything variant.

use crate::issue::Issue;
use crate::types::{Parser, required_issue};
use crate::value::Value;

/// Accepts any present value unchanged. Null is still required.
///
/// The output is a clone of the input, so see [`Value`]'s notes on nesting
/// depth.
#[derive(Debug, Clone, Default)]
pub struct AnyType {}

impl AnyType {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Parser for AnyType {
    fn parse_value(&self, value: &Value) -> Result<Value, Issue> {
        if value.is_null() {
            return Err(required_issue());
        }
        Ok(value.clone())
    }
}
