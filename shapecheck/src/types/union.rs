use tracing::debug;

use crate::error::{BuildError, BuildResult};
use crate::issue::Issue;
use crate::types::{Parser, Type, type_issue};
use crate::value::Value;

/// Accepts a value if any alternative does.
///
/// Alternatives are tried in declaration order and the first success wins.
/// When every alternative fails, the issue with the highest parse score is
/// reported, the earliest declared one winning ties. The score estimates how
/// far an alternative got, so the reported issue is the interpretation that
/// matched most of the input.
#[derive(Debug, Clone)]
pub struct UnionType {
    alternatives: Vec<Type>,
}

impl UnionType {
    /// Fails with fewer than two alternatives.
    pub fn new<I, T>(alternatives: I) -> BuildResult<Self>
    where
        I: IntoIterator<Item = T>,
        T: Into<Type>,
    {
        let alternatives: Vec<Type> = alternatives.into_iter().map(Into::into).collect();
        if alternatives.len() < 2 {
            return Err(BuildError::TooFewMembers {
                kind: "union",
                min: 2,
                got: alternatives.len(),
            });
        }
        Ok(Self { alternatives })
    }

    pub fn alternatives(&self) -> &[Type] {
        &self.alternatives
    }
}

impl Parser for UnionType {
    fn parse_value(&self, value: &Value) -> Result<Value, Issue> {
        let mut best: Option<(usize, Issue)> = None;
        for (index, alternative) in self.alternatives.iter().enumerate() {
            match alternative.parse(value) {
                Ok(parsed) => return Ok(parsed),
                Err(issue) => {
                    let better = best
                        .as_ref()
                        .is_none_or(|(_, current)| issue.parse_score > current.parse_score);
                    if better {
                        best = Some((index, issue));
                    }
                }
            }
        }

        let Some((index, issue)) = best else {
            return Err(type_issue("union", value));
        };
        debug!(
            alternative = self.alternatives[index].name(),
            index,
            score = issue.parse_score,
            "No union alternative matched"
        );
        Err(issue)
    }
}
