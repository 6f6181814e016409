use std::collections::BTreeMap;

use crate::error::{BuildError, BuildResult};
use crate::issue::{Issue, IssueKind};
use crate::types::{AnyType, OptionalType, Parser, Type, required_issue, type_issue};
use crate::value::{MapKey, Value};

const ENTRIES_FAILED: &str = "one or more entries failed validation";
const INVALID_KEY: &str = "invalid key";

/// An open-ended map: every key satisfies `keys` and every value satisfies
/// `values`.
///
/// Key and value failures are both reported under the entry's key.
#[derive(Debug, Clone)]
pub struct RecordType {
    keys: Box<Type>,
    values: Box<Type>,
}

impl RecordType {
    /// Values default to accepting anything, including `Null`.
    ///
    /// Fails if `keys` can produce something other than a string or an atom.
    pub fn new(keys: impl Into<Type>) -> BuildResult<Self> {
        Self::with_values(keys, OptionalType::new(AnyType::new()))
    }

    pub fn with_values(keys: impl Into<Type>, values: impl Into<Type>) -> BuildResult<Self> {
        let keys = keys.into();
        if !keys.is_string_like() {
            return Err(BuildError::NonStringKeys { kind: keys.name() });
        }
        Ok(Self {
            keys: Box::new(keys),
            values: Box::new(values.into()),
        })
    }

    pub fn keys(&self) -> &Type {
        &self.keys
    }

    pub fn values(&self) -> &Type {
        &self.values
    }

    fn parse_entry(&self, key: &MapKey, value: &Value) -> Result<(MapKey, Value), Vec<Issue>> {
        let parsed_key = self.keys.parse(&key.to_value()).and_then(|k| {
            MapKey::from_value(&k).ok_or_else(|| Issue::new(IssueKind::Constraint, INVALID_KEY))
        });
        let parsed_value = self.values.parse(value);

        let segment = key.as_segment();
        match (parsed_key, parsed_value) {
            (Ok(k), Ok(v)) => Ok((k, v)),
            (key_result, value_result) => Err(key_result
                .err()
                .into_iter()
                .chain(value_result.err())
                .map(|issue| issue.prefixed(segment.clone()))
                .collect()),
        }
    }
}

impl Parser for RecordType {
    fn parse_value(&self, value: &Value) -> Result<Value, Issue> {
        let entries = match value {
            Value::Null => return Err(required_issue()),
            Value::Map(entries) => entries,
            other => return Err(type_issue("record", other)),
        };

        let mut parsed = BTreeMap::new();
        let mut issues = Vec::new();
        for (key, value) in entries {
            match self.parse_entry(key, value) {
                Ok((k, v)) => {
                    parsed.insert(k, v);
                }
                Err(entry_issues) => issues.extend(entry_issues),
            }
        }

        if issues.is_empty() {
            Ok(Value::Map(parsed))
        } else {
            Err(Issue::aggregate(ENTRIES_FAILED, issues, &Value::Map(parsed)))
        }
    }
}
