//! Calendar dates and zoned timestamps.

use std::fmt::Debug;
use std::marker::PhantomData;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime, TimeZone, Utc};

use crate::issue::{Issue, IssueKind};
use crate::param::{ErrorConfig, Param};
use crate::template::context;
use crate::types::sealed::Sealed;
use crate::types::{Coercion, Convert, Parser, prepare, type_issue};
use crate::value::Value;

const MIN: &str = "must be on or after {{min}}";
const MAX: &str = "must be on or before {{max}}";

/// Policy for a temporal variant.
///
/// Sealed: implemented only by the kind markers in this module.
pub trait TemporalKind: Sealed + Debug + Clone + Send + Sync + 'static {
    type Inner: Copy + PartialOrd + Debug + Send + Sync + Into<Value>;

    const NAME: &'static str;

    fn extract(value: &Value) -> Option<Self::Inner>;
}

/// `YYYY-MM-DD` dates. Coerces from ISO text and from timestamps (date part).
#[derive(Debug, Clone)]
pub struct DateKind;

/// Timestamps with a UTC offset. Coerces from RFC 3339 text, unix seconds and
/// dates (midnight UTC).
#[derive(Debug, Clone)]
pub struct DateTimeKind;

impl TemporalKind for DateKind {
    type Inner = NaiveDate;
    const NAME: &'static str = "date";

    fn extract(value: &Value) -> Option<NaiveDate> {
        match value {
            Value::Date(d) => Some(*d),
            _ => None,
        }
    }
}

impl Sealed for DateKind {}

impl Convert for DateKind {
    fn convert(value: &Value) -> Coercion {
        match value {
            Value::Str(s) => NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
                .map_or(Coercion::Failed, |d| Coercion::Converted(Value::Date(d))),
            Value::DateTime(dt) => Coercion::Converted(Value::Date(dt.date_naive())),
            _ => Coercion::Unchanged,
        }
    }
}

impl TemporalKind for DateTimeKind {
    type Inner = DateTime<FixedOffset>;
    const NAME: &'static str = "datetime";

    fn extract(value: &Value) -> Option<DateTime<FixedOffset>> {
        match value {
            Value::DateTime(dt) => Some(*dt),
            _ => None,
        }
    }
}

impl Sealed for DateTimeKind {}

impl Convert for DateTimeKind {
    fn convert(value: &Value) -> Coercion {
        let converted = match value {
            Value::Str(s) => DateTime::parse_from_rfc3339(s.trim()).ok(),
            Value::Int(secs) => Utc.timestamp_opt(*secs, 0).single().map(|dt| dt.fixed_offset()),
            Value::Date(d) => Some(d.and_time(NaiveTime::MIN).and_utc().fixed_offset()),
            _ => return Coercion::Unchanged,
        };
        converted.map_or(Coercion::Failed, |dt| Coercion::Converted(Value::DateTime(dt)))
    }
}

/// A temporal variant with optional inclusive bounds.
#[derive(Debug, Clone)]
pub struct Temporal<K: TemporalKind> {
    coerce: bool,
    min: Option<Param<K::Inner>>,
    max: Option<Param<K::Inner>>,
    kind: PhantomData<K>,
}

pub type DateType = Temporal<DateKind>;
pub type DateTimeType = Temporal<DateTimeKind>;

impl<K: TemporalKind> Default for Temporal<K> {
    fn default() -> Self {
        Self {
            coerce: false,
            min: None,
            max: None,
            kind: PhantomData,
        }
    }
}

impl<K: TemporalKind> Temporal<K> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn coerce(mut self, coerce: bool) -> Self {
        self.coerce = coerce;
        self
    }

    /// Earliest accepted value, inclusive.
    pub fn min(self, min: K::Inner) -> Self {
        self.min_with(min, ErrorConfig::default())
    }

    pub fn min_with(mut self, min: K::Inner, error: impl Into<ErrorConfig>) -> Self {
        self.min = Some(Param::merge(min, MIN, error.into()));
        self
    }

    /// Latest accepted value, inclusive.
    pub fn max(self, max: K::Inner) -> Self {
        self.max_with(max, ErrorConfig::default())
    }

    pub fn max_with(mut self, max: K::Inner, error: impl Into<ErrorConfig>) -> Self {
        self.max = Some(Param::merge(max, MAX, error.into()));
        self
    }
}

impl<K: TemporalKind + Convert> Parser for Temporal<K> {
    fn parse_value(&self, value: &Value) -> Result<Value, Issue> {
        let value = prepare(value, self.coerce, K::NAME, K::convert)?;
        let t = K::extract(&value).ok_or_else(|| type_issue(K::NAME, &value))?;

        if let Some(min) = self.min.as_ref().filter(|p| t < p.value) {
            let ctx = context([("min", min.value.into()), ("value", value.into_owned())]);
            return Err(Issue::new(IssueKind::Constraint, min.render(ctx)));
        }
        if let Some(max) = self.max.as_ref().filter(|p| t > p.value) {
            let ctx = context([("max", max.value.into()), ("value", value.into_owned())]);
            return Err(Issue::new(IssueKind::Constraint, max.render(ctx)));
        }
        Ok(value.into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build::{date, datetime};
    use crate::types::Type;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_kind_markers_extract_and_convert() {
        let day = ymd(2024, 3, 1);
        assert_eq!(DateKind::extract(&Value::Date(day)), Some(day));
        assert_eq!(DateTimeKind::extract(&Value::Date(day)), None);
        assert!(matches!(
            DateKind::convert(&Value::from("2024-03-01")),
            Coercion::Converted(Value::Date(d)) if d == day
        ));
        assert!(matches!(DateTimeKind::convert(&Value::from("yesterday")), Coercion::Failed));
    }

    #[test]
    fn test_date_bounds_are_inclusive() {
        let ty: Type = date().min(ymd(2024, 1, 1)).max(ymd(2024, 12, 31)).into();
        assert!(ty.parse(&Value::Date(ymd(2024, 1, 1))).is_ok());
        assert_eq!(
            ty.parse(&Value::Date(ymd(2023, 12, 31))).unwrap_err().message,
            "must be on or after 2024-01-01"
        );
        assert_eq!(
            ty.parse(&Value::Date(ymd(2025, 1, 1))).unwrap_err().message,
            "must be on or before 2024-12-31"
        );
    }

    #[test]
    fn test_date_coercion() {
        let ty: Type = date().coerce(true).into();
        assert_eq!(ty.parse(&Value::from("2024-02-29")), Ok(Value::Date(ymd(2024, 2, 29))));
        assert_eq!(ty.parse(&Value::from("2023-02-29")).unwrap_err().kind, IssueKind::Coercion);
        assert_eq!(
            Type::from(date()).parse(&Value::from("2024-02-29")).unwrap_err().message,
            "expected date, got string"
        );
    }

    #[test]
    fn test_datetime_coercion() {
        let ty: Type = datetime().coerce(true).into();
        let parsed = ty.parse(&Value::from("2024-05-01T12:30:00+02:00")).unwrap();
        assert_eq!(parsed.to_string(), "2024-05-01T12:30:00+02:00");

        let epoch = ty.parse(&Value::from(0)).unwrap();
        assert_eq!(epoch.to_string(), "1970-01-01T00:00:00Z");

        let midnight = ty.parse(&Value::Date(ymd(2024, 1, 2))).unwrap();
        assert_eq!(midnight.to_string(), "2024-01-02T00:00:00Z");

        assert_eq!(ty.parse(&Value::from("yesterday")).unwrap_err().kind, IssueKind::Coercion);
    }
}
