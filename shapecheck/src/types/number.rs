//! The number family: integer, float, decimal and int-or-float number.
//!
//! All four share one pipeline, [`Numeric`], parameterized by a
//! [`NumericKind`] marker that supplies the type check, the comparable view of
//! an accepted value, and the coercion policy:
//!
//! | Variant | Accepts | Coerces from |
//! |---------|---------|--------------|
//! | integer | `Int` | floats and decimals (truncated toward zero), integer or float text |
//! | float | `Float` | integers, decimals, integer or float text |
//! | decimal | `Decimal` | integers, finite floats, exact decimal text |
//! | number | `Int`, `Float` | decimals, integer or float text |

use std::fmt::Debug;
use std::marker::PhantomData;

use rust_decimal::Decimal;
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};

use crate::issue::{Issue, IssueKind};
use crate::param::{ErrorConfig, Param};
use crate::template::context;
use crate::types::sealed::Sealed;
use crate::types::{Coercion, Convert, Parser, prepare, type_issue};
use crate::value::Value;

const GT: &str = "must be greater than {{gt}}";
const GTE: &str = "must be greater than or equal to {{gte}}";
const LT: &str = "must be less than {{lt}}";
const LTE: &str = "must be less than or equal to {{lte}}";

/// Policy for one member of the number family.
///
/// Sealed: implemented only by the kind markers in this module.
pub trait NumericKind: Sealed + Debug + Clone + Send + Sync + 'static {
    /// Limit type of the `gt`/`gte`/`lt`/`lte` constraints.
    type Limit: Copy + PartialOrd + Debug + Send + Sync + Into<Value>;

    /// Kind name used in messages.
    const NAME: &'static str;

    /// Comparable view of the value, or `None` if it has the wrong kind.
    fn extract(value: &Value) -> Option<Self::Limit>;
}

#[derive(Debug, Clone)]
pub struct IntegerKind;

#[derive(Debug, Clone)]
pub struct FloatKind;

#[derive(Debug, Clone)]
pub struct DecimalKind;

/// Integer or float.
#[derive(Debug, Clone)]
pub struct NumberKind;

fn parse_float_text(s: &str) -> Option<f64> {
    s.trim().parse::<f64>().ok().filter(|x| x.is_finite())
}

fn truncate(x: f64) -> Option<i64> {
    let t = x.trunc();
    // i64::MAX as f64 rounds up to 2^63, which is already out of range
    (x.is_finite() && t >= i64::MIN as f64 && t < i64::MAX as f64).then_some(t as i64)
}

impl NumericKind for IntegerKind {
    type Limit = i64;
    const NAME: &'static str = "integer";

    fn extract(value: &Value) -> Option<i64> {
        match value {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }
}

impl Sealed for IntegerKind {}

impl Convert for IntegerKind {
    fn convert(value: &Value) -> Coercion {
        let converted = match value {
            Value::Float(x) => truncate(*x),
            Value::Decimal(d) => d.trunc().to_i64(),
            Value::Str(s) => s
                .trim()
                .parse::<i64>()
                .ok()
                .or_else(|| parse_float_text(s).and_then(truncate)),
            _ => return Coercion::Unchanged,
        };
        converted.map_or(Coercion::Failed, |n| Coercion::Converted(Value::Int(n)))
    }
}

impl NumericKind for FloatKind {
    type Limit = f64;
    const NAME: &'static str = "float";

    fn extract(value: &Value) -> Option<f64> {
        match value {
            Value::Float(x) => Some(*x),
            _ => None,
        }
    }
}

impl Sealed for FloatKind {}

impl Convert for FloatKind {
    fn convert(value: &Value) -> Coercion {
        let converted = match value {
            Value::Int(n) => Some(*n as f64),
            Value::Decimal(d) => d.to_f64(),
            Value::Str(s) => parse_float_text(s),
            _ => return Coercion::Unchanged,
        };
        converted.map_or(Coercion::Failed, |x| Coercion::Converted(Value::Float(x)))
    }
}

impl NumericKind for DecimalKind {
    type Limit = Decimal;
    const NAME: &'static str = "decimal";

    fn extract(value: &Value) -> Option<Decimal> {
        match value {
            Value::Decimal(d) => Some(*d),
            _ => None,
        }
    }
}

impl Sealed for DecimalKind {}

impl Convert for DecimalKind {
    fn convert(value: &Value) -> Coercion {
        let converted = match value {
            Value::Int(n) => Some(Decimal::from(*n)),
            Value::Float(x) => Decimal::from_f64(*x),
            Value::Str(s) => Decimal::from_str_exact(s.trim()).ok(),
            _ => return Coercion::Unchanged,
        };
        converted.map_or(Coercion::Failed, |d| Coercion::Converted(Value::Decimal(d)))
    }
}

impl NumericKind for NumberKind {
    type Limit = f64;
    const NAME: &'static str = "number";

    fn extract(value: &Value) -> Option<f64> {
        match value {
            Value::Int(n) => Some(*n as f64),
            Value::Float(x) => Some(*x),
            _ => None,
        }
    }
}

impl Sealed for NumberKind {}

impl Convert for NumberKind {
    fn convert(value: &Value) -> Coercion {
        match value {
            Value::Str(s) => match s.trim().parse::<i64>() {
                Ok(n) => Coercion::Converted(Value::Int(n)),
                Err(_) => parse_float_text(s)
                    .map_or(Coercion::Failed, |x| Coercion::Converted(Value::Float(x))),
            },
            Value::Decimal(d) => d
                .to_f64()
                .map_or(Coercion::Failed, |x| Coercion::Converted(Value::Float(x))),
            _ => Coercion::Unchanged,
        }
    }
}

/// A member of the number family with optional bounds.
#[derive(Debug, Clone)]
pub struct Numeric<K: NumericKind> {
    coerce: bool,
    gt: Option<Param<K::Limit>>,
    gte: Option<Param<K::Limit>>,
    lt: Option<Param<K::Limit>>,
    lte: Option<Param<K::Limit>>,
    kind: PhantomData<K>,
}

pub type IntegerType = Numeric<IntegerKind>;
pub type FloatType = Numeric<FloatKind>;
pub type DecimalType = Numeric<DecimalKind>;
pub type NumberType = Numeric<NumberKind>;

impl<K: NumericKind> Default for Numeric<K> {
    fn default() -> Self {
        Self {
            coerce: false,
            gt: None,
            gte: None,
            lt: None,
            lte: None,
            kind: PhantomData,
        }
    }
}

impl<K: NumericKind> Numeric<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable coercion.
    pub fn coerce(mut self, coerce: bool) -> Self {
        self.coerce = coerce;
        self
    }

    /// Require the value to be strictly greater than `limit`.
    pub fn gt(self, limit: impl Into<K::Limit>) -> Self {
        self.gt_with(limit, ErrorConfig::default())
    }

    pub fn gt_with(mut self, limit: impl Into<K::Limit>, error: impl Into<ErrorConfig>) -> Self {
        self.gt = Some(Param::merge(limit.into(), GT, error.into()));
        self
    }

    /// Require the value to be greater than or equal to `limit`.
    pub fn gte(self, limit: impl Into<K::Limit>) -> Self {
        self.gte_with(limit, ErrorConfig::default())
    }

    pub fn gte_with(mut self, limit: impl Into<K::Limit>, error: impl Into<ErrorConfig>) -> Self {
        self.gte = Some(Param::merge(limit.into(), GTE, error.into()));
        self
    }

    /// Require the value to be strictly less than `limit`.
    pub fn lt(self, limit: impl Into<K::Limit>) -> Self {
        self.lt_with(limit, ErrorConfig::default())
    }

    pub fn lt_with(mut self, limit: impl Into<K::Limit>, error: impl Into<ErrorConfig>) -> Self {
        self.lt = Some(Param::merge(limit.into(), LT, error.into()));
        self
    }

    /// Require the value to be less than or equal to `limit`.
    pub fn lte(self, limit: impl Into<K::Limit>) -> Self {
        self.lte_with(limit, ErrorConfig::default())
    }

    pub fn lte_with(mut self, limit: impl Into<K::Limit>, error: impl Into<ErrorConfig>) -> Self {
        self.lte = Some(Param::merge(limit.into(), LTE, error.into()));
        self
    }

    pub fn is_coercing(&self) -> bool {
        self.coerce
    }

    fn check(&self, n: K::Limit, value: &Value) -> Result<(), Issue> {
        type Bound<'a, L> = (&'static str, &'a Option<Param<L>>, fn(&L, &L) -> bool);
        let bounds: [Bound<'_, K::Limit>; 4] = [
            ("gt", &self.gt, |n, limit| n > limit),
            ("gte", &self.gte, |n, limit| n >= limit),
            ("lt", &self.lt, |n, limit| n < limit),
            ("lte", &self.lte, |n, limit| n <= limit),
        ];

        for (name, param, holds) in bounds {
            let Some(param) = param else { continue };
            if !holds(&n, &param.value) {
                let ctx = context([(name, param.value.into()), ("value", value.clone())]);
                return Err(Issue::new(IssueKind::Constraint, param.render(ctx)));
            }
        }
        Ok(())
    }
}

impl<K: NumericKind + Convert> Parser for Numeric<K> {
    fn parse_value(&self, value: &Value) -> Result<Value, Issue> {
        let value = prepare(value, self.coerce, K::NAME, K::convert)?;
        let n = K::extract(&value).ok_or_else(|| type_issue(K::NAME, &value))?;
        self.check(n, &value)?;
        Ok(value.into_owned())
    }
}
