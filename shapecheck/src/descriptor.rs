//! Build a [`Type`] from a JSON descriptor.
//!
//! A descriptor is an object naming the variant under `"type"`, plus the
//! variant's options:
//!
//! ```rust
//! use serde_json::json;
//! use shapecheck::{descriptor, Value};
//!
//! let ty = descriptor::from_json(&json!({
//!     "type": "map",
//!     "mode": "strict",
//!     "fields": {
//!         "name": {"type": "string", "min_length": 1},
//!         "age": {"type": "integer", "gte": {"value": 0, "error": "age cannot be negative"}}
//!     }
//! }))
//! .unwrap();
//!
//! let issue = ty
//!     .parse(&Value::from(json!({"name": "Ada", "age": -1})))
//!     .unwrap_err();
//! assert_eq!(issue.issues[0].to_string(), "age: age cannot be negative");
//! ```
//!
//! A constraint option is either the bare limit or an object holding the
//! limit under `"value"` and a message template under `"error"`. Options a
//! variant does not know about are rejected.

use std::collections::BTreeSet;

use chrono::{DateTime, FixedOffset, NaiveDate};
use rust_decimal::Decimal;
use serde_json::{Map, Value as Json};

use crate::build;
use crate::error::{BuildError, BuildResult};
use crate::param::ErrorConfig;
use crate::types::{
    EnumType, LiteralType, Mode, Numeric, NumericKind, StringType, StructDef, TrailingSlash, Type,
};
use crate::value::{MapKey, Value};

/// Build a type from `descriptor`.
pub fn from_json(descriptor: &Json) -> BuildResult<Type> {
    let object = descriptor.as_object().ok_or_else(|| {
        BuildError::invalid_option("descriptor", "type", "descriptor must be an object")
    })?;
    let name = match object.get("type") {
        Some(Json::String(name)) => name.as_str(),
        Some(_) => {
            return Err(BuildError::invalid_option("descriptor", "type", "expected a string"));
        }
        None => return Err(BuildError::missing_option("descriptor", "type")),
    };

    let mut options = Options::new(name, object);
    let ty = build_named(name, &mut options)?;
    options.finish()?;
    Ok(ty)
}

fn build_named(name: &str, opts: &mut Options<'_>) -> BuildResult<Type> {
    let ty = match name {
        "any" => build::any().into(),
        "boolean" => build::boolean().coerce(opts.flag("coerce")?).into(),
        "atom" => build::atom().coerce(opts.flag("coerce")?).into(),
        "enum" => {
            let values = opts
                .require_array("values")?
                .iter()
                .cloned()
                .map(Value::from)
                .collect();
            let error = opts.message("error")?;
            EnumType::with_error(values, error)?
                .coerce(opts.flag("coerce")?)
                .into()
        }
        "string" => string_options(build::string(), opts)?.into(),
        "email" => string_options(build::email(), opts)?.into(),
        "uuid" => string_options(build::uuid(), opts)?.into(),
        "uri" => string_options(build::uri(), opts)?.into(),
        "integer" => numeric(build::integer(), opts, as_i64)?.into(),
        "float" => numeric(build::float(), opts, as_f64)?.into(),
        "number" => numeric(build::number(), opts, as_f64)?.into(),
        "decimal" => numeric(build::decimal(), opts, as_decimal)?.into(),
        "date" => {
            let mut ty = build::date().coerce(opts.flag("coerce")?);
            if let Some((d, e)) = opts.constraint("min", as_date)? {
                ty = ty.min_with(d, e);
            }
            if let Some((d, e)) = opts.constraint("max", as_date)? {
                ty = ty.max_with(d, e);
            }
            ty.into()
        }
        "datetime" => {
            let mut ty = build::datetime().coerce(opts.flag("coerce")?);
            if let Some((d, e)) = opts.constraint("min", as_datetime)? {
                ty = ty.min_with(d, e);
            }
            if let Some((d, e)) = opts.constraint("max", as_datetime)? {
                ty = ty.max_with(d, e);
            }
            ty.into()
        }
        "literal" => {
            let value = Value::from(opts.require("value")?.clone());
            let error = opts.message("error")?;
            LiteralType::with_error(value, error)?.into()
        }
        "list" => {
            let mut ty =
                build::list(from_json(opts.require("items")?)?).coerce(opts.flag("coerce")?);
            if let Some((n, e)) = opts.constraint("min_length", as_usize)? {
                ty = ty.min_length_with(n, e);
            }
            if let Some((n, e)) = opts.constraint("max_length", as_usize)? {
                ty = ty.max_length_with(n, e);
            }
            if let Some((n, e)) = opts.constraint("length", as_usize)? {
                ty = ty.length_with(n, e);
            }
            ty.into()
        }
        "tuple" => {
            let elements = opts
                .require_array("elements")?
                .iter()
                .map(from_json)
                .collect::<BuildResult<Vec<_>>>()?;
            build::tuple(elements)?.coerce(opts.flag("coerce")?).into()
        }
        "map" => {
            let fields = fields(opts)?;
            let mode = match opts.str("mode")? {
                None | Some("strip") => Mode::Strip,
                Some("strict") => Mode::Strict,
                Some(other) => {
                    let message = format!("expected strip or strict, got {other}");
                    return Err(opts.invalid("mode", message));
                }
            };
            build::map(fields)?.mode(mode).coerce(opts.flag("coerce")?).into()
        }
        "struct" => {
            let struct_name = opts
                .str("name")?
                .ok_or_else(|| BuildError::missing_option("struct", "name"))?
                .to_string();
            let fields = fields(opts)?;
            let def = match opts.take("defaults") {
                Some(Json::Object(defaults)) => defaults
                    .iter()
                    .fold(StructDef::new(struct_name), |def, (k, v)| {
                        def.field(k.as_str(), Value::from(v.clone()))
                    }),
                Some(_) => return Err(opts.invalid("defaults", "expected an object")),
                None => fields
                    .iter()
                    .fold(StructDef::new(struct_name), |def, (k, _)| {
                        def.field(k.as_segment(), Value::Null)
                    }),
            };
            build::struct_of(def, fields)?.into()
        }
        "record" => {
            let keys = from_json(opts.require("keys")?)?;
            match opts.take("values") {
                Some(values) => build::record_of(keys, from_json(values)?)?.into(),
                None => build::record(keys)?.into(),
            }
        }
        "optional" => {
            let ty = build::optional(from_json(opts.require("inner")?)?);
            match opts.take("default") {
                Some(default) => ty.with_default(Value::from(default.clone()))?.into(),
                None => ty.into(),
            }
        }
        "union" => {
            let alternatives = opts
                .require_array("of")?
                .iter()
                .map(from_json)
                .collect::<BuildResult<Vec<_>>>()?;
            build::union(alternatives)?.into()
        }
        other => {
            return Err(BuildError::UnknownType {
                name: other.to_string(),
            });
        }
    };
    Ok(ty)
}

fn numeric<K: NumericKind>(
    ty: Numeric<K>,
    opts: &mut Options<'_>,
    convert: fn(&Json) -> Result<K::Limit, String>,
) -> BuildResult<Numeric<K>> {
    let mut ty = ty.coerce(opts.flag("coerce")?);
    if let Some((limit, e)) = opts.constraint("gt", convert)? {
        ty = ty.gt_with(limit, e);
    }
    if let Some((limit, e)) = opts.constraint("gte", convert)? {
        ty = ty.gte_with(limit, e);
    }
    if let Some((limit, e)) = opts.constraint("lt", convert)? {
        ty = ty.lt_with(limit, e);
    }
    if let Some((limit, e)) = opts.constraint("lte", convert)? {
        ty = ty.lte_with(limit, e);
    }
    Ok(ty)
}

fn string_options(mut ty: StringType, opts: &mut Options<'_>) -> BuildResult<StringType> {
    ty = ty.coerce(opts.flag("coerce")?);
    if opts.has("trim") {
        ty = ty.trim(opts.flag("trim")?);
    }
    if let Some((n, e)) = opts.constraint("min_length", as_usize)? {
        ty = ty.min_length_with(n, e);
    }
    if let Some((n, e)) = opts.constraint("max_length", as_usize)? {
        ty = ty.max_length_with(n, e);
    }
    if let Some((n, e)) = opts.constraint("length", as_usize)? {
        ty = ty.length_with(n, e);
    }
    if let Some((s, e)) = opts.constraint("starts_with", as_string)? {
        ty = ty.starts_with_with(s, e);
    }
    if let Some((s, e)) = opts.constraint("ends_with", as_string)? {
        ty = ty.ends_with_with(s, e);
    }
    match opts.take("pattern") {
        None => {}
        Some(Json::Array(patterns)) => {
            for raw in patterns {
                let (pattern, error) = split_constraint(opts.kind, "pattern", raw, as_string)?;
                ty = ty.pattern_with(&pattern, error)?;
            }
        }
        Some(raw) => {
            let (pattern, error) = split_constraint(opts.kind, "pattern", raw, as_string)?;
            ty = ty.pattern_with(&pattern, error)?;
        }
    }
    let policy = match opts.str("trailing_slash")? {
        None | Some("keep") => TrailingSlash::Keep,
        Some("trim") => TrailingSlash::Trim,
        Some("enforce") => TrailingSlash::Enforce,
        Some(other) => {
            return Err(opts.invalid(
                "trailing_slash",
                format!("expected keep, trim or enforce, got {other}"),
            ));
        }
    };
    Ok(ty.trailing_slash(policy))
}

fn fields(opts: &mut Options<'_>) -> BuildResult<Vec<(MapKey, Type)>> {
    let kind = opts.kind;
    match opts.require("fields")? {
        Json::Object(fields) => fields
            .iter()
            .map(|(name, descriptor)| Ok((MapKey::atom(name.as_str()), from_json(descriptor)?)))
            .collect(),
        _ => Err(BuildError::invalid_option(kind, "fields", "expected an object")),
    }
}

/// The options of one descriptor object, tracking which keys were read.
struct Options<'a> {
    kind: &'a str,
    object: &'a Map<String, Json>,
    used: BTreeSet<&'a str>,
}

impl<'a> Options<'a> {
    fn new(kind: &'a str, object: &'a Map<String, Json>) -> Self {
        Self {
            kind,
            object,
            used: BTreeSet::from(["type"]),
        }
    }

    fn has(&self, key: &str) -> bool {
        self.object.contains_key(key)
    }

    fn take(&mut self, key: &'a str) -> Option<&'a Json> {
        self.used.insert(key);
        self.object.get(key)
    }

    fn require(&mut self, key: &'a str) -> BuildResult<&'a Json> {
        self.take(key)
            .ok_or_else(|| BuildError::missing_option(self.kind, key))
    }

    fn require_array(&mut self, key: &'a str) -> BuildResult<&'a Vec<Json>> {
        match self.require(key)? {
            Json::Array(items) => Ok(items),
            _ => Err(self.invalid(key, "expected an array")),
        }
    }

    fn flag(&mut self, key: &'a str) -> BuildResult<bool> {
        match self.take(key) {
            None => Ok(false),
            Some(Json::Bool(b)) => Ok(*b),
            Some(_) => Err(self.invalid(key, "expected a boolean")),
        }
    }

    fn str(&mut self, key: &'a str) -> BuildResult<Option<&'a str>> {
        match self.take(key) {
            None => Ok(None),
            Some(Json::String(s)) => Ok(Some(s.as_str())),
            Some(_) => Err(self.invalid(key, "expected a string")),
        }
    }

    fn message(&mut self, key: &'a str) -> BuildResult<ErrorConfig> {
        Ok(self
            .str(key)?
            .map_or_else(ErrorConfig::default, ErrorConfig::from))
    }

    fn constraint<T>(
        &mut self,
        key: &'a str,
        convert: fn(&Json) -> Result<T, String>,
    ) -> BuildResult<Option<(T, ErrorConfig)>> {
        match self.take(key) {
            None => Ok(None),
            Some(raw) => split_constraint(self.kind, key, raw, convert).map(Some),
        }
    }

    fn invalid(&self, key: &str, message: impl Into<String>) -> BuildError {
        BuildError::invalid_option(self.kind, key, message)
    }

    /// Reject any option that was never read.
    fn finish(self) -> BuildResult<()> {
        match self.object.keys().find(|k| !self.used.contains(k.as_str())) {
            Some(key) => Err(BuildError::unknown_option(self.kind, key.as_str())),
            None => Ok(()),
        }
    }
}

/// Split a constraint into its limit and error overrides.
fn split_constraint<T>(
    kind: &str,
    key: &str,
    raw: &Json,
    convert: fn(&Json) -> Result<T, String>,
) -> BuildResult<(T, ErrorConfig)> {
    let invalid = |message: String| BuildError::invalid_option(kind, key, message);
    match raw {
        Json::Object(object) => {
            if let Some(extra) = object.keys().find(|k| !matches!(k.as_str(), "value" | "error")) {
                return Err(invalid(format!("unexpected key `{extra}`")));
            }
            let value = object
                .get("value")
                .ok_or_else(|| invalid("missing `value`".to_string()))?;
            let error = match object.get("error") {
                None => ErrorConfig::default(),
                Some(Json::String(template)) => ErrorConfig::from(template.as_str()),
                Some(_) => return Err(invalid("`error` must be a string".to_string())),
            };
            Ok((convert(value).map_err(invalid)?, error))
        }
        bare => Ok((convert(bare).map_err(invalid)?, ErrorConfig::default())),
    }
}

fn as_i64(raw: &Json) -> Result<i64, String> {
    raw.as_i64().ok_or_else(|| format!("expected an integer, got {raw}"))
}

fn as_usize(raw: &Json) -> Result<usize, String> {
    raw.as_u64()
        .and_then(|n| usize::try_from(n).ok())
        .ok_or_else(|| format!("expected a non-negative integer, got {raw}"))
}

fn as_f64(raw: &Json) -> Result<f64, String> {
    raw.as_f64().ok_or_else(|| format!("expected a number, got {raw}"))
}

fn as_decimal(raw: &Json) -> Result<Decimal, String> {
    let text = match raw {
        Json::Number(n) => n.to_string(),
        Json::String(s) => s.clone(),
        other => return Err(format!("expected a decimal, got {other}")),
    };
    Decimal::from_str_exact(&text).map_err(|e| format!("invalid decimal {text}: {e}"))
}

fn as_string(raw: &Json) -> Result<String, String> {
    raw.as_str()
        .map(str::to_string)
        .ok_or_else(|| format!("expected a string, got {raw}"))
}

fn as_date(raw: &Json) -> Result<NaiveDate, String> {
    let text = raw.as_str().ok_or_else(|| format!("expected a date string, got {raw}"))?;
    NaiveDate::parse_from_str(text, "%Y-%m-%d").map_err(|e| format!("invalid date {text}: {e}"))
}

fn as_datetime(raw: &Json) -> Result<DateTime<FixedOffset>, String> {
    let text = raw
        .as_str()
        .ok_or_else(|| format!("expected an RFC 3339 string, got {raw}"))?;
    DateTime::parse_from_rfc3339(text).map_err(|e| format!("invalid datetime {text}: {e}"))
}
