//! Error-message templates.
//!
//! Templates contain `{{name}}` slots, replaced by the rendered context value,
//! and `{{name | word}}` slots, replaced by `"<count> <word>"` with the word
//! pluralized for the count. Slots naming a variable missing from the context
//! are left as written.
//!
//! ```rust
//! use shapecheck::template::{render, Context};
//! use shapecheck::Value;
//!
//! let mut ctx = Context::new();
//! ctx.insert("min_length".into(), Value::from(1));
//! ctx.insert("actual".into(), Value::from(0));
//!
//! let message = render("must have at least {{min_length | item}}, got {{actual | item}}", &ctx);
//! assert_eq!(message, "must have at least 1 item, got 0 items");
//! ```

use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::inflect;
use crate::value::Value;

/// Named values available to a template.
pub type Context = BTreeMap<String, Value>;

static SLOT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\{\{\s*([A-Za-z_][A-Za-z0-9_]*)\s*(?:\|\s*([A-Za-z][A-Za-z \-]*?)\s*)?\}\}")
        .expect("template slot pattern is a valid regex")
});

/// Render `template` against `ctx`.
pub fn render(template: &str, ctx: &Context) -> String {
    SLOT.replace_all(template, |caps: &Captures<'_>| {
        match (ctx.get(&caps[1]), caps.get(2)) {
            (Some(value), Some(word)) => count_phrase(value, word.as_str()),
            (Some(value), None) => value.to_string(),
            (None, _) => caps[0].to_string(),
        }
    })
    .into_owned()
}

fn count_phrase(value: &Value, word: &str) -> String {
    match value {
        Value::Int(n) => format!("{} {}", n, inflect::pluralize(word, *n)),
        Value::Float(x) if *x == 1.0 => format!("{} {}", value, word),
        other => format!("{} {}", other, inflect::plural(word)),
    }
}

/// Build a context from `(name, value)` pairs.
pub fn context<I>(entries: I) -> Context
where
    I: IntoIterator<Item = (&'static str, Value)>,
{
    entries
        .into_iter()
        .map(|(name, value)| (name.to_string(), value))
        .collect()
}
