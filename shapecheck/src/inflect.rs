//! English pluralization for message templates.
//!
//! Irregular and uncountable words come from fixed tables; everything else is
//! matched against an ordered list of suffix rules, falling back to `+s`.

use once_cell::sync::Lazy;
use regex::Regex;

const UNCOUNTABLE: &[&str] = &[
    "equipment",
    "information",
    "rice",
    "money",
    "species",
    "series",
    "fish",
    "sheep",
    "deer",
    "news",
];

const IRREGULAR: &[(&str, &str)] = &[
    ("person", "people"),
    ("man", "men"),
    ("woman", "women"),
    ("child", "children"),
    ("mouse", "mice"),
    ("goose", "geese"),
    ("tooth", "teeth"),
    ("foot", "feet"),
    ("ox", "oxen"),
];

// First match wins, so more specific suffixes come first.
static SUFFIX_RULES: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    [
        (r"(?i)(quiz)$", "${1}zes"),
        (r"(?i)(matr|vert|ind)(?:ix|ex)$", "${1}ices"),
        (r"(?i)(octop|vir)us$", "${1}i"),
        (r"(?i)(alias|status|bus)$", "${1}es"),
        (r"(?i)(ax|test)is$", "${1}es"),
        (r"(?i)sis$", "ses"),
        (r"(?i)(x|ch|ss|sh|zz)$", "${1}es"),
        (r"(?i)([^aeiouy]|qu)y$", "${1}ies"),
        (r"(?i)(?:([^f])fe|([lr])f)$", "${1}${2}ves"),
        (r"(?i)(buffal|tomat|potat|her|ech)o$", "${1}oes"),
        (r"(?i)([ti])um$", "${1}a"),
        (r"(?i)s$", "s"),
    ]
    .into_iter()
    .map(|(pattern, replacement)| {
        (
            Regex::new(pattern).expect("pluralization rule is a valid regex"),
            replacement,
        )
    })
    .collect()
});

/// Plural form of `word`.
pub fn plural(word: &str) -> String {
    let lower = word.to_lowercase();

    if UNCOUNTABLE.contains(&lower.as_str()) {
        return word.to_string();
    }

    if let Some((_, plural)) = IRREGULAR.iter().find(|(singular, _)| *singular == lower) {
        return match_capitalization(word, plural);
    }

    for (rule, replacement) in SUFFIX_RULES.iter() {
        if rule.is_match(word) {
            return rule.replace(word, *replacement).into_owned();
        }
    }

    format!("{}s", word)
}

/// `word` inflected for `count`: singular when the count is exactly one.
pub fn pluralize(word: &str, count: i64) -> String {
    if count == 1 {
        word.to_string()
    } else {
        plural(word)
    }
}

fn match_capitalization(original: &str, replacement: &str) -> String {
    let mut chars = replacement.chars();
    match (original.chars().next(), chars.next()) {
        (Some(first), Some(head)) if first.is_uppercase() => {
            head.to_uppercase().chain(chars).collect()
        }
        _ => replacement.to_string(),
    }
}
