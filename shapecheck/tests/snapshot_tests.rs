//! Snapshot tests for rendered issues.
//!
//! Run `cargo insta review` to review and accept snapshot changes.

use serde_json::json;

use shapecheck::{
    Issue, Type, Value, descriptor, email, enum_of, integer, list, map, optional, string, uri,
};

fn render(issue: &Issue) -> String {
    issue
        .leaves()
        .into_iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}

// =============================================================================
// Message Snapshots
// =============================================================================

#[test]
fn snapshot_signup_form_issues() {
    let ty: Type = map([
        ("email", Type::from(email())),
        ("password", Type::from(string().min_length(8))),
        ("homepage", Type::from(optional(uri()))),
        ("tags", Type::from(list(string().max_length(3)).max_length(2))),
        (
            "plan",
            Type::from(enum_of(vec![Value::atom("free"), Value::atom("pro")]).unwrap()),
        ),
    ])
    .unwrap()
    .strict()
    .into();

    let input = Value::string_map([
        ("email", Value::from("ada")),
        ("password", Value::from("short")),
        ("homepage", Value::from("example.com")),
        ("tags", Value::List(vec![Value::from("rust"), Value::from("ok")])),
        ("plan", Value::atom("team")),
        ("referrer", Value::from("x")),
    ]);

    let issue = ty.parse(&input).unwrap_err();
    insta::assert_snapshot!(render(&issue), @r#"
    email: must be a valid email address
    homepage: must be a valid URI
    password: must have at least 8 characters, got 5 characters
    plan: must be one of [free, pro]
    tags.0: must have at most 3 characters, got 4 characters
    referrer: unknown field
    "#);
}

#[test]
fn snapshot_pluralized_lengths() {
    let ty: Type = list(integer()).min_length(1).into();
    let issue = ty.parse(&Value::List(vec![])).unwrap_err();
    insta::assert_snapshot!(issue.message, @"must have at least 1 item, got 0 items");

    let ty: Type = string().length(1).into();
    let issue = ty.parse(&Value::from("ab")).unwrap_err();
    insta::assert_snapshot!(issue.message, @"must have exactly 1 character, got 2 characters");
}

// =============================================================================
// Wire Shape Snapshots
// =============================================================================

#[test]
fn snapshot_issue_json() {
    let ty = descriptor::from_json(&json!({
        "type": "map",
        "fields": {"age": {"type": "integer", "gte": 0}}
    }))
    .unwrap();
    let issue = ty.parse(&Value::from(json!({"age": -3}))).unwrap_err();
    let wire = serde_json::to_string_pretty(&issue).unwrap();
    insta::assert_snapshot!(wire, @r#"
    {
      "path": [],
      "message": "one or more fields failed validation",
      "code": "AGGREGATE",
      "issues": [
        {
          "path": [
            "age"
          ],
          "message": "must be greater than or equal to 0",
          "code": "CONSTRAINT",
          "issues": [],
          "parse_score": 0
        }
      ],
      "parse_score": 1
    }
    "#);
}
