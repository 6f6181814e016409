//! Integration tests for parsing through the public API.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use shapecheck::{
    BuildError, IssueKind, MapKey, Opaque, StructDef, Type, ValidationError, Value, any, boolean,
    enum_of, integer, list, literal, map, optional, parse, record, refine, string, struct_of,
    transform, tuple, union,
};

// =============================================================================
// Helpers
// =============================================================================

fn person() -> Type {
    map([("name", Type::from(string())), ("age", Type::from(integer()))])
        .unwrap()
        .into()
}

fn leaves(issue: &shapecheck::Issue) -> Vec<String> {
    issue.leaves().into_iter().map(ToString::to_string).collect()
}

// =============================================================================
// Scalar pipeline
// =============================================================================

#[test]
fn test_required_integer_rejects_null() {
    let issue = parse(&integer().into(), &Value::Null).unwrap_err();
    assert_eq!(issue.kind, IssueKind::Required);
    assert_eq!(issue.message, "is required");
    assert!(issue.path.is_empty());
}

#[test]
fn test_scalar_pipeline_short_circuits() {
    // coercion fails before any constraint runs
    let ty: Type = integer().coerce(true).gt(100).into();
    let issue = ty.parse(&Value::from("abc")).unwrap_err();
    assert_eq!(issue.kind, IssueKind::Coercion);

    let issue = ty.parse(&Value::from("5")).unwrap_err();
    assert_eq!(issue.kind, IssueKind::Constraint);
    assert_eq!(issue.message, "must be greater than 100");
}

#[test]
fn test_any_and_opaque_values() {
    let handle = Value::Opaque(Opaque::new(vec![1u8, 2, 3]));
    let parsed = parse(&any().into(), &handle).unwrap();
    assert_eq!(parsed, handle);
    assert_eq!(parsed.parse_score(), 1);
}

#[test]
fn test_enum_of_mixed_values() {
    let ty: Type = enum_of(vec![Value::from(1), Value::from("one"), Value::atom("uno")])
        .unwrap()
        .into();
    assert!(ty.parse(&Value::from(1)).is_ok());
    assert!(ty.parse(&Value::from("one")).is_ok());
    assert_eq!(
        ty.parse(&Value::from(2)).unwrap_err().message,
        "must be one of [1, \"one\", uno]"
    );
}

// =============================================================================
// Composites
// =============================================================================

#[test]
fn test_strict_map_reports_only_the_extra_field() {
    let ty: Type = map([("name", Type::from(string())), ("age", Type::from(integer()))])
        .unwrap()
        .strict()
        .into();
    let input = Value::map([
        ("name", Value::from("a")),
        ("age", Value::from(1)),
        ("extra", Value::Bool(true)),
    ]);

    let issue = ty.parse(&input).unwrap_err();
    assert_eq!(issue.kind, IssueKind::Aggregate);
    assert_eq!(issue.issues.len(), 1);
    assert_eq!(issue.issues[0].path, vec!["extra"]);
    assert_eq!(issue.issues[0].message, "unknown field");
}

#[test]
fn test_list_min_length_pluralizes() {
    let ty: Type = list(integer()).min_length(1).into();
    let issue = ty.parse(&Value::List(Vec::new())).unwrap_err();
    assert!(issue.is_leaf());
    assert!(issue.message.contains("1 item"));
    assert!(issue.message.contains("0 items"));
}

#[test]
fn test_deeply_nested_paths() {
    let ty: Type = map([("people", Type::from(list(person())))]).unwrap().into();
    let input = Value::map([(
        "people",
        Value::List(vec![
            Value::map([("name", Value::from("a")), ("age", Value::from(1))]),
            Value::map([("name", Value::from(2))]),
        ]),
    )]);

    let issue = ty.parse(&input).unwrap_err();
    assert_eq!(
        leaves(&issue),
        vec![
            "people.1.age: is required",
            "people.1.name: expected string, got integer",
        ]
    );
    // flattened: no nested aggregates remain
    assert!(issue.issues.iter().all(|i| i.is_leaf()));
}

#[test]
fn test_tuple_and_record_together() {
    let point: Type = tuple([Type::from(integer()), Type::from(integer())]).unwrap().into();
    let ty: Type = shapecheck::record_of(string(), point).unwrap().into();

    let input = Value::string_map([
        ("origin", Value::Tuple(vec![Value::from(0), Value::from(0)])),
        ("bad", Value::Tuple(vec![Value::from(0)])),
    ]);
    let issue = ty.parse(&input).unwrap_err();
    assert_eq!(leaves(&issue), vec!["bad: expected 2 elements, got 1 element"]);
}

#[test]
fn test_struct_output() {
    let def = StructDef::new("Point").field("x", 0).field("y", 0);
    let ty: Type = struct_of(def, [("x", Type::from(integer()))]).unwrap().into();
    let output = ty.parse(&Value::map([("x", Value::from(5))])).unwrap();
    assert_eq!(
        output,
        Value::structure("Point", [("x", Value::from(5)), ("y", Value::from(0))])
    );
}

#[test]
fn test_struct_construction_error_precedes_parsing() {
    let def = StructDef::new("Point").field("x", 0);
    let result = struct_of(def, [("z", Type::from(integer()))]);
    assert!(matches!(result, Err(BuildError::UnknownStructField { .. })));
}

#[test]
fn test_record_accepts_any_value_by_default() {
    let ty: Type = record(string()).unwrap().into();
    let input = Value::string_map([("a", Value::Null), ("b", Value::List(vec![]))]);
    assert_eq!(ty.parse(&input), Ok(input.clone()));
}

// =============================================================================
// Modifiers
// =============================================================================

#[test]
fn test_optional_defaults() {
    let with_default: Type = optional(integer()).with_default(42).unwrap().into();
    assert_eq!(with_default.parse(&Value::Null), Ok(Value::from(42)));

    let without: Type = optional(integer()).into();
    assert_eq!(without.parse(&Value::Null), Ok(Value::Null));
}

#[test]
fn test_lazy_default_runs_per_parse() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let ty: Type = optional(integer())
        .with_default_fn(move || Value::from(counter.fetch_add(1, Ordering::SeqCst)))
        .into();

    assert_eq!(ty.parse(&Value::Null), Ok(Value::from(0)));
    assert_eq!(ty.parse(&Value::Null), Ok(Value::from(1)));
    assert_eq!(ty.parse(&Value::from(9)), Ok(Value::from(9)));
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[test]
fn test_refine_inside_union_ranks_by_parsed_value() {
    let pair = list(integer()).length(2);
    let sorted = refine(pair, |v| match v {
        Value::List(items) => items.windows(2).all(|w| match (&w[0], &w[1]) {
            (Value::Int(a), Value::Int(b)) => a <= b,
            _ => false,
        }),
        _ => false,
    });
    let ty: Type = union([Type::from(string()), Type::from(sorted)]).unwrap().into();

    let issue = ty
        .parse(&Value::List(vec![Value::from(2), Value::from(1)]))
        .unwrap_err();
    assert_eq!(issue.kind, IssueKind::Refinement);
    assert_eq!(issue.parse_score, 3);
}

#[test]
fn test_transform_after_validation() {
    let ty: Type = transform(string().trim(true), |v| match v {
        Value::Str(s) => Value::atom(s),
        other => other,
    })
    .into();
    assert_eq!(ty.parse(&Value::from("  ok ")), Ok(Value::atom("ok")));
}

#[test]
fn test_literal_union_discriminates() {
    let ty: Type = union([
        Type::from(literal(Value::atom("on")).unwrap()),
        Type::from(literal(Value::atom("off")).unwrap()),
        Type::from(boolean()),
    ])
    .unwrap()
    .into();
    assert!(ty.parse(&Value::atom("off")).is_ok());
    assert!(ty.parse(&Value::Bool(false)).is_ok());
    assert_eq!(
        ty.parse(&Value::atom("maybe")).unwrap_err().message,
        "must be exactly on"
    );
}

// =============================================================================
// Errors and concurrency
// =============================================================================

#[test]
fn test_validate_raises_rendered_error() {
    let err: ValidationError = person()
        .validate(&Value::map([("name", Value::from(1))]))
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "one or more fields failed validation: age: is required; name: expected string, got integer"
    );
    assert_eq!(err.issue().issues.len(), 2);
}

#[test]
fn test_shared_type_across_threads() {
    let ty = &person();
    let inputs: Vec<Value> = (0..8)
        .map(|i| Value::map([("name", Value::from(format!("n{i}"))), ("age", Value::from(i))]))
        .collect();

    std::thread::scope(|scope| {
        let handles: Vec<_> = inputs
            .iter()
            .map(|input| scope.spawn(move || ty.parse(input)))
            .collect();
        for handle in handles {
            assert!(handle.join().unwrap().is_ok());
        }
    });
}

#[test]
fn test_map_output_uses_declared_keys() {
    let input = Value::string_map([("name", Value::from("x")), ("age", Value::from(3))]);
    let Value::Map(output) = person().parse(&input).unwrap() else {
        panic!("expected a map");
    };
    let keys: Vec<&MapKey> = output.keys().collect();
    assert_eq!(keys, vec![&MapKey::atom("age"), &MapKey::atom("name")]);
}

#[test]
fn test_kind_traits_are_usable_generically() {
    use shapecheck::types::{DateKind, IntegerKind, NumericKind, Temporal, TemporalKind};

    fn bounded<K: NumericKind>(limit: K::Limit) -> Type
    where
        shapecheck::types::Numeric<K>: Into<Type>,
    {
        shapecheck::types::Numeric::<K>::new().lte(limit).into()
    }

    fn kind_name<K: TemporalKind>(_: &Temporal<K>) -> &'static str {
        K::NAME
    }

    let ty = bounded::<IntegerKind>(3);
    assert!(ty.parse(&Value::from(3)).is_ok());
    assert_eq!(
        ty.parse(&Value::from(4)).unwrap_err().message,
        "must be less than or equal to 3"
    );
    assert_eq!(kind_name(&Temporal::<DateKind>::new()), "date");
}
