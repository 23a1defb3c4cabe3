//! This example demonstrates how a mock framework would verify a recorded
//! call's arguments against matchers instead of literal values, and what the
//! diagnostic rendering looks like when a slot does not match.

#![allow(clippy::print_stdout)]

use anyvalue::{AnyValue, Ge, Len, TypeSpec, Value, ValueKind, NONE};

fn main() {
    // A service under test logged one event through a mocked sink:
    // log(message, elapsed_ms, parent_id).
    let recorded = vec![
        Value::Str("request finished".into()),
        Value::Int(207),
        Value::None,
    ];

    let expected = vec![
        AnyValue::new(ValueKind::Str).with(Len::new(1, None)),
        AnyValue::new(ValueKind::Int).with(Ge::new(0)),
        AnyValue::new(ValueKind::Int | NONE),
    ];

    println!("recorded call:");
    for (matcher, actual) in expected.iter().zip(&recorded) {
        println!(
            "  {} against {} -> {:?}",
            actual,
            matcher,
            matcher.matches(actual)
        );
    }

    // Matchers also work directly inside equality assertions.
    let elapsed_ms = 207;
    assert_eq!(elapsed_ms, AnyValue::new(ValueKind::Int).with(Ge::new(0)));

    // Specs can come from strings, for data-driven expectations.
    let spec: TypeSpec = "int | None".parse().unwrap();
    let parent_id = AnyValue::new(spec);
    assert_eq!(parent_id, None::<i64>);

    // A failing slot renders the reason a human needs.
    let strict = AnyValue::new(ValueKind::Int).with(Ge::new(500));
    assert!(!strict.matches(207));
    println!("\nwhy 207 fails the strict matcher:");
    println!("{}", strict);
}
