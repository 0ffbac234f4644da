//! Integration tests for building scalars from JSON definitions.

use scalar_guard::core::{FailureKind, Kind};
use scalar_guard::scalar::{LiteralNode, ScalarDefinition, ScalarRegistry, ScalarType};
use scalar_guard::value::Value;
use scalar_guard::GuardError;

const DEFINITIONS: &str = r#"{
    "scalars": [
        {
            "name": "Username",
            "kind": "string",
            "description": "Three to sixteen letters or digits",
            "options": {"alphanum": true, "min": 3, "max": 16, "lowercase": true}
        },
        {"name": "Age", "kind": "number", "options": {"integer": true, "min": 0, "max": 150}},
        {"name": "Accepted", "kind": "boolean", "options": {"truthy": ["Y", "yes"], "falsy": "N"}},
        {"name": "Birthday", "kind": "date", "options": {"iso": true, "max": "now"}},
        {"name": "Tags", "kind": "array", "options": {"unique": true, "max": 3, "single": true}},
        {"name": "Color", "kind": "any", "options": {"valid": ["red", "green", "blue"]}}
    ]
}"#;

fn registry() -> ScalarRegistry {
    ScalarRegistry::from_json(DEFINITIONS).unwrap()
}

fn parse(registry: &ScalarRegistry, name: &str, node: LiteralNode) -> Result<Option<Value>, GuardError> {
    let mut node = node;
    registry.get(name).unwrap().parse_literal(&mut node)
}

#[test]
fn test_registry_builds_every_definition() {
    let registry = registry();
    assert_eq!(registry.len(), 6);
    assert_eq!(
        registry.names().collect::<Vec<_>>(),
        vec!["Accepted", "Age", "Birthday", "Color", "Tags", "Username"]
    );

    let username = registry.get("Username").unwrap();
    assert_eq!(username.kind(), Kind::String);
    assert_eq!(
        ScalarType::description(username),
        "Three to sixteen letters or digits"
    );
    assert_eq!(registry.get("Age").unwrap().description(), "Age");
}

#[test]
fn test_registry_scalars_validate() {
    let registry = registry();

    assert_eq!(
        parse(&registry, "Username", LiteralNode::value("Roger42")).unwrap(),
        Some(Value::from("roger42"))
    );
    assert!(parse(&registry, "Username", LiteralNode::value("r!")).is_err());

    assert_eq!(
        parse(&registry, "Age", LiteralNode::value("42")).unwrap(),
        Some(Value::from(42))
    );
    let err = parse(&registry, "Age", LiteralNode::value(4.2)).unwrap_err();
    assert_eq!(err.as_validation().map(|f| f.code()), Some("number.integer"));

    assert_eq!(
        parse(&registry, "Accepted", LiteralNode::value("yes")).unwrap(),
        Some(Value::from(true))
    );
    assert_eq!(
        parse(&registry, "Accepted", LiteralNode::value("n")).unwrap(),
        Some(Value::from(false))
    );

    assert!(parse(&registry, "Birthday", LiteralNode::value("1990-05-17")).is_ok());
    let err = parse(&registry, "Birthday", LiteralNode::value(0)).unwrap_err();
    assert_eq!(err.as_validation().map(|f| f.code()), Some("date.isoDate"));

    assert_eq!(
        parse(&registry, "Tags", LiteralNode::value("rust")).unwrap(),
        Some(Value::from(vec!["rust"]))
    );
    let err = parse(
        &registry,
        "Tags",
        LiteralNode::list(vec![Value::from("a"), Value::from("a")]),
    )
    .unwrap_err();
    assert_eq!(
        err.as_validation().map(|f| f.kind()),
        Some(FailureKind::Duplicate)
    );

    let err = parse(&registry, "Color", LiteralNode::value("pink")).unwrap_err();
    assert!(err.to_string().contains("[red, green, blue]"));
}

#[test]
fn test_bad_option_values_fail_validation_not_loading() {
    let registry = ScalarRegistry::from_json(
        r#"{"scalars": [{"name": "Short", "kind": "string", "options": {"max": -1}}]}"#,
    )
    .unwrap();
    let short = registry.get("Short").unwrap();
    assert_eq!(short.rule().issues().len(), 1);

    let err = parse(&registry, "Short", LiteralNode::value("a")).unwrap_err();
    assert_eq!(
        err.as_validation().map(|f| f.kind()),
        Some(FailureKind::InvalidArgument)
    );
}

#[test]
fn test_malformed_documents_are_configuration_errors() {
    for document in [
        "not json",
        r#"{"scalars": {}}"#,
        r#"{"scalars": [{"name": "X"}]}"#,
        r#"{"scalars": [{"name": "X", "kind": "string", "options": [1, 2]}]}"#,
    ] {
        let err = ScalarRegistry::from_json(document).unwrap_err();
        assert!(
            matches!(err, GuardError::Configuration(_)),
            "{document} gave {err:?}"
        );
    }
}

#[test]
fn test_definitions_round_trip_through_json() {
    let registry = registry();
    let document: serde_json::Value = serde_json::from_str(DEFINITIONS).unwrap();
    let definitions: Vec<ScalarDefinition> =
        serde_json::from_value(document["scalars"].clone()).unwrap();

    let rebuilt = ScalarRegistry::from_definitions(definitions.clone()).unwrap();
    assert_eq!(rebuilt.len(), registry.len());

    let json = serde_json::to_string(&definitions[1]).unwrap();
    let reparsed: ScalarDefinition = serde_json::from_str(&json).unwrap();
    assert_eq!(reparsed, definitions[1]);
}

#[test]
fn test_register_adapters_from_code() {
    let mut registry = ScalarRegistry::new();
    registry
        .register(ScalarDefinition::new("Name", Kind::String).build())
        .unwrap();
    let err = registry
        .register(ScalarDefinition::new("Name", Kind::Any).build())
        .unwrap_err();
    assert_eq!(err.to_string(), "Configuration error: duplicate scalar 'Name'");
    assert!(!registry.is_empty());
}
