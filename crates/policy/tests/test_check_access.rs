#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use permtree_policy::{PermissionEngine, PermissionError};
use serde_json::{json, Map, Value};

fn engine() -> PermissionEngine {
    let mut engine = PermissionEngine::new();
    engine
        .add_type("role", |value: &str, context: &Value| {
            context["roles"]
                .as_array()
                .is_some_and(|roles| roles.iter().any(|role| role == value))
        })
        .unwrap()
        .add_type("flag", |value: &str, context: &Value| {
            context["flags"][value].as_bool().unwrap_or(false)
        })
        .unwrap();
    engine
}

fn roles(roles: &[&str]) -> Value {
    json!({ "roles": roles })
}

/// Every subset of the three roles, with the number of roles it contains.
fn subsets() -> Vec<(Vec<&'static str>, usize)> {
    let all = ["admin", "editor", "writer"];
    (0..8u8)
        .map(|mask| {
            let subset: Vec<&str> = all
                .iter()
                .enumerate()
                .filter(|(i, _)| mask & (1u8 << *i) != 0)
                .map(|(_, role)| *role)
                .collect();
            let len = subset.len();
            (subset, len)
        })
        .collect()
}

fn check_gate(gate: &str, expected: impl Fn(usize) -> bool) {
    let engine = engine();
    let mut members = Map::new();
    members.insert(gate.to_string(), json!(["admin", "editor", "writer"]));
    let permissions = json!({ "role": members });
    for (subset, held) in subsets() {
        assert_eq!(
            engine.check_access(&permissions, &roles(&subset)).unwrap(),
            expected(held),
            "{gate} with roles {subset:?}"
        );
    }
}

#[test]
fn test_and_truth_table() {
    check_gate("AND", |held| held == 3);
}

#[test]
fn test_nand_truth_table() {
    check_gate("NAND", |held| held != 3);
}

#[test]
fn test_or_truth_table() {
    check_gate("OR", |held| held > 0);
}

#[test]
fn test_nor_truth_table() {
    check_gate("NOR", |held| held == 0);
}

#[test]
fn test_xor_truth_table() {
    check_gate("XOR", |held| held > 0 && held < 3);
}

#[test]
fn test_not_negates() {
    let engine = engine();
    let permissions = json!({"role": {"NOT": "admin"}});
    assert!(!engine.check_access(&permissions, &roles(&["admin"])).unwrap());
    assert!(engine.check_access(&permissions, &roles(&[])).unwrap());
    assert!(engine.check_access(&permissions, &roles(&["editor"])).unwrap());
}

#[test]
fn test_not_with_single_element_list() {
    let engine = engine();
    let permissions = json!({"role": {"NOT": ["admin"]}});
    assert!(!engine.check_access(&permissions, &roles(&["admin"])).unwrap());
}

#[test]
fn test_empty_permissions_grant_access() {
    let engine = engine();
    assert!(engine.check_access(&json!({}), &Value::Null).unwrap());
}

#[test]
fn test_boolean_permissions() {
    let engine = engine();
    assert!(engine.check_access(&json!(true), &Value::Null).unwrap());
    assert!(!engine.check_access(&json!(false), &Value::Null).unwrap());
    assert!(!engine.check_access(&json!("FALSE"), &Value::Null).unwrap());
    assert!(engine.check_access(&json!(["true"]), &Value::Null).unwrap());
}

#[test]
fn test_no_bypass_suppresses_always_allow_bypass() {
    let mut engine = engine();
    engine.set_bypass_checker(|_: &Value| true);

    let suppressed = json!({"no_bypass": true, "0": false});
    assert!(!engine.check_access_with(&suppressed, &Value::Null, true).unwrap());

    let allowed = json!({"no_bypass": false, "0": false});
    assert!(engine.check_access_with(&allowed, &Value::Null, true).unwrap());
}

#[test]
fn test_no_bypass_uses_context() {
    let mut engine = engine();
    engine.set_bypass_checker(|context: &Value| context["superuser"] == true);
    let permissions = json!({"NO_BYPASS": {"flag": "maintenance"}, "role": "admin"});

    let context = json!({"superuser": true, "roles": [], "flags": {"maintenance": false}});
    assert!(engine.check_access(&permissions, &context).unwrap());

    let context = json!({"superuser": true, "roles": [], "flags": {"maintenance": true}});
    assert!(!engine.check_access(&permissions, &context).unwrap());
}

#[test]
fn test_implicit_or_over_mixed_siblings() {
    let engine = engine();
    let permissions = json!({"role": ["admin", {"AND": ["editor", "writer"]}]});
    assert!(engine.check_access(&permissions, &roles(&["admin"])).unwrap());
    assert!(!engine.check_access(&permissions, &roles(&["editor"])).unwrap());
    assert!(engine.check_access(&permissions, &roles(&["editor", "writer"])).unwrap());
    assert!(engine.check_access(&permissions, &roles(&["admin", "writer"])).unwrap());
}

#[test]
fn test_mixed_types_at_root() {
    let engine = engine();
    let permissions = json!({"role": "admin", "flag": "beta"});
    assert!(engine.check_access(&permissions, &json!({"roles": ["admin"]})).unwrap());
    assert!(engine
        .check_access(&permissions, &json!({"roles": [], "flags": {"beta": true}}))
        .unwrap());
    assert!(!engine.check_access(&permissions, &json!({"roles": []})).unwrap());
}

#[test]
fn test_invalid_value_under_type() {
    let engine = engine();
    let result = engine.check_access(&json!({"flag": 50}), &Value::Null);
    assert!(matches!(result, Err(PermissionError::InvalidPermissionValueType(_))));
}

#[test]
fn test_nested_types_rejected() {
    let engine = engine();
    let result = engine.check_access(&json!({"role": {"flag": "x"}}), &Value::Null);
    assert!(matches!(result, Err(PermissionError::NestedType { .. })));
}

#[test]
fn test_nested_no_bypass_rejected() {
    let engine = engine();
    let result = engine.check_access(&json!({"OR": {"no_bypass": true}}), &Value::Null);
    assert!(matches!(result, Err(PermissionError::MisplacedNoBypass)));
}

#[test]
fn test_invalid_context_rejected() {
    let engine = engine();
    let result = engine.check_access(&json!(true), &json!("user"));
    assert!(matches!(result, Err(PermissionError::InvalidContextType(_))));
}

#[test]
fn test_invalid_permissions_root_rejected() {
    let engine = engine();
    let result = engine.check_access(&json!(42), &Value::Null);
    assert!(matches!(result, Err(PermissionError::InvalidArgumentType(_))));
}

#[test]
fn test_tree_survives_registry_changes() {
    let mut engine = engine();
    let tree = engine.build_tree(&json!({"role": "admin"})).unwrap();
    engine.remove_type("role").unwrap();

    assert!(engine.access().check_access(&tree, &roles(&["admin"]), true).unwrap());
    assert!(matches!(
        engine.check_access(&json!({"role": "admin"}), &roles(&["admin"])),
        Err(PermissionError::PermissionTypeNotRegistered(_))
    ));
}

#[test]
fn test_debug_check_access_report() {
    let engine = engine();
    let report = engine
        .debug_check_access(&json!({"role": ["admin", "editor"]}), &roles(&["editor"]), true)
        .unwrap();
    assert!(report.has_access);
    assert_eq!(report.main.nodes.len(), 3);
    assert_eq!(
        report.main.nodes[0].permissions,
        json!({"OR": [{"role": "admin"}, {"role": "editor"}]})
    );
}
