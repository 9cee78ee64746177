#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use permtree_policy::{PermissionEngine, PolicyError, PolicySet};
use serde_json::{json, Value};
use tempfile::TempDir;

const POLICY_FILE: &str = r#"
config:
  allow_bypass: true
  debug: true
policies:
  view_article: {}
  edit_article:
    role: [admin, editor]
  publish_article:
    AND:
      - role: editor
      - flag: publishing
  purge_cache:
    NO_BYPASS:
      flag: lockdown
    "0":
      role: admin
"#;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init();
}

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
    engine.set_bypass_checker(|context: &Value| context["superuser"] == true);
    engine
}

async fn write_policies(dir: &TempDir, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    tokio::fs::write(&path, content).await.unwrap();
    path
}

#[tokio::test]
async fn test_policies_from_yaml_file() {
    init_tracing();
    let dir = TempDir::new().unwrap();
    let path = write_policies(&dir, "policies.yaml", POLICY_FILE).await;

    let mut engine = engine();
    engine.load_policies(PolicySet::load(&path).await.unwrap()).unwrap();
    assert!(engine.config().debug);

    let editor = json!({"roles": ["editor"], "flags": {"publishing": false}});
    assert!(engine.check_policy("view_article", &editor).unwrap());
    assert!(engine.check_policy("edit_article", &editor).unwrap());
    assert!(!engine.check_policy("publish_article", &editor).unwrap());
    assert!(!engine.check_policy("purge_cache", &editor).unwrap());
}

#[tokio::test]
async fn test_no_bypass_policy() {
    init_tracing();
    let dir = TempDir::new().unwrap();
    let path = write_policies(&dir, "policies.yaml", POLICY_FILE).await;

    let mut engine = engine();
    engine.load_policies(PolicySet::load(&path).await.unwrap()).unwrap();

    let superuser = json!({"superuser": true, "roles": [], "flags": {"lockdown": false}});
    assert!(engine.check_policy("purge_cache", &superuser).unwrap());

    let locked_down = json!({"superuser": true, "roles": [], "flags": {"lockdown": true}});
    assert!(!engine.check_policy("purge_cache", &locked_down).unwrap());
}

#[tokio::test]
async fn test_json_policy_file() {
    let dir = TempDir::new().unwrap();
    let content = serde_json::to_string(&json!({
        "policies": {"admin_only": {"role": "admin"}}
    }))
    .unwrap();
    let path = write_policies(&dir, "policies.json", &content).await;

    let mut engine = engine();
    engine.load_policies(PolicySet::load(&path).await.unwrap()).unwrap();
    assert!(engine.config().allow_bypass);
    assert!(engine.check_policy("admin_only", &json!({"roles": ["admin"]})).unwrap());
}

#[tokio::test]
async fn test_invalid_policy_file_is_rejected() {
    let dir = TempDir::new().unwrap();
    let path = write_policies(&dir, "policies.yaml", "policies:\n  broken:\n    OR:\n      no_bypass: true\n").await;

    let mut engine = engine();
    let set = PolicySet::load(&path).await.unwrap();
    let result = engine.load_policies(set);
    assert!(matches!(result, Err(PolicyError::InvalidPolicy { .. })));
    assert!(matches!(
        engine.check_policy("broken", &Value::Null),
        Err(PolicyError::NotFound(_))
    ));
}
