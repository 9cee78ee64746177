//! Node trees back to the canonical raw form.
//!
//! The output is a fixed point of deserialization: deserializing it and
//! serializing again yields the same value.

use crate::keys;
use crate::node::PermissionTreeNode;
use crate::tree::{FullPermissionTree, PermissionTree};
use serde_json::{Map, Value};

pub struct TreeSerializer;

impl TreeSerializer {
    pub fn serialize(tree: &PermissionTree) -> Value {
        Self::serialize_node(tree.root())
    }

    pub fn serialize_node(node: &PermissionTreeNode) -> Value {
        match node {
            PermissionTreeNode::Boolean(value) => Value::Bool(*value),
            PermissionTreeNode::Permission(leaf) => single_entry(
                leaf.permission_type().to_string(),
                Value::String(leaf.value().to_string()),
            ),
            PermissionTreeNode::Gate(node) => single_entry(
                node.gate().as_str().to_string(),
                Value::Array(node.inputs().iter().map(Self::serialize_node).collect()),
            ),
        }
    }
}

pub struct FullTreeSerializer;

impl FullTreeSerializer {
    /// Serializes the main tree, prefixed with a `NO_BYPASS` entry when the
    /// full tree carries one.
    ///
    /// The main tree is nested as a positional entry so that a bare boolean
    /// or a gate survives next to `NO_BYPASS`.
    pub fn serialize(tree: &FullPermissionTree) -> Value {
        let main = TreeSerializer::serialize(tree.main());
        let Some(no_bypass) = tree.no_bypass() else {
            return main;
        };

        let mut map = Map::new();
        map.insert(keys::NO_BYPASS.to_string(), TreeSerializer::serialize(no_bypass));
        map.insert("0".to_string(), main);
        Value::Object(map)
    }
}

fn single_entry(key: String, value: Value) -> Value {
    let mut map = Map::new();
    map.insert(key, value);
    Value::Object(map)
}
