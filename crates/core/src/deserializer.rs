//! Raw permission expressions to validated trees.
//!
//! Every array element and every object entry yields exactly one sibling.
//! Siblings become the inputs of an explicit gate, or are joined by an
//! implicit OR wherever a collection stands for a single value (the root, an
//! array element, the value of a permission type).

use crate::error::{value_type_name, PermissionError};
use crate::gate::LogicGate;
use crate::keys;
use crate::node::{GateNode, PermissionLeaf, PermissionTreeNode};
use crate::registry::PermissionCheckerRegistry;
use crate::tree::{FullPermissionTree, PermissionTree};
use serde_json::{Map, Value};
use tracing::debug;

/// Deepest collection nesting accepted in a raw expression, matching
/// `serde_json`'s own parse limit. Bounds recursion in every tree walk.
pub const MAX_DEPTH: usize = 128;

pub struct TreeDeserializer<'a> {
    registry: &'a PermissionCheckerRegistry,
}

impl<'a> TreeDeserializer<'a> {
    pub fn new(registry: &'a PermissionCheckerRegistry) -> Self {
        Self { registry }
    }

    /// Builds a tree from `raw`. An empty root collection grants access.
    ///
    /// # Errors
    /// `InvalidArgumentType` if the root is neither a boolean, a string nor a
    /// collection; any validation error from the rules above otherwise.
    pub fn deserialize(&self, raw: &Value) -> Result<PermissionTree, PermissionError> {
        let root = match raw {
            Value::Null | Value::Number(_) => {
                return Err(PermissionError::InvalidArgumentType(format!(
                    "permissions must be a boolean, string, array or object, got {}",
                    value_type_name(raw)
                )));
            }
            Value::Array(items) if items.is_empty() => PermissionTreeNode::Boolean(true),
            Value::Object(map) if map.is_empty() => PermissionTreeNode::Boolean(true),
            _ => self.parse_unit(raw, None, 0)?,
        };
        debug!("Deserialized permission tree with {} node(s)", root.node_count());
        Ok(PermissionTree::new(root))
    }

    /// A value that stands for one node: several siblings are OR-ed.
    fn parse_unit(
        &self,
        value: &Value,
        ty: Option<&str>,
        depth: usize,
    ) -> Result<PermissionTreeNode, PermissionError> {
        let siblings = self.parse_siblings(value, ty, depth)?;
        build_gate(LogicGate::Or, siblings)
    }

    fn parse_siblings(
        &self,
        value: &Value,
        ty: Option<&str>,
        depth: usize,
    ) -> Result<Vec<PermissionTreeNode>, PermissionError> {
        if depth >= MAX_DEPTH && (value.is_array() || value.is_object()) {
            return Err(PermissionError::InvalidArgumentType(format!(
                "permissions nest deeper than {MAX_DEPTH} levels"
            )));
        }
        match value {
            Value::Array(items) => items
                .iter()
                .map(|item| self.parse_unit(item, ty, depth + 1))
                .collect(),
            Value::Object(map) => map
                .iter()
                .map(|(key, child)| self.parse_entry(key, child, ty, depth + 1))
                .collect(),
            scalar => Ok(vec![self.parse_scalar(scalar, ty)?]),
        }
    }

    fn parse_entry(
        &self,
        key: &str,
        value: &Value,
        ty: Option<&str>,
        depth: usize,
    ) -> Result<PermissionTreeNode, PermissionError> {
        if keys::is_positional(key) {
            return self.parse_unit(value, ty, depth);
        }

        if key.eq_ignore_ascii_case(keys::NO_BYPASS) {
            return Err(PermissionError::MisplacedNoBypass);
        }

        if let Some(gate) = LogicGate::from_key(key) {
            if !gate.accepts_scalar() && !(value.is_array() || value.is_object()) {
                return Err(PermissionError::InvalidGateArity {
                    gate: gate.as_str().to_string(),
                    reason: format!(
                        "value must be an array or object, got {}",
                        value_type_name(value)
                    ),
                });
            }
            let inputs = self.parse_siblings(value, ty, depth)?;
            return build_gate(gate, inputs);
        }

        if keys::parse_boolean_word(key).is_some() {
            return Err(PermissionError::BooleanHasChildren(key.to_string()));
        }

        if let Some(parent) = ty {
            return Err(PermissionError::NestedType {
                parent: parent.to_string(),
                child: key.to_string(),
            });
        }
        if !self.registry.has(key) {
            return Err(PermissionError::PermissionTypeNotRegistered(key.to_string()));
        }
        self.parse_unit(value, Some(key), depth)
    }

    fn parse_scalar(&self, value: &Value, ty: Option<&str>) -> Result<PermissionTreeNode, PermissionError> {
        match value {
            Value::Bool(flag) => boolean_leaf(*flag, ty),
            Value::String(text) => {
                if text.is_empty() {
                    return Err(PermissionError::EmptyPermissionValue);
                }
                if let Some(flag) = keys::parse_boolean_word(text) {
                    return boolean_leaf(flag, ty);
                }
                let Some(permission_type) = ty else {
                    return Err(PermissionError::UnresolvedType(text.clone()));
                };
                let checker = self.registry.get(permission_type)?;
                Ok(PermissionTreeNode::Permission(PermissionLeaf::new(
                    permission_type,
                    text.as_str(),
                    checker,
                )))
            }
            other => Err(PermissionError::InvalidPermissionValueType(format!(
                "expected a boolean, string, array or object, got {}",
                value_type_name(other)
            ))),
        }
    }
}

fn boolean_leaf(flag: bool, ty: Option<&str>) -> Result<PermissionTreeNode, PermissionError> {
    match ty {
        Some(permission_type) => Err(PermissionError::IllegalDescendant(permission_type.to_string())),
        None => Ok(PermissionTreeNode::Boolean(flag)),
    }
}

/// Builds a gate node, replacing a single-input AND/OR by its input.
fn build_gate(gate: LogicGate, mut inputs: Vec<PermissionTreeNode>) -> Result<PermissionTreeNode, PermissionError> {
    gate.check_arity(inputs.len())?;
    if matches!(gate, LogicGate::And | LogicGate::Or) && inputs.len() == 1 {
        if let Some(only) = inputs.pop() {
            return Ok(only);
        }
    }
    Ok(PermissionTreeNode::Gate(GateNode::new(gate, inputs)?))
}

/// Splits off the top-level `NO_BYPASS` entry before building the main tree.
pub struct FullTreeDeserializer<'a> {
    trees: TreeDeserializer<'a>,
}

impl<'a> FullTreeDeserializer<'a> {
    pub fn new(registry: &'a PermissionCheckerRegistry) -> Self {
        Self {
            trees: TreeDeserializer::new(registry),
        }
    }

    /// # Errors
    /// `MisplacedNoBypass` if both `NO_BYPASS` and `no_bypass` are present or
    /// either appears below the top level, plus every error of
    /// [`TreeDeserializer::deserialize`].
    pub fn deserialize(&self, raw: &Value) -> Result<FullPermissionTree, PermissionError> {
        let Value::Object(map) = raw else {
            return Ok(FullPermissionTree::new(self.trees.deserialize(raw)?, None));
        };

        let (no_bypass, rest) = split_no_bypass(map)?;
        let no_bypass = match no_bypass {
            Some(value) => {
                debug!("Found NO_BYPASS entry");
                Some(self.trees.deserialize(value)?)
            }
            None => None,
        };
        let main = self.trees.deserialize(&Value::Object(rest))?;
        Ok(FullPermissionTree::new(main, no_bypass))
    }
}

fn split_no_bypass(map: &Map<String, Value>) -> Result<(Option<&Value>, Map<String, Value>), PermissionError> {
    let mut no_bypass = None;
    let mut rest = Map::new();
    for (key, value) in map {
        if key == keys::NO_BYPASS || key == keys::LEGACY_NO_BYPASS {
            if no_bypass.replace(value).is_some() {
                return Err(PermissionError::MisplacedNoBypass);
            }
        } else {
            rest.insert(key.clone(), value.clone());
        }
    }
    Ok((no_bypass, rest))
}
