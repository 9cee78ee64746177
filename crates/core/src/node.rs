//! Evaluable permission tree nodes.

use crate::checker::PermissionChecker;
use crate::error::PermissionError;
use crate::gate::LogicGate;
use crate::serializer::TreeSerializer;
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq)]
pub enum PermissionTreeNode {
    /// Constant result.
    Boolean(bool),
    /// A permission value resolved by the checker of its type.
    Permission(PermissionLeaf),
    Gate(GateNode),
}

impl PermissionTreeNode {
    pub fn evaluate(&self, context: &Value) -> bool {
        match self {
            Self::Boolean(value) => *value,
            Self::Permission(leaf) => leaf.evaluate(context),
            Self::Gate(node) => node.evaluate(context),
        }
    }

    /// Evaluates every node of the subtree without short-circuiting and
    /// appends one entry per node to `out`, in pre-order.
    pub fn trace(&self, context: &Value, out: &mut Vec<NodeTrace>) -> bool {
        let slot = out.len();
        out.push(NodeTrace {
            value: false,
            permissions: TreeSerializer::serialize_node(self),
        });
        let value = match self {
            Self::Gate(node) => {
                let values: Vec<bool> = node
                    .inputs
                    .iter()
                    .map(|input| input.trace(context, out))
                    .collect();
                node.gate.apply(values)
            }
            leaf => leaf.evaluate(context),
        };
        out[slot].value = value;
        value
    }

    pub fn node_count(&self) -> usize {
        match self {
            Self::Gate(node) => 1 + node.inputs.iter().map(Self::node_count).sum::<usize>(),
            _ => 1,
        }
    }
}

/// Leaf bound to a registered permission checker.
#[derive(Clone)]
pub struct PermissionLeaf {
    permission_type: String,
    value: String,
    checker: Arc<dyn PermissionChecker>,
}

impl PermissionLeaf {
    pub fn new(
        permission_type: impl Into<String>,
        value: impl Into<String>,
        checker: Arc<dyn PermissionChecker>,
    ) -> Self {
        Self {
            permission_type: permission_type.into(),
            value: value.into(),
            checker,
        }
    }

    pub fn permission_type(&self) -> &str {
        &self.permission_type
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn evaluate(&self, context: &Value) -> bool {
        self.checker.check_permission(&self.value, context)
    }
}

impl fmt::Debug for PermissionLeaf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PermissionLeaf")
            .field("permission_type", &self.permission_type)
            .field("value", &self.value)
            .finish_non_exhaustive()
    }
}

/// Leaves compare by type and value; checkers are opaque.
impl PartialEq for PermissionLeaf {
    fn eq(&self, other: &Self) -> bool {
        self.permission_type == other.permission_type && self.value == other.value
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GateNode {
    gate: LogicGate,
    inputs: Vec<PermissionTreeNode>,
}

impl GateNode {
    /// # Errors
    /// `InvalidGateArity` if `inputs` violates the gate's arity.
    pub fn new(gate: LogicGate, inputs: Vec<PermissionTreeNode>) -> Result<Self, PermissionError> {
        gate.check_arity(inputs.len())?;
        Ok(Self { gate, inputs })
    }

    pub fn gate(&self) -> LogicGate {
        self.gate
    }

    pub fn inputs(&self) -> &[PermissionTreeNode] {
        &self.inputs
    }

    pub fn evaluate(&self, context: &Value) -> bool {
        self.gate
            .apply(self.inputs.iter().map(|input| input.evaluate(context)))
    }
}

/// Value and serialized form of one node, as produced by
/// [`PermissionTreeNode::trace`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeTrace {
    pub value: bool,
    pub permissions: Value,
}
