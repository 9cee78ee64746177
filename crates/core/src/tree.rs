use crate::node::{NodeTrace, PermissionTreeNode};
use crate::serializer::{FullTreeSerializer, TreeSerializer};
use serde_json::Value;
use std::fmt;

/// An immutable, validated permission tree.
#[derive(Debug, Clone, PartialEq)]
pub struct PermissionTree {
    root: PermissionTreeNode,
}

impl PermissionTree {
    pub fn new(root: PermissionTreeNode) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &PermissionTreeNode {
        &self.root
    }

    pub fn evaluate(&self, context: &Value) -> bool {
        self.root.evaluate(context)
    }

    /// Pre-order trace of every node, see [`PermissionTreeNode::trace`].
    pub fn trace(&self, context: &Value) -> (bool, Vec<NodeTrace>) {
        let mut out = Vec::with_capacity(self.root.node_count());
        let value = self.root.trace(context, &mut out);
        (value, out)
    }

    pub fn to_value(&self) -> Value {
        TreeSerializer::serialize(self)
    }
}

impl fmt::Display for PermissionTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_value())
    }
}

/// Main tree plus the optional tree that decides whether bypass is
/// suppressed.
#[derive(Debug, Clone, PartialEq)]
pub struct FullPermissionTree {
    main: PermissionTree,
    no_bypass: Option<PermissionTree>,
}

impl FullPermissionTree {
    pub fn new(main: PermissionTree, no_bypass: Option<PermissionTree>) -> Self {
        Self { main, no_bypass }
    }

    pub fn main(&self) -> &PermissionTree {
        &self.main
    }

    pub fn no_bypass(&self) -> Option<&PermissionTree> {
        self.no_bypass.as_ref()
    }

    pub fn to_value(&self) -> Value {
        FullTreeSerializer::serialize(self)
    }
}

impl fmt::Display for FullPermissionTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_value())
    }
}
