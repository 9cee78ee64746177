//! Access checks that report how every node evaluated.

use crate::access::{validate_context, AccessChecker};
use permtree_core::{FullPermissionTree, NodeTrace, PermissionError, PermissionTree};
use serde::Serialize;
use serde_json::Value;

/// Outcome of [`AccessChecker::debug_check_access`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DebugAccessReport {
    pub has_access: bool,
    /// Whether the bypass checker granted access.
    pub bypass_access: bool,
    pub main: TreeTrace,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub no_bypass: Option<TreeTrace>,
}

/// Every node of one tree in pre-order, each with its own value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TreeTrace {
    pub value: bool,
    pub nodes: Vec<NodeTrace>,
}

impl TreeTrace {
    fn of(tree: &PermissionTree, context: &Value) -> Self {
        let (value, nodes) = tree.trace(context);
        Self { value, nodes }
    }
}

impl AccessChecker {
    /// Same decision as [`AccessChecker::check_access`], but the main tree
    /// (and the `NO_BYPASS` tree, if any) is always evaluated in full.
    pub fn debug_check_access(
        &self,
        tree: &FullPermissionTree,
        context: &Value,
        allow_bypass: bool,
    ) -> Result<DebugAccessReport, PermissionError> {
        validate_context(context)?;

        let no_bypass = tree.no_bypass().map(|no_bypass| TreeTrace::of(no_bypass, context));
        let suppressed = allow_bypass && no_bypass.as_ref().is_some_and(|trace| trace.value);
        let bypass_access = self.ask_bypass(context, allow_bypass, suppressed);
        let main = TreeTrace::of(tree.main(), context);

        Ok(DebugAccessReport {
            has_access: bypass_access || main.value,
            bypass_access,
            main,
            no_bypass,
        })
    }
}
