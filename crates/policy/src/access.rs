use permtree_core::{BypassChecker, FullPermissionTree, PermissionError};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info};

/// Evaluates full permission trees, honoring bypass and `NO_BYPASS`.
#[derive(Clone, Default)]
pub struct AccessChecker {
    bypass: Option<Arc<dyn BypassChecker>>,
}

impl AccessChecker {
    pub fn new() -> Self {
        Self { bypass: None }
    }

    pub fn with_bypass<B>(bypass: B) -> Self
    where
        B: BypassChecker + 'static,
    {
        Self {
            bypass: Some(Arc::new(bypass)),
        }
    }

    pub fn set_bypass_checker(&mut self, bypass: Arc<dyn BypassChecker>) {
        self.bypass = Some(bypass);
    }

    pub fn clear_bypass_checker(&mut self) {
        self.bypass = None;
    }

    pub fn has_bypass_checker(&self) -> bool {
        self.bypass.is_some()
    }

    /// # Errors
    /// `InvalidContextType` if `context` is neither null nor an object.
    pub fn check_access(
        &self,
        tree: &FullPermissionTree,
        context: &Value,
        allow_bypass: bool,
    ) -> Result<bool, PermissionError> {
        validate_context(context)?;

        if self.bypass_granted(tree, context, allow_bypass) {
            return Ok(true);
        }
        Ok(tree.main().evaluate(context))
    }

    /// `NO_BYPASS` suppression first, then the bypass checker.
    pub(crate) fn bypass_granted(
        &self,
        tree: &FullPermissionTree,
        context: &Value,
        allow_bypass: bool,
    ) -> bool {
        let suppressed =
            allow_bypass && tree.no_bypass().is_some_and(|no_bypass| no_bypass.evaluate(context));
        self.ask_bypass(context, allow_bypass, suppressed)
    }

    /// Asks the bypass checker unless bypass is disallowed or suppressed.
    pub(crate) fn ask_bypass(&self, context: &Value, allow_bypass: bool, suppressed: bool) -> bool {
        if !allow_bypass {
            return false;
        }
        if suppressed {
            debug!("Bypass suppressed by NO_BYPASS");
            return false;
        }

        let granted = self
            .bypass
            .as_ref()
            .is_some_and(|bypass| bypass.check_bypass_access(context));
        if granted {
            info!("Bypass access granted");
        }
        granted
    }
}

impl fmt::Debug for AccessChecker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessChecker")
            .field("has_bypass_checker", &self.has_bypass_checker())
            .finish()
    }
}

/// Contexts are null (no context) or an object.
pub fn validate_context(context: &Value) -> Result<(), PermissionError> {
    match context {
        Value::Null | Value::Object(_) => Ok(()),
        Value::Bool(_) => Err(PermissionError::InvalidContextType("boolean".to_string())),
        Value::Number(_) => Err(PermissionError::InvalidContextType("number".to_string())),
        Value::String(_) => Err(PermissionError::InvalidContextType("string".to_string())),
        Value::Array(_) => Err(PermissionError::InvalidContextType("array".to_string())),
    }
}
