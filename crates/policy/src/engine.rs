use crate::access::AccessChecker;
use crate::config::{EngineConfig, PolicyError, PolicySet};
use crate::debug::DebugAccessReport;
use permtree_core::{
    BypassChecker, FullPermissionTree, FullTreeDeserializer, PermissionChecker,
    PermissionCheckerRegistry, PermissionError,
};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, warn};

/// Entry point tying together the checker registry, the bypass checker and
/// the engine settings.
///
/// Permission expressions are parsed on every call; use
/// [`PermissionEngine::build_tree`] together with [`PermissionEngine::access`]
/// to evaluate one tree repeatedly.
#[derive(Debug, Default)]
pub struct PermissionEngine {
    registry: PermissionCheckerRegistry,
    access: AccessChecker,
    config: EngineConfig,
    policies: PolicySet,
}

impl PermissionEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: EngineConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn registry(&self) -> &PermissionCheckerRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut PermissionCheckerRegistry {
        &mut self.registry
    }

    pub fn access(&self) -> &AccessChecker {
        &self.access
    }

    pub fn add_type<C>(&mut self, name: impl Into<String>, checker: C) -> Result<&mut Self, PermissionError>
    where
        C: PermissionChecker + 'static,
    {
        self.registry.add(name, checker)?;
        Ok(self)
    }

    pub fn remove_type(&mut self, name: &str) -> Result<(), PermissionError> {
        self.registry.remove(name).map(|_| ())
    }

    pub fn type_exists(&self, name: &str) -> bool {
        self.registry.has(name)
    }

    pub fn set_types<I, S>(&mut self, types: I) -> Result<(), PermissionError>
    where
        I: IntoIterator<Item = (S, Arc<dyn PermissionChecker>)>,
        S: Into<String>,
    {
        self.registry.set_checkers(types)
    }

    pub fn valid_permission_keys(&self) -> Vec<String> {
        self.registry.valid_keys()
    }

    pub fn set_bypass_checker<B>(&mut self, bypass: B) -> &mut Self
    where
        B: BypassChecker + 'static,
    {
        self.access.set_bypass_checker(Arc::new(bypass));
        self
    }

    pub fn clear_bypass_checker(&mut self) -> &mut Self {
        self.access.clear_bypass_checker();
        self
    }

    /// Adopts a policy set and its settings after validating every policy
    /// against the registered types. On error nothing changes.
    pub fn load_policies(&mut self, policies: PolicySet) -> Result<(), PolicyError> {
        policies.validate(&self.registry)?;
        debug!("Loaded {} policies", policies.policies.len());
        self.config = policies.config.clone();
        self.policies = policies;
        Ok(())
    }

    pub fn policies(&self) -> &PolicySet {
        &self.policies
    }

    pub fn build_tree(&self, permissions: &Value) -> Result<FullPermissionTree, PermissionError> {
        FullTreeDeserializer::new(&self.registry).deserialize(permissions)
    }

    /// Checks access with the configured `allow_bypass` default.
    pub fn check_access(&self, permissions: &Value, context: &Value) -> Result<bool, PermissionError> {
        self.check_access_with(permissions, context, self.config.allow_bypass)
    }

    pub fn check_access_with(
        &self,
        permissions: &Value,
        context: &Value,
        allow_bypass: bool,
    ) -> Result<bool, PermissionError> {
        let tree = self.build_tree(permissions)?;
        if self.config.debug {
            let report = self.access.debug_check_access(&tree, context, allow_bypass)?;
            debug!(report = ?report, "Access check for {}", tree);
            return Ok(report.has_access);
        }
        self.access.check_access(&tree, context, allow_bypass)
    }

    /// Parses `permissions` as JSON text before checking.
    ///
    /// # Errors
    /// `InvalidArgumentType` if the text is not valid JSON.
    pub fn check_access_json(&self, permissions: &str, context: &Value) -> Result<bool, PermissionError> {
        let permissions: Value = serde_json::from_str(permissions).map_err(|e| {
            warn!("Rejected permission expression: {}", e);
            PermissionError::InvalidArgumentType(format!("permissions are not valid JSON: {e}"))
        })?;
        self.check_access(&permissions, context)
    }

    pub fn debug_check_access(
        &self,
        permissions: &Value,
        context: &Value,
        allow_bypass: bool,
    ) -> Result<DebugAccessReport, PermissionError> {
        let tree = self.build_tree(permissions)?;
        self.access.debug_check_access(&tree, context, allow_bypass)
    }

    /// Checks a named policy from the loaded [`PolicySet`].
    pub fn check_policy(&self, name: &str, context: &Value) -> Result<bool, PolicyError> {
        let permissions = self
            .policies
            .get(name)
            .ok_or_else(|| PolicyError::NotFound(name.to_string()))?;
        Ok(self.check_access(permissions, context)?)
    }
}
