use crate::checker::PermissionChecker;
use crate::error::PermissionError;
use crate::keys;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Named permission checkers consulted while building trees.
///
/// The registry is configured up front and handed to the deserializer by
/// reference. Trees keep their own `Arc` handles, so later registry changes do
/// not affect trees that were already built.
pub struct PermissionCheckerRegistry {
    checkers: HashMap<String, Arc<dyn PermissionChecker>>,
    reserved: Vec<&'static str>,
}

impl PermissionCheckerRegistry {
    pub fn new() -> Self {
        Self {
            checkers: HashMap::new(),
            reserved: keys::reserved_keys(),
        }
    }

    /// Registers a checker under `name`.
    ///
    /// # Errors
    /// `InvalidPermissionTypeName` for empty, positional or reserved names,
    /// `PermissionTypeAlreadyRegistered` if the name is taken.
    pub fn add<C>(&mut self, name: impl Into<String>, checker: C) -> Result<&mut Self, PermissionError>
    where
        C: PermissionChecker + 'static,
    {
        self.add_shared(name, Arc::new(checker))
    }

    pub fn add_shared(
        &mut self,
        name: impl Into<String>,
        checker: Arc<dyn PermissionChecker>,
    ) -> Result<&mut Self, PermissionError> {
        let name = name.into();
        self.validate_name(&name)?;
        if self.checkers.contains_key(&name) {
            return Err(PermissionError::PermissionTypeAlreadyRegistered(name));
        }
        debug!("Registering permission type: {}", name);
        self.checkers.insert(name, checker);
        Ok(self)
    }

    pub fn remove(&mut self, name: &str) -> Result<Arc<dyn PermissionChecker>, PermissionError> {
        let removed = self
            .checkers
            .remove(name)
            .ok_or_else(|| PermissionError::PermissionTypeNotRegistered(name.to_string()))?;
        debug!("Removed permission type: {}", name);
        Ok(removed)
    }

    /// Replaces every registered checker. All names are validated before the
    /// registry is touched, so a bad entry leaves the old set in place.
    pub fn set_checkers<I, S>(&mut self, checkers: I) -> Result<(), PermissionError>
    where
        I: IntoIterator<Item = (S, Arc<dyn PermissionChecker>)>,
        S: Into<String>,
    {
        let mut replacement = HashMap::new();
        for (name, checker) in checkers {
            let name = name.into();
            self.validate_name(&name)?;
            if replacement.insert(name.clone(), checker).is_some() {
                return Err(PermissionError::PermissionTypeAlreadyRegistered(name));
            }
        }
        debug!("Replacing permission types: {} registered", replacement.len());
        self.checkers = replacement;
        Ok(())
    }

    pub fn has(&self, name: &str) -> bool {
        self.checkers.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Result<Arc<dyn PermissionChecker>, PermissionError> {
        self.checkers
            .get(name)
            .cloned()
            .ok_or_else(|| PermissionError::PermissionTypeNotRegistered(name.to_string()))
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.checkers.keys().cloned().collect();
        names.sort();
        names
    }

    /// Every key accepted in a permission expression: the reserved keywords
    /// followed by the registered type names.
    pub fn valid_keys(&self) -> Vec<String> {
        self.reserved
            .iter()
            .map(|key| key.to_string())
            .chain(self.names())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.checkers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.checkers.is_empty()
    }

    pub fn clear(&mut self) {
        self.checkers.clear();
    }

    fn validate_name(&self, name: &str) -> Result<(), PermissionError> {
        if name.is_empty() {
            return Err(PermissionError::InvalidPermissionTypeName(
                "name must not be empty".to_string(),
            ));
        }
        if keys::is_positional(name) {
            return Err(PermissionError::InvalidPermissionTypeName(format!(
                "\"{name}\" is numeric and would be read as a positional key"
            )));
        }
        if self.reserved.iter().any(|key| key.eq_ignore_ascii_case(name)) {
            return Err(PermissionError::InvalidPermissionTypeName(format!(
                "\"{name}\" is a reserved keyword"
            )));
        }
        Ok(())
    }
}

impl Default for PermissionCheckerRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for PermissionCheckerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PermissionCheckerRegistry")
            .field("types", &self.names())
            .finish()
    }
}
