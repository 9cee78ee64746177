//! Engine settings and named policies loaded from YAML or JSON.

use permtree_core::{FullTreeDeserializer, PermissionCheckerRegistry, PermissionError};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PolicyError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid policy \"{name}\": {source}")]
    InvalidPolicy {
        name: String,
        #[source]
        source: PermissionError,
    },
    #[error("Policy not found: {0}")]
    NotFound(String),
    #[error(transparent)]
    Permission(#[from] PermissionError),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct EngineConfig {
    /// Default for `allow_bypass` when a check does not pass one explicitly.
    pub allow_bypass: bool,
    /// Log a full evaluation trace for every access check.
    pub debug: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            allow_bypass: true,
            debug: false,
        }
    }
}

/// Named permission expressions plus the engine settings they were written
/// for.
///
/// ```yaml
/// config:
///   allow_bypass: true
/// policies:
///   edit_article:
///     role: [admin, editor]
///   delete_article:
///     NO_BYPASS: true
///     "0":
///       role: admin
/// ```
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct PolicySet {
    #[serde(default)]
    pub config: EngineConfig,
    #[serde(default)]
    pub policies: Map<String, Value>,
}

impl PolicySet {
    pub fn from_yaml_str(content: &str) -> Result<Self, PolicyError> {
        Ok(serde_yaml::from_str(content)?)
    }

    pub fn from_json_str(content: &str) -> Result<Self, PolicyError> {
        Ok(serde_json::from_str(content)?)
    }

    /// Reads a policy file. `.json` files are parsed as JSON, anything else
    /// as YAML.
    pub async fn load<P: AsRef<Path>>(path: P) -> Result<Self, PolicyError> {
        let content = tokio::fs::read_to_string(&path).await?;
        if is_json(path.as_ref()) {
            Self::from_json_str(&content)
        } else {
            Self::from_yaml_str(&content)
        }
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.policies.get(name)
    }

    pub fn names(&self) -> Vec<&str> {
        self.policies.keys().map(String::as_str).collect()
    }

    /// Deserializes every policy against `registry`, failing on the first
    /// invalid one.
    pub fn validate(&self, registry: &PermissionCheckerRegistry) -> Result<(), PolicyError> {
        let deserializer = FullTreeDeserializer::new(registry);
        for (name, raw) in &self.policies {
            deserializer
                .deserialize(raw)
                .map_err(|source| PolicyError::InvalidPolicy {
                    name: name.clone(),
                    source,
                })?;
        }
        Ok(())
    }
}

fn is_json(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}
