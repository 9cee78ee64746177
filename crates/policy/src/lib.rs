pub mod access;
pub mod config;
pub mod debug;
pub mod engine;

pub use access::{validate_context, AccessChecker};
pub use config::{EngineConfig, PolicyError, PolicySet};
pub use debug::{DebugAccessReport, TreeTrace};
pub use engine::PermissionEngine;

pub use permtree_core::{
    BypassChecker, FullPermissionTree, LogicGate, PermissionChecker, PermissionCheckerRegistry,
    PermissionError, PermissionTree,
};
