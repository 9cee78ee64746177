//! Permission trees: parsing, validation, serialization and evaluation of
//! declarative boolean permission expressions.

pub mod checker;
pub mod deserializer;
pub mod error;
pub mod gate;
pub mod keys;
pub mod node;
pub mod registry;
pub mod serializer;
pub mod tree;

pub use checker::{BypassChecker, PermissionChecker};
pub use deserializer::{FullTreeDeserializer, TreeDeserializer, MAX_DEPTH};
pub use error::PermissionError;
pub use gate::LogicGate;
pub use node::{GateNode, NodeTrace, PermissionLeaf, PermissionTreeNode};
pub use registry::PermissionCheckerRegistry;
pub use serializer::{FullTreeSerializer, TreeSerializer};
pub use tree::{FullPermissionTree, PermissionTree};
