use thiserror::Error;

/// Errors raised while building or evaluating permission trees.
///
/// Every variant is a caller-input or configuration problem. Nothing is
/// retried and no partial tree is ever returned.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PermissionError {
    #[error("Invalid argument type: {0}")]
    InvalidArgumentType(String),

    #[error("Invalid context type: expected null or an object, got {0}")]
    InvalidContextType(String),

    #[error("Invalid permission value type: {0}")]
    InvalidPermissionValueType(String),

    #[error("Permission value must not be empty")]
    EmptyPermissionValue,

    #[error("Permission value \"{0}\" has no permission type")]
    UnresolvedType(String),

    #[error("Permission type not registered: {0}")]
    PermissionTypeNotRegistered(String),

    #[error("Permission type \"{child}\" cannot be nested under permission type \"{parent}\"")]
    NestedType { parent: String, child: String },

    #[error("A boolean cannot be a descendant of permission type \"{0}\"")]
    IllegalDescendant(String),

    #[error("Boolean key \"{0}\" cannot have children")]
    BooleanHasChildren(String),

    #[error("NO_BYPASS is only allowed at the top level")]
    MisplacedNoBypass,

    #[error("Invalid input for {gate} gate: {reason}")]
    InvalidGateArity { gate: String, reason: String },

    #[error("Permission type already registered: {0}")]
    PermissionTypeAlreadyRegistered(String),

    #[error("Invalid permission type name: {0}")]
    InvalidPermissionTypeName(String),
}

impl PermissionError {
    /// Stable snake_case name of the variant, for logs and error mapping.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidArgumentType(_) => "invalid_argument_type",
            Self::InvalidContextType(_) => "invalid_context_type",
            Self::InvalidPermissionValueType(_) => "invalid_permission_value_type",
            Self::EmptyPermissionValue => "empty_permission_value",
            Self::UnresolvedType(_) => "unresolved_type",
            Self::PermissionTypeNotRegistered(_) => "permission_type_not_registered",
            Self::NestedType { .. } => "nested_type",
            Self::IllegalDescendant(_) => "illegal_descendant",
            Self::BooleanHasChildren(_) => "boolean_has_children",
            Self::MisplacedNoBypass => "misplaced_no_bypass",
            Self::InvalidGateArity { .. } => "invalid_gate_arity",
            Self::PermissionTypeAlreadyRegistered(_) => "permission_type_already_registered",
            Self::InvalidPermissionTypeName(_) => "invalid_permission_type_name",
        }
    }
}

/// Short description of a JSON value's type, used in error messages.
pub(crate) fn value_type_name(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
