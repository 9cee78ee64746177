use serde_json::Value;

/// Resolves a single permission value (e.g. `"admin"` for the `role` type)
/// against a runtime context.
///
/// Implementations must not mutate shared state: one tree may be evaluated
/// from several threads at once.
pub trait PermissionChecker: Send + Sync {
    fn check_permission(&self, value: &str, context: &Value) -> bool;
}

impl<F> PermissionChecker for F
where
    F: Fn(&str, &Value) -> bool + Send + Sync,
{
    fn check_permission(&self, value: &str, context: &Value) -> bool {
        self(value, context)
    }
}

/// Decides whether a context may skip the permission tree entirely.
pub trait BypassChecker: Send + Sync {
    fn check_bypass_access(&self, context: &Value) -> bool;
}

impl<F> BypassChecker for F
where
    F: Fn(&Value) -> bool + Send + Sync,
{
    fn check_bypass_access(&self, context: &Value) -> bool {
        self(context)
    }
}
