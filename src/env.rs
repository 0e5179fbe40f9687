//! Environment variable store
//!
//! Assembly reads a number of process-wide environment variables (API keys,
//! server URLs, feature flags). The store is a trait so tests can inject a
//! map instead of mutating the real process environment.

use std::collections::HashMap;

use serde_json::Value;

/// Read-only view of environment variables.
pub trait EnvStore {
    /// Look up a variable; `None` when unset or not valid unicode.
    fn var(&self, key: &str) -> Option<String>;

    /// Look up a variable with an empty-string fallback.
    fn var_or_empty(&self, key: &str) -> String {
        self.var(key).unwrap_or_default()
    }

    /// A variable rendered as a JSON value: the string when set, `false`
    /// otherwise. Used for env-driven feature toggles.
    fn var_or_false(&self, key: &str) -> Value {
        self.var(key).map(Value::String).unwrap_or(Value::Bool(false))
    }
}

/// The real process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvStore for ProcessEnv {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

impl EnvStore for HashMap<String, String> {
    fn var(&self, key: &str) -> Option<String> {
        self.get(key).cloned()
    }
}
