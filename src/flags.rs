//! Flag-lookup capability
//!
//! Flags are supplied by the invoking build tool; this crate has no CLI
//! surface of its own. The lookup is a trait so the tool's flag parser, a
//! literal map, or a closure-backed factory can all feed assembly.

use std::collections::HashMap;

use serde_json::Value;

/// Lookup of a flag value by name; `None` means the flag was not given.
pub trait FlagSource {
    fn get(&self, name: &str) -> Option<Value>;

    /// Flag value coerced to a string, if set and string-valued.
    fn get_str(&self, name: &str) -> Option<String> {
        self.get(name).and_then(|v| v.as_str().map(String::from))
    }

    /// Whether the flag was given at all.
    fn is_set(&self, name: &str) -> bool {
        self.get(name).is_some()
    }
}

/// Empty flag set, for tools that pass no flags.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoFlags;

impl FlagSource for NoFlags {
    fn get(&self, _name: &str) -> Option<Value> {
        None
    }
}

impl FlagSource for HashMap<String, Value> {
    fn get(&self, name: &str) -> Option<Value> {
        HashMap::get(self, name).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_map_flags() {
        let mut flags = HashMap::new();
        flags.insert("server".to_string(), json!("http://example.test/api"));
        flags.insert("disableEditorToolbar".to_string(), json!(true));

        assert_eq!(flags.get_str("server").as_deref(), Some("http://example.test/api"));
        assert!(flags.is_set("disableEditorToolbar"));
        assert!(!flags.is_set("config"));
        // non-string values do not coerce
        assert_eq!(FlagSource::get_str(&flags, "disableEditorToolbar"), None);
    }

    #[test]
    fn test_no_flags() {
        assert!(!NoFlags.is_set("server"));
        assert_eq!(NoFlags.get("server"), None);
    }
}
