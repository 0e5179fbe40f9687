//! Exclusion policy for transformation rules
//!
//! Third-party dependencies under the dependency directory are normally
//! skipped by the lint and transpile steps, but the core platform package
//! and the application's own declared modules are installed there too and
//! must still be transpiled. The two predicates differ: declared app modules
//! are transpiled here but run their own linters, so the lint predicate
//! excludes them as well.

use serde_json::Value;

/// Marker substring denoting the third-party dependency directory.
pub const DEPENDENCY_DIR_MARKER: &str = "node_modules";

/// Name of the core platform package, always a valid module.
pub const CORE_PACKAGE: &str = "client-core";

/// Path exclusion policy built from the merged configuration's declared
/// application modules.
#[derive(Debug, Clone)]
pub struct ExcludePolicy {
    marker: String,
    valid_modules: Vec<String>,
    app_modules: Vec<String>,
}

impl ExcludePolicy {
    /// Build the policy from the merged configuration's `apps` sequence.
    pub fn from_config(config: &Value) -> Self {
        let apps = config
            .get("apps")
            .and_then(|v| v.as_array())
            .map(|seq| {
                seq.iter()
                    .filter_map(|v| v.as_str().map(String::from))
                    .collect()
            })
            .unwrap_or_default();

        Self::new(DEPENDENCY_DIR_MARKER, CORE_PACKAGE, apps)
    }

    pub fn new(marker: &str, core_package: &str, app_modules: Vec<String>) -> Self {
        let mut valid_modules = vec![core_package.to_string()];
        valid_modules.extend(app_modules.iter().cloned());
        Self {
            marker: marker.to_string(),
            valid_modules,
            app_modules,
        }
    }

    /// The declared application modules (without the core package).
    pub fn app_modules(&self) -> &[String] {
        &self.app_modules
    }

    /// Transpile predicate: exclude paths inside the dependency directory
    /// unless they belong to the core package or a declared app module.
    pub fn transpile_excluded(&self, path: &str) -> bool {
        if !path.contains(&self.marker) {
            return false;
        }
        !self.valid_modules.iter().any(|m| path.contains(m.as_str()))
    }

    /// Lint predicate: exclude everything inside the dependency directory,
    /// and declared app modules anywhere (they lint themselves).
    pub fn lint_excluded(&self, path: &str) -> bool {
        path.contains(&self.marker)
            || self.app_modules.iter().any(|m| path.contains(m.as_str()))
    }
}
