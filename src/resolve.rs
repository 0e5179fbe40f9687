//! Module resolution: search paths, aliases, embedded-mode probe
//!
//! The search path list is ordered; downstream resolution takes the first
//! match. Aliases substitute alternate implementations or generated
//! artifacts for symbolic import names.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::rules::{CORE_PACKAGE, DEPENDENCY_DIR_MARKER};

/// Generated artifact wired in under the `external-apps` alias.
pub const GENERATED_APP_IMPORTER: &str = "app-importer.generated.js";

/// Generated artifact wired in under the `i18n` alias.
pub const GENERATED_LOCALE: &str = "locale.generated.js";

/// Module-resolution settings for the bundler.
#[derive(Debug, Clone, Serialize)]
pub struct Resolution {
    /// Directories searched in order; first match wins.
    pub paths: Vec<PathBuf>,

    /// Alias name to resolved target.
    pub aliases: BTreeMap<String, String>,

    /// Extensions tried for extensionless imports.
    pub extensions: Vec<String>,
}

/// Build the fixed resolution settings for a working directory.
pub fn build_resolution(cwd: &Path) -> Resolution {
    let core = cwd.join(DEPENDENCY_DIR_MARKER).join(CORE_PACKAGE);

    let paths = vec![
        cwd.to_path_buf(),
        cwd.join("app"),
        cwd.join("app/scripts"),
        cwd.join("app/styles/sass"),
        core.join("scripts"),
        core.join("styles/sass"),
        core,
        PathBuf::from(DEPENDENCY_DIR_MARKER),
    ];

    let mut aliases = BTreeMap::new();
    aliases.insert(
        "external-apps".to_string(),
        cwd.join("dist").join(GENERATED_APP_IMPORTER).display().to_string(),
    );
    aliases.insert(
        "i18n".to_string(),
        cwd.join("dist").join(GENERATED_LOCALE).display().to_string(),
    );
    // a single react copy, even when apps bring their own
    aliases.insert(
        "react".to_string(),
        cwd.join(DEPENDENCY_DIR_MARKER).join("react").display().to_string(),
    );

    Resolution {
        paths,
        aliases,
        extensions: vec![".js".to_string(), ".jsx".to_string()],
    }
}

/// Whether the client runs embedded: the core platform package is installed
/// under the dependency directory of the working directory.
pub fn embedded_mode(cwd: &Path) -> bool {
    cwd.join(DEPENDENCY_DIR_MARKER).join(CORE_PACKAGE).exists()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_search_path_order() {
        let cwd = Path::new("/work/client");
        let resolution = build_resolution(cwd);

        assert_eq!(resolution.paths[0], cwd);
        assert_eq!(resolution.paths[1], cwd.join("app"));
        // dependency directory is searched last
        assert_eq!(
            resolution.paths.last().unwrap(),
            &PathBuf::from(DEPENDENCY_DIR_MARKER)
        );
    }

    #[test]
    fn test_generated_artifact_aliases() {
        let cwd = Path::new("/work/client");
        let resolution = build_resolution(cwd);

        assert!(resolution.aliases["external-apps"].ends_with(GENERATED_APP_IMPORTER));
        assert!(resolution.aliases["i18n"].ends_with(GENERATED_LOCALE));
        assert!(resolution.aliases["react"].contains(DEPENDENCY_DIR_MARKER));
    }

    #[test]
    fn test_extensions() {
        let resolution = build_resolution(Path::new("/work/client"));
        assert_eq!(resolution.extensions, [".js", ".jsx"]);
    }

    #[test]
    fn test_embedded_mode_probe() {
        let dir = tempfile::tempdir().unwrap();
        assert!(!embedded_mode(dir.path()));

        fs::create_dir_all(dir.path().join(DEPENDENCY_DIR_MARKER).join(CORE_PACKAGE)).unwrap();
        assert!(embedded_mode(dir.path()));
    }
}
