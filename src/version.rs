//! Best-effort application version lookup
//!
//! Prefers the version-control short revision; falls back to the `version`
//! field of the packaging descriptor. A missing revision or descriptor is
//! silent (the version is simply omitted); a descriptor that exists but
//! cannot be parsed is fatal, since it is the terminal fallback.

use std::fs;
use std::path::Path;
use std::process::Command;

use serde_json::Value;

use crate::error::AssembleError;

/// Conventional packaging descriptor filename.
pub const PACKAGE_DESCRIPTOR: &str = "package.json";

/// Resolve the application version for the defaults set.
pub fn resolve_version(cwd: &Path) -> Result<Option<String>, AssembleError> {
    if let Some(rev) = git_short_rev(cwd) {
        return Ok(Some(rev));
    }
    descriptor_version(&cwd.join(PACKAGE_DESCRIPTOR))
}

/// Short revision of HEAD, or `None` if git is unavailable, the directory is
/// not a repository, or the output is empty.
fn git_short_rev(cwd: &Path) -> Option<String> {
    let output = Command::new("git")
        .args(["rev-parse", "--short", "HEAD"])
        .current_dir(cwd)
        .output()
        .ok()?;

    if !output.status.success() {
        return None;
    }

    let rev = String::from_utf8_lossy(&output.stdout).trim().to_string();
    if rev.is_empty() {
        None
    } else {
        Some(rev)
    }
}

/// `version` field of the packaging descriptor. Absent file or absent field
/// yields `None`; a file that cannot be read or parsed is an error.
fn descriptor_version(path: &Path) -> Result<Option<String>, AssembleError> {
    if !path.exists() {
        return Ok(None);
    }

    let contents = fs::read_to_string(path).map_err(|e| AssembleError::Descriptor {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;

    let descriptor: Value =
        serde_json::from_str(&contents).map_err(|e| AssembleError::Descriptor {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

    Ok(descriptor
        .get("version")
        .and_then(|v| v.as_str())
        .map(String::from))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_descriptor_version() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(PACKAGE_DESCRIPTOR);
        let mut file = fs::File::create(&path).unwrap();
        writeln!(file, "{{\"name\": \"client\", \"version\": \"2.4.1\"}}").unwrap();

        assert_eq!(descriptor_version(&path).unwrap().as_deref(), Some("2.4.1"));
    }

    #[test]
    fn test_descriptor_missing_is_silent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(PACKAGE_DESCRIPTOR);

        assert_eq!(descriptor_version(&path).unwrap(), None);
    }

    #[test]
    fn test_descriptor_without_version_field() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(PACKAGE_DESCRIPTOR);
        fs::write(&path, "{\"name\": \"client\"}").unwrap();

        assert_eq!(descriptor_version(&path).unwrap(), None);
    }

    #[test]
    fn test_malformed_descriptor_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(PACKAGE_DESCRIPTOR);
        fs::write(&path, "{not json").unwrap();

        let err = descriptor_version(&path).unwrap_err();
        assert!(matches!(err, AssembleError::Descriptor { .. }));
    }
}
