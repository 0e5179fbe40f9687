//! Application configuration module
//!
//! The host application supplies its partial configuration through a config
//! module: conventionally a file in the working directory, overridable via
//! environment variable or flag. The module contract is a factory of one
//! argument (the flag lookup) returning a partial configuration mapping.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::error::AssembleError;
use crate::flags::FlagSource;

/// Conventional config module filename in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "app.config.toml";

/// Environment variable overriding the config module path.
pub const CONFIG_PATH_ENV: &str = "APP_CONFIG";

/// Flag overriding the config module path.
pub const CONFIG_PATH_FLAG: &str = "config";

/// Resolve the config module location: flag override, then environment
/// override, then the conventional filename, joined to the working
/// directory. No I/O here; an unreadable path fails later when loaded.
pub fn resolve_config_path(
    cwd: &Path,
    env_override: Option<&str>,
    flag_override: Option<&str>,
) -> PathBuf {
    let name = flag_override
        .or(env_override)
        .unwrap_or(DEFAULT_CONFIG_FILE);
    cwd.join(name)
}

/// Source of the application's partial configuration.
pub trait ConfigModule {
    /// Produce the partial configuration, given the flag lookup.
    fn config(&self, flags: &dyn FlagSource) -> Result<Value, AssembleError>;

    /// Backing file, if any; recorded in provenance.
    fn path(&self) -> Option<&Path> {
        None
    }
}

/// File-backed config module; parses TOML (or JSON, by extension) into a
/// configuration value.
#[derive(Debug, Clone)]
pub struct FileModule {
    path: PathBuf,
}

impl FileModule {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn load_error(&self, reason: impl ToString) -> AssembleError {
        AssembleError::ModuleLoad {
            path: self.path.display().to_string(),
            reason: reason.to_string(),
        }
    }
}

impl ConfigModule for FileModule {
    fn config(&self, _flags: &dyn FlagSource) -> Result<Value, AssembleError> {
        let contents = fs::read_to_string(&self.path).map_err(|e| self.load_error(e))?;

        let is_json = self
            .path
            .extension()
            .map(|ext| ext.eq_ignore_ascii_case("json"))
            .unwrap_or(false);

        if is_json {
            serde_json::from_str(&contents).map_err(|e| self.load_error(e))
        } else {
            let table: toml::Value =
                toml::from_str(&contents).map_err(|e| self.load_error(e))?;
            Ok(toml_to_json(table))
        }
    }

    fn path(&self) -> Option<&Path> {
        Some(&self.path)
    }
}

/// Closure-backed config module, for tools that build the partial
/// configuration in process.
pub struct FactoryModule<F>(pub F);

impl<F> ConfigModule for FactoryModule<F>
where
    F: Fn(&dyn FlagSource) -> Result<Value, AssembleError>,
{
    fn config(&self, flags: &dyn FlagSource) -> Result<Value, AssembleError> {
        (self.0)(flags)
    }
}

/// Convert a TOML value into the JSON representation used for merging.
fn toml_to_json(value: toml::Value) -> Value {
    match value {
        toml::Value::String(s) => Value::String(s),
        toml::Value::Integer(i) => Value::Number(i.into()),
        toml::Value::Float(f) => serde_json::Number::from_f64(f)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        toml::Value::Boolean(b) => Value::Bool(b),
        toml::Value::Datetime(dt) => Value::String(dt.to_string()),
        toml::Value::Array(seq) => Value::Array(seq.into_iter().map(toml_to_json).collect()),
        toml::Value::Table(table) => Value::Object(
            table
                .into_iter()
                .map(|(k, v)| (k, toml_to_json(v)))
                .collect(),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flags::NoFlags;
    use serde_json::json;
    use std::io::Write;

    #[test]
    fn test_resolution_precedence() {
        let cwd = Path::new("/work/client");

        // flag wins over env
        assert_eq!(
            resolve_config_path(cwd, Some("custom.config.toml"), Some("flag.config.toml")),
            cwd.join("flag.config.toml")
        );
        // env wins over the default
        assert_eq!(
            resolve_config_path(cwd, Some("custom.config.toml"), None),
            cwd.join("custom.config.toml")
        );
        // conventional default
        assert_eq!(
            resolve_config_path(cwd, None, None),
            cwd.join(DEFAULT_CONFIG_FILE)
        );
    }

    #[test]
    fn test_file_module_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("app.config.toml");
        let mut file = fs::File::create(&path).unwrap();
        writeln!(file, "apps = [\"pkgA\", \"pkgB\"]").unwrap();
        writeln!(file, "[server]").unwrap();
        writeln!(file, "url = \"https://api.example.test\"").unwrap();

        let partial = FileModule::new(&path).config(&NoFlags).unwrap();
        assert_eq!(partial["apps"], json!(["pkgA", "pkgB"]));
        assert_eq!(partial["server"]["url"], "https://api.example.test");
    }

    #[test]
    fn test_file_module_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("app.config.json");
        fs::write(&path, "{\"apps\": [\"pkgA\"]}").unwrap();

        let partial = FileModule::new(&path).config(&NoFlags).unwrap();
        assert_eq!(partial["apps"], json!(["pkgA"]));
    }

    #[test]
    fn test_missing_module_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let module = FileModule::new(dir.path().join("absent.config.toml"));

        let err = module.config(&NoFlags).unwrap_err();
        assert!(matches!(err, AssembleError::ModuleLoad { .. }));
    }

    #[test]
    fn test_unparseable_module_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.config.toml");
        fs::write(&path, "apps = [unclosed").unwrap();

        let err = FileModule::new(&path).config(&NoFlags).unwrap_err();
        assert!(matches!(err, AssembleError::ModuleLoad { .. }));
    }

    #[test]
    fn test_factory_module_sees_flags() {
        let mut flags = std::collections::HashMap::new();
        flags.insert("defaultTimezone".to_string(), json!("Europe/Prague"));

        let module = FactoryModule(|flags: &dyn FlagSource| -> Result<Value, AssembleError> {
            Ok(json!({"defaultTimezone": flags.get_str("defaultTimezone")}))
        });

        let partial = module.config(&flags).unwrap();
        assert_eq!(partial["defaultTimezone"], "Europe/Prague");
        assert_eq!(module.path(), None);
    }
}
