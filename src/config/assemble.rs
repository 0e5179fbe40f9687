//! Top-level configuration assembly
//!
//! One pass: resolve the config module, invoke its factory, merge the
//! partial over builtin defaults, then assemble the settings value the
//! bundler consumes. The result carries provenance for the contributing
//! sources, in precedence order.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{json, Value};
use sha2::{Digest, Sha256};

use crate::env::EnvStore;
use crate::error::AssembleError;
use crate::flags::FlagSource;
use crate::resolve::{build_resolution, embedded_mode, Resolution};
use crate::rules::{rule_list, ExcludePolicy, TransformRule};

use super::defaults::build_defaults;
use super::merge::deep_merge;
use super::module::{
    resolve_config_path, ConfigModule, FileModule, CONFIG_PATH_ENV, CONFIG_PATH_FLAG,
};

/// Schema version for the assembled settings.
pub const SCHEMA_VERSION: u32 = 1;

/// Schema identifier.
pub const SCHEMA_ID: &str = "bundle-config/settings@1";

/// Define-injection key carrying the merged configuration as a JSON literal.
pub const CONFIG_DEFINE_KEY: &str = "__APP_CONFIG__";

/// Origin of a contributing configuration source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfigOrigin {
    Builtin,
    Module,
}

/// A contributing source with provenance.
#[derive(Debug, Clone, Serialize)]
pub struct ConfigSource {
    pub origin: ConfigOrigin,

    /// File path (builtin defaults have none).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    /// SHA-256 digest of the raw file bytes, when file-backed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub digest: Option<String>,
}

/// Output location settings for the produced bundle.
#[derive(Debug, Clone, Serialize)]
pub struct Output {
    pub path: PathBuf,
    pub filename: String,
    pub chunk_filename: String,
}

/// The assembled bundle configuration. Immutable once produced; consumed
/// once by the bundler.
#[derive(Debug, Clone)]
pub struct AssembledConfig {
    pub schema_version: u32,
    pub schema_id: String,
    pub created_at: DateTime<Utc>,

    /// The merged configuration value (defaults + application partial).
    pub config: Value,

    /// Contributing sources in precedence order.
    pub sources: Vec<ConfigSource>,

    /// Entry point name to source path.
    pub entry: BTreeMap<String, String>,

    pub output: Output,

    /// Global symbol to providing module.
    pub provided: BTreeMap<String, String>,

    pub resolution: Resolution,

    /// Whether the core platform package is installed under the dependency
    /// directory of the working directory.
    pub embedded: bool,

    rules: Vec<TransformRule>,
}

/// Assembles the bundle configuration from a working directory, an
/// environment store, and a flag lookup.
pub struct Assembler<'a> {
    cwd: PathBuf,
    env: &'a dyn EnvStore,
    flags: &'a dyn FlagSource,
}

impl<'a> Assembler<'a> {
    pub fn new(cwd: impl Into<PathBuf>, env: &'a dyn EnvStore, flags: &'a dyn FlagSource) -> Self {
        Self {
            cwd: cwd.into(),
            env,
            flags,
        }
    }

    /// Assemble using the file-backed config module at the resolved path.
    pub fn assemble(&self) -> Result<AssembledConfig, AssembleError> {
        let path = resolve_config_path(
            &self.cwd,
            self.env.var(CONFIG_PATH_ENV).as_deref(),
            self.flags.get_str(CONFIG_PATH_FLAG).as_deref(),
        );
        self.assemble_with(&FileModule::new(path))
    }

    /// Assemble using an explicit config module.
    pub fn assemble_with(
        &self,
        module: &dyn ConfigModule,
    ) -> Result<AssembledConfig, AssembleError> {
        let defaults = build_defaults(self.env, self.flags, &self.cwd)?;
        let partial = module.config(self.flags)?;

        let mut sources = vec![ConfigSource {
            origin: ConfigOrigin::Builtin,
            path: None,
            digest: None,
        }];
        sources.push(ConfigSource {
            origin: ConfigOrigin::Module,
            path: module.path().map(|p| p.display().to_string()),
            digest: module.path().and_then(file_digest),
        });

        let config = deep_merge(defaults, partial);

        let policy = ExcludePolicy::from_config(&config);
        let rules = rule_list(&policy)?;

        let mut entry = BTreeMap::new();
        entry.insert("app".to_string(), "app/scripts/index.js".to_string());

        let mut provided = BTreeMap::new();
        for symbol in ["$", "window.$", "jQuery", "window.jQuery"] {
            provided.insert(symbol.to_string(), "jquery".to_string());
        }
        provided.insert("moment".to_string(), "moment".to_string());

        Ok(AssembledConfig {
            schema_version: SCHEMA_VERSION,
            schema_id: SCHEMA_ID.to_string(),
            created_at: Utc::now(),
            config,
            sources,
            entry,
            output: Output {
                path: self.cwd.join("dist"),
                filename: "[name].bundle.js".to_string(),
                chunk_filename: "[id].bundle.js".to_string(),
            },
            provided,
            resolution: build_resolution(&self.cwd),
            embedded: embedded_mode(&self.cwd),
            rules,
        })
    }
}

impl AssembledConfig {
    /// The ordered transformation rule list.
    pub fn rules(&self) -> &[TransformRule] {
        &self.rules
    }

    /// Compile-time constant injections: the merged configuration as a JSON
    /// literal under [`CONFIG_DEFINE_KEY`].
    pub fn define_injections(&self) -> BTreeMap<String, String> {
        let mut defines = BTreeMap::new();
        defines.insert(CONFIG_DEFINE_KEY.to_string(), self.config.to_string());
        defines
    }

    /// Merged configuration value at a dot-separated key path.
    pub fn get(&self, path: &str) -> Option<&Value> {
        let mut current = &self.config;
        for part in path.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    pub fn get_str(&self, path: &str) -> Option<&str> {
        self.get(path).and_then(|v| v.as_str())
    }

    pub fn get_u64(&self, path: &str) -> Option<u64> {
        self.get(path).and_then(|v| v.as_u64())
    }

    pub fn get_bool(&self, path: &str) -> Option<bool> {
        self.get(path).and_then(|v| v.as_bool())
    }

    /// Declarative form of the whole settings value for the bundler.
    pub fn to_value(&self) -> Value {
        json!({
            "schema_version": self.schema_version,
            "schema_id": self.schema_id,
            "created_at": self.created_at.to_rfc3339(),
            "entry": self.entry,
            "output": self.output,
            "provide": self.provided,
            "define": self.define_injections(),
            "resolve": self.resolution,
            "rules": self.rules.iter().map(|r| r.to_value()).collect::<Vec<_>>(),
            "sources": self.sources,
            "embedded": self.embedded,
            "config": self.config,
        })
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.to_value())
    }
}

/// SHA-256 digest of a file's raw bytes; `None` when unreadable.
fn file_digest(path: &Path) -> Option<String> {
    let bytes = fs::read(path).ok()?;
    let mut hasher = Sha256::new();
    hasher.update(&bytes);
    Some(hex::encode(hasher.finalize()))
}
