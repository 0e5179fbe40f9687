//! Configuration assembly
//!
//! Implements the layered configuration merge:
//! 1. Built-in defaults (parameterized by environment variables and flags)
//! 2. The application's config module (partial configuration, wins on
//!    conflict)
//!
//! and the assembly of the final settings value consumed by the bundler.

mod assemble;
mod defaults;
mod merge;
mod module;

pub use assemble::{
    AssembledConfig, Assembler, ConfigOrigin, ConfigSource, Output, CONFIG_DEFINE_KEY, SCHEMA_ID,
    SCHEMA_VERSION,
};
pub use defaults::{build_defaults, defaults_value, DEFAULT_MAX_CONTENT_LENGTH};
pub use merge::{deep_merge, merge_layers};
pub use module::{
    resolve_config_path, ConfigModule, FactoryModule, FileModule, CONFIG_PATH_ENV,
    CONFIG_PATH_FLAG, DEFAULT_CONFIG_FILE,
};
