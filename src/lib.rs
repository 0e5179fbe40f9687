//! Bundle configuration assembler
//!
//! Merges environment variables, the invoking tool's flags, and the host
//! application's config module into one immutable settings value, then uses
//! it to parameterize module resolution, file transformation rules, and
//! injected globals for the browser bundle. Invoked as a library by the
//! build tool; one settings value per invocation.

pub mod config;
pub mod env;
pub mod error;
pub mod flags;
pub mod resolve;
pub mod rules;
pub mod version;

pub use config::{AssembledConfig, Assembler, ConfigModule, FactoryModule, FileModule};
pub use env::{EnvStore, ProcessEnv};
pub use error::AssembleError;
pub use flags::{FlagSource, NoFlags};
pub use resolve::Resolution;
pub use rules::{ExcludePolicy, TransformRule};
