//! Error types for configuration assembly
//!
//! Assembly either yields a complete settings value or fails with one of
//! these; no partial results are produced.

/// Errors raised while assembling the bundle configuration
#[derive(Debug, thiserror::Error)]
pub enum AssembleError {
    /// The application config module is missing, unreadable, or its factory
    /// failed. Fatal; surfaced to the invoking build tool without retry.
    #[error("failed to load config module {path}: {reason}")]
    ModuleLoad { path: String, reason: String },

    /// The packaging descriptor was reached as the terminal version fallback
    /// and could not be parsed.
    #[error("malformed packaging descriptor {path}: {reason}")]
    Descriptor { path: String, reason: String },

    /// A rule matcher pattern failed to compile.
    #[error("invalid matcher pattern: {0}")]
    Pattern(#[from] globset::Error),
}
