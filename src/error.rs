//! Configuration error types

use thiserror::Error;

/// Errors that can occur in typed access and persistence
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Value's runtime type disagrees with its key's type tag
    #[error("key '{key}' cannot carry a {found} value")]
    ContractViolation { key: String, found: &'static str },

    /// Read of a missing section or key
    #[error("no key '{key}' in section '{section}'")]
    KeyNotFound { section: String, key: String },

    /// Strict-mode write into an unknown section
    #[error("no section '{0}'")]
    MissingSection(String),

    /// Strict-mode write of an unknown key
    #[error("no key '{key}' to update in section '{section}'")]
    MissingKey { section: String, key: String },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
