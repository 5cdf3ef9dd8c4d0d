//! Error types for corpus loading and validation

use crate::account::AccountTier;
use std::path::PathBuf;

/// Errors raised while loading or validating a corpus
#[derive(Debug, thiserror::Error)]
pub enum CorpusError {
    /// IO error during file read
    #[error("io error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// File extension not recognized as a corpus format
    #[error("unsupported corpus format: '{0}'")]
    UnsupportedFormat(String),

    /// YAML syntax or schema error
    #[error("yaml corpus error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON syntax or schema error
    #[error("json corpus error: {0}")]
    Json(#[from] serde_json::Error),

    /// Two accounts normalize to the same identifier in one tier
    #[error("duplicate account identifier '{identifier}' in {tier} tier")]
    DuplicateAccount {
        identifier: String,
        tier: AccountTier,
    },

    /// Two documents normalize to the same id
    #[error("duplicate document id '{0}'")]
    DuplicateDocument(String),

    /// Blank identifier or document id
    #[error("empty {kind} key")]
    EmptyKey { kind: &'static str },
}

impl CorpusError {
    /// Create IO error for path
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
