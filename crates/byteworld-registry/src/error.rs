//! Error types for registry operations.

use std::path::{Path, PathBuf};

use byteworld_core::{Category, Violations};
use thiserror::Error;

/// Errors that can occur while configuring or loading a registry.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// Layout file could not be read.
    #[error("Failed to read layout file {path}: {source}")]
    LayoutRead {
        /// Layout file path.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// Layout file is not a valid layout document.
    #[error("Invalid layout file {path}: {source}")]
    LayoutParse {
        /// Layout file path.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: serde_yaml::Error,
    },

    /// The registry tree violates one or more invariants.
    #[error("Registry validation failed with {} violation(s)", .violations.len())]
    Invalid {
        /// Every violation found in the tree.
        violations: Violations,
    },
}

impl From<Violations> for RegistryError {
    fn from(violations: Violations) -> Self {
        Self::Invalid { violations }
    }
}

/// Errors raised while enumerating record files.
#[derive(Debug, Error)]
pub enum WalkError {
    /// A directory under a category root could not be traversed.
    #[error("Failed to traverse {path}: {source}")]
    Traverse {
        /// Category of the root being traversed.
        category: Category,
        /// Path that failed.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: walkdir::Error,
    },

    /// A record file could not be read.
    #[error("Failed to read {path}: {source}")]
    Read {
        /// Category of the record.
        category: Category,
        /// Record file path.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },
}

impl WalkError {
    /// Returns the category of the root the failure occurred under.
    #[must_use]
    pub const fn category(&self) -> Category {
        match self {
            Self::Traverse { category, .. } | Self::Read { category, .. } => *category,
        }
    }

    /// Returns the path that failed.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::Traverse { path, .. } | Self::Read { path, .. } => path,
        }
    }
}

/// A record document that could not be decoded.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Failed to decode {}: {message}", .file.display())]
pub struct DecodeError {
    /// Record file.
    pub file: PathBuf,
    /// Field at fault, if the failure is confined to one field.
    pub field: Option<String>,
    /// Description of the failure.
    pub message: String,
}

impl DecodeError {
    /// Creates an error for the whole document.
    pub fn document(file: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            field: None,
            message: message.into(),
        }
    }

    /// Creates an error confined to one field.
    pub fn field(file: impl Into<PathBuf>, field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            field: Some(field.into()),
            message: message.into(),
        }
    }
}

/// Outcome of a lookup that did not produce an entity.
///
/// Both variants are ordinary answers, not failures of the service.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    /// The query argument is malformed; the index was not consulted.
    #[error("Bad input: {reason}")]
    BadInput {
        /// Why the argument was rejected.
        reason: String,
    },

    /// The query argument is well-formed but names nothing in the index.
    #[error("{what} not found")]
    NotFound {
        /// What was looked up.
        what: String,
    },

    /// No registry snapshot has been published yet.
    #[error("Registry has not been loaded")]
    Unavailable,
}

impl LookupError {
    pub(crate) fn bad_input(reason: impl Into<String>) -> Self {
        Self::BadInput {
            reason: reason.into(),
        }
    }

    pub(crate) fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound { what: what.into() }
    }
}
