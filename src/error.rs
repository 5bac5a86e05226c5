//! Error types for the build engine

use thiserror::Error;

/// Main error type for the build engine
///
/// Only catalog loading and registry access fail. Session intents never
/// return errors; an intent that cannot apply is absorbed as a no-op.
#[derive(Error, Debug)]
pub enum BuildError {
    #[error("Deserialization error: {0}")]
    DeserializationError(String),

    #[error("Duplicate id: {0}")]
    DuplicateId(String),

    #[error("Unknown prerequisite {prerequisite} on node {node} in tree {tree}")]
    UnknownPrerequisite {
        tree: String,
        node: String,
        prerequisite: String,
    },

    #[error("Power {power} in category {category} requires unknown node {node}")]
    UnknownRequirement {
        category: String,
        power: String,
        node: String,
    },

    #[error("Node {node} in tree {tree} has no sigil kind")]
    UnresolvedSigil { tree: String, node: String },

    #[error("Unknown category: {0}")]
    UnknownCategory(String),

    #[error("Invalid default: {0}")]
    InvalidDefault(String),

    #[error("Unknown group: {0}")]
    UnknownGroup(String),

    #[error("Unknown sigil: {0}")]
    UnknownSigil(String),

    #[error("Unknown custom spell: {0}")]
    UnknownSpell(String),

    #[error("Catalog not initialized. Call init_catalog() first.")]
    CatalogNotInitialized,
}

impl From<serde_json::Error> for BuildError {
    fn from(err: serde_json::Error) -> Self {
        BuildError::DeserializationError(err.to_string())
    }
}

#[cfg(feature = "python")]
impl From<BuildError> for pyo3::PyErr {
    fn from(err: BuildError) -> pyo3::PyErr {
        use pyo3::exceptions::{PyKeyError, PyRuntimeError, PyValueError};

        match err {
            BuildError::CatalogNotInitialized => PyRuntimeError::new_err(err.to_string()),
            BuildError::UnknownGroup(_)
            | BuildError::UnknownSigil(_)
            | BuildError::UnknownSpell(_) => {
                PyKeyError::new_err(err.to_string())
            }
            _ => PyValueError::new_err(err.to_string()),
        }
    }
}

/// Result type alias for the build engine
pub type Result<T> = std::result::Result<T, BuildError>;
