//! Error types for Bloodline
//!
//! Toyota Way: Clear error messages with actionable guidance (Respect for People)

use std::fmt;

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Which dataset a failed lookup went to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    /// Horse → parents table
    Horse,
    /// Stallion → attribute table
    Stallion,
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Horse => f.write_str("horse"),
            Self::Stallion => f.write_str("stallion"),
        }
    }
}

/// Bloodline error types
#[derive(Error, Debug)]
pub enum Error {
    /// Name did not resolve in the horse or stallion table
    #[error("{kind} not found: {name}")]
    NotFound {
        /// Table that was searched
        kind: RecordKind,
        /// Exact name that was looked up
        name: String,
    },

    /// A trait vector lacks one of the six base traits
    #[error("Insufficient pedigree data: {record} has no '{key}' score")]
    MissingKey {
        /// Record (or parent role) the key was expected in
        record: String,
        /// Missing trait key
        key: String,
    },

    /// A resolved record lacks a field the configured computation needs
    #[error("Insufficient pedigree data: {record} has no '{field}' value")]
    MissingField {
        /// Record the field was expected in
        record: String,
        /// Missing field name
        field: String,
    },

    /// Weight configuration rejected at load time
    #[error("Invalid weights: {0}")]
    InvalidWeights(String),

    /// Unparsable user input (surface, distance, trait name)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Dataset is malformed (missing columns, wrong shape)
    #[error("Storage error: {0}")]
    StorageError(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Arrow CSV reader error
    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    /// Configuration JSON error
    #[error("Config error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// True for unresolved horse/stallion names.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// True when a record resolved but lacks data the engine needs.
    #[must_use]
    pub const fn is_insufficient_data(&self) -> bool {
        matches!(self, Self::MissingKey { .. } | Self::MissingField { .. })
    }
}
