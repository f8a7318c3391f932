//! Error types for fixture mapping, emission, loading and validation.

use std::path::PathBuf;
use thiserror::Error;

/// Errors while mapping records into a document tree.
#[derive(Debug, Error)]
pub enum MapError {
    #[error("expected a sequence of records, got {actual}")]
    NotASequence { actual: &'static str },

    #[error("cannot encode field \"{tag}\": {source}")]
    Encode {
        tag: String,
        #[source]
        source: serde_json::Error,
    },
}

impl MapError {
    /// Returns the exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        2
    }
}

/// Errors while writing a document to a response.
#[derive(Debug, Error)]
pub enum EmitError {
    #[error(transparent)]
    Map(#[from] MapError),

    /// The head has already been written when this occurs.
    #[error("cannot encode response body: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("cannot write response: {0}")]
    Io(#[from] std::io::Error),
}

impl EmitError {
    /// Returns the exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            EmitError::Map(e) => e.exit_code(),
            EmitError::Encode(_) => 2,
            EmitError::Io(_) => 3,
        }
    }
}

/// Errors while loading records, descriptors and documents.
#[derive(Debug, Error)]
pub enum LoadError {
    // IO errors (exit code 3)
    #[error("file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("cannot read {path}: {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[cfg(feature = "remote")]
    #[error("failed to fetch {url}: {source}")]
    NetworkError {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    // Parse errors (exit code 2)
    #[error("invalid JSON: {source}")]
    InvalidJson {
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid descriptor: {source}")]
    InvalidDescriptor {
        #[source]
        source: serde_json::Error,
    },
}

impl LoadError {
    /// Returns the exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            LoadError::FileNotFound { .. } | LoadError::ReadError { .. } => 3,
            #[cfg(feature = "remote")]
            LoadError::NetworkError { .. } => 3,
            _ => 2,
        }
    }
}

/// Errors during document validation.
#[derive(Debug, Error)]
pub enum ValidateError {
    #[error("invalid schema: {message}")]
    InvalidSchema { message: String },

    #[error("validation failed with {} error(s)", errors.len())]
    Invalid { errors: Vec<SchemaError> },
}

/// Single validation error with path context.
#[derive(Debug, Clone, serde::Serialize)]
pub struct SchemaError {
    /// JSON Pointer (RFC 6901) to the invalid member.
    pub path: String,
    /// Human-readable error message.
    pub message: String,
}

impl std::fmt::Display for SchemaError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

impl ValidateError {
    /// Returns the exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            ValidateError::InvalidSchema { .. } => 2,
            ValidateError::Invalid { .. } => 1,
        }
    }
}
