//! Error handling types for ant-ls
//!
//! This module provides error types used throughout the LSP server.

use thiserror::Error;

/// Comprehensive error type for server operations
#[derive(Debug, Error)]
pub enum AntLsError {
    /// Task catalog initialization failed.
    ///
    /// There is no retry and no degraded mode: without the catalog the
    /// completion processor cannot produce proposals, so the first failure
    /// is surfaced as-is to every caller.
    #[error("task catalog initialization failed")]
    Catalog(#[source] CatalogError),

    /// Document not found in store
    #[error("Document not found: {uri}")]
    DocumentNotFound { uri: String },
}

/// Failures while parsing the embedded task description table.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("malformed description entry at line {line}: {entry:?}")]
    MalformedEntry { line: usize, entry: String },

    #[error("description entry at line {line} names unknown element {name:?}")]
    UnknownElement { line: usize, name: String },

    #[error("duplicate description entry for element {name:?} at line {line}")]
    DuplicateEntry { line: usize, name: String },
}

/// Result type for server operations
pub type AntLsResult<T> = Result<T, AntLsError>;

/// Helper functions for common error patterns
impl AntLsError {
    /// Create a document not found error
    pub fn document_not_found(uri: impl Into<String>) -> Self {
        AntLsError::DocumentNotFound { uri: uri.into() }
    }
}
