//! Error types for the engine facade.

use thiserror::Error;

/// Errors that can occur when building or rebuilding an engine.
///
/// Queries themselves never fail: unknown elements and exhausted searches
/// produce empty results, not errors.
#[derive(Debug, Error)]
pub enum Error {
    /// The catalog could not be loaded or parsed.
    #[error("catalog error: {0}")]
    Catalog(#[from] athanor_core::CoreError),
}

/// A specialized `Result` type for engine operations.
pub type Result<T> = std::result::Result<T, Error>;
