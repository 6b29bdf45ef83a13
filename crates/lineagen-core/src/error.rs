use thiserror::Error;

/// Core error type shared across lineagen crates.
#[derive(Debug, Error)]
pub enum Error {
    /// The catalog violates internal invariants.
    #[error("invalid catalog: {0}")]
    InvalidCatalog(String),
    /// Filesystem failure while loading a catalog.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience alias for results returned by lineagen crates.
pub type Result<T> = std::result::Result<T, Error>;
