use thiserror::Error;

/// Errors emitted while producing synthetic schemas and values.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("unknown generator label '{0}'")]
    UnknownLabel(String),
    #[error("unknown column '{0}'")]
    UnknownColumn(String),
}
