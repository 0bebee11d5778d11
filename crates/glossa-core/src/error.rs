use thiserror::Error;

/// Top-level error type for Glossa.
///
/// The first five variants are the recoverable domain taxonomy surfaced to
/// callers unchanged; the rest are infrastructure faults kept distinct
/// from it.
#[derive(Debug, Error)]
pub enum GlossaError {
    /// Referenced id or (key, locale) pair does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// Uniqueness conflict on a (key, locale) pair or tag name.
    #[error("duplicate: {0}")]
    Duplicate(String),

    /// Stored version did not match the expected version on update.
    #[error("concurrent modification: {0}")]
    ConcurrentModification(String),

    /// Malformed or out-of-bound input, rejected before reaching the store.
    #[error("validation error: {0}")]
    Validation(String),

    /// The caller's role does not permit the operation.
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// Storage fault (connectivity, constraint machinery, corruption).
    #[error("storage error: {0}")]
    Storage(String),

    /// Configuration error.
    #[error("config error: {0}")]
    Config(String),

    /// I/O error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
