use thiserror::Error;

/// Service-level error types
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Location not found: {0}")]
    LocationNotFound(String),

    #[error("Provider unavailable: {0}")]
    ProviderUnavailable(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
