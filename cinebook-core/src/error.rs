//! Error types shared across the booking flow.
use thiserror::Error;

/// Failure reading or writing the key-value store backing the flow.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Storage error: {0}")]
    Backend(String),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl StoreError {
    /// Wrap a backend-specific error.
    pub fn backend(err: impl std::fmt::Display) -> Self {
        Self::Backend(err.to_string())
    }
}

/// User input that cannot be accepted. Never mutates state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please select at least one seat")]
    NoSeatsSelected,
    #[error("Please enter a valid email address")]
    InvalidEmail,
    #[error("Booking total {stored} does not match seat prices {expected}")]
    TotalMismatch { stored: i64, expected: i64 },
    #[error("Booking has no booking id")]
    MissingBookingId,
}

/// Failure talking to the remote movie/booking API.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GatewayError {
    /// Network failure, timeout, or no backend configured.
    #[error("Backend unavailable: {0}")]
    Unavailable(String),
    #[error("Not authorized")]
    Unauthorized,
    #[error("Request failed with status {status}: {message}")]
    Status { status: u16, message: String },
    #[error("Unexpected response: {0}")]
    Decode(String),
    /// The backend (or mock) refused the request, e.g. bad credentials.
    #[error("{0}")]
    Rejected(String),
}

impl GatewayError {
    /// Whether the failure means the backend could not be reached at all.
    #[must_use]
    pub const fn is_unavailable(&self) -> bool {
        matches!(self, Self::Unavailable(_))
    }
}

/// Configuration text that could not be parsed.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Failure while advancing a flow screen.
#[derive(Debug, Error)]
pub enum FlowError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Store(#[from] StoreError),
}
