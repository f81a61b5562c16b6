//! Error types for the fluid value engine
//!
//! Most engine paths degrade instead of failing: value parsing yields
//! `None` and overlay operations yield `false`. The variants below cover the
//! places where a typed failure is useful to a caller, such as loading
//! preset records or validating configuration.

use thiserror::Error;

/// Result type alias for fluid engine operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for the fluid engine
#[derive(Error, Debug)]
pub enum Error {
    /// A token value could not be parsed into magnitude and unit
    #[error("Invalid value: {0}")]
    InvalidValue(String),

    /// A screen range whose maximum is not above its minimum
    #[error("Degenerate screen range: max {max}px must be greater than min {min}px")]
    DegenerateRange {
        /// Lower screen width in px
        min: u32,
        /// Upper screen width in px
        max: u32,
    },

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Preset store errors
    #[error("Preset store error: {0}")]
    Store(String),

    /// Record not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with context
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an invalid value error
    pub fn invalid_value(msg: impl Into<String>) -> Self {
        Self::InvalidValue(msg.into())
    }

    /// Create a degenerate range error
    pub fn degenerate_range(min: u32, max: u32) -> Self {
        Self::DegenerateRange { min, max }
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a preset store error
    pub fn store(msg: impl Into<String>) -> Self {
        Self::Store(msg.into())
    }

    /// Create a "not found" error
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }
}

/// Helper for converting anyhow::Error to our Error type
impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Self::Other(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_degenerate_range_message() {
        let err = Error::degenerate_range(1920, 360);
        assert_eq!(
            err.to_string(),
            "Degenerate screen range: max 360px must be greater than min 1920px"
        );
    }

    #[test]
    fn test_anyhow_conversion() {
        let err: Error = anyhow::anyhow!("boom").into();
        assert!(matches!(err, Error::Other(ref msg) if msg == "boom"));
    }
}
