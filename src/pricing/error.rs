//! Pricing error types

use std::fmt;

/// Error raised when a price string cannot be parsed or a pricing operation
/// receives an input that does not describe a valid monetary value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidPriceError {
    message: String,
}

impl InvalidPriceError {
    /// Create a new error with the given message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// The human-readable reason this price was rejected.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for InvalidPriceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid price: {}", self.message)
    }
}

impl std::error::Error for InvalidPriceError {}
