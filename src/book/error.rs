//! Trade book error types

use crate::pricing::InvalidPriceError;
use std::fmt;

/// Errors that can occur while operating on the trade book.
#[derive(Debug)]
#[non_exhaustive]
pub enum BookError {
    /// Error from price parsing or a pricing operation
    InvalidPrice(InvalidPriceError),

    /// External input failed validation (symbol or user format, missing
    /// product, malformed arguments at an outer entry point)
    DataValidation(String),

    /// An internal argument violated an operation's contract (mismatched
    /// side, non-positive volume where positive volume is required)
    IllegalArgument(String),

    /// The referenced user id is not registered
    UserNotFound(String),
}

impl fmt::Display for BookError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BookError::InvalidPrice(err) => write!(f, "{err}"),
            BookError::DataValidation(message) => write!(f, "data validation: {message}"),
            BookError::IllegalArgument(message) => write!(f, "illegal argument: {message}"),
            BookError::UserNotFound(user) => write!(f, "user not found: {user}"),
        }
    }
}

impl std::error::Error for BookError {}

impl From<InvalidPriceError> for BookError {
    fn from(err: InvalidPriceError) -> Self {
        BookError::InvalidPrice(err)
    }
}
