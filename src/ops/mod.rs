//! Operation handlers for the request types the service understands.
//!
//! Each handler is a pure function from a validated request to a response;
//! failures come back as [`OpError`] and are rendered by the dispatcher.

pub mod echo;
pub mod math;
pub mod quizgame;
pub mod strings;

use crate::message::FieldError;

/// Handler failure
#[derive(Debug)]
pub enum OpError {
    /// A required field was missing or mistyped
    Field(FieldError),
    /// Input was well-formed but violated an operation rule
    Domain(String),
}

impl From<FieldError> for OpError {
    fn from(e: FieldError) -> Self {
        OpError::Field(e)
    }
}

impl std::fmt::Display for OpError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OpError::Field(e) => write!(f, "{}", e),
            OpError::Domain(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for OpError {}
