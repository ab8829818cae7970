//! Request-message validation, run before any parsing or store access.

use serde_json::Value;
use thiserror::Error;

/// Client-side input errors. Each maps to HTTP 400.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// `message` absent, `null`, `false`, `0`, or the empty string.
    #[error("Message is required")]
    MissingMessage,

    /// `message` present but not a string, or only whitespace.
    #[error("Message must be a non-empty string")]
    InvalidMessage,

    /// The request body was not a JSON document.
    #[error("Invalid request body: {0}")]
    MalformedBody(String),
}

/// Extract the `message` field from a request body.
///
/// Returns the message untrimmed; callers pass it straight to
/// [`crate::intent::parse`], which does its own trimming.
pub fn extract_message(body: &Value) -> Result<&str, ValidationError> {
    let message = match body.get("message") {
        None | Some(Value::Null) | Some(Value::Bool(false)) => {
            return Err(ValidationError::MissingMessage)
        }
        Some(Value::Number(n)) if n.as_f64() == Some(0.0) => {
            return Err(ValidationError::MissingMessage)
        }
        Some(Value::String(s)) if s.is_empty() => return Err(ValidationError::MissingMessage),
        Some(Value::String(s)) => s.as_str(),
        Some(_) => return Err(ValidationError::InvalidMessage),
    };

    if message.trim().is_empty() {
        return Err(ValidationError::InvalidMessage);
    }
    Ok(message)
}
