//! Error types for Sakila backend operations

use thiserror::Error;

/// Failures surfaced by a [`crate::SakilaApi`] call.
///
/// `Display` is what the user sees in a blocking notification, so the
/// `Server` variant renders the backend's message verbatim.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ApiError {
    #[error("Request failed: {0}")]
    Transport(String),

    #[error("{message}")]
    Server { status: u16, message: String },

    #[error("Unexpected response: {0}")]
    Decode(String),

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl ApiError {
    pub fn server(status: u16, message: impl Into<String>) -> Self {
        Self::Server {
            status,
            message: message.into(),
        }
    }

    /// HTTP status when the backend answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Server { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Input rejected before any request is sent.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Customer ID must be a positive whole number (got '{input}')")]
    InvalidCustomerId { input: String },

    #[error("Record has no '{field}' field")]
    MissingId { field: &'static str },

    #[error("No customer is open")]
    NoCustomerOpen,
}

pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_error_displays_message_verbatim() {
        let err = ApiError::server(400, "Email already in use");
        assert_eq!(err.to_string(), "Email already in use");
        assert_eq!(err.status(), Some(400));
    }

    #[test]
    fn validation_error_is_transparent() {
        let err: ApiError = ValidationError::InvalidCustomerId {
            input: "abc".to_string(),
        }
        .into();
        assert!(err.to_string().contains("'abc'"));
        assert_eq!(err.status(), None);
    }
}
