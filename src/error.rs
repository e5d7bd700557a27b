//! Error types for the prediction-service gateway
//!
//! Errors are classified by where the request failed:
//! - NotFound: the server answered 404 for the requested key
//! - Transport: no usable response was obtained (unreachable, timeout)
//! - Application: the server responded but flagged failure in its envelope
//! - Malformed: the body did not match the expected envelope

use thiserror::Error;

/// Failure taxonomy for calls to the prediction/statistics service.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("resource not found")]
    NotFound,

    #[error("transport failure: {0}")]
    Transport(String),

    #[error("server reported failure: {0}")]
    Application(String),

    #[error("malformed response: {0}")]
    Malformed(String),
}

impl ApiError {
    /// The message shown to the user for this failure.
    ///
    /// Malformed payloads are presented as transport failures: from the
    /// user's point of view no usable response arrived. The distinct
    /// variant survives for logging.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::NotFound => "Postal code not found. Please try again.".to_string(),
            ApiError::Transport(_) | ApiError::Malformed(_) => {
                "Failed to connect to the server. Please try again later.".to_string()
            }
            ApiError::Application(message) => message.clone(),
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        ApiError::Transport(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_uses_fixed_message() {
        assert_eq!(
            ApiError::NotFound.user_message(),
            "Postal code not found. Please try again."
        );
    }

    #[test]
    fn malformed_presents_as_transport() {
        let malformed = ApiError::Malformed("unexpected token".to_string());
        let transport = ApiError::Transport("connection refused".to_string());
        assert_eq!(malformed.user_message(), transport.user_message());
    }

    #[test]
    fn application_surfaces_server_message() {
        let err = ApiError::Application("No matching data found".to_string());
        assert_eq!(err.user_message(), "No matching data found");
    }
}
