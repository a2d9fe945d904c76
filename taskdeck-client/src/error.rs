/// Error handling for the Taskdeck client
///
/// This module provides the unified error type every client operation
/// returns. Transport failures are classified by HTTP status into the
/// variants below; local failures (validation, mutation conflicts, policy
/// denials) use their own variants and never reach the network.
///
/// All payloads are plain strings so the error is `Clone`; the cache layer
/// fans a single in-flight result out to every waiter, which requires
/// cloning the error as well as the data.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Client result type alias
pub type ClientResult<T> = Result<T, ClientError>;

/// Field-level validation error detail
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    /// Field that failed validation
    pub field: String,

    /// Error message
    pub message: String,
}

/// Error body shape the API uses for non-2xx responses
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Error code (e.g., "bad_request", "unauthorized")
    #[serde(default)]
    pub error: Option<String>,

    /// Human-readable error message
    #[serde(default)]
    pub message: Option<String>,

    /// Optional field-level validation errors
    #[serde(default)]
    pub details: Option<Vec<FieldError>>,
}

/// Unified client error type
#[derive(Debug, Clone, Error)]
pub enum ClientError {
    /// HTTP 401: the session is no longer valid
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// HTTP 403: the action is not permitted for this user
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Field-level validation failure, local or from a 4xx response body
    #[error("Validation failed: {} error(s)", .0.len())]
    Validation(Vec<FieldError>),

    /// HTTP 5xx
    #[error("Server error ({status}): {message}")]
    Server {
        /// HTTP status code
        status: u16,
        /// Server-provided or fallback message
        message: String,
    },

    /// Any other non-2xx response
    #[error("Request failed ({status}): {message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Server-provided or fallback message
        message: String,
    },

    /// Network-level failure (connection refused, DNS, TLS, ...)
    #[error("Network error: {0}")]
    Network(String),

    /// The request exceeded the configured timeout
    #[error("Request timed out after {0} seconds")]
    Timeout(u64),

    /// A 2xx body did not match the expected shape
    #[error("Failed to decode response: {0}")]
    Decode(String),

    /// A mutation for the same entity is still in flight
    #[error("Another change to this {kind} is still in progress")]
    MutationInFlight {
        /// Entity kind being mutated
        kind: String,
        /// Entity id being mutated
        id: String,
    },
}

impl ClientError {
    /// Builds the error for a non-2xx response
    ///
    /// Classification mirrors the transport contract: 401 and 403 get their
    /// own variants, 5xx is a server error, a 4xx body carrying field
    /// details becomes a validation error, and anything else keeps the
    /// server message when one is present.
    pub fn from_status(status: u16, body: Option<ErrorBody>) -> Self {
        let message = body
            .as_ref()
            .and_then(|b| b.message.clone())
            .unwrap_or_else(|| "An unexpected error occurred".to_string());

        match status {
            401 => ClientError::Unauthorized(message),
            403 => ClientError::Forbidden(message),
            s if s >= 500 => ClientError::Server { status, message },
            _ => {
                if let Some(details) = body.and_then(|b| b.details).filter(|d| !d.is_empty()) {
                    ClientError::Validation(details)
                } else {
                    ClientError::Api { status, message }
                }
            }
        }
    }

    /// The message a notification for this error should carry
    pub fn notice_message(&self) -> String {
        match self {
            ClientError::Unauthorized(_) => "Session expired. Please login again.".to_string(),
            ClientError::Forbidden(_) => "Access denied. Insufficient permissions.".to_string(),
            ClientError::Server { .. } => "Server error. Please try again later.".to_string(),
            ClientError::Api { message, .. } => message.clone(),
            ClientError::Validation(details) => details
                .first()
                .map(|d| d.message.clone())
                .unwrap_or_else(|| "Validation failed".to_string()),
            ClientError::Network(_) | ClientError::Timeout(_) => {
                "Network error. Please check your connection.".to_string()
            }
            ClientError::Decode(_) => "An unexpected error occurred".to_string(),
            other => other.to_string(),
        }
    }
}

impl From<validator::ValidationErrors> for ClientError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut details = Vec::new();
        for (field, field_errors) in errors.field_errors() {
            for error in field_errors {
                details.push(FieldError {
                    field: field.to_string(),
                    message: error
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("Invalid value for {}", field)),
                });
            }
        }
        ClientError::Validation(details)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_classification() {
        assert!(matches!(
            ClientError::from_status(401, None),
            ClientError::Unauthorized(_)
        ));
        assert!(matches!(
            ClientError::from_status(403, None),
            ClientError::Forbidden(_)
        ));
        assert!(matches!(
            ClientError::from_status(500, None),
            ClientError::Server { status: 500, .. }
        ));
        assert!(matches!(
            ClientError::from_status(404, None),
            ClientError::Api { status: 404, .. }
        ));
    }

    #[test]
    fn test_server_message_is_kept() {
        let body = ErrorBody {
            error: Some("conflict".to_string()),
            message: Some("Email already exists".to_string()),
            details: None,
        };

        let err = ClientError::from_status(409, Some(body));
        match err {
            ClientError::Api { status, message } => {
                assert_eq!(status, 409);
                assert_eq!(message, "Email already exists");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_details_become_validation_error() {
        let body = ErrorBody {
            error: Some("validation_error".to_string()),
            message: Some("Request validation failed".to_string()),
            details: Some(vec![FieldError {
                field: "email".to_string(),
                message: "Invalid email format".to_string(),
            }]),
        };

        let err = ClientError::from_status(422, Some(body));
        match err {
            ClientError::Validation(details) => {
                assert_eq!(details.len(), 1);
                assert_eq!(details[0].field, "email");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_notice_messages() {
        assert_eq!(
            ClientError::Unauthorized("nope".to_string()).notice_message(),
            "Session expired. Please login again."
        );
        assert_eq!(
            ClientError::Forbidden("nope".to_string()).notice_message(),
            "Access denied. Insufficient permissions."
        );
        assert_eq!(
            ClientError::Server { status: 502, message: "bad gateway".to_string() }.notice_message(),
            "Server error. Please try again later."
        );
        assert_eq!(
            ClientError::Api { status: 404, message: "Board not found".to_string() }.notice_message(),
            "Board not found"
        );
    }

    #[test]
    fn test_validation_errors_convert() {
        use validator::Validate;

        #[derive(Validate)]
        struct Form {
            #[validate(length(min = 1, message = "Title is required"))]
            title: String,
        }

        let err: ClientError = Form { title: String::new() }.validate().unwrap_err().into();
        match err {
            ClientError::Validation(details) => {
                assert_eq!(details[0].field, "title");
                assert_eq!(details[0].message, "Title is required");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
