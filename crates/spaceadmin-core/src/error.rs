//! Error types for the `spaceadmin` client

use thiserror::Error;

/// Banner shown when the request never reached the backend
pub const NETWORK_ERROR_MESSAGE: &str = "Network error. Please check your connection and try again.";

/// Banner shown when the backend rejected a request without a usable message
pub const GENERIC_ERROR_MESSAGE: &str = "Something went wrong. Please try again.";

/// Banner shown when a response does not have the expected shape
pub const UNEXPECTED_RESPONSE_MESSAGE: &str = "Unexpected response from the server.";

/// Main error type for the `spaceadmin` client
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration error
    #[error("Configuration error: {message}")]
    Configuration {
        /// Error message
        message: String,
    },

    /// Form validation error
    #[error("Validation error: {field} - {message}")]
    Validation {
        /// Field that failed validation
        field: String,
        /// Validation error message
        message: String,
    },

    /// The request could not be sent or no response arrived
    #[error("Network error: {0}")]
    Network(String),

    /// The backend answered with a non-success status
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Server-provided message, or the generic fallback
        message: String,
    },

    /// The response body did not match the endpoint's declared shape
    #[error("Unexpected response from {endpoint}: {message}")]
    Decode {
        /// Endpoint that produced the body
        endpoint: String,
        /// Decoder message
        message: String,
    },

    /// Persistent session storage failed
    #[error("Storage error: {0}")]
    Storage(String),

    /// No authenticated session
    #[error("Not authenticated")]
    Unauthenticated,

    /// The session lacks the permission for an action
    #[error("Permission denied: {action} on {module}")]
    Forbidden {
        /// Module name
        module: String,
        /// Action name
        action: String,
    },

    /// The request was cancelled before it completed
    #[error("Request cancelled")]
    Cancelled,

    /// Not found error
    #[error("Resource not found: {resource}")]
    NotFound {
        /// Resource that was not found
        resource: String,
    },
}

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Build an API error, falling back to the generic message when the
    /// server did not provide one
    #[must_use]
    pub fn api(status: u16, message: Option<String>) -> Self {
        let message = message
            .map(|m| m.trim().to_string())
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| GENERIC_ERROR_MESSAGE.to_string());
        Self::Api { status, message }
    }

    /// Create a new decode error
    #[must_use]
    pub fn decode<E: Into<String>, M: Into<String>>(endpoint: E, message: M) -> Self {
        Self::Decode {
            endpoint: endpoint.into(),
            message: message.into(),
        }
    }

    /// Create a new validation error
    #[must_use]
    pub fn validation<F: Into<String>, M: Into<String>>(field: F, message: M) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a new configuration error
    #[must_use]
    pub fn configuration<S: Into<String>>(message: S) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Text for the inline alert banner of a page
    #[must_use]
    pub fn banner_message(&self) -> String {
        match self {
            Self::Network(_) => NETWORK_ERROR_MESSAGE.to_string(),
            Self::Api { message, .. } => message.clone(),
            Self::Decode { .. } => UNEXPECTED_RESPONSE_MESSAGE.to_string(),
            Self::Validation { field, message } => format!("{field}: {message}"),
            Self::Unauthenticated => "Please log in to continue.".to_string(),
            Self::Forbidden { module, action } => {
                format!("You do not have permission to {action} {module}.")
            }
            other => other.to_string(),
        }
    }

    /// Whether the error came back from the backend itself
    #[must_use]
    pub const fn is_api(&self) -> bool {
        matches!(self, Self::Api { .. })
    }
}

impl From<config::ConfigError> for Error {
    fn from(err: config::ConfigError) -> Self {
        Self::Configuration {
            message: err.to_string(),
        }
    }
}

impl From<validator::ValidationErrors> for Error {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
        fields.sort_by(|a, b| a.0.cmp(&b.0));

        let Some((field, list)) = fields.into_iter().next() else {
            return Self::validation("form", "invalid input");
        };

        let message = list
            .first()
            .and_then(|e| e.message.as_ref().map(ToString::to_string))
            .unwrap_or_else(|| "is invalid".to_string());

        Self::Validation {
            field: field.to_string(),
            message,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::missing_panics_doc)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::error::Error as StdError;
    use std::io;

    #[test]
    fn test_api_error_uses_server_message() {
        let error = Error::api(404, Some("Role not found".to_string()));
        assert_eq!(error.banner_message(), "Role not found");
        assert_eq!(error.to_string(), "API error (404): Role not found");
        assert!(error.is_api());
    }

    #[test]
    fn test_api_error_falls_back_to_generic_message() {
        assert_eq!(Error::api(500, None).banner_message(), GENERIC_ERROR_MESSAGE);
        assert_eq!(
            Error::api(500, Some("   ".to_string())).banner_message(),
            GENERIC_ERROR_MESSAGE
        );
    }

    #[test]
    fn test_network_error_banner() {
        let error = Error::Network("connection refused".to_string());
        assert_eq!(error.banner_message(), NETWORK_ERROR_MESSAGE);
        assert!(error.to_string().contains("connection refused"));
        assert!(!error.is_api());
    }

    #[test]
    fn test_decode_error_banner_hides_internals() {
        let error = Error::decode("/blog/list", "missing field `total`");
        assert_eq!(error.banner_message(), UNEXPECTED_RESPONSE_MESSAGE);
        assert!(error.to_string().contains("/blog/list"));
    }

    #[test]
    fn test_forbidden_banner() {
        let error = Error::Forbidden {
            module: "roles".to_string(),
            action: "delete".to_string(),
        };
        assert_eq!(
            error.banner_message(),
            "You do not have permission to delete roles."
        );
    }

    #[test]
    fn test_io_error_conversion_keeps_source() {
        let app_error = Error::from(io::Error::new(io::ErrorKind::PermissionDenied, "denied"));
        assert!(matches!(app_error, Error::Io(_)));
        assert!(app_error.source().is_some());
    }

    #[test]
    fn test_serialization_error_conversion() {
        let json_error = serde_json::from_str::<serde_json::Value>("{nope").unwrap_err();
        let app_error = Error::from(json_error);
        assert!(app_error.to_string().starts_with("Serialization error"));
    }

    #[test]
    fn test_validation_errors_conversion_picks_first_field() {
        use validator::{ValidationError, ValidationErrors};

        let mut errors = ValidationErrors::new();
        errors.add(
            "name",
            ValidationError::new("length").with_message("Name is required".into()),
        );
        errors.add("email", ValidationError::new("email"));

        let error = Error::from(errors);
        assert_eq!(error.banner_message(), "email: is invalid");
    }
}
