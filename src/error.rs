// HTTP API Error Types
use axum::{http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;
use serde_json::{json, Value};

/// A single failed rule on a request field
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    pub field: String,
    pub rule: &'static str,
}

/// HTTP API error with appropriate status codes and client-friendly messages
#[derive(Debug)]
pub enum ApiError {
    // 400 Bad Request
    BadRequest(String),
    Validation {
        message: String,
        violations: Vec<Violation>,
    },

    // 401 Unauthorized
    Unauthorized(String),

    // 403 Forbidden
    Forbidden(String),

    // 404 Not Found
    NotFound(String),

    // 409 Conflict
    Conflict(String),

    // 500 Internal Server Error
    Internal {
        message: String,
        description: Option<String>,
    },

    // 503 Service Unavailable
    ServiceUnavailable(String),
}

impl ApiError {
    /// Get HTTP status code
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Validation { .. } => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    /// Get client-safe error message
    pub fn message(&self) -> &str {
        match self {
            ApiError::BadRequest(msg) => msg,
            ApiError::Validation { message, .. } => message,
            ApiError::Unauthorized(msg) => msg,
            ApiError::Forbidden(msg) => msg,
            ApiError::NotFound(msg) => msg,
            ApiError::Conflict(msg) => msg,
            ApiError::Internal { message, .. } => message,
            ApiError::ServiceUnavailable(msg) => msg,
        }
    }

    /// Convert to JSON response body
    pub fn to_json(&self) -> Value {
        match self {
            ApiError::Validation { message, violations } => json!({
                "error": message,
                "violations": violations,
            }),
            ApiError::Internal { message, description } => {
                let mut body = json!({ "error": message });
                if let Some(description) = description {
                    body["description"] = json!(description);
                }
                body
            }
            _ => json!({ "error": self.message() }),
        }
    }
}

// Static constructor methods
impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest(message.into())
    }

    pub fn validation(message: impl Into<String>, violations: Vec<Violation>) -> Self {
        ApiError::Validation {
            message: message.into(),
            violations,
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        ApiError::Unauthorized(message.into())
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        ApiError::Forbidden(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        ApiError::Conflict(message.into())
    }

    pub fn service_unavailable(message: impl Into<String>) -> Self {
        ApiError::ServiceUnavailable(message.into())
    }

    /// Generic 500 with a resource-specific message. The underlying error is
    /// logged here and only its short class reaches the client.
    pub fn internal(message: impl Into<String>, source: &dyn ErrorClass) -> Self {
        let message = message.into();
        tracing::error!(error = %source.detail(), "{}", message);
        ApiError::Internal {
            message,
            description: source.class(),
        }
    }
}

/// Errors that can be reported as a 500 without leaking their detail.
pub trait ErrorClass {
    /// Full detail for the operational log
    fn detail(&self) -> String;

    /// Short client-safe description, if any
    fn class(&self) -> Option<String> {
        None
    }
}

impl ErrorClass for crate::database::DatabaseError {
    fn detail(&self) -> String {
        self.to_string()
    }

    fn class(&self) -> Option<String> {
        Some(self.kind().to_string())
    }
}

impl ErrorClass for crate::auth::TokenError {
    fn detail(&self) -> String {
        self.to_string()
    }
}

impl ErrorClass for crate::auth::PasswordError {
    fn detail(&self) -> String {
        self.to_string()
    }
}

impl ErrorClass for crate::services::mailer::MailError {
    fn detail(&self) -> String {
        self.to_string()
    }

    fn class(&self) -> Option<String> {
        Some("mail delivery failed".to_string())
    }
}

// Standard error trait implementations
impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for ApiError {}

// Automatic HTTP response conversion for Axum
impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        if self.status_code().is_client_error() {
            tracing::debug!(status = %self.status_code(), "{}", self.message());
        }
        (self.status_code(), Json(self.to_json())).into_response()
    }
}
