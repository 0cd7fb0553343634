use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{message}")]
    Validation {
        code: &'static str,
        message: String,
    },
    #[error("{message}")]
    NotFound {
        code: &'static str,
        message: String,
    },
    #[error("{message}")]
    Upstream { status: Option<u16>, message: String },
    #[error("unauthorized: {message}")]
    Unauthorized {
        code: &'static str,
        message: &'static str,
    },
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
    pub details: serde_json::Value,
}

impl AppError {
    pub fn validation(code: &'static str, message: impl Into<String>) -> Self {
        Self::Validation {
            code,
            message: message.into(),
        }
    }

    pub fn location_required() -> Self {
        Self::Validation {
            code: "location_required",
            message: "Location is required".to_string(),
        }
    }

    pub fn location_not_found(location: &str) -> Self {
        Self::NotFound {
            code: "location_not_found",
            message: format!("Location '{location}' not found"),
        }
    }

    pub fn session_not_found(session_id: &str) -> Self {
        Self::NotFound {
            code: "session_not_found",
            message: format!("Session '{session_id}' not found"),
        }
    }

    pub fn upstream_status(status: u16, reason: &str) -> Self {
        let message = if reason.is_empty() {
            format!("Weather service error: {status}")
        } else {
            format!("Weather service error: {status} {reason}")
        };
        Self::Upstream {
            status: Some(status),
            message,
        }
    }

    pub fn upstream_unreachable(detail: impl std::fmt::Display) -> Self {
        Self::Upstream {
            status: None,
            message: format!("Weather service request failed: {detail}"),
        }
    }

    pub fn upstream_malformed(detail: impl std::fmt::Display) -> Self {
        Self::Upstream {
            status: None,
            message: format!("Weather service returned an unreadable response: {detail}"),
        }
    }

    pub fn unauthorized(code: &'static str, message: &'static str) -> Self {
        Self::Unauthorized { code, message }
    }

    /// Message suitable for embedding in an `isError` tool result.
    pub fn tool_message(&self) -> &str {
        match self {
            Self::Validation { message, .. } => message,
            Self::NotFound { message, .. } => message,
            Self::Upstream { message, .. } => message,
            Self::Unauthorized { message, .. } => message,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            Self::Validation { code, message } => (StatusCode::BAD_REQUEST, code, message),
            Self::NotFound { code, message } => (StatusCode::NOT_FOUND, code, message),
            Self::Upstream { status, message } => {
                tracing::error!(upstream_status = ?status, error = %message, "upstream weather request failed");
                (StatusCode::BAD_GATEWAY, "upstream_error", message)
            }
            Self::Unauthorized { code, message } => {
                (StatusCode::UNAUTHORIZED, code, message.to_string())
            }
        };

        (
            status,
            Json(ErrorResponse {
                code: code.to_string(),
                message,
                details: json!({}),
            }),
        )
            .into_response()
    }
}
