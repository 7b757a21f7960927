//! Error-to-HTTP mapping.
//!
//! Every failure becomes a well-formed JSON body; the taxonomy picks the
//! status code. Nothing crashes the process.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use patchbay_github::GatewayError;
use patchbay_providers::CompletionError;
use patchbay_tools::ToolError;
use serde_json::json;

#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    pub fn not_configured(what: &str) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: format!("{what} not configured"),
        }
    }

    /// Body shape for the execute-tool endpoint, which always reports a
    /// `success` flag.
    pub fn into_tool_response(self) -> Response {
        (
            self.status,
            Json(json!({"success": false, "error": self.message})),
        )
            .into_response()
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({"error": self.message}))).into_response()
    }
}

impl From<GatewayError> for ApiError {
    fn from(err: GatewayError) -> Self {
        let status = match &err {
            GatewayError::FileNotFound { .. } => StatusCode::NOT_FOUND,
            GatewayError::WriteConflict { .. } | GatewayError::BranchConflict { .. } => {
                StatusCode::CONFLICT
            }
            GatewayError::Http { .. } | GatewayError::Transport(_) => StatusCode::BAD_GATEWAY,
            GatewayError::Decode { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self {
            status,
            message: err.to_string(),
        }
    }
}

impl From<CompletionError> for ApiError {
    fn from(err: CompletionError) -> Self {
        let status = match &err {
            CompletionError::Timeout => StatusCode::GATEWAY_TIMEOUT,
            CompletionError::UpstreamHttp { .. }
            | CompletionError::Transport(_)
            | CompletionError::MalformedResponse(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self {
            status,
            message: err.to_string(),
        }
    }
}

impl From<ToolError> for ApiError {
    fn from(err: ToolError) -> Self {
        match err {
            ToolError::InvalidArguments { .. } | ToolError::UnknownTool(_) => Self {
                status: StatusCode::BAD_REQUEST,
                message: err.to_string(),
            },
            ToolError::Gateway(gateway) => gateway.into(),
        }
    }
}
