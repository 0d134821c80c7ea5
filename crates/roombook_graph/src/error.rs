// --- File: crates/roombook_graph/src/error.rs ---
use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use roombook_common::{HttpStatusCode, RoombookError};
use thiserror::Error;

pub const IDENTITY_SERVICE: &str = "Microsoft Entra ID";
pub const GRAPH_SERVICE: &str = "Microsoft Graph";

/// Failure to obtain a bearer credential from the identity service.
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("token request rejected with status {status}: {body}")]
    Rejected { status: u16, body: String },

    #[error("identity service unreachable: {0}")]
    Unreachable(#[from] reqwest::Error),

    #[error("token response could not be parsed: {0}")]
    InvalidResponse(String),

    #[error("token response did not contain an access_token")]
    MissingAccessToken,
}

/// Failure of a Graph operation.
#[derive(Error, Debug)]
pub enum GraphError {
    #[error("Token acquisition failed: {0}")]
    Auth(#[from] AuthError),

    #[error("Graph request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Non-success status from Graph. The body is kept verbatim.
    #[error("Graph API returned {status}: {body}")]
    Upstream {
        status: u16,
        body: String,
        content_type: Option<String>,
    },

    #[error("Unexpected Graph response: {0}")]
    UnexpectedResponse(String),

    #[error("Graph client misconfigured: {0}")]
    Config(String),
}

impl From<GraphError> for RoombookError {
    fn from(err: GraphError) -> Self {
        match err {
            GraphError::Auth(AuthError::Unreachable(e)) if e.is_timeout() => {
                roombook_common::timeout_error(format!("{}: {}", IDENTITY_SERVICE, e))
            }
            GraphError::Auth(e) => roombook_common::external_service_error(IDENTITY_SERVICE, e),
            GraphError::Request(e) if e.is_timeout() => {
                roombook_common::timeout_error(format!("{}: {}", GRAPH_SERVICE, e))
            }
            GraphError::Request(e) => roombook_common::external_service_error(GRAPH_SERVICE, e),
            e @ GraphError::Upstream { .. } => {
                roombook_common::external_service_error(GRAPH_SERVICE, e)
            }
            GraphError::UnexpectedResponse(msg) => {
                roombook_common::external_service_error(GRAPH_SERVICE, msg)
            }
            GraphError::Config(msg) => roombook_common::config_error(msg),
        }
    }
}

impl HttpStatusCode for GraphError {
    fn status_code(&self) -> u16 {
        match self {
            GraphError::Auth(AuthError::Unreachable(e)) if e.is_timeout() => 504,
            GraphError::Auth(_) => 502,
            GraphError::Request(e) if e.is_timeout() => 504,
            GraphError::Request(_) => 502,
            GraphError::Upstream { status, .. } => *status,
            GraphError::UnexpectedResponse(_) => 502,
            GraphError::Config(_) => 500,
        }
    }
}

impl IntoResponse for GraphError {
    fn into_response(self) -> Response {
        match self {
            GraphError::Upstream {
                status,
                body,
                content_type,
            } => {
                let status = StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY);
                let content_type =
                    content_type.unwrap_or_else(|| "application/json".to_string());
                (status, [(header::CONTENT_TYPE, content_type)], body).into_response()
            }
            other => RoombookError::from(other).into_response(),
        }
    }
}
