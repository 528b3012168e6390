use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use crew_core::error::CrewError;

/// Private sentinel carrying an explicit 404 through the `anyhow::Error`
/// chain without a matching `CrewError` variant.
#[derive(Debug)]
struct NotFoundError(String);

impl std::fmt::Display for NotFoundError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for NotFoundError {}

/// Unified error type for HTTP responses.
#[derive(Debug)]
pub struct AppError(pub anyhow::Error);

impl AppError {
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self(NotFoundError(msg.into()).into())
    }
}

fn status_for(e: &CrewError) -> StatusCode {
    match e {
        CrewError::AgentNotFound(_) | CrewError::SkillNotFound(_) | CrewError::NoAgents(_) => {
            StatusCode::NOT_FOUND
        }
        CrewError::AgentExists(_) => StatusCode::CONFLICT,
        CrewError::InvalidName(_) => StatusCode::BAD_REQUEST,
        CrewError::ClaudeUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        CrewError::Generation { .. } | CrewError::Extraction(_) | CrewError::Claude(_) => {
            StatusCode::BAD_GATEWAY
        }
        CrewError::Render(_)
        | CrewError::HomeNotFound
        | CrewError::Io(_)
        | CrewError::Http(_)
        | CrewError::Yaml(_)
        | CrewError::Json(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if let Some(n) = self.0.downcast_ref::<NotFoundError>() {
            let body = serde_json::json!({ "error": n.0.clone() });
            return (StatusCode::NOT_FOUND, axum::Json(body)).into_response();
        }

        let status = self
            .0
            .downcast_ref::<CrewError>()
            .map(status_for)
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        if status.is_server_error() {
            tracing::error!(error = %format!("{:#}", self.0), "request failed");
        }
        let body = serde_json::json!({ "error": format!("{:#}", self.0) });
        (status, axum::Json(body)).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}
