use axum::{
    Json,
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use uuid::Uuid;

use crate::domain::DomainError;

pub type ApiResult<T> = Result<T, ApiProblem>;

#[derive(Debug)]
pub struct ApiProblem {
    status: StatusCode,
    title: &'static str,
    detail: String,
    kind: &'static str,
    correlation_id: String,
}

impl ApiProblem {
    pub fn from_domain(error: DomainError) -> Self {
        match error {
            DomainError::Validation(detail) => Self::new(
                StatusCode::BAD_REQUEST,
                "Validation failed",
                "https://staffhub.dev/problems/validation",
                detail,
            ),
            DomainError::NotFound(detail) => Self::new(
                StatusCode::NOT_FOUND,
                "Not found",
                "https://staffhub.dev/problems/not-found",
                detail,
            ),
            DomainError::Conflict(detail) => Self::new(
                StatusCode::CONFLICT,
                "Conflict",
                "https://staffhub.dev/problems/conflict",
                detail,
            ),
            DomainError::UnsupportedFormat(mime) => Self::new(
                StatusCode::UNSUPPORTED_MEDIA_TYPE,
                "Unsupported file format",
                "https://staffhub.dev/problems/unsupported-format",
                format!("'{mime}' is not an accepted upload format"),
            ),
            err @ DomainError::EmptyFile => Self::new(
                StatusCode::BAD_REQUEST,
                "Empty file",
                "https://staffhub.dev/problems/empty-file",
                err.to_string(),
            ),
            err @ DomainError::CorruptFile(_) => Self::new(
                StatusCode::BAD_REQUEST,
                "Unreadable file",
                "https://staffhub.dev/problems/corrupt-file",
                err.to_string(),
            ),
            err @ DomainError::FileTooLarge { .. } => Self::new(
                StatusCode::PAYLOAD_TOO_LARGE,
                "File too large",
                "https://staffhub.dev/problems/file-too-large",
                err.to_string(),
            ),
            err @ DomainError::TooManyRows { .. } => Self::new(
                StatusCode::PAYLOAD_TOO_LARGE,
                "Too many rows",
                "https://staffhub.dev/problems/too-many-rows",
                err.to_string(),
            ),
            DomainError::Storage(detail) => Self::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Storage error",
                "https://staffhub.dev/problems/storage",
                detail,
            ),
            DomainError::Internal(detail) => Self::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error",
                "https://staffhub.dev/problems/internal",
                detail,
            ),
        }
    }

    pub fn validation(detail: impl Into<String>) -> Self {
        Self::new(
            StatusCode::BAD_REQUEST,
            "Validation failed",
            "https://staffhub.dev/problems/validation",
            detail,
        )
    }

    pub fn internal(detail: impl Into<String>) -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Internal server error",
            "https://staffhub.dev/problems/internal",
            detail,
        )
    }

    fn new(
        status: StatusCode,
        title: &'static str,
        kind: &'static str,
        detail: impl Into<String>,
    ) -> Self {
        Self {
            status,
            title,
            detail: detail.into(),
            kind,
            correlation_id: Uuid::new_v4().to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
struct ProblemDetails {
    #[serde(rename = "type")]
    kind: String,
    title: String,
    status: u16,
    detail: String,
    correlation_id: String,
}

impl IntoResponse for ApiProblem {
    fn into_response(self) -> Response {
        let payload = ProblemDetails {
            kind: self.kind.to_string(),
            title: self.title.to_string(),
            status: self.status.as_u16(),
            detail: self.detail,
            correlation_id: self.correlation_id,
        };

        let mut response = (self.status, Json(payload)).into_response();
        response.headers_mut().insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/problem+json"),
        );

        response
    }
}
