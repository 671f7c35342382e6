use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::shared::types::ApiResponse;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Conflict: {0}")]
    Conflict(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message, errors) = match self {
            AppError::Database(ref e) => {
                tracing::error!("Database error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Database error occurred".to_string(),
                    None,
                )
            }
            AppError::NotFound(ref msg) => (StatusCode::NOT_FOUND, msg.clone(), None),
            AppError::Validation(ref msg) => (
                StatusCode::BAD_REQUEST,
                msg.clone(),
                Some(vec![msg.clone()]),
            ),
            AppError::BadRequest(ref msg) => (StatusCode::BAD_REQUEST, msg.clone(), None),
            AppError::Internal(ref msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                    None,
                )
            }
            AppError::Unauthorized(ref msg) => (StatusCode::UNAUTHORIZED, msg.clone(), None),
            AppError::Forbidden(ref msg) => (StatusCode::FORBIDDEN, msg.clone(), None),
            AppError::Conflict(ref msg) => (StatusCode::CONFLICT, msg.clone(), None),
        };

        let body = Json(ApiResponse::<()>::error(Some(message), errors));

        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{routing::get, Router};
    use axum_test::TestServer;

    async fn conflict() -> Result<()> {
        Err(AppError::Conflict(
            "Duplicate report of incident INC-20240301-A1B2C3".to_string(),
        ))
    }

    async fn forbidden() -> Result<()> {
        Err(AppError::Forbidden(
            "Cannot transition incident from closed to open".to_string(),
        ))
    }

    async fn not_found() -> Result<()> {
        Err(AppError::NotFound(
            "Incident INC-20240301-XXXXXX not found".to_string(),
        ))
    }

    async fn validation() -> Result<()> {
        Err(AppError::Validation("Location is required".to_string()))
    }

    fn test_router() -> Router {
        Router::new()
            .route("/conflict", get(conflict))
            .route("/forbidden", get(forbidden))
            .route("/not-found", get(not_found))
            .route("/validation", get(validation))
    }

    #[tokio::test]
    async fn error_kinds_map_to_distinct_status_codes() {
        let server = TestServer::new(test_router()).unwrap();

        server
            .get("/conflict")
            .await
            .assert_status(StatusCode::CONFLICT);
        server
            .get("/forbidden")
            .await
            .assert_status(StatusCode::FORBIDDEN);
        server
            .get("/not-found")
            .await
            .assert_status(StatusCode::NOT_FOUND);
        server
            .get("/validation")
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn conflict_body_names_existing_incident() {
        let server = TestServer::new(test_router()).unwrap();

        let response = server.get("/conflict").await;
        let body: serde_json::Value = response.json();
        assert_eq!(body["success"], false);
        assert!(body["message"]
            .as_str()
            .unwrap()
            .contains("INC-20240301-A1B2C3"));
    }
}
