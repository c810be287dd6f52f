use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use common::types::MessageBody;
use models::errors::ModelError;
use service::errors::ServiceError;
use thiserror::Error;
use tracing::error;

/// Body of every 500; the cause goes to the log only.
pub const INTERNAL_ERROR_MESSAGE: &str = "Erro interno do servidor";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    NotFound(String),
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<ServiceError> for ApiError {
    fn from(e: ServiceError) -> Self {
        match e {
            ServiceError::NotFound(m) => ApiError::NotFound(m),
            ServiceError::Validation(m) | ServiceError::Conflict(m) => ApiError::BadRequest(m),
            ServiceError::Model(ModelError::Validation(m)) => ApiError::BadRequest(m),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rej: JsonRejection) -> Self {
        ApiError::BadRequest(format!("Corpo da requisição inválido: {}", rej.body_text()))
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rej: QueryRejection) -> Self {
        ApiError::BadRequest(format!("Parâmetros de consulta inválidos: {}", rej.body_text()))
    }
}

impl From<PathRejection> for ApiError {
    fn from(rej: PathRejection) -> Self {
        ApiError::BadRequest(format!("Parâmetro de rota inválido: {}", rej.body_text()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::BadRequest(message) => (StatusCode::BAD_REQUEST, Json(MessageBody::new(message))).into_response(),
            ApiError::NotFound(message) => (StatusCode::NOT_FOUND, Json(MessageBody::new(message))).into_response(),
            ApiError::Internal(cause) => {
                error!(error = %cause, "unhandled error while serving request");
                (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR_MESSAGE).into_response()
            }
        }
    }
}
