use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use ts_rs::TS;
use utoipa::ToSchema;

use crate::{entity::Entity, repository::RepositoryError};

/// ErrorBody
///
/// The structured JSON body of every error response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct ErrorBody {
    /// Error kind, e.g. `EntityNotFoundException`.
    #[serde(rename = "type")]
    pub error_type: String,
    pub message: String,
}

/// ApiError
///
/// Every failure a handler or middleware can surface to the client.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{entity} with id {id} not found")]
    EntityNotFound { entity: &'static str, id: String },

    #[error("Required request parameter '{0}' is not present")]
    MissingParameter(&'static str),

    #[error("{0}")]
    BadRequest(String),

    #[error("Access is denied")]
    AccessDenied,

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl ApiError {
    pub fn not_found<E: Entity>(id: &E::Id) -> Self {
        ApiError::EntityNotFound {
            entity: E::NAME,
            id: id.to_string(),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::EntityNotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::MissingParameter(_) | ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::AccessDenied => StatusCode::FORBIDDEN,
            ApiError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn error_type(&self) -> &'static str {
        match self {
            ApiError::EntityNotFound { .. } => "EntityNotFoundException",
            ApiError::MissingParameter(_) => "MissingParameterException",
            ApiError::BadRequest(_) => "BadRequestException",
            ApiError::AccessDenied => "AccessDeniedException",
            ApiError::Repository(_) => "RepositoryException",
        }
    }

    pub fn body(&self) -> ErrorBody {
        let message = match self {
            // Store failures are logged in full but never leaked to the client.
            ApiError::Repository(_) => "Internal server error".to_string(),
            other => other.to_string(),
        };
        ErrorBody {
            error_type: self.error_type().to_string(),
            message,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::Repository(e) = &self {
            tracing::error!("repository error: {:?}", e);
        }
        (self.status_code(), Json(self.body())).into_response()
    }
}
