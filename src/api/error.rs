use axum::{
    extract::{rejection::PathRejection, FromRequestParts},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use tracing::error;

use crate::model::ErrorBody;

pub const STORAGE_ERROR_MESSAGE: &str = "Database error";

#[derive(Debug)]
pub enum ApiError {
    /// Bad input, rejected before touching the database
    Validation(String),
    Storage(anyhow::Error),
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::Validation(rejection.body_text())
    }
}

/// `Path` whose rejections answer with the json error body.
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ApiError))]
pub struct ApiPath<T>(pub T);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Validation(message) => {
                (StatusCode::BAD_REQUEST, Json(ErrorBody::new(message))).into_response()
            }
            ApiError::Storage(err) => {
                error!("storage error: {:#}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorBody::new(STORAGE_ERROR_MESSAGE)),
                )
                    .into_response()
            }
        }
    }
}
