//! Error mapping for the HTTP surface

use crate::error::CreditError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error(transparent)]
    Pipeline(#[from] CreditError),
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ServerError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            ServerError::Pipeline(err) => match err {
                // Caller-fixable problems keep their message
                CreditError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
                CreditError::Schema(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
                other => {
                    tracing::error!(detail = %other, "Prediction failed");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "Prediction failed. Check server logs for details.".to_string(),
                    )
                }
            },
        };

        let body = Json(json!({
            "error": true,
            "message": message,
        }));

        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, ServerError>;
