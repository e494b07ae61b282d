//! Transport-level failures. Engine failures never get here: they are reported in-band.

use axum::async_trait;
use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, Request};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::de::DeserializeOwned;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid request body: {0}")]
    Validation(#[from] JsonRejection),
    #[error("not found")]
    NotFound,
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::NotFound => StatusCode::NOT_FOUND,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            ApiError::Validation(rejection) => json!({
                "detail": [{
                    "loc": ["body"],
                    "msg": rejection.body_text(),
                    "type": rejection_kind(rejection),
                }]
            }),
            ApiError::NotFound => json!({ "detail": "Not Found" }),
        };
        (status, Json(body)).into_response()
    }
}

fn rejection_kind(rejection: &JsonRejection) -> &'static str {
    match rejection {
        JsonRejection::JsonDataError(_) => "value_error",
        JsonRejection::JsonSyntaxError(_) => "json_invalid",
        JsonRejection::MissingJsonContentType(_) => "content_type",
        _ => "body_error",
    }
}

/// `Json` extractor whose rejection is an [`ApiError`].
pub struct ApiJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        Ok(ApiJson(value))
    }
}
