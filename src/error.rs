use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum StoreError {
    #[error("{0}")]
    InvalidInput(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Malformed payload: {0}")]
    MalformedPayload(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::MalformedPayload { .. } => StatusCode::BAD_REQUEST,
            AppError::Store(StoreError::InvalidInput { .. }) => StatusCode::BAD_REQUEST,
            AppError::Store(StoreError::NotFound { .. }) => StatusCode::NOT_FOUND,
            AppError::Store(StoreError::Conflict { .. }) => StatusCode::CONFLICT,
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::MalformedPayload(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        (self.status(), self.to_string()).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (AppError::MalformedPayload("eof".into()), StatusCode::BAD_REQUEST),
            (StoreError::InvalidInput("x".into()).into(), StatusCode::BAD_REQUEST),
            (StoreError::NotFound("x".into()).into(), StatusCode::NOT_FOUND),
            (StoreError::Conflict("x".into()).into(), StatusCode::CONFLICT),
        ];

        for (error, status) in cases {
            assert_eq!(error.status(), status);
            assert_eq!(error.into_response().status(), status);
        }
    }

    #[test]
    fn test_store_message_is_passed_through() {
        let error = AppError::from(StoreError::NotFound("User 'u1' not found".into()));

        assert_eq!(error.to_string(), "User 'u1' not found");
    }
}
