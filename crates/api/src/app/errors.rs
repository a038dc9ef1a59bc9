//! The single place failures become HTTP responses.
//!
//! Every error leaves the service as the same envelope:
//! `{"success": false, "error": <status>, "message": <canonical text>}`.
//! Internal detail is logged, never echoed to the client.

use axum::extract::rejection::BytesRejection;
use axum::http::{StatusCode, header::ALLOW};
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

use coffeeshop_auth::AuthError;
use coffeeshop_core::DomainError;
use coffeeshop_infra::StoreError;

use crate::app::dto::ErrorEnvelope;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("resource not found")]
    NotFound,

    #[error("method not allowed")]
    MethodNotAllowed,

    #[error("unprocessable: {0}")]
    Unprocessable(String),

    #[error(transparent)]
    Auth(#[from] AuthError),

    /// A write the store refused.
    #[error("store rejected write: {0}")]
    Store(StoreError),

    /// A read the store could not serve.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::BadRequest(msg.into())
    }

    /// Failure while reading: nothing the client did wrong.
    pub fn read_failure(err: StoreError) -> Self {
        Self::Internal(err.to_string())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) | Self::Store(_) => StatusCode::BAD_REQUEST,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            Self::Unprocessable(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Auth(e) => {
                StatusCode::from_u16(e.status_code()).unwrap_or(StatusCode::UNAUTHORIZED)
            }
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::InvalidId(_) => Self::NotFound,
            DomainError::Validation(msg) => Self::BadRequest(msg),
        }
    }
}

/// Unreadable or oversized bodies are the client's fault: 400.
impl From<BytesRejection> for ApiError {
    fn from(rejection: BytesRejection) -> Self {
        Self::BadRequest(format!(
            "unreadable body ({}): {}",
            rejection.status(),
            rejection.body_text()
        ))
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound => Self::NotFound,
            other => Self::Store(other),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self {
            Self::Auth(e) => tracing::debug!(status = status.as_u16(), error = %e, "request not authorized"),
            Self::Store(e) if e.is_client_error() => {
                tracing::warn!(status = status.as_u16(), error = %e, "store refused write")
            }
            Self::Store(e) => tracing::error!(status = status.as_u16(), error = %e, "store write failed"),
            Self::Internal(detail) => tracing::error!(status = status.as_u16(), %detail, "request failed"),
            other => tracing::info!(status = status.as_u16(), error = %other, "request rejected"),
        }
        json_error(status)
    }
}

/// Canonical client-facing text for `status`.
pub fn canonical_message(status: StatusCode) -> &'static str {
    match status {
        StatusCode::BAD_REQUEST => "bad request",
        StatusCode::UNAUTHORIZED => "unauthorised",
        StatusCode::FORBIDDEN => "forbidden",
        StatusCode::NOT_FOUND => "resource not found",
        StatusCode::METHOD_NOT_ALLOWED => "method not allowed",
        StatusCode::UNPROCESSABLE_ENTITY => "unprocessable",
        _ => "internal server error",
    }
}

pub fn json_error(status: StatusCode) -> Response {
    let body = ErrorEnvelope::new(status.as_u16(), canonical_message(status));
    (status, Json(body)).into_response()
}

/// Router fallback: unknown paths get the 404 envelope.
pub async fn not_found() -> ApiError {
    ApiError::NotFound
}

/// Rewrites the router's bare 405 into the envelope, keeping `Allow`.
pub async fn envelope_method_not_allowed(response: Response) -> Response {
    if response.status() != StatusCode::METHOD_NOT_ALLOWED {
        return response;
    }

    let allow = response.headers().get(ALLOW).cloned();
    let mut rewritten = ApiError::MethodNotAllowed.into_response();
    if let Some(allow) = allow {
        rewritten.headers_mut().insert(ALLOW, allow);
    }
    rewritten
}

#[cfg(test)]
mod tests {
    use axum::body::to_bytes;
    use serde_json::{Value, json};

    use super::*;

    async fn body_of(err: ApiError) -> (StatusCode, Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn auth_failures_hide_their_detail() {
        let (status, body) = body_of(AuthError::Expired.into()).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(
            body,
            json!({"success": false, "error": 401, "message": "unauthorised"})
        );

        let (status, body) = body_of(AuthError::PermissionDenied("delete:drinks".into()).into()).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["message"], "forbidden");
    }

    #[tokio::test]
    async fn every_code_has_its_canonical_message() {
        let cases = [
            (ApiError::bad_request("title missing"), 400, "bad request"),
            (ApiError::NotFound, 404, "resource not found"),
            (ApiError::MethodNotAllowed, 405, "method not allowed"),
            (ApiError::Unprocessable("x".into()), 422, "unprocessable"),
            (AuthError::NoPermissionsClaim.into(), 401, "unauthorised"),
        ];

        for (err, code, message) in cases {
            let (status, body) = body_of(err).await;
            assert_eq!(status.as_u16(), code);
            assert_eq!(body["success"], false);
            assert_eq!(body["error"], code);
            assert_eq!(body["message"], message);
        }
    }

    #[test]
    fn store_errors_split_between_404_and_400() {
        assert_eq!(ApiError::from(StoreError::NotFound).status(), StatusCode::NOT_FOUND);
        assert_eq!(
            ApiError::from(StoreError::Conflict("title".into())).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::from(StoreError::Unavailable("down".into())).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::read_failure(StoreError::Unavailable("down".into())).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn invalid_ids_are_not_found() {
        let err: ApiError = DomainError::invalid_id("abc").into();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn bare_405_is_rewritten_keeping_allow() {
        let mut bare = StatusCode::METHOD_NOT_ALLOWED.into_response();
        bare.headers_mut()
            .insert(ALLOW, "GET,HEAD,POST".parse().unwrap());

        let rewritten = envelope_method_not_allowed(bare).await;
        assert_eq!(rewritten.headers()[ALLOW], "GET,HEAD,POST");
        let bytes = to_bytes(rewritten.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"], 405);

        let ok = StatusCode::OK.into_response();
        assert_eq!(envelope_method_not_allowed(ok).await.status(), StatusCode::OK);
    }
}
