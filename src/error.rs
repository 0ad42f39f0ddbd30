// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # API Errors
//!
//! [`ApiError`] is the fault type returned by handlers and extractors.
//! Converting it into a response does not render a body: the response only
//! carries the fault in its extensions. The error boundary middleware
//! (`crate::middleware::error_boundary`) is the single place that turns a
//! fault into an [`ErrorEnvelope`], so every failure produces exactly one
//! envelope no matter which stage raised it.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

use crate::auth::AuthError;

/// Message returned for every unclassified fault. The detail only goes to logs.
pub const INTERNAL_ERROR_MESSAGE: &str = "An internal error occurred";

/// A single rule violation on a request field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct FieldViolation {
    /// Field name as it appears in the JSON payload.
    pub field: String,
    /// What is wrong with the field.
    pub message: String,
}

impl FieldViolation {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Application fault taxonomy.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// Request payload broke one or more field rules (400).
    #[error("Validation failed: {}", describe_violations(.0))]
    Validation(Vec<FieldViolation>),

    /// Request could not be parsed at all (400).
    #[error("{0}")]
    BadRequest(String),

    /// Presented credential was rejected (401).
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// No credential was presented to a protected route (401).
    #[error("{0}")]
    Unauthorized(String),

    /// Authenticated but not allowed (403).
    #[error("{0}")]
    Forbidden(String),

    /// Resource or route not found (404).
    #[error("{0}")]
    NotFound(String),

    /// Request conflicts with stored state (409).
    #[error("{0}")]
    Conflict(String),

    /// Anything else (500). The message is logged, never returned.
    #[error("internal error: {0}")]
    Internal(String),
}

fn describe_violations(violations: &[FieldViolation]) -> String {
    violations
        .iter()
        .map(|v| format!("{} {}", v.field, v.message))
        .collect::<Vec<_>>()
        .join("; ")
}

impl ApiError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation(vec![FieldViolation::new(field, message)])
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest(message.into())
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized(message.into())
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict(message.into())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Auth(AuthError::Malformed) => StatusCode::BAD_REQUEST,
            Self::Auth(_) | Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Machine-readable kind written to the envelope.
    pub fn error_kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "Validation",
            Self::BadRequest(_) => "BadRequest",
            Self::Auth(reason) => reason.kind(),
            Self::Unauthorized(_) => "Unauthorized",
            Self::Forbidden(_) => "Forbidden",
            Self::NotFound(_) => "NotFound",
            Self::Conflict(_) => "Conflict",
            Self::Internal(_) => "Internal",
        }
    }

    /// Message safe to show to clients.
    pub fn public_message(&self) -> String {
        match self {
            Self::Internal(_) => INTERNAL_ERROR_MESSAGE.to_string(),
            other => other.to_string(),
        }
    }
}

/// Hands the fault to the error boundary without rendering a body.
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let mut response = self.status_code().into_response();
        response.extensions_mut().insert(self);
        response
    }
}

/// Uniform error response body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ErrorEnvelope {
    /// HTTP status code, repeated in the body.
    pub status_code: u16,
    /// Machine-readable error kind (e.g. `Validation`, `Expired`, `NotFound`).
    pub error_kind: String,
    /// Human-readable description.
    pub message: String,
    /// Field-level violations, present only for validation failures.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub violations: Vec<FieldViolation>,
}

impl ErrorEnvelope {
    /// Envelope for a response that failed without an [`ApiError`] attached,
    /// such as a method-router 405.
    pub fn from_status(status: StatusCode) -> Self {
        let kind = match status {
            StatusCode::BAD_REQUEST => "BadRequest",
            StatusCode::UNAUTHORIZED => "Unauthorized",
            StatusCode::FORBIDDEN => "Forbidden",
            StatusCode::NOT_FOUND => "NotFound",
            StatusCode::METHOD_NOT_ALLOWED => "MethodNotAllowed",
            StatusCode::CONFLICT => "Conflict",
            StatusCode::PAYLOAD_TOO_LARGE => "PayloadTooLarge",
            StatusCode::UNSUPPORTED_MEDIA_TYPE => "UnsupportedMediaType",
            s if s.is_server_error() => "Internal",
            _ => "BadRequest",
        };

        let message = if status.is_server_error() {
            INTERNAL_ERROR_MESSAGE.to_string()
        } else {
            status
                .canonical_reason()
                .unwrap_or("Request failed")
                .to_string()
        };

        Self {
            status_code: status.as_u16(),
            error_kind: kind.to_string(),
            message,
            violations: Vec::new(),
        }
    }

    pub fn status(&self) -> StatusCode {
        StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }
}

impl From<&ApiError> for ErrorEnvelope {
    fn from(error: &ApiError) -> Self {
        let violations = match error {
            ApiError::Validation(violations) => violations.clone(),
            _ => Vec::new(),
        };

        Self {
            status_code: error.status_code().as_u16(),
            error_kind: error.error_kind().to_string(),
            message: error.public_message(),
            violations,
        }
    }
}

impl IntoResponse for ErrorEnvelope {
    fn into_response(self) -> Response {
        (self.status(), Json(self)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    #[test]
    fn status_and_kind_mapping() {
        let cases = [
            (ApiError::validation("name", "is required"), StatusCode::BAD_REQUEST, "Validation"),
            (ApiError::bad_request("bad json"), StatusCode::BAD_REQUEST, "BadRequest"),
            (ApiError::Auth(AuthError::Expired), StatusCode::UNAUTHORIZED, "Expired"),
            (ApiError::Auth(AuthError::Malformed), StatusCode::BAD_REQUEST, "Malformed"),
            (ApiError::Auth(AuthError::InvalidSignature), StatusCode::UNAUTHORIZED, "InvalidSignature"),
            (ApiError::Auth(AuthError::NotYetValid), StatusCode::UNAUTHORIZED, "NotYetValid"),
            (ApiError::unauthorized("no token"), StatusCode::UNAUTHORIZED, "Unauthorized"),
            (ApiError::forbidden("nope"), StatusCode::FORBIDDEN, "Forbidden"),
            (ApiError::not_found("missing"), StatusCode::NOT_FOUND, "NotFound"),
            (ApiError::conflict("taken"), StatusCode::CONFLICT, "Conflict"),
            (ApiError::internal("db down"), StatusCode::INTERNAL_SERVER_ERROR, "Internal"),
        ];

        for (error, status, kind) in cases {
            assert_eq!(error.status_code(), status, "{error:?}");
            assert_eq!(error.error_kind(), kind, "{error:?}");
        }
    }

    #[test]
    fn internal_detail_is_not_public() {
        let error = ApiError::internal("connection refused at 10.0.0.3:5432");
        assert_eq!(error.public_message(), INTERNAL_ERROR_MESSAGE);

        let envelope = ErrorEnvelope::from(&error);
        assert!(!envelope.message.contains("10.0.0.3"));
    }

    #[test]
    fn validation_message_names_fields() {
        let error = ApiError::Validation(vec![
            FieldViolation::new("name", "is required"),
            FieldViolation::new("email", "must be a valid email address"),
        ]);

        let envelope = ErrorEnvelope::from(&error);
        assert_eq!(
            envelope.message,
            "Validation failed: name is required; email must be a valid email address"
        );
        assert_eq!(envelope.violations.len(), 2);
    }

    #[tokio::test]
    async fn into_response_carries_fault_without_body() {
        let response = ApiError::not_found("Team 42").into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            response.extensions().get::<ApiError>(),
            Some(&ApiError::not_found("Team 42"))
        );

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert!(body.is_empty());
    }

    #[tokio::test]
    async fn envelope_serializes_camel_case() {
        let response = ErrorEnvelope::from(&ApiError::Auth(AuthError::Expired)).into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body["statusCode"], 401);
        assert_eq!(body["errorKind"], "Expired");
        assert_eq!(body["message"], "Token has expired");
        assert!(body.get("violations").is_none());
    }

    #[test]
    fn envelope_from_bare_status() {
        let envelope = ErrorEnvelope::from_status(StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(envelope.status_code, 405);
        assert_eq!(envelope.error_kind, "MethodNotAllowed");
        assert_eq!(envelope.message, "Method Not Allowed");

        let envelope = ErrorEnvelope::from_status(StatusCode::BAD_GATEWAY);
        assert_eq!(envelope.error_kind, "Internal");
        assert_eq!(envelope.message, INTERNAL_ERROR_MESSAGE);
    }
}
