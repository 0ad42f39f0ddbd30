// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Error translation middleware.
//!
//! [`error_boundary`] is layered outside every other application stage. It
//! runs the rest of the pipeline, then:
//!
//! - renders an [`ApiError`] found in the response extensions as an envelope
//! - turns a panic anywhere downstream into a 500 envelope
//! - wraps bodiless error statuses produced without a fault (e.g. 405) in an
//!   envelope
//! - passes every other response through unchanged
//!
//! Internal details are logged here and nowhere reach the response body.

use std::any::Any;
use std::panic::AssertUnwindSafe;

use axum::{
    extract::Request,
    http::{header, HeaderValue, Method, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use futures::FutureExt;

use crate::error::{ApiError, ErrorEnvelope};

/// Error translation middleware function.
pub async fn error_boundary(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_owned();

    let response = match AssertUnwindSafe(next.run(request)).catch_unwind().await {
        Ok(response) => response,
        Err(panic) => {
            let fault = ApiError::internal(format!("handler panicked: {}", panic_detail(&*panic)));
            fault.into_response()
        }
    };

    translate(response, &method, &path)
}

fn translate(mut response: Response, method: &Method, path: &str) -> Response {
    if let Some(fault) = response.extensions_mut().remove::<ApiError>() {
        log_fault(&fault, method, path);
        return render(ErrorEnvelope::from(&fault), response);
    }

    let status = response.status();
    let has_body = response.headers().contains_key(header::CONTENT_TYPE);
    if (status.is_client_error() || status.is_server_error()) && !has_body {
        tracing::debug!(%method, path, status = status.as_u16(), "Error status without fault");
        return render(ErrorEnvelope::from_status(status), response);
    }

    response
}

/// Replace the body of `original` with the envelope, keeping its headers.
fn render(envelope: ErrorEnvelope, original: Response) -> Response {
    let status = envelope.status();
    let (parts, _body) = original.into_parts();
    let mut response = envelope.into_response();

    for (name, value) in parts.headers.iter() {
        if name != header::CONTENT_TYPE && name != header::CONTENT_LENGTH {
            response.headers_mut().insert(name.clone(), value.clone());
        }
    }

    if status == StatusCode::UNAUTHORIZED {
        response
            .headers_mut()
            .insert(header::WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
    }

    response
}

fn log_fault(fault: &ApiError, method: &Method, path: &str) {
    match fault {
        ApiError::Internal(detail) => {
            tracing::error!(%method, path, error = %detail, "Unhandled fault");
        }
        ApiError::Auth(_) | ApiError::Unauthorized(_) | ApiError::Forbidden(_) => {
            tracing::info!(%method, path, kind = fault.error_kind(), "Request denied");
        }
        _ => {
            tracing::debug!(%method, path, kind = fault.error_kind(), error = %fault, "Request failed");
        }
    }
}

fn panic_detail(panic: &(dyn Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
