// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Path extractor whose rejection is an [`ApiError`].

use axum::extract::{rejection::PathRejection, FromRequestParts};

use crate::error::ApiError;

/// Drop-in for `axum::extract::Path` that reports bad segments (e.g. a
/// non-UUID id) as a `BadRequest` envelope.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ApiError))]
pub struct Path<T>(pub T);

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::bad_request(rejection.body_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, extract::Request, http::StatusCode, routing::get, Router};
    use tower::ServiceExt;
    use uuid::Uuid;

    fn app() -> Router {
        Router::new().route(
            "/teams/{id}",
            get(|Path(id): Path<Uuid>| async move { id.to_string() }),
        )
    }

    #[tokio::test]
    async fn uuid_segment_is_parsed() {
        let id = Uuid::new_v4();
        let response = app()
            .oneshot(Request::builder().uri(format!("/teams/{id}")).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn bad_segment_is_bad_request() {
        let response = app()
            .oneshot(Request::builder().uri("/teams/42").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(matches!(
            response.extensions().get::<ApiError>(),
            Some(ApiError::BadRequest(_))
        ));
    }
}
