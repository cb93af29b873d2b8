//! Response construction for the client side.
//!
//! # Responsibilities
//! - Mirror the upstream response (status, headers, body) untouched
//! - Build the locally generated responses (401, 500)
//!
//! # Design Decisions
//! - Mirrored headers are passed through as given; callers strip
//!   hop-by-hop framing they no longer honor
//! - Local responses are plain text and carry the request id

use axum::{
    body::Body,
    http::{HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};

use crate::http::request::{RequestId, X_REQUEST_ID};

pub const MISSING_AUTHORIZATION: &str = "Authorization header is missing";

/// Build a client response from the upstream's status, headers and body.
pub fn mirror_upstream(status: StatusCode, headers: HeaderMap, body: Body) -> Response {
    let mut response = Response::new(body);
    *response.status_mut() = status;
    *response.headers_mut() = headers;
    response
}

/// `401` returned when the client sent no credential.
pub fn missing_authorization() -> Response {
    (StatusCode::UNAUTHORIZED, MISSING_AUTHORIZATION).into_response()
}

/// Tag a locally generated response with the request id.
pub fn with_request_id(mut response: Response, request_id: &RequestId) -> Response {
    if let Ok(value) = HeaderValue::from_str(request_id.as_str()) {
        response.headers_mut().insert(X_REQUEST_ID, value);
    }
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::header;

    #[tokio::test]
    async fn test_mirror_keeps_everything() {
        let mut headers = HeaderMap::new();
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert("x-ratelimit-remaining", HeaderValue::from_static("41"));

        let response =
            mirror_upstream(StatusCode::TOO_MANY_REQUESTS, headers.clone(), Body::from("{}"));

        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(response.headers(), &headers);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(body, "{}");
    }

    #[tokio::test]
    async fn test_missing_authorization() {
        let response = missing_authorization();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(body, MISSING_AUTHORIZATION);
    }
}
