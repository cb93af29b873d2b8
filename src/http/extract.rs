//! JSON request body extraction.
//!
//! # Design Decisions
//! - A missing `Content-Type` is read as JSON; any other non-JSON type is `415`
//! - Syntax errors are `400`, shape errors are `422`
//! - The body limit is enforced by the underlying `Bytes` extractor

use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, FromRequest, Request},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use serde::de::DeserializeOwned;
use thiserror::Error;

/// Deserialized JSON request body.
#[derive(Debug, Clone)]
pub struct JsonBody<T>(pub T);

#[derive(Debug, Error)]
pub enum JsonBodyRejection {
    #[error("Expected request with `Content-Type: application/json`")]
    UnsupportedContentType,

    #[error("Failed to parse the request body as JSON: {0}")]
    Syntax(#[source] serde_json::Error),

    #[error("Failed to deserialize the JSON body into the target type: {0}")]
    Data(#[source] serde_json::Error),

    #[error(transparent)]
    Body(#[from] BytesRejection),
}

impl IntoResponse for JsonBodyRejection {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::UnsupportedContentType => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            Self::Syntax(_) => StatusCode::BAD_REQUEST,
            Self::Data(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Body(rejection) => rejection.status(),
        };
        (status, self.to_string()).into_response()
    }
}

impl<T, S> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = JsonBodyRejection;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        if !json_or_unspecified(req.headers()) {
            return Err(JsonBodyRejection::UnsupportedContentType);
        }

        let bytes = Bytes::from_request(req, state).await?;
        serde_json::from_slice(&bytes).map(JsonBody).map_err(|e| {
            if e.is_data() {
                JsonBodyRejection::Data(e)
            } else {
                JsonBodyRejection::Syntax(e)
            }
        })
    }
}

/// `application/json`, `application/*+json`, or no content type at all.
fn json_or_unspecified(headers: &HeaderMap) -> bool {
    let Some(value) = headers.get(header::CONTENT_TYPE) else {
        return true;
    };
    let Ok(value) = value.to_str() else {
        return false;
    };

    let essence = value.split(';').next().unwrap_or_default().trim().to_ascii_lowercase();
    match essence.split_once('/') {
        Some(("application", subtype)) => subtype == "json" || subtype.ends_with("+json"),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Named {
        name: String,
    }

    fn request(content_type: Option<&str>, body: &'static str) -> Request {
        let mut builder = axum::http::Request::builder().method("POST").uri("/");
        if let Some(value) = content_type {
            builder = builder.header(header::CONTENT_TYPE, value);
        }
        builder.body(Body::from(body)).unwrap()
    }

    async fn extract(
        content_type: Option<&str>,
        body: &'static str,
    ) -> Result<JsonBody<Named>, JsonBodyRejection> {
        JsonBody::<Named>::from_request(request(content_type, body), &()).await
    }

    #[tokio::test]
    async fn test_missing_content_type_parsed_as_json() {
        let JsonBody(named) = extract(None, r#"{"name":"a"}"#).await.unwrap();
        assert_eq!(named.name, "a");
    }

    #[tokio::test]
    async fn test_json_content_types_accepted() {
        for content_type in [
            "application/json",
            "application/json; charset=utf-8",
            "Application/JSON",
            "application/vnd.api+json",
        ] {
            let result = extract(Some(content_type), r#"{"name":"a"}"#).await;
            assert!(result.is_ok(), "{content_type} rejected");
        }
    }

    #[tokio::test]
    async fn test_other_content_type_is_415() {
        let rejection = extract(Some("text/plain"), r#"{"name":"a"}"#).await.unwrap_err();
        assert!(matches!(rejection, JsonBodyRejection::UnsupportedContentType));
        assert_eq!(rejection.into_response().status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
    }

    #[tokio::test]
    async fn test_syntax_error_is_400() {
        let rejection = extract(None, r#"{"name":"#).await.unwrap_err();
        assert!(matches!(rejection, JsonBodyRejection::Syntax(_)));
        assert_eq!(rejection.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_shape_error_is_422() {
        let rejection = extract(Some("application/json"), r#"{"other":1}"#).await.unwrap_err();
        assert!(matches!(rejection, JsonBodyRejection::Data(_)));
        assert_eq!(rejection.into_response().status(), StatusCode::UNPROCESSABLE_ENTITY);
    }
}
