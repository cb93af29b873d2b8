//! `POST /v1/chat/completions` handler.

use axum::{
    extract::State,
    http::{header, HeaderMap},
    response::{IntoResponse, Response},
    Extension,
};

use crate::http::extract::JsonBody;
use crate::http::request::RequestId;
use crate::http::response::{missing_authorization, with_request_id};
use crate::http::server::AppState;
use crate::observability::metrics;
use crate::relay::{outbound_headers, ChatCompletionRequest, UpstreamLease, UpstreamPayload};

/// Validate the credential, translate the request and relay it upstream.
///
/// The body has already been validated by the `JsonBody` extractor; a missing
/// `Authorization` header short-circuits with `401` before any upstream
/// contact.
pub async fn chat_completions(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    headers: HeaderMap,
    JsonBody(request): JsonBody<ChatCompletionRequest>,
) -> Response {
    let streaming = request.is_streaming();
    let mode = if streaming { "stream" } else { "buffered" };

    let credential = match headers.get(header::AUTHORIZATION).filter(|v| !v.is_empty()) {
        Some(value) => value,
        None => {
            tracing::warn!(
                request_id = %request_id,
                "Rejecting request without Authorization header"
            );
            metrics::record_request(mode, 401);
            return with_request_id(missing_authorization(), &request_id);
        }
    };

    tracing::info!(
        request_id = %request_id,
        model = %request.model,
        messages = request.messages.len(),
        stream = streaming,
        "Relaying chat completion"
    );

    let payload = UpstreamPayload::from(&request);
    let outbound = outbound_headers(credential);

    let result = if streaming {
        let lease = UpstreamLease::acquire(request_id.as_str());
        state.upstream.open_stream(&payload, outbound, lease).await
    } else {
        state.upstream.forward_buffered(&payload, outbound).await
    };

    match result {
        Ok(response) => {
            tracing::info!(
                request_id = %request_id,
                status = response.status().as_u16(),
                stream = streaming,
                "Upstream responded"
            );
            metrics::record_request(mode, response.status().as_u16());
            response
        }
        Err(e) => {
            tracing::error!(request_id = %request_id, error = %e, "Upstream request failed");
            metrics::record_request(mode, 500);
            with_request_id(e.into_response(), &request_id)
        }
    }
}
