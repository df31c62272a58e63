//! Admission middleware: counts every request and hands the count downstream.

use axum::extract::{FromRequestParts, Request, State};
use axum::http::request::Parts;
use axum::http::{HeaderName, HeaderValue};
use axum::middleware::Next;
use axum::response::Response;
use counter_service::ServiceState;
use tracing::Instrument;

use crate::error::ApiError;

/// Request header carrying the post-increment window count.
pub static REQUEST_COUNT_HEADER: HeaderName = HeaderName::from_static("request-count");

/// Increments the counter exactly once per request, then forwards it.
///
/// The count is written to the `request-count` header (replacing any value
/// sent by the client) and recorded on a tracing span around the downstream
/// call. Requests are never rejected or delayed.
pub async fn request_count_middleware(
    State(state): State<ServiceState>,
    mut req: Request,
    next: Next,
) -> Response {
    let count = state.admit();
    req.headers_mut()
        .insert(REQUEST_COUNT_HEADER.clone(), HeaderValue::from(count));

    let span = tracing::info_span!("request", request_count = count);
    next.run(req).instrument(span).await
}

/// Extractor for the count attached by [`request_count_middleware`].
///
/// Rejects with a 500 if the header is missing or not an integer, which only
/// happens when a route is mounted outside the middleware.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestCount(pub usize);

impl<S> FromRequestParts<S> for RequestCount
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .headers
            .get(&REQUEST_COUNT_HEADER)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.parse().ok())
            .map(Self)
            .ok_or_else(|| ApiError::Internal("convert count".to_string()))
    }
}
