use std::net::SocketAddr;
use std::time::Instant;

use axum::extract::{ConnectInfo, Request};
use axum::http::HeaderValue;
use axum::middleware::Next;
use axum::response::Response;
use tracing::info;
use uuid::Uuid;

use crate::identity::client_identity;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Correlation id attached to every request — reused from the inbound
/// `X-Request-Id` header when supplied, freshly generated otherwise.
#[derive(Debug, Clone)]
pub struct RequestId(String);

impl RequestId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Wraps every route: stamps the correlation id on request and response,
/// times the request, and emits the one structured log record per request.
pub async fn request_context(mut request: Request, next: Next) -> Response {
    let started = Instant::now();

    let request_id = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let peer = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| *addr);
    let client = client_identity(request.headers(), peer);

    request.extensions_mut().insert(RequestId(request_id.clone()));

    let mut response = next.run(request).await;

    info!(
        target: "jobgate::request",
        request_id = %request_id,
        method = %method,
        path = %path,
        status = %response.status().as_u16(),
        duration_ms = %started.elapsed().as_millis(),
        client = %client,
        "request completed"
    );

    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }

    response
}
