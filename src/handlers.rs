use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::{ConnectInfo, Query, State};
use axum::http::HeaderMap;
use axum::response::{IntoResponse, Response};
use axum::{Extension, Json};
use serde_json::json;

use crate::cache::{CacheKey, ResponseCache};
use crate::clock::{Clock, SystemClock};
use crate::config::Config;
use crate::error::ApiError;
use crate::identity::client_identity;
use crate::middleware::RequestId;
use crate::rate_limiter::{Admission, RateLimiter};
use crate::upstream::UpstreamClient;
use crate::validation::SearchParams;

/// Shared application state, cloned per request. The rate limiter and
/// cache carry their maps behind `Arc`s, so clones share state.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub rate_limiter: RateLimiter,
    pub cache: ResponseCache,
    pub upstream: UpstreamClient,
}

impl AppState {
    pub fn new(config: Config) -> Result<Self, reqwest::Error> {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Build state with an injected clock; tests drive window rollover and
    /// cache expiry with a manual clock instead of sleeping.
    pub fn with_clock(config: Config, clock: Arc<dyn Clock>) -> Result<Self, reqwest::Error> {
        let upstream = UpstreamClient::new(config.upstream_base(), config.upstream_timeout)?;
        Ok(Self {
            rate_limiter: RateLimiter::new(config.rate_limit_per_min, clock.clone()),
            cache: ResponseCache::new(config.cache_ttl, clock),
            upstream,
            config: Arc::new(config),
        })
    }
}

/// Liveness probe; bypasses the pipeline entirely.
pub async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

/// `GET /api/jobs` — the request pipeline.
pub async fn search_jobs(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    connect_info: Option<ConnectInfo<SocketAddr>>,
    headers: HeaderMap,
    Query(raw): Query<HashMap<String, String>>,
) -> Response {
    let peer = connect_info.map(|ConnectInfo(addr)| addr);
    match run_pipeline(&state, &headers, peer, &raw).await {
        Ok(payload) => Json(payload).into_response(),
        Err(err) => err.into_response_with(request_id.as_str()),
    }
}

/// Stages run in order and stop at the first failure: configuration check,
/// admission, validation, cache lookup, upstream fetch, cache store.
///
/// The upstream call happens with no cache or rate-limit lock held.
async fn run_pipeline(
    state: &AppState,
    headers: &HeaderMap,
    peer: Option<SocketAddr>,
    raw: &HashMap<String, String>,
) -> Result<serde_json::Value, ApiError> {
    // Misconfiguration is reported before the rate limiter is consulted so
    // clients can tell "service broken" from "client throttled".
    let Some((app_id, app_key)) = state.config.credentials() else {
        return Err(ApiError::Configuration);
    };

    let identity = client_identity(headers, peer);
    if let Admission::Rejected { retry_after } = state.rate_limiter.admit(&identity) {
        return Err(ApiError::RateLimitExceeded { retry_after });
    }

    let params = SearchParams::from_query(raw)?;
    let upstream_params = params.to_upstream_params(app_id, app_key);
    let key = CacheKey::from_params(&upstream_params);

    if let Some(payload) = state.cache.get(&key) {
        return Ok(payload);
    }

    let payload = state.upstream.fetch(params.page, &upstream_params).await?;
    state.cache.put(key, payload.clone());
    Ok(payload)
}
