use std::net::SocketAddr;

use axum::http::HeaderMap;

/// Sentinel identity when neither a forwarded header nor a peer address is
/// available.
pub const UNKNOWN_CLIENT: &str = "unknown";

/// Derive the client identity used for rate limiting and request logs.
///
/// Trusts the left-most `X-Forwarded-For` entry, trimmed, when present and
/// non-empty; falls back to the peer address, then to `"unknown"`. The value
/// is opaque — no IP syntax validation, it only keys a map.
pub fn client_identity(headers: &HeaderMap, peer: Option<SocketAddr>) -> String {
    if let Some(forwarded) = headers.get("x-forwarded-for").and_then(|v| v.to_str().ok()) {
        if let Some(first) = forwarded.split(',').next() {
            let first = first.trim();
            if !first.is_empty() {
                return first.to_string();
            }
        }
    }

    match peer {
        Some(addr) => addr.ip().to_string(),
        None => UNKNOWN_CLIENT.to_string(),
    }
}
