use std::time::Duration;

use serde_json::Value;

use crate::error::ApiError;

/// Thin client for the upstream search API.
///
/// One attempt per inbound request: a single GET bounded by the configured
/// timeout, no retries.
#[derive(Clone)]
pub struct UpstreamClient {
    http: reqwest::Client,
    base_url: String,
}

impl UpstreamClient {
    pub fn new(base_url: String, timeout: Duration) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { http, base_url })
    }

    /// Issue the search request; any failure becomes [`ApiError::Upstream`].
    ///
    /// Error details are stripped of the request URL before display so the
    /// credential-bearing query string never reaches clients or logs.
    pub async fn fetch(&self, page: u32, params: &[(String, String)]) -> Result<Value, ApiError> {
        let url = format!("{}/search/{}", self.base_url, page);

        let response = self
            .http
            .get(&url)
            .query(params)
            .send()
            .await
            .map_err(|e| ApiError::Upstream(e.without_url().to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Upstream(format!(
                "upstream responded with status {status}"
            )));
        }

        response
            .json()
            .await
            .map_err(|e| ApiError::Upstream(e.without_url().to_string()))
    }
}
