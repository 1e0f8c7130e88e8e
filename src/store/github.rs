//! GitHub contents-API backing store
//!
//! One file per request: `GET /repos/<repo>/contents/<path>?ref=<branch>`
//! yields the current blob `sha`, which doubles as the version token;
//! `PUT` with that `sha` is the conditional write. A commit landing in
//! between makes the `sha` stale and the PUT is rejected.

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use reqwest::{header, StatusCode};

use super::{StoreError, StoreResult, VersionedStore};
use crate::config::RemoteConfig;

const API_ROOT: &str = "https://api.github.com";
const ACCEPT: &str = "application/vnd.github.v3+json";
const USER_AGENT: &str = concat!("plume/", env!("CARGO_PKG_VERSION"));

/// Versioned store backed by a GitHub repository branch
pub struct GitHubStore {
    config: RemoteConfig,
    client: reqwest::Client,
}

impl GitHubStore {
    pub fn new(config: RemoteConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }

    fn contents_url(&self, path: &str) -> String {
        format!(
            "{}/repos/{}/contents/{}",
            API_ROOT,
            self.config.repo,
            encode_path(path)
        )
    }

    fn request(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        builder
            .header(header::AUTHORIZATION, format!("token {}", self.config.token))
            .header(header::ACCEPT, ACCEPT)
            .header(header::USER_AGENT, USER_AGENT)
    }
}

#[async_trait]
impl VersionedStore for GitHubStore {
    async fn fetch_version_token(&self, path: &str) -> StoreResult<String> {
        let response = self
            .request(self.client.get(self.contents_url(path)))
            .query(&[("ref", self.config.branch.as_str())])
            .send()
            .await
            .map_err(|e| StoreError::Upstream(e.to_string()))?;

        let response = check_status(response).await?;

        let meta: serde_json::Value = response
            .json()
            .await
            .map_err(|e| StoreError::Upstream(format!("invalid contents response: {}", e)))?;

        let sha = meta["sha"]
            .as_str()
            .ok_or_else(|| StoreError::Upstream("missing sha in contents response".to_string()))?;

        Ok(sha.to_string())
    }

    async fn commit(&self, path: &str, content: &str, token: &str) -> StoreResult<()> {
        let body = serde_json::json!({
            "message": format!("Edit {}", path),
            "content": BASE64.encode(content.as_bytes()),
            "branch": self.config.branch,
            "sha": token,
        });

        let response = self
            .request(self.client.put(self.contents_url(path)))
            .json(&body)
            .send()
            .await
            .map_err(|e| StoreError::Upstream(e.to_string()))?;

        check_status(response).await?;
        tracing::debug!(path, "committed content");
        Ok(())
    }
}

/// Pass a successful response through, classify anything else
async fn check_status(response: reqwest::Response) -> StoreResult<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "Unknown error".to_string());
    Err(classify(status, body))
}

/// Stale-token conflicts (409/422) land under `Upstream` together with
/// server-side failures; the status line in the message tells them apart.
fn classify(status: StatusCode, body: String) -> StoreError {
    match status.as_u16() {
        401 | 403 => StoreError::Unauthorized,
        404 => StoreError::NotFound,
        400 => StoreError::BadRequest(body),
        _ => StoreError::Upstream(format!("{}: {}", status, body)),
    }
}

/// Encode a repository path for use as one URL segment
fn encode_path(path: &str) -> String {
    utf8_percent_encode(path, NON_ALPHANUMERIC).to_string()
}
