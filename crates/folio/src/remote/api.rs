//! Contents API seam for the remote sync client.
//!
//! The sync pipeline talks to the remote file host through the
//! [`ContentsApi`] trait so tests can script responses. The production
//! implementation targets the GitHub contents API: base64 transport
//! encoding, `sha` revision markers, and rate-limit hints via
//! `Retry-After` / `X-RateLimit-Reset` headers.

use std::time::Duration;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use chrono::Utc;
use reqwest::header::{HeaderMap, RETRY_AFTER};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::RemoteConfig;
use crate::error::{Error, Result};

/// Remaining-quota header checked to distinguish 403 throttling from 403 auth.
const RATE_LIMIT_REMAINING: &str = "x-ratelimit-remaining";

/// Reset-timestamp header (unix epoch seconds).
const RATE_LIMIT_RESET: &str = "x-ratelimit-reset";

/// An opaque revision marker for the remote file.
///
/// Threaded through fetch and update so the remote rejects a write based on
/// a stale revision (optimistic concurrency).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Revision(String);

impl Revision {
    /// Wrap a raw revision string.
    #[must_use]
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Get the raw revision string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Revision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// The remote file's decoded content and current revision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteFile {
    /// Decoded UTF-8 file content.
    pub content: String,
    /// Current revision marker.
    pub revision: Revision,
}

/// An update to submit to the remote file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileUpdate {
    /// Commit message.
    pub message: String,
    /// Raw (unencoded) file content.
    pub content: String,
    /// Revision the update is based on; `None` when creating the file.
    pub revision: Option<Revision>,
}

/// Classified outcome of a remote call.
///
/// Transport-level failures (DNS, connect, timeout) surface as
/// [`Error::Network`] instead; this enum covers responses the remote
/// actually produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiResult<T> {
    /// The call succeeded.
    Success(T),
    /// The resource does not exist (valid initial state on fetch).
    NotFound,
    /// The token was rejected.
    Unauthorized {
        /// Message from the remote API.
        message: String,
    },
    /// The submitted revision marker is stale.
    Conflict {
        /// Message from the remote API.
        message: String,
    },
    /// The remote is throttling us.
    RateLimited {
        /// Provider-supplied wait hint, if any.
        wait_hint: Option<Duration>,
    },
    /// Server-side failure (5xx); treated as transient.
    ServerError {
        /// HTTP status code.
        status: u16,
        /// Message from the remote API.
        message: String,
    },
}

/// Abstraction over the remote file-hosting content API.
#[async_trait::async_trait]
pub trait ContentsApi: Send + Sync {
    /// Fetch the current remote file and its revision marker.
    ///
    /// # Errors
    ///
    /// Returns an error only for transport-level failures; remote responses
    /// (including 404) are classified into the [`ApiResult`].
    async fn get_file(&self, token: &str) -> Result<ApiResult<RemoteFile>>;

    /// Submit an update, returning the new revision on success.
    ///
    /// # Errors
    ///
    /// Returns an error only for transport-level failures.
    async fn put_file(&self, token: &str, update: FileUpdate) -> Result<ApiResult<Revision>>;
}

/// Wire shape of a GET contents response.
#[derive(Debug, Deserialize)]
struct ContentsPayload {
    sha: String,
    content: String,
}

/// Wire shape of a PUT contents request body.
#[derive(Debug, Serialize)]
struct PutBody<'a> {
    message: &'a str,
    content: String,
    branch: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    sha: Option<&'a str>,
}

/// Wire shape of a PUT contents response.
#[derive(Debug, Deserialize)]
struct PutPayload {
    content: PutContent,
}

#[derive(Debug, Deserialize)]
struct PutContent {
    sha: String,
}

/// Wire shape of an error response body.
#[derive(Debug, Deserialize)]
struct ErrorPayload {
    #[serde(default)]
    message: String,
}

/// GitHub-backed [`ContentsApi`] implementation.
#[derive(Debug)]
pub struct GitHubContentsApi {
    client: reqwest::Client,
    contents_url: String,
    branch: String,
}

impl GitHubContentsApi {
    /// Build a client for the configured (owner, repo, path, branch) tuple.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(remote: &RemoteConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("folio/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(30))
            .build()?;

        let contents_url = format!(
            "{}/repos/{}/{}/contents/{}",
            remote.api_base.trim_end_matches('/'),
            remote.owner,
            remote.repo,
            remote.path
        );

        Ok(Self {
            client,
            contents_url,
            branch: remote.branch.clone(),
        })
    }
}

#[async_trait::async_trait]
impl ContentsApi for GitHubContentsApi {
    async fn get_file(&self, token: &str) -> Result<ApiResult<RemoteFile>> {
        let response = self
            .client
            .get(&self.contents_url)
            .query(&[("ref", self.branch.as_str())])
            .header("Authorization", format!("Bearer {token}"))
            .header("Accept", "application/vnd.github+json")
            .send()
            .await?;

        let status = response.status();
        let headers = response.headers().clone();
        let body = response.text().await?;
        debug!("GET contents returned {status}");

        if status.is_success() {
            let payload: ContentsPayload =
                serde_json::from_str(&body).map_err(|err| Error::network(err.to_string()))?;
            let content = decode_content(&payload.content)?;
            return Ok(ApiResult::Success(RemoteFile {
                content,
                revision: Revision::new(payload.sha),
            }));
        }

        Ok(classify_failure(status, &headers, &body))
    }

    async fn put_file(&self, token: &str, update: FileUpdate) -> Result<ApiResult<Revision>> {
        let body = PutBody {
            message: &update.message,
            content: encode_content(&update.content),
            branch: &self.branch,
            sha: update.revision.as_ref().map(Revision::as_str),
        };

        let response = self
            .client
            .put(&self.contents_url)
            .header("Authorization", format!("Bearer {token}"))
            .header("Accept", "application/vnd.github+json")
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let headers = response.headers().clone();
        let body = response.text().await?;
        debug!("PUT contents returned {status}");

        if status.is_success() {
            let payload: PutPayload =
                serde_json::from_str(&body).map_err(|err| Error::network(err.to_string()))?;
            return Ok(ApiResult::Success(Revision::new(payload.content.sha)));
        }

        Ok(classify_failure(status, &headers, &body))
    }
}

/// Classify a non-success response into an [`ApiResult`].
///
/// GitHub signals secondary rate limits with 403 plus an exhausted quota
/// header or a `Retry-After`; a bare 401/403 is an auth failure. 409 and
/// 422 on a contents PUT mean the submitted `sha` went stale.
fn classify_failure<T>(status: StatusCode, headers: &HeaderMap, body: &str) -> ApiResult<T> {
    let message = error_message(body, status);

    match status {
        StatusCode::NOT_FOUND => ApiResult::NotFound,
        StatusCode::UNAUTHORIZED => ApiResult::Unauthorized { message },
        StatusCode::FORBIDDEN => {
            if quota_exhausted(headers) || headers.contains_key(RETRY_AFTER) {
                ApiResult::RateLimited {
                    wait_hint: rate_limit_wait(headers),
                }
            } else {
                ApiResult::Unauthorized { message }
            }
        }
        StatusCode::CONFLICT | StatusCode::UNPROCESSABLE_ENTITY => {
            ApiResult::Conflict { message }
        }
        StatusCode::TOO_MANY_REQUESTS => ApiResult::RateLimited {
            wait_hint: rate_limit_wait(headers),
        },
        _ => ApiResult::ServerError {
            status: status.as_u16(),
            message,
        },
    }
}

/// Extract a human-readable message from an error body.
fn error_message(body: &str, status: StatusCode) -> String {
    serde_json::from_str::<ErrorPayload>(body)
        .ok()
        .map(|p| p.message)
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| format!("HTTP {status}"))
}

/// Check whether the rate-limit quota headers report exhaustion.
fn quota_exhausted(headers: &HeaderMap) -> bool {
    headers
        .get(RATE_LIMIT_REMAINING)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<u64>().ok())
        == Some(0)
}

/// Compute the wait duration from provider hints.
///
/// `Retry-After` (seconds) wins over `X-RateLimit-Reset` (epoch seconds);
/// a reset timestamp in the past yields a zero wait.
#[must_use]
pub fn rate_limit_wait(headers: &HeaderMap) -> Option<Duration> {
    if let Some(secs) = headers
        .get(RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<u64>().ok())
    {
        return Some(Duration::from_secs(secs));
    }

    let reset = headers
        .get(RATE_LIMIT_RESET)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<i64>().ok())?;
    let wait = reset.saturating_sub(Utc::now().timestamp()).max(0);
    #[allow(clippy::cast_sign_loss)]
    Some(Duration::from_secs(wait as u64))
}

/// Base64-encode file content for transport.
#[must_use]
pub fn encode_content(content: &str) -> String {
    BASE64.encode(content.as_bytes())
}

/// Decode base64 transport content.
///
/// GitHub wraps encoded content with newlines; whitespace is stripped
/// before decoding.
///
/// # Errors
///
/// Returns a parse error if the payload is not valid base64 or UTF-8.
pub fn decode_content(encoded: &str) -> Result<String> {
    let compact: String = encoded.chars().filter(|c| !c.is_whitespace()).collect();
    let bytes = BASE64
        .decode(compact.as_bytes())
        .map_err(|err| Error::parse(format!("invalid base64 content: {err}")))?;
    String::from_utf8(bytes).map_err(|err| Error::parse(format!("content is not UTF-8: {err}")))
}
