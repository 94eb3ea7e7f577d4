//! Browser-like HTTP client with bounded retries and safe logging.
//!
//! - Every request carries a fixed, realistic browser header set
//! - Per-attempt timeout, retries driven by an explicit [`RetryPolicy`]
//! - Transport errors and non-success statuses are retried uniformly; the
//!   last failure propagates once attempts are exhausted
//! - Optional *raw* request/response logging via `SCOUT_HTTP_RAW=1`
//!
//! Example (no_run):
//! ```rust
//! # async fn demo() -> Result<(), scout_http::HttpError> {
//! let client = scout_http::HttpClient::new("Mozilla/5.0")?;
//! let page = client
//!     .get_text("https://www.geeksforgeeks.org/problems/sample/1", scout_http::RequestOpts::default())
//!     .await?;
//! # let _ = page; Ok(()) }
//! ```
//!
//! Observability: structured `tracing` events are emitted for request start,
//! response headers, body snippets (truncated), retries, final errors, and
//! (optionally) raw request/response lines on target `http.raw`.

use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, HeaderMap, HeaderValue};
use reqwest::{Client, Method, StatusCode, Url};
use serde::de::DeserializeOwned;
use std::borrow::Cow;
use std::env;
use std::time::Duration;
use thiserror::Error;
use tokio::time::sleep;

mod retry;

pub use retry::RetryPolicy;

pub const BROWSER_ACCEPT: &str =
    "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8";
pub const BROWSER_ACCEPT_LANGUAGE: &str = "en-US,en;q=0.5";

// ==============================
// Raw logging toggles
// ==============================

const RAW_ENV: &str = "SCOUT_HTTP_RAW";
const RAW_MAX_BODY: usize = 64 * 1024; // cap raw body logs (64 KiB)

fn raw_enabled() -> bool {
    matches!(
        env::var(RAW_ENV).as_deref(),
        Ok("1") | Ok("true") | Ok("yes")
    )
}

/// Render a best-effort curl command for repro/debug.
fn make_curl(method: &Method, url: &Url, headers: &HeaderMap) -> String {
    let mut parts = vec!["curl".to_string(), format!("-X{}", method)];
    for (name, val) in headers.iter() {
        let v = val.to_str().unwrap_or("");
        parts.push(format!(
            "-H '{}: {}'",
            name.as_str(),
            v.replace('\'', r"'\''")
        ));
    }
    parts.push(format!("'{}'", url.as_str()));
    parts.join(" ")
}

// ==============================
// Errors
// ==============================

#[derive(Debug, Error)]
pub enum HttpError {
    #[error("invalid URL: {0}")]
    Url(String),
    #[error("client build failed: {0}")]
    Build(String),
    #[error("network error: {0}")]
    Network(String),
    #[error("server returned {status} for {url}")]
    Status {
        status: StatusCode,
        url: String,
        body_snippet: String,
    },
    #[error("decode error: {0}, body_snippet: {1}")]
    Decode(String, String),
}

// ==============================
// Request Options
// ==============================

/// Per-request tuning knobs; unset fields fall back to the client defaults.
///
/// ```
/// use scout_http::{RequestOpts, RetryPolicy};
/// use std::time::Duration;
///
/// let opts = RequestOpts {
///     timeout: Some(Duration::from_secs(30)),
///     retry: Some(RetryPolicy::none()),
///     query: Some(vec![("page", "1".into())]),
///     ..Default::default()
/// };
///
/// assert_eq!(opts.timeout.unwrap().as_secs(), 30);
/// assert_eq!(opts.retry.unwrap().max_attempts, 1);
/// ```
#[derive(Clone, Debug, Default)]
pub struct RequestOpts<'a> {
    pub timeout: Option<Duration>,
    pub retry: Option<RetryPolicy>,
    pub headers: Option<HeaderMap>,
    pub query: Option<Vec<(&'a str, Cow<'a, str>)>>,
}

// ==============================
// Client
// ==============================

/// Shared HTTP session. Cloning is cheap and reuses the connection pool.
#[derive(Clone)]
pub struct HttpClient {
    inner: Client,
    headers: HeaderMap,
    pub default_timeout: Duration,
    pub retry: RetryPolicy,
}

impl HttpClient {
    /// Construct a client that identifies as a desktop browser.
    ///
    /// ```no_run
    /// use scout_http::{HttpClient, HttpError, RetryPolicy};
    /// use std::time::Duration;
    ///
    /// let client = HttpClient::new("Mozilla/5.0")?;
    /// assert_eq!(client.default_timeout, Duration::from_secs(10));
    /// assert_eq!(client.retry, RetryPolicy::default());
    /// # Ok::<(), HttpError>(())
    /// ```
    pub fn new(user_agent: &str) -> Result<Self, HttpError> {
        Self::with_connect_timeout(user_agent, Duration::from_secs(5))
    }

    pub fn with_connect_timeout(
        user_agent: &str,
        connect_timeout: Duration,
    ) -> Result<Self, HttpError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(BROWSER_ACCEPT));
        headers.insert(
            ACCEPT_LANGUAGE,
            HeaderValue::from_static(BROWSER_ACCEPT_LANGUAGE),
        );

        let inner = Client::builder()
            .user_agent(user_agent)
            .default_headers(headers.clone())
            .connect_timeout(connect_timeout)
            .gzip(true)
            .build()
            .map_err(|e| HttpError::Build(e.to_string()))?;
        Ok(Self {
            inner,
            headers,
            default_timeout: Duration::from_secs(10),
            retry: RetryPolicy::default(),
        })
    }

    /// Override the per-attempt timeout.
    pub fn with_timeout(mut self, dur: Duration) -> Self {
        self.default_timeout = dur;
        self
    }

    /// Override the default retry policy.
    pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.retry = policy;
        self
    }

    /// GET a page and return its body as text.
    pub async fn get_text(&self, url: &str, opts: RequestOpts<'_>) -> Result<String, HttpError> {
        let bytes = self.get_bytes(url, opts).await?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    /// GET and decode a JSON body.
    pub async fn get_json<T>(&self, url: &str, opts: RequestOpts<'_>) -> Result<T, HttpError>
    where
        T: DeserializeOwned,
    {
        let bytes = self.get_bytes(url, opts).await?;
        serde_json::from_slice::<T>(&bytes).map_err(|e| {
            let snippet = snip_body(&bytes);
            tracing::warn!(
                serde_line=%e.line(),
                serde_col=%e.column(),
                serde_err=%e.to_string(),
                body_snippet=%snippet,
                "http.response.decode_error"
            );
            HttpError::Decode(e.to_string(), snippet)
        })
    }

    // ==============================
    // Core request implementation
    // ==============================

    async fn get_bytes(&self, url: &str, opts: RequestOpts<'_>) -> Result<Vec<u8>, HttpError> {
        let url = Url::parse(url).map_err(|e| HttpError::Url(e.to_string()))?;
        let policy = opts.retry.unwrap_or(self.retry);
        let max_attempts = policy.attempts();
        let timeout = opts.timeout.unwrap_or(self.default_timeout);
        let method = Method::GET;

        let mut attempt = 0u32;
        loop {
            attempt += 1;

            let mut rb = self
                .inner
                .request(method.clone(), url.clone())
                .timeout(timeout);
            if let Some(q) = &opts.query {
                let pairs: Vec<(&str, &str)> = q.iter().map(|(k, v)| (*k, v.as_ref())).collect();
                rb = rb.query(&pairs);
            }
            if let Some(hdrs) = &opts.headers {
                rb = rb.headers(hdrs.clone());
            }

            // Lightweight request id without extra deps
            let req_id = format!(
                "r{:x}",
                std::time::SystemTime::now()
                    .duration_since(std::time::UNIX_EPOCH)
                    .unwrap_or_default()
                    .as_nanos()
            );

            tracing::debug!(
                req_id=%req_id,
                attempt,
                max_attempts,
                method=%method,
                host_path=%format!("{}{}", url.host_str().unwrap_or("-"), url.path()),
                query=?opts.query,
                timeout_ms=timeout.as_millis() as u64,
                "http.request.start"
            );

            if raw_enabled() {
                let mut merged = self.headers.clone();
                if let Some(h) = &opts.headers {
                    for (k, v) in h.iter() {
                        merged.insert(k, v.clone());
                    }
                }
                let curl = make_curl(&method, &url, &merged);
                tracing::debug!(target: "http.raw", %req_id, %curl, "request");
            }

            let t0 = std::time::Instant::now();
            let failure = match rb.send().await {
                Err(err) => HttpError::Network(err.to_string()),
                Ok(resp) => {
                    let status = resp.status();
                    match resp.bytes().await {
                        Err(err) => HttpError::Network(err.to_string()),
                        Ok(bytes) => {
                            let dur_ms = t0.elapsed().as_millis() as u64;
                            tracing::debug!(
                                req_id=%req_id,
                                %status,
                                duration_ms=dur_ms,
                                body_len=bytes.len(),
                                "http.response.headers"
                            );
                            if raw_enabled() {
                                let truncated = bytes.len() > RAW_MAX_BODY;
                                let end = bytes.len().min(RAW_MAX_BODY);
                                let text = String::from_utf8_lossy(&bytes[..end]);
                                tracing::info!(
                                    target: "http.raw",
                                    %req_id,
                                    status=%status,
                                    duration_ms=dur_ms,
                                    body=%text,
                                    truncated
                                );
                            }

                            if status.is_success() {
                                return Ok(bytes.to_vec());
                            }
                            HttpError::Status {
                                status,
                                url: url.to_string(),
                                body_snippet: snip_body(&bytes),
                            }
                        }
                    }
                }
            };

            if attempt < max_attempts {
                let delay = policy.delay_after(attempt);
                tracing::warn!(
                    req_id=%req_id,
                    attempt,
                    max_attempts,
                    backoff_ms=delay.as_millis() as u64,
                    error=%failure,
                    "http.retrying"
                );
                sleep(delay).await;
                continue;
            }

            tracing::warn!(
                req_id=%req_id,
                attempt,
                max_attempts,
                error=%failure,
                "http.error"
            );
            return Err(failure);
        }
    }
}

// ==============================
// Helpers
// ==============================

fn snip_body(body: &[u8]) -> String {
    let mut snip = String::from_utf8_lossy(body).to_string();
    if snip.len() > 500 {
        let mut cut = 500;
        while !snip.is_char_boundary(cut) {
            cut -= 1;
        }
        snip.truncate(cut);
        snip.push_str("...");
    }
    snip
}
