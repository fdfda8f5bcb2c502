//! Blocking GET transport. Fetchers only ever see `&dyn Transport`, so tests and
//! alternate backends substitute their own implementation.

use crate::error::FetchError;
use crate::util::redact_secrets;
use std::io::Read;
use std::time::Duration;

/// Upper bound on the error-body excerpt carried in a transport error.
const ERROR_BODY_LIMIT: u64 = 4096;

pub trait Transport: Send + Sync {
    /// One best-effort GET of `url` with `query` appended. Returns the raw body
    /// of a 2xx response; anything else is a `FetchError::Transport`.
    fn get(&self, url: &str, query: &[(&str, String)]) -> Result<Vec<u8>, FetchError>;
}

/// `reqwest` blocking client with a fixed per-request deadline.
#[derive(Clone, Debug)]
pub struct HttpTransport {
    client: reqwest::blocking::Client,
}

impl HttpTransport {
    pub fn new(timeout: Duration) -> Self {
        let mut builder = reqwest::blocking::Client::builder();
        if !timeout.is_zero() {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().unwrap_or_else(|err| {
            tracing::warn!("failed to build HTTP client, using defaults: {err}");
            reqwest::blocking::Client::new()
        });
        Self { client }
    }

    pub fn from_client(client: reqwest::blocking::Client) -> Self {
        Self { client }
    }
}

impl Transport for HttpTransport {
    fn get(&self, url: &str, query: &[(&str, String)]) -> Result<Vec<u8>, FetchError> {
        let response = self.client.get(url).query(query).send().map_err(|e| {
            let kind = if e.is_timeout() {
                "timeout"
            } else if e.is_connect() {
                "connect"
            } else {
                "request"
            };
            let message = redact_secrets(&format!("{kind} error: {e}"));
            tracing::debug!(url, error_kind = kind, "request failed before a response");
            FetchError::Transport { url: url.to_string(), status: None, message }
        })?;

        let status = response.status();
        if !status.is_success() {
            let mut excerpt = Vec::new();
            // The excerpt is best-effort; an unreadable body still reports the status.
            let _ = response.take(ERROR_BODY_LIMIT).read_to_end(&mut excerpt);
            let body = String::from_utf8_lossy(&excerpt);
            let body = body.trim();
            let message = if body.is_empty() {
                format!("status {status}")
            } else {
                format!("status {status}: {}", redact_secrets(body))
            };
            tracing::debug!(url, status = status.as_u16(), "upstream returned error status");
            return Err(FetchError::Transport {
                url: url.to_string(),
                status: Some(status.as_u16()),
                message,
            });
        }

        let bytes = response.bytes().map_err(|e| FetchError::Transport {
            url: url.to_string(),
            status: Some(status.as_u16()),
            message: redact_secrets(&format!("reading body: {e}")),
        })?;
        Ok(bytes.to_vec())
    }
}
