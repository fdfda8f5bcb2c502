//! Terminal error kinds for the fetch stages. Any of these aborts the export;
//! record-level degradations are counted in the stats instead.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    /// Network failure, deadline exceeded, or a non-2xx response.
    #[error("request to {url} failed: {message}")]
    Transport {
        url: String,
        status: Option<u16>,
        message: String,
    },

    /// The response body was not the JSON shape we expected.
    #[error("failed to decode response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    /// The token endpoint answered 2xx but without an access token.
    #[error("no access token in response from {url}")]
    MissingToken { url: String },
}

impl FetchError {
    /// HTTP status of a failed request, when the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            FetchError::Transport { status, .. } => *status,
            _ => None,
        }
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, FetchError::Transport { .. })
    }

    pub fn is_decode(&self) -> bool {
        matches!(self, FetchError::Decode { .. } | FetchError::MissingToken { .. })
    }
}
