//! OAuth2 authorization-code boundary: build the consent URL and trade a code for a
//! bearer token. The redirect listener is left to the caller.

use crate::api::get_json;
use crate::error::FetchError;
use crate::transport::Transport;
use serde::Deserialize;
use std::sync::Arc;

/// Supplies the bearer token an export run authenticates with.
pub trait Authenticator {
    fn access_token(&self, code: &str) -> Result<String, FetchError>;
}

#[derive(Clone, Debug)]
pub struct ClientCredentials {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
}

/// Consent page the user opens to obtain an authorization code.
pub fn authorize_url(oauth_base: &str, client_id: &str, redirect_uri: &str) -> String {
    let base = format!("{}/authenticate", oauth_base.trim_end_matches('/'));
    let params = [("response_type", "code"), ("client_id", client_id), ("redirect_uri", redirect_uri)];
    match reqwest::Url::parse_with_params(&base, &params) {
        Ok(u) => u.to_string(),
        Err(_) => format!("{base}?response_type=code&client_id={client_id}&redirect_uri={redirect_uri}"),
    }
}

#[derive(Debug, Default, Deserialize)]
struct TokenResponse {
    #[serde(default)]
    access_token: String,
}

/// Code-for-token exchange against `{oauth_base}/access_token`.
pub struct OAuthAuthenticator {
    transport: Arc<dyn Transport>,
    oauth_base: String,
    credentials: ClientCredentials,
}

impl OAuthAuthenticator {
    pub fn new(transport: Arc<dyn Transport>, oauth_base: impl Into<String>, credentials: ClientCredentials) -> Self {
        let oauth_base = oauth_base.into().trim_end_matches('/').to_string();
        Self { transport, oauth_base, credentials }
    }

    pub fn authorize_url(&self) -> String {
        authorize_url(&self.oauth_base, &self.credentials.client_id, &self.credentials.redirect_uri)
    }
}

impl Authenticator for OAuthAuthenticator {
    fn access_token(&self, code: &str) -> Result<String, FetchError> {
        let url = format!("{}/access_token", self.oauth_base);
        let c = &self.credentials;
        let query = [
            ("grant_type", "authorization_code".to_string()),
            ("client_id", c.client_id.clone()),
            ("redirect_uri", c.redirect_uri.clone()),
            ("client_secret", c.client_secret.clone()),
            ("code", code.trim().to_string()),
        ];
        let resp: TokenResponse = get_json(self.transport.as_ref(), &url, &query)?;
        if resp.access_token.is_empty() {
            return Err(FetchError::MissingToken { url });
        }
        tracing::info!("obtained access token");
        Ok(resp.access_token)
    }
}
