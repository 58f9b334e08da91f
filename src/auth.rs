//! OAuth2 authorization-code flow and bearer token access for Google APIs.

use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::Env;
use crate::error::{DriveError, Result};
use crate::models::{StoredToken, TokenResponse};
use crate::token::TokenStore;

/// Google OAuth2 authorization endpoint.
const AUTH_URI: &str = "https://accounts.google.com/o/oauth2/auth";

/// Google OAuth2 token endpoint.
const TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

/// Google Drive API scope.
pub const DRIVE_SCOPE: &str = "https://www.googleapis.com/auth/drive";

/// How long a signed `state` stays acceptable.
const STATE_TTL_SECS: u64 = 600;

/// Timeout for the code-for-token exchange request.
const EXCHANGE_TIMEOUT: Duration = Duration::from_secs(10);

/// Seconds since the Unix epoch.
pub fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// Supplies the bearer token stored by the `auth` command.
///
/// The token is never refreshed; an expired token is used as-is and the API
/// rejects it.
#[derive(Clone)]
pub struct Authenticator {
    token: Arc<StoredToken>,
}

impl Authenticator {
    /// Load the token from a token file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let token = TokenStore::new(path).load()?;
        Ok(Self::new(token))
    }

    pub fn new(token: StoredToken) -> Self {
        if token.is_expired(unix_now()) {
            warn!("stored access token has expired; run `auth` again if requests are rejected");
        }
        Self {
            token: Arc::new(token),
        }
    }

    /// Get the access token for a request.
    pub fn get_access_token(&self) -> Result<&str> {
        if self.token.access_token.is_empty() {
            return Err(DriveError::TokenExchange(
                "stored token has an empty access token".to_string(),
            ));
        }
        Ok(&self.token.access_token)
    }
}

/// Claims carried by the signed `state` parameter.
#[derive(Debug, Serialize, Deserialize)]
struct StateClaims {
    iat: u64,
    exp: u64,
    nonce: String,
}

/// Authorization-code flow for an installed app with a local redirect.
pub struct OAuthFlow {
    client_id: String,
    client_secret: String,
    redirect_url: String,
    state_key: String,
    auth_uri: String,
    token_uri: String,
    http: Client,
}

impl OAuthFlow {
    pub fn new(env: &Env) -> Self {
        Self {
            client_id: env.client_id.clone(),
            client_secret: env.client_secret.clone(),
            redirect_url: env.redirect_url.clone(),
            state_key: env.cookie_key.clone(),
            auth_uri: AUTH_URI.to_string(),
            token_uri: TOKEN_URI.to_string(),
            http: Client::new(),
        }
    }

    /// Override the token endpoint, e.g. with a mock server.
    pub fn with_token_uri(mut self, token_uri: impl Into<String>) -> Self {
        self.token_uri = token_uri.into();
        self
    }

    /// Create a fresh `state` value signed with the configured key.
    pub fn new_state(&self) -> Result<String> {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default();
        let claims = StateClaims {
            iat: now.as_secs(),
            exp: now.as_secs() + STATE_TTL_SECS,
            nonce: now.as_nanos().to_string(),
        };
        let key = EncodingKey::from_secret(self.state_key.as_bytes());
        Ok(encode(&Header::new(Algorithm::HS256), &claims, &key)?)
    }

    /// Accept `received` only if it is the state we issued and still verifies.
    pub fn verify_state(&self, expected: &str, received: &str) -> Result<()> {
        if expected != received {
            return Err(DriveError::StateMismatch);
        }
        let key = DecodingKey::from_secret(self.state_key.as_bytes());
        decode::<StateClaims>(received, &key, &Validation::new(Algorithm::HS256))
            .map_err(|_| DriveError::StateMismatch)?;
        Ok(())
    }

    /// URL the user opens to grant access.
    pub fn authorization_url(&self, state: &str) -> Result<String> {
        let url = Url::parse_with_params(
            &self.auth_uri,
            &[
                ("client_id", self.client_id.as_str()),
                ("redirect_uri", self.redirect_url.as_str()),
                ("response_type", "code"),
                ("scope", DRIVE_SCOPE),
                ("state", state),
                ("access_type", "online"),
            ],
        )
        .map_err(|e| DriveError::TokenExchange(format!("invalid authorization endpoint: {}", e)))?;
        Ok(url.to_string())
    }

    /// Exchange an authorization code for a token.
    pub async fn exchange(&self, code: &str) -> Result<StoredToken> {
        let params = [
            ("grant_type", "authorization_code"),
            ("code", code),
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.as_str()),
            ("redirect_uri", self.redirect_url.as_str()),
        ];

        debug!(token_uri = %self.token_uri, "exchanging authorization code");

        let response = self
            .http
            .post(&self.token_uri)
            .form(&params)
            .timeout(EXCHANGE_TIMEOUT)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(DriveError::TokenExchange(format!(
                "Status {}: {}",
                status, body
            )));
        }

        let token_response: TokenResponse = response.json().await?;
        Ok(StoredToken::from_response(token_response, unix_now()))
    }
}
