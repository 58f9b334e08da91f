//! Environment configuration shared by the `auth` and `copy` commands.

use crate::error::{DriveError, Result};

pub const ENV_CLIENT_ID: &str = "GOOGLE_CLIENT_ID";
pub const ENV_CLIENT_SECRET: &str = "GOOGLE_CLIENT_SECRET";
pub const ENV_REDIRECT_URL: &str = "GOOGLE_REDIRECT_URL";
pub const ENV_COOKIE_KEY: &str = "COOKIE_KEY";
pub const ENV_PORT: &str = "PORT";

/// Required process environment. Every field must be present.
#[derive(Clone)]
pub struct Env {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_url: String,
    /// Symmetric key used to sign the OAuth `state` parameter.
    pub cookie_key: String,
    pub listen_port: u16,
}

impl std::fmt::Debug for Env {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Env")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("redirect_url", &self.redirect_url)
            .field("cookie_key", &"<redacted>")
            .field("listen_port", &self.listen_port)
            .finish()
    }
}

impl Env {
    /// Read the configuration from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read the configuration through an arbitrary lookup function.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let require = |key: &str| -> Result<String> {
            lookup(key)
                .filter(|v| !v.is_empty())
                .ok_or_else(|| DriveError::ConfigMissing(key.to_string()))
        };

        let port = require(ENV_PORT)?;
        let listen_port = port
            .trim()
            .parse::<u16>()
            .map_err(|_| DriveError::ConfigMissing(format!("{} (invalid port: {})", ENV_PORT, port)))?;

        Ok(Self {
            client_id: require(ENV_CLIENT_ID)?,
            client_secret: require(ENV_CLIENT_SECRET)?,
            redirect_url: require(ENV_REDIRECT_URL)?,
            cookie_key: require(ENV_COOKIE_KEY)?,
            listen_port,
        })
    }
}
