//! API key handling for the AI gateway.
//!
//! Keys are read from an environment variable and kept in a [`SecretString`]
//! so they never show up in logs or `Debug` output.

use std::env;

use secrecy::{ExposeSecret, SecretString};
use tracing::debug;

use crate::{Error, Result};

/// A secure API key that prevents accidental logging.
#[derive(Clone)]
pub struct ApiKey(SecretString);

impl ApiKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(SecretString::from(key.into()))
    }

    /// Read a key from `var`. Unset and blank values are both missing.
    pub fn from_env(var: &str) -> Result<Self> {
        match env::var(var) {
            Ok(value) if !value.trim().is_empty() => {
                debug!(var, "loaded API key from environment");
                Ok(Self::new(value.trim()))
            }
            _ => Err(Error::CredentialsNotFound(var.to_string())),
        }
    }

    /// Expose the secret key value.
    ///
    /// Use sparingly - only when actually sending to an API.
    pub fn expose_secret(&self) -> &str {
        self.0.expose_secret()
    }
}

impl std::fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ApiKey([REDACTED])")
    }
}

impl From<&str> for ApiKey {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}
