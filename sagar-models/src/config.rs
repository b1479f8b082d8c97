//! Assistant configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Default sagar analysis backend.
pub const DEFAULT_BACKEND_URL: &str = "http://localhost:8000";

/// Default OpenAI-compatible gateway.
pub const DEFAULT_GATEWAY_URL: &str = "https://ai.gateway.lovable.dev";

/// Default gateway model.
pub const DEFAULT_MODEL: &str = "google/gemini-2.5-flash";

/// Environment variable holding the gateway API key.
pub const DEFAULT_API_KEY_ENV: &str = "SAGAR_GATEWAY_API_KEY";

/// `[assistant]` section of the sagar config file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssistantConfig {
    /// Base URL of the sagar analysis backend. Empty disables the tier.
    pub backend_url: String,
    /// Base URL of the AI gateway. Empty disables the tier.
    pub gateway_url: String,
    pub model: String,
    /// Name of the environment variable the gateway key is read from.
    pub api_key_env: String,
    /// Per-request timeout for every provider.
    pub timeout_secs: u64,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            backend_url: DEFAULT_BACKEND_URL.to_string(),
            gateway_url: DEFAULT_GATEWAY_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            api_key_env: DEFAULT_API_KEY_ENV.to_string(),
            timeout_secs: 30,
        }
    }
}

impl AssistantConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
