//! The SeaSage fallback chain.
//!
//! A reply is always produced:
//!
//! 1. An exact greeting is answered locally.
//! 2. Each configured provider is tried in order.
//! 3. When every provider fails, a canned offline reply is returned.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::auth::ApiKey;
use crate::config::AssistantConfig;
use crate::providers::{AssistantProvider, GatewayProvider, SageBackendProvider};
use crate::{AssistantReply, ChatRequest, Result};

const GREETINGS: &[&str] = &[
    "hello",
    "hi",
    "hey",
    "greetings",
    "good morning",
    "good evening",
];

const GREETING_REPLY: &str = "Hello there! I am SeaSage, fully operational and ready to analyze your marine data. You can ask me to analyze specific stations or project metrics.";

const OFFLINE_REPLY: &str = "I'm having trouble connecting to the cloud. However, I can still analyze 'salinity', 'pH', or 'depth' data using my local neural engine. Try asking for a project analysis!";

pub const GREETING_PROVENANCE: &str = "System";
pub const OFFLINE_PROVENANCE: &str = "System Offline Mode";

/// Whether `message` is exactly one of the recognised greetings, ignoring
/// case and surrounding whitespace.
pub fn is_greeting(message: &str) -> bool {
    let normalized = message.trim().to_lowercase();
    GREETINGS.contains(&normalized.as_str())
}

/// Ordered provider chain with local greeting and offline replies.
#[derive(Clone, Default)]
pub struct Assistant {
    providers: Vec<Arc<dyn AssistantProvider>>,
}

impl Assistant {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a provider; providers are tried in the order they were added.
    #[must_use]
    pub fn with_provider(mut self, provider: Arc<dyn AssistantProvider>) -> Self {
        self.providers.push(provider);
        self
    }

    /// Build the backend → gateway chain from config.
    ///
    /// A tier with an empty URL is left out. The gateway is also left out
    /// when its API key is not set, with a warning.
    pub fn from_config(config: &AssistantConfig) -> Result<Self> {
        let mut assistant = Self::new();

        if !config.backend_url.is_empty() {
            assistant = assistant.with_provider(Arc::new(SageBackendProvider::new(
                &config.backend_url,
                config.timeout(),
            )?));
        }

        if !config.gateway_url.is_empty() {
            match ApiKey::from_env(&config.api_key_env) {
                Ok(key) => {
                    assistant = assistant.with_provider(Arc::new(GatewayProvider::new(
                        &config.gateway_url,
                        &config.model,
                        key,
                        config.timeout(),
                    )?));
                }
                Err(err) => warn!(error = %err, "gateway tier disabled"),
            }
        }

        Ok(assistant)
    }

    pub fn provider_names(&self) -> Vec<&str> {
        self.providers.iter().map(|p| p.name()).collect()
    }

    /// Answer the conversation. Never fails.
    pub async fn reply(&self, request: &ChatRequest) -> AssistantReply {
        if request.last_user_message().is_some_and(is_greeting) {
            debug!(session = %request.session_id, "answering greeting locally");
            return AssistantReply::new(GREETING_REPLY, 1.0, GREETING_PROVENANCE);
        }

        for provider in &self.providers {
            match provider.reply(request).await {
                Ok(reply) => {
                    info!(
                        provider = provider.name(),
                        confidence = reply.confidence,
                        "assistant replied"
                    );
                    return reply;
                }
                Err(err) => {
                    warn!(provider = provider.name(), error = %err, "provider failed, falling back");
                }
            }
        }

        warn!(session = %request.session_id, "all providers failed, replying offline");
        AssistantReply::new(OFFLINE_REPLY, 0.0, OFFLINE_PROVENANCE)
    }
}
