//! Assistant provider trait and implementations.
//!
//! - [`SageBackendProvider`] - the sagar analysis backend (`POST /chat`)
//! - [`GatewayProvider`] - an OpenAI-compatible chat completions gateway

mod backend;
mod gateway;

use std::time::Duration;

use async_trait::async_trait;

pub use backend::SageBackendProvider;
pub use gateway::{GatewayProvider, SYSTEM_PROMPT};

use crate::{AssistantReply, ChatRequest, Result};

/// One tier of the assistant chain.
///
/// Any error means "this tier could not answer"; the
/// [`Assistant`](crate::Assistant) moves on to the next one.
#[async_trait]
pub trait AssistantProvider: Send + Sync {
    /// Provider name used in logs.
    fn name(&self) -> &str;

    async fn reply(&self, request: &ChatRequest) -> Result<AssistantReply>;
}

pub(crate) fn http_client(timeout: Duration) -> Result<reqwest::Client> {
    Ok(reqwest::Client::builder().timeout(timeout).build()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Error, Message};

    struct EchoProvider;

    #[async_trait]
    impl AssistantProvider for EchoProvider {
        fn name(&self) -> &str {
            "echo"
        }

        async fn reply(&self, request: &ChatRequest) -> Result<AssistantReply> {
            let last = request
                .last_user_message()
                .ok_or_else(|| Error::ProviderApi("no user message".to_string()))?;
            Ok(AssistantReply::new(format!("Echo: {last}"), 0.5, self.name()))
        }
    }

    #[tokio::test]
    async fn provider_is_object_safe() {
        let provider: Box<dyn AssistantProvider> = Box::new(EchoProvider);
        let request = ChatRequest::new(vec![Message::user("depth")], "s");
        let reply = provider.reply(&request).await.unwrap();
        assert_eq!(reply.content, "Echo: depth");
        assert_eq!(reply.provenance, "echo");
    }
}
