//! OpenAI-compatible AI gateway provider.
//!
//! Sends the conversation to `POST {base_url}/v1/chat/completions` with the
//! SeaSage system prompt prepended and a bearer API key.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{AssistantProvider, http_client};
use crate::auth::ApiKey;
use crate::{AssistantReply, ChatRequest, Error, Message, Result};

const CONFIDENCE: f64 = 0.85;
const EMPTY_REPLY: &str = "I couldn't process that request.";

/// Instructions sent ahead of every gateway conversation.
pub const SYSTEM_PROMPT: &str = "You are SeaSage, an expert marine eDNA analysis assistant for Project S.A.G.A.R. You help researchers understand:
- eDNA sequencing results, ASVs, and taxonomy classifications
- Biodiversity indices (Shannon, Simpson, Chao1)
- Novel species detection and conservation alerts
- Station data and sampling locations
- Fisheries sustainability data

Always provide evidence-backed responses with confidence levels. When discussing analysis results, cite data sources and explain methodology. Be concise but thorough. If asked about specific uploads or results, explain what data would be needed.";

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: Vec<Message>,
}

#[derive(Debug, Default, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    #[serde(default)]
    message: Option<ChoiceMessage>,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

impl CompletionResponse {
    /// First choice's text, or the canned reply when it is missing or empty.
    fn into_content(self) -> String {
        self.choices
            .into_iter()
            .next()
            .and_then(|c| c.message)
            .and_then(|m| m.content)
            .filter(|c| !c.is_empty())
            .unwrap_or_else(|| EMPTY_REPLY.to_string())
    }
}

/// Client for an OpenAI-compatible chat completions gateway.
pub struct GatewayProvider {
    base_url: String,
    model: String,
    api_key: ApiKey,
    client: reqwest::Client,
    provenance: String,
}

impl GatewayProvider {
    pub fn new(
        base_url: impl Into<String>,
        model: impl Into<String>,
        api_key: ApiKey,
        timeout: Duration,
    ) -> Result<Self> {
        let model = model.into();
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            provenance: format!("AI Gateway - {model}"),
            model,
            api_key,
            client: http_client(timeout)?,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn completion_request<'a>(&'a self, request: &ChatRequest) -> CompletionRequest<'a> {
        let mut messages = Vec::with_capacity(request.messages.len() + 1);
        messages.push(Message::system(SYSTEM_PROMPT));
        messages.extend(request.messages.iter().cloned());
        CompletionRequest {
            model: &self.model,
            messages,
        }
    }
}

#[async_trait]
impl AssistantProvider for GatewayProvider {
    fn name(&self) -> &str {
        "gateway"
    }

    async fn reply(&self, request: &ChatRequest) -> Result<AssistantReply> {
        let url = format!("{}/v1/chat/completions", self.base_url);
        debug!(%url, model = %self.model, "calling gateway");

        let response = self
            .client
            .post(&url)
            .bearer_auth(self.api_key.expose_secret())
            .json(&self.completion_request(request))
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(Error::RateLimited);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::ProviderApi(format!(
                "gateway returned {status}: {body}"
            )));
        }

        let completion: CompletionResponse = response.json().await?;
        Ok(AssistantReply::new(
            completion.into_content(),
            CONFIDENCE,
            self.provenance.clone(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider() -> GatewayProvider {
        GatewayProvider::new(
            "https://gateway.example/",
            "google/gemini-2.5-flash",
            ApiKey::new("k"),
            Duration::from_secs(1),
        )
        .unwrap()
    }

    #[test]
    fn system_prompt_is_prepended() {
        let provider = provider();
        let request = ChatRequest::new(vec![Message::user("What is Shannon?")], "s");
        let body = serde_json::to_value(provider.completion_request(&request)).unwrap();

        assert_eq!(body["model"], "google/gemini-2.5-flash");
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][0]["content"], SYSTEM_PROMPT);
        assert_eq!(body["messages"][1]["content"], "What is Shannon?");
    }

    #[test]
    fn missing_content_uses_canned_reply() {
        let empty: CompletionResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(empty.into_content(), EMPTY_REPLY);

        let blank: CompletionResponse =
            serde_json::from_str(r#"{"choices":[{"message":{"content":""}}]}"#).unwrap();
        assert_eq!(blank.into_content(), EMPTY_REPLY);

        let full: CompletionResponse =
            serde_json::from_str(r#"{"choices":[{"message":{"content":"Hi"}}]}"#).unwrap();
        assert_eq!(full.into_content(), "Hi");
    }
}
