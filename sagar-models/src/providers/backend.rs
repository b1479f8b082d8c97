//! sagar analysis backend provider.
//!
//! The backend answers `POST {base_url}/chat` with
//! `{"content": ..., "confidence": ..., "provenance": ...}`; the last two are
//! optional.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use tracing::debug;

use super::{AssistantProvider, http_client};
use crate::{AssistantReply, ChatRequest, Error, Result};

const NAME: &str = "SeaSage Backend";
const DEFAULT_CONFIDENCE: f64 = 0.8;

#[derive(Debug, Deserialize)]
struct BackendReply {
    content: String,
    #[serde(default)]
    confidence: Option<f64>,
    #[serde(default)]
    provenance: Option<String>,
}

/// Client for the sagar analysis backend.
pub struct SageBackendProvider {
    base_url: String,
    client: reqwest::Client,
}

impl SageBackendProvider {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client: http_client(timeout)?,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl AssistantProvider for SageBackendProvider {
    fn name(&self) -> &str {
        NAME
    }

    async fn reply(&self, request: &ChatRequest) -> Result<AssistantReply> {
        let url = format!("{}/chat", self.base_url);
        debug!(%url, messages = request.messages.len(), "calling backend");

        let response = self.client.post(&url).json(request).send().await?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(Error::RateLimited);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::ProviderApi(format!(
                "backend returned {status}: {body}"
            )));
        }

        let reply: BackendReply = response.json().await?;
        Ok(AssistantReply {
            content: reply.content,
            confidence: reply.confidence.unwrap_or(DEFAULT_CONFIDENCE),
            provenance: reply.provenance.unwrap_or_else(|| NAME.to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slash_is_trimmed() {
        let provider =
            SageBackendProvider::new("http://localhost:8000/", Duration::from_secs(1)).unwrap();
        assert_eq!(provider.base_url(), "http://localhost:8000");
    }

    #[test]
    fn reply_fields_are_optional() {
        let reply: BackendReply = serde_json::from_str(r#"{"content": "ok"}"#).unwrap();
        assert_eq!(reply.content, "ok");
        assert!(reply.confidence.is_none());
        assert!(reply.provenance.is_none());
    }
}
