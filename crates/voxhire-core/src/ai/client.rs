//! JSON chat-completions client
//!
//! Thin reqwest wrapper for OpenAI-compatible endpoints. The client does no
//! retrying of its own — the request governor owns retry and pacing — it
//! only executes one call and classifies the outcome.

use anyhow::anyhow;
use reqwest::StatusCode;
use serde_json::Value;

use crate::ai::ProviderProfile;
use crate::error::ProviderError;

/// How much of an error body to keep in diagnostics
const ERROR_BODY_LIMIT: usize = 600;

/// Client for one provider backend
pub struct LlmClient {
    http: reqwest::Client,
    profile: ProviderProfile,
    api_key: String,
}

impl LlmClient {
    pub fn new(profile: ProviderProfile, api_key: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            profile,
            api_key: api_key.into(),
        }
    }

    /// Build a client from an API key alone, detecting the backend.
    pub fn from_api_key(api_key: impl Into<String>) -> Self {
        let api_key = api_key.into();
        let profile = ProviderProfile::detect(&api_key);
        tracing::info!(provider = %profile.kind, model = %profile.model, "LLM client configured");
        Self::new(profile, api_key)
    }

    pub fn profile(&self) -> &ProviderProfile {
        &self.profile
    }

    /// One chat-completions call that must reply with a JSON object.
    ///
    /// Sends `response_format: json_object`, extracts
    /// `choices[0].message.content`, and parses it as JSON.
    pub async fn chat_json(&self, system: &str, user: &str) -> Result<Value, ProviderError> {
        let body = serde_json::json!({
            "model": self.profile.model,
            "messages": [
                {"role": "system", "content": system},
                {"role": "user", "content": user}
            ],
            "response_format": {"type": "json_object"}
        });

        let response = self
            .http
            .post(self.profile.chat_completions_url())
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|err| ProviderError::Transient(anyhow!("request failed: {err}")))?;
        let response = self.handle_error_response(response).await?;

        let json: Value = response
            .json()
            .await
            .map_err(|err| ProviderError::Transient(anyhow!("unreadable response body: {err}")))?;

        let content = json
            .get("choices")
            .and_then(|c| c.as_array())
            .and_then(|arr| arr.first())
            .and_then(|choice| choice.get("message"))
            .and_then(|msg| msg.get("content"))
            .and_then(|t| t.as_str())
            .ok_or_else(|| ProviderError::Transient(anyhow!("no content received from provider")))?;

        serde_json::from_str(content).map_err(|err| {
            ProviderError::Transient(anyhow!("model returned malformed JSON: {err}"))
        })
    }

    /// Classify non-success statuses: 429 is the one typed failure the
    /// governor retries, everything else is transient and terminal.
    async fn handle_error_response(
        &self,
        response: reqwest::Response,
    ) -> Result<reqwest::Response, ProviderError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        if status == StatusCode::TOO_MANY_REQUESTS {
            tracing::warn!(provider = %self.profile.kind, "provider throttled the request");
            return Err(ProviderError::RateLimited);
        }

        let detail: String = body.chars().take(ERROR_BODY_LIMIT).collect();
        Err(ProviderError::Transient(anyhow!(
            "HTTP {}: {detail}",
            status.as_u16()
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_api_key_routes_to_the_right_backend() {
        let client = LlmClient::from_api_key("gsk_test");
        assert_eq!(client.profile().kind, crate::ai::ProviderKind::Groq);

        let client = LlmClient::from_api_key("sk-test");
        assert_eq!(client.profile().kind, crate::ai::ProviderKind::OpenAi);
    }
}
