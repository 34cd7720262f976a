//! Provider profiles
//!
//! Two OpenAI-compatible backends are recognized, each with its own
//! throughput profile: OpenAI's free tier is quota-constrained (3 RPM, so a
//! strict cooldown), Groq is effectively unconstrained for this workload.
//! The backend is picked once at startup from the API key shape and never
//! changes at runtime.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::{ai, governor};

/// Which chat-completions backend a profile targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderKind {
    OpenAi,
    Groq,
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderKind::OpenAi => write!(f, "OpenAI"),
            ProviderKind::Groq => write!(f, "Groq"),
        }
    }
}

/// Resolved backend configuration: endpoint, model, and cooldown profile
#[derive(Debug, Clone)]
pub struct ProviderProfile {
    pub kind: ProviderKind,
    pub base_url: String,
    pub model: String,
    /// Minimum spacing the governor enforces between calls to this backend
    pub cooldown: Duration,
}

impl ProviderProfile {
    /// Pick the profile matching an API key.
    ///
    /// Groq keys start with `gsk_`; anything else is treated as OpenAI.
    pub fn detect(api_key: &str) -> Self {
        if api_key.starts_with(ai::GROQ_KEY_PREFIX) {
            Self::groq()
        } else {
            Self::openai()
        }
    }

    pub fn openai() -> Self {
        Self {
            kind: ProviderKind::OpenAi,
            base_url: ai::OPENAI_BASE_URL.to_string(),
            model: ai::OPENAI_MODEL.to_string(),
            cooldown: Duration::from_millis(governor::STRICT_COOLDOWN_MS),
        }
    }

    pub fn groq() -> Self {
        Self {
            kind: ProviderKind::Groq,
            base_url: ai::GROQ_BASE_URL.to_string(),
            model: ai::GROQ_MODEL.to_string(),
            cooldown: Duration::from_millis(governor::FAST_COOLDOWN_MS),
        }
    }

    /// Full URL for the chat-completions endpoint
    pub fn chat_completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn groq_keys_are_detected_by_prefix() {
        let profile = ProviderProfile::detect("gsk_abc123");
        assert_eq!(profile.kind, ProviderKind::Groq);
        assert_eq!(profile.model, ai::GROQ_MODEL);
        assert_eq!(profile.cooldown, Duration::from_millis(1_000));
    }

    #[test]
    fn other_keys_fall_back_to_openai() {
        let profile = ProviderProfile::detect("sk-proj-xyz");
        assert_eq!(profile.kind, ProviderKind::OpenAi);
        assert_eq!(profile.model, ai::OPENAI_MODEL);
        assert_eq!(profile.cooldown, Duration::from_millis(22_000));
    }

    #[test]
    fn chat_completions_url_joins_base() {
        assert_eq!(
            ProviderProfile::groq().chat_completions_url(),
            "https://api.groq.com/openai/v1/chat/completions"
        );
    }
}
