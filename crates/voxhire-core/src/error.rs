//! Failure taxonomy for governed provider calls
//!
//! Every outbound LLM call settles with exactly one of these. The governor
//! retries `RateLimited` once; everything else is terminal on first failure.

use thiserror::Error;

/// Failure from a governed provider call
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Provider signaled throttling (HTTP 429 or an equivalent marker)
    #[error("rate limit exceeded")]
    RateLimited,

    /// Any other failure from the wrapped call (network, malformed reply,
    /// provider-side error); never retried
    #[error(transparent)]
    Transient(#[from] anyhow::Error),

    /// The governor worker is gone before the job settled (shutdown)
    #[error("request governor unavailable")]
    ChannelClosed,
}

impl ProviderError {
    /// Whether this failure means the provider throttled us.
    ///
    /// Mirrors the provider's two signal shapes: a typed 429 status, or a
    /// "429" marker buried in an error message from a layer that didn't
    /// classify the status itself.
    pub fn is_throttled(&self) -> bool {
        match self {
            Self::RateLimited => true,
            Self::Transient(err) => mentions_rate_limit(&err.to_string()),
            Self::ChannelClosed => false,
        }
    }

    /// Fold throttling markers hidden in transient messages into the single
    /// `RateLimited` kind, so callers only ever match one variant.
    pub fn normalized(self) -> Self {
        match self {
            Self::Transient(err) if mentions_rate_limit(&err.to_string()) => Self::RateLimited,
            other => other,
        }
    }
}

fn mentions_rate_limit(message: &str) -> bool {
    message.contains("429") || message.to_ascii_lowercase().contains("rate limit")
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;

    #[test]
    fn typed_rate_limit_is_throttled() {
        assert!(ProviderError::RateLimited.is_throttled());
        assert!(!ProviderError::ChannelClosed.is_throttled());
    }

    #[test]
    fn message_markers_count_as_throttling() {
        let err = ProviderError::Transient(anyhow!("HTTP 429: Too Many Requests"));
        assert!(err.is_throttled());

        let err = ProviderError::Transient(anyhow!("Rate limit reached for model"));
        assert!(err.is_throttled());

        let err = ProviderError::Transient(anyhow!("connection reset by peer"));
        assert!(!err.is_throttled());
    }

    #[test]
    fn normalized_folds_markers_into_rate_limited() {
        let err = ProviderError::Transient(anyhow!("status: 429")).normalized();
        assert!(matches!(err, ProviderError::RateLimited));

        let err = ProviderError::Transient(anyhow!("HTTP 500: boom")).normalized();
        assert!(matches!(err, ProviderError::Transient(_)));
    }
}
