//! LLM provider layer
//!
//! Provider profiles and the JSON chat-completions client. Every call made
//! through this layer is expected to go through the request governor.

mod client;
mod providers;

pub use client::LlmClient;
pub use providers::{ProviderKind, ProviderProfile};
