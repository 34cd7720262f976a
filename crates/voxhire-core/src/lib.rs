//! Voxhire core library
//!
//! Backend for AI-administered technical interviews:
//! - Request governor: single-flight, cooldown-enforcing queue for every
//!   outbound LLM call, with durable cooldown state
//! - LLM client for OpenAI-compatible chat-completions endpoints
//! - Interview engine: question generation, answer evaluation, final scoring
//! - SQLite persistence for candidates, transcripts, and governor state

pub mod ai;
pub mod constants;
pub mod error;
pub mod governor;
pub mod interview;
pub mod paths;
pub mod storage;

pub use ai::{LlmClient, ProviderKind, ProviderProfile};
pub use error::ProviderError;
pub use governor::{CooldownStore, MemoryCooldownStore, RequestQueue, StoreError};
pub use interview::{Evaluation, FinalVerdict, InterviewService, Question};
pub use storage::{AnswerRecord, Database, InterviewInfo, InterviewStatus, InterviewStore, ThrottleSlot};
