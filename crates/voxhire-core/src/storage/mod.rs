//! Persistence layer
//!
//! SQLite-based storage for:
//! - Interview records and candidate profiles
//! - Answer transcripts with per-answer scores
//! - The request governor's durable cooldown timestamp

mod database;
mod interviews;
mod throttle;

pub use database::Database;
pub use interviews::{AnswerRecord, InterviewInfo, InterviewStatus, InterviewStore};
pub use throttle::ThrottleSlot;
