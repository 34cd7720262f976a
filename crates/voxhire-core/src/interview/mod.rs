//! Interview engine
//!
//! Typed operations for the multi-round Q&A flow: first question, adaptive
//! follow-ups, per-answer evaluation, and the final verdict. Every operation
//! is one governed LLM call — submitted through the request governor so
//! provider pacing and retry are handled in one place.

use std::sync::Arc;

use anyhow::anyhow;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::ai::LlmClient;
use crate::error::ProviderError;
use crate::governor::RequestQueue;

pub mod prompts;

/// One interview question
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub question_text: String,
    pub topic: String,
    pub difficulty: String,
}

/// Wrapper shape the model uses for the opening question
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FirstQuestionReply {
    first_question: Question,
}

/// Scores and feedback for one answer
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Evaluation {
    pub technical_score: f64,
    pub clarity_score: f64,
    pub confidence_score: f64,
    pub feedback: String,
}

/// Whole-session verdict
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FinalVerdict {
    pub final_score: f64,
    pub justification: String,
}

/// Interview operations over a governed LLM client
pub struct InterviewService {
    client: Arc<LlmClient>,
    queue: RequestQueue,
}

impl InterviewService {
    pub fn new(client: Arc<LlmClient>, queue: RequestQueue) -> Self {
        Self { client, queue }
    }

    /// Generate the opening, entry-level question from the candidate profile.
    pub async fn initialize_session(
        &self,
        professional_summary: &str,
        skills: &str,
    ) -> Result<Question, ProviderError> {
        let prompt = prompts::first_question(professional_summary, skills);
        let reply = self
            .call("InitSession", prompts::FIRST_QUESTION_SYSTEM, prompt)
            .await?;
        parse::<FirstQuestionReply>(reply).map(|r| r.first_question)
    }

    /// Generate the next question, adapting difficulty to the previous
    /// answer and avoiding already-covered topics. Question numbers in the
    /// coding rounds produce an algorithmic challenge instead.
    pub async fn next_question(
        &self,
        resume_summary: &str,
        recent_topics: &[String],
        prev_answer: &str,
        question_number: u32,
    ) -> Result<Question, ProviderError> {
        let (system, prompt) =
            prompts::next_question(resume_summary, recent_topics, prev_answer, question_number);
        let reply = self.call("GenerateQuestion", system, prompt).await?;
        parse(reply)
    }

    /// Score one answer on technical merit, clarity, and confidence.
    pub async fn evaluate_answer(
        &self,
        question: &str,
        answer: &str,
    ) -> Result<Evaluation, ProviderError> {
        let prompt = prompts::evaluate_answer(question, answer);
        let reply = self
            .call("EvaluateAnswer", prompts::EVALUATOR_SYSTEM, prompt)
            .await?;
        parse(reply)
    }

    /// Compute the 0-100 verdict over the full transcript.
    pub async fn final_score(&self, transcript: &str) -> Result<FinalVerdict, ProviderError> {
        let prompt = prompts::final_score(transcript);
        let reply = self
            .call("FinalScore", prompts::FINAL_SCORE_SYSTEM, prompt)
            .await?;
        parse(reply)
    }

    /// Submit one chat call through the governor.
    async fn call(
        &self,
        label: &str,
        system: &'static str,
        prompt: String,
    ) -> Result<Value, ProviderError> {
        let client = Arc::clone(&self.client);
        self.queue
            .invoke(label, move || {
                let client = Arc::clone(&client);
                let prompt = prompt.clone();
                async move { client.chat_json(system, &prompt).await }
            })
            .await
    }
}

fn parse<T: DeserializeOwned>(reply: Value) -> Result<T, ProviderError> {
    serde_json::from_value(reply)
        .map_err(|err| ProviderError::Transient(anyhow!("unexpected model reply shape: {err}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn first_question_reply_parses() {
        let reply = json!({
            "firstQuestion": {
                "questionText": "What is a variable?",
                "topic": "basics",
                "difficulty": "easy"
            }
        });

        let parsed: FirstQuestionReply = parse(reply).unwrap();
        assert_eq!(parsed.first_question.topic, "basics");
        assert_eq!(parsed.first_question.question_text, "What is a variable?");
    }

    #[test]
    fn evaluation_reply_parses() {
        let reply = json!({
            "technicalScore": 7.5,
            "clarityScore": 8,
            "confidenceScore": 6,
            "feedback": "Solid, but missed the edge cases."
        });

        let parsed: Evaluation = parse(reply).unwrap();
        assert_eq!(parsed.technical_score, 7.5);
        assert_eq!(parsed.clarity_score, 8.0);
        assert_eq!(parsed.feedback, "Solid, but missed the edge cases.");
    }

    #[test]
    fn verdict_reply_parses() {
        let reply = json!({
            "finalScore": 74,
            "justification": "Consistent fundamentals, weak algorithms."
        });

        let parsed: FinalVerdict = parse(reply).unwrap();
        assert_eq!(parsed.final_score, 74.0);
    }

    #[test]
    fn malformed_reply_is_transient() {
        let reply = json!({"unexpected": true});
        let err = parse::<Evaluation>(reply).unwrap_err();
        assert!(matches!(err, ProviderError::Transient(_)));
    }
}
