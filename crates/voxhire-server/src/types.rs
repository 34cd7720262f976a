//! Request and response types for the API

use serde::{Deserialize, Serialize};

use voxhire_core::{AnswerRecord, Evaluation, InterviewInfo, Question};

// ============================================================================
// Interview Types
// ============================================================================

#[derive(Deserialize)]
pub struct CreateInterviewRequest {
    pub candidate_name: String,
    pub candidate_email: Option<String>,
    pub professional_summary: String,
    pub skills: String,
}

#[derive(Serialize)]
pub struct InterviewResponse {
    pub id: String,
    pub candidate_name: String,
    pub candidate_email: Option<String>,
    pub professional_summary: String,
    pub skills: String,
    pub status: String,
    pub final_score: Option<f64>,
    pub justification: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<InterviewInfo> for InterviewResponse {
    fn from(info: InterviewInfo) -> Self {
        Self {
            id: info.id,
            candidate_name: info.candidate_name,
            candidate_email: info.candidate_email,
            professional_summary: info.professional_summary,
            skills: info.skills,
            status: match info.status {
                voxhire_core::InterviewStatus::InProgress => "in_progress".to_string(),
                voxhire_core::InterviewStatus::Completed => "completed".to_string(),
            },
            final_score: info.final_score,
            justification: info.justification,
            created_at: info.created_at.to_rfc3339(),
            updated_at: info.updated_at.to_rfc3339(),
        }
    }
}

#[derive(Serialize)]
pub struct CreateInterviewResponse {
    pub interview: InterviewResponse,
    pub first_question: Question,
}

#[derive(Deserialize)]
pub struct SubmitAnswerRequest {
    /// The question being answered, as previously returned by the API.
    pub question: Question,
    pub answer: String,
}

#[derive(Serialize)]
pub struct SubmitAnswerResponse {
    pub question_number: u32,
    pub evaluation: Evaluation,
    /// Next question, absent once the session is complete.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_question: Option<Question>,
    pub completed: bool,
    /// Present only on the completing answer.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub final_score: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub justification: Option<String>,
}

#[derive(Serialize)]
pub struct AnswerResponse {
    pub question_number: u32,
    pub topic: String,
    pub difficulty: String,
    pub question: String,
    pub answer: String,
    pub technical_score: f64,
    pub clarity_score: f64,
    pub confidence_score: f64,
    pub feedback: String,
    pub created_at: String,
}

impl From<AnswerRecord> for AnswerResponse {
    fn from(r: AnswerRecord) -> Self {
        Self {
            question_number: r.question_number,
            topic: r.topic,
            difficulty: r.difficulty,
            question: r.question,
            answer: r.answer,
            technical_score: r.technical_score,
            clarity_score: r.clarity_score,
            confidence_score: r.confidence_score,
            feedback: r.feedback,
            created_at: r.created_at.to_rfc3339(),
        }
    }
}

#[derive(Serialize)]
pub struct InterviewReportResponse {
    pub interview: InterviewResponse,
    pub transcript: Vec<AnswerResponse>,
}
