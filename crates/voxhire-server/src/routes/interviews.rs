//! Interview session endpoints

use std::fmt::Write as _;
use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};

use voxhire_core::constants::interview::TOTAL_ROUNDS;
use voxhire_core::{AnswerRecord, Database, InterviewService, InterviewStatus, InterviewStore};

use crate::error::AppError;
use crate::types::{
    AnswerResponse, CreateInterviewRequest, CreateInterviewResponse, InterviewReportResponse,
    InterviewResponse, SubmitAnswerRequest, SubmitAnswerResponse,
};
use crate::AppState;

/// Build the interviews router
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_interviews).post(create_interview))
        .route("/:id", get(get_interview).delete(delete_interview))
        .route("/:id/answers", axum::routing::post(submit_answer))
}

fn open_store(state: &AppState) -> Result<InterviewStore, AppError> {
    let db = Database::new(&state.db_path)?;
    Ok(InterviewStore::new(db))
}

fn require_service(state: &AppState) -> Result<Arc<InterviewService>, AppError> {
    state.service.clone().ok_or_else(|| {
        AppError::Unavailable(
            "No LLM backend configured; set VOXHIRE_API_KEY, OPENAI_API_KEY, or GROQ_API_KEY"
                .to_string(),
        )
    })
}

/// List all interviews, most recently updated first
async fn list_interviews(
    State(state): State<AppState>,
) -> Result<Json<Vec<InterviewResponse>>, AppError> {
    let store = open_store(&state)?;
    let interviews = store.list_interviews()?;
    Ok(Json(interviews.into_iter().map(Into::into).collect()))
}

/// Create an interview and generate its opening question
async fn create_interview(
    State(state): State<AppState>,
    Json(req): Json<CreateInterviewRequest>,
) -> Result<(StatusCode, Json<CreateInterviewResponse>), AppError> {
    if req.candidate_name.trim().is_empty() {
        return Err(AppError::BadRequest("candidate_name is required".to_string()));
    }
    if req.professional_summary.trim().is_empty() {
        return Err(AppError::BadRequest(
            "professional_summary is required".to_string(),
        ));
    }

    let service = require_service(&state)?;
    let first_question = service
        .initialize_session(&req.professional_summary, &req.skills)
        .await?;

    let store = open_store(&state)?;
    let id = store.create_interview(
        &req.candidate_name,
        req.candidate_email.as_deref(),
        &req.professional_summary,
        &req.skills,
    )?;

    let interview = store
        .get_interview(&id)?
        .ok_or_else(|| AppError::Internal("Failed to fetch created interview".to_string()))?;

    tracing::info!(interview_id = %id, candidate = %req.candidate_name, "Interview started");

    Ok((
        StatusCode::CREATED,
        Json(CreateInterviewResponse {
            interview: interview.into(),
            first_question,
        }),
    ))
}

/// Get an interview with its full transcript
async fn get_interview(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<InterviewReportResponse>, AppError> {
    let store = open_store(&state)?;

    let interview = store
        .get_interview(&id)?
        .ok_or_else(|| AppError::NotFound(format!("Interview {} not found", id)))?;
    let transcript = store.load_transcript(&id)?;

    Ok(Json(InterviewReportResponse {
        interview: interview.into(),
        transcript: transcript.into_iter().map(AnswerResponse::from).collect(),
    }))
}

/// Submit an answer: evaluate it, record it, and either produce the next
/// question or, on the final round, score the whole session.
async fn submit_answer(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<SubmitAnswerRequest>,
) -> Result<Json<SubmitAnswerResponse>, AppError> {
    if req.answer.trim().is_empty() {
        return Err(AppError::BadRequest("answer is required".to_string()));
    }

    let service = require_service(&state)?;
    let store = open_store(&state)?;

    let interview = store
        .get_interview(&id)?
        .ok_or_else(|| AppError::NotFound(format!("Interview {} not found", id)))?;
    if interview.status == InterviewStatus::Completed {
        return Err(AppError::BadRequest(
            "Interview is already completed".to_string(),
        ));
    }

    let question_number = store.count_answers(&id)? + 1;

    let evaluation = service
        .evaluate_answer(&req.question.question_text, &req.answer)
        .await?;
    store.record_answer(&id, question_number, &req.question, &req.answer, &evaluation)?;

    if question_number >= TOTAL_ROUNDS {
        let transcript = store.load_transcript(&id)?;
        let verdict = service.final_score(&format_transcript(&transcript)).await?;
        store.complete_interview(&id, &verdict)?;

        tracing::info!(
            interview_id = %id,
            final_score = verdict.final_score,
            "Interview completed"
        );

        return Ok(Json(SubmitAnswerResponse {
            question_number,
            evaluation,
            next_question: None,
            completed: true,
            final_score: Some(verdict.final_score),
            justification: Some(verdict.justification),
        }));
    }

    let topics: Vec<String> = store
        .load_transcript(&id)?
        .into_iter()
        .map(|r| r.topic)
        .collect();
    let next = service
        .next_question(
            &interview.professional_summary,
            &topics,
            &req.answer,
            question_number + 1,
        )
        .await?;

    Ok(Json(SubmitAnswerResponse {
        question_number,
        evaluation,
        next_question: Some(next),
        completed: false,
        final_score: None,
        justification: None,
    }))
}

/// Delete an interview and its transcript
async fn delete_interview(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let store = open_store(&state)?;

    store
        .get_interview(&id)?
        .ok_or_else(|| AppError::NotFound(format!("Interview {} not found", id)))?;
    store.delete_interview(&id)?;

    Ok(StatusCode::NO_CONTENT)
}

/// Flatten a transcript into the text block the final-score prompt expects.
fn format_transcript(transcript: &[AnswerRecord]) -> String {
    let mut out = String::new();
    for record in transcript {
        let _ = writeln!(
            out,
            "Q{} [{}] {}\nAnswer: {}\nScores: technical {}, clarity {}, confidence {}",
            record.question_number,
            record.topic,
            record.question,
            record.answer,
            record.technical_score,
            record.clarity_score,
            record.confidence_score,
        );
    }
    out
}
