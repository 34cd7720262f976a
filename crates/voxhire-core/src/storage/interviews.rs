//! Interview CRUD operations

use anyhow::Result;
use chrono::{DateTime, Utc};
use rusqlite::params;
use serde::{Deserialize, Serialize};

use super::database::Database;
use crate::interview::{Evaluation, FinalVerdict, Question};

/// Lifecycle state of an interview
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterviewStatus {
    InProgress,
    Completed,
}

impl InterviewStatus {
    fn parse(raw: &str) -> Self {
        match raw {
            "completed" => InterviewStatus::Completed,
            _ => InterviewStatus::InProgress,
        }
    }
}

/// Interview metadata and candidate profile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InterviewInfo {
    pub id: String,
    pub candidate_name: String,
    pub candidate_email: Option<String>,
    pub professional_summary: String,
    pub skills: String,
    pub status: InterviewStatus,
    pub final_score: Option<f64>,
    pub justification: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One transcript row: a question, the candidate's answer, and its scores
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnswerRecord {
    pub question_number: u32,
    pub topic: String,
    pub difficulty: String,
    pub question: String,
    pub answer: String,
    pub technical_score: f64,
    pub clarity_score: f64,
    pub confidence_score: f64,
    pub feedback: String,
    pub created_at: DateTime<Utc>,
}

/// Store for interview records and transcripts
pub struct InterviewStore {
    db: Database,
}

impl InterviewStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Create a new interview from a candidate profile
    pub fn create_interview(
        &self,
        candidate_name: &str,
        candidate_email: Option<&str>,
        professional_summary: &str,
        skills: &str,
    ) -> Result<String> {
        let id = uuid::Uuid::new_v4().to_string();
        let now = Utc::now().to_rfc3339();

        self.db.conn().execute(
            "INSERT INTO interviews
                 (id, candidate_name, candidate_email, professional_summary, skills,
                  status, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, 'in_progress', ?6, ?7)",
            params![
                id,
                candidate_name,
                candidate_email,
                professional_summary,
                skills,
                now,
                now
            ],
        )?;

        Ok(id)
    }

    /// List all interviews, most recently updated first
    pub fn list_interviews(&self) -> Result<Vec<InterviewInfo>> {
        let mut stmt = self.db.conn().prepare(
            "SELECT id, candidate_name, candidate_email, professional_summary, skills,
                    status, final_score, justification, created_at, updated_at
             FROM interviews ORDER BY updated_at DESC",
        )?;

        let interviews = stmt
            .query_map([], Self::map_interview_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(interviews)
    }

    /// Get a specific interview
    pub fn get_interview(&self, interview_id: &str) -> Result<Option<InterviewInfo>> {
        let mut stmt = self.db.conn().prepare(
            "SELECT id, candidate_name, candidate_email, professional_summary, skills,
                    status, final_score, justification, created_at, updated_at
             FROM interviews WHERE id = ?1",
        )?;

        match stmt.query_row([interview_id], Self::map_interview_row) {
            Ok(info) => Ok(Some(info)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Record one answered question with its evaluation
    pub fn record_answer(
        &self,
        interview_id: &str,
        question_number: u32,
        question: &Question,
        answer: &str,
        evaluation: &Evaluation,
    ) -> Result<()> {
        let now = Utc::now().to_rfc3339();

        self.db.conn().execute(
            "INSERT INTO answers
                 (interview_id, question_number, topic, difficulty, question, answer,
                  technical_score, clarity_score, confidence_score, feedback, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
            params![
                interview_id,
                question_number,
                question.topic,
                question.difficulty,
                question.question_text,
                answer,
                evaluation.technical_score,
                evaluation.clarity_score,
                evaluation.confidence_score,
                evaluation.feedback,
                now
            ],
        )?;

        self.db.conn().execute(
            "UPDATE interviews SET updated_at = ?1 WHERE id = ?2",
            params![now, interview_id],
        )?;

        Ok(())
    }

    /// Load the transcript in question order
    pub fn load_transcript(&self, interview_id: &str) -> Result<Vec<AnswerRecord>> {
        let mut stmt = self.db.conn().prepare(
            "SELECT question_number, topic, difficulty, question, answer,
                    technical_score, clarity_score, confidence_score, feedback, created_at
             FROM answers WHERE interview_id = ?1 ORDER BY question_number",
        )?;

        let records = stmt.query_map([interview_id], |row| {
            let created_at: String = row.get(9)?;
            Ok(AnswerRecord {
                question_number: row.get(0)?,
                topic: row.get(1)?,
                difficulty: row.get(2)?,
                question: row.get(3)?,
                answer: row.get(4)?,
                technical_score: row.get(5)?,
                clarity_score: row.get(6)?,
                confidence_score: row.get(7)?,
                feedback: row.get(8)?,
                created_at: parse_timestamp(&created_at),
            })
        })?;

        records.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// Number of answers recorded so far
    pub fn count_answers(&self, interview_id: &str) -> Result<u32> {
        let count: i64 = self.db.conn().query_row(
            "SELECT COUNT(*) FROM answers WHERE interview_id = ?1",
            [interview_id],
            |row| row.get(0),
        )?;
        Ok(count as u32)
    }

    /// Mark an interview completed with its verdict
    pub fn complete_interview(&self, interview_id: &str, verdict: &FinalVerdict) -> Result<()> {
        let now = Utc::now().to_rfc3339();

        self.db.conn().execute(
            "UPDATE interviews
             SET status = 'completed', final_score = ?1, justification = ?2, updated_at = ?3
             WHERE id = ?4",
            params![
                verdict.final_score,
                verdict.justification,
                now,
                interview_id
            ],
        )?;

        Ok(())
    }

    /// Delete an interview; answers go with it via ON DELETE CASCADE
    pub fn delete_interview(&self, interview_id: &str) -> Result<()> {
        self.db.conn().execute(
            "DELETE FROM interviews WHERE id = ?1",
            params![interview_id],
        )?;

        tracing::info!(interview_id = %interview_id, "Interview deleted from database");
        Ok(())
    }

    fn map_interview_row(row: &rusqlite::Row) -> rusqlite::Result<InterviewInfo> {
        let status: String = row.get(5)?;
        let created_at: String = row.get(8)?;
        let updated_at: String = row.get(9)?;

        Ok(InterviewInfo {
            id: row.get(0)?,
            candidate_name: row.get(1)?,
            candidate_email: row.get(2)?,
            professional_summary: row.get(3)?,
            skills: row.get(4)?,
            status: InterviewStatus::parse(&status),
            final_score: row.get(6)?,
            justification: row.get(7)?,
            created_at: parse_timestamp(&created_at),
            updated_at: parse_timestamp(&updated_at),
        })
    }
}

fn parse_timestamp(raw: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}
