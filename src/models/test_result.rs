// src/models/test_result.rs

use serde::{Deserialize, Serialize};
use sqlx::{prelude::FromRow, types::Json};
use std::collections::BTreeMap;
use validator::Validate;

/// One answer as the client submits it: the question id and the option
/// label the candidate picked, or None when they left it blank.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmittedAnswer {
    pub question_id: i64,
    pub selected_option: Option<String>,
}

/// One graded answer as stored inside a result. Snapshots the question
/// text and options so the result survives later edits to the bank.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnsweredQuestion {
    pub question: String,
    pub options: BTreeMap<String, String>,
    pub selected_answer: Option<String>,
    pub correct_answer: String,
    pub is_correct: bool,
}

/// Represents the 'test_results' table in the database.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TestResult {
    pub id: i64,
    pub user_email: String,
    pub student_name: String,
    pub domain: String,
    pub score: i64,
    pub total_questions: i64,
    /// Whole-number percentage, rounded half away from zero.
    pub percentage: i64,
    /// Ordinal of this attempt at the time it was recorded (1-based).
    pub attempts_used: i64,
    pub total_attempts: i64,
    /// Seconds the candidate spent, as reported by the client.
    pub time_taken: i64,
    pub started_on: chrono::DateTime<chrono::Utc>,
    pub completed_on: chrono::DateTime<chrono::Utc>,
    pub questions: Json<Vec<AnsweredQuestion>>,
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// DTO for submitting a finished test. Serializable as well since the
/// session state machine builds one on the client side.
#[derive(Debug, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SubmitTestRequest {
    #[validate(length(min = 1, max = 100, message = "Student name is required"))]
    pub student_name: String,
    #[validate(email(message = "A valid email address is required"))]
    pub email: String,
    #[validate(length(min = 1, max = 50, message = "Domain is required"))]
    pub domain: String,
    #[validate(length(min = 1, message = "At least one answer is required"))]
    pub questions: Vec<SubmittedAnswer>,
    #[validate(range(min = 0))]
    pub time_taken: i64,
    pub started_on: chrono::DateTime<chrono::Utc>,
    pub completed_on: chrono::DateTime<chrono::Utc>,
}
