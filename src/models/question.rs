// src/models/question.rs

use serde::{Deserialize, Serialize};
use sqlx::{prelude::FromRow, types::Json};
use std::collections::BTreeMap;
use validator::{Validate, ValidationError};

/// Difficulty band a question belongs to. Stored as lowercase text so the
/// sampler can filter on it directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

/// Full question row, including the answer key. Never serialized to
/// candidates; see [`PublicQuestion`].
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Question {
    pub id: i64,
    pub question_text: String,
    pub options: Json<BTreeMap<String, String>>,
    pub correct_answer: String,
    pub category: String,
    pub difficulty: Difficulty,
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// Candidate-facing view of a question with the answer key stripped.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublicQuestion {
    pub id: i64,
    pub question: String,
    pub options: Json<BTreeMap<String, String>>,
    pub category: String,
    pub difficulty: Difficulty,
}

impl From<Question> for PublicQuestion {
    fn from(q: Question) -> Self {
        PublicQuestion {
            id: q.id,
            question: q.question_text,
            options: q.options,
            category: q.category,
            difficulty: q.difficulty,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateQuestionRequest {
    #[validate(length(min = 1, max = 1000, message = "Question text must be 1-1000 characters"))]
    pub question_text: String,
    #[validate(custom(function = validate_options))]
    pub options: BTreeMap<String, String>,
    #[validate(length(min = 1, max = 10, message = "Correct answer label must be 1-10 characters"))]
    pub correct_answer: String,
    #[validate(length(min = 1, max = 50, message = "Category must be 1-50 characters"))]
    pub category: String,
    pub difficulty: Difficulty,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateQuestionRequest {
    #[validate(length(min = 1, max = 1000, message = "Question text must be 1-1000 characters"))]
    pub question_text: Option<String>,
    #[validate(custom(function = validate_options))]
    pub options: Option<BTreeMap<String, String>>,
    #[validate(length(min = 1, max = 10, message = "Correct answer label must be 1-10 characters"))]
    pub correct_answer: Option<String>,
    #[validate(length(min = 1, max = 50, message = "Category must be 1-50 characters"))]
    pub category: Option<String>,
    pub difficulty: Option<Difficulty>,
}

/// An option map needs at least two labelled choices to be a real question,
/// and labels stay short so the client can render them as buttons.
fn validate_options(options: &BTreeMap<String, String>) -> Result<(), ValidationError> {
    if options.len() < 2 || options.len() > 6 {
        return Err(ValidationError::new("options_count"));
    }
    for (label, text) in options {
        if label.trim().is_empty() || label.len() > 10 {
            return Err(ValidationError::new("option_label"));
        }
        if text.trim().is_empty() || text.len() > 500 {
            return Err(ValidationError::new("option_text"));
        }
    }
    Ok(())
}
