// src/handlers/admin.rs

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use sqlx::{QueryBuilder, Sqlite, SqlitePool, types::Json as SqlJson};
use std::collections::BTreeMap;
use validator::Validate;

use crate::{
    error::AppError,
    models::{
        internship::InternshipApplication,
        question::{CreateQuestionRequest, Difficulty, Question, UpdateQuestionRequest},
        test_result::TestResult,
        user::User,
    },
};

/// Lists all registered candidates.
/// Admin only.
pub async fn list_users(State(pool): State<SqlitePool>) -> Result<impl IntoResponse, AppError> {
    let users = sqlx::query_as::<_, User>(
        "SELECT id, name, email, password, phone, domain, role, payment_state, attempts_used, created_at \
         FROM users ORDER BY id DESC",
    )
    .fetch_all(&pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to list users: {:?}", e);
        AppError::InternalServerError(e.to_string())
    })?;

    Ok(Json(users))
}

#[derive(Debug, Deserialize)]
pub struct QuestionFilter {
    pub category: Option<String>,
    pub difficulty: Option<Difficulty>,
}

/// Lists bank questions, optionally filtered by category and difficulty.
/// Admin only; this view includes the answer keys.
pub async fn list_questions(
    State(pool): State<SqlitePool>,
    Query(filter): Query<QuestionFilter>,
) -> Result<impl IntoResponse, AppError> {
    let questions = sqlx::query_as::<_, Question>(
        r#"
        SELECT id, question_text, options, correct_answer, category, difficulty, created_at
        FROM questions
        WHERE (?1 IS NULL OR LOWER(category) = LOWER(?1))
          AND (?2 IS NULL OR difficulty = ?2)
        ORDER BY id DESC
        "#,
    )
    .bind(&filter.category)
    .bind(filter.difficulty)
    .fetch_all(&pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to list questions: {:?}", e);
        AppError::InternalServerError(e.to_string())
    })?;

    Ok(Json(questions))
}

/// Creates a new bank question.
/// Admin only.
pub async fn create_question(
    State(pool): State<SqlitePool>,
    Json(payload): Json<CreateQuestionRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }
    ensure_answer_in_options(&payload.correct_answer, &payload.options)?;

    let id = sqlx::query_scalar::<_, i64>(
        "INSERT INTO questions (question_text, options, correct_answer, category, difficulty) \
         VALUES (?1, ?2, ?3, ?4, ?5) \
         RETURNING id",
    )
    .bind(payload.question_text.trim())
    .bind(SqlJson(&payload.options))
    .bind(&payload.correct_answer)
    .bind(payload.category.trim().to_lowercase())
    .bind(payload.difficulty)
    .fetch_one(&pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to create question: {:?}", e);
        AppError::InternalServerError(e.to_string())
    })?;

    Ok((StatusCode::CREATED, Json(serde_json::json!({"id": id}))))
}

/// Updates a question by ID. Fields are optional.
/// Admin only.
pub async fn update_question(
    State(pool): State<SqlitePool>,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateQuestionRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    if payload.question_text.is_none()
        && payload.options.is_none()
        && payload.correct_answer.is_none()
        && payload.category.is_none()
        && payload.difficulty.is_none()
    {
        return Ok(StatusCode::OK);
    }

    // The stored answer key must stay one of the option labels, so check
    // the merged row before touching anything.
    if payload.options.is_some() || payload.correct_answer.is_some() {
        let current = sqlx::query_as::<_, Question>(
            "SELECT id, question_text, options, correct_answer, category, difficulty, created_at \
             FROM questions WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&pool)
        .await?
        .ok_or(AppError::NotFound("Question not found".to_string()))?;

        let merged_options = payload.options.as_ref().unwrap_or(&current.options.0);
        let merged_answer = payload
            .correct_answer
            .as_deref()
            .unwrap_or(&current.correct_answer);
        ensure_answer_in_options(merged_answer, merged_options)?;
    }

    let mut builder: QueryBuilder<Sqlite> = QueryBuilder::new("UPDATE questions SET ");
    let mut separated = builder.separated(", ");

    if let Some(question_text) = payload.question_text {
        separated.push("question_text = ");
        separated.push_bind_unseparated(question_text);
    }

    if let Some(options) = payload.options {
        separated.push("options = ");
        separated.push_bind_unseparated(SqlJson(options));
    }

    if let Some(correct_answer) = payload.correct_answer {
        separated.push("correct_answer = ");
        separated.push_bind_unseparated(correct_answer);
    }

    if let Some(category) = payload.category {
        separated.push("category = ");
        separated.push_bind_unseparated(category.trim().to_lowercase());
    }

    if let Some(difficulty) = payload.difficulty {
        separated.push("difficulty = ");
        separated.push_bind_unseparated(difficulty);
    }

    builder.push(" WHERE id = ");
    builder.push_bind(id);

    let result = builder.build().execute(&pool).await.map_err(|e| {
        tracing::error!("Failed to update question: {:?}", e);
        AppError::InternalServerError(e.to_string())
    })?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Question not found".to_string()));
    }

    Ok(StatusCode::OK)
}

/// Deletes a bank question by ID.
/// Admin only.
pub async fn delete_question(
    State(pool): State<SqlitePool>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let result = sqlx::query("DELETE FROM questions WHERE id = ?1")
        .bind(id)
        .execute(&pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to delete question: {:?}", e);
            AppError::InternalServerError(e.to_string())
        })?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Question not found".to_string()));
    }

    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Deserialize)]
pub struct ResultFilter {
    pub email: Option<String>,
}

/// Lists stored test results, optionally filtered to one candidate.
/// Admin only.
pub async fn list_results(
    State(pool): State<SqlitePool>,
    Query(filter): Query<ResultFilter>,
) -> Result<impl IntoResponse, AppError> {
    let email = filter.email.map(|e| e.trim().to_lowercase());

    let results = sqlx::query_as::<_, TestResult>(
        r#"
        SELECT id, user_email, student_name, domain, score, total_questions, percentage,
               attempts_used, total_attempts, time_taken, started_on, completed_on,
               questions, created_at
        FROM test_results
        WHERE (?1 IS NULL OR user_email = ?1)
        ORDER BY id DESC
        "#,
    )
    .bind(email)
    .fetch_all(&pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to list results: {:?}", e);
        AppError::InternalServerError(e.to_string())
    })?;

    Ok(Json(results))
}

/// Lists internship applications, newest first.
/// Admin only.
pub async fn list_internships(
    State(pool): State<SqlitePool>,
) -> Result<impl IntoResponse, AppError> {
    let applications = sqlx::query_as::<_, InternshipApplication>(
        "SELECT id, name, email, phone, college, domain, resume_url, message, status, created_at \
         FROM internship_applications ORDER BY id DESC",
    )
    .fetch_all(&pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to list internship applications: {:?}", e);
        AppError::InternalServerError(e.to_string())
    })?;

    Ok(Json(applications))
}

fn ensure_answer_in_options(
    correct_answer: &str,
    options: &BTreeMap<String, String>,
) -> Result<(), AppError> {
    if !options.contains_key(correct_answer) {
        return Err(AppError::BadRequest(
            "Correct answer must be one of the option labels".to_string(),
        ));
    }
    Ok(())
}
