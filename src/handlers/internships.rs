// src/handlers/internships.rs

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use sqlx::SqlitePool;
use validator::Validate;

use crate::{error::AppError, models::internship::CreateInternshipRequest};

/// Accepts an internship application from the public site.
pub async fn apply(
    State(pool): State<SqlitePool>,
    Json(payload): Json<CreateInternshipRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    let email = payload.email.trim().to_lowercase();

    let id = sqlx::query_scalar::<_, i64>(
        "INSERT INTO internship_applications \
         (name, email, phone, college, domain, resume_url, message) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7) \
         RETURNING id",
    )
    .bind(payload.name.trim())
    .bind(&email)
    .bind(payload.phone.trim())
    .bind(&payload.college)
    .bind(payload.domain.trim())
    .bind(&payload.resume_url)
    .bind(&payload.message)
    .fetch_one(&pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to store internship application: {:?}", e);
        AppError::InternalServerError(e.to_string())
    })?;

    tracing::info!("Received internship application {} from {}", id, email);

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({
            "success": true,
            "id": id,
        })),
    ))
}
