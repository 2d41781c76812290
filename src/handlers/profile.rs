// src/handlers/profile.rs

use axum::{Extension, Json, extract::State, response::IntoResponse};
use sqlx::SqlitePool;

use crate::{
    config,
    error::AppError,
    models::user::{MeResponse, PaymentState},
    utils::jwt::Claims,
};

/// Row shape for the profile query below (user plus derived attempt count).
#[derive(sqlx::FromRow)]
struct MeRow {
    id: i64,
    name: String,
    email: String,
    domain: Option<String>,
    role: String,
    payment_state: PaymentState,
    attempts_used: i64,
    created_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// Returns the authenticated candidate's profile with their attempt
/// summary, derived from stored results in the same query.
///
/// Identity comes from the token's email claim, the same key the ledger
/// and payment gate use.
pub async fn get_me(
    State(pool): State<SqlitePool>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    let row = sqlx::query_as::<_, MeRow>(
        r#"
        SELECT
            u.id, u.name, u.email, u.domain, u.role, u.payment_state, u.created_at,
            (SELECT COUNT(*) FROM test_results r WHERE r.user_email = u.email) AS attempts_used
        FROM users u
        WHERE u.email = ?1
        "#,
    )
    .bind(&claims.email)
    .fetch_optional(&pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to fetch profile for {}: {:?}", claims.email, e);
        AppError::InternalServerError(e.to_string())
    })?
    .ok_or(AppError::NotFound("User not found".to_string()))?;

    let remaining = (config::MAX_TEST_ATTEMPTS - row.attempts_used).max(0);

    Ok(Json(MeResponse {
        id: row.id,
        name: row.name,
        email: row.email,
        domain: row.domain,
        role: row.role,
        payment_status: row.payment_state.has_paid(),
        attempts_used: row.attempts_used,
        total_attempts: config::MAX_TEST_ATTEMPTS,
        remaining_attempts: remaining,
        created_at: row.created_at,
    }))
}
