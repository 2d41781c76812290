// src/handlers/attempts.rs

use axum::{
    Json,
    extract::{Path, State},
    response::IntoResponse,
};
use sqlx::SqlitePool;

use crate::{config, error::AppError, models::user::PaymentState};

/// Attempt ledger lookup for one candidate.
///
/// `attemptsUsed` is counted from stored results rather than read from the
/// user row, so the ledger can never drift from what was actually
/// recorded. The payment flag rides along because the client renders both
/// on the same screen.
pub async fn get_attempts(
    State(pool): State<SqlitePool>,
    Path(email): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let email = email.trim().to_lowercase();

    let payment_state =
        sqlx::query_scalar::<_, PaymentState>("SELECT payment_state FROM users WHERE email = ?1")
            .bind(&email)
            .fetch_optional(&pool)
            .await?
            .ok_or(AppError::NotFound("User not found".to_string()))?;

    let attempts_used =
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM test_results WHERE user_email = ?1")
            .bind(&email)
            .fetch_one(&pool)
            .await?;

    let remaining = (config::MAX_TEST_ATTEMPTS - attempts_used).max(0);

    Ok(Json(serde_json::json!({
        "success": true,
        "attemptsUsed": attempts_used,
        "totalAttempts": config::MAX_TEST_ATTEMPTS,
        "remainingAttempts": remaining,
        "paymentStatus": payment_state.has_paid(),
    })))
}
