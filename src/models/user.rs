// src/models/user.rs

use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;
use validator::Validate;

/// Where a candidate sits in the payment lifecycle.
///
/// `unpaid -> paid` on a verified payment, `paid -> exhausted` when the
/// final attempt is recorded, and `exhausted -> paid` again only after a
/// fresh verified payment. Stored as lowercase text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum PaymentState {
    Unpaid,
    Paid,
    Exhausted,
}

impl PaymentState {
    /// The boolean the client understands: may the candidate take a test
    /// right now, as far as payment is concerned.
    pub fn has_paid(self) -> bool {
        matches!(self, PaymentState::Paid)
    }

    /// A verified payment unlocks the gate from any state.
    pub fn on_payment_verified(self) -> Self {
        PaymentState::Paid
    }

    /// Recording the final attempt closes the gate until the next payment.
    pub fn on_attempts_exhausted(self) -> Self {
        PaymentState::Exhausted
    }
}

/// Represents the 'users' table in the database.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    /// Argon2 hash. Never serialized into responses.
    #[serde(skip)]
    pub password: String,
    pub phone: Option<String>,
    pub domain: Option<String>,
    /// 'user' or 'admin'.
    pub role: String,
    pub payment_state: PaymentState,
    /// Write-side counter mirroring the number of recorded results. The
    /// authoritative count is always derived from `test_results`.
    pub attempts_used: i64,
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// DTO for registration.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be between 1 and 100 characters"))]
    pub name: String,
    #[validate(email(message = "A valid email address is required"))]
    pub email: String,
    #[validate(length(min = 6, max = 128, message = "Password must be at least 6 characters"))]
    pub password: String,
    #[validate(length(min = 7, max = 20))]
    pub phone: Option<String>,
    #[validate(length(min = 1, max = 50))]
    pub domain: Option<String>,
}

/// DTO for login.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}

/// Profile view returned by /api/profile/me, with the attempt summary the
/// dashboard renders.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MeResponse {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub domain: Option<String>,
    pub role: String,
    pub payment_status: bool,
    pub attempts_used: i64,
    pub total_attempts: i64,
    pub remaining_attempts: i64,
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
}
