// src/handlers/payment.rs

use axum::{Json, extract::State, response::IntoResponse};
use chrono::Utc;
use sqlx::SqlitePool;
use validator::ValidateEmail;

use crate::{
    config::Config,
    error::AppError,
    models::{
        order::{CreateOrderRequest, CustomerInfo, MarkPaidRequest, PaymentOrder, VerifyPaymentRequest},
        user::PaymentState,
    },
    payment::{
        audit::{self, PaymentEvent},
        gateway::OrderRequest,
        signature,
    },
    state::DynGateway,
};

/// Some clients interpolate missing form state straight into the JSON,
/// which arrives here as the literal strings below.
fn is_placeholder(value: &str) -> bool {
    let trimmed = value.trim();
    trimmed.is_empty()
        || trimmed.eq_ignore_ascii_case("undefined")
        || trimmed.eq_ignore_ascii_case("null")
}

fn validate_customer_info(info: &CustomerInfo) -> Result<(), AppError> {
    if is_placeholder(&info.name) {
        return Err(AppError::BadRequest("Customer name is required".to_string()));
    }
    if is_placeholder(&info.email) || !info.email.trim().validate_email() {
        return Err(AppError::BadRequest(
            "A valid customer email is required".to_string(),
        ));
    }
    Ok(())
}

/// Opens a gateway order for the test fee.
///
/// The client sends the amount in rupees; the gateway wants paise, so the
/// conversion happens here and nowhere else. The order row is stored in
/// 'created' state and only flips to 'paid' after signature verification.
pub async fn create_order(
    State(pool): State<SqlitePool>,
    State(config): State<Config>,
    State(gateway): State<DynGateway>,
    Json(payload): Json<CreateOrderRequest>,
) -> Result<impl IntoResponse, AppError> {
    validate_customer_info(&payload.customer_info)?;

    if payload.amount <= 0 {
        return Err(AppError::BadRequest("Order amount must be positive".to_string()));
    }
    if payload.amount > config.order_amount_ceiling {
        return Err(AppError::BadRequest(format!(
            "Order amount exceeds the {} INR limit",
            config.order_amount_ceiling
        )));
    }

    let currency = if payload.currency.trim().is_empty() {
        "INR".to_string()
    } else {
        payload.currency.trim().to_uppercase()
    };
    let name = payload.customer_info.name.trim().to_string();
    let email = payload.customer_info.email.trim().to_lowercase();

    let order = gateway
        .create_order(&OrderRequest {
            amount: payload.amount * 100,
            currency,
            receipt: format!("rcpt_{}", Utc::now().timestamp_millis()),
            customer_name: name.clone(),
            customer_email: email.clone(),
        })
        .await?;

    sqlx::query(
        "INSERT INTO payment_orders (order_id, amount, currency, status, customer_name, customer_email) \
         VALUES (?1, ?2, ?3, 'created', ?4, ?5)",
    )
    .bind(&order.id)
    .bind(order.amount)
    .bind(&order.currency)
    .bind(&name)
    .bind(&email)
    .execute(&pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to store order {}: {:?}", order.id, e);
        AppError::InternalServerError(e.to_string())
    })?;

    audit::record(
        &config.payment_log_dir,
        &PaymentEvent::order_created(&order.id, &email, order.amount, &order.currency),
    )
    .await;

    tracing::info!("Created order {} for {} ({} paise)", order.id, email, order.amount);

    Ok(Json(serde_json::json!({
        "success": true,
        "order": {
            "id": order.id,
            "amount": order.amount,
            "currency": order.currency,
        },
    })))
}

/// Verifies a payment callback and opens the payment gate.
///
/// The signature is recomputed from the order and payment ids with the key
/// secret; nothing the client sent is trusted. A bad signature is a 400
/// and changes no state.
pub async fn verify_payment(
    State(pool): State<SqlitePool>,
    State(config): State<Config>,
    Json(payload): Json<VerifyPaymentRequest>,
) -> Result<impl IntoResponse, AppError> {
    if payload.razorpay_order_id.trim().is_empty()
        || payload.razorpay_payment_id.trim().is_empty()
        || payload.razorpay_signature.trim().is_empty()
    {
        return Err(AppError::BadRequest(
            "Missing payment verification fields".to_string(),
        ));
    }
    let email = payload.email.trim().to_lowercase();
    if email.is_empty() {
        return Err(AppError::BadRequest("Email is required".to_string()));
    }

    if !signature::verify_signature(
        &payload.razorpay_order_id,
        &payload.razorpay_payment_id,
        &payload.razorpay_signature,
        &config.razorpay_key_secret,
    ) {
        tracing::warn!(
            "Signature mismatch for order {} / payment {}",
            payload.razorpay_order_id,
            payload.razorpay_payment_id
        );
        return Err(AppError::BadRequest("Invalid payment signature".to_string()));
    }

    let mut tx = pool.begin().await?;

    let current =
        sqlx::query_scalar::<_, PaymentState>("SELECT payment_state FROM users WHERE email = ?1")
            .bind(&email)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(AppError::NotFound("User not found".to_string()))?;

    sqlx::query("UPDATE users SET payment_state = ?1 WHERE email = ?2")
        .bind(current.on_payment_verified())
        .bind(&email)
        .execute(&mut *tx)
        .await?;

    let updated = sqlx::query(
        "UPDATE payment_orders \
         SET payment_id = ?1, signature = ?2, status = 'paid', paid_at = ?3 \
         WHERE order_id = ?4",
    )
    .bind(&payload.razorpay_payment_id)
    .bind(&payload.razorpay_signature)
    .bind(Utc::now())
    .bind(&payload.razorpay_order_id)
    .execute(&mut *tx)
    .await?;

    // The order row can be missing when the order was created against an
    // older deployment. Record a minimal row so the verified payment still
    // has a database trace.
    if updated.rows_affected() == 0 {
        sqlx::query(
            "INSERT INTO payment_orders \
             (order_id, payment_id, signature, amount, currency, status, customer_email, paid_at) \
             VALUES (?1, ?2, ?3, 0, 'INR', 'paid', ?4, ?5)",
        )
        .bind(&payload.razorpay_order_id)
        .bind(&payload.razorpay_payment_id)
        .bind(&payload.razorpay_signature)
        .bind(&email)
        .bind(Utc::now())
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;

    audit::record(
        &config.payment_log_dir,
        &PaymentEvent::payment_verified(
            &payload.razorpay_order_id,
            &payload.razorpay_payment_id,
            &email,
        ),
    )
    .await;

    tracing::info!(
        "Verified payment {} for order {} ({})",
        payload.razorpay_payment_id,
        payload.razorpay_order_id,
        email
    );

    Ok(Json(serde_json::json!({
        "success": true,
        "message": "Payment verified",
    })))
}

/// Fallback sync for clients that verified a payment but lost the
/// response before the gate opened.
///
/// Unlike the old trust-the-client flag flip, this only opens the gate
/// when a verified order actually exists for the email, and never
/// resurrects an exhausted candidate; they need a fresh payment through
/// the normal flow.
pub async fn mark_paid(
    State(pool): State<SqlitePool>,
    Json(payload): Json<MarkPaidRequest>,
) -> Result<impl IntoResponse, AppError> {
    let email = payload.email.trim().to_lowercase();
    if email.is_empty() {
        return Err(AppError::BadRequest("Email is required".to_string()));
    }

    let verified_order = sqlx::query_as::<_, PaymentOrder>(
        "SELECT id, order_id, payment_id, signature, amount, currency, status, \
                customer_name, customer_email, created_at, paid_at \
         FROM payment_orders \
         WHERE customer_email = ?1 AND status = 'paid' \
         ORDER BY id DESC LIMIT 1",
    )
    .bind(&email)
    .fetch_optional(&pool)
    .await?
    .ok_or(AppError::Forbidden(
        "No verified payment on record for this email".to_string(),
    ))?;

    let current =
        sqlx::query_scalar::<_, PaymentState>("SELECT payment_state FROM users WHERE email = ?1")
            .bind(&email)
            .fetch_optional(&pool)
            .await?
            .ok_or(AppError::NotFound("User not found".to_string()))?;

    match current {
        PaymentState::Paid => {}
        PaymentState::Unpaid => {
            sqlx::query("UPDATE users SET payment_state = ?1 WHERE email = ?2")
                .bind(current.on_payment_verified())
                .bind(&email)
                .execute(&pool)
                .await?;
            tracing::info!(
                "Marked {} paid from verified order {}",
                email,
                verified_order.order_id
            );
        }
        PaymentState::Exhausted => {
            return Err(AppError::Forbidden(
                "Attempts exhausted; a new payment is required".to_string(),
            ));
        }
    }

    Ok(Json(serde_json::json!({
        "success": true,
        "paymentStatus": true,
    })))
}
