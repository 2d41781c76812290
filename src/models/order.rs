// src/models/order.rs

use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;

/// Represents the 'payment_orders' table in the database. One row per
/// gateway order; `payment_id`, `signature` and `paid_at` stay NULL until
/// the payment is verified.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentOrder {
    pub id: i64,
    pub order_id: String,
    pub payment_id: Option<String>,
    pub signature: Option<String>,
    /// Amount in paise.
    pub amount: i64,
    pub currency: String,
    /// 'created' or 'paid'.
    pub status: String,
    pub customer_name: Option<String>,
    pub customer_email: Option<String>,
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
    pub paid_at: Option<chrono::DateTime<chrono::Utc>>,
}

#[derive(Debug, Deserialize)]
pub struct CustomerInfo {
    pub name: String,
    pub email: String,
}

/// DTO for creating a gateway order. `amount` is in rupees; conversion to
/// paise happens server-side.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    pub amount: i64,
    #[serde(default)]
    pub currency: String,
    pub customer_info: CustomerInfo,
}

/// Callback payload the checkout page posts after the gateway reports a
/// successful charge. Field names follow the gateway's wire format.
#[derive(Debug, Deserialize)]
pub struct VerifyPaymentRequest {
    pub razorpay_order_id: String,
    pub razorpay_payment_id: String,
    pub razorpay_signature: String,
    pub email: String,
}

/// DTO for the fallback sync endpoint.
#[derive(Debug, Deserialize)]
pub struct MarkPaidRequest {
    pub email: String,
}
