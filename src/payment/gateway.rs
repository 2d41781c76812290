// src/payment/gateway.rs

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use crate::error::AppError;

pub const RAZORPAY_ORDERS_URL: &str = "https://api.razorpay.com/v1/orders";

/// What the server asks the gateway to open. Amount is already in paise.
#[derive(Debug, Clone)]
pub struct OrderRequest {
    pub amount: i64,
    pub currency: String,
    pub receipt: String,
    pub customer_name: String,
    pub customer_email: String,
}

/// The slice of the gateway's order response the server keeps.
#[derive(Debug, Clone, Deserialize)]
pub struct GatewayOrder {
    pub id: String,
    pub amount: i64,
    pub currency: String,
}

/// Seam between the order workflow and the payment provider, so tests can
/// swap in a stub instead of talking to the network.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn create_order(&self, request: &OrderRequest) -> Result<GatewayOrder, AppError>;
}

/// Razorpay Orders API client using HTTP basic auth with the key pair.
pub struct RazorpayClient {
    http: reqwest::Client,
    key_id: String,
    key_secret: String,
}

impl RazorpayClient {
    pub fn new(key_id: String, key_secret: String) -> Self {
        RazorpayClient {
            http: reqwest::Client::new(),
            key_id,
            key_secret,
        }
    }
}

#[async_trait]
impl PaymentGateway for RazorpayClient {
    async fn create_order(&self, request: &OrderRequest) -> Result<GatewayOrder, AppError> {
        let body = json!({
            "amount": request.amount,
            "currency": request.currency,
            "receipt": request.receipt,
            "notes": {
                "name": request.customer_name,
                "email": request.customer_email,
            },
        });

        let response = self
            .http
            .post(RAZORPAY_ORDERS_URL)
            .basic_auth(&self.key_id, Some(&self.key_secret))
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::Upstream(format!("Order request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let detail = response.text().await.unwrap_or_default();
            return Err(AppError::Upstream(format!(
                "Order creation returned {}: {}",
                status, detail
            )));
        }

        response
            .json::<GatewayOrder>()
            .await
            .map_err(|e| AppError::Upstream(format!("Malformed order response: {}", e)))
    }
}
