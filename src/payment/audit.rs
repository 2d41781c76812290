// src/payment/audit.rs

//! Append-only payment audit trail.
//!
//! Every created order and verified payment lands as one JSON line in
//! `<log_dir>/payments.json`. The trail is best-effort: a write failure is
//! logged and the request continues, since the database row is the source
//! of truth.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::Path;
use tokio::{fs, io::AsyncWriteExt};

pub const PAYMENT_LOG_FILE: &str = "payments.json";

#[derive(Debug, Serialize)]
pub struct PaymentEvent {
    pub event: &'static str,
    pub order_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_id: Option<String>,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    pub at: DateTime<Utc>,
}

impl PaymentEvent {
    pub fn order_created(order_id: &str, email: &str, amount: i64, currency: &str) -> Self {
        PaymentEvent {
            event: "order_created",
            order_id: order_id.to_string(),
            payment_id: None,
            email: email.to_string(),
            amount: Some(amount),
            currency: Some(currency.to_string()),
            at: Utc::now(),
        }
    }

    pub fn payment_verified(order_id: &str, payment_id: &str, email: &str) -> Self {
        PaymentEvent {
            event: "payment_verified",
            order_id: order_id.to_string(),
            payment_id: Some(payment_id.to_string()),
            email: email.to_string(),
            amount: None,
            currency: None,
            at: Utc::now(),
        }
    }
}

/// Appends one event to the trail. Never fails the caller.
pub async fn record(log_dir: &str, event: &PaymentEvent) {
    if let Err(e) = append(log_dir, event).await {
        tracing::warn!("Failed to write payment audit event: {}", e);
    }
}

async fn append(log_dir: &str, event: &PaymentEvent) -> std::io::Result<()> {
    fs::create_dir_all(log_dir).await?;

    let line = serde_json::to_string(event).map_err(std::io::Error::other)?;

    let mut file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(Path::new(log_dir).join(PAYMENT_LOG_FILE))
        .await?;
    file.write_all(line.as_bytes()).await?;
    file.write_all(b"\n").await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn events_append_as_json_lines() {
        let dir = std::env::temp_dir().join(format!("payment-audit-{}", Utc::now().timestamp_nanos_opt().unwrap_or(0)));
        let dir = dir.to_string_lossy().to_string();

        record(&dir, &PaymentEvent::order_created("order_1", "a@b.com", 50000, "INR")).await;
        record(&dir, &PaymentEvent::payment_verified("order_1", "pay_1", "a@b.com")).await;

        let contents = fs::read_to_string(Path::new(&dir).join(PAYMENT_LOG_FILE))
            .await
            .unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 2);

        let first: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first["event"], "order_created");
        assert_eq!(first["amount"], 50000);

        let second: serde_json::Value = serde_json::from_str(lines[1]).unwrap();
        assert_eq!(second["event"], "payment_verified");
        assert_eq!(second["payment_id"], "pay_1");
        assert!(second.get("amount").is_none());

        let _ = fs::remove_dir_all(&dir).await;
    }
}
