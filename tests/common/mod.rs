// tests/common/mod.rs

#![allow(dead_code)]

use async_trait::async_trait;
use screening_backend::{
    config::Config,
    error::AppError,
    payment::gateway::{GatewayOrder, OrderRequest, PaymentGateway},
    routes,
    state::AppState,
};
use sqlx::{SqlitePool, sqlite::SqlitePoolOptions};
use std::path::PathBuf;
use std::sync::Arc;

/// Key secret the test config signs with; tests compute matching
/// signatures via the crate's own helper.
pub const TEST_KEY_SECRET: &str = "rzp_test_secret_0badc0ffee";

/// Gateway stub: echoes the requested order back with a fresh id, so no
/// test ever reaches the network.
pub struct StubGateway;

#[async_trait]
impl PaymentGateway for StubGateway {
    async fn create_order(&self, request: &OrderRequest) -> Result<GatewayOrder, AppError> {
        Ok(GatewayOrder {
            id: format!("order_stub_{}", &uuid::Uuid::new_v4().to_string()[..8]),
            amount: request.amount,
            currency: request.currency.clone(),
        })
    }
}

pub struct TestApp {
    pub address: String,
    pub pool: SqlitePool,
    pub payment_log_dir: PathBuf,
}

/// Spawns the app on a random port against a private in-memory database.
/// Returns the base URL plus the pool for seeding and assertions.
pub async fn spawn_app() -> TestApp {
    // One connection keeps the in-memory database alive for the whole test.
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("Failed to open in-memory SQLite");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to migrate database");

    let payment_log_dir = std::env::temp_dir().join(format!(
        "payment-logs-{}",
        &uuid::Uuid::new_v4().to_string()[..8]
    ));

    let config = Config {
        database_url: "sqlite::memory:".to_string(),
        jwt_secret: "test_secret_for_integration_tests".to_string(),
        jwt_expiration: 600, // 10 minutes for tests
        rust_log: "error".to_string(),
        admin_email: None,
        admin_password: None,
        razorpay_key_id: "rzp_test_key".to_string(),
        razorpay_key_secret: TEST_KEY_SECRET.to_string(),
        order_amount_ceiling: 100_000,
        payment_log_dir: payment_log_dir.to_string_lossy().to_string(),
    };

    let state = AppState {
        pool: pool.clone(),
        config,
        gateway: Arc::new(StubGateway),
    };

    let app = routes::create_router(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind random port");
    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    TestApp {
        address,
        pool,
        payment_log_dir,
    }
}

/// Unique lowercase email per test run.
pub fn unique_email() -> String {
    format!("u_{}@example.com", &uuid::Uuid::new_v4().to_string()[..8])
}

/// Registers a candidate through the API and returns the email used.
pub async fn register_user(app: &TestApp, client: &reqwest::Client, email: &str) {
    let response = client
        .post(format!("{}/api/auth/register", app.address))
        .json(&serde_json::json!({
            "name": "Test Candidate",
            "email": email,
            "password": "password123",
            "domain": "backend"
        }))
        .send()
        .await
        .expect("Register failed");
    assert_eq!(response.status().as_u16(), 201);
}

/// Runs the real checkout flow against the stub gateway: create an order,
/// then verify it with a signature computed the same way the gateway
/// would. Leaves the user's payment gate open.
pub async fn pay_via_api(app: &TestApp, client: &reqwest::Client, email: &str) {
    let order: serde_json::Value = client
        .post(format!("{}/create-order", app.address))
        .json(&serde_json::json!({
            "amount": 500,
            "currency": "INR",
            "customerInfo": { "name": "Test Candidate", "email": email }
        }))
        .send()
        .await
        .expect("Create order failed")
        .json()
        .await
        .expect("Failed to parse order json");

    let order_id = order["order"]["id"].as_str().expect("Order id missing");
    let payment_id = format!("pay_{}", &uuid::Uuid::new_v4().to_string()[..8]);
    let signature =
        screening_backend::payment::signature::expected_signature(order_id, &payment_id, TEST_KEY_SECRET);

    let response = client
        .post(format!("{}/verify-payment", app.address))
        .json(&serde_json::json!({
            "razorpay_order_id": order_id,
            "razorpay_payment_id": payment_id,
            "razorpay_signature": signature,
            "email": email
        }))
        .send()
        .await
        .expect("Verify payment failed");
    assert_eq!(response.status().as_u16(), 200);
}

/// Seeds one question and returns its id.
pub async fn seed_question(
    pool: &SqlitePool,
    category: &str,
    difficulty: &str,
    correct: &str,
) -> i64 {
    sqlx::query_scalar::<_, i64>(
        "INSERT INTO questions (question_text, options, correct_answer, category, difficulty) \
         VALUES (?1, ?2, ?3, ?4, ?5) RETURNING id",
    )
    .bind(format!("Sample {} {} question", category, difficulty))
    .bind(r#"{"A":"first","B":"second","C":"third","D":"fourth"}"#)
    .bind(correct)
    .bind(category)
    .bind(difficulty)
    .fetch_one(pool)
    .await
    .expect("Failed to seed question")
}

/// Seeds a bank for one category with the given per-difficulty counts.
/// Every question's correct answer is "A".
pub async fn seed_bank(pool: &SqlitePool, category: &str, easy: i64, medium: i64, hard: i64) {
    for (difficulty, count) in [("easy", easy), ("medium", medium), ("hard", hard)] {
        for _ in 0..count {
            seed_question(pool, category, difficulty, "A").await;
        }
    }
}

/// Drops a pre-built result row into the ledger, bypassing the API.
/// Used to fast-forward a candidate to a given attempt count.
pub async fn insert_result_row(pool: &SqlitePool, email: &str, attempt: i64) {
    sqlx::query(
        "INSERT INTO test_results \
         (user_email, student_name, domain, score, total_questions, percentage, \
          attempts_used, total_attempts, time_taken, started_on, completed_on, questions) \
         VALUES (?1, 'Test Candidate', 'backend', 0, 30, 0, ?2, 5, 60, \
                 '2026-01-10T10:00:00Z', '2026-01-10T10:01:00Z', '[]')",
    )
    .bind(email)
    .bind(attempt)
    .execute(pool)
    .await
    .expect("Failed to insert result row");

    sqlx::query("UPDATE users SET attempts_used = ?1 WHERE email = ?2")
        .bind(attempt)
        .bind(email)
        .execute(pool)
        .await
        .expect("Failed to sync attempt counter");
}
