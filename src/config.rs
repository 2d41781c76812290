// src/config.rs

use dotenvy::dotenv;
use std::env;

/// Maximum number of test attempts a single payment unlocks.
pub const MAX_TEST_ATTEMPTS: i64 = 5;

/// Every test paper opens with this many general-aptitude questions.
pub const APTITUDE_QUESTION_COUNT: i64 = 10;
/// Number of questions drawn from the candidate's chosen domain.
pub const DOMAIN_QUESTION_COUNT: i64 = 20;
/// Category name of the shared aptitude bucket.
pub const APTITUDE_CATEGORY: &str = "aptitude";

/// Difficulty mix applied to every sampled question set.
pub const EASY_RATIO: f64 = 0.3;
pub const MEDIUM_RATIO: f64 = 0.4;
pub const HARD_RATIO: f64 = 0.3;

/// Countdown granted to a test session, in seconds.
pub const TEST_DURATION_SECS: u32 = 1800;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub jwt_expiration: u64,
    pub rust_log: String,
    pub admin_email: Option<String>,
    pub admin_password: Option<String>,
    /// Razorpay API key id, sent as the basic-auth username.
    pub razorpay_key_id: String,
    /// Razorpay key secret. Also the HMAC key for signature verification.
    pub razorpay_key_secret: String,
    /// Largest order we are willing to create, in rupees.
    pub order_amount_ceiling: i64,
    /// Directory holding the flat-file payment audit trail.
    pub payment_log_dir: String,
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();

        let database_url = env::var("DATABASE_URL").expect("DATABASE_URL must be set");

        let jwt_secret = env::var("JWT_SECRET").expect("JWT_SECRET must be set");

        let jwt_expiration = env::var("JWT_EXPIRATION_SECONDS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(86400);

        let rust_log = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

        let admin_email = env::var("ADMIN_EMAIL").ok();
        let admin_password = env::var("ADMIN_PASSWORD").ok();

        let razorpay_key_id = env::var("RAZORPAY_KEY_ID").expect("RAZORPAY_KEY_ID must be set");
        let razorpay_key_secret =
            env::var("RAZORPAY_KEY_SECRET").expect("RAZORPAY_KEY_SECRET must be set");

        let order_amount_ceiling = env::var("ORDER_AMOUNT_CEILING")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(100_000);

        let payment_log_dir = env::var("PAYMENT_LOG_DIR").unwrap_or_else(|_| "logs".to_string());

        Self {
            database_url,
            jwt_secret,
            jwt_expiration,
            rust_log,
            admin_email,
            admin_password,
            razorpay_key_id,
            razorpay_key_secret,
            order_amount_ceiling,
            payment_log_dir,
        }
    }
}
