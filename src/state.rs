use crate::config::Config;
use crate::payment::gateway::PaymentGateway;
use axum::extract::FromRef;
use sqlx::SqlitePool;
use std::sync::Arc;

/// Shared handle to the payment gateway. Boxed as a trait object so
/// integration tests can swap the Razorpay client for a stub.
pub type DynGateway = Arc<dyn PaymentGateway>;

#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub config: Config,
    pub gateway: DynGateway,
}

impl FromRef<AppState> for SqlitePool {
    fn from_ref(state: &AppState) -> Self {
        state.pool.clone()
    }
}

impl FromRef<AppState> for Config {
    fn from_ref(state: &AppState) -> Self {
        state.config.clone()
    }
}

impl FromRef<AppState> for DynGateway {
    fn from_ref(state: &AppState) -> Self {
        state.gateway.clone()
    }
}
