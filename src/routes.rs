// src/routes.rs

use axum::{
    Router, http::Method, middleware,
    routing::{delete, get, post},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    handlers::{admin, attempts, auth, internships, payment, profile, test},
    state::AppState,
    utils::jwt::{admin_middleware, auth_middleware},
};

/// Assembles the main application router.
///
/// * Merges all sub-routers (auth, test, attempts, payment, admin).
/// * Applies global middleware (Trace, CORS).
/// * Injects global state (pool, config, payment gateway).
pub fn create_router(state: AppState) -> Router {
    let origins = [
        "http://localhost:3000".parse().unwrap(),
        "http://127.0.0.1:3000".parse().unwrap(),
    ];

    let cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([
            axum::http::header::AUTHORIZATION,
            axum::http::header::CONTENT_TYPE,
        ]);

    let auth_routes = Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login));

    // The test flow is gated by payment state, not by login, so these
    // stay public; the gate check lives in the handlers.
    let test_routes = Router::new()
        .route("/questions", get(test::get_questions))
        .route("/submit", post(test::submit_test))
        .route("/result/{id}", get(test::get_result));

    let profile_routes = Router::new()
        .route("/me", get(profile::get_me))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    let admin_routes = Router::new()
        .route("/users", get(admin::list_users))
        .route(
            "/questions",
            get(admin::list_questions).post(admin::create_question),
        )
        .route(
            "/questions/{id}",
            delete(admin::delete_question).put(admin::update_question),
        )
        .route("/results", get(admin::list_results))
        .route("/internships", get(admin::list_internships))
        // Double middleware protection: Auth first, then Admin check
        .layer(middleware::from_fn(admin_middleware))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    Router::new()
        .nest("/api/auth", auth_routes)
        .nest("/api/test", test_routes)
        .nest("/api/profile", profile_routes)
        .nest("/api/admin", admin_routes)
        .route("/api/attempts/{email}", get(attempts::get_attempts))
        .route("/api/internships", post(internships::apply))
        .route("/api/mark-paid", post(payment::mark_paid))
        // The checkout page calls these without the /api prefix.
        .route("/create-order", post(payment::create_order))
        .route("/verify-payment", post(payment::verify_payment))
        // Global Middleware (applied from outside in)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
