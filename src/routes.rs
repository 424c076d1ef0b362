// src/routes.rs

use axum::{
    Router,
    http::Method,
    middleware,
    routing::{delete, get, post},
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{
    handlers::{admin, auth, exam},
    state::AppState,
    utils::jwt::{admin_middleware, auth_middleware},
};

/// Assembles the main application router.
///
/// * Student routes under `/api/exams` (no login, identified by name).
/// * Admin routes under `/api/admin`, guarded by a bearer token.
/// * Applies global middleware (Trace, CORS).
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_headers([
            axum::http::header::AUTHORIZATION,
            axum::http::header::CONTENT_TYPE,
        ]);

    let exam_routes = Router::new()
        .route("/", get(exam::list_exams))
        .route("/start", post(exam::start_exam))
        .route("/questions", get(exam::load_questions))
        .route("/check", post(exam::check_answer))
        .route("/submit", post(exam::submit_exam))
        .route("/result", get(exam::get_result));

    let admin_routes = Router::new()
        .route("/results", get(admin::list_results))
        .route("/exams", post(admin::create_exam))
        .route("/exams/{id}", delete(admin::delete_exam))
        .route("/exams/{id}/questions", post(admin::upload_questions))
        .route("/exams/{id}/export", get(admin::export_questions))
        .route(
            "/exams/{id}/answers/{student_name}",
            delete(admin::delete_answers),
        )
        // Double middleware protection: Auth first, then Admin check
        .layer(middleware::from_fn(admin_middleware))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware))
        .route("/login", post(auth::admin_login));

    Router::new()
        .nest("/api/exams", exam_routes)
        .nest("/api/admin", admin_routes)
        // Global Middleware (applied from outside in)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
