//! services/api/src/web/router.rs
//!
//! Assembles the public, auth and admin routes into one axum `Router`.

use crate::error::ApiError;
use crate::web::{admin, auth, middleware::require_auth, quiz, rest::ApiDoc, state::AppState};
use axum::http::{
    header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE},
    HeaderValue, Method,
};
use axum::{
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

fn cors_layer(origin: &str) -> Result<CorsLayer, ApiError> {
    let origin = origin
        .parse::<HeaderValue>()
        .map_err(|e| ApiError::Internal(format!("Invalid CORS origin '{}': {}", origin, e)))?;
    Ok(CorsLayer::new()
        .allow_origin(origin)
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE, ACCEPT]))
}

/// Builds the complete application router, Swagger UI included.
pub fn build_router(app_state: Arc<AppState>) -> Result<Router, ApiError> {
    let cors = cors_layer(&app_state.config.cors_origin)?;

    // Public routes (no auth required)
    let public_routes = Router::new()
        .route("/quiz/questions", get(quiz::list_questions_handler))
        .route("/quiz/submit", post(quiz::submit_quiz_handler))
        .route("/auth/login", post(auth::login_handler))
        .route("/auth/logout", post(auth::logout_handler));

    // Admin routes (auth required)
    let admin_routes = Router::new()
        .route(
            "/admin/quiz/questions",
            get(admin::list_all_questions_handler).post(admin::create_question_handler),
        )
        .route(
            "/admin/quiz/questions/{id}",
            axum::routing::put(admin::update_question_handler)
                .delete(admin::delete_question_handler),
        )
        .route(
            "/admin/quiz/recommendations",
            get(admin::list_recommendations_handler).post(admin::create_recommendation_handler),
        )
        .route(
            "/admin/quiz/recommendations/{id}",
            get(admin::get_recommendation_handler)
                .put(admin::update_recommendation_handler)
                .delete(admin::delete_recommendation_handler),
        )
        .route("/admin/quiz/submissions", get(admin::list_submissions_handler))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            require_auth,
        ));

    let api_router = Router::new()
        .merge(public_routes)
        .merge(admin_routes)
        .layer(cors)
        .with_state(app_state);

    Ok(Router::new()
        .merge(api_router)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi())))
}
