pub mod health;

use std::time::Duration;

use axum::{
    http::{header, HeaderName, HeaderValue, Method},
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tracing::warn;

use crate::assessment::handlers::handle_submit_assessment;
use crate::auth::handlers::{handle_login, handle_logout, handle_signup};
use crate::errors::AppError;
use crate::recommendation::handlers::{handle_career_path, handle_dashboard, handle_recommend};
use crate::state::AppState;
use crate::users::handlers::{
    handle_get_profile, handle_list_skills, handle_submit_skills, handle_update_profile,
};

async fn not_found() -> AppError {
    AppError::NotFound("Resource not found".to_string())
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(health::root_handler))
        .route("/health", get(health::health_handler))
        // Accounts
        .route("/signup", post(handle_signup))
        .route("/login", post(handle_login))
        .route("/logout", post(handle_logout))
        // Profile & skills
        .route(
            "/user/profile",
            get(handle_get_profile).put(handle_update_profile),
        )
        .route("/skills", get(handle_list_skills))
        .route("/submit_skills", post(handle_submit_skills))
        // Questionnaire & recommendations
        .route("/submit_assessment", post(handle_submit_assessment))
        .route("/recommend", get(handle_recommend))
        .route("/career_path", get(handle_career_path))
        .route("/dashboard_data", get(handle_dashboard))
        .fallback(not_found)
        .with_state(state)
}

/// CORS policy for the browser client. Credentials are allowed, so origins must be explicit.
pub fn cors_layer(origins: &[String]) -> CorsLayer {
    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| match HeaderValue::from_str(o) {
            Ok(v) => Some(v),
            Err(_) => {
                warn!("Ignoring invalid CORS origin '{o}'");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(allowed)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .expose_headers([
            HeaderName::from_static("content-range"),
            HeaderName::from_static("x-content-range"),
        ])
        .allow_credentials(true)
        .max_age(Duration::from_secs(3600))
}
