//! services/api/src/web/router.rs
//!
//! Assembles the complete application router: the REST routes, the CORS
//! and body-limit layers, and the Swagger UI.

use crate::error::ApiError;
use crate::web::rest::{
    all_cookies_handler, create_summary_handler, current_chapter_handler, finish_summary_handler,
    first_chapter_handler, get_summary_handler, list_summaries_handler, next_chapter_handler,
    previous_chapter_handler, ApiDoc,
};
use crate::web::state::AppState;
use axum::{
    extract::DefaultBodyLimit,
    http::{
        header::{ACCEPT, CONTENT_TYPE},
        HeaderValue, Method,
    },
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub fn api_router(state: Arc<AppState>) -> Result<Router, ApiError> {
    let allowed_origin = state
        .config
        .cors_allowed_origin
        .parse::<HeaderValue>()
        .map_err(|_| {
            ApiError::Internal(format!(
                "Invalid CORS origin in config: '{}'",
                state.config.cors_allowed_origin
            ))
        })?;
    let cors = CorsLayer::new()
        .allow_origin(allowed_origin)
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE, ACCEPT]);

    let api_routes = Router::new()
        .route(
            "/api/summaries",
            post(create_summary_handler).get(list_summaries_handler),
        )
        .route("/api/summaries/{id}", get(get_summary_handler))
        .route("/api/summary/{id}/chapter", get(first_chapter_handler))
        .route("/api/summary/{id}/next-chapter", post(next_chapter_handler))
        .route(
            "/api/summary/{id}/previous-chapter",
            post(previous_chapter_handler),
        )
        .route("/api/summary/{id}/current", get(current_chapter_handler))
        .route("/api/summary/{id}/finish", post(finish_summary_handler))
        .route("/all-cookies", get(all_cookies_handler))
        .layer(DefaultBodyLimit::max(10 * 1024 * 1024))
        .layer(cors)
        .with_state(state);

    // Merge the API router with the Swagger UI router for a complete application.
    Ok(Router::new()
        .merge(api_routes)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi())))
}
