pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, post},
    Router,
};

use crate::state::AppState;
use crate::upload::handlers as upload_handlers;
use crate::upload::MAX_UPLOAD_BYTES;
use crate::wizard::handlers;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/templates", get(handlers::handle_list_templates))
        .route("/api/v1/resumes", get(handlers::handle_list_resumes))
        // Wizard sessions
        .route("/api/v1/wizard", post(handlers::handle_create_session))
        .route("/api/v1/wizard/:id", get(handlers::handle_get_session))
        .route(
            "/api/v1/wizard/:id/personal",
            post(handlers::handle_submit_personal),
        )
        .route(
            "/api/v1/wizard/:id/summary",
            post(handlers::handle_submit_summary),
        )
        .route(
            "/api/v1/wizard/:id/experiences",
            post(handlers::handle_add_experience),
        )
        .route(
            "/api/v1/wizard/:id/experiences/:index",
            delete(handlers::handle_remove_experience),
        )
        .route(
            "/api/v1/wizard/:id/education",
            post(handlers::handle_add_education),
        )
        .route(
            "/api/v1/wizard/:id/education/:index",
            delete(handlers::handle_remove_education),
        )
        .route("/api/v1/wizard/:id/advance", post(handlers::handle_advance))
        .route("/api/v1/wizard/:id/back", post(handlers::handle_back))
        .route("/api/v1/wizard/:id/reset", post(handlers::handle_reset))
        .route(
            "/api/v1/wizard/:id/template",
            post(handlers::handle_select_template),
        )
        .route("/api/v1/wizard/:id/preview", get(handlers::handle_preview))
        .route(
            "/api/v1/wizard/:id/upload",
            post(upload_handlers::handle_upload),
        )
        .route(
            "/api/v1/wizard/:id/generate",
            post(handlers::handle_generate),
        )
        // uploads are checked against MAX_UPLOAD_BYTES; the body limit only
        // needs headroom for multipart framing
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES + 64 * 1024))
        .with_state(state)
}
