use crate::handlers;
use crate::state::AppState;
use axum::{routing::{get, post}, Router};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/click", post(handlers::click_form))
        .route("/clear", get(handlers::confirm_clear_page).post(handlers::clear_form))
        .route("/api/log", get(handlers::get_log))
        .route("/api/entries", post(handlers::add_entry))
        .route("/api/clear", post(handlers::clear))
        .route("/api/summary", get(handlers::get_summary))
        .route("/export/log", get(handlers::download_log))
        .route("/export/summary", get(handlers::download_summary))
        .with_state(state)
}
