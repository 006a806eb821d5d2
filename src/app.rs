use crate::handlers;
use crate::state::AppState;
use axum::{routing::{get, post}, Router};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/open", post(handlers::open_form))
        .route("/progress/done", post(handlers::done_form))
        .route("/progress/undo", post(handlers::undo_form))
        .route("/api/progress", get(handlers::get_progress))
        .route("/api/select", post(handlers::select))
        .route("/api/done", post(handlers::mark_done))
        .route("/api/undo", post(handlers::undo))
        .route("/api/reader", get(handlers::get_reader))
        .route("/api/hizb/:number", get(handlers::get_ranges))
        .with_state(state)
}
