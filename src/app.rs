use crate::handlers;
use crate::state::AppState;
use axum::{routing::{get, post}, Router};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/days/:date/toggle", post(handlers::toggle_form))
        .route("/api/days", get(handlers::get_days))
        .route("/api/days/:date", post(handlers::toggle_day))
        .route("/api/export/json", get(handlers::export_json))
        .route("/api/export/csv", get(handlers::export_csv))
        .with_state(state)
}
