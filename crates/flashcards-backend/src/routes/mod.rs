mod cards;
mod health;
mod import;

use axum::extract::DefaultBodyLimit;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::Router;

use crate::response::json_error;
use crate::state::AppState;

/// Upload cap for archive imports.
const MAX_UPLOAD_BYTES: usize = 16 * 1024 * 1024;

pub fn router(state: AppState) -> Router {
    Router::new()
        .nest("/health", health::router())
        .route("/api/cards", post(cards::create).get(cards::list))
        .route("/api/cards/next", get(cards::next_due))
        .route("/api/cards/clear", post(cards::clear))
        .route(
            "/api/cards/:id",
            get(cards::get)
                .put(cards::update)
                .delete(cards::delete),
        )
        .route("/api/cards/:id/review", post(cards::review))
        .route(
            "/api/import/anki",
            post(import::upload_anki).layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES)),
        )
        .fallback(fallback_handler)
        .with_state(state)
}

async fn fallback_handler() -> Response {
    json_error(StatusCode::NOT_FOUND, "NOT_FOUND", "route not found").into_response()
}
