use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::Utc;
use serde::Serialize;

use crate::response::AppError;
use crate::services::anki;
use crate::state::AppState;

#[derive(Serialize)]
struct ImportResponse {
    success: bool,
    imported: usize,
}

/// Bulk import from a raw `.anki2` upload. Extraction failures are the
/// client's problem (bad archive); store failures are ours.
pub async fn upload_anki(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Response, AppError> {
    if body.is_empty() {
        return Err(AppError::validation("empty upload"));
    }

    let pairs = anki::extract_pairs(&body).await.map_err(|err| {
        tracing::warn!(error = %err, "anki archive extraction failed");
        AppError::bad_request("could not read anki archive")
    })?;

    let today = Utc::now().date_naive();
    let imported = state.store().import(&pairs, today).await?;
    tracing::info!(imported, "anki import finished");

    Ok((
        StatusCode::CREATED,
        Json(ImportResponse {
            success: true,
            imported,
        }),
    )
        .into_response())
}
