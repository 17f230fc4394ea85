use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use flashcard_algo::{MemoryState, SchedulerError};

use crate::response::AppError;
use crate::state::AppState;
use crate::store::Card;

#[derive(Serialize)]
struct SuccessResponse<T> {
    success: bool,
    data: T,
}

#[derive(Serialize)]
struct MessageResponse {
    success: bool,
    message: &'static str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CardResponse {
    id: String,
    front: String,
    back: String,
    due_date: String,
    difficulty: Option<f64>,
    stability: Option<f64>,
    last_review_date: Option<String>,
    created_at: String,
}

impl From<Card> for CardResponse {
    fn from(card: Card) -> Self {
        Self {
            id: card.id,
            front: card.front,
            back: card.back,
            due_date: card.due_date.to_string(),
            difficulty: card.difficulty,
            stability: card.stability,
            last_review_date: card.last_review_date.map(|d| d.to_string()),
            created_at: card.created_at.to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct CreateCardRequest {
    front: String,
    back: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct UpdateCardRequest {
    front: Option<String>,
    back: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ReviewRequest {
    grade: i64,
}

#[derive(Serialize)]
struct ClearResponse {
    deleted: u64,
}

pub async fn create(
    State(state): State<AppState>,
    Json(req): Json<CreateCardRequest>,
) -> Result<Response, AppError> {
    if req.front.trim().is_empty() || req.back.trim().is_empty() {
        return Err(AppError::validation("front and back must not be empty"));
    }

    let today = Utc::now().date_naive();
    let card = state.store().create(&req.front, &req.back, today).await?;
    tracing::debug!(card_id = %card.id, "card created");

    Ok((
        StatusCode::CREATED,
        Json(SuccessResponse {
            success: true,
            data: CardResponse::from(card),
        }),
    )
        .into_response())
}

pub async fn list(State(state): State<AppState>) -> Result<Response, AppError> {
    let cards = state.store().list().await?;
    let data: Vec<CardResponse> = cards.into_iter().map(CardResponse::from).collect();
    Ok(Json(SuccessResponse {
        success: true,
        data,
    })
    .into_response())
}

pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    let card = state
        .store()
        .get(&id)
        .await?
        .ok_or_else(|| AppError::not_found("card not found"))?;
    Ok(Json(SuccessResponse {
        success: true,
        data: CardResponse::from(card),
    })
    .into_response())
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<UpdateCardRequest>,
) -> Result<Response, AppError> {
    let card = state
        .store()
        .update_content(&id, req.front.as_deref(), req.back.as_deref())
        .await?
        .ok_or_else(|| AppError::not_found("card not found"))?;
    Ok(Json(SuccessResponse {
        success: true,
        data: CardResponse::from(card),
    })
    .into_response())
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    if !state.store().delete(&id).await? {
        return Err(AppError::not_found("card not found"));
    }
    tracing::debug!(card_id = %id, "card deleted");
    Ok(Json(MessageResponse {
        success: true,
        message: "card deleted",
    })
    .into_response())
}

pub async fn clear(State(state): State<AppState>) -> Result<Response, AppError> {
    let deleted = state.store().clear().await?;
    tracing::info!(deleted, "all cards cleared");
    Ok(Json(SuccessResponse {
        success: true,
        data: ClearResponse { deleted },
    })
    .into_response())
}

/// Grades a recall attempt: load the card, run the scheduler, persist the
/// new memory state. A rejected grade leaves the stored card untouched.
pub async fn review(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<ReviewRequest>,
) -> Result<Response, AppError> {
    let mut card = state
        .store()
        .get(&id)
        .await?
        .ok_or_else(|| AppError::not_found("card not found"))?;

    let today = Utc::now().date_naive();
    if !state.allow_early_review() && today < card.due_date {
        return Err(AppError::forbidden("this card is not due for review yet"));
    }

    let next = flashcard_algo::review(&card.memory_state(), req.grade, today).map_err(|err| {
        match err {
            SchedulerError::InvalidGrade => AppError::validation(err.to_string()),
            SchedulerError::InvalidState(_) => {
                tracing::error!(card_id = %id, error = %err, "stored memory state is corrupted");
                AppError::internal(err.to_string())
            }
        }
    })?;

    if !state.store().apply_review(&id, &next).await? {
        return Err(AppError::not_found("card not found"));
    }

    card.due_date = next.due_date;
    card.difficulty = next.difficulty;
    card.stability = next.stability;
    card.last_review_date = next.last_review_date;

    tracing::debug!(
        card_id = %id,
        grade = req.grade,
        due = %card.due_date,
        "card reviewed"
    );

    Ok(Json(SuccessResponse {
        success: true,
        data: CardResponse::from(card),
    })
    .into_response())
}

/// Most overdue card, or a plain message when nothing is due (an empty
/// queue is a valid result, not an error).
pub async fn next_due(State(state): State<AppState>) -> Result<Response, AppError> {
    let today = Utc::now().date_naive();
    let due = state.store().list_due(today).await?;

    let pairs: Vec<(String, MemoryState)> = due
        .iter()
        .map(|card| (card.id.clone(), card.memory_state()))
        .collect();

    let picked = flashcard_algo::next_due(&pairs, today)
        .and_then(|(id, _)| due.iter().find(|card| &card.id == id).cloned());

    match picked {
        Some(card) => Ok(Json(SuccessResponse {
            success: true,
            data: CardResponse::from(card),
        })
        .into_response()),
        None => Ok(Json(MessageResponse {
            success: true,
            message: "no cards to review right now",
        })
        .into_response()),
    }
}
