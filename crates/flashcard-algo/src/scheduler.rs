//! FSRS-4.5 review transitions and due-card selection.
//!
//! The model fits a power-law forgetting curve
//! `retrievability(t) = (1 + FACTOR * t / S) ^ DECAY` and schedules the
//! next review at the point where retrievability decays to the retention
//! target.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::state::MemoryState;

/// FSRS-4.5 weight vector, empirically fit. Process-wide constant; never
/// mutated and not user-configurable.
pub const W: [f64; 17] = [
    0.4, 0.6, 2.4, 5.8, // w0-w3: initial stability per grade
    4.93, 0.94, 0.86, 0.01, 1.49, // w4-w8
    0.14, 0.94, 2.18, 0.05, 0.34, // w9-w13
    1.26, 0.29, 2.61, // w14-w16
];

/// Target probability of recall at the next scheduled review.
pub const RETENTION: f64 = 0.9;
pub const DECAY: f64 = -0.5;
pub const FACTOR: f64 = 19.0 / 81.0;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SchedulerError {
    #[error("grade must be between 1 and 4")]
    InvalidGrade,
    #[error("memory state is corrupted: {0}")]
    InvalidState(&'static str),
}

/// Recall outcome reported by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Rating {
    Again = 1,
    Hard = 2,
    Good = 3,
    Easy = 4,
}

impl Rating {
    pub fn from_grade(grade: i64) -> Result<Self, SchedulerError> {
        match grade {
            1 => Ok(Self::Again),
            2 => Ok(Self::Hard),
            3 => Ok(Self::Good),
            4 => Ok(Self::Easy),
            _ => Err(SchedulerError::InvalidGrade),
        }
    }
}

/// Modeled probability of successful recall `elapsed_days` after a review
/// that left the card with the given stability.
pub fn retrievability(stability: f64, elapsed_days: f64) -> f64 {
    if stability <= 0.0 {
        return 0.0;
    }
    let safe_elapsed = elapsed_days.max(0.0);
    (1.0 + FACTOR * safe_elapsed / stability).powf(DECAY)
}

/// Applies one graded review to a card's memory state.
///
/// Pure: identical inputs always produce identical outputs, and the input
/// state is never mutated. The grade is validated before anything else, so
/// a failed call leaves no trace.
pub fn review(
    state: &MemoryState,
    grade: i64,
    today: NaiveDate,
) -> Result<MemoryState, SchedulerError> {
    let rating = Rating::from_grade(grade)?;
    validate(state)?;

    // Difficulty must be finalized first: the stability formulas below
    // consume the post-review difficulty.
    let difficulty = match state.difficulty {
        None => initial_difficulty(rating),
        Some(prev) => next_difficulty(prev, rating),
    };

    let stability = match state.stability {
        None => initial_stability(rating),
        Some(prev) if rating == Rating::Again => next_forget_stability(difficulty, prev),
        Some(prev) => next_recall_stability(difficulty, prev, rating),
    };

    let interval_days = next_interval(stability);

    Ok(MemoryState {
        difficulty: Some(difficulty),
        stability: Some(stability),
        due_date: today + Duration::days(interval_days),
        last_review_date: Some(today),
    })
}

/// Picks the card to review next: earliest `due_date <= today`, ties broken
/// by id ascending so selection never depends on input order.
pub fn next_due<'a, Id: Ord>(
    cards: &'a [(Id, MemoryState)],
    today: NaiveDate,
) -> Option<&'a (Id, MemoryState)> {
    cards
        .iter()
        .filter(|(_, state)| state.due_date <= today)
        .min_by(|a, b| {
            a.1.due_date
                .cmp(&b.1.due_date)
                .then_with(|| a.0.cmp(&b.0))
        })
}

fn validate(state: &MemoryState) -> Result<(), SchedulerError> {
    match (state.difficulty, state.stability) {
        (None, None) => Ok(()),
        (Some(d), Some(s)) => {
            if !s.is_finite() || s <= 0.0 {
                return Err(SchedulerError::InvalidState("stability must be positive"));
            }
            if !d.is_finite() {
                return Err(SchedulerError::InvalidState("difficulty must be finite"));
            }
            Ok(())
        }
        _ => Err(SchedulerError::InvalidState(
            "difficulty and stability must be set together",
        )),
    }
}

/// Initial difficulty estimate D0(G) for a first review with grade G.
fn d0(grade: f64) -> f64 {
    W[4] - (grade - 3.0) * W[5]
}

fn initial_difficulty(rating: Rating) -> f64 {
    d0(rating as i64 as f64).clamp(1.0, 10.0)
}

fn next_difficulty(prev: f64, rating: Rating) -> f64 {
    let grade = rating as i64 as f64;
    let next = (W[7] * d0(3.0) + (1.0 - W[7])) * (prev - W[6] * (grade - 3.0));
    next.clamp(1.0, 10.0)
}

/// First-review stability is a direct lookup of w0..w3 by grade.
fn initial_stability(rating: Rating) -> f64 {
    W[rating as usize - 1]
}

fn next_recall_stability(difficulty: f64, stability: f64, rating: Rating) -> f64 {
    let mut inner = W[8].exp()
        * (11.0 - difficulty)
        * stability.powf(-W[9])
        * ((W[10] * (1.0 - RETENTION)).exp() - 1.0);
    if rating == Rating::Hard {
        inner *= W[15];
    }
    if rating == Rating::Easy {
        inner *= W[16];
    }
    stability * (inner + 1.0)
}

fn next_forget_stability(difficulty: f64, stability: f64) -> f64 {
    W[11]
        * difficulty.powf(-W[12])
        * ((stability + 1.0).powf(W[13]) - 1.0)
        * (W[14] * (1.0 - RETENTION)).exp()
}

/// Days until retrievability decays to the retention target, truncated
/// toward zero. The truncated quantity is non-negative for any positive
/// stability, so the interval never moves a due date into the past.
fn next_interval(stability: f64) -> i64 {
    ((stability / FACTOR) * (RETENTION.powf(1.0 / DECAY) - 1.0)) as i64
}
