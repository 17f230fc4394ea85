//! Memory state types shared by the scheduler and its callers.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Per-card memory state driving the scheduler.
///
/// `difficulty` and `stability` are unset until the first review and are
/// always set together afterwards; the scheduler treats any other
/// combination as corrupted external state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryState {
    /// Perceived intrinsic difficulty, clamped to [1, 10] once set.
    pub difficulty: Option<f64>,
    /// Days until recall probability decays to the retention target.
    /// Strictly positive once set.
    pub stability: Option<f64>,
    /// Next scheduled review date. Defaults to the creation date, so a
    /// fresh card is immediately due.
    pub due_date: NaiveDate,
    /// Date of the most recent review, if any.
    pub last_review_date: Option<NaiveDate>,
}

impl MemoryState {
    pub fn new(created_on: NaiveDate) -> Self {
        Self {
            difficulty: None,
            stability: None,
            due_date: created_on,
            last_review_date: None,
        }
    }

    /// A card is new until its first review sets difficulty and stability.
    pub fn is_new(&self) -> bool {
        self.stability.is_none()
    }
}
