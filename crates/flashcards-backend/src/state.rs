use std::sync::Arc;
use std::time::{Instant, SystemTime};

use crate::store::CardStore;

#[derive(Clone)]
pub struct AppState {
    started_at: Instant,
    started_at_system: SystemTime,
    store: Arc<CardStore>,
    allow_early_review: bool,
}

impl AppState {
    pub fn new(store: Arc<CardStore>, allow_early_review: bool) -> Self {
        Self {
            started_at: Instant::now(),
            started_at_system: SystemTime::now(),
            store,
            allow_early_review,
        }
    }

    pub fn store(&self) -> &CardStore {
        &self.store
    }

    /// Transport-level policy: whether a card may be reviewed before its
    /// due date. The scheduler itself is timing-agnostic.
    pub fn allow_early_review(&self) -> bool {
        self.allow_early_review
    }

    pub fn started_at_system(&self) -> SystemTime {
        self.started_at_system
    }

    pub fn uptime_seconds(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }
}
