//! # flashcard-algo - spaced repetition scheduling core
//!
//! Pure Rust implementation of the FSRS-4.5 memory model for flashcard
//! review scheduling:
//!
//! - **MemoryState** - per-card difficulty, stability and due date
//! - **review** - grade a recall attempt and compute the next due date
//! - **next_due** - deterministic selection of the most overdue card
//!
//! The crate performs no I/O and holds no global state; every operation is
//! a bounded, synchronous computation over its inputs, so it is safe to
//! call concurrently for different cards without synchronization.
//!
//! ## Module structure
//!
//! - [`scheduler`] - FSRS-4.5 weights, review transition, due selection
//! - [`state`] - memory state types

pub mod scheduler;
pub mod state;

pub use scheduler::{
    next_due, retrievability, review, Rating, SchedulerError, DECAY, FACTOR, RETENTION, W,
};
pub use state::MemoryState;
