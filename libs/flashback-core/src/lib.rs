//! Core review-scheduling library shared by the Flashback backend.
//!
//! Provides:
//! - The SM-2 variant scheduling engine (pure, clock passed explicitly)
//! - Shared types (ReviewState, ItemStatus, Quality)
//! - Grading input validation

pub mod error;
pub mod scheduler;
pub mod types;

pub use error::{GradeError, Result};
pub use scheduler::{sm2::Sm2, GradeOutcome};
pub use types::{ItemStatus, Quality, ReviewState};
