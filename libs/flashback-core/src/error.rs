//! Error types for flashback-core.

use thiserror::Error;

/// Result type alias using GradeError.
pub type Result<T> = std::result::Result<T, GradeError>;

/// Errors that can occur when validating grading input.
///
/// The engine itself never fails: a `Quality` is validated at construction,
/// before it reaches the scheduler.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GradeError {
    #[error("quality {value} is outside the 0-5 grading scale")]
    InvalidQuality { value: i32 },
}
