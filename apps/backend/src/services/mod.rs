//! Scheduler-facing services: admission, grading, and due queries.

pub mod admission;
pub mod grading;
pub mod queue;
