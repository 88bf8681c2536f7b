//! Core library for the algorithm practice tracker.
//!
//! Provides:
//! - Spaced repetition scheduling (interval doubling with a 30 day cap)
//! - Dashboard statistics (success rate, review streak)
//! - Problem payload validation
//! - Starter problem list parser
//! - Shared types (ReviewMetadata, ReviewEvent, ReviewOutcome, etc.)

pub mod algorithm;
pub mod error;
pub mod parser;
pub mod problem;
pub mod stats;
pub mod types;

pub use algorithm::{get_algorithm, SchedulingResult, SpacedRepetitionAlgorithm};
pub use error::{ParseError, Result, ValidationError};
pub use parser::{parse_problem_list, SeedProblem};
pub use problem::{ProblemDraft, ProblemPatch};
pub use stats::compute_stats;
pub use types::{
    DashboardStats, Difficulty, ReviewEvent, ReviewMetadata, ReviewOutcome, ReviewStatus,
};
