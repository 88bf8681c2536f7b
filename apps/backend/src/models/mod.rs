//! Database models and API types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

// Re-export shared types from practice-core
pub use practice_core::types::{
    DashboardStats, Difficulty, ReviewEvent, ReviewMetadata, ReviewOutcome, ReviewStatus,
};
pub use practice_core::{ProblemDraft, ProblemPatch, ValidationError};

// === Database Entity Types ===

/// Registered user
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub token_hash: String,
    pub name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub last_seen_at: DateTime<Utc>,
}

/// Problem stored in PostgreSQL
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbProblem {
    pub id: i64,
    pub user_id: Uuid,
    pub title: String,
    pub url: Option<String>,
    pub difficulty: Option<String>,
    pub platform: Option<String>,
    pub notes: Option<String>,
    pub algorithm_steps: Option<String>,
    pub time_complexity: Option<String>,
    pub space_complexity: Option<String>,
    pub code_snippet: Option<String>,
    pub tags: Option<Vec<String>>,
    pub review_status: i16,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl DbProblem {
    /// Editable fields as a draft, used as the base for partial updates
    pub fn to_draft(&self) -> Result<ProblemDraft, ValidationError> {
        Ok(ProblemDraft {
            title: self.title.clone(),
            url: self.url.clone(),
            difficulty: self.difficulty.as_deref().map(str::parse::<Difficulty>).transpose()?,
            platform: self.platform.clone(),
            notes: self.notes.clone(),
            algorithm_steps: self.algorithm_steps.clone(),
            time_complexity: self.time_complexity.clone(),
            space_complexity: self.space_complexity.clone(),
            code_snippet: self.code_snippet.clone(),
            tags: self.tags.clone(),
        })
    }

    /// Convert to API problem type
    pub fn to_api_problem(
        &self,
        metadata: Option<&DbReviewMetadata>,
    ) -> Result<ProblemResponse, ValidationError> {
        let review_status = ReviewStatus::from_value(self.review_status)
            .ok_or(ValidationError::InvalidStatus(self.review_status))?;
        let review_metadata = metadata.map(|m| m.to_api_metadata()).transpose()?;

        Ok(ProblemResponse {
            id: self.id,
            draft: self.to_draft()?,
            review_status,
            created_at: self.created_at,
            updated_at: self.updated_at,
            review_metadata,
        })
    }
}

/// Review metadata in PostgreSQL
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbReviewMetadata {
    pub problem_id: i64,
    pub total_reviews: i32,
    pub times_remembered: i32,
    pub times_forgot: i32,
    pub last_reviewed: Option<DateTime<Utc>>,
    pub next_review_due: Option<DateTime<Utc>>,
    pub interval_days: i32,
}

impl DbReviewMetadata {
    /// Create from practice-core ReviewMetadata
    pub fn from_core(problem_id: i64, metadata: &ReviewMetadata) -> Self {
        Self {
            problem_id,
            total_reviews: clamp_i32(metadata.total_reviews),
            times_remembered: clamp_i32(metadata.times_remembered),
            times_forgot: clamp_i32(metadata.times_forgot),
            last_reviewed: metadata.last_reviewed,
            next_review_due: metadata.next_review_due,
            interval_days: clamp_i32(metadata.interval_days),
        }
    }

    /// Convert to practice-core ReviewMetadata
    pub fn to_core(&self) -> Result<ReviewMetadata, ValidationError> {
        if self.interval_days < 1 {
            return Err(ValidationError::InvalidInterval(self.interval_days.into()));
        }
        Ok(ReviewMetadata {
            total_reviews: non_negative("total_reviews", self.total_reviews)?,
            times_remembered: non_negative("times_remembered", self.times_remembered)?,
            times_forgot: non_negative("times_forgot", self.times_forgot)?,
            last_reviewed: self.last_reviewed,
            next_review_due: self.next_review_due,
            interval_days: self.interval_days as u32,
        })
    }

    /// Convert to ReviewMetadata with problem_id included (for API responses)
    pub fn to_api_metadata(&self) -> Result<ReviewMetadataWithId, ValidationError> {
        Ok(ReviewMetadataWithId {
            problem_id: self.problem_id,
            metadata: self.to_core()?,
        })
    }
}

fn non_negative(field: &'static str, value: i32) -> Result<u32, ValidationError> {
    u32::try_from(value).map_err(|_| ValidationError::NegativeCount {
        field,
        value: value.into(),
    })
}

fn clamp_i32(value: u32) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}

/// Review history entry in PostgreSQL
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbReviewHistory {
    pub id: i64,
    pub user_id: Uuid,
    pub problem_id: i64,
    pub result: String,
    pub reviewed_at: DateTime<Utc>,
    pub next_review_date: DateTime<Utc>,
}

impl DbReviewHistory {
    /// Convert to practice-core ReviewEvent
    pub fn to_core_event(&self) -> Result<ReviewEvent, ValidationError> {
        Ok(ReviewEvent {
            problem_id: self.problem_id,
            outcome: self.result.parse()?,
            reviewed_at: self.reviewed_at,
            next_review_date: self.next_review_date,
        })
    }

    /// Convert to API history type
    pub fn to_api_history(&self) -> Result<ReviewHistoryResponse, ValidationError> {
        Ok(ReviewHistoryResponse {
            id: self.id,
            event: self.to_core_event()?,
        })
    }
}

// === API Request/Response Types ===

/// ReviewMetadata with associated problem_id
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewMetadataWithId {
    pub problem_id: i64,
    #[serde(flatten)]
    pub metadata: ReviewMetadata,
}

/// Problem with its review metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProblemResponse {
    pub id: i64,
    #[serde(flatten)]
    pub draft: ProblemDraft,
    pub review_status: ReviewStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub review_metadata: Option<ReviewMetadataWithId>,
}

/// History entry as returned by the API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewHistoryResponse {
    pub id: i64,
    #[serde(flatten)]
    pub event: ReviewEvent,
}

// User types
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub name: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RegisterResponse {
    pub user_id: Uuid,
    pub token: String,
    pub seeded_problems: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UserStatusResponse {
    pub user_id: Uuid,
    pub name: Option<String>,
    pub last_seen_at: DateTime<Utc>,
}

// Problem types
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ProblemListQuery {
    pub difficulty: Option<String>,
    pub tag: Option<String>,
    pub platform: Option<String>,
}

// Review types
#[derive(Debug, Serialize, Deserialize)]
pub struct SubmitReviewRequest {
    pub problem_id: i64,
    pub result: String,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct HistoryQuery {
    pub problem_id: Option<i64>,
}

// Import types
#[derive(Debug, Serialize, Deserialize)]
pub struct SeedResponse {
    pub inserted: usize,
}
