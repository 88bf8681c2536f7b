//! PostgreSQL database operations
//!
//! Problems, review metadata and review history are only reachable through
//! [`UserScope`], so every query carries the caller's user id.

use std::collections::{HashMap, HashSet};

use sqlx::{postgres::PgPoolOptions, PgExecutor, PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::error::{ApiError, Result};
use crate::models::*;

/// Database wrapper with connection pool
#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    /// Connect to PostgreSQL and create connection pool
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;

        Ok(Self { pool })
    }

    /// Run database migrations
    pub async fn run_migrations(&self) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| ApiError::Migration(e.to_string()))?;
        Ok(())
    }

    /// Get the connection pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Repository restricted to one user's data
    pub fn scoped(&self, user_id: Uuid) -> UserScope<'_> {
        UserScope {
            pool: &self.pool,
            user_id,
        }
    }

    // === User Repository ===

    /// Insert a new user identified by the digest of its token.
    ///
    /// The user only exists once the returned transaction commits, so any
    /// provisioning done on it lands together with the user or not at all.
    pub async fn begin_user(
        &self,
        name: Option<&str>,
        token_hash: &str,
    ) -> Result<(User, ScopedTransaction)> {
        let mut tx = self.pool.begin().await?;

        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, token_hash, name)
            VALUES ($1, $2, $3)
            RETURNING id, token_hash, name, created_at, last_seen_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(token_hash)
        .bind(name)
        .fetch_one(&mut *tx)
        .await?;

        let scoped = ScopedTransaction {
            tx,
            user_id: user.id,
        };
        Ok((user, scoped))
    }

    /// Get user by token digest
    pub async fn get_user_by_token_hash(&self, token_hash: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, token_hash, name, created_at, last_seen_at
            FROM users
            WHERE token_hash = $1
            "#,
        )
        .bind(token_hash)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Get user by id
    pub async fn get_user(&self, user_id: Uuid) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, token_hash, name, created_at, last_seen_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Update user last_seen_at timestamp
    pub async fn update_last_seen(&self, user_id: Uuid) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE users
            SET last_seen_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

/// Data access for a single user
#[derive(Clone, Copy)]
pub struct UserScope<'a> {
    pool: &'a PgPool,
    user_id: Uuid,
}

impl<'a> UserScope<'a> {
    pub fn user_id(&self) -> Uuid {
        self.user_id
    }

    /// Start a transaction bound to this user
    pub async fn begin(&self) -> Result<ScopedTransaction> {
        Ok(ScopedTransaction {
            tx: self.pool.begin().await?,
            user_id: self.user_id,
        })
    }

    // === Problem Repository ===

    /// List problems, optionally filtered by difficulty, platform and tag
    pub async fn list_problems(&self, filter: &ProblemListQuery) -> Result<Vec<DbProblem>> {
        let problems = sqlx::query_as::<_, DbProblem>(
            r#"
            SELECT id, user_id, title, url, difficulty, platform, notes, algorithm_steps,
                   time_complexity, space_complexity, code_snippet, tags, review_status,
                   created_at, updated_at
            FROM problems
            WHERE user_id = $1
              AND ($2::TEXT IS NULL OR difficulty = $2)
              AND ($3::TEXT IS NULL OR platform = $3)
              AND ($4::TEXT IS NULL OR $4 = ANY(tags))
            ORDER BY id
            "#,
        )
        .bind(self.user_id)
        .bind(filter.difficulty.as_deref())
        .bind(filter.platform.as_deref())
        .bind(filter.tag.as_deref())
        .fetch_all(self.pool)
        .await?;

        Ok(problems)
    }

    /// Get problem by ID
    pub async fn get_problem(&self, problem_id: i64) -> Result<Option<DbProblem>> {
        let problem = sqlx::query_as::<_, DbProblem>(
            r#"
            SELECT id, user_id, title, url, difficulty, platform, notes, algorithm_steps,
                   time_complexity, space_complexity, code_snippet, tags, review_status,
                   created_at, updated_at
            FROM problems
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(problem_id)
        .bind(self.user_id)
        .fetch_optional(self.pool)
        .await?;

        Ok(problem)
    }

    /// Insert a new problem
    pub async fn create_problem(&self, draft: &ProblemDraft) -> Result<DbProblem> {
        insert_problem(self.pool, self.user_id, draft).await
    }

    /// Overwrite the editable fields of a problem
    pub async fn update_problem(&self, problem_id: i64, draft: &ProblemDraft) -> Result<Option<DbProblem>> {
        let problem = sqlx::query_as::<_, DbProblem>(
            r#"
            UPDATE problems SET
                title = $3,
                url = $4,
                difficulty = $5,
                platform = $6,
                notes = $7,
                algorithm_steps = $8,
                time_complexity = $9,
                space_complexity = $10,
                code_snippet = $11,
                tags = $12,
                updated_at = NOW()
            WHERE id = $1 AND user_id = $2
            RETURNING id, user_id, title, url, difficulty, platform, notes, algorithm_steps,
                      time_complexity, space_complexity, code_snippet, tags, review_status,
                      created_at, updated_at
            "#,
        )
        .bind(problem_id)
        .bind(self.user_id)
        .bind(&draft.title)
        .bind(&draft.url)
        .bind(draft.difficulty.map(|d| d.as_str()))
        .bind(&draft.platform)
        .bind(&draft.notes)
        .bind(&draft.algorithm_steps)
        .bind(&draft.time_complexity)
        .bind(&draft.space_complexity)
        .bind(&draft.code_snippet)
        .bind(&draft.tags)
        .fetch_optional(self.pool)
        .await?;

        Ok(problem)
    }

    /// Delete a problem; metadata and history go with it
    pub async fn delete_problem(&self, problem_id: i64) -> Result<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM problems
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(problem_id)
        .bind(self.user_id)
        .execute(self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Distinct tags across the user's problems, sorted
    pub async fn list_tags(&self) -> Result<Vec<String>> {
        let tags = sqlx::query_scalar::<_, String>(
            r#"
            SELECT DISTINCT tag
            FROM problems, unnest(tags) AS tag
            WHERE user_id = $1
            ORDER BY tag
            "#,
        )
        .bind(self.user_id)
        .fetch_all(self.pool)
        .await?;

        Ok(tags)
    }

    /// Count the user's problems
    pub async fn count_problems(&self) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM problems
            WHERE user_id = $1
            "#,
        )
        .bind(self.user_id)
        .fetch_one(self.pool)
        .await?;

        Ok(count)
    }

    /// Get review metadata for one problem
    pub async fn get_metadata(&self, problem_id: i64) -> Result<Option<DbReviewMetadata>> {
        let metadata = sqlx::query_as::<_, DbReviewMetadata>(
            r#"
            SELECT m.problem_id, m.total_reviews, m.times_remembered, m.times_forgot,
                   m.last_reviewed, m.next_review_due, m.interval_days
            FROM review_metadata m
            JOIN problems p ON p.id = m.problem_id
            WHERE m.problem_id = $1 AND p.user_id = $2
            "#,
        )
        .bind(problem_id)
        .bind(self.user_id)
        .fetch_optional(self.pool)
        .await?;

        Ok(metadata)
    }

    /// Get review metadata for several problems, keyed by problem id
    pub async fn get_metadata_for(&self, problem_ids: &[i64]) -> Result<HashMap<i64, DbReviewMetadata>> {
        if problem_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows = sqlx::query_as::<_, DbReviewMetadata>(
            r#"
            SELECT m.problem_id, m.total_reviews, m.times_remembered, m.times_forgot,
                   m.last_reviewed, m.next_review_due, m.interval_days
            FROM review_metadata m
            JOIN problems p ON p.id = m.problem_id
            WHERE p.user_id = $1 AND m.problem_id = ANY($2)
            "#,
        )
        .bind(self.user_id)
        .bind(problem_ids)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(|m| (m.problem_id, m)).collect())
    }

    // === Review History Repository ===

    /// Review history, newest first, optionally for a single problem
    pub async fn list_history(&self, problem_id: Option<i64>) -> Result<Vec<DbReviewHistory>> {
        let history = sqlx::query_as::<_, DbReviewHistory>(
            r#"
            SELECT id, user_id, problem_id, result, reviewed_at, next_review_date
            FROM review_history
            WHERE user_id = $1
              AND ($2::BIGINT IS NULL OR problem_id = $2)
            ORDER BY reviewed_at DESC, id DESC
            "#,
        )
        .bind(self.user_id)
        .bind(problem_id)
        .fetch_all(self.pool)
        .await?;

        Ok(history)
    }
}

/// Transaction carrying the owning user's id
pub struct ScopedTransaction {
    tx: Transaction<'static, Postgres>,
    user_id: Uuid,
}

impl ScopedTransaction {
    pub fn user_id(&self) -> Uuid {
        self.user_id
    }

    pub async fn commit(self) -> Result<()> {
        self.tx.commit().await?;
        Ok(())
    }

    /// Lock the problem row for the rest of the transaction
    pub async fn lock_problem(&mut self, problem_id: i64) -> Result<Option<DbProblem>> {
        let problem = sqlx::query_as::<_, DbProblem>(
            r#"
            SELECT id, user_id, title, url, difficulty, platform, notes, algorithm_steps,
                   time_complexity, space_complexity, code_snippet, tags, review_status,
                   created_at, updated_at
            FROM problems
            WHERE id = $1 AND user_id = $2
            FOR UPDATE
            "#,
        )
        .bind(problem_id)
        .bind(self.user_id)
        .fetch_optional(&mut *self.tx)
        .await?;

        Ok(problem)
    }

    /// Get metadata of a problem already locked in this transaction
    pub async fn get_metadata(&mut self, problem_id: i64) -> Result<Option<DbReviewMetadata>> {
        let metadata = sqlx::query_as::<_, DbReviewMetadata>(
            r#"
            SELECT problem_id, total_reviews, times_remembered, times_forgot,
                   last_reviewed, next_review_due, interval_days
            FROM review_metadata
            WHERE problem_id = $1
            "#,
        )
        .bind(problem_id)
        .fetch_optional(&mut *self.tx)
        .await?;

        Ok(metadata)
    }

    /// Upsert review metadata
    pub async fn upsert_metadata(&mut self, metadata: &DbReviewMetadata) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO review_metadata (problem_id, total_reviews, times_remembered, times_forgot,
                                         last_reviewed, next_review_due, interval_days)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (problem_id) DO UPDATE SET
                total_reviews = EXCLUDED.total_reviews,
                times_remembered = EXCLUDED.times_remembered,
                times_forgot = EXCLUDED.times_forgot,
                last_reviewed = EXCLUDED.last_reviewed,
                next_review_due = EXCLUDED.next_review_due,
                interval_days = EXCLUDED.interval_days
            "#,
        )
        .bind(metadata.problem_id)
        .bind(metadata.total_reviews)
        .bind(metadata.times_remembered)
        .bind(metadata.times_forgot)
        .bind(metadata.last_reviewed)
        .bind(metadata.next_review_due)
        .bind(metadata.interval_days)
        .execute(&mut *self.tx)
        .await?;

        Ok(())
    }

    /// Append a history event
    pub async fn insert_history(&mut self, event: &ReviewEvent) -> Result<DbReviewHistory> {
        let history = sqlx::query_as::<_, DbReviewHistory>(
            r#"
            INSERT INTO review_history (user_id, problem_id, result, reviewed_at, next_review_date)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, user_id, problem_id, result, reviewed_at, next_review_date
            "#,
        )
        .bind(self.user_id)
        .bind(event.problem_id)
        .bind(event.outcome.as_str())
        .bind(event.reviewed_at)
        .bind(event.next_review_date)
        .fetch_one(&mut *self.tx)
        .await?;

        Ok(history)
    }

    /// Overwrite the cached display flag of a problem
    pub async fn set_review_status(&mut self, problem_id: i64, status: ReviewStatus) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE problems
            SET review_status = $3
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(problem_id)
        .bind(self.user_id)
        .bind(status.to_value())
        .execute(&mut *self.tx)
        .await?;

        Ok(())
    }

    /// Remove all history and metadata of a problem
    pub async fn clear_review_state(&mut self, problem_id: i64) -> Result<()> {
        sqlx::query(
            r#"
            DELETE FROM review_history
            WHERE problem_id = $1 AND user_id = $2
            "#,
        )
        .bind(problem_id)
        .bind(self.user_id)
        .execute(&mut *self.tx)
        .await?;

        sqlx::query(
            r#"
            DELETE FROM review_metadata m
            USING problems p
            WHERE m.problem_id = p.id AND p.id = $1 AND p.user_id = $2
            "#,
        )
        .bind(problem_id)
        .bind(self.user_id)
        .execute(&mut *self.tx)
        .await?;

        Ok(())
    }

    /// Insert a problem inside this transaction
    pub async fn insert_problem(&mut self, draft: &ProblemDraft) -> Result<DbProblem> {
        insert_problem(&mut *self.tx, self.user_id, draft).await
    }

    /// Titles the user already has
    pub async fn existing_titles(&mut self) -> Result<HashSet<String>> {
        let titles = sqlx::query_scalar::<_, String>(
            r#"
            SELECT title
            FROM problems
            WHERE user_id = $1
            "#,
        )
        .bind(self.user_id)
        .fetch_all(&mut *self.tx)
        .await?;

        Ok(titles.into_iter().collect())
    }
}

async fn insert_problem<'e, E>(executor: E, user_id: Uuid, draft: &ProblemDraft) -> Result<DbProblem>
where
    E: PgExecutor<'e>,
{
    let problem = sqlx::query_as::<_, DbProblem>(
        r#"
        INSERT INTO problems (user_id, title, url, difficulty, platform, notes, algorithm_steps,
                              time_complexity, space_complexity, code_snippet, tags)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
        RETURNING id, user_id, title, url, difficulty, platform, notes, algorithm_steps,
                  time_complexity, space_complexity, code_snippet, tags, review_status,
                  created_at, updated_at
        "#,
    )
    .bind(user_id)
    .bind(&draft.title)
    .bind(&draft.url)
    .bind(draft.difficulty.map(|d| d.as_str()))
    .bind(&draft.platform)
    .bind(&draft.notes)
    .bind(&draft.algorithm_steps)
    .bind(&draft.time_complexity)
    .bind(&draft.space_complexity)
    .bind(&draft.code_snippet)
    .bind(&draft.tags)
    .fetch_one(executor)
    .await?;

    Ok(problem)
}
