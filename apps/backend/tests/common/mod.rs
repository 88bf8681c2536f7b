//! Common test utilities for integration tests.
//!
//! Provides a TestContext that connects to PostgreSQL, runs migrations and
//! builds the full application router.
//!
//! # Requirements
//! Integration tests require a PostgreSQL database (set DATABASE_URL env var).

pub mod fixtures;

use std::sync::Arc;

use axum::Router;
use uuid::Uuid;

use practice_tracker_backend::config::Config;
use practice_tracker_backend::db::Database;
use practice_tracker_backend::services::tokens::{generate_token, hash_token};
use practice_tracker_backend::{build_router, AppState};

/// Test context containing database connection and router.
pub struct TestContext {
    pub db: Arc<Database>,
    app: Router,
}

impl TestContext {
    /// Create a new test context with starter seeding disabled.
    ///
    /// # Panics
    /// Panics if DATABASE_URL is not set or database connection fails.
    pub async fn new() -> Self {
        Self::with_seeding(false).await
    }

    /// Create a test context that seeds the starter catalog on registration.
    pub async fn with_seeding(seed_starter_catalog: bool) -> Self {
        dotenvy::dotenv().ok();

        let mut config = Config::from_lookup(|key| std::env::var(key).ok())
            .expect("DATABASE_URL must be set for integration tests");
        config.seed_starter_catalog = seed_starter_catalog;

        let db = Database::connect(&config.database_url, 5)
            .await
            .expect("Failed to connect to test database");

        db.run_migrations()
            .await
            .expect("Failed to run migrations");

        let state = AppState::new(db, config).expect("Failed to build app state");
        let db = state.db.clone();
        let app = build_router(state);

        Self { db, app }
    }

    /// Get the router for use with axum-test.
    pub fn router(&self) -> Router {
        self.app.clone()
    }

    /// Create a test user directly in the database and return its ID and token.
    pub async fn create_test_user(&self, name: Option<&str>) -> (Uuid, String) {
        let token = generate_token();
        let (user, tx) = self
            .db
            .begin_user(name, &hash_token(&token))
            .await
            .expect("Failed to create test user");
        tx.commit().await.expect("Failed to commit test user");
        (user.id, token)
    }

    /// Format authorization header value.
    pub fn auth_header_value(token: &str) -> String {
        format!("Bearer {}", token)
    }

    /// Remove a test user. Problems, metadata and history cascade.
    pub async fn cleanup_user(&self, user_id: Uuid) {
        let _ = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(user_id)
            .execute(self.db.pool())
            .await;
    }
}
