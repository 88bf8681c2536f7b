//! Starter catalog provisioning and bulk import.

use practice_core::{parse_problem_list, ParseError, ProblemDraft, SeedProblem};

use crate::db::{ScopedTransaction, UserScope};
use crate::error::{ApiError, Result};
use crate::models::DbProblem;

/// Bundled starter problem list.
pub const STARTER_LIST: &str = include_str!("../../seed/problems_list.txt");

/// Parse the bundled starter list.
pub fn starter_problems() -> std::result::Result<Vec<SeedProblem>, ParseError> {
    parse_problem_list(STARTER_LIST)
}

/// Draft for a seeded problem: its title plus the section as a tag.
pub fn seed_draft(seed: &SeedProblem) -> ProblemDraft {
    ProblemDraft {
        tags: seed.tag().map(|t| vec![t]),
        ..ProblemDraft::titled(seed.title.clone())
    }
}

/// Insert every listed problem the user does not already have (matched by title).
///
/// Returns the number of problems inserted; running it twice inserts nothing
/// the second time.
pub async fn seed_catalog(scope: UserScope<'_>, problems: &[SeedProblem]) -> Result<usize> {
    let mut tx = scope.begin().await?;
    let inserted = seed_in(&mut tx, problems).await?;
    tx.commit().await?;
    Ok(inserted)
}

/// Same as [`seed_catalog`], inside a transaction the caller commits.
pub async fn seed_in(tx: &mut ScopedTransaction, problems: &[SeedProblem]) -> Result<usize> {
    let existing = tx.existing_titles().await?;

    let mut inserted = 0;
    for seed in problems.iter().filter(|p| !existing.contains(&p.title)) {
        tx.insert_problem(&seed_draft(seed)).await?;
        inserted += 1;
    }

    tracing::info!(user_id = %tx.user_id(), inserted, "Seeded starter catalog");
    Ok(inserted)
}

/// Seed the bundled starter list into the user's catalog.
pub async fn seed_starter_catalog(scope: UserScope<'_>) -> Result<usize> {
    let problems = starter_problems().map_err(|e| ApiError::Internal(e.to_string()))?;
    seed_catalog(scope, &problems).await
}

/// Create several problems at once. Nothing is inserted if any draft is invalid,
/// and an empty list is rejected.
pub async fn import_problems(scope: UserScope<'_>, drafts: Vec<ProblemDraft>) -> Result<Vec<DbProblem>> {
    if drafts.is_empty() {
        return Err(ApiError::BadRequest("No problems to import".to_string()));
    }

    let drafts = drafts
        .into_iter()
        .map(ProblemDraft::normalize)
        .collect::<std::result::Result<Vec<_>, _>>()?;

    let mut tx = scope.begin().await?;
    let mut created = Vec::with_capacity(drafts.len());
    for draft in &drafts {
        created.push(tx.insert_problem(draft).await?);
    }
    tx.commit().await?;

    tracing::info!(user_id = %scope.user_id(), count = created.len(), "Imported problems");
    Ok(created)
}
