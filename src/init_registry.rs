/*!
 * Durable initialization registry.
 *
 * Replaces process-local "has this been seeded" flags with an idempotency
 * check against the same store as the data it guards, so correctness does
 * not depend on process lifetime.
 */

use anyhow::Result;
use log::debug;

use crate::store::Repository;

/// Durable `is_initialized` / `mark_initialized` contract
#[derive(Clone)]
pub struct InitializationRegistry {
    repo: Repository,
}

impl InitializationRegistry {
    /// Create a registry over the given repository
    pub fn new(repo: Repository) -> Self {
        Self { repo }
    }

    /// Whether the key has been durably marked initialized
    pub async fn is_initialized(&self, key: &str) -> Result<bool> {
        self.repo.is_initialized(key).await
    }

    /// Durably mark the key initialized; idempotent
    pub async fn mark_initialized(&self, key: &str) -> Result<()> {
        self.repo.mark_initialized(key).await
    }

    /// Run a seeding closure exactly once per key across process restarts
    pub async fn ensure<F, Fut>(&self, key: &str, seed: F) -> Result<bool>
    where
        F: FnOnce() -> Fut,
        Fut: std::future::Future<Output = Result<()>>,
    {
        if self.is_initialized(key).await? {
            debug!("Initialization for {} already done; skipping", key);
            return Ok(false);
        }
        seed().await?;
        self.mark_initialized(key).await?;
        Ok(true)
    }
}
