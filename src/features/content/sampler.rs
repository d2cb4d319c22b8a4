//! # Content Sampler
//!
//! Draws a random batch of tasks from every category of the pool.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0

use rand::seq::IndexedRandom;
use rand::Rng;
use std::sync::Arc;

use super::{ContentError, ContentItem, ContentPool};

/// Random batch sampler over a shared, read-only pool
#[derive(Debug, Clone)]
pub struct ContentSampler {
    pool: Arc<ContentPool>,
}

impl ContentSampler {
    pub fn new(pool: Arc<ContentPool>) -> Self {
        Self { pool }
    }

    /// Draw `n` items from each category using the thread-local RNG
    pub fn sample(&self, n: usize) -> Result<Vec<ContentItem>, ContentError> {
        self.sample_with(n, &mut rand::rng())
    }

    /// Draw `n` items per category, uniformly and with replacement.
    ///
    /// Results are concatenated in category order, so the batch holds
    /// `n * category_count` items. Duplicates within a batch are possible.
    pub fn sample_with<R: Rng + ?Sized>(
        &self,
        n: usize,
        rng: &mut R,
    ) -> Result<Vec<ContentItem>, ContentError> {
        if n == 0 {
            return Err(ContentError::InvalidBatchSize);
        }
        if self.pool.category_count() == 0 {
            return Err(ContentError::EmptyPool {
                category: "<none>".to_string(),
            });
        }

        let mut batch = Vec::with_capacity(n * self.pool.category_count());
        for (category, items) in self.pool.categories() {
            for _ in 0..n {
                let item = items.choose(rng).ok_or_else(|| ContentError::EmptyPool {
                    category: category.to_string(),
                })?;
                batch.push(item.clone());
            }
        }
        Ok(batch)
    }
}
