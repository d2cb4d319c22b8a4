//! # Delayed Deliveries
//!
//! One-shot follow-up jobs keyed by subscriber identity. A job can be
//! cancelled until its delay elapses; once the delay is over it runs to
//! completion.
//!
//! - **Version**: 1.1.0
//! - **Since**: 0.3.0
//!
//! ## Changelog
//! - 1.1.0: Store the abort handle before the job can run

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use log::debug;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::AbortHandle;

use crate::features::subscribers::SubscriberId;

#[derive(Debug, Default)]
pub struct DelayedJobs {
    pending: DashMap<SubscriberId, (u64, AbortHandle)>,
    next_generation: AtomicU64,
}

impl DelayedJobs {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Run `job` for `id` after `delay`, replacing any job still waiting for `id`
    pub fn schedule<F>(self: &Arc<Self>, id: SubscriberId, delay: Duration, job: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let generation = self.next_generation.fetch_add(1, Ordering::Relaxed);
        let jobs = Arc::clone(self);

        let spawn = move || {
            tokio::spawn(async move {
                tokio::time::sleep(delay).await;
                jobs.pending
                    .remove_if(&id, |_, (current, _)| *current == generation);
                job.await;
            })
            .abort_handle()
        };

        // The entry guard holds the shard lock until the handle is stored, so
        // even a zero-delay job cannot reach its remove_if first
        match self.pending.entry(id) {
            Entry::Occupied(mut occupied) => {
                let (_, previous) = occupied.insert((generation, spawn()));
                debug!("Replacing pending follow-up for {id}");
                previous.abort();
            }
            Entry::Vacant(vacant) => {
                vacant.insert((generation, spawn()));
            }
        }
    }

    /// Drop the job waiting for `id`. Returns false when nothing was pending.
    pub fn cancel(&self, id: SubscriberId) -> bool {
        match self.pending.remove(&id) {
            Some((_, (_, handle))) => {
                handle.abort();
                true
            }
            None => false,
        }
    }

    #[cfg(test)]
    fn is_pending(&self, id: SubscriberId) -> bool {
        self.pending.contains_key(&id)
    }
}
