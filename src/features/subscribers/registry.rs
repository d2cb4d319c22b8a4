//! # Subscriber Registry
//!
//! In-memory roster keyed by identity, mirrored to [`SubscriberStore`].
//! Each mutation holds the roster lock across mutate and persist, so two
//! concurrent mutations can never lose each other's update.
//!
//! The store is rewritten in full on every mutation. That is fine for a
//! classroom-sized roster and is the known scaling limit of this design.
//!
//! - **Version**: 1.2.0
//! - **Since**: 0.1.0
//!
//! ## Changelog
//! - 1.2.0: Retry persistence, roll back the mutation when it still fails
//! - 1.1.0: Identity-keyed roster instead of a plain list
//! - 1.0.0: Initial release

use log::{error, info, warn};
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::Mutex;

use super::{RegistryError, Subscriber, SubscriberId, SubscriberStore, SubscriptionState};

const PERSIST_ATTEMPTS: u32 = 3;
const PERSIST_RETRY_DELAY: Duration = Duration::from_millis(50);

/// Result of [`SubscriberRegistry::add`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    Added,
    AlreadySubscribed,
}

/// Result of [`SubscriberRegistry::remove`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoveOutcome {
    Removed(Subscriber),
    NotPresent,
}

#[derive(Debug, Default)]
struct Roster {
    by_id: HashMap<SubscriberId, Subscriber>,
    order: Vec<SubscriberId>,
}

impl Roster {
    fn contains(&self, id: SubscriberId) -> bool {
        self.by_id.contains_key(&id)
    }

    fn push(&mut self, subscriber: Subscriber) {
        self.order.push(subscriber.id);
        self.by_id.insert(subscriber.id, subscriber);
    }

    fn insert_at(&mut self, index: usize, subscriber: Subscriber) {
        self.order.insert(index.min(self.order.len()), subscriber.id);
        self.by_id.insert(subscriber.id, subscriber);
    }

    fn take(&mut self, id: SubscriberId) -> Option<(usize, Subscriber)> {
        let subscriber = self.by_id.remove(&id)?;
        let index = self.order.iter().position(|&o| o == id).unwrap_or(self.order.len());
        if index < self.order.len() {
            self.order.remove(index);
        }
        Some((index, subscriber))
    }

    fn snapshot(&self) -> Vec<Subscriber> {
        self.order
            .iter()
            .filter_map(|id| self.by_id.get(id).cloned())
            .collect()
    }
}

/// Shared subscriber roster. The backing set is never handed out; callers
/// only see cloned snapshots.
#[derive(Debug)]
pub struct SubscriberRegistry {
    store: SubscriberStore,
    roster: Mutex<Roster>,
}

impl SubscriberRegistry {
    /// Load the roster from `store`. An absent or empty store gives an empty roster.
    pub async fn load(store: SubscriberStore) -> Result<Self, RegistryError> {
        let mut roster = Roster::default();
        for subscriber in store.load().await? {
            if roster.contains(subscriber.id) {
                warn!(
                    "Duplicate subscriber {} in {}, keeping the first record",
                    subscriber.id,
                    store.path().display()
                );
                continue;
            }
            roster.push(subscriber);
        }

        info!(
            "👥 Loaded {} subscribers from {}",
            roster.order.len(),
            store.path().display()
        );

        Ok(Self {
            store,
            roster: Mutex::new(roster),
        })
    }

    /// Insert `subscriber` unless its identity is already present.
    ///
    /// The new roster is on disk before this returns `Added`.
    pub async fn add(&self, subscriber: Subscriber) -> Result<AddOutcome, RegistryError> {
        let mut roster = self.roster.lock().await;
        if roster.contains(subscriber.id) {
            return Ok(AddOutcome::AlreadySubscribed);
        }

        let id = subscriber.id;
        roster.push(subscriber);

        if let Err(e) = self.persist(&roster).await {
            roster.take(id);
            return Err(e);
        }
        Ok(AddOutcome::Added)
    }

    /// Remove the subscriber with `id`, persisting the roster if it changed
    pub async fn remove(&self, id: SubscriberId) -> Result<RemoveOutcome, RegistryError> {
        let mut roster = self.roster.lock().await;
        let Some((index, removed)) = roster.take(id) else {
            info!("Subscriber {id} is not registered, nothing to remove");
            return Ok(RemoveOutcome::NotPresent);
        };

        if let Err(e) = self.persist(&roster).await {
            roster.insert_at(index, removed);
            return Err(e);
        }
        Ok(RemoveOutcome::Removed(removed))
    }

    pub async fn get(&self, id: SubscriberId) -> Option<Subscriber> {
        self.roster.lock().await.by_id.get(&id).cloned()
    }

    /// Snapshot of every subscriber in registration order
    pub async fn all(&self) -> Vec<Subscriber> {
        self.roster.lock().await.snapshot()
    }

    pub async fn state(&self, id: SubscriberId) -> SubscriptionState {
        if self.roster.lock().await.contains(id) {
            SubscriptionState::Registered
        } else {
            SubscriptionState::Unregistered
        }
    }

    pub async fn len(&self) -> usize {
        self.roster.lock().await.order.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    async fn persist(&self, roster: &Roster) -> Result<(), RegistryError> {
        let snapshot = roster.snapshot();
        let mut attempt = 1;
        loop {
            match self.store.save(&snapshot).await {
                Ok(()) => return Ok(()),
                Err(e) if attempt < PERSIST_ATTEMPTS => {
                    warn!(
                        "Saving subscribers failed (attempt {attempt}/{PERSIST_ATTEMPTS}): {e}"
                    );
                    attempt += 1;
                    tokio::time::sleep(PERSIST_RETRY_DELAY).await;
                }
                Err(e) => {
                    error!(
                        "❌ Subscriber store is NOT updated after {PERSIST_ATTEMPTS} attempts, change rolled back: {e}"
                    );
                    return Err(e);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use std::sync::Arc;

    async fn registry_at(path: &Path) -> SubscriberRegistry {
        SubscriberRegistry::load(SubscriberStore::new(path))
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_add_then_get() {
        let dir = tempfile::tempdir().unwrap();
        let registry = registry_at(&dir.path().join("subscribers.json")).await;
        let sub = Subscriber::new(7).with_nickname("seven");

        assert_eq!(registry.add(sub.clone()).await.unwrap(), AddOutcome::Added);

        let found = registry.get(7).await.unwrap();
        assert_eq!(found, sub);
        assert_eq!(found.nickname.as_deref(), Some("seven"));
        assert_eq!(registry.state(7).await, SubscriptionState::Registered);
    }

    #[tokio::test]
    async fn test_add_existing_identity_is_noop() {
        let dir = tempfile::tempdir().unwrap();
        let registry = registry_at(&dir.path().join("subscribers.json")).await;

        registry.add(Subscriber::new(1).with_nickname("first")).await.unwrap();
        let outcome = registry
            .add(Subscriber::new(1).with_nickname("renamed"))
            .await
            .unwrap();

        assert_eq!(outcome, AddOutcome::AlreadySubscribed);
        assert_eq!(registry.len().await, 1);
        assert_eq!(
            registry.get(1).await.unwrap().nickname.as_deref(),
            Some("first")
        );
    }

    #[tokio::test]
    async fn test_remove() {
        let dir = tempfile::tempdir().unwrap();
        let registry = registry_at(&dir.path().join("subscribers.json")).await;
        registry.add(Subscriber::new(1)).await.unwrap();

        match registry.remove(1).await.unwrap() {
            RemoveOutcome::Removed(s) => assert_eq!(s.id, 1),
            RemoveOutcome::NotPresent => panic!("expected removal"),
        }
        assert!(registry.get(1).await.is_none());
        assert_eq!(registry.state(1).await, SubscriptionState::Unregistered);
        assert_eq!(registry.remove(1).await.unwrap(), RemoveOutcome::NotPresent);
    }

    #[tokio::test]
    async fn test_all_keeps_insertion_order() {
        let dir = tempfile::tempdir().unwrap();
        let registry = registry_at(&dir.path().join("subscribers.json")).await;
        for id in [30, 10, 20] {
            registry.add(Subscriber::new(id)).await.unwrap();
        }
        registry.remove(10).await.unwrap();
        registry.add(Subscriber::new(10)).await.unwrap();

        let ids: Vec<u64> = registry.all().await.iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![30, 20, 10]);
    }

    #[tokio::test]
    async fn test_survives_restart() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("subscribers.json");
        {
            let registry = registry_at(&path).await;
            registry.add(Subscriber::new(1).with_nickname("a")).await.unwrap();
            registry.add(Subscriber::new(2).with_nickname("b")).await.unwrap();
            registry.add(Subscriber::new(3).with_nickname("c")).await.unwrap();
            registry.remove(2).await.unwrap();
        }

        let reloaded = registry_at(&path).await;
        let all = reloaded.all().await;
        assert_eq!(all, vec![Subscriber::new(1), Subscriber::new(3)]);
        assert_eq!(all[1].nickname.as_deref(), Some("c"));
    }

    #[tokio::test]
    async fn test_duplicates_in_store_are_collapsed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("subscribers.json");
        std::fs::write(&path, r#"[{"chat_id":1},{"chat_id":1,"nickname":"dup"},{"chat_id":2}]"#)
            .unwrap();

        let registry = registry_at(&path).await;
        assert_eq!(registry.len().await, 2);
        assert!(registry.get(1).await.unwrap().nickname.is_none());
    }

    #[tokio::test]
    async fn test_failed_persist_rolls_back() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("data");
        std::fs::create_dir(&nested).unwrap();
        let registry = registry_at(&nested.join("subscribers.json")).await;
        registry.add(Subscriber::new(1)).await.unwrap();

        std::fs::remove_dir_all(&nested).unwrap();

        let err = registry.add(Subscriber::new(2)).await.unwrap_err();
        assert!(matches!(err, RegistryError::Storage { .. }));
        assert!(registry.get(2).await.is_none());

        assert!(registry.remove(1).await.is_err());
        assert!(registry.get(1).await.is_some());
    }

    #[tokio::test]
    async fn test_concurrent_mutations_are_not_lost() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("subscribers.json");
        let registry = Arc::new(registry_at(&path).await);

        let mut handles = Vec::new();
        for id in 0..20u64 {
            let registry = Arc::clone(&registry);
            handles.push(tokio::spawn(async move {
                registry.add(Subscriber::new(id)).await.unwrap();
                if id % 2 == 0 {
                    registry.remove(id).await.unwrap();
                }
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(registry.len().await, 10);
        let reloaded = registry_at(&path).await;
        assert_eq!(reloaded.len().await, 10);
        assert!(reloaded.all().await.iter().all(|s| s.id % 2 == 1));
    }
}
