// In-memory client store

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicI32, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::ClientStore;
use crate::model::Client;

/// Process-local store, lost on restart
///
/// Identifiers come from a monotonic counter starting at 1, so records are
/// never overwritten.
pub struct InMemoryClientStore {
    clients: RwLock<BTreeMap<i32, Client>>,
    next_id: AtomicI32,
}

impl InMemoryClientStore {
    pub fn new() -> Self {
        Self {
            clients: RwLock::new(BTreeMap::new()),
            next_id: AtomicI32::new(1),
        }
    }
}

impl Default for InMemoryClientStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ClientStore for InMemoryClientStore {
    async fn create(&self, client: Client) {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        self.clients.write().await.insert(id, client.with_id(id));
    }

    async fn read_all(&self) -> Vec<Client> {
        self.clients.read().await.values().cloned().collect()
    }

    async fn read(&self, id: i32) -> Option<Client> {
        self.clients.read().await.get(&id).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_empty_store() {
        let store = InMemoryClientStore::new();
        assert!(store.read_all().await.is_empty());
        assert!(store.read(1).await.is_none());
    }

    #[tokio::test]
    async fn test_ids_assigned_sequentially() {
        let store = InMemoryClientStore::new();
        store.create(Client::named("A")).await;
        store.create(Client::named("B").with_id(42)).await;

        let all = store.read_all().await;
        assert_eq!(all.len(), 2);
        assert_eq!(all[0], Client::named("A").with_id(1));
        assert_eq!(all[1], Client::named("B").with_id(2));
        assert!(store.read(42).await.is_none());
    }

    #[tokio::test]
    async fn test_read_by_id() {
        let store = InMemoryClientStore::new();
        store.create(Client::named("A")).await;

        assert_eq!(store.read(1).await, Some(Client::named("A").with_id(1)));
        assert!(store.read(99).await.is_none());
    }

    #[tokio::test]
    async fn test_concurrent_creates_get_unique_ids() {
        let store = Arc::new(InMemoryClientStore::new());
        let mut tasks = Vec::new();
        for i in 0..32 {
            let store = Arc::clone(&store);
            tasks.push(tokio::spawn(async move {
                store.create(Client::named(format!("client-{i}"))).await;
            }));
        }
        for task in tasks {
            task.await.unwrap();
        }

        let ids: Vec<i32> = store.read_all().await.iter().map(|c| c.id).collect();
        assert_eq!(ids, (1..=32).collect::<Vec<_>>());
    }
}
