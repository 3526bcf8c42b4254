//! Client store
//!
//! The collaborator the HTTP layer forwards to. Handlers only see the
//! [`ClientStore`] trait; the concrete storage is chosen in `main` and passed
//! into [`crate::config::AppState`] explicitly.

mod memory;

use async_trait::async_trait;

use crate::model::Client;

pub use memory::InMemoryClientStore;

/// Storage operations backing the `/clients` endpoints
#[async_trait]
pub trait ClientStore: Send + Sync {
    /// Store a new record, assigning it the next identifier
    async fn create(&self, client: Client);

    /// All stored records, ordered by identifier
    async fn read_all(&self) -> Vec<Client>;

    /// A single record, if one exists under `id`
    async fn read(&self, id: i32) -> Option<Client>;
}
