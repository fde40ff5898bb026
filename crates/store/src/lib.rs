//! Persistence contract for tutorial records.

pub mod memory;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub use memory::MemoryStore;

/// A tutorial record.
///
/// An `id` of zero means the record has not been persisted yet; the store
/// assigns an id on first save.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tutorial {
    #[serde(default)]
    pub id: i64,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub published: bool,
}

/// Storage contract for tutorial records.
///
/// Each query is an explicit method rather than a derived one; implementations
/// decide how the lookup is executed.
#[async_trait]
pub trait TutorialStore: Send + Sync {
    /// Look up a single tutorial by id.
    async fn find_by_id(&self, id: i64) -> anyhow::Result<Option<Tutorial>>;

    /// Return every stored tutorial, ordered by id.
    async fn find_all(&self) -> anyhow::Result<Vec<Tutorial>>;

    /// Return tutorials whose published flag matches `published`.
    async fn find_by_published(&self, published: bool) -> anyhow::Result<Vec<Tutorial>>;

    /// Return tutorials whose title contains `title` as a case-sensitive
    /// substring.
    async fn find_by_title_containing(&self, title: &str) -> anyhow::Result<Vec<Tutorial>>;

    /// Insert or fully replace a tutorial, returning the persisted record.
    ///
    /// A record with an unassigned id (zero) gets the next free id; a record
    /// with an assigned id replaces whatever is stored under that id.
    async fn save(&self, tutorial: Tutorial) -> anyhow::Result<Tutorial>;

    /// Delete the tutorial with `id`. Deleting an absent id is not an error.
    async fn delete_by_id(&self, id: i64) -> anyhow::Result<()>;

    /// Delete every stored tutorial.
    async fn delete_all(&self) -> anyhow::Result<()>;
}
