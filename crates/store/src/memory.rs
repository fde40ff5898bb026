//! In-memory tutorial store used by the default deployment and by tests.

use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::{Tutorial, TutorialStore};

/// Tutorial store backed by an in-process ordered map.
///
/// Ids are assigned from a monotonic counter that never drops below any id
/// already seen, so an id is never reissued after a delete.
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

struct Inner {
    rows: BTreeMap<i64, Tutorial>,
    next_id: i64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner {
                rows: BTreeMap::new(),
                next_id: 1,
            }),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TutorialStore for MemoryStore {
    async fn find_by_id(&self, id: i64) -> anyhow::Result<Option<Tutorial>> {
        let inner = self.inner.read().await;
        Ok(inner.rows.get(&id).cloned())
    }

    async fn find_all(&self) -> anyhow::Result<Vec<Tutorial>> {
        let inner = self.inner.read().await;
        Ok(inner.rows.values().cloned().collect())
    }

    async fn find_by_published(&self, published: bool) -> anyhow::Result<Vec<Tutorial>> {
        let inner = self.inner.read().await;
        Ok(inner
            .rows
            .values()
            .filter(|tutorial| tutorial.published == published)
            .cloned()
            .collect())
    }

    async fn find_by_title_containing(&self, title: &str) -> anyhow::Result<Vec<Tutorial>> {
        let inner = self.inner.read().await;
        Ok(inner
            .rows
            .values()
            .filter(|tutorial| tutorial.title.contains(title))
            .cloned()
            .collect())
    }

    async fn save(&self, mut tutorial: Tutorial) -> anyhow::Result<Tutorial> {
        let mut inner = self.inner.write().await;

        if tutorial.id == 0 {
            tutorial.id = inner.next_id;
        }
        inner.next_id = inner.next_id.max(tutorial.id + 1);
        inner.rows.insert(tutorial.id, tutorial.clone());

        tracing::debug!(id = tutorial.id, "tutorial saved");
        Ok(tutorial)
    }

    async fn delete_by_id(&self, id: i64) -> anyhow::Result<()> {
        let mut inner = self.inner.write().await;
        inner.rows.remove(&id);

        tracing::debug!(id, "tutorial deleted");
        Ok(())
    }

    async fn delete_all(&self) -> anyhow::Result<()> {
        let mut inner = self.inner.write().await;
        let count = inner.rows.len();
        inner.rows.clear();

        tracing::debug!(count, "all tutorials deleted");
        Ok(())
    }
}
