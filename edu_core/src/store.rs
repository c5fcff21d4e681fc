//! In-memory repository adapter shared by every resource type

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use uuid::Uuid;

use crate::database::repository::Repository;
use crate::error::{AppError, Result};

/// How an entity is built from and mutated by its input shapes.
///
/// The memory adapter owns id and timestamp generation, so implementations
/// only copy the caller-supplied fields.
pub trait Record: Clone + Send + Sync + 'static {
    type CreateInput: Send + 'static;
    type UpdateInput: Send + 'static;

    /// Resource name used in error messages, e.g. `"User"`.
    const KIND: &'static str;

    fn id(&self) -> &str;

    fn created_at(&self) -> DateTime<Utc>;

    fn materialize(id: String, input: Self::CreateInput, now: DateTime<Utc>) -> Self;

    fn apply(&mut self, input: Self::UpdateInput, now: DateTime<Utc>);

    /// Value that must be unique across the collection, if any.
    fn unique_key(&self) -> Option<String> {
        None
    }

    /// Id of the owning record in the repository linked with
    /// [`MemoryRepository::references`], if any.
    fn parent_id(&self) -> Option<&str> {
        None
    }
}

type ParentCheck = Arc<dyn Fn(&str) -> bool + Send + Sync>;
type CascadeHook = Arc<dyn Fn(&str) + Send + Sync>;

#[derive(Clone)]
struct ParentLink {
    kind: &'static str,
    exists: ParentCheck,
}

#[derive(Clone)]
pub struct MemoryRepository<T: Record> {
    records: Arc<RwLock<HashMap<String, T>>>,
    parent: Option<ParentLink>,
    cascades: Arc<RwLock<Vec<CascadeHook>>>,
}

impl<T: Record> MemoryRepository<T> {
    pub fn new() -> Self {
        Self {
            records: Arc::new(RwLock::new(HashMap::new())),
            parent: None,
            cascades: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Makes every record's [`Record::parent_id`] point into `parent`: creates
    /// with an unknown parent fail with a storage error, and deleting a parent
    /// removes its children.
    pub fn references<P: Record>(mut self, parent: &MemoryRepository<P>) -> Self {
        let parent_records = Arc::clone(&parent.records);
        self.parent = Some(ParentLink {
            kind: P::KIND,
            exists: Arc::new(move |id: &str| parent_records.read().contains_key(id)),
        });

        let child_records = Arc::clone(&self.records);
        parent.cascades.write().push(Arc::new(move |parent_id: &str| {
            child_records
                .write()
                .retain(|_, record| record.parent_id() != Some(parent_id));
        }));

        self
    }

    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }
}

impl<T: Record> Default for MemoryRepository<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<T: Record> Repository<T> for MemoryRepository<T> {
    type CreateInput = T::CreateInput;
    type UpdateInput = T::UpdateInput;

    async fn find_all(&self) -> Result<Vec<T>> {
        let records = self.records.read();

        let mut all: Vec<T> = records.values().cloned().collect();
        all.sort_by(|a, b| {
            a.created_at()
                .cmp(&b.created_at())
                .then_with(|| a.id().cmp(b.id()))
        });

        Ok(all)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<T>> {
        Ok(self.records.read().get(id).cloned())
    }

    async fn create(&self, input: Self::CreateInput) -> Result<T> {
        let record = T::materialize(Uuid::new_v4().to_string(), input, Utc::now());

        if let (Some(link), Some(parent_id)) = (&self.parent, record.parent_id()) {
            if !(link.exists)(parent_id) {
                return Err(AppError::Storage(format!(
                    "Referenced resource does not exist: {} {}",
                    link.kind, parent_id
                )));
            }
        }

        let mut records = self.records.write();

        if let Some(key) = record.unique_key() {
            let taken = records
                .values()
                .any(|existing| existing.unique_key().as_deref() == Some(key.as_str()));
            if taken {
                return Err(AppError::Conflict(format!("{} already exists", T::KIND)));
            }
        }

        records.insert(record.id().to_string(), record.clone());
        Ok(record)
    }

    async fn update(&self, id: &str, input: Self::UpdateInput) -> Result<T> {
        let mut records = self.records.write();

        let record = records
            .get_mut(id)
            .ok_or_else(|| AppError::NotFound(format!("{} with id {} not found", T::KIND, id)))?;

        record.apply(input, Utc::now());
        Ok(record.clone())
    }

    async fn delete(&self, id: &str) -> Result<()> {
        self.records
            .write()
            .remove(id)
            .ok_or_else(|| AppError::NotFound(format!("{} with id {} not found", T::KIND, id)))?;

        let cascades = self.cascades.read().clone();
        for cascade in cascades {
            cascade(id);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Note {
        id: String,
        text: String,
        slug: String,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    }

    impl Record for Note {
        type CreateInput = (String, String);
        type UpdateInput = String;

        const KIND: &'static str = "Note";

        fn id(&self) -> &str {
            &self.id
        }

        fn created_at(&self) -> DateTime<Utc> {
            self.created_at
        }

        fn materialize(id: String, (text, slug): Self::CreateInput, now: DateTime<Utc>) -> Self {
            Self { id, text, slug, created_at: now, updated_at: now }
        }

        fn apply(&mut self, text: Self::UpdateInput, now: DateTime<Utc>) {
            self.text = text;
            self.updated_at = now;
        }

        fn unique_key(&self) -> Option<String> {
            Some(self.slug.clone())
        }
    }

    fn note(text: &str, slug: &str) -> (String, String) {
        (text.to_string(), slug.to_string())
    }

    #[tokio::test]
    async fn test_create_generates_ids() {
        let repo = MemoryRepository::<Note>::new();

        let first = repo.create(note("a", "a")).await.unwrap();
        let second = repo.create(note("b", "b")).await.unwrap();

        assert_ne!(first.id, second.id);
        assert!(Uuid::parse_str(&first.id).is_ok());
        assert_eq!(repo.len(), 2);
    }

    #[tokio::test]
    async fn test_unique_key_conflict_leaves_store_untouched() {
        let repo = MemoryRepository::<Note>::new();
        repo.create(note("a", "same")).await.unwrap();

        let err = repo.create(note("b", "same")).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
        assert_eq!(repo.len(), 1);
    }

    #[tokio::test]
    async fn test_find_all_orders_by_creation() {
        let repo = MemoryRepository::<Note>::new();
        let first = repo.create(note("first", "one")).await.unwrap();
        tokio::time::sleep(tokio::time::Duration::from_millis(2)).await;
        let second = repo.create(note("second", "two")).await.unwrap();

        let all = repo.find_all().await.unwrap();
        assert_eq!(all, vec![first, second]);
    }

    #[tokio::test]
    async fn test_update_missing_id_is_not_found() {
        let repo = MemoryRepository::<Note>::new();
        let existing = repo.create(note("keep", "keep")).await.unwrap();

        let err = repo.update("missing", "changed".to_string()).await.unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(repo.find_by_id(&existing.id).await.unwrap(), Some(existing));
    }
}
