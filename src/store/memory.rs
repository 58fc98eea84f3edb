//! In-memory puppy store
//!
//! Records live in a lock-guarded map; ids come from an atomic counter.
//! Contents are lost on restart unless reseeded from the seed file.

use chrono::Utc;
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::RwLock;

use super::{NewPuppy, Puppy, PuppyPatch, PuppyStore, StoreError};
use crate::logger;

/// Seed file layout: one `[[puppies]]` table per record.
#[derive(Debug, Deserialize)]
struct SeedFile {
    #[serde(default)]
    puppies: Vec<NewPuppy>,
}

/// Map-backed store. The map is the sole point of serialization.
#[derive(Debug)]
pub struct MemoryPuppyStore {
    records: RwLock<HashMap<u64, Puppy>>,
    next_id: AtomicU64,
}

impl MemoryPuppyStore {
    /// Create an empty store; the first assigned id is 1.
    pub fn new() -> Self {
        Self {
            records: RwLock::new(HashMap::new()),
            next_id: AtomicU64::new(0),
        }
    }

    /// Load initial records from a TOML seed file.
    ///
    /// Seed records are assigned sequential ids starting at 1; later
    /// creations continue past the last seeded id.
    pub fn from_seed_file(path: &str) -> Result<Self, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("failed to read seed file {path}: {e}"))?;
        let seed: SeedFile =
            toml::from_str(&content).map_err(|e| format!("failed to parse seed file {path}: {e}"))?;

        let mut records = HashMap::new();
        let mut next_id = 0u64;
        let now = Utc::now();
        for new in seed.puppies {
            new.validate()
                .map_err(|e| format!("invalid seed record in {path}: {e}"))?;
            next_id += 1;
            records.insert(
                next_id,
                Puppy {
                    id: next_id,
                    name: new.name,
                    breed: new.breed,
                    color: new.color,
                    age: new.age,
                    created_at: now,
                    updated_at: now,
                },
            );
        }

        logger::log_seeded(records.len(), path);

        Ok(Self {
            records: RwLock::new(records),
            next_id: AtomicU64::new(next_id),
        })
    }
}

impl Default for MemoryPuppyStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl PuppyStore for MemoryPuppyStore {
    async fn list(&self) -> Result<Vec<Puppy>, StoreError> {
        let records = self.records.read().await;
        let mut all: Vec<Puppy> = records.values().cloned().collect();
        all.sort_by_key(|p| p.id);
        Ok(all)
    }

    async fn create(&self, new: NewPuppy) -> Result<Puppy, StoreError> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        let now = Utc::now();
        let puppy = Puppy {
            id,
            name: new.name,
            breed: new.breed,
            color: new.color,
            age: new.age,
            created_at: now,
            updated_at: now,
        };
        self.records.write().await.insert(id, puppy.clone());
        Ok(puppy)
    }

    async fn get(&self, id: u64) -> Result<Puppy, StoreError> {
        self.records
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or(StoreError::NotFound { id })
    }

    async fn replace(&self, id: u64, new: NewPuppy) -> Result<Puppy, StoreError> {
        let mut records = self.records.write().await;
        let record = records.get_mut(&id).ok_or(StoreError::NotFound { id })?;
        record.name = new.name;
        record.breed = new.breed;
        record.color = new.color;
        record.age = new.age;
        record.updated_at = Utc::now();
        Ok(record.clone())
    }

    async fn patch(&self, id: u64, patch: PuppyPatch) -> Result<Puppy, StoreError> {
        let mut records = self.records.write().await;
        let record = records.get_mut(&id).ok_or(StoreError::NotFound { id })?;
        if let Some(name) = patch.name {
            record.name = name;
        }
        if let Some(breed) = patch.breed {
            record.breed = Some(breed);
        }
        if let Some(color) = patch.color {
            record.color = Some(color);
        }
        if let Some(age) = patch.age {
            record.age = Some(age);
        }
        record.updated_at = Utc::now();
        Ok(record.clone())
    }

    async fn delete(&self, id: u64) -> Result<(), StoreError> {
        self.records
            .write()
            .await
            .remove(&id)
            .map(|_| ())
            .ok_or(StoreError::NotFound { id })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn rex() -> NewPuppy {
        NewPuppy {
            name: "Rex".to_string(),
            breed: Some("Labrador".to_string()),
            color: Some("black".to_string()),
            age: Some(2),
        }
    }

    #[tokio::test]
    async fn test_create_assigns_sequential_ids() {
        let store = MemoryPuppyStore::new();
        let first = store.create(rex()).await.unwrap();
        let second = store.create(rex()).await.unwrap();
        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
    }

    #[tokio::test]
    async fn test_create_then_get_roundtrip() {
        let store = MemoryPuppyStore::new();
        let created = store.create(rex()).await.unwrap();
        let fetched = store.get(created.id).await.unwrap();
        assert_eq!(fetched, created);
        assert_eq!(fetched.name, "Rex");
        assert_eq!(fetched.breed.as_deref(), Some("Labrador"));
    }

    #[tokio::test]
    async fn test_list_returns_all_ordered_by_id() {
        let store = MemoryPuppyStore::new();
        for _ in 0..3 {
            store.create(rex()).await.unwrap();
        }
        let all = store.list().await.unwrap();
        assert_eq!(all.len(), 3);
        let ids: Vec<u64> = all.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_get_missing_is_not_found() {
        let store = MemoryPuppyStore::new();
        let err = store.get(42).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound { id: 42 }));
    }

    #[tokio::test]
    async fn test_replace_clears_absent_optionals() {
        let store = MemoryPuppyStore::new();
        let created = store.create(rex()).await.unwrap();
        let replaced = store
            .replace(
                created.id,
                NewPuppy {
                    name: "Fido".to_string(),
                    breed: None,
                    color: None,
                    age: None,
                },
            )
            .await
            .unwrap();
        assert_eq!(replaced.id, created.id);
        assert_eq!(replaced.name, "Fido");
        assert_eq!(replaced.breed, None);
        assert_eq!(replaced.created_at, created.created_at);
    }

    #[tokio::test]
    async fn test_replace_missing_is_not_found() {
        let store = MemoryPuppyStore::new();
        let err = store.replace(7, rex()).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound { id: 7 }));
    }

    #[tokio::test]
    async fn test_patch_merges_only_supplied_fields() {
        let store = MemoryPuppyStore::new();
        let created = store.create(rex()).await.unwrap();
        let patched = store
            .patch(
                created.id,
                PuppyPatch {
                    breed: Some("Poodle".to_string()),
                    ..PuppyPatch::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(patched.name, "Rex");
        assert_eq!(patched.breed.as_deref(), Some("Poodle"));
        assert_eq!(patched.color.as_deref(), Some("black"));
    }

    #[tokio::test]
    async fn test_delete_then_get_is_not_found() {
        let store = MemoryPuppyStore::new();
        let created = store.create(rex()).await.unwrap();
        store.delete(created.id).await.unwrap();
        let err = store.get(created.id).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_delete_missing_is_not_found() {
        let store = MemoryPuppyStore::new();
        let err = store.delete(9).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound { id: 9 }));
    }

    #[tokio::test]
    async fn test_seed_file_loads_and_continues_ids() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[[puppies]]\nname = \"Rex\"\nbreed = \"Labrador\"\n\n[[puppies]]\nname = \"Fido\"\nage = 4\n"
        )
        .unwrap();

        let store = MemoryPuppyStore::from_seed_file(file.path().to_str().unwrap()).unwrap();
        let all = store.list().await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].name, "Rex");
        assert_eq!(all[1].age, Some(4));

        // Creation continues past the seeded ids
        let next = store.create(rex()).await.unwrap();
        assert_eq!(next.id, 3);
    }

    #[tokio::test]
    async fn test_seed_file_rejects_empty_name() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[[puppies]]\nname = \"\"\n").unwrap();

        let err = MemoryPuppyStore::from_seed_file(file.path().to_str().unwrap()).unwrap_err();
        assert!(err.contains("name must not be empty"));
    }

    #[test]
    fn test_seed_file_missing_is_error() {
        let err = MemoryPuppyStore::from_seed_file("/nonexistent/puppies.toml").unwrap_err();
        assert!(err.contains("failed to read seed file"));
    }
}
