//! Puppy record store
//!
//! Record types, the storage trait the handlers are written against,
//! and the error taxonomy store backends report.

mod memory;

pub use memory::MemoryPuppyStore;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// A persisted puppy record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Puppy {
    pub id: u64,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub breed: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Payload for creating a puppy, or fully replacing one.
///
/// The id is store-assigned and immutable: payloads carrying `id` (or
/// any other unknown field) fail deserialization.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NewPuppy {
    pub name: String,
    #[serde(default)]
    pub breed: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub age: Option<u32>,
}

impl NewPuppy {
    /// Check the constraints serde cannot express.
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("name must not be empty".to_string());
        }
        Ok(())
    }
}

/// Partial-update payload: only the supplied fields change.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PuppyPatch {
    pub name: Option<String>,
    pub breed: Option<String>,
    pub color: Option<String>,
    pub age: Option<u32>,
}

impl PuppyPatch {
    pub fn validate(&self) -> Result<(), String> {
        if let Some(name) = &self.name {
            if name.trim().is_empty() {
                return Err("name must not be empty".to_string());
            }
        }
        Ok(())
    }
}

/// Errors a store backend can report.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// No record with the requested id.
    #[error("no puppy with id {id}")]
    NotFound { id: u64 },
    /// The backing store could not serve the request.
    #[error("puppy store unavailable: {reason}")]
    Unavailable { reason: String },
}

/// The interface of a puppy storage backend.
#[async_trait::async_trait]
pub trait PuppyStore: Send + Sync {
    /// All records, ordered by id.
    async fn list(&self) -> Result<Vec<Puppy>, StoreError>;

    /// Persist a new record under a freshly assigned id.
    async fn create(&self, new: NewPuppy) -> Result<Puppy, StoreError>;

    /// Fetch one record by id.
    async fn get(&self, id: u64) -> Result<Puppy, StoreError>;

    /// Replace the descriptive fields of an existing record.
    ///
    /// `id` and `created_at` are preserved, `updated_at` is refreshed.
    async fn replace(&self, id: u64, new: NewPuppy) -> Result<Puppy, StoreError>;

    /// Merge the supplied fields into an existing record.
    async fn patch(&self, id: u64, patch: PuppyPatch) -> Result<Puppy, StoreError>;

    /// Permanently remove a record.
    async fn delete(&self, id: u64) -> Result<(), StoreError>;
}

/// Store handle injected into the request handlers.
pub type SharedStore = Arc<dyn PuppyStore>;
