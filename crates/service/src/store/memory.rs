use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use uuid::Uuid;

use models::errors::ModelError;
use models::record::new_revision;
use models::user::{StorageMeta, User};

use super::backend::DocumentBackend;

struct StoredDoc {
    revision: String,
    body: User,
}

/// Mutex-guarded map backend for tests and local runs without a
/// database. Matches the conditional-mutation contract of the
/// production backend.
#[derive(Default)]
pub struct MemoryBackend {
    docs: Mutex<HashMap<Uuid, StoredDoc>>,
}

fn parse_key(key: &str) -> Result<Uuid, ModelError> {
    key.parse()
        .map_err(|e| ModelError::Query(format!("malformed storage key {}: {}", key, e)))
}

#[async_trait]
impl DocumentBackend for MemoryBackend {
    async fn insert(&self, doc: &User) -> Result<StorageMeta, ModelError> {
        let key = Uuid::new_v4();
        let revision = new_revision();
        let mut docs = self.docs.lock().unwrap_or_else(|e| e.into_inner());
        docs.insert(key, StoredDoc { revision: revision.clone(), body: doc.clone() });
        Ok(StorageMeta { key: key.to_string(), revision })
    }

    async fn fetch(&self, key: &str) -> Result<Option<(User, StorageMeta)>, ModelError> {
        let parsed = parse_key(key)?;
        let docs = self.docs.lock().unwrap_or_else(|e| e.into_inner());
        Ok(docs.get(&parsed).map(|d| {
            (
                d.body.clone(),
                StorageMeta { key: key.to_string(), revision: d.revision.clone() },
            )
        }))
    }

    async fn find_by_name(&self, name: &str) -> Result<Vec<(User, StorageMeta)>, ModelError> {
        let docs = self.docs.lock().unwrap_or_else(|e| e.into_inner());
        Ok(docs
            .iter()
            .filter(|(_, d)| d.body.name == name)
            .map(|(k, d)| {
                (
                    d.body.clone(),
                    StorageMeta { key: k.to_string(), revision: d.revision.clone() },
                )
            })
            .collect())
    }

    async fn list(&self) -> Result<Vec<(User, StorageMeta)>, ModelError> {
        let docs = self.docs.lock().unwrap_or_else(|e| e.into_inner());
        Ok(docs
            .iter()
            .map(|(k, d)| {
                (
                    d.body.clone(),
                    StorageMeta { key: k.to_string(), revision: d.revision.clone() },
                )
            })
            .collect())
    }

    async fn replace(
        &self,
        key: &str,
        expected_revision: &str,
        doc: &User,
    ) -> Result<Option<StorageMeta>, ModelError> {
        let parsed = parse_key(key)?;
        let mut docs = self.docs.lock().unwrap_or_else(|e| e.into_inner());
        match docs.get_mut(&parsed) {
            Some(d) if d.revision == expected_revision => {
                d.revision = new_revision();
                d.body = doc.clone();
                Ok(Some(StorageMeta { key: key.to_string(), revision: d.revision.clone() }))
            }
            _ => Ok(None),
        }
    }

    async fn remove(
        &self,
        key: &str,
        expected_revision: &str,
    ) -> Result<Option<StorageMeta>, ModelError> {
        let parsed = parse_key(key)?;
        let mut docs = self.docs.lock().unwrap_or_else(|e| e.into_inner());
        let stamp_matches = docs
            .get(&parsed)
            .map(|d| d.revision == expected_revision)
            .unwrap_or(false);
        if !stamp_matches {
            return Ok(None);
        }
        Ok(docs.remove(&parsed).map(|d| StorageMeta {
            key: key.to_string(),
            revision: d.revision,
        }))
    }

    async fn drop_all(&self) -> Result<(), ModelError> {
        let mut docs = self.docs.lock().unwrap_or_else(|e| e.into_inner());
        docs.clear();
        Ok(())
    }
}
