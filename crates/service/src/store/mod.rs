pub mod backend;
pub mod memory;
pub mod seaorm;

pub use backend::DocumentBackend;
pub use memory::MemoryBackend;
pub use seaorm::SeaOrmBackend;

use std::sync::{Arc, Mutex};

use tracing::{debug, warn};

use models::errors::ModelError;
use models::user::{validate, validate_name, StorageMeta, User};

use crate::errors::StoreError;

/// Outcome of a create. Creation is idempotent-by-name: when the name
/// is already taken the existing record comes back, distinguishably,
/// instead of an error or a duplicate.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CreateOutcome {
    Created { record: User, meta: StorageMeta },
    Existing { record: User, meta: StorageMeta },
}

impl CreateOutcome {
    pub fn record(&self) -> &User {
        match self {
            Self::Created { record, .. } | Self::Existing { record, .. } => record,
        }
    }

    pub fn meta(&self) -> &StorageMeta {
        match self {
            Self::Created { meta, .. } | Self::Existing { meta, .. } => meta,
        }
    }

    pub fn was_created(&self) -> bool {
        matches!(self, Self::Created { .. })
    }
}

/// Cross-request "last touched record" state, reworked from a hidden
/// side effect into an explicit observer the store is handed at
/// construction. Readers must tolerate seeing a meta recorded by a
/// different request.
#[derive(Default)]
pub struct LastTouched {
    inner: Mutex<Option<StorageMeta>>,
}

impl LastTouched {
    pub fn record(&self, meta: &StorageMeta) {
        let mut guard = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        *guard = Some(meta.clone());
    }

    pub fn get(&self) -> Option<StorageMeta> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

fn validated(r: Result<(), ModelError>) -> Result<(), StoreError> {
    r.map_err(|e| match e {
        ModelError::Validation(msg) => StoreError::Validation(msg),
        other => StoreError::Model(other),
    })
}

/// The existence-checked CRUD protocol over a document backend.
///
/// Every mutation resolves the storage key by a fresh name lookup, then
/// mutates by key. Update and delete are conditional on the revision
/// stamp that lookup returned; a stamp moved by a concurrent writer
/// surfaces as [`StoreError::Conflict`]. Create carries the inherent
/// check-then-act window: two racing creates of one name may both pass
/// the lookup and both insert.
pub struct UserStore {
    backend: Arc<dyn DocumentBackend>,
    last_touched: Arc<LastTouched>,
}

impl UserStore {
    pub fn new(backend: Arc<dyn DocumentBackend>, last_touched: Arc<LastTouched>) -> Self {
        Self { backend, last_touched }
    }

    /// Meta of the most recently touched record, if any operation has
    /// succeeded since startup.
    pub fn last_touched(&self) -> Option<StorageMeta> {
        self.last_touched.get()
    }

    /// Name lookup. Returns the first match with its storage handle.
    pub async fn exists(&self, name: &str) -> Result<Option<(User, StorageMeta)>, StoreError> {
        validated(validate_name(name))?;
        let mut matches = self.backend.find_by_name(name).await?;
        if matches.is_empty() {
            return Ok(None);
        }
        Ok(Some(matches.swap_remove(0)))
    }

    pub async fn create(&self, user: &User) -> Result<CreateOutcome, StoreError> {
        validated(validate(user))?;
        if let Some((record, meta)) = self.exists(&user.name).await? {
            debug!(name = %user.name, key = %meta.key, "create: name already present");
            return Ok(CreateOutcome::Existing { record, meta });
        }
        let meta = self.backend.insert(user).await?;
        self.last_touched.record(&meta);
        debug!(name = %user.name, key = %meta.key, "record created");
        Ok(CreateOutcome::Created { record: user.clone(), meta })
    }

    /// Every record, eagerly materialized. Each streamed record feeds
    /// the last-touched observer, mirroring the original read path;
    /// the final row wins.
    pub async fn read_all(&self) -> Result<Vec<User>, StoreError> {
        let rows = self.backend.list().await?;
        let mut users = Vec::with_capacity(rows.len());
        for (user, meta) in rows {
            self.last_touched.record(&meta);
            users.push(user);
        }
        debug!(count = users.len(), "read all records");
        Ok(users)
    }

    /// Existence check, then a second fetch by storage key: the lookup
    /// row may be a partial or stale projection, the keyed fetch is
    /// canonical.
    pub async fn read_one(&self, name: &str) -> Result<(User, StorageMeta), StoreError> {
        let (_, meta) = self
            .exists(name)
            .await?
            .ok_or_else(|| StoreError::not_found(name))?;
        let (user, meta) = self
            .backend
            .fetch(&meta.key)
            .await?
            .ok_or_else(|| StoreError::not_found(name))?;
        self.last_touched.record(&meta);
        Ok((user, meta))
    }

    /// Full-document replace at the key the name lookup resolved.
    /// Never creates.
    pub async fn update(&self, user: &User) -> Result<StorageMeta, StoreError> {
        validated(validate(user))?;
        let (_, meta) = self
            .exists(&user.name)
            .await?
            .ok_or_else(|| StoreError::not_found(&user.name))?;
        let new_meta = self
            .backend
            .replace(&meta.key, &meta.revision, user)
            .await?
            .ok_or_else(|| {
                warn!(name = %user.name, key = %meta.key, "update lost the revision race");
                StoreError::Conflict(meta.key.clone())
            })?;
        self.last_touched.record(&new_meta);
        debug!(name = %user.name, key = %new_meta.key, "record replaced");
        Ok(new_meta)
    }

    pub async fn delete(&self, name: &str) -> Result<StorageMeta, StoreError> {
        let (_, meta) = self
            .exists(name)
            .await?
            .ok_or_else(|| StoreError::not_found(name))?;
        let removed = self
            .backend
            .remove(&meta.key, &meta.revision)
            .await?
            .ok_or_else(|| {
                warn!(name = %name, key = %meta.key, "delete lost the revision race");
                StoreError::Conflict(meta.key.clone())
            })?;
        self.last_touched.record(&removed);
        debug!(name = %name, key = %removed.key, "record removed");
        Ok(removed)
    }

    /// Drop the entire collection. Intended for test teardown.
    pub async fn delete_collection(&self) -> Result<(), StoreError> {
        self.backend.drop_all().await?;
        Ok(())
    }
}
