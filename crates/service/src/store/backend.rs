use async_trait::async_trait;

use models::errors::ModelError;
use models::user::{StorageMeta, User};

/// Document-store primitives the CRUD protocol is built on. Any store
/// that can insert a document (minting a key and revision stamp), fetch
/// and mutate by key, and equality-match one field qualifies.
#[async_trait]
pub trait DocumentBackend: Send + Sync {
    /// Insert a new document, minting a storage key and revision.
    async fn insert(&self, doc: &User) -> Result<StorageMeta, ModelError>;

    /// Fetch the canonical document body by storage key.
    async fn fetch(&self, key: &str) -> Result<Option<(User, StorageMeta)>, ModelError>;

    /// Equality lookup on the identifying name. Implementations must
    /// bind `name` as a query parameter, never splice it into the
    /// statement text.
    async fn find_by_name(&self, name: &str) -> Result<Vec<(User, StorageMeta)>, ModelError>;

    /// Every document, in storage order (no ordering guarantee).
    async fn list(&self) -> Result<Vec<(User, StorageMeta)>, ModelError>;

    /// Replace the full document at `key` iff its revision still equals
    /// `expected_revision`. `Ok(None)` signals a stamp mismatch.
    async fn replace(
        &self,
        key: &str,
        expected_revision: &str,
        doc: &User,
    ) -> Result<Option<StorageMeta>, ModelError>;

    /// Remove the document at `key` iff its revision still equals
    /// `expected_revision`. `Ok(None)` signals a stamp mismatch.
    async fn remove(
        &self,
        key: &str,
        expected_revision: &str,
    ) -> Result<Option<StorageMeta>, ModelError>;

    /// Drop the whole collection. Test teardown, not a request path.
    async fn drop_all(&self) -> Result<(), ModelError>;
}
