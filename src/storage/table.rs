use super::types::{Document, Filter, PatchOperation, StoreResult};

use async_trait::async_trait;

/// A logical collection of JSON documents grouped into partitions.
///
/// Items are addressed by `(partition_key, id)`. Every primitive is atomic
/// per item: a concurrent `patch` never loses an increment and, of several
/// concurrent `create` calls for the same item, exactly one succeeds while
/// the others fail with `StoreError::Conflict`.
#[async_trait]
pub trait PartitionedTable: Send + Sync {
    /// Name of the table, used in logs.
    fn name(&self) -> &str;

    /// Returns the item or `StoreError::NotFound`.
    async fn read(&self, id: &str, partition_key: &str) -> StoreResult<Document>;

    /// Inserts a new item; the document's `id` field is its row key.
    /// Fails with `StoreError::Conflict` when the item already exists.
    async fn create(&self, document: Document, partition_key: &str) -> StoreResult<()>;

    /// Applies all `operations` to an existing item, or none of them.
    /// Fails with `StoreError::NotFound` when the item does not exist.
    async fn patch(
        &self,
        id: &str,
        partition_key: &str,
        operations: &[PatchOperation],
    ) -> StoreResult<()>;

    /// Counts the items of one partition matching `filter`.
    async fn count(&self, partition_key: &str, filter: &Filter) -> StoreResult<u64>;
}
