use super::table::PartitionedTable;
use super::types::*;

use async_trait::async_trait;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use std::sync::Arc;

/// Process-wide store handle.
///
/// Opened once at startup and shared behind an `Arc`. Tables are created on
/// first lookup and every later lookup of the same name returns the same table.
pub struct MemoryDatabase {
    id: String,
    tables: DashMap<String, Arc<MemoryTable>>,
}

impl MemoryDatabase {
    pub fn new(id: &str) -> Arc<Self> {
        tracing::info!("Opened in-memory database {}", id);
        Arc::new(Self {
            id: id.to_string(),
            tables: DashMap::new(),
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn table(&self, name: &str) -> Arc<MemoryTable> {
        self.tables
            .entry(name.to_string())
            .or_insert_with(|| {
                tracing::debug!("Creating table {}/{}", self.id, name);
                Arc::new(MemoryTable::new(name))
            })
            .clone()
    }

    pub fn table_count(&self) -> usize {
        self.tables.len()
    }
}

/// In-memory `PartitionedTable`.
///
/// Structure: `Partition key -> Item id -> Document`. Patch and create hold
/// the item's shard lock for the whole step, which makes them atomic per item.
pub struct MemoryTable {
    name: String,
    partitions: DashMap<String, DashMap<String, Document>>,
}

impl MemoryTable {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            partitions: DashMap::new(),
        }
    }

    /// All items of one partition, in no particular order.
    pub fn dump_partition(&self, partition_key: &str) -> Vec<(String, Document)> {
        let mut entries = Vec::new();
        if let Some(partition) = self.partitions.get(partition_key) {
            for entry in partition.iter() {
                entries.push((entry.key().clone(), entry.value().clone()));
            }
        }
        entries
    }

    pub fn partition_count(&self) -> usize {
        self.partitions.len()
    }

    pub fn item_count(&self) -> usize {
        self.partitions
            .iter()
            .map(|entry| entry.value().len())
            .sum()
    }
}

#[async_trait]
impl PartitionedTable for MemoryTable {
    fn name(&self) -> &str {
        &self.name
    }

    async fn read(&self, id: &str, partition_key: &str) -> StoreResult<Document> {
        self.partitions
            .get(partition_key)
            .and_then(|partition| partition.get(id).map(|doc| doc.value().clone()))
            .ok_or_else(|| StoreError::NotFound {
                id: id.to_string(),
                partition_key: partition_key.to_string(),
            })
    }

    async fn create(&self, document: Document, partition_key: &str) -> StoreResult<()> {
        let id = document
            .get("id")
            .and_then(|id| id.as_str())
            .ok_or_else(|| StoreError::InvalidDocument("missing string field 'id'".to_string()))?
            .to_string();

        let partition = self
            .partitions
            .entry(partition_key.to_string())
            .or_default()
            .downgrade();

        match partition.entry(id) {
            Entry::Occupied(entry) => Err(StoreError::Conflict {
                id: entry.key().clone(),
                partition_key: partition_key.to_string(),
            }),
            Entry::Vacant(entry) => {
                entry.insert(document);
                Ok(())
            }
        }
    }

    async fn patch(
        &self,
        id: &str,
        partition_key: &str,
        operations: &[PatchOperation],
    ) -> StoreResult<()> {
        let not_found = || StoreError::NotFound {
            id: id.to_string(),
            partition_key: partition_key.to_string(),
        };

        let partition = self.partitions.get(partition_key).ok_or_else(not_found)?;
        let mut current = partition.get_mut(id).ok_or_else(not_found)?;

        // Apply to a copy so a failing operation leaves the item untouched.
        let mut patched = current.value().clone();
        for operation in operations {
            operation.apply(&mut patched)?;
        }
        *current.value_mut() = patched;

        Ok(())
    }

    async fn count(&self, partition_key: &str, filter: &Filter) -> StoreResult<u64> {
        let count = self
            .partitions
            .get(partition_key)
            .map(|partition| {
                partition
                    .iter()
                    .filter(|entry| filter.matches(entry.value()))
                    .count()
            })
            .unwrap_or(0);

        Ok(count as u64)
    }
}
