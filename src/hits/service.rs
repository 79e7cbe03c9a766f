//! Hit Store Service
//!
//! Records unique-visitor hits and counts them per site on top of two
//! partitioned tables:
//! - **Sites**: existence registry, partition key = id = site id.
//! - **Hits**: partition key = site id, row key = fingerprint, value = `HitRecord`.
//!
//! ## Recording protocol
//! 1. Increment `hitCount` in place. Repeat visits finish here in one round trip.
//! 2. On a miss, check that the site exists, then create the record with `hitCount = 1`.
//! 3. If the create conflicts, a concurrent request already created the record. The
//!    record exists with a count of at least 1, so the call succeeds without a retry.
//!
//! The service holds no locks or in-memory state; every guarantee comes from the
//! store's per-item atomic increment and exclusive create.

use super::types::*;
use crate::storage::memory::MemoryDatabase;
use crate::storage::table::PartitionedTable;
use crate::storage::types::{Filter, PatchOperation, StoreError, StoreResult};

use std::future::Future;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

pub struct HitStore {
    hits: Arc<dyn PartitionedTable>,
    sites: Arc<dyn PartitionedTable>,
}

impl HitStore {
    pub fn new(hits: Arc<dyn PartitionedTable>, sites: Arc<dyn PartitionedTable>) -> Self {
        Self { hits, sites }
    }

    /// Builds the store over two tables of a shared database handle.
    pub fn from_database(database: &MemoryDatabase, hit_table: &str, site_table: &str) -> Self {
        Self::new(database.table(hit_table), database.table(site_table))
    }

    /// Records one hit from `fingerprint` on `site_id`.
    ///
    /// # Returns
    /// * `Ok(())` once the hit is counted, including when a concurrent first hit
    ///   from the same fingerprint won the race to create the record.
    /// * `HitError::InvalidArgument` for blank identifiers (no store access).
    /// * `HitError::SiteNotFound` when the site is not registered.
    pub async fn record_hit(
        &self,
        site_id: &str,
        fingerprint: &str,
        cancel: &CancellationToken,
    ) -> HitResult<()> {
        require("site id", site_id)?;
        require("fingerprint", fingerprint)?;

        let increment = [PatchOperation::increment(HIT_COUNT_PATH, 1)];
        match until_cancelled(cancel, self.hits.patch(fingerprint, site_id, &increment)).await? {
            Ok(()) => {
                tracing::debug!("Incremented hit count for {} on site {}", fingerprint, site_id);
                return Ok(());
            }
            Err(e) if e.is_not_found() => {}
            Err(e) => {
                tracing::error!("Failed to increment hit count on {}: {}", self.hits.name(), e);
                return Err(e.into());
            }
        }

        match until_cancelled(cancel, self.sites.read(site_id, site_id)).await? {
            Ok(_) => {}
            Err(e) if e.is_not_found() => {
                tracing::warn!("Rejected hit for unknown site {}", site_id);
                return Err(HitError::SiteNotFound(site_id.to_string()));
            }
            Err(e) => {
                tracing::error!("Failed to read site {}: {}", site_id, e);
                return Err(e.into());
            }
        }

        let record = serde_json::to_value(HitRecord::first_hit(site_id, fingerprint))
            .map_err(StoreError::from)?;

        match until_cancelled(cancel, self.hits.create(record, site_id)).await? {
            Ok(()) => {
                tracing::info!("Recorded first hit for site {}", site_id);
                Ok(())
            }
            Err(e) if e.is_conflict() => {
                tracing::error!("Can not create hit record, it already exists: {}", e);
                Ok(())
            }
            Err(e) => {
                tracing::error!("Failed to create hit record on {}: {}", self.hits.name(), e);
                Err(e.into())
            }
        }
    }

    /// Number of distinct fingerprints that have hit `site_id`.
    ///
    /// Repeat hits from one fingerprint do not change the result. Unknown sites
    /// count 0.
    pub async fn count_hits(&self, site_id: &str, cancel: &CancellationToken) -> HitResult<u64> {
        require("site id", site_id)?;

        let filter = Filter::field_equals(SITE_ID_FIELD, site_id);
        let count = until_cancelled(cancel, self.hits.count(site_id, &filter))
            .await?
            .inspect_err(|e| tracing::error!("Failed to count hits for {}: {}", site_id, e))?;

        tracing::debug!("Site {} has {} unique visitors", site_id, count);
        Ok(count)
    }

    /// Registers `site_id` so hits can be recorded for it. Registering an
    /// existing site is a no-op.
    pub async fn register_site(&self, site_id: &str, cancel: &CancellationToken) -> HitResult<()> {
        require("site id", site_id)?;

        let site = serde_json::to_value(Site {
            id: site_id.to_string(),
        })
        .map_err(StoreError::from)?;

        match until_cancelled(cancel, self.sites.create(site, site_id)).await? {
            Ok(()) => tracing::info!("Registered site {}", site_id),
            Err(e) if e.is_conflict() => tracing::debug!("Site {} already registered", site_id),
            Err(e) => return Err(e.into()),
        }

        Ok(())
    }
}

fn require(name: &'static str, value: &str) -> HitResult<()> {
    if value.trim().is_empty() {
        return Err(HitError::InvalidArgument(name));
    }
    Ok(())
}

/// Awaits a store call unless `cancel` fires first, in which case the call is
/// dropped. The inner result is left for the caller to branch on.
async fn until_cancelled<T>(
    cancel: &CancellationToken,
    call: impl Future<Output = StoreResult<T>>,
) -> HitResult<StoreResult<T>> {
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(HitError::Cancelled),
        result = call => Ok(result),
    }
}
