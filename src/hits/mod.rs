//! Hit Counter Module
//!
//! Counts unique visitors per site.
//!
//! ## Overview
//! A hit is keyed by a `(site, fingerprint)` pair. The first hit from a fingerprint
//! creates its record, later hits increment it in place, and concurrent first hits
//! collapse into a single record. The reported count is the number of distinct
//! fingerprints for the site.
//!
//! ## Submodules
//! - **`service`**: `HitStore`, the record/count protocol over the partitioned store.
//! - **`handlers`**: Axum handlers and router for `/sites/:site_id`.
//! - **`types`**: Persisted records, DTOs and the `HitError` taxonomy.

pub mod handlers;
pub mod service;
pub mod types;
