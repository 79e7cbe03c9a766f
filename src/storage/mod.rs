//! Partitioned Storage Module
//!
//! The document store the hit counter is built on.
//!
//! ## Core Concepts
//! - **Partitioning**: Items are grouped by a partition key and addressed by `(partition key, id)`.
//! - **Atomic primitives**: `patch` (server-side increment), `create` (fails on conflict),
//!   `read` and a per-partition `count`. Each is atomic per item.
//! - **Backends**: `PartitionedTable` is the seam; `MemoryDatabase` hands out in-process
//!   `MemoryTable`s backed by `DashMap`.

pub mod memory;
pub mod table;
pub mod types;
