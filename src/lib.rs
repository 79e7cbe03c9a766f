//! Hit Counter Library
//!
//! Core modules of the unique-visitor hit counter. The binary (`main.rs`) wires
//! them into an HTTP service.
//!
//! ## Architecture Modules
//! - **`hits`**: The record/count protocol (`HitStore`) and its HTTP handlers.
//!   Hits are counted once per hit and recorded once per unique fingerprint, even
//!   when first hits from the same fingerprint race each other.
//! - **`storage`**: The partitioned document store (`PartitionedTable`) with atomic
//!   increment, create-if-absent, read and per-partition count.
//! - **`config`**: Command-line and environment configuration.

pub mod config;
pub mod hits;
pub mod storage;
