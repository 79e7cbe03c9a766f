//! Hit Counter Data Types
//!
//! Persisted records and the request/response bodies of the HTTP API.
//! All of them serialize with lower camel case field names.

use crate::storage::types::StoreError;

use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// JSON pointer of the counter inside a `HitRecord` document.
pub const HIT_COUNT_PATH: &str = "/hitCount";
/// Field a `HitRecord` stores its site under.
pub const SITE_ID_FIELD: &str = "siteId";

/// A registered site. Its id is also its partition key.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Site {
    pub id: String,
}

/// One visitor's tally for one site.
///
/// Stored in the site's partition with the fingerprint as the row key, so at
/// most one record exists per `(site_id, fingerprint)`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HitRecord {
    /// The visitor fingerprint.
    pub id: String,
    pub site_id: String,
    pub hit_count: u64,
}

impl HitRecord {
    /// The record written on a fingerprint's first hit.
    pub fn first_hit(site_id: &str, fingerprint: &str) -> Self {
        Self {
            id: fingerprint.to_string(),
            site_id: site_id.to_string(),
            hit_count: 1,
        }
    }
}

/// Body of `POST /sites/:site_id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HitRequest {
    pub fingerprint: Option<String>,
}

/// Body returned by `GET /sites/:site_id`.
///
/// `hit_count` is the number of distinct fingerprints seen for the site.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HitCountResponse {
    pub hit_count: u64,
}

/// Result type for `HitStore` operations.
pub type HitResult<T> = Result<T, HitError>;

#[derive(Debug, Error)]
pub enum HitError {
    /// A required identifier is missing or blank.
    #[error("invalid argument: {0} must not be blank")]
    InvalidArgument(&'static str),

    #[error("site not found: {0}")]
    SiteNotFound(String),

    #[error("operation cancelled")]
    Cancelled,

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl HitError {
    /// Client errors are rejected with 400; store failures are opaque 500s.
    pub fn status_code(&self) -> StatusCode {
        match self {
            HitError::InvalidArgument(_) | HitError::SiteNotFound(_) => StatusCode::BAD_REQUEST,
            HitError::Cancelled => StatusCode::SERVICE_UNAVAILABLE,
            HitError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn is_client_error(&self) -> bool {
        self.status_code().is_client_error()
    }
}
