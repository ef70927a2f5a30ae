//! Bulk registrant CSV import.
//!
//! Takes a registrant CSV in any of three header dialects, validates it
//! file-fatally, and performs a batched, idempotent insert into a SQLite
//! user store, returning per-row outcome statistics.

pub mod config;
pub mod credential;
pub mod error;
pub mod ingest;
pub mod storage;
pub mod validation;

pub use config::IngestConfig;
pub use error::AppError;
pub use ingest::{
    bulk_upload, bulk_upload_file, BatchResult, BatchUpsertEngine, BulkUploadRequest,
    BulkUploadResponse,
};
pub use storage::Database;
pub use validation::{CanonicalUser, RawRow};
