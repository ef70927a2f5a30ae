//! Bulk ingest pipeline: file intake, batched upsert, and upload
//! orchestration.

pub mod batch;
pub mod reader;
pub mod upload;

pub use batch::{BatchResult, BatchUpsertEngine};
pub use reader::read_rows;
pub use upload::{bulk_upload, bulk_upload_file, BulkUploadRequest, BulkUploadResponse};
