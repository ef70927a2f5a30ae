//! Upload session orchestration.
//!
//! The controller is the consumer contract around the core pipeline: it
//! gates the request shape, runs resolver and validator, hashes the default
//! credential exactly once, hands the validated records to the batch engine,
//! and renders the final statistics. Validation failures are file-fatal and
//! happen before any store access; persistence failures are row-scoped and
//! folded into the statistics.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::IngestConfig;
use crate::credential;
use crate::error::AppError;
use crate::ingest::batch::{BatchResult, BatchUpsertEngine};
use crate::ingest::reader::read_rows;
use crate::storage::Database;
use crate::validation::{partition, RawRow};

// ─────────────────────────────────────────────────────────────────────────────
// Request/Response Types
// ─────────────────────────────────────────────────────────────────────────────

/// A bulk upload request: pre-parsed raw rows plus the default credential
/// assigned to every newly inserted user.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkUploadRequest {
    pub users: Vec<RawRow>,
    pub default_password: String,
}

/// The completed-upload response payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulkUploadResponse {
    pub message: String,
    pub stats: BatchResult,
}

// ─────────────────────────────────────────────────────────────────────────────
// Orchestration
// ─────────────────────────────────────────────────────────────────────────────

/// Runs a full upload: gate → resolve → validate → hash once → batch upsert.
///
/// # Errors
///
/// - `AppError::InvalidInput` when `users` or `default_password` is empty;
///   rejected before any resolution or store work.
/// - `AppError::InvalidRows` when any row is missing a mandatory field; the
///   whole file is rejected and nothing is persisted.
/// - `AppError::NoValidUsers` when validation leaves nothing to insert.
/// - `AppError::Database` for store-level failures; batches committed before
///   the failure stay committed.
pub async fn bulk_upload(
    db: &Database,
    config: IngestConfig,
    request: BulkUploadRequest,
) -> Result<BulkUploadResponse, AppError> {
    if request.users.is_empty() {
        return Err(AppError::InvalidInput("users must be non-empty".to_string()));
    }
    if request.default_password.trim().is_empty() {
        return Err(AppError::InvalidInput(
            "defaultPassword must be non-empty".to_string(),
        ));
    }

    let outcome = partition(&request.users);
    if !outcome.is_clean() {
        return Err(AppError::InvalidRows {
            lines: outcome.invalid_lines,
        });
    }
    if outcome.valid.is_empty() {
        return Err(AppError::NoValidUsers);
    }

    info!(rows = outcome.valid.len(), "Upload validated, starting persistence");

    // Hash once for the entire upload, never per row.
    let password_hash = credential::hash_password(&request.default_password, config.hash_cost)?;

    let engine = BatchUpsertEngine::new(db, &config);
    let stats = engine.upsert_all(outcome.valid, password_hash).await?;

    Ok(BulkUploadResponse {
        message: "Completed".to_string(),
        stats,
    })
}

/// Reads a registrant CSV from disk and runs a full upload with it.
///
/// A file that parses but yields zero data rows is rejected with
/// `AppError::NoValidUsers` before the request gate sees an empty list.
pub async fn bulk_upload_file(
    db: &Database,
    config: IngestConfig,
    csv_path: &Path,
    default_password: &str,
) -> Result<BulkUploadResponse, AppError> {
    let users = read_rows(csv_path).await?;
    if users.is_empty() {
        return Err(AppError::NoValidUsers);
    }

    bulk_upload(
        db,
        config,
        BulkUploadRequest {
            users,
            default_password: default_password.to_string(),
        },
    )
    .await
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
