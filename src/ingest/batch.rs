//! Batched, idempotent bulk insert of validated users.
//!
//! Validated records are split into contiguous, order-preserving batches and
//! each batch runs inside its own transaction. Within a batch every row is
//! attempted independently: a conflict on the email uniqueness constraint is
//! counted as skipped, any other row error is counted as failed with its
//! message, and neither outcome disturbs sibling rows. Batches and rows are
//! processed strictly sequentially so error ordering stays deterministic and
//! the upload holds exactly one store connection.

use std::path::PathBuf;

use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::IngestConfig;
use crate::error::AppError;
use crate::storage::database::open_connection;
use crate::storage::users::{insert_if_absent, NewUser};
use crate::storage::Database;
use crate::validation::CanonicalUser;

// ─────────────────────────────────────────────────────────────────────────────
// Public Types
// ─────────────────────────────────────────────────────────────────────────────

/// Per-row outcome statistics for one upload.
///
/// Counts only ever increase while the upload runs; `errors` holds one
/// `"<email>: <message>"` entry per failed row, in file order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchResult {
    pub success: u64,
    pub failed: u64,
    pub skipped: u64,
    pub errors: Vec<String>,
}

impl BatchResult {
    /// Folds another accumulator into this one, preserving error order.
    fn merge(&mut self, other: BatchResult) {
        self.success += other.success;
        self.failed += other.failed;
        self.skipped += other.skipped;
        self.errors.extend(other.errors);
    }
}

/// Executes batched insert-or-skip runs against the user store.
#[derive(Debug, Clone)]
pub struct BatchUpsertEngine {
    db_path: PathBuf,
    batch_size: usize,
}

impl BatchUpsertEngine {
    /// Creates an engine bound to the given store with explicit configuration.
    pub fn new(db: &Database, config: &IngestConfig) -> Self {
        Self {
            db_path: db.db_path().clone(),
            batch_size: config.batch_size.max(1),
        }
    }

    /// Persists every user, returning accumulated per-row statistics.
    ///
    /// The password hash is computed once by the caller and shared across
    /// all rows. One connection is acquired up front, owned exclusively for
    /// the upload, and released on every exit path; a connection failure
    /// before the first batch aborts the whole operation. A transaction
    /// begin/commit failure mid-stream also aborts, but batches already
    /// committed stay committed.
    pub async fn upsert_all(
        &self,
        users: Vec<CanonicalUser>,
        password_hash: String,
    ) -> Result<BatchResult, AppError> {
        let total_rows = users.len();

        // Contiguous batches, original order preserved.
        let mut pending = users.into_iter().peekable();
        let mut batches: Vec<Vec<CanonicalUser>> = Vec::new();
        while pending.peek().is_some() {
            batches.push(pending.by_ref().take(self.batch_size).collect());
        }
        let total_batches = batches.len();

        // Single connection for the whole upload.
        let db_path = self.db_path.clone();
        let mut conn = tokio::task::spawn_blocking(move || open_connection(&db_path))
            .await
            .map_err(|e| AppError::Internal(format!("Connection task failed: {e}")))??;

        info!(
            rows = total_rows,
            batches = total_batches,
            batch_size = self.batch_size,
            "Starting bulk upsert"
        );

        let mut result = BatchResult::default();

        for (index, batch) in batches.into_iter().enumerate() {
            let hash = password_hash.clone();

            // Each batch crosses a blocking boundary so concurrent uploads
            // are not starved; the connection travels with the task and
            // comes back for the next batch.
            let (returned, outcome) = tokio::task::spawn_blocking(move || {
                let outcome = run_batch(&mut conn, &batch, &hash);
                (conn, outcome)
            })
            .await
            .map_err(|e| AppError::Internal(format!("Batch task failed: {e}")))?;
            conn = returned;

            let batch_result = outcome?;
            debug!(
                batch = index + 1,
                total = total_batches,
                success = batch_result.success,
                skipped = batch_result.skipped,
                failed = batch_result.failed,
                "Batch committed"
            );
            result.merge(batch_result);
        }

        info!(
            success = result.success,
            skipped = result.skipped,
            failed = result.failed,
            "Bulk upsert finished"
        );

        Ok(result)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Batch Execution (Blocking)
// ─────────────────────────────────────────────────────────────────────────────

/// Runs one batch inside a transaction with per-row independent catch.
fn run_batch(
    conn: &mut Connection,
    batch: &[CanonicalUser],
    password_hash: &str,
) -> Result<BatchResult, AppError> {
    let tx = conn
        .transaction()
        .map_err(|e| AppError::Database(format!("Failed to start batch transaction: {e}")))?;

    let mut result = BatchResult::default();

    for user in batch {
        let row = NewUser::from_canonical(user, password_hash);
        match insert_if_absent(&tx, &row) {
            Ok(true) => result.success += 1,
            Ok(false) => result.skipped += 1,
            Err(e) => {
                result.failed += 1;
                result.errors.push(format!("{}: {}", user.email, e));
            }
        }
    }

    tx.commit()
        .map_err(|e| AppError::Database(format!("Failed to commit batch: {e}")))?;

    Ok(result)
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
