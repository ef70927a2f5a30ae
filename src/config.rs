//! Ingest configuration.
//!
//! Everything the pipeline needs from its environment is passed in
//! explicitly through this struct; the core never reads process-wide state.

/// Default number of records per batch transaction.
pub const DEFAULT_BATCH_SIZE: usize = 500;

/// Default bcrypt cost factor for the shared upload password hash.
pub const DEFAULT_HASH_COST: u32 = 10;

/// Configuration for one bulk upload run.
#[derive(Debug, Clone, Copy)]
pub struct IngestConfig {
    /// Maximum records per batch (each batch runs in its own transaction).
    pub batch_size: usize,
    /// bcrypt cost factor used for the once-per-upload password hash.
    pub hash_cost: u32,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            hash_cost: DEFAULT_HASH_COST,
        }
    }
}

impl IngestConfig {
    /// Sets the batch size. A batch size of zero is clamped to one record.
    pub fn batch_size(mut self, size: usize) -> Self {
        self.batch_size = size.max(1);
        self
    }

    /// Sets the bcrypt cost factor.
    pub fn hash_cost(mut self, cost: u32) -> Self {
        self.hash_cost = cost;
        self
    }
}
