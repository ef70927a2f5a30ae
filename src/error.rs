use serde::Serialize;
use thiserror::Error;

/// Mandatory canonical fields; listed in validation errors so the caller
/// knows what the file must provide.
pub const REQUIRED_FIELDS: &[&str] = &["email", "firstName", "lastName", "phoneNumber"];

/// Application-wide error type.
#[derive(Debug, Error)]
pub enum AppError {
    // ── Input shape ───────────────────────────────────────────────────────────
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    // ── Row validation ────────────────────────────────────────────────────────
    #[error("Rows missing required fields at lines {lines:?} (required: {required})", required = REQUIRED_FIELDS.join(", "))]
    InvalidRows { lines: Vec<u64> },

    #[error("No valid users found in the file")]
    NoValidUsers,

    // ── File / CSV ────────────────────────────────────────────────────────────
    #[error("Invalid CSV: {0}")]
    CsvInvalid(String),

    // ── Store ─────────────────────────────────────────────────────────────────
    #[error("Database error: {0}")]
    Database(String),

    // ── Generic fallback ──────────────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// HTTP-equivalent status classification for callers that map errors to
    /// a transport. Input-shape and validation failures are client errors;
    /// everything else is a server error.
    pub fn status_code(&self) -> u16 {
        match self {
            AppError::InvalidInput(_)
            | AppError::InvalidRows { .. }
            | AppError::NoValidUsers
            | AppError::CsvInvalid(_) => 400,
            AppError::Database(_) | AppError::Internal(_) => 500,
        }
    }
}

/// Wire shape for failed uploads: a single explanatory string.
#[derive(Debug, Clone, Serialize)]
struct ErrorBody {
    error: String,
}

// Callers always receive either a complete statistics object or this single
// `{ "error": ... }` payload, never a partial response.
impl Serialize for AppError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        ErrorBody {
            error: self.to_string(),
        }
        .serialize(serializer)
    }
}
