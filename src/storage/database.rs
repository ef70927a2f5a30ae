//! SQLite user store with schema migrations.

use std::path::PathBuf;
use std::time::Duration;

use rusqlite::{Connection, OptionalExtension};

use crate::error::AppError;

/// Current schema version. Increment when adding new migrations.
const SCHEMA_VERSION: i32 = 1;

/// V1 schema: the users table, uniquely keyed by email.
///
/// The UNIQUE constraint on `email` is the idempotency contract for bulk
/// imports: re-inserting an existing email is a conflict-skip, not an error.
const V1_SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    id TEXT PRIMARY KEY NOT NULL,
    email TEXT NOT NULL UNIQUE,
    password_hash TEXT NOT NULL,
    first_name TEXT NOT NULL,
    last_name TEXT NOT NULL,
    display_name TEXT NOT NULL,
    phone_number TEXT NOT NULL,
    college_name TEXT,
    college_mail_id TEXT,
    branch TEXT,
    roll_no TEXT,
    is_registered INTEGER NOT NULL DEFAULT 0,
    created_at INTEGER NOT NULL,
    updated_at INTEGER NOT NULL
);
"#;

/// A user row as stored.
#[derive(Debug, Clone)]
pub struct PersistedUser {
    pub id: String,
    pub email: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub display_name: String,
    pub phone_number: String,
    pub college_name: Option<String>,
    pub college_mail_id: Option<String>,
    pub branch: Option<String>,
    pub roll_no: Option<String>,
    pub is_registered: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

/// SQLite database handle.
#[derive(Debug, Clone)]
pub struct Database {
    db_path: PathBuf,
}

impl Database {
    /// Initializes the database at the given path.
    /// Creates parent directories if needed, opens the SQLite file, and runs migrations.
    pub async fn init(db_path: PathBuf) -> Result<Self, AppError> {
        let path = db_path.clone();

        tokio::task::spawn_blocking(move || {
            // Create parent directory if needed
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    AppError::Database(format!("Failed to create database directory: {e}"))
                })?;
            }

            let mut conn = open_connection(&path)?;
            run_migrations(&mut conn)?;

            Ok::<_, AppError>(())
        })
        .await
        .map_err(|e| AppError::Internal(format!("Database init task failed: {e}")))??;

        Ok(Self { db_path })
    }

    /// Returns the database path for use by other storage consumers.
    pub fn db_path(&self) -> &PathBuf {
        &self.db_path
    }

    /// Simple health check: executes SELECT 1.
    pub async fn health_check(&self) -> Result<(), AppError> {
        let db_path = self.db_path.clone();

        tokio::task::spawn_blocking(move || {
            let conn = open_connection(&db_path)?;

            conn.query_row("SELECT 1", [], |_| Ok(()))
                .map_err(|e| AppError::Database(format!("Health check failed: {e}")))?;

            Ok::<_, AppError>(())
        })
        .await
        .map_err(|e| AppError::Internal(format!("Health check task failed: {e}")))??;

        Ok(())
    }

    /// Looks up a user by its canonical (lower-cased, trimmed) email.
    pub async fn find_by_email(&self, email: &str) -> Result<Option<PersistedUser>, AppError> {
        let db_path = self.db_path.clone();
        let email = email.to_string();

        tokio::task::spawn_blocking(move || {
            let conn = open_connection(&db_path)?;

            let user = conn
                .query_row(
                    r#"
                    SELECT id, email, password_hash, first_name, last_name, display_name,
                           phone_number, college_name, college_mail_id, branch, roll_no,
                           is_registered, created_at, updated_at
                    FROM users
                    WHERE email = ?1
                    "#,
                    [&email],
                    |row| {
                        Ok(PersistedUser {
                            id: row.get(0)?,
                            email: row.get(1)?,
                            password_hash: row.get(2)?,
                            first_name: row.get(3)?,
                            last_name: row.get(4)?,
                            display_name: row.get(5)?,
                            phone_number: row.get(6)?,
                            college_name: row.get(7)?,
                            college_mail_id: row.get(8)?,
                            branch: row.get(9)?,
                            roll_no: row.get(10)?,
                            is_registered: row.get::<_, i32>(11)? != 0,
                            created_at: row.get(12)?,
                            updated_at: row.get(13)?,
                        })
                    },
                )
                .optional()
                .map_err(|e| AppError::Database(format!("Failed to query user: {e}")))?;

            Ok::<_, AppError>(user)
        })
        .await
        .map_err(|e| AppError::Internal(format!("Find user task failed: {e}")))?
    }

    /// Returns the total number of stored users.
    pub async fn count_users(&self) -> Result<u64, AppError> {
        let db_path = self.db_path.clone();

        tokio::task::spawn_blocking(move || {
            let conn = open_connection(&db_path)?;

            let count: i64 = conn
                .query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))
                .map_err(|e| AppError::Database(format!("Failed to count users: {e}")))?;

            Ok::<_, AppError>(count as u64)
        })
        .await
        .map_err(|e| AppError::Internal(format!("Count users task failed: {e}")))?
    }
}

/// Opens and configures a connection against the store.
pub(crate) fn open_connection(db_path: &std::path::Path) -> Result<Connection, AppError> {
    let conn = Connection::open(db_path)
        .map_err(|e| AppError::Database(format!("Failed to open database: {e}")))?;

    configure_connection(&conn)?;
    Ok(conn)
}

/// Configures connection with busy timeout and WAL mode.
fn configure_connection(conn: &Connection) -> Result<(), AppError> {
    conn.busy_timeout(Duration::from_secs(10))
        .map_err(|e| AppError::Database(format!("Failed to set busy timeout: {e}")))?;

    conn.pragma_update(None, "journal_mode", "WAL")
        .map_err(|e| AppError::Database(format!("Failed to set WAL mode: {e}")))?;

    Ok(())
}

/// Runs database migrations using PRAGMA user_version.
fn run_migrations(conn: &mut Connection) -> Result<(), AppError> {
    let current_version: i32 = conn
        .pragma_query_value(None, "user_version", |row| row.get(0))
        .map_err(|e| AppError::Database(format!("Failed to get schema version: {e}")))?;

    if current_version >= SCHEMA_VERSION {
        return Ok(());
    }

    // Run migrations in a transaction
    let tx = conn
        .transaction()
        .map_err(|e| AppError::Database(format!("Failed to start migration transaction: {e}")))?;

    if current_version < 1 {
        tx.execute_batch(V1_SCHEMA)
            .map_err(|e| AppError::Database(format!("V1 migration failed: {e}")))?;
    }

    tx.pragma_update(None, "user_version", SCHEMA_VERSION)
        .map_err(|e| AppError::Database(format!("Failed to update schema version: {e}")))?;

    tx.commit()
        .map_err(|e| AppError::Database(format!("Failed to commit migration: {e}")))?;

    Ok(())
}
