//! Row-level user persistence.
//!
//! The bulk importer inserts each record with `ON CONFLICT(email) DO
//! NOTHING`: the rows-affected count distinguishes a real insert from a
//! conflict-skip, so duplicate emails are silently absorbed rather than
//! raised as constraint errors.

use rusqlite::Connection;
use uuid::Uuid;

use crate::validation::CanonicalUser;

/// A user row ready for insertion: canonical fields plus the generated id,
/// the shared upload password hash, and creation timestamps.
#[derive(Debug, Clone)]
pub struct NewUser {
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
    pub created_at: i64,
    pub updated_at: i64,
}

impl NewUser {
    /// Builds an insertable row from a canonical user and the shared hash.
    /// A fresh UUID id is generated per attempt; field values are taken as
    /// resolved and never re-derived here.
    pub fn from_canonical(user: &CanonicalUser, password_hash: &str) -> Self {
        let now = current_timestamp();
        Self {
            id: Uuid::new_v4().to_string(),
            email: user.email.clone(),
            password_hash: password_hash.to_string(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            display_name: user.display_name.clone(),
            phone_number: user.phone_number.clone(),
            college_name: user.college_name.clone(),
            college_mail_id: user.college_mail_id.clone(),
            branch: user.branch.clone(),
            roll_no: user.roll_no.clone(),
            created_at: now,
            updated_at: now,
        }
    }
}

/// Inserts the user unless its email already exists.
///
/// Returns `Ok(true)` when a row was inserted and `Ok(false)` when the
/// uniqueness constraint absorbed the insert (conflict-skip). Any other
/// store error is returned to the caller untouched.
pub fn insert_if_absent(conn: &Connection, user: &NewUser) -> rusqlite::Result<bool> {
    let affected = conn.execute(
        r#"
        INSERT INTO users (id, email, password_hash, first_name, last_name, display_name,
                           phone_number, college_name, college_mail_id, branch, roll_no,
                           is_registered, created_at, updated_at)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, 0, ?12, ?13)
        ON CONFLICT(email) DO NOTHING
        "#,
        rusqlite::params![
            user.id,
            user.email,
            user.password_hash,
            user.first_name,
            user.last_name,
            user.display_name,
            user.phone_number,
            user.college_name,
            user.college_mail_id,
            user.branch,
            user.roll_no,
            user.created_at,
            user.updated_at,
        ],
    )?;

    Ok(affected == 1)
}

/// Returns current unix timestamp in seconds.
fn current_timestamp() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .expect("Time went backwards")
        .as_secs() as i64
}
