//! Field resolution from raw CSV rows to canonical user records.
//!
//! Uploaded files arrive with three header conventions: camelCase exports,
//! snake_case exports, and title-case form exports. Each canonical field
//! carries a fixed, ordered list of accepted header spellings; the first
//! alias with a non-empty trimmed value wins. Adding a dialect is a table
//! edit, not new branching logic.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

// ─────────────────────────────────────────────────────────────────────────────
// Alias Tables
// ─────────────────────────────────────────────────────────────────────────────

const EMAIL_ALIASES: &[&str] = &["email", "Email Address"];
const FIRST_NAME_ALIASES: &[&str] = &["firstName", "first_name", "First Name"];
const LAST_NAME_ALIASES: &[&str] = &["lastName", "last_name", "Last Name"];
const PHONE_NUMBER_ALIASES: &[&str] = &["phoneNumber", "phone_number", "Phone Number"];
const COLLEGE_NAME_ALIASES: &[&str] = &["collegeName", "college_name", "College Name"];
const COLLEGE_MAIL_ID_ALIASES: &[&str] = &["collegeMailId", "college_mail_id", "College Mail ID"];
const BRANCH_ALIASES: &[&str] = &["branch", "Branch"];
const ROLL_NO_ALIASES: &[&str] = &["rollNo", "roll_no", "Roll No"];

// ─────────────────────────────────────────────────────────────────────────────
// Public Types
// ─────────────────────────────────────────────────────────────────────────────

/// One parsed CSV line: header label → raw value.
pub type RawRow = HashMap<String, String>;

/// A normalized user record, ready for validation and persistence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalUser {
    /// Natural key; lower-cased and trimmed.
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub phone_number: String,
    pub college_name: Option<String>,
    pub college_mail_id: Option<String>,
    pub branch: Option<String>,
    pub roll_no: Option<String>,
    /// Derived once at resolution time as `"{first_name} {last_name}"`.
    pub display_name: String,
}

/// Outcome of resolving one raw row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// All mandatory fields were present.
    User(CanonicalUser),
    /// Mandatory canonical fields that could not be resolved from any alias.
    MissingFields(Vec<&'static str>),
}

// ─────────────────────────────────────────────────────────────────────────────
// Resolution
// ─────────────────────────────────────────────────────────────────────────────

/// Resolves a raw row into a canonical user, or reports which mandatory
/// fields are absent. Pure; the row is never mutated.
pub fn resolve(row: &RawRow) -> Resolution {
    let email = first_match(row, EMAIL_ALIASES).map(|v| v.to_lowercase());
    let first_name = first_match(row, FIRST_NAME_ALIASES);
    let last_name = first_match(row, LAST_NAME_ALIASES);
    let phone_number = first_match(row, PHONE_NUMBER_ALIASES);

    match (email, first_name, last_name, phone_number) {
        (Some(email), Some(first_name), Some(last_name), Some(phone_number)) => {
            let display_name = format!("{first_name} {last_name}");
            Resolution::User(CanonicalUser {
                email,
                first_name,
                last_name,
                phone_number,
                college_name: first_match(row, COLLEGE_NAME_ALIASES),
                college_mail_id: first_match(row, COLLEGE_MAIL_ID_ALIASES),
                branch: first_match(row, BRANCH_ALIASES),
                roll_no: first_match(row, ROLL_NO_ALIASES),
                display_name,
            })
        }
        (email, first_name, last_name, phone_number) => {
            let mut missing = Vec::new();
            if email.is_none() {
                missing.push("email");
            }
            if first_name.is_none() {
                missing.push("firstName");
            }
            if last_name.is_none() {
                missing.push("lastName");
            }
            if phone_number.is_none() {
                missing.push("phoneNumber");
            }
            Resolution::MissingFields(missing)
        }
    }
}

/// Returns the first alias whose trimmed value is non-empty.
/// An all-whitespace value is treated as absent.
fn first_match(row: &RawRow, aliases: &[&str]) -> Option<String> {
    aliases.iter().find_map(|alias| {
        row.get(*alias)
            .map(|value| value.trim())
            .filter(|value| !value.is_empty())
            .map(str::to_string)
    })
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn row(pairs: &[(&str, &str)]) -> RawRow {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn resolve_user(pairs: &[(&str, &str)]) -> CanonicalUser {
        match resolve(&row(pairs)) {
            Resolution::User(user) => user,
            Resolution::MissingFields(missing) => panic!("unexpected missing: {missing:?}"),
        }
    }

    #[test]
    fn camel_case_dialect_resolves() {
        let user = resolve_user(&[
            ("email", "alice@example.com"),
            ("firstName", "Alice"),
            ("lastName", "Adams"),
            ("phoneNumber", "555-0100"),
            ("collegeName", "State College"),
            ("rollNo", "42"),
        ]);

        assert_eq!(user.email, "alice@example.com");
        assert_eq!(user.first_name, "Alice");
        assert_eq!(user.last_name, "Adams");
        assert_eq!(user.phone_number, "555-0100");
        assert_eq!(user.college_name.as_deref(), Some("State College"));
        assert_eq!(user.roll_no.as_deref(), Some("42"));
        assert_eq!(user.display_name, "Alice Adams");
    }

    #[test]
    fn snake_case_dialect_resolves() {
        let user = resolve_user(&[
            ("email", "bob@example.com"),
            ("first_name", "Bob"),
            ("last_name", "Brown"),
            ("phone_number", "555-0101"),
            ("college_mail_id", "bob@college.edu"),
            ("roll_no", "7"),
        ]);

        assert_eq!(user.first_name, "Bob");
        assert_eq!(user.college_mail_id.as_deref(), Some("bob@college.edu"));
    }

    #[test]
    fn title_case_dialect_resolves() {
        let user = resolve_user(&[
            ("Email Address", "carol@example.com"),
            ("First Name", "Carol"),
            ("Last Name", "Clark"),
            ("Phone Number", "555-0102"),
            ("College Name", "Tech Institute"),
            ("Branch", "CSE"),
            ("Roll No", "19"),
        ]);

        assert_eq!(user.email, "carol@example.com");
        assert_eq!(user.branch.as_deref(), Some("CSE"));
        assert_eq!(user.display_name, "Carol Clark");
    }

    #[test]
    fn email_aliases_yield_same_canonical_email() {
        // Property: whichever alias carries the email, resolution is identical.
        for alias in ["email", "Email Address"] {
            let user = resolve_user(&[
                (alias, "Same@Example.com"),
                ("firstName", "A"),
                ("lastName", "B"),
                ("phoneNumber", "1"),
            ]);
            assert_eq!(user.email, "same@example.com");
        }
    }

    #[test]
    fn first_alias_wins_over_later_ones() {
        let user = resolve_user(&[
            ("email", "x@example.com"),
            ("firstName", "Camel"),
            ("first_name", "Snake"),
            ("lastName", "B"),
            ("phoneNumber", "1"),
        ]);
        assert_eq!(user.first_name, "Camel");
    }

    #[test]
    fn empty_earlier_alias_falls_through() {
        let user = resolve_user(&[
            ("email", "x@example.com"),
            ("firstName", "   "),
            ("first_name", "Snake"),
            ("lastName", "B"),
            ("phoneNumber", "1"),
        ]);
        assert_eq!(user.first_name, "Snake");
    }

    #[test]
    fn email_is_lowercased_and_trimmed() {
        let user = resolve_user(&[
            ("email", "  USER@Example.com "),
            ("firstName", "U"),
            ("lastName", "V"),
            ("phoneNumber", "1"),
        ]);
        assert_eq!(user.email, "user@example.com");
    }

    #[test]
    fn values_are_trimmed() {
        let user = resolve_user(&[
            ("email", "x@example.com"),
            ("firstName", "  Dee  "),
            ("lastName", " Dale "),
            ("phoneNumber", " 555-0103 "),
            ("branch", "  ECE "),
        ]);
        assert_eq!(user.first_name, "Dee");
        assert_eq!(user.last_name, "Dale");
        assert_eq!(user.phone_number, "555-0103");
        assert_eq!(user.branch.as_deref(), Some("ECE"));
        assert_eq!(user.display_name, "Dee Dale");
    }

    #[test]
    fn whitespace_optional_field_is_absent() {
        let user = resolve_user(&[
            ("email", "x@example.com"),
            ("firstName", "A"),
            ("lastName", "B"),
            ("phoneNumber", "1"),
            ("collegeName", "   "),
        ]);
        assert_eq!(user.college_name, None);
    }

    #[test]
    fn missing_mandatory_fields_are_reported() {
        let resolution = resolve(&row(&[("email", "x@example.com"), ("firstName", "A")]));
        match resolution {
            Resolution::MissingFields(missing) => {
                assert_eq!(missing, vec!["lastName", "phoneNumber"]);
            }
            Resolution::User(user) => panic!("unexpected user: {user:?}"),
        }
    }

    #[test]
    fn fully_empty_row_reports_all_mandatory_fields() {
        let resolution = resolve(&RawRow::new());
        assert_eq!(
            resolution,
            Resolution::MissingFields(vec!["email", "firstName", "lastName", "phoneNumber"])
        );
    }

    #[test]
    fn unknown_headers_are_ignored() {
        let user = resolve_user(&[
            ("email", "x@example.com"),
            ("firstName", "A"),
            ("lastName", "B"),
            ("phoneNumber", "1"),
            ("favouriteColor", "green"),
        ]);
        assert_eq!(user.email, "x@example.com");
    }
}
