//! Row validation with file-level all-or-nothing semantics.
//!
//! Every raw row is resolved and the outcomes are partitioned into valid
//! canonical users and offending source line numbers. The whole file is
//! collected before any decision so a single response can enumerate every
//! bad line; the controller rejects the upload if any line is invalid.

use crate::validation::resolver::{resolve, CanonicalUser, RawRow, Resolution};

/// Result of validating a whole file of raw rows.
#[derive(Debug, Clone, Default)]
pub struct Partition {
    /// Users that resolved with every mandatory field present, in file order.
    pub valid: Vec<CanonicalUser>,
    /// 1-based source line numbers of rows missing mandatory fields.
    pub invalid_lines: Vec<u64>,
}

impl Partition {
    /// True when every data row resolved successfully.
    pub fn is_clean(&self) -> bool {
        self.invalid_lines.is_empty()
    }
}

/// Partitions raw rows into valid users and invalid line numbers.
///
/// Line number = data row index + 2: the header occupies line 1 and data
/// rows are 0-indexed from line 2.
pub fn partition(rows: &[RawRow]) -> Partition {
    let mut result = Partition::default();

    for (index, row) in rows.iter().enumerate() {
        match resolve(row) {
            Resolution::User(user) => result.valid.push(user),
            Resolution::MissingFields(_) => result.invalid_lines.push(index as u64 + 2),
        }
    }

    result
}
