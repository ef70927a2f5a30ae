//! CSV row normalization and validation.
//!
//! Resolves the three accepted header dialects onto canonical user records
//! and partitions a file into valid users and offending line numbers.

pub mod resolver;
pub mod rows;

pub use resolver::{resolve, CanonicalUser, RawRow, Resolution};
pub use rows::{partition, Partition};
