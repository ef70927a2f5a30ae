//! Storage module for the local SQLite user store.

pub mod database;
pub mod users;

pub use database::{Database, PersistedUser};
pub use users::{insert_if_absent, NewUser};
