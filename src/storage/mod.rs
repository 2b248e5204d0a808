//! Storage module for hindsight
//!
//! Read-side access to the external browsing-history SQLite database.

mod database;
mod models;

pub use database::{HistoryDatabase, HistoryStats};
pub use models::HistoryRecord;
