//! SQLite access to the browsing-history database

use anyhow::{Context, Result};
use chrono::{Duration, Local, NaiveDateTime};
use rusqlite::{params, Connection};
use std::path::Path;

use crate::config::Settings;
use crate::storage::models::HistoryRecord;

/// Timestamp format used by the `updated` column.
const UPDATED_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Read-side wrapper over the history database.
///
/// The schema is owned by the browser-side recorder; hindsight never migrates
/// or writes it.
#[derive(Debug)]
pub struct HistoryDatabase {
    conn: Connection,
}

impl HistoryDatabase {
    /// Open the database at the configured path
    pub fn open(settings: &Settings) -> Result<Self> {
        Self::open_path(&settings.history.db_path)
    }

    /// Open the database at a specific path
    pub fn open_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            anyhow::bail!("History database not found at {}", path.display());
        }

        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open database: {}", path.display()))?;

        Ok(Self { conn })
    }

    /// Open an in-memory database (for testing)
    #[cfg(test)]
    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(
            r#"
            CREATE TABLE history (
                id INTEGER PRIMARY KEY,
                url TEXT NOT NULL,
                title TEXT NOT NULL,
                content TEXT,
                updated TEXT NOT NULL
            );
            "#,
        )?;
        Ok(Self { conn })
    }

    #[cfg(test)]
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Records updated within the last `days` days, oldest first.
    ///
    /// The recorder stores `updated` as a local-time `YYYY-MM-DD HH:MM:SS`
    /// string, so the threshold is compared lexicographically in the same
    /// format.
    pub fn recent_records(&self, days: i64) -> Result<Vec<HistoryRecord>> {
        let threshold = Local::now().naive_local() - Duration::days(days);
        let threshold_str = threshold.format(UPDATED_FORMAT).to_string();

        tracing::info!("Selecting records updated since {}", threshold_str);

        let mut stmt = self.conn.prepare(
            "SELECT id, url, title, content, updated
             FROM history
             WHERE updated >= ?1
             ORDER BY updated ASC",
        )?;

        let records = stmt
            .query_map(params![threshold_str], Self::row_to_record)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(records)
    }

    /// Get database statistics
    pub fn stats(&self) -> Result<HistoryStats> {
        let total_records: i64 =
            self.conn
                .query_row("SELECT COUNT(*) FROM history", [], |row| row.get(0))?;

        let with_content: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM history WHERE content IS NOT NULL AND TRIM(content) != ''",
            [],
            |row| row.get(0),
        )?;

        Ok(HistoryStats {
            total_records: total_records as usize,
            with_content: with_content as usize,
        })
    }

    // Helper to convert a row to a HistoryRecord
    fn row_to_record(row: &rusqlite::Row) -> rusqlite::Result<HistoryRecord> {
        let updated_str: String = row.get(4)?;
        let updated = NaiveDateTime::parse_from_str(&updated_str, UPDATED_FORMAT)
            .unwrap_or(NaiveDateTime::MIN);

        Ok(HistoryRecord {
            id: row.get(0)?,
            url: row.get(1)?,
            title: row.get(2)?,
            content: row.get(3)?,
            updated,
        })
    }
}

/// History database statistics
#[derive(Debug, Clone)]
pub struct HistoryStats {
    pub total_records: usize,
    pub with_content: usize,
}
