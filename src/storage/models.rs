//! Data models for storage

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// One row of the external `history` table.
///
/// The table is populated by the browser-side recorder; hindsight only reads it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryRecord {
    /// Row identifier assigned by the recorder
    pub id: i64,

    /// Page URL
    pub url: String,

    /// Page title
    pub title: String,

    /// Extracted page text, if the recorder captured any
    pub content: Option<String>,

    /// Last time the recorder touched this row (local wall-clock time)
    pub updated: NaiveDateTime,
}

impl HistoryRecord {
    /// Whether this record has any analyzable content.
    pub fn has_content(&self) -> bool {
        self.content
            .as_deref()
            .map(|c| !c.trim().is_empty())
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_content_is_not_analyzable() {
        let mut record = HistoryRecord {
            id: 1,
            url: "https://example.com".to_string(),
            title: "Example".to_string(),
            content: Some("   \n".to_string()),
            updated: chrono::Local::now().naive_local(),
        };
        assert!(!record.has_content());

        record.content = None;
        assert!(!record.has_content());

        record.content = Some("real text".to_string());
        assert!(record.has_content());
    }
}
