//! Report generation from raw analysis results
//!
//! Extraction of category/topic statistics, the LLM browsing summary, and
//! the HTML report.

pub mod extract;
pub mod html;
pub mod summary;

pub use extract::{extract_data, ExtractedData};
pub use html::generate_html_report;
pub use summary::generate_browsing_summary;
