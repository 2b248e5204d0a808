//! Self-contained HTML report with a category donut chart and topic cloud

use anyhow::{Context, Result};
use chrono::Local;
use serde_json::json;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::report::extract::{self, date_prefix};

const HTML_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Analysis Report - {report_date}</title>
    <script src="https://cdn.plot.ly/plotly-latest.min.js"></script>
    <style>
        body {
            font-family: sans-serif;
            line-height: 1.6;
            margin: 20px;
            background-color: #1e1e1e;
            color: #d4d4d4;
        }
        h1, h2 {
            color: #a3ffb4;
            border-bottom: 1px solid #444;
            padding-bottom: 5px;
        }
        .container {
            display: flex;
            flex-direction: column;
            align-items: center;
            margin-top: 20px;
        }
        .chart-container, .topic-cloud-container {
            border: 1px solid #444;
            border-radius: 8px;
            padding: 20px;
            margin: 20px 0;
            background-color: #252526;
            width: 90%;
            max-width: 800px;
            box-sizing: border-box;
        }
        .topic-cloud {
            text-align: center;
            line-height: 2.2;
        }
        .topic-cloud span {
            display: inline-block;
            margin: 0 10px;
            color: #50c878;
        }
        #categoryPieChart {
            width: 100%;
            height: 500px;
        }
    </style>
</head>
<body>
    <h1>Analysis Report - {report_date}</h1>

    <div class="container">
        <div class="chart-container">
            <h2>Category Distribution</h2>
            <div id="categoryPieChart"></div>
        </div>

        <div class="topic-cloud-container">
            <h2>Topics</h2>
            <div class="topic-cloud">{topic_cloud_html}</div>
        </div>
    </div>

    <script>
        try {
            const pieChartData = {category_pie_data_json};
            const pieTrace = [{
                labels: pieChartData.labels,
                values: pieChartData.values,
                type: 'pie',
                hole: .4,
                textinfo: 'percent',
                insidetextorientation: 'radial',
                hoverinfo: 'label+percent+value',
                automargin: true
            }];
            const pieLayout = {
                paper_bgcolor: '#252526',
                plot_bgcolor: '#252526',
                font: { color: '#d4d4d4' },
                showlegend: true,
                legend: { bgcolor: 'rgba(0,0,0,0)', font: { color: '#d4d4d4' } },
                margin: { l: 40, r: 40, t: 40, b: 40 }
            };
            Plotly.newPlot('categoryPieChart', pieTrace, pieLayout, { responsive: true });
        } catch (error) {
            console.error("Error rendering Pie Chart:", error);
            document.getElementById('categoryPieChart').innerText = 'Error rendering Pie Chart.';
        }
    </script>
</body>
</html>
"#;

/// Render the HTML report from extracted data, writing
/// `<date>_analysis_report.html` to `output_dir`.
pub fn generate_html_report(json_path: &Path, output_dir: &Path) -> Result<PathBuf> {
    tracing::info!("Starting HTML report generation from {}", json_path.display());

    let data = extract::load(json_path)?;
    let topics = merge_topics(&data.topics);

    let report_date = json_path
        .file_name()
        .and_then(|name| name.to_str())
        .and_then(date_prefix)
        .map(str::to_string)
        .unwrap_or_else(|| {
            tracing::warn!("Could not extract date from JSON filename, using current date");
            Local::now().format("%Y-%m-%d").to_string()
        });

    let html = HTML_TEMPLATE
        .replace("{report_date}", &report_date)
        .replace("{category_pie_data_json}", &pie_data_json(&data.categories))
        .replace("{topic_cloud_html}", &topic_cloud_html(&topics));

    let html_path = output_dir.join(format!("{report_date}_analysis_report.html"));
    std::fs::create_dir_all(output_dir)?;
    std::fs::write(&html_path, html)
        .with_context(|| format!("Failed to write {}", html_path.display()))?;

    tracing::info!("HTML report saved to {}", html_path.display());
    Ok(html_path)
}

/// Merge topic counts case-insensitively, keying by the title-cased form.
fn merge_topics(topics: &BTreeMap<String, u64>) -> BTreeMap<String, u64> {
    let mut merged: BTreeMap<String, u64> = BTreeMap::new();
    for (topic, count) in topics {
        *merged.entry(title_case(topic)).or_insert(0) += count;
    }

    if merged.len() != topics.len() {
        tracing::info!(
            "Merged topics: original count={}, merged count={}",
            topics.len(),
            merged.len()
        );
    }
    merged
}

fn title_case(text: &str) -> String {
    text.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => {
                    first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
                }
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Plotly donut chart data, sorted by count descending (name as tie-break).
fn pie_data_json(categories: &BTreeMap<String, u64>) -> String {
    let mut entries: Vec<(&String, &u64)> = categories.iter().collect();
    entries.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));

    let labels: Vec<&str> = entries.iter().map(|(name, _)| name.as_str()).collect();
    let values: Vec<u64> = entries.iter().map(|(_, count)| **count).collect();

    json!({ "labels": labels, "values": values }).to_string()
}

/// Inline topic cloud: font size scales linearly between the least and most
/// frequent topic.
fn topic_cloud_html(topics: &BTreeMap<String, u64>) -> String {
    if topics.is_empty() {
        return "<em>No topic data available.</em>".to_string();
    }

    const MIN_EM: f64 = 0.9;
    const MAX_EM: f64 = 2.4;

    let min = *topics.values().min().unwrap_or(&1) as f64;
    let max = *topics.values().max().unwrap_or(&1) as f64;

    topics
        .iter()
        .map(|(topic, count)| {
            let scale = if max > min {
                (*count as f64 - min) / (max - min)
            } else {
                0.5
            };
            let size = MIN_EM + scale * (MAX_EM - MIN_EM);
            format!(
                r#"<span style="font-size: {size:.2}em;" title="{count}">{topic}</span>"#,
                topic = escape_html(topic)
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
