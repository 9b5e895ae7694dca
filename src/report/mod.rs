//! Persisted run artifacts — JSON data dump and Markdown summary.
//!
//! One extraction produces two timestamped files: the raw record array and
//! a human-readable summary with company and connection-degree frequency
//! tables. Records are serialized verbatim; the summary is derived.

use crate::extraction::reactors::{ConnectionDegree, ReactorRecord, NOT_AVAILABLE};
use anyhow::{Context, Result};
use chrono::Utc;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Write `reactions_data_<ts>.json` and `reactions_summary_<ts>.md` under
/// `dir`; returns both paths.
pub fn write_reports(
    records: &[ReactorRecord],
    dir: &Path,
    unix_ts: i64,
) -> Result<(PathBuf, PathBuf)> {
    fs::create_dir_all(dir)
        .with_context(|| format!("failed to create output dir {}", dir.display()))?;

    let data_path = dir.join(format!("reactions_data_{unix_ts}.json"));
    let json = serde_json::to_string_pretty(records)?;
    fs::write(&data_path, json)
        .with_context(|| format!("failed to write {}", data_path.display()))?;

    let summary_path = dir.join(format!("reactions_summary_{unix_ts}.md"));
    fs::write(&summary_path, render_summary(records))
        .with_context(|| format!("failed to write {}", summary_path.display()))?;

    Ok((data_path, summary_path))
}

/// Render the Markdown summary for a record list.
pub fn render_summary(records: &[ReactorRecord]) -> String {
    let mut out = String::new();
    out.push_str("# LinkedIn Post Reactions Analysis\n\n");
    out.push_str(&format!(
        "**Extraction Date:** {}\n",
        Utc::now().format("%Y-%m-%d %H:%M:%S")
    ));
    out.push_str(&format!("**Total Reactors:** {}\n\n", records.len()));

    out.push_str("## Reactor Profiles\n\n");
    for (i, record) in records.iter().enumerate() {
        out.push_str(&format!("### {}. {}\n", i + 1, record.name));
        out.push_str(&format!(
            "- **Title:** {}\n",
            record.title.as_deref().unwrap_or(NOT_AVAILABLE)
        ));
        out.push_str(&format!(
            "- **Company:** {}\n",
            record.company.as_deref().unwrap_or(NOT_AVAILABLE)
        ));
        out.push_str(&format!("- **Connection:** {}\n", record.connection_degree));
        if let Some(url) = &record.profile_url {
            out.push_str(&format!("- **Profile:** {url}\n"));
        }
        out.push('\n');
    }

    out.push_str("## Summary Statistics\n\n");

    let companies = frequency(records.iter().filter_map(|r| r.company.clone()));
    if !companies.is_empty() {
        out.push_str("### Top Companies\n");
        for (company, count) in companies.iter().take(5) {
            out.push_str(&format!("- {company}: {count}\n"));
        }
        out.push('\n');
    }

    let degrees = frequency(
        records
            .iter()
            .filter(|r| r.connection_degree != ConnectionDegree::Unknown)
            .map(|r| r.connection_degree.to_string()),
    );
    if !degrees.is_empty() {
        out.push_str("### Connection Degrees\n");
        for (degree, count) in &degrees {
            out.push_str(&format!("- {degree}: {count}\n"));
        }
        out.push('\n');
    }

    out
}

/// Count occurrences, most frequent first; ties break alphabetically so the
/// output is stable.
fn frequency(items: impl Iterator<Item = String>) -> Vec<(String, usize)> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    for item in items {
        *counts.entry(item).or_default() += 1;
    }
    let mut sorted: Vec<(String, usize)> = counts.into_iter().collect();
    sorted.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str, company: Option<&str>, degree: ConnectionDegree) -> ReactorRecord {
        ReactorRecord {
            name: name.to_string(),
            title: Some("Engineer".to_string()),
            company: company.map(String::from),
            connection_degree: degree,
            profile_url: None,
            extraction_timestamp: "2026-08-06T00:00:00+00:00".to_string(),
            element_text: String::new(),
        }
    }

    #[test]
    fn test_render_summary_counts_non_sentinel_values() {
        let records = vec![
            record("A One", Some("Initech"), ConnectionDegree::Second),
            record("B Two", Some("Initech"), ConnectionDegree::Second),
            record("C Three", Some("Globex"), ConnectionDegree::First),
            record("D Four", None, ConnectionDegree::Unknown),
        ];

        let summary = render_summary(&records);
        assert!(summary.contains("**Total Reactors:** 4"));
        assert!(summary.contains("- Initech: 2"));
        assert!(summary.contains("- Globex: 1"));
        assert!(summary.contains("- 2nd: 2"));
        assert!(summary.contains("- 1st: 1"));
        // Unknown values are not counted in the tables.
        assert!(!summary.contains("- N/A:"));
    }

    #[test]
    fn test_render_summary_omits_empty_tables() {
        let records = vec![record("A One", None, ConnectionDegree::Unknown)];
        let summary = render_summary(&records);
        assert!(!summary.contains("### Top Companies"));
        assert!(!summary.contains("### Connection Degrees"));
        assert!(summary.contains("- **Company:** N/A"));
    }

    #[test]
    fn test_write_reports_creates_both_files() {
        let dir = tempfile::tempdir().unwrap();
        let records = vec![record("A One", Some("Initech"), ConnectionDegree::Second)];

        let (data_path, summary_path) = write_reports(&records, dir.path(), 1_754_000_000).unwrap();
        assert!(data_path.ends_with("reactions_data_1754000000.json"));
        assert!(summary_path.ends_with("reactions_summary_1754000000.md"));

        let json = std::fs::read_to_string(&data_path).unwrap();
        // Two-space indented JSON array of records.
        assert!(json.starts_with("[\n  {"));
        let parsed: Vec<ReactorRecord> = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].name, "A One");
    }

    #[test]
    fn test_frequency_orders_by_count_then_name() {
        let items = ["b", "a", "a", "c", "b"].iter().map(|s| s.to_string());
        let counts = frequency(items);
        assert_eq!(
            counts,
            vec![
                ("a".to_string(), 2),
                ("b".to_string(), 2),
                ("c".to_string(), 1)
            ]
        );
    }
}
