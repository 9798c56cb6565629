use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::errors::TrendError;
use crate::models::{DailyReport, ScoredTrend};

/// Final path for a date's report inside `dir`.
pub fn report_path(dir: &Path, date: &str) -> PathBuf {
    dir.join(format!("trends_{date}.json"))
}

/// Persist a daily report at its dated path, creating `dir` if needed.
///
/// The JSON lands in a temp file in the same directory and is renamed over
/// the final name, so a crash mid-write leaves either no report or the
/// previous one intact. Re-running a date overwrites that date's file;
/// other dates are never touched.
pub fn write_report(dir: &Path, report: &DailyReport) -> Result<PathBuf, TrendError> {
    let final_path = report_path(dir, &report.date);

    fs::create_dir_all(dir).map_err(|source| TrendError::WriteFailure {
        path: dir.to_path_buf(),
        source,
    })?;

    let json = serde_json::to_string_pretty(report).map_err(|e| TrendError::WriteFailure {
        path: final_path.clone(),
        source: std::io::Error::new(std::io::ErrorKind::InvalidData, e),
    })?;

    let tmp_path = dir.join(format!(".trends_{}.json.tmp", report.date));
    fs::write(&tmp_path, json).map_err(|source| TrendError::WriteFailure {
        path: tmp_path.clone(),
        source,
    })?;
    fs::rename(&tmp_path, &final_path).map_err(|source| TrendError::WriteFailure {
        path: final_path.clone(),
        source,
    })?;

    Ok(final_path)
}

/// Load a previously written report.
pub fn load_report(path: &Path) -> Result<DailyReport> {
    // Check if file exists
    if !path.exists() {
        anyhow::bail!("Report file not found: {}", path.display());
    }

    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read report file: {}", path.display()))?;

    // Try to parse JSON with helpful error message
    let report: DailyReport = serde_json::from_str(&content).with_context(|| {
        format!(
            "Failed to parse report JSON from {}. The file may be corrupted or not a trends report.",
            path.display()
        )
    })?;

    // An empty trends list is a legitimate quiet day; a missing date is not.
    if report.date.is_empty() {
        anyhow::bail!("Report file {} has no date stamp", path.display());
    }

    Ok(report)
}

/// List all reports in `dir`, newest date first. Unreadable files are
/// warned about and skipped.
pub fn list_reports(dir: &Path) -> Result<Vec<(PathBuf, DailyReport)>> {
    let mut reports = Vec::new();

    if dir.exists() {
        for entry in fs::read_dir(dir).context("Failed to read reports directory")? {
            let entry = entry?;
            let path = entry.path();
            let name = entry.file_name();
            let name = name.to_string_lossy();

            if !name.starts_with("trends_") || !name.ends_with(".json") {
                continue;
            }
            match load_report(&path) {
                Ok(report) => {
                    reports.push((path, report));
                }
                Err(e) => {
                    eprintln!("Warning: Could not load {}: {}", path.display(), e);
                }
            }
        }
    }

    // Date stamps are ISO, so the lexicographic sort is chronological.
    reports.sort_by(|a, b| b.1.date.cmp(&a.1.date));

    Ok(reports)
}

/// Per-category rollup of a report's trends.
#[derive(Debug, Clone)]
pub struct CategorySummary {
    pub category: String,
    pub count: usize,
    pub avg_score: f64,
    pub top_term: String,
}

/// Group trends by category for the summary table. Within a category the
/// first (highest-ranked) term is the headline; categories come out in
/// name order.
pub fn category_breakdown(trends: &[ScoredTrend]) -> Vec<CategorySummary> {
    let mut by_category: BTreeMap<&str, Vec<&ScoredTrend>> = BTreeMap::new();
    for trend in trends {
        by_category
            .entry(trend.category.as_str())
            .or_default()
            .push(trend);
    }

    by_category
        .into_iter()
        .map(|(category, items)| CategorySummary {
            category: category.to_string(),
            count: items.len(),
            avg_score: items.iter().map(|t| t.score).sum::<f64>() / items.len() as f64,
            top_term: items[0].term.clone(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trend(term: &str, score: f64, category: &str) -> ScoredTrend {
        ScoredTrend {
            term: term.to_string(),
            score,
            velocity: 10.0,
            volume_score: 40.0,
            buildability: 80.0,
            freshness: 85.0,
            recent_interest: 40.0,
            category: category.to_string(),
            volume: 30_000,
            growth_pct: 50.0,
        }
    }

    fn sample_report(date: &str) -> DailyReport {
        DailyReport::new(
            date,
            "US",
            vec![
                trend("pdf merge tool", 73.0, "technology"),
                trend("meal planner app", 45.0, "health"),
                trend("macro tracker", 41.0, "health"),
            ],
        )
    }

    // ==================== Write Tests ====================

    #[test]
    fn test_write_creates_dated_file_in_new_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("nested").join("reports");

        let path = write_report(&dir, &sample_report("2026-08-24")).unwrap();

        assert_eq!(path, dir.join("trends_2026-08-24.json"));
        let loaded = load_report(&path).unwrap();
        assert_eq!(loaded.date, "2026-08-24");
        assert_eq!(loaded.trends.len(), 3);
    }

    #[test]
    fn test_rewriting_a_date_is_byte_identical() {
        let tmp = tempfile::tempdir().unwrap();
        let report = sample_report("2026-08-24");

        let path = write_report(tmp.path(), &report).unwrap();
        let first = fs::read(&path).unwrap();
        write_report(tmp.path(), &report).unwrap();
        let second = fs::read(&path).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn test_writing_one_date_leaves_others_untouched() {
        let tmp = tempfile::tempdir().unwrap();

        let old_path = write_report(tmp.path(), &sample_report("2026-08-23")).unwrap();
        let before = fs::read(&old_path).unwrap();

        write_report(tmp.path(), &sample_report("2026-08-24")).unwrap();
        let after = fs::read(&old_path).unwrap();

        assert_eq!(before, after);
        assert!(tmp.path().join("trends_2026-08-24.json").exists());
    }

    #[test]
    fn test_no_temp_files_survive_a_write() {
        let tmp = tempfile::tempdir().unwrap();

        write_report(tmp.path(), &sample_report("2026-08-24")).unwrap();

        let leftovers: Vec<String> = fs::read_dir(tmp.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .filter(|name| name.ends_with(".tmp"))
            .collect();
        assert!(leftovers.is_empty(), "stray temp files: {leftovers:?}");
    }

    #[test]
    fn test_empty_report_round_trips() {
        let tmp = tempfile::tempdir().unwrap();
        let report = DailyReport::new("2026-08-24", "US", Vec::new());

        let path = write_report(tmp.path(), &report).unwrap();
        let loaded = load_report(&path).unwrap();

        assert!(loaded.trends.is_empty());
        assert_eq!(loaded.geo, "US");
    }

    // ==================== Load/List Tests ====================

    #[test]
    fn test_load_missing_file_fails() {
        let tmp = tempfile::tempdir().unwrap();

        assert!(load_report(&tmp.path().join("trends_2026-01-01.json")).is_err());
    }

    #[test]
    fn test_list_reports_newest_first_skipping_garbage() {
        let tmp = tempfile::tempdir().unwrap();

        write_report(tmp.path(), &sample_report("2026-08-22")).unwrap();
        write_report(tmp.path(), &sample_report("2026-08-24")).unwrap();
        write_report(tmp.path(), &sample_report("2026-08-23")).unwrap();
        fs::write(tmp.path().join("trends_broken.json"), "not json").unwrap();
        fs::write(tmp.path().join("notes.txt"), "ignore me").unwrap();

        let reports = list_reports(tmp.path()).unwrap();
        let dates: Vec<&str> = reports.iter().map(|(_, r)| r.date.as_str()).collect();

        assert_eq!(dates, vec!["2026-08-24", "2026-08-23", "2026-08-22"]);
    }

    #[test]
    fn test_list_reports_on_missing_dir_is_empty() {
        let tmp = tempfile::tempdir().unwrap();

        let reports = list_reports(&tmp.path().join("nowhere")).unwrap();

        assert!(reports.is_empty());
    }

    // ==================== Breakdown Tests ====================

    #[test]
    fn test_category_breakdown_groups_and_averages() {
        let report = sample_report("2026-08-24");

        let rows = category_breakdown(&report.trends);

        assert_eq!(rows.len(), 2);
        // Name order: health before technology.
        assert_eq!(rows[0].category, "health");
        assert_eq!(rows[0].count, 2);
        assert_eq!(rows[0].avg_score, 43.0);
        assert_eq!(rows[0].top_term, "meal planner app");
        assert_eq!(rows[1].category, "technology");
        assert_eq!(rows[1].top_term, "pdf merge tool");
    }

    #[test]
    fn test_category_breakdown_of_empty_report() {
        assert!(category_breakdown(&[]).is_empty());
    }
}
