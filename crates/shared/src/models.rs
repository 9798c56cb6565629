use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Interest-over-time values per term, on the provider's 0-100 scale.
/// One entry per day, oldest first.
pub type SeriesMap = HashMap<String, Vec<f64>>;

/// A trending phrase plus the raw signals it arrived with.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidateTerm {
    pub term: String,
    /// Approximate daily search volume.
    pub volume: u64,
    /// Provider growth percentage; 0 when the discovery source carries none.
    pub growth_pct: f64,
    /// Topic slug; "unknown" when the source has no category data.
    pub category: String,
}

impl CandidateTerm {
    pub fn new(
        term: impl Into<String>,
        volume: u64,
        growth_pct: f64,
        category: impl Into<String>,
    ) -> Self {
        Self {
            term: term.into(),
            volume,
            growth_pct,
            category: category.into(),
        }
    }
}

/// A candidate after scoring. `score` is the 0-100 composite; the component
/// fields record how it was reached so reports stay explainable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredTrend {
    pub term: String,
    pub score: f64,
    pub velocity: f64,
    pub volume_score: f64,
    pub buildability: f64,
    pub freshness: f64,
    pub recent_interest: f64,
    pub category: String,
    pub volume: u64,
    pub growth_pct: f64,
}

/// One day's ranked trends. Exactly one report exists per calendar date;
/// re-running a scan replaces it wholesale.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyReport {
    pub date: String,
    pub geo: String,
    pub trends: Vec<ScoredTrend>,
}

impl DailyReport {
    pub fn new(date: impl Into<String>, geo: impl Into<String>, trends: Vec<ScoredTrend>) -> Self {
        Self {
            date: date.into(),
            geo: geo.into(),
            trends,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_trend() -> ScoredTrend {
        ScoredTrend {
            term: "waterproof fitness tracker".to_string(),
            score: 46.0,
            velocity: 3.3,
            volume_score: 40.0,
            buildability: 80.0,
            freshness: 85.0,
            recent_interest: 40.0,
            category: "technology".to_string(),
            volume: 30_000,
            growth_pct: 50.0,
        }
    }

    // ==================== Serialization Tests ====================

    #[test]
    fn test_report_envelope_fields() {
        let report = DailyReport::new("2026-08-24", "US", vec![sample_trend()]);
        let json = serde_json::to_string(&report).unwrap();

        assert!(json.contains("\"date\":\"2026-08-24\""));
        assert!(json.contains("\"geo\":\"US\""));
        assert!(json.contains("\"trends\""));
        assert!(json.contains("\"term\":\"waterproof fitness tracker\""));
        assert!(json.contains("\"score\":46.0"));
        assert!(json.contains("\"recent_interest\":40.0"));
    }

    #[test]
    fn test_report_round_trip() {
        let report = DailyReport::new("2026-08-24", "US", vec![sample_trend()]);
        let json = serde_json::to_string_pretty(&report).unwrap();
        let parsed: DailyReport = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed.date, report.date);
        assert_eq!(parsed.geo, report.geo);
        assert_eq!(parsed.trends.len(), 1);
        assert_eq!(parsed.trends[0].term, "waterproof fitness tracker");
        assert_eq!(parsed.trends[0].volume, 30_000);
        assert_eq!(parsed.trends[0].score, 46.0);
    }

    #[test]
    fn test_empty_report_is_valid() {
        let report = DailyReport::new("2026-08-24", "US", Vec::new());
        let json = serde_json::to_string(&report).unwrap();
        let parsed: DailyReport = serde_json::from_str(&json).unwrap();

        assert!(parsed.trends.is_empty());
        assert_eq!(parsed.date, "2026-08-24");
    }
}
