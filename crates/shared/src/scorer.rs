use crate::models::{CandidateTerm, ScoredTrend, SeriesMap};

/// Days in the window used for velocity and the recent-interest floor.
const RECENT_WINDOW: usize = 7;

/// Freshness assumed when no usable series exists: the term is trending
/// right now, so it has not peaked weeks ago.
const FRESHNESS_WITHOUT_SERIES: f64 = 85.0;

/// Query fragments suggesting a small tool could serve the searcher.
pub const HIGH_BUILDABILITY: &[&str] = &[
    "tool",
    "app",
    "tracker",
    "generator",
    "checker",
    "calculator",
    "finder",
    "manager",
    "planner",
    "dashboard",
    "monitor",
    "assistant",
    "bot",
    "extension",
    "plugin",
    "automation",
    "converter",
    "analyzer",
    "summarizer",
    "scheduler",
    "writer",
    "builder",
    "scanner",
];

/// Fragments pointing at capital-heavy or regulated territory.
pub const LOW_BUILDABILITY: &[&str] = &[
    "stock",
    "invest",
    "market",
    "fund",
    "insurance",
    "regulation",
    "policy",
    "research",
    "enterprise",
    "infrastructure",
    "hardware",
];

/// Weights for the composite score. Should sum to 1.0.
#[derive(Debug, Clone, Copy)]
pub struct ScoreWeights {
    pub velocity: f64,
    pub volume: f64,
    pub buildability: f64,
    pub freshness: f64,
}

impl Default for ScoreWeights {
    /// Full profile: growth-driven, with buildability ahead of raw volume.
    fn default() -> Self {
        Self {
            velocity: 0.35,
            volume: 0.20,
            buildability: 0.25,
            freshness: 0.20,
        }
    }
}

impl ScoreWeights {
    /// Reduced profile that ranks on velocity and volume alone.
    pub fn two_signal() -> Self {
        Self {
            velocity: 0.6,
            volume: 0.4,
            buildability: 0.0,
            freshness: 0.0,
        }
    }
}

/// Buildability estimation stays swappable; the default is a keyword
/// heuristic, not a model.
pub trait BuildabilitySignal: Send + Sync {
    /// 0-100 estimate of how quickly a small tool could serve the search.
    fn score(&self, term: &str) -> f64;
}

/// Default heuristic. Low-signal fragments win over high-signal ones:
/// a "stock tracker" is still finance territory.
pub struct KeywordBuildability;

impl BuildabilitySignal for KeywordBuildability {
    fn score(&self, term: &str) -> f64 {
        let kw = term.to_lowercase();
        if LOW_BUILDABILITY.iter().any(|s| kw.contains(s)) {
            return 20.0;
        }
        if HIGH_BUILDABILITY.iter().any(|s| kw.contains(s)) {
            return 80.0;
        }
        50.0
    }
}

/// Scores candidates 0-100 and applies the recent-interest floor.
pub struct Scorer {
    weights: ScoreWeights,
    min_recent_interest: f64,
    buildability: Box<dyn BuildabilitySignal>,
}

impl Scorer {
    pub fn new(weights: ScoreWeights, min_recent_interest: f64) -> Self {
        Self {
            weights,
            min_recent_interest,
            buildability: Box::new(KeywordBuildability),
        }
    }

    /// Replace the buildability heuristic.
    pub fn with_buildability(mut self, signal: Box<dyn BuildabilitySignal>) -> Self {
        self.buildability = signal;
        self
    }

    /// Score one candidate. Returns None when its recent interest falls
    /// below the floor: a steep rise from a near-zero baseline has no
    /// realized audience yet, whatever its velocity says.
    pub fn score_one(
        &self,
        candidate: &CandidateTerm,
        series: Option<&[f64]>,
    ) -> Option<ScoredTrend> {
        let volume_component = volume_score(candidate.volume);

        let recent_interest = match series {
            Some(s) if !s.is_empty() => round1(mean(tail(s, RECENT_WINDOW))),
            // No series: the volume curve doubles as the interest proxy,
            // already on the same 0-100 scale.
            _ => volume_component,
        };
        if recent_interest < self.min_recent_interest {
            return None;
        }

        let growth_pct = match series.and_then(|s| series_growth_pct(s, RECENT_WINDOW)) {
            Some(pct) => pct,
            None => candidate.growth_pct,
        };
        let velocity = growth_score(growth_pct);
        let buildability = self.buildability.score(&candidate.term);
        let freshness = match series {
            Some(s) if s.len() >= RECENT_WINDOW => freshness_score(s),
            _ => FRESHNESS_WITHOUT_SERIES,
        };

        let composite = self.weights.velocity * velocity
            + self.weights.volume * volume_component
            + self.weights.buildability * buildability
            + self.weights.freshness * freshness;

        Some(ScoredTrend {
            term: candidate.term.clone(),
            score: composite.clamp(0.0, 100.0).round(),
            velocity,
            volume_score: volume_component,
            buildability,
            freshness,
            recent_interest,
            category: candidate.category.clone(),
            volume: candidate.volume,
            growth_pct: candidate.growth_pct,
        })
    }

    /// Score every candidate, apply the floor, and sort by score descending.
    /// The sort is stable, so equal scores keep their input order.
    pub fn score_all(&self, candidates: &[CandidateTerm], series: &SeriesMap) -> Vec<ScoredTrend> {
        let mut scored: Vec<ScoredTrend> = candidates
            .iter()
            .filter_map(|c| self.score_one(c, series.get(&c.term).map(Vec::as_slice)))
            .collect();
        scored.sort_by(|a, b| b.score.total_cmp(&a.score));
        scored
    }
}

/// Map a growth percentage onto 0-100: linear up to 1500%, saturated
/// beyond it. Declining terms bottom out at zero.
pub fn growth_score(growth_pct: f64) -> f64 {
    let clamped = growth_pct.clamp(0.0, 1500.0);
    round1(clamped / 1500.0 * 100.0)
}

/// Map the provider's absolute volume estimate onto 0-100.
pub fn volume_score(volume: u64) -> f64 {
    if volume >= 500_000 {
        100.0
    } else if volume >= 100_000 {
        75.0
    } else if volume >= 50_000 {
        60.0
    } else if volume >= 10_000 {
        40.0
    } else if volume >= 1_000 {
        20.0
    } else {
        5.0
    }
}

/// 100 while the series peak sits inside the last week, decaying to 10
/// once the peak is more than three weeks old. Ties go to the earliest
/// peak, which is the pessimistic reading.
pub fn freshness_score(series: &[f64]) -> f64 {
    if series.is_empty() {
        return 50.0;
    }
    let mut peak_idx = 0;
    for (i, v) in series.iter().enumerate() {
        if *v > series[peak_idx] {
            peak_idx = i;
        }
    }
    let days_since = series.len() - 1 - peak_idx;
    if days_since <= 7 {
        100.0
    } else if days_since <= 14 {
        65.0
    } else if days_since <= 21 {
        35.0
    } else {
        10.0
    }
}

/// Growth percentage of the last `window` points against the `window`
/// before them. None when the series is too short to compare.
pub fn series_growth_pct(series: &[f64], window: usize) -> Option<f64> {
    if window == 0 || series.len() < window * 2 {
        return None;
    }
    let recent = mean(&series[series.len() - window..]);
    let prior = mean(&series[series.len() - 2 * window..series.len() - window]);
    if prior < f64::EPSILON {
        // A rise from a dead baseline reads as maximally steep; the
        // interest floor keeps zero-audience spikes out of the report.
        return Some(if recent < f64::EPSILON { 0.0 } else { recent * 100.0 });
    }
    Some((recent - prior) / prior * 100.0)
}

fn tail(series: &[f64], window: usize) -> &[f64] {
    &series[series.len().saturating_sub(window)..]
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

fn round1(x: f64) -> f64 {
    (x * 10.0).round() / 10.0
}
