use std::collections::HashSet;

use async_trait::async_trait;

use crate::config::TopicMap;
use crate::errors::TrendError;
use crate::models::CandidateTerm;
use crate::pacing::CallPacer;
use crate::trends::TrendsClient;

/// One way of obtaining candidate terms. Strategies are tried in order;
/// a failing or empty strategy hands over to the next one.
#[async_trait]
pub trait DiscoveryStrategy: Send + Sync {
    fn name(&self) -> &'static str;

    async fn discover(&self, geo: &str) -> Result<Vec<CandidateTerm>, TrendError>;
}

/// Primary source: the trending JSON endpoint, restricted to tracked
/// categories.
pub struct TrendingNowStrategy {
    client: TrendsClient,
    topics: TopicMap,
}

impl TrendingNowStrategy {
    pub fn new(client: TrendsClient, topics: TopicMap) -> Self {
        Self { client, topics }
    }
}

#[async_trait]
impl DiscoveryStrategy for TrendingNowStrategy {
    fn name(&self) -> &'static str {
        "trending API"
    }

    async fn discover(&self, geo: &str) -> Result<Vec<CandidateTerm>, TrendError> {
        self.client.trending_now(geo, &self.topics).await
    }
}

/// Fallback source: the public RSS feed. Coarser signals, but it keeps a
/// scan alive when the JSON endpoint is refusing us.
pub struct RssFeedStrategy {
    client: TrendsClient,
}

impl RssFeedStrategy {
    pub fn new(client: TrendsClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl DiscoveryStrategy for RssFeedStrategy {
    fn name(&self) -> &'static str {
        "trending RSS"
    }

    async fn discover(&self, geo: &str) -> Result<Vec<CandidateTerm>, TrendError> {
        self.client.trending_rss(geo).await
    }
}

/// Run the strategies in order through the pacer until one returns terms.
///
/// Duplicate terms (case-insensitive) keep their first occurrence. A
/// strategy that fails or comes back empty hands over to the next; the
/// last error only surfaces when every strategy failed. When at least one
/// strategy answered but none had terms, the result is an empty list and
/// the caller decides what an empty day means.
pub async fn discover_candidates(
    strategies: &[Box<dyn DiscoveryStrategy>],
    pacer: &CallPacer,
    geo: &str,
) -> Result<Vec<CandidateTerm>, TrendError> {
    let mut last_error: Option<TrendError> = None;
    let mut any_answered = false;

    for strategy in strategies {
        match pacer.call(|| strategy.discover(geo)).await {
            Ok(candidates) => {
                any_answered = true;
                let candidates = dedupe_by_term(candidates);
                if !candidates.is_empty() {
                    return Ok(candidates);
                }
                eprintln!("⚠ {} returned no terms, trying the next source", strategy.name());
            }
            Err(e) => {
                eprintln!("⚠ {} failed: {}, trying the next source", strategy.name(), e);
                last_error = Some(e);
            }
        }
    }

    if any_answered {
        return Ok(Vec::new());
    }
    Err(match last_error {
        Some(e) => e,
        None => TrendError::ProviderUnavailable("no discovery strategies configured".to_string()),
    })
}

fn dedupe_by_term(candidates: Vec<CandidateTerm>) -> Vec<CandidateTerm> {
    let mut seen = HashSet::new();
    candidates
        .into_iter()
        .filter(|c| seen.insert(c.term.to_lowercase()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    enum Behavior {
        Terms(Vec<&'static str>),
        Empty,
        Fail,
    }

    struct FakeStrategy {
        label: &'static str,
        behavior: Behavior,
        calls: Arc<AtomicUsize>,
    }

    impl FakeStrategy {
        fn boxed(
            label: &'static str,
            behavior: Behavior,
            calls: &Arc<AtomicUsize>,
        ) -> Box<dyn DiscoveryStrategy> {
            Box::new(Self {
                label,
                behavior,
                calls: Arc::clone(calls),
            })
        }
    }

    #[async_trait]
    impl DiscoveryStrategy for FakeStrategy {
        fn name(&self) -> &'static str {
            self.label
        }

        async fn discover(&self, _geo: &str) -> Result<Vec<CandidateTerm>, TrendError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.behavior {
                Behavior::Terms(terms) => Ok(terms
                    .iter()
                    .map(|t| CandidateTerm::new(*t, 10_000, 0.0, "unknown"))
                    .collect()),
                Behavior::Empty => Ok(Vec::new()),
                Behavior::Fail => Err(TrendError::ProviderUnavailable("boom".to_string())),
            }
        }
    }

    fn fast_pacer() -> CallPacer {
        CallPacer::new(Duration::from_millis(1), Duration::from_millis(1))
    }

    // ==================== Fallback Tests ====================

    #[tokio::test]
    async fn test_primary_success_skips_fallback() {
        let primary_calls = Arc::new(AtomicUsize::new(0));
        let fallback_calls = Arc::new(AtomicUsize::new(0));
        let strategies = vec![
            FakeStrategy::boxed("primary", Behavior::Terms(vec!["meal planner"]), &primary_calls),
            FakeStrategy::boxed("fallback", Behavior::Terms(vec!["unused"]), &fallback_calls),
        ];

        let candidates = discover_candidates(&strategies, &fast_pacer(), "US")
            .await
            .unwrap();

        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].term, "meal planner");
        assert_eq!(primary_calls.load(Ordering::SeqCst), 1);
        assert_eq!(fallback_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_failure_falls_back_to_next_source() {
        let primary_calls = Arc::new(AtomicUsize::new(0));
        let fallback_calls = Arc::new(AtomicUsize::new(0));
        let strategies = vec![
            FakeStrategy::boxed("primary", Behavior::Fail, &primary_calls),
            FakeStrategy::boxed(
                "fallback",
                Behavior::Terms(vec!["budget tracker"]),
                &fallback_calls,
            ),
        ];

        let candidates = discover_candidates(&strategies, &fast_pacer(), "US")
            .await
            .unwrap();

        assert_eq!(candidates[0].term, "budget tracker");
        assert_eq!(fallback_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_empty_source_also_falls_back() {
        let primary_calls = Arc::new(AtomicUsize::new(0));
        let fallback_calls = Arc::new(AtomicUsize::new(0));
        let strategies = vec![
            FakeStrategy::boxed("primary", Behavior::Empty, &primary_calls),
            FakeStrategy::boxed(
                "fallback",
                Behavior::Terms(vec!["budget tracker"]),
                &fallback_calls,
            ),
        ];

        let candidates = discover_candidates(&strategies, &fast_pacer(), "US")
            .await
            .unwrap();

        assert_eq!(candidates.len(), 1);
        assert_eq!(fallback_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_all_failures_surface_the_last_error() {
        let calls = Arc::new(AtomicUsize::new(0));
        let strategies = vec![
            FakeStrategy::boxed("primary", Behavior::Fail, &calls),
            FakeStrategy::boxed("fallback", Behavior::Fail, &calls),
        ];

        let result = discover_candidates(&strategies, &fast_pacer(), "US").await;

        assert!(matches!(result, Err(TrendError::ProviderUnavailable(_))));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_all_empty_returns_empty_not_error() {
        let calls = Arc::new(AtomicUsize::new(0));
        let strategies = vec![
            FakeStrategy::boxed("primary", Behavior::Empty, &calls),
            FakeStrategy::boxed("fallback", Behavior::Empty, &calls),
        ];

        let candidates = discover_candidates(&strategies, &fast_pacer(), "US")
            .await
            .unwrap();

        assert!(candidates.is_empty());
    }

    #[tokio::test]
    async fn test_duplicates_keep_first_occurrence() {
        let calls = Arc::new(AtomicUsize::new(0));
        let strategies = vec![FakeStrategy::boxed(
            "primary",
            Behavior::Terms(vec!["Meal Planner", "budget tracker", "meal planner"]),
            &calls,
        )];

        let candidates = discover_candidates(&strategies, &fast_pacer(), "US")
            .await
            .unwrap();

        let terms: Vec<&str> = candidates.iter().map(|c| c.term.as_str()).collect();
        assert_eq!(terms, vec!["Meal Planner", "budget tracker"]);
    }
}
