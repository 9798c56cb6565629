use std::collections::HashMap;
use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::{Client, StatusCode};
use serde::Deserialize;

use crate::config::TopicMap;
use crate::errors::TrendError;
use crate::models::{CandidateTerm, SeriesMap};
use crate::rss;

const DAILY_TRENDS_URL: &str = "https://trends.google.com/trends/api/dailytrends";
const TRENDING_RSS_URL: &str = "https://trends.google.com/trending/rss";
const EXPLORE_URL: &str = "https://trends.google.com/trends/api/explore";
const MULTILINE_URL: &str = "https://trends.google.com/trends/api/widgetdata/multiline";

/// Thin client for the unofficial Google Trends endpoints.
///
/// These are the same endpoints the trends web UI calls. They answer JSON
/// behind an anti-hijacking prefix, want a consistent language/timezone
/// pair, and rate limit aggressively; callers are expected to route every
/// request through a `CallPacer`.
#[derive(Debug, Clone)]
pub struct TrendsClient {
    client: Client,
    host_lang: String,
    tz_offset: i32,
}

impl TrendsClient {
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent("Mozilla/5.0 (compatible; TrendScout/1.0)")
            // The endpoints hand out an NID cookie on the first response;
            // clients that fail to return it get rate limited much sooner.
            .cookie_store(true)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            host_lang: "en-US".to_string(),
            tz_offset: 0,
        })
    }

    /// Fetch today's trending searches for `geo`, keeping only terms in
    /// tracked categories.
    pub async fn trending_now(
        &self,
        geo: &str,
        topics: &TopicMap,
    ) -> Result<Vec<CandidateTerm>, TrendError> {
        let url = format!(
            "{DAILY_TRENDS_URL}?hl={}&tz={}&geo={geo}&ns=15",
            self.host_lang, self.tz_offset
        );
        let body = self.fetch_text(&url).await?;
        parse_trending_body(&body, topics)
    }

    /// Fetch the public trending RSS feed for `geo`. Coarser than the JSON
    /// endpoint (no growth, no category) but served from a different,
    /// less defended path.
    pub async fn trending_rss(&self, geo: &str) -> Result<Vec<CandidateTerm>, TrendError> {
        let url = format!("{TRENDING_RSS_URL}?geo={geo}");
        let body = self.fetch_text(&url).await?;
        rss::parse_trending_rss(&body)
    }

    /// Fetch daily interest series for up to five terms in one payload.
    ///
    /// Two requests under the hood: explore issues a widget token, then the
    /// multiline endpoint answers with the actual series. Terms the provider
    /// returned no data for are absent from the result map.
    pub async fn interest_over_time(
        &self,
        terms: &[String],
        geo: &str,
        timeframe: &str,
    ) -> Result<SeriesMap, TrendError> {
        if terms.is_empty() {
            return Ok(SeriesMap::new());
        }
        if terms.len() > 5 {
            return Err(TrendError::ProviderUnavailable(format!(
                "interest_over_time takes at most 5 terms per request, got {}",
                terms.len()
            )));
        }

        let comparison: Vec<serde_json::Value> = terms
            .iter()
            .map(|term| {
                serde_json::json!({
                    "keyword": term,
                    "geo": geo,
                    "time": timeframe,
                })
            })
            .collect();
        let explore_req = serde_json::json!({
            "comparisonItem": comparison,
            "category": 0,
            "property": "",
        });

        let url = format!(
            "{EXPLORE_URL}?hl={}&tz={}&req={}",
            self.host_lang,
            self.tz_offset,
            urlencoding::encode(&explore_req.to_string())
        );
        let body = self.fetch_text(&url).await?;
        let (token, widget_req) = parse_explore_body(&body)?;

        let url = format!(
            "{MULTILINE_URL}?hl={}&tz={}&req={}&token={}",
            self.host_lang,
            self.tz_offset,
            urlencoding::encode(&widget_req.to_string()),
            urlencoding::encode(&token)
        );
        let body = self.fetch_text(&url).await?;
        parse_multiline_body(&body, terms)
    }

    async fn fetch_text(&self, url: &str) -> Result<String, TrendError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| TrendError::ProviderUnavailable(e.to_string()))?;
        let response = check_status(response).await?;
        response
            .text()
            .await
            .map_err(|e| TrendError::ProviderUnavailable(e.to_string()))
    }
}

async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, TrendError> {
    let status = response.status();
    if status == StatusCode::TOO_MANY_REQUESTS {
        return Err(TrendError::RateLimited);
    }
    if !status.is_success() {
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| String::from("unknown error"));
        return Err(TrendError::ProviderUnavailable(format!(
            "{} - {}",
            status, body
        )));
    }
    Ok(response)
}

/// The JSON endpoints prepend an anti-hijacking garbage line (`)]}'`).
/// Its exact length varies by endpoint, so scan to the first JSON byte.
fn strip_xssi_prefix(body: &str) -> &str {
    match body.find(|c| c == '{' || c == '[') {
        Some(idx) => &body[idx..],
        None => body,
    }
}

/// Parse traffic estimates like "50K+", "1,200+" or "2M+" into a count.
/// Unparseable strings degrade to 0, which the volume curve treats as
/// negligible.
pub(crate) fn parse_approx_traffic(raw: &str) -> u64 {
    let cleaned = raw.trim().trim_end_matches('+').replace(',', "");
    if cleaned.is_empty() {
        return 0;
    }
    let (digits, multiplier) = match cleaned.chars().last() {
        Some('K') | Some('k') => (&cleaned[..cleaned.len() - 1], 1_000f64),
        Some('M') | Some('m') => (&cleaned[..cleaned.len() - 1], 1_000_000f64),
        _ => (cleaned.as_str(), 1f64),
    };
    let value: f64 = digits.trim().parse().unwrap_or(0.0);
    (value * multiplier) as u64
}

#[derive(Debug, Deserialize)]
struct TrendingResponse {
    default: TrendingDefault,
}

#[derive(Debug, Deserialize)]
struct TrendingDefault {
    #[serde(rename = "trendingSearches")]
    trending_searches: Vec<TrendingSearch>,
}

#[derive(Debug, Deserialize)]
struct TrendingSearch {
    title: SearchTitle,
    #[serde(rename = "formattedTraffic", default)]
    formatted_traffic: String,
    #[serde(rename = "trafficGrowthPct", default)]
    traffic_growth_pct: f64,
    #[serde(rename = "categoryId", default)]
    category_id: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct SearchTitle {
    query: String,
}

fn parse_trending_body(
    body: &str,
    topics: &TopicMap,
) -> Result<Vec<CandidateTerm>, TrendError> {
    let payload = strip_xssi_prefix(body);
    let parsed: TrendingResponse = serde_json::from_str(payload)
        .map_err(|e| TrendError::ProviderUnavailable(format!("unexpected trending payload: {e}")))?;

    let mut candidates = Vec::new();
    for entry in parsed.default.trending_searches {
        // Untracked categories (sports, entertainment, politics) are
        // dropped here rather than left for the noise filter.
        let category = match entry.category_id.and_then(|id| topics.slug(id)) {
            Some(slug) => slug.to_string(),
            None => continue,
        };
        candidates.push(CandidateTerm {
            term: entry.title.query,
            volume: parse_approx_traffic(&entry.formatted_traffic),
            growth_pct: entry.traffic_growth_pct,
            category,
        });
    }
    Ok(candidates)
}

#[derive(Debug, Deserialize)]
struct ExploreResponse {
    widgets: Vec<ExploreWidget>,
}

#[derive(Debug, Deserialize)]
struct ExploreWidget {
    id: String,
    #[serde(default)]
    token: Option<String>,
    #[serde(default)]
    request: Option<serde_json::Value>,
}

fn parse_explore_body(body: &str) -> Result<(String, serde_json::Value), TrendError> {
    let payload = strip_xssi_prefix(body);
    let parsed: ExploreResponse = serde_json::from_str(payload)
        .map_err(|e| TrendError::ProviderUnavailable(format!("unexpected explore payload: {e}")))?;

    let widget = parsed
        .widgets
        .into_iter()
        .find(|w| w.id == "TIMESERIES")
        .ok_or_else(|| {
            TrendError::ProviderUnavailable("explore response had no TIMESERIES widget".to_string())
        })?;

    match (widget.token, widget.request) {
        (Some(token), Some(request)) => Ok((token, request)),
        _ => Err(TrendError::ProviderUnavailable(
            "TIMESERIES widget came without a token".to_string(),
        )),
    }
}

#[derive(Debug, Deserialize)]
struct MultilineResponse {
    default: MultilineDefault,
}

#[derive(Debug, Deserialize)]
struct MultilineDefault {
    #[serde(rename = "timelineData")]
    timeline_data: Vec<TimelinePoint>,
}

#[derive(Debug, Deserialize)]
struct TimelinePoint {
    #[serde(default)]
    value: Vec<f64>,
}

fn parse_multiline_body(body: &str, terms: &[String]) -> Result<SeriesMap, TrendError> {
    let payload = strip_xssi_prefix(body);
    let parsed: MultilineResponse = serde_json::from_str(payload).map_err(|e| {
        TrendError::ProviderUnavailable(format!("unexpected multiline payload: {e}"))
    })?;

    // Each timeline point carries one value per requested term, in
    // request order.
    let mut series: SeriesMap = HashMap::new();
    for (i, term) in terms.iter().enumerate() {
        let values: Vec<f64> = parsed
            .default
            .timeline_data
            .iter()
            .map(|point| point.value.get(i).copied().unwrap_or(0.0))
            .collect();
        if !values.is_empty() {
            series.insert(term.clone(), values);
        }
    }
    Ok(series)
}
