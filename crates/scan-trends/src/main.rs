use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;
use shared::{
    category_breakdown, discover_candidates, CallPacer, CandidateTerm, Config, DailyReport,
    DiscoveryStrategy, FilterRules, NoiseFilter, RssFeedStrategy, ScoreWeights, ScoredTrend,
    Scorer, SeriesMap, TopicMap, TrendError, TrendingNowStrategy, TrendsClient,
};
use std::collections::HashSet;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "scan-trends")]
#[command(about = "Scan Google Trends for buildable product opportunities and write a daily report")]
struct Args {
    /// Geography code to scan (e.g. US, GB, DE)
    #[arg(short, long)]
    geo: Option<String>,

    /// Directory that receives the dated JSON reports
    #[arg(short, long)]
    out_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let mut config = Config::from_env()?;
    if let Some(geo) = args.geo {
        config.geo = geo;
    }
    if let Some(dir) = args.out_dir {
        config.reports_dir = dir;
    }

    let today = Local::now().format("%Y-%m-%d").to_string();
    println!("📅 Trend scan for {} (geo: {})", today, config.geo);

    let client = TrendsClient::new()?;
    let pacer = CallPacer::new(config.request_delay, config.rate_limit_cooldown);
    let strategies: Vec<Box<dyn DiscoveryStrategy>> = vec![
        Box::new(TrendingNowStrategy::new(client.clone(), TopicMap::default())),
        Box::new(RssFeedStrategy::new(client.clone())),
    ];

    println!("\n🔍 Fetching trending terms...");
    let candidates = discover_candidates(&strategies, &pacer, &config.geo)
        .await
        .context("Failed to discover trending terms")?;
    println!("✓ {} terms in tracked categories", candidates.len());

    let filter = NoiseFilter::new(FilterRules::default());
    let survivors = filter.apply(candidates);
    println!("✓ {} terms after noise filter", survivors.len());

    let scorer = Scorer::new(ScoreWeights::default(), config.min_recent_interest);
    let trends = match collect_trends(&survivors, &scorer, &client, &pacer, &config).await {
        Ok(trends) => trends,
        Err(TrendError::NoCandidatesSurvived) => {
            // A quiet day still gets its report, so downstream consumers
            // see "nothing today" rather than a gap.
            println!("⚠ Nothing survived the filters today, writing an empty report");
            Vec::new()
        }
        Err(e) => return Err(e).context("Trend scoring failed"),
    };

    let report = DailyReport::new(today, config.geo.clone(), trends);
    let path = shared::report::write_report(&config.reports_dir, &report)
        .context("Failed to write the daily report")?;

    println!(
        "\n✅ {} trends written to {}",
        report.trends.len(),
        path.display()
    );
    print_summary(&report);

    Ok(())
}

/// Quick-score the filter survivors, keep the top slice, enrich it with
/// interest series unless configured off, and re-score. Fails with
/// `NoCandidatesSurvived` when filtering or the interest floor removed
/// everything.
async fn collect_trends(
    survivors: &[CandidateTerm],
    scorer: &Scorer,
    client: &TrendsClient,
    pacer: &CallPacer,
    config: &Config,
) -> Result<Vec<ScoredTrend>, TrendError> {
    if survivors.is_empty() {
        return Err(TrendError::NoCandidatesSurvived);
    }

    // Quick pass: provider signals only, no extra API calls.
    let mut quick = scorer.score_all(survivors, &SeriesMap::new());
    if quick.is_empty() {
        return Err(TrendError::NoCandidatesSurvived);
    }
    quick.truncate(config.top_n);

    if config.skip_series {
        return Ok(quick);
    }

    // Re-feed the top slice in discoverer order so equal re-scores keep
    // a stable ranking.
    let top_terms: HashSet<&str> = quick.iter().map(|t| t.term.as_str()).collect();
    let top_candidates: Vec<CandidateTerm> = survivors
        .iter()
        .filter(|c| top_terms.contains(c.term.as_str()))
        .cloned()
        .collect();

    println!(
        "\n📈 Fetching interest series for {} terms...",
        top_candidates.len()
    );
    let terms: Vec<String> = top_candidates.iter().map(|c| c.term.clone()).collect();
    let mut series = SeriesMap::new();
    for batch in terms.chunks(config.series_batch_size) {
        match pacer
            .call(|| client.interest_over_time(batch, &config.geo, &config.timeframe))
            .await
        {
            Ok(map) => series.extend(map),
            // Terms in a failed batch simply keep their quick scores.
            Err(e) => eprintln!("⚠ Series fetch failed for a batch of {}: {}", batch.len(), e),
        }
    }
    println!("✓ Series for {}/{} terms", series.len(), terms.len());

    let enriched = scorer.score_all(&top_candidates, &series);
    if enriched.is_empty() {
        return Err(TrendError::NoCandidatesSurvived);
    }
    Ok(enriched)
}

/// Per-category breakdown for quick scanning.
fn print_summary(report: &DailyReport) {
    if report.trends.is_empty() {
        return;
    }

    println!("\n{:<20} {:>5}  {:>4}  Top term", "Category", "Count", "Avg");
    println!("{}", "-".repeat(65));
    for row in category_breakdown(&report.trends) {
        println!(
            "  {:<18} {:>5}  {:>4.0}  {}",
            row.category, row.count, row.avg_score, row.top_term
        );
    }
}
