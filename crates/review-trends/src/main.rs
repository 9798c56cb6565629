use anyhow::Result;
use clap::Parser;
use shared::{category_breakdown, list_reports, load_report, Config, DailyReport};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "review-trends")]
#[command(about = "Browse the daily trend reports written by scan-trends")]
struct Args {
    /// Path to a specific report file (defaults to the newest report)
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Reports directory to search (defaults to the configured one)
    #[arg(short, long)]
    dir: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let report = if let Some(path) = args.file {
        println!("📖 Reading report: {}", path.display());
        load_report(&path)?
    } else {
        let dir = match args.dir {
            Some(dir) => dir,
            None => Config::from_env()?.reports_dir,
        };
        let mut reports = list_reports(&dir)?;
        if reports.is_empty() {
            anyhow::bail!(
                "No reports found in {}. Run scan-trends first.",
                dir.display()
            );
        }
        let (path, report) = reports.remove(0);
        println!("📖 Newest report: {}", path.display());
        report
    };

    print_report(&report);

    Ok(())
}

fn print_report(report: &DailyReport) {
    println!("\nTrends for {} (geo: {})", report.date, report.geo);

    if report.trends.is_empty() {
        println!("\nNothing survived the filters that day.");
        return;
    }

    println!(
        "\n{:>3}  {:>5}  {:>8}  {:>8}  {:<14} Term",
        "#", "Score", "Velocity", "Interest", "Category"
    );
    println!("{}", "-".repeat(78));
    for (i, trend) in report.trends.iter().enumerate() {
        println!(
            "{:>3}  {:>5.0}  {:>8.1}  {:>8.1}  {:<14} {}",
            i + 1,
            trend.score,
            trend.velocity,
            trend.recent_interest,
            trend.category,
            trend.term
        );
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
