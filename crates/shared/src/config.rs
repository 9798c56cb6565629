use anyhow::{Context, Result};
use std::collections::HashMap;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Runtime configuration for the daily scan. Everything has a working
/// default; environment variables (or a .env file) override.
#[derive(Debug, Clone)]
pub struct Config {
    /// Geography code passed to the provider, e.g. "US".
    pub geo: String,
    /// Directory that receives one trends_<date>.json per day.
    pub reports_dir: PathBuf,
    /// How many top-scored terms survive the quick pass.
    pub top_n: usize,
    /// Skip interest-series enrichment (faster, coarser scores).
    pub skip_series: bool,
    /// Provider timeframe for interest series.
    pub timeframe: String,
    /// Terms per interest-over-time request; the API caps payloads at 5.
    pub series_batch_size: usize,
    /// Pause after every successful provider call.
    pub request_delay: Duration,
    /// Pause before the single retry after a rate-limit response.
    pub rate_limit_cooldown: Duration,
    /// Recent-interest floor (0-100); terms below it are dropped.
    pub min_recent_interest: f64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        // Try to load .env from multiple locations
        Self::try_load_dotenv();

        let reports_dir = match env::var("TREND_SCOUT_REPORTS_DIR") {
            Ok(dir) => PathBuf::from(dir),
            Err(_) => default_reports_dir()?,
        };

        let series_batch_size: usize = parse_env("TREND_SCOUT_SERIES_BATCH", 5)?;
        if series_batch_size == 0 {
            anyhow::bail!("TREND_SCOUT_SERIES_BATCH has an invalid value: '0' (must be at least 1)");
        }

        Ok(Self {
            geo: env::var("TREND_SCOUT_GEO").unwrap_or_else(|_| "US".to_string()),
            reports_dir,
            top_n: parse_env("TREND_SCOUT_TOP", 15)?,
            skip_series: env_flag("TREND_SCOUT_SKIP_SERIES"),
            timeframe: env::var("TREND_SCOUT_TIMEFRAME")
                .unwrap_or_else(|_| "today 1-m".to_string()),
            series_batch_size,
            request_delay: Duration::from_millis(parse_env("TREND_SCOUT_REQUEST_DELAY_MS", 2_000)?),
            rate_limit_cooldown: Duration::from_secs(parse_env("TREND_SCOUT_COOLDOWN_SECS", 60)?),
            min_recent_interest: parse_env("TREND_SCOUT_MIN_INTEREST", 15.0)?,
        })
    }

    fn try_load_dotenv() {
        // Try locations in order of preference:

        // 1. Current directory (for development)
        if dotenvy::dotenv().is_ok() {
            return;
        }

        // 2. ~/.config/trend-scout/.env (standard config location)
        if let Some(config_dir) = dirs::config_dir() {
            let config_path = config_dir.join("trend-scout").join(".env");
            if config_path.exists() {
                if dotenvy::from_path(&config_path).is_ok() {
                    return;
                }
            }
        }

        // 3. ~/.env (home directory)
        if let Some(home_dir) = dirs::home_dir() {
            let home_path = home_dir.join(".env");
            if home_path.exists() {
                if dotenvy::from_path(&home_path).is_ok() {
                    return;
                }
            }
        }

        // If none found, that's okay - environment variables might be set system-wide
    }
}

fn default_reports_dir() -> Result<PathBuf> {
    Ok(dirs::data_local_dir()
        .context("Could not determine the local data directory for reports")?
        .join("trend-scout")
        .join("reports"))
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{key} has an invalid value: '{raw}'")),
        Err(_) => Ok(default),
    }
}

fn env_flag(key: &str) -> bool {
    match env::var(key) {
        Ok(value) => matches!(value.trim().to_lowercase().as_str(), "1" | "true" | "yes"),
        Err(_) => false,
    }
}

/// Maps the provider's numeric trending categories onto the topic slugs this
/// pipeline tracks. Terms in untracked categories (sports, entertainment,
/// politics) are dropped at discovery time.
#[derive(Debug, Clone)]
pub struct TopicMap {
    tracked: HashMap<u32, String>,
}

impl TopicMap {
    pub fn from_pairs(pairs: &[(u32, &str)]) -> Self {
        Self {
            tracked: pairs
                .iter()
                .map(|(id, slug)| (*id, slug.to_string()))
                .collect(),
        }
    }

    pub fn slug(&self, category_id: u32) -> Option<&str> {
        self.tracked.get(&category_id).map(String::as_str)
    }
}

impl Default for TopicMap {
    fn default() -> Self {
        Self::from_pairs(&[
            (3, "business"),
            (8, "health"),
            (10, "education"),
            (15, "science"),
            (16, "shopping"),
            (18, "technology"),
        ])
    }
}
