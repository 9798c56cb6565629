use std::path::PathBuf;

use thiserror::Error;

/// Failure taxonomy for the daily pipeline.
///
/// `RateLimited` is transient: the call pacer retries it exactly once after a
/// cooldown before escalating to `ProviderUnavailable`. `NoCandidatesSurvived`
/// is not fatal; the pipeline answers it with an empty report and exit code 0.
/// The other variants abort the run with a non-zero exit code.
#[derive(Debug, Error)]
pub enum TrendError {
    #[error("trends provider unavailable: {0}")]
    ProviderUnavailable(String),

    #[error("trends provider rate limited the request")]
    RateLimited,

    #[error("no candidate terms survived filtering")]
    NoCandidatesSurvived,

    #[error("failed to write report to {}: {source}", path.display())]
    WriteFailure {
        path: PathBuf,
        source: std::io::Error,
    },
}
