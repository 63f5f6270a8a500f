use thiserror::Error;

#[derive(Debug, Error)]
pub enum SieveError {
    #[error("invalid bound {0}: bounds must be non-negative")]
    InvalidBound(i64),
    #[error("worker count must be positive")]
    ZeroWorkers,
    #[error("segment count must be positive")]
    ZeroSegments,
    #[error("invalid value {value:?} for {name}")]
    InvalidConfig { name: &'static str, value: String },
    #[error("failed to build worker pool")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

impl SieveError {
    /// Accepts a bound from outside the crate, rejecting negative values.
    pub fn check_bound(n: i64) -> Result<u64, SieveError> {
        u64::try_from(n).map_err(|_| SieveError::InvalidBound(n))
    }
}
