use std::env;
use std::str::FromStr;

use crate::error::SieveError;
use crate::segment::SegmentCount;

/// Number of threads in a dedicated worker pool. Unset means the ambient rayon pool, which
/// itself honours `RAYON_NUM_THREADS`.
pub const WORKERS_VAR: &str = "PRIMES_WORKERS";
/// A fixed number of segments. Unset means [`SegmentCount::default`].
pub const SEGMENTS_VAR: &str = "PRIMES_SEGMENTS";
/// `lists` or `bitmap`; see [`Collect`].
pub const COLLECT_VAR: &str = "PRIMES_COLLECT";

/// How segment workers hand their results back.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum Collect {
    /// Each worker returns its own prime list; lists are concatenated in segment order.
    #[default]
    PrimeLists,
    /// Workers clear bits in disjoint, word-aligned parts of one shared bitmap, which is scanned
    /// once after all of them finish.
    SharedBitmap,
}

impl FromStr for Collect {
    type Err = SieveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "lists" => Ok(Collect::PrimeLists),
            "bitmap" => Ok(Collect::SharedBitmap),
            _ => Err(SieveError::InvalidConfig {
                name: COLLECT_VAR,
                value: s.to_string(),
            }),
        }
    }
}

#[derive(Copy, Clone, Debug, Default)]
pub struct SieveConfig {
    /// Threads in a dedicated worker pool, or `None` to run on the current rayon pool.
    pub worker_count: Option<usize>,
    pub segment_count: SegmentCount,
    pub collect: Collect,
}

impl SieveConfig {
    /// Reads [`WORKERS_VAR`], [`SEGMENTS_VAR`] and [`COLLECT_VAR`], defaulting whatever is unset.
    pub fn from_env() -> Result<Self, SieveError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, SieveError> {
        let mut config = Self::default();
        if let Some(value) = lookup(WORKERS_VAR) {
            config.worker_count = Some(parse_count(WORKERS_VAR, &value)?);
        }
        if let Some(value) = lookup(SEGMENTS_VAR) {
            config.segment_count = SegmentCount::Fixed(parse_count(SEGMENTS_VAR, &value)?);
        }
        if let Some(value) = lookup(COLLECT_VAR) {
            config.collect = value.trim().parse()?;
        }
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), SieveError> {
        if self.worker_count == Some(0) {
            return Err(SieveError::ZeroWorkers);
        }
        if let SegmentCount::Fixed(0) = self.segment_count {
            return Err(SieveError::ZeroSegments);
        }
        Ok(())
    }
}

fn parse_count(name: &'static str, value: &str) -> Result<usize, SieveError> {
    value
        .trim()
        .parse()
        .map_err(|_| SieveError::InvalidConfig {
            name,
            value: value.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use crate::config::{Collect, SieveConfig, COLLECT_VAR, SEGMENTS_VAR, WORKERS_VAR};
    use crate::{SegmentCount, SieveError};

    fn from_vars(vars: &[(&str, &str)]) -> Result<SieveConfig, SieveError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|&(k, v)| (k.to_string(), v.to_string()))
            .collect();
        SieveConfig::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = from_vars(&[]).unwrap();
        assert_eq!(config.worker_count, None);
        assert!(matches!(config.segment_count, SegmentCount::Heuristic(_)));
        assert_eq!(config.collect, Collect::PrimeLists);
    }

    #[test]
    fn test_all_set() {
        let config = from_vars(&[
            (WORKERS_VAR, "4"),
            (SEGMENTS_VAR, " 16 "),
            (COLLECT_VAR, "bitmap"),
        ])
        .unwrap();
        assert_eq!(config.worker_count, Some(4));
        assert!(matches!(config.segment_count, SegmentCount::Fixed(16)));
        assert_eq!(config.collect, Collect::SharedBitmap);
    }

    #[test]
    fn test_invalid_values() {
        assert!(matches!(
            from_vars(&[(WORKERS_VAR, "many")]),
            Err(SieveError::InvalidConfig { name: WORKERS_VAR, .. })
        ));
        assert!(matches!(
            from_vars(&[(SEGMENTS_VAR, "-1")]),
            Err(SieveError::InvalidConfig { name: SEGMENTS_VAR, .. })
        ));
        assert!(matches!(
            from_vars(&[(COLLECT_VAR, "sorted")]),
            Err(SieveError::InvalidConfig { name: COLLECT_VAR, .. })
        ));
        assert!(matches!(
            from_vars(&[(WORKERS_VAR, "0")]),
            Err(SieveError::ZeroWorkers)
        ));
        assert!(matches!(
            from_vars(&[(SEGMENTS_VAR, "0")]),
            Err(SieveError::ZeroSegments)
        ));
    }
}
