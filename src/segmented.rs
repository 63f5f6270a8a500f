use num_integer::Integer;
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use tracing::{event, instrument, Level};

use crate::bit_sieve::{BitSieve, BitSliceMut};
use crate::config::{Collect, SieveConfig};
use crate::eratosthenes::BasePrimes;
use crate::error::SieveError;
use crate::segment::{plan_segments, Segment};
use crate::traits::PrimeGenerator;
use crate::util::{prime_count_upper_bound, to_index};

/// Bits per word of a [`BitSieve`]; shared-bitmap segments are aligned to this so that no two
/// workers ever touch the same word.
const BITMAP_ALIGNMENT: u64 = u64::BITS as u64;

/// Lists all primes `<= n` with a default [`SegmentedSieve`].
///
/// Negative bounds are rejected before any work is done; bounds below 2 yield no primes.
pub fn primes_up_to(n: i64) -> Result<Vec<u64>, SieveError> {
    let n = SieveError::check_bound(n)?;
    Ok(SegmentedSieve::default().primes_up_to(n))
}

/// Sieves one segment against the base primes and returns the primes it contains, ascending.
///
/// Panics if the segment reaches into the base range, or beyond what the base primes can sieve.
#[must_use]
pub fn sieve_segment(segment: Segment, base: &BasePrimes) -> Vec<u64> {
    let mut sieve = BitSieve::new(to_index(segment.len()));
    mark_composites(segment, base, &mut sieve.as_mut_slice());

    let mut primes = Vec::with_capacity(sieve.count_ones());
    primes.extend(sieve.iter_ones().map(|j| segment.start + j as u64));
    event!(
        Level::TRACE,
        "Segment [{}, {}] has {} primes",
        segment.start,
        segment.end,
        primes.len()
    );
    primes
}

/// Clears every composite in `segment`, where bit `j` of `bits` stands for `segment.start + j`.
fn mark_composites(segment: Segment, base: &BasePrimes, bits: &mut BitSliceMut<'_>) {
    assert!(
        segment.start <= segment.end,
        "empty segment [{}, {}]",
        segment.start,
        segment.end
    );
    assert!(
        segment.start > base.limit(),
        "segment [{}, {}] overlaps the base range [0, {}]",
        segment.start,
        segment.end,
        base.limit()
    );
    assert!(
        base.covers(segment.end),
        "base primes up to {} cannot sieve up to {}",
        base.limit(),
        segment.end
    );
    assert_eq!(bits.len() as u64, segment.len());

    for &p in base.primes() {
        let p_squared = p * p;
        if p_squared > segment.end {
            break;
        }
        // Smaller multiples of p also have a smaller prime factor, which has cleared them.
        let first = p_squared.max(Integer::next_multiple_of(&segment.start, &p));
        for multiple in (first..=segment.end).step_by(to_index(p)) {
            bits.clear(to_index(multiple - segment.start));
        }
    }
}

/// The segmented, parallel Sieve of Eratosthenes.
///
/// Primes up to `sqrt(n)` are found with a plain sieve. The rest of the range is split into
/// segments which are sieved concurrently, each by a worker that owns its storage outright, and
/// the results are joined in segment order. The output is therefore sorted without a final sort,
/// and is identical whatever the segment count.
#[derive(Debug, Default)]
pub struct SegmentedSieve {
    config: SieveConfig,
    pool: Option<ThreadPool>,
}

impl SegmentedSieve {
    pub fn new(config: SieveConfig) -> Result<Self, SieveError> {
        config.validate()?;
        let pool = config
            .worker_count
            .map(|threads| {
                ThreadPoolBuilder::new()
                    .num_threads(threads)
                    .thread_name(|i| format!("sieve-worker-{}", i))
                    .build()
            })
            .transpose()?;
        Ok(Self { config, pool })
    }

    #[must_use]
    pub fn config(&self) -> &SieveConfig {
        &self.config
    }

    /// The number of threads segments will be spread over.
    #[must_use]
    pub fn worker_count(&self) -> usize {
        self.pool
            .as_ref()
            .map_or_else(rayon::current_num_threads, ThreadPool::current_num_threads)
    }
}

impl PrimeGenerator for SegmentedSieve {
    #[instrument(skip(self), fields(collect = ?self.config.collect))]
    fn primes_up_to(&self, n: u64) -> Vec<u64> {
        // Too few values above sqrt(n) to be worth a worker.
        match n {
            0 | 1 => return vec![],
            2 => return vec![2],
            3 => return vec![2, 3],
            _ => {}
        }

        let base = BasePrimes::for_bound(n);
        event!(
            Level::DEBUG,
            "{} base primes up to {}",
            base.primes().len(),
            base.limit()
        );

        let range_len = n - base.limit();
        let count = self
            .config
            .segment_count
            .resolve(range_len, self.worker_count())
            .max(1);

        let collect = self.config.collect;
        let run = move || match collect {
            Collect::PrimeLists => collect_prime_lists(&plan_segments(n, count, 1), base),
            Collect::SharedBitmap => {
                collect_shared_bitmap(&plan_segments(n, count, BITMAP_ALIGNMENT), base)
            }
        };
        let primes = match &self.pool {
            Some(pool) => pool.install(run),
            None => run(),
        };
        event!(Level::DEBUG, "Found {} primes up to {}", primes.len(), n);
        primes
    }
}

fn log_plan(segments: &[Segment]) {
    event!(
        Level::DEBUG,
        "Sieving {} segments of {} values",
        segments.len(),
        segments[0].len()
    );
}

/// Sieves each segment into its own list and concatenates the lists in segment order.
fn collect_prime_lists(segments: &[Segment], base: BasePrimes) -> Vec<u64> {
    log_plan(segments);

    let segment_primes: Vec<Vec<u64>> = segments
        .par_iter()
        .map(|&segment| sieve_segment(segment, &base))
        .collect();

    let total = base.primes().len() + segment_primes.iter().map(Vec::len).sum::<usize>();
    let mut primes = base.into_vec();
    primes.reserve_exact(total - primes.len());
    for chunk in segment_primes {
        primes.extend(chunk);
    }
    primes
}

/// Sieves contiguous, word-aligned segments into one shared bitmap, then scans it once.
fn collect_shared_bitmap(segments: &[Segment], base: BasePrimes) -> Vec<u64> {
    log_plan(segments);
    assert!(
        segments.windows(2).all(|pair| pair[0].end + 1 == pair[1].start),
        "shared bitmap segments must be contiguous"
    );

    let first = segments[0].start;
    let last = segments[segments.len() - 1].end;
    let lens: Vec<usize> = segments.iter().map(|s| to_index(s.len())).collect();
    let mut sieve = BitSieve::new(lens.iter().sum());
    sieve
        .split_mut(&lens)
        .into_par_iter()
        .zip(segments.par_iter())
        .for_each(|(mut bits, &segment)| mark_composites(segment, &base, &mut bits));

    let mut primes = Vec::with_capacity(prime_count_upper_bound(last));
    primes.extend_from_slice(base.primes());
    primes.extend(sieve.iter_ones().map(|j| first + j as u64));
    primes
}
