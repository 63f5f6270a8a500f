use num_integer::Integer;

use crate::util::isqrt;

/// The smallest number of values worth handing to a worker of its own. Below this, spawning the
/// task costs more than sieving the values.
pub const MIN_SEGMENT_LEN: u64 = 1 << 15;

/// A closed range `[start, end]` of values above the base-prime limit, sieved independently of
/// every other segment.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct Segment {
    pub start: u64,
    pub end: u64,
}

impl Segment {
    /// The number of values in the segment. Planned segments are never empty.
    #[allow(clippy::len_without_is_empty)]
    #[must_use]
    pub fn len(&self) -> u64 {
        self.end - self.start + 1
    }
}

/// How many segments to split the range above `sqrt(n)` into.
#[derive(Copy, Clone, Debug)]
pub enum SegmentCount {
    Fixed(usize),
    /// Computed from the length of the range and the number of worker threads.
    Heuristic(fn(u64, usize) -> usize),
}

impl SegmentCount {
    #[must_use]
    pub fn resolve(&self, range_len: u64, workers: usize) -> usize {
        match *self {
            SegmentCount::Fixed(count) => count,
            SegmentCount::Heuristic(heuristic) => heuristic(range_len, workers),
        }
    }
}

impl Default for SegmentCount {
    fn default() -> Self {
        SegmentCount::Heuristic(balanced_segment_count)
    }
}

/// One segment per worker, but never so many that a segment holds fewer than
/// [`MIN_SEGMENT_LEN`] values. The result lies in `[1, max(workers, 1)]` whatever the range.
#[must_use]
pub fn balanced_segment_count(range_len: u64, workers: usize) -> usize {
    let worthwhile = Integer::div_ceil(&range_len, &MIN_SEGMENT_LEN);
    usize::try_from(worthwhile)
        .unwrap_or(usize::MAX)
        .clamp(1, workers.max(1))
}

/// Partitions `(sqrt(n), n]` into at most `count` contiguous, non-overlapping segments, in
/// ascending order.
///
/// Every segment but the last holds the same number of values, a multiple of `alignment`; the
/// last segment ends at `n` and absorbs any remainder. If `count` would yield empty segments, a
/// single segment is planned instead.
#[must_use]
pub fn plan_segments(n: u64, count: usize, alignment: u64) -> Vec<Segment> {
    assert!(n >= 2, "nothing to segment below 2, got {}", n);
    assert!(count > 0, "segment count must be positive");
    assert!(alignment > 0, "alignment must be positive");

    let sqrt_n = isqrt(n);
    let first = sqrt_n + 1;
    let range_len = n - sqrt_n;

    let mut count = count as u64;
    let mut segment_size = range_len / count;
    if segment_size == 0 {
        count = 1;
        segment_size = range_len;
    }
    let segment_size = Integer::next_multiple_of(&segment_size, &alignment);
    let count = count.min(Integer::div_ceil(&range_len, &segment_size));

    (0..count)
        .map(|i| {
            let start = first + i * segment_size;
            let end = if i + 1 == count {
                n
            } else {
                start + segment_size - 1
            };
            Segment { start, end }
        })
        .collect()
}
