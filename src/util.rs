/// Computes `ceil(a / b)`. Assumes `a + b` does not overflow.
#[must_use]
pub const fn ceil_div_usize(a: usize, b: usize) -> usize {
    (a + b - 1) / b
}

/// Computes `floor(sqrt(n))` exactly, without going through floating point.
#[must_use]
pub fn isqrt(n: u64) -> u64 {
    num_integer::sqrt(n)
}

/// An upper bound on the number of primes `<= n`, used to pre-size output vectors.
///
/// Uses Rosser and Schoenfeld's bound `pi(n) < 1.25506 n / ln n`, which holds for all `n > 1`.
#[must_use]
pub(crate) fn prime_count_upper_bound(n: u64) -> usize {
    if n < 17 {
        return 7;
    }
    let n_float = n as f64;
    (1.25506 * n_float / n_float.ln()) as usize + 1
}

/// Converts a value known to index in-memory storage to `usize`.
#[must_use]
pub(crate) fn to_index(n: u64) -> usize {
    usize::try_from(n).unwrap_or_else(|_| panic!("{} does not fit in usize", n))
}
