use crate::bit_sieve::BitSieve;
use crate::traits::PrimeGenerator;
use crate::util::{isqrt, prime_count_upper_bound, to_index};

/// The classic, single-threaded Sieve of Eratosthenes over `[0, limit]`.
#[derive(Copy, Clone, Debug, Default)]
pub struct SieveOfEratosthenes;

impl SieveOfEratosthenes {
    /// Sieves `[0, limit]`. The bits left set are exactly the primes `<= limit`.
    #[must_use]
    pub fn sieve(limit: u64) -> BitSieve {
        let mut is_prime = BitSieve::new(to_index(limit) + 1);
        is_prime.clear(0);
        if limit < 2 {
            if limit == 1 {
                is_prime.clear(1);
            }
            return is_prime;
        }
        is_prime.clear(1);

        // 2 is the only even prime; after this only odd candidates need sieving.
        for multiple in (4..=limit).step_by(2) {
            is_prime.clear(to_index(multiple));
        }

        let sqrt_limit = isqrt(limit);
        for candidate in (3..=sqrt_limit).step_by(2) {
            if !is_prime.get(to_index(candidate)) {
                continue;
            }
            // Even multiples are already cleared.
            for multiple in (candidate * candidate..=limit).step_by(to_index(2 * candidate)) {
                is_prime.clear(to_index(multiple));
            }
        }

        is_prime
    }

    /// Generate all primes up to a given `limit`, inclusive.
    #[must_use]
    pub fn generate(limit: u64) -> Vec<u64> {
        let mut primes = Vec::with_capacity(prime_count_upper_bound(limit));
        primes.extend(Self::sieve(limit).iter_ones().map(|i| i as u64));
        primes
    }
}

impl PrimeGenerator for SieveOfEratosthenes {
    fn primes_up_to(&self, n: u64) -> Vec<u64> {
        Self::generate(n)
    }
}

/// The primes needed to sieve any range of values up to some bound `n`, namely every prime
/// `<= floor(sqrt(n))`. Immutable once computed.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BasePrimes {
    limit: u64,
    primes: Vec<u64>,
}

impl BasePrimes {
    #[must_use]
    pub fn for_bound(n: u64) -> Self {
        let limit = isqrt(n);
        Self {
            limit,
            primes: SieveOfEratosthenes::generate(limit),
        }
    }

    /// The (inclusive) limit these primes were sieved to.
    #[must_use]
    pub fn limit(&self) -> u64 {
        self.limit
    }

    #[must_use]
    pub fn primes(&self) -> &[u64] {
        &self.primes
    }

    /// Whether these primes suffice to sieve values up to `n`.
    #[must_use]
    pub fn covers(&self, n: u64) -> bool {
        isqrt(n) <= self.limit
    }

    #[must_use]
    pub fn into_vec(self) -> Vec<u64> {
        self.primes
    }
}
