use crate::traits::PrimeGenerator;
use crate::util::{isqrt, prime_count_upper_bound};

/// The trial division method, for generating primes or testing a single number.
#[derive(Copy, Clone, Debug, Default)]
pub struct TrialDivision;

impl TrialDivision {
    #[must_use]
    pub fn is_prime(n: u64) -> bool {
        if n < 2 {
            return false;
        }

        let mut divisor = 2;
        while divisor <= n / divisor {
            if n % divisor == 0 {
                return false;
            }
            divisor += 1;
        }
        true
    }
}

impl PrimeGenerator for TrialDivision {
    /// Tests each candidate against the primes found so far, up to its square root.
    fn primes_up_to(&self, n: u64) -> Vec<u64> {
        let mut primes: Vec<u64> = Vec::with_capacity(prime_count_upper_bound(n));
        for candidate in 2..=n {
            let sqrt_candidate = isqrt(candidate);
            let is_prime = primes
                .iter()
                .take_while(|&&p| p <= sqrt_candidate)
                .all(|&p| candidate % p != 0);
            if is_prime {
                primes.push(candidate);
            }
        }
        primes
    }
}

#[cfg(test)]
mod tests {
    use crate::{PrimeGenerator, TrialDivision};

    #[test]
    fn is_prime() {
        assert!(!TrialDivision::is_prime(0));
        assert!(!TrialDivision::is_prime(1));
        assert!(TrialDivision::is_prime(2));
        assert!(TrialDivision::is_prime(3));
        assert!(!TrialDivision::is_prime(4));
        assert!(TrialDivision::is_prime(5));
        assert!(!TrialDivision::is_prime(6));
        assert!(TrialDivision::is_prime(7));
        assert!(!TrialDivision::is_prime(8));
        assert!(!TrialDivision::is_prime(9));
        assert!(TrialDivision::is_prime(4_294_967_291));
        assert!(!TrialDivision::is_prime(4_294_967_291 * 3));
    }

    #[test]
    fn primes_up_to() {
        assert_eq!(TrialDivision.primes_up_to(0), vec![]);
        assert_eq!(TrialDivision.primes_up_to(1), vec![]);
        assert_eq!(TrialDivision.primes_up_to(2), vec![2]);
        assert_eq!(TrialDivision.primes_up_to(30), vec![2, 3, 5, 7, 11, 13, 17, 19, 23, 29]);
    }
}
