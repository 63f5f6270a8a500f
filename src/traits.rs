/// Something that can list every prime up to an inclusive bound.
pub trait PrimeGenerator {
    /// Returns all primes `<= n` in ascending order.
    fn primes_up_to(&self, n: u64) -> Vec<u64>;

    /// Returns the largest prime `<= n`, if there is one.
    fn largest_prime_up_to(&self, n: u64) -> Option<u64> {
        self.primes_up_to(n).last().copied()
    }
}
