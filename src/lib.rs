mod bit_sieve;
mod config;
mod eratosthenes;
mod error;
mod segment;
mod segmented;
mod traits;
mod trial_division;
mod util;


pub use bit_sieve::*;
pub use config::*;
pub use eratosthenes::*;
pub use error::*;
pub use segment::*;
pub use segmented::*;
pub use traits::*;
pub use trial_division::*;
pub use util::isqrt;
