use std::env;
use std::process;

use tracing::level_filters::LevelFilter;
use tracing_forest::ForestLayer;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Registry};

use primes::{PrimeGenerator, SegmentedSieve, SieveConfig, SieveError};

/// What to print once the primes are known.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
enum Mode {
    Last,
    All,
    Count,
}

impl Mode {
    fn parse(s: &str) -> Option<Self> {
        match s {
            "last" => Some(Mode::Last),
            "all" => Some(Mode::All),
            "count" => Some(Mode::Count),
            _ => None,
        }
    }
}

fn main() {
    let env_filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy();

    Registry::default()
        .with(env_filter)
        .with(ForestLayer::default())
        .init();

    let args: Vec<String> = env::args().collect();
    let mode = if args.len() == 3 {
        Mode::parse(&args[1])
    } else {
        None
    };
    let Some(mode) = mode else {
        println!("Usage: {} <last|all|count> <bound>", args[0]);
        return;
    };
    let bound: i64 = args[2].parse().expect("Failed to parse bound");

    if let Err(err) = run(mode, bound) {
        eprintln!("Error: {}", err);
        process::exit(1);
    }
}

fn run(mode: Mode, bound: i64) -> Result<(), SieveError> {
    let n = SieveError::check_bound(bound)?;
    let sieve = SegmentedSieve::new(SieveConfig::from_env()?)?;
    let primes = sieve.primes_up_to(n);
    match mode {
        Mode::Last => {
            if let Some(p) = primes.last() {
                println!("{}", p);
            }
        }
        Mode::All => {
            for p in &primes {
                println!("{}", p);
            }
        }
        Mode::Count => println!("{}", primes.len()),
    }
    Ok(())
}
