//! Benchmark Definitions
//!
//! Builds the runnable benchmark set for each evaluator family.

use crate::bencher::Bencher;
use crate::fib::{FibCache, FibError, fib_iterative};
use crate::variant::{FibVariant, StdDevVariant};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::hint::black_box;
use std::sync::{Arc, Mutex, PoisonError};

/// Group of the fixed-`n` Fibonacci benchmarks
pub const FIB_GROUP: &str = "fib";
/// Group of the standard-deviation benchmarks
pub const STDDEV_GROUP: &str = "stddev";
/// Group of the Fibonacci `n` sweep
pub const SWEEP_GROUP: &str = "fib-sweep";

/// Benchmark body
pub type Runner = Arc<dyn Fn(&mut Bencher) + Send + Sync>;

/// A runnable benchmark
#[derive(Clone)]
pub struct BenchmarkDef {
    /// Unique identifier, `group/variant[/input]`
    pub id: String,
    /// Human-readable name
    pub name: String,
    /// Group; each group is compared against its own baseline
    pub group: String,
    /// Variant identifier
    pub variant: String,
    /// Input description (`n`, or dataset length)
    pub input: String,
    /// Body
    pub runner: Runner,
}

impl std::fmt::Debug for BenchmarkDef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BenchmarkDef")
            .field("id", &self.id)
            .field("group", &self.group)
            .field("variant", &self.variant)
            .field("input", &self.input)
            .finish_non_exhaustive()
    }
}

fn fib_runner(variant: FibVariant, n: i64) -> Runner {
    match variant {
        FibVariant::Naive | FibVariant::Iterative => {
            Arc::new(move |b: &mut Bencher| b.iter(|| variant.evaluate(black_box(n))))
        }
        // Warm cache shared by every iteration of this benchmark: the first
        // call misses, the rest are lookups.
        FibVariant::Cached => {
            let cache = Mutex::new(FibCache::new());
            Arc::new(move |b: &mut Bencher| {
                let mut cache = cache.lock().unwrap_or_else(PoisonError::into_inner);
                b.iter(|| cache.get(black_box(n)));
            })
        }
        // Cold cache per iteration, so the cost of memoizing is what gets timed.
        FibVariant::Memoized => Arc::new(move |b: &mut Bencher| {
            b.iter_with_setup(FibCache::new, |mut cache| {
                cache.get_memoized(black_box(n))
            })
        }),
    }
}

/// One benchmark per Fibonacci variant at index `n`
pub fn fib_benchmarks(n: i64) -> Result<Vec<BenchmarkDef>, FibError> {
    fib_iterative(n)?;
    Ok(FibVariant::ALL
        .into_iter()
        .map(|variant| BenchmarkDef {
            id: format!("{}/{}", FIB_GROUP, variant.id()),
            name: format!("{} fib({})", variant.label(), n),
            group: FIB_GROUP.to_string(),
            variant: variant.id().to_string(),
            input: n.to_string(),
            runner: fib_runner(variant, n),
        })
        .collect())
}

/// One benchmark per standard-deviation variant over `values`
pub fn stddev_benchmarks(values: Arc<[f64]>) -> Vec<BenchmarkDef> {
    StdDevVariant::ALL
        .into_iter()
        .map(|variant| {
            let data = Arc::clone(&values);
            BenchmarkDef {
                id: format!("{}/{}", STDDEV_GROUP, variant.id()),
                name: format!("{} ({} values)", variant.label(), values.len()),
                group: STDDEV_GROUP.to_string(),
                variant: variant.id().to_string(),
                input: values.len().to_string(),
                runner: Arc::new(move |b: &mut Bencher| {
                    b.iter(|| variant.evaluate(black_box(&data)))
                }),
            }
        })
        .collect()
}

/// Every `variant` at every `n` in `0..max_n`
pub fn sweep_benchmarks(
    max_n: i64,
    variants: &[FibVariant],
) -> Result<Vec<BenchmarkDef>, FibError> {
    if max_n > 0 {
        fib_iterative(max_n - 1)?;
    } else if max_n < 0 {
        return Err(FibError::NegativeIndex(max_n));
    }

    let mut defs = Vec::with_capacity(max_n as usize * variants.len());
    for n in 0..max_n {
        for &variant in variants {
            defs.push(BenchmarkDef {
                id: format!("{}/{}/{}", SWEEP_GROUP, variant.id(), n),
                name: format!("{} fib({})", variant.label(), n),
                group: SWEEP_GROUP.to_string(),
                variant: variant.id().to_string(),
                input: n.to_string(),
                runner: fib_runner(variant, n),
            });
        }
    }
    Ok(defs)
}

/// Deterministic dataset of `len` values uniform in `[0, 100)`
pub fn random_dataset(len: usize, seed: u64) -> Vec<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..len).map(|_| rng.gen_range(0.0..100.0)).collect()
}
