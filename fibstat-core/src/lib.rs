#![warn(missing_docs)]
//! fibstat Core
//!
//! The evaluators and the runtime that times them:
//! - Fibonacci: naive recursion, shallow cache, recursive memo, loop
//! - Population standard deviation: formula, indexed loops, Welford library
//! - Variant registry addressing every strategy by id
//! - `Bencher` batched sampling and the benchmark definitions built on it

mod bencher;
mod fib;
mod measure;
mod stddev;
mod suite;
mod variant;

pub use bencher::{
    Bencher, BenchmarkResult, DEFAULT_SAMPLE_COUNT, MIN_SAMPLE_COUNT, Sample, run_benchmark_loop,
};
pub use fib::{
    CacheStats, FibCache, FibError, MAX_FIB_INDEX, SLOW_FIB_INDEX, fib, fib_cached, fib_iterative,
    with_default_cache,
};
pub use measure::{Timer, duration_to_ns};
pub use stddev::{StdDevError, std_dev, std_dev_library, std_dev_native};
pub use suite::{
    BenchmarkDef, FIB_GROUP, Runner, STDDEV_GROUP, SWEEP_GROUP, fib_benchmarks, random_dataset,
    stddev_benchmarks, sweep_benchmarks,
};
pub use variant::{FibVariant, StdDevVariant, VariantParseError};
