#![warn(missing_docs)]
//! # fibstat
//!
//! Several ways to compute the same two functions, and a harness to time
//! them against each other:
//! - **Fibonacci**: naive double recursion, a shallow cache, full recursive
//!   memoization, and a linear loop; all return `u64` for `0 <= n <= 93`
//! - **Population standard deviation**: a mean/variance formula over
//!   iterators, hand-written indexed loops, and Welford's algorithm
//! - **Timing**: batched sampling, IQR outlier filtering, percentiles
//! - **Comparison**: speedup of every variant against the reference
//!   variant, an `n` sweep, and SVG charts of both
//!
//! ## Quick Start
//!
//! ```
//! use fibstat::{FibVariant, StdDevVariant, fib, std_dev};
//!
//! assert_eq!(fib(13).unwrap(), 233);
//! assert_eq!(FibVariant::Iterative.evaluate(20).unwrap(), 6765);
//!
//! let sd = std_dev(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]).unwrap();
//! assert!((sd - 2.0).abs() < 1e-12);
//! assert!(StdDevVariant::Native.evaluate(&[]).is_err());
//! ```
//!
//! ## Command Line
//!
//! ```text
//! fibstat fib 30
//! fibstat stddev 2 4 4 4 5 5 7 9
//! fibstat bench --n 25 --format json --output target/fibstat/bench.json
//! fibstat sweep --max 20
//! fibstat plot target/fibstat/bench.json
//! ```

// Re-export core types
pub use fibstat_core::{
    Bencher, BenchmarkDef, BenchmarkResult, CacheStats, FibCache, FibError, FibVariant,
    MAX_FIB_INDEX, StdDevError, StdDevVariant, VariantParseError, fib, fib_benchmarks, fib_cached,
    fib_iterative, random_dataset, run_benchmark_loop, std_dev, std_dev_library, std_dev_native,
    stddev_benchmarks, sweep_benchmarks, with_default_cache,
};

// Re-export stats
pub use fibstat_stats::{
    OutlierMethod, RunningStats, SpeedupEntry, SummaryStatistics, compare_speedups,
    compute_summary, population_std_dev,
};

// Re-export report
pub use fibstat_report::{
    ChartOptions, Report, Theme, chart_from_report, generate_csv_report, generate_json_report,
    parse_json_report,
};

/// Run the fibstat CLI.
///
/// ```ignore
/// fn main() -> anyhow::Result<()> {
///     fibstat::run()
/// }
/// ```
pub use fibstat_cli::run;
