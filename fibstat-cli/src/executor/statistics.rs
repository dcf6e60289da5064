//! Statistics Computation
//!
//! Summary statistics for every benchmark result, computed in parallel with
//! Rayon. Each benchmark's samples are processed independently:
//! - Central tendency (mean, median)
//! - Dispersion (std dev, min, max)
//! - Percentiles (p25, p50, p75, p90, p99)
//! - Outlier detection via the IQR method

use super::execution::BenchExecutionResult;
use fibstat_stats::{OutlierMethod, SummaryStatistics, compute_summary};
use rayon::prelude::*;

/// Compute statistics for benchmark results (parallelized with Rayon)
///
/// Returns `(benchmark_id, statistics)` pairs in input order; `None` for
/// benchmarks without samples (crashed or skipped).
pub fn compute_statistics(
    results: &[BenchExecutionResult],
    method: OutlierMethod,
) -> Vec<(String, Option<SummaryStatistics>)> {
    results
        .par_iter()
        .map(|r| {
            if r.samples.is_empty() {
                (r.benchmark_id.clone(), None)
            } else {
                (r.benchmark_id.clone(), Some(compute_summary(&r.samples, method)))
            }
        })
        .collect()
}
