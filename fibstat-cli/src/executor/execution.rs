//! Benchmark Execution
//!
//! Runs each planned benchmark in-process, one after the other, so timings
//! never compete for cores. A panic inside a benchmark is caught and the
//! benchmark is reported as crashed; the rest of the run continues.
//!
//! ```text
//! BenchmarkDef
//!      │
//!      ▼
//! ExecutionConfig ──▶ Executor: Warmup → Measurement → Sample Collection
//!                          │
//!                          ▼
//!                BenchExecutionResult (samples, status, iterations)
//! ```

use fibstat_core::{Bencher, BenchmarkDef, DEFAULT_SAMPLE_COUNT, run_benchmark_loop};
use fibstat_report::BenchmarkStatus;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Instant;

/// Configuration for benchmark execution
#[derive(Debug, Clone)]
pub struct ExecutionConfig {
    /// Warmup time in nanoseconds
    pub warmup_time_ns: u64,
    /// Measurement time in nanoseconds
    pub measurement_time_ns: u64,
    /// Minimum iterations
    pub min_iterations: Option<u64>,
    /// Maximum iterations
    pub max_iterations: Option<u64>,
    /// Samples the bencher aims for
    pub target_samples: usize,
    /// Draw a progress bar
    pub show_progress: bool,
}

impl ExecutionConfig {
    /// Fixed sample count mode: no warmup, exactly `n` iterations
    pub fn fixed_samples(n: u64) -> Self {
        Self {
            warmup_time_ns: 0,
            measurement_time_ns: 0,
            min_iterations: Some(n),
            max_iterations: Some(n),
            ..Self::default()
        }
    }
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        Self {
            warmup_time_ns: 1_000_000_000,      // 1 second
            measurement_time_ns: 3_000_000_000, // 3 seconds
            min_iterations: None,
            max_iterations: None,
            target_samples: DEFAULT_SAMPLE_COUNT,
            show_progress: true,
        }
    }
}

/// Result from executing a single benchmark
#[derive(Debug, Clone)]
pub struct BenchExecutionResult {
    /// Benchmark ID (`group/variant`)
    pub benchmark_id: String,
    /// Display name
    pub benchmark_name: String,
    /// Group the benchmark belongs to
    pub group: String,
    /// Variant identifier
    pub variant: String,
    /// Input the variant ran on
    pub input: String,
    /// Outcome of the run
    pub status: BenchmarkStatus,
    /// Mean nanoseconds per call, one entry per sample
    pub samples: Vec<f64>,
    /// Iterations measured across all samples
    pub iterations: u64,
    /// Wall time of the whole run
    pub duration_ns: u64,
    /// Panic message when the benchmark crashed
    pub error_message: Option<String>,
}

/// Execute benchmarks and produce results
pub struct Executor {
    config: ExecutionConfig,
    results: Vec<BenchExecutionResult>,
}

impl Executor {
    /// Create an executor with the given timing settings
    pub fn new(config: ExecutionConfig) -> Self {
        Self {
            config,
            results: Vec::new(),
        }
    }

    /// Execute all provided benchmarks
    pub fn execute(&mut self, benchmarks: &[BenchmarkDef]) -> Vec<BenchExecutionResult> {
        let pb = if self.config.show_progress {
            ProgressBar::new(benchmarks.len() as u64)
        } else {
            ProgressBar::hidden()
        };
        pb.set_style(
            ProgressStyle::default_bar()
                .template(
                    "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}",
                )
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("#>-"),
        );

        for bench in benchmarks {
            pb.set_message(bench.id.clone());
            let result = self.execute_single(bench);
            self.results.push(result);
            pb.inc(1);
        }

        pb.finish_and_clear();
        std::mem::take(&mut self.results)
    }

    /// Execute a single benchmark
    fn execute_single(&self, bench: &BenchmarkDef) -> BenchExecutionResult {
        let cfg = &self.config;
        let start = Instant::now();
        tracing::debug!(id = %bench.id, "running benchmark");

        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            run_benchmark_loop(
                Bencher::with_target_samples(cfg.target_samples),
                |b| (bench.runner)(b),
                cfg.warmup_time_ns,
                cfg.measurement_time_ns,
                cfg.min_iterations,
                cfg.max_iterations,
            )
        }));

        let duration_ns = start.elapsed().as_nanos().min(u128::from(u64::MAX)) as u64;

        let mut out = BenchExecutionResult {
            benchmark_id: bench.id.clone(),
            benchmark_name: bench.name.clone(),
            group: bench.group.clone(),
            variant: bench.variant.clone(),
            input: bench.input.clone(),
            status: BenchmarkStatus::Passed,
            samples: Vec::new(),
            iterations: 0,
            duration_ns,
            error_message: None,
        };

        match result {
            Ok(bench_result) if bench_result.samples.is_empty() => {
                out.status = BenchmarkStatus::Skipped;
                out.iterations = bench_result.iterations;
                out.error_message = Some("no samples collected".to_string());
            }
            Ok(bench_result) => {
                out.samples = bench_result
                    .samples
                    .iter()
                    .map(|s| s.duration_nanos as f64)
                    .collect();
                out.iterations = bench_result.iterations;
            }
            Err(panic) => {
                let message = if let Some(s) = panic.downcast_ref::<&str>() {
                    s.to_string()
                } else if let Some(s) = panic.downcast_ref::<String>() {
                    s.clone()
                } else {
                    "Unknown panic".to_string()
                };
                tracing::warn!(id = %bench.id, %message, "benchmark panicked");
                out.status = BenchmarkStatus::Crashed;
                out.error_message = Some(message);
            }
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fibstat_core::{Runner, fib_benchmarks};
    use std::sync::Arc;

    fn quiet(n: u64) -> ExecutionConfig {
        ExecutionConfig {
            show_progress: false,
            ..ExecutionConfig::fixed_samples(n)
        }
    }

    #[test]
    fn test_fixed_samples_config() {
        let cfg = ExecutionConfig::fixed_samples(25);
        assert_eq!(cfg.warmup_time_ns, 0);
        assert_eq!(cfg.min_iterations, Some(25));
        assert_eq!(cfg.max_iterations, Some(25));
    }

    #[test]
    fn test_execute_collects_samples() {
        let benches = fib_benchmarks(10).unwrap();
        let results = Executor::new(quiet(30)).execute(&benches);
        assert_eq!(results.len(), benches.len());
        for r in &results {
            assert_eq!(r.status, BenchmarkStatus::Passed, "{}", r.benchmark_id);
            assert!(!r.samples.is_empty());
            assert_eq!(r.iterations, 30);
            assert_eq!(r.input, "10");
        }
    }

    #[test]
    fn test_panic_is_reported_as_crash() {
        let runner: Runner = Arc::new(|_: &mut Bencher| panic!("exploded"));
        let bench = BenchmarkDef {
            id: "fib/broken".to_string(),
            name: "broken".to_string(),
            group: "fib".to_string(),
            variant: "broken".to_string(),
            input: "1".to_string(),
            runner,
        };
        let results = Executor::new(quiet(5)).execute(&[bench]);
        assert_eq!(results[0].status, BenchmarkStatus::Crashed);
        assert_eq!(results[0].error_message.as_deref(), Some("exploded"));
        assert!(results[0].samples.is_empty());
    }
}
