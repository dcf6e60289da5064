//! Bencher - The Benchmark Iteration API
//!
//! Criterion-style batched sampling: warmup estimates the cost of one call,
//! then measurement groups calls into samples so that each sample is the
//! average of many iterations.

use crate::measure::Timer;
use std::time::Instant;
use tracing::debug;

/// Default number of samples to collect
pub const DEFAULT_SAMPLE_COUNT: usize = 100;

/// Minimum samples for a meaningful summary
pub const MIN_SAMPLE_COUNT: usize = 10;

/// One sample: the average over `iterations` timed calls
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sample {
    /// Mean nanoseconds per call in this sample
    pub duration_nanos: u64,
    /// Calls averaged into this sample
    pub iterations: u64,
}

/// Result of one benchmark run
#[derive(Debug, Clone)]
pub struct BenchmarkResult {
    /// Collected samples
    pub samples: Vec<Sample>,
    /// Measured calls (warmup included)
    pub iterations: u64,
    /// Sum of per-sample mean times
    pub total_time_ns: u64,
}

/// Iteration control handed to every benchmark runner
pub struct Bencher {
    current_sample_time_ns: u64,
    current_sample_iters: u64,

    samples: Vec<Sample>,

    target_samples: usize,
    iters_per_sample: u64,

    total_iterations: u64,
    is_warmup: bool,
    warmup_times: Vec<u64>,
}

impl Default for Bencher {
    fn default() -> Self {
        Self::new()
    }
}

impl Bencher {
    /// Bencher collecting [`DEFAULT_SAMPLE_COUNT`] samples
    pub fn new() -> Self {
        Self::with_target_samples(DEFAULT_SAMPLE_COUNT)
    }

    /// Bencher collecting `target_samples` samples (at least [`MIN_SAMPLE_COUNT`])
    pub fn with_target_samples(target_samples: usize) -> Self {
        let target_samples = target_samples.max(MIN_SAMPLE_COUNT);
        Self {
            current_sample_time_ns: 0,
            current_sample_iters: 0,
            samples: Vec::with_capacity(target_samples),
            target_samples,
            iters_per_sample: 1,
            total_iterations: 0,
            is_warmup: true,
            warmup_times: Vec::with_capacity(1000),
        }
    }

    /// Override the batch size
    pub fn set_iters_per_sample(&mut self, iters: u64) {
        self.iters_per_sample = iters.max(1);
    }

    /// Mean warmup iteration time
    pub fn estimated_iter_time_ns(&self) -> Option<u64> {
        if self.warmup_times.is_empty() {
            return None;
        }
        let sum: u64 = self.warmup_times.iter().sum();
        Some((sum / self.warmup_times.len() as u64).max(1))
    }

    /// Leave warmup; size batches so `target_samples` fill `measurement_time_ns`
    pub fn start_measurement(&mut self, measurement_time_ns: u64) {
        self.is_warmup = false;

        self.iters_per_sample = match self.estimated_iter_time_ns() {
            Some(iter_time) => {
                let time_per_sample = measurement_time_ns / self.target_samples as u64;
                (time_per_sample / iter_time).max(1)
            }
            None => 1,
        };
        debug!(
            iters_per_sample = self.iters_per_sample,
            warmup_iterations = self.warmup_times.len(),
            "measurement phase"
        );

        self.warmup_times.clear();
        self.warmup_times.shrink_to_fit();
        self.current_sample_time_ns = 0;
        self.current_sample_iters = 0;
    }

    #[inline]
    fn accumulate(&mut self, duration_nanos: u64) {
        self.total_iterations += 1;

        if self.is_warmup {
            self.warmup_times.push(duration_nanos);
            return;
        }

        self.current_sample_time_ns = self.current_sample_time_ns.saturating_add(duration_nanos);
        self.current_sample_iters += 1;
        if self.current_sample_iters >= self.iters_per_sample {
            self.flush_sample();
        }
    }

    /// Time one call of `f`
    #[inline]
    pub fn iter<T, F>(&mut self, mut f: F)
    where
        F: FnMut() -> T,
    {
        let timer = Timer::start();
        let _ = std::hint::black_box(f());
        let nanos = timer.stop();
        self.accumulate(nanos);
    }

    /// Time `routine` only; `setup` runs untimed before it
    #[inline]
    pub fn iter_with_setup<T, S, F, R>(&mut self, mut setup: S, mut routine: F)
    where
        S: FnMut() -> T,
        F: FnMut(T) -> R,
    {
        let input = setup();
        let timer = Timer::start();
        let _ = std::hint::black_box(routine(input));
        let nanos = timer.stop();
        self.accumulate(nanos);
    }

    fn flush_sample(&mut self) {
        if self.current_sample_iters == 0 || self.samples.len() >= self.target_samples {
            return;
        }

        let n = self.current_sample_iters;
        self.samples.push(Sample {
            duration_nanos: self.current_sample_time_ns / n,
            iterations: n,
        });

        self.current_sample_time_ns = 0;
        self.current_sample_iters = 0;
    }

    /// Target reached
    pub fn has_enough_samples(&self) -> bool {
        self.samples.len() >= self.target_samples
    }

    /// Samples so far
    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    /// Calls made so far, warmup included
    pub fn iteration_count(&self) -> u64 {
        self.total_iterations
    }

    /// Target sample count
    pub fn target_samples(&self) -> usize {
        self.target_samples
    }

    /// Flush the partial sample and return the result
    pub fn finish(mut self) -> BenchmarkResult {
        self.flush_sample();
        let total_time_ns = self.samples.iter().map(|s| s.duration_nanos).sum();
        BenchmarkResult {
            samples: self.samples,
            iterations: self.total_iterations,
            total_time_ns,
        }
    }
}

/// Warmup, then measure until the sample target or the time budget is met.
///
/// `min_iterations` is honoured even past the time budget; `max_iterations`
/// is raised to `min_iterations` when smaller.
pub fn run_benchmark_loop<F>(
    mut bencher: Bencher,
    mut runner_fn: F,
    warmup_time_ns: u64,
    measurement_time_ns: u64,
    min_iterations: Option<u64>,
    max_iterations: Option<u64>,
) -> BenchmarkResult
where
    F: FnMut(&mut Bencher),
{
    let warmup_start = Instant::now();
    while warmup_start.elapsed().as_nanos() < u128::from(warmup_time_ns) {
        runner_fn(&mut bencher);
    }

    bencher.start_measurement(measurement_time_ns);

    let measure_start = Instant::now();
    let start_iterations = bencher.iteration_count();
    let min_iterations = min_iterations.unwrap_or(0);
    let max_iterations = max_iterations.unwrap_or(u64::MAX).max(min_iterations);

    loop {
        let done = bencher.iteration_count().saturating_sub(start_iterations);
        if done >= max_iterations {
            break;
        }
        let time_up = measure_start.elapsed().as_nanos() >= u128::from(measurement_time_ns);
        if (bencher.has_enough_samples() || time_up) && done >= min_iterations {
            break;
        }
        runner_fn(&mut bencher);
    }

    bencher.finish()
}
