//! Dispersion
//!
//! Welford's streaming algorithm for mean and variance. This is the numeric
//! library the "library" standard-deviation variant delegates to: one pass,
//! numerically stable, no intermediate allocation.

/// Streaming accumulator for count, mean and sum of squared deviations.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RunningStats {
    count: u64,
    mean: f64,
    m2: f64,
}

impl RunningStats {
    /// Create an empty accumulator
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one observation
    #[inline]
    pub fn push(&mut self, value: f64) {
        self.count += 1;
        let delta = value - self.mean;
        self.mean += delta / self.count as f64;
        self.m2 += delta * (value - self.mean);
    }

    /// Number of observations
    pub fn count(&self) -> u64 {
        self.count
    }

    /// Arithmetic mean, `None` when empty
    pub fn mean(&self) -> Option<f64> {
        (self.count > 0).then_some(self.mean)
    }

    /// Variance dividing by `n`
    pub fn population_variance(&self) -> Option<f64> {
        (self.count > 0).then(|| self.m2 / self.count as f64)
    }

    /// Variance dividing by `n - 1`; needs at least two observations
    pub fn sample_variance(&self) -> Option<f64> {
        (self.count > 1).then(|| self.m2 / (self.count - 1) as f64)
    }

    /// Population standard deviation
    pub fn population_std_dev(&self) -> Option<f64> {
        self.population_variance().map(f64::sqrt)
    }

    /// Sample standard deviation
    pub fn sample_std_dev(&self) -> Option<f64> {
        self.sample_variance().map(f64::sqrt)
    }

    /// Merge another accumulator (Chan et al. parallel update)
    pub fn merge(&mut self, other: &RunningStats) {
        if other.count == 0 {
            return;
        }
        if self.count == 0 {
            *self = *other;
            return;
        }
        let total = self.count + other.count;
        let delta = other.mean - self.mean;
        self.mean += delta * other.count as f64 / total as f64;
        self.m2 += other.m2 + delta * delta * (self.count as f64 * other.count as f64) / total as f64;
        self.count = total;
    }
}

impl Extend<f64> for RunningStats {
    fn extend<I: IntoIterator<Item = f64>>(&mut self, iter: I) {
        for value in iter {
            self.push(value);
        }
    }
}

impl FromIterator<f64> for RunningStats {
    fn from_iter<I: IntoIterator<Item = f64>>(iter: I) -> Self {
        let mut stats = RunningStats::new();
        stats.extend(iter);
        stats
    }
}

/// Arithmetic mean of `values`, `None` when empty
pub fn mean(values: &[f64]) -> Option<f64> {
    values.iter().copied().collect::<RunningStats>().mean()
}

/// Population standard deviation of `values`, `None` when empty
///
/// # Examples
///
/// ```
/// # use fibstat_stats::population_std_dev;
/// let sd = population_std_dev(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]).unwrap();
/// assert!((sd - 2.0).abs() < 1e-12);
/// ```
pub fn population_std_dev(values: &[f64]) -> Option<f64> {
    let scale = magnitude_scale(values);
    values
        .iter()
        .map(|x| x * scale)
        .collect::<RunningStats>()
        .population_std_dev()
        .map(|sd| sd / scale)
}

/// Magnitudes outside this window get rescaled before squaring
const RESCALE_ABOVE: f64 = 1e100;
const RESCALE_BELOW: f64 = 1e-100;

/// Power of two that brings the largest magnitude in `values` near 1.0.
///
/// Returns `1.0` when squaring the values can neither overflow nor underflow,
/// so ordinary inputs are computed unscaled. Multiplying by a power of two is
/// exact, and a standard deviation never exceeds the largest magnitude, so
/// `sd(values * scale) / scale` stays finite.
pub fn magnitude_scale(values: &[f64]) -> f64 {
    let max_abs = values
        .iter()
        .filter(|v| v.is_finite())
        .fold(0.0_f64, |acc, v| acc.max(v.abs()));
    if max_abs == 0.0 || (RESCALE_BELOW..=RESCALE_ABOVE).contains(&max_abs) {
        return 1.0;
    }
    let exponent = max_abs.log2().floor().clamp(-1022.0, 1022.0);
    (-exponent).exp2()
}
