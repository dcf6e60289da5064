//! Summary Statistics
//!
//! Central tendency and spread come from the CLEANED samples; extremes and
//! percentiles come from ALL samples.

use crate::dispersion::RunningStats;
use crate::outliers::{OutlierAnalysis, OutlierMethod, detect_outliers};
use crate::percentiles::{Percentiles, compute_percentile, compute_percentiles};

/// Summary of one benchmark's timing samples (nanoseconds)
#[derive(Debug, Clone)]
pub struct SummaryStatistics {
    // From cleaned data
    /// Mean of the cleaned samples
    pub mean: f64,
    /// Median of the cleaned samples
    pub median: f64,
    /// Sample standard deviation (n - 1)
    pub std_dev: f64,

    // From all data
    /// Smallest sample
    pub min: f64,
    /// Largest sample
    pub max: f64,
    /// Percentiles over all samples
    pub percentiles: Percentiles,

    /// Samples collected
    pub sample_count: usize,
    /// Samples flagged as outliers
    pub outlier_count: usize,
    /// Outlier fences and flags
    pub outlier_analysis: OutlierAnalysis,
}

/// Compute summary statistics, keeping cleaned and raw views separate
pub fn compute_summary(samples: &[f64], outlier_method: OutlierMethod) -> SummaryStatistics {
    let analysis = detect_outliers(samples, outlier_method);
    let cleaned = &analysis.cleaned_samples;
    let all = &analysis.all_samples;

    let running: RunningStats = cleaned.iter().copied().collect();
    let mean = running.mean().unwrap_or(0.0);
    let std_dev = running.sample_std_dev().unwrap_or(0.0);
    let median = if cleaned.is_empty() {
        0.0
    } else {
        compute_percentile(cleaned, 50.0)
    };

    let min = all.iter().copied().reduce(f64::min).unwrap_or(0.0);
    let max = all.iter().copied().reduce(f64::max).unwrap_or(0.0);

    SummaryStatistics {
        mean,
        median,
        std_dev,
        min,
        max,
        percentiles: compute_percentiles(all),
        sample_count: all.len(),
        outlier_count: analysis.outlier_indices.len(),
        outlier_analysis: analysis,
    }
}

impl SummaryStatistics {
    /// Coefficient of variation in percent
    pub fn coefficient_of_variation(&self) -> f64 {
        if self.mean == 0.0 {
            0.0
        } else {
            (self.std_dev / self.mean) * 100.0
        }
    }

    /// Interquartile range over all samples
    pub fn iqr(&self) -> f64 {
        self.percentiles.p75 - self.percentiles.p25
    }

    /// Low relative spread
    pub fn is_stable(&self, cv_threshold: f64) -> bool {
        self.coefficient_of_variation() < cv_threshold
    }

    /// Operations per second implied by the mean, `None` for a zero mean
    pub fn throughput(&self) -> Option<f64> {
        (self.mean > 0.0).then(|| 1_000_000_000.0 / self.mean)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_summary() {
        let summary = compute_summary(&[1.0, 2.0, 3.0, 4.0, 5.0], OutlierMethod::default());

        assert!((summary.mean - 3.0).abs() < 1e-12);
        assert!((summary.median - 3.0).abs() < 1e-12);
        assert!((summary.std_dev - 2.5f64.sqrt()).abs() < 1e-12);
        assert_eq!(summary.min, 1.0);
        assert_eq!(summary.max, 5.0);
        assert_eq!(summary.sample_count, 5);
        assert!((summary.iqr() - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_outlier_handling() {
        let summary = compute_summary(&[1.0, 2.0, 3.0, 4.0, 5.0, 100.0], OutlierMethod::default());

        // Mean excludes the outlier, max keeps it
        assert!(summary.mean < 10.0);
        assert_eq!(summary.max, 100.0);
        assert!(summary.percentiles.p99 > 50.0);
        assert_eq!(summary.outlier_count, 1);
    }

    #[test]
    fn test_coefficient_of_variation() {
        let summary = compute_summary(&[100.0; 5], OutlierMethod::None);
        assert_eq!(summary.coefficient_of_variation(), 0.0);
        assert!(summary.is_stable(1.0));
    }

    #[test]
    fn test_throughput() {
        let summary = compute_summary(&[1000.0, 1000.0], OutlierMethod::None);
        assert!((summary.throughput().unwrap() - 1_000_000.0).abs() < 1e-6);
    }

    #[test]
    fn test_empty_samples() {
        let summary = compute_summary(&[], OutlierMethod::default());
        assert_eq!(summary.sample_count, 0);
        assert_eq!(summary.mean, 0.0);
        assert!(summary.throughput().is_none());
    }
}
