//! Outlier Detection
//!
//! Outliers are flagged, never discarded from the raw data: mean, median and
//! standard deviation use the cleaned samples while min, max and percentiles
//! keep everything.

use crate::DEFAULT_IQR_FENCE;
use crate::dispersion::RunningStats;
use crate::percentiles::compute_percentile;

/// Method for outlier detection
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OutlierMethod {
    /// Tukey fences: outside `[Q1 - fence*IQR, Q3 + fence*IQR]`
    Iqr {
        /// IQR multiplier (1.5 is the classic choice)
        fence: f64,
    },
    /// Beyond `threshold` population standard deviations from the mean
    ZScore {
        /// Number of standard deviations
        threshold: f64,
    },
    /// Keep every sample
    None,
}

impl Default for OutlierMethod {
    fn default() -> Self {
        OutlierMethod::Iqr {
            fence: DEFAULT_IQR_FENCE,
        }
    }
}

/// Result of outlier analysis
#[derive(Debug, Clone)]
pub struct OutlierAnalysis {
    /// Original samples, in input order
    pub all_samples: Vec<f64>,
    /// Samples inside the bounds
    pub cleaned_samples: Vec<f64>,
    /// Indices (into `all_samples`) of flagged samples
    pub outlier_indices: Vec<usize>,
    /// Samples below `lower_bound`
    pub low_outlier_count: usize,
    /// Samples above `upper_bound`
    pub high_outlier_count: usize,
    /// Inclusive lower bound
    pub lower_bound: f64,
    /// Inclusive upper bound
    pub upper_bound: f64,
    /// Method used
    pub method: OutlierMethod,
}

impl OutlierAnalysis {
    /// Percentage of samples flagged as outliers
    pub fn outlier_percentage(&self) -> f64 {
        if self.all_samples.is_empty() {
            return 0.0;
        }
        (self.outlier_indices.len() as f64 / self.all_samples.len() as f64) * 100.0
    }

    /// Too many outliers usually means a noisy machine
    pub fn is_noisy(&self, threshold_pct: f64) -> bool {
        self.outlier_percentage() > threshold_pct
    }

    fn partition(samples: &[f64], lower: f64, upper: f64, method: OutlierMethod) -> Self {
        let mut analysis = OutlierAnalysis {
            all_samples: samples.to_vec(),
            cleaned_samples: Vec::with_capacity(samples.len()),
            outlier_indices: Vec::new(),
            low_outlier_count: 0,
            high_outlier_count: 0,
            lower_bound: lower,
            upper_bound: upper,
            method,
        };

        for (i, &sample) in samples.iter().enumerate() {
            if sample < lower {
                analysis.outlier_indices.push(i);
                analysis.low_outlier_count += 1;
            } else if sample > upper {
                analysis.outlier_indices.push(i);
                analysis.high_outlier_count += 1;
            } else {
                analysis.cleaned_samples.push(sample);
            }
        }
        analysis
    }
}

/// Detect outliers in samples using the given method
///
/// ```
/// # use fibstat_stats::{detect_outliers, OutlierMethod};
/// let analysis = detect_outliers(&[1.0, 2.0, 3.0, 4.0, 5.0, 100.0], OutlierMethod::default());
/// assert_eq!(analysis.high_outlier_count, 1);
/// ```
pub fn detect_outliers(samples: &[f64], method: OutlierMethod) -> OutlierAnalysis {
    if samples.is_empty() {
        return OutlierAnalysis::partition(samples, 0.0, 0.0, method);
    }

    match method {
        OutlierMethod::None => {
            OutlierAnalysis::partition(samples, f64::NEG_INFINITY, f64::INFINITY, method)
        }
        OutlierMethod::Iqr { fence } => {
            let q1 = compute_percentile(samples, 25.0);
            let q3 = compute_percentile(samples, 75.0);
            let iqr = q3 - q1;
            OutlierAnalysis::partition(samples, q1 - fence * iqr, q3 + fence * iqr, method)
        }
        OutlierMethod::ZScore { threshold } => {
            let stats: RunningStats = samples.iter().copied().collect();
            let mean = stats.mean().unwrap_or(0.0);
            let sd = stats.population_std_dev().unwrap_or(0.0);
            // Zero spread: bounds collapse onto the mean and nothing is flagged.
            OutlierAnalysis::partition(
                samples,
                mean - threshold * sd,
                mean + threshold * sd,
                method,
            )
        }
    }
}
