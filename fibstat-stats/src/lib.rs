#![warn(missing_docs)]
//! fibstat Statistical Engine
//!
//! Numeric building blocks shared by the evaluators and the timing harness:
//! - Streaming mean/variance (Welford), the "library" standard deviation
//! - Percentiles with linear interpolation
//! - Outlier detection (IQR fences or z-score)
//! - Summary statistics over timing samples
//! - Speedup tables and effect sizes for variant comparison

mod comparison;
mod dispersion;
mod outliers;
mod percentiles;
mod summary;

pub use comparison::{
    ComparisonError, EffectInterpretation, SpeedupEntry, compare_speedups, effect_size,
    relative_change,
};
pub use dispersion::{RunningStats, magnitude_scale, mean, population_std_dev};
pub use outliers::{OutlierAnalysis, OutlierMethod, detect_outliers};
pub use percentiles::{Percentiles, compute_percentile, compute_percentiles};
pub use summary::{SummaryStatistics, compute_summary};

/// Default IQR fence multiplier (Tukey)
pub const DEFAULT_IQR_FENCE: f64 = 1.5;

/// Relative tolerance used when cross-checking floating point evaluators
pub const DEFAULT_RELATIVE_TOLERANCE: f64 = 1e-9;

/// Whether `a` and `b` agree within `tolerance`, relative to the larger magnitude.
///
/// Values at or below `tolerance` in magnitude are compared absolutely so that
/// results near zero do not demand impossible precision.
pub fn approx_eq(a: f64, b: f64, tolerance: f64) -> bool {
    if a == b {
        return true;
    }
    let scale = a.abs().max(b.abs());
    if scale <= tolerance {
        return (a - b).abs() <= tolerance;
    }
    (a - b).abs() / scale <= tolerance
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constants() {
        assert!((DEFAULT_IQR_FENCE - 1.5).abs() < f64::EPSILON);
        assert!((DEFAULT_RELATIVE_TOLERANCE - 1e-9).abs() < f64::EPSILON);
    }

    #[test]
    fn test_approx_eq_relative() {
        assert!(approx_eq(1_000_000.0, 1_000_000.000_1, 1e-9));
        assert!(!approx_eq(1.0, 1.001, 1e-9));
    }

    #[test]
    fn test_approx_eq_near_zero() {
        assert!(approx_eq(0.0, 1e-12, 1e-9));
        assert!(!approx_eq(0.0, 1e-3, 1e-9));
    }
}
