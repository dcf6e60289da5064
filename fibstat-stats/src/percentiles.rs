//! Percentile Computation
//!
//! Percentiles come from the raw timing samples, outliers included: a slow
//! tail is part of what a variant costs.

/// Percentiles reported for every benchmark
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Percentiles {
    /// 25th percentile (first quartile)
    pub p25: f64,
    /// 50th percentile (median)
    pub p50: f64,
    /// 75th percentile (third quartile)
    pub p75: f64,
    /// 90th percentile
    pub p90: f64,
    /// 99th percentile
    pub p99: f64,
}

/// Percentile of an already sorted slice, linear interpolation between ranks
fn percentile_of_sorted(sorted: &[f64], percentile: f64) -> f64 {
    match sorted.len() {
        0 => 0.0,
        1 => sorted[0],
        n => {
            let rank = (percentile.clamp(0.0, 100.0) / 100.0) * (n - 1) as f64;
            let lower = rank.floor() as usize;
            let upper = (lower + 1).min(n - 1);
            let fraction = rank - lower as f64;
            sorted[lower] + fraction * (sorted[upper] - sorted[lower])
        }
    }
}

fn sorted_copy(samples: &[f64]) -> Vec<f64> {
    let mut sorted = samples.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    sorted
}

/// Compute a single percentile (0-100) from unsorted samples
///
/// Returns `0.0` for an empty slice.
///
/// # Examples
///
/// ```
/// # use fibstat_stats::compute_percentile;
/// let samples = [5.0, 1.0, 4.0, 2.0, 3.0];
/// assert_eq!(compute_percentile(&samples, 50.0), 3.0);
/// ```
pub fn compute_percentile(samples: &[f64], percentile: f64) -> f64 {
    percentile_of_sorted(&sorted_copy(samples), percentile)
}

/// Compute all reported percentiles with a single sort
pub fn compute_percentiles(samples: &[f64]) -> Percentiles {
    let sorted = sorted_copy(samples);
    Percentiles {
        p25: percentile_of_sorted(&sorted, 25.0),
        p50: percentile_of_sorted(&sorted, 50.0),
        p75: percentile_of_sorted(&sorted, 75.0),
        p90: percentile_of_sorted(&sorted, 90.0),
        p99: percentile_of_sorted(&sorted, 99.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_median_odd_and_even() {
        assert!((compute_percentile(&[3.0, 1.0, 2.0], 50.0) - 2.0).abs() < f64::EPSILON);
        assert!((compute_percentile(&[4.0, 1.0, 3.0, 2.0], 50.0) - 2.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_interpolation() {
        let samples: Vec<f64> = (1..=100).map(f64::from).collect();
        // rank = 0.25 * 99 = 24.75 -> 25 + 0.75
        assert!((compute_percentile(&samples, 25.0) - 25.75).abs() < 1e-12);
        assert!((compute_percentile(&samples, 75.0) - 75.25).abs() < 1e-12);
    }

    #[test]
    fn test_bounds_are_clamped() {
        let samples = [1.0, 2.0, 3.0];
        assert_eq!(compute_percentile(&samples, -5.0), 1.0);
        assert_eq!(compute_percentile(&samples, 250.0), 3.0);
    }

    #[test]
    fn test_single_and_empty() {
        assert_eq!(compute_percentile(&[42.0], 99.0), 42.0);
        assert_eq!(compute_percentile(&[], 50.0), 0.0);
    }

    #[test]
    fn test_compute_all() {
        let samples: Vec<f64> = (1..=1000).map(f64::from).collect();
        let p = compute_percentiles(&samples);
        assert!(p.p25 < p.p50 && p.p50 < p.p75 && p.p75 < p.p90 && p.p90 < p.p99);
        assert!(p.p99 > 985.0 && p.p99 < 995.0);
    }
}
