//! Standard-Deviation Evaluators
//!
//! Population standard deviation: `sqrt(sum((x - mean)^2) / len)`.
//! Three strategies that must agree within floating point tolerance.

use fibstat_stats::{magnitude_scale, population_std_dev};

/// Errors from the standard-deviation evaluators
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum StdDevError {
    /// No values to average over
    #[error("standard deviation of an empty sequence is undefined")]
    Empty,
    /// NaN or infinite input
    #[error("value at index {index} is not finite: {value}")]
    NonFinite {
        /// Position in the input
        index: usize,
        /// Offending value
        value: f64,
    },
    /// Finite input whose result is not representable
    #[error("standard deviation is not finite")]
    Overflow,
}

fn validate(values: &[f64]) -> Result<(), StdDevError> {
    if values.is_empty() {
        return Err(StdDevError::Empty);
    }
    match values.iter().position(|v| !v.is_finite()) {
        Some(index) => Err(StdDevError::NonFinite {
            index,
            value: values[index],
        }),
        None => Ok(()),
    }
}

fn finite(sd: f64) -> Result<f64, StdDevError> {
    if sd.is_finite() {
        Ok(sd)
    } else {
        Err(StdDevError::Overflow)
    }
}

/// Mean/variance formula written with iterator sums
pub fn std_dev(values: &[f64]) -> Result<f64, StdDevError> {
    validate(values)?;
    let scale = magnitude_scale(values);
    let len = values.len() as f64;
    let mean = values.iter().map(|x| x * scale).sum::<f64>() / len;
    let sum_sq = values
        .iter()
        .map(|x| (x * scale - mean).powi(2))
        .sum::<f64>();
    finite((sum_sq / len).sqrt() / scale)
}

/// Two explicit indexed passes over the slice
#[allow(clippy::needless_range_loop)]
pub fn std_dev_native(values: &[f64]) -> Result<f64, StdDevError> {
    validate(values)?;
    let len = values.len();
    let scale = magnitude_scale(values);

    let mut mean = 0.0;
    for i in 0..len {
        mean += values[i] * scale;
    }
    mean /= len as f64;

    let mut sum_sq = 0.0;
    for i in 0..len {
        let diff = values[i] * scale - mean;
        sum_sq += diff * diff;
    }
    finite((sum_sq / len as f64).sqrt() / scale)
}

/// Delegates to the numeric library (single-pass Welford)
pub fn std_dev_library(values: &[f64]) -> Result<f64, StdDevError> {
    validate(values)?;
    population_std_dev(values)
        .ok_or(StdDevError::Empty)
        .and_then(finite)
}

#[cfg(test)]
mod tests {
    use super::*;
    use fibstat_stats::{DEFAULT_RELATIVE_TOLERANCE, approx_eq};
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    const TEXTBOOK: [f64; 8] = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];

    #[test]
    fn test_textbook_example() {
        assert_eq!(std_dev(&TEXTBOOK), Ok(2.0));
        assert_eq!(std_dev_native(&TEXTBOOK), Ok(2.0));
        assert!((std_dev_library(&TEXTBOOK).unwrap() - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_empty_is_an_error() {
        assert_eq!(std_dev(&[]), Err(StdDevError::Empty));
        assert_eq!(std_dev_native(&[]), Err(StdDevError::Empty));
        assert_eq!(std_dev_library(&[]), Err(StdDevError::Empty));
    }

    #[test]
    fn test_non_finite_rejected() {
        let err = std_dev(&[1.0, f64::NAN]).unwrap_err();
        assert!(matches!(err, StdDevError::NonFinite { index: 1, .. }));
        let err = std_dev_library(&[f64::INFINITY]).unwrap_err();
        assert!(matches!(err, StdDevError::NonFinite { index: 0, .. }));
    }

    #[test]
    fn test_constant_sequence() {
        assert_eq!(std_dev(&[3.5; 10]), Ok(0.0));
        assert_eq!(std_dev_native(&[3.5; 10]), Ok(0.0));
        assert!(std_dev_library(&[3.5; 10]).unwrap().abs() < 1e-12);
    }

    #[test]
    fn test_single_value() {
        assert_eq!(std_dev(&[-4.0]), Ok(0.0));
        assert_eq!(std_dev_library(&[-4.0]), Ok(0.0));
    }

    #[test]
    fn test_variants_agree_on_random_sequences() {
        let mut rng = StdRng::seed_from_u64(2014);
        for _ in 0..200 {
            let len = rng.gen_range(1..500);
            let values: Vec<f64> = (0..len).map(|_| rng.gen_range(-1e6..1e6)).collect();
            let formula = std_dev(&values).unwrap();
            let native = std_dev_native(&values).unwrap();
            let library = std_dev_library(&values).unwrap();
            assert!(approx_eq(formula, native, DEFAULT_RELATIVE_TOLERANCE));
            assert!(approx_eq(formula, library, DEFAULT_RELATIVE_TOLERANCE));
        }
    }

    #[test]
    fn test_values_near_f64_max() {
        for variant in [std_dev, std_dev_native, std_dev_library] {
            assert_eq!(variant(&[1e308, 1e308]), Ok(0.0));
            let sd = variant(&[1e308, -1e308]).unwrap();
            assert!(approx_eq(sd, 1e308, DEFAULT_RELATIVE_TOLERANCE), "{}", sd);
        }
    }

    #[test]
    fn test_scaled_textbook_is_exact() {
        let big = 2f64.powi(1000);
        let values: Vec<f64> = TEXTBOOK.iter().map(|x| x * big).collect();
        assert_eq!(std_dev(&values), Ok(2.0 * big));
        assert_eq!(std_dev_native(&values), Ok(2.0 * big));
        assert!(approx_eq(
            std_dev_library(&values).unwrap(),
            2.0 * big,
            DEFAULT_RELATIVE_TOLERANCE
        ));

        let tiny = f64::from_bits(1);
        let values: Vec<f64> = TEXTBOOK.iter().map(|x| x * tiny).collect();
        assert_eq!(std_dev(&values), Ok(2.0 * tiny));
        assert_eq!(std_dev_native(&values), Ok(2.0 * tiny));
        assert_eq!(std_dev_library(&values), Ok(2.0 * tiny));
    }

    #[test]
    fn test_non_finite_result_is_an_error() {
        assert_eq!(finite(f64::INFINITY), Err(StdDevError::Overflow));
        assert_eq!(finite(f64::NAN), Err(StdDevError::Overflow));
        assert_eq!(finite(1.5), Ok(1.5));
    }

    #[test]
    fn test_variants_agree_on_large_magnitudes() {
        let mut rng = StdRng::seed_from_u64(308);
        for _ in 0..200 {
            let len = rng.gen_range(1..200);
            let exponent = rng.gen_range(-300..=308);
            let magnitude = 10f64.powi(exponent);
            let values: Vec<f64> = (0..len)
                .map(|_| rng.gen_range(-1.0..1.0) * magnitude)
                .collect();
            let formula = std_dev(&values);
            let native = std_dev_native(&values);
            let library = std_dev_library(&values);
            match (formula, native, library) {
                (Ok(f), Ok(n), Ok(l)) => {
                    assert!(f.is_finite(), "{:e}", magnitude);
                    assert!(approx_eq(f, n, DEFAULT_RELATIVE_TOLERANCE), "{} vs {}", f, n);
                    assert!(approx_eq(f, l, DEFAULT_RELATIVE_TOLERANCE), "{} vs {}", f, l);
                }
                (Err(f), Err(n), Err(l)) => assert!(f == n && n == l),
                other => panic!("variants disagree at {:e}: {:?}", magnitude, other),
            }
        }
    }

    #[test]
    fn test_input_untouched() {
        let values = vec![1.0, 2.0, 3.0];
        let before = values.clone();
        std_dev(&values).unwrap();
        std_dev_native(&values).unwrap();
        std_dev_library(&values).unwrap();
        assert_eq!(values, before);
    }
}
