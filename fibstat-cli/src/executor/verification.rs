//! Verification Processing
//!
//! Before anything is timed, every variant is evaluated on the benchmark
//! input and checked against the family's reference variant. Fibonacci
//! results must match exactly; standard deviations within a relative
//! tolerance.

use fibstat_core::{FibVariant, StdDevVariant};
use fibstat_report::VerificationResult;
use fibstat_stats::approx_eq;

/// Check each Fibonacci `variant` against [`FibVariant::REFERENCE`] at `n`
pub fn verify_fib(n: i64, variants: &[FibVariant]) -> Vec<VerificationResult> {
    let reference = FibVariant::REFERENCE;
    let expected = reference.evaluate(n);

    variants
        .iter()
        .filter(|&&v| v != reference)
        .map(|&variant| {
            let actual = variant.evaluate(n);
            let (passed, message) = match (&expected, &actual) {
                (Ok(e), Ok(a)) if e == a => (true, format!("fib({}) = {}", n, a)),
                (Ok(e), Ok(a)) => (false, format!("fib({}): expected {}, got {}", n, e, a)),
                (Err(e), _) | (_, Err(e)) => (false, e.to_string()),
            };
            finish(VerificationResult {
                id: format!("fib/{}/{}", variant.id(), n),
                family: "fib".to_string(),
                variant: variant.id().to_string(),
                reference: reference.id().to_string(),
                input: n.to_string(),
                expected: render(&expected),
                actual: render(&actual),
                passed,
                message,
            })
        })
        .collect()
}

/// Check each standard-deviation `variant` against [`StdDevVariant::REFERENCE`]
pub fn verify_stddev(
    values: &[f64],
    variants: &[StdDevVariant],
    tolerance: f64,
) -> Vec<VerificationResult> {
    let reference = StdDevVariant::REFERENCE;
    let expected = reference.evaluate(values);

    variants
        .iter()
        .filter(|&&v| v != reference)
        .map(|&variant| {
            let actual = variant.evaluate(values);
            let (passed, message) = match (&expected, &actual) {
                (Ok(e), Ok(a)) if approx_eq(*e, *a, tolerance) => {
                    (true, format!("within {:e} of {}", tolerance, e))
                }
                (Ok(e), Ok(a)) => (
                    false,
                    format!("expected {}, got {} (tolerance {:e})", e, a, tolerance),
                ),
                (Err(e), _) | (_, Err(e)) => (false, e.to_string()),
            };
            finish(VerificationResult {
                id: format!("stddev/{}/{}", variant.id(), values.len()),
                family: "stddev".to_string(),
                variant: variant.id().to_string(),
                reference: reference.id().to_string(),
                input: values.len().to_string(),
                expected: render(&expected),
                actual: render(&actual),
                passed,
                message,
            })
        })
        .collect()
}

fn render<T: std::fmt::Display, E: std::fmt::Display>(value: &Result<T, E>) -> String {
    match value {
        Ok(v) => v.to_string(),
        Err(e) => format!("error: {}", e),
    }
}

fn finish(result: VerificationResult) -> VerificationResult {
    if !result.passed {
        tracing::warn!(id = %result.id, message = %result.message, "verification failed");
    }
    result
}
