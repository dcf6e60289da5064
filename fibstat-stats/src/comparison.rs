//! Variant Comparison
//!
//! Speedup tables against a baseline variant, relative change, and Cohen's d
//! between two timing distributions.

use crate::dispersion::RunningStats;

/// One row of a speedup table
#[derive(Debug, Clone, PartialEq)]
pub struct SpeedupEntry {
    /// Benchmark or variant identifier
    pub id: String,
    /// Metric value (mean nanoseconds)
    pub value: f64,
    /// `baseline / value`: above 1.0 means faster than the baseline
    pub speedup: f64,
    /// Whether this row is the baseline
    pub is_baseline: bool,
}

/// Errors from comparison operations
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ComparisonError {
    /// Baseline ID missing from the entries
    #[error("Baseline '{0}' is not among the compared entries")]
    UnknownBaseline(String),
    /// Baseline cannot divide
    #[error("Baseline '{id}' has non-positive value {value}")]
    NonPositiveBaseline {
        /// Baseline ID
        id: String,
        /// Baseline metric value
        value: f64,
    },
    /// Too few samples for an effect size
    #[error("Need at least 2 samples on each side, got {baseline} and {candidate}")]
    InsufficientSamples {
        /// Baseline sample count
        baseline: usize,
        /// Candidate sample count
        candidate: usize,
    },
}

/// Build a speedup table: every entry relative to `baseline`
///
/// Entries keep input order. An entry with a non-positive value gets speedup `0.0`.
pub fn compare_speedups(
    entries: &[(String, f64)],
    baseline: &str,
) -> Result<Vec<SpeedupEntry>, ComparisonError> {
    let baseline_value = entries
        .iter()
        .find(|(id, _)| id == baseline)
        .map(|(_, v)| *v)
        .ok_or_else(|| ComparisonError::UnknownBaseline(baseline.to_string()))?;

    if baseline_value <= 0.0 {
        return Err(ComparisonError::NonPositiveBaseline {
            id: baseline.to_string(),
            value: baseline_value,
        });
    }

    Ok(entries
        .iter()
        .map(|(id, value)| SpeedupEntry {
            id: id.clone(),
            value: *value,
            speedup: if *value > 0.0 {
                baseline_value / value
            } else {
                0.0
            },
            is_baseline: id == baseline,
        })
        .collect())
}

/// Relative change in percent: `(candidate - baseline) / baseline * 100`
pub fn relative_change(baseline: f64, candidate: f64) -> f64 {
    if baseline == 0.0 {
        0.0
    } else {
        (candidate - baseline) / baseline * 100.0
    }
}

/// Interpretation of effect size magnitude
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EffectInterpretation {
    /// |d| < 0.2
    Negligible,
    /// 0.2 <= |d| < 0.5
    Small,
    /// 0.5 <= |d| < 0.8
    Medium,
    /// |d| >= 0.8
    Large,
}

impl EffectInterpretation {
    fn from_d(d: f64) -> Self {
        match d.abs() {
            x if x < 0.2 => EffectInterpretation::Negligible,
            x if x < 0.5 => EffectInterpretation::Small,
            x if x < 0.8 => EffectInterpretation::Medium,
            _ => EffectInterpretation::Large,
        }
    }
}

impl std::fmt::Display for EffectInterpretation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EffectInterpretation::Negligible => write!(f, "negligible"),
            EffectInterpretation::Small => write!(f, "small"),
            EffectInterpretation::Medium => write!(f, "medium"),
            EffectInterpretation::Large => write!(f, "large"),
        }
    }
}

/// Cohen's d of `candidate` against `baseline` using the pooled standard deviation
pub fn effect_size(
    baseline: &[f64],
    candidate: &[f64],
) -> Result<(f64, EffectInterpretation), ComparisonError> {
    if baseline.len() < 2 || candidate.len() < 2 {
        return Err(ComparisonError::InsufficientSamples {
            baseline: baseline.len(),
            candidate: candidate.len(),
        });
    }

    let a: RunningStats = baseline.iter().copied().collect();
    let b: RunningStats = candidate.iter().copied().collect();
    let n1 = a.count() as f64;
    let n2 = b.count() as f64;
    let var1 = a.sample_variance().unwrap_or(0.0);
    let var2 = b.sample_variance().unwrap_or(0.0);
    let pooled = (((n1 - 1.0) * var1 + (n2 - 1.0) * var2) / (n1 + n2 - 2.0)).sqrt();

    let diff = b.mean().unwrap_or(0.0) - a.mean().unwrap_or(0.0);
    let d = if pooled > 0.0 { diff / pooled } else { 0.0 };
    Ok((d, EffectInterpretation::from_d(d)))
}
