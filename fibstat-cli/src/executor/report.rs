//! Report Building
//!
//! Turns execution results and their statistics into a [`Report`], then adds
//! the per-group speedup tables and the `n` sweep series.
//!
//! ```text
//! BenchExecutionResult + SummaryStatistics
//!              │
//!              ▼
//!   ┌─────────────────────┐
//!   │  BenchmarkMetrics   │  Timing stats per benchmark
//!   └──────────┬──────────┘
//!              │
//!              ▼
//!   ┌─────────────────────┐
//!   │ Comparisons/Series  │  Speedup vs group baseline, metric over n
//!   └──────────┬──────────┘
//!              │
//!              ▼
//!            Report
//! ```

use super::execution::BenchExecutionResult;
use super::metadata::build_report_meta;
use fibstat_core::{FibVariant, STDDEV_GROUP, SWEEP_GROUP, StdDevVariant};
use fibstat_report::{
    BenchmarkMetrics, BenchmarkReportResult, BenchmarkStatus, ComparisonEntry, ComparisonResult,
    ComparisonSeries, FailureInfo, Report, ReportConfig, ReportSummary, VerificationResult,
};
use fibstat_stats::{SummaryStatistics, compare_speedups, effect_size, relative_change};
use std::collections::HashMap;

/// Build a complete Report from execution results
pub fn build_report(
    results: &[BenchExecutionResult],
    stats: &[(String, Option<SummaryStatistics>)],
    verifications: Vec<VerificationResult>,
    config: ReportConfig,
    total_duration_ms: f64,
) -> Report {
    let stats_map: HashMap<&str, &SummaryStatistics> = stats
        .iter()
        .filter_map(|(id, s)| s.as_ref().map(|s| (id.as_str(), s)))
        .collect();

    let mut summary = ReportSummary {
        total_benchmarks: results.len(),
        verification_failures: verifications.iter().filter(|v| !v.passed).count(),
        total_duration_ms,
        ..Default::default()
    };

    let mut benchmark_results = Vec::with_capacity(results.len());
    for result in results {
        let metrics = stats_map
            .get(result.benchmark_id.as_str())
            .map(|s| BenchmarkMetrics {
                iterations: result.iterations,
                ..BenchmarkMetrics::from(*s)
            });

        let failure = result.error_message.as_ref().map(|msg| FailureInfo {
            kind: match result.status {
                BenchmarkStatus::Crashed => "panic",
                _ => "no-samples",
            }
            .to_string(),
            message: msg.clone(),
        });

        match result.status {
            BenchmarkStatus::Passed => summary.passed += 1,
            BenchmarkStatus::Failed => summary.failed += 1,
            BenchmarkStatus::Crashed => summary.crashed += 1,
            BenchmarkStatus::Skipped => summary.skipped += 1,
        }

        benchmark_results.push(BenchmarkReportResult {
            id: result.benchmark_id.clone(),
            name: result.benchmark_name.clone(),
            group: result.group.clone(),
            variant: result.variant.clone(),
            input: result.input.clone(),
            status: result.status,
            metrics,
            failure,
        });
    }

    let mut report = Report {
        meta: build_report_meta(config),
        results: benchmark_results,
        comparisons: Vec::new(),
        comparison_series: Vec::new(),
        verifications,
        summary,
    };
    report.comparisons = build_comparisons(&report, results);
    report.comparison_series = build_sweep_series(&report).into_iter().collect();
    report
}

/// Reference variant of a benchmark group
fn baseline_variant(group: &str) -> &'static str {
    if group == STDDEV_GROUP {
        StdDevVariant::REFERENCE.id()
    } else {
        FibVariant::REFERENCE.id()
    }
}

/// One speedup table per group, against the group's reference variant.
/// Groups whose baseline did not produce timings are left out.
pub fn build_comparisons(
    report: &Report,
    results: &[BenchExecutionResult],
) -> Vec<ComparisonResult> {
    let samples: HashMap<&str, &[f64]> = results
        .iter()
        .map(|r| (r.benchmark_id.as_str(), r.samples.as_slice()))
        .collect();

    let mut comparisons = Vec::new();
    for group in report.groups() {
        if group == SWEEP_GROUP {
            continue;
        }
        let measured: Vec<&BenchmarkReportResult> = report
            .group_results(group)
            .filter(|r| r.metrics.is_some())
            .collect();
        let baseline_variant = baseline_variant(group);
        let Some(baseline) = measured.iter().find(|r| r.variant == baseline_variant) else {
            tracing::debug!(group, "no baseline timings, skipping comparison");
            continue;
        };

        let values: Vec<(String, f64)> = measured
            .iter()
            .filter_map(|r| r.metrics.as_ref().map(|m| (r.id.clone(), m.mean_ns)))
            .collect();
        let speedups = match compare_speedups(&values, &baseline.id) {
            Ok(speedups) => speedups,
            Err(e) => {
                tracing::warn!(group, error = %e, "comparison skipped");
                continue;
            }
        };

        let baseline_mean = baseline.metrics.as_ref().map_or(0.0, |m| m.mean_ns);
        let baseline_samples = samples.get(baseline.id.as_str()).copied().unwrap_or(&[]);

        let entries = speedups
            .into_iter()
            .zip(&measured)
            .map(|(s, r)| {
                let effect = if s.is_baseline {
                    None
                } else {
                    let candidate = samples.get(r.id.as_str()).copied().unwrap_or(&[]);
                    effect_size(baseline_samples, candidate).ok()
                };
                ComparisonEntry {
                    benchmark_id: s.id,
                    label: r.name.clone(),
                    value: s.value,
                    speedup: s.speedup,
                    change_pct: relative_change(baseline_mean, s.value),
                    effect_size: effect.map(|(d, _)| d),
                    effect: effect.map(|(_, i)| i.to_string()),
                    is_baseline: s.is_baseline,
                }
            })
            .collect();

        comparisons.push(ComparisonResult {
            id: group.to_string(),
            title: format!("{}: speedup vs {}", group, baseline_variant),
            baseline: baseline.id.clone(),
            metric: "mean_ns".to_string(),
            entries,
        });
    }
    comparisons
}

/// Mean time over `n` for every variant of the sweep group
pub fn build_sweep_series(report: &Report) -> Option<ComparisonSeries> {
    let sweep: Vec<&BenchmarkReportResult> = report.group_results(SWEEP_GROUP).collect();
    if sweep.is_empty() {
        return None;
    }

    let mut x_values: Vec<String> = Vec::new();
    let mut series_names: Vec<String> = Vec::new();
    for r in &sweep {
        if !x_values.contains(&r.input) {
            x_values.push(r.input.clone());
        }
        if !series_names.contains(&r.variant) {
            series_names.push(r.variant.clone());
        }
    }
    x_values.sort_by_key(|x| x.parse::<i64>().unwrap_or(i64::MAX));

    let series_data = series_names
        .iter()
        .map(|name| {
            x_values
                .iter()
                .map(|x| {
                    sweep
                        .iter()
                        .find(|r| &r.variant == name && &r.input == x)
                        .and_then(|r| r.metrics.as_ref())
                        .map(|m| m.mean_ns)
                })
                .collect()
        })
        .collect();

    Some(ComparisonSeries {
        group: SWEEP_GROUP.to_string(),
        title: "fib(n) time per call by variant".to_string(),
        x_label: "n".to_string(),
        x_values,
        series_names,
        series_data,
        metric: "mean_ns".to_string(),
    })
}
