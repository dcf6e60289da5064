//! Output Formatting
//!
//! Human-readable output for a finished run:
//! - Grouped benchmark results with status icons (✓/✗/💥/⊘)
//! - Timing metrics (mean, median, stddev, percentiles, throughput)
//! - Speedup tables against each group's reference variant
//! - The `n` sweep as a table, one row per variant
//! - Verification results and the summary

use fibstat_report::{BenchmarkReportResult, BenchmarkStatus, Report, format_duration};
use std::fmt::Write as _;

/// Format a report for human-readable terminal display
pub fn format_human_output(report: &Report) -> String {
    let mut output = String::new();

    output.push('\n');
    output.push_str("fibstat results\n");
    output.push_str(&"=".repeat(60));
    output.push_str("\n\n");

    // The sweep is shown as a table below; listing each point is noise.
    let series_groups: Vec<&str> = report
        .comparison_series
        .iter()
        .map(|s| s.group.as_str())
        .collect();

    for group in report.groups() {
        if series_groups.contains(&group) {
            continue;
        }
        let _ = writeln!(output, "Group: {}", group);
        output.push_str(&"-".repeat(60));
        output.push('\n');

        for result in report.group_results(group) {
            write_result(&mut output, result);
            output.push('\n');
        }
    }

    for cmp in &report.comparisons {
        let _ = writeln!(output, "\n{}", cmp.title);
        output.push_str(&"-".repeat(60));
        output.push('\n');

        let max_name_len = cmp
            .entries
            .iter()
            .map(|e| e.benchmark_id.len())
            .max()
            .unwrap_or(20)
            .max("Benchmark".len());

        let _ = writeln!(
            output,
            "  {:<width$}  {:>12}  {:>10}  {:>9}  {:>10}",
            "Benchmark",
            "mean",
            "Speedup",
            "Change",
            "Effect",
            width = max_name_len
        );
        let _ = writeln!(output, "  {}", "-".repeat(max_name_len + 51));

        // Fastest first
        let mut sorted_entries: Vec<_> = cmp.entries.iter().collect();
        sorted_entries.sort_by(|a, b| b.speedup.total_cmp(&a.speedup));

        for entry in sorted_entries {
            let (change, effect, marker) = if entry.is_baseline {
                ("-".to_string(), "-".to_string(), " (baseline)")
            } else {
                (
                    format!("{:+.1}%", entry.change_pct),
                    entry.effect.clone().unwrap_or_else(|| "-".to_string()),
                    "",
                )
            };
            let _ = writeln!(
                output,
                "  {:<width$}  {:>12}  {:>9.2}x  {:>9}  {:>10}{}",
                entry.benchmark_id,
                format_duration(entry.value),
                entry.speedup,
                change,
                effect,
                marker,
                width = max_name_len
            );
        }
    }

    for series in &report.comparison_series {
        let _ = writeln!(output, "\n{} ({})", series.title, series.metric);
        output.push_str(&"-".repeat(60));
        output.push('\n');

        let max_name_len = series
            .series_names
            .iter()
            .map(|n| n.len())
            .max()
            .unwrap_or(12)
            .max(series.x_label.len());

        let col_width = series
            .x_values
            .iter()
            .map(|x| x.len())
            .max()
            .unwrap_or(8)
            .max(10);

        let _ = write!(output, "  {:<width$}", series.x_label, width = max_name_len);
        for x in &series.x_values {
            let _ = write!(output, " | {:>w$}", x, w = col_width);
        }
        output.push('\n');

        let _ = write!(output, "  {}", "-".repeat(max_name_len));
        for _ in &series.x_values {
            let _ = write!(output, "-+-{}", "-".repeat(col_width));
        }
        output.push('\n');

        for (series_idx, name) in series.series_names.iter().enumerate() {
            let _ = write!(output, "  {:<width$}", name, width = max_name_len);
            for x_idx in 0..series.x_values.len() {
                let formatted = series
                    .series_data
                    .get(series_idx)
                    .and_then(|row| row.get(x_idx))
                    .copied()
                    .flatten()
                    .map_or_else(|| "-".to_string(), format_duration);
                let _ = write!(output, " | {:>w$}", formatted, w = col_width);
            }
            output.push('\n');
        }
    }

    if !report.verifications.is_empty() {
        output.push_str("\nVerifications\n");
        output.push_str(&"-".repeat(60));
        output.push('\n');

        for v in &report.verifications {
            let icon = if v.passed { "✓" } else { "✗" };
            let _ = writeln!(output, "  {} {} : {}", icon, v.id, v.message);
        }
    }

    output.push_str("\nSummary\n");
    output.push_str(&"-".repeat(60));
    output.push('\n');
    let _ = writeln!(
        output,
        "  Total: {}  Passed: {}  Failed: {}  Crashed: {}  Skipped: {}",
        report.summary.total_benchmarks,
        report.summary.passed,
        report.summary.failed,
        report.summary.crashed,
        report.summary.skipped
    );
    if report.summary.verification_failures > 0 {
        let _ = writeln!(
            output,
            "  Verification failures: {}",
            report.summary.verification_failures
        );
    }
    let _ = writeln!(
        output,
        "  Duration: {:.2} ms",
        report.summary.total_duration_ms
    );

    output
}

fn write_result(output: &mut String, result: &BenchmarkReportResult) {
    let status_icon = match result.status {
        BenchmarkStatus::Passed => "✓",
        BenchmarkStatus::Failed => "✗",
        BenchmarkStatus::Crashed => "💥",
        BenchmarkStatus::Skipped => "⊘",
    };
    let _ = writeln!(output, "  {} {} ({})", status_icon, result.id, result.name);

    if let Some(m) = &result.metrics {
        let _ = writeln!(
            output,
            "      mean: {}  median: {}  stddev: {}",
            format_duration(m.mean_ns),
            format_duration(m.median_ns),
            format_duration(m.std_dev_ns)
        );
        let _ = writeln!(
            output,
            "      min: {}  max: {}  samples: {}  iterations: {}",
            format_duration(m.min_ns),
            format_duration(m.max_ns),
            m.samples,
            m.iterations
        );
        let _ = writeln!(
            output,
            "      p50: {}  p90: {}  p99: {}  outliers: {}",
            format_duration(m.p50_ns),
            format_duration(m.p90_ns),
            format_duration(m.p99_ns),
            m.outliers
        );
        if let Some(throughput) = m.throughput_ops_sec {
            let _ = writeln!(output, "      throughput: {:.2} ops/sec", throughput);
        }
    }

    if let Some(failure) = &result.failure {
        let _ = writeln!(output, "      error: {}", failure.message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fibstat_report::{
        BenchmarkMetrics, ComparisonEntry, ComparisonResult, ComparisonSeries, FailureInfo,
        ReportConfig, ReportSummary,
    };

    fn metrics(mean_ns: f64) -> BenchmarkMetrics {
        BenchmarkMetrics {
            samples: 10,
            iterations: 100,
            mean_ns,
            median_ns: mean_ns,
            std_dev_ns: 1.0,
            min_ns: mean_ns,
            max_ns: mean_ns,
            p50_ns: mean_ns,
            p90_ns: mean_ns,
            p99_ns: mean_ns,
            outliers: 0,
            throughput_ops_sec: Some(1e9 / mean_ns),
        }
    }

    fn report() -> Report {
        let result = |id: &str, group: &str, metrics: Option<BenchmarkMetrics>| BenchmarkReportResult {
            id: id.to_string(),
            name: id.to_string(),
            group: group.to_string(),
            variant: id.rsplit('/').next().unwrap_or_default().to_string(),
            input: "20".to_string(),
            status: if metrics.is_some() {
                BenchmarkStatus::Passed
            } else {
                BenchmarkStatus::Crashed
            },
            failure: metrics.is_none().then(|| FailureInfo {
                kind: "panic".to_string(),
                message: "exploded".to_string(),
            }),
            metrics,
        };
        Report {
            meta: super::super::metadata::build_report_meta(ReportConfig::default()),
            results: vec![
                result("fib/naive", "fib", Some(metrics(2_000.0))),
                result("fib/iterative", "fib", Some(metrics(20.0))),
                result("fib/cached", "fib", None),
                result("fib-sweep/naive/0", "fib-sweep", Some(metrics(3.0))),
            ],
            comparisons: vec![ComparisonResult {
                id: "fib".to_string(),
                title: "fib: speedup vs naive".to_string(),
                baseline: "fib/naive".to_string(),
                metric: "mean_ns".to_string(),
                entries: vec![
                    ComparisonEntry {
                        benchmark_id: "fib/naive".to_string(),
                        label: "naive".to_string(),
                        value: 2_000.0,
                        speedup: 1.0,
                        change_pct: 0.0,
                        effect_size: None,
                        effect: None,
                        is_baseline: true,
                    },
                    ComparisonEntry {
                        benchmark_id: "fib/iterative".to_string(),
                        label: "iterative".to_string(),
                        value: 20.0,
                        speedup: 100.0,
                        change_pct: -99.0,
                        effect_size: Some(-40.0),
                        effect: Some("large".to_string()),
                        is_baseline: false,
                    },
                ],
            }],
            comparison_series: vec![ComparisonSeries {
                group: "fib-sweep".to_string(),
                title: "fib(n) time per call by variant".to_string(),
                x_label: "n".to_string(),
                x_values: vec!["0".to_string(), "1".to_string()],
                series_names: vec!["naive".to_string()],
                series_data: vec![vec![Some(3.0), None]],
                metric: "mean_ns".to_string(),
            }],
            verifications: Vec::new(),
            summary: ReportSummary {
                total_benchmarks: 4,
                passed: 3,
                crashed: 1,
                ..Default::default()
            },
        }
    }

    #[test]
    fn test_human_output_sections() {
        let out = format_human_output(&report());
        assert!(out.contains("Group: fib\n"));
        assert!(!out.contains("Group: fib-sweep"));
        assert!(out.contains("✓ fib/naive"));
        assert!(out.contains("💥 fib/cached"));
        assert!(out.contains("error: exploded"));
        assert!(out.contains("mean: 2.00 µs"));
        assert!(out.contains("Total: 4  Passed: 3  Failed: 0  Crashed: 1  Skipped: 0"));
    }

    #[test]
    fn test_comparison_table_fastest_first() {
        let out = format_human_output(&report());
        let iterative = out.find("fib/iterative  ").unwrap();
        let naive = out.rfind("fib/naive ").unwrap();
        assert!(iterative < naive);
        assert!(out.contains("100.00x"));
        assert!(out.contains("-99.0%"));
        assert!(out.contains("(baseline)"));
    }

    #[test]
    fn test_series_table_marks_missing_points() {
        let out = format_human_output(&report());
        let row = out
            .lines()
            .find(|l| l.trim_start().starts_with("naive") && l.contains('|'))
            .unwrap();
        assert!(row.contains("3.00 ns"));
        assert!(row.trim_end().ends_with('-'));
    }
}
