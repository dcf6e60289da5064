//! Report Data Structures

use chrono::{DateTime, Utc};
use fibstat_stats::SummaryStatistics;
use serde::{Deserialize, Serialize};

/// Complete run report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    /// Run metadata
    pub meta: ReportMeta,
    /// One entry per planned benchmark
    pub results: Vec<BenchmarkReportResult>,
    /// Speedup tables, one per group
    #[serde(default)]
    pub comparisons: Vec<ComparisonResult>,
    /// Multi-point series (the `n` sweep)
    #[serde(default)]
    pub comparison_series: Vec<ComparisonSeries>,
    /// Cross-variant output checks
    #[serde(default)]
    pub verifications: Vec<VerificationResult>,
    /// Totals
    pub summary: ReportSummary,
}

impl Report {
    /// Results belonging to `group`
    pub fn group_results<'a>(
        &'a self,
        group: &'a str,
    ) -> impl Iterator<Item = &'a BenchmarkReportResult> + 'a {
        self.results.iter().filter(move |r| r.group == group)
    }

    /// Distinct groups in first-seen order
    pub fn groups(&self) -> Vec<&str> {
        let mut groups: Vec<&str> = Vec::new();
        for result in &self.results {
            if !groups.contains(&result.group.as_str()) {
                groups.push(&result.group);
            }
        }
        groups
    }
}

/// Speedup table for one group
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonResult {
    /// Group identifier
    pub id: String,
    /// Table title
    pub title: String,
    /// Baseline benchmark ID
    pub baseline: String,
    /// Compared metric
    pub metric: String,
    /// Rows, in benchmark order
    pub entries: Vec<ComparisonEntry>,
}

/// One row of a speedup table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonEntry {
    /// Benchmark ID
    pub benchmark_id: String,
    /// Variant label
    pub label: String,
    /// Metric value (mean ns)
    pub value: f64,
    /// `baseline / value`
    pub speedup: f64,
    /// Change of the mean against the baseline, in percent
    #[serde(default)]
    pub change_pct: f64,
    /// Cohen's d against the baseline samples
    #[serde(default)]
    pub effect_size: Option<f64>,
    /// "negligible", "small", "medium" or "large"
    #[serde(default)]
    pub effect: Option<String>,
    /// Whether this is the baseline row
    pub is_baseline: bool,
}

/// Metric over an x axis, one row per series
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonSeries {
    /// Group identifier
    pub group: String,
    /// Chart title
    pub title: String,
    /// X axis label
    pub x_label: String,
    /// X values in order
    pub x_values: Vec<String>,
    /// Series (variant) names
    pub series_names: Vec<String>,
    /// `series_data[series][x]`; `None` marks a missing point
    pub series_data: Vec<Vec<Option<f64>>>,
    /// Metric used
    pub metric: String,
}

/// Report metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMeta {
    /// Report format version
    pub schema_version: u32,
    /// fibstat version
    pub version: String,
    /// When the run started
    pub timestamp: DateTime<Utc>,
    /// Commit hash, when run inside a git checkout
    pub git_commit: Option<String>,
    /// Branch name, when run inside a git checkout
    pub git_branch: Option<String>,
    /// Host the run executed on
    pub system: SystemInfo,
    /// Settings the run used
    pub config: ReportConfig,
}

/// Execution settings captured in the report
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Warmup phase length
    pub warmup_time_ns: u64,
    /// Measurement phase length
    pub measurement_time_ns: u64,
    /// Lower bound on iterations per benchmark
    pub min_iterations: Option<u64>,
    /// Upper bound on iterations per benchmark
    pub max_iterations: Option<u64>,
    /// Samples collected per benchmark
    pub target_samples: usize,
    /// Fibonacci index benchmarked
    pub fib_n: Option<i64>,
    /// Largest `n` in a sweep
    pub sweep_max: Option<i64>,
    /// Standard-deviation dataset length
    pub stddev_len: Option<usize>,
    /// Dataset seed
    pub seed: Option<u64>,
}

/// Host description
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemInfo {
    /// Operating system
    pub os: String,
    /// CPU architecture
    pub arch: String,
    /// CPU model name
    pub cpu: String,
    /// Logical cores
    pub cpu_cores: u32,
}

/// One benchmark in the report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenchmarkReportResult {
    /// Benchmark ID
    pub id: String,
    /// Display name
    pub name: String,
    /// Group
    pub group: String,
    /// Variant identifier
    pub variant: String,
    /// Input value
    pub input: String,
    /// Outcome
    pub status: BenchmarkStatus,
    /// Timing metrics; absent when nothing was measured
    pub metrics: Option<BenchmarkMetrics>,
    /// Crash details
    pub failure: Option<FailureInfo>,
}

/// Benchmark execution status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BenchmarkStatus {
    /// Ran and produced samples
    Passed,
    /// Ran but failed a check
    Failed,
    /// Panicked
    Crashed,
    /// Produced no samples
    Skipped,
}

/// Timing metrics in nanoseconds per call
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenchmarkMetrics {
    /// Samples collected
    pub samples: usize,
    /// Iterations measured
    pub iterations: u64,
    /// Mean
    pub mean_ns: f64,
    /// Median
    pub median_ns: f64,
    /// Sample standard deviation
    pub std_dev_ns: f64,
    /// Fastest sample
    pub min_ns: f64,
    /// Slowest sample
    pub max_ns: f64,
    /// 50th percentile
    pub p50_ns: f64,
    /// 90th percentile
    pub p90_ns: f64,
    /// 99th percentile
    pub p99_ns: f64,
    /// Samples flagged as outliers
    pub outliers: usize,
    /// Calls per second at the mean
    pub throughput_ops_sec: Option<f64>,
}

impl From<&SummaryStatistics> for BenchmarkMetrics {
    fn from(stats: &SummaryStatistics) -> Self {
        Self {
            samples: stats.sample_count,
            iterations: 0, // filled from the execution result
            mean_ns: stats.mean,
            median_ns: stats.median,
            std_dev_ns: stats.std_dev,
            min_ns: stats.min,
            max_ns: stats.max,
            p50_ns: stats.percentiles.p50,
            p90_ns: stats.percentiles.p90,
            p99_ns: stats.percentiles.p99,
            outliers: stats.outlier_count,
            throughput_ops_sec: stats.throughput(),
        }
    }
}

/// Failure details
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FailureInfo {
    /// Failure category, e.g. "panic"
    pub kind: String,
    /// Failure message
    pub message: String,
}

/// Output of one variant checked against the reference variant
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationResult {
    /// `family/variant/input`
    pub id: String,
    /// "fib" or "stddev"
    pub family: String,
    /// Variant checked
    pub variant: String,
    /// Reference variant
    pub reference: String,
    /// Input both ran on
    pub input: String,
    /// Reference output
    pub expected: String,
    /// Variant output
    pub actual: String,
    /// Outputs agree
    pub passed: bool,
    /// Human-readable outcome
    pub message: String,
}

/// Totals
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportSummary {
    /// Benchmarks in the plan
    pub total_benchmarks: usize,
    /// Benchmarks that produced metrics
    pub passed: usize,
    /// Benchmarks that failed a check
    pub failed: usize,
    /// Benchmarks that panicked
    pub crashed: usize,
    /// Benchmarks that produced no samples
    pub skipped: usize,
    /// Variants whose output disagreed with the reference
    pub verification_failures: usize,
    /// Wall time of the whole run
    pub total_duration_ms: f64,
}

impl ReportSummary {
    /// Any crash or verification failure
    pub fn has_failures(&self) -> bool {
        self.crashed > 0 || self.failed > 0 || self.verification_failures > 0
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    fn result(id: &str, group: &str, variant: &str, mean_ns: Option<f64>) -> BenchmarkReportResult {
        BenchmarkReportResult {
            id: id.to_string(),
            name: id.to_string(),
            group: group.to_string(),
            variant: variant.to_string(),
            input: "20".to_string(),
            status: if mean_ns.is_some() {
                BenchmarkStatus::Passed
            } else {
                BenchmarkStatus::Crashed
            },
            metrics: mean_ns.map(|mean_ns| BenchmarkMetrics {
                samples: 10,
                iterations: 1000,
                mean_ns,
                median_ns: mean_ns,
                std_dev_ns: mean_ns * 0.01,
                min_ns: mean_ns * 0.9,
                max_ns: mean_ns * 1.2,
                p50_ns: mean_ns,
                p90_ns: mean_ns * 1.1,
                p99_ns: mean_ns * 1.15,
                outliers: 0,
                throughput_ops_sec: Some(1e9 / mean_ns),
            }),
            failure: mean_ns.is_none().then(|| FailureInfo {
                kind: "panic".to_string(),
                message: "boom, \"quoted\"".to_string(),
            }),
        }
    }

    pub(crate) fn sample_report() -> Report {
        Report {
            meta: ReportMeta {
                schema_version: crate::SCHEMA_VERSION,
                version: "0.1.0".to_string(),
                timestamp: Utc::now(),
                git_commit: None,
                git_branch: None,
                system: SystemInfo {
                    os: "linux".to_string(),
                    arch: "x86_64".to_string(),
                    cpu: "test".to_string(),
                    cpu_cores: 4,
                },
                config: ReportConfig::default(),
            },
            results: vec![
                result("fib/naive", "fib", "naive", Some(571_000.0)),
                result("fib/cached", "fib", "cached", Some(39.6)),
                result("fib/iterative", "fib", "iterative", Some(7.31)),
                result("stddev/formula", "stddev", "formula", Some(5_610.0)),
                result("stddev/native", "stddev", "native", None),
            ],
            comparisons: Vec::new(),
            comparison_series: Vec::new(),
            verifications: Vec::new(),
            summary: ReportSummary {
                total_benchmarks: 5,
                passed: 4,
                crashed: 1,
                ..Default::default()
            },
        }
    }

    pub(crate) fn sample_series() -> ComparisonSeries {
        ComparisonSeries {
            group: "fib-sweep".to_string(),
            title: "fib(n) by variant".to_string(),
            x_label: "n".to_string(),
            x_values: (0..4).map(|n| n.to_string()).collect(),
            series_names: vec!["naive".to_string(), "iterative".to_string()],
            series_data: vec![
                vec![Some(2.0), Some(3.0), Some(8.0), Some(15.0)],
                vec![Some(1.0), None, Some(1.5), Some(1.7)],
            ],
            metric: "mean_ns".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fibstat_stats::{OutlierMethod, compute_summary};

    #[test]
    fn test_metrics_from_summary() {
        let stats = compute_summary(&[100.0, 200.0, 300.0], OutlierMethod::None);
        let metrics = BenchmarkMetrics::from(&stats);
        assert_eq!(metrics.samples, 3);
        assert!((metrics.mean_ns - 200.0).abs() < 1e-9);
        assert_eq!(metrics.min_ns, 100.0);
        assert_eq!(metrics.max_ns, 300.0);
        assert!((metrics.throughput_ops_sec.unwrap() - 5_000_000.0).abs() < 1e-3);
    }

    #[test]
    fn test_status_serializes_lowercase() {
        let json = serde_json::to_string(&BenchmarkStatus::Crashed).unwrap();
        assert_eq!(json, "\"crashed\"");
    }

    #[test]
    fn test_groups_and_filter() {
        let report = fixtures::sample_report();
        assert_eq!(report.groups(), vec!["fib", "stddev"]);
        assert_eq!(report.group_results("fib").count(), 3);
    }

    #[test]
    fn test_json_round_trip_keeps_series_gaps() {
        let mut report = fixtures::sample_report();
        report.comparison_series.push(fixtures::sample_series());
        let json = crate::generate_json_report(&report).unwrap();
        let parsed = crate::parse_json_report(&json).unwrap();
        assert_eq!(parsed.results.len(), 5);
        assert_eq!(parsed.comparison_series[0].series_data[1][1], None);
        assert_eq!(parsed.results[4].status, BenchmarkStatus::Crashed);
    }

    #[test]
    fn test_summary_failures() {
        let mut summary = ReportSummary::default();
        assert!(!summary.has_failures());
        summary.verification_failures = 1;
        assert!(summary.has_failures());
    }
}
