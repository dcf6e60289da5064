#![warn(missing_docs)]
//! fibstat Report - Reporting and Visualization
//!
//! Output formats for a finished run:
//! - JSON (machine-readable, also the input of `fibstat plot`)
//! - CSV (spreadsheet-compatible)
//! - SVG charts (log-scale bar chart per group, line chart for sweeps)

mod chart;
mod csv;
mod json;
mod report;

pub use chart::{
    ChartError, ChartOptions, Theme, chart_from_report, render_bar_chart, render_line_chart,
};
pub use csv::generate_csv_report;
pub use json::{SCHEMA_VERSION, generate_json_report, parse_json_report};
pub use report::{
    BenchmarkMetrics, BenchmarkReportResult, BenchmarkStatus, ComparisonEntry, ComparisonResult,
    ComparisonSeries, FailureInfo, Report, ReportConfig, ReportMeta, ReportSummary, SystemInfo,
    VerificationResult,
};

/// Output format selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Pretty JSON
    Json,
    /// CSV, one row per benchmark
    Csv,
    /// Terminal text
    Human,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "csv" => Ok(OutputFormat::Csv),
            "human" | "text" => Ok(OutputFormat::Human),
            other => Err(format!("Unknown output format: {}", other)),
        }
    }
}

/// Format nanoseconds with a unit that keeps 1-3 integer digits
pub fn format_duration(nanos: f64) -> String {
    let abs = nanos.abs();
    if abs < 1_000.0 {
        format!("{:.2} ns", nanos)
    } else if abs < 1_000_000.0 {
        format!("{:.2} µs", nanos / 1_000.0)
    } else if abs < 1_000_000_000.0 {
        format!("{:.2} ms", nanos / 1_000_000.0)
    } else {
        format!("{:.2} s", nanos / 1_000_000_000.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_format_parse() {
        assert_eq!("JSON".parse::<OutputFormat>(), Ok(OutputFormat::Json));
        assert_eq!("text".parse::<OutputFormat>(), Ok(OutputFormat::Human));
        assert!("html".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(12.346), "12.35 ns");
        assert_eq!(format_duration(1_500.0), "1.50 µs");
        assert_eq!(format_duration(571_000_000.0), "571.00 ms");
        assert_eq!(format_duration(2_000_000_000.0), "2.00 s");
    }
}
