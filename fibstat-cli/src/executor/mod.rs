//! Benchmark Executor
//!
//! Runs the planned benchmarks and turns their samples into a report.
//!
//! ## Pipeline Overview
//!
//! ```text
//! BenchmarkDef (built by fibstat_core::suite)
//!       │
//!       ▼
//! ┌─────────────┐
//! │verification │  Every variant checked against the reference
//! └──────┬──────┘
//!        │
//!        ▼
//! ┌─────────────┐
//! │  execution  │  Run benchmarks, collect samples
//! └──────┬──────┘
//!        │
//!        ▼
//! ┌─────────────┐
//! │ statistics  │  Compute summary stats (parallel)
//! └──────┬──────┘
//!        │
//!        ▼
//! ┌─────────────┐
//! │   report    │  Report with speedup tables and sweep series
//! └──────┬──────┘
//!        │
//!        ▼
//! ┌─────────────┐
//! │ formatting  │  Human-readable output
//! └─────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`verification`] - Cross-variant output checks
//! - [`execution`] - Core benchmark execution logic
//! - [`statistics`] - Parallel statistics computation
//! - [`report`] - Report building, comparisons and series
//! - [`formatting`] - Human-readable output formatting
//! - [`metadata`] - System metadata collection

mod execution;
mod formatting;
mod metadata;
mod report;
mod statistics;
mod verification;

pub use execution::{BenchExecutionResult, ExecutionConfig, Executor};
pub use formatting::format_human_output;
pub use metadata::system_info;
pub use report::{build_comparisons, build_report, build_sweep_series};
pub use statistics::compute_statistics;
pub use verification::{verify_fib, verify_stddev};
