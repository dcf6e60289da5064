#![warn(missing_docs)]
//! fibstat CLI Library
//!
//! Command line front end: evaluates single values, benchmarks every variant
//! of both families, sweeps Fibonacci over `n`, and renders charts from saved
//! reports.
//!
//! # Example
//!
//! ```ignore
//! fn main() -> anyhow::Result<()> {
//!     fibstat_cli::run()
//! }
//! ```

mod config;
mod executor;
mod planner;

pub use config::*;
pub use executor::{
    BenchExecutionResult, ExecutionConfig, Executor, build_comparisons, build_report,
    build_sweep_series, compute_statistics, format_human_output, system_info, verify_fib,
    verify_stddev,
};
pub use planner::{ExecutionPlan, build_plan, compile_filter};

use anyhow::{Context, bail};
use clap::{Args, Parser, Subcommand};
use fibstat_core::{
    BenchmarkDef, DEFAULT_SAMPLE_COUNT, FIB_GROUP, FibVariant, SLOW_FIB_INDEX, STDDEV_GROUP,
    StdDevVariant, fib_benchmarks, random_dataset, stddev_benchmarks, sweep_benchmarks, with_default_cache,
};
use fibstat_report::{
    ChartOptions, OutputFormat, Report, ReportConfig, Theme, chart_from_report,
    generate_csv_report, generate_json_report, parse_json_report,
};
use fibstat_stats::OutlierMethod;
use rayon::ThreadPoolBuilder;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

/// fibstat CLI arguments
#[derive(Parser, Debug)]
#[command(name = "fibstat")]
#[command(
    author,
    version,
    about = "fibstat - compare Fibonacci and standard deviation strategies"
)]
pub struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file (default: nearest fibstat.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Command to run
    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Compute fib(N) with one or every variant
    Fib {
        /// Index into the sequence (naive and cached slow down sharply past 40)
        #[arg(allow_negative_numbers = true)]
        n: i64,
        /// Variant id, or "all"
        #[arg(long, default_value = "all")]
        variant: String,
    },
    /// Population standard deviation of the given values
    Stddev {
        /// Values; combined with --file when both are given
        #[arg(allow_negative_numbers = true)]
        values: Vec<f64>,
        /// File of comma or whitespace separated numbers
        #[arg(long)]
        file: Option<PathBuf>,
        /// Variant id, or "all"
        #[arg(long, default_value = "all")]
        variant: String,
    },
    /// Time every variant of both families
    Bench {
        /// Filter benchmarks by regex pattern
        #[arg(default_value = ".*")]
        filter: String,
        /// Fibonacci index to time (naive and cached slow down sharply past 40)
        #[arg(long)]
        n: Option<i64>,
        /// Length of the random standard deviation dataset
        #[arg(long)]
        len: Option<usize>,
        /// Dataset seed
        #[arg(long)]
        seed: Option<u64>,
        /// Run benchmarks for this group only
        #[arg(long)]
        group: Option<String>,
        #[command(flatten)]
        timing: TimingArgs,
    },
    /// Time the Fibonacci variants for every n in 0..max
    Sweep {
        /// Exclusive upper bound of n
        #[arg(long)]
        max: Option<i64>,
        /// Regex selecting variant ids
        #[arg(long)]
        variants: Option<String>,
        #[command(flatten)]
        timing: TimingArgs,
    },
    /// Render an SVG chart from a JSON report
    Plot {
        /// Report written with --format json
        report: PathBuf,
        /// SVG path (default: <output.directory>/<report name>.svg)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Chart only this group
        #[arg(long)]
        group: Option<String>,
        /// Linear instead of logarithmic y axis
        #[arg(long)]
        linear: bool,
        /// Color theme: light or dark
        #[arg(long)]
        theme: Option<String>,
    },
    /// List the benchmark plan
    List {
        /// Filter benchmarks by regex pattern
        #[arg(default_value = ".*")]
        filter: String,
    },
    /// Write a default fibstat.toml
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

/// Timing and output flags shared by `bench` and `sweep`
#[derive(Args, Debug, Clone, Default)]
pub struct TimingArgs {
    /// Output format: human, json, csv
    #[arg(long)]
    pub format: Option<String>,

    /// Output file (stdout if not specified)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Fixed sample count mode: skip warmup, run exactly N iterations
    #[arg(long)]
    pub samples: Option<u64>,

    /// Warmup duration (e.g. "500ms")
    #[arg(long)]
    pub warmup: Option<String>,

    /// Measurement duration (e.g. "2s")
    #[arg(long)]
    pub measurement: Option<String>,

    /// Minimum number of iterations
    #[arg(long)]
    pub min_iterations: Option<u64>,

    /// Maximum number of iterations
    #[arg(long)]
    pub max_iterations: Option<u64>,

    /// Threads for statistics computation; 0 = all cores
    #[arg(long, short = 'j')]
    pub threads: Option<usize>,

    /// Skip the cross-variant output checks
    #[arg(long)]
    pub no_verify: bool,
}

/// Run the fibstat CLI with the process arguments.
pub fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    run_with_cli(cli)
}

/// Run the fibstat CLI with pre-parsed arguments.
pub fn run_with_cli(cli: Cli) -> anyhow::Result<()> {
    init_logging(cli.verbose);

    let config = FibstatConfig::resolve(cli.config.as_deref())?;

    match cli.command {
        Commands::Fib { n, ref variant } => print_fib(n, variant),
        Commands::Stddev {
            ref values,
            ref file,
            ref variant,
        } => print_stddev(values, file.as_deref(), variant),
        Commands::Bench {
            ref filter,
            n,
            len,
            seed,
            ref group,
            ref timing,
        } => run_bench(&config, filter, n, len, seed, group.as_deref(), timing),
        Commands::Sweep {
            max,
            ref variants,
            ref timing,
        } => run_sweep(&config, max, variants.as_deref(), timing),
        Commands::Plot {
            ref report,
            ref output,
            ref group,
            linear,
            ref theme,
        } => plot_report(
            &config,
            report,
            output.as_deref(),
            group.as_deref(),
            linear,
            theme.as_deref(),
        ),
        Commands::List { ref filter } => list_benchmarks(&config, filter),
        Commands::Init { force } => init_config(force),
    }
}

fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "fibstat={level},fibstat_core={level},fibstat_cli={level},fibstat_report={level}"
        ))
    });
    // A second initialisation (tests, embedding) keeps the first subscriber.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn fib_variants(selector: &str) -> anyhow::Result<Vec<FibVariant>> {
    if selector.eq_ignore_ascii_case("all") {
        return Ok(FibVariant::ALL.to_vec());
    }
    Ok(vec![selector.parse()?])
}

fn stddev_variants(selector: &str) -> anyhow::Result<Vec<StdDevVariant>> {
    if selector.eq_ignore_ascii_case("all") {
        return Ok(StdDevVariant::ALL.to_vec());
    }
    Ok(vec![selector.parse()?])
}

/// Exponential-time variants that will run at index `n`
fn slow_variants(n: i64, variants: &[FibVariant], verifying: bool) -> Vec<FibVariant> {
    if n <= SLOW_FIB_INDEX as i64 {
        return Vec::new();
    }
    let mut slow: Vec<FibVariant> = variants
        .iter()
        .copied()
        .filter(|v| v.is_exponential())
        .collect();
    if verifying && !variants.is_empty() && !slow.contains(&FibVariant::REFERENCE) {
        slow.insert(0, FibVariant::REFERENCE);
    }
    slow
}

fn warn_slow(n: i64, variants: &[FibVariant], verifying: bool) {
    let slow = slow_variants(n, variants, verifying);
    if !slow.is_empty() {
        let ids: Vec<&str> = slow.iter().map(|v| v.id()).collect();
        tracing::warn!(
            n,
            variants = %ids.join(", "),
            "exponential-time variants above n = {} may run for minutes or longer",
            SLOW_FIB_INDEX
        );
    }
}

fn print_fib(n: i64, selector: &str) -> anyhow::Result<()> {
    let variants = fib_variants(selector)?;
    warn_slow(n, &variants, false);
    for variant in variants {
        let value = match variant {
            FibVariant::Cached => fibstat_core::fib_cached(n)?,
            other => other.evaluate(n)?,
        };
        println!("{:<10} fib({}) = {}", variant.id(), n, value);
    }
    let stats = with_default_cache(|cache| cache.stats());
    tracing::debug!(
        hits = stats.hits,
        misses = stats.misses,
        entries = stats.entries,
        "default cache"
    );
    Ok(())
}

/// Numbers separated by commas and/or whitespace
pub fn parse_values(text: &str) -> anyhow::Result<Vec<f64>> {
    text.split(|c: char| c == ',' || c.is_whitespace())
        .filter(|token| !token.is_empty())
        .map(|token| {
            token
                .parse::<f64>()
                .with_context(|| format!("invalid number '{}'", token))
        })
        .collect()
}

fn print_stddev(values: &[f64], file: Option<&Path>, selector: &str) -> anyhow::Result<()> {
    let mut data = values.to_vec();
    if let Some(path) = file {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        data.extend(parse_values(&text)?);
    }

    for variant in stddev_variants(selector)? {
        let value = variant.evaluate(&data)?;
        println!("{:<10} stddev = {}", variant.id(), value);
    }
    Ok(())
}

/// Build an ExecutionConfig by layering: fibstat.toml → CLI overrides.
fn build_execution_config(
    timing: &TimingArgs,
    config: &FibstatConfig,
) -> anyhow::Result<ExecutionConfig> {
    if let Some(n) = timing.samples.or(config.runner.samples) {
        return Ok(ExecutionConfig::fixed_samples(n));
    }

    let warmup = timing.warmup.as_deref().unwrap_or(&config.runner.warmup_time);
    let measurement = timing
        .measurement
        .as_deref()
        .unwrap_or(&config.runner.measurement_time);

    Ok(ExecutionConfig {
        warmup_time_ns: FibstatConfig::parse_duration(warmup).context("invalid warmup time")?,
        measurement_time_ns: FibstatConfig::parse_duration(measurement)
            .context("invalid measurement time")?,
        min_iterations: timing.min_iterations.or(config.runner.min_iterations),
        max_iterations: timing.max_iterations.or(config.runner.max_iterations),
        target_samples: DEFAULT_SAMPLE_COUNT,
        show_progress: true,
    })
}

fn report_config(exec: &ExecutionConfig) -> ReportConfig {
    ReportConfig {
        warmup_time_ns: exec.warmup_time_ns,
        measurement_time_ns: exec.measurement_time_ns,
        min_iterations: exec.min_iterations,
        max_iterations: exec.max_iterations,
        target_samples: exec.target_samples,
        ..Default::default()
    }
}

/// Benchmark definitions for `bench` and `list`
fn bench_definitions(n: i64, len: usize, seed: u64) -> anyhow::Result<Vec<BenchmarkDef>> {
    let mut defs = fib_benchmarks(n)?;
    let dataset: Arc<[f64]> = random_dataset(len, seed).into();
    defs.extend(stddev_benchmarks(dataset));
    Ok(defs)
}

fn run_bench(
    config: &FibstatConfig,
    filter: &str,
    n: Option<i64>,
    len: Option<usize>,
    seed: Option<u64>,
    group: Option<&str>,
    timing: &TimingArgs,
) -> anyhow::Result<()> {
    let n = n.unwrap_or(config.inputs.fib_n);
    let len = len.unwrap_or(config.inputs.stddev_len);
    let seed = seed.unwrap_or(config.inputs.seed);
    if len == 0 {
        bail!("--len must be at least 1");
    }

    let filter_re = compile_filter(filter)?;
    let plan = build_plan(bench_definitions(n, len, seed)?, filter_re.as_ref(), group);
    if plan.is_empty() {
        println!("No benchmarks found.");
        return Ok(());
    }

    let verifying = config.verify.enabled && !timing.no_verify;
    let fib_selected: Vec<FibVariant> = selected_variants(&plan, FIB_GROUP);
    warn_slow(n, &fib_selected, verifying);

    let mut verifications = Vec::new();
    if verifying {
        if !fib_selected.is_empty() {
            verifications.extend(verify_fib(n, &fib_selected));
        }
        let stddev_selected: Vec<StdDevVariant> = selected_variants(&plan, STDDEV_GROUP);
        if !stddev_selected.is_empty() {
            let dataset = random_dataset(len, seed);
            verifications.extend(verify_stddev(
                &dataset,
                &stddev_selected,
                config.verify.tolerance,
            ));
        }
    }

    let exec_config = build_execution_config(timing, config)?;
    let report_config = ReportConfig {
        fib_n: Some(n),
        stddev_len: Some(len),
        seed: Some(seed),
        ..report_config(&exec_config)
    };
    run_plan(config, timing, &plan, exec_config, report_config, verifications)
}

fn selected_variants<V: std::str::FromStr>(plan: &ExecutionPlan, group: &str) -> Vec<V> {
    plan.benchmarks
        .iter()
        .filter(|b| b.group == group)
        .filter_map(|b| b.variant.parse().ok())
        .collect()
}

fn run_sweep(
    config: &FibstatConfig,
    max: Option<i64>,
    variants: Option<&str>,
    timing: &TimingArgs,
) -> anyhow::Result<()> {
    let max = max.unwrap_or(config.inputs.sweep_max);
    let selector = compile_filter(variants.unwrap_or(""))?;
    let selected: Vec<FibVariant> = FibVariant::ALL
        .into_iter()
        .filter(|v| selector.as_ref().is_none_or(|re| re.is_match(v.id())))
        .collect();
    if selected.is_empty() {
        bail!("no Fibonacci variant matches '{}'", variants.unwrap_or(""));
    }

    let plan = build_plan(sweep_benchmarks(max, &selected)?, None, None);
    if plan.is_empty() {
        println!("No benchmarks found.");
        return Ok(());
    }

    let verifying = config.verify.enabled && !timing.no_verify;
    warn_slow(max - 1, &selected, verifying);

    let mut verifications = Vec::new();
    if verifying {
        for n in 0..max {
            verifications.extend(verify_fib(n, &selected).into_iter().filter(|v| !v.passed));
        }
        tracing::info!(
            checked = max * (selected.len() as i64),
            failures = verifications.len(),
            "sweep verification"
        );
    }

    let exec_config = build_execution_config(timing, config)?;
    let report_config = ReportConfig {
        sweep_max: Some(max),
        ..report_config(&exec_config)
    };
    run_plan(config, timing, &plan, exec_config, report_config, verifications)
}

/// Execute a plan and emit its report; shared by `bench` and `sweep`
fn run_plan(
    config: &FibstatConfig,
    timing: &TimingArgs,
    plan: &ExecutionPlan,
    exec_config: ExecutionConfig,
    report_config: ReportConfig,
    verifications: Vec<fibstat_report::VerificationResult>,
) -> anyhow::Result<()> {
    let format: OutputFormat = timing
        .format
        .as_deref()
        .unwrap_or(&config.output.format)
        .parse()
        .map_err(|e: String| anyhow::anyhow!(e))?;

    let threads = timing.threads.unwrap_or(config.runner.threads);
    if threads > 0 {
        ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .ok();
    }

    let threads_str = if threads == 0 {
        "all".to_string()
    } else {
        threads.to_string()
    };
    eprintln!(
        "Running {} benchmarks, {} threads...\n",
        plan.len(),
        threads_str
    );

    let start_time = Instant::now();
    let results = Executor::new(exec_config).execute(&plan.benchmarks);
    let stats = compute_statistics(&results, OutlierMethod::default());

    let total_duration_ms = start_time.elapsed().as_secs_f64() * 1000.0;
    let report = build_report(&results, &stats, verifications, report_config, total_duration_ms);

    let output = render(&report, format)?;
    write_output(timing.output.as_deref(), &output)?;

    if report.summary.crashed > 0 {
        bail!("{} benchmark(s) crashed during execution", report.summary.crashed);
    }
    if report.summary.verification_failures > 0 {
        bail!(
            "{} verification failure(s): variants disagree with the reference",
            report.summary.verification_failures
        );
    }
    Ok(())
}

fn render(report: &Report, format: OutputFormat) -> anyhow::Result<String> {
    Ok(match format {
        OutputFormat::Json => generate_json_report(report)?,
        OutputFormat::Csv => generate_csv_report(report),
        OutputFormat::Human => format_human_output(report),
    })
}

fn write_output(path: Option<&Path>, output: &str) -> anyhow::Result<()> {
    match path {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("failed to create {}", parent.display()))?;
            }
            std::fs::write(path, output)
                .with_context(|| format!("failed to write {}", path.display()))?;
            eprintln!("Report written to: {}", path.display());
        }
        None => print!("{}", output),
    }
    Ok(())
}

fn plot_report(
    config: &FibstatConfig,
    report_path: &Path,
    output: Option<&Path>,
    group: Option<&str>,
    linear: bool,
    theme: Option<&str>,
) -> anyhow::Result<()> {
    let json = std::fs::read_to_string(report_path)
        .with_context(|| format!("failed to read {}", report_path.display()))?;
    let report = parse_json_report(&json)
        .with_context(|| format!("{} is not a fibstat JSON report", report_path.display()))?;

    let theme: Theme = theme
        .unwrap_or(&config.visuals.theme)
        .parse()
        .map_err(|e: String| anyhow::anyhow!(e))?;
    let options = ChartOptions {
        width: config.visuals.width,
        height: config.visuals.height,
        theme,
        log_scale: !linear,
    };
    let svg = chart_from_report(&report, group, &options)?;

    let path = match output {
        Some(path) => path.to_path_buf(),
        None => {
            let stem = report_path
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("report");
            Path::new(&config.output.directory).join(format!("{}.svg", stem))
        }
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    std::fs::write(&path, svg).with_context(|| format!("failed to write {}", path.display()))?;
    println!("Chart written to: {}", path.display());
    Ok(())
}

fn list_benchmarks(config: &FibstatConfig, filter: &str) -> anyhow::Result<()> {
    let filter_re = compile_filter(filter)?;
    let defs = bench_definitions(
        config.inputs.fib_n,
        config.inputs.stddev_len,
        config.inputs.seed,
    )?;
    let plan = build_plan(defs, filter_re.as_ref(), None);

    println!("fibstat plan:");
    for group in plan.groups() {
        println!("├── group: {}", group);
        for bench in plan.benchmarks.iter().filter(|b| b.group == group) {
            println!("│   ├── {} ({})", bench.id, bench.name);
        }
    }
    println!("{} benchmarks found.", plan.len());
    println!(
        "Sweep: {} variants for n in 0..{} (fibstat sweep)",
        FibVariant::ALL.len(),
        config.inputs.sweep_max
    );
    Ok(())
}

fn init_config(force: bool) -> anyhow::Result<()> {
    let path = Path::new(CONFIG_FILE_NAME);
    if path.exists() && !force {
        bail!("{} already exists (use --force to overwrite)", path.display());
    }
    std::fs::write(path, FibstatConfig::default_toml())
        .with_context(|| format!("failed to write {}", path.display()))?;
    println!("Wrote {}", path.display());
    Ok(())
}
