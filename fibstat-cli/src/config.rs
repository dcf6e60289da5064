//! Configuration loading from fibstat.toml
//!
//! The configuration file is discovered by walking up from the current
//! directory. `--config` picks a file explicitly; CLI flags override both.

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Configuration file name
pub const CONFIG_FILE_NAME: &str = "fibstat.toml";

/// fibstat configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct FibstatConfig {
    /// Runner configuration
    #[serde(default)]
    pub runner: RunnerConfig,
    /// Benchmark inputs
    #[serde(default)]
    pub inputs: InputsConfig,
    /// Output configuration
    #[serde(default)]
    pub output: OutputConfig,
    /// Chart configuration
    #[serde(default)]
    pub visuals: VisualsConfig,
    /// Cross-variant verification
    #[serde(default)]
    pub verify: VerifyConfig,
}

/// Runner configuration for benchmark execution
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunnerConfig {
    /// Warmup duration before measurement (e.g., "1s")
    #[serde(default = "default_warmup")]
    pub warmup_time: String,
    /// Measurement duration (e.g., "3s")
    #[serde(default = "default_measurement")]
    pub measurement_time: String,
    /// Fixed sample count: skip warmup, run exactly N iterations
    #[serde(default)]
    pub samples: Option<u64>,
    /// Minimum number of iterations
    #[serde(default)]
    pub min_iterations: Option<u64>,
    /// Maximum number of iterations
    #[serde(default)]
    pub max_iterations: Option<u64>,
    /// Threads for statistics; 0 uses every core
    #[serde(default)]
    pub threads: usize,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            warmup_time: default_warmup(),
            measurement_time: default_measurement(),
            samples: None,
            min_iterations: None,
            max_iterations: None,
            threads: 0,
        }
    }
}

fn default_warmup() -> String {
    "1s".to_string()
}
fn default_measurement() -> String {
    "3s".to_string()
}

/// Inputs fed to the evaluators
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputsConfig {
    /// Fibonacci index for `bench`
    #[serde(default = "default_fib_n")]
    pub fib_n: i64,
    /// Exclusive upper bound of `n` for `sweep`
    #[serde(default = "default_sweep_max")]
    pub sweep_max: i64,
    /// Length of the random standard-deviation dataset
    #[serde(default = "default_stddev_len")]
    pub stddev_len: usize,
    /// Dataset seed
    #[serde(default = "default_seed")]
    pub seed: u64,
}

impl Default for InputsConfig {
    fn default() -> Self {
        Self {
            fib_n: default_fib_n(),
            sweep_max: default_sweep_max(),
            stddev_len: default_stddev_len(),
            seed: default_seed(),
        }
    }
}

fn default_fib_n() -> i64 {
    25
}
fn default_sweep_max() -> i64 {
    20
}
fn default_stddev_len() -> usize {
    10_000
}
fn default_seed() -> u64 {
    42
}

/// Output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Default output format: "human", "json", "csv"
    #[serde(default = "default_format")]
    pub format: String,
    /// Directory for charts written without an explicit `--output`
    #[serde(default = "default_output_dir")]
    pub directory: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: default_format(),
            directory: default_output_dir(),
        }
    }
}

fn default_format() -> String {
    "human".to_string()
}
fn default_output_dir() -> String {
    "target/fibstat".to_string()
}

/// Visualization configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VisualsConfig {
    /// Color theme: "light" or "dark"
    #[serde(default = "default_theme")]
    pub theme: String,
    /// Chart width in pixels
    #[serde(default = "default_width")]
    pub width: u32,
    /// Chart height in pixels
    #[serde(default = "default_height")]
    pub height: u32,
}

impl Default for VisualsConfig {
    fn default() -> Self {
        Self {
            theme: default_theme(),
            width: default_width(),
            height: default_height(),
        }
    }
}

fn default_theme() -> String {
    "light".to_string()
}
fn default_width() -> u32 {
    1280
}
fn default_height() -> u32 {
    720
}

/// Verification configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyConfig {
    /// Check every variant against the reference before timing
    #[serde(default = "default_verify_enabled")]
    pub enabled: bool,
    /// Relative tolerance for standard-deviation results
    #[serde(default = "default_tolerance")]
    pub tolerance: f64,
}

impl Default for VerifyConfig {
    fn default() -> Self {
        Self {
            enabled: default_verify_enabled(),
            tolerance: default_tolerance(),
        }
    }
}

fn default_verify_enabled() -> bool {
    true
}
fn default_tolerance() -> f64 {
    fibstat_stats::DEFAULT_RELATIVE_TOLERANCE
}

impl FibstatConfig {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let config: Self =
            toml::from_str(&content).with_context(|| format!("invalid {}", path.display()))?;
        Ok(config)
    }

    /// Find the nearest fibstat.toml walking up from `start`
    pub fn find_from(start: impl Into<PathBuf>) -> Option<PathBuf> {
        let mut dir = start.into();
        loop {
            let config_path = dir.join(CONFIG_FILE_NAME);
            if config_path.is_file() {
                return Some(config_path);
            }
            if !dir.pop() {
                return None;
            }
        }
    }

    /// Try to discover and load configuration from the current directory upward
    pub fn discover() -> anyhow::Result<Option<Self>> {
        let Ok(cwd) = std::env::current_dir() else {
            return Ok(None);
        };
        match Self::find_from(cwd) {
            Some(path) => {
                tracing::debug!(path = %path.display(), "using configuration file");
                Self::load(&path).map(Some)
            }
            None => Ok(None),
        }
    }

    /// Explicit `--config` path, else discovery, else defaults
    pub fn resolve(explicit: Option<&Path>) -> anyhow::Result<Self> {
        match explicit {
            Some(path) => Self::load(path),
            None => Ok(Self::discover()?.unwrap_or_default()),
        }
    }

    /// Generate a default configuration as TOML string
    pub fn default_toml() -> String {
        r#"# fibstat configuration

[runner]
# Warmup duration before measurement
warmup_time = "1s"
# Measurement duration
measurement_time = "3s"
# Fixed sample count: skip warmup, run exactly N iterations (uncomment to enable)
# samples = 10
# Minimum iterations (uncomment to enable)
# min_iterations = 10
# Maximum iterations (uncomment to enable)
# max_iterations = 1000000
# Threads for statistics computation (0 = all cores)
threads = 0

[inputs]
# Fibonacci index timed by `fibstat bench`
fib_n = 25
# Exclusive upper bound of n for `fibstat sweep`
sweep_max = 20
# Length of the random dataset for the standard deviation benchmarks
stddev_len = 10000
# Seed of that dataset
seed = 42

[output]
# Default output format: human, json, csv
format = "human"
# Directory for generated charts
directory = "target/fibstat"

[visuals]
# Color theme: light or dark
theme = "light"
# Chart dimensions
width = 1280
height = 720

[verify]
# Check every variant against the reference before timing
enabled = true
# Relative tolerance for standard deviation results
tolerance = 1e-9
"#
        .to_string()
    }

    /// Parse duration string (e.g., "3s", "500ms", "2m") to nanoseconds
    pub fn parse_duration(s: &str) -> anyhow::Result<u64> {
        let s = s.trim();
        if s.is_empty() {
            return Err(anyhow::anyhow!("Empty duration string"));
        }

        let (num_part, unit_part) = s
            .char_indices()
            .find(|(_, c)| c.is_alphabetic())
            .map(|(i, _)| s.split_at(i))
            .unwrap_or((s, "s"));

        let value: f64 = num_part
            .trim()
            .parse()
            .map_err(|_| anyhow::anyhow!("Invalid duration number: {}", num_part))?;
        if !value.is_finite() || value < 0.0 {
            return Err(anyhow::anyhow!("Duration must be non-negative: {}", s));
        }

        let multiplier: u64 = match unit_part.to_lowercase().as_str() {
            "ns" => 1,
            "us" | "µs" => 1_000,
            "ms" => 1_000_000,
            "s" | "" => 1_000_000_000,
            "m" | "min" => 60_000_000_000,
            _ => return Err(anyhow::anyhow!("Unknown duration unit: {}", unit_part)),
        };

        Ok((value * multiplier as f64) as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = FibstatConfig::default();
        assert_eq!(config.runner.warmup_time, "1s");
        assert_eq!(config.runner.measurement_time, "3s");
        assert_eq!(config.inputs.fib_n, 25);
        assert_eq!(config.inputs.seed, 42);
        assert!(config.verify.enabled);
        assert_eq!(config.output.directory, "target/fibstat");
    }

    #[test]
    fn test_parse_duration() {
        assert_eq!(FibstatConfig::parse_duration("3s").unwrap(), 3_000_000_000);
        assert_eq!(FibstatConfig::parse_duration("500ms").unwrap(), 500_000_000);
        assert_eq!(FibstatConfig::parse_duration("100us").unwrap(), 100_000);
        assert_eq!(FibstatConfig::parse_duration("100µs").unwrap(), 100_000);
        assert_eq!(FibstatConfig::parse_duration("1000ns").unwrap(), 1000);
        assert_eq!(FibstatConfig::parse_duration("2m").unwrap(), 120_000_000_000);
        assert_eq!(FibstatConfig::parse_duration("1.5s").unwrap(), 1_500_000_000);
        assert_eq!(FibstatConfig::parse_duration("2").unwrap(), 2_000_000_000);
    }

    #[test]
    fn test_parse_duration_errors() {
        assert!(FibstatConfig::parse_duration("").is_err());
        assert!(FibstatConfig::parse_duration("fast").is_err());
        assert!(FibstatConfig::parse_duration("3h").is_err());
        assert!(FibstatConfig::parse_duration("-1s").is_err());
    }

    #[test]
    fn test_parse_toml() {
        let toml_str = r#"
            [runner]
            warmup_time = "100ms"
            samples = 5

            [inputs]
            fib_n = 30

            [verify]
            enabled = false
        "#;

        let config: FibstatConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.runner.warmup_time, "100ms");
        assert_eq!(config.runner.samples, Some(5));
        assert_eq!(config.inputs.fib_n, 30);
        assert!(!config.verify.enabled);
        // Defaults should still apply
        assert_eq!(config.runner.measurement_time, "3s");
        assert_eq!(config.inputs.stddev_len, 10_000);
        assert_eq!(config.output.format, "human");
        assert_eq!(config.visuals.width, 1280);
    }

    #[test]
    fn test_default_toml_parses() {
        let config: FibstatConfig = toml::from_str(&FibstatConfig::default_toml()).unwrap();
        assert_eq!(config.runner.warmup_time, "1s");
        assert_eq!(config.inputs.sweep_max, 20);
        assert_eq!(config.verify.tolerance, 1e-9);
        assert_eq!(config.visuals.theme, "light");
    }

    #[test]
    fn test_find_from_walks_up() {
        let root = std::env::temp_dir().join(format!("fibstat-config-{}", std::process::id()));
        let nested = root.join("a").join("b");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(root.join(CONFIG_FILE_NAME), "[inputs]\nfib_n = 7\n").unwrap();

        let found = FibstatConfig::find_from(&nested).unwrap();
        assert_eq!(found, root.join(CONFIG_FILE_NAME));
        let config = FibstatConfig::load(&found).unwrap();
        assert_eq!(config.inputs.fib_n, 7);

        std::fs::remove_dir_all(&root).unwrap();
    }
}
