//! Variant Registry
//!
//! Names the evaluation strategies so the CLI, the harness and the
//! cross-checks can address them uniformly.

use crate::fib::{FibCache, FibError, fib, fib_cached, fib_iterative};
use crate::stddev::{StdDevError, std_dev, std_dev_library, std_dev_native};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Unknown variant identifier
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {family} variant '{input}' (expected one of: {expected})")]
pub struct VariantParseError {
    /// "fib" or "stddev"
    pub family: &'static str,
    /// What was given
    pub input: String,
    /// Comma separated valid identifiers
    pub expected: String,
}

/// Fibonacci evaluation strategies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FibVariant {
    /// Naive double recursion
    Naive,
    /// Shallow memoization against the thread's default cache
    Cached,
    /// Full recursive memoization
    Memoized,
    /// Linear loop
    Iterative,
}

impl FibVariant {
    /// Every variant, reference first
    pub const ALL: [FibVariant; 4] = [
        FibVariant::Naive,
        FibVariant::Cached,
        FibVariant::Memoized,
        FibVariant::Iterative,
    ];

    /// Variant the others are checked and compared against
    pub const REFERENCE: FibVariant = FibVariant::Naive;

    /// Stable identifier
    pub fn id(self) -> &'static str {
        match self {
            FibVariant::Naive => "naive",
            FibVariant::Cached => "cached",
            FibVariant::Memoized => "memoized",
            FibVariant::Iterative => "iterative",
        }
    }

    /// Display label for tables and charts
    pub fn label(self) -> &'static str {
        match self {
            FibVariant::Naive => "Naive recursion",
            FibVariant::Cached => "Shallow cache",
            FibVariant::Memoized => "Recursive memo",
            FibVariant::Iterative => "Iterative loop",
        }
    }

    /// Running time grows exponentially with `n`
    pub fn is_exponential(self) -> bool {
        matches!(self, FibVariant::Naive | FibVariant::Cached)
    }

    /// Evaluate `fib(n)`. `Memoized` starts from an empty cache on every call.
    pub fn evaluate(self, n: i64) -> Result<u64, FibError> {
        match self {
            FibVariant::Naive => fib(n),
            FibVariant::Cached => fib_cached(n),
            FibVariant::Memoized => FibCache::new().get_memoized(n),
            FibVariant::Iterative => fib_iterative(n),
        }
    }

    /// Evaluate `fib(n)` using `cache` for the memoizing strategies
    pub fn evaluate_with(self, cache: &mut FibCache, n: i64) -> Result<u64, FibError> {
        match self {
            FibVariant::Naive => fib(n),
            FibVariant::Cached => cache.get(n),
            FibVariant::Memoized => cache.get_memoized(n),
            FibVariant::Iterative => fib_iterative(n),
        }
    }
}

impl fmt::Display for FibVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for FibVariant {
    type Err = VariantParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        FibVariant::ALL
            .into_iter()
            .find(|v| v.id() == wanted)
            .ok_or_else(|| VariantParseError {
                family: "fib",
                input: s.to_string(),
                expected: join_ids(FibVariant::ALL.iter().map(|v| v.id())),
            })
    }
}

/// Standard-deviation evaluation strategies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StdDevVariant {
    /// Iterator sums
    Formula,
    /// Indexed loops
    Native,
    /// Welford via fibstat-stats
    Library,
}

impl StdDevVariant {
    /// Every variant, reference first
    pub const ALL: [StdDevVariant; 3] = [
        StdDevVariant::Formula,
        StdDevVariant::Native,
        StdDevVariant::Library,
    ];

    /// Variant the others are checked and compared against
    pub const REFERENCE: StdDevVariant = StdDevVariant::Formula;

    /// Stable identifier
    pub fn id(self) -> &'static str {
        match self {
            StdDevVariant::Formula => "formula",
            StdDevVariant::Native => "native",
            StdDevVariant::Library => "library",
        }
    }

    /// Display label for tables and charts
    pub fn label(self) -> &'static str {
        match self {
            StdDevVariant::Formula => "Mean/variance formula",
            StdDevVariant::Native => "Indexed loops",
            StdDevVariant::Library => "Welford (library)",
        }
    }

    /// Evaluate the population standard deviation of `values`
    pub fn evaluate(self, values: &[f64]) -> Result<f64, StdDevError> {
        match self {
            StdDevVariant::Formula => std_dev(values),
            StdDevVariant::Native => std_dev_native(values),
            StdDevVariant::Library => std_dev_library(values),
        }
    }
}

impl fmt::Display for StdDevVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for StdDevVariant {
    type Err = VariantParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        StdDevVariant::ALL
            .into_iter()
            .find(|v| v.id() == wanted)
            .ok_or_else(|| VariantParseError {
                family: "stddev",
                input: s.to_string(),
                expected: join_ids(StdDevVariant::ALL.iter().map(|v| v.id())),
            })
    }
}

fn join_ids<'a>(ids: impl Iterator<Item = &'a str>) -> String {
    ids.collect::<Vec<_>>().join(", ")
}
