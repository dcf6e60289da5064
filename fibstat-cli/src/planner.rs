//! Benchmark Planner
//!
//! Builds the execution plan by filtering benchmarks.
//!
//! Filtering options:
//! - Regex pattern matching on benchmark ID
//! - Group filtering
//!
//! Ordering: groups in first-seen order, declaration order within a group,
//! so baselines run before the variants compared against them.

use fibstat_core::BenchmarkDef;
use regex::Regex;

/// Execution plan for benchmarks
#[derive(Debug, Default)]
pub struct ExecutionPlan {
    /// Ordered list of benchmarks to run
    pub benchmarks: Vec<BenchmarkDef>,
}

impl ExecutionPlan {
    /// Distinct groups in plan order
    pub fn groups(&self) -> Vec<&str> {
        let mut groups: Vec<&str> = Vec::new();
        for bench in &self.benchmarks {
            if !groups.contains(&bench.group.as_str()) {
                groups.push(&bench.group);
            }
        }
        groups
    }

    /// Number of planned benchmarks
    pub fn len(&self) -> usize {
        self.benchmarks.len()
    }

    /// Whether nothing was selected
    pub fn is_empty(&self) -> bool {
        self.benchmarks.is_empty()
    }
}

/// Build execution plan from the available benchmarks
pub fn build_plan(
    benchmarks: impl IntoIterator<Item = BenchmarkDef>,
    filter: Option<&Regex>,
    group: Option<&str>,
) -> ExecutionPlan {
    let selected: Vec<_> = benchmarks
        .into_iter()
        .filter(|b| filter.is_none_or(|re| re.is_match(&b.id)))
        .filter(|b| group.is_none_or(|g| b.group == g))
        .collect();

    let mut ordered = Vec::with_capacity(selected.len());
    let mut groups: Vec<String> = Vec::new();
    for bench in &selected {
        if !groups.contains(&bench.group) {
            groups.push(bench.group.clone());
        }
    }
    for g in &groups {
        ordered.extend(selected.iter().filter(|b| &b.group == g).cloned());
    }

    ExecutionPlan { benchmarks: ordered }
}

/// Compile a user filter; an empty pattern matches everything
pub fn compile_filter(pattern: &str) -> anyhow::Result<Option<Regex>> {
    if pattern.is_empty() || pattern == ".*" {
        return Ok(None);
    }
    Regex::new(pattern)
        .map(Some)
        .map_err(|e| anyhow::anyhow!("invalid filter '{}': {}", pattern, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use fibstat_core::{Bencher, Runner};
    use std::sync::Arc;

    fn make_bench(id: &str, group: &str) -> BenchmarkDef {
        let runner: Runner = Arc::new(|_: &mut Bencher| {});
        BenchmarkDef {
            id: id.to_string(),
            name: id.to_string(),
            group: group.to_string(),
            variant: id.rsplit('/').next().unwrap_or(id).to_string(),
            input: "0".to_string(),
            runner,
        }
    }

    fn sample() -> Vec<BenchmarkDef> {
        vec![
            make_bench("fib/naive", "fib"),
            make_bench("stddev/formula", "stddev"),
            make_bench("fib/iterative", "fib"),
            make_bench("stddev/native", "stddev"),
        ]
    }

    #[test]
    fn test_no_filter_groups_in_order() {
        let plan = build_plan(sample(), None, None);
        let ids: Vec<_> = plan.benchmarks.iter().map(|b| b.id.as_str()).collect();
        assert_eq!(
            ids,
            ["fib/naive", "fib/iterative", "stddev/formula", "stddev/native"]
        );
        assert_eq!(plan.groups(), ["fib", "stddev"]);
    }

    #[test]
    fn test_group_filter() {
        let plan = build_plan(sample(), None, Some("stddev"));
        assert_eq!(plan.len(), 2);
        assert!(plan.benchmarks.iter().all(|b| b.group == "stddev"));
    }

    #[test]
    fn test_regex_filter() {
        let re = compile_filter("naive|native").unwrap();
        let plan = build_plan(sample(), re.as_ref(), None);
        let ids: Vec<_> = plan.benchmarks.iter().map(|b| b.id.as_str()).collect();
        assert_eq!(ids, ["fib/naive", "stddev/native"]);
    }

    #[test]
    fn test_filter_compilation() {
        assert!(compile_filter("").unwrap().is_none());
        assert!(compile_filter(".*").unwrap().is_none());
        assert!(compile_filter("fib/").unwrap().is_some());
        assert!(compile_filter("(").is_err());
    }

    #[test]
    fn test_nothing_selected() {
        let plan = build_plan(sample(), None, Some("missing"));
        assert!(plan.is_empty());
        assert!(plan.groups().is_empty());
    }
}
