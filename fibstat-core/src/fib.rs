//! Fibonacci Evaluators
//!
//! `fib(0) = 0`, `fib(1) = 1`, `fib(n) = fib(n - 1) + fib(n - 2)`.
//!
//! Every entry point takes a signed index and rejects negative input up front
//! rather than recursing forever. Indices above [`MAX_FIB_INDEX`] do not fit
//! in a `u64` and are rejected too.

use fxhash::FxHashMap;
use std::cell::RefCell;
use tracing::trace;

/// Largest index whose Fibonacci number fits in a `u64`
pub const MAX_FIB_INDEX: u64 = 93;

/// Above this index the exponential strategies take seconds per call
pub const SLOW_FIB_INDEX: u64 = 40;

/// Errors from the Fibonacci evaluators
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum FibError {
    /// Negative index
    #[error("Fibonacci index must be non-negative, got {0}")]
    NegativeIndex(i64),
    /// Result would not fit in a `u64`
    #[error("fib({n}) overflows u64 (largest supported index is {MAX_FIB_INDEX})")]
    Overflow {
        /// Requested index
        n: u64,
    },
}

fn checked_index(n: i64) -> Result<u64, FibError> {
    let n = u64::try_from(n).map_err(|_| FibError::NegativeIndex(n))?;
    if n > MAX_FIB_INDEX {
        return Err(FibError::Overflow { n });
    }
    Ok(n)
}

fn naive(n: u64) -> u64 {
    if n < 2 {
        return n;
    }
    naive(n - 2) + naive(n - 1)
}

/// Naive double recursion. Exponential time.
pub fn fib(n: i64) -> Result<u64, FibError> {
    checked_index(n).map(naive)
}

/// Linear loop
pub fn fib_iterative(n: i64) -> Result<u64, FibError> {
    let n = checked_index(n)?;
    let (mut current, mut next) = (0u64, 1u64);
    for _ in 0..n {
        // `next` runs one index ahead and may wrap at n = 93; it is never returned then.
        let after = current.wrapping_add(next);
        current = next;
        next = after;
    }
    Ok(current)
}

/// Hit/miss counters for a [`FibCache`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Lookups answered from the cache
    pub hits: u64,
    /// Lookups that had to compute
    pub misses: u64,
    /// Stored entries
    pub entries: usize,
}

/// Memoization cache from index to Fibonacci number.
///
/// Append-only and unbounded for its own lifetime. Indices 0 and 1 are
/// answered directly and never stored. Every stored value is the true
/// Fibonacci number of its key.
#[derive(Debug, Clone, Default)]
pub struct FibCache {
    values: FxHashMap<u64, u64>,
    hits: u64,
    misses: u64,
}

impl FibCache {
    /// Empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Shallow memoization.
    ///
    /// A miss is filled from the naive evaluator for `n - 2` and `n - 1`, so
    /// only repeated top-level calls are shortcut; intermediate indices are
    /// not stored. Use [`FibCache::get_memoized`] for full memoization.
    pub fn get(&mut self, n: i64) -> Result<u64, FibError> {
        let n = checked_index(n)?;
        if n < 2 {
            return Ok(n);
        }
        if let Some(&value) = self.values.get(&n) {
            self.hits += 1;
            return Ok(value);
        }
        self.misses += 1;
        trace!(n, "shallow fib cache miss");
        let value = naive(n - 2) + naive(n - 1);
        self.values.insert(n, value);
        Ok(value)
    }

    /// Full recursive memoization: every index in `2..=n` ends up stored.
    pub fn get_memoized(&mut self, n: i64) -> Result<u64, FibError> {
        let n = checked_index(n)?;
        Ok(self.memoized(n))
    }

    fn memoized(&mut self, n: u64) -> u64 {
        if n < 2 {
            return n;
        }
        if let Some(&value) = self.values.get(&n) {
            self.hits += 1;
            return value;
        }
        self.misses += 1;
        let value = self.memoized(n - 2) + self.memoized(n - 1);
        self.values.insert(n, value);
        value
    }

    /// Stored entry for `n`, if any
    pub fn peek(&self, n: u64) -> Option<u64> {
        self.values.get(&n).copied()
    }

    /// Whether `n` is stored
    pub fn contains(&self, n: u64) -> bool {
        self.values.contains_key(&n)
    }

    /// Number of stored entries
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// No stored entries
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Hit/miss counters
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits,
            misses: self.misses,
            entries: self.values.len(),
        }
    }

    /// Drop all entries and counters
    pub fn clear(&mut self) {
        self.values.clear();
        self.hits = 0;
        self.misses = 0;
    }
}

thread_local! {
    // One default cache per thread: lives as long as the thread, one writer.
    static DEFAULT_CACHE: RefCell<FibCache> = RefCell::new(FibCache::new());
}

/// Shallow memoization against the calling thread's default cache
pub fn fib_cached(n: i64) -> Result<u64, FibError> {
    DEFAULT_CACHE.with_borrow_mut(|cache| cache.get(n))
}

/// Run `f` with the calling thread's default cache
pub fn with_default_cache<R>(f: impl FnOnce(&mut FibCache) -> R) -> R {
    DEFAULT_CACHE.with_borrow_mut(f)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EXPECTED: [u64; 13] = [0, 1, 1, 2, 3, 5, 8, 13, 21, 34, 55, 89, 144];

    fn check_fibonacci(function: impl Fn(i64) -> Result<u64, FibError>) {
        let result: Vec<u64> = (0..13).map(|i| function(i).unwrap()).collect();
        assert_eq!(result, EXPECTED);
    }

    #[test]
    fn test_fib() {
        check_fibonacci(fib);
        assert_eq!(fib(13), Ok(233));
    }

    #[test]
    fn test_fib_iterative() {
        check_fibonacci(fib_iterative);
        assert_eq!(fib_iterative(93), Ok(12_200_160_415_121_876_738));
    }

    #[test]
    fn test_fib_cached() {
        check_fibonacci(fib_cached);
        // Second pass is served from the cache
        check_fibonacci(fib_cached);
        assert!(with_default_cache(|c| c.stats().hits) >= 11);
    }

    #[test]
    fn test_cache_get_and_memoized() {
        let mut cache = FibCache::new();
        check_fibonacci(|n| cache.clone().get(n));
        check_fibonacci(|n| FibCache::new().get_memoized(n));
        assert_eq!(cache.get(20), Ok(6765));
        assert_eq!(cache.get_memoized(20), Ok(6765));
    }

    #[test]
    fn test_negative_index() {
        assert_eq!(fib(-1), Err(FibError::NegativeIndex(-1)));
        assert_eq!(fib_iterative(i64::MIN), Err(FibError::NegativeIndex(i64::MIN)));
        assert_eq!(FibCache::new().get(-3), Err(FibError::NegativeIndex(-3)));
        assert_eq!(
            FibCache::new().get_memoized(-3),
            Err(FibError::NegativeIndex(-3))
        );
    }

    #[test]
    fn test_overflow() {
        assert_eq!(fib_iterative(94), Err(FibError::Overflow { n: 94 }));
        assert_eq!(fib(1_000), Err(FibError::Overflow { n: 1_000 }));
        assert_eq!(
            FibCache::new().get_memoized(94),
            Err(FibError::Overflow { n: 94 })
        );
    }

    #[test]
    fn test_shallow_cache_stores_only_top_level() {
        let mut cache = FibCache::new();
        cache.get(15).unwrap();
        assert_eq!(cache.len(), 1);
        assert!(cache.contains(15));
        assert!(!cache.contains(14));

        cache.get(15).unwrap();
        assert_eq!(
            cache.stats(),
            CacheStats {
                hits: 1,
                misses: 1,
                entries: 1
            }
        );
    }

    #[test]
    fn test_small_indices_not_stored() {
        let mut cache = FibCache::new();
        assert_eq!(cache.get(0), Ok(0));
        assert_eq!(cache.get(1), Ok(1));
        assert!(cache.is_empty());
    }

    #[test]
    fn test_memoized_stores_every_index() {
        let mut cache = FibCache::new();
        assert_eq!(cache.get_memoized(30), Ok(832_040));
        assert_eq!(cache.len(), 29);
        for n in 2..=30 {
            assert_eq!(cache.peek(n), Some(fib_iterative(n as i64).unwrap()));
        }
    }

    #[test]
    fn test_memoized_reaches_max_index() {
        let mut cache = FibCache::new();
        assert_eq!(
            cache.get_memoized(MAX_FIB_INDEX as i64),
            fib_iterative(MAX_FIB_INDEX as i64)
        );
    }

    #[test]
    fn test_clear() {
        let mut cache = FibCache::new();
        cache.get_memoized(10).unwrap();
        cache.clear();
        assert!(cache.is_empty());
        assert_eq!(cache.stats(), CacheStats::default());
    }

    #[test]
    fn test_cached_matches_naive() {
        let mut cache = FibCache::new();
        for n in 0..=25 {
            let expected = fib(n).unwrap();
            assert_eq!(cache.get(n), Ok(expected));
            assert_eq!(cache.get(n), Ok(expected));
            assert_eq!(FibCache::new().get_memoized(n), Ok(expected));
        }
    }
}
