//! Flat data-parallel primitives for segscan.
//!
//! The segmented scans are written entirely against the [`Backend`] trait,
//! which knows nothing about segments. A backend only has to provide
//! element-wise construction, a flat prefix scan and a scatter; every other
//! primitive has a default expressed through those.
//!
//! # Architecture
//!
//! - **Backend trait**: the primitive API (map, zip, scan, permute, backpermute, replicate)
//! - **ScanConfig**: serde configuration selecting and tuning a backend
//! - **AnyBackend**: runtime-selected backend built from a `ScanConfig`
//!
//! # Backends
//!
//! ## SequentialBackend
//! - Single-threaded reference implementation
//! - Collisions in `permute` resolve in ascending source order
//!
//! ## ParallelBackend
//! - Runs on a dedicated rayon thread pool
//! - Blocked reduce-then-scan prefix scan, needs associativity only
//! - Falls back to the sequential path below `min_chunk_len` elements
//!
//! # Example
//!
//! ```
//! use segscan::backend::{AnyBackend, Backend, Direction, ScanConfig};
//! use segscan::vector::Vector;
//!
//! # fn main() -> segscan::error::Result<()> {
//! let backend = AnyBackend::from_config(&ScanConfig::default())?;
//! let values = Vector::new(vec![1i64, 2, 3]);
//! let sums = backend.scan(Direction::Left, |a, b| a + b, &values);
//! assert_eq!(sums, [1, 3, 6]);
//! # Ok(())
//! # }
//! ```

use crate::error::{Result, SegScanError};
use crate::vector::Vector;

pub mod config;
pub mod parallel;
pub mod sequential;

pub use config::{BackendKind, ScanConfig};
pub use parallel::ParallelBackend;
pub use sequential::SequentialBackend;

/// Direction in which a scan accumulates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Accumulate from index 0 upwards.
    Left,
    /// Accumulate from the last index downwards.
    Right,
}

/// Element types the primitives can move between threads.
pub trait Element: Clone + Send + Sync {}

impl<T: Clone + Send + Sync> Element for T {}

/// The flat, shape-oblivious primitive API.
///
/// Operators passed to [`Backend::scan`] must be associative; commutativity
/// is never assumed. A non-associative operator yields a well-typed but
/// unspecified result.
pub trait Backend: Send + Sync {
    /// Short name used in logs and CLI output.
    fn name(&self) -> &'static str;

    /// Build a vector of `len` elements from their indices.
    fn generate<T, F>(&self, len: usize, f: F) -> Vector<T>
    where
        T: Element,
        F: Fn(usize) -> T + Send + Sync;

    /// Inclusive prefix scan of `v` in direction `dir`.
    ///
    /// For `Left`, element `i` is `v[0] op ... op v[i]`; for `Right` it is
    /// `v[i] op ... op v[n - 1]`.
    fn scan<T, F>(&self, dir: Direction, op: F, v: &Vector<T>) -> Vector<T>
    where
        T: Element,
        F: Fn(T, T) -> T + Send + Sync;

    /// Scatter `source` into a copy of `defaults`.
    ///
    /// `index(i)` names the destination of `source[i]`; `None` drops the
    /// write. When several sources land on the same destination they are
    /// folded in with `combine(new, old)`.
    fn permute<T, C, I>(
        &self,
        combine: C,
        defaults: &Vector<T>,
        index: I,
        source: &Vector<T>,
    ) -> Result<Vector<T>>
    where
        T: Element,
        C: Fn(T, T) -> T + Send + Sync,
        I: Fn(usize) -> Option<usize> + Send + Sync;

    /// Broadcast `value` into a vector of `len` elements.
    fn replicate<T: Element>(&self, len: usize, value: T) -> Vector<T> {
        self.generate(len, |_| value.clone())
    }

    /// Apply `f` to every element.
    fn map<T, U, F>(&self, f: F, v: &Vector<T>) -> Vector<U>
    where
        T: Element,
        U: Element,
        F: Fn(&T) -> U + Send + Sync,
    {
        self.generate(v.len(), |i| f(&v[i]))
    }

    /// Combine two vectors pointwise. The result has the length of the
    /// shorter input.
    fn zip_with<A, B, C, F>(&self, f: F, a: &Vector<A>, b: &Vector<B>) -> Vector<C>
    where
        A: Element,
        B: Element,
        C: Element,
        F: Fn(&A, &B) -> C + Send + Sync,
    {
        self.generate(a.len().min(b.len()), |i| f(&a[i], &b[i]))
    }

    /// Gather: element `i` of the result is `source[index(i)]`.
    fn backpermute<T, I>(&self, len: usize, index: I, source: &Vector<T>) -> Result<Vector<T>>
    where
        T: Element,
        I: Fn(usize) -> usize + Send + Sync,
    {
        let gathered = self.generate(len, |i| {
            let j = index(i);
            source.get(j).cloned().ok_or(j)
        });

        gathered
            .iter()
            .map(|read| {
                read.clone()
                    .map_err(|j| SegScanError::index_out_of_bounds(j, source.len()))
            })
            .collect::<Result<Vec<_>>>()
            .map(Vector::new)
    }

    /// Exclusive scan together with the overall fold.
    ///
    /// For `Left` the identity is combined from the left
    /// (`identity op v[0] op ... op v[i - 1]`); for `Right` from the right.
    fn scan_exclusive<T, F>(
        &self,
        dir: Direction,
        op: F,
        identity: T,
        v: &Vector<T>,
    ) -> (Vector<T>, T)
    where
        T: Element,
        F: Fn(T, T) -> T + Send + Sync,
    {
        let n = v.len();
        let inclusive = self.scan(dir, &op, v);

        match dir {
            Direction::Left => {
                let out = self.generate(n, |i| match i {
                    0 => identity.clone(),
                    _ => op(identity.clone(), inclusive[i - 1].clone()),
                });
                let total = match inclusive.last() {
                    Some(last) => op(identity.clone(), last.clone()),
                    None => identity,
                };
                (out, total)
            }
            Direction::Right => {
                let out = self.generate(n, |i| match inclusive.get(i + 1) {
                    Some(rest) => op(rest.clone(), identity.clone()),
                    None => identity.clone(),
                });
                let total = match inclusive.first() {
                    Some(first) => op(first.clone(), identity.clone()),
                    None => identity,
                };
                (out, total)
            }
        }
    }
}

/// A backend chosen at runtime from a [`ScanConfig`].
#[derive(Debug)]
pub enum AnyBackend {
    /// Single-threaded execution.
    Sequential(SequentialBackend),

    /// Rayon thread pool execution.
    Parallel(ParallelBackend),
}

impl AnyBackend {
    /// Build the backend named by `config`.
    pub fn from_config(config: &ScanConfig) -> Result<Self> {
        config.validate()?;
        match config.backend {
            BackendKind::Sequential => Ok(AnyBackend::Sequential(SequentialBackend::new())),
            BackendKind::Parallel => Ok(AnyBackend::Parallel(ParallelBackend::new(config)?)),
        }
    }
}

impl Backend for AnyBackend {
    fn name(&self) -> &'static str {
        match self {
            AnyBackend::Sequential(b) => b.name(),
            AnyBackend::Parallel(b) => b.name(),
        }
    }

    fn generate<T, F>(&self, len: usize, f: F) -> Vector<T>
    where
        T: Element,
        F: Fn(usize) -> T + Send + Sync,
    {
        match self {
            AnyBackend::Sequential(b) => b.generate(len, f),
            AnyBackend::Parallel(b) => b.generate(len, f),
        }
    }

    fn scan<T, F>(&self, dir: Direction, op: F, v: &Vector<T>) -> Vector<T>
    where
        T: Element,
        F: Fn(T, T) -> T + Send + Sync,
    {
        match self {
            AnyBackend::Sequential(b) => b.scan(dir, op, v),
            AnyBackend::Parallel(b) => b.scan(dir, op, v),
        }
    }

    fn permute<T, C, I>(
        &self,
        combine: C,
        defaults: &Vector<T>,
        index: I,
        source: &Vector<T>,
    ) -> Result<Vector<T>>
    where
        T: Element,
        C: Fn(T, T) -> T + Send + Sync,
        I: Fn(usize) -> Option<usize> + Send + Sync,
    {
        match self {
            AnyBackend::Sequential(b) => b.permute(combine, defaults, index, source),
            AnyBackend::Parallel(b) => b.permute(combine, defaults, index, source),
        }
    }
}

/// Apply already computed scatter destinations in source order.
///
/// Shared by both backends so collision order is identical everywhere.
pub(crate) fn apply_scatter<T, C>(
    combine: C,
    defaults: &Vector<T>,
    destinations: &[Option<usize>],
    source: &[T],
) -> Result<Vector<T>>
where
    T: Element,
    C: Fn(T, T) -> T,
{
    let mut out = defaults.to_vec();
    let len = out.len();

    for (dest, value) in destinations.iter().zip(source) {
        let Some(d) = *dest else {
            continue;
        };
        let slot = out
            .get_mut(d)
            .ok_or_else(|| SegScanError::index_out_of_bounds(d, len))?;
        *slot = combine(value.clone(), slot.clone());
    }

    Ok(Vector::new(out))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn backends() -> Vec<AnyBackend> {
        let parallel = ScanConfig::default()
            .with_backend(BackendKind::Parallel)
            .with_thread_pool_size(3)
            .with_min_chunk_len(2);
        vec![
            AnyBackend::from_config(&ScanConfig::default().with_backend(BackendKind::Sequential))
                .unwrap(),
            AnyBackend::from_config(&parallel).unwrap(),
        ]
    }

    #[test]
    fn test_scan_both_directions() {
        let v: Vector<i64> = (1..=10).collect();
        for b in backends() {
            let left = b.scan(Direction::Left, |x, y| x + y, &v);
            assert_eq!(left, [1, 3, 6, 10, 15, 21, 28, 36, 45, 55], "{}", b.name());

            let right = b.scan(Direction::Right, |x, y| x + y, &v);
            assert_eq!(right, [55, 54, 52, 49, 45, 40, 34, 27, 19, 10], "{}", b.name());
        }
    }

    #[test]
    fn test_scan_preserves_operand_order() {
        let v: Vector<String> = ["a", "b", "c", "d", "e"].iter().map(|s| s.to_string()).collect();
        for b in backends() {
            let left = b.scan(Direction::Left, |x, y| x + &y, &v);
            assert_eq!(left.last().unwrap(), "abcde");
            assert_eq!(left[2], "abc");

            let right = b.scan(Direction::Right, |x, y| x + &y, &v);
            assert_eq!(right[0], "abcde");
            assert_eq!(right[3], "de");
        }
    }

    #[test]
    fn test_scan_exclusive_with_total() {
        let v = Vector::new(vec![1i64, 2, 3, 4]);
        for b in backends() {
            let (out, total) = b.scan_exclusive(Direction::Left, |x, y| x + y, 10, &v);
            assert_eq!(out, [10, 11, 13, 16]);
            assert_eq!(total, 20);

            let (out, total) = b.scan_exclusive(Direction::Right, |x, y| x + y, 10, &v);
            assert_eq!(out, [19, 17, 14, 10]);
            assert_eq!(total, 20);

            let (out, total) = b.scan_exclusive(Direction::Left, |x, y| x + y, 7, &Vector::empty());
            assert!(out.is_empty());
            assert_eq!(total, 7);
        }
    }

    #[test]
    fn test_permute_collisions_and_ignore() {
        let defaults = Vector::new(vec![0i64; 4]);
        let source = Vector::new(vec![1i64, 2, 3, 4, 5]);
        for b in backends() {
            // 0 -> 0, 1 -> dropped, 2 -> 3, 3 -> 3, 4 -> 0
            let out = b
                .permute(
                    |new, old| new + old,
                    &defaults,
                    |i| [Some(0), None, Some(3), Some(3), Some(0)][i],
                    &source,
                )
                .unwrap();
            assert_eq!(out, [6, 0, 0, 7]);
        }
    }

    #[test]
    fn test_permute_out_of_bounds() {
        let defaults = Vector::new(vec![0u8; 2]);
        let source = Vector::new(vec![1u8]);
        for b in backends() {
            let err = b
                .permute(|new, _| new, &defaults, |_| Some(2), &source)
                .unwrap_err();
            assert!(matches!(err, SegScanError::IndexOutOfBounds(_)));
        }
    }

    #[test]
    fn test_backpermute() {
        let source = Vector::new(vec![10, 20, 30]);
        for b in backends() {
            let out = b.backpermute(4, |i| 2 - i % 3, &source).unwrap();
            assert_eq!(out, [30, 20, 10, 30]);

            let err = b.backpermute(1, |_| 3, &source).unwrap_err();
            assert!(matches!(err, SegScanError::IndexOutOfBounds(_)));
        }
    }

    #[test]
    fn test_zip_with_takes_shape_intersection() {
        let a = Vector::new(vec![1, 2, 3]);
        let b = Vector::new(vec![10, 20]);
        for backend in backends() {
            let out = backend.zip_with(|x, y| x * y, &a, &b);
            assert_eq!(out, [10, 40]);
            assert_eq!(backend.replicate(3, 'x'), ['x', 'x', 'x']);
            assert_eq!(backend.map(|x| x + 1, &a), [2, 3, 4]);
        }
    }
}
