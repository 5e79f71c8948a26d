//! Segmented scans built from flat primitives.
//!
//! A segmented vector is a flat data vector plus a vector of segment
//! lengths. Segments are never materialised as sub-vectors: boundaries are
//! encoded as 0/1 flag vectors and the user operator is lifted over
//! `(flag, value)` pairs so that one ordinary flat scan restarts at every
//! boundary.
//!
//! All operations are methods on [`Scanner`], which owns the [`Backend`]
//! the primitives run on:
//!
//! - **flags**: offsets and head/tail flag vectors
//! - **lift**: the flag-aware operator
//! - **inclusive**: `scanl1_seg`, `scanr1_seg`
//! - **exclusive**: `scanl_seg`, `scanr_seg` and the `*_with_sums` variants
//! - **composite**: pre/post-scans (segmented and flat), `zip`, `unzip`
//!
//! Segment lengths must sum to the data length. This is not checked here;
//! broken segment vectors produce wrong results or a bounds error from the
//! backend's scatter/gather.
//!
//! # Example
//!
//! ```
//! use segscan::backend::SequentialBackend;
//! use segscan::segmented::Scanner;
//! use segscan::vector::Vector;
//!
//! # fn main() -> segscan::error::Result<()> {
//! let scanner = Scanner::new(SequentialBackend::new());
//! let values = Vector::new(vec![1, 2, 3, 4, 5, 6]);
//! let segments = Vector::new(vec![2, 3, 1]);
//!
//! let inclusive = scanner.scanl1_seg(|a, b| a + b, &values, &segments)?;
//! assert_eq!(inclusive, [1, 3, 3, 7, 12, 6]);
//!
//! let (exclusive, sums) = scanner.scanl_seg_with_sums(|a, b| a + b, 0, &values, &segments)?;
//! assert_eq!(exclusive, [0, 1, 0, 3, 7, 0]);
//! assert_eq!(sums, [3, 12, 6]);
//! # Ok(())
//! # }
//! ```

use crate::backend::Backend;

pub mod composite;
pub mod exclusive;
pub mod flags;
pub mod inclusive;
pub mod lift;

pub use flags::Flag;
pub use lift::{Flagged, SegmentedOp};

/// Segmented and flat scan combinators over a primitive backend.
#[derive(Debug, Clone)]
pub struct Scanner<B> {
    backend: B,
}

impl<B: Backend> Scanner<B> {
    /// Create a scanner running on `backend`.
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    /// The backend primitives run on.
    pub fn backend(&self) -> &B {
        &self.backend
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::backend::{AnyBackend, BackendKind, ScanConfig};
    use crate::segmented::Scanner;

    /// A sequential scanner and a parallel one small enough to split every input.
    pub fn scanners() -> Vec<Scanner<AnyBackend>> {
        [
            ScanConfig::new(BackendKind::Sequential),
            ScanConfig::new(BackendKind::Parallel)
                .with_thread_pool_size(3)
                .with_min_chunk_len(1),
        ]
        .iter()
        .map(|config| Scanner::new(AnyBackend::from_config(config).unwrap()))
        .collect()
    }
}
