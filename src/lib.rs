//! # segscan
//!
//! Segmented parallel scans expressed over a small set of flat,
//! shape-oblivious data-parallel primitives.
//!
//! ## Features
//!
//! - Head/tail flag construction from segment lengths
//! - Inclusive and exclusive segmented scans in both directions
//! - Per-segment totals
//! - Pre/post-scan variants, segmented and flat
//! - Sequential and rayon-backed primitive backends

pub mod backend;
pub mod cli;
pub mod error;
pub mod segmented;
pub mod vector;

pub mod prelude {
    pub use crate::backend::{AnyBackend, Backend, BackendKind, Direction, ScanConfig};
    pub use crate::error::{Result, SegScanError};
    pub use crate::segmented::Scanner;
    pub use crate::vector::Vector;
}

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
