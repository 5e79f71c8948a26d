//! Segment offsets and boundary flags.

use log::trace;

use crate::backend::{Backend, Direction};
use crate::error::Result;
use crate::segmented::Scanner;
use crate::vector::Vector;

/// Boundary marker: 1 at a boundary position, 0 elsewhere.
pub type Flag = u8;

impl<B: Backend> Scanner<B> {
    /// Start index of every segment, plus the total length.
    pub fn offsets(&self, segments: &Vector<usize>) -> (Vector<usize>, usize) {
        self.backend
            .scan_exclusive(Direction::Left, |a, b| a + b, 0, segments)
    }

    /// Flags set at the first index of every non-empty segment.
    ///
    /// An empty segment writes at the start of the next one, and a trailing
    /// empty segment (start == total length) writes nowhere. Since every
    /// write deposits the same 1, such duplicates are harmless.
    pub fn head_flags(&self, segments: &Vector<usize>) -> Result<Vector<Flag>> {
        let (offsets, len) = self.offsets(segments);
        trace!("head flags for {} segments over {len} elements", segments.len());

        self.boundary_flags(segments.len(), len, |k| {
            Some(offsets[k]).filter(|&start| start < len)
        })
    }

    /// Flags set at the last index of every non-empty segment.
    ///
    /// An empty segment writes at the end of the previous one; a leading
    /// empty segment writes nowhere.
    pub fn tail_flags(&self, segments: &Vector<usize>) -> Result<Vector<Flag>> {
        let (offsets, len) = self.offsets(segments);
        trace!("tail flags for {} segments over {len} elements", segments.len());

        self.boundary_flags(segments.len(), len, |k| {
            (offsets[k] + segments[k]).checked_sub(1)
        })
    }

    /// Flags for scans in `dir`: head flags left-to-right, tail flags right-to-left.
    pub(crate) fn flags_for(
        &self,
        dir: Direction,
        segments: &Vector<usize>,
    ) -> Result<Vector<Flag>> {
        match dir {
            Direction::Left => self.head_flags(segments),
            Direction::Right => self.tail_flags(segments),
        }
    }

    fn boundary_flags<I>(&self, count: usize, len: usize, position: I) -> Result<Vector<Flag>>
    where
        I: Fn(usize) -> Option<usize> + Send + Sync,
    {
        let zeros = self.backend.replicate(len, 0 as Flag);
        let ones = self.backend.replicate(count, 1 as Flag);
        self.backend.permute(|_, _| 1, &zeros, position, &ones)
    }
}
