//! Segmented exclusive scans and per-segment sums.
//!
//! Two constructions are used.
//!
//! `scanl_seg`/`scanr_seg` inject the identity into a longer vector: every
//! segment gets one extra slot (at its start for left scans, at its end for
//! right scans) holding the identity, the original elements are scattered
//! around those slots, and the inclusive segmented scan of the augmented
//! vector is read back at the original length.
//!
//! The `*_with_sums` variants stay at the original length instead: the
//! element closing each segment is dropped and every other element moves one
//! place along, so the vacated opening slot keeps the identity. The totals
//! are gathered from the post-scan at each segment's closing index.

use log::trace;

use crate::backend::{Backend, Direction, Element};
use crate::error::Result;
use crate::segmented::Scanner;
use crate::vector::Vector;

impl<B: Backend> Scanner<B> {
    /// Left-to-right exclusive segmented scan.
    ///
    /// Element `i` is `identity op` all elements of its segment before `i`;
    /// the first element of every segment is `identity`.
    pub fn scanl_seg<T, F>(
        &self,
        op: F,
        identity: T,
        values: &Vector<T>,
        segments: &Vector<usize>,
    ) -> Result<Vector<T>>
    where
        T: Element,
        F: Fn(T, T) -> T + Send + Sync,
    {
        self.scan_seg(Direction::Left, op, identity, values, segments)
    }

    /// Right-to-left exclusive segmented scan.
    ///
    /// Element `i` is all later elements of its segment `op identity`; the
    /// last element of every segment is `identity`.
    pub fn scanr_seg<T, F>(
        &self,
        op: F,
        identity: T,
        values: &Vector<T>,
        segments: &Vector<usize>,
    ) -> Result<Vector<T>>
    where
        T: Element,
        F: Fn(T, T) -> T + Send + Sync,
    {
        self.scan_seg(Direction::Right, op, identity, values, segments)
    }

    /// Left-to-right exclusive segmented scan together with the fold of
    /// every segment, `identity op x0 op ... op xn`. Empty segments sum to
    /// `identity`.
    pub fn scanl_seg_with_sums<T, F>(
        &self,
        op: F,
        identity: T,
        values: &Vector<T>,
        segments: &Vector<usize>,
    ) -> Result<(Vector<T>, Vector<T>)>
    where
        T: Element,
        F: Fn(T, T) -> T + Send + Sync,
    {
        self.scan_seg_with_sums(Direction::Left, op, identity, values, segments)
    }

    /// Right-to-left exclusive segmented scan together with the fold of
    /// every segment, `x0 op ... op xn op identity`.
    pub fn scanr_seg_with_sums<T, F>(
        &self,
        op: F,
        identity: T,
        values: &Vector<T>,
        segments: &Vector<usize>,
    ) -> Result<(Vector<T>, Vector<T>)>
    where
        T: Element,
        F: Fn(T, T) -> T + Send + Sync,
    {
        self.scan_seg_with_sums(Direction::Right, op, identity, values, segments)
    }

    /// For every element, the number of identity slots injected up to and
    /// including its own segment (its segment index plus one).
    ///
    /// Segment `k` scatters `k + 1` to its start; empty segments share a
    /// start with the next segment and lose to it under `max`, and trailing
    /// empty segments (start == len) are dropped. A running max then spreads
    /// the count across each segment.
    fn injection_shift(&self, segments: &Vector<usize>, len: usize) -> Result<Vector<usize>> {
        let (offsets, _) = self.offsets(segments);

        let counts = self.backend.generate(segments.len(), |k| k + 1);
        let zeros = self.backend.replicate(len, 0usize);
        let starts = self.backend.permute(
            |new, old| new.max(old),
            &zeros,
            |k| Some(offsets[k]).filter(|&start| start < len),
            &counts,
        )?;

        Ok(self.backend.scan(Direction::Left, |a, b| a.max(b), &starts))
    }

    fn scan_seg<T, F>(
        &self,
        dir: Direction,
        op: F,
        identity: T,
        values: &Vector<T>,
        segments: &Vector<usize>,
    ) -> Result<Vector<T>>
    where
        T: Element,
        F: Fn(T, T) -> T + Send + Sync,
    {
        let n = values.len();
        let augmented_len = n + segments.len();
        trace!("{dir:?} exclusive scan of {n} elements, augmented to {augmented_len}");

        let shift = self.injection_shift(segments, n)?;

        // Element j of segment k lands at j + k + 1 (left) or j + k (right),
        // which leaves exactly one free slot per segment for the identity.
        let destination = |j: usize| match dir {
            Direction::Left => Some(j + shift[j]),
            Direction::Right => (j + shift[j]).checked_sub(1),
        };
        let defaults = self.backend.replicate(augmented_len, identity);
        let augmented = self.backend.permute(|new, _| new, &defaults, destination, values)?;

        let augmented_segments = self.backend.map(|len| len + 1, segments);
        let scanned = self.scan1_seg(dir, &op, &augmented, &augmented_segments)?;

        // Read each element's predecessor in scan order: the identity slot
        // for a segment's first element, otherwise the neighbour's inclusive
        // result.
        let source = |j: usize| match dir {
            Direction::Left => (j + shift[j]).saturating_sub(1),
            Direction::Right => j + shift[j],
        };
        self.backend.backpermute(n, source, &scanned)
    }

    fn scan_seg_with_sums<T, F>(
        &self,
        dir: Direction,
        op: F,
        identity: T,
        values: &Vector<T>,
        segments: &Vector<usize>,
    ) -> Result<(Vector<T>, Vector<T>)>
    where
        T: Element,
        F: Fn(T, T) -> T + Send + Sync,
    {
        let n = values.len();
        trace!(
            "{dir:?} exclusive scan with sums of {n} elements in {} segments",
            segments.len()
        );

        // The element closing each segment in scan order is dropped. Elements
        // past `sum(segments)` carry no flag and move like inner elements.
        let closing = match dir {
            Direction::Left => self.tail_flags(segments)?,
            Direction::Right => self.head_flags(segments)?,
        };
        let destination = |j: usize| {
            if closing.get(j).copied().unwrap_or(0) != 0 {
                return None;
            }
            match dir {
                Direction::Left => Some(j + 1),
                Direction::Right => j.checked_sub(1),
            }
        };
        let defaults = self.backend.replicate(n, identity.clone());
        let shifted = self.backend.permute(|new, _| new, &defaults, destination, values)?;
        let exclusive = self.scan1_seg(dir, &op, &shifted, segments)?;

        let sums = self.segment_sums(dir, &op, identity, values, segments)?;
        Ok((exclusive, sums))
    }

    fn segment_sums<T, F>(
        &self,
        dir: Direction,
        op: F,
        identity: T,
        values: &Vector<T>,
        segments: &Vector<usize>,
    ) -> Result<Vector<T>>
    where
        T: Element,
        F: Fn(T, T) -> T + Send + Sync,
    {
        if values.is_empty() {
            return Ok(self.backend.replicate(segments.len(), identity));
        }

        let (offsets, _) = self.offsets(segments);
        let post = self.postscan_seg(dir, &op, identity.clone(), values, segments)?;

        // Empty segments read an arbitrary in-range slot and are replaced by
        // the identity below.
        let closing = |k: usize| {
            if segments[k] == 0 {
                return 0;
            }
            match dir {
                Direction::Left => offsets[k] + segments[k] - 1,
                Direction::Right => offsets[k],
            }
        };
        let gathered = self.backend.backpermute(segments.len(), closing, &post)?;

        Ok(self.backend.zip_with(
            |len, sum| if *len == 0 { identity.clone() } else { sum.clone() },
            segments,
            &gathered,
        ))
    }
}
