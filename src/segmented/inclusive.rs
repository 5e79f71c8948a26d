//! Segmented inclusive scans.

use log::trace;

use crate::backend::{Backend, Direction, Element};
use crate::error::Result;
use crate::segmented::Scanner;
use crate::segmented::lift::{Flagged, SegmentedOp};
use crate::vector::Vector;

impl<B: Backend> Scanner<B> {
    /// Left-to-right inclusive scan restarting at every segment.
    ///
    /// Element `i` is the combination of all elements of its segment up to
    /// and including `i`.
    pub fn scanl1_seg<T, F>(
        &self,
        op: F,
        values: &Vector<T>,
        segments: &Vector<usize>,
    ) -> Result<Vector<T>>
    where
        T: Element,
        F: Fn(T, T) -> T + Send + Sync,
    {
        self.scan1_seg(Direction::Left, op, values, segments)
    }

    /// Right-to-left inclusive scan restarting at every segment.
    ///
    /// Element `i` is the combination of `i` and all later elements of its
    /// segment.
    pub fn scanr1_seg<T, F>(
        &self,
        op: F,
        values: &Vector<T>,
        segments: &Vector<usize>,
    ) -> Result<Vector<T>>
    where
        T: Element,
        F: Fn(T, T) -> T + Send + Sync,
    {
        self.scan1_seg(Direction::Right, op, values, segments)
    }

    pub(crate) fn scan1_seg<T, F>(
        &self,
        dir: Direction,
        op: F,
        values: &Vector<T>,
        segments: &Vector<usize>,
    ) -> Result<Vector<T>>
    where
        T: Element,
        F: Fn(T, T) -> T + Send + Sync,
    {
        trace!(
            "{dir:?} inclusive scan of {} elements in {} segments",
            values.len(),
            segments.len()
        );

        let flags = self.flags_for(dir, segments)?;
        let lifted = SegmentedOp::new(op, dir);

        let flagged = self
            .backend
            .zip_with(|flag, value: &T| Flagged::new(*flag, value.clone()), &flags, values);
        let scanned = self.backend.scan(dir, |a, b| lifted.apply(a, b), &flagged);

        Ok(self.backend.map(|pair| pair.value.clone(), &scanned))
    }
}

#[cfg(test)]
mod tests {
    use crate::segmented::test_support::scanners;
    use crate::vector::Vector;

    #[test]
    fn test_scanl1_seg_scenario() {
        let values = Vector::new(vec![1, 2, 3, 4, 5, 6]);
        let segments = Vector::new(vec![2, 3, 1]);
        for s in scanners() {
            let out = s.scanl1_seg(|a, b| a + b, &values, &segments).unwrap();
            assert_eq!(out, [1, 3, 3, 7, 12, 6]);
        }
    }

    #[test]
    fn test_scanr1_seg_scenario() {
        let values = Vector::new(vec![1, 2, 3, 4, 5, 6]);
        let segments = Vector::new(vec![2, 3, 1]);
        for s in scanners() {
            let out = s.scanr1_seg(|a, b| a + b, &values, &segments).unwrap();
            assert_eq!(out, [3, 2, 12, 9, 5, 6]);
        }
    }

    #[test]
    fn test_scan1_seg_keeps_order_within_segments() {
        let values: Vector<String> = "abcdefg".chars().map(String::from).collect();
        let segments = Vector::new(vec![0, 3, 0, 4, 0]);
        for s in scanners() {
            let left = s.scanl1_seg(|a, b| a + &b, &values, &segments).unwrap();
            assert_eq!(left.to_vec(), ["a", "ab", "abc", "d", "de", "def", "defg"]);

            let right = s.scanr1_seg(|a, b| a + &b, &values, &segments).unwrap();
            assert_eq!(right.to_vec(), ["abc", "bc", "c", "defg", "efg", "fg", "g"]);
        }
    }

    #[test]
    fn test_scan1_seg_empty_input() {
        let values: Vector<i64> = Vector::empty();
        for s in scanners() {
            assert!(s.scanl1_seg(|a, b| a + b, &values, &Vector::empty()).unwrap().is_empty());
            assert!(s.scanr1_seg(|a, b| a + b, &values, &Vector::new(vec![0])).unwrap().is_empty());
        }
    }
}
