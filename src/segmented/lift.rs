//! Lifting a binary operator over flagged values.
//!
//! Folding a [`SegmentedOp`] over `(flag, value)` pairs reproduces, at every
//! position, the scan of the current segment only. A set flag on the operand
//! that opens a segment discards whatever was accumulated before it, and the
//! flag itself is or-ed into the result so later boundaries are never
//! masked. The lifted operator is associative whenever `op` is, but not
//! commutative even when `op` is.

use crate::backend::Direction;
use crate::segmented::flags::Flag;

/// A value tagged with a segment boundary flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Flagged<T> {
    /// Set when this value opens (left scans) or closes (right scans) a segment.
    pub flag: Flag,
    /// The payload being scanned.
    pub value: T,
}

impl<T> Flagged<T> {
    /// Tag `value` with `flag`.
    pub fn new(flag: Flag, value: T) -> Self {
        Self { flag, value }
    }
}

/// `op` lifted to reset at flagged boundaries.
///
/// Left-to-right scans carry head flags and reset on the right operand.
/// Right-to-left scans carry tail flags and reset on the left operand, which
/// is the element closing its segment.
#[derive(Debug, Clone, Copy)]
pub struct SegmentedOp<F> {
    op: F,
    direction: Direction,
}

impl<F> SegmentedOp<F> {
    /// Lift `op` for scans running in `direction`.
    pub fn new(op: F, direction: Direction) -> Self {
        Self { op, direction }
    }

    /// Combine two flagged values.
    pub fn apply<T>(&self, a: Flagged<T>, b: Flagged<T>) -> Flagged<T>
    where
        F: Fn(T, T) -> T,
    {
        let flag = a.flag | b.flag;
        let value = match self.direction {
            Direction::Left if b.flag != 0 => b.value,
            Direction::Right if a.flag != 0 => a.value,
            _ => (self.op)(a.value, b.value),
        };
        Flagged { flag, value }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn concat(a: String, b: String) -> String {
        a + &b
    }

    fn fv(flag: Flag, value: &str) -> Flagged<String> {
        Flagged::new(flag, value.to_string())
    }

    #[test]
    fn test_left_resets_on_right_flag() {
        let op = SegmentedOp::new(concat, Direction::Left);

        assert_eq!(op.apply(fv(1, "a"), fv(0, "b")), fv(1, "ab"));
        assert_eq!(op.apply(fv(0, "a"), fv(1, "b")), fv(1, "b"));
        assert_eq!(op.apply(fv(0, "a"), fv(0, "b")), fv(0, "ab"));
    }

    #[test]
    fn test_right_resets_on_left_flag() {
        let op = SegmentedOp::new(concat, Direction::Right);

        assert_eq!(op.apply(fv(1, "a"), fv(0, "b")), fv(1, "a"));
        assert_eq!(op.apply(fv(0, "a"), fv(1, "b")), fv(1, "ab"));
    }

    #[test]
    fn test_lifted_operator_is_associative() {
        let values = [fv(0, "a"), fv(1, "b"), fv(0, "c"), fv(1, "d"), fv(0, "e")];

        for dir in [Direction::Left, Direction::Right] {
            let op = SegmentedOp::new(concat, dir);
            for x in &values {
                for y in &values {
                    for z in &values {
                        let left = op.apply(op.apply(x.clone(), y.clone()), z.clone());
                        let right = op.apply(x.clone(), op.apply(y.clone(), z.clone()));
                        assert_eq!(left, right, "{dir:?} {x:?} {y:?} {z:?}");
                    }
                }
            }
        }
    }

    #[test]
    fn test_not_commutative() {
        let op = SegmentedOp::new(|a: i32, b: i32| a + b, Direction::Left);
        let a = Flagged::new(1, 2);
        let b = Flagged::new(0, 3);
        assert_ne!(op.apply(a, b), op.apply(b, a));
    }
}
