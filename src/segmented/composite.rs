//! Pre/post-scans and pairing helpers built from the scans above.

use crate::backend::{Backend, Direction, Element};
use crate::error::Result;
use crate::segmented::Scanner;
use crate::vector::Vector;

impl<B: Backend> Scanner<B> {
    /// Flat exclusive left scan seeded with `identity`.
    pub fn prescanl<T, F>(&self, op: F, identity: T, values: &Vector<T>) -> Vector<T>
    where
        T: Element,
        F: Fn(T, T) -> T + Send + Sync,
    {
        self.backend
            .scan_exclusive(Direction::Left, op, identity, values)
            .0
    }

    /// Flat exclusive right scan seeded with `identity`.
    pub fn prescanr<T, F>(&self, op: F, identity: T, values: &Vector<T>) -> Vector<T>
    where
        T: Element,
        F: Fn(T, T) -> T + Send + Sync,
    {
        self.backend
            .scan_exclusive(Direction::Right, op, identity, values)
            .0
    }

    /// Flat inclusive left scan with `identity` combined in from the left.
    pub fn postscanl<T, F>(&self, op: F, identity: T, values: &Vector<T>) -> Vector<T>
    where
        T: Element,
        F: Fn(T, T) -> T + Send + Sync,
    {
        let inclusive = self.backend.scan(Direction::Left, &op, values);
        self.backend
            .map(|x| op(identity.clone(), x.clone()), &inclusive)
    }

    /// Flat inclusive right scan with `identity` combined in from the right.
    pub fn postscanr<T, F>(&self, op: F, identity: T, values: &Vector<T>) -> Vector<T>
    where
        T: Element,
        F: Fn(T, T) -> T + Send + Sync,
    {
        let inclusive = self.backend.scan(Direction::Right, &op, values);
        self.backend
            .map(|x| op(x.clone(), identity.clone()), &inclusive)
    }

    /// Segmented exclusive left scan; the scan half of
    /// [`scanl_seg_with_sums`](Self::scanl_seg_with_sums).
    pub fn prescanl_seg<T, F>(
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
        Ok(self.scanl_seg_with_sums(op, identity, values, segments)?.0)
    }

    /// Segmented exclusive right scan; the scan half of
    /// [`scanr_seg_with_sums`](Self::scanr_seg_with_sums).
    pub fn prescanr_seg<T, F>(
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
        Ok(self.scanr_seg_with_sums(op, identity, values, segments)?.0)
    }

    /// Segmented inclusive left scan with `identity` combined in from the left.
    pub fn postscanl_seg<T, F>(
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
        self.postscan_seg(Direction::Left, op, identity, values, segments)
    }

    /// Segmented inclusive right scan with `identity` combined in from the right.
    pub fn postscanr_seg<T, F>(
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
        self.postscan_seg(Direction::Right, op, identity, values, segments)
    }

    pub(crate) fn postscan_seg<T, F>(
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
        let inclusive = self.scan1_seg(dir, &op, values, segments)?;
        Ok(self.backend.map(
            |x| match dir {
                Direction::Left => op(identity.clone(), x.clone()),
                Direction::Right => op(x.clone(), identity.clone()),
            },
            &inclusive,
        ))
    }

    /// Pair up two vectors pointwise, truncating to the shorter one.
    pub fn zip<A: Element, C: Element>(&self, a: &Vector<A>, b: &Vector<C>) -> Vector<(A, C)> {
        self.backend.zip_with(|x, y| (x.clone(), y.clone()), a, b)
    }

    /// Split a vector of pairs into its two components.
    pub fn unzip<A: Element, C: Element>(&self, pairs: &Vector<(A, C)>) -> (Vector<A>, Vector<C>) {
        (
            self.backend.map(|p| p.0.clone(), pairs),
            self.backend.map(|p| p.1.clone(), pairs),
        )
    }
}

#[cfg(test)]
mod tests {
    use crate::segmented::test_support::scanners;
    use crate::vector::Vector;

    fn add(a: i32, b: i32) -> i32 {
        a + b
    }

    #[test]
    fn test_flat_pre_and_post_scans() {
        let values = Vector::new(vec![1, 2, 3, 4]);
        for s in scanners() {
            assert_eq!(s.prescanl(add, 10, &values), [10, 11, 13, 16]);
            assert_eq!(s.prescanr(add, 10, &values), [19, 17, 14, 10]);
            assert_eq!(s.postscanl(add, 10, &values), [11, 13, 16, 20]);
            assert_eq!(s.postscanr(add, 10, &values), [20, 19, 17, 14]);
        }
    }

    #[test]
    fn test_segmented_pre_and_post_scans() {
        let values = Vector::new(vec![1, 2, 3, 4, 5, 6]);
        let segments = Vector::new(vec![2, 3, 1]);
        for s in scanners() {
            assert_eq!(s.prescanl_seg(add, 0, &values, &segments).unwrap(), [0, 1, 0, 3, 7, 0]);
            assert_eq!(s.prescanr_seg(add, 0, &values, &segments).unwrap(), [2, 0, 9, 5, 0, 0]);
            assert_eq!(
                s.postscanl_seg(add, 10, &values, &segments).unwrap(),
                [11, 13, 13, 17, 22, 16]
            );
            assert_eq!(
                s.postscanr_seg(add, 10, &values, &segments).unwrap(),
                [13, 12, 22, 19, 15, 16]
            );
        }
    }

    #[test]
    fn test_postscan_identity_side() {
        let values: Vector<String> = "xyz".chars().map(String::from).collect();
        let concat = |a: String, b: String| a + &b;
        for s in scanners() {
            assert_eq!(
                s.postscanl(concat, "<".to_string(), &values).to_vec(),
                ["<x", "<xy", "<xyz"]
            );
            assert_eq!(
                s.postscanr(concat, ">".to_string(), &values).to_vec(),
                ["xyz>", "yz>", "z>"]
            );
        }
    }

    #[test]
    fn test_zip_unzip() {
        let a = Vector::new(vec![1, 2, 3]);
        let b = Vector::new(vec!['a', 'b', 'c']);
        for s in scanners() {
            let pairs = s.zip(&a, &b);
            assert_eq!(pairs, [(1, 'a'), (2, 'b'), (3, 'c')]);

            let (x, y) = s.unzip(&pairs);
            assert_eq!(x, a);
            assert_eq!(y, b);
        }
    }

    #[test]
    fn test_zip_truncates_to_common_prefix() {
        let a = Vector::new(vec![1, 2, 3]);
        let b = Vector::new(vec![true]);
        for s in scanners() {
            assert_eq!(s.zip(&a, &b), [(1, true)]);
        }
    }
}
