//! Immutable dense vector shared between combinators.

use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A dense, 0-indexed, immutable sequence of elements.
///
/// Every primitive and every scan returns a fresh `Vector`. Cloning only
/// bumps a reference count, so intermediate results can be shared between
/// several consumers without copying while callers still see value semantics.
pub struct Vector<T> {
    data: Arc<[T]>,
}

impl<T> Vector<T> {
    /// Create a vector that takes ownership of `data`.
    pub fn new(data: Vec<T>) -> Self {
        Self { data: data.into() }
    }

    /// Create an empty vector.
    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    /// Borrow the elements as a slice.
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }
}

impl<T: Clone> Vector<T> {
    /// Copy the elements out into a `Vec`.
    pub fn to_vec(&self) -> Vec<T> {
        self.data.to_vec()
    }
}

impl<T> Clone for Vector<T> {
    fn clone(&self) -> Self {
        Self {
            data: Arc::clone(&self.data),
        }
    }
}

impl<T> Deref for Vector<T> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        &self.data
    }
}

impl<T> From<Vec<T>> for Vector<T> {
    fn from(data: Vec<T>) -> Self {
        Self::new(data)
    }
}

impl<T: Clone> From<&[T]> for Vector<T> {
    fn from(data: &[T]) -> Self {
        Self { data: data.into() }
    }
}

impl<T> FromIterator<T> for Vector<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<T: fmt::Debug> fmt::Debug for Vector<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.data.iter()).finish()
    }
}

impl<T: PartialEq> PartialEq for Vector<T> {
    fn eq(&self, other: &Self) -> bool {
        self.data[..] == other.data[..]
    }
}

impl<T: Eq> Eq for Vector<T> {}

impl<T: PartialEq> PartialEq<Vec<T>> for Vector<T> {
    fn eq(&self, other: &Vec<T>) -> bool {
        self.data[..] == other[..]
    }
}

impl<T: PartialEq, const N: usize> PartialEq<[T; N]> for Vector<T> {
    fn eq(&self, other: &[T; N]) -> bool {
        self.data[..] == other[..]
    }
}

impl<T: Serialize> Serialize for Vector<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.data.serialize(serializer)
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Vector<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Vec::<T>::deserialize(deserializer).map(Self::new)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clone_shares_storage() {
        let v = Vector::new(vec![1, 2, 3]);
        let w = v.clone();

        assert!(std::ptr::eq(v.as_slice(), w.as_slice()));
        assert_eq!(v, w);
        assert_eq!(w, [1, 2, 3]);
    }

    #[test]
    fn test_slice_access() {
        let v: Vector<i32> = (1..=4).collect();
        assert_eq!(v.len(), 4);
        assert_eq!(v[2], 3);
        assert_eq!(v.iter().sum::<i32>(), 10);
        assert!(Vector::<i32>::empty().is_empty());
    }

    #[test]
    fn test_serde_as_sequence() {
        let v = Vector::new(vec![3u64, 1, 4]);
        let json = serde_json::to_string(&v).unwrap();
        assert_eq!(json, "[3,1,4]");

        let back: Vector<u64> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, v);
    }
}
