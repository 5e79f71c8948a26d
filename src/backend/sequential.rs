//! Single-threaded reference backend.

use crate::backend::{Backend, Direction, Element, apply_scatter};
use crate::error::Result;
use crate::vector::Vector;

/// Runs every primitive as a plain loop on the calling thread.
#[derive(Debug, Clone, Copy, Default)]
pub struct SequentialBackend;

impl SequentialBackend {
    /// Create a new sequential backend.
    pub fn new() -> Self {
        SequentialBackend
    }
}

/// Sequential inclusive scan over a slice.
pub(crate) fn scan_slice<T, F>(dir: Direction, op: F, v: &[T]) -> Vec<T>
where
    T: Clone,
    F: Fn(T, T) -> T,
{
    let mut out: Vec<T> = Vec::with_capacity(v.len());
    match dir {
        Direction::Left => {
            for x in v {
                let next = match out.last() {
                    Some(acc) => op(acc.clone(), x.clone()),
                    None => x.clone(),
                };
                out.push(next);
            }
        }
        Direction::Right => {
            for x in v.iter().rev() {
                let next = match out.last() {
                    Some(acc) => op(x.clone(), acc.clone()),
                    None => x.clone(),
                };
                out.push(next);
            }
            out.reverse();
        }
    }
    out
}

impl Backend for SequentialBackend {
    fn name(&self) -> &'static str {
        "sequential"
    }

    fn generate<T, F>(&self, len: usize, f: F) -> Vector<T>
    where
        T: Element,
        F: Fn(usize) -> T + Send + Sync,
    {
        (0..len).map(f).collect()
    }

    fn scan<T, F>(&self, dir: Direction, op: F, v: &Vector<T>) -> Vector<T>
    where
        T: Element,
        F: Fn(T, T) -> T + Send + Sync,
    {
        Vector::new(scan_slice(dir, op, v))
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
        let destinations: Vec<Option<usize>> = (0..source.len()).map(index).collect();
        apply_scatter(combine, defaults, &destinations, source)
    }
}
