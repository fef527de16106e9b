//! Contiguous storage shared by the columns of a [SplineSet](crate::SplineSet).

use crate::error::{SplineError, SplineResult};

/// Location of a block handed out by a [ValueArena].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArenaBlock {
    offset: usize,
    len: usize,
}

impl ArenaBlock {
    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

/// Bump allocator of `f64` values.
///
/// A growable arena reserves 12 % more than requested whenever it has to
/// grow. A fixed arena never grows: running out of room is an
/// [SplineError::ArenaExhausted] error. Blocks are released all at once with
/// [ValueArena::reset].
/// # Example
/// ```
/// use piecewise_spline::ValueArena;
///
/// let mut arena = ValueArena::fixed(4);
/// let block = arena.allocate(3).unwrap();
/// arena.slice_mut(block).copy_from_slice(&[1.0, 2.0, 3.0]);
/// assert_eq!(arena.slice(block), &[1.0, 2.0, 3.0]);
/// assert!(arena.allocate(2).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ValueArena {
    values: Vec<f64>,
    used: usize,
    fixed: bool,
}

const GROWTH_SLACK: f64 = 0.12;

impl ValueArena {
    pub fn new() -> Self {
        ValueArena::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        ValueArena {
            values: vec![0.0; capacity],
            used: 0,
            fixed: false,
        }
    }

    /// Arena of exactly `capacity` values that never grows.
    pub fn fixed(capacity: usize) -> Self {
        ValueArena {
            values: vec![0.0; capacity],
            used: 0,
            fixed: true,
        }
    }

    pub fn is_fixed(&self) -> bool {
        self.fixed
    }

    pub fn capacity(&self) -> usize {
        self.values.len()
    }

    pub fn used(&self) -> usize {
        self.used
    }

    pub fn available(&self) -> usize {
        self.values.len() - self.used
    }

    /// Makes sure `additional` values can be allocated without growing again.
    pub fn reserve(&mut self, additional: usize) -> SplineResult<()> {
        if additional <= self.available() {
            return Ok(());
        }
        if self.fixed {
            return Err(SplineError::ArenaExhausted {
                requested: additional,
                available: self.available(),
            });
        }
        let required = self.used + additional;
        let capacity = required + (required as f64 * GROWTH_SLACK).ceil() as usize;
        log::debug!("growing value arena from {} to {} values", self.values.len(), capacity);
        self.values.resize(capacity, 0.0);
        Ok(())
    }

    /// Hands out `len` zeroed values.
    pub fn allocate(&mut self, len: usize) -> SplineResult<ArenaBlock> {
        self.reserve(len)?;
        let block = ArenaBlock { offset: self.used, len };
        self.used += len;
        self.slice_mut(block).fill(0.0);
        Ok(block)
    }

    /// Allocates a block holding a copy of `values`.
    pub fn allocate_copy(&mut self, values: &[f64]) -> SplineResult<ArenaBlock> {
        let block = self.allocate(values.len())?;
        self.slice_mut(block).copy_from_slice(values);
        Ok(block)
    }

    pub fn slice(&self, block: ArenaBlock) -> &[f64] {
        &self.values[block.offset..block.offset + block.len]
    }

    pub fn slice_mut(&mut self, block: ArenaBlock) -> &mut [f64] {
        &mut self.values[block.offset..block.offset + block.len]
    }

    /// Forgets every block. Capacity is kept.
    pub fn reset(&mut self) {
        self.used = 0;
    }
}
