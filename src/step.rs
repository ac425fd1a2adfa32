//! Arithmetic progression generator
//!
//! `IntStep` describes the progression `start, start + size, start + 2 * size, ...`
//! and doubles as a snapping function onto that grid.

use crate::cursor::Pull;
use crate::primitive::IntSequence;
use crate::sequence::LazySequence;
use crate::{Result, SequenceError};

/// Positive step size with a starting offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IntStep {
    size: i32,
    start: i32,
}

impl IntStep {
    /// Progression from 0 in steps of `size`; rejects `size <= 0`.
    pub fn of(size: i32) -> Result<Self> {
        if size <= 0 {
            return Err(SequenceError::InvalidStepSize(size));
        }
        Ok(Self { size, start: 0 })
    }

    /// Same step size, starting at `start`.
    pub fn with_start(mut self, start: i32) -> Self {
        self.start = start;
        self
    }

    /// Step size.
    pub fn size(&self) -> i32 {
        self.size
    }

    /// Starting offset.
    pub fn start(&self) -> i32 {
        self.start
    }

    /// Snap `x` to the nearest grid point `start + k * size`.
    ///
    /// Ties round up: `k = floor((x - start) / size + 1/2)`. Computed in
    /// exact integer arithmetic; results outside `i32` wrap.
    pub fn apply_as_int(&self, x: i32) -> i32 {
        let size = i64::from(self.size);
        let offset = i64::from(x) - i64::from(self.start);
        let k = (2 * offset + size).div_euclid(2 * size);
        (i64::from(self.start) + k * size) as i32
    }

    /// Unbounded progression; ends only if the next value would overflow `i32`.
    pub fn int_stream(&self) -> IntSequence {
        let size = self.size;
        let mut next = Some(self.start);
        IntSequence::from_generator(move || {
            Ok(match next {
                Some(value) => {
                    next = value.checked_add(size);
                    Pull::Value(value)
                }
                None => Pull::End,
            })
        })
    }

    /// Reusable form of [`int_stream`](Self::int_stream).
    pub fn sequence(&self) -> LazySequence<i32> {
        let step = *self;
        LazySequence::from_fn(move || step.int_stream().boxed())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_non_positive_size() {
        assert_eq!(IntStep::of(0), Err(SequenceError::InvalidStepSize(0)));
        assert_eq!(IntStep::of(-3), Err(SequenceError::InvalidStepSize(-3)));
    }

    #[test]
    fn test_snapping() {
        let step = IntStep::of(5).unwrap();
        assert_eq!(step.apply_as_int(7), 5);
        assert_eq!(step.apply_as_int(8), 10);
        assert_eq!(step.apply_as_int(-7), -5);
        assert_eq!(step.with_start(1).apply_as_int(4), 6);
    }

    #[test]
    fn test_ties_round_up() {
        let step = IntStep::of(4).unwrap();
        assert_eq!(step.apply_as_int(2), 4);
        assert_eq!(step.apply_as_int(-2), 0);
    }

    #[test]
    fn test_stream_prefix() {
        let mut stream = IntStep::of(5).unwrap().int_stream().limit(4);
        assert_eq!(stream.to_vec().unwrap(), vec![0, 5, 10, 15]);
    }

    #[test]
    fn test_stream_ends_before_overflow() {
        let mut stream = IntStep::of(i32::MAX).unwrap().with_start(1).int_stream();
        assert_eq!(stream.to_vec().unwrap(), vec![1]);
    }

    #[test]
    fn test_lazy_sequence_restarts() {
        let multiples = IntStep::of(3).unwrap().sequence().limit(3);
        assert_eq!(multiples.to_vec().unwrap(), vec![0, 3, 6]);
        assert_eq!(multiples.to_vec().unwrap(), vec![0, 3, 6]);
    }
}
