use std::fmt;

use super::processor::{
    DoubleProcessor, DoubleSummary, IntProcessor, IntSummary, LongProcessor, LongSummary,
};
use crate::cursor::Pull;
use crate::sequence::ActiveSequence;
use crate::Result;

macro_rules! lane {
    (
        $(#[$doc:meta])*
        $name:ident, $prim:ty, $sum:ty, $summary:ident, $processor:ident
    ) => {
        $(#[$doc])*
        pub struct $name {
            inner: ActiveSequence<$prim>,
        }

        impl $name {
            /// Enter the lane from a generic sequence of the primitive.
            pub fn from_sequence(inner: ActiveSequence<$prim>) -> Self {
                Self { inner }
            }

            /// Lane over the values of a vector.
            pub fn from_vec(values: Vec<$prim>) -> Self {
                Self::from_sequence(ActiveSequence::from_vec(values))
            }

            /// Lane driven by a generator that signals its own end.
            pub fn from_generator<G>(generator: G) -> Self
            where
                G: FnMut() -> Result<Pull<$prim>> + 'static,
            {
                Self::from_sequence(ActiveSequence::from_generator(generator))
            }

            /// Whether a terminal operation has already run.
            pub fn is_consumed(&self) -> bool {
                self.inner.is_consumed()
            }

            /// Transform every value.
            pub fn map<F>(self, f: F) -> Self
            where
                F: FnMut($prim) -> $prim + 'static,
            {
                Self::from_sequence(self.inner.map(f))
            }

            /// Keep values matching `predicate`.
            pub fn filter<P>(self, mut predicate: P) -> Self
            where
                P: FnMut($prim) -> bool + 'static,
            {
                Self::from_sequence(self.inner.filter(move |value| predicate(*value)))
            }

            /// Keep at most `n` values.
            pub fn limit(self, n: usize) -> Self {
                Self::from_sequence(self.inner.limit(n))
            }

            /// Drop the first `n` values.
            pub fn skip(self, n: usize) -> Self {
                Self::from_sequence(self.inner.skip(n))
            }

            /// Leave the lane, mapping each value to an arbitrary element.
            pub fn map_to_obj<U, F>(self, f: F) -> ActiveSequence<U>
            where
                U: 'static,
                F: FnMut($prim) -> U + 'static,
            {
                self.inner.map(f)
            }

            /// Leave the lane unchanged.
            pub fn boxed(self) -> ActiveSequence<$prim> {
                self.inner
            }

            /// Number of values.
            pub fn count(&mut self) -> Result<usize> {
                self.inner.count()
            }

            /// Every value, in traversal order.
            pub fn to_vec(&mut self) -> Result<Vec<$prim>> {
                self.inner.to_vec()
            }

            /// Left fold from `init`.
            pub fn fold<A, F>(&mut self, init: A, f: F) -> Result<A>
            where
                F: FnMut(A, $prim) -> A,
            {
                self.inner.fold(init, f)
            }

            /// Drive a lane processor over every value.
            pub fn process<P: $processor>(&mut self, processor: P) -> Result<P::Output> {
                self.inner.process(processor.extracting(|value: &$prim| *value))
            }

            /// Count, sum and extremes in one pass.
            pub fn summary(&mut self) -> Result<$summary> {
                self.process($summary::new())
            }

            /// Sum of all values.
            pub fn sum(&mut self) -> Result<$sum> {
                Ok(self.summary()?.sum())
            }

            /// Smallest value.
            pub fn min(&mut self) -> Result<Option<$prim>> {
                Ok(self.summary()?.min())
            }

            /// Largest value.
            pub fn max(&mut self) -> Result<Option<$prim>> {
                Ok(self.summary()?.max())
            }

            /// Arithmetic mean, `None` when empty.
            pub fn average(&mut self) -> Result<Option<f64>> {
                Ok(self.summary()?.average())
            }
        }

        impl From<ActiveSequence<$prim>> for $name {
            fn from(inner: ActiveSequence<$prim>) -> Self {
                Self::from_sequence(inner)
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.debug_struct(stringify!($name))
                    .field("consumed", &self.is_consumed())
                    .finish()
            }
        }
    };
}

lane!(
    /// Unboxed `i32` pipeline; sums widen to `i64`.
    IntSequence, i32, i64, IntSummary, IntProcessor
);
lane!(
    /// Unboxed `i64` pipeline; sums wrap on overflow.
    LongSequence, i64, i64, LongSummary, LongProcessor
);
lane!(
    /// Unboxed `f64` pipeline.
    DoubleSequence, f64, f64, DoubleSummary, DoubleProcessor
);

impl IntSequence {
    /// Values `start..end`.
    pub fn range(start: i32, end: i32) -> Self {
        Self::from_sequence(ActiveSequence::from_host(start..end))
    }

    /// Widen into the `i64` lane.
    pub fn as_long(self) -> LongSequence {
        LongSequence::from_sequence(self.inner.map(i64::from))
    }

    /// Widen into the `f64` lane.
    pub fn as_double(self) -> DoubleSequence {
        DoubleSequence::from_sequence(self.inner.map(f64::from))
    }
}

impl LongSequence {
    /// Values `start..end`.
    pub fn range(start: i64, end: i64) -> Self {
        Self::from_sequence(ActiveSequence::from_host(start..end))
    }

    /// Convert into the `f64` lane.
    pub fn as_double(self) -> DoubleSequence {
        DoubleSequence::from_sequence(self.inner.map(|value| value as f64))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SequenceError;

    #[test]
    fn test_int_lane_terminals() {
        assert_eq!(IntSequence::range(1, 5).sum().unwrap(), 10);
        assert_eq!(IntSequence::from_vec(vec![4, -2, 9]).min().unwrap(), Some(-2));
        assert_eq!(IntSequence::from_vec(vec![4, -2, 9]).max().unwrap(), Some(9));
        assert_eq!(IntSequence::from_vec(vec![]).average().unwrap(), None);
        assert_eq!(IntSequence::range(0, 4).average().unwrap(), Some(1.5));
    }

    #[test]
    fn test_lane_transformations() {
        let mut evens = IntSequence::range(0, 100)
            .filter(|v| v % 2 == 0)
            .map(|v| v / 2)
            .skip(1)
            .limit(3);
        assert_eq!(evens.to_vec().unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn test_lane_conversions() {
        let widened = IntSequence::from_vec(vec![i32::MAX, 1]).as_long().sum().unwrap();
        assert_eq!(widened, i64::from(i32::MAX) + 1);
        assert_eq!(LongSequence::range(0, 3).as_double().sum().unwrap(), 3.0);
        let mut labels =
            DoubleSequence::from_vec(vec![0.5, 1.5]).map_to_obj(|v| format!("{v:.1}"));
        assert_eq!(labels.to_vec().unwrap(), vec!["0.5", "1.5"]);
    }

    #[test]
    fn test_lane_is_single_use() {
        let mut lane = LongSequence::from_vec(vec![1, 2]);
        assert_eq!(lane.count().unwrap(), 2);
        assert_eq!(lane.sum(), Err(SequenceError::AlreadyConsumed));
    }

    #[test]
    fn test_double_fold() {
        let product = DoubleSequence::from_vec(vec![2.0, 3.0, 0.5])
            .fold(1.0, |acc, v| acc * v)
            .unwrap();
        assert_eq!(product, 3.0);
    }
}
