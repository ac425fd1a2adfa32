//! Lane-specific element processors and summaries
//!
//! Each lane has its own processor contract so values are visited unboxed.
//! An extractor turns any lane processor into a generic
//! [`ElementProcessor`], letting one summary implementation serve every
//! element type that can supply the primitive.

use crate::terminal::ElementProcessor;

macro_rules! lane_processor {
    (
        $(#[$doc:meta])*
        $processor:ident, $adapter:ident, $prim:ty, $element:ident, $complete:ident
    ) => {
        $(#[$doc])*
        pub trait $processor {
            /// Final result of the traversal.
            type Output;

            /// Visit one value; indices start at 0.
            fn $element(&mut self, index: usize, value: $prim);

            /// Finish with the total number of values visited.
            fn $complete(self, count: usize) -> Self::Output;

            /// Adapt into a generic processor pulling the value out of each element.
            fn extracting<F>(self, extract: F) -> $adapter<Self, F>
            where
                Self: Sized,
            {
                $adapter {
                    processor: self,
                    extract,
                }
            }
        }

        /// Generic [`ElementProcessor`] backed by a lane processor and an extractor.
        #[derive(Debug, Clone)]
        pub struct $adapter<P, F> {
            processor: P,
            extract: F,
        }

        impl<T, P, F> ElementProcessor<T> for $adapter<P, F>
        where
            P: $processor,
            F: FnMut(&T) -> $prim,
        {
            type Output = P::Output;

            fn process_element(&mut self, index: usize, element: T) {
                let value = (self.extract)(&element);
                self.processor.$element(index, value);
            }

            fn process_complete(self, count: usize) -> P::Output {
                self.processor.$complete(count)
            }
        }
    };
}

lane_processor!(
    /// Index-aware visitor over `i32` values.
    IntProcessor, IntAdapter, i32, process_int_element, process_int_complete
);
lane_processor!(
    /// Index-aware visitor over `i64` values.
    LongProcessor, LongAdapter, i64, process_long_element, process_long_complete
);
lane_processor!(
    /// Index-aware visitor over `f64` values.
    DoubleProcessor, DoubleAdapter, f64, process_double_element, process_double_complete
);

/// Count, sum and extremes of `i32` values. The sum is widened to `i64`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IntSummary {
    count: usize,
    sum: i64,
    min: Option<i32>,
    max: Option<i32>,
}

impl IntSummary {
    /// Summary of nothing.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold in one value.
    pub fn accept(&mut self, value: i32) {
        self.count += 1;
        self.sum += i64::from(value);
        self.min = Some(self.min.map_or(value, |m| m.min(value)));
        self.max = Some(self.max.map_or(value, |m| m.max(value)));
    }

    /// Number of values.
    pub fn count(&self) -> usize {
        self.count
    }

    /// Sum of all values.
    pub fn sum(&self) -> i64 {
        self.sum
    }

    /// Smallest value.
    pub fn min(&self) -> Option<i32> {
        self.min
    }

    /// Largest value.
    pub fn max(&self) -> Option<i32> {
        self.max
    }

    /// Arithmetic mean, `None` when empty.
    pub fn average(&self) -> Option<f64> {
        (self.count > 0).then(|| self.sum as f64 / self.count as f64)
    }
}

impl IntProcessor for IntSummary {
    type Output = IntSummary;

    fn process_int_element(&mut self, _index: usize, value: i32) {
        self.accept(value);
    }

    fn process_int_complete(self, _count: usize) -> IntSummary {
        self
    }
}

/// Count, sum and extremes of `i64` values. The sum wraps on overflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LongSummary {
    count: usize,
    sum: i64,
    min: Option<i64>,
    max: Option<i64>,
}

impl LongSummary {
    /// Summary of nothing.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold in one value.
    pub fn accept(&mut self, value: i64) {
        self.count += 1;
        self.sum = self.sum.wrapping_add(value);
        self.min = Some(self.min.map_or(value, |m| m.min(value)));
        self.max = Some(self.max.map_or(value, |m| m.max(value)));
    }

    /// Number of values.
    pub fn count(&self) -> usize {
        self.count
    }

    /// Sum of all values.
    pub fn sum(&self) -> i64 {
        self.sum
    }

    /// Smallest value.
    pub fn min(&self) -> Option<i64> {
        self.min
    }

    /// Largest value.
    pub fn max(&self) -> Option<i64> {
        self.max
    }

    /// Arithmetic mean, `None` when empty.
    pub fn average(&self) -> Option<f64> {
        (self.count > 0).then(|| self.sum as f64 / self.count as f64)
    }
}

impl LongProcessor for LongSummary {
    type Output = LongSummary;

    fn process_long_element(&mut self, _index: usize, value: i64) {
        self.accept(value);
    }

    fn process_long_complete(self, _count: usize) -> LongSummary {
        self
    }
}

/// Count, sum and extremes of `f64` values.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DoubleSummary {
    count: usize,
    sum: f64,
    min: Option<f64>,
    max: Option<f64>,
}

impl DoubleSummary {
    /// Summary of nothing.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold in one value. A NaN poisons both extremes.
    pub fn accept(&mut self, value: f64) {
        self.count += 1;
        self.sum += value;
        self.min = Some(self.min.map_or(value, |m| nan_poisoned(m, value, f64::min)));
        self.max = Some(self.max.map_or(value, |m| nan_poisoned(m, value, f64::max)));
    }

    /// Number of values.
    pub fn count(&self) -> usize {
        self.count
    }

    /// Sum of all values.
    pub fn sum(&self) -> f64 {
        self.sum
    }

    /// Smallest value.
    pub fn min(&self) -> Option<f64> {
        self.min
    }

    /// Largest value.
    pub fn max(&self) -> Option<f64> {
        self.max
    }

    /// Arithmetic mean, `None` when empty.
    pub fn average(&self) -> Option<f64> {
        (self.count > 0).then(|| self.sum / self.count as f64)
    }
}

fn nan_poisoned(current: f64, value: f64, pick: fn(f64, f64) -> f64) -> f64 {
    if current.is_nan() || value.is_nan() {
        f64::NAN
    } else {
        pick(current, value)
    }
}

impl DoubleProcessor for DoubleSummary {
    type Output = DoubleSummary;

    fn process_double_element(&mut self, _index: usize, value: f64) {
        self.accept(value);
    }

    fn process_double_complete(self, _count: usize) -> DoubleSummary {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cursor::VecSource;
    use crate::terminal::run_processor;

    #[test]
    fn test_int_summary_through_extractor() {
        let words = vec!["a".to_string(), "abc".to_string(), "ab".to_string()];
        let adapter = IntSummary::new().extracting(|word: &String| word.len() as i32);
        let summary = run_processor(VecSource::new(words), adapter).unwrap();
        assert_eq!(summary.count(), 3);
        assert_eq!(summary.sum(), 6);
        assert_eq!(summary.min(), Some(1));
        assert_eq!(summary.max(), Some(3));
        assert_eq!(summary.average(), Some(2.0));
    }

    #[test]
    fn test_int_sum_does_not_overflow() {
        let mut summary = IntSummary::new();
        summary.accept(i32::MAX);
        summary.accept(i32::MAX);
        assert_eq!(summary.sum(), 2 * i64::from(i32::MAX));
    }

    #[test]
    fn test_empty_summaries() {
        assert_eq!(LongSummary::new().average(), None);
        assert_eq!(DoubleSummary::new().min(), None);
    }

    #[test]
    fn test_double_nan_poisons_extremes() {
        let mut summary = DoubleSummary::new();
        summary.accept(1.0);
        summary.accept(f64::NAN);
        summary.accept(0.5);
        assert!(summary.min().is_some_and(f64::is_nan));
        assert!(summary.max().is_some_and(f64::is_nan));
    }

    struct IndexSum(usize);

    impl LongProcessor for IndexSum {
        type Output = (usize, usize);

        fn process_long_element(&mut self, index: usize, _value: i64) {
            self.0 += index;
        }

        fn process_long_complete(self, count: usize) -> (usize, usize) {
            (self.0, count)
        }
    }

    #[test]
    fn test_custom_lane_processor_sees_indices() {
        let adapter = IndexSum(0).extracting(|x: &i64| *x);
        let result = run_processor(VecSource::new(vec![7i64, 8, 9]), adapter).unwrap();
        assert_eq!(result, (3, 3));
    }
}
