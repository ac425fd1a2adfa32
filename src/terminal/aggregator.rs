use std::fmt;
use std::sync::Arc;

use crate::cursor::{Pull, Source};
use crate::Result;

/// Fold capability: fresh accumulator, per-element step, finisher.
pub trait Collector<T> {
    /// Intermediate accumulation state.
    type Accumulator;
    /// Final result.
    type Output;

    /// Create a fresh accumulator.
    fn supply(&self) -> Self::Accumulator;

    /// Fold one element into the accumulator.
    fn accumulate(&self, element: T, accumulator: Self::Accumulator) -> Self::Accumulator;

    /// Turn the accumulator into the final result.
    fn finish(&self, accumulator: Self::Accumulator) -> Self::Output;
}

/// Reusable named reduction built from three functions.
///
/// An aggregator holds no state between uses; every run starts from a fresh
/// accumulator produced by the initializer.
pub struct Aggregator<D, A, R> {
    init: Arc<dyn Fn() -> A>,
    step: Arc<dyn Fn(D, A) -> A>,
    finish: Arc<dyn Fn(A) -> R>,
}

impl<D: 'static, A: 'static, R: 'static> Aggregator<D, A, R> {
    /// Build an aggregator from initializer, fold step and finisher.
    pub fn new<I, S, F>(init: I, step: S, finish: F) -> Self
    where
        I: Fn() -> A + 'static,
        S: Fn(D, A) -> A + 'static,
        F: Fn(A) -> R + 'static,
    {
        Self {
            init: Arc::new(init),
            step: Arc::new(step),
            finish: Arc::new(finish),
        }
    }

    /// Post-process the finished value.
    pub fn and_then<U, G>(self, g: G) -> Aggregator<D, A, U>
    where
        G: Fn(R) -> U + 'static,
    {
        let finish = self.finish;
        Aggregator {
            init: self.init,
            step: self.step,
            finish: Arc::new(move |acc| g(finish(acc))),
        }
    }
}

impl<D: 'static, A: 'static> Aggregator<D, A, A> {
    /// Aggregator whose accumulator is already the result.
    pub fn folding<I, S>(init: I, step: S) -> Self
    where
        I: Fn() -> A + 'static,
        S: Fn(D, A) -> A + 'static,
    {
        Self::new(init, step, |acc| acc)
    }
}

impl<D: 'static> Aggregator<D, usize, usize> {
    /// Counts elements.
    pub fn counting() -> Self {
        Self::folding(|| 0, |_, count| count + 1)
    }
}

impl<D: 'static> Aggregator<D, Vec<D>, Vec<D>> {
    /// Collects elements in traversal order.
    pub fn to_vec() -> Self {
        Self::folding(Vec::new, |element, mut items| {
            items.push(element);
            items
        })
    }
}

impl<D: 'static> Aggregator<D, i64, i64> {
    /// Sums an `i64` extracted from each element, wrapping on overflow.
    pub fn summing_i64<F>(extract: F) -> Self
    where
        F: Fn(&D) -> i64 + 'static,
    {
        Self::folding(|| 0, move |element, sum: i64| sum.wrapping_add(extract(&element)))
    }
}

impl<D: fmt::Display + 'static> Aggregator<D, String, String> {
    /// Joins the display form of each element with `separator`.
    pub fn joining(separator: impl Into<String>) -> Self {
        let separator = separator.into();
        Self::folding(String::new, move |element, mut joined: String| {
            if !joined.is_empty() {
                joined.push_str(&separator);
            }
            joined.push_str(&element.to_string());
            joined
        })
    }
}

impl<D, A, R> Collector<D> for Aggregator<D, A, R> {
    type Accumulator = A;
    type Output = R;

    fn supply(&self) -> A {
        (self.init)()
    }

    fn accumulate(&self, element: D, accumulator: A) -> A {
        (self.step)(element, accumulator)
    }

    fn finish(&self, accumulator: A) -> R {
        (self.finish)(accumulator)
    }
}

impl<D, A, R> Clone for Aggregator<D, A, R> {
    fn clone(&self) -> Self {
        Self {
            init: Arc::clone(&self.init),
            step: Arc::clone(&self.step),
            finish: Arc::clone(&self.finish),
        }
    }
}

impl<D, A, R> fmt::Debug for Aggregator<D, A, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Aggregator").finish_non_exhaustive()
    }
}

/// Drive a collector over every element of `source`.
pub fn collect_with<S, C>(mut source: S, collector: &C) -> Result<C::Output>
where
    S: Source,
    C: Collector<S::Item> + ?Sized,
{
    let mut accumulator = collector.supply();
    while let Pull::Value(element) = source.pull()? {
        accumulator = collector.accumulate(element, accumulator);
    }
    Ok(collector.finish(accumulator))
}

/// Fold into a mutable container created by `supplier`.
pub fn collect_into<S, A, F, G>(mut source: S, supplier: F, mut accumulator: G) -> Result<A>
where
    S: Source,
    F: FnOnce() -> A,
    G: FnMut(&mut A, S::Item),
{
    let mut container = supplier();
    while let Pull::Value(element) = source.pull()? {
        accumulator(&mut container, element);
    }
    Ok(container)
}
