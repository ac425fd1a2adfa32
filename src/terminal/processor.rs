use std::fmt;

use crate::cursor::{Pull, Source};
use crate::Result;

/// Index-aware, single-pass visitor.
///
/// `process_element` is called once per element in traversal order starting
/// at index 0; `process_complete` is called exactly once afterwards with the
/// total element count, and produces the result.
pub trait ElementProcessor<T> {
    /// Final result of the traversal.
    type Output;

    /// Visit one element.
    fn process_element(&mut self, index: usize, element: T);

    /// Finish after the last element.
    fn process_complete(self, count: usize) -> Self::Output;
}

/// Drive a processor over every element of `source`.
pub fn run_processor<S, P>(mut source: S, mut processor: P) -> Result<P::Output>
where
    S: Source,
    P: ElementProcessor<S::Item>,
{
    let mut index = 0;
    while let Pull::Value(element) = source.pull()? {
        processor.process_element(index, element);
        index += 1;
    }
    Ok(processor.process_complete(index))
}

/// Processor that only reports the element count.
#[derive(Debug, Clone, Copy, Default)]
pub struct CountingProcessor;

impl<T> ElementProcessor<T> for CountingProcessor {
    type Output = usize;

    fn process_element(&mut self, _index: usize, _element: T) {}

    fn process_complete(self, count: usize) -> usize {
        count
    }
}

/// Processor assembled from two closures.
pub struct FnProcessor<E, C> {
    on_element: E,
    on_complete: C,
}

impl<E, C> FnProcessor<E, C> {
    /// Build a processor from an element visitor and a completion function.
    pub fn new(on_element: E, on_complete: C) -> Self {
        Self {
            on_element,
            on_complete,
        }
    }
}

impl<T, E, C, R> ElementProcessor<T> for FnProcessor<E, C>
where
    E: FnMut(usize, T),
    C: FnOnce(usize) -> R,
{
    type Output = R;

    fn process_element(&mut self, index: usize, element: T) {
        (self.on_element)(index, element);
    }

    fn process_complete(self, count: usize) -> R {
        (self.on_complete)(count)
    }
}

impl<E, C> fmt::Debug for FnProcessor<E, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnProcessor").finish_non_exhaustive()
    }
}
