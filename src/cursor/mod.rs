//! Pull-based iteration primitives
//!
//! A [`Source`] produces elements on demand and signals termination with an
//! explicit [`Pull::End`] value rather than by unwinding. A [`Cursor`] layers
//! a single look-ahead slot on top of any source, giving the classic
//! `has_next` / `next` protocol:
//! - `has_next` fills the slot at most once and is idempotent while it is full
//! - `next` drains the slot and fails with [`SequenceError::NoPendingElement`]
//!   when called without a preceding `has_next` that returned `true`
//!
//! Backends: [`ArraySource`]/[`VecSource`] (array-backed), [`GeneratorSource`]
//! (supplier with explicit end signal), [`QueueSource`] (cross-thread blocking
//! queue with a sentinel) and [`HostSource`]/[`TryHostSource`] (external
//! iterators with an optional close hook).

mod array;
mod generator;
mod host;
mod queue;

pub use array::{ArraySource, VecSource};
pub use generator::{repeat_with, GeneratorSource};
pub use host::{HostSource, TryHostSource};
pub use queue::{BlockingQueue, QueueConfig, QueueDrain, QueueProducer, QueueSource};

use std::fmt;

use crate::{Result, SequenceError};

/// Outcome of a single pull from a [`Source`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Pull<T> {
    /// The source produced an element
    Value(T),
    /// The source has no more elements
    End,
}

impl<T> Pull<T> {
    /// Whether this pull signalled end-of-sequence.
    pub fn is_end(&self) -> bool {
        matches!(self, Pull::End)
    }

    /// Convert into an `Option`, discarding the end marker.
    pub fn into_option(self) -> Option<T> {
        match self {
            Pull::Value(value) => Some(value),
            Pull::End => None,
        }
    }

    /// Map the produced value, keeping the end marker untouched.
    pub fn map<U, F>(self, f: F) -> Pull<U>
    where
        F: FnOnce(T) -> U,
    {
        match self {
            Pull::Value(value) => Pull::Value(f(value)),
            Pull::End => Pull::End,
        }
    }
}

impl<T> From<Option<T>> for Pull<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(value) => Pull::Value(value),
            None => Pull::End,
        }
    }
}

/// Anything that can produce a sequence of elements one pull at a time.
pub trait Source {
    /// Element type produced by this source.
    type Item;

    /// Produce the next element or signal the end of the sequence.
    fn pull(&mut self) -> Result<Pull<Self::Item>>;

    /// Bounds on the number of remaining elements, as for `Iterator::size_hint`.
    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, None)
    }

    /// Move every remaining element into `out`.
    ///
    /// Array-backed sources override this to copy whole slices instead of
    /// dispatching once per element.
    fn pull_into(&mut self, out: &mut Vec<Self::Item>) -> Result<()> {
        let (lower, _) = self.size_hint();
        out.reserve(lower);
        while let Pull::Value(value) = self.pull()? {
            out.push(value);
        }
        Ok(())
    }

    /// Release any resources held by the source. Must be idempotent.
    fn close(&mut self) {}
}

impl<S: Source + ?Sized> Source for Box<S> {
    type Item = S::Item;

    fn pull(&mut self) -> Result<Pull<Self::Item>> {
        (**self).pull()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (**self).size_hint()
    }

    fn pull_into(&mut self, out: &mut Vec<Self::Item>) -> Result<()> {
        (**self).pull_into(out)
    }

    fn close(&mut self) {
        (**self).close()
    }
}

impl<S: Source + ?Sized> Source for &mut S {
    type Item = S::Item;

    fn pull(&mut self) -> Result<Pull<Self::Item>> {
        (**self).pull()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (**self).size_hint()
    }

    fn pull_into(&mut self, out: &mut Vec<Self::Item>) -> Result<()> {
        (**self).pull_into(out)
    }

    fn close(&mut self) {
        (**self).close()
    }
}

/// Peekable cursor over a [`Source`] with a single look-ahead slot.
pub struct Cursor<S: Source> {
    source: S,
    pending: Option<S::Item>,
    exhausted: bool,
}

impl<S: Source> Cursor<S> {
    /// Wrap a source; nothing is pulled until `has_next` is called.
    pub fn new(source: S) -> Self {
        Self {
            source,
            pending: None,
            exhausted: false,
        }
    }

    /// Whether another element is available, filling the look-ahead slot if needed.
    pub fn has_next(&mut self) -> Result<bool> {
        if self.pending.is_some() {
            return Ok(true);
        }
        if self.exhausted {
            return Ok(false);
        }
        match self.source.pull() {
            Ok(Pull::Value(value)) => {
                tracing::trace!("cursor filled look-ahead slot");
                self.pending = Some(value);
                Ok(true)
            }
            Ok(Pull::End) => {
                tracing::trace!("cursor reached end of source");
                self.finish();
                Ok(false)
            }
            Err(err) => {
                self.finish();
                Err(err)
            }
        }
    }

    /// Take the element buffered by the last successful `has_next`.
    pub fn next(&mut self) -> Result<S::Item> {
        self.pending.take().ok_or(SequenceError::NoPendingElement)
    }

    /// Borrow the upcoming element without consuming it.
    pub fn peek(&mut self) -> Result<Option<&S::Item>> {
        self.has_next()?;
        Ok(self.pending.as_ref())
    }

    /// Drain the slot and the rest of the source into a vector.
    pub fn drain_to_vec(&mut self) -> Result<Vec<S::Item>> {
        let mut out = Vec::new();
        if let Some(value) = self.pending.take() {
            out.push(value);
        }
        if !self.exhausted {
            let drained = self.source.pull_into(&mut out);
            self.finish();
            drained?;
        }
        Ok(out)
    }

    /// Whether the underlying source has signalled its end.
    pub fn is_exhausted(&self) -> bool {
        self.exhausted && self.pending.is_none()
    }

    /// Access the wrapped source.
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Adapt the cursor into a host iterator of fallible elements.
    pub fn into_results(self) -> Results<S> {
        Results { cursor: self }
    }

    fn finish(&mut self) {
        self.exhausted = true;
        self.source.close();
    }
}

impl<S: Source> fmt::Debug for Cursor<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cursor")
            .field("pending", &self.pending.is_some())
            .field("exhausted", &self.exhausted)
            .finish_non_exhaustive()
    }
}

/// Host iterator over a cursor, yielding `Result<T>` per element.
///
/// Iteration stops after the first error.
pub struct Results<S: Source> {
    cursor: Cursor<S>,
}

impl<S: Source> Iterator for Results<S> {
    type Item = Result<S::Item>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.cursor.has_next() {
            Ok(true) => Some(self.cursor.next()),
            Ok(false) => None,
            Err(err) => Some(Err(err)),
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.cursor.is_exhausted() {
            return (0, Some(0));
        }
        let buffered = usize::from(self.cursor.pending.is_some());
        let (lower, upper) = self.cursor.source.size_hint();
        (
            lower.saturating_add(buffered),
            upper.and_then(|u| u.checked_add(buffered)),
        )
    }
}

impl<S: Source> std::iter::FusedIterator for Results<S> {}

impl<S: Source> fmt::Debug for Results<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Results").field("cursor", &self.cursor).finish()
    }
}
