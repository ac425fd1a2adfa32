//! Host-iterator-backed sources
//!
//! Thin adapters over externally supplied iterators. An optional close hook
//! runs exactly once: when the source reports its end, when it is closed
//! explicitly, or when it is dropped, whichever happens first.

use std::fmt;

use super::{Pull, Source};
use crate::{Result, SequenceError};

type CloseHook = Box<dyn FnOnce()>;

/// Source over any host iterator.
pub struct HostSource<I> {
    iter: I,
    on_close: Option<CloseHook>,
}

impl<I: Iterator> HostSource<I> {
    /// Wrap a host iterator.
    pub fn new(iter: I) -> Self {
        Self {
            iter,
            on_close: None,
        }
    }

    /// Wrap a host iterator with a cleanup hook.
    pub fn with_close<F>(iter: I, on_close: F) -> Self
    where
        F: FnOnce() + 'static,
    {
        Self {
            iter,
            on_close: Some(Box::new(on_close)),
        }
    }
}

impl<I: Iterator> Source for HostSource<I> {
    type Item = I::Item;

    fn pull(&mut self) -> Result<Pull<I::Item>> {
        Ok(self.iter.next().into())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.iter.size_hint()
    }

    fn close(&mut self) {
        run_close_hook(&mut self.on_close);
    }
}

impl<I> Drop for HostSource<I> {
    fn drop(&mut self) {
        run_close_hook(&mut self.on_close);
    }
}

impl<I> fmt::Debug for HostSource<I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HostSource")
            .field("close_pending", &self.on_close.is_some())
            .finish_non_exhaustive()
    }
}

/// Source over a host iterator of fallible items.
///
/// An `Err` item is reported as [`SequenceError::Source`] carrying its message.
pub struct TryHostSource<I> {
    inner: HostSource<I>,
}

impl<I, T, E> TryHostSource<I>
where
    I: Iterator<Item = std::result::Result<T, E>>,
    E: fmt::Display,
{
    /// Wrap a fallible host iterator.
    pub fn new(iter: I) -> Self {
        Self {
            inner: HostSource::new(iter),
        }
    }

    /// Wrap a fallible host iterator with a cleanup hook.
    pub fn with_close<F>(iter: I, on_close: F) -> Self
    where
        F: FnOnce() + 'static,
    {
        Self {
            inner: HostSource::with_close(iter, on_close),
        }
    }
}

impl<I, T, E> Source for TryHostSource<I>
where
    I: Iterator<Item = std::result::Result<T, E>>,
    E: fmt::Display,
{
    type Item = T;

    fn pull(&mut self) -> Result<Pull<T>> {
        match self.inner.iter.next() {
            Some(Ok(value)) => Ok(Pull::Value(value)),
            Some(Err(err)) => Err(SequenceError::source_failure(err.to_string())),
            None => Ok(Pull::End),
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }

    fn close(&mut self) {
        self.inner.close();
    }
}

impl<I> fmt::Debug for TryHostSource<I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TryHostSource")
            .field("inner", &self.inner)
            .finish()
    }
}

fn run_close_hook(hook: &mut Option<CloseHook>) {
    if let Some(hook) = hook.take() {
        tracing::debug!("running host source close hook");
        hook();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cursor::Cursor;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn test_close_hook_runs_once_at_end() {
        let closed = Rc::new(Cell::new(0));
        let counter = Rc::clone(&closed);
        let source = HostSource::with_close(vec![1, 2].into_iter(), move || {
            counter.set(counter.get() + 1)
        });
        let mut cursor = Cursor::new(source);
        assert_eq!(cursor.drain_to_vec().unwrap(), vec![1, 2]);
        assert_eq!(closed.get(), 1);
        drop(cursor);
        assert_eq!(closed.get(), 1);
    }

    #[test]
    fn test_close_hook_runs_on_drop() {
        let closed = Rc::new(Cell::new(false));
        let flag = Rc::clone(&closed);
        let source = HostSource::with_close(0.., move || flag.set(true));
        let mut cursor = Cursor::new(source);
        assert!(cursor.has_next().unwrap());
        drop(cursor);
        assert!(closed.get());
    }

    #[test]
    fn test_fallible_items_surface_as_source_errors() {
        let items: Vec<std::result::Result<i32, String>> =
            vec![Ok(1), Err("bad record".to_string())];
        let mut source = TryHostSource::new(items.into_iter());
        assert_eq!(source.pull(), Ok(Pull::Value(1)));
        assert_eq!(
            source.pull(),
            Err(SequenceError::Source("bad record".to_string()))
        );
    }
}
