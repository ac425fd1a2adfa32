//! Array-backed sources
//!
//! [`ArraySource`] reads a shared slice window `[start, start + length)` and
//! clones elements out, so the same backing array can be re-traversed by any
//! number of cursors. [`VecSource`] moves elements out of an owned vector.

use std::sync::Arc;

use super::{Pull, Source};
use crate::{Result, SequenceError};

/// Source over a window of a shared array.
#[derive(Debug, Clone)]
pub struct ArraySource<T> {
    data: Arc<[T]>,
    index: usize,
    end: usize,
}

impl<T> ArraySource<T> {
    /// Source over the whole array.
    pub fn new(data: Arc<[T]>) -> Self {
        let end = data.len();
        Self {
            data,
            index: 0,
            end,
        }
    }

    /// Source over `length` elements starting at `start`.
    pub fn slice(data: Arc<[T]>, start: usize, length: usize) -> Result<Self> {
        let end = start.checked_add(length).ok_or_else(|| {
            SequenceError::InvalidConfiguration("array window overflows usize".to_string())
        })?;
        if end > data.len() {
            return Err(SequenceError::InvalidConfiguration(format!(
                "array window [{start}, {end}) exceeds length {}",
                data.len()
            )));
        }
        Ok(Self {
            data,
            index: start,
            end,
        })
    }

    /// Number of elements not yet pulled.
    pub fn remaining(&self) -> usize {
        self.end - self.index
    }
}

impl<T: Clone> Source for ArraySource<T> {
    type Item = T;

    fn pull(&mut self) -> Result<Pull<T>> {
        if self.index >= self.end {
            return Ok(Pull::End);
        }
        let value = self.data[self.index].clone();
        self.index += 1;
        Ok(Pull::Value(value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining(), Some(self.remaining()))
    }

    fn pull_into(&mut self, out: &mut Vec<T>) -> Result<()> {
        out.extend_from_slice(&self.data[self.index..self.end]);
        self.index = self.end;
        Ok(())
    }
}

/// Source that moves elements out of an owned vector.
#[derive(Debug, Clone)]
pub struct VecSource<T> {
    items: std::vec::IntoIter<T>,
}

impl<T> VecSource<T> {
    /// Create a source yielding `items` in order.
    pub fn new(items: Vec<T>) -> Self {
        Self {
            items: items.into_iter(),
        }
    }
}

impl<T> Source for VecSource<T> {
    type Item = T;

    fn pull(&mut self) -> Result<Pull<T>> {
        Ok(self.items.next().into())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.items.size_hint()
    }

    fn pull_into(&mut self, out: &mut Vec<T>) -> Result<()> {
        out.extend(self.items.by_ref());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cursor::Cursor;

    #[test]
    fn test_slice_window() {
        let data: Arc<[i32]> = Arc::from(vec![10, 20, 30, 40, 50]);
        let source = ArraySource::slice(data, 1, 3).unwrap();
        assert_eq!(source.size_hint(), (3, Some(3)));
        let mut cursor = Cursor::new(source);
        assert_eq!(cursor.drain_to_vec().unwrap(), vec![20, 30, 40]);
    }

    #[test]
    fn test_slice_out_of_bounds() {
        let data: Arc<[i32]> = Arc::from(vec![1, 2]);
        assert!(matches!(
            ArraySource::slice(data, 1, 5),
            Err(SequenceError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_batch_after_partial_pull() {
        let data: Arc<[i32]> = Arc::from(vec![1, 2, 3, 4]);
        let mut source = ArraySource::new(data);
        assert_eq!(source.pull().unwrap(), Pull::Value(1));
        let mut rest = Vec::new();
        source.pull_into(&mut rest).unwrap();
        assert_eq!(rest, vec![2, 3, 4]);
        assert_eq!(source.pull().unwrap(), Pull::End);
    }
}
