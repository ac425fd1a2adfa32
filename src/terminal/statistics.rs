//! Existence queries and single-pass extremes
//!
//! Lookups capture the element at a position into an `Option` slot, so a
//! sequence of `Option<T>` can hold `None` elements without them being read
//! as absent: `Some(None)` is a present null, `None` is no element.

use std::cmp::Ordering;

use crate::cursor::{Pull, Source};
use crate::Result;

/// Element at `index`, pulling no further than that position.
pub fn element_at<S: Source>(mut source: S, index: usize) -> Result<Option<S::Item>> {
    for _ in 0..index {
        if source.pull()?.is_end() {
            return Ok(None);
        }
    }
    Ok(source.pull()?.into_option())
}

/// Whether an element exists at `index`.
pub fn has_at<S: Source>(source: S, index: usize) -> Result<bool> {
    Ok(element_at(source, index)?.is_some())
}

/// Smallest element; the first of equal minima wins.
pub fn min_by<S, F>(mut source: S, mut compare: F) -> Result<Option<S::Item>>
where
    S: Source,
    F: FnMut(&S::Item, &S::Item) -> Ordering,
{
    let mut best = None;
    while let Pull::Value(candidate) = source.pull()? {
        best = match best {
            Some(current) if compare(&candidate, &current) != Ordering::Less => Some(current),
            _ => Some(candidate),
        };
    }
    Ok(best)
}

/// Largest element; the first of equal maxima wins.
pub fn max_by<S, F>(source: S, mut compare: F) -> Result<Option<S::Item>>
where
    S: Source,
    F: FnMut(&S::Item, &S::Item) -> Ordering,
{
    min_by(source, move |a, b| compare(a, b).reverse())
}

/// Both extremes in one traversal.
pub fn min_max_by<S, F>(source: S, compare: F) -> Result<Option<(S::Item, S::Item)>>
where
    S: Source,
    S::Item: Clone,
    F: FnMut(&S::Item, &S::Item) -> Ordering,
{
    let stats = statistics_by(source, compare)?;
    Ok(stats.min.zip(stats.max))
}

/// Count and extremes gathered in a single pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statistics<T> {
    /// Number of elements observed.
    pub count: usize,
    /// Smallest element, first of ties.
    pub min: Option<T>,
    /// Largest element, first of ties.
    pub max: Option<T>,
}

impl<T> Statistics<T> {
    /// Statistics of an empty sequence.
    pub fn empty() -> Self {
        Self {
            count: 0,
            min: None,
            max: None,
        }
    }

    /// Whether no element was observed.
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}

/// Count, minimum and maximum under `compare`, tracking two running candidates.
pub fn statistics_by<S, F>(mut source: S, mut compare: F) -> Result<Statistics<S::Item>>
where
    S: Source,
    S::Item: Clone,
    F: FnMut(&S::Item, &S::Item) -> Ordering,
{
    let mut stats = Statistics::empty();
    while let Pull::Value(candidate) = source.pull()? {
        stats.count += 1;
        let (min, max) = match (stats.min.take(), stats.max.take()) {
            (Some(min), Some(max)) => {
                let min = if compare(&candidate, &min) == Ordering::Less {
                    candidate.clone()
                } else {
                    min
                };
                let max = if compare(&candidate, &max) == Ordering::Greater {
                    candidate
                } else {
                    max
                };
                (min, max)
            }
            _ => (candidate.clone(), candidate),
        };
        stats.min = Some(min);
        stats.max = Some(max);
    }
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cursor::VecSource;

    #[test]
    fn test_has_at_with_null_elements() {
        let items = vec![Some(1), None, Some(3)];
        assert!(has_at(VecSource::new(items.clone()), 1).unwrap());
        assert_eq!(element_at(VecSource::new(items.clone()), 1).unwrap(), Some(None));
        assert!(!has_at(VecSource::new(items), 3).unwrap());
    }

    #[test]
    fn test_first_of_ties_wins() {
        let items = vec![(1, 'a'), (0, 'b'), (1, 'c'), (0, 'd')];
        let by_key = |a: &(i32, char), b: &(i32, char)| a.0.cmp(&b.0);
        assert_eq!(min_by(VecSource::new(items.clone()), by_key).unwrap(), Some((0, 'b')));
        assert_eq!(max_by(VecSource::new(items.clone()), by_key).unwrap(), Some((1, 'a')));
        assert_eq!(
            min_max_by(VecSource::new(items), by_key).unwrap(),
            Some(((0, 'b'), (1, 'a')))
        );
    }

    #[test]
    fn test_statistics_empty() {
        let stats = statistics_by(VecSource::new(Vec::<i32>::new()), i32::cmp).unwrap();
        assert!(stats.is_empty());
        assert_eq!(stats, Statistics::empty());
    }
}
