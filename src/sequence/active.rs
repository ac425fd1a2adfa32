//! Single-use pipelines bound to one source

use std::any::Any;
use std::cmp::Ordering;
use std::collections::HashSet;
use std::fmt;
use std::hash::Hash;
use std::sync::Arc;

use indexmap::IndexMap;

use super::stages::{
    Chain, Chunks, Distinct, Failed, Filter, FilterIndexed, FilterMap, FlatMap, Limit, Map, MapIf,
    MapWithPrevious, Peek, Skip, SkipWhile, Sorted, TakeWhile, WithIndex, Zip,
};
use super::AlignmentOption;
use crate::cursor::{
    repeat_with, ArraySource, Cursor, GeneratorSource, HostSource, Pull, QueueSource, Results,
    Source, TryHostSource, VecSource,
};
use crate::primitive::{
    DoubleProcessor, DoubleSequence, DoubleSummary, IntProcessor, IntSequence, IntSummary,
    LongProcessor, LongSequence, LongSummary,
};
use crate::terminal::{self, Collector, ElementProcessor, SeqHash, Statistics};
use crate::{Result, SequenceError};

pub(crate) type BoxedSource<T> = Box<dyn Source<Item = T>>;

/// Single-traversal pipeline over exactly one source.
///
/// Transformations take the sequence by value and wrap its source in a new
/// stage without pulling anything. Terminal operations take `&mut self`,
/// drain the source, and leave the sequence consumed: every later terminal
/// fails with [`SequenceError::AlreadyConsumed`], and every later
/// transformation yields a sequence whose first pull fails the same way.
pub struct ActiveSequence<T: 'static> {
    source: Option<BoxedSource<T>>,
}

impl<T: 'static> ActiveSequence<T> {
    /// Wrap any source.
    pub fn from_source<S>(source: S) -> Self
    where
        S: Source<Item = T> + 'static,
    {
        Self {
            source: Some(Box::new(source)),
        }
    }

    /// Sequence owning the elements of a vector.
    pub fn from_vec(items: Vec<T>) -> Self {
        Self::from_source(VecSource::new(items))
    }

    /// Sequence over a shared array, cloning elements out as they are pulled.
    pub fn from_array(data: impl Into<Arc<[T]>>) -> Self
    where
        T: Clone,
    {
        Self::from_source(ArraySource::new(data.into()))
    }

    /// Sequence over `[start, start + length)` of a shared array.
    pub fn from_slice(data: impl Into<Arc<[T]>>, start: usize, length: usize) -> Result<Self>
    where
        T: Clone,
    {
        Ok(Self::from_source(ArraySource::slice(data.into(), start, length)?))
    }

    /// Sequence driven by a generator that signals its own end with [`Pull::End`].
    pub fn from_generator<F>(generator: F) -> Self
    where
        F: FnMut() -> Result<Pull<T>> + 'static,
    {
        Self::from_source(GeneratorSource::new(generator))
    }

    /// Unbounded sequence of values produced on demand.
    pub fn repeat_with<G>(producer: G) -> Self
    where
        G: FnMut() -> T + 'static,
    {
        Self::from_source(repeat_with(producer))
    }

    /// Sequence fed by a producer thread through a blocking queue.
    pub fn from_queue(source: QueueSource<T>) -> Self
    where
        T: PartialEq,
    {
        Self::from_source(source)
    }

    /// Sequence over a host iterator.
    pub fn from_host<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = T>,
        I::IntoIter: 'static,
    {
        Self::from_source(HostSource::new(iter.into_iter()))
    }

    /// Sequence over a host iterator with a cleanup hook run once when the
    /// traversal ends or the sequence is dropped.
    pub fn from_host_with_close<I, F>(iter: I, on_close: F) -> Self
    where
        I: IntoIterator<Item = T>,
        I::IntoIter: 'static,
        F: FnOnce() + 'static,
    {
        Self::from_source(HostSource::with_close(iter.into_iter(), on_close))
    }

    /// Sequence over a host iterator of fallible elements.
    pub fn from_fallible<I, E>(iter: I) -> Self
    where
        I: IntoIterator<Item = std::result::Result<T, E>>,
        I::IntoIter: 'static,
        E: fmt::Display,
    {
        Self::from_source(TryHostSource::new(iter.into_iter()))
    }

    /// Sequence with no elements.
    pub fn empty() -> Self {
        Self::from_vec(Vec::new())
    }

    /// Sequence whose first pull fails with `error`.
    pub(crate) fn failed(error: SequenceError) -> Self {
        Self::from_source(Failed::new(error))
    }

    /// Whether a terminal operation has already run.
    pub fn is_consumed(&self) -> bool {
        self.source.is_none()
    }

    pub(crate) fn into_source(self) -> Option<BoxedSource<T>> {
        self.source
    }

    fn then<U, S, F>(self, stage: F) -> ActiveSequence<U>
    where
        U: 'static,
        S: Source<Item = U> + 'static,
        F: FnOnce(BoxedSource<T>) -> S,
    {
        match self.source {
            Some(source) => ActiveSequence::from_source(stage(source)),
            None => ActiveSequence::failed(SequenceError::AlreadyConsumed),
        }
    }

    fn consume<R, F>(&mut self, terminal: F) -> Result<R>
    where
        F: FnOnce(&mut BoxedSource<T>) -> Result<R>,
    {
        let mut source = self.source.take().ok_or(SequenceError::AlreadyConsumed)?;
        tracing::trace!("active sequence consumed");
        let result = terminal(&mut source);
        source.close();
        result
    }

    // ---- filtering ----

    /// Keep elements matching `predicate`.
    pub fn filter<P>(self, predicate: P) -> Self
    where
        P: FnMut(&T) -> bool + 'static,
    {
        self.then(|source| Filter::new(source, predicate))
    }

    /// Keep elements for which `predicate(index, element)` holds.
    pub fn filter_indexed<P>(self, predicate: P) -> Self
    where
        P: FnMut(usize, &T) -> bool + 'static,
    {
        self.then(|source| FilterIndexed::new(source, predicate))
    }

    /// Drop every element contained in `items`.
    pub fn exclude<I>(self, items: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Hash + Eq,
    {
        let excluded: HashSet<T> = items.into_iter().collect();
        self.filter(move |element| !excluded.contains(element))
    }

    /// Map and filter in one step, keeping the `Some` results.
    pub fn filter_map<U, F>(self, f: F) -> ActiveSequence<U>
    where
        U: 'static,
        F: FnMut(T) -> Option<U> + 'static,
    {
        self.then(|source| FilterMap::new(source, f))
    }

    // ---- mapping ----

    /// Transform every element.
    pub fn map<U, F>(self, f: F) -> ActiveSequence<U>
    where
        U: 'static,
        F: FnMut(T) -> U + 'static,
    {
        self.then(|source| Map::new(source, f))
    }

    /// Apply `mapper` where `condition` holds and `fallback` elsewhere.
    pub fn map_if<U, P, F, G>(self, condition: P, mapper: F, fallback: G) -> ActiveSequence<U>
    where
        U: 'static,
        P: FnMut(&T) -> bool + 'static,
        F: FnMut(T) -> U + 'static,
        G: FnMut(T) -> U + 'static,
    {
        self.then(|source| MapIf::new(source, condition, mapper, fallback))
    }

    /// Attach the traversal index to each element.
    pub fn with_index(self) -> ActiveSequence<(usize, T)> {
        self.then(WithIndex::new)
    }

    /// Map each element together with its predecessor (`None` for the first).
    pub fn map_with_previous<U, F>(self, f: F) -> ActiveSequence<U>
    where
        T: Clone,
        U: 'static,
        F: FnMut(Option<&T>, &T) -> U + 'static,
    {
        self.then(|source| MapWithPrevious::new(source, f))
    }

    /// Observe each element as it passes.
    pub fn peek<F>(self, f: F) -> Self
    where
        F: FnMut(&T) + 'static,
    {
        self.then(|source| Peek::new(source, f))
    }

    /// Replace each element by the elements of a host iterable.
    pub fn flat_map<U, I, F>(self, f: F) -> ActiveSequence<U>
    where
        U: 'static,
        I: IntoIterator<Item = U> + 'static,
        I::IntoIter: 'static,
        F: FnMut(T) -> I + 'static,
    {
        self.then(|source| FlatMap::new(source, f))
    }

    // ---- slicing ----

    /// Drop the first `n` elements.
    pub fn skip(self, n: usize) -> Self {
        self.then(|source| Skip::new(source, n))
    }

    /// Keep at most `n` elements, never pulling past the `n`th.
    pub fn limit(self, n: usize) -> Self {
        self.then(|source| Limit::new(source, n))
    }

    /// Keep elements while `predicate` holds, then end.
    pub fn take_while<P>(self, predicate: P) -> Self
    where
        P: FnMut(&T) -> bool + 'static,
    {
        self.then(|source| TakeWhile::new(source, predicate))
    }

    /// Drop elements while `predicate` holds, then pass the rest through.
    pub fn skip_while<P>(self, predicate: P) -> Self
    where
        P: FnMut(&T) -> bool + 'static,
    {
        self.then(|source| SkipWhile::new(source, predicate))
    }

    /// Continue with `other` once this sequence ends.
    pub fn chain(self, other: ActiveSequence<T>) -> Self {
        match (self.source, other.source) {
            (Some(first), Some(second)) => Self::from_source(Chain::new(first, second)),
            _ => Self::failed(SequenceError::AlreadyConsumed),
        }
    }

    /// Drop repeated elements; the first occurrence wins.
    pub fn distinct(self) -> Self
    where
        T: Hash + Eq + Clone,
    {
        self.then(Distinct::new)
    }

    /// Consecutive runs of `size` elements; the last run may be shorter.
    pub fn chunks(self, size: usize) -> Result<ActiveSequence<Vec<T>>> {
        match self.source {
            Some(source) => Ok(ActiveSequence::from_source(Chunks::new(source, size)?)),
            None => Ok(ActiveSequence::failed(SequenceError::AlreadyConsumed)),
        }
    }

    // ---- sorting ----

    /// Stable sort by the natural order. Drains the upstream on first pull.
    pub fn sorted(self) -> Self
    where
        T: Ord,
    {
        self.sorted_by(T::cmp)
    }

    /// Stable sort by a comparator.
    pub fn sorted_by<C>(self, compare: C) -> Self
    where
        C: FnMut(&T, &T) -> Ordering + 'static,
    {
        self.then(|source| Sorted::new(source, compare))
    }

    /// Stable sort by a derived key.
    pub fn sorted_by_key<K, F>(self, mut key: F) -> Self
    where
        K: Ord,
        F: FnMut(&T) -> K + 'static,
    {
        self.sorted_by(move |a, b| key(a).cmp(&key(b)))
    }

    /// Stable sort by a derived key under a custom key ordering.
    pub fn sorted_by_key_with<K, F, C>(self, mut key: F, mut compare: C) -> Self
    where
        F: FnMut(&T) -> K + 'static,
        C: FnMut(&K, &K) -> Ordering + 'static,
    {
        self.sorted_by(move |a, b| compare(&key(a), &key(b)))
    }

    // ---- pairing ----

    /// Pair positions with `other` under the given alignment.
    pub fn zip<U: 'static>(
        self,
        other: ActiveSequence<U>,
        alignment: AlignmentOption,
    ) -> ActiveSequence<(Option<T>, Option<U>)> {
        match (self.source, other.source) {
            (Some(left), Some(right)) => {
                ActiveSequence::from_source(Zip::new(left, right, alignment))
            }
            _ => ActiveSequence::failed(SequenceError::AlreadyConsumed),
        }
    }

    /// Pair positions until the shorter side ends.
    pub fn zip_exact<U: 'static>(self, other: ActiveSequence<U>) -> ActiveSequence<(T, U)> {
        self.zip(other, AlignmentOption::RequireBoth)
            .filter_map(|pair| match pair {
                (Some(left), Some(right)) => Some((left, right)),
                _ => None,
            })
    }

    /// Combine positions with `other` through `f`.
    pub fn zip_with<U, R, F>(
        self,
        other: ActiveSequence<U>,
        alignment: AlignmentOption,
        mut f: F,
    ) -> ActiveSequence<R>
    where
        U: 'static,
        R: 'static,
        F: FnMut(Option<T>, Option<U>) -> R + 'static,
    {
        self.zip(other, alignment).map(move |(left, right)| f(left, right))
    }

    // ---- primitive lanes ----

    /// Cross into the `i32` lane.
    pub fn map_to_int<F>(self, extract: F) -> IntSequence
    where
        F: FnMut(T) -> i32 + 'static,
    {
        IntSequence::from_sequence(self.map(extract))
    }

    /// Cross into the `i64` lane.
    pub fn map_to_long<F>(self, extract: F) -> LongSequence
    where
        F: FnMut(T) -> i64 + 'static,
    {
        LongSequence::from_sequence(self.map(extract))
    }

    /// Cross into the `f64` lane.
    pub fn map_to_double<F>(self, extract: F) -> DoubleSequence
    where
        F: FnMut(T) -> f64 + 'static,
    {
        DoubleSequence::from_sequence(self.map(extract))
    }

    // ---- terminals ----

    /// Number of elements.
    pub fn count(&mut self) -> Result<usize> {
        self.consume(|source| {
            let mut count = 0;
            while let Pull::Value(_) = source.pull()? {
                count += 1;
            }
            Ok(count)
        })
    }

    /// Every element, in traversal order.
    pub fn to_vec(&mut self) -> Result<Vec<T>> {
        self.consume(|source| {
            let mut out = Vec::new();
            source.pull_into(&mut out)?;
            Ok(out)
        })
    }

    /// Collect into any host collection.
    pub fn collect<C: FromIterator<T>>(&mut self) -> Result<C> {
        self.iter().collect()
    }

    /// Run `f` on every element.
    pub fn for_each<F>(&mut self, mut f: F) -> Result<()>
    where
        F: FnMut(T),
    {
        self.consume(|source| {
            while let Pull::Value(element) = source.pull()? {
                f(element);
            }
            Ok(())
        })
    }

    /// Left fold from `init`.
    pub fn fold<A, F>(&mut self, init: A, mut f: F) -> Result<A>
    where
        F: FnMut(A, T) -> A,
    {
        self.consume(|source| {
            let mut acc = init;
            while let Pull::Value(element) = source.pull()? {
                acc = f(acc, element);
            }
            Ok(acc)
        })
    }

    /// Fold seeded with the first element; `None` when empty.
    pub fn reduce<F>(&mut self, mut f: F) -> Result<Option<T>>
    where
        F: FnMut(T, T) -> T,
    {
        self.fold(None, |acc, element| {
            Some(match acc {
                Some(acc) => f(acc, element),
                None => element,
            })
        })
    }

    /// First element, pulling nothing further.
    pub fn first(&mut self) -> Result<Option<T>> {
        self.get(0)
    }

    /// Last element.
    pub fn last(&mut self) -> Result<Option<T>> {
        self.fold(None, |_, element| Some(element))
    }

    /// First element matching `predicate`.
    pub fn find_first<P>(&mut self, mut predicate: P) -> Result<Option<T>>
    where
        P: FnMut(&T) -> bool,
    {
        self.consume(|source| {
            while let Pull::Value(element) = source.pull()? {
                if predicate(&element) {
                    return Ok(Some(element));
                }
            }
            Ok(None)
        })
    }

    /// Whether any element matches; stops at the first match.
    pub fn any_match<P>(&mut self, predicate: P) -> Result<bool>
    where
        P: FnMut(&T) -> bool,
    {
        Ok(self.find_first(predicate)?.is_some())
    }

    /// Whether every element matches; stops at the first mismatch.
    pub fn all_match<P>(&mut self, mut predicate: P) -> Result<bool>
    where
        P: FnMut(&T) -> bool,
    {
        Ok(!self.any_match(|element| !predicate(element))?)
    }

    /// Whether no element matches.
    pub fn none_match<P>(&mut self, predicate: P) -> Result<bool>
    where
        P: FnMut(&T) -> bool,
    {
        Ok(!self.any_match(predicate)?)
    }

    /// Whether an element exists at `index`, even if that element is a `None`.
    pub fn has_at(&mut self, index: usize) -> Result<bool> {
        self.consume(|source| terminal::has_at(source, index))
    }

    /// Element at `index`.
    pub fn get(&mut self, index: usize) -> Result<Option<T>> {
        self.consume(|source| terminal::element_at(source, index))
    }

    /// Smallest element under `compare`; the first of ties wins.
    pub fn min_by<F>(&mut self, compare: F) -> Result<Option<T>>
    where
        F: FnMut(&T, &T) -> Ordering,
    {
        self.consume(|source| terminal::min_by(source, compare))
    }

    /// Largest element under `compare`; the first of ties wins.
    pub fn max_by<F>(&mut self, compare: F) -> Result<Option<T>>
    where
        F: FnMut(&T, &T) -> Ordering,
    {
        self.consume(|source| terminal::max_by(source, compare))
    }

    /// Element with the smallest derived key.
    pub fn min_by_key<K: Ord, F>(&mut self, mut key: F) -> Result<Option<T>>
    where
        F: FnMut(&T) -> K,
    {
        self.min_by(|a, b| key(a).cmp(&key(b)))
    }

    /// Element with the largest derived key.
    pub fn max_by_key<K: Ord, F>(&mut self, mut key: F) -> Result<Option<T>>
    where
        F: FnMut(&T) -> K,
    {
        self.max_by(|a, b| key(a).cmp(&key(b)))
    }

    /// Smallest element by natural order.
    pub fn min(&mut self) -> Result<Option<T>>
    where
        T: Ord,
    {
        self.min_by(T::cmp)
    }

    /// Largest element by natural order.
    pub fn max(&mut self) -> Result<Option<T>>
    where
        T: Ord,
    {
        self.max_by(T::cmp)
    }

    /// Both extremes under `compare` in a single traversal.
    pub fn min_max_by<F>(&mut self, compare: F) -> Result<Option<(T, T)>>
    where
        T: Clone,
        F: FnMut(&T, &T) -> Ordering,
    {
        self.consume(|source| terminal::min_max_by(source, compare))
    }

    /// Both extremes by a derived key in a single traversal.
    pub fn min_max_by_key<K: Ord, F>(&mut self, mut key: F) -> Result<Option<(T, T)>>
    where
        T: Clone,
        F: FnMut(&T) -> K,
    {
        self.min_max_by(|a, b| key(a).cmp(&key(b)))
    }

    /// Count and extremes under `compare`.
    pub fn statistics_by<F>(&mut self, compare: F) -> Result<Statistics<T>>
    where
        T: Clone,
        F: FnMut(&T, &T) -> Ordering,
    {
        self.consume(|source| terminal::statistics_by(source, compare))
    }

    /// Partition by key; keys in first-seen order, members in traversal order.
    pub fn group_by<K, F>(&mut self, key: F) -> Result<IndexMap<K, Vec<T>>>
    where
        K: Hash + Eq,
        F: FnMut(&T) -> K,
    {
        self.consume(|source| terminal::group_by(source, key))
    }

    /// Partition by key and reduce each group's sub-sequence with `reduce`.
    pub fn group_by_with<K, R, F, G>(&mut self, key: F, mut reduce: G) -> Result<IndexMap<K, R>>
    where
        K: Hash + Eq,
        F: FnMut(&T) -> K,
        G: FnMut(ActiveSequence<T>) -> Result<R>,
    {
        self.group_by(key)?
            .into_iter()
            .map(|(key, members)| -> Result<(K, R)> {
                Ok((key, reduce(ActiveSequence::from_vec(members))?))
            })
            .collect()
    }

    /// Partition by key, folding each group through `collector`.
    pub fn group_by_aggregate<K, F, C>(
        &mut self,
        key: F,
        collector: &C,
    ) -> Result<IndexMap<K, C::Output>>
    where
        K: Hash + Eq,
        F: FnMut(&T) -> K,
        C: Collector<T> + ?Sized,
    {
        self.consume(|source| terminal::group_by_collecting(source, key, collector))
    }

    /// Partition by key, running a fresh processor per group.
    pub fn group_by_processor<K, F, G, P>(
        &mut self,
        key: F,
        factory: G,
    ) -> Result<IndexMap<K, P::Output>>
    where
        K: Hash + Eq,
        F: FnMut(&T) -> K,
        G: FnMut() -> P,
        P: ElementProcessor<T>,
    {
        self.consume(|source| terminal::group_by_processing(source, key, factory))
    }

    /// Split the traversal into percentile buckets. Eager; requires a finite source.
    pub fn segment_by_percentiles(&mut self, percentiles: &[f64]) -> Result<Vec<Vec<T>>> {
        let items = self.to_vec()?;
        terminal::segment_by_percentiles(items, percentiles)
    }

    /// Reduce through a collector such as an [`Aggregator`](crate::Aggregator).
    pub fn aggregate<C>(&mut self, collector: &C) -> Result<C::Output>
    where
        C: Collector<T> + ?Sized,
    {
        self.consume(|source| terminal::collect_with(source, collector))
    }

    /// Fold into a mutable container built by `supplier`.
    pub fn collect_into<A, F, G>(&mut self, supplier: F, accumulator: G) -> Result<A>
    where
        F: FnOnce() -> A,
        G: FnMut(&mut A, T),
    {
        self.consume(|source| terminal::collect_into(source, supplier, accumulator))
    }

    /// Drive an index-aware element processor.
    pub fn process<P>(&mut self, processor: P) -> Result<P::Output>
    where
        P: ElementProcessor<T>,
    {
        self.consume(|source| terminal::run_processor(source, processor))
    }

    /// Count, sum and extremes of an `i32` extracted from each element.
    pub fn summarize_int<F>(&mut self, extract: F) -> Result<IntSummary>
    where
        F: FnMut(&T) -> i32,
    {
        self.process(IntSummary::new().extracting(extract))
    }

    /// Count, sum and extremes of an `i64` extracted from each element.
    pub fn summarize_long<F>(&mut self, extract: F) -> Result<LongSummary>
    where
        F: FnMut(&T) -> i64,
    {
        self.process(LongSummary::new().extracting(extract))
    }

    /// Count, sum and extremes of an `f64` extracted from each element.
    pub fn summarize_double<F>(&mut self, extract: F) -> Result<DoubleSummary>
    where
        F: FnMut(&T) -> f64,
    {
        self.process(DoubleSummary::new().extracting(extract))
    }

    /// Same length and pairwise equal to `other`. Consumes both.
    pub fn sequence_eq<U: 'static>(&mut self, other: &mut ActiveSequence<U>) -> Result<bool>
    where
        T: PartialEq<U>,
    {
        let right = other.source.take().ok_or(SequenceError::AlreadyConsumed)?;
        self.consume(|left| terminal::sequences_equal(left, right))
    }

    /// Polynomial hash of the traversal.
    pub fn sequence_hash(&mut self) -> Result<i32>
    where
        T: SeqHash,
    {
        self.consume(|source| terminal::sequence_hash(source))
    }

    /// `[a, b, c]` rendering of the traversal.
    pub fn render(&mut self) -> Result<String>
    where
        T: fmt::Display,
    {
        self.consume(|source| terminal::render(source))
    }

    /// Host iterator over the remaining elements.
    ///
    /// Consumes the sequence; on an already consumed sequence the iterator
    /// yields a single [`SequenceError::AlreadyConsumed`].
    pub fn iter(&mut self) -> SequenceIter<T> {
        let source: BoxedSource<T> = match self.source.take() {
            Some(source) => source,
            None => Box::new(Failed::new(SequenceError::AlreadyConsumed)),
        };
        SequenceIter {
            inner: Cursor::new(source).into_results(),
        }
    }
}

impl<T: 'static> ActiveSequence<Option<T>> {
    /// Drop `None` elements.
    pub fn non_null(self) -> ActiveSequence<T> {
        self.filter_map(|element| element)
    }
}

impl ActiveSequence<Box<dyn Any>> {
    /// Keep the elements of concrete type `U`.
    pub fn of_type<U: 'static>(self) -> ActiveSequence<U> {
        self.filter_map(|element| element.downcast::<U>().ok().map(|boxed| *boxed))
    }

    /// Observe only the elements of concrete type `U`, passing everything through.
    pub fn peek_type<U: 'static, F>(self, mut f: F) -> Self
    where
        F: FnMut(&U) + 'static,
    {
        self.peek(move |element| {
            if let Some(value) = element.downcast_ref::<U>() {
                f(value);
            }
        })
    }
}

impl<T: 'static> From<Vec<T>> for ActiveSequence<T> {
    fn from(items: Vec<T>) -> Self {
        Self::from_vec(items)
    }
}

impl<T: 'static> IntoIterator for ActiveSequence<T> {
    type Item = Result<T>;
    type IntoIter = SequenceIter<T>;

    fn into_iter(mut self) -> SequenceIter<T> {
        self.iter()
    }
}

impl<T: 'static> fmt::Debug for ActiveSequence<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActiveSequence")
            .field("consumed", &self.is_consumed())
            .finish()
    }
}

/// Host iterator over a consumed [`ActiveSequence`]; stops after the first error.
pub struct SequenceIter<T: 'static> {
    inner: Results<BoxedSource<T>>,
}

impl<T: 'static> Iterator for SequenceIter<T> {
    type Item = Result<T>;

    fn next(&mut self) -> Option<Result<T>> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<T: 'static> fmt::Debug for SequenceIter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SequenceIter").finish_non_exhaustive()
    }
}
