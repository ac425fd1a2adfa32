//! Reusable sequences defined by recipes
//!
//! A [`LazySequence`] never holds a source. It holds a [`Recipe`] that opens a
//! fresh [`ActiveSequence`] on every access, so each terminal call re-runs
//! the whole pipeline from its origin. Transformations build a derived
//! recipe referring to the upstream recipe plus the transformation to apply;
//! nothing runs at definition time.
//!
//! Re-traversal is deterministic for stable origins (vectors, shared
//! arrays, pure factories). Generators over external state and queues are
//! re-opened too, but what they yield the second time is up to them.

use std::any::Any;
use std::cmp::Ordering;
use std::collections::HashSet;
use std::fmt;
use std::hash::Hash;
use std::sync::Arc;

use indexmap::IndexMap;

use super::active::{ActiveSequence, SequenceIter};
use super::AlignmentOption;
use crate::cursor::{ArraySource, Pull, QueueSource};
use crate::primitive::{DoubleSequence, IntSequence, LongSequence};
use crate::terminal::{Collector, ElementProcessor, SeqHash, Statistics};
use crate::{Result, SequenceError};

/// Factory for fresh single-use traversals.
pub trait Recipe<T: 'static> {
    /// Open a new traversal from the origin.
    fn open(&self) -> ActiveSequence<T>;
}

struct FnRecipe<F>(F);

impl<T, F> Recipe<T> for FnRecipe<F>
where
    T: 'static,
    F: Fn() -> ActiveSequence<T>,
{
    fn open(&self) -> ActiveSequence<T> {
        (self.0)()
    }
}

type Transform<S, T> = Arc<dyn Fn(ActiveSequence<S>) -> ActiveSequence<T>>;

/// Upstream recipe plus the transformation applied to each traversal it opens.
struct Derived<S: 'static, T: 'static> {
    upstream: LazySequence<S>,
    transform: Transform<S, T>,
}

impl<S: 'static, T: 'static> Recipe<T> for Derived<S, T> {
    fn open(&self) -> ActiveSequence<T> {
        (self.transform)(self.upstream.open())
    }
}

/// Restartable sequence; every terminal call traverses from the origin.
pub struct LazySequence<T: 'static> {
    recipe: Arc<dyn Recipe<T>>,
}

impl<T: 'static> Clone for LazySequence<T> {
    fn clone(&self) -> Self {
        Self {
            recipe: Arc::clone(&self.recipe),
        }
    }
}

impl<T: 'static> LazySequence<T> {
    /// Sequence backed by a custom recipe.
    pub fn from_recipe<R>(recipe: R) -> Self
    where
        R: Recipe<T> + 'static,
    {
        Self {
            recipe: Arc::new(recipe),
        }
    }

    /// Sequence whose traversals come from `factory`.
    pub fn from_fn<F>(factory: F) -> Self
    where
        F: Fn() -> ActiveSequence<T> + 'static,
    {
        Self::from_recipe(FnRecipe(factory))
    }

    /// Sequence over a vector, shared between traversals.
    pub fn from_vec(items: Vec<T>) -> Self
    where
        T: Clone,
    {
        Self::from_array(items)
    }

    /// Sequence over a shared array.
    pub fn from_array(data: impl Into<Arc<[T]>>) -> Self
    where
        T: Clone,
    {
        let data: Arc<[T]> = data.into();
        Self::from_fn(move || ActiveSequence::from_array(Arc::clone(&data)))
    }

    /// Sequence over `[start, start + length)` of a shared array. Bounds are
    /// checked here, once.
    pub fn from_slice(data: impl Into<Arc<[T]>>, start: usize, length: usize) -> Result<Self>
    where
        T: Clone,
    {
        let data: Arc<[T]> = data.into();
        ArraySource::slice(Arc::clone(&data), start, length)?;
        Ok(Self::from_fn(move || {
            match ArraySource::slice(Arc::clone(&data), start, length) {
                Ok(source) => ActiveSequence::from_source(source),
                Err(err) => ActiveSequence::failed(err),
            }
        }))
    }

    /// Sequence whose traversals each run a generator built by `factory`.
    pub fn generate<F, G>(factory: F) -> Self
    where
        F: Fn() -> G + 'static,
        G: FnMut() -> Result<Pull<T>> + 'static,
    {
        Self::from_fn(move || ActiveSequence::from_generator(factory()))
    }

    /// Sequence whose traversals each walk a host iterable built by `factory`.
    pub fn from_host_fn<F, I>(factory: F) -> Self
    where
        F: Fn() -> I + 'static,
        I: IntoIterator<Item = T>,
        I::IntoIter: 'static,
    {
        Self::from_fn(move || ActiveSequence::from_host(factory()))
    }

    /// Sequence reading from a blocking queue.
    ///
    /// All traversals share the queue: the first one to reach the sentinel
    /// ends, and later traversals wait for a producer that may never come.
    pub fn from_queue(source: QueueSource<T>) -> Self
    where
        T: Clone + PartialEq,
    {
        Self::from_fn(move || ActiveSequence::from_queue(source.clone()))
    }

    /// Sequence opening `upstream` and applying `transform` on every access.
    pub fn derive_from<S, F>(upstream: &LazySequence<S>, transform: F) -> Self
    where
        S: 'static,
        F: Fn(ActiveSequence<S>) -> ActiveSequence<T> + 'static,
    {
        Self::from_recipe(Derived {
            upstream: upstream.clone(),
            transform: Arc::new(transform),
        })
    }

    /// Open a fresh single-use traversal.
    pub fn open(&self) -> ActiveSequence<T> {
        tracing::trace!("opening lazy sequence");
        self.recipe.open()
    }

    fn derive<U, F>(&self, transform: F) -> LazySequence<U>
    where
        U: 'static,
        F: Fn(ActiveSequence<T>) -> ActiveSequence<U> + 'static,
    {
        LazySequence::derive_from(self, transform)
    }

    // ---- transformations ----

    /// Keep elements matching `predicate`.
    pub fn filter<P>(&self, predicate: P) -> Self
    where
        P: Fn(&T) -> bool + 'static,
    {
        let predicate = Arc::new(predicate);
        self.derive(move |seq| {
            let predicate = Arc::clone(&predicate);
            seq.filter(move |element| predicate(element))
        })
    }

    /// Keep elements for which `predicate(index, element)` holds.
    pub fn filter_indexed<P>(&self, predicate: P) -> Self
    where
        P: Fn(usize, &T) -> bool + 'static,
    {
        let predicate = Arc::new(predicate);
        self.derive(move |seq| {
            let predicate = Arc::clone(&predicate);
            seq.filter_indexed(move |index, element| predicate(index, element))
        })
    }

    /// Drop every element contained in `items`.
    pub fn exclude<I>(&self, items: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Hash + Eq,
    {
        let excluded: Arc<HashSet<T>> = Arc::new(items.into_iter().collect());
        self.filter(move |element| !excluded.contains(element))
    }

    /// Map and filter in one step.
    pub fn filter_map<U, F>(&self, f: F) -> LazySequence<U>
    where
        U: 'static,
        F: Fn(T) -> Option<U> + 'static,
    {
        let f = Arc::new(f);
        self.derive(move |seq| {
            let f = Arc::clone(&f);
            seq.filter_map(move |element| f(element))
        })
    }

    /// Transform every element.
    pub fn map<U, F>(&self, f: F) -> LazySequence<U>
    where
        U: 'static,
        F: Fn(T) -> U + 'static,
    {
        let f = Arc::new(f);
        self.derive(move |seq| {
            let f = Arc::clone(&f);
            seq.map(move |element| f(element))
        })
    }

    /// Apply `mapper` where `condition` holds and `fallback` elsewhere.
    pub fn map_if<U, P, F, G>(&self, condition: P, mapper: F, fallback: G) -> LazySequence<U>
    where
        U: 'static,
        P: Fn(&T) -> bool + 'static,
        F: Fn(T) -> U + 'static,
        G: Fn(T) -> U + 'static,
    {
        let condition = Arc::new(condition);
        let mapper = Arc::new(mapper);
        let fallback = Arc::new(fallback);
        self.derive(move |seq| {
            let condition = Arc::clone(&condition);
            let mapper = Arc::clone(&mapper);
            let fallback = Arc::clone(&fallback);
            seq.map_if(
                move |element| condition(element),
                move |element| mapper(element),
                move |element| fallback(element),
            )
        })
    }

    /// Attach the traversal index to each element.
    pub fn with_index(&self) -> LazySequence<(usize, T)> {
        self.derive(ActiveSequence::with_index)
    }

    /// Map each element together with its predecessor.
    pub fn map_with_previous<U, F>(&self, f: F) -> LazySequence<U>
    where
        T: Clone,
        U: 'static,
        F: Fn(Option<&T>, &T) -> U + 'static,
    {
        let f = Arc::new(f);
        self.derive(move |seq| {
            let f = Arc::clone(&f);
            seq.map_with_previous(move |previous, current| f(previous, current))
        })
    }

    /// Observe each element as it passes.
    pub fn peek<F>(&self, f: F) -> Self
    where
        F: Fn(&T) + 'static,
    {
        let f = Arc::new(f);
        self.derive(move |seq| {
            let f = Arc::clone(&f);
            seq.peek(move |element| f(element))
        })
    }

    /// Replace each element by the elements of a host iterable.
    pub fn flat_map<U, I, F>(&self, f: F) -> LazySequence<U>
    where
        U: 'static,
        I: IntoIterator<Item = U> + 'static,
        I::IntoIter: 'static,
        F: Fn(T) -> I + 'static,
    {
        let f = Arc::new(f);
        self.derive(move |seq| {
            let f = Arc::clone(&f);
            seq.flat_map(move |element| f(element))
        })
    }

    /// Drop the first `n` elements.
    pub fn skip(&self, n: usize) -> Self {
        self.derive(move |seq| seq.skip(n))
    }

    /// Keep at most `n` elements.
    pub fn limit(&self, n: usize) -> Self {
        self.derive(move |seq| seq.limit(n))
    }

    /// Keep elements while `predicate` holds.
    pub fn take_while<P>(&self, predicate: P) -> Self
    where
        P: Fn(&T) -> bool + 'static,
    {
        let predicate = Arc::new(predicate);
        self.derive(move |seq| {
            let predicate = Arc::clone(&predicate);
            seq.take_while(move |element| predicate(element))
        })
    }

    /// Drop elements while `predicate` holds.
    pub fn skip_while<P>(&self, predicate: P) -> Self
    where
        P: Fn(&T) -> bool + 'static,
    {
        let predicate = Arc::new(predicate);
        self.derive(move |seq| {
            let predicate = Arc::clone(&predicate);
            seq.skip_while(move |element| predicate(element))
        })
    }

    /// Continue with `other` once this sequence ends.
    pub fn chain(&self, other: &LazySequence<T>) -> Self {
        let other = other.clone();
        self.derive(move |seq| seq.chain(other.open()))
    }

    /// Drop repeated elements; the first occurrence wins.
    pub fn distinct(&self) -> Self
    where
        T: Hash + Eq + Clone,
    {
        self.derive(ActiveSequence::distinct)
    }

    /// Consecutive runs of `size` elements.
    pub fn chunks(&self, size: usize) -> Result<LazySequence<Vec<T>>> {
        if size == 0 {
            return Err(SequenceError::InvalidConfiguration(
                "chunk size must be > 0".to_string(),
            ));
        }
        Ok(self.derive(move |seq| match seq.chunks(size) {
            Ok(chunks) => chunks,
            Err(err) => ActiveSequence::failed(err),
        }))
    }

    /// Stable sort by the natural order.
    pub fn sorted(&self) -> Self
    where
        T: Ord,
    {
        self.derive(ActiveSequence::sorted)
    }

    /// Stable sort by a comparator.
    pub fn sorted_by<C>(&self, compare: C) -> Self
    where
        C: Fn(&T, &T) -> Ordering + 'static,
    {
        let compare = Arc::new(compare);
        self.derive(move |seq| {
            let compare = Arc::clone(&compare);
            seq.sorted_by(move |a, b| compare(a, b))
        })
    }

    /// Stable sort by a derived key.
    pub fn sorted_by_key<K, F>(&self, key: F) -> Self
    where
        K: Ord,
        F: Fn(&T) -> K + 'static,
    {
        self.sorted_by(move |a, b| key(a).cmp(&key(b)))
    }

    /// Stable sort by a derived key under a custom key ordering.
    pub fn sorted_by_key_with<K, F, C>(&self, key: F, compare: C) -> Self
    where
        F: Fn(&T) -> K + 'static,
        C: Fn(&K, &K) -> Ordering + 'static,
    {
        self.sorted_by(move |a, b| compare(&key(a), &key(b)))
    }

    /// Open a traversal into the `i32` lane.
    pub fn map_to_int<F>(&self, extract: F) -> IntSequence
    where
        F: FnMut(T) -> i32 + 'static,
    {
        self.open().map_to_int(extract)
    }

    /// Open a traversal into the `i64` lane.
    pub fn map_to_long<F>(&self, extract: F) -> LongSequence
    where
        F: FnMut(T) -> i64 + 'static,
    {
        self.open().map_to_long(extract)
    }

    /// Open a traversal into the `f64` lane.
    pub fn map_to_double<F>(&self, extract: F) -> DoubleSequence
    where
        F: FnMut(T) -> f64 + 'static,
    {
        self.open().map_to_double(extract)
    }

    /// Pair positions with `other` under the given alignment.
    pub fn zip<U: 'static>(
        &self,
        other: &LazySequence<U>,
        alignment: AlignmentOption,
    ) -> LazySequence<(Option<T>, Option<U>)> {
        let other = other.clone();
        self.derive(move |seq| seq.zip(other.open(), alignment))
    }

    /// Pair positions until the shorter side ends.
    pub fn zip_exact<U: 'static>(&self, other: &LazySequence<U>) -> LazySequence<(T, U)> {
        let other = other.clone();
        self.derive(move |seq| seq.zip_exact(other.open()))
    }

    /// Combine positions with `other` through `f`.
    pub fn zip_with<U, R, F>(
        &self,
        other: &LazySequence<U>,
        alignment: AlignmentOption,
        f: F,
    ) -> LazySequence<R>
    where
        U: 'static,
        R: 'static,
        F: Fn(Option<T>, Option<U>) -> R + 'static,
    {
        let other = other.clone();
        let f = Arc::new(f);
        self.derive(move |seq| {
            let f = Arc::clone(&f);
            seq.zip_with(other.open(), alignment, move |a, b| f(a, b))
        })
    }

    // ---- terminals ----

    /// Number of elements.
    pub fn count(&self) -> Result<usize> {
        self.open().count()
    }

    /// Every element, in traversal order.
    pub fn to_vec(&self) -> Result<Vec<T>> {
        self.open().to_vec()
    }

    /// Collect into any host collection.
    pub fn collect<C: FromIterator<T>>(&self) -> Result<C> {
        self.open().collect()
    }

    /// Run `f` on every element.
    pub fn for_each<F: FnMut(T)>(&self, f: F) -> Result<()> {
        self.open().for_each(f)
    }

    /// Left fold from `init`.
    pub fn fold<A, F: FnMut(A, T) -> A>(&self, init: A, f: F) -> Result<A> {
        self.open().fold(init, f)
    }

    /// Fold seeded with the first element.
    pub fn reduce<F: FnMut(T, T) -> T>(&self, f: F) -> Result<Option<T>> {
        self.open().reduce(f)
    }

    /// First element.
    pub fn first(&self) -> Result<Option<T>> {
        self.open().first()
    }

    /// Last element.
    pub fn last(&self) -> Result<Option<T>> {
        self.open().last()
    }

    /// First element matching `predicate`.
    pub fn find_first<P: FnMut(&T) -> bool>(&self, predicate: P) -> Result<Option<T>> {
        self.open().find_first(predicate)
    }

    /// Whether any element matches.
    pub fn any_match<P: FnMut(&T) -> bool>(&self, predicate: P) -> Result<bool> {
        self.open().any_match(predicate)
    }

    /// Whether every element matches.
    pub fn all_match<P: FnMut(&T) -> bool>(&self, predicate: P) -> Result<bool> {
        self.open().all_match(predicate)
    }

    /// Whether no element matches.
    pub fn none_match<P: FnMut(&T) -> bool>(&self, predicate: P) -> Result<bool> {
        self.open().none_match(predicate)
    }

    /// Whether an element exists at `index`.
    pub fn has_at(&self, index: usize) -> Result<bool> {
        self.open().has_at(index)
    }

    /// Element at `index`.
    pub fn get(&self, index: usize) -> Result<Option<T>> {
        self.open().get(index)
    }

    /// Smallest element under `compare`; the first of ties wins.
    pub fn min_by<F: FnMut(&T, &T) -> Ordering>(&self, compare: F) -> Result<Option<T>> {
        self.open().min_by(compare)
    }

    /// Largest element under `compare`; the first of ties wins.
    pub fn max_by<F: FnMut(&T, &T) -> Ordering>(&self, compare: F) -> Result<Option<T>> {
        self.open().max_by(compare)
    }

    /// Element with the smallest derived key.
    pub fn min_by_key<K: Ord, F: FnMut(&T) -> K>(&self, key: F) -> Result<Option<T>> {
        self.open().min_by_key(key)
    }

    /// Element with the largest derived key.
    pub fn max_by_key<K: Ord, F: FnMut(&T) -> K>(&self, key: F) -> Result<Option<T>> {
        self.open().max_by_key(key)
    }

    /// Smallest element by natural order.
    pub fn min(&self) -> Result<Option<T>>
    where
        T: Ord,
    {
        self.open().min()
    }

    /// Largest element by natural order.
    pub fn max(&self) -> Result<Option<T>>
    where
        T: Ord,
    {
        self.open().max()
    }

    /// Both extremes in a single traversal.
    pub fn min_max_by<F>(&self, compare: F) -> Result<Option<(T, T)>>
    where
        T: Clone,
        F: FnMut(&T, &T) -> Ordering,
    {
        self.open().min_max_by(compare)
    }

    /// Elements with the smallest and largest derived key in a single traversal.
    pub fn min_max_by_key<K: Ord, F>(&self, key: F) -> Result<Option<(T, T)>>
    where
        T: Clone,
        F: FnMut(&T) -> K,
    {
        self.open().min_max_by_key(key)
    }

    /// Count and extremes under `compare`.
    pub fn statistics_by<F>(&self, compare: F) -> Result<Statistics<T>>
    where
        T: Clone,
        F: FnMut(&T, &T) -> Ordering,
    {
        self.open().statistics_by(compare)
    }

    /// Partition by key.
    pub fn group_by<K, F>(&self, key: F) -> Result<IndexMap<K, Vec<T>>>
    where
        K: Hash + Eq,
        F: FnMut(&T) -> K,
    {
        self.open().group_by(key)
    }

    /// Partition by key and reduce each group's sub-sequence.
    pub fn group_by_with<K, R, F, G>(&self, key: F, reduce: G) -> Result<IndexMap<K, R>>
    where
        K: Hash + Eq,
        F: FnMut(&T) -> K,
        G: FnMut(ActiveSequence<T>) -> Result<R>,
    {
        self.open().group_by_with(key, reduce)
    }

    /// Partition by key, folding each group through `collector`.
    pub fn group_by_aggregate<K, F, C>(
        &self,
        key: F,
        collector: &C,
    ) -> Result<IndexMap<K, C::Output>>
    where
        K: Hash + Eq,
        F: FnMut(&T) -> K,
        C: Collector<T> + ?Sized,
    {
        self.open().group_by_aggregate(key, collector)
    }

    /// Partition by key, running a fresh processor per group.
    pub fn group_by_processor<K, F, G, P>(
        &self,
        key: F,
        factory: G,
    ) -> Result<IndexMap<K, P::Output>>
    where
        K: Hash + Eq,
        F: FnMut(&T) -> K,
        G: FnMut() -> P,
        P: ElementProcessor<T>,
    {
        self.open().group_by_processor(key, factory)
    }

    /// Split a traversal into percentile buckets.
    pub fn segment_by_percentiles(&self, percentiles: &[f64]) -> Result<Vec<Vec<T>>> {
        self.open().segment_by_percentiles(percentiles)
    }

    /// Reduce through a collector.
    pub fn aggregate<C: Collector<T> + ?Sized>(&self, collector: &C) -> Result<C::Output> {
        self.open().aggregate(collector)
    }

    /// Fold into a mutable container built by `supplier`.
    pub fn collect_into<A, F, G>(&self, supplier: F, accumulator: G) -> Result<A>
    where
        F: FnOnce() -> A,
        G: FnMut(&mut A, T),
    {
        self.open().collect_into(supplier, accumulator)
    }

    /// Drive an index-aware element processor.
    pub fn process<P: ElementProcessor<T>>(&self, processor: P) -> Result<P::Output> {
        self.open().process(processor)
    }

    /// Same length and pairwise equal to `other`.
    pub fn sequence_eq<U: 'static>(&self, other: &LazySequence<U>) -> Result<bool>
    where
        T: PartialEq<U>,
    {
        self.open().sequence_eq(&mut other.open())
    }

    /// Polynomial hash of a traversal.
    pub fn sequence_hash(&self) -> Result<i32>
    where
        T: SeqHash,
    {
        self.open().sequence_hash()
    }

    /// `[a, b, c]` rendering of a traversal.
    pub fn render(&self) -> Result<String>
    where
        T: fmt::Display,
    {
        self.open().render()
    }

    /// Host iterator over a fresh traversal.
    pub fn iter(&self) -> SequenceIter<T> {
        self.open().iter()
    }
}

impl<T: 'static> LazySequence<Option<T>> {
    /// Drop `None` elements.
    pub fn non_null(&self) -> LazySequence<T> {
        self.derive(ActiveSequence::non_null)
    }
}

impl LazySequence<Box<dyn Any>> {
    /// Keep only elements of concrete type `U`, unboxed.
    pub fn of_type<U: 'static>(&self) -> LazySequence<U> {
        self.derive(ActiveSequence::of_type::<U>)
    }

    /// Observe only the elements of concrete type `U`, passing everything through.
    pub fn peek_type<U: 'static, F>(&self, f: F) -> Self
    where
        F: Fn(&U) + 'static,
    {
        let f = Arc::new(f);
        self.derive(move |seq| {
            let f = Arc::clone(&f);
            seq.peek_type(move |value: &U| f(value))
        })
    }
}

impl<T: 'static> From<Vec<T>> for LazySequence<T>
where
    T: Clone,
{
    fn from(items: Vec<T>) -> Self {
        Self::from_vec(items)
    }
}

/// Elementwise equality of fresh traversals; a failing traversal compares unequal.
impl<T, U> PartialEq<LazySequence<U>> for LazySequence<T>
where
    T: PartialEq<U> + 'static,
    U: 'static,
{
    fn eq(&self, other: &LazySequence<U>) -> bool {
        self.sequence_eq(other).unwrap_or(false)
    }
}

/// Renders a fresh traversal as `[a, b, c]`, or as the error message in angle
/// brackets (`<sequence already consumed>`) if it fails.
impl<T: fmt::Display + 'static> fmt::Display for LazySequence<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.render() {
            Ok(rendered) => f.write_str(&rendered),
            Err(err) => write!(f, "<{err}>"),
        }
    }
}

impl<T: 'static> fmt::Debug for LazySequence<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LazySequence").finish_non_exhaustive()
    }
}
