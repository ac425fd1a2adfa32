//! Pipeline stages
//!
//! Each stage is a [`Source`] wrapping its upstream source. Nothing is pulled
//! from upstream until the stage itself is pulled, with one exception:
//! [`Sorted`] drains its whole upstream on the first pull.

use std::cmp::Ordering;
use std::collections::HashSet;
use std::hash::Hash;

use super::AlignmentOption;
use crate::cursor::{Pull, Source};
use crate::{Result, SequenceError};

/// Keeps elements matching a predicate.
pub struct Filter<S, P> {
    upstream: S,
    predicate: P,
}

impl<S, P> Filter<S, P> {
    pub(crate) fn new(upstream: S, predicate: P) -> Self {
        Self {
            upstream,
            predicate,
        }
    }
}

impl<S, P> Source for Filter<S, P>
where
    S: Source,
    P: FnMut(&S::Item) -> bool,
{
    type Item = S::Item;

    fn pull(&mut self) -> Result<Pull<S::Item>> {
        loop {
            match self.upstream.pull()? {
                Pull::Value(value) if (self.predicate)(&value) => return Ok(Pull::Value(value)),
                Pull::Value(_) => continue,
                Pull::End => return Ok(Pull::End),
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, self.upstream.size_hint().1)
    }

    fn close(&mut self) {
        self.upstream.close();
    }
}

/// Keeps elements matching a predicate that also sees the upstream position.
pub struct FilterIndexed<S, P> {
    upstream: S,
    predicate: P,
    index: usize,
}

impl<S, P> FilterIndexed<S, P> {
    pub(crate) fn new(upstream: S, predicate: P) -> Self {
        Self {
            upstream,
            predicate,
            index: 0,
        }
    }
}

impl<S, P> Source for FilterIndexed<S, P>
where
    S: Source,
    P: FnMut(usize, &S::Item) -> bool,
{
    type Item = S::Item;

    fn pull(&mut self) -> Result<Pull<S::Item>> {
        while let Pull::Value(value) = self.upstream.pull()? {
            let index = self.index;
            self.index += 1;
            if (self.predicate)(index, &value) {
                return Ok(Pull::Value(value));
            }
        }
        Ok(Pull::End)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, self.upstream.size_hint().1)
    }

    fn close(&mut self) {
        self.upstream.close();
    }
}

/// Maps and filters in one step; `None` drops the element.
pub struct FilterMap<S, F> {
    upstream: S,
    f: F,
}

impl<S, F> FilterMap<S, F> {
    pub(crate) fn new(upstream: S, f: F) -> Self {
        Self { upstream, f }
    }
}

impl<S, F, U> Source for FilterMap<S, F>
where
    S: Source,
    F: FnMut(S::Item) -> Option<U>,
{
    type Item = U;

    fn pull(&mut self) -> Result<Pull<U>> {
        while let Pull::Value(value) = self.upstream.pull()? {
            if let Some(mapped) = (self.f)(value) {
                return Ok(Pull::Value(mapped));
            }
        }
        Ok(Pull::End)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, self.upstream.size_hint().1)
    }

    fn close(&mut self) {
        self.upstream.close();
    }
}

/// Applies a function to every element.
pub struct Map<S, F> {
    upstream: S,
    f: F,
}

impl<S, F> Map<S, F> {
    pub(crate) fn new(upstream: S, f: F) -> Self {
        Self { upstream, f }
    }
}

impl<S, F, U> Source for Map<S, F>
where
    S: Source,
    F: FnMut(S::Item) -> U,
{
    type Item = U;

    fn pull(&mut self) -> Result<Pull<U>> {
        Ok(self.upstream.pull()?.map(&mut self.f))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.upstream.size_hint()
    }

    fn close(&mut self) {
        self.upstream.close();
    }
}

/// Maps each element with the mapper when the condition holds, otherwise with the fallback.
pub struct MapIf<S, P, F, G> {
    upstream: S,
    condition: P,
    mapper: F,
    fallback: G,
}

impl<S, P, F, G> MapIf<S, P, F, G> {
    pub(crate) fn new(upstream: S, condition: P, mapper: F, fallback: G) -> Self {
        Self {
            upstream,
            condition,
            mapper,
            fallback,
        }
    }
}

impl<S, P, F, G, U> Source for MapIf<S, P, F, G>
where
    S: Source,
    P: FnMut(&S::Item) -> bool,
    F: FnMut(S::Item) -> U,
    G: FnMut(S::Item) -> U,
{
    type Item = U;

    fn pull(&mut self) -> Result<Pull<U>> {
        Ok(match self.upstream.pull()? {
            Pull::Value(value) if (self.condition)(&value) => Pull::Value((self.mapper)(value)),
            Pull::Value(value) => Pull::Value((self.fallback)(value)),
            Pull::End => Pull::End,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.upstream.size_hint()
    }

    fn close(&mut self) {
        self.upstream.close();
    }
}

/// Attaches the zero-based position to every element.
pub struct WithIndex<S> {
    upstream: S,
    index: usize,
}

impl<S> WithIndex<S> {
    pub(crate) fn new(upstream: S) -> Self {
        Self { upstream, index: 0 }
    }
}

impl<S: Source> Source for WithIndex<S> {
    type Item = (usize, S::Item);

    fn pull(&mut self) -> Result<Pull<Self::Item>> {
        Ok(match self.upstream.pull()? {
            Pull::Value(value) => {
                let index = self.index;
                self.index += 1;
                Pull::Value((index, value))
            }
            Pull::End => Pull::End,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.upstream.size_hint()
    }

    fn close(&mut self) {
        self.upstream.close();
    }
}

/// Maps each element together with the element pulled before it.
pub struct MapWithPrevious<S: Source, F> {
    upstream: S,
    f: F,
    previous: Option<S::Item>,
}

impl<S: Source, F> MapWithPrevious<S, F> {
    pub(crate) fn new(upstream: S, f: F) -> Self {
        Self {
            upstream,
            f,
            previous: None,
        }
    }
}

impl<S, F, U> Source for MapWithPrevious<S, F>
where
    S: Source,
    S::Item: Clone,
    F: FnMut(Option<&S::Item>, &S::Item) -> U,
{
    type Item = U;

    fn pull(&mut self) -> Result<Pull<U>> {
        Ok(match self.upstream.pull()? {
            Pull::Value(current) => {
                let mapped = (self.f)(self.previous.as_ref(), &current);
                self.previous = Some(current);
                Pull::Value(mapped)
            }
            Pull::End => Pull::End,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.upstream.size_hint()
    }

    fn close(&mut self) {
        self.upstream.close();
    }
}

/// Runs a side effect on each element as it passes through.
pub struct Peek<S, F> {
    upstream: S,
    f: F,
}

impl<S, F> Peek<S, F> {
    pub(crate) fn new(upstream: S, f: F) -> Self {
        Self { upstream, f }
    }
}

impl<S, F> Source for Peek<S, F>
where
    S: Source,
    F: FnMut(&S::Item),
{
    type Item = S::Item;

    fn pull(&mut self) -> Result<Pull<S::Item>> {
        let pulled = self.upstream.pull()?;
        if let Pull::Value(value) = &pulled {
            (self.f)(value);
        }
        Ok(pulled)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.upstream.size_hint()
    }

    fn close(&mut self) {
        self.upstream.close();
    }
}

/// Discards the first `n` elements.
pub struct Skip<S> {
    upstream: S,
    remaining: usize,
}

impl<S> Skip<S> {
    pub(crate) fn new(upstream: S, n: usize) -> Self {
        Self {
            upstream,
            remaining: n,
        }
    }
}

impl<S: Source> Source for Skip<S> {
    type Item = S::Item;

    fn pull(&mut self) -> Result<Pull<S::Item>> {
        while self.remaining > 0 {
            self.remaining -= 1;
            if self.upstream.pull()?.is_end() {
                self.remaining = 0;
                return Ok(Pull::End);
            }
        }
        self.upstream.pull()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let (lower, upper) = self.upstream.size_hint();
        (
            lower.saturating_sub(self.remaining),
            upper.map(|u| u.saturating_sub(self.remaining)),
        )
    }

    fn close(&mut self) {
        self.upstream.close();
    }
}

/// Yields at most `n` elements, never pulling upstream past the limit.
pub struct Limit<S> {
    upstream: S,
    remaining: usize,
}

impl<S> Limit<S> {
    pub(crate) fn new(upstream: S, n: usize) -> Self {
        Self {
            upstream,
            remaining: n,
        }
    }
}

impl<S: Source> Source for Limit<S> {
    type Item = S::Item;

    fn pull(&mut self) -> Result<Pull<S::Item>> {
        if self.remaining == 0 {
            return Ok(Pull::End);
        }
        let pulled = self.upstream.pull()?;
        self.remaining = if pulled.is_end() { 0 } else { self.remaining - 1 };
        Ok(pulled)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let (lower, upper) = self.upstream.size_hint();
        (
            lower.min(self.remaining),
            Some(upper.map_or(self.remaining, |u| u.min(self.remaining))),
        )
    }

    fn close(&mut self) {
        self.upstream.close();
    }
}

/// Yields elements while the predicate holds, then stops for good.
pub struct TakeWhile<S, P> {
    upstream: S,
    predicate: P,
    done: bool,
}

impl<S, P> TakeWhile<S, P> {
    pub(crate) fn new(upstream: S, predicate: P) -> Self {
        Self {
            upstream,
            predicate,
            done: false,
        }
    }
}

impl<S, P> Source for TakeWhile<S, P>
where
    S: Source,
    P: FnMut(&S::Item) -> bool,
{
    type Item = S::Item;

    fn pull(&mut self) -> Result<Pull<S::Item>> {
        if self.done {
            return Ok(Pull::End);
        }
        match self.upstream.pull()? {
            Pull::Value(value) if (self.predicate)(&value) => Ok(Pull::Value(value)),
            _ => {
                self.done = true;
                Ok(Pull::End)
            }
        }
    }

    fn close(&mut self) {
        self.upstream.close();
    }
}

/// Discards elements while the predicate holds, then passes everything through.
pub struct SkipWhile<S, P> {
    upstream: S,
    predicate: P,
    skipping: bool,
}

impl<S, P> SkipWhile<S, P> {
    pub(crate) fn new(upstream: S, predicate: P) -> Self {
        Self {
            upstream,
            predicate,
            skipping: true,
        }
    }
}

impl<S, P> Source for SkipWhile<S, P>
where
    S: Source,
    P: FnMut(&S::Item) -> bool,
{
    type Item = S::Item;

    fn pull(&mut self) -> Result<Pull<S::Item>> {
        if !self.skipping {
            return self.upstream.pull();
        }
        while let Pull::Value(value) = self.upstream.pull()? {
            if !(self.predicate)(&value) {
                self.skipping = false;
                return Ok(Pull::Value(value));
            }
        }
        Ok(Pull::End)
    }

    fn close(&mut self) {
        self.upstream.close();
    }
}

/// Yields every element of the first source, then every element of the second.
pub struct Chain<A, B> {
    first: Option<A>,
    second: B,
}

impl<A, B> Chain<A, B> {
    pub(crate) fn new(first: A, second: B) -> Self {
        Self {
            first: Some(first),
            second,
        }
    }
}

impl<A, B> Source for Chain<A, B>
where
    A: Source,
    B: Source<Item = A::Item>,
{
    type Item = A::Item;

    fn pull(&mut self) -> Result<Pull<A::Item>> {
        if let Some(first) = self.first.as_mut() {
            if let Pull::Value(value) = first.pull()? {
                return Ok(Pull::Value(value));
            }
            first.close();
            self.first = None;
        }
        self.second.pull()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let (a_lo, a_hi) = self.first.as_ref().map_or((0, Some(0)), Source::size_hint);
        let (b_lo, b_hi) = self.second.size_hint();
        let upper = match (a_hi, b_hi) {
            (Some(a), Some(b)) => a.checked_add(b),
            _ => None,
        };
        (a_lo.saturating_add(b_lo), upper)
    }

    fn close(&mut self) {
        if let Some(first) = self.first.as_mut() {
            first.close();
        }
        self.second.close();
    }
}

/// Maps each element to a host iterable and flattens the results.
pub struct FlatMap<S, F, I: IntoIterator> {
    upstream: S,
    f: F,
    current: Option<I::IntoIter>,
}

impl<S, F, I: IntoIterator> FlatMap<S, F, I> {
    pub(crate) fn new(upstream: S, f: F) -> Self {
        Self {
            upstream,
            f,
            current: None,
        }
    }
}

impl<S, F, I> Source for FlatMap<S, F, I>
where
    S: Source,
    F: FnMut(S::Item) -> I,
    I: IntoIterator,
{
    type Item = I::Item;

    fn pull(&mut self) -> Result<Pull<I::Item>> {
        loop {
            if let Some(inner) = self.current.as_mut() {
                if let Some(value) = inner.next() {
                    return Ok(Pull::Value(value));
                }
                self.current = None;
            }
            match self.upstream.pull()? {
                Pull::Value(value) => self.current = Some((self.f)(value).into_iter()),
                Pull::End => return Ok(Pull::End),
            }
        }
    }

    fn close(&mut self) {
        self.upstream.close();
    }
}

/// Drops elements already seen; the first occurrence wins.
pub struct Distinct<S: Source> {
    upstream: S,
    seen: HashSet<S::Item>,
}

impl<S: Source> Distinct<S> {
    pub(crate) fn new(upstream: S) -> Self {
        Self {
            upstream,
            seen: HashSet::new(),
        }
    }
}

impl<S> Source for Distinct<S>
where
    S: Source,
    S::Item: Hash + Eq + Clone,
{
    type Item = S::Item;

    fn pull(&mut self) -> Result<Pull<S::Item>> {
        while let Pull::Value(value) = self.upstream.pull()? {
            if self.seen.insert(value.clone()) {
                return Ok(Pull::Value(value));
            }
        }
        Ok(Pull::End)
    }

    fn close(&mut self) {
        self.upstream.close();
    }
}

/// Groups consecutive elements into vectors of `size`; the last may be shorter.
pub struct Chunks<S> {
    upstream: S,
    size: usize,
    done: bool,
}

impl<S> Chunks<S> {
    pub(crate) fn new(upstream: S, size: usize) -> Result<Self> {
        if size == 0 {
            return Err(SequenceError::InvalidConfiguration(
                "chunk size must be > 0".to_string(),
            ));
        }
        Ok(Self {
            upstream,
            size,
            done: false,
        })
    }
}

impl<S: Source> Source for Chunks<S> {
    type Item = Vec<S::Item>;

    fn pull(&mut self) -> Result<Pull<Self::Item>> {
        if self.done {
            return Ok(Pull::End);
        }
        let hint = self.upstream.size_hint().0.max(1);
        let mut chunk = Vec::with_capacity(self.size.min(hint));
        while chunk.len() < self.size {
            match self.upstream.pull()? {
                Pull::Value(value) => chunk.push(value),
                Pull::End => {
                    self.done = true;
                    break;
                }
            }
        }
        Ok(if chunk.is_empty() {
            Pull::End
        } else {
            Pull::Value(chunk)
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let (lower, upper) = self.upstream.size_hint();
        (
            lower.div_ceil(self.size),
            upper.map(|u| u.div_ceil(self.size)),
        )
    }

    fn close(&mut self) {
        self.upstream.close();
    }
}

enum SortState<S: Source> {
    Pending(S),
    Draining(std::vec::IntoIter<S::Item>),
}

/// Stable sort stage; drains the entire upstream on its first pull.
pub struct Sorted<S: Source, C> {
    state: SortState<S>,
    compare: C,
}

impl<S: Source, C> Sorted<S, C> {
    pub(crate) fn new(upstream: S, compare: C) -> Self {
        Self {
            state: SortState::Pending(upstream),
            compare,
        }
    }
}

impl<S, C> Source for Sorted<S, C>
where
    S: Source,
    C: FnMut(&S::Item, &S::Item) -> Ordering,
{
    type Item = S::Item;

    fn pull(&mut self) -> Result<Pull<S::Item>> {
        if let SortState::Pending(upstream) = &mut self.state {
            let mut items = Vec::new();
            upstream.pull_into(&mut items)?;
            upstream.close();
            items.sort_by(&mut self.compare);
            tracing::debug!(count = items.len(), "sorted stage materialized upstream");
            self.state = SortState::Draining(items.into_iter());
        }
        match &mut self.state {
            SortState::Draining(items) => Ok(items.next().into()),
            SortState::Pending(_) => Ok(Pull::End),
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match &self.state {
            SortState::Pending(upstream) => upstream.size_hint(),
            SortState::Draining(items) => items.size_hint(),
        }
    }

    fn close(&mut self) {
        if let SortState::Pending(upstream) = &mut self.state {
            upstream.close();
        }
    }
}

/// Pairs elements of two sources position by position.
///
/// Under [`AlignmentOption::RequireBoth`] the pairing stops at the shorter
/// side and the longer side is never pulled past that point. Under
/// [`AlignmentOption::AllowUnpaired`] it continues until both sides end,
/// supplying `None` for the exhausted side.
pub struct Zip<A, B> {
    left: A,
    right: B,
    alignment: AlignmentOption,
    left_done: bool,
    right_done: bool,
}

impl<A, B> Zip<A, B> {
    pub(crate) fn new(left: A, right: B, alignment: AlignmentOption) -> Self {
        Self {
            left,
            right,
            alignment,
            left_done: false,
            right_done: false,
        }
    }
}

impl<A: Source, B: Source> Zip<A, B> {
    fn pull_side<S: Source>(source: &mut S, done: &mut bool) -> Result<Option<S::Item>> {
        if *done {
            return Ok(None);
        }
        let pulled = source.pull()?.into_option();
        *done = pulled.is_none();
        Ok(pulled)
    }
}

impl<A: Source, B: Source> Source for Zip<A, B> {
    type Item = (Option<A::Item>, Option<B::Item>);

    fn pull(&mut self) -> Result<Pull<Self::Item>> {
        let left = Self::pull_side(&mut self.left, &mut self.left_done)?;
        if left.is_none() && self.alignment == AlignmentOption::RequireBoth {
            return Ok(Pull::End);
        }
        let right = Self::pull_side(&mut self.right, &mut self.right_done)?;
        Ok(match (left, right) {
            (None, None) => Pull::End,
            (Some(l), Some(r)) => Pull::Value((Some(l), Some(r))),
            (left, right) => match self.alignment {
                AlignmentOption::RequireBoth => {
                    self.left_done = true;
                    self.right_done = true;
                    Pull::End
                }
                AlignmentOption::AllowUnpaired => Pull::Value((left, right)),
            },
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let (l_lo, l_hi) = self.left.size_hint();
        let (r_lo, r_hi) = self.right.size_hint();
        match self.alignment {
            AlignmentOption::RequireBoth => {
                let upper = match (l_hi, r_hi) {
                    (Some(l), Some(r)) => Some(l.min(r)),
                    (Some(l), None) => Some(l),
                    (None, Some(r)) => Some(r),
                    (None, None) => None,
                };
                (l_lo.min(r_lo), upper)
            }
            AlignmentOption::AllowUnpaired => {
                let upper = match (l_hi, r_hi) {
                    (Some(l), Some(r)) => Some(l.max(r)),
                    _ => None,
                };
                (l_lo.max(r_lo), upper)
            }
        }
    }

    fn close(&mut self) {
        self.left.close();
        self.right.close();
    }
}

/// Source that fails once with a stored error, then ends.
pub(crate) struct Failed<T> {
    error: Option<SequenceError>,
    _marker: std::marker::PhantomData<T>,
}

impl<T> Failed<T> {
    pub(crate) fn new(error: SequenceError) -> Self {
        Self {
            error: Some(error),
            _marker: std::marker::PhantomData,
        }
    }
}

impl<T> Source for Failed<T> {
    type Item = T;

    fn pull(&mut self) -> Result<Pull<T>> {
        match self.error.take() {
            Some(error) => Err(error),
            None => Ok(Pull::End),
        }
    }
}
