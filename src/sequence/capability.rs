//! Small capability traits shared by single-use and reusable sequences
//!
//! Code that only needs to filter, map, sort or group can be written once
//! against these traits and run over either [`ActiveSequence`] or
//! [`LazySequence`].

use std::cmp::Ordering;
use std::hash::Hash;

use indexmap::IndexMap;

use super::{ActiveSequence, LazySequence};
use crate::Result;

/// Sequences that can drop elements by predicate.
pub trait Filterable<T>: Sized {
    /// Keep elements matching `predicate`.
    fn filter<P>(self, predicate: P) -> Self
    where
        P: Fn(&T) -> bool + 'static;
}

/// Sequences that can transform their elements.
pub trait Mappable<T> {
    /// Sequence of the same kind over `U`.
    type Mapped<U: 'static>;

    /// Transform every element.
    fn map<U, F>(self, f: F) -> Self::Mapped<U>
    where
        U: 'static,
        F: Fn(T) -> U + 'static;
}

/// Sequences that can reorder their elements.
pub trait Sortable<T>: Sized {
    /// Stable sort by a comparator.
    fn sorted_by<C>(self, compare: C) -> Self
    where
        C: Fn(&T, &T) -> Ordering + 'static;

    /// Stable sort by a derived key.
    fn sorted_by_key<K, F>(self, key: F) -> Self
    where
        K: Ord,
        F: Fn(&T) -> K + 'static,
    {
        self.sorted_by(move |a, b| key(a).cmp(&key(b)))
    }
}

/// Sequences that can be partitioned by key.
pub trait Groupable<T> {
    /// Partition by key; keys in first-seen order, members in traversal order.
    fn group_by<K, F>(&mut self, key: F) -> Result<IndexMap<K, Vec<T>>>
    where
        K: Hash + Eq,
        F: FnMut(&T) -> K;
}

impl<T: 'static> Filterable<T> for ActiveSequence<T> {
    fn filter<P>(self, predicate: P) -> Self
    where
        P: Fn(&T) -> bool + 'static,
    {
        ActiveSequence::filter(self, predicate)
    }
}

impl<T: 'static> Filterable<T> for LazySequence<T> {
    fn filter<P>(self, predicate: P) -> Self
    where
        P: Fn(&T) -> bool + 'static,
    {
        LazySequence::filter(&self, predicate)
    }
}

impl<T: 'static> Mappable<T> for ActiveSequence<T> {
    type Mapped<U: 'static> = ActiveSequence<U>;

    fn map<U, F>(self, f: F) -> ActiveSequence<U>
    where
        U: 'static,
        F: Fn(T) -> U + 'static,
    {
        ActiveSequence::map(self, f)
    }
}

impl<T: 'static> Mappable<T> for LazySequence<T> {
    type Mapped<U: 'static> = LazySequence<U>;

    fn map<U, F>(self, f: F) -> LazySequence<U>
    where
        U: 'static,
        F: Fn(T) -> U + 'static,
    {
        LazySequence::map(&self, f)
    }
}

impl<T: 'static> Sortable<T> for ActiveSequence<T> {
    fn sorted_by<C>(self, compare: C) -> Self
    where
        C: Fn(&T, &T) -> Ordering + 'static,
    {
        ActiveSequence::sorted_by(self, compare)
    }
}

impl<T: 'static> Sortable<T> for LazySequence<T> {
    fn sorted_by<C>(self, compare: C) -> Self
    where
        C: Fn(&T, &T) -> Ordering + 'static,
    {
        LazySequence::sorted_by(&self, compare)
    }
}

impl<T: 'static> Groupable<T> for ActiveSequence<T> {
    fn group_by<K, F>(&mut self, key: F) -> Result<IndexMap<K, Vec<T>>>
    where
        K: Hash + Eq,
        F: FnMut(&T) -> K,
    {
        ActiveSequence::group_by(self, key)
    }
}

impl<T: 'static> Groupable<T> for LazySequence<T> {
    fn group_by<K, F>(&mut self, key: F) -> Result<IndexMap<K, Vec<T>>>
    where
        K: Hash + Eq,
        F: FnMut(&T) -> K,
    {
        LazySequence::group_by(self, key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn even_squares_by_descending<S>(seq: S) -> <S as Mappable<i32>>::Mapped<i32>
    where
        S: Filterable<i32> + Sortable<i32> + Mappable<i32>,
    {
        seq.filter(|x| x % 2 == 0)
            .sorted_by(|a, b| b.cmp(a))
            .map(|x| x * x)
    }

    fn parity_sizes<G: Groupable<i32>>(seq: &mut G) -> Vec<(i32, usize)> {
        seq.group_by(|x| x % 2)
            .unwrap()
            .into_iter()
            .map(|(key, members)| (key, members.len()))
            .collect()
    }

    #[test]
    fn test_same_code_over_both_kinds() {
        let mut active = even_squares_by_descending(ActiveSequence::from_vec(vec![1, 2, 3, 4]));
        assert_eq!(active.to_vec().unwrap(), vec![16, 4]);

        let lazy = even_squares_by_descending(LazySequence::from_vec(vec![1, 2, 3, 4]));
        assert_eq!(lazy.to_vec().unwrap(), vec![16, 4]);
        assert_eq!(lazy.to_vec().unwrap(), vec![16, 4]);
    }

    #[test]
    fn test_grouping_over_both_kinds() {
        let mut active = ActiveSequence::from_vec(vec![1, 2, 3]);
        let mut lazy = LazySequence::from_vec(vec![1, 2, 3]);
        assert_eq!(parity_sizes(&mut active), vec![(1, 2), (0, 1)]);
        assert_eq!(parity_sizes(&mut lazy), vec![(1, 2), (0, 1)]);
        assert_eq!(parity_sizes(&mut lazy), vec![(1, 2), (0, 1)]);
    }
}
