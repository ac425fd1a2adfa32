//! Grouping terminals
//!
//! Keys keep the order of their first occurrence; members keep traversal
//! order within their group.

use std::hash::Hash;

use indexmap::IndexMap;

use super::{Collector, ElementProcessor};
use crate::cursor::{Pull, Source};
use crate::Result;

/// Partition every element by key.
pub fn group_by<S, K, F>(mut source: S, mut key: F) -> Result<IndexMap<K, Vec<S::Item>>>
where
    S: Source,
    K: Hash + Eq,
    F: FnMut(&S::Item) -> K,
{
    let mut groups: IndexMap<K, Vec<S::Item>> = IndexMap::new();
    while let Pull::Value(element) = source.pull()? {
        groups.entry(key(&element)).or_default().push(element);
    }
    tracing::debug!(groups = groups.len(), "grouping materialized");
    Ok(groups)
}

/// Partition by key, folding each group through a collector as elements arrive.
pub fn group_by_collecting<S, K, F, C>(
    mut source: S,
    mut key: F,
    collector: &C,
) -> Result<IndexMap<K, C::Output>>
where
    S: Source,
    K: Hash + Eq,
    F: FnMut(&S::Item) -> K,
    C: Collector<S::Item> + ?Sized,
{
    let mut accumulators: IndexMap<K, Option<C::Accumulator>> = IndexMap::new();
    while let Pull::Value(element) = source.pull()? {
        let slot = accumulators
            .entry(key(&element))
            .or_insert_with(|| Some(collector.supply()));
        if let Some(accumulator) = slot.take() {
            *slot = Some(collector.accumulate(element, accumulator));
        }
    }
    Ok(accumulators
        .into_iter()
        .filter_map(|(key, accumulator)| Some((key, collector.finish(accumulator?))))
        .collect())
}

/// Partition by key, feeding each group to its own element processor.
///
/// Each processor sees indices local to its group.
pub fn group_by_processing<S, K, F, G, P>(
    mut source: S,
    mut key: F,
    mut factory: G,
) -> Result<IndexMap<K, P::Output>>
where
    S: Source,
    K: Hash + Eq,
    F: FnMut(&S::Item) -> K,
    G: FnMut() -> P,
    P: ElementProcessor<S::Item>,
{
    let mut processors: IndexMap<K, (P, usize)> = IndexMap::new();
    while let Pull::Value(element) = source.pull()? {
        let (processor, seen) = processors
            .entry(key(&element))
            .or_insert_with(|| (factory(), 0));
        processor.process_element(*seen, element);
        *seen += 1;
    }
    Ok(processors
        .into_iter()
        .map(|(key, (processor, count))| (key, processor.process_complete(count)))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cursor::VecSource;
    use crate::terminal::{Aggregator, CountingProcessor};

    #[test]
    fn test_group_by_parity_keeps_first_occurrence_order() {
        let groups = group_by(VecSource::new(vec![1, 2, 3, 4, 5]), |x| x % 2).unwrap();
        let keys: Vec<_> = groups.keys().copied().collect();
        assert_eq!(keys, vec![1, 0]);
        assert_eq!(groups[&1], vec![1, 3, 5]);
        assert_eq!(groups[&0], vec![2, 4]);
    }

    #[test]
    fn test_group_by_collecting_counts() {
        let words = vec!["apple", "avocado", "banana", "blueberry", "cherry"];
        let counts = group_by_collecting(
            VecSource::new(words),
            |w| w.as_bytes()[0],
            &Aggregator::counting(),
        )
        .unwrap();
        assert_eq!(counts.get(&b'a'), Some(&2));
        assert_eq!(counts.get(&b'b'), Some(&2));
        assert_eq!(counts.get(&b'c'), Some(&1));
    }

    #[test]
    fn test_group_by_processing_counts() {
        let source = VecSource::new(vec![3, 6, 7, 9]);
        let counts = group_by_processing(source, |x| x % 3 == 0, || CountingProcessor).unwrap();
        assert_eq!(counts.get(&true), Some(&3));
        assert_eq!(counts.get(&false), Some(&1));
    }
}
