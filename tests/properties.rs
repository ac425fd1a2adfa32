use proptest::prelude::*;
use seqlane::terminal::{percentile_cuts, SeqHash};
use seqlane::{ActiveSequence, LazySequence};

proptest! {
    #[test]
    fn count_matches_traversal_length(items in proptest::collection::vec(any::<i32>(), 0..200)) {
        let lazy = LazySequence::from_vec(items.clone());
        prop_assert_eq!(lazy.count().expect("count"), items.len());
        let first = lazy.to_vec().expect("first traversal");
        let second = lazy.to_vec().expect("second traversal");
        prop_assert_eq!(&first, &items);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn has_at_agrees_with_length(
        items in proptest::collection::vec(proptest::option::of(any::<u8>()), 0..50),
        index in 0usize..60,
    ) {
        let present = ActiveSequence::from_vec(items.clone()).has_at(index).expect("lookup");
        prop_assert_eq!(present, index < items.len());
    }

    #[test]
    fn hash_follows_polynomial_law(
        items in proptest::collection::vec(proptest::option::of(any::<i32>()), 0..50),
    ) {
        let expected = items.iter().fold(1i32, |h, item| {
            h.wrapping_mul(31).wrapping_add(item.unwrap_or(0))
        });
        let hashed = ActiveSequence::from_vec(items.clone()).sequence_hash().expect("hash");
        prop_assert_eq!(hashed, expected);
        prop_assert_eq!(items.seq_hash(), expected);
    }

    #[test]
    fn equality_requires_same_length_and_elements(
        left in proptest::collection::vec(0u8..4, 0..12),
        right in proptest::collection::vec(0u8..4, 0..12),
    ) {
        let equal = LazySequence::from_vec(left.clone()) == LazySequence::from_vec(right.clone());
        prop_assert_eq!(equal, left == right);
    }

    #[test]
    fn sorted_matches_std_stable_sort(
        items in proptest::collection::vec((0u8..8, any::<u16>()), 0..100),
    ) {
        let mut expected = items.clone();
        expected.sort_by_key(|pair| pair.0);
        let sorted = ActiveSequence::from_vec(items)
            .sorted_by_key(|pair| pair.0)
            .to_vec()
            .expect("sort");
        prop_assert_eq!(sorted, expected);
    }

    #[test]
    fn percentile_buckets_partition_the_input(
        len in 0usize..300,
        percentiles in proptest::collection::vec(0.0f64..=100.0, 1..6),
    ) {
        let buckets = ActiveSequence::from_host(0..len)
            .segment_by_percentiles(&percentiles)
            .expect("valid percentiles");
        let cuts = percentile_cuts(len, &percentiles).expect("valid percentiles");
        prop_assert_eq!(buckets.len(), cuts.len());
        let rejoined: Vec<usize> = buckets.into_iter().flatten().collect();
        prop_assert_eq!(rejoined, (0..len).collect::<Vec<_>>());
    }

    #[test]
    fn min_max_agree_with_separate_passes(
        items in proptest::collection::vec(any::<i64>(), 0..100),
    ) {
        let both = ActiveSequence::from_vec(items.clone()).min_max_by(i64::cmp).expect("scan");
        let min = ActiveSequence::from_vec(items.clone()).min().expect("scan");
        let max = ActiveSequence::from_vec(items).max().expect("scan");
        prop_assert_eq!(both, min.zip(max));
    }
}
