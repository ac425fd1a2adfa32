mod common;

use seqlane::terminal::FnProcessor;
use seqlane::{
    ActiveSequence, Aggregator, AlignmentOption, LazySequence, Pull, SequenceError,
};

use common::counted_range;

#[test]
fn transformations_pull_nothing_until_a_terminal_runs() {
    let (seq, pulls) = counted_range(1_000);
    let mut pipeline = seq
        .filter(|x| x % 3 == 0)
        .map(|x| x * 2)
        .skip(1)
        .limit(3);
    assert_eq!(pulls.get(), 0);

    assert_eq!(pipeline.to_vec().expect("pipeline runs"), vec![6, 12, 18]);
    // 0..=9 reach the limit; nothing past the tenth element is generated.
    assert_eq!(pulls.get(), 10);
}

#[test]
fn second_terminal_reports_consumption() {
    let mut seq = ActiveSequence::from_vec(vec![1, 2, 3]);
    assert_eq!(seq.fold(0, |acc, x| acc + x).expect("first fold"), 6);
    assert_eq!(seq.fold(0, |acc, x| acc + x), Err(SequenceError::AlreadyConsumed));
    assert_eq!(seq.count(), Err(SequenceError::AlreadyConsumed));
}

#[test]
fn generator_failure_is_distinct_from_end() {
    let mut calls = 0;
    let mut failing = ActiveSequence::from_generator(move || {
        calls += 1;
        if calls < 3 {
            Ok(Pull::Value(calls))
        } else {
            Err(SequenceError::generator_failure("sensor offline"))
        }
    });
    assert_eq!(
        failing.to_vec(),
        Err(SequenceError::Generator("sensor offline".to_string()))
    );
    assert!(failing.is_consumed());

    let mut remaining = 2;
    let mut ending = ActiveSequence::from_generator(move || {
        remaining -= 1;
        Ok(if remaining >= 0 { Pull::Value(remaining) } else { Pull::End })
    });
    assert_eq!(ending.to_vec().expect("clean end"), vec![1, 0]);
}

#[test]
fn none_is_a_legal_element() {
    let items = vec![Some("a"), None, Some("c")];
    assert!(ActiveSequence::from_vec(items.clone()).has_at(1).expect("lookup"));
    assert_eq!(ActiveSequence::from_vec(items.clone()).get(1).expect("lookup"), Some(None));
    assert!(!ActiveSequence::from_vec(items.clone()).has_at(3).expect("lookup"));
    assert_eq!(ActiveSequence::from_vec(items).non_null().count().expect("count"), 2);
}

#[test]
fn array_slice_bounds() {
    let data = vec![10, 20, 30, 40, 50];
    let mut middle = ActiveSequence::from_slice(data.clone(), 1, 3).expect("in bounds");
    assert_eq!(middle.to_vec().expect("slice"), vec![20, 30, 40]);
    assert!(ActiveSequence::from_slice(data, 4, 2).is_err());
}

#[test]
fn grouping_by_parity() {
    let groups = ActiveSequence::from_vec(vec![1, 2, 3, 4, 5])
        .group_by(|x| x % 2)
        .expect("grouping");
    let flattened: Vec<(i32, Vec<i32>)> = groups.into_iter().collect();
    assert_eq!(flattened, vec![(1, vec![1, 3, 5]), (0, vec![2, 4])]);
}

#[test]
fn grouping_entry_points_agree() {
    let words = vec!["ant", "bee", "asp", "bat", "cow", "ape"];
    let first_letter = |w: &&str| w.as_bytes()[0];

    let by_function = ActiveSequence::from_vec(words.clone())
        .group_by_with(first_letter, |mut group| group.count())
        .expect("function form");
    let by_aggregator = ActiveSequence::from_vec(words.clone())
        .group_by_aggregate(first_letter, &Aggregator::counting())
        .expect("aggregator form");
    let by_processor = ActiveSequence::from_vec(words)
        .group_by_processor(first_letter, || {
            FnProcessor::new(|_index: usize, _word: &str| {}, |count: usize| count)
        })
        .expect("processor form");

    assert_eq!(by_function, by_aggregator);
    assert_eq!(by_aggregator, by_processor);
    assert_eq!(by_function.get(&b'a'), Some(&3));
}

#[test]
fn min_max_single_pass() {
    let temps = vec![12.5_f64, -3.0, 7.25, 30.0, -3.0];
    let (min, max) = ActiveSequence::from_vec(temps)
        .with_index()
        .min_max_by(|a, b| a.1.total_cmp(&b.1))
        .expect("traversal")
        .expect("non-empty");
    assert_eq!(min, (1, -3.0));
    assert_eq!(max, (3, 30.0));
}

#[test]
fn percentile_segmentation_halves() {
    let buckets = ActiveSequence::from_host(0..100)
        .segment_by_percentiles(&[50.0])
        .expect("finite source");
    assert_eq!(buckets.len(), 2);
    assert_eq!(buckets[0], (0..50).collect::<Vec<_>>());
    assert_eq!(buckets[1], (50..100).collect::<Vec<_>>());
}

#[test]
fn chunks_and_flat_map_round_trip_order() {
    let mut flattened = ActiveSequence::from_host(1..=7)
        .chunks(3)
        .expect("positive size")
        .flat_map(|chunk| chunk.into_iter().rev());
    assert_eq!(flattened.to_vec().expect("flatten"), vec![3, 2, 1, 6, 5, 4, 7]);
}

#[test]
fn oversized_chunk_holds_the_whole_input() {
    let mut whole = ActiveSequence::from_vec(vec![1u64, 2, 3])
        .chunks(usize::MAX)
        .expect("positive size");
    assert_eq!(whole.to_vec().expect("chunk"), vec![vec![1, 2, 3]]);

    let (counted, _pulls) = counted_range(4);
    let mut unsized_upstream = counted.chunks(1_000_000_000).expect("positive size");
    assert_eq!(unsized_upstream.to_vec().expect("chunk"), vec![vec![0, 1, 2, 3]]);
}

#[test]
fn take_while_skip_while_chain() {
    let head = ActiveSequence::from_vec(vec![1, 2, 9, 3]).take_while(|x| *x < 5);
    let tail = ActiveSequence::from_vec(vec![0, 0, 4, 0]).skip_while(|x| *x == 0);
    let mut joined = head.chain(tail);
    assert_eq!(joined.to_vec().expect("chain"), vec![1, 2, 4, 0]);
}

#[test]
fn zip_require_both_leaves_longer_side_unpulled() {
    let (right, pulls) = counted_range(100);
    let mut pairs =
        ActiveSequence::from_vec(vec!['x', 'y']).zip(right, AlignmentOption::RequireBoth);
    assert_eq!(pairs.count().expect("zip"), 2);
    assert_eq!(pulls.get(), 2);
}

#[test]
fn equality_uses_unpaired_alignment() {
    let a = LazySequence::from_vec(vec![1, 2, 3]);
    assert_eq!(a, LazySequence::from_vec(vec![1, 2, 3]));
    assert_ne!(a, LazySequence::from_vec(vec![1, 2]));
    assert_ne!(LazySequence::from_vec(vec![1, 2]), a);
}

#[test]
fn named_aggregations() {
    let joined = ActiveSequence::from_vec(vec!["x", "y", "z"])
        .aggregate(&Aggregator::joining("-"))
        .expect("join");
    assert_eq!(joined, "x-y-z");

    let total = ActiveSequence::from_vec(vec!["aa", "b", "cccc"])
        .aggregate(&Aggregator::summing_i64(|s: &&str| s.len() as i64))
        .expect("sum");
    assert_eq!(total, 7);

    let letters = ActiveSequence::from_vec(vec!['b', 'a', 'b'])
        .collect_into(String::new, |acc, c| acc.push(c))
        .expect("collect");
    assert_eq!(letters, "bab");

    let unique: std::collections::BTreeSet<char> = ActiveSequence::from_vec(vec!['b', 'a', 'b'])
        .collect()
        .expect("collect");
    assert_eq!(unique.into_iter().collect::<String>(), "ab");
}

#[test]
fn primitive_lane_bridging() {
    let words = vec!["lazy", "pull", "based", "engine"];
    let summary = ActiveSequence::from_vec(words.clone())
        .summarize_int(|w| w.len() as i32)
        .expect("summary");
    assert_eq!(summary.count(), 4);
    assert_eq!(summary.sum(), 19);
    assert_eq!(summary.max(), Some(6));

    let mut lengths = ActiveSequence::from_vec(words).map_to_long(|w| w.len() as i64);
    assert_eq!(lengths.average().expect("average"), Some(4.75));
}
