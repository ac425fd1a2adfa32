use seqlane::terminal::{percentile_cuts, SeqHash};
use seqlane::{ActiveSequence, IntStep, SequenceError};
use test_case::test_case;

#[test_case(vec![] => 1 ; "empty")]
#[test_case(vec![None] => 31 ; "single none")]
#[test_case(vec![Some(1), Some(2)] => 994 ; "one two")]
#[test_case(vec![Some(-1)] => 30 ; "negative element")]
fn sequence_hash(items: Vec<Option<i32>>) -> i32 {
    ActiveSequence::from_vec(items).sequence_hash().expect("hash")
}

#[test_case(true => 1231 ; "true")]
#[test_case(false => 1237 ; "false")]
fn bool_hash(value: bool) -> i32 {
    value.seq_hash()
}

#[test_case(0i64 => 0 ; "zero")]
#[test_case(-1i64 => 0 ; "all ones folds to zero")]
#[test_case(1i64 << 32 => 1 ; "high word")]
fn long_hash(value: i64) -> i32 {
    value.seq_hash()
}

#[test_case(5, 0, 7 => 5 ; "rounds down")]
#[test_case(5, 0, 8 => 10 ; "rounds up")]
#[test_case(4, 0, 2 => 4 ; "tie rounds up")]
#[test_case(4, 0, -2 => 0 ; "negative tie rounds up")]
#[test_case(10, 3, 7 => 3 ; "offset grid below")]
#[test_case(10, 3, 8 => 13 ; "offset grid tie")]
fn snapping(size: i32, start: i32, x: i32) -> i32 {
    IntStep::of(size).expect("positive").with_start(start).apply_as_int(x)
}

#[test_case(0 ; "zero")]
#[test_case(-5 ; "negative")]
fn step_rejects_non_positive(size: i32) {
    assert_eq!(IntStep::of(size), Err(SequenceError::InvalidStepSize(size)));
}

#[test_case(100, &[50.0] => vec![50, 100] ; "median")]
#[test_case(10, &[50.0, 100.0] => vec![5, 10] ; "hundredth adds no closing cut")]
#[test_case(10, &[90.0, 10.0] => vec![1, 9, 10] ; "cuts are sorted")]
#[test_case(3, &[50.0] => vec![2, 3] ; "half rounds away from zero")]
#[test_case(0, &[25.0] => vec![0] ; "empty collection")]
fn cut_indices(len: usize, percentiles: &[f64]) -> Vec<usize> {
    percentile_cuts(len, percentiles).expect("valid percentiles")
}
