//! Percentile segmentation of a finite, ordered collection
//!
//! Cut indices are `round(p * n / 100)` for each percentile `p`, sorted
//! ascending. `n` is appended as a closing cut unless the last cut already
//! equals `n`, so a trailing 100th percentile does not add an empty bucket.
//! Bucket `i` covers positions `[cuts[i - 1], cuts[i])`, with the first
//! bucket starting at 0.

use crate::{Result, SequenceError};

/// Sorted cut indices for a collection of `len` elements.
pub fn percentile_cuts(len: usize, percentiles: &[f64]) -> Result<Vec<usize>> {
    let mut cuts = Vec::with_capacity(percentiles.len() + 1);
    for &percentile in percentiles {
        if !(0.0..=100.0).contains(&percentile) {
            return Err(SequenceError::InvalidConfiguration(format!(
                "percentile {percentile} outside [0, 100]"
            )));
        }
        cuts.push((percentile * len as f64 / 100.0).round() as usize);
    }
    cuts.sort_unstable();
    if cuts.last() != Some(&len) {
        cuts.push(len);
    }
    tracing::debug!(len, ?cuts, "computed percentile cuts");
    Ok(cuts)
}

/// Partition `items` into contiguous runs delimited by percentile cuts.
pub fn segment_by_percentiles<T>(items: Vec<T>, percentiles: &[f64]) -> Result<Vec<Vec<T>>> {
    let cuts = percentile_cuts(items.len(), percentiles)?;
    let mut buckets: Vec<Vec<T>> = cuts.iter().map(|_| Vec::new()).collect();
    let mut bucket = 0;
    for (position, item) in items.into_iter().enumerate() {
        while position >= cuts[bucket] {
            bucket += 1;
        }
        buckets[bucket].push(item);
    }
    Ok(buckets)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_median_split_of_hundred() {
        let buckets = segment_by_percentiles((0..100).collect(), &[50.0]).unwrap();
        assert_eq!(buckets.len(), 2);
        assert_eq!(buckets[0], (0..50).collect::<Vec<_>>());
        assert_eq!(buckets[1], (50..100).collect::<Vec<_>>());
    }

    #[test]
    fn test_hundredth_percentile_adds_no_closing_cut() {
        assert_eq!(percentile_cuts(10, &[50.0, 100.0]).unwrap(), vec![5, 10]);
        let buckets =
            segment_by_percentiles((0..10).collect::<Vec<i32>>(), &[50.0, 100.0]).unwrap();
        assert_eq!(buckets.len(), 2);
    }

    #[test]
    fn test_cuts_are_sorted_and_may_repeat() {
        assert_eq!(percentile_cuts(4, &[75.0, 25.0, 25.0]).unwrap(), vec![1, 1, 3, 4]);
        let buckets =
            segment_by_percentiles(vec!['a', 'b', 'c', 'd'], &[75.0, 25.0, 25.0]).unwrap();
        assert_eq!(buckets, vec![vec!['a'], vec![], vec!['b', 'c'], vec!['d']]);
    }

    #[test]
    fn test_rejects_out_of_range_percentile() {
        assert!(percentile_cuts(10, &[101.0]).is_err());
        assert!(percentile_cuts(10, &[f64::NAN]).is_err());
    }
}
