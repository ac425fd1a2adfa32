//! Terminal protocols
//!
//! Free functions over any [`Source`](crate::cursor::Source) that pull to
//! exhaustion (or to a short-circuit point) and produce a materialized result.
//! `ActiveSequence` and `LazySequence` delegate their terminals here.

mod aggregator;
mod equality;
mod grouping;
mod percentile;
mod processor;
mod statistics;

pub use aggregator::{collect_into, collect_with, Aggregator, Collector};
pub use equality::{render, render_with, sequence_hash, sequences_equal, SeqHash};
pub use grouping::{group_by, group_by_collecting, group_by_processing};
pub use percentile::{percentile_cuts, segment_by_percentiles};
pub use processor::{run_processor, CountingProcessor, ElementProcessor, FnProcessor};
pub use statistics::{
    element_at, has_at, max_by, min_by, min_max_by, statistics_by, Statistics,
};
