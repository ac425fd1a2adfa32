//! Primitive lanes
//!
//! `i32`, `i64` and `f64` pipelines with numeric terminals (count, sum,
//! min, max, average, fold) and lane-specific processors. Each lane wraps a
//! generic [`ActiveSequence`](crate::ActiveSequence) of its primitive, so
//! values stay unboxed and single-use semantics carry over unchanged.

mod lanes;
mod processor;

pub use lanes::{DoubleSequence, IntSequence, LongSequence};
pub use processor::{
    DoubleAdapter, DoubleProcessor, DoubleSummary, IntAdapter, IntProcessor, IntSummary,
    LongAdapter, LongProcessor, LongSummary,
};
