//! # Lazy, pull-based sequence pipelines
//!
//! This library builds chains of transformations over a data source and
//! defers all work until a terminal operation consumes the chain.
//!
//! ## Core Pieces
//!
//! 1. **Cursors**: single-slot look-ahead over a [`cursor::Source`] (arrays,
//!    generators, blocking queues, host iterators)
//! 2. **ActiveSequence**: single-use pipeline bound to exactly one cursor
//! 3. **LazySequence**: reusable recipe that opens a fresh pipeline per access
//! 4. **Terminal protocols**: folds, aggregators, element processors,
//!    grouping, statistics, percentile segmentation
//! 5. **Primitive lanes**: `i32`/`i64`/`f64` pipelines with numeric terminals
//!
//! ## Usage Example
//!
//! ```
//! use seqlane::{ActiveSequence, LazySequence};
//!
//! let mut evens = ActiveSequence::from_vec(vec![1, 2, 3, 4, 5, 6])
//!     .filter(|x| x % 2 == 0)
//!     .map(|x| x * 10);
//! assert_eq!(evens.to_vec().unwrap(), vec![20, 40, 60]);
//!
//! // A consumed sequence refuses further work.
//! assert!(evens.count().is_err());
//!
//! // Lazy sequences re-open their recipe on every access.
//! let squares = LazySequence::from_vec(vec![1, 2, 3]).map(|x| x * x);
//! assert_eq!(squares.to_vec().unwrap(), vec![1, 4, 9]);
//! assert_eq!(squares.to_vec().unwrap(), vec![1, 4, 9]);
//! ```

#![warn(missing_docs, missing_debug_implementations)]
#![allow(clippy::new_without_default)]

pub mod cursor;     // Pull primitives and source backends
pub mod sequence;   // ActiveSequence / LazySequence composition
pub mod terminal;   // Aggregators, processors, grouping, statistics
pub mod primitive;  // Unboxed int/long/double lanes
pub mod step;       // Arithmetic progression generator

// Re-exports for convenience
pub use cursor::{BlockingQueue, Cursor, Pull, QueueConfig, Source};
pub use sequence::{
    ActiveSequence, AlignmentOption, Filterable, Groupable, LazySequence, Mappable, Sortable,
};
pub use terminal::{
    Aggregator, Collector, ElementProcessor, SeqHash, Statistics,
};
pub use primitive::{DoubleSequence, IntSequence, LongSequence};
pub use step::IntStep;

use thiserror::Error;

/// Errors that can occur while building or consuming sequences
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SequenceError {
    /// Operation attempted on an ActiveSequence after its terminal consumption
    #[error("sequence already consumed")]
    AlreadyConsumed,

    /// Arithmetic progression with a non-positive step
    #[error("invalid step size {0}: must be > 0")]
    InvalidStepSize(i32),

    /// Rejected configuration value
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// The producer side of a queue-backed cursor vanished while the consumer waited
    #[error("interrupted while waiting on queue-backed cursor")]
    WaitInterrupted,

    /// `next` called without a preceding `has_next` that returned true
    #[error("next() called without a pending element")]
    NoPendingElement,

    /// Genuine failure raised inside a generator function
    #[error("generator failed: {0}")]
    Generator(String),

    /// Failure reported by a host-supplied iterator
    #[error("source failed: {0}")]
    Source(String),

    /// A custom element writer refused to format an element
    #[error("failed to render element at index {0}")]
    Render(usize),
}

impl SequenceError {
    /// Helper for constructing generator-originated errors.
    pub fn generator_failure(msg: impl Into<String>) -> Self {
        SequenceError::Generator(msg.into())
    }

    /// Helper for constructing host-source errors.
    pub fn source_failure(msg: impl Into<String>) -> Self {
        SequenceError::Source(msg.into())
    }
}

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, SequenceError>;
