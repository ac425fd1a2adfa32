//! Sequence pipelines
//!
//! - [`ActiveSequence`]: single traversal, bound to one source, unusable after
//!   its first terminal operation
//! - [`LazySequence`]: reusable recipe opening a fresh `ActiveSequence` per access
//! - Capability traits ([`Filterable`], [`Mappable`], [`Sortable`],
//!   [`Groupable`]) shared by both

mod active;
mod capability;
mod lazy;
pub(crate) mod stages;

pub use active::{ActiveSequence, SequenceIter};
pub use capability::{Filterable, Groupable, Mappable, Sortable};
pub use lazy::{LazySequence, Recipe};

/// Policy for pairing two sequences of possibly different lengths
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AlignmentOption {
    /// Stop at the shorter sequence
    RequireBoth,
    /// Continue to the longer sequence, marking the exhausted side as absent
    AllowUnpaired,
}
