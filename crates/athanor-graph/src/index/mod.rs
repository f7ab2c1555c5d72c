//! Graph indexes built once from the catalog.
//!
//! Construction order matters: the [`TierIndex`] comes first (it drives the
//! tier-monotonicity filter), then the [`IndexedGraph`], and finally — only
//! when a DFS query needs it — the [`ReverseIndex`].
//!
//! All three are immutable once built and are read without locks.

mod graph;
mod reverse;
mod tiers;

pub use graph::{ElementId, IndexedGraph, IndexedNeighbor};
pub use reverse::{IngredientPair, ReverseIndex};
pub use tiers::{TierIndex, UNKNOWN_TIER};
