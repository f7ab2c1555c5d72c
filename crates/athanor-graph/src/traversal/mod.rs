//! Search algorithms over the indexed craft graph.
//!
//! Three traversal families answer the same question — how do I make this
//! element from the four bases — with different tradeoffs:
//!
//! - [`ForwardBfs`] - single shortest-discovery path from the bases, with
//!   an optional step-by-step trace for visualization
//! - [`PathEnumerator`] - the k-th distinct path to the target, by
//!   level-synchronous expansion with canonical path signatures
//! - [`DfsSynthesis`] / [`ParallelDfs`] - target-to-base descent through
//!   the reverse index, single-path memoized or multi-path parallel
//!
//! All search-local state (queues, visited sets, path buffers) lives for
//! one query only; the graph itself is read without locks.

mod bfs;
mod dfs;
mod multi_bfs;
mod multi_dfs;

pub use bfs::{BfsOutcome, ForwardBfs};
pub use dfs::{DfsOutcome, DfsSynthesis};
pub use multi_bfs::{EnumeratorConfig, PathBatch, PathEnumerator};
pub use multi_dfs::{MultiDfsOutcome, ParallelDfs, ParallelDfsConfig};

use std::collections::BTreeMap;

use athanor_core::IngredientCombo;
use serde::Serialize;

/// One snapshot of the single-path BFS, captured for visualization.
///
/// A trace holds one snapshot before any dequeue, one per dequeue, and a
/// final one when the target edge is discovered.
#[derive(Debug, Clone, Serialize)]
pub struct SearchStep {
    /// ID of the element being processed, or -1 for the initial snapshot.
    pub current_id: i64,
    /// Name of the element being processed, empty for the initial snapshot.
    pub current_name: String,
    /// Queue contents at snapshot time, in order.
    pub queue_ids: Vec<u32>,
    /// Queue contents as names, in order.
    pub queue_names: Vec<String>,
    /// Seen set in stable discovery order.
    pub seen_ids: Vec<u32>,
    /// Seen set as names, same order.
    pub seen_names: Vec<String>,
    /// Full discovery map so far: product name to its first ingredients.
    pub discovered: BTreeMap<String, IngredientCombo>,
    /// Ordinal of this snapshot, starting at 0.
    pub step_number: usize,
    /// Whether this snapshot captures the target discovery.
    pub found_target: bool,
}
