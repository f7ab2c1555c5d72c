//! Multi-path target-to-base DFS across parallel root-pair workers.
//!
//! Every ingredient pair that produces the target seeds one worker. Each
//! worker runs an iterative backtracking descent over the reverse index,
//! materializing complete target-to-base resolutions:
//!
//! - an explicit frame stack holds one `(product, pair cursor)` choice
//!   point per unresolved product, with append-on-descend /
//!   pop-on-unwind path and agenda buffers
//! - base elements never enter the agenda; a non-base element may occur in
//!   one resolution at most [`ParallelDfsConfig::revisit_limit`] times,
//!   which both breaks recipe cycles and permits diversity through shared
//!   intermediates
//! - completed resolutions are hashed (FNV-1a 64) and collected under one
//!   mutex; hitting the internal limit raises a cancel flag every worker
//!   observes at each iteration
//!
//! Workers oversample beyond the requested count; a Jaccard post-filter on
//! ingredient sets then suppresses near-identical paths before truncation.
//! The emission order across workers is not deterministic; only the final
//! deduplicated set is stable.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use athanor_core::{Reaction, RecipeStep};
use rayon::prelude::*;

use crate::index::{ElementId, IndexedGraph, IngredientPair, ReverseIndex};

/// A resolved reaction: ingredient pair plus product.
type Triple = (ElementId, ElementId, ElementId);

/// Policy knobs for the parallel DFS.
#[derive(Debug, Clone)]
pub struct ParallelDfsConfig {
    /// Collect `oversample * max_paths` raw paths before filtering.
    pub oversample: usize,
    /// Jaccard similarity at or above which a later path is suppressed.
    pub jaccard_threshold: f64,
    /// How many times one non-base element may occur in a resolution.
    pub revisit_limit: u8,
    /// Per-worker iteration budget; exhausted workers return what they have.
    pub step_budget: usize,
}

impl Default for ParallelDfsConfig {
    fn default() -> Self {
        Self {
            oversample: 4,
            jaccard_threshold: 0.75,
            revisit_limit: 2,
            step_budget: 1_000_000,
        }
    }
}

/// Result of a multi-path DFS.
#[derive(Debug, Clone, Default)]
pub struct MultiDfsOutcome {
    /// Up to `max_paths` distinct recipe paths, each with its full
    /// reaction sequence.
    pub steps: Vec<RecipeStep>,
    /// Resolution steps performed across all workers.
    pub nodes_visited: usize,
}

/// Parallel multi-path target-to-base search.
///
/// # Example
///
/// ```ignore
/// use athanor_graph::traversal::ParallelDfs;
///
/// let outcome = ParallelDfs::new("Brick").with_max_paths(6).execute(&graph, &reverse);
/// println!("{} distinct syntheses", outcome.steps.len());
/// ```
pub struct ParallelDfs<'a> {
    target: &'a str,
    max_paths: usize,
    config: ParallelDfsConfig,
}

impl<'a> ParallelDfs<'a> {
    /// Create a search for the given target name.
    pub fn new(target: &'a str) -> Self {
        Self { target, max_paths: 1, config: ParallelDfsConfig::default() }
    }

    /// Set the number of distinct paths to return.
    #[must_use]
    pub const fn with_max_paths(mut self, max_paths: usize) -> Self {
        self.max_paths = max_paths;
        self
    }

    /// Override the policy knobs.
    #[must_use]
    pub fn with_config(mut self, config: ParallelDfsConfig) -> Self {
        self.config = config;
        self
    }

    /// Run the search.
    #[must_use]
    pub fn execute(self, graph: &IndexedGraph, reverse: &ReverseIndex) -> MultiDfsOutcome {
        let Some(target) = graph.id_of(self.target) else {
            return MultiDfsOutcome::default();
        };
        let roots = reverse.pairs_for(target);
        if roots.is_empty() || self.max_paths == 0 {
            return MultiDfsOutcome::default();
        }

        let internal_limit = self.max_paths.saturating_mul(self.config.oversample);
        let collected: Mutex<Collected> =
            Mutex::new(Collected { paths: Vec::new(), hashes: HashSet::new() });
        let cancel = AtomicBool::new(false);
        let nodes = AtomicUsize::new(0);

        roots.par_iter().for_each(|&root| {
            Worker {
                graph,
                reverse,
                target,
                config: &self.config,
                collected: &collected,
                cancel: &cancel,
                nodes: &nodes,
                internal_limit,
            }
            .run(root);
        });

        let collected = match collected.into_inner() {
            Ok(inner) => inner,
            Err(poisoned) => poisoned.into_inner(),
        };
        let steps = filter_similar(graph, collected.paths, &self.config, self.max_paths);

        MultiDfsOutcome { steps, nodes_visited: nodes.load(Ordering::Relaxed) }
    }
}

/// Output shared between workers.
struct Collected {
    paths: Vec<Vec<Triple>>,
    hashes: HashSet<u64>,
}

/// One choice point: which pair of `id`'s recipes is currently applied.
struct Frame {
    id: ElementId,
    cursor: usize,
    pushed: [Option<ElementId>; 2],
}

/// One root-pair exploration.
struct Worker<'w> {
    graph: &'w IndexedGraph,
    reverse: &'w ReverseIndex,
    target: ElementId,
    config: &'w ParallelDfsConfig,
    collected: &'w Mutex<Collected>,
    cancel: &'w AtomicBool,
    nodes: &'w AtomicUsize,
    internal_limit: usize,
}

impl Worker<'_> {
    fn run(&self, root: IngredientPair) {
        let limit = self.config.revisit_limit;
        let mut visits = vec![0u8; self.graph.element_count()];
        // The target may not be re-derived inside its own tree.
        visits[self.target.as_usize()] = limit;

        if !self.pair_fits(root, &visits) {
            return;
        }

        let mut path: Vec<Triple> = vec![(root.a, root.b, self.target)];
        let mut agenda: Vec<ElementId> = Vec::new();
        for member in [root.b, root.a] {
            if !self.graph.is_base(member) {
                visits[member.as_usize()] += 1;
                agenda.push(member);
            }
        }

        let mut stack: Vec<Frame> = Vec::new();
        let mut budget = self.config.step_budget;

        loop {
            if self.cancel.load(Ordering::Relaxed) || budget == 0 {
                return;
            }
            budget -= 1;

            match agenda.pop() {
                Some(id) => {
                    self.nodes.fetch_add(1, Ordering::Relaxed);
                    let mut frame = Frame { id, cursor: 0, pushed: [None, None] };
                    if self.advance(&mut frame, &mut path, &mut agenda, &mut visits) {
                        stack.push(frame);
                    } else {
                        // No viable recipe for this product: rewind the
                        // decision that introduced it.
                        agenda.push(id);
                        if !self.backtrack(&mut stack, &mut path, &mut agenda, &mut visits) {
                            return;
                        }
                    }
                }
                None => {
                    self.submit(&path);
                    if !self.backtrack(&mut stack, &mut path, &mut agenda, &mut visits) {
                        return;
                    }
                }
            }
        }
    }

    /// Apply the next viable pair of `frame.id`, if any.
    fn advance(
        &self,
        frame: &mut Frame,
        path: &mut Vec<Triple>,
        agenda: &mut Vec<ElementId>,
        visits: &mut [u8],
    ) -> bool {
        let pairs = self.reverse.pairs_for(frame.id);
        while frame.cursor < pairs.len() {
            let pair = pairs[frame.cursor];
            frame.cursor += 1;
            if !self.pair_fits(pair, visits) {
                continue;
            }

            path.push((pair.a, pair.b, frame.id));
            frame.pushed = [None, None];
            let mut slot = 0;
            for member in [pair.b, pair.a] {
                if !self.graph.is_base(member) {
                    visits[member.as_usize()] += 1;
                    agenda.push(member);
                    frame.pushed[slot] = Some(member);
                    slot += 1;
                }
            }
            return true;
        }
        false
    }

    /// Undo the top frame's choice and advance it; pop exhausted frames.
    ///
    /// Returns `false` once the stack is empty: this root is exhausted.
    fn backtrack(
        &self,
        stack: &mut Vec<Frame>,
        path: &mut Vec<Triple>,
        agenda: &mut Vec<ElementId>,
        visits: &mut [u8],
    ) -> bool {
        while let Some(top) = stack.last_mut() {
            // Pushed members sit on top of the agenda in push order; all
            // deeper frames have already restored theirs.
            for slot in top.pushed.iter_mut().rev() {
                if let Some(member) = slot.take() {
                    agenda.pop();
                    visits[member.as_usize()] -= 1;
                }
            }
            path.pop();

            if self.advance(top, path, agenda, visits) {
                return true;
            }
            if let Some(frame) = stack.pop() {
                agenda.push(frame.id);
            }
        }
        false
    }

    /// Check the revisit policy for applying `pair`.
    fn pair_fits(&self, pair: IngredientPair, visits: &[u8]) -> bool {
        let limit = self.config.revisit_limit;
        if pair.a == pair.b {
            return self.graph.is_base(pair.a) || visits[pair.a.as_usize()] + 2 <= limit;
        }
        for member in [pair.a, pair.b] {
            if !self.graph.is_base(member) && visits[member.as_usize()] + 1 > limit {
                return false;
            }
        }
        true
    }

    /// Record one completed resolution, deduplicated by path hash.
    fn submit(&self, path: &[Triple]) {
        let hash = fnv1a64(path);
        let mut guard = match self.collected.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        if guard.paths.len() < self.internal_limit && guard.hashes.insert(hash) {
            guard.paths.push(path.to_vec());
        }
        if guard.paths.len() >= self.internal_limit {
            self.cancel.store(true, Ordering::Relaxed);
        }
    }
}

/// FNV-1a 64-bit over the flattened triple sequence.
fn fnv1a64(path: &[Triple]) -> u64 {
    const OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
    const PRIME: u64 = 0x0000_0100_0000_01b3;

    let mut hash = OFFSET;
    for &(a, b, product) in path {
        for id in [a, b, product] {
            for byte in id.as_u32().to_le_bytes() {
                hash ^= u64::from(byte);
                hash = hash.wrapping_mul(PRIME);
            }
        }
    }
    hash
}

/// Drop paths whose ingredient sets are near-identical to a kept one, then
/// truncate and convert to the outward form.
fn filter_similar(
    graph: &IndexedGraph,
    paths: Vec<Vec<Triple>>,
    config: &ParallelDfsConfig,
    max_paths: usize,
) -> Vec<RecipeStep> {
    let mut kept: Vec<(HashSet<ElementId>, Vec<Triple>)> = Vec::new();

    for path in paths {
        if kept.len() >= max_paths {
            break;
        }
        let ingredients: HashSet<ElementId> = path
            .iter()
            .flat_map(|&(a, b, product)| [a, b, product])
            .collect();
        let near_duplicate = kept
            .iter()
            .any(|(other, _)| jaccard(&ingredients, other) >= config.jaccard_threshold);
        if !near_duplicate {
            kept.push((ingredients, path));
        }
    }

    kept.into_iter().map(|(_, path)| step_from_triples(graph, &path)).collect()
}

fn jaccard(a: &HashSet<ElementId>, b: &HashSet<ElementId>) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    let intersection = a.intersection(b).count();
    let union = a.len() + b.len() - intersection;
    intersection as f64 / union as f64
}

/// Convert a resolution into a [`RecipeStep`], root reaction first.
fn step_from_triples(graph: &IndexedGraph, path: &[Triple]) -> RecipeStep {
    let reactions: Vec<Reaction> = path
        .iter()
        .map(|&(a, b, product)| {
            Reaction(
                graph.name_of(a).to_owned(),
                graph.name_of(b).to_owned(),
                graph.name_of(product).to_owned(),
            )
        })
        .collect();
    let Some(&(a, b, _)) = path.first() else {
        return RecipeStep::default();
    };
    RecipeStep::new(graph.name_of(a), graph.name_of(b)).with_path(reactions)
}
