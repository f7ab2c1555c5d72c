//! Multi-path forward BFS: enumerating the k-th distinct path.
//!
//! Unlike the single-path search, this enumerator distinguishes *paths*,
//! not products: two paths are distinct iff their canonical triple
//! sequences differ. Expansion is level-synchronous so the rank order of
//! hits is reproducible:
//!
//! - a partner may only be consumed once it was reached at an earlier or
//!   equal level
//! - every candidate path is hashed into a bounded signature cache; only
//!   unseen signatures enter the next level
//! - between levels the next level is sorted and truncated to a fixed
//!   fan-out bound, then the reachable set is updated from it
//!
//! Per-level expansion is split across worker threads; one mutex guards the
//! next-level accumulator together with the signature cache. The cache is a
//! fixed-capacity FIFO, trading perfect dedup for bounded memory.

use std::collections::{HashSet, VecDeque};
use std::sync::Mutex;
use std::time::{Duration, Instant};

use athanor_core::{Reaction, RecipeStep};
use rayon::prelude::*;

use crate::index::{ElementId, IndexedGraph};

/// A canonical reaction triple: `(min(a, b), max(a, b), product)`.
type Triple = (ElementId, ElementId, ElementId);

/// Policy bounds for the enumerator.
#[derive(Debug, Clone)]
pub struct EnumeratorConfig {
    /// Maximum path length in reactions.
    pub max_depth: usize,
    /// Per-level state cap after sorting.
    pub max_level_size: usize,
    /// Capacity of the FIFO path-signature cache.
    pub cache_capacity: usize,
    /// Wall-clock budget for one call, clamped to 2s..=10s.
    pub deadline: Duration,
}

impl Default for EnumeratorConfig {
    fn default() -> Self {
        Self {
            max_depth: 30,
            max_level_size: 10_000,
            cache_capacity: 10_000,
            deadline: Duration::from_secs(10),
        }
    }
}

impl EnumeratorConfig {
    /// Set the wall-clock budget; values outside 2s..=10s are clamped.
    #[must_use]
    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = deadline.clamp(Duration::from_secs(2), Duration::from_secs(10));
        self
    }
}

/// One page of enumerated paths.
#[derive(Debug, Clone, Default)]
pub struct PathBatch {
    /// Paths ranked `[skip, skip + limit)`, each with its full reaction
    /// sequence.
    pub steps: Vec<RecipeStep>,
    /// States expanded across all levels.
    pub nodes_visited: usize,
    /// True when the search ran dry: higher ranks will stay empty.
    pub exhausted: bool,
}

/// Level-synchronous distinct-path enumerator.
///
/// # Example
///
/// ```ignore
/// use athanor_graph::traversal::PathEnumerator;
///
/// // Second page of four paths to Brick.
/// let batch = PathEnumerator::new("Brick").skip(4).limit(4).execute(&graph);
/// for step in &batch.steps {
///     println!("{} reactions", step.path.as_ref().map_or(0, Vec::len));
/// }
/// ```
pub struct PathEnumerator<'a> {
    target: &'a str,
    skip: usize,
    limit: usize,
    config: EnumeratorConfig,
}

/// A partial path: where it currently stands and how it got there.
#[derive(Debug, Clone)]
struct PathState {
    element: ElementId,
    path: Vec<Triple>,
}

impl<'a> PathEnumerator<'a> {
    /// Create an enumerator for the given target name.
    pub fn new(target: &'a str) -> Self {
        Self { target, skip: 0, limit: 1, config: EnumeratorConfig::default() }
    }

    /// Skip the first `skip` ranks.
    #[must_use]
    pub const fn skip(mut self, skip: usize) -> Self {
        self.skip = skip;
        self
    }

    /// Return at most `limit` paths.
    #[must_use]
    pub const fn limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    /// Override the policy bounds.
    #[must_use]
    pub fn with_config(mut self, config: EnumeratorConfig) -> Self {
        self.config = config;
        self
    }

    /// Enumerate paths ranked `[skip, skip + limit)`.
    #[must_use]
    pub fn execute(self, graph: &IndexedGraph) -> PathBatch {
        let Some(target) = graph.id_of(self.target) else {
            return PathBatch { exhausted: true, ..PathBatch::default() };
        };
        let wanted = self.skip + self.limit;
        let deadline = Instant::now() + self.config.deadline;

        let mut reached = vec![false; graph.element_count()];
        let mut level: Vec<PathState> = graph
            .base_ids()
            .iter()
            .map(|&base| {
                reached[base.as_usize()] = true;
                PathState { element: base, path: Vec::new() }
            })
            .collect();

        let shared = Mutex::new(LevelShared {
            next: Vec::new(),
            cache: SignatureCache::new(self.config.cache_capacity),
        });

        let mut hits: Vec<Vec<Triple>> = Vec::new();
        let mut nodes_visited = 0;
        let mut exhausted = false;

        for _depth in 0..=self.config.max_depth {
            if level.is_empty() {
                exhausted = true;
                break;
            }

            // Hits surface in level order, which the inter-level sort makes
            // deterministic.
            for state in &level {
                if state.element == target {
                    hits.push(state.path.clone());
                }
            }
            if hits.len() >= wanted || Instant::now() >= deadline {
                break;
            }

            nodes_visited += level.len();

            level.par_iter().for_each(|state| {
                if state.element == target || Instant::now() >= deadline {
                    return;
                }
                for edge in graph.neighbors(state.element) {
                    if !reached[edge.partner.as_usize()] {
                        continue;
                    }
                    let triple = canonical(state.element, edge.partner, edge.product);
                    let signature = signature_with(&state.path, triple);

                    let mut guard = match shared.lock() {
                        Ok(guard) => guard,
                        Err(poisoned) => poisoned.into_inner(),
                    };
                    if guard.cache.insert(signature) {
                        let mut path = state.path.clone();
                        path.push(triple);
                        guard.next.push(PathState { element: edge.product, path });
                    }
                }
            });

            let mut next = {
                let mut guard = match shared.lock() {
                    Ok(guard) => guard,
                    Err(poisoned) => poisoned.into_inner(),
                };
                std::mem::take(&mut guard.next)
            };

            next.sort_unstable_by(|x, y| {
                (x.element, x.path.len(), &x.path).cmp(&(y.element, y.path.len(), &y.path))
            });
            next.truncate(self.config.max_level_size);
            for state in &next {
                reached[state.element.as_usize()] = true;
            }
            level = next;
        }

        let steps = hits
            .into_iter()
            .skip(self.skip)
            .take(self.limit)
            .map(|path| step_from_path(graph, &path))
            .collect();

        PathBatch { steps, nodes_visited, exhausted }
    }
}

/// State behind the per-level mutex: accumulator plus signature cache.
struct LevelShared {
    next: Vec<PathState>,
    cache: SignatureCache,
}

/// Normalize a reaction into its canonical triple.
#[inline]
fn canonical(u: ElementId, partner: ElementId, product: ElementId) -> Triple {
    if u <= partner {
        (u, partner, product)
    } else {
        (partner, u, product)
    }
}

/// Canonical signature of `path` extended by `next`.
fn signature_with(path: &[Triple], next: Triple) -> String {
    let mut out = String::with_capacity((path.len() + 1) * 12);
    for &(a, b, product) in path.iter().chain(std::iter::once(&next)) {
        if !out.is_empty() {
            out.push('|');
        }
        out.push_str(&format!("{}-{}-{}", a.as_u32(), b.as_u32(), product.as_u32()));
    }
    out
}

/// Convert a completed path into the outward [`RecipeStep`] form.
fn step_from_path(graph: &IndexedGraph, path: &[Triple]) -> RecipeStep {
    let Some(&(a, b, _)) = path.last() else {
        return RecipeStep::default();
    };
    let reactions = path
        .iter()
        .map(|&(a, b, product)| {
            Reaction(
                graph.name_of(a).to_owned(),
                graph.name_of(b).to_owned(),
                graph.name_of(product).to_owned(),
            )
        })
        .collect();
    RecipeStep::new(graph.name_of(a), graph.name_of(b)).with_path(reactions)
}

/// Fixed-capacity FIFO set of path signatures.
struct SignatureCache {
    set: HashSet<String>,
    order: VecDeque<String>,
    capacity: usize,
}

impl SignatureCache {
    fn new(capacity: usize) -> Self {
        Self { set: HashSet::with_capacity(capacity), order: VecDeque::new(), capacity }
    }

    /// Insert a signature; returns `false` if it was already present.
    fn insert(&mut self, signature: String) -> bool {
        if self.set.contains(&signature) {
            return false;
        }
        if self.order.len() >= self.capacity {
            if let Some(evicted) = self.order.pop_front() {
                self.set.remove(&evicted);
            }
        }
        self.order.push_back(signature.clone());
        self.set.insert(signature);
        true
    }
}
