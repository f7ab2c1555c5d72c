//! The engine handle and query coordinator.
//!
//! An [`Engine`] owns everything built from one catalog snapshot: the
//! sorted catalog itself, the tier index, the indexed graph, and (lazily)
//! the reverse index. All of it is immutable after construction, so the
//! engine is freely shared across threads; rebuilds swap in a whole new
//! engine instead of mutating this one.

use std::path::Path;
use std::sync::OnceLock;

use athanor_core::{is_base_element, Catalog, RecipeNode};
use athanor_graph::traversal::{DfsSynthesis, ForwardBfs, ParallelDfs, PathEnumerator};
use athanor_graph::tree::{dedupe_trees, TreeBuilder, UnifiedTree};
use athanor_graph::{IndexedGraph, ReverseIndex, TierIndex};
use tracing::debug;

use crate::error::Result;
use crate::query::{Algorithm, FindQuery, FindResult, TreeReply};

/// Page size for multi-path BFS pagination.
const BFS_BATCH: usize = 4;
/// Pagination stops after this many skipped ranks.
const BFS_SKIP_CAP: usize = 20;

/// Immutable search engine over one catalog snapshot.
pub struct Engine {
    catalog: Catalog,
    graph: IndexedGraph,
    reverse: OnceLock<ReverseIndex>,
}

impl Engine {
    /// Build an engine from a catalog. Tiers are sorted as part of
    /// construction.
    #[must_use]
    pub fn new(mut catalog: Catalog) -> Self {
        catalog.sort_tiers();
        let tiers = TierIndex::from_catalog(&catalog);
        let graph = IndexedGraph::build(&catalog, &tiers);
        debug!(elements = graph.element_count(), "indexed catalog");
        Self { catalog, graph, reverse: OnceLock::new() }
    }

    /// Load a catalog file and build an engine from it.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        Ok(Self::new(Catalog::load(path)?))
    }

    /// The sorted catalog this engine was built from.
    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// The indexed graph.
    #[must_use]
    pub fn graph(&self) -> &IndexedGraph {
        &self.graph
    }

    /// The reverse index, built on first use.
    fn reverse(&self) -> &ReverseIndex {
        self.reverse.get_or_init(|| ReverseIndex::build(&self.graph))
    }

    /// Answer a recipe-synthesis query.
    ///
    /// Unknown targets produce a bare leaf (single) or an empty list
    /// (multi); no error is surfaced.
    #[must_use]
    pub fn find(&self, query: &FindQuery) -> FindResult {
        debug!(
            element = %query.target,
            algorithm = %query.algorithm,
            multi = query.multi,
            max_paths = query.max_paths,
            "dispatching find"
        );

        match (query.algorithm, query.multi) {
            (Algorithm::Dfs, false) => self.dfs_single(&query.target),
            (Algorithm::Dfs, true) => self.dfs_multi(&query.target, query.max_paths),
            (Algorithm::Bfs, false) => self.bfs_single(&query.target, true),
            (Algorithm::Bfs, true) => self.bfs_multi(&query.target, query.max_paths),
            // The bidirectional search is advertised but not implemented;
            // it mirrors the single-path BFS and yields nothing in multi.
            (Algorithm::Bidirectional, false) => self.bfs_single(&query.target, false),
            (Algorithm::Bidirectional, true) => FindResult {
                tree: TreeReply::Many(Vec::new()),
                nodes_visited: 0,
                search_steps: Vec::new(),
            },
        }
    }

    /// Build the all-recipes atlas tree for an element.
    #[must_use]
    pub fn atlas(&self, name: &str) -> RecipeNode {
        UnifiedTree::new(&self.graph, self.reverse()).build(name)
    }

    /// A base element needs no search: it is its own one-node tree.
    fn base_shortcut(&self, target: &str, multi: bool) -> Option<FindResult> {
        if !is_base_element(target) {
            return None;
        }
        let leaf = RecipeNode::leaf(target);
        Some(FindResult {
            tree: if multi { TreeReply::Many(vec![leaf]) } else { TreeReply::Single(leaf) },
            nodes_visited: 1,
            search_steps: Vec::new(),
        })
    }

    fn bfs_single(&self, target: &str, trace: bool) -> FindResult {
        if let Some(result) = self.base_shortcut(target, false) {
            return result;
        }

        let mut search = ForwardBfs::new(target);
        if trace {
            search = search.with_trace();
        }
        let outcome = search.execute(&self.graph);
        let tree = TreeBuilder::new(&self.graph).build(target, &outcome.recipes);

        FindResult {
            tree: TreeReply::Single(tree),
            nodes_visited: outcome.nodes_visited,
            search_steps: outcome.steps,
        }
    }

    fn bfs_multi(&self, target: &str, max_paths: usize) -> FindResult {
        if let Some(result) = self.base_shortcut(target, true) {
            return result;
        }

        let builder = TreeBuilder::new(&self.graph);
        let mut trees: Vec<RecipeNode> = Vec::new();
        let mut nodes_visited = 0;

        // The shortest path falls out of the single-path search; the
        // enumerator's rank 0 is expected to coincide and deduplication
        // collapses the duplicate.
        let first = ForwardBfs::new(target).execute(&self.graph);
        nodes_visited += first.nodes_visited;
        if first.recipes.contains_key(target) {
            trees.push(builder.build(target, &first.recipes));
        }

        let mut skip = 0;
        while trees.len() < max_paths * 2 && skip < BFS_SKIP_CAP {
            let batch =
                PathEnumerator::new(target).skip(skip).limit(BFS_BATCH).execute(&self.graph);
            nodes_visited += batch.nodes_visited;
            if batch.steps.is_empty() {
                break;
            }
            skip += batch.steps.len();
            for step in &batch.steps {
                trees.push(builder.build(target, &step.path_to_map()));
            }
            if batch.exhausted {
                break;
            }
        }

        let mut trees = dedupe_trees(trees);
        trees.truncate(max_paths);

        FindResult { tree: TreeReply::Many(trees), nodes_visited, search_steps: Vec::new() }
    }

    fn dfs_single(&self, target: &str) -> FindResult {
        if let Some(result) = self.base_shortcut(target, false) {
            return result;
        }

        let outcome = DfsSynthesis::new(target).execute(&self.graph, self.reverse());
        let tree = TreeBuilder::new(&self.graph).build(target, &outcome.recipes);

        FindResult {
            tree: TreeReply::Single(tree),
            nodes_visited: outcome.nodes_visited,
            search_steps: Vec::new(),
        }
    }

    fn dfs_multi(&self, target: &str, max_paths: usize) -> FindResult {
        if let Some(result) = self.base_shortcut(target, true) {
            return result;
        }

        let outcome = ParallelDfs::new(target)
            .with_max_paths(max_paths * 2)
            .execute(&self.graph, self.reverse());

        let builder = TreeBuilder::new(&self.graph);
        let trees: Vec<RecipeNode> =
            outcome.steps.iter().map(|step| builder.build(target, &step.path_to_map())).collect();

        let mut trees = dedupe_trees(trees);
        trees.truncate(max_paths);

        FindResult {
            tree: TreeReply::Many(trees),
            nodes_visited: outcome.nodes_visited,
            search_steps: Vec::new(),
        }
    }
}
