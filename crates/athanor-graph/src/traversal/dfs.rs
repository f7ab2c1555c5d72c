//! Single-path target-to-base DFS with memoized reachability.
//!
//! Works backwards through the reverse index: an element can reach base if
//! some ingredient pair exists whose two members both can. Pairs are tried
//! cheapest tier sum first, so the chosen synthesis greedily prefers
//! low-tier ingredients; it is not guaranteed shortest. A memo table caches
//! reachability per element and an on-path set breaks recipe cycles.
//!
//! The first attempt runs with a depth cap of 1,000; on failure a single
//! retry runs from scratch at 10,000.

use athanor_core::{RecipeMap, RecipeStep};

use crate::index::{ElementId, IndexedGraph, IngredientPair, ReverseIndex};

const FIRST_DEPTH_LIMIT: usize = 1_000;
const RETRY_DEPTH_LIMIT: usize = 10_000;

/// Result of a single-path DFS.
#[derive(Debug, Clone, Default)]
pub struct DfsOutcome {
    /// For the target and every intermediate product: the chosen recipe.
    pub recipes: RecipeMap,
    /// Number of elements whose reachability was evaluated.
    pub nodes_visited: usize,
}

/// Recursive target-to-base synthesis search.
pub struct DfsSynthesis<'a> {
    target: &'a str,
}

impl<'a> DfsSynthesis<'a> {
    /// Create a search for the given target name.
    pub const fn new(target: &'a str) -> Self {
        Self { target }
    }

    /// Run the search.
    ///
    /// Unknown targets and targets with no acyclic synthesis produce an
    /// empty recipe map; no error is surfaced.
    #[must_use]
    pub fn execute(self, graph: &IndexedGraph, reverse: &ReverseIndex) -> DfsOutcome {
        let Some(target) = graph.id_of(self.target) else {
            return DfsOutcome::default();
        };

        let mut nodes_visited = 0;
        for depth_limit in [FIRST_DEPTH_LIMIT, RETRY_DEPTH_LIMIT] {
            let mut walk = Walk::new(graph, reverse, depth_limit);
            let found = walk.find_path(target, 0);
            nodes_visited += walk.nodes_visited;
            if found {
                return DfsOutcome { recipes: walk.into_recipes(), nodes_visited };
            }
        }

        DfsOutcome { recipes: RecipeMap::new(), nodes_visited }
    }
}

/// One attempt at a given depth limit.
struct Walk<'g> {
    graph: &'g IndexedGraph,
    reverse: &'g ReverseIndex,
    depth_limit: usize,
    can_reach_base: Vec<Option<bool>>,
    on_path: Vec<bool>,
    chosen: Vec<Option<IngredientPair>>,
    nodes_visited: usize,
}

impl<'g> Walk<'g> {
    fn new(graph: &'g IndexedGraph, reverse: &'g ReverseIndex, depth_limit: usize) -> Self {
        let count = graph.element_count();
        let mut can_reach_base = vec![None; count];
        for base in graph.base_ids() {
            can_reach_base[base.as_usize()] = Some(true);
        }
        Self {
            graph,
            reverse,
            depth_limit,
            can_reach_base,
            on_path: vec![false; count],
            chosen: vec![None; count],
            nodes_visited: 0,
        }
    }

    fn find_path(&mut self, id: ElementId, depth: usize) -> bool {
        if depth > self.depth_limit {
            return false;
        }
        if let Some(memo) = self.can_reach_base[id.as_usize()] {
            return memo;
        }
        if self.on_path[id.as_usize()] {
            self.can_reach_base[id.as_usize()] = Some(false);
            return false;
        }

        self.nodes_visited += 1;
        self.on_path[id.as_usize()] = true;

        for i in 0..self.reverse.pairs_for(id).len() {
            let pair = self.reverse.pairs_for(id)[i];
            if self.find_path(pair.a, depth + 1) && self.find_path(pair.b, depth + 1) {
                self.chosen[id.as_usize()] = Some(pair);
                self.on_path[id.as_usize()] = false;
                self.can_reach_base[id.as_usize()] = Some(true);
                return true;
            }
        }

        self.on_path[id.as_usize()] = false;
        self.can_reach_base[id.as_usize()] = Some(false);
        false
    }

    fn into_recipes(self) -> RecipeMap {
        let mut recipes = RecipeMap::new();
        for (index, pair) in self.chosen.iter().enumerate() {
            let Some(pair) = pair else { continue };
            let product = ElementId::new(index as u32);
            recipes.insert(
                self.graph.name_of(product).to_owned(),
                RecipeStep::new(self.graph.name_of(pair.a), self.graph.name_of(pair.b)),
            );
        }
        recipes
    }
}
