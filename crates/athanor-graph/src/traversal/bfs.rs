//! Single-path forward BFS from the base elements.
//!
//! Classic shortest-discovery search: the queue is seeded with the four
//! bases, and an edge `u + partner -> product` is taken only once `partner`
//! has itself been seen. The first combination that discovers a product is
//! recorded, which makes the reconstructed tree a shortest-depth synthesis.
//!
//! # Example
//!
//! ```ignore
//! use athanor_graph::traversal::ForwardBfs;
//!
//! let outcome = ForwardBfs::new("Brick").with_trace().execute(&graph);
//! println!("visited {} nodes", outcome.nodes_visited);
//! for (product, step) in &outcome.recipes {
//!     println!("{product} = {} + {}", step.combo.a, step.combo.b);
//! }
//! ```

use std::collections::{BTreeMap, HashMap, VecDeque};

use athanor_core::{IngredientCombo, RecipeMap, RecipeStep};

use super::SearchStep;
use crate::index::{ElementId, IndexedGraph};

/// Result of a single-path forward BFS.
#[derive(Debug, Clone, Default)]
pub struct BfsOutcome {
    /// First-discovered recipe for every element reached before the halt.
    pub recipes: RecipeMap,
    /// Step-by-step trace, empty unless tracing was requested.
    pub steps: Vec<SearchStep>,
    /// Number of dequeues performed.
    pub nodes_visited: usize,
}

/// Forward BFS configuration and executor.
pub struct ForwardBfs<'a> {
    target: &'a str,
    trace: bool,
}

impl<'a> ForwardBfs<'a> {
    /// Create a search for the given target name.
    pub const fn new(target: &'a str) -> Self {
        Self { target, trace: false }
    }

    /// Record a [`SearchStep`] snapshot per dequeue.
    #[must_use]
    pub const fn with_trace(mut self) -> Self {
        self.trace = true;
        self
    }

    /// Run the search.
    ///
    /// An unknown target yields an empty recipe map once the queue is
    /// exhausted; no error is surfaced.
    #[must_use]
    pub fn execute(self, graph: &IndexedGraph) -> BfsOutcome {
        let target = graph.id_of(self.target);

        let mut queue: VecDeque<ElementId> = VecDeque::new();
        let mut seen = vec![false; graph.element_count()];
        let mut seen_order: Vec<ElementId> = Vec::new();
        let mut prev: HashMap<ElementId, (ElementId, ElementId)> = HashMap::new();

        for base in graph.base_ids() {
            seen[base.as_usize()] = true;
            seen_order.push(base);
            queue.push_back(base);
        }

        let mut trace = Tracer::new(self.trace);
        trace.snapshot(graph, None, &queue, &seen_order, &prev, false);

        let mut nodes_visited = 0;
        while let Some(current) = queue.pop_front() {
            nodes_visited += 1;

            if Some(current) == target {
                trace.snapshot(graph, Some(current), &queue, &seen_order, &prev, true);
                break;
            }
            trace.snapshot(graph, Some(current), &queue, &seen_order, &prev, false);

            for edge in graph.neighbors(current) {
                if seen[edge.partner.as_usize()] && !seen[edge.product.as_usize()] {
                    seen[edge.product.as_usize()] = true;
                    seen_order.push(edge.product);
                    prev.insert(edge.product, (current, edge.partner));
                    queue.push_back(edge.product);

                    if Some(edge.product) == target {
                        trace.snapshot(graph, Some(current), &queue, &seen_order, &prev, true);
                    }
                }
            }
        }

        BfsOutcome {
            recipes: recipes_from_prev(graph, &prev),
            steps: trace.steps,
            nodes_visited,
        }
    }
}

/// Convert an ID-level discovery map to the name-keyed recipe map.
fn recipes_from_prev(
    graph: &IndexedGraph,
    prev: &HashMap<ElementId, (ElementId, ElementId)>,
) -> RecipeMap {
    prev.iter()
        .map(|(&product, &(parent, partner))| {
            (
                graph.name_of(product).to_owned(),
                RecipeStep::new(graph.name_of(parent), graph.name_of(partner)),
            )
        })
        .collect()
}

/// Trace recorder; a no-op when tracing is disabled.
struct Tracer {
    enabled: bool,
    steps: Vec<SearchStep>,
}

impl Tracer {
    const fn new(enabled: bool) -> Self {
        Self { enabled, steps: Vec::new() }
    }

    fn snapshot(
        &mut self,
        graph: &IndexedGraph,
        current: Option<ElementId>,
        queue: &VecDeque<ElementId>,
        seen_order: &[ElementId],
        prev: &HashMap<ElementId, (ElementId, ElementId)>,
        found_target: bool,
    ) {
        if !self.enabled {
            return;
        }

        let mut discovered = BTreeMap::new();
        for (&product, &(parent, partner)) in prev {
            discovered.insert(
                graph.name_of(product).to_owned(),
                IngredientCombo::new(graph.name_of(parent), graph.name_of(partner)),
            );
        }

        self.steps.push(SearchStep {
            current_id: current.map_or(-1, |id| i64::from(id.as_u32())),
            current_name: current.map_or_else(String::new, |id| graph.name_of(id).to_owned()),
            queue_ids: queue.iter().map(|id| id.as_u32()).collect(),
            queue_names: queue.iter().map(|id| graph.name_of(*id).to_owned()).collect(),
            seen_ids: seen_order.iter().map(|id| id.as_u32()).collect(),
            seen_names: seen_order.iter().map(|id| graph.name_of(*id).to_owned()).collect(),
            discovered,
            step_number: self.steps.len(),
            found_target,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::TierIndex;
    use athanor_core::{Catalog, Element, Tier};

    fn graph() -> IndexedGraph {
        let mut catalog = Catalog {
            tiers: vec![
                Tier::new("1").with_element(Element::new("Mud").with_recipe("Water", "Earth")),
                Tier::new("2").with_element(Element::new("Plant").with_recipe("Mud", "Air")),
            ],
        };
        catalog.sort_tiers();
        IndexedGraph::build(&catalog, &TierIndex::from_catalog(&catalog))
    }

    #[test]
    fn discovers_shortest_recipe() {
        let outcome = ForwardBfs::new("Plant").execute(&graph());
        let plant = &outcome.recipes["Plant"];
        let mut combo = [plant.combo.a.as_str(), plant.combo.b.as_str()];
        combo.sort_unstable();
        assert_eq!(combo, ["Air", "Mud"]);
        assert!(outcome.recipes.contains_key("Mud"));
        assert!(outcome.nodes_visited >= 1);
    }

    #[test]
    fn unknown_target_exhausts_and_returns_discoveries() {
        let outcome = ForwardBfs::new("DoesNotExist").execute(&graph());
        // Everything reachable was discovered along the way.
        assert!(outcome.recipes.contains_key("Mud"));
        assert!(outcome.recipes.contains_key("Plant"));
        // Bases plus both products were dequeued.
        assert_eq!(outcome.nodes_visited, 6);
    }

    #[test]
    fn trace_has_initial_and_discovery_snapshots() {
        let outcome = ForwardBfs::new("Mud").with_trace().execute(&graph());
        let first = &outcome.steps[0];
        assert_eq!(first.current_id, -1);
        assert_eq!(first.queue_names.len(), 4);

        let last = outcome.steps.iter().rev().find(|s| s.found_target).expect("discovery step");
        assert!(last.discovered.contains_key("Mud"));
    }

    #[test]
    fn trace_disabled_by_default() {
        let outcome = ForwardBfs::new("Mud").execute(&graph());
        assert!(outcome.steps.is_empty());
    }
}
