//! The unified recipe tree: every way to make an element, in one tree.
//!
//! Where the query trees of [`TreeBuilder`] follow a single chosen recipe
//! per product, the unified tree attaches one combiner child per known
//! recipe, recursing through the reverse index. It backs the atlas view.
//!
//! [`TreeBuilder`]: super::TreeBuilder

use std::collections::HashSet;

use athanor_core::RecipeNode;

use crate::index::{ElementId, IndexedGraph, ReverseIndex};

/// Expansion stops below this depth to keep atlas payloads bounded.
const UNIFIED_DEPTH_LIMIT: usize = 30;

/// Builds all-recipes trees against a fixed graph and reverse index.
pub struct UnifiedTree<'a> {
    graph: &'a IndexedGraph,
    reverse: &'a ReverseIndex,
}

impl<'a> UnifiedTree<'a> {
    /// Create a builder over the given indexes.
    pub const fn new(graph: &'a IndexedGraph, reverse: &'a ReverseIndex) -> Self {
        Self { graph, reverse }
    }

    /// Build the unified tree for `name`.
    ///
    /// Unknown names yield a bare leaf.
    #[must_use]
    pub fn build(&self, name: &str) -> RecipeNode {
        match self.graph.id_of(name) {
            Some(id) => self.build_node(id, &mut HashSet::new(), 0),
            None => RecipeNode::leaf(name),
        }
    }

    fn build_node(
        &self,
        id: ElementId,
        visited: &mut HashSet<ElementId>,
        depth: usize,
    ) -> RecipeNode {
        let name = self.graph.name_of(id);
        if self.graph.is_base(id) || depth >= UNIFIED_DEPTH_LIMIT || visited.contains(&id) {
            return RecipeNode::leaf(name);
        }
        visited.insert(id);

        let mut node = RecipeNode::leaf(name);
        for pair in self.reverse.pairs_for(id) {
            let left = self.build_node(pair.a, visited, depth + 1);
            let right = self.build_node(pair.b, visited, depth + 1);
            node.children.push(RecipeNode::branch(format!("{name} Recipe"), left, right));
        }

        visited.remove(&id);
        node
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::TierIndex;
    use athanor_core::{Catalog, Element, Tier};

    fn indexes() -> (IndexedGraph, ReverseIndex) {
        let mut catalog = Catalog {
            tiers: vec![
                Tier::new("1").with_element(Element::new("Mud").with_recipe("Water", "Earth")),
                Tier::new("2").with_element(
                    Element::new("Brick").with_recipe("Mud", "Fire").with_recipe("Mud", "Air"),
                ),
            ],
        };
        catalog.sort_tiers();
        let graph = IndexedGraph::build(&catalog, &TierIndex::from_catalog(&catalog));
        let reverse = ReverseIndex::build(&graph);
        (graph, reverse)
    }

    #[test]
    fn one_combiner_per_recipe() {
        let (graph, reverse) = indexes();
        let tree = UnifiedTree::new(&graph, &reverse).build("Brick");

        assert_eq!(tree.children.len(), 2);
        assert!(tree.children.iter().all(|c| c.name == "Brick Recipe"));
        assert!(tree.children.iter().all(|c| c.children.len() == 2));
    }

    #[test]
    fn bases_and_unknowns_are_leaves() {
        let (graph, reverse) = indexes();
        let unified = UnifiedTree::new(&graph, &reverse);
        assert!(unified.build("Water").is_leaf());
        assert!(unified.build("Unobtainium").is_leaf());
    }
}
