//! Recipe tree reconstruction from a flat recipe map.
//!
//! Multi-path searches return maps that cover only the products on the
//! selected path; an interior ingredient can be non-base yet absent from
//! the map. For those the builder runs a one-shot forward BFS rooted at the
//! missing name and continues from its map. Elements that still fail to
//! resolve become leaves, as do cycles and over-deep branches.

use std::collections::HashSet;

use athanor_core::{is_base_element, RecipeMap, RecipeNode};

use crate::index::IndexedGraph;
use crate::traversal::ForwardBfs;

/// Depth at which tree construction stops and emits a leaf.
pub const TREE_DEPTH_LIMIT: usize = 150;

/// Builds [`RecipeNode`] trees against a fixed graph.
pub struct TreeBuilder<'a> {
    graph: &'a IndexedGraph,
}

impl<'a> TreeBuilder<'a> {
    /// Create a builder over the given graph.
    pub const fn new(graph: &'a IndexedGraph) -> Self {
        Self { graph }
    }

    /// Build the recipe tree for `name` from a flat recipe map.
    #[must_use]
    pub fn build(&self, name: &str, recipes: &RecipeMap) -> RecipeNode {
        let mut visited = HashSet::new();
        self.build_node(name, recipes, &mut visited, 0)
    }

    fn build_node(
        &self,
        name: &str,
        recipes: &RecipeMap,
        visited: &mut HashSet<String>,
        depth: usize,
    ) -> RecipeNode {
        if is_base_element(name) || depth >= TREE_DEPTH_LIMIT || visited.contains(name) {
            return RecipeNode::leaf(name);
        }
        visited.insert(name.to_owned());

        let node = if let Some(step) = recipes.get(name) {
            RecipeNode::branch(
                name,
                self.build_node(&step.combo.a, recipes, visited, depth + 1),
                self.build_node(&step.combo.b, recipes, visited, depth + 1),
            )
        } else {
            self.build_fallback(name, visited, depth)
        };

        visited.remove(name);
        node
    }

    /// One-shot fallback for names the map does not cover.
    fn build_fallback(
        &self,
        name: &str,
        visited: &mut HashSet<String>,
        depth: usize,
    ) -> RecipeNode {
        let fallback = ForwardBfs::new(name).execute(self.graph).recipes;
        match fallback.get(name) {
            Some(step) => RecipeNode::branch(
                name,
                self.build_node(&step.combo.a, &fallback, visited, depth + 1),
                self.build_node(&step.combo.b, &fallback, visited, depth + 1),
            ),
            None => RecipeNode::leaf(name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::TierIndex;
    use athanor_core::{Catalog, Element, RecipeStep, Tier};

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
    fn builds_nested_tree_from_map() {
        let graph = graph();
        let mut recipes = RecipeMap::new();
        recipes.insert("Mud".into(), RecipeStep::new("Water", "Earth"));
        recipes.insert("Plant".into(), RecipeStep::new("Mud", "Air"));

        let tree = TreeBuilder::new(&graph).build("Plant", &recipes);
        assert_eq!(tree.children.len(), 2);
        let mud = tree.children.iter().find(|c| c.name == "Mud").expect("mud child");
        assert_eq!(mud.children.len(), 2);
    }

    #[test]
    fn base_element_is_a_leaf() {
        let graph = graph();
        let tree = TreeBuilder::new(&graph).build("Water", &RecipeMap::new());
        assert!(tree.is_leaf());
        assert_eq!(tree.name, "Water");
    }

    #[test]
    fn missing_entry_falls_back_to_bfs() {
        let graph = graph();
        // The map knows Plant but not Mud; the fallback must fill Mud in.
        let mut recipes = RecipeMap::new();
        recipes.insert("Plant".into(), RecipeStep::new("Mud", "Air"));

        let tree = TreeBuilder::new(&graph).build("Plant", &recipes);
        let mud = tree.children.iter().find(|c| c.name == "Mud").expect("mud child");
        assert_eq!(mud.children.len(), 2, "fallback BFS should resolve Mud");
    }

    #[test]
    fn unresolvable_non_base_is_a_leaf() {
        let graph = graph();
        let tree = TreeBuilder::new(&graph).build("Unobtainium", &RecipeMap::new());
        assert!(tree.is_leaf());
    }

    #[test]
    fn self_cycle_in_map_terminates() {
        let graph = graph();
        let mut recipes = RecipeMap::new();
        recipes.insert("Plant".into(), RecipeStep::new("Plant", "Air"));

        let tree = TreeBuilder::new(&graph).build("Plant", &recipes);
        // The recursive Plant reference is cut to a leaf.
        let inner = tree.children.iter().find(|c| c.name == "Plant").expect("inner");
        assert!(inner.is_leaf());
    }
}
