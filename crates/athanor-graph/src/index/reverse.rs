//! Reverse index: product to the ingredient pairs that make it.
//!
//! Built on demand before the first target-to-base DFS and immutable from
//! then on. Pairs are unordered (`a <= b`), deduplicated, and sorted by
//! summed ingredient tier so that DFS tries the cheapest synthesis first.

use std::collections::HashSet;

use super::graph::{ElementId, IndexedGraph};

/// An unordered ingredient pair, stored with `a <= b`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IngredientPair {
    /// The smaller ingredient ID.
    pub a: ElementId,
    /// The larger ingredient ID.
    pub b: ElementId,
}

impl IngredientPair {
    /// Create a pair, normalizing ingredient order.
    #[inline]
    #[must_use]
    pub fn new(x: ElementId, y: ElementId) -> Self {
        if x <= y {
            Self { a: x, b: y }
        } else {
            Self { a: y, b: x }
        }
    }
}

/// Product-to-pairs index over an [`IndexedGraph`].
#[derive(Debug, Clone)]
pub struct ReverseIndex {
    pairs: Vec<Vec<IngredientPair>>,
}

impl ReverseIndex {
    /// Build the reverse index from the forward edges.
    #[must_use]
    pub fn build(graph: &IndexedGraph) -> Self {
        let mut pairs: Vec<Vec<IngredientPair>> = vec![Vec::new(); graph.element_count()];
        let mut seen: HashSet<(ElementId, IngredientPair)> = HashSet::new();

        for u in 0..graph.element_count() as u32 {
            let u = ElementId::new(u);
            for edge in graph.neighbors(u) {
                let pair = IngredientPair::new(u, edge.partner);
                // The forward graph stores every recipe twice; keep one copy.
                if seen.insert((edge.product, pair)) {
                    pairs[edge.product.as_usize()].push(pair);
                }
            }
        }

        for list in &mut pairs {
            list.sort_unstable_by_key(|pair| {
                (graph.tier_of(pair.a) + graph.tier_of(pair.b), pair.a, pair.b)
            });
        }

        Self { pairs }
    }

    /// The ingredient pairs producing `product`, cheapest tier sum first.
    #[inline]
    #[must_use]
    pub fn pairs_for(&self, product: ElementId) -> &[IngredientPair] {
        self.pairs.get(product.as_usize()).map_or(&[], Vec::as_slice)
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
                Tier::new("1")
                    .with_element(Element::new("Mud").with_recipe("Water", "Earth"))
                    .with_element(Element::new("Lava").with_recipe("Fire", "Earth")),
                Tier::new("2").with_element(
                    Element::new("Brick").with_recipe("Mud", "Fire").with_recipe("Lava", "Air"),
                ),
            ],
        };
        catalog.sort_tiers();
        IndexedGraph::build(&catalog, &TierIndex::from_catalog(&catalog))
    }

    #[test]
    fn pairs_are_normalized_and_deduplicated() {
        let graph = graph();
        let index = ReverseIndex::build(&graph);
        let mud = graph.id_of("Mud").expect("id");

        let pairs = index.pairs_for(mud);
        assert_eq!(pairs.len(), 1);
        assert!(pairs[0].a <= pairs[0].b);
    }

    #[test]
    fn pairs_sorted_by_tier_sum() {
        let graph = graph();
        let index = ReverseIndex::build(&graph);
        let brick = graph.id_of("Brick").expect("id");

        let pairs = index.pairs_for(brick);
        assert_eq!(pairs.len(), 2);
        let sums: Vec<u32> = pairs
            .iter()
            .map(|p| graph.tier_of(p.a) + graph.tier_of(p.b))
            .collect();
        assert!(sums.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn base_elements_have_no_pairs() {
        let graph = graph();
        let index = ReverseIndex::build(&graph);
        for id in graph.base_ids() {
            assert!(index.pairs_for(id).is_empty());
        }
    }
}
