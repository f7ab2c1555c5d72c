//! The ID-indexed craft graph.
//!
//! Element names are interned to dense integer IDs, with the four base
//! elements pinned at IDs 0..3 in declared order. Forward edges record, for
//! every element `u`, the partners it can combine with and the products
//! those combinations yield.
//!
//! # Construction
//!
//! Building happens in two phases:
//!
//! 1. ID assignment: bases first, then every element name and every
//!    ingredient name in catalog order
//! 2. Edge insertion: each valid 2-ingredient recipe `(a, b) -> product`
//!    becomes the symmetric pair of edges `a: (b, product)` and
//!    `b: (a, product)`
//!
//! Recipes whose ingredient count is not 2 are skipped, and recipes where
//! an ingredient's tier exceeds the product's tier are dropped: a product
//! is never cheaper than what it is made from. Adjacency lists are sorted
//! by `(partner, product)` so the same catalog always produces the same
//! graph.

use std::collections::HashMap;

use athanor_core::{Catalog, BASE_ELEMENTS};

use super::tiers::TierIndex;

/// Dense integer ID of an element in the indexed graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ElementId(u32);

impl ElementId {
    /// Create an ID from its raw value.
    #[inline]
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// The raw ID value.
    #[inline]
    #[must_use]
    pub const fn as_u32(self) -> u32 {
        self.0
    }

    /// The ID as a vector index.
    #[inline]
    #[must_use]
    pub const fn as_usize(self) -> usize {
        self.0 as usize
    }
}

/// One forward edge: combining with `partner` yields `product`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct IndexedNeighbor {
    /// The other ingredient of the combination.
    pub partner: ElementId,
    /// The element the combination produces.
    pub product: ElementId,
}

/// Bidirectional dense graph representation keyed by stable integer IDs.
#[derive(Debug, Clone)]
pub struct IndexedGraph {
    name_to_id: HashMap<String, ElementId>,
    names: Vec<String>,
    tiers: Vec<u32>,
    edges: Vec<Vec<IndexedNeighbor>>,
}

impl IndexedGraph {
    /// Build the graph from a sorted catalog and its tier index.
    #[must_use]
    pub fn build(catalog: &Catalog, tiers: &TierIndex) -> Self {
        let mut graph = Self {
            name_to_id: HashMap::new(),
            names: Vec::new(),
            tiers: Vec::new(),
            edges: Vec::new(),
        };

        // Phase 1: assign IDs, bases first so they land at 0..3.
        for base in BASE_ELEMENTS {
            graph.intern(base, tiers);
        }
        for element in catalog.iter_elements() {
            graph.intern(&element.name, tiers);
            for recipe in &element.recipes {
                for ingredient in recipe {
                    graph.intern(ingredient, tiers);
                }
            }
        }

        // Phase 2: insert symmetric edges for every valid recipe.
        for element in catalog.iter_elements() {
            let product = graph.name_to_id[&element.name];
            let product_tier = graph.tiers[product.as_usize()];

            for recipe in &element.recipes {
                let [a, b] = match recipe.as_slice() {
                    [a, b] => [a, b],
                    _ => continue,
                };
                let a = graph.name_to_id[a];
                let b = graph.name_to_id[b];

                // A product is never cheaper than its ingredients.
                if graph.tiers[a.as_usize()] > product_tier
                    || graph.tiers[b.as_usize()] > product_tier
                {
                    continue;
                }

                graph.edges[a.as_usize()].push(IndexedNeighbor { partner: b, product });
                graph.edges[b.as_usize()].push(IndexedNeighbor { partner: a, product });
            }
        }

        for adjacency in &mut graph.edges {
            adjacency.sort_unstable();
        }

        graph
    }

    fn intern(&mut self, name: &str, tiers: &TierIndex) -> ElementId {
        if let Some(&id) = self.name_to_id.get(name) {
            return id;
        }
        let id = ElementId::new(self.names.len() as u32);
        self.name_to_id.insert(name.to_owned(), id);
        self.names.push(name.to_owned());
        self.tiers.push(tiers.tier_of(name));
        self.edges.push(Vec::new());
        id
    }

    /// Look up the ID of an element name.
    #[inline]
    #[must_use]
    pub fn id_of(&self, name: &str) -> Option<ElementId> {
        self.name_to_id.get(name).copied()
    }

    /// The name of an element by ID.
    #[inline]
    #[must_use]
    pub fn name_of(&self, id: ElementId) -> &str {
        &self.names[id.as_usize()]
    }

    /// The tier of an element by ID.
    #[inline]
    #[must_use]
    pub fn tier_of(&self, id: ElementId) -> u32 {
        self.tiers[id.as_usize()]
    }

    /// Forward edges out of `id`, sorted by `(partner, product)`.
    #[inline]
    #[must_use]
    pub fn neighbors(&self, id: ElementId) -> &[IndexedNeighbor] {
        &self.edges[id.as_usize()]
    }

    /// IDs of the four base elements, in declared order.
    #[must_use]
    pub fn base_ids(&self) -> [ElementId; 4] {
        // Bases are interned first, so their IDs are fixed.
        [ElementId::new(0), ElementId::new(1), ElementId::new(2), ElementId::new(3)]
    }

    /// Returns `true` if `id` is a base element.
    #[inline]
    #[must_use]
    pub fn is_base(&self, id: ElementId) -> bool {
        id.as_u32() < BASE_ELEMENTS.len() as u32
    }

    /// Total number of interned elements.
    #[inline]
    #[must_use]
    pub fn element_count(&self) -> usize {
        self.names.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use athanor_core::{Element, Tier};

    fn tiny_catalog() -> Catalog {
        let mut catalog = Catalog {
            tiers: vec![
                Tier::new("1")
                    .with_element(Element::new("Mud").with_recipe("Water", "Earth"))
                    .with_element(Element::new("Lava").with_recipe("Fire", "Earth")),
            ],
        };
        catalog.sort_tiers();
        catalog
    }

    fn build(catalog: &Catalog) -> IndexedGraph {
        IndexedGraph::build(catalog, &TierIndex::from_catalog(catalog))
    }

    #[test]
    fn bases_occupy_first_four_ids() {
        let graph = build(&tiny_catalog());
        for (i, base) in BASE_ELEMENTS.iter().enumerate() {
            let id = graph.id_of(base).expect("base interned");
            assert_eq!(id.as_usize(), i);
            assert_eq!(graph.tier_of(id), 0);
            assert!(graph.is_base(id));
        }
    }

    #[test]
    fn edges_are_symmetric() {
        let graph = build(&tiny_catalog());
        for u in 0..graph.element_count() as u32 {
            let u = ElementId::new(u);
            for edge in graph.neighbors(u) {
                let mirrored = graph
                    .neighbors(edge.partner)
                    .iter()
                    .any(|e| e.partner == u && e.product == edge.product);
                assert!(mirrored, "edge {u:?} -> {edge:?} has no mirror");
            }
        }
    }

    #[test]
    fn adjacency_is_sorted() {
        let graph = build(&tiny_catalog());
        let earth = graph.id_of("Earth").expect("id");
        let adjacency = graph.neighbors(earth);
        assert!(adjacency.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(adjacency.len(), 2);
    }

    #[test]
    fn malformed_recipe_is_skipped() {
        let mut catalog = tiny_catalog();
        catalog.tiers[0].elements.push(Element {
            name: "Broken".into(),
            local_svg_path: String::new(),
            original_svg_url: String::new(),
            recipes: vec![vec!["Water".into()], vec!["Water".into(), "Earth".into(), "Fire".into()]],
        });
        let graph = build(&catalog);
        let broken = graph.id_of("Broken").expect("interned anyway");
        let water = graph.id_of("Water").expect("id");
        assert!(graph.neighbors(water).iter().all(|e| e.product != broken));
    }

    #[test]
    fn tier_violating_recipe_is_dropped() {
        // Mud (tier 1) claiming to be made from Lava-tier ingredients would
        // need an ingredient above its own tier.
        let mut catalog = Catalog {
            tiers: vec![
                Tier::new("1").with_element(Element::new("Mud").with_recipe("Water", "Earth")),
                Tier::new("2").with_element(Element::new("Stone").with_recipe("Lava", "Air")),
            ],
        };
        // Cheat: also give Mud a recipe using tier-2 Stone.
        catalog.tiers[0].elements[0] =
            catalog.tiers[0].elements[0].clone().with_recipe("Stone", "Air");
        catalog.sort_tiers();

        let graph = build(&catalog);
        let mud = graph.id_of("Mud").expect("id");
        let stone = graph.id_of("Stone").expect("id");
        assert!(graph.neighbors(stone).iter().all(|e| e.product != mud));
        // The legitimate recipe survives.
        let water = graph.id_of("Water").expect("id");
        assert!(graph.neighbors(water).iter().any(|e| e.product == mud));
    }

    #[test]
    fn unseen_ingredients_get_ids() {
        let mut catalog = Catalog {
            tiers: vec![Tier::new("1")
                .with_element(Element::new("Cloud").with_recipe("Air", "Mist"))],
        };
        catalog.sort_tiers();
        let graph = build(&catalog);
        // Mist never appears as an element but is referenced by a recipe.
        assert!(graph.id_of("Mist").is_some());
    }

    #[test]
    fn same_catalog_same_graph() {
        let a = build(&tiny_catalog());
        let b = build(&tiny_catalog());
        assert_eq!(a.element_count(), b.element_count());
        for id in 0..a.element_count() as u32 {
            let id = ElementId::new(id);
            assert_eq!(a.name_of(id), b.name_of(id));
            assert_eq!(a.neighbors(id), b.neighbors(id));
        }
    }
}
