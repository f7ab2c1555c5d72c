//! Integration tests for index construction invariants.
//!
//! These verify the structural guarantees every search relies on: edge
//! symmetry, tier monotonicity, base immovability, and deterministic
//! construction.

use athanor_core::{Catalog, Element, Tier, BASE_ELEMENTS};
use athanor_graph::{ElementId, IndexedGraph, ReverseIndex, TierIndex};

fn sample_catalog() -> Catalog {
    let mut catalog = Catalog {
        tiers: vec![
            Tier::new("1")
                .with_element(Element::new("Mud").with_recipe("Water", "Earth"))
                .with_element(Element::new("Lava").with_recipe("Fire", "Earth"))
                .with_element(Element::new("Rain").with_recipe("Water", "Air")),
            Tier::new("2")
                .with_element(Element::new("Stone").with_recipe("Lava", "Air"))
                .with_element(Element::new("Plant").with_recipe("Rain", "Earth")),
            Tier::new("3").with_element(
                Element::new("Brick").with_recipe("Mud", "Fire").with_recipe("Stone", "Fire"),
            ),
        ],
    };
    catalog.sort_tiers();
    catalog
}

fn build(catalog: &Catalog) -> IndexedGraph {
    IndexedGraph::build(catalog, &TierIndex::from_catalog(catalog))
}

#[test]
fn symmetry_holds_for_every_edge() {
    let graph = build(&sample_catalog());
    for u in 0..graph.element_count() as u32 {
        let u = ElementId::new(u);
        for edge in graph.neighbors(u) {
            assert!(
                graph
                    .neighbors(edge.partner)
                    .iter()
                    .any(|e| e.partner == u && e.product == edge.product),
                "missing mirror of ({:?}, {:?}, {:?})",
                u,
                edge.partner,
                edge.product
            );
        }
    }
}

#[test]
fn tier_monotonicity_holds_for_every_edge() {
    let graph = build(&sample_catalog());
    for u in 0..graph.element_count() as u32 {
        let u = ElementId::new(u);
        for edge in graph.neighbors(u) {
            let product_tier = graph.tier_of(edge.product);
            assert!(graph.tier_of(u) <= product_tier);
            assert!(graph.tier_of(edge.partner) <= product_tier);
        }
    }
}

#[test]
fn base_elements_are_immovable() {
    let graph = build(&sample_catalog());
    let reverse = ReverseIndex::build(&graph);

    for (position, name) in BASE_ELEMENTS.iter().enumerate() {
        let id = graph.id_of(name).expect("base interned");
        assert_eq!(id.as_usize(), position);
        assert_eq!(graph.tier_of(id), 0);
        assert!(reverse.pairs_for(id).is_empty(), "{name} must have no recipes");
    }
}

#[test]
fn construction_is_deterministic() {
    let catalog = sample_catalog();
    let a = build(&catalog);
    let b = build(&catalog);

    assert_eq!(a.element_count(), b.element_count());
    for id in 0..a.element_count() as u32 {
        let id = ElementId::new(id);
        assert_eq!(a.name_of(id), b.name_of(id));
        assert_eq!(a.neighbors(id), b.neighbors(id));
    }
}

#[test]
fn edges_round_trip_to_catalog_recipes() {
    // Catalog -> graph -> derive recipes from edges -> compare against the
    // catalog recipes that survive the tier filter.
    let catalog = sample_catalog();
    let graph = build(&catalog);
    let tiers = TierIndex::from_catalog(&catalog);

    let mut expected: Vec<(String, String, String)> = Vec::new();
    for element in catalog.iter_elements() {
        for recipe in &element.recipes {
            let [a, b] = match recipe.as_slice() {
                [a, b] => [a.clone(), b.clone()],
                _ => continue,
            };
            let product_tier = tiers.tier_of(&element.name);
            if tiers.tier_of(&a) > product_tier || tiers.tier_of(&b) > product_tier {
                continue;
            }
            let (a, b) = if a <= b { (a, b) } else { (b, a) };
            expected.push((a, b, element.name.clone()));
        }
    }
    expected.sort();

    let mut derived: Vec<(String, String, String)> = Vec::new();
    for u in 0..graph.element_count() as u32 {
        let u = ElementId::new(u);
        for edge in graph.neighbors(u) {
            // Each recipe appears under both ingredients; keep one side.
            if u <= edge.partner {
                let mut ab =
                    [graph.name_of(u).to_owned(), graph.name_of(edge.partner).to_owned()];
                ab.sort();
                let [a, b] = ab;
                derived.push((a, b, graph.name_of(edge.product).to_owned()));
            }
        }
    }
    derived.sort();
    derived.dedup();
    let mut expected_deduped = expected;
    expected_deduped.dedup();

    assert_eq!(derived, expected_deduped);
}
