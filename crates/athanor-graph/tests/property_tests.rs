//! Property tests for the structural invariants of trees and signatures.

use athanor_core::RecipeNode;
use athanor_graph::tree::{dedupe_trees, tree_signature};
use proptest::prelude::*;

/// Random small recipe trees over a fixed name alphabet.
fn arb_tree() -> impl Strategy<Value = RecipeNode> {
    let leaf = prop_oneof![
        Just(RecipeNode::leaf("Air")),
        Just(RecipeNode::leaf("Earth")),
        Just(RecipeNode::leaf("Fire")),
        Just(RecipeNode::leaf("Water")),
    ];
    leaf.prop_recursive(4, 32, 2, |inner| {
        (
            prop_oneof![Just("Mud"), Just("Lava"), Just("Stone"), Just("Brick")],
            inner.clone(),
            inner,
        )
            .prop_map(|(name, left, right)| RecipeNode::branch(name, left, right))
    })
}

/// Recursively reverse the children of every internal node.
fn mirror(tree: &RecipeNode) -> RecipeNode {
    let mut children: Vec<RecipeNode> = tree.children.iter().map(mirror).collect();
    children.reverse();
    RecipeNode { name: tree.name.clone(), children }
}

proptest! {
    #[test]
    fn signature_ignores_sibling_order(tree in arb_tree()) {
        prop_assert_eq!(tree_signature(&tree), tree_signature(&mirror(&tree)));
    }

    #[test]
    fn dedupe_is_idempotent(trees in proptest::collection::vec(arb_tree(), 0..8)) {
        let once = dedupe_trees(trees);
        let twice = dedupe_trees(once.clone());
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn dedupe_collapses_mirrors(tree in arb_tree()) {
        let mirrored = mirror(&tree);
        let deduped = dedupe_trees(vec![tree.clone(), mirrored]);
        prop_assert_eq!(deduped, vec![tree]);
    }

    #[test]
    fn signatures_of_distinct_leaf_multisets_differ(tree in arb_tree()) {
        // Renaming one leaf must change the signature.
        let mut renamed = tree.clone();
        fn rename_first_leaf(node: &mut RecipeNode) -> bool {
            if node.is_leaf() {
                node.name = "Aether".to_owned();
                return true;
            }
            node.children.iter_mut().any(rename_first_leaf)
        }
        prop_assume!(rename_first_leaf(&mut renamed));
        prop_assert_ne!(tree_signature(&tree), tree_signature(&renamed));
    }
}
