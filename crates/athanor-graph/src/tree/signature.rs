//! Structural tree signatures and deduplication.
//!
//! Two trees that describe the same unordered synthesis structure must
//! compare equal even when sibling subtrees were attached in a different
//! order, so child signatures are sorted before being combined.

use std::collections::HashSet;

use athanor_core::RecipeNode;

/// Canonical structural signature of a tree.
///
/// A leaf signs as its name; an internal node as `name(s1|s2|...)` with the
/// child signatures sorted lexicographically.
#[must_use]
pub fn tree_signature(tree: &RecipeNode) -> String {
    if tree.is_leaf() {
        return tree.name.clone();
    }
    let mut child_signatures: Vec<String> =
        tree.children.iter().map(tree_signature).collect();
    child_signatures.sort_unstable();
    format!("{}({})", tree.name, child_signatures.join("|"))
}

/// Keep the first occurrence of each structural signature, in order.
#[must_use]
pub fn dedupe_trees(trees: Vec<RecipeNode>) -> Vec<RecipeNode> {
    if trees.len() <= 1 {
        return trees;
    }
    let mut seen = HashSet::new();
    trees.into_iter().filter(|tree| seen.insert(tree_signature(tree))).collect()
}
