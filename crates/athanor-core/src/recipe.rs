//! Recipe and tree types exchanged between search algorithms and clients.
//!
//! A search produces a [`RecipeMap`]: for each product on one synthesis
//! path, the [`RecipeStep`] that makes it. The tree builder turns that flat
//! map into a nested [`RecipeNode`] for the wire.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// An unordered pair of ingredient names.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngredientCombo {
    /// First ingredient.
    pub a: String,
    /// Second ingredient.
    pub b: String,
}

impl IngredientCombo {
    /// Create a combo from two ingredient names.
    #[inline]
    #[must_use]
    pub fn new(a: impl Into<String>, b: impl Into<String>) -> Self {
        Self { a: a.into(), b: b.into() }
    }
}

/// One binary reaction: two ingredients and their product.
///
/// Serialized as a 3-element JSON array `[a, b, product]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reaction(pub String, pub String, pub String);

impl Reaction {
    /// First ingredient.
    #[inline]
    #[must_use]
    pub fn a(&self) -> &str {
        &self.0
    }

    /// Second ingredient.
    #[inline]
    #[must_use]
    pub fn b(&self) -> &str {
        &self.1
    }

    /// The product of the reaction.
    #[inline]
    #[must_use]
    pub fn product(&self) -> &str {
        &self.2
    }
}

/// The recipe that produces one product on a path.
///
/// `combo` names the final ingredients; `path`, when present, is the full
/// ordered sequence of reactions that was consumed to reach the product.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeStep {
    /// The two ingredients combined for this product.
    pub combo: IngredientCombo,
    /// Full ordered reaction sequence, when the producing search tracks it.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub path: Option<Vec<Reaction>>,
}

impl RecipeStep {
    /// Create a step without path information.
    #[inline]
    #[must_use]
    pub fn new(a: impl Into<String>, b: impl Into<String>) -> Self {
        Self { combo: IngredientCombo::new(a, b), path: None }
    }

    /// Attach the full reaction sequence, builder style.
    #[must_use]
    pub fn with_path(mut self, path: Vec<Reaction>) -> Self {
        self.path = Some(path);
        self
    }

    /// Project this step's `path` into a per-product recipe map.
    ///
    /// Each reaction on the path contributes one `product -> (a, b)` entry;
    /// later reactions win on (unexpected) duplicate products.
    #[must_use]
    pub fn path_to_map(&self) -> RecipeMap {
        let mut map = RecipeMap::new();
        if let Some(path) = &self.path {
            for reaction in path {
                map.insert(
                    reaction.product().to_owned(),
                    RecipeStep::new(reaction.a(), reaction.b()),
                );
            }
        }
        map
    }
}

/// Flat form of one recipe tree: at most one step per product.
pub type RecipeMap = HashMap<String, RecipeStep>;

/// A node in a recipe tree.
///
/// Either a leaf (a base element, or an unresolved non-base element) or an
/// internal node with exactly two children. A node with children is never a
/// base element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeNode {
    /// Element name.
    pub name: String,
    /// Ingredient subtrees; empty for leaves and omitted from JSON.
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub children: Vec<RecipeNode>,
}

impl RecipeNode {
    /// Create a leaf node.
    #[inline]
    #[must_use]
    pub fn leaf(name: impl Into<String>) -> Self {
        Self { name: name.into(), children: Vec::new() }
    }

    /// Create an internal node from its two ingredient subtrees.
    #[inline]
    #[must_use]
    pub fn branch(name: impl Into<String>, left: RecipeNode, right: RecipeNode) -> Self {
        Self { name: name.into(), children: vec![left, right] }
    }

    /// Returns `true` if this node has no children.
    #[inline]
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Collect the leaf names of this tree in depth-first order.
    #[must_use]
    pub fn leaf_names(&self) -> Vec<&str> {
        let mut out = Vec::new();
        self.collect_leaves(&mut out);
        out
    }

    fn collect_leaves<'a>(&'a self, out: &mut Vec<&'a str>) {
        if self.is_leaf() {
            out.push(&self.name);
        } else {
            for child in &self.children {
                child.collect_leaves(out);
            }
        }
    }
}
