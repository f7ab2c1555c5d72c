//! Recipe tree construction and structural deduplication.
//!
//! - [`TreeBuilder`] - turn a flat recipe map into a nested [`RecipeNode`]
//! - [`tree_signature`] / [`dedupe_trees`] - order-independent structural
//!   hashing of trees
//! - [`UnifiedTree`] - the all-recipes-at-once tree used by the atlas view
//!
//! [`RecipeNode`]: athanor_core::RecipeNode

mod builder;
mod signature;
mod unified;

pub use builder::{TreeBuilder, TREE_DEPTH_LIMIT};
pub use signature::{dedupe_trees, tree_signature};
pub use unified::UnifiedTree;
