//! Athanor Core
//!
//! This crate provides the fundamental types shared by the Athanor recipe
//! search engine: the element catalog loaded from disk (or produced by the
//! scraper) and the recipe/tree types that flow between the search
//! algorithms and the HTTP surface.
//!
//! # Overview
//!
//! - **Catalog**: [`Catalog`], [`Tier`], [`Element`] — the tiered element
//!   list, read-only after load
//! - **Base elements**: [`BASE_ELEMENTS`] — the four irreducible starting
//!   elements every synthesis bottoms out at
//! - **Recipes**: [`IngredientCombo`], [`Reaction`], [`RecipeStep`],
//!   [`RecipeMap`] — one recipe tree in flat product-to-ingredients form
//! - **Trees**: [`RecipeNode`] — the nested tree shape sent to clients
//!
//! # Example
//!
//! ```
//! use athanor_core::{Catalog, is_base_element};
//!
//! let mut catalog: Catalog = serde_json::from_str(r#"{"tiers":[
//!     {"name":"1","elements":[
//!         {"name":"Mud","local_svg_path":"","original_svg_url":"",
//!          "recipes":[["Water","Earth"]]}]}]}"#).unwrap();
//! catalog.sort_tiers();
//!
//! assert!(is_base_element("Water"));
//! assert!(!is_base_element("Mud"));
//! ```

// Deny unwrap in library code to ensure proper error handling
#![deny(clippy::unwrap_used)]

pub mod catalog;
pub mod error;
pub mod recipe;

// Re-export commonly used types
pub use catalog::{is_base_element, Catalog, Element, Tier, BASE_ELEMENTS, STARTING_TIER};
pub use error::{CoreError, Result};
pub use recipe::{IngredientCombo, Reaction, RecipeMap, RecipeNode, RecipeStep};
