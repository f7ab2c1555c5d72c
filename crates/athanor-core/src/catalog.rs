//! The element catalog: tiered lists of elements and their recipes.
//!
//! A [`Catalog`] is the persisted form of a craft graph. It holds a list of
//! [`Tier`]s, each grouping [`Element`]s of comparable synthesis complexity.
//! The tier named `"Starting"` holds the base elements; every other tier is
//! named by a decimal integer. Catalogs are read-only after load — the
//! engine sorts the tiers once and never mutates them again.
//!
//! # Example
//!
//! ```
//! use athanor_core::Catalog;
//!
//! let json = r#"{"tiers":[
//!     {"name":"2","elements":[]},
//!     {"name":"Starting","elements":[]},
//!     {"name":"1","elements":[]}]}"#;
//! let mut catalog = Catalog::from_json(json).unwrap();
//! catalog.sort_tiers();
//!
//! let names: Vec<&str> = catalog.tiers.iter().map(|t| t.name.as_str()).collect();
//! assert_eq!(names, ["Starting", "1", "2"]);
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// The four irreducible starting elements, in declared order.
///
/// Their order is load-bearing: the indexed graph assigns them IDs 0..3
/// in exactly this order.
pub const BASE_ELEMENTS: [&str; 4] = ["Air", "Earth", "Fire", "Water"];

/// The label of the tier that holds the base elements.
pub const STARTING_TIER: &str = "Starting";

/// Returns `true` if `name` is one of the four base elements.
#[inline]
#[must_use]
pub fn is_base_element(name: &str) -> bool {
    BASE_ELEMENTS.contains(&name)
}

/// A single element: its display name, icon locations, and the unordered
/// ingredient pairs that produce it.
///
/// Recipes are kept as raw string lists so that malformed entries
/// (ingredient count != 2) survive the round trip through disk; the index
/// builder skips them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Element {
    /// Unique element name.
    pub name: String,
    /// Path of the element's SVG below the served static tree.
    #[serde(default)]
    pub local_svg_path: String,
    /// Upstream URL the SVG was scraped from.
    #[serde(default)]
    pub original_svg_url: String,
    /// Unordered 2-ingredient recipes producing this element.
    #[serde(default)]
    pub recipes: Vec<Vec<String>>,
}

impl Element {
    /// Create an element with no recipes.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            local_svg_path: String::new(),
            original_svg_url: String::new(),
            recipes: Vec::new(),
        }
    }

    /// Add a recipe, builder style.
    #[must_use]
    pub fn with_recipe(mut self, a: impl Into<String>, b: impl Into<String>) -> Self {
        self.recipes.push(vec![a.into(), b.into()]);
        self
    }
}

/// A labeled group of elements of comparable synthesis complexity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tier {
    /// `"Starting"` for the base tier, otherwise a decimal integer.
    pub name: String,
    /// The elements in this tier.
    pub elements: Vec<Element>,
}

impl Tier {
    /// Create an empty tier.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), elements: Vec::new() }
    }

    /// Add an element, builder style.
    #[must_use]
    pub fn with_element(mut self, element: Element) -> Self {
        self.elements.push(element);
        self
    }
}

/// The full tiered catalog as persisted on disk.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    /// All tiers. Call [`Catalog::sort_tiers`] before indexing.
    pub tiers: Vec<Tier>,
}

impl Catalog {
    /// Parse a catalog from a JSON string.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a catalog from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json(&raw)
    }

    /// Serialize the catalog as pretty-printed JSON.
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Sort tiers in place: `"Starting"` first, then numeric ascending.
    ///
    /// Tier names that are neither `"Starting"` nor a decimal integer sink
    /// to the end in a stable order.
    pub fn sort_tiers(&mut self) {
        self.tiers.sort_by_key(|tier| tier_sort_key(&tier.name));
    }

    /// Total number of elements across all tiers.
    #[must_use]
    pub fn element_count(&self) -> usize {
        self.tiers.iter().map(|t| t.elements.len()).sum()
    }

    /// Iterate over every element in tier order.
    pub fn iter_elements(&self) -> impl Iterator<Item = &Element> {
        self.tiers.iter().flat_map(|t| t.elements.iter())
    }
}

fn tier_sort_key(name: &str) -> (u8, u64) {
    if name == STARTING_TIER {
        (0, 0)
    } else {
        match name.parse::<u64>() {
            Ok(n) => (1, n),
            Err(_) => (2, 0),
        }
    }
}
