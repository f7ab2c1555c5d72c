//! Element tier lookup.
//!
//! Tiers are the complexity heuristic of the engine: base elements are tier
//! 0, the sorted catalog tier at position `i` maps its elements to `i + 1`,
//! and names the catalog never mentions get [`UNKNOWN_TIER`] so they sort
//! behind everything real.

use std::collections::HashMap;

use athanor_core::{Catalog, BASE_ELEMENTS};

/// Tier assigned to names absent from the catalog.
pub const UNKNOWN_TIER: u32 = 999;

/// Mapping from element name to tier level.
#[derive(Debug, Clone)]
pub struct TierIndex {
    tiers: HashMap<String, u32>,
}

impl TierIndex {
    /// Build the tier index from a catalog whose tiers are already sorted.
    ///
    /// Base elements are forced to tier 0 even when the starting tier also
    /// lists them.
    #[must_use]
    pub fn from_catalog(catalog: &Catalog) -> Self {
        let mut tiers = HashMap::with_capacity(catalog.element_count() + BASE_ELEMENTS.len());

        for (position, tier) in catalog.tiers.iter().enumerate() {
            let level = position as u32 + 1;
            for element in &tier.elements {
                tiers.insert(element.name.clone(), level);
            }
        }

        for base in BASE_ELEMENTS {
            tiers.insert(base.to_owned(), 0);
        }

        Self { tiers }
    }

    /// Tier of `name`, or [`UNKNOWN_TIER`] when the catalog never names it.
    #[inline]
    #[must_use]
    pub fn tier_of(&self, name: &str) -> u32 {
        self.tiers.get(name).copied().unwrap_or(UNKNOWN_TIER)
    }
}
