//! Coverage and exclusion lookup by bill item name

use std::collections::HashMap;

use crate::extraction::{BondExtraction, CoverageLimit, Exclusion};

/// Normalizes a bill item name into a lookup key
pub fn normalize_key(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Coverage and exclusion entries of one bill item
#[derive(Debug, Clone, Copy, Default)]
pub struct ItemLookup<'a> {
    pub coverage: Option<&'a CoverageLimit>,
    pub exclusion: Option<&'a Exclusion>,
}

/// Index of a bond's coverage limits and exclusions keyed by normalized
/// bill item name
///
/// Built once per calculation. When two entries normalize to the same key,
/// the later one in bond order wins. Entries with an empty key are never
/// indexed.
#[derive(Debug, Default)]
pub struct CoverageIndex<'a> {
    coverage: HashMap<String, &'a CoverageLimit>,
    exclusions: HashMap<String, &'a Exclusion>,
}

impl<'a> CoverageIndex<'a> {
    /// Builds the index from a policy bond
    pub fn build(bond: &'a BondExtraction) -> Self {
        let coverage = index_entries(bond.coverage_limits.iter().map(|c| (c.bill_item.as_str(), c)));
        let exclusions = index_entries(bond.exclusions.iter().map(|e| (e.bill_item.as_str(), e)));

        tracing::debug!(
            coverage_entries = coverage.len(),
            exclusion_entries = exclusions.len(),
            "Built coverage index"
        );

        Self { coverage, exclusions }
    }

    /// Looks up the coverage and exclusion entries for a bill item name
    pub fn lookup(&self, item_name: &str) -> ItemLookup<'a> {
        let key = normalize_key(item_name);
        ItemLookup {
            coverage: self.coverage.get(&key).copied(),
            exclusion: self.exclusions.get(&key).copied(),
        }
    }

    /// Number of distinct coverage keys
    pub fn coverage_len(&self) -> usize {
        self.coverage.len()
    }

    /// Number of distinct exclusion keys
    pub fn exclusion_len(&self) -> usize {
        self.exclusions.len()
    }
}

fn index_entries<'a, T>(entries: impl Iterator<Item = (&'a str, &'a T)>) -> HashMap<String, &'a T> {
    let mut map = HashMap::new();
    for (bill_item, entry) in entries {
        let key = normalize_key(bill_item);
        if key.is_empty() {
            continue;
        }
        if map.insert(key, entry).is_some() {
            tracing::debug!(bill_item, "Duplicate bill item key, later entry wins");
        }
    }
    map
}
