//! In-memory aggregation over fully fetched contacts and deals.
//!
//! Every function here is pure: it takes the records and an optional pipeline
//! filter and returns a freshly built view. Missing or malformed optional
//! fields never fail an aggregation; they fall back to sentinel labels or
//! zero amounts.

use std::collections::HashMap;

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::domain::deal::Deal;

pub mod catalogs;
pub mod distribution;
pub mod sources;
pub mod summary;

pub use catalogs::{OwnerSummary, sales_owners, stage_names};
pub use distribution::{
    DealGroup, Labeling, OwnerBreakdown, OwnerRank, StageBreakdown, StageRank, Tally,
    opportunities_by_owner, opportunities_by_stage,
};
pub use sources::{contacts_by_source, contacts_not_in_opportunities};
pub use summary::{DashboardSummary, dashboard_summary};

/// Lowercases `name` and collapses every whitespace run into one space.
pub fn normalize_name(name: &str) -> String {
    name.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Deals restricted to `pipeline_id`, or all deals when no filter is given.
pub fn pipeline_deals<'a>(
    deals: &'a [Deal],
    pipeline_id: Option<&'a str>,
) -> impl Iterator<Item = &'a Deal> {
    deals.iter().filter(move |deal| match pipeline_id {
        Some(pipeline_id) => deal.in_pipeline_matching(pipeline_id),
        None => true,
    })
}

/// String-keyed map that remembers first-insertion order.
///
/// Serializes as a JSON object with keys in that order.
#[derive(Clone, Debug, PartialEq)]
pub struct Buckets<V> {
    entries: Vec<(String, V)>,
    index: HashMap<String, usize>,
}

impl<V> Default for Buckets<V> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            index: HashMap::new(),
        }
    }
}

impl<V> Buckets<V> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&V> {
        self.index.get(key).map(|&position| &self.entries[position].1)
    }

    /// Inserts or replaces the value; a replaced key keeps its position.
    pub fn insert(&mut self, key: &str, value: V) {
        match self.index.get(key) {
            Some(&position) => self.entries[position].1 = value,
            None => {
                self.index.insert(key.to_string(), self.entries.len());
                self.entries.push((key.to_string(), value));
            }
        }
    }

    /// Mutable access to the value under `key`, creating it on first use.
    pub fn entry_or_insert_with<F>(&mut self, key: &str, default: F) -> &mut V
    where
        F: FnOnce() -> V,
    {
        let position = match self.index.get(key) {
            Some(&position) => position,
            None => {
                let position = self.entries.len();
                self.index.insert(key.to_string(), position);
                self.entries.push((key.to_string(), default()));
                position
            }
        };
        &mut self.entries[position].1
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.entries.iter().map(|(key, value)| (key.as_str(), value))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(key, _)| key.as_str())
    }

    pub fn map_values<U, F>(&self, mut f: F) -> Buckets<U>
    where
        F: FnMut(&V) -> U,
    {
        Buckets {
            entries: self
                .entries
                .iter()
                .map(|(key, value)| (key.clone(), f(value)))
                .collect(),
            index: self.index.clone(),
        }
    }
}

impl<V: Serialize> Serialize for Buckets<V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}
