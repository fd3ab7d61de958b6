/// Name resolution: source rows to sector labels.
///
/// Under [`GroupingMethod::Manager`] the manager's surname is looked up in
/// `manager_mapping`; under [`GroupingMethod::Region`] the region text is
/// looked up in `region_mapping`. Both sides of every lookup are normalized.
/// A miss is not an error: the row lands in [`GroupKey::Unresolved`] and the
/// name is recorded once for the run's warning list.
use std::collections::{BTreeMap, HashMap, HashSet};

use crate::config::{Config, GroupingMethod};
use crate::normalize::normalize;
use crate::source::SourceRow;

/// Returns the capitalized first word of a full name, keeping letters only.
///
/// `"иванов и.и."` and `"ИВАНОВ  И. И."` both give `"Иванов"`. Blank input
/// gives `""`.
pub fn extract_surname(full_name: &str) -> String {
    let normalized = normalize(full_name);
    let Some(first) = normalized.split_whitespace().next() else {
        return String::new();
    };
    let mut letters = first.chars().filter(|c| c.is_alphabetic());
    match letters.next() {
        Some(head) => head.to_uppercase().chain(letters).collect(),
        None => String::new(),
    }
}

// ---------------------------------------------------------------------------
// MappingIndex
// ---------------------------------------------------------------------------

/// A mapping keyed by normalized name.
///
/// When two raw keys normalize to the same form the one that sorts first in
/// the source map wins.
#[derive(Debug, Clone, Default)]
pub struct MappingIndex {
    entries: HashMap<String, String>,
}

impl MappingIndex {
    /// Indexes `mapping` by normalized key. Keys that normalize to `""` are
    /// ignored.
    pub fn new(mapping: &BTreeMap<String, String>) -> Self {
        let mut entries = HashMap::with_capacity(mapping.len());
        for (key, sector) in mapping {
            let normalized = normalize(key);
            if !normalized.is_empty() {
                entries.entry(normalized).or_insert_with(|| sector.clone());
            }
        }
        Self { entries }
    }

    /// The sector for `key`, compared in normalized form.
    pub fn lookup(&self, key: &str) -> Option<&str> {
        self.entries.get(&normalize(key)).map(String::as_str)
    }

    /// Number of distinct normalized keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the mapping has no usable keys.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ---------------------------------------------------------------------------
// GroupKey
// ---------------------------------------------------------------------------

/// The aggregation bucket a source row falls into.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum GroupKey {
    /// A sector label taken verbatim from the mapping.
    Sector(String),
    /// Rows whose name did not resolve.
    Unresolved,
}

// ---------------------------------------------------------------------------
// Resolver
// ---------------------------------------------------------------------------

/// Resolves rows for one run and remembers the names that did not resolve.
#[derive(Debug, Clone)]
pub struct Resolver {
    method: GroupingMethod,
    index: MappingIndex,
    unresolved: Vec<String>,
    seen: HashSet<String>,
}

impl Resolver {
    /// Creates a resolver for the grouping method and mapping in `config`.
    pub fn new(config: &Config) -> Self {
        let method = config.grouping_method;
        Self {
            method,
            index: MappingIndex::new(config.mapping(method)),
            unresolved: Vec::new(),
            seen: HashSet::new(),
        }
    }

    /// The grouping method in effect.
    pub fn method(&self) -> GroupingMethod {
        self.method
    }

    /// The lookup name for `row`: the surname or the region text.
    pub fn key_of(&self, row: &SourceRow) -> String {
        match self.method {
            GroupingMethod::Manager => extract_surname(&row.manager),
            GroupingMethod::Region => row.region.trim().to_owned(),
        }
    }

    /// Resolves `row` to its group.
    pub fn group_key(&mut self, row: &SourceRow) -> GroupKey {
        let key = self.key_of(row);
        if let Some(sector) = self.index.lookup(&key) {
            return GroupKey::Sector(sector.to_owned());
        }
        if !key.is_empty() && self.seen.insert(normalize(&key)) {
            tracing::debug!(method = %self.method, name = %key, "name not in mapping");
            self.unresolved.push(key);
        }
        GroupKey::Unresolved
    }

    /// Distinct unresolved names, in first-seen order.
    pub fn unresolved(&self) -> &[String] {
        &self.unresolved
    }

    /// Consumes the resolver and returns the unresolved names.
    pub fn into_unresolved(self) -> Vec<String> {
        self.unresolved
    }
}
