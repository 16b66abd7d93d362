//! Grouping of parsed records by synonym-group id.

use ahash::AHashMap;

use crate::dictionary::entry::SynonymGroup;
use crate::dictionary::parser::SourceRecord;

/// Collects records into [`SynonymGroup`]s.
///
/// Groups keep the order in which their id was first seen, and entries keep
/// source order within a group, so compilation is deterministic.
#[derive(Debug, Default)]
pub struct GroupAggregator {
    groups: Vec<SynonymGroup>,
    index: AHashMap<String, usize>,
}

impl GroupAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one record to its group.
    pub fn add(&mut self, record: SourceRecord) {
        let slot = match self.index.get(&record.group_id) {
            Some(&slot) => slot,
            None => {
                let slot = self.groups.len();
                self.index.insert(record.group_id.clone(), slot);
                self.groups.push(SynonymGroup::new(record.group_id));
                slot
            }
        };
        self.groups[slot].entries.push(record.entry);
    }

    /// Number of distinct group ids seen so far.
    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    /// Consume the aggregator, returning only groups with at least two
    /// entries. A single word has no synonym to be replaced with.
    pub fn into_synonym_groups(self) -> Vec<SynonymGroup> {
        self.groups
            .into_iter()
            .filter(|group| group.len() >= 2)
            .collect()
    }
}

impl FromIterator<SourceRecord> for GroupAggregator {
    fn from_iter<I: IntoIterator<Item = SourceRecord>>(iter: I) -> Self {
        let mut aggregator = GroupAggregator::new();
        for record in iter {
            aggregator.add(record);
        }
        aggregator
    }
}
