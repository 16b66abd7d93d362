//! Dictionary entry types.

use serde::{Deserialize, Serialize};

/// Permission of a word to act as a substitution source.
///
/// Mirrors the expansion control column of the Sudachi synonym dictionary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ExpansionFlag {
    /// The word is always expanded; it may be replaced.
    #[default]
    Always,
    /// The word never triggers an expansion of itself.
    NotTrigger,
    /// The word is never used for expansion: it is neither replaced nor
    /// considered when picking the group's representative.
    Never,
}

impl ExpansionFlag {
    /// Parse the raw flag column.
    ///
    /// An empty column means [`ExpansionFlag::Always`]. Values other than
    /// `0`, `1` and `2` are treated as [`ExpansionFlag::NotTrigger`]: they do
    /// not authorize substitution but do not exclude the word as a target.
    pub fn parse(field: &str) -> Self {
        match field.trim() {
            "" | "0" => ExpansionFlag::Always,
            "2" => ExpansionFlag::Never,
            _ => ExpansionFlag::NotTrigger,
        }
    }

    /// Whether a word with this flag may be replaced by a synonym.
    pub fn allows_source(self) -> bool {
        self == ExpansionFlag::Always
    }

    /// Whether a word with this flag may be chosen as a replacement target.
    pub fn allows_target(self) -> bool {
        self != ExpansionFlag::Never
    }
}

/// One dictionary row: a surface word and its expansion flag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordEntry {
    pub word: String,
    pub expansion_flag: ExpansionFlag,
}

impl WordEntry {
    pub fn new<S: Into<String>>(word: S, expansion_flag: ExpansionFlag) -> Self {
        WordEntry {
            word: word.into(),
            expansion_flag,
        }
    }
}

/// Words sharing one source-dictionary group id, in first-seen order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SynonymGroup {
    pub group_id: String,
    pub entries: Vec<WordEntry>,
}

impl SynonymGroup {
    pub fn new<S: Into<String>>(group_id: S) -> Self {
        SynonymGroup {
            group_id: group_id.into(),
            entries: Vec::new(),
        }
    }

    /// Number of entries in the group.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries that may serve as the group's representative.
    pub fn candidate_targets(&self) -> impl Iterator<Item = &WordEntry> {
        self.entries
            .iter()
            .filter(|entry| entry.expansion_flag.allows_target())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_expansion_flag() {
        assert_eq!(ExpansionFlag::parse("0"), ExpansionFlag::Always);
        assert_eq!(ExpansionFlag::parse(""), ExpansionFlag::Always);
        assert_eq!(ExpansionFlag::parse("1"), ExpansionFlag::NotTrigger);
        assert_eq!(ExpansionFlag::parse("2"), ExpansionFlag::Never);
        assert_eq!(ExpansionFlag::parse("9"), ExpansionFlag::NotTrigger);
    }

    #[test]
    fn test_flag_permissions() {
        assert!(ExpansionFlag::Always.allows_source());
        assert!(!ExpansionFlag::NotTrigger.allows_source());
        assert!(!ExpansionFlag::Never.allows_source());

        assert!(ExpansionFlag::Always.allows_target());
        assert!(ExpansionFlag::NotTrigger.allows_target());
        assert!(!ExpansionFlag::Never.allows_target());
    }

    #[test]
    fn test_candidate_targets() {
        let mut group = SynonymGroup::new("000001");
        group.entries.push(WordEntry::new("猫", ExpansionFlag::Always));
        group.entries.push(WordEntry::new("ネコ", ExpansionFlag::Never));
        group.entries.push(WordEntry::new("ねこ", ExpansionFlag::NotTrigger));

        let targets: Vec<&str> = group.candidate_targets().map(|e| e.word.as_str()).collect();
        assert_eq!(targets, vec!["猫", "ねこ"]);
        assert_eq!(group.len(), 3);
    }
}
