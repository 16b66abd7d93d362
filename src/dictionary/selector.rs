//! Selection of a group's most token-efficient representative.

use std::cmp::Ordering;

use crate::analysis::counter::TokenCounter;
use crate::analysis::script::is_japanese;
use crate::dictionary::entry::{SynonymGroup, WordEntry};

/// Picks the canonical replacement word of a synonym group.
///
/// Candidates are the entries whose flag is not `Never`. They are folded
/// pairwise and the better of each pair survives:
///
/// 1. a Japanese-script word beats a non-Japanese one, whatever their cost;
/// 2. fewer tokens wins;
/// 3. fewer characters wins;
/// 4. otherwise the earlier entry is kept.
pub struct EfficiencySelector<'a> {
    counter: &'a dyn TokenCounter,
}

struct Scored<'e> {
    entry: &'e WordEntry,
    japanese: bool,
    tokens: usize,
    chars: usize,
}

impl<'a> EfficiencySelector<'a> {
    pub fn new(counter: &'a dyn TokenCounter) -> Self {
        EfficiencySelector { counter }
    }

    /// Return the most efficient candidate of `group`, or `None` when every
    /// entry is flagged `Never`.
    pub fn select<'e>(&self, group: &'e SynonymGroup) -> Option<&'e WordEntry> {
        group
            .candidate_targets()
            .map(|entry| self.score(entry))
            .reduce(|best, challenger| {
                if Self::compare(&challenger, &best) == Ordering::Less {
                    challenger
                } else {
                    best
                }
            })
            .map(|scored| scored.entry)
    }

    fn score<'e>(&self, entry: &'e WordEntry) -> Scored<'e> {
        Scored {
            entry,
            japanese: is_japanese(&entry.word),
            tokens: self.counter.count_tokens(&entry.word),
            chars: entry.word.chars().count(),
        }
    }

    /// `Less` means `a` is the better representative.
    fn compare(a: &Scored<'_>, b: &Scored<'_>) -> Ordering {
        b.japanese
            .cmp(&a.japanese)
            .then(a.tokens.cmp(&b.tokens))
            .then(a.chars.cmp(&b.chars))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::counter::{CharCounter, TableCounter};
    use crate::dictionary::entry::ExpansionFlag;

    fn group(entries: &[(&str, ExpansionFlag)]) -> SynonymGroup {
        let mut group = SynonymGroup::new("000001");
        for (word, flag) in entries {
            group.entries.push(WordEntry::new(*word, *flag));
        }
        group
    }

    #[test]
    fn test_fewest_tokens_wins() {
        let counter = CharCounter::new();
        let selector = EfficiencySelector::new(&counter);
        let group = group(&[
            ("コンピュータ", ExpansionFlag::Always),
            ("電算機", ExpansionFlag::Always),
        ]);

        assert_eq!(selector.select(&group).unwrap().word, "電算機");
    }

    #[test]
    fn test_japanese_beats_cheaper_latin() {
        let counter = TableCounter::new().with_cost("PC", 1).with_cost("計算機", 3);
        let selector = EfficiencySelector::new(&counter);
        let group = group(&[
            ("PC", ExpansionFlag::Always),
            ("計算機", ExpansionFlag::Always),
        ]);

        assert_eq!(selector.select(&group).unwrap().word, "計算機");
    }

    #[test]
    fn test_character_length_breaks_token_ties() {
        let counter = TableCounter::new().with_cost("アルゴリズム", 2).with_cost("算法", 2);
        let selector = EfficiencySelector::new(&counter);
        let group = group(&[
            ("アルゴリズム", ExpansionFlag::Always),
            ("算法", ExpansionFlag::Always),
        ]);

        assert_eq!(selector.select(&group).unwrap().word, "算法");
    }

    #[test]
    fn test_first_seen_wins_full_tie() {
        let counter = CharCounter::new();
        let selector = EfficiencySelector::new(&counter);
        let group = group(&[
            ("ねこ", ExpansionFlag::Always),
            ("ネコ", ExpansionFlag::Always),
        ]);

        assert_eq!(selector.select(&group).unwrap().word, "ねこ");
    }

    #[test]
    fn test_never_entries_excluded() {
        let counter = TableCounter::new().with_cost("猫", 2).with_cost("ネコ", 1);
        let selector = EfficiencySelector::new(&counter);
        let mixed = group(&[
            ("猫", ExpansionFlag::Always),
            ("ネコ", ExpansionFlag::Never),
        ]);

        assert_eq!(selector.select(&mixed).unwrap().word, "猫");

        let all_never = group(&[
            ("猫", ExpansionFlag::Never),
            ("ネコ", ExpansionFlag::Never),
        ]);
        assert!(selector.select(&all_never).is_none());
    }
}
