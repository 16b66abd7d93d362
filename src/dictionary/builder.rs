//! Synonym map construction.
//!
//! For every synonym group the builder picks the most efficient
//! representative (see [`EfficiencySelector`]) and registers
//! `word -> representative` for each other entry that is allowed to be
//! replaced and whose replacement actually saves tokens.

use std::sync::Arc;

use ahash::{AHashMap, AHashSet};
use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::analysis::counter::TokenCounter;
use crate::analysis::script::crosses_script_boundary;
use crate::dictionary::compiled::CompiledDictionary;
use crate::dictionary::group::GroupAggregator;
use crate::dictionary::parser::{ParsedSource, parse_source};
use crate::dictionary::selector::EfficiencySelector;

/// Default minimum relative reduction of the strict mode.
pub const DEFAULT_MINIMUM_RATIO: f64 = 0.2;

/// How large a token reduction must be for a substitution to be registered.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReductionPolicy {
    /// Any strictly positive reduction.
    #[default]
    AnyReduction,
    /// The relative reduction `(original - optimized) / original` must reach
    /// the given ratio.
    MinimumRatio(f64),
}

impl ReductionPolicy {
    /// The strict mode with the default 20% threshold.
    pub fn strict() -> Self {
        ReductionPolicy::MinimumRatio(DEFAULT_MINIMUM_RATIO)
    }

    /// Whether going from `original` to `optimized` tokens satisfies the policy.
    pub fn accepts(&self, original: usize, optimized: usize) -> bool {
        if optimized >= original {
            return false;
        }
        match *self {
            ReductionPolicy::AnyReduction => true,
            ReductionPolicy::MinimumRatio(ratio) => {
                (original - optimized) as f64 / original as f64 >= ratio
            }
        }
    }
}

/// Statistics of one compilation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildReport {
    /// Valid records parsed from the source.
    pub records: usize,
    /// Malformed lines skipped by the parser.
    pub skipped_lines: usize,
    /// Distinct group ids.
    pub groups: usize,
    /// Groups with at least two entries.
    pub synonym_groups: usize,
    /// Synonym groups in which every entry is flagged `Never`.
    pub groups_without_target: usize,
    /// Mappings redirected to the end of a replacement chain.
    pub flattened_chains: usize,
    /// Mappings in the compiled dictionary.
    pub synonyms: usize,
    /// Words in the compiled dictionary.
    pub dictionary_words: usize,
}

/// Compiles dictionary records into a [`CompiledDictionary`].
#[derive(Clone)]
pub struct SynonymMapBuilder {
    counter: Arc<dyn TokenCounter>,
    policy: ReductionPolicy,
}

impl SynonymMapBuilder {
    pub fn new(counter: Arc<dyn TokenCounter>) -> Self {
        SynonymMapBuilder {
            counter,
            policy: ReductionPolicy::default(),
        }
    }

    /// Set the reduction policy.
    pub fn with_policy(mut self, policy: ReductionPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> ReductionPolicy {
        self.policy
    }

    pub fn counter(&self) -> &Arc<dyn TokenCounter> {
        &self.counter
    }

    /// Whether replacing `original` with `optimized` is admissible.
    ///
    /// The replacement must stay on the same side of the Japanese/Latin
    /// boundary and must cost fewer tokens, as required by the policy.
    pub fn should_optimize(&self, original: &str, optimized: &str) -> bool {
        if crosses_script_boundary(original, optimized) {
            return false;
        }
        self.policy.accepts(
            self.counter.count_tokens(original),
            self.counter.count_tokens(optimized),
        )
    }

    /// Parse and compile raw dictionary text.
    pub fn build(&self, text: &str) -> (CompiledDictionary, BuildReport) {
        self.build_from_parsed(parse_source(text))
    }

    /// Compile already parsed records.
    pub fn build_from_parsed(&self, parsed: ParsedSource) -> (CompiledDictionary, BuildReport) {
        let mut report = BuildReport {
            records: parsed.records.len(),
            skipped_lines: parsed.skipped_lines,
            ..BuildReport::default()
        };

        let dictionary_words: AHashSet<String> = parsed
            .records
            .iter()
            .map(|record| record.entry.word.clone())
            .collect();

        let aggregator: GroupAggregator = parsed.records.into_iter().collect();
        report.groups = aggregator.group_count();
        let groups = aggregator.into_synonym_groups();
        report.synonym_groups = groups.len();

        let selector = EfficiencySelector::new(self.counter.as_ref());
        let mut synonym_map: AHashMap<String, String> = AHashMap::new();

        for group in &groups {
            let Some(most_efficient) = selector.select(group) else {
                debug!("Group {} has no replacement target", group.group_id);
                report.groups_without_target += 1;
                continue;
            };

            for entry in &group.entries {
                if entry.word != most_efficient.word
                    && entry.expansion_flag.allows_source()
                    && self.should_optimize(&entry.word, &most_efficient.word)
                {
                    // A word listed in several groups keeps the mapping of the last one.
                    synonym_map.insert(entry.word.clone(), most_efficient.word.clone());
                }
            }
        }

        report.flattened_chains = self.flatten_chains(&mut synonym_map);

        let dictionary = CompiledDictionary::new(synonym_map, dictionary_words);
        report.synonyms = dictionary.synonym_count();
        report.dictionary_words = dictionary.word_count();

        info!(
            "Built {} synonym mappings from {} groups ({} words, {} skipped lines)",
            report.synonyms, report.synonym_groups, report.dictionary_words, report.skipped_lines
        );

        (dictionary, report)
    }

    /// Point every mapping at the end of its replacement chain.
    ///
    /// A word that belongs to several groups can be the representative of one
    /// group and a replaceable member of another, so `a -> b` and `b -> c` may
    /// both exist. A mapping is redirected to the chain end only when that
    /// end is itself an admissible replacement; otherwise the first hop is
    /// kept.
    fn flatten_chains(&self, synonym_map: &mut AHashMap<String, String>) -> usize {
        let mut redirects = Vec::new();

        for (word, replacement) in synonym_map.iter() {
            // Every hop lowers the token count, so the walk terminates.
            let mut end = replacement;
            while let Some(next) = synonym_map.get(end) {
                end = next;
            }
            if end != replacement && self.should_optimize(word, end) {
                redirects.push((word.clone(), end.clone()));
            }
        }

        let count = redirects.len();
        for (word, end) in redirects {
            debug!("Flattening chain {word} -> {end}");
            synonym_map.insert(word, end);
        }
        count
    }
}
