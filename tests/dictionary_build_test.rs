//! Integration tests for compiling the synonym source.

use std::sync::Arc;

use shukuyaku::analysis::counter::{CharCounter, TableCounter, TokenCounter};
use shukuyaku::analysis::script::crosses_script_boundary;
use shukuyaku::analysis::tokenizer::script_run::ScriptRunTokenizer;
use shukuyaku::dictionary::{CompiledDictionary, ReductionPolicy, SynonymMapBuilder};
use shukuyaku::error::Result;
use shukuyaku::optimizer::TextRewriter;
use tempfile::TempDir;

const SOURCE: &str = "\
# Sudachi synonym dictionary excerpt
000001,1,0,1,0,0,0,(),コンピュータ,,
000001,1,0,1,0,0,0,(),コンピューター,,
000001,1,0,1,0,0,0,(),電算機,,
000001,1,0,1,0,0,0,(),computer,,

000002,1,0,1,0,0,0,(),アルゴリズム,,
000002,1,2,1,0,0,0,(),算法,,
000002,1,0,1,0,0,0,(),手順,,
000003,1,0,1,0,0,0,(),猫,,
broken,line
000004,1,1,1,0,0,0,(),情報処理,,
000004,1,0,1,0,0,0,(),情処,,
000005,1,0,1,0,0,0,(),personal computer,,
000005,1,0,1,0,0,0,(),PC,,
000006,1,0,1,0,0,0,(),   ,,
";

fn char_builder() -> SynonymMapBuilder {
    SynonymMapBuilder::new(Arc::new(CharCounter::new()))
}

#[test]
fn test_build_mappings() -> Result<()> {
    let (dictionary, report) = char_builder().build(SOURCE);

    assert_eq!(dictionary.replacement("コンピュータ"), Some("電算機"));
    assert_eq!(dictionary.replacement("コンピューター"), Some("電算機"));
    assert_eq!(dictionary.replacement("アルゴリズム"), Some("手順"));
    assert_eq!(dictionary.replacement("personal computer"), Some("PC"));

    // The Japanese representative is never offered to a Latin-script word.
    assert_eq!(dictionary.replacement("computer"), None);
    // Never-flagged words are neither replaced nor chosen.
    assert_eq!(dictionary.replacement("算法"), None);
    // A not-trigger word keeps its surface form.
    assert_eq!(dictionary.replacement("情報処理"), None);
    // Singleton groups produce no mapping but still count as known words.
    assert_eq!(dictionary.replacement("猫"), None);
    assert!(dictionary.contains_word("猫"));
    assert!(dictionary.contains_word("算法"));

    assert_eq!(report.records, 12);
    assert_eq!(report.skipped_lines, 2);
    assert_eq!(report.groups, 5);
    assert_eq!(report.synonym_groups, 4);
    assert_eq!(report.synonyms, 4);
    assert_eq!(report.dictionary_words, 12);

    Ok(())
}

#[test]
fn test_every_mapping_saves_tokens() -> Result<()> {
    let counter = CharCounter::new();
    let (dictionary, _) = char_builder().build(SOURCE);

    for (word, replacement) in dictionary.sorted_synonyms() {
        assert_ne!(word, replacement);
        assert!(counter.count_tokens(replacement) < counter.count_tokens(word));
        assert!(!crosses_script_boundary(word, replacement));
        assert!(dictionary.contains_word(word));
        assert!(dictionary.contains_word(replacement));
    }

    Ok(())
}

#[test]
fn test_strict_policy_is_subset() -> Result<()> {
    let counter = TableCounter::new()
        .with_cost("コンピュータ", 3)
        .with_cost("コンピューター", 4)
        .with_cost("電算機", 3)
        .with_cost("アルゴリズム", 5)
        .with_cost("手順", 2);

    let lenient = SynonymMapBuilder::new(Arc::new(counter.clone()));
    let strict = SynonymMapBuilder::new(Arc::new(counter)).with_policy(ReductionPolicy::strict());

    let (lenient, _) = lenient.build(SOURCE);
    let (strict, _) = strict.build(SOURCE);

    // 4 -> 3 tokens is a 25% saving and survives; 3 -> 3 never qualifies.
    assert_eq!(strict.replacement("コンピューター"), Some("電算機"));
    assert_eq!(strict.replacement("コンピュータ"), None);
    assert_eq!(lenient.replacement("コンピュータ"), None);

    for (word, replacement) in strict.sorted_synonyms() {
        assert_eq!(lenient.replacement(word), Some(replacement));
    }
    assert!(strict.synonym_count() <= lenient.synonym_count());

    Ok(())
}

#[test]
fn test_build_is_deterministic() -> Result<()> {
    let temp_dir = TempDir::new().unwrap();
    let first_path = temp_dir.path().join("first.json");
    let second_path = temp_dir.path().join("second.json");

    let (first, _) = char_builder().build(SOURCE);
    let (second, _) = char_builder().build(SOURCE);
    assert_eq!(first, second);

    first.save_snapshot(&first_path)?;
    second.save_snapshot(&second_path)?;
    assert_eq!(
        std::fs::read(&first_path)?,
        std::fs::read(&second_path)?
    );

    assert_eq!(CompiledDictionary::load_snapshot(&first_path)?, first);
    Ok(())
}

#[test]
fn test_chains_are_flattened() -> Result<()> {
    let source = "\
000010,1,0,1,0,0,0,(),コンピュータ,,
000010,1,0,1,0,0,0,(),計算機,,
000011,1,0,1,0,0,0,(),計算機,,
000011,1,0,1,0,0,0,(),電算,,
";
    let (dictionary, report) = char_builder().build(source);

    assert_eq!(dictionary.replacement("コンピュータ"), Some("電算"));
    assert_eq!(dictionary.replacement("計算機"), Some("電算"));
    assert_eq!(report.flattened_chains, 1);

    let tokenizer = ScriptRunTokenizer::new();
    let rewriter = TextRewriter::new(&dictionary, &tokenizer);
    let once = rewriter.rewrite("コンピュータと計算機")?;
    assert_eq!(once, "電算と電算");
    assert_eq!(rewriter.rewrite(&once)?, once);

    Ok(())
}

#[test]
fn test_last_group_wins() -> Result<()> {
    let source = "\
000020,1,0,1,0,0,0,(),ノートパソコン,,
000020,1,0,1,0,0,0,(),ノーパソ,,
000021,1,0,1,0,0,0,(),ノートパソコン,,
000021,1,0,1,0,0,0,(),ノート型,,
";
    let (dictionary, _) = char_builder().build(source);
    assert_eq!(dictionary.replacement("ノートパソコン"), Some("ノート型"));
    Ok(())
}
