//! Integration tests for rewriting text through the optimization service.

use std::sync::Arc;

use shukuyaku::analysis::counter::{CharCounter, TokenCounter};
use shukuyaku::analysis::tokenizer::TokenizerKind;
use shukuyaku::dictionary::{DictionaryService, StaticSource, SynonymMapBuilder};
use shukuyaku::error::{Result, ShukuyakuError};
use shukuyaku::optimizer::{OptimizationService, OptimizeRequest};
use tempfile::TempDir;

const SOURCE: &str = "\
000001,1,0,1,0,0,0,(),コンピュータ,,
000001,1,0,1,0,0,0,(),電算機,,
000002,1,0,1,0,0,0,(),再構築,,
000002,1,0,1,0,0,0,(),再建,,
000003,1,0,1,0,0,0,(),アルゴリズム,,
000003,1,0,1,0,0,0,(),算法,,
000004,1,0,1,0,0,0,(),データベース,,
000004,1,0,1,0,0,0,(),DB,,
";

fn service_with(kind: TokenizerKind, parallel: bool) -> Result<OptimizationService> {
    let counter: Arc<dyn TokenCounter> = Arc::new(CharCounter::new());
    let dictionaries = Arc::new(DictionaryService::new(SynonymMapBuilder::new(Arc::clone(
        &counter,
    ))));
    dictionaries.load(&StaticSource::new(SOURCE))?;

    Ok(OptimizationService::new(dictionaries, kind.build()?, counter).with_parallel_lines(parallel))
}

#[test]
fn test_exact_and_compound_rewrites() -> Result<()> {
    let service = service_with(TokenizerKind::ScriptRun, false)?;

    let response = service.optimize_text("コンピュータとアルゴリズムを活用した")?;
    assert_eq!(response.optimized, "電算機と算法を活用した");

    // 再構築処理 is unknown as a whole, so its known prefix is replaced.
    let response = service.optimize_text("再構築処理を実施")?;
    assert_eq!(response.optimized, "再建処理を実施");
    assert!(response.token_count.optimized < response.token_count.original);

    Ok(())
}

#[test]
fn test_okurigana_word_rewritten() -> Result<()> {
    let counter: Arc<dyn TokenCounter> = Arc::new(CharCounter::new());
    let dictionaries = Arc::new(DictionaryService::new(SynonymMapBuilder::new(Arc::clone(
        &counter,
    ))));
    dictionaries.load(&StaticSource::new(
        "000010,1,0,1,0,0,0,(),取り扱う,,\n000010,1,0,1,0,0,0,(),扱う,,\n",
    ))?;
    let service = OptimizationService::new(dictionaries, TokenizerKind::Lindera.build()?, counter);

    let response = service.optimize_text("書類を取り扱う")?;
    assert_eq!(response.optimized, "書類を扱う");
    assert!(response.token_count.optimized < response.token_count.original);

    Ok(())
}

#[test]
fn test_script_boundary_respected() -> Result<()> {
    let service = service_with(TokenizerKind::ScriptRun, false)?;
    let response = service.optimize_text("データベースを更新")?;
    assert_eq!(response.optimized, "データベースを更新");
    Ok(())
}

#[test]
fn test_text_without_matches_is_unchanged() -> Result<()> {
    let service = service_with(TokenizerKind::ScriptRun, false)?;
    let text = "今日は良い天気です。Hello, world!";
    let response = service.optimize_text(text)?;
    assert_eq!(response.optimized, text);
    assert_eq!(response.token_count.original, response.token_count.optimized);
    Ok(())
}

#[test]
fn test_multiline_layout_preserved() -> Result<()> {
    let service = service_with(TokenizerKind::ScriptRun, true)?;
    let text = "一行目のコンピュータ\n\n  \n三行目のアルゴリズム\n";
    let response = service.optimize_text(text)?;
    assert_eq!(response.optimized, "一行目の電算機\n\n  \n三行目の算法\n");
    Ok(())
}

#[test]
fn test_rewrite_is_idempotent() -> Result<()> {
    for kind in [TokenizerKind::ScriptRun, TokenizerKind::UnicodeWord] {
        let service = service_with(kind, false)?;
        let once = service
            .optimize_text("コンピュータの再構築処理とアルゴリズム")?
            .optimized;
        let twice = service.optimize_text(&once)?.optimized;
        assert_eq!(once, twice);
    }
    Ok(())
}

#[test]
fn test_request_validation() -> Result<()> {
    let service = service_with(TokenizerKind::ScriptRun, false)?;
    let err = service
        .optimize(&OptimizeRequest { text: None })
        .unwrap_err();
    assert!(err.is_client_error());
    assert_eq!(err.to_string(), "Invalid request: Text is required");
    Ok(())
}

#[test]
fn test_snapshot_loaded_service() -> Result<()> {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("dictionary.json");

    let counter: Arc<dyn TokenCounter> = Arc::new(CharCounter::new());
    let builder = SynonymMapBuilder::new(Arc::clone(&counter));
    let (dictionary, _) = builder.build(SOURCE);
    dictionary.save_snapshot(&path)?;

    let dictionaries = Arc::new(DictionaryService::new(builder));
    let service = OptimizationService::new(
        Arc::clone(&dictionaries),
        TokenizerKind::ScriptRun.build()?,
        counter,
    );
    assert!(matches!(
        service.optimize_text("コンピュータ"),
        Err(ShukuyakuError::UninitializedDictionary(_))
    ));

    dictionaries.load_snapshot(&path)?;
    assert_eq!(service.optimize_text("コンピュータ")?.optimized, "電算機");

    Ok(())
}

#[test]
fn test_concurrent_requests_during_rebuild() -> Result<()> {
    let service = Arc::new(service_with(TokenizerKind::ScriptRun, false)?);

    std::thread::scope(|scope| {
        for _ in 0..4 {
            let service = Arc::clone(&service);
            scope.spawn(move || {
                for _ in 0..50 {
                    let response = service.optimize_text("コンピュータ").unwrap();
                    assert_eq!(response.optimized, "電算機");
                }
            });
        }
        for _ in 0..10 {
            service
                .dictionaries()
                .load(&StaticSource::new(SOURCE))
                .unwrap();
        }
    });

    Ok(())
}
