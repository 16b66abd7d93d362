//! Command implementations for the Shukuyaku CLI.

use std::fs;
use std::io::{self, Read};
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::{TimeDelta, Utc};
use log::info;

use crate::analysis::counter::{TiktokenCounter, TokenCounter};
use crate::analysis::tokenizer::TokenizerKind;
use crate::cli::args::*;
use crate::cli::output::*;
use crate::config::ShukuyakuConfig;
use crate::dictionary::builder::{ReductionPolicy, SynonymMapBuilder};
use crate::dictionary::service::DictionaryService;
use crate::dictionary::source::{DictionarySource, FileSource, HttpSource};
use crate::error::{Result, ShukuyakuError};
use crate::maintenance::DictionaryMaintainer;
use crate::optimizer::service::{OptimizationService, OptimizeRequest};
use crate::storage::dictionary_store::DictionaryStore;
use crate::storage::file::FileStore;

/// Execute a CLI command.
pub fn execute_command(args: ShukuyakuArgs) -> Result<()> {
    let config = ShukuyakuConfig::load_or_default(args.config.as_ref())?;

    match &args.command {
        Command::Build(build_args) => build_snapshot(build_args, &config, &args),
        Command::Init(init_args) => init_store(init_args, &config, &args),
        Command::Update(update_args) => update_store(update_args, &config, &args),
        Command::Optimize(optimize_args) => optimize_text(optimize_args, &config, &args),
        Command::Stats(stats_args) => show_stats(stats_args, &config, &args),
        Command::Clear(clear_args) => clear_store(clear_args, &config, &args),
    }
}

/// Compile the source and write a snapshot file.
fn build_snapshot(args: &BuildArgs, config: &ShukuyakuConfig, cli_args: &ShukuyakuArgs) -> Result<()> {
    let start_time = Instant::now();
    let builder = synonym_map_builder(&args.policy, config)?;
    let source = dictionary_source(&args.source, config);

    info!("Building synonym dictionary from {}", source.describe());
    let text = source.fetch()?;
    let (dictionary, report) = builder.build(&text);
    dictionary.save_snapshot(&args.output)?;

    output_result(
        "Dictionary built successfully",
        &BuildResult {
            output: args.output.display().to_string(),
            report,
            duration_ms: start_time.elapsed().as_millis() as u64,
        },
        cli_args,
    )
}

/// Build and publish into a store unless it is already initialized.
fn init_store(args: &InitArgs, config: &ShukuyakuConfig, cli_args: &ShukuyakuArgs) -> Result<()> {
    let store = open_store(&args.store, config)?;
    let builder = synonym_map_builder(&args.policy, config)?;
    let source = dictionary_source(&args.source, config);

    let outcome =
        DictionaryMaintainer::new(&store, &builder).initialize(source.as_ref(), args.force, Utc::now())?;

    output_result("Dictionary initialization finished", &outcome, cli_args)
}

/// Rebuild the stored dictionary if it is stale.
fn update_store(args: &UpdateArgs, config: &ShukuyakuConfig, cli_args: &ShukuyakuArgs) -> Result<()> {
    let store = open_store(&args.store, config)?;
    let builder = synonym_map_builder(&args.policy, config)?;
    let source = dictionary_source(&args.source, config);
    let max_age = match args.max_age_hours {
        Some(hours) => TimeDelta::hours(i64::from(hours)),
        None => config.staleness.max_age(),
    };

    let outcome = DictionaryMaintainer::new(&store, &builder).update_if_stale(
        source.as_ref(),
        Utc::now(),
        max_age,
    )?;

    output_result("Dictionary update finished", &outcome, cli_args)
}

/// Rewrite text from an argument, a file or stdin.
fn optimize_text(
    args: &OptimizeArgs,
    config: &ShukuyakuConfig,
    cli_args: &ShukuyakuArgs,
) -> Result<()> {
    let text = match (&args.text, &args.input) {
        (Some(text), _) => text.clone(),
        (None, Some(path)) => fs::read_to_string(path)?,
        (None, None) => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            buffer
        }
    };

    let counter = token_counter()?;
    let dictionaries = Arc::new(DictionaryService::new(SynonymMapBuilder::new(Arc::clone(
        &counter,
    ))));
    match (&args.dictionary, &args.store) {
        (Some(path), _) => {
            dictionaries.load_snapshot(path)?;
        }
        (None, Some(path)) => {
            let store = open_store(path, config)?;
            if !store.is_initialized()? {
                return Err(ShukuyakuError::uninitialized(format!(
                    "store '{}' holds no dictionary, run `shukuyaku init` first",
                    path.display()
                )));
            }
            dictionaries.publish(store.load()?);
        }
        (None, None) => {
            return Err(ShukuyakuError::invalid_request(
                "either --dictionary or --store is required",
            ));
        }
    }

    let segmenter: TokenizerKind = args.segmenter.map(Into::into).unwrap_or(config.segmenter);
    let service = OptimizationService::new(dictionaries, segmenter.build_or_fallback(), counter)
        .with_parallel_lines(args.parallel || config.parallel_lines);

    let response = service.optimize(&OptimizeRequest { text: Some(text) })?;
    match cli_args.output_format {
        OutputFormat::Json => output_json(&response, cli_args),
        OutputFormat::Human => {
            println!("{}", response.optimized);
            if cli_args.verbosity() > 1 {
                eprintln!(
                    "Tokens: {} -> {}",
                    response.token_count.original, response.token_count.optimized
                );
            }
            Ok(())
        }
    }
}

/// Show what a store holds.
fn show_stats(args: &StatsArgs, config: &ShukuyakuConfig, cli_args: &ShukuyakuArgs) -> Result<()> {
    let store = open_store(&args.store, config)?;
    output_result("Dictionary Statistics:", &store.stats()?, cli_args)
}

/// Delete all dictionary data from a store.
fn clear_store(args: &ClearArgs, config: &ShukuyakuConfig, cli_args: &ShukuyakuArgs) -> Result<()> {
    if !args.force {
        return Err(ShukuyakuError::invalid_request(
            "Refusing to clear the store without --force",
        ));
    }

    let store = open_store(&args.store, config)?;
    let removed_entries = store.clear()?;

    output_result(
        "Store cleared",
        &ClearResult {
            store: args.store.display().to_string(),
            removed_entries,
        },
        cli_args,
    )
}

fn token_counter() -> Result<Arc<dyn TokenCounter>> {
    Ok(Arc::new(TiktokenCounter::new()?))
}

/// Command line flags take precedence over the config file.
fn reduction_policy(args: &PolicyArgs, config: &ShukuyakuConfig) -> Result<ReductionPolicy> {
    match args.min_ratio {
        Some(ratio) if !(0.0..=1.0).contains(&ratio) => Err(ShukuyakuError::invalid_request(
            format!("--min-ratio must be between 0 and 1, got {ratio}"),
        )),
        Some(ratio) => Ok(ReductionPolicy::MinimumRatio(ratio)),
        None if args.strict => Ok(ReductionPolicy::strict()),
        None => Ok(config.build.policy),
    }
}

fn synonym_map_builder(args: &PolicyArgs, config: &ShukuyakuConfig) -> Result<SynonymMapBuilder> {
    let policy = reduction_policy(args, config)?;
    Ok(SynonymMapBuilder::new(token_counter()?).with_policy(policy))
}

fn dictionary_source(args: &SourceArgs, config: &ShukuyakuConfig) -> Box<dyn DictionarySource> {
    match (&args.source_file, &args.source_url) {
        (Some(path), _) => Box::new(FileSource::new(path)),
        (None, Some(url)) => Box::new(
            HttpSource::new(url.clone())
                .with_timeout(Duration::from_secs(config.source.timeout_secs)),
        ),
        (None, None) => Box::new(config.source.http_source()),
    }
}

fn open_store(path: &Path, config: &ShukuyakuConfig) -> Result<DictionaryStore> {
    let store = FileStore::open(path)?;
    Ok(DictionaryStore::new(Arc::new(store))
        .with_batch_size(config.persistence.batch_size)
        .with_retry_policy(config.persistence.retry))
}
