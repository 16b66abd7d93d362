//! Command line argument parsing for the Shukuyaku CLI using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};

use crate::analysis::tokenizer::TokenizerKind;

/// Shukuyaku - Rewrite Japanese text with fewer LLM tokens
#[derive(Parser, Debug, Clone)]
#[command(name = "shukuyaku")]
#[command(about = "Rewrite Japanese text with cheaper synonyms to save LLM tokens")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(long_about = None)]
pub struct ShukuyakuArgs {
    /// Verbosity level (0=quiet, 1=normal, 2=verbose, 3=debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (overrides verbose)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output format
    #[arg(short = 'f', long = "format", default_value = "human", global = true)]
    pub output_format: OutputFormat,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pub pretty: bool,

    /// Configuration file (JSON)
    #[arg(short, long, env = "SHUKUYAKU_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

impl ShukuyakuArgs {
    /// Get the effective verbosity level
    pub fn verbosity(&self) -> u8 {
        if self.quiet {
            0
        } else {
            match self.verbose {
                0 => 1, // Default to normal
                n => n,
            }
        }
    }
}

/// Available CLI commands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Compile the synonym source into a dictionary snapshot file
    Build(BuildArgs),

    /// Build a dictionary and publish it into a store
    Init(InitArgs),

    /// Rebuild the stored dictionary if it is out of date
    Update(UpdateArgs),

    /// Rewrite text with the compiled dictionary
    Optimize(OptimizeArgs),

    /// Show store statistics
    Stats(StatsArgs),

    /// Remove all dictionary data from a store
    Clear(ClearArgs),
}

/// Where to read the raw synonym source from.
#[derive(Args, Debug, Clone, Default)]
pub struct SourceArgs {
    /// Download the source from this URL
    #[arg(long, value_name = "URL")]
    pub source_url: Option<String>,

    /// Read the source from a local file
    #[arg(long, value_name = "FILE", conflicts_with = "source_url")]
    pub source_file: Option<PathBuf>,
}

/// How much a substitution must save to be registered.
#[derive(Args, Debug, Clone, Default)]
pub struct PolicyArgs {
    /// Require a 20% token reduction per substitution
    #[arg(long)]
    pub strict: bool,

    /// Require this relative token reduction (0.0-1.0) per substitution
    #[arg(long, value_name = "RATIO", conflicts_with = "strict")]
    pub min_ratio: Option<f64>,
}

/// Arguments for building a snapshot
#[derive(Parser, Debug, Clone)]
pub struct BuildArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    #[command(flatten)]
    pub policy: PolicyArgs,

    /// Snapshot file to write
    #[arg(short, long, value_name = "SNAPSHOT_FILE")]
    pub output: PathBuf,
}

/// Arguments for initializing a store
#[derive(Parser, Debug, Clone)]
pub struct InitArgs {
    /// Store file
    #[arg(short, long, env = "SHUKUYAKU_STORE", value_name = "STORE_FILE")]
    pub store: PathBuf,

    #[command(flatten)]
    pub source: SourceArgs,

    #[command(flatten)]
    pub policy: PolicyArgs,

    /// Rebuild even if the store is already initialized
    #[arg(long)]
    pub force: bool,
}

/// Arguments for the staleness-checked update
#[derive(Parser, Debug, Clone)]
pub struct UpdateArgs {
    /// Store file
    #[arg(short, long, env = "SHUKUYAKU_STORE", value_name = "STORE_FILE")]
    pub store: PathBuf,

    #[command(flatten)]
    pub source: SourceArgs,

    #[command(flatten)]
    pub policy: PolicyArgs,

    /// Maximum dictionary age before it is rebuilt
    #[arg(long, value_name = "HOURS")]
    pub max_age_hours: Option<u32>,
}

/// Arguments for optimizing text
#[derive(Parser, Debug, Clone)]
pub struct OptimizeArgs {
    /// Text to optimize (reads --input or stdin when omitted)
    #[arg(value_name = "TEXT", conflicts_with = "input")]
    pub text: Option<String>,

    /// File to optimize
    #[arg(short, long, value_name = "FILE")]
    pub input: Option<PathBuf>,

    /// Dictionary snapshot file
    #[arg(
        short,
        long,
        value_name = "SNAPSHOT_FILE",
        conflicts_with = "store",
        required_unless_present = "store"
    )]
    pub dictionary: Option<PathBuf>,

    /// Store file
    #[arg(short, long, env = "SHUKUYAKU_STORE", value_name = "STORE_FILE")]
    pub store: Option<PathBuf>,

    /// Word segmenter
    #[arg(long)]
    pub segmenter: Option<Segmenter>,

    /// Process lines in parallel
    #[arg(long)]
    pub parallel: bool,
}

/// Arguments for store statistics
#[derive(Parser, Debug, Clone)]
pub struct StatsArgs {
    /// Store file
    #[arg(short, long, env = "SHUKUYAKU_STORE", value_name = "STORE_FILE")]
    pub store: PathBuf,
}

/// Arguments for clearing a store
#[derive(Parser, Debug, Clone)]
pub struct ClearArgs {
    /// Store file
    #[arg(short, long, env = "SHUKUYAKU_STORE", value_name = "STORE_FILE")]
    pub store: PathBuf,

    /// Required to actually delete anything
    #[arg(long)]
    pub force: bool,
}

/// Word segmenters available in CLI
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Segmenter {
    /// Morphological analysis (embedded UniDic)
    Lindera,
    /// Split on changes of script
    ScriptRun,
    /// Unicode word boundaries
    UnicodeWord,
}

impl From<Segmenter> for TokenizerKind {
    fn from(segmenter: Segmenter) -> Self {
        match segmenter {
            Segmenter::Lindera => TokenizerKind::Lindera,
            Segmenter::ScriptRun => TokenizerKind::ScriptRun,
            Segmenter::UnicodeWord => TokenizerKind::UnicodeWord,
        }
    }
}

/// Output formats for CLI
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON output
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_build_command() {
        let args = ShukuyakuArgs::try_parse_from([
            "shukuyaku",
            "build",
            "--source-file",
            "synonyms.txt",
            "--output",
            "dict.json",
            "--strict",
        ])
        .unwrap();

        if let Command::Build(build_args) = args.command {
            assert_eq!(build_args.source.source_file, Some(PathBuf::from("synonyms.txt")));
            assert_eq!(build_args.source.source_url, None);
            assert_eq!(build_args.output, PathBuf::from("dict.json"));
            assert!(build_args.policy.strict);
        } else {
            panic!("Expected Build command");
        }
    }

    #[test]
    fn test_source_flags_conflict() {
        let result = ShukuyakuArgs::try_parse_from([
            "shukuyaku",
            "build",
            "--source-file",
            "synonyms.txt",
            "--source-url",
            "https://example.com/synonyms.txt",
            "--output",
            "dict.json",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_optimize_command() {
        let args = ShukuyakuArgs::try_parse_from([
            "shukuyaku",
            "optimize",
            "コンピュータを使う",
            "--dictionary",
            "dict.json",
            "--segmenter",
            "unicode-word",
        ])
        .unwrap();

        if let Command::Optimize(optimize_args) = args.command {
            assert_eq!(optimize_args.text.as_deref(), Some("コンピュータを使う"));
            assert_eq!(optimize_args.dictionary, Some(PathBuf::from("dict.json")));
            assert_eq!(optimize_args.segmenter, Some(Segmenter::UnicodeWord));
            assert!(!optimize_args.parallel);
        } else {
            panic!("Expected Optimize command");
        }
    }

    #[test]
    fn test_optimize_requires_dictionary_or_store() {
        let result = ShukuyakuArgs::try_parse_from(["shukuyaku", "optimize", "text"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_init_command() {
        let args = ShukuyakuArgs::try_parse_from([
            "shukuyaku",
            "init",
            "--store",
            "store.json",
            "--force",
            "--min-ratio",
            "0.3",
        ])
        .unwrap();

        if let Command::Init(init_args) = args.command {
            assert_eq!(init_args.store, PathBuf::from("store.json"));
            assert!(init_args.force);
            assert_eq!(init_args.policy.min_ratio, Some(0.3));
        } else {
            panic!("Expected Init command");
        }
    }

    #[test]
    fn test_verbosity_levels() {
        // Default verbosity
        let args = ShukuyakuArgs::try_parse_from(["shukuyaku", "stats", "-s", "store.json"]).unwrap();
        assert_eq!(args.verbosity(), 1);

        // Multiple verbose flags
        let args =
            ShukuyakuArgs::try_parse_from(["shukuyaku", "-vv", "stats", "-s", "store.json"]).unwrap();
        assert_eq!(args.verbosity(), 2);

        // Quiet flag
        let args =
            ShukuyakuArgs::try_parse_from(["shukuyaku", "--quiet", "stats", "-s", "store.json"])
                .unwrap();
        assert_eq!(args.verbosity(), 0);
    }

    #[test]
    fn test_output_format() {
        let args = ShukuyakuArgs::try_parse_from([
            "shukuyaku",
            "--format",
            "json",
            "stats",
            "--store",
            "store.json",
        ])
        .unwrap();
        assert_eq!(args.output_format, OutputFormat::Json);
    }
}
