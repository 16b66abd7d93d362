//! Synonym dictionary compilation.
//!
//! Compilation turns raw synonym-group records into a [`CompiledDictionary`]:
//!
//! ```text
//! source text ─▶ parser ─▶ group aggregator ─▶ efficiency selector ─▶ map builder
//!                                                                       │
//!                                              CompiledDictionary ◀─────┘
//! ```
//!
//! The compiled dictionary is immutable. [`DictionaryService`] publishes a
//! freshly built instance with a single pointer swap, so readers never see a
//! half-built map.

pub mod builder;
pub mod compiled;
pub mod entry;
pub mod group;
pub mod parser;
pub mod selector;
pub mod service;
pub mod source;

pub use builder::{BuildReport, ReductionPolicy, SynonymMapBuilder};
pub use compiled::{BuildSource, CompiledDictionary, DictionaryMetadata};
pub use entry::{ExpansionFlag, SynonymGroup, WordEntry};
pub use group::GroupAggregator;
pub use parser::{ParsedSource, SourceRecord, parse_source};
pub use selector::EfficiencySelector;
pub use service::DictionaryService;
pub use source::{DictionarySource, FileSource, HttpSource, StaticSource};
