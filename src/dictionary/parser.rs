//! Parser for the raw synonym dictionary source.
//!
//! The source is newline-delimited with comma-separated fields, in the layout
//! of Sudachi's `synonyms.txt`:
//!
//! ```text
//! 000001,1,0,1,0,0,0,(),曖昧,,
//! 000001,1,0,1,0,0,0,(),あいまい,,
//! ```
//!
//! Only three columns matter here: field 0 is the group id, field 2 the
//! expansion flag and field 8 the surface word. The parse is best-effort:
//! lines with fewer than nine fields, or with an empty word, are skipped and
//! counted, never reported as errors.

use log::debug;

use crate::dictionary::entry::{ExpansionFlag, WordEntry};

/// Minimum number of comma-separated fields for a line to be a record.
pub const MIN_FIELDS: usize = 9;

const GROUP_ID_FIELD: usize = 0;
const FLAG_FIELD: usize = 2;
const WORD_FIELD: usize = 8;

/// A parsed `(group id, entry)` pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceRecord {
    pub group_id: String,
    pub entry: WordEntry,
}

/// Result of parsing a dictionary source.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedSource {
    /// Valid records in source order.
    pub records: Vec<SourceRecord>,
    /// Non-blank, non-comment lines that were not valid records.
    pub skipped_lines: usize,
}

/// Parse raw dictionary text into records.
pub fn parse_source(text: &str) -> ParsedSource {
    let mut parsed = ParsedSource::default();

    for (line_num, line) in text.lines().enumerate() {
        if line.trim().is_empty() || line.starts_with('#') {
            continue;
        }

        match parse_line(line) {
            Some(record) => parsed.records.push(record),
            None => {
                debug!("Skipping malformed dictionary line {}", line_num + 1);
                parsed.skipped_lines += 1;
            }
        }
    }

    parsed
}

fn parse_line(line: &str) -> Option<SourceRecord> {
    let fields: Vec<&str> = line.split(',').collect();
    if fields.len() < MIN_FIELDS {
        return None;
    }

    let word = fields[WORD_FIELD].trim();
    if word.is_empty() {
        return None;
    }

    Some(SourceRecord {
        group_id: fields[GROUP_ID_FIELD].to_string(),
        entry: WordEntry::new(word, ExpansionFlag::parse(fields[FLAG_FIELD])),
    })
}
