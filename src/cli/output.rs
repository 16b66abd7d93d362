//! Output formatting for CLI commands.

use serde::{Deserialize, Serialize};

use crate::cli::args::{OutputFormat, ShukuyakuArgs};
use crate::dictionary::builder::BuildReport;
use crate::error::Result;

/// Result structure for snapshot builds.
#[derive(Debug, Serialize, Deserialize)]
pub struct BuildResult {
    pub output: String,
    pub report: BuildReport,
    pub duration_ms: u64,
}

/// Result structure for clearing a store.
#[derive(Debug, Serialize, Deserialize)]
pub struct ClearResult {
    pub store: String,
    pub removed_entries: usize,
}

/// Output a result in the specified format.
pub fn output_result<T: Serialize>(message: &str, result: &T, args: &ShukuyakuArgs) -> Result<()> {
    match args.output_format {
        OutputFormat::Human => output_human(message, result, args),
        OutputFormat::Json => output_json(result, args),
    }
}

/// Output in human-readable format.
fn output_human<T: Serialize>(message: &str, result: &T, args: &ShukuyakuArgs) -> Result<()> {
    if args.verbosity() > 0 {
        println!("{message}");
        println!();
    }

    // Convert to JSON value for easier manipulation
    let value = serde_json::to_value(result)?;
    for line in human_lines(&value, 0) {
        println!("{line}");
    }
    Ok(())
}

/// Output in JSON format.
pub fn output_json<T: Serialize>(result: &T, args: &ShukuyakuArgs) -> Result<()> {
    let json = if args.pretty {
        serde_json::to_string_pretty(result)?
    } else {
        serde_json::to_string(result)?
    };

    println!("{json}");
    Ok(())
}

/// Render a JSON value as indented `key: value` lines.
fn human_lines(value: &serde_json::Value, indent: usize) -> Vec<String> {
    let spaces = "  ".repeat(indent);
    let mut lines = Vec::new();

    match value {
        serde_json::Value::Object(obj) => {
            for (key, val) in obj {
                let label = humanize_key(key);
                match val {
                    serde_json::Value::Object(_) => {
                        lines.push(format!("{spaces}{label}:"));
                        lines.extend(human_lines(val, indent + 1));
                    }
                    _ => {
                        let formatted_val = format_value(val);
                        lines.push(format!("{spaces}{label}: {formatted_val}"));
                    }
                }
            }
        }
        _ => {
            let formatted_value = format_value(value);
            lines.push(format!("{spaces}{formatted_value}"));
        }
    }
    lines
}

/// `dictionary_word_count` and `dictionaryWordCount` both become
/// `Dictionary word count`.
fn humanize_key(key: &str) -> String {
    let mut words = String::with_capacity(key.len() + 4);
    for (i, c) in key.chars().enumerate() {
        if c == '_' {
            words.push(' ');
        } else if c.is_ascii_uppercase() {
            words.push(' ');
            words.push(c.to_ascii_lowercase());
        } else if i == 0 {
            words.push(c.to_ascii_uppercase());
        } else {
            words.push(c);
        }
    }
    words
}

/// Format a JSON value for display.
fn format_value(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Number(n) => n.to_string(),
        serde_json::Value::Bool(b) => b.to_string(),
        serde_json::Value::Array(arr) => {
            let formatted_values = arr.iter().map(format_value).collect::<Vec<_>>().join(", ");
            format!("[{formatted_values}]")
        }
        serde_json::Value::Object(_) => "[object]".to_string(),
        serde_json::Value::Null => "-".to_string(),
    }
}
