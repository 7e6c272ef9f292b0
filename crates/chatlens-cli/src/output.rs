//! Record output formats for `parse` and `filter`.

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use anyhow::{Context, Result};
use chatlens_parser::ChatLog;
use clap::ValueEnum;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RecordFormat {
    /// Pretty-printed JSON array
    Json,
    /// One JSON object per line
    Jsonl,
    /// Canonical export lines
    Text,
}

pub fn render(log: &ChatLog, format: RecordFormat) -> Result<String> {
    let out = match format {
        RecordFormat::Json => {
            let mut json = serde_json::to_string_pretty(log).context("serializing records")?;
            json.push('\n');
            json
        }
        RecordFormat::Jsonl => {
            let mut out = String::new();
            for record in log {
                out.push_str(&serde_json::to_string(record).context("serializing record")?);
                out.push('\n');
            }
            out
        }
        RecordFormat::Text => log.to_export_text(),
    };
    Ok(out)
}

/// Write to `out`, or stdout when no path is given.
pub fn emit(rendered: &str, out: Option<&Path>) -> Result<()> {
    match out {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)
                    .with_context(|| format!("creating {}", parent.display()))?;
            }
            fs::write(path, rendered).with_context(|| format!("writing {}", path.display()))
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout
                .write_all(rendered.as_bytes())
                .context("writing to stdout")?;
            stdout.flush().context("flushing stdout")
        }
    }
}
