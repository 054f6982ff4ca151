//! Parsing of `key: value` meta files.

use std::path::Path;

use cbp_model::{Finding, MetaDescriptor};

use crate::error::Result;
use crate::tsv::{TextFile, read_text_file};

/// A meta file together with the syntax problems found while reading it.
#[derive(Debug, Clone, Default)]
pub struct ParsedMeta {
    pub meta: MetaDescriptor,
    pub findings: Vec<Finding>,
}

/// Read a meta file. `file_name` is the name findings are reported under.
///
/// Unreadable files are errors; malformed lines become findings.
pub fn read_meta_file(path: &Path, file_name: &str) -> Result<ParsedMeta> {
    let text = read_text_file(path)?;
    Ok(parse_meta_lines(&text, file_name))
}

/// Parse already decoded meta file lines.
pub fn parse_meta_lines(text: &TextFile, file_name: &str) -> ParsedMeta {
    let mut parsed = ParsedMeta {
        meta: MetaDescriptor::new(file_name),
        findings: Vec::new(),
    };
    for (line_number, line) in text.numbered() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let Some((key, value)) = line.split_once(':') else {
            parsed.findings.push(
                Finding::error("Invalid line in meta file, expected 'key: value'")
                    .in_file(file_name)
                    .at_line(line_number)
                    .with_cause(line),
            );
            continue;
        };
        let key = key.trim();
        if key.is_empty() {
            parsed.findings.push(
                Finding::error("Empty field name in meta file")
                    .in_file(file_name)
                    .at_line(line_number)
                    .with_cause(line),
            );
            continue;
        }
        if parsed.meta.contains(key) {
            parsed.findings.push(
                Finding::error("Duplicate field in meta file")
                    .in_file(file_name)
                    .at_line(line_number)
                    .with_cause(key),
            );
            continue;
        }
        parsed.meta.insert(key, value.trim(), line_number);
    }
    parsed
}
