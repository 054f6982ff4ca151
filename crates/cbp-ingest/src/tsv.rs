//! Line-oriented reading of tab-delimited study files.

use std::fs;
use std::path::Path;

use crate::error::{IngestError, Result};

/// Decoded lines of a text file. Line `n` (1-based) is `lines[n - 1]`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextFile {
    pub lines: Vec<String>,
}

impl TextFile {
    /// Decode `bytes`, reporting the first line holding invalid UTF-8.
    pub fn decode(bytes: &[u8], path: &Path) -> Result<Self> {
        match std::str::from_utf8(bytes) {
            Ok(text) => Ok(Self::from_text(text)),
            Err(error) => {
                let valid = &bytes[..error.valid_up_to()];
                let line = valid.iter().filter(|byte| **byte == b'\n').count() + 1;
                Err(IngestError::InvalidUtf8 {
                    path: path.to_path_buf(),
                    line,
                })
            }
        }
    }

    /// Split text on `\n`, dropping `\r` line ends, a leading BOM and the
    /// empty remainder after a final newline.
    pub fn from_text(text: &str) -> Self {
        let text = text.strip_prefix('\u{feff}').unwrap_or(text);
        let mut lines: Vec<String> = text
            .split('\n')
            .map(|line| line.strip_suffix('\r').unwrap_or(line).to_string())
            .collect();
        if lines.last().is_some_and(String::is_empty) {
            lines.pop();
        }
        Self { lines }
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Lines paired with their 1-based numbers.
    pub fn numbered(&self) -> impl Iterator<Item = (usize, &str)> {
        self.lines
            .iter()
            .enumerate()
            .map(|(index, line)| (index + 1, line.as_str()))
    }
}

/// Read and decode a study file.
pub fn read_text_file(path: &Path) -> Result<TextFile> {
    let bytes = fs::read(path).map_err(|source| IngestError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    TextFile::decode(&bytes, path)
}

/// Split a data line on tabs, keeping empty cells.
pub fn split_fields(line: &str) -> Vec<&str> {
    line.split('\t').collect()
}

/// Whether a line has no content besides whitespace.
pub fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}
