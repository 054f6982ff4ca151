//! Ordered collection of findings for one validation run.

use std::collections::BTreeSet;

use tracing::{debug, error, info, warn};

use cbp_model::{Finding, Severity};

/// Append-only finding stream.
///
/// Each finding is also mirrored as a `tracing` event so that `-v` runs show
/// them as they are produced.
#[derive(Debug, Default)]
pub struct FindingSink {
    findings: Vec<Finding>,
}

impl FindingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, finding: Finding) {
        mirror(&finding);
        self.findings.push(finding);
    }

    pub fn findings(&self) -> &[Finding] {
        &self.findings
    }

    pub fn into_findings(self) -> Vec<Finding> {
        self.findings
    }

    pub fn len(&self) -> usize {
        self.findings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.findings.is_empty()
    }
}

fn mirror(finding: &Finding) {
    let file = finding.file.as_deref().unwrap_or("-");
    let line = finding.line.unwrap_or_default();
    let column = finding.column.unwrap_or_default();
    let cause = finding.cause.as_deref().unwrap_or("");
    match finding.severity {
        Severity::Error => error!(
            target: "cbp_validate::findings",
            file, line, column, cause, "{}", finding.message
        ),
        Severity::Warning => warn!(
            target: "cbp_validate::findings",
            file, line, column, cause, "{}", finding.message
        ),
        Severity::Info => info!(
            target: "cbp_validate::findings",
            file, line, column, cause, "{}", finding.message
        ),
        Severity::Debug => debug!(
            target: "cbp_validate::findings",
            file, line, column, cause, "{}", finding.message
        ),
    }
}

/// Findings of one data or meta file, stamped with the file name.
///
/// Tracks which lines carried a warning or an error for the closing
/// per-file summary.
#[derive(Debug)]
pub struct FileSink<'a> {
    file_name: String,
    sink: &'a mut FindingSink,
    warning_lines: BTreeSet<usize>,
    error_lines: BTreeSet<usize>,
    errors: usize,
}

impl<'a> FileSink<'a> {
    pub fn new(file_name: impl Into<String>, sink: &'a mut FindingSink) -> Self {
        Self {
            file_name: file_name.into(),
            sink,
            warning_lines: BTreeSet::new(),
            error_lines: BTreeSet::new(),
            errors: 0,
        }
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn push(&mut self, finding: Finding) {
        match (finding.severity, finding.line) {
            (Severity::Error, Some(line)) => {
                self.error_lines.insert(line);
            }
            (Severity::Warning, Some(line)) => {
                self.warning_lines.insert(line);
            }
            _ => {}
        }
        if finding.severity == Severity::Error {
            self.errors += 1;
        }
        self.sink.push(finding.in_file(self.file_name.clone()));
    }

    /// Number of ERROR findings emitted for this file so far.
    pub fn error_count(&self) -> usize {
        self.errors
    }

    pub fn lines_with_warning(&self) -> usize {
        self.warning_lines.len()
    }

    pub fn lines_with_error(&self) -> usize {
        self.error_lines.len()
    }
}
