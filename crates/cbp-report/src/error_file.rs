//! Plain-text listing of warnings and errors.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use cbp_model::{Finding, Severity};

/// One line per WARNING or ERROR finding, in stream order:
/// `LEVEL: file: line L: column C: message; value encountered: 'cause'`.
pub fn render_error_file(findings: &[Finding]) -> String {
    let mut out = String::new();
    for finding in findings
        .iter()
        .filter(|finding| finding.severity >= Severity::Warning)
    {
        out.push_str(&finding.to_string());
        out.push('\n');
    }
    out
}

pub fn write_error_file(path: &Path, findings: &[Finding]) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).with_context(|| format!("create {}", parent.display()))?;
    }
    fs::write(path, render_error_file(findings))
        .with_context(|| format!("write {}", path.display()))?;
    info!(path = %path.display(), "wrote error file");
    Ok(())
}
