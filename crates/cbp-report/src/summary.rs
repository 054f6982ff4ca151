//! Per-file and whole-run finding counts.

use cbp_model::{ExitStatus, Finding, FindingCounts};

/// Label used for findings that do not belong to a file.
pub const STUDY_LEVEL: &str = "(study)";

/// Counts of one file's findings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSummary {
    pub file: String,
    pub counts: FindingCounts,
}

/// Group counts by file, in the order files first appear.
pub fn summarize_by_file(findings: &[Finding]) -> Vec<FileSummary> {
    let mut summaries: Vec<FileSummary> = Vec::new();
    for finding in findings {
        let file = finding.file.as_deref().unwrap_or(STUDY_LEVEL);
        match summaries.iter_mut().find(|summary| summary.file == file) {
            Some(summary) => summary.counts.add(finding.severity),
            None => {
                let mut counts = FindingCounts::default();
                counts.add(finding.severity);
                summaries.push(FileSummary {
                    file: file.to_string(),
                    counts,
                });
            }
        }
    }
    summaries
}

/// Everything the console and HTML headers need about a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub files: Vec<FileSummary>,
    pub totals: FindingCounts,
    pub status: ExitStatus,
}

impl RunSummary {
    pub fn from_findings(findings: &[Finding]) -> Self {
        Self {
            files: summarize_by_file(findings),
            totals: FindingCounts::from_findings(findings),
            status: ExitStatus::from_findings(findings),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn groups_keep_encounter_order() {
        let findings = vec![
            Finding::info("start").in_file("meta_study.txt"),
            Finding::error("bad").in_file("data_cna.txt"),
            Finding::warning("odd").in_file("meta_study.txt"),
            Finding::info("Validation complete"),
        ];

        let summaries = summarize_by_file(&findings);

        let files: Vec<&str> = summaries.iter().map(|s| s.file.as_str()).collect();
        assert_eq!(files, ["meta_study.txt", "data_cna.txt", STUDY_LEVEL]);
        assert_eq!(summaries[0].counts.infos, 1);
        assert_eq!(summaries[0].counts.warnings, 1);
        assert_eq!(summaries[1].counts.errors, 1);
    }

    #[test]
    fn run_summary_folds_status() {
        let findings = vec![Finding::warning("odd").in_file("data.txt")];
        let summary = RunSummary::from_findings(&findings);
        assert_eq!(summary.status, ExitStatus::SucceededWithWarnings);
        assert_eq!(summary.totals.warnings, 1);
    }
}
