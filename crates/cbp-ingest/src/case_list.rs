//! Case-list files under `case_lists/`.

use std::path::Path;

use cbp_model::{CaseList, Finding};

use crate::error::Result;
use crate::meta::parse_meta_lines;
use crate::tsv::read_text_file;

const REQUIRED_FIELDS: &[&str] = &[
    "cancer_study_identifier",
    "stable_id",
    "case_list_name",
    "case_list_description",
    "case_list_ids",
];

/// A case list and the problems found while reading it. `case_list` is
/// `None` when required fields are missing.
#[derive(Debug, Clone, Default)]
pub struct ParsedCaseList {
    pub case_list: Option<CaseList>,
    pub findings: Vec<Finding>,
}

pub fn read_case_list(path: &Path, file_name: &str) -> Result<ParsedCaseList> {
    let text = read_text_file(path)?;
    let parsed = parse_meta_lines(&text, file_name);
    let mut findings = parsed.findings;
    let meta = parsed.meta;

    let mut complete = true;
    for field in REQUIRED_FIELDS {
        if !meta.contains(field) {
            findings.push(
                Finding::error(format!("Missing field '{field}' in case list file"))
                    .in_file(file_name),
            );
            complete = false;
        }
    }
    if !complete {
        return Ok(ParsedCaseList {
            case_list: None,
            findings,
        });
    }

    let field = |key: &str| meta.get(key).unwrap_or_default().to_string();
    let sample_ids = meta
        .get("case_list_ids")
        .unwrap_or_default()
        .split('\t')
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .collect();
    let case_list = CaseList {
        file_name: file_name.to_string(),
        stable_id: field("stable_id"),
        cancer_study_identifier: field("cancer_study_identifier"),
        name: field("case_list_name"),
        description: field("case_list_description"),
        category: meta
            .get("case_list_category")
            .filter(|category| !category.is_empty())
            .map(str::to_string),
        sample_ids,
        ids_line: meta.line_of("case_list_ids").unwrap_or(1),
    };
    Ok(ParsedCaseList {
        case_list: Some(case_list),
        findings,
    })
}
