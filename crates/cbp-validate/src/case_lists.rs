//! Checks on the `case_lists/` directory of a study.

use std::collections::{BTreeMap, BTreeSet};

use tracing::debug;

use cbp_ingest::{StudyLayout, read_case_list};
use cbp_model::{CaseList, Finding, SHARED_CATEGORY, is_known_category};

use crate::context::StudyContext;
use crate::sink::{FileSink, FindingSink};

/// Read and check every case list of `layout`.
///
/// Returns the lists that could be read completely, in file order.
pub fn validate_case_lists(
    layout: &StudyLayout,
    study: &StudyContext,
    sink: &mut FindingSink,
) -> Vec<CaseList> {
    let mut case_lists = Vec::new();
    for path in &layout.case_list_files {
        let file_name = layout.relative_name(path);
        match read_case_list(path, &file_name) {
            Ok(parsed) => {
                for finding in parsed.findings {
                    sink.push(finding);
                }
                case_lists.extend(parsed.case_list);
            }
            Err(error) => FileSink::new(file_name, sink).push(
                Finding::error("Case list file could not be read").with_cause(error.to_string()),
            ),
        }
    }
    debug!(case_lists = case_lists.len(), "read case lists");
    check_case_lists(&case_lists, study, sink);
    case_lists
}

/// Checks within and across already parsed case lists.
pub fn check_case_lists(case_lists: &[CaseList], study: &StudyContext, sink: &mut FindingSink) {
    let mut stable_ids: BTreeMap<&str, &str> = BTreeMap::new();
    let mut categories: BTreeMap<&str, &str> = BTreeMap::new();
    let mut undefined: Vec<(&CaseList, &str)> = Vec::new();
    let mut reported: BTreeSet<&str> = BTreeSet::new();

    for case_list in case_lists {
        let mut file = FileSink::new(case_list.file_name.clone(), sink);

        if let Some(study_id) = &study.study_id {
            if &case_list.cancer_study_identifier != study_id {
                file.push(
                    Finding::error(
                        "cancer_study_identifier of case list does not match the study meta file",
                    )
                    .with_cause(case_list.cancer_study_identifier.as_str()),
                );
            }
            if !case_list.stable_id.starts_with(&format!("{study_id}_")) {
                file.push(
                    Finding::error(
                        "stable_id of case list does not start with the study identifier followed by '_'",
                    )
                    .with_cause(case_list.stable_id.as_str()),
                );
            }
        }

        match stable_ids.get(case_list.stable_id.as_str()) {
            Some(first) => file.push(
                Finding::error("Multiple case lists with this stable_id defined in the study")
                    .with_cause(format!("{} (also in {first})", case_list.stable_id)),
            ),
            None => {
                stable_ids.insert(case_list.stable_id.as_str(), case_list.file_name.as_str());
            }
        }

        if let Some(category) = case_list.category.as_deref() {
            if !is_known_category(category) {
                file.push(Finding::error("Invalid case list category").with_cause(category));
            } else if category != SHARED_CATEGORY {
                match categories.get(category) {
                    Some(first) => file.push(
                        Finding::warning(format!(
                            "Case list category has already been used in other case list ({first})"
                        ))
                        .with_cause(category),
                    ),
                    None => {
                        categories.insert(category, case_list.file_name.as_str());
                    }
                }
            }
        }

        let mut seen = BTreeSet::new();
        for sample in case_list.sample_ids.iter().map(String::as_str) {
            if !seen.insert(sample) {
                file.push(
                    Finding::warning("Duplicate sample id in case list")
                        .at_line(case_list.ids_line)
                        .with_cause(sample),
                );
                continue;
            }
            if study.sample_defined(sample) == Some(false) && reported.insert(sample) {
                undefined.push((case_list, sample));
            }
        }
    }

    for (case_list, sample) in undefined {
        FileSink::new(case_list.file_name.clone(), sink).push(
            Finding::error("Sample ID not defined in clinical file")
                .at_line(case_list.ids_line)
                .with_cause(sample),
        );
    }
}

/// Report mandatory case lists that the study does not define, in the order
/// all, sequenced, cna.
pub fn check_mandatory_case_lists(
    study_id: &str,
    case_lists: &[CaseList],
    adds_global_case_list: bool,
    has_mutations: bool,
    has_discrete_cna: bool,
    sink: &mut FindingSink,
) {
    let defined = |suffix: &str| {
        let stable_id = format!("{study_id}_{suffix}");
        case_lists.iter().any(|list| list.stable_id == stable_id)
    };

    if !adds_global_case_list && !defined("all") {
        sink.push(Finding::error(format!(
            "No case list found for stable_id '{study_id}_all', consider adding \
             'add_global_case_list: true' to the study metadata file"
        )));
    }
    if has_mutations && !defined("sequenced") {
        sink.push(Finding::error(format!(
            "No case list found for stable_id '{study_id}_sequenced', please add this case list"
        )));
    }
    if has_discrete_cna && !defined("cna") {
        sink.push(Finding::error(format!(
            "No case list found for stable_id '{study_id}_cna', please add this case list"
        )));
    }
}
