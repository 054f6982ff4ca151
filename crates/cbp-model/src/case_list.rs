use serde::Serialize;

/// Case-list categories the portal understands.
pub const CASE_LIST_CATEGORIES: &[&str] = &[
    "all_cases_in_study",
    "all_cases_with_mutation_data",
    "all_cases_with_cna_data",
    "all_cases_with_log2_cna_data",
    "all_cases_with_methylation_data",
    "all_cases_with_mrna_array_data",
    "all_cases_with_mrna_rnaseq_data",
    "all_cases_with_rppa_data",
    "all_cases_with_microrna_data",
    "all_cases_with_mutation_and_cna_data",
    "all_cases_with_mutation_and_cna_and_mrna_data",
    "all_cases_with_gsva_data",
    "all_cases_with_sv_data",
    "other",
];

/// Category that may be shared by any number of lists.
pub const SHARED_CATEGORY: &str = "other";

/// Named subset of a study's samples, read from `case_lists/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CaseList {
    /// Case-list file name, relative to the study directory.
    pub file_name: String,
    pub stable_id: String,
    pub cancer_study_identifier: String,
    pub name: String,
    pub description: String,
    pub category: Option<String>,
    /// Sample ids in file order, repeats included.
    pub sample_ids: Vec<String>,
    /// Line of the `case_list_ids` entry.
    pub ids_line: usize,
}

impl CaseList {
    /// Stable id without the `<study>_` prefix, e.g. `all` for `brca_all`.
    pub fn suffix(&self) -> &str {
        let prefix_len = self.cancer_study_identifier.len();
        if prefix_len > 0
            && self.stable_id.len() > prefix_len
            && self.stable_id.starts_with(&self.cancer_study_identifier)
            && self.stable_id.as_bytes()[prefix_len] == b'_'
        {
            &self.stable_id[prefix_len + 1..]
        } else {
            &self.stable_id
        }
    }
}

pub fn is_known_category(category: &str) -> bool {
    CASE_LIST_CATEGORIES.contains(&category)
}
