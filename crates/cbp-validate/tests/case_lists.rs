//! Tests for case-list checks.

use std::collections::BTreeMap;

use cbp_model::{CaseList, Finding, Severity};
use cbp_validate::FindingSink;
use cbp_validate::StudyContext;
use cbp_validate::case_lists::{check_case_lists, check_mandatory_case_lists};

fn case_list(file: &str, stable_id: &str, category: Option<&str>, ids: &[&str]) -> CaseList {
    CaseList {
        file_name: format!("case_lists/{file}"),
        stable_id: stable_id.to_string(),
        cancer_study_identifier: "brca_tcga_pub".to_string(),
        name: "A list".to_string(),
        description: "Some samples".to_string(),
        category: category.map(str::to_string),
        sample_ids: ids.iter().map(|id| (*id).to_string()).collect(),
        ids_line: 6,
    }
}

fn study_with_samples(samples: &[&str]) -> StudyContext {
    let mut study = StudyContext::for_study();
    study.study_id = Some("brca_tcga_pub".to_string());
    study.samples = Some(
        samples
            .iter()
            .map(|sample| ((*sample).to_string(), "P-1".to_string()))
            .collect::<BTreeMap<_, _>>(),
    );
    study
}

fn check(lists: &[CaseList], study: &StudyContext) -> Vec<Finding> {
    let mut sink = FindingSink::new();
    check_case_lists(lists, study, &mut sink);
    sink.into_findings()
}

// --- within and across lists ---

#[test]
fn duplicated_stable_id_is_an_error() {
    let study = study_with_samples(&["S-1"]);
    let lists = [
        case_list("cases_all.txt", "brca_tcga_pub_all", None, &["S-1"]),
        case_list("cases_all_again.txt", "brca_tcga_pub_all", None, &["S-1"]),
    ];

    let findings = check(&lists, &study);

    assert_eq!(findings.len(), 1, "{findings:?}");
    assert_eq!(findings[0].severity, Severity::Error);
    assert!(findings[0].message.to_lowercase().contains("multiple"));
    assert!(
        findings[0]
            .cause
            .as_deref()
            .is_some_and(|cause| cause.starts_with("brca_tcga_pub_all"))
    );
    assert_eq!(
        findings[0].file.as_deref(),
        Some("case_lists/cases_all_again.txt")
    );
}

#[test]
fn repeated_sample_is_a_warning() {
    let study = study_with_samples(&["S-1", "S-2"]);
    let lists = [case_list(
        "cases_all.txt",
        "brca_tcga_pub_all",
        None,
        &["S-1", "S-2", "S-1"],
    )];

    let findings = check(&lists, &study);

    assert_eq!(findings.len(), 1, "{findings:?}");
    assert_eq!(findings[0].severity, Severity::Warning);
    assert!(findings[0].message.to_lowercase().contains("duplicate"));
    assert_eq!(findings[0].line, Some(6));
    assert_eq!(findings[0].cause.as_deref(), Some("S-1"));
}

#[test]
fn unknown_category_is_an_error() {
    let study = study_with_samples(&["S-1"]);
    let lists = [case_list(
        "cases_all.txt",
        "brca_tcga_pub_all",
        Some("all_cases_with_spam"),
        &["S-1"],
    )];

    let findings = check(&lists, &study);

    assert_eq!(findings.len(), 1, "{findings:?}");
    assert_eq!(findings[0].severity, Severity::Error);
    assert!(findings[0].message.to_lowercase().contains("invalid"));
}

#[test]
fn reused_category_is_a_warning_except_other() {
    let study = study_with_samples(&["S-1"]);
    let lists = [
        case_list("a.txt", "brca_tcga_pub_a", Some("all_cases_in_study"), &["S-1"]),
        case_list("b.txt", "brca_tcga_pub_b", Some("all_cases_in_study"), &["S-1"]),
        case_list("c.txt", "brca_tcga_pub_c", Some("other"), &["S-1"]),
        case_list("d.txt", "brca_tcga_pub_d", Some("other"), &["S-1"]),
    ];

    let findings = check(&lists, &study);

    assert_eq!(findings.len(), 1, "{findings:?}");
    assert_eq!(findings[0].severity, Severity::Warning);
    assert!(
        findings[0]
            .message
            .to_lowercase()
            .contains("used in other case list")
    );
    assert_eq!(findings[0].file.as_deref(), Some("case_lists/b.txt"));
}

#[test]
fn stable_id_must_carry_the_study_prefix() {
    let study = study_with_samples(&["S-1"]);
    let lists = [case_list("cases_all.txt", "spam_all", None, &["S-1"])];

    let findings = check(&lists, &study);

    assert_eq!(findings.len(), 1, "{findings:?}");
    assert_eq!(findings[0].cause.as_deref(), Some("spam_all"));
}

#[test]
fn undefined_samples_are_reported_once_in_encounter_order() {
    let study = study_with_samples(&["S-1"]);
    let lists = [
        case_list("a.txt", "brca_tcga_pub_a", None, &["S-9", "S-1", "S-3"]),
        case_list("b.txt", "brca_tcga_pub_b", None, &["S-3", "S-2"]),
    ];

    let findings = check(&lists, &study);

    let reported: Vec<(&str, &str)> = findings
        .iter()
        .map(|finding| {
            (
                finding.file.as_deref().unwrap_or_default(),
                finding.cause.as_deref().unwrap_or_default(),
            )
        })
        .collect();
    assert_eq!(
        reported,
        [
            ("case_lists/a.txt", "S-9"),
            ("case_lists/a.txt", "S-3"),
            ("case_lists/b.txt", "S-2"),
        ]
    );
}

#[test]
fn samples_are_not_checked_without_clinical_data() {
    let study = StudyContext::for_data_directory();
    let lists = [case_list("a.txt", "brca_tcga_pub_a", None, &["S-9"])];

    assert!(check(&lists, &study).is_empty());
}

// --- mandatory lists ---

#[test]
fn mandatory_lists_are_reported_in_fixed_order() {
    let mut sink = FindingSink::new();
    check_mandatory_case_lists("spam", &[], false, true, true, &mut sink);
    let findings = sink.into_findings();

    assert_eq!(findings.len(), 3);
    assert!(findings.iter().all(|finding| finding.severity == Severity::Error));
    assert!(findings[0].message.contains("spam_all"));
    assert!(findings[0].message.contains("add_global_case_list"));
    assert!(findings[1].message.contains("spam_sequenced"));
    assert!(findings[1].message.contains("please add this case list"));
    assert!(findings[2].message.contains("spam_cna"));
    assert!(findings[2].message.contains("please add this case list"));
}

#[test]
fn defined_or_generated_lists_satisfy_the_requirement() {
    let mut list = case_list("cases_sequenced.txt", "spam_sequenced", None, &[]);
    list.cancer_study_identifier = "spam".to_string();
    let mut sink = FindingSink::new();

    check_mandatory_case_lists("spam", &[list], true, true, false, &mut sink);

    assert!(sink.is_empty());
}
