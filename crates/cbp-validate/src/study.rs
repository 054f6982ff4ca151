//! Study and data-directory drivers.
//!
//! A run reads every meta file, resolves each one through the registry,
//! then validates the meta/data pairs in processing order: `meta_study`,
//! cancer types, sample attributes, patient attributes, resource
//! definitions, profile and other data files, and gene panel matrices last.
//! Study-level composition checks (cancer type files, tags file, case
//! lists) run once all files have been seen.

use std::path::Path;
use std::time::Instant;

use tracing::{info, info_span};

use cbp_ingest::{StudyLayout, discover_study, read_meta_file};
use cbp_model::{Finding, MetaDescriptor, MetaFileType, Severity};

use crate::case_lists::{check_mandatory_case_lists, validate_case_lists};
use crate::context::StudyContext;
use crate::engine::{Environment, validate_data_files, validate_meta};
use crate::error::{Result, ValidationError};
use crate::registry::{Dispatch, resolve};
use crate::sink::{FileSink, FindingSink};

/// A meta file with its resolved dispatch entry.
struct Resolved {
    meta: MetaDescriptor,
    dispatch: Dispatch,
}

/// Validate a full study directory.
///
/// `study` is reset before use; its final state is left for the caller to
/// inspect.
pub fn run_study(
    dir: &Path,
    env: Environment<'_>,
    study: &mut StudyContext,
    sink: &mut FindingSink,
) -> Result<()> {
    let span = info_span!("study", dir = %dir.display());
    let _guard = span.enter();
    let start = Instant::now();

    *study = StudyContext::for_study();
    let layout = discover_study(dir).map_err(ValidationError::StudyDirectory)?;
    let resolved = read_and_resolve(&layout, sink)?;

    let study_meta = resolved
        .iter()
        .find(|entry| entry.dispatch.file_type == MetaFileType::Study)
        .map(|entry| &entry.meta);
    if study_meta.is_none() {
        sink.push(Finding::error("No valid study file detected"));
    }

    validate_pairs(&layout, &resolved, env, study, sink);

    if let Some(study_meta) = study_meta {
        check_cancer_type_files(study, sink);
        check_study_cancer_type(study_meta, env, study, sink);
        check_tags_file(&layout, study_meta, sink);
    }

    let case_lists = validate_case_lists(&layout, study, sink);
    if let Some(study_meta) = study_meta
        && let Some(study_id) = study.study_id.as_deref()
    {
        check_mandatory_case_lists(
            study_id,
            &case_lists,
            study_meta.flag("add_global_case_list"),
            study.file_types.contains(&MetaFileType::Mutations),
            study.file_types.contains(&MetaFileType::CnaDiscrete)
                || study.file_types.contains(&MetaFileType::CnaDiscreteLong),
            sink,
        );
    }

    finish_run(env, sink);
    info!(
        files = resolved.len(),
        case_lists = case_lists.len(),
        findings = sink.len(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "study validated"
    );
    Ok(())
}

/// Validate a directory of meta/data pairs that is not a complete study.
///
/// No `meta_study`, cancer type or case-list checks are made. Sample and
/// patient references are only checked once a clinical file has been read.
pub fn run_data_directory(
    dir: &Path,
    env: Environment<'_>,
    study: &mut StudyContext,
    sink: &mut FindingSink,
) -> Result<()> {
    let span = info_span!("data_directory", dir = %dir.display());
    let _guard = span.enter();
    let start = Instant::now();

    *study = StudyContext::for_data_directory();
    let layout = discover_study(dir).map_err(ValidationError::StudyDirectory)?;
    let resolved = read_and_resolve(&layout, sink)?;
    validate_pairs(&layout, &resolved, env, study, sink);

    finish_run(env, sink);
    info!(
        files = resolved.len(),
        findings = sink.len(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "data directory validated"
    );
    Ok(())
}

fn read_and_resolve(layout: &StudyLayout, sink: &mut FindingSink) -> Result<Vec<Resolved>> {
    let mut resolved = Vec::with_capacity(layout.meta_files.len());
    for path in &layout.meta_files {
        let file_name = layout.relative_name(path);
        let parsed =
            read_meta_file(path, &file_name).map_err(|source| ValidationError::UnreadableMeta {
                path: path.clone(),
                source,
            })?;
        for finding in parsed.findings {
            sink.push(finding);
        }
        let dispatch = resolve(&parsed.meta)?;
        resolved.push(Resolved {
            meta: parsed.meta,
            dispatch,
        });
    }
    resolved.sort_by(|a, b| {
        a.dispatch
            .file_type
            .processing_rank()
            .cmp(&b.dispatch.file_type.processing_rank())
            .then_with(|| a.meta.file_name.cmp(&b.meta.file_name))
    });
    Ok(resolved)
}

fn validate_pairs(
    layout: &StudyLayout,
    resolved: &[Resolved],
    env: Environment<'_>,
    study: &mut StudyContext,
    sink: &mut FindingSink,
) {
    for entry in resolved {
        validate_meta(env, &entry.meta, entry.dispatch, study, sink);
        validate_data_files(env, &layout.root, &entry.meta, entry.dispatch, study, sink);
    }
}

fn check_cancer_type_files(study: &StudyContext, sink: &mut FindingSink) {
    if study.cancer_type_files.len() > 1 {
        sink.push(
            Finding::error("Multiple cancer type files detected")
                .with_cause(study.cancer_type_files.join(", ")),
        );
    }
}

fn check_study_cancer_type(
    study_meta: &MetaDescriptor,
    env: Environment<'_>,
    study: &StudyContext,
    sink: &mut FindingSink,
) {
    let Some(cancer_type) = study.type_of_cancer.as_deref() else {
        return;
    };
    if study.defines_cancer_type(cancer_type) || env.portal.cancer_type(cancer_type).is_some() {
        return;
    }
    let severity = if env.portal.cancer_types.is_some() {
        Severity::Error
    } else if !env.portal.checks_enabled {
        Severity::Warning
    } else {
        return;
    };
    let mut finding = Finding::new(
        severity,
        "Cancer type of the study is neither known to the portal nor defined in a cancer type file",
    )
    .with_cause(cancer_type);
    if let Some(line) = study_meta.line_of("type_of_cancer") {
        finding = finding.at_line(line);
    }
    FileSink::new(study_meta.file_name.clone(), sink).push(finding);
}

fn check_tags_file(layout: &StudyLayout, study_meta: &MetaDescriptor, sink: &mut FindingSink) {
    let Some(tags_file) = study_meta.get("tags_file") else {
        return;
    };
    let line = study_meta.line_of("tags_file").unwrap_or_default();
    let mut file = FileSink::new(study_meta.file_name.clone(), sink);
    let text = match std::fs::read_to_string(layout.root.join(tags_file)) {
        Ok(text) => text,
        Err(error) => {
            file.push(
                Finding::error("Tags file could not be read")
                    .at_line(line)
                    .with_cause(format!("{tags_file}: {error}")),
            );
            return;
        }
    };
    if let Err(error) = serde_yaml::from_str::<serde_yaml::Value>(&text) {
        file.push(
            Finding::error("Tags file is not valid YAML")
                .at_line(line)
                .with_cause(format!("{tags_file}: {error}")),
        );
    }
}

fn finish_run(env: Environment<'_>, sink: &mut FindingSink) {
    if !env.portal.checks_enabled {
        sink.push(Finding::warning(
            "Portal checks were skipped; references to portal data were not validated",
        ));
    }
    sink.push(Finding::info("Validation complete"));
}
