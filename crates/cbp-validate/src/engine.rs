//! Runs one meta file's data file through its validator.

use std::path::Path;
use std::time::Instant;

use tracing::{debug, info_span};

use cbp_ingest::{IngestError, read_text_file};
use cbp_model::{Finding, MetaDescriptor, MetaFileType, PortalInstance};
use cbp_reference::ChromosomeSource;

use crate::base::{FileContext, FileOutcome, run_data_file};
use crate::context::StudyContext;
use crate::meta_checks::check_meta;
use crate::options::ValidationOptions;
use crate::registry::{Dispatch, ValidatorKind};
use crate::sink::{FileSink, FindingSink};

/// Read-only inputs shared by every file of a run.
#[derive(Clone, Copy)]
pub struct Environment<'a> {
    pub portal: &'a PortalInstance,
    pub options: &'a ValidationOptions,
    pub chromosomes: &'a dyn ChromosomeSource,
}

/// Check a meta file's own fields.
pub fn validate_meta(
    env: Environment<'_>,
    meta: &MetaDescriptor,
    dispatch: Dispatch,
    study: &mut StudyContext,
    sink: &mut FindingSink,
) {
    let mut file_sink = FileSink::new(meta.file_name.clone(), sink);
    check_meta(meta, dispatch.file_type, env.portal, study, &mut file_sink);
}

/// Validate the data file of `meta`, plus its driver annotation file if it
/// declares one.
pub fn validate_data_files(
    env: Environment<'_>,
    root: &Path,
    meta: &MetaDescriptor,
    dispatch: Dispatch,
    study: &mut StudyContext,
    sink: &mut FindingSink,
) {
    let Some(kind) = dispatch.validator else {
        return;
    };
    let Some(data_file) = meta.data_filename() else {
        return;
    };
    study.file_types.insert(dispatch.file_type);
    if dispatch.file_type == MetaFileType::CancerType {
        study.cancer_type_files.push(data_file.to_string());
    }
    validate_file(env, root, meta, data_file, kind, study, sink);

    if let Some(annotations) = meta.get("pd_annotations_filename") {
        validate_file(
            env,
            root,
            meta,
            annotations,
            ValidatorKind::PdAnnotations,
            study,
            sink,
        );
    }
}

/// Validate a single data file referenced by `meta`.
pub fn validate_file(
    env: Environment<'_>,
    root: &Path,
    meta: &MetaDescriptor,
    data_file: &str,
    kind: ValidatorKind,
    study: &mut StudyContext,
    sink: &mut FindingSink,
) -> Option<FileOutcome> {
    let span = info_span!("file", file = data_file, meta = %meta.file_name);
    let _guard = span.enter();
    let start = Instant::now();

    let path = root.join(data_file);
    if !path.is_file() {
        FileSink::new(meta.file_name.clone(), sink).push(
            Finding::error("Data file referenced by meta file does not exist")
                .with_cause(data_file),
        );
        return None;
    }

    let text = match read_text_file(&path) {
        Ok(text) => text,
        Err(IngestError::InvalidUtf8 { line, .. }) => {
            FileSink::new(data_file, sink).push(
                Finding::error("File contains invalid UTF-8 bytes. Please check values in file")
                    .at_line(line),
            );
            return None;
        }
        Err(error) => {
            FileSink::new(data_file, sink).push(
                Finding::error("Data file could not be read").with_cause(error.to_string()),
            );
            return None;
        }
    };

    let mut rules = kind.build();
    let mut ctx = FileContext {
        portal: env.portal,
        options: env.options,
        meta,
        study,
        chromosomes: env.chromosomes,
        sink: FileSink::new(data_file, sink),
    };
    let outcome = run_data_file(rules.as_mut(), &mut ctx, &text);
    debug!(
        ?outcome,
        elapsed_ms = start.elapsed().as_millis() as u64,
        "validated data file"
    );
    Some(outcome)
}
