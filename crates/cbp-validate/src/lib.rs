//! Validation engine for cBioPortal study directories.
//!
//! [`validate_study`] and [`validate_data_directory`] are the entry points.
//! Both return the ordered finding stream of the run; a Rust error is only
//! returned for setup problems that stop the run (see [`ValidationError`]).
//!
//! Callers that want to look at cross-file state afterwards can drive
//! [`study::run_study`] themselves with their own [`StudyContext`].

#![deny(unsafe_code)]

pub mod base;
pub mod case_lists;
pub mod context;
pub mod engine;
pub mod error;
pub mod genes;
pub mod meta_checks;
pub mod options;
pub mod registry;
pub mod sink;
pub mod study;
pub mod validators;
pub mod values;

use std::path::Path;

use cbp_model::{Finding, PortalInstance};
use cbp_reference::ChromosomeSource;

pub use crate::base::{FileContext, FileOutcome, FileRules, HeaderSpec, run_data_file};
pub use crate::context::{ResourceKind, StudyContext};
pub use crate::engine::Environment;
pub use crate::error::{Result, ValidationError};
pub use crate::options::ValidationOptions;
pub use crate::registry::{Dispatch, ValidatorKind, resolve};
pub use crate::sink::{FileSink, FindingSink};

/// Validate the study in `dir`.
pub fn validate_study(
    dir: &Path,
    portal: &PortalInstance,
    options: &ValidationOptions,
    chromosomes: &dyn ChromosomeSource,
) -> Result<Vec<Finding>> {
    let env = Environment {
        portal,
        options,
        chromosomes,
    };
    let mut study = StudyContext::for_study();
    let mut sink = FindingSink::new();
    study::run_study(dir, env, &mut study, &mut sink)?;
    Ok(sink.into_findings())
}

/// Validate the meta/data pairs in `dir` without study-level checks.
pub fn validate_data_directory(
    dir: &Path,
    portal: &PortalInstance,
    options: &ValidationOptions,
    chromosomes: &dyn ChromosomeSource,
) -> Result<Vec<Finding>> {
    let env = Environment {
        portal,
        options,
        chromosomes,
    };
    let mut study = StudyContext::for_data_directory();
    let mut sink = FindingSink::new();
    study::run_data_directory(dir, env, &mut study, &mut sink)?;
    Ok(sink.into_findings())
}
