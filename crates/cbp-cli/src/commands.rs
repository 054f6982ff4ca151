use std::time::Instant;

use anyhow::{Context, Result};
use tracing::{info, info_span};

use cbp_cli::config::{OptionOverrides, PortalSource, load_options};
use cbp_model::{ExitStatus, Finding};
use cbp_report::{HtmlOptions, write_error_file, write_html_table};
use cbp_validate::{validate_data_directory, validate_study};

use crate::cli::ValidateArgs;

/// Findings of a completed run.
pub struct ValidateOutcome {
    pub findings: Vec<Finding>,
    pub status: ExitStatus,
}

pub fn run_validate(args: &ValidateArgs) -> Result<ValidateOutcome> {
    let span = info_span!("validate", dir = %args.dir.display());
    let _guard = span.enter();
    let started = Instant::now();

    let overrides = OptionOverrides {
        relaxed_mode: args.relaxed_clinical_definitions,
        strict_maf_checks: args.strict_maf_checks,
        max_reported_values: args.max_reported_values,
    };
    let options = load_options(args.options.as_deref(), &overrides)?;

    let source = PortalSource::select(
        args.portal_info_dir.as_deref(),
        args.portal_url.as_deref(),
        args.no_portal_checks,
    );
    let portal = source.load_portal()?;
    let chromosomes = source.chromosome_source()?;

    let findings = if args.data_directory {
        validate_data_directory(&args.dir, &portal, &options, &chromosomes)
    } else {
        validate_study(&args.dir, &portal, &options, &chromosomes)
    }
    .with_context(|| format!("validate {}", args.dir.display()))?;

    let status = ExitStatus::from_findings(&findings);
    if let Some(path) = &args.html_table {
        let html_options = HtmlOptions::new(args.dir.display().to_string());
        write_html_table(path, &findings, &html_options)?;
    }
    if let Some(path) = &args.error_file {
        write_error_file(path, &findings)?;
    }
    info!(
        findings = findings.len(),
        status = %status,
        elapsed_ms = started.elapsed().as_millis(),
        "validation finished"
    );
    Ok(ValidateOutcome { findings, status })
}
