//! Gene panel matrix: which gene panel each sample was profiled with, per
//! genetic profile.

use std::collections::BTreeSet;

use cbp_model::{Finding, MetaFileType, Severity};

use crate::base::{DataLine, FileContext, FileRules, Header, HeaderSpec};
use crate::values::is_numeric_null;

const SAMPLE_COLUMN: &str = "SAMPLE_ID";

#[derive(Default)]
pub struct GenePanelMatrixValidator {
    samples: BTreeSet<String>,
}

impl GenePanelMatrixValidator {
    pub fn new() -> Self {
        Self::default()
    }
}

impl FileRules for GenePanelMatrixValidator {
    fn header_spec(&self, _ctx: &FileContext<'_>) -> HeaderSpec {
        HeaderSpec::ordered(&[SAMPLE_COLUMN]).with_unique(
            SAMPLE_COLUMN,
            Severity::Error,
            "Duplicated sample id.",
        )
    }

    fn check_header(&mut self, ctx: &mut FileContext<'_>, header: &Header) {
        if !ctx.study.is_study_mode() || ctx.study.profile_stable_ids.is_empty() {
            return;
        }
        for (index, column) in header.columns.iter().enumerate().skip(1) {
            if !ctx.study.profile_stable_ids.contains_key(column) {
                ctx.push(
                    Finding::error("Column does not refer to the stable_id of a genetic profile in the study")
                        .at_line(header.line)
                        .at_column(index + 1)
                        .with_cause(column.as_str()),
                );
            }
        }
    }

    fn check_line(&mut self, ctx: &mut FileContext<'_>, header: &Header, line: &DataLine<'_>) {
        let sample = line.at(0).map(str::trim).unwrap_or_default();
        if ctx.check_sample_defined(sample, line.number, 1) {
            self.samples.insert(sample.to_string());
        }

        let portal = ctx.portal;
        let Some(panels) = portal.gene_panels.as_ref() else {
            return;
        };
        for index in 1..header.len() {
            let panel = line.at(index).map(str::trim).unwrap_or_default();
            if !is_numeric_null(panel) && !panels.contains(panel) {
                ctx.push(
                    Finding::error(
                        "Gene panel ID is not in database. Please import this gene panel before loading study data.",
                    )
                    .at_line(line.number)
                    .at_column(index + 1)
                    .with_cause(panel),
                );
            }
        }
    }

    fn finish(&mut self, ctx: &mut FileContext<'_>, _header: &Header) {
        if !ctx.study.file_types.contains(&MetaFileType::Mutations) {
            return;
        }
        let missing: Vec<&str> = ctx
            .study
            .mutation_samples
            .iter()
            .filter(|sample| !self.samples.contains(*sample))
            .map(String::as_str)
            .collect();
        if !missing.is_empty() {
            let cause = ctx.options.summarize(missing);
            ctx.push(
                Finding::warning("Samples profiled in the mutation file are missing from the gene panel matrix")
                    .with_cause(cause),
            );
        }
    }
}
