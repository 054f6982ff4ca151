//! Generic assay matrices: one row per assay entity, one column per sample
//! (or per patient for patient-level assays).

use cbp_model::{Finding, Severity};

use crate::base::{DataLine, FileContext, FileRules, Header, HeaderSpec};
use crate::values::{has_whitespace, is_numeric_null, parse_float};

const ENTITY_COLUMN: &str = "ENTITY_STABLE_ID";

/// Values of categorical assays whose type fixes the vocabulary.
const RESTRICTED_CATEGORIES: &[(&str, &[&str])] = &[("ARMLEVEL_CNA", &["Gain", "Loss", "Unchanged"])];

const BINARY_VALUES: &[&str] = &["true", "false", "yes", "no"];

/// Cell semantics of a generic assay file, from its `datatype`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenericAssayKind {
    Continuous,
    Categorical,
    Binary,
}

pub struct GenericAssayValidator {
    kind: GenericAssayKind,
    value_columns: Vec<usize>,
    allowed_categories: Option<&'static [&'static str]>,
}

impl GenericAssayValidator {
    pub fn new(kind: GenericAssayKind) -> Self {
        Self {
            kind,
            value_columns: Vec::new(),
            allowed_categories: None,
        }
    }

    fn meta_properties(ctx: &FileContext<'_>) -> Vec<String> {
        ctx.meta
            .get("generic_entity_meta_properties")
            .map(|raw| {
                raw.split(',')
                    .map(|property| property.trim().to_uppercase())
                    .filter(|property| !property.is_empty())
                    .collect()
            })
            .unwrap_or_default()
    }

    fn check_cell(&self, ctx: &mut FileContext<'_>, value: &str, line: usize, column: usize) {
        let value = value.trim();
        if is_numeric_null(value) {
            return;
        }
        let message = match self.kind {
            GenericAssayKind::Continuous => {
                let number = value.trim_start_matches(['>', '<']);
                parse_float(number)
                    .is_none()
                    .then(|| "Value is neither a real number, a limit value (>x or <x) nor NA".to_string())
            }
            GenericAssayKind::Categorical => self.allowed_categories.and_then(|allowed| {
                (!allowed.contains(&value))
                    .then(|| format!("Invalid value: possible values are [{}]", allowed.join(", ")))
            }),
            GenericAssayKind::Binary => (!BINARY_VALUES.contains(&value.to_ascii_lowercase().as_str()))
                .then(|| "Value of binary assay must be true, false, yes, no or NA".to_string()),
        };
        if let Some(message) = message {
            ctx.push(
                Finding::error(message)
                    .at_line(line)
                    .at_column(column)
                    .with_cause(value),
            );
        }
    }
}

impl FileRules for GenericAssayValidator {
    fn header_spec(&self, _ctx: &FileContext<'_>) -> HeaderSpec {
        HeaderSpec::required(&[ENTITY_COLUMN]).with_unique(
            ENTITY_COLUMN,
            Severity::Warning,
            "Duplicate entity in file; this row will be skipped",
        )
    }

    fn check_header(&mut self, ctx: &mut FileContext<'_>, header: &Header) {
        let properties = Self::meta_properties(ctx);
        for property in &properties {
            if !header.contains(property) {
                ctx.push(
                    Finding::error(format!("Missing column: {property}"))
                        .at_line(header.line)
                        .with_cause(property.as_str()),
                );
            }
        }

        self.allowed_categories = ctx.meta.get("generic_assay_type").and_then(|assay_type| {
            RESTRICTED_CATEGORIES
                .iter()
                .find(|(name, _)| *name == assay_type)
                .map(|(_, values)| *values)
        });

        let patient_level = ctx.meta.flag("patient_level");
        self.value_columns = header
            .columns
            .iter()
            .enumerate()
            .filter(|(_, name)| *name != ENTITY_COLUMN && !properties.contains(name))
            .map(|(index, _)| index)
            .collect();

        for &index in &self.value_columns {
            let id = header.columns[index].as_str();
            if id.is_empty() {
                continue;
            }
            if has_whitespace(id) {
                ctx.push(
                    Finding::error("Whitespace found in column id")
                        .at_line(header.line)
                        .at_column(index + 1)
                        .with_cause(id),
                );
            } else if patient_level {
                ctx.check_patient_defined(id, header.line, index + 1);
            } else {
                ctx.check_sample_defined(id, header.line, index + 1);
            }
        }
    }

    fn check_line(&mut self, ctx: &mut FileContext<'_>, header: &Header, line: &DataLine<'_>) {
        if line.get(header, ENTITY_COLUMN).is_some_and(|id| id.trim().is_empty()) {
            ctx.push(
                Finding::error("Missing ENTITY_STABLE_ID")
                    .at_line(line.number)
                    .at_column(header.position(ENTITY_COLUMN).unwrap_or_default() + 1),
            );
            return;
        }
        for &index in &self.value_columns {
            if let Some(value) = line.at(index) {
                self.check_cell(ctx, value, line.number, index + 1);
            }
        }
    }
}
