//! Resource definition files and the sample, patient and study resource
//! files that link entities to URLs.

use std::collections::BTreeSet;

use cbp_model::Finding;

use crate::base::{DataLine, FileContext, FileRules, Header, HeaderSpec, SeenKeys};
use crate::context::ResourceKind;
use crate::values::{is_valid_url, parse_int};

const RESOURCE_ID: &str = "RESOURCE_ID";

pub struct ResourceDefinitionValidator;

impl ResourceDefinitionValidator {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ResourceDefinitionValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl FileRules for ResourceDefinitionValidator {
    fn header_spec(&self, _ctx: &FileContext<'_>) -> HeaderSpec {
        HeaderSpec::required(&[RESOURCE_ID, "DISPLAY_NAME", "RESOURCE_TYPE"])
    }

    fn check_header(&mut self, ctx: &mut FileContext<'_>, _header: &Header) {
        ctx.study.resource_definitions.get_or_insert_default();
    }

    fn check_line(&mut self, ctx: &mut FileContext<'_>, header: &Header, line: &DataLine<'_>) {
        let cell = |name: &str| {
            header
                .position(name)
                .map(|index| (index, line.at(index).map(str::trim).unwrap_or_default()))
        };

        let Some((id_index, id)) = cell(RESOURCE_ID) else {
            return;
        };
        if id.is_empty() {
            ctx.push(
                Finding::error("Missing RESOURCE_ID")
                    .at_line(line.number)
                    .at_column(id_index + 1),
            );
            return;
        }

        if let Some((index, value)) = cell("PRIORITY")
            && !value.is_empty()
            && parse_int(value).is_none()
        {
            ctx.push(
                Finding::error("PRIORITY should be an integer")
                    .at_line(line.number)
                    .at_column(index + 1)
                    .with_cause(value),
            );
        }
        if let Some((index, value)) = cell("OPEN_BY_DEFAULT")
            && !value.is_empty()
            && !value.eq_ignore_ascii_case("true")
            && !value.eq_ignore_ascii_case("false")
        {
            ctx.push(
                Finding::error("OPEN_BY_DEFAULT should be true or false")
                    .at_line(line.number)
                    .at_column(index + 1)
                    .with_cause(value),
            );
        }

        let Some((type_index, resource_type)) = cell("RESOURCE_TYPE") else {
            return;
        };
        match ResourceKind::parse(resource_type) {
            Some(kind) => {
                ctx.study
                    .resource_definitions
                    .get_or_insert_default()
                    .entry(id.to_string())
                    .or_default()
                    .insert(kind);
            }
            None => ctx.push(
                Finding::error("RESOURCE_TYPE must be SAMPLE, PATIENT or STUDY")
                    .at_line(line.number)
                    .at_column(type_index + 1)
                    .with_cause(resource_type),
            ),
        }
    }
}

/// Validator for resource files of one entity kind.
pub struct ResourceDataValidator {
    kind: ResourceKind,
    /// (entity, RESOURCE_ID) pairs; one resource of each type per entity.
    seen: SeenKeys<(String, String)>,
}

impl ResourceDataValidator {
    pub fn new(kind: ResourceKind) -> Self {
        Self {
            kind,
            seen: SeenKeys::new(),
        }
    }

    fn columns(&self) -> &'static [&'static str] {
        match self.kind {
            ResourceKind::Sample => &["SAMPLE_ID", "PATIENT_ID", RESOURCE_ID, "URL"],
            ResourceKind::Patient => &["PATIENT_ID", RESOURCE_ID, "URL"],
            ResourceKind::Study => &[RESOURCE_ID, "URL"],
        }
    }

    /// Kinds the resource id was defined for, or `None` when definitions are
    /// not being checked.
    fn defined_kinds(ctx: &FileContext<'_>, id: &str) -> Option<BTreeSet<ResourceKind>> {
        match &ctx.study.resource_definitions {
            Some(definitions) => Some(definitions.get(id).cloned().unwrap_or_default()),
            None if ctx.study.is_study_mode() => Some(BTreeSet::new()),
            None => None,
        }
    }

    fn check_definition(&self, ctx: &mut FileContext<'_>, id: &str, line: usize, column: usize) {
        let Some(kinds) = Self::defined_kinds(ctx, id) else {
            return;
        };
        let kind = self.kind.as_str();
        if !kinds.contains(&self.kind) {
            ctx.push(
                Finding::error(format!(
                    "{kind} resource is not defined correctly in the resource definition file"
                ))
                .at_line(line)
                .at_column(column)
                .with_cause(id),
            );
        } else if kinds.len() > 1 {
            ctx.push(
                Finding::warning(format!(
                    "{kind} resource has been used by more than one RESOURCE_TYPE"
                ))
                .at_line(line)
                .at_column(column)
                .with_cause(id),
            );
        }
    }
}

impl FileRules for ResourceDataValidator {
    fn header_spec(&self, _ctx: &FileContext<'_>) -> HeaderSpec {
        HeaderSpec::required(self.columns())
    }

    fn check_line(&mut self, ctx: &mut FileContext<'_>, header: &Header, line: &DataLine<'_>) {
        let cell = |name: &str| {
            header
                .position(name)
                .map(|index| (index, line.at(index).map(str::trim).unwrap_or_default()))
        };

        let entity = match self.kind {
            ResourceKind::Sample => cell("SAMPLE_ID").map(|(index, sample)| {
                ctx.check_sample_defined(sample, line.number, index + 1);
                sample
            }),
            ResourceKind::Patient => cell("PATIENT_ID").map(|(index, patient)| {
                ctx.check_patient_defined(patient, line.number, index + 1);
                patient
            }),
            ResourceKind::Study => None,
        }
        .unwrap_or_default();

        let Some((id_index, id)) = cell(RESOURCE_ID) else {
            return;
        };
        if id.is_empty() {
            ctx.push(
                Finding::error("Missing RESOURCE_ID")
                    .at_line(line.number)
                    .at_column(id_index + 1),
            );
        } else {
            self.check_definition(ctx, id, line.number, id_index + 1);
        }

        if let Some((index, url)) = cell("URL")
            && !is_valid_url(url)
        {
            ctx.push(
                Finding::error("Resource URL is not an url")
                    .at_line(line.number)
                    .at_column(index + 1)
                    .with_cause(url),
            );
        }

        let key = (entity.to_string(), id.to_string());
        if !id.is_empty()
            && let Some(first) = self.seen.record(key, line.number)
        {
            ctx.push(
                Finding::error(format!(
                    "Duplicated resources found; first defined on line {first}"
                ))
                .at_line(line.number)
                .at_column(id_index + 1)
                .with_cause(format!("({entity}, {id})")),
            );
        }
    }
}
