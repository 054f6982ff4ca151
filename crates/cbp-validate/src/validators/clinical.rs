//! Sample and patient attribute files.
//!
//! Both files start with four `#` rows (display name, description, datatype,
//! priority) before the attribute header. The sample file defines the sample
//! ids every later file refers to.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::LazyLock;

use regex::Regex;

use cbp_model::{AttributeDatatype, Finding, MetaFileType, Severity};

use crate::base::{DataLine, FileContext, FileRules, Header, HeaderSpec};
use crate::values::{
    is_clinical_null, is_valid_id, looks_like_date, normalized_sample_key, parse_float,
};

static ATTRIBUTE_NAME_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_]+$").expect("Invalid attribute name regex"));

static TCGA_PREFIX_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^TCGA-").expect("Invalid TCGA prefix regex"));

/// Attributes the portal computes itself.
const CALCULATED_ATTRIBUTES: &[&str] = &["MUTATION_COUNT", "FRACTION_GENOME_ALTERED"];

/// Attributes that only make sense per patient.
const PATIENT_ONLY_ATTRIBUTES: &[&str] = &[
    "OS_STATUS",
    "OS_MONTHS",
    "DFS_STATUS",
    "DFS_MONTHS",
    "PFS_STATUS",
    "PFS_MONTHS",
];

/// Attributes that only make sense per sample.
const SAMPLE_ONLY_ATTRIBUTES: &[&str] = &["SAMPLE_TYPE", "CANCER_TYPE", "CANCER_TYPE_DETAILED"];

/// Survival status attributes with a fixed vocabulary, matched case-sensitively.
const STATUS_VALUES: &[(&str, &[&str])] = &[
    ("OS_STATUS", &["0:LIVING", "1:DECEASED"]),
    ("DFS_STATUS", &["0:DiseaseFree", "1:Recurred/Progressed"]),
];

/// Survival status attributes only checked for their `0:` / `1:` prefix.
const PREFIXED_STATUS_ATTRIBUTES: &[&str] = &["PFS_STATUS"];

const DECEASED: &str = "1:DECEASED";

const DEFINITION_ROWS: usize = 4;

/// Which of the two clinical files is being validated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClinicalLevel {
    Sample,
    Patient,
}

impl ClinicalLevel {
    fn id_column(self) -> &'static str {
        match self {
            Self::Sample => "SAMPLE_ID",
            Self::Patient => "PATIENT_ID",
        }
    }

    fn banned(self) -> &'static [&'static str] {
        match self {
            Self::Sample => PATIENT_ONLY_ATTRIBUTES,
            Self::Patient => SAMPLE_ONLY_ATTRIBUTES,
        }
    }
}

pub struct ClinicalValidator {
    level: ClinicalLevel,
    definitions: Vec<(usize, Vec<String>)>,
    datatypes: BTreeMap<usize, AttributeDatatype>,
    normalized_ids: BTreeMap<String, String>,
    /// Patient file only: line each patient is defined on.
    patient_lines: BTreeMap<String, usize>,
}

impl ClinicalValidator {
    pub fn new(level: ClinicalLevel) -> Self {
        Self {
            level,
            definitions: Vec::new(),
            datatypes: BTreeMap::new(),
            normalized_ids: BTreeMap::new(),
            patient_lines: BTreeMap::new(),
        }
    }

    fn check_definitions(&mut self, ctx: &mut FileContext<'_>, header: &Header) {
        for (line, row) in &self.definitions {
            if row.len() != header.len() {
                ctx.push(
                    Finding::error(format!(
                        "Attribute definition row has {} columns, expected {} based on the header",
                        row.len(),
                        header.len()
                    ))
                    .at_line(*line),
                );
            }
        }
        if self.definitions.len() != DEFINITION_ROWS {
            return;
        }

        let (datatype_line, datatype_row) = &self.definitions[2];
        for (index, value) in datatype_row.iter().enumerate() {
            match value.parse::<AttributeDatatype>() {
                Ok(datatype) => {
                    self.datatypes.insert(index, datatype);
                }
                Err(_) => ctx.push(
                    Finding::error("Invalid datatype definition, expected STRING, NUMBER or BOOLEAN")
                        .at_line(*datatype_line)
                        .at_column(index + 1)
                        .with_cause(value.as_str()),
                ),
            }
        }

        let (priority_line, priority_row) = &self.definitions[3];
        for (index, value) in priority_row.iter().enumerate() {
            if value.parse::<i64>().is_err() {
                ctx.push(
                    Finding::error("Priority definition should be an integer")
                        .at_line(*priority_line)
                        .at_column(index + 1)
                        .with_cause(value.as_str()),
                );
            }
        }
    }

    fn check_against_portal(&mut self, ctx: &mut FileContext<'_>, header: &Header) {
        let portal = ctx.portal;
        let severity = if portal.checks_enabled {
            Severity::Error
        } else {
            Severity::Warning
        };
        for (index, name) in header.columns.iter().enumerate() {
            let Some(known) = portal.clinical_attribute(name) else {
                continue;
            };
            let patient_level = self.level == ClinicalLevel::Patient;
            if known.patient_attribute != patient_level {
                let defined_as = if known.patient_attribute {
                    "patient"
                } else {
                    "sample"
                };
                ctx.push(
                    Finding::new(
                        severity,
                        format!(
                            "Attribute is defined as a {defined_as} attribute in the portal"
                        ),
                    )
                    .at_line(header.line)
                    .at_column(index + 1)
                    .with_cause(name.as_str()),
                );
            }
            match self.datatypes.get(&index) {
                Some(declared) if *declared != known.datatype => ctx.push(
                    Finding::new(
                        severity,
                        format!(
                            "Datatype definition does not match the portal, where it is {}",
                            known.datatype
                        ),
                    )
                    .at_line(self.definitions.get(2).map_or(header.line, |row| row.0))
                    .at_column(index + 1)
                    .with_cause(declared.as_str()),
                ),
                Some(_) => {}
                None => {
                    self.datatypes.insert(index, known.datatype);
                }
            }
        }
    }

    fn check_identifier(&self, ctx: &mut FileContext<'_>, value: &str, line: usize, column: usize) {
        if !is_valid_id(value) {
            ctx.push(
                Finding::error(
                    "PATIENT_ID and SAMPLE_ID can only contain letters, numbers, points, underscores and/or hyphens",
                )
                .at_line(line)
                .at_column(column)
                .with_cause(value),
            );
        }
    }

    fn check_near_duplicate(
        &mut self,
        ctx: &mut FileContext<'_>,
        sample_id: &str,
        line: usize,
        column: usize,
    ) {
        let key = normalized_sample_key(sample_id);
        match self.normalized_ids.get(&key) {
            Some(earlier) if earlier != sample_id => {
                let finding = if TCGA_PREFIX_REGEX.is_match(&key) {
                    Finding::warning(format!(
                        "TCGA sample defined twice in the same file; '{earlier}' refers to the same sample"
                    ))
                } else {
                    Finding::warning(format!(
                        "Sample ID only differs in case from an earlier sample '{earlier}'"
                    ))
                };
                ctx.push(finding.at_line(line).at_column(column).with_cause(sample_id));
            }
            Some(_) => {}
            None => {
                self.normalized_ids.insert(key, sample_id.to_string());
            }
        }
    }

    fn check_value(
        &self,
        ctx: &mut FileContext<'_>,
        name: &str,
        value: &str,
        line: usize,
        index: usize,
    ) {
        let value = value.trim();
        if is_clinical_null(value) {
            return;
        }
        let at = |finding: Finding| finding.at_line(line).at_column(index + 1).with_cause(value);
        if let Some((_, allowed)) = STATUS_VALUES.iter().find(|(attribute, _)| *attribute == name) {
            if !allowed.contains(&value) {
                ctx.push(at(Finding::error(format!(
                    "Value in '{name}' column is not {}",
                    allowed
                        .iter()
                        .map(|status| format!("'{status}'"))
                        .collect::<Vec<_>>()
                        .join(" or ")
                ))));
            }
            return;
        }
        if PREFIXED_STATUS_ATTRIBUTES.contains(&name)
            && !(value.starts_with("0:") || value.starts_with("1:"))
        {
            ctx.push(at(Finding::error(format!(
                "Value in '{name}' column should start with '0:' or '1:'"
            ))));
            return;
        }
        match self.datatypes.get(&index) {
            Some(AttributeDatatype::Number) => {
                if parse_float(value).is_none() {
                    ctx.push(at(Finding::error(
                        "Value of numeric attribute is not a real number",
                    )));
                }
            }
            Some(AttributeDatatype::Boolean) => {
                if !value.eq_ignore_ascii_case("true") && !value.eq_ignore_ascii_case("false") {
                    ctx.push(at(Finding::error(
                        "Value of boolean attribute must be TRUE or FALSE",
                    )));
                }
            }
            _ => {
                if !name.contains("DATE") && looks_like_date(value) {
                    ctx.push(at(Finding::error("Date found when no date was expected")));
                }
            }
        }
    }
}

impl FileRules for ClinicalValidator {
    fn header_spec(&self, _ctx: &FileContext<'_>) -> HeaderSpec {
        match self.level {
            ClinicalLevel::Sample => HeaderSpec::required(&["PATIENT_ID", "SAMPLE_ID"])
                .with_unique(
                    "SAMPLE_ID",
                    Severity::Error,
                    "Sample defined twice in the same file",
                ),
            ClinicalLevel::Patient => HeaderSpec::required(&["PATIENT_ID"]).with_unique(
                "PATIENT_ID",
                Severity::Error,
                "Patient defined twice in the same file",
            ),
        }
    }

    fn leading_comments(&mut self, ctx: &mut FileContext<'_>, rows: &[(usize, &str)]) {
        self.definitions = rows
            .iter()
            .map(|(line, row)| {
                let row = row.trim_start_matches('#');
                (
                    *line,
                    row.split('\t').map(|cell| cell.trim().to_string()).collect(),
                )
            })
            .collect();
        match self.definitions.len() {
            DEFINITION_ROWS => {}
            0 if ctx.options.relaxed_mode => ctx.push(Finding::warning(
                "No attribute definition rows found; portal defaults will be used",
            )),
            0 => ctx.push(Finding::error(
                "Missing attribute definition rows (display name, description, datatype, priority) before the header",
            )),
            found => ctx.push(Finding::error(format!(
                "Expected {DEFINITION_ROWS} attribute definition rows before the header, found {found}"
            ))),
        }
    }

    fn check_header(&mut self, ctx: &mut FileContext<'_>, header: &Header) {
        self.check_definitions(ctx, header);
        for (index, name) in header.columns.iter().enumerate() {
            if name.trim().is_empty() {
                continue;
            }
            let at = |finding: Finding| {
                finding
                    .at_line(header.line)
                    .at_column(index + 1)
                    .with_cause(name.as_str())
            };
            if !ATTRIBUTE_NAME_REGEX.is_match(name) {
                ctx.push(at(Finding::error(
                    "Attribute name may only contain letters, digits and underscores",
                )));
            } else if name.to_uppercase() != *name {
                ctx.push(at(Finding::error("Attribute name not in upper case")));
            }
            if CALCULATED_ATTRIBUTES.contains(&name.as_str()) {
                ctx.push(at(Finding::error(
                    "MUTATION_COUNT and FRACTION_GENOME_ALTERED are calculated in cBioPortal and must not be submitted",
                )));
            }
            if self.level.banned().contains(&name.as_str()) {
                let scope = match self.level {
                    ClinicalLevel::Sample => "patient",
                    ClinicalLevel::Patient => "sample",
                };
                ctx.push(at(Finding::error(format!(
                    "Attribute can only be defined in the {scope} attribute file"
                ))));
            }
        }
        self.check_against_portal(ctx, header);

        let attributes = header
            .columns
            .iter()
            .filter(|name| !name.trim().is_empty())
            .cloned();
        match self.level {
            ClinicalLevel::Sample => {
                ctx.study.sample_attributes.extend(attributes);
                ctx.study.samples.get_or_insert_with(BTreeMap::new);
            }
            ClinicalLevel::Patient => {
                ctx.study.patient_attributes.extend(attributes);
                ctx.study.patients.get_or_insert_with(Default::default);
            }
        }
    }

    fn check_line(&mut self, ctx: &mut FileContext<'_>, header: &Header, line: &DataLine<'_>) {
        let id_column = self.level.id_column();
        let patient_index = header.position("PATIENT_ID");
        let id_index = header.position(id_column);

        let patient_id = patient_index
            .and_then(|index| line.at(index))
            .map(str::trim)
            .unwrap_or_default();
        if let Some(index) = patient_index {
            if patient_id.is_empty() {
                ctx.push(
                    Finding::error("Missing PATIENT_ID")
                        .at_line(line.number)
                        .at_column(index + 1),
                );
            } else {
                self.check_identifier(ctx, patient_id, line.number, index + 1);
            }
        }

        if self.level == ClinicalLevel::Sample
            && let Some(index) = id_index
        {
            let sample_id = line.at(index).map(str::trim).unwrap_or_default();
            if sample_id.is_empty() {
                ctx.push(
                    Finding::error("Missing SAMPLE_ID")
                        .at_line(line.number)
                        .at_column(index + 1),
                );
            } else {
                self.check_identifier(ctx, sample_id, line.number, index + 1);
                self.check_near_duplicate(ctx, sample_id, line.number, index + 1);
                ctx.study
                    .samples
                    .get_or_insert_with(BTreeMap::new)
                    .insert(sample_id.to_string(), patient_id.to_string());
            }
        }
        if self.level == ClinicalLevel::Patient && !patient_id.is_empty() {
            ctx.study
                .patients
                .get_or_insert_with(Default::default)
                .insert(patient_id.to_string());
            self.patient_lines
                .entry(patient_id.to_string())
                .or_insert(line.number);
        }
        check_deceased_months(ctx, header, line);

        for (index, value) in line.fields.iter().enumerate() {
            if Some(index) == patient_index || Some(index) == id_index {
                continue;
            }
            let Some(name) = header.columns.get(index) else {
                continue;
            };
            self.check_value(ctx, name, value, line.number, index);
        }
    }

    fn finish(&mut self, ctx: &mut FileContext<'_>, _header: &Header) {
        if self.level != ClinicalLevel::Patient
            || !ctx.study.file_types.contains(&MetaFileType::SampleAttributes)
        {
            return;
        }
        let with_samples: BTreeSet<String> = ctx
            .study
            .patients_with_samples()
            .into_iter()
            .map(str::to_string)
            .collect();
        for patient in &with_samples {
            if !patient.is_empty() && !self.patient_lines.contains_key(patient) {
                ctx.push(
                    Finding::warning(
                        "Clinical data for patient of a sample is missing from the patient file",
                    )
                    .with_cause(patient.as_str()),
                );
            }
        }
        for (patient, line) in &self.patient_lines {
            if !with_samples.contains(patient) {
                ctx.push(
                    Finding::warning("Patient defined in the patient file has no samples")
                        .at_line(*line)
                        .with_cause(patient.as_str()),
                );
            }
        }
    }
}

/// Deceased patients without survival months drop out of survival curves.
fn check_deceased_months(ctx: &mut FileContext<'_>, header: &Header, line: &DataLine<'_>) {
    let deceased = line
        .get(header, "OS_STATUS")
        .is_some_and(|status| status.trim() == DECEASED);
    if deceased && line.get(header, "OS_MONTHS").is_none_or(is_clinical_null) {
        ctx.push(
            Finding::warning(
                "OS_MONTHS is not specified for deceased patient. Patient will be excluded from survival curve and month of death will not be shown on patient view timeline.",
            )
            .at_line(line.number),
        );
    }
}
