//! Checks on meta file contents.
//!
//! Every problem found here is a finding on the meta file; none of them
//! stop the run.

use cbp_model::{Finding, MetaDescriptor, MetaFileType, PortalInstance, Severity};
use cbp_reference::SUPPORTED_BUILDS;

use crate::context::StudyContext;
use crate::sink::FileSink;
use crate::values::parse_int;

const DATA_FIELDS: &[&str] = &[
    "cancer_study_identifier",
    "genetic_alteration_type",
    "datatype",
    "data_filename",
];

const PROFILE_FIELDS: &[&str] = &[
    "stable_id",
    "show_profile_in_analysis_tab",
    "profile_name",
    "profile_description",
];

/// Profiles that may be shown in the analysis tab.
const ANALYSIS_TAB_TYPES: &[MetaFileType] = &[
    MetaFileType::CnaDiscrete,
    MetaFileType::CnaDiscreteLong,
    MetaFileType::Mutations,
    MetaFileType::StructuralVariants,
    MetaFileType::GsvaScores,
    MetaFileType::GenericAssayContinuous,
    MetaFileType::GenericAssayCategorical,
    MetaFileType::GenericAssayBinary,
];

/// Required and optional keys of a meta file type.
struct FieldSpec {
    required: Vec<&'static str>,
    optional: &'static [&'static str],
}

impl FieldSpec {
    fn new(groups: &[&[&'static str]], optional: &'static [&'static str]) -> Self {
        Self {
            required: groups.iter().flat_map(|group| group.iter().copied()).collect(),
            optional,
        }
    }

    fn knows(&self, key: &str) -> bool {
        self.required.contains(&key) || self.optional.contains(&key)
    }
}

fn field_spec(file_type: MetaFileType) -> FieldSpec {
    use MetaFileType as T;
    match file_type {
        T::Study => FieldSpec::new(
            &[&["type_of_cancer", "cancer_study_identifier", "name", "description"]],
            &[
                "short_name",
                "citation",
                "pmid",
                "groups",
                "add_global_case_list",
                "tags_file",
                "reference_genome",
            ],
        ),
        T::CancerType => FieldSpec::new(&[&["genetic_alteration_type", "datatype", "data_filename"]], &[]),
        T::SampleAttributes | T::PatientAttributes | T::Timeline | T::GenePanelMatrix => {
            FieldSpec::new(&[DATA_FIELDS], &[])
        }
        T::CnaDiscrete => FieldSpec::new(
            &[DATA_FIELDS, PROFILE_FIELDS],
            &["gene_panel", "pd_annotations_filename", "namespaces"],
        ),
        T::CnaDiscreteLong | T::StructuralVariants => {
            FieldSpec::new(&[DATA_FIELDS, PROFILE_FIELDS], &["gene_panel", "namespaces"])
        }
        T::CnaContinuous | T::CnaLog2 | T::Expression | T::Methylation | T::ProteinLevel => {
            FieldSpec::new(&[DATA_FIELDS, PROFILE_FIELDS], &["gene_panel"])
        }
        T::Mutations | T::MutationsUncalled => FieldSpec::new(
            &[DATA_FIELDS, PROFILE_FIELDS],
            &[
                "gene_panel",
                "swissprot_identifier",
                "variant_classification_filter",
                "namespaces",
                "normal_samples_list",
            ],
        ),
        T::GsvaScores | T::GsvaPvalues => FieldSpec::new(
            &[DATA_FIELDS, PROFILE_FIELDS, &["source_stable_id", "geneset_def_version"]],
            &[],
        ),
        T::GenericAssayContinuous | T::GenericAssayCategorical | T::GenericAssayBinary => {
            FieldSpec::new(
                &[
                    DATA_FIELDS,
                    PROFILE_FIELDS,
                    &["generic_assay_type", "generic_entity_meta_properties"],
                ],
                &["pivot_threshold_value", "value_sort_order", "patient_level", "gene_panel"],
            )
        }
        T::Segment => FieldSpec::new(&[DATA_FIELDS, &["reference_genome_id", "description"]], &[]),
        T::GisticGenes => FieldSpec::new(&[DATA_FIELDS, &["reference_genome_id"]], &[]),
        T::ResourceDefinition | T::ResourceSample | T::ResourcePatient | T::ResourceStudy => {
            FieldSpec::new(
                &[&["cancer_study_identifier", "data_filename"]],
                &["resource_type", "genetic_alteration_type", "datatype"],
            )
        }
    }
}

/// Check `meta` and record what it declares in `study`.
pub fn check_meta(
    meta: &MetaDescriptor,
    file_type: MetaFileType,
    portal: &PortalInstance,
    study: &mut StudyContext,
    sink: &mut FileSink<'_>,
) {
    let spec = field_spec(file_type);
    let at = |key: &str, finding: Finding| match meta.line_of(key) {
        Some(line) => finding.at_line(line),
        None => finding,
    };

    for field in &spec.required {
        if !meta.contains(field) {
            sink.push(Finding::error(format!("Missing field '{field}' in meta file")));
        }
    }
    for entry in meta.entries() {
        if spec.knows(&entry.key) {
            continue;
        }
        let finding = if entry.key == "stable_id" {
            Finding::warning("stable_id is not needed for this file type")
        } else {
            Finding::warning("Unrecognized field in meta file")
        };
        sink.push(finding.at_line(entry.line).with_cause(entry.key.as_str()));
    }

    if let Some(identifier) = meta.get("cancer_study_identifier") {
        if file_type == MetaFileType::Study {
            study.study_id = Some(identifier.to_string());
        } else if let Some(study_id) = &study.study_id
            && study_id != identifier
        {
            sink.push(at(
                "cancer_study_identifier",
                Finding::error("cancer_study_identifier does not match the one in the study meta file")
                    .with_cause(identifier),
            ));
        }
    }

    if file_type == MetaFileType::Study {
        check_study_fields(meta, study, sink);
    }

    if let Some(value) = meta.get("show_profile_in_analysis_tab") {
        let finding = match value.to_ascii_lowercase().as_str() {
            "false" => None,
            "true" if ANALYSIS_TAB_TYPES.contains(&file_type) => None,
            "true" => Some(Finding::error(format!(
                "show_profile_in_analysis_tab cannot be true for {file_type} profiles"
            ))),
            _ => Some(Finding::error("show_profile_in_analysis_tab must be true or false")),
        };
        if let Some(finding) = finding {
            sink.push(at("show_profile_in_analysis_tab", finding.with_cause(value)));
        }
    }

    if let Some(value) = meta.get("swissprot_identifier")
        && value != "name"
        && value != "accession"
    {
        sink.push(at(
            "swissprot_identifier",
            Finding::error("Invalid swissprot_identifier, expected 'name' or 'accession'")
                .with_cause(value),
        ));
    }

    if let Some(build) = meta.get("reference_genome_id")
        && !SUPPORTED_BUILDS.contains(&build)
    {
        sink.push(at(
            "reference_genome_id",
            Finding::error(format!(
                "Unknown reference genome, expected one of: {}",
                SUPPORTED_BUILDS.join(", ")
            ))
            .with_cause(build),
        ));
    }

    if let Some(panel) = meta.get("gene_panel")
        && let Some(panels) = &portal.gene_panels
        && !panels.contains(panel)
    {
        let severity = if portal.checks_enabled {
            Severity::Error
        } else {
            Severity::Warning
        };
        sink.push(at(
            "gene_panel",
            Finding::new(severity, "Gene panel is not known to the cBioPortal instance")
                .with_cause(panel),
        ));
    }

    if file_type.is_profile()
        && let Some(stable_id) = meta.stable_id()
    {
        match study.profile_stable_ids.get(stable_id) {
            Some(other) => sink.push(at(
                "stable_id",
                Finding::error(format!("stable_id is already used by {other}")).with_cause(stable_id),
            )),
            None => {
                study
                    .profile_stable_ids
                    .insert(stable_id.to_string(), meta.file_name.clone());
            }
        }
    }
}

fn check_study_fields(meta: &MetaDescriptor, study: &mut StudyContext, sink: &mut FileSink<'_>) {
    if let Some(cancer_type) = meta.get("type_of_cancer") {
        study.type_of_cancer = Some(cancer_type.trim().to_lowercase());
    }

    if let Some(pmid) = meta.get("pmid") {
        let valid = !pmid.is_empty()
            && pmid
                .split(',')
                .all(|id| !id.is_empty() && id.chars().all(|c| c.is_ascii_digit()) && parse_int(id).is_some());
        if !valid {
            sink.push(
                Finding::error("pmid must be a comma-separated list of integers without spaces")
                    .at_line(meta.line_of("pmid").unwrap_or_default())
                    .with_cause(pmid),
            );
        }
    }

    if let Some(build) = meta.get("reference_genome") {
        if SUPPORTED_BUILDS.contains(&build) {
            study.reference_genome = Some(build.to_string());
        } else {
            sink.push(
                Finding::error(format!(
                    "Unknown reference genome, expected one of: {}",
                    SUPPORTED_BUILDS.join(", ")
                ))
                .at_line(meta.line_of("reference_genome").unwrap_or_default())
                .with_cause(build),
            );
        }
    }
}
