//! Validator registry: maps a meta descriptor to its file type and the
//! validator for its data file.
//!
//! Dispatch is a pure function of the descriptor. A combination that is not
//! in the table below is a configuration error, never a silent default.
//!
//! | genetic_alteration_type | datatype | validator |
//! |---|---|---|
//! | `CANCER_TYPE` | `CANCER_TYPE` | cancer type |
//! | `CLINICAL` | `SAMPLE_ATTRIBUTES` / `PATIENT_ATTRIBUTES` | clinical |
//! | `CLINICAL` | `TIMELINE` | timeline |
//! | `COPY_NUMBER_ALTERATION` | `DISCRETE` | discrete CNA matrix |
//! | `COPY_NUMBER_ALTERATION` | `DISCRETE_LONG` | long-format CNA |
//! | `COPY_NUMBER_ALTERATION` | `CONTINUOUS` / `LOG2-VALUE` | continuous matrix |
//! | `COPY_NUMBER_ALTERATION` | `SEG` | segments |
//! | `MRNA_EXPRESSION` | `CONTINUOUS` / `Z-SCORE` / `DISCRETE` | continuous matrix |
//! | `METHYLATION` | `CONTINUOUS` | continuous matrix |
//! | `PROTEIN_LEVEL` | `LOG2-VALUE` / `Z-SCORE` / `CONTINUOUS` | RPPA matrix |
//! | `MUTATION_EXTENDED` / `MUTATION_UNCALLED` | `MAF` | mutations |
//! | `STRUCTURAL_VARIANT` | `SV` | structural variants |
//! | `GENESET_SCORE` | `GSVA-SCORE` / `P-VALUE` | GSVA matrix |
//! | `GENERIC_ASSAY` | `LIMIT-VALUE` / `CATEGORICAL` / `BINARY` | generic assay |
//! | `GISTIC_GENES_AMP` / `GISTIC_GENES_DEL` | `Q-VALUE` | GISTIC genes |
//! | `GENE_PANEL_MATRIX` | `GENE_PANEL_MATRIX` | gene panel matrix |
//! | `RESOURCES` (or a `resource_type` key) | `RESOURCE_*` | resources |
//!
//! `meta_study` has no alteration type; it is recognized by its
//! `type_of_cancer` key and has no data file validator.

use cbp_model::{MetaDescriptor, MetaFileType};

use crate::base::FileRules;
use crate::context::ResourceKind;
use crate::error::{Result, ValidationError};
use crate::validators::{
    CancerTypeValidator, ClinicalLevel, ClinicalValidator, CnaLongValidator,
    GenePanelMatrixValidator, GenericAssayKind, GenericAssayValidator, GisticValidator,
    MatrixKind, MatrixValidator, MutationValidator, PdAnnotationsValidator,
    ResourceDataValidator, ResourceDefinitionValidator, SegmentValidator,
    StructuralVariantValidator, TimelineValidator,
};

/// Validator to run on a data file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidatorKind {
    CancerType,
    Clinical(ClinicalLevel),
    Timeline,
    Matrix(MatrixKind),
    CnaLong,
    Segment,
    Mutation,
    StructuralVariant,
    GenericAssay(GenericAssayKind),
    Gistic { amplification: bool },
    GenePanelMatrix,
    /// `pd_annotations_filename` of a discrete CNA profile.
    PdAnnotations,
    ResourceDefinition,
    ResourceData(ResourceKind),
}

impl ValidatorKind {
    /// Fresh validator instance for one file.
    pub fn build(self) -> Box<dyn FileRules> {
        match self {
            Self::CancerType => Box::new(CancerTypeValidator::new()),
            Self::Clinical(level) => Box::new(ClinicalValidator::new(level)),
            Self::Timeline => Box::new(TimelineValidator::new()),
            Self::Matrix(kind) => Box::new(MatrixValidator::new(kind)),
            Self::CnaLong => Box::new(CnaLongValidator::new()),
            Self::Segment => Box::new(SegmentValidator::new()),
            Self::Mutation => Box::new(MutationValidator::new()),
            Self::StructuralVariant => Box::new(StructuralVariantValidator::new()),
            Self::GenericAssay(kind) => Box::new(GenericAssayValidator::new(kind)),
            Self::Gistic { amplification } => Box::new(GisticValidator::new(amplification)),
            Self::GenePanelMatrix => Box::new(GenePanelMatrixValidator::new()),
            Self::PdAnnotations => Box::new(PdAnnotationsValidator::new()),
            Self::ResourceDefinition => Box::new(ResourceDefinitionValidator::new()),
            Self::ResourceData(kind) => Box::new(ResourceDataValidator::new(kind)),
        }
    }
}

/// Result of looking up a meta descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dispatch {
    pub file_type: MetaFileType,
    /// `None` for `meta_study`, which has no data file.
    pub validator: Option<ValidatorKind>,
}

/// Resolve the file type and validator of `meta`.
pub fn resolve(meta: &MetaDescriptor) -> Result<Dispatch> {
    let unsupported = |detail: String| ValidationError::UnsupportedFileType {
        meta_file: meta.file_name.clone(),
        detail,
    };

    if let Some(resource_type) = meta.get("resource_type") {
        return resource_dispatch(resource_type.trim())
            .ok_or_else(|| unsupported(format!("unknown resource_type '{resource_type}'")));
    }

    let Some(alteration) = meta.genetic_alteration_type().map(str::trim) else {
        if meta.contains("type_of_cancer") {
            return Ok(Dispatch {
                file_type: MetaFileType::Study,
                validator: None,
            });
        }
        return Err(unsupported(
            "no genetic_alteration_type and no type_of_cancer declared".to_string(),
        ));
    };
    let Some(datatype) = meta.datatype().map(str::trim) else {
        return Err(unsupported(format!(
            "genetic_alteration_type '{alteration}' without a datatype"
        )));
    };

    dispatch(alteration, datatype).ok_or_else(|| {
        unsupported(format!(
            "genetic_alteration_type '{alteration}' with datatype '{datatype}'"
        ))
    })
}

fn dispatch(alteration: &str, datatype: &str) -> Option<Dispatch> {
    use MetaFileType as T;
    use ValidatorKind as V;

    let (file_type, validator) = match (alteration, datatype) {
        ("CANCER_TYPE", "CANCER_TYPE") => (T::CancerType, V::CancerType),
        ("CLINICAL", "SAMPLE_ATTRIBUTES") => {
            (T::SampleAttributes, V::Clinical(ClinicalLevel::Sample))
        }
        ("CLINICAL", "PATIENT_ATTRIBUTES") => {
            (T::PatientAttributes, V::Clinical(ClinicalLevel::Patient))
        }
        ("CLINICAL", "TIMELINE") => (T::Timeline, V::Timeline),
        ("COPY_NUMBER_ALTERATION", "DISCRETE") => {
            (T::CnaDiscrete, V::Matrix(MatrixKind::CnaDiscrete))
        }
        ("COPY_NUMBER_ALTERATION", "DISCRETE_LONG") => (T::CnaDiscreteLong, V::CnaLong),
        ("COPY_NUMBER_ALTERATION", "CONTINUOUS") => {
            (T::CnaContinuous, V::Matrix(MatrixKind::Continuous))
        }
        ("COPY_NUMBER_ALTERATION", "LOG2-VALUE") => {
            (T::CnaLog2, V::Matrix(MatrixKind::Continuous))
        }
        ("COPY_NUMBER_ALTERATION", "SEG") => (T::Segment, V::Segment),
        ("MRNA_EXPRESSION", "CONTINUOUS" | "Z-SCORE" | "DISCRETE") => {
            (T::Expression, V::Matrix(MatrixKind::Continuous))
        }
        ("METHYLATION", "CONTINUOUS") => (T::Methylation, V::Matrix(MatrixKind::Continuous)),
        ("PROTEIN_LEVEL", "LOG2-VALUE" | "Z-SCORE" | "CONTINUOUS") => {
            (T::ProteinLevel, V::Matrix(MatrixKind::Rppa))
        }
        ("MUTATION_EXTENDED", "MAF") => (T::Mutations, V::Mutation),
        ("MUTATION_UNCALLED", "MAF") => (T::MutationsUncalled, V::Mutation),
        ("STRUCTURAL_VARIANT", "SV") => (T::StructuralVariants, V::StructuralVariant),
        ("GENESET_SCORE", "GSVA-SCORE") => (T::GsvaScores, V::Matrix(MatrixKind::GsvaScore)),
        ("GENESET_SCORE", "P-VALUE") => (T::GsvaPvalues, V::Matrix(MatrixKind::GsvaPvalue)),
        ("GENERIC_ASSAY", "LIMIT-VALUE") => (
            T::GenericAssayContinuous,
            V::GenericAssay(GenericAssayKind::Continuous),
        ),
        ("GENERIC_ASSAY", "CATEGORICAL") => (
            T::GenericAssayCategorical,
            V::GenericAssay(GenericAssayKind::Categorical),
        ),
        ("GENERIC_ASSAY", "BINARY") => (
            T::GenericAssayBinary,
            V::GenericAssay(GenericAssayKind::Binary),
        ),
        ("GISTIC_GENES_AMP", "Q-VALUE") => (T::GisticGenes, V::Gistic { amplification: true }),
        ("GISTIC_GENES_DEL", "Q-VALUE") => {
            (T::GisticGenes, V::Gistic { amplification: false })
        }
        ("GENE_PANEL_MATRIX", "GENE_PANEL_MATRIX") => (T::GenePanelMatrix, V::GenePanelMatrix),
        ("RESOURCES", datatype) => {
            return resource_dispatch(datatype.strip_prefix("RESOURCE_").unwrap_or(datatype));
        }
        _ => return None,
    };
    Some(Dispatch {
        file_type,
        validator: Some(validator),
    })
}

fn resource_dispatch(resource_type: &str) -> Option<Dispatch> {
    let (file_type, validator) = match resource_type.to_ascii_uppercase().as_str() {
        "DEFINITION" => (
            MetaFileType::ResourceDefinition,
            ValidatorKind::ResourceDefinition,
        ),
        "SAMPLE" => (
            MetaFileType::ResourceSample,
            ValidatorKind::ResourceData(ResourceKind::Sample),
        ),
        "PATIENT" => (
            MetaFileType::ResourcePatient,
            ValidatorKind::ResourceData(ResourceKind::Patient),
        ),
        "STUDY" => (
            MetaFileType::ResourceStudy,
            ValidatorKind::ResourceData(ResourceKind::Study),
        ),
        _ => return None,
    };
    Some(Dispatch {
        file_type,
        validator: Some(validator),
    })
}
