//! Study-scoped state shared between validators.
//!
//! One [`StudyContext`] lives for exactly one validation run. Files that
//! define identifiers (clinical files, cancer types, resource definitions)
//! write to it; files validated later read from it. Nothing here is global:
//! a new run starts from a fresh context or from [`StudyContext::reset`].

use std::collections::{BTreeMap, BTreeSet};

use cbp_model::{CancerType, MetaFileType};
use cbp_reference::{ChromosomeLengths, ChromosomeSource, ReferenceError};

/// Entity kind a resource type may be attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ResourceKind {
    Sample,
    Patient,
    Study,
}

impl ResourceKind {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_uppercase().as_str() {
            "SAMPLE" => Some(Self::Sample),
            "PATIENT" => Some(Self::Patient),
            "STUDY" => Some(Self::Study),
            _ => None,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Sample => "sample",
            Self::Patient => "patient",
            Self::Study => "study",
        }
    }
}

/// Fingerprints of the first validated file of the GSVA score/p-value pair.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GsvaCache {
    pub header: Option<Vec<String>>,
    pub geneset_ids: Option<Vec<String>>,
}

/// Cross-file state of one validation run.
#[derive(Debug, Clone, Default)]
pub struct StudyContext {
    /// `cancer_study_identifier` declared by `meta_study`.
    pub study_id: Option<String>,
    /// `type_of_cancer` declared by `meta_study`.
    pub type_of_cancer: Option<String>,
    pub reference_genome: Option<String>,
    /// Sample id to patient id, from the sample attribute file. `None` means
    /// sample references are not checked (data-directory mode without
    /// clinical data).
    pub samples: Option<BTreeMap<String, String>>,
    /// Patient ids defined in the patient attribute file.
    pub patients: Option<BTreeSet<String>>,
    /// Attribute names declared by the sample attribute file.
    pub sample_attributes: BTreeSet<String>,
    /// Attribute names declared by the patient attribute file.
    pub patient_attributes: BTreeSet<String>,
    /// Cancer types defined by the study's own cancer type file.
    pub study_cancer_types: BTreeMap<String, CancerType>,
    /// Data files of the cancer type meta files, in encounter order.
    pub cancer_type_files: Vec<String>,
    pub gsva: GsvaCache,
    /// Resource type id to the entity kinds it was defined for.
    pub resource_definitions: Option<BTreeMap<String, BTreeSet<ResourceKind>>>,
    /// Samples profiled in mutation files.
    pub mutation_samples: BTreeSet<String>,
    /// Samples profiled in structural variant files.
    pub structural_variant_samples: BTreeSet<String>,
    /// Meta file types encountered so far.
    pub file_types: BTreeSet<MetaFileType>,
    /// Stable ids of genetic profiles, to detect reuse.
    pub profile_stable_ids: BTreeMap<String, String>,
    study_mode: bool,
    chromosomes: BTreeMap<String, ChromosomeLengths>,
}

impl StudyContext {
    /// Context for a full study: every sample and patient reference must
    /// resolve against the clinical files.
    pub fn for_study() -> Self {
        Self {
            samples: Some(BTreeMap::new()),
            patients: Some(BTreeSet::new()),
            study_mode: true,
            ..Self::default()
        }
    }

    /// Context for a data directory that may lack clinical files.
    pub fn for_data_directory() -> Self {
        Self::default()
    }

    /// Forget everything, keeping the study/data-directory mode.
    pub fn reset(&mut self) {
        *self = if self.study_mode {
            Self::for_study()
        } else {
            Self::for_data_directory()
        };
    }

    pub fn is_study_mode(&self) -> bool {
        self.study_mode
    }

    /// `Some(true)` if the sample is defined, `Some(false)` if it is not,
    /// `None` when sample references are not being checked.
    pub fn sample_defined(&self, sample_id: &str) -> Option<bool> {
        self.samples
            .as_ref()
            .map(|samples| samples.contains_key(sample_id))
    }

    /// Same as [`Self::sample_defined`] for patients. Patients seen in the
    /// sample file count as defined.
    pub fn patient_defined(&self, patient_id: &str) -> Option<bool> {
        match (&self.patients, &self.samples) {
            (None, None) => None,
            (patients, samples) => Some(
                patients
                    .as_ref()
                    .is_some_and(|patients| patients.contains(patient_id))
                    || samples
                        .as_ref()
                        .is_some_and(|samples| samples.values().any(|p| p == patient_id)),
            ),
        }
    }

    /// Patients that have at least one sample.
    pub fn patients_with_samples(&self) -> BTreeSet<&str> {
        self.samples
            .iter()
            .flat_map(|samples| samples.values())
            .map(String::as_str)
            .collect()
    }

    /// Whether `cancer_type` is defined by the study's own cancer type file.
    pub fn defines_cancer_type(&self, cancer_type: &str) -> bool {
        self.study_cancer_types.contains_key(cancer_type)
    }

    /// Chromosome lengths for `build`, fetched once per run.
    pub fn chromosome_lengths(
        &mut self,
        build: &str,
        source: &dyn ChromosomeSource,
    ) -> Result<&ChromosomeLengths, ReferenceError> {
        if !self.chromosomes.contains_key(build) {
            let lengths = source.chromosome_lengths(build)?;
            self.chromosomes.insert(build.to_string(), lengths);
        }
        self.chromosomes
            .get(build)
            .ok_or_else(|| ReferenceError::UnknownBuild {
                build: build.to_string(),
            })
    }
}
