//! Meta file descriptors and the file types they declare.

use std::fmt;

use serde::Serialize;

/// Kind of study file a meta descriptor points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MetaFileType {
    Study,
    CancerType,
    SampleAttributes,
    PatientAttributes,
    Timeline,
    CnaDiscrete,
    CnaDiscreteLong,
    CnaContinuous,
    CnaLog2,
    Segment,
    Expression,
    Methylation,
    ProteinLevel,
    Mutations,
    MutationsUncalled,
    StructuralVariants,
    GsvaScores,
    GsvaPvalues,
    GenericAssayContinuous,
    GenericAssayCategorical,
    GenericAssayBinary,
    GisticGenes,
    GenePanelMatrix,
    ResourceDefinition,
    ResourceSample,
    ResourcePatient,
    ResourceStudy,
}

impl MetaFileType {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Study => "meta_study",
            Self::CancerType => "meta_cancer_type",
            Self::SampleAttributes => "meta_clinical_sample",
            Self::PatientAttributes => "meta_clinical_patient",
            Self::Timeline => "meta_timeline",
            Self::CnaDiscrete => "meta_CNA",
            Self::CnaDiscreteLong => "meta_CNA_long",
            Self::CnaContinuous => "meta_contCNA",
            Self::CnaLog2 => "meta_log2CNA",
            Self::Segment => "meta_segment",
            Self::Expression => "meta_expression",
            Self::Methylation => "meta_methylation",
            Self::ProteinLevel => "meta_protein",
            Self::Mutations => "meta_mutations_extended",
            Self::MutationsUncalled => "meta_mutations_uncalled",
            Self::StructuralVariants => "meta_structural_variants",
            Self::GsvaScores => "meta_gsva_scores",
            Self::GsvaPvalues => "meta_gsva_pvalues",
            Self::GenericAssayContinuous => "meta_generic_assay_continuous",
            Self::GenericAssayCategorical => "meta_generic_assay_categorical",
            Self::GenericAssayBinary => "meta_generic_assay_binary",
            Self::GisticGenes => "meta_gistic_genes",
            Self::GenePanelMatrix => "meta_gene_panel_matrix",
            Self::ResourceDefinition => "meta_resource_definition",
            Self::ResourceSample => "meta_resource_sample",
            Self::ResourcePatient => "meta_resource_patient",
            Self::ResourceStudy => "meta_resource_study",
        }
    }

    /// Position in the processing order. Files that define identifiers
    /// (study, cancer types, clinical data, resource definitions) come before
    /// the files that reference them; the gene panel matrix comes last because
    /// it is checked against the profiled mutation samples.
    pub const fn processing_rank(self) -> u8 {
        match self {
            Self::Study => 0,
            Self::CancerType => 1,
            Self::SampleAttributes => 2,
            Self::PatientAttributes => 3,
            Self::ResourceDefinition => 4,
            Self::GenePanelMatrix => 6,
            _ => 5,
        }
    }

    /// Whether data files of this type carry genetic profile data.
    pub const fn is_profile(self) -> bool {
        !matches!(
            self,
            Self::Study
                | Self::CancerType
                | Self::SampleAttributes
                | Self::PatientAttributes
                | Self::Timeline
                | Self::Segment
                | Self::GisticGenes
                | Self::GenePanelMatrix
                | Self::ResourceDefinition
                | Self::ResourceSample
                | Self::ResourcePatient
                | Self::ResourceStudy
        )
    }
}

impl fmt::Display for MetaFileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One `key: value` line of a meta file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetaEntry {
    pub key: String,
    pub value: String,
    pub line: usize,
}

/// Parsed meta file, in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MetaDescriptor {
    /// Name of the meta file, relative to the study directory.
    pub file_name: String,
    entries: Vec<MetaEntry>,
}

impl MetaDescriptor {
    pub fn new(file_name: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            entries: Vec::new(),
        }
    }

    /// Builds a descriptor from literal pairs, numbering lines from 1.
    pub fn from_pairs<'a>(
        file_name: impl Into<String>,
        pairs: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) -> Self {
        let mut meta = Self::new(file_name);
        for (index, (key, value)) in pairs.into_iter().enumerate() {
            meta.insert(key, value, index + 1);
        }
        meta
    }

    /// Adds or replaces an entry. A repeated key keeps its first position.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>, line: usize) {
        let key = key.into();
        let value = value.into();
        if let Some(entry) = self.entries.iter_mut().find(|entry| entry.key == key) {
            entry.value = value;
            entry.line = line;
        } else {
            self.entries.push(MetaEntry { key, value, line });
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|entry| entry.key == key)
            .map(|entry| entry.value.as_str())
    }

    pub fn line_of(&self, key: &str) -> Option<usize> {
        self.entries
            .iter()
            .find(|entry| entry.key == key)
            .map(|entry| entry.line)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn entries(&self) -> &[MetaEntry] {
        &self.entries
    }

    pub fn data_filename(&self) -> Option<&str> {
        self.get("data_filename")
    }

    pub fn genetic_alteration_type(&self) -> Option<&str> {
        self.get("genetic_alteration_type")
    }

    pub fn datatype(&self) -> Option<&str> {
        self.get("datatype")
    }

    pub fn stable_id(&self) -> Option<&str> {
        self.get("stable_id")
    }

    /// Lower-cased namespaces from the comma separated `namespaces` key.
    pub fn namespaces(&self) -> Vec<String> {
        self.get("namespaces")
            .map(|raw| {
                raw.split(',')
                    .map(|ns| ns.trim().to_lowercase())
                    .filter(|ns| !ns.is_empty())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Whether a boolean meta key is set to `true` (case-insensitive).
    pub fn flag(&self, key: &str) -> bool {
        self.get(key)
            .is_some_and(|value| value.trim().eq_ignore_ascii_case("true"))
    }
}
