//! Read-only snapshot of the reference data a portal instance knows about.
//!
//! Every table is optional: `None` means the data was not available to this
//! run, and checks that depend on it are skipped rather than failed.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ModelError;

/// Node of the cancer-type taxonomy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CancerType {
    pub id: String,
    pub name: String,
    /// CSS color name or `#rrggbb` value.
    pub color: String,
    /// Parent type id; `tissue` is the root.
    pub parent: String,
}

/// Datatype declared for a clinical attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AttributeDatatype {
    String,
    Number,
    Boolean,
}

impl AttributeDatatype {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::String => "STRING",
            Self::Number => "NUMBER",
            Self::Boolean => "BOOLEAN",
        }
    }
}

impl fmt::Display for AttributeDatatype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AttributeDatatype {
    type Err = ModelError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "STRING" => Ok(Self::String),
            "NUMBER" => Ok(Self::Number),
            "BOOLEAN" => Ok(Self::Boolean),
            other => Err(ModelError::UnknownDatatype(other.to_string())),
        }
    }
}

/// Clinical attribute known to the portal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClinicalAttribute {
    pub id: String,
    pub display_name: String,
    pub description: String,
    pub datatype: AttributeDatatype,
    /// `true` for patient-level attributes, `false` for sample-level ones.
    pub patient_attribute: bool,
    pub priority: String,
}

/// Gene symbols, Entrez identifiers and aliases.
///
/// Hugo symbols are unique per gene, but one alias may point at several
/// Entrez ids.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GeneTable {
    by_symbol: BTreeMap<String, Vec<String>>,
    by_alias: BTreeMap<String, Vec<String>>,
    symbols: BTreeMap<String, String>,
}

impl GeneTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_gene(&mut self, entrez_id: impl Into<String>, hugo_symbol: impl Into<String>) {
        let entrez_id = entrez_id.into();
        let hugo_symbol = hugo_symbol.into();
        push_unique(
            self.by_symbol.entry(hugo_symbol.clone()).or_default(),
            &entrez_id,
        );
        self.symbols.insert(entrez_id, hugo_symbol);
    }

    pub fn insert_alias(&mut self, entrez_id: impl Into<String>, alias: impl Into<String>) {
        let entrez_id = entrez_id.into();
        push_unique(self.by_alias.entry(alias.into()).or_default(), &entrez_id);
    }

    pub fn contains_entrez(&self, entrez_id: &str) -> bool {
        self.symbols.contains_key(entrez_id)
    }

    pub fn symbol_of(&self, entrez_id: &str) -> Option<&str> {
        self.symbols.get(entrez_id).map(String::as_str)
    }

    /// Entrez ids whose primary symbol is `symbol`.
    pub fn entrez_by_symbol(&self, symbol: &str) -> &[String] {
        self.by_symbol.get(symbol).map_or(&[], Vec::as_slice)
    }

    /// Entrez ids that list `alias` as an alias.
    pub fn entrez_by_alias(&self, alias: &str) -> &[String] {
        self.by_alias.get(alias).map_or(&[], Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

fn push_unique(ids: &mut Vec<String>, id: &str) {
    if !ids.iter().any(|existing| existing == id) {
        ids.push(id.to_string());
    }
}

/// Per-run snapshot of portal reference data. Loaded once, then read-only.
#[derive(Debug, Clone, Default)]
pub struct PortalInstance {
    pub cancer_types: Option<BTreeMap<String, CancerType>>,
    pub genes: Option<GeneTable>,
    pub clinical_attributes: Option<BTreeMap<String, ClinicalAttribute>>,
    pub gene_panels: Option<BTreeSet<String>>,
    /// `false` when the run was told to skip portal cross-checks.
    pub checks_enabled: bool,
}

impl PortalInstance {
    /// Snapshot used with `--no-portal-checks`: no tables, checks disabled.
    pub fn without_checks() -> Self {
        Self::default()
    }

    /// Empty snapshot that still reports portal mismatches as errors.
    pub fn with_checks() -> Self {
        Self {
            checks_enabled: true,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_cancer_types(mut self, types: impl IntoIterator<Item = CancerType>) -> Self {
        self.cancer_types = Some(types.into_iter().map(|t| (t.id.clone(), t)).collect());
        self
    }

    #[must_use]
    pub fn with_genes(mut self, genes: GeneTable) -> Self {
        self.genes = Some(genes);
        self
    }

    #[must_use]
    pub fn with_clinical_attributes(
        mut self,
        attributes: impl IntoIterator<Item = ClinicalAttribute>,
    ) -> Self {
        self.clinical_attributes = Some(
            attributes
                .into_iter()
                .map(|attribute| (attribute.id.clone(), attribute))
                .collect(),
        );
        self
    }

    #[must_use]
    pub fn with_gene_panels(mut self, panels: impl IntoIterator<Item = String>) -> Self {
        self.gene_panels = Some(panels.into_iter().collect());
        self
    }

    pub fn cancer_type(&self, id: &str) -> Option<&CancerType> {
        self.cancer_types.as_ref().and_then(|types| types.get(id))
    }

    pub fn clinical_attribute(&self, id: &str) -> Option<&ClinicalAttribute> {
        self.clinical_attributes
            .as_ref()
            .and_then(|attributes| attributes.get(id))
    }
}
