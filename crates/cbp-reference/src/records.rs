//! Wire records of the portal REST API, as stored in the portal-info cache.

use cbp_model::{AttributeDatatype, CancerType, ClinicalAttribute, GeneTable};
use serde::Deserialize;
use tracing::warn;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CancerTypeRecord {
    pub cancer_type_id: String,
    pub name: String,
    #[serde(default)]
    pub dedicated_color: String,
    #[serde(default)]
    pub parent: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneRecord {
    pub entrez_gene_id: i64,
    pub hugo_gene_symbol: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneAliasRecord {
    pub entrez_gene_id: i64,
    pub gene_alias: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClinicalAttributeRecord {
    pub clinical_attribute_id: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub description: String,
    pub datatype: String,
    pub patient_attribute: bool,
    #[serde(default)]
    pub priority: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenePanelRecord {
    pub gene_panel_id: String,
}

impl From<CancerTypeRecord> for CancerType {
    fn from(record: CancerTypeRecord) -> Self {
        Self {
            id: record.cancer_type_id,
            name: record.name,
            color: record.dedicated_color,
            parent: record.parent,
        }
    }
}

impl ClinicalAttributeRecord {
    /// Unknown datatypes are read as STRING, the most permissive type.
    pub fn into_attribute(self) -> ClinicalAttribute {
        let datatype = self.datatype.parse().unwrap_or_else(|_| {
            warn!(
                attribute = %self.clinical_attribute_id,
                datatype = %self.datatype,
                "unknown clinical attribute datatype, treating as STRING"
            );
            AttributeDatatype::String
        });
        ClinicalAttribute {
            id: self.clinical_attribute_id,
            display_name: self.display_name,
            description: self.description,
            datatype,
            patient_attribute: self.patient_attribute,
            priority: self.priority,
        }
    }
}

/// Builds the gene lookup table from gene and alias records.
pub fn build_gene_table(genes: &[GeneRecord], aliases: &[GeneAliasRecord]) -> GeneTable {
    let mut table = GeneTable::new();
    for gene in genes {
        table.insert_gene(gene.entrez_gene_id.to_string(), gene.hugo_gene_symbol.as_str());
    }
    for alias in aliases {
        table.insert_alias(alias.entrez_gene_id.to_string(), alias.gene_alias.as_str());
    }
    table
}
