//! Live portal REST API.

use cbp_model::{CancerType, PortalInstance};
use serde::de::DeserializeOwned;
use tracing::info;

use crate::error::Result;
use crate::http::HttpFetcher;
use crate::records::{
    CancerTypeRecord, ClinicalAttributeRecord, GeneAliasRecord, GenePanelRecord, GeneRecord,
    build_gene_table,
};

/// Query suffix asking the API for every record in one page.
const PAGE_QUERY: &str = "projection=SUMMARY&pageSize=9999999";

/// Client for a running portal instance.
#[derive(Debug, Clone)]
pub struct PortalClient {
    fetcher: HttpFetcher,
    base_url: String,
}

impl PortalClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        Ok(Self {
            fetcher: HttpFetcher::new()?,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn endpoint_url(&self, endpoint: &str) -> String {
        format!("{}/api/{endpoint}?{PAGE_QUERY}", self.base_url)
    }

    fn get<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T> {
        self.fetcher.get_json(&self.endpoint_url(endpoint))
    }

    /// Fetch the same tables the offline cache holds.
    pub fn fetch_portal_info(&self) -> Result<PortalInstance> {
        let cancer_types: Vec<CancerTypeRecord> = self.get("cancer-types")?;
        let genes: Vec<GeneRecord> = self.get("genes")?;
        let aliases: Vec<GeneAliasRecord> = self.get("genesaliases")?;
        let attributes: Vec<ClinicalAttributeRecord> = self.get("clinical-attributes")?;
        let panels: Vec<GenePanelRecord> = self.get("gene-panels")?;
        info!(
            url = %self.base_url,
            cancer_types = cancer_types.len(),
            genes = genes.len(),
            "fetched portal info"
        );
        Ok(PortalInstance::with_checks()
            .with_cancer_types(cancer_types.into_iter().map(CancerType::from))
            .with_genes(build_gene_table(&genes, &aliases))
            .with_clinical_attributes(
                attributes
                    .into_iter()
                    .map(ClinicalAttributeRecord::into_attribute),
            )
            .with_gene_panels(panels.into_iter().map(|panel| panel.gene_panel_id)))
    }
}
