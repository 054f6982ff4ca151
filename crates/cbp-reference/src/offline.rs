//! Loading a portal snapshot from an offline portal-info directory.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use cbp_model::{CancerType, PortalInstance};
use serde::de::DeserializeOwned;
use tracing::{info, warn};

use crate::error::{ReferenceError, Result};
use crate::paths::{
    CANCER_TYPES_FILE, CLINICAL_ATTRIBUTES_FILE, GENE_ALIASES_FILE, GENE_PANELS_FILE, GENES_FILE,
};
use crate::records::{
    CancerTypeRecord, ClinicalAttributeRecord, GeneAliasRecord, GenePanelRecord, GeneRecord,
    build_gene_table,
};

/// Load the portal snapshot cached in `dir`.
///
/// A missing file disables the checks that need it; malformed JSON is an
/// error.
pub fn load_portal_info(dir: &Path) -> Result<PortalInstance> {
    if !dir.is_dir() {
        return Err(ReferenceError::MissingDirectory {
            path: dir.to_path_buf(),
        });
    }
    let mut portal = PortalInstance::with_checks();

    if let Some(records) = read_optional::<Vec<CancerTypeRecord>>(dir, CANCER_TYPES_FILE)? {
        portal = portal.with_cancer_types(records.into_iter().map(CancerType::from));
    }

    if let Some(genes) = read_optional::<Vec<GeneRecord>>(dir, GENES_FILE)? {
        let aliases =
            read_optional::<Vec<GeneAliasRecord>>(dir, GENE_ALIASES_FILE)?.unwrap_or_default();
        portal = portal.with_genes(build_gene_table(&genes, &aliases));
    }

    if let Some(records) =
        read_optional::<Vec<ClinicalAttributeRecord>>(dir, CLINICAL_ATTRIBUTES_FILE)?
    {
        portal = portal.with_clinical_attributes(
            records
                .into_iter()
                .map(ClinicalAttributeRecord::into_attribute),
        );
    }

    if let Some(records) = read_optional::<Vec<GenePanelRecord>>(dir, GENE_PANELS_FILE)? {
        portal = portal.with_gene_panels(records.into_iter().map(|record| record.gene_panel_id));
    }

    info!(
        dir = %dir.display(),
        cancer_types = portal.cancer_types.as_ref().map_or(0, |types| types.len()),
        genes = portal.genes.as_ref().map_or(0, |genes| genes.len()),
        clinical_attributes = portal
            .clinical_attributes
            .as_ref()
            .map_or(0, |attributes| attributes.len()),
        "loaded offline portal info"
    );
    Ok(portal)
}

fn read_optional<T: DeserializeOwned>(dir: &Path, name: &str) -> Result<Option<T>> {
    let path = dir.join(name);
    if !path.is_file() {
        warn!(path = %path.display(), "portal info file missing, related checks are skipped");
        return Ok(None);
    }
    let file = File::open(&path).map_err(|source| ReferenceError::io(&path, source))?;
    serde_json::from_reader(BufReader::new(file))
        .map(Some)
        .map_err(|source| ReferenceError::Json { path, source })
}
