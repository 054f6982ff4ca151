//! Portal-info directory layout.

use std::path::PathBuf;

/// Environment variable naming the offline portal-info directory.
pub const PORTAL_INFO_ENV_VAR: &str = "PORTAL_INFO_DIR";

pub const CANCER_TYPES_FILE: &str = "cancer-types.json";
pub const GENES_FILE: &str = "genes.json";
pub const GENE_ALIASES_FILE: &str = "genesaliases.json";
pub const CLINICAL_ATTRIBUTES_FILE: &str = "clinical-attributes.json";
pub const GENE_PANELS_FILE: &str = "gene-panels.json";

/// Subdirectory holding `<build>.chrom.sizes` tables.
pub const CHROMOSOME_SIZES_DIR: &str = "chromosome-sizes";

/// Portal-info directory from `PORTAL_INFO_DIR`, if set and non-empty.
pub fn portal_info_dir_from_env() -> Option<PathBuf> {
    std::env::var_os(PORTAL_INFO_ENV_VAR)
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
}
