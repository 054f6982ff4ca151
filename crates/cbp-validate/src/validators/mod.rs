//! Per-file-type validators.

pub mod cancer_type;
pub mod clinical;
pub mod cna_long;
pub mod driver;
pub mod gene_panel_matrix;
pub mod generic_assay;
pub mod gistic;
pub mod matrix;
pub mod mutation;
pub mod pd_annotations;
pub mod resource;
pub mod segment;
pub mod structural_variant;
pub mod timeline;

pub use cancer_type::CancerTypeValidator;
pub use clinical::{ClinicalLevel, ClinicalValidator};
pub use cna_long::CnaLongValidator;
pub use driver::DriverColumns;
pub use gene_panel_matrix::GenePanelMatrixValidator;
pub use generic_assay::{GenericAssayKind, GenericAssayValidator};
pub use gistic::GisticValidator;
pub use matrix::{MatrixKind, MatrixValidator};
pub use mutation::MutationValidator;
pub use pd_annotations::PdAnnotationsValidator;
pub use resource::{ResourceDataValidator, ResourceDefinitionValidator};
pub use segment::SegmentValidator;
pub use structural_variant::StructuralVariantValidator;
pub use timeline::TimelineValidator;
