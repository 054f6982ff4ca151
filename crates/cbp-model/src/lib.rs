pub mod case_list;
pub mod error;
pub mod finding;
pub mod meta;
pub mod portal;

pub use case_list::{CASE_LIST_CATEGORIES, CaseList, SHARED_CATEGORY, is_known_category};
pub use error::{ModelError, Result};
pub use finding::{ExitStatus, Finding, FindingCounts, Severity};
pub use meta::{MetaDescriptor, MetaEntry, MetaFileType};
pub use portal::{AttributeDatatype, CancerType, ClinicalAttribute, GeneTable, PortalInstance};
