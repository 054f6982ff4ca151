#![deny(unsafe_code)]

pub mod chromosomes;
pub mod client;
pub mod error;
pub mod http;
pub mod offline;
pub mod paths;
pub mod records;

pub use crate::chromosomes::{
    CachedChromosomeSource, ChromosomeLengths, ChromosomeSource, DEFAULT_REFERENCE_GENOME,
    InMemoryChromosomes, SUPPORTED_BUILDS, normalize_chromosome,
};
pub use crate::client::PortalClient;
pub use crate::error::{ReferenceError, Result};
pub use crate::http::HttpFetcher;
pub use crate::offline::load_portal_info;
pub use crate::paths::{PORTAL_INFO_ENV_VAR, portal_info_dir_from_env};
