//! Library side of the `cbp-validate` binary.

pub mod config;
pub mod logging;
pub mod summary;
