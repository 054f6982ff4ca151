use std::path::PathBuf;

use thiserror::Error;

use cbp_ingest::IngestError;

/// Setup and configuration problems that stop a whole validation run.
///
/// Data-quality problems are never reported through this type; they are
/// findings.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("unsupported file type combination in {meta_file}: {detail}")]
    UnsupportedFileType { meta_file: String, detail: String },

    #[error("cannot read meta file {path}: {source}")]
    UnreadableMeta {
        path: PathBuf,
        #[source]
        source: IngestError,
    },

    #[error("cannot read study directory: {0}")]
    StudyDirectory(#[source] IngestError),
}

pub type Result<T> = std::result::Result<T, ValidationError>;
