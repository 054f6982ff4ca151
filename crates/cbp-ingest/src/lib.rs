pub mod case_list;
pub mod discovery;
pub mod error;
pub mod meta;
pub mod tsv;

pub use case_list::{ParsedCaseList, read_case_list};
pub use discovery::{CASE_LIST_DIR, StudyLayout, discover_study, relative_name};
pub use error::{IngestError, Result};
pub use meta::{ParsedMeta, parse_meta_lines, read_meta_file};
pub use tsv::{TextFile, is_blank, read_text_file, split_fields};
