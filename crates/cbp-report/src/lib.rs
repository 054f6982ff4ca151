//! Validation report generation.
//!
//! Every output is a pure function of the finding stream:
//!
//! - **HTML table**: findings of level INFO and above, grouped per file
//! - **Error file**: one line per WARNING or ERROR finding
//! - **Summaries**: per-file and total counts with the run's exit status

mod error_file;
mod html;
mod summary;

pub use error_file::{render_error_file, write_error_file};
pub use html::{HtmlOptions, render_html, write_html_table};
pub use summary::{FileSummary, RunSummary, STUDY_LEVEL, summarize_by_file};
