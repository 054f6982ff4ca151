//! Locating meta files and case lists in a study directory.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{IngestError, Result};

/// Directory holding the case-list files of a study.
pub const CASE_LIST_DIR: &str = "case_lists";

/// Files found in a study directory.
#[derive(Debug, Clone, Default)]
pub struct StudyLayout {
    pub root: PathBuf,
    /// Files whose name starts with `meta`, sorted by file name.
    pub meta_files: Vec<PathBuf>,
    /// Regular files in `case_lists/`, sorted by file name. Empty when the
    /// directory does not exist.
    pub case_list_files: Vec<PathBuf>,
    pub has_case_list_dir: bool,
}

impl StudyLayout {
    /// Name of `path` relative to the study root, with `/` separators.
    pub fn relative_name(&self, path: &Path) -> String {
        relative_name(&self.root, path)
    }
}

pub fn relative_name(root: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    relative
        .components()
        .map(|component| component.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// Scan `dir` for meta files and case lists.
pub fn discover_study(dir: &Path) -> Result<StudyLayout> {
    if !dir.is_dir() {
        return Err(IngestError::DirectoryNotFound {
            path: dir.to_path_buf(),
        });
    }
    let meta_files = list_files(dir, |name| name.starts_with("meta"))?;
    let case_list_dir = dir.join(CASE_LIST_DIR);
    let has_case_list_dir = case_list_dir.is_dir();
    let case_list_files = if has_case_list_dir {
        list_files(&case_list_dir, |name| !name.starts_with('.'))?
    } else {
        Vec::new()
    };
    debug!(
        dir = %dir.display(),
        meta_files = meta_files.len(),
        case_lists = case_list_files.len(),
        "discovered study files"
    );
    Ok(StudyLayout {
        root: dir.to_path_buf(),
        meta_files,
        case_list_files,
        has_case_list_dir,
    })
}

fn list_files(dir: &Path, accept: impl Fn(&str) -> bool) -> Result<Vec<PathBuf>> {
    let entries = std::fs::read_dir(dir).map_err(|e| IngestError::DirectoryRead {
        path: dir.to_path_buf(),
        source: e,
    })?;
    let mut files = Vec::new();
    for entry_result in entries {
        let entry = entry_result.map_err(|e| IngestError::DirectoryRead {
            path: dir.to_path_buf(),
            source: e,
        })?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let accepted = path
            .file_name()
            .and_then(|name| name.to_str())
            .is_some_and(&accept);
        if accepted {
            files.push(path);
        }
    }
    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}
