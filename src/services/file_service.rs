use crate::constants::{HEIF_EXTENSIONS, OUTPUT_EXTENSION};
use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FileError {
    #[error("Directory not found: {path}")]
    NotFound { path: String },
    #[error("Not a directory: {path}")]
    NotADirectory { path: String },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Clone, Default)]
pub struct FileService;

impl FileService {
    pub fn new() -> Self {
        Self
    }

    /// Eligible files are files, or links to files, whose extension is `heic` or `heif`,
    /// compared case-insensitively.
    pub fn is_eligible(path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| {
                HEIF_EXTENSIONS
                    .iter()
                    .any(|candidate| ext.eq_ignore_ascii_case(candidate))
            })
            .unwrap_or(false)
    }

    /// Snapshot of the eligible files in `dir`, sorted by file name so runs over
    /// the same directory are repeatable.
    pub fn list_eligible_files(&self, dir: &Path) -> Result<Vec<PathBuf>, FileError> {
        self.require_directory(dir)?;

        let mut files = Vec::new();
        for entry in std::fs::read_dir(dir)? {
            let entry = entry?;
            let path = entry.path();
            if Self::is_eligible(&path) && path.is_file() {
                files.push(path);
            }
        }

        files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
        Ok(files)
    }

    pub fn has_eligible_files(&self, dir: &Path) -> Result<bool, FileError> {
        self.require_directory(dir)?;

        for entry in std::fs::read_dir(dir)? {
            let path = entry?.path();
            if Self::is_eligible(&path) && path.is_file() {
                return Ok(true);
            }
        }
        Ok(false)
    }

    pub fn require_directory(&self, dir: &Path) -> Result<(), FileError> {
        if !dir.exists() {
            return Err(FileError::NotFound {
                path: dir.to_string_lossy().to_string(),
            });
        }
        if !dir.is_dir() {
            return Err(FileError::NotADirectory {
                path: dir.to_string_lossy().to_string(),
            });
        }
        Ok(())
    }

    /// Creates `dir` and its parents; succeeds when it already exists.
    pub fn ensure_directory(&self, dir: &Path) -> Result<(), FileError> {
        if dir.exists() && !dir.is_dir() {
            return Err(FileError::NotADirectory {
                path: dir.to_string_lossy().to_string(),
            });
        }
        std::fs::create_dir_all(dir)?;
        Ok(())
    }

    /// `<output_dir>/<stem>.jpg`. Same-stem inputs map to the same output.
    pub fn output_path_for(&self, input: &Path, output_dir: &Path) -> PathBuf {
        let mut name = input
            .file_stem()
            .map(OsStr::to_os_string)
            .unwrap_or_else(|| OsString::from("output"));
        name.push(".");
        name.push(OUTPUT_EXTENSION);
        output_dir.join(name)
    }
}

pub fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}
