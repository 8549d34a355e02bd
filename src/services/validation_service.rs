use crate::constants::{MAX_QUALITY, MIN_QUALITY};
use crate::conversion::ConversionRequest;
use crate::services::file_service::FileError;
use crate::services::FileService;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Problems that stop a run before any worker is spawned.
#[derive(Error, Debug)]
pub enum DirectoryError {
    #[error("Input directory is required")]
    MissingInputDirectory,
    #[error("Output directory is required")]
    MissingOutputDirectory,
    #[error("Input directory does not exist: {path}")]
    InputNotFound { path: String },
    #[error("Input path is not a directory: {path}")]
    InputNotADirectory { path: String },
    #[error("No HEIC/HEIF files in input directory: {path}")]
    NoEligibleFiles { path: String },
    #[error("Cannot create output directory {path}: {reason}")]
    OutputNotCreatable { path: String, reason: String },
    #[error("JPEG quality must be between {min} and {max}, got {quality}")]
    InvalidQuality { quality: u8, min: u8, max: u8 },
    #[error("Cannot read input directory {path}: {reason}")]
    InputUnreadable { path: String, reason: String },
}

#[derive(Clone, Default)]
pub struct ValidationService {
    files: FileService,
}

impl ValidationService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn validate_quality(&self, quality: u8) -> Result<u8, DirectoryError> {
        if (MIN_QUALITY..=MAX_QUALITY).contains(&quality) {
            Ok(quality)
        } else {
            Err(DirectoryError::InvalidQuality {
                quality,
                min: MIN_QUALITY,
                max: MAX_QUALITY,
            })
        }
    }

    pub fn validate_input_directory(&self, path: &Path) -> Result<(), DirectoryError> {
        if path.as_os_str().is_empty() {
            return Err(DirectoryError::MissingInputDirectory);
        }

        let display = path.to_string_lossy().to_string();
        match self.files.has_eligible_files(path) {
            Ok(true) => Ok(()),
            Ok(false) => Err(DirectoryError::NoEligibleFiles { path: display }),
            Err(FileError::NotFound { .. }) => Err(DirectoryError::InputNotFound { path: display }),
            Err(FileError::NotADirectory { .. }) => {
                Err(DirectoryError::InputNotADirectory { path: display })
            }
            Err(FileError::Io(e)) => Err(DirectoryError::InputUnreadable {
                path: display,
                reason: e.to_string(),
            }),
        }
    }

    /// Creates the output directory when it is missing.
    pub fn prepare_output_directory(&self, path: &Path) -> Result<(), DirectoryError> {
        if path.as_os_str().is_empty() {
            return Err(DirectoryError::MissingOutputDirectory);
        }

        self.files
            .ensure_directory(path)
            .map_err(|e| DirectoryError::OutputNotCreatable {
                path: path.to_string_lossy().to_string(),
                reason: e.to_string(),
            })
    }

    /// Checks everything a run needs and builds the immutable request for it.
    pub fn build_request(
        &self,
        input_directory: impl Into<PathBuf>,
        output_directory: impl Into<PathBuf>,
        quality: u8,
    ) -> Result<ConversionRequest, DirectoryError> {
        let input_directory = input_directory.into();
        let output_directory = output_directory.into();

        let quality = self.validate_quality(quality)?;
        self.validate_input_directory(&input_directory)?;
        self.prepare_output_directory(&output_directory)?;

        Ok(ConversionRequest {
            input_directory,
            output_directory,
            quality,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_quality_bounds() {
        let service = ValidationService::new();
        assert!(service.validate_quality(10).is_ok());
        assert!(service.validate_quality(100).is_ok());
        assert!(matches!(
            service.validate_quality(9),
            Err(DirectoryError::InvalidQuality { quality: 9, .. })
        ));
        assert!(service.validate_quality(101).is_err());
    }

    #[test]
    fn test_missing_input_directory() {
        let dir = TempDir::new().unwrap();
        let err = ValidationService::new()
            .build_request(dir.path().join("nope"), dir.path().join("out"), 90)
            .unwrap_err();
        assert!(matches!(err, DirectoryError::InputNotFound { .. }));
        assert!(!dir.path().join("out").exists());
    }

    #[test]
    fn test_empty_paths() {
        let service = ValidationService::new();
        assert!(matches!(
            service.validate_input_directory(Path::new("")),
            Err(DirectoryError::MissingInputDirectory)
        ));
        assert!(matches!(
            service.prepare_output_directory(Path::new("")),
            Err(DirectoryError::MissingOutputDirectory)
        ));
    }

    #[test]
    fn test_input_without_heic_files() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("photo.jpg"), b"x").unwrap();

        let err = ValidationService::new()
            .validate_input_directory(dir.path())
            .unwrap_err();
        assert!(matches!(err, DirectoryError::NoEligibleFiles { .. }));
    }

    #[test]
    fn test_input_is_a_file() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("a.heic");
        std::fs::write(&file, b"x").unwrap();

        let err = ValidationService::new()
            .validate_input_directory(&file)
            .unwrap_err();
        assert!(matches!(err, DirectoryError::InputNotADirectory { .. }));
    }

    #[test]
    fn test_output_blocked_by_file() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("in");
        std::fs::create_dir(&input).unwrap();
        std::fs::write(input.join("a.heic"), b"x").unwrap();
        let blocker = dir.path().join("out");
        std::fs::write(&blocker, b"x").unwrap();

        let err = ValidationService::new()
            .build_request(&input, &blocker, 90)
            .unwrap_err();
        assert!(matches!(err, DirectoryError::OutputNotCreatable { .. }));
    }

    #[test]
    fn test_valid_request_creates_output() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("in");
        std::fs::create_dir(&input).unwrap();
        std::fs::write(input.join("a.heic"), b"x").unwrap();
        let output = dir.path().join("out").join("jpg");

        let request = ValidationService::new()
            .build_request(&input, &output, 55)
            .unwrap();

        assert!(output.is_dir());
        assert_eq!(request.input_directory, input);
        assert_eq!(request.output_directory, output);
        assert_eq!(request.quality, 55);
    }
}
