//! Upload validation
//!
//! Checks an incoming photo before any storage I/O happens. Every failure is a
//! client input problem and is never retried.

use std::path::Path;

use crate::constants::{ALLOWED_EXTENSIONS, IMAGE_CONTENT_TYPE_PREFIX, MAX_FILE_SIZE_BYTES};

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("File is empty")]
    EmptyFile,

    #[error("File too large: {size} bytes (max: {max} bytes)")]
    TooLarge { size: usize, max: usize },

    #[error("Unsupported file type: {0}")]
    UnsupportedType(String),
}

/// Photo validator
///
/// Size ceiling, extension allow-list and the image content-type prefix.
#[derive(Debug, Clone)]
pub struct PhotoValidator {
    max_file_size: usize,
    allowed_extensions: Vec<String>,
}

impl Default for PhotoValidator {
    fn default() -> Self {
        Self::new(
            MAX_FILE_SIZE_BYTES,
            ALLOWED_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
        )
    }
}

impl PhotoValidator {
    pub fn new(max_file_size: usize, allowed_extensions: Vec<String>) -> Self {
        Self {
            max_file_size,
            allowed_extensions,
        }
    }

    pub fn max_file_size(&self) -> usize {
        self.max_file_size
    }

    pub fn allowed_extensions(&self) -> &[String] {
        &self.allowed_extensions
    }

    /// Validate file size. `declared_size` comes from the caller, `actual_size`
    /// from the bytes received; the larger of the two is checked.
    pub fn validate_file_size(
        &self,
        declared_size: usize,
        actual_size: usize,
    ) -> Result<(), ValidationError> {
        if actual_size == 0 {
            return Err(ValidationError::EmptyFile);
        }

        let size = declared_size.max(actual_size);
        if size > self.max_file_size {
            return Err(ValidationError::TooLarge {
                size,
                max: self.max_file_size,
            });
        }

        Ok(())
    }

    /// Validate file extension, returning it lower-cased.
    pub fn validate_extension(&self, filename: &str) -> Result<String, ValidationError> {
        let extension = Path::new(filename)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .ok_or_else(|| {
                ValidationError::UnsupportedType(format!(
                    "'{}' has no extension (allowed: {})",
                    filename,
                    self.allowed_extensions.join(", ")
                ))
            })?;

        if !self.allowed_extensions.contains(&extension) {
            return Err(ValidationError::UnsupportedType(format!(
                "extension '{}' is not allowed (allowed: {})",
                extension,
                self.allowed_extensions.join(", ")
            )));
        }

        Ok(extension)
    }

    /// Validate content type: anything under `image/`.
    pub fn validate_content_type(&self, content_type: &str) -> Result<(), ValidationError> {
        if !content_type
            .trim()
            .to_lowercase()
            .starts_with(IMAGE_CONTENT_TYPE_PREFIX)
        {
            return Err(ValidationError::UnsupportedType(format!(
                "content type '{}' is not an image",
                content_type
            )));
        }

        Ok(())
    }

    /// Validate all aspects of a file
    pub fn validate_all(
        &self,
        filename: &str,
        content_type: &str,
        declared_size: usize,
        actual_size: usize,
    ) -> Result<String, ValidationError> {
        self.validate_file_size(declared_size, actual_size)?;
        let extension = self.validate_extension(filename)?;
        self.validate_content_type(content_type)?;
        Ok(extension)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file() {
        let validator = PhotoValidator::default();
        assert_eq!(
            validator.validate_all("a.png", "image/png", 0, 0),
            Err(ValidationError::EmptyFile)
        );
    }

    #[test]
    fn test_file_too_large() {
        let validator = PhotoValidator::default();
        let eleven_mib = 11 * 1024 * 1024;
        assert!(matches!(
            validator.validate_all("a.png", "image/png", eleven_mib, eleven_mib),
            Err(ValidationError::TooLarge { max, .. }) if max == MAX_FILE_SIZE_BYTES
        ));
    }

    #[test]
    fn test_declared_size_is_checked_even_if_body_is_small() {
        let validator = PhotoValidator::default();
        assert!(matches!(
            validator.validate_file_size(MAX_FILE_SIZE_BYTES + 1, 10),
            Err(ValidationError::TooLarge { .. })
        ));
        assert!(validator.validate_file_size(MAX_FILE_SIZE_BYTES, 10).is_ok());
    }

    #[test]
    fn test_text_file_is_unsupported() {
        let validator = PhotoValidator::default();
        assert!(matches!(
            validator.validate_all("notes.txt", "text/plain", 12, 12),
            Err(ValidationError::UnsupportedType(_))
        ));
    }

    #[test]
    fn test_image_extension_with_wrong_content_type() {
        let validator = PhotoValidator::default();
        assert!(matches!(
            validator.validate_all("photo.png", "application/octet-stream", 12, 12),
            Err(ValidationError::UnsupportedType(_))
        ));
    }

    #[test]
    fn test_missing_extension() {
        let validator = PhotoValidator::default();
        assert!(matches!(
            validator.validate_extension("README"),
            Err(ValidationError::UnsupportedType(_))
        ));
    }

    #[test]
    fn test_extension_is_case_insensitive() {
        let validator = PhotoValidator::default();
        assert_eq!(
            validator.validate_all("Holiday.JPEG", "IMAGE/JPEG", 10, 10),
            Ok("jpeg".to_string())
        );
        assert_eq!(
            validator.validate_extension("scan.bmp"),
            Ok("bmp".to_string())
        );
    }
}
