use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use crate::error::{PipelineError, ValidationFailure};

/// What the browser tells us about a picked file before its bytes are read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileInfo {
    pub name: String,
    pub mime_type: String,
    pub size: u64,
}

impl FileInfo {
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, size: u64) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            size,
        }
    }
}

pub fn validate_file(info: &FileInfo, max_bytes: u64) -> Result<(), PipelineError> {
    if !info.mime_type.starts_with("image/") {
        return Err(PipelineError::Validation(ValidationFailure::NotAnImage));
    }
    if info.size > max_bytes {
        return Err(PipelineError::Validation(ValidationFailure::TooLarge));
    }
    Ok(())
}

/// A validated image file held in memory. Replaced wholesale on every selection.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadedImage {
    info: FileInfo,
    bytes: Vec<u8>,
}

impl UploadedImage {
    /// Builds the image from the bytes actually read, re-checking the size against them.
    pub fn new(
        name: impl Into<String>,
        mime_type: impl Into<String>,
        bytes: Vec<u8>,
        max_bytes: u64,
    ) -> Result<Self, PipelineError> {
        let info = FileInfo::new(name, mime_type, bytes.len() as u64);
        validate_file(&info, max_bytes)?;
        Ok(Self { info, bytes })
    }

    pub fn name(&self) -> &str {
        &self.info.name
    }

    pub fn mime_type(&self) -> &str {
        &self.info.mime_type
    }

    pub fn size(&self) -> u64 {
        self.info.size
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn data_url(&self) -> String {
        to_data_url(&self.info.mime_type, &self.bytes)
    }
}

pub fn to_data_url(mime_type: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", mime_type, STANDARD.encode(bytes))
}
