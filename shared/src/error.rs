use thiserror::Error;

/// Why a selected file was refused before any decoding happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationFailure {
    NotAnImage,
    TooLarge,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PipelineError {
    #[error("{}", validation_message(.0))]
    Validation(ValidationFailure),

    #[error("{0}")]
    Precondition(String),

    #[error("Failed to decode image: {0}")]
    Decode(String),

    #[error("Failed to load model: {0}")]
    ModelLoad(String),

    #[error("Inference failed: {0}")]
    Inference(String),

    #[error("Unexpected model output: {0}")]
    OutputShape(String),

    #[error("Inference cancelled")]
    Cancelled,
}

fn validation_message(failure: &ValidationFailure) -> &'static str {
    match failure {
        ValidationFailure::NotAnImage => "Please select an image file",
        ValidationFailure::TooLarge => "File size exceeds 5MB",
    }
}

impl PipelineError {
    pub fn precondition(message: impl Into<String>) -> Self {
        PipelineError::Precondition(message.into())
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            PipelineError::Validation(ValidationFailure::NotAnImage) => "NOT_AN_IMAGE",
            PipelineError::Validation(ValidationFailure::TooLarge) => "TOO_LARGE",
            PipelineError::Precondition(_) => "PRECONDITION",
            PipelineError::Decode(_) => "DECODE_ERROR",
            PipelineError::ModelLoad(_) => "MODEL_LOAD_ERROR",
            PipelineError::Inference(_) => "INFERENCE_ERROR",
            PipelineError::OutputShape(_) => "OUTPUT_SHAPE_ERROR",
            PipelineError::Cancelled => "CANCELLED",
        }
    }

    /// Validation and precondition failures are fixed by the user, the rest come from the runtime.
    pub fn is_user_recoverable(&self) -> bool {
        matches!(self, PipelineError::Validation(_) | PipelineError::Precondition(_))
    }
}

impl From<image::ImageError> for PipelineError {
    fn from(err: image::ImageError) -> Self {
        PipelineError::Decode(err.to_string())
    }
}

/// Failure reported by the external execution runtime, carried verbatim.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct RuntimeError(pub String);

impl RuntimeError {
    pub fn new(message: impl Into<String>) -> Self {
        RuntimeError(message.into())
    }
}
