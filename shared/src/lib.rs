pub mod config;
pub mod controller;
pub mod error;
pub mod pipeline;
pub mod postprocess;
pub mod preprocess;
pub mod runtime;
pub mod tensor;
pub mod upload;

pub use config::ModelConfig;
pub use controller::{ResultPanel, RunTicket, SelectionId, Status, UploadController};
pub use error::{PipelineError, RuntimeError, ValidationFailure};
pub use pipeline::{InferencePipeline, PipelineStage, run_cancellable};
pub use postprocess::{ClassificationResult, Label, Verdict};
pub use preprocess::PixelSurface;
pub use runtime::{InferenceRuntime, InferenceSession};
pub use tensor::{Tensor, TensorMap};
pub use upload::{FileInfo, UploadedImage};
