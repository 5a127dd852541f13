//! Contract with the external execution runtime.
//!
//! The classifier itself is opaque: a session takes named input tensors and
//! returns named output tensors. Implementations live next to the platform
//! they bind to (onnxruntime-web in the frontend, scripted fakes in tests).

use crate::config::ModelConfig;
use crate::error::{PipelineError, RuntimeError};
use crate::preprocess::{self, PixelSurface};
use crate::tensor::TensorMap;
use crate::upload::UploadedImage;

#[allow(async_fn_in_trait)]
pub trait InferenceRuntime {
    type Session: InferenceSession;

    /// Fetches and parses the model artifact found at `model_path`.
    async fn create_session(&self, model_path: &str) -> Result<Self::Session, RuntimeError>;

    /// Turns an upload into the RGBA surface the input tensor is read from.
    /// Platforms that render images themselves override this to accept every
    /// format they can display.
    async fn rasterize(
        &self,
        image: &UploadedImage,
        config: &ModelConfig,
    ) -> Result<PixelSurface, PipelineError> {
        preprocess::rasterize(image, config)
    }
}

#[allow(async_fn_in_trait)]
pub trait InferenceSession {
    async fn run(&self, inputs: TensorMap) -> Result<TensorMap, RuntimeError>;

    fn output_names(&self) -> Vec<String> {
        Vec::new()
    }
}
