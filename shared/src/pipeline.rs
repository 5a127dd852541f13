use futures::future::{AbortRegistration, Abortable};
use strum_macros::{Display, EnumIter};

use crate::config::ModelConfig;
use crate::error::PipelineError;
use crate::postprocess::ClassificationResult;
use crate::runtime::{InferenceRuntime, InferenceSession};
use crate::tensor::TensorMap;
use crate::upload::UploadedImage;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumIter)]
pub enum PipelineStage {
    Idle,
    Preprocessing,
    Running,
    Done,
    Failed,
}

impl PipelineStage {
    pub fn can_transition_to(self, next: PipelineStage) -> bool {
        use PipelineStage::*;
        matches!(
            (self, next),
            (Idle, Preprocessing)
                | (Preprocessing, Running)
                | (Preprocessing, Failed)
                | (Running, Done)
                | (Running, Failed)
        )
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, PipelineStage::Done | PipelineStage::Failed)
    }
}

/// One inference over one image. A new upload gets a new pipeline; a finished
/// pipeline never goes back to `Idle`.
pub struct InferencePipeline<'a, R: InferenceRuntime> {
    runtime: &'a R,
    config: &'a ModelConfig,
    stage: PipelineStage,
}

impl<'a, R: InferenceRuntime> InferencePipeline<'a, R> {
    pub fn new(runtime: &'a R, config: &'a ModelConfig) -> Self {
        Self {
            runtime,
            config,
            stage: PipelineStage::Idle,
        }
    }

    pub fn stage(&self) -> PipelineStage {
        self.stage
    }

    pub async fn run(&mut self, image: &UploadedImage) -> Result<ClassificationResult, PipelineError> {
        if self.stage != PipelineStage::Idle {
            return Err(PipelineError::precondition(format!(
                "pipeline already {}",
                self.stage
            )));
        }

        self.advance(PipelineStage::Preprocessing);
        let outcome = self.execute(image).await;
        match &outcome {
            Ok(result) => {
                self.advance(PipelineStage::Done);
                log::info!(
                    "Classified {} as class {} ({})",
                    image.name(),
                    result.predicted_class_index,
                    result.verdict
                );
            }
            Err(e) => {
                self.advance(PipelineStage::Failed);
                log::error!("Inference error for {}: {}", image.name(), e);
            }
        }
        outcome
    }

    async fn execute(&mut self, image: &UploadedImage) -> Result<ClassificationResult, PipelineError> {
        let surface = self.runtime.rasterize(image, self.config).await?;
        log::debug!(
            "Resampled {} to {}x{}",
            image.name(),
            surface.width(),
            surface.height()
        );
        let input = surface.to_input_tensor();
        self.advance(PipelineStage::Running);

        let session = self
            .runtime
            .create_session(&self.config.model_path)
            .await
            .map_err(|e| PipelineError::ModelLoad(e.to_string()))?;
        log::info!("Model output names: {:?}", session.output_names());

        let mut feeds = TensorMap::new();
        feeds.insert(self.config.input_name.clone(), input);

        let mut outputs = session
            .run(feeds)
            .await
            .map_err(|e| PipelineError::Inference(e.to_string()))?;

        let logits = outputs.remove(&self.config.output_name).ok_or_else(|| {
            PipelineError::OutputShape(format!(
                "output '{}' missing from model results",
                self.config.output_name
            ))
        })?;

        ClassificationResult::from_logits(logits.data())
    }

    fn advance(&mut self, next: PipelineStage) {
        debug_assert!(
            self.stage.can_transition_to(next),
            "illegal transition {} -> {}",
            self.stage,
            next
        );
        log::debug!("Pipeline {} -> {}", self.stage, next);
        self.stage = next;
    }
}

/// Runs a fresh pipeline that stops at its next suspension point once the
/// paired `AbortHandle` is aborted, resolving to `PipelineError::Cancelled`.
pub async fn run_cancellable<R: InferenceRuntime>(
    runtime: R,
    config: ModelConfig,
    image: UploadedImage,
    registration: AbortRegistration,
) -> Result<ClassificationResult, PipelineError> {
    let task = async move {
        let mut pipeline = InferencePipeline::new(&runtime, &config);
        pipeline.run(&image).await
    };
    Abortable::new(task, registration)
        .await
        .unwrap_or(Err(PipelineError::Cancelled))
}
