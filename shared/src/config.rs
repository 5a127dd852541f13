use serde::{Deserialize, Serialize};

pub const MAX_UPLOAD_BYTES: u64 = 5 * 1024 * 1024;

/// Contract between the UI and the externally supplied classifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Path of the model artifact, relative to the page.
    pub model_path: String,
    pub input_name: String,
    pub output_name: String,
    pub input_width: u32,
    pub input_height: u32,
    pub max_upload_bytes: u64,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            model_path: "model.onnx".to_string(),
            input_name: "pixel_values".to_string(),
            output_name: "logits".to_string(),
            input_width: 224,
            input_height: 224,
            max_upload_bytes: MAX_UPLOAD_BYTES,
        }
    }
}

impl ModelConfig {
    /// `[batch, channels, height, width]` of the tensor bound to `input_name`.
    pub fn input_dims(&self) -> [usize; 4] {
        [1, 3, self.input_height as usize, self.input_width as usize]
    }

    pub fn input_len(&self) -> usize {
        self.input_dims().iter().product()
    }
}
