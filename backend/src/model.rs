use crate::config::AppConfig;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum PreflightError {
    #[error("Model artifact not found at {0}")]
    Missing(PathBuf),
    #[error("Model artifact at {0} is empty")]
    Empty(PathBuf),
    #[error("Failed to inspect {0}: {1}")]
    Io(PathBuf, std::io::Error),
}

/// Checks that the classifier the page will fetch is present next to the bundle.
/// Returns its size in bytes.
pub fn preflight(config: &AppConfig) -> Result<u64, PreflightError> {
    let path = config.model_artifact_path();
    let metadata = match std::fs::metadata(&path) {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(PreflightError::Missing(path));
        }
        Err(e) => return Err(PreflightError::Io(path, e)),
    };

    if !metadata.is_file() {
        return Err(PreflightError::Missing(path));
    }
    if metadata.len() == 0 {
        return Err(PreflightError::Empty(path));
    }

    log::info!(
        "Model artifact {} ({} bytes), input '{}' {:?}, output '{}'",
        path.display(),
        metadata.len(),
        config.model.input_name,
        config.model.input_dims(),
        config.model.output_name
    );
    Ok(metadata.len())
}
