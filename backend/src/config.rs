use serde::{Deserialize, Serialize};
use shared::ModelConfig;
use std::path::{Path, PathBuf};

const CONFIG_ENV: &str = "SUNARMOR_CONFIG";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read {0}: {1}")]
    Io(PathBuf, std::io::Error),
    #[error("Invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    /// URL prefix the frontend bundle is built for.
    pub base_path: String,
    pub dist_dir: PathBuf,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8081,
            base_path: "/SunArmorAi/".to_string(),
            dist_dir: PathBuf::from("frontend/dist"),
        }
    }
}

impl ServerSettings {
    /// Mount point for the static files, without the trailing slash.
    pub fn mount_path(&self) -> &str {
        self.base_path.trim_end_matches('/')
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerSettings,
    pub model: ModelConfig,
}

impl AppConfig {
    /// Reads `$SUNARMOR_CONFIG`, or `config/sunarmor.yaml` next to the workspace
    /// root, then applies `HOST`, `PORT` and `DIST_DIR` from the environment.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = match std::env::var(CONFIG_ENV) {
            Ok(path) => Self::from_file(Path::new(&path))?,
            Err(_) => {
                let path = default_config_path();
                if path.exists() {
                    Self::from_file(&path)?
                } else {
                    log::warn!("{} not found, using built-in defaults", path.display());
                    Self::default()
                }
            }
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents =
            std::fs::read_to_string(path).map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;
        let config = Self::from_yaml_str(&contents)?;
        log::info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    pub fn from_yaml_str(contents: &str) -> Result<Self, ConfigError> {
        let mut config: AppConfig = serde_yaml::from_str(contents)?;
        config.server.base_path = normalize_base_path(&config.server.base_path);
        Ok(config)
    }

    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("PORT") {
            self.server.port = port
                .parse()
                .map_err(|_| ConfigError::InvalidValue("PORT", port.clone()))?;
        }
        if let Some(dist_dir) = lookup("DIST_DIR") {
            self.server.dist_dir = PathBuf::from(dist_dir);
        }
        Ok(())
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    pub fn model_artifact_path(&self) -> PathBuf {
        self.server.dist_dir.join(&self.model.model_path)
    }
}

fn default_config_path() -> PathBuf {
    match std::env::var("CARGO_MANIFEST_DIR") {
        Ok(manifest_dir) => PathBuf::from(manifest_dir).join("../config/sunarmor.yaml"),
        Err(_) => PathBuf::from("config/sunarmor.yaml"),
    }
}

fn normalize_base_path(path: &str) -> String {
    let trimmed = path.trim_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else {
        format!("/{}/", trimmed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn parses_full_file() {
        let yaml = r#"
server:
  host: 127.0.0.1
  port: 9000
  base_path: /SunArmorAi/
  dist_dir: site
model:
  model_path: models/skin.onnx
"#;
        let config = AppConfig::from_yaml_str(yaml).unwrap();
        assert_eq!(config.bind_address(), "127.0.0.1:9000");
        assert_eq!(config.model_artifact_path(), PathBuf::from("site/models/skin.onnx"));
        assert_eq!(config.model.input_name, "pixel_values");
        assert_eq!(config.model.max_upload_bytes, 5 * 1024 * 1024);
    }

    #[test]
    fn empty_file_uses_defaults() {
        let config = AppConfig::from_yaml_str("{}").unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.server.mount_path(), "/SunArmorAi");
    }

    #[test]
    fn base_path_is_normalized() {
        assert_eq!(normalize_base_path("SunArmorAi"), "/SunArmorAi/");
        assert_eq!(normalize_base_path("/app"), "/app/");
        assert_eq!(normalize_base_path("/"), "/");
        assert_eq!(normalize_base_path(""), "/");
    }

    #[test]
    fn env_overrides_file_values() {
        let env: HashMap<&str, &str> = [("PORT", "3000"), ("DIST_DIR", "/srv/site")].into();
        let mut config = AppConfig::default();
        config
            .apply_env(|key| env.get(key).map(|v| v.to_string()))
            .unwrap();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.server.dist_dir, PathBuf::from("/srv/site"));
        assert_eq!(config.server.host, "0.0.0.0");
    }

    #[test]
    fn bad_port_is_rejected() {
        let mut config = AppConfig::default();
        let err = config
            .apply_env(|key| (key == "PORT").then(|| "eighty".to_string()))
            .unwrap_err();
        assert_eq!(err.to_string(), "Invalid value for PORT: eighty");
    }

    #[test]
    fn bundled_config_parses() {
        let yaml = include_str!("../../config/sunarmor.yaml");
        let config = AppConfig::from_yaml_str(yaml).unwrap();
        assert_eq!(config.model, ModelConfig::default());
        assert_eq!(config.server.base_path, "/SunArmorAi/");
    }
}
