use crate::error::{AtelierError, Result};
use config::{Config, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AtelierConfig {
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub model: ModelConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub upload: UploadConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CatalogConfig {
    /// Base URL of the remote art-tools API. Required for catalog features;
    /// its absence is surfaced when the HTTP client is constructed.
    #[serde(default)]
    pub base_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default)]
    pub api_key: Option<String>,
    /// Environment variable to read the key from when `api_key` is unset.
    #[serde(default)]
    pub env_var: Option<String>,
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: usize,
    /// Character budget for the grounding prompt's catalog section.
    #[serde(default = "default_prompt_budget")]
    pub prompt_budget: usize,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            api_key: None,
            env_var: None,
            base_url: None,
            max_tokens: default_max_tokens(),
            prompt_budget: default_prompt_budget(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_storage_backend")]
    pub backend: String,
    /// Custom path for the SQLite database. Defaults to
    /// `~/.config/atelier/atelier.db`.
    #[serde(default)]
    pub path: Option<String>,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: default_storage_backend(),
            path: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadConfig {
    /// Full URL of the image upload endpoint.
    #[serde(default)]
    pub endpoint: Option<String>,
    #[serde(default = "default_upload_timeout")]
    pub timeout_secs: u64,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            timeout_secs: default_upload_timeout(),
        }
    }
}

fn default_model() -> String {
    "gemini-2.5-flash".to_string()
}
fn default_max_tokens() -> usize {
    1024
}
fn default_prompt_budget() -> usize {
    12_000
}
fn default_storage_backend() -> String {
    "sqlite".to_string()
}
fn default_upload_timeout() -> u64 {
    30
}

/// Valid storage backend names.
pub const VALID_STORAGE_BACKENDS: &[&str] = &["sqlite", "memory"];

impl AtelierConfig {
    /// Load configuration with three-layer TOML merge:
    /// 1. ~/.config/atelier/config.toml (global)
    /// 2. .atelier/config.toml (project)
    /// 3. .atelier/config.local.toml (local, gitignored)
    pub fn load(project_dir: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder();

        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                builder = builder.add_source(File::from(global_path).required(false));
            }
        }

        if let Some(dir) = project_dir {
            let project_config = dir.join(".atelier").join("config.toml");
            if project_config.exists() {
                builder = builder.add_source(File::from(project_config).required(false));
            }

            let local_config = dir.join(".atelier").join("config.local.toml");
            if local_config.exists() {
                builder = builder.add_source(File::from(local_config).required(false));
            }
        }

        let config = builder
            .build()
            .map_err(|e| AtelierError::Config(e.to_string()))?;

        let mut cfg: Self = config
            .try_deserialize()
            .map_err(|e| AtelierError::Config(e.to_string()))?;

        cfg.validate();
        Ok(cfg)
    }

    /// Load with defaults only (no files).
    pub fn default_config() -> Self {
        Self::default()
    }

    /// Validate config values, clamping out-of-range values and logging
    /// warnings. Lenient: fixes values rather than rejecting the config.
    pub fn validate(&mut self) -> Vec<String> {
        let mut warnings = Vec::new();

        if !VALID_STORAGE_BACKENDS.contains(&self.storage.backend.as_str()) {
            warnings.push(format!(
                "unknown storage backend '{}', valid: {}",
                self.storage.backend,
                VALID_STORAGE_BACKENDS.join(", ")
            ));
        }

        if self.model.max_tokens == 0 {
            warnings.push("model.max_tokens = 0, setting to 256".to_string());
            self.model.max_tokens = 256;
        }

        if self.model.prompt_budget == 0 {
            warnings.push(format!(
                "model.prompt_budget = 0, setting to {}",
                default_prompt_budget()
            ));
            self.model.prompt_budget = default_prompt_budget();
        }

        if let Some(url) = &self.catalog.base_url {
            if url.trim().is_empty() {
                warnings.push("catalog.base_url is empty, treating as unset".to_string());
                self.catalog.base_url = None;
            }
        }

        for w in &warnings {
            tracing::warn!("config: {}", w);
        }

        warnings
    }

    /// Write this configuration to the global config path, creating the
    /// parent directory if needed. Used to seed a first-run template.
    pub fn save_global(&self) -> Result<PathBuf> {
        let path = global_config_path()
            .ok_or_else(|| AtelierError::Config("cannot determine config directory".to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| AtelierError::Config(format!("failed to create config dir: {e}")))?;
        }
        let toml_str = toml::to_string_pretty(self)
            .map_err(|e| AtelierError::Config(format!("failed to serialize config: {e}")))?;
        std::fs::write(&path, toml_str)
            .map_err(|e| AtelierError::Config(format!("failed to write config: {e}")))?;
        Ok(path)
    }
}

fn global_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("atelier").join("config.toml"))
}
