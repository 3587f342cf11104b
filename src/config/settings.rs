//! Runtime settings

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::model::VariantPolicy;

/// Environment variable overriding the checkpoint directory
pub const CKPT_DIR_ENV: &str = "SEGTRACK_CKPT_DIR";

/// Where the models run: `cpu`, `cuda`, `cuda:<gpu>`, or a bare
/// `{ gpu: <index> }` map
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DeviceConfig {
    Named(String),
    Gpu { gpu: usize },
}

impl Default for DeviceConfig {
    fn default() -> Self {
        DeviceConfig::Gpu { gpu: 0 }
    }
}

impl DeviceConfig {
    pub fn is_cuda(&self) -> bool {
        match self {
            DeviceConfig::Named(name) => name == "cuda" || name.starts_with("cuda:"),
            DeviceConfig::Gpu { .. } => true,
        }
    }

    /// GPU index; 0 for CPU and for a bare `cuda`
    pub fn gpu_id(&self) -> usize {
        match self {
            DeviceConfig::Named(name) => name
                .strip_prefix("cuda:")
                .and_then(|id| id.parse().ok())
                .unwrap_or(0),
            DeviceConfig::Gpu { gpu } => *gpu,
        }
    }

    /// `cuda:<gpu>` or `cpu`, as recorded in the model arguments
    pub fn as_device_string(&self) -> String {
        if self.is_cuda() {
            format!("cuda:{}", self.gpu_id())
        } else {
            "cpu".to_string()
        }
    }
}

/// Settings driving checkpoint resolution and model-argument assembly
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Directory scanned for checkpoints
    #[serde(default = "default_checkpoint_dir")]
    pub checkpoint_dir: PathBuf,

    /// Device the models run on; the GPU id is taken from here
    #[serde(default)]
    pub device: DeviceConfig,

    /// Handling of checkpoint names without size/backbone markers
    #[serde(default)]
    pub variant_policy: VariantPolicy,

    /// Project root holding the GroundingDINO sources and configs
    #[serde(default = "default_project_root")]
    pub project_root: PathBuf,

    /// Detector box confidence threshold
    #[serde(default = "default_box_threshold")]
    pub box_threshold: f32,

    /// Detector token confidence threshold
    #[serde(default = "default_text_threshold")]
    pub text_threshold: f32,

    /// TrueType font for detection labels; boxes only when unset
    #[serde(default)]
    pub label_font: Option<PathBuf>,
}

fn default_checkpoint_dir() -> PathBuf {
    PathBuf::from("ckpt")
}

fn default_project_root() -> PathBuf {
    PathBuf::from(".")
}

fn default_box_threshold() -> f32 {
    0.25
}

fn default_text_threshold() -> f32 {
    0.25
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            checkpoint_dir: default_checkpoint_dir(),
            device: DeviceConfig::default(),
            variant_policy: VariantPolicy::default(),
            project_root: default_project_root(),
            box_threshold: default_box_threshold(),
            text_threshold: default_text_threshold(),
            label_font: None,
        }
    }
}

impl Settings {
    /// Defaults pointing at `checkpoint_dir`
    pub fn with_checkpoint_dir<P: Into<PathBuf>>(checkpoint_dir: P) -> Self {
        Self {
            checkpoint_dir: checkpoint_dir.into(),
            ..Default::default()
        }
    }

    /// Load settings from a YAML file
    pub fn from_yaml<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Ok(serde_yaml::from_str(&content)?)
    }

    /// Load settings from a JSON file
    pub fn from_json<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Load from an optional file (format by extension), then apply
    /// the environment override.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut settings = match path {
            Some(p) if p.extension().and_then(|e| e.to_str()) == Some("json") => {
                Self::from_json(p)?
            }
            Some(p) => Self::from_yaml(p)?,
            None => Self::default(),
        };
        settings.apply_env_override(std::env::var(CKPT_DIR_ENV).ok());
        Ok(settings)
    }

    fn apply_env_override(&mut self, ckpt_dir: Option<String>) {
        if let Some(dir) = ckpt_dir.filter(|d| !d.is_empty()) {
            self.checkpoint_dir = PathBuf::from(dir);
        }
    }

    /// GPU index handed to the model builders
    pub fn gpu_id(&self) -> usize {
        self.device.gpu_id()
    }
}
