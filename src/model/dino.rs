//! GroundingDINO variants

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::file_name_lower;
use crate::error::{Error, Result};

/// Directory holding the GroundingDINO model configs, relative to the project root
pub const DINO_CONFIG_DIR: &str = "src/groundingdino/groundingdino/config";

/// GroundingDINO backbone
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DinoVariant {
    SwinT,
    SwinB,
}

impl DinoVariant {
    /// Model config file shipped with GroundingDINO
    pub fn config_file(self) -> &'static str {
        match self {
            DinoVariant::SwinT => "GroundingDINO_SwinT_OGC.py",
            DinoVariant::SwinB => "GroundingDINO_SwinB_cfg.py",
        }
    }

    /// Full path of the config file under a project `root`
    pub fn config_path(self, root: &Path) -> PathBuf {
        root.join(DINO_CONFIG_DIR).join(self.config_file())
    }
}

impl fmt::Display for DinoVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DinoVariant::SwinT => "swint",
            DinoVariant::SwinB => "swinb",
        })
    }
}

/// Infer the GroundingDINO backbone from a checkpoint file name.
pub fn infer_dino_variant(path: &Path) -> Result<DinoVariant> {
    let name = file_name_lower(path);

    if name.contains("swint") {
        Ok(DinoVariant::SwinT)
    } else if name.contains("swinb") {
        Ok(DinoVariant::SwinB)
    } else {
        Err(Error::UnrecognizedVariant {
            kind: "GroundingDINO",
            name,
        })
    }
}
