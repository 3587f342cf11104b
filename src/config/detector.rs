//! GroundingDINO detector arguments

use std::path::{Path, PathBuf};

use serde::Serialize;

use super::Settings;
use crate::checkpoint::{resolve, CheckpointRule, FileLister};
use crate::error::{Error, Result};
use crate::model::{infer_dino_variant, DinoVariant};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetectorArgs {
    pub checkpoint: PathBuf,
    /// ONNX export of the same model, if any
    pub onnx_model: Option<PathBuf>,
    pub variant: DinoVariant,
    pub config_file: PathBuf,
    pub box_threshold: f32,
    pub text_threshold: f32,
    pub device: String,
}

impl DetectorArgs {
    pub fn new(checkpoint: PathBuf, onnx_model: Option<PathBuf>, settings: &Settings) -> Result<Self> {
        let variant = infer_dino_variant(&checkpoint)?;
        Ok(Self {
            config_file: variant.config_path(&settings.project_root),
            checkpoint,
            onnx_model,
            variant,
            box_threshold: settings.box_threshold,
            text_threshold: settings.text_threshold,
            device: settings.device.as_device_string(),
        })
    }

    /// Detector arguments if a GroundingDINO checkpoint is present in `dir`
    pub fn discover(dir: &Path, lister: &dyn FileLister, settings: &Settings) -> Result<Option<Self>> {
        let checkpoint = match optional(resolve(dir, CheckpointRule::GroundingDino, lister))? {
            Some(p) => p,
            None => return Ok(None),
        };
        let variant = infer_dino_variant(&checkpoint)?;
        let onnx_model = paired_export(dir, &checkpoint, variant, lister)?;
        Self::new(checkpoint, onnx_model, settings).map(Some)
    }
}

/// The ONNX export matching `checkpoint`: same file stem first, otherwise
/// the first export of the same variant. Exports of other variants are
/// never paired.
fn paired_export(
    dir: &Path,
    checkpoint: &Path,
    variant: DinoVariant,
    lister: &dyn FileLister,
) -> Result<Option<PathBuf>> {
    let rule = CheckpointRule::GroundingDinoOnnx;
    let mut exports: Vec<PathBuf> = lister
        .list(dir, rule.pattern())?
        .into_iter()
        .filter(|p| rule.matches(p))
        .collect();
    exports.sort();

    let sibling = checkpoint.with_extension("onnx");
    if let Some(p) = exports.iter().find(|p| **p == sibling) {
        return Ok(Some(p.clone()));
    }

    let same_variant = exports
        .into_iter()
        .find(|p| infer_dino_variant(p).ok() == Some(variant));
    if same_variant.is_none() {
        tracing::debug!(
            "no {} ONNX export for {} in {}",
            variant,
            checkpoint.display(),
            dir.display()
        );
    }
    Ok(same_variant)
}

/// Turn "not found" into `None`, keeping every other error
fn optional(found: Result<PathBuf>) -> Result<Option<PathBuf>> {
    match found {
        Ok(p) => Ok(Some(p)),
        Err(Error::CheckpointNotFound { .. }) => Ok(None),
        Err(e) => Err(e),
    }
}
