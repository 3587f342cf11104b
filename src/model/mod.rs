//! Model variant inference.
//!
//! Variant tags are derived from checkpoint file names with ordered
//! substring tests; the first matching test wins.

mod aot;
mod dino;
mod sam;

pub use aot::{infer_aot_model, AotBackbone, AotFamily, AotModel, AotSize};
pub use dino::{infer_dino_variant, DinoVariant};
pub use sam::{infer_sam_type, SamModelType};

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::checkpoint::CheckpointRule;
use crate::error::Result;

/// What to do when a name carries no size or backbone marker
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VariantPolicy {
    /// Fall back to the documented defaults and log a warning
    #[default]
    Lenient,
    /// Treat a missing marker as an unrecognized variant
    Strict,
}

/// Lowercased file name of `path`
pub(crate) fn file_name_lower(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_lowercase())
        .unwrap_or_default()
}

/// Variant tag for a checkpoint classified under `rule`
pub fn describe_variant(rule: CheckpointRule, path: &Path) -> Result<String> {
    match rule {
        CheckpointRule::Sam => Ok(infer_sam_type(path)?.to_string()),
        CheckpointRule::Aot => Ok(infer_aot_model(path, VariantPolicy::Lenient)?.to_string()),
        CheckpointRule::GroundingDino | CheckpointRule::GroundingDinoOnnx => {
            Ok(infer_dino_variant(path)?.to_string())
        }
    }
}
