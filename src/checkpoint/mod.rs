//! Checkpoint discovery
//!
//! Checkpoints are located purely by file-naming convention:
//! - SAM: `sam_*.pth` (e.g. `sam_vit_h_4b8939.pth`)
//! - AOT/DeAOT: `*aot*pre_ytb_dav*.pth`, matched case-insensitively
//! - GroundingDINO: `groundingdino*.pth`, plus its ONNX export
//!
//! Each lookup is a single directory scan returning the first match in
//! lexical order.

mod lister;

pub use lister::{FileLister, GlobLister, StaticLister};

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::{Error, Result};
use crate::model;

/// Naming rule for one family of checkpoints
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckpointRule {
    /// Segment-Anything weights
    Sam,
    /// AOT/DeAOT weights trained on the PRE_YTB_DAV schedule
    Aot,
    /// GroundingDINO PyTorch weights
    GroundingDino,
    /// GroundingDINO ONNX export, loaded by the detector
    GroundingDinoOnnx,
}

impl CheckpointRule {
    /// All rules, in classification order
    pub const ALL: [CheckpointRule; 4] = [
        CheckpointRule::Sam,
        CheckpointRule::Aot,
        CheckpointRule::GroundingDino,
        CheckpointRule::GroundingDinoOnnx,
    ];

    /// Glob handed to the lister
    pub fn pattern(self) -> &'static str {
        match self {
            CheckpointRule::Sam => "sam_*.pth",
            CheckpointRule::Aot => "*.pth",
            CheckpointRule::GroundingDino => "groundingdino*.pth",
            CheckpointRule::GroundingDinoOnnx => "groundingdino*.onnx",
        }
    }

    /// Whether `path`'s file name satisfies this rule
    pub fn matches(self, path: &Path) -> bool {
        let Some(name) = path.file_name().map(|n| n.to_string_lossy()) else {
            return false;
        };

        match self {
            CheckpointRule::Sam => name.starts_with("sam_") && name.ends_with(".pth"),
            CheckpointRule::Aot => {
                let name = name.to_lowercase();
                name.ends_with(".pth") && name.contains("pre_ytb_dav") && name.contains("aot")
            }
            CheckpointRule::GroundingDino => {
                name.starts_with("groundingdino") && name.ends_with(".pth")
            }
            CheckpointRule::GroundingDinoOnnx => {
                name.starts_with("groundingdino") && name.ends_with(".onnx")
            }
        }
    }
}

impl fmt::Display for CheckpointRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            CheckpointRule::Sam => "SAM",
            CheckpointRule::Aot => "PRE_YTB_DAV AOT/DeAOT",
            CheckpointRule::GroundingDino => "GroundingDINO",
            CheckpointRule::GroundingDinoOnnx => "GroundingDINO ONNX",
        };
        write!(f, "{} ({})", label, self.pattern())
    }
}

/// Return the first checkpoint in `dir` satisfying `rule`, in lexical order.
pub fn resolve(dir: &Path, rule: CheckpointRule, lister: &dyn FileLister) -> Result<PathBuf> {
    let mut candidates: Vec<PathBuf> = lister
        .list(dir, rule.pattern())?
        .into_iter()
        .filter(|p| rule.matches(p))
        .collect();
    candidates.sort();

    tracing::debug!(
        "{} candidate(s) for {} in {}",
        candidates.len(),
        rule,
        dir.display()
    );

    candidates
        .into_iter()
        .next()
        .ok_or_else(|| Error::CheckpointNotFound {
            dir: dir.to_path_buf(),
            rule,
        })
}

/// Find the SAM checkpoint in `dir`
pub fn find_sam_checkpoint(dir: &Path, lister: &dyn FileLister) -> Result<PathBuf> {
    resolve(dir, CheckpointRule::Sam, lister)
}

/// Find the AOT/DeAOT checkpoint in `dir`
pub fn find_aot_checkpoint(dir: &Path, lister: &dyn FileLister) -> Result<PathBuf> {
    resolve(dir, CheckpointRule::Aot, lister)
}

/// Find the GroundingDINO checkpoint in `dir`
pub fn find_dino_checkpoint(dir: &Path, lister: &dyn FileLister) -> Result<PathBuf> {
    resolve(dir, CheckpointRule::GroundingDino, lister)
}

/// A file found in the checkpoint directory, classified by naming rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckpointEntry {
    pub path: PathBuf,
    /// First rule the name satisfies, if any
    pub rule: Option<CheckpointRule>,
    /// Inferred variant tag, if the name carries one
    pub variant: Option<String>,
}

/// Classify every `.pth`/`.onnx` file in `dir`, sorted by path.
pub fn list_checkpoints(dir: &Path, lister: &dyn FileLister) -> Result<Vec<CheckpointEntry>> {
    let mut files = lister.list(dir, "*.pth")?;
    files.extend(lister.list(dir, "*.onnx")?);
    files.sort();
    files.dedup();

    Ok(files
        .into_iter()
        .map(|path| {
            let rule = CheckpointRule::ALL.into_iter().find(|r| r.matches(&path));
            let variant = rule.and_then(|r| model::describe_variant(r, &path).ok());
            CheckpointEntry {
                path,
                rule,
                variant,
            }
        })
        .collect())
}
