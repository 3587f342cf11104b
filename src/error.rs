//! Library error type

use std::path::PathBuf;

use thiserror::Error;

use crate::checkpoint::CheckpointRule;

/// Errors raised while resolving checkpoints and assembling model arguments.
///
/// `CheckpointNotFound` and `UnrecognizedVariant` are fatal for argument
/// assembly; nothing retries them.
#[derive(Debug, Error)]
pub enum Error {
    #[error("no {rule} checkpoint found in {}", dir.display())]
    CheckpointNotFound { dir: PathBuf, rule: CheckpointRule },

    #[error("unrecognized {kind} variant in checkpoint name: {name}")]
    UnrecognizedVariant { kind: &'static str, name: String },

    #[error("invalid glob pattern: {0}")]
    Pattern(#[from] glob::PatternError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("invalid YAML config: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid JSON config: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
