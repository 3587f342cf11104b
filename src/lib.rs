//! segtrack-ckpt - checkpoint discovery and model arguments for
//! segment-and-track pipelines
//!
//! Locates pretrained weights for Segment-Anything, AOT/DeAOT and
//! GroundingDINO by file-naming convention, infers each model's variant
//! from its file name, and assembles the argument bundles the model
//! builders consume. A text-prompted detector wraps GroundingDINO on
//! ONNX Runtime.
//!
//! # Layout
//!
//! - **checkpoint**: rule-driven directory scans
//! - **model**: variant inference from file names
//! - **config**: settings and `ModelArgs` assembly
//! - **detector**: grounding inference, box conversion, annotation
//!
//! # Example
//!
//! ```bash
//! # Print sam_args / aot_args / segtracker_args for ./ckpt
//! segtrack args
//!
//! # List checkpoints with their inferred variants
//! segtrack list --dir /models/ckpt
//!
//! # Detect objects named in a caption
//! segtrack detect frame.png --caption "swan.water" -o boxes.png
//! ```

pub mod checkpoint;
pub mod cli;
pub mod config;
pub mod detector;
pub mod error;
pub mod model;

// Re-export key types
pub use checkpoint::{CheckpointRule, FileLister, GlobLister};
pub use config::{ModelArgs, Settings};
pub use detector::{Detector, GroundingModel};
pub use error::{Error, Result};
