//! AOT tracker and segment-tracker arguments

use std::path::PathBuf;

use serde::Serialize;

use crate::error::Result;
use crate::model::{infer_aot_model, AotModel, VariantPolicy};

/// Training phase of the published AOT/DeAOT weights
pub const AOT_PHASE: &str = "PRE_YTB_DAV";

/// `aot_args` as consumed by the AOT builder
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AotArgs {
    pub phase: &'static str,
    pub model: AotModel,
    pub model_path: PathBuf,
    pub long_term_mem_gap: u32,
    pub max_len_long_term: u32,
    pub gpu_id: usize,
}

impl AotArgs {
    pub fn new(model_path: PathBuf, policy: VariantPolicy, gpu_id: usize) -> Result<Self> {
        let model = infer_aot_model(&model_path, policy)?;
        Ok(Self {
            phase: AOT_PHASE,
            model,
            model_path,
            long_term_mem_gap: 9999,
            max_len_long_term: 9999,
            gpu_id,
        })
    }
}

/// `segtracker_args`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SegTrackerArgs {
    /// Frames between SAM passes that look for new objects
    pub sam_gap: u32,
    /// Minimum mask area for a new object
    pub min_area: u32,
    /// Maximum number of tracked objects
    pub max_obj_num: u32,
    /// Required background ratio of a new object's mask
    pub min_new_obj_iou: f32,
}

impl Default for SegTrackerArgs {
    fn default() -> Self {
        Self {
            sam_gap: 10,
            min_area: 200,
            max_obj_num: 255,
            min_new_obj_iou: 0.8,
        }
    }
}
