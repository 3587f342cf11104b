//! SAM builder arguments

use std::path::PathBuf;

use serde::Serialize;

use crate::error::Result;
use crate::model::{infer_sam_type, SamModelType};

/// Arguments for the automatic mask generator
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeneratorArgs {
    /// Points sampled along one side of the image
    pub points_per_side: u32,
    pub pred_iou_thresh: f32,
    pub stability_score_thresh: f32,
    pub crop_n_layers: u32,
    pub crop_n_points_downscale_factor: u32,
    /// Masks with smaller disconnected regions are cleaned up
    pub min_mask_region_area: u32,
}

impl Default for GeneratorArgs {
    fn default() -> Self {
        Self {
            points_per_side: 16,
            pred_iou_thresh: 0.8,
            stability_score_thresh: 0.9,
            crop_n_layers: 1,
            crop_n_points_downscale_factor: 2,
            min_mask_region_area: 200,
        }
    }
}

/// `sam_args` as consumed by the SAM builder
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SamArgs {
    pub sam_checkpoint: PathBuf,
    pub model_type: SamModelType,
    pub generator_args: GeneratorArgs,
    pub gpu_id: usize,
}

impl SamArgs {
    /// Build from a resolved checkpoint, inferring the model type
    pub fn new(sam_checkpoint: PathBuf, gpu_id: usize) -> Result<Self> {
        let model_type = infer_sam_type(&sam_checkpoint)?;
        Ok(Self {
            sam_checkpoint,
            model_type,
            generator_args: GeneratorArgs::default(),
            gpu_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sam_args() {
        let args = SamArgs::new(PathBuf::from("ckpt/sam_vit_l_0b3195.pth"), 0).unwrap();
        assert_eq!(args.model_type, SamModelType::VitL);
        assert_eq!(args.sam_checkpoint, PathBuf::from("ckpt/sam_vit_l_0b3195.pth"));
        assert_eq!(args.generator_args.points_per_side, 16);
        assert_eq!(args.generator_args.min_mask_region_area, 200);
    }

    #[test]
    fn test_sam_args_unknown_type() {
        assert!(SamArgs::new(PathBuf::from("ckpt/sam_hq.pth"), 0).is_err());
    }
}
