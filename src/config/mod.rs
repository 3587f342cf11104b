//! Model-argument assembly
//!
//! `ModelArgs` bundles everything the external model builders consume:
//! `sam_args`, `aot_args`, `segtracker_args` and, when a GroundingDINO
//! checkpoint is present, `detector_args`. Nothing is computed at load
//! time; call [`ModelArgs::build`] with a checkpoint directory.

mod detector;
mod sam;
mod settings;
mod tracker;

pub use detector::DetectorArgs;
pub use sam::{GeneratorArgs, SamArgs};
pub use settings::{DeviceConfig, Settings, CKPT_DIR_ENV};
pub use tracker::{AotArgs, SegTrackerArgs, AOT_PHASE};

use std::path::Path;

use serde::Serialize;

use crate::checkpoint::{find_aot_checkpoint, find_sam_checkpoint, FileLister, GlobLister};
use crate::error::Result;

/// Arguments for every model in the segment-and-track pipeline
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelArgs {
    pub sam_args: SamArgs,
    pub aot_args: AotArgs,
    pub segtracker_args: SegTrackerArgs,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detector_args: Option<DetectorArgs>,
}

impl ModelArgs {
    /// Assemble arguments from the checkpoints in `dir` using default settings
    pub fn build<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let settings = Settings::with_checkpoint_dir(dir.as_ref());
        Self::build_with(&settings, &GlobLister)
    }

    /// Assemble arguments from `settings.checkpoint_dir`, listing files through `lister`
    pub fn build_with(settings: &Settings, lister: &dyn FileLister) -> Result<Self> {
        let dir = settings.checkpoint_dir.as_path();
        let gpu_id = settings.gpu_id();

        let sam_args = SamArgs::new(find_sam_checkpoint(dir, lister)?, gpu_id)?;
        tracing::info!(
            "SAM checkpoint: {} ({})",
            sam_args.sam_checkpoint.display(),
            sam_args.model_type
        );

        let aot_args = AotArgs::new(
            find_aot_checkpoint(dir, lister)?,
            settings.variant_policy,
            gpu_id,
        )?;
        tracing::info!(
            "AOT checkpoint: {} ({})",
            aot_args.model_path.display(),
            aot_args.model
        );

        let detector_args = DetectorArgs::discover(dir, lister, settings)?;
        if let Some(args) = &detector_args {
            tracing::info!(
                "GroundingDINO checkpoint: {} ({})",
                args.checkpoint.display(),
                args.variant
            );
        }

        Ok(Self {
            sam_args,
            aot_args,
            segtracker_args: SegTrackerArgs::default(),
            detector_args,
        })
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checkpoint::StaticLister;
    use crate::error::Error;
    use crate::model::{SamModelType, VariantPolicy};
    use std::path::PathBuf;

    fn settings(dir: &str) -> Settings {
        Settings::with_checkpoint_dir(dir)
    }

    fn full_lister() -> StaticLister {
        StaticLister::new([
            "ckpt/sam_vit_l_0b3195.pth",
            "ckpt/r50_deaotl_pre_ytb_dav.pth",
            "ckpt/groundingdino_swint_ogc.pth",
        ])
    }

    #[test]
    fn test_build_from_fake_listing() {
        let args = ModelArgs::build_with(&settings("ckpt"), &full_lister()).unwrap();

        assert_eq!(args.sam_args.model_type, SamModelType::VitL);
        assert_eq!(
            args.sam_args.sam_checkpoint,
            PathBuf::from("ckpt/sam_vit_l_0b3195.pth")
        );
        assert_eq!(args.aot_args.model.to_string(), "r50_deaotl");
        assert_eq!(
            args.aot_args.model_path,
            PathBuf::from("ckpt/r50_deaotl_pre_ytb_dav.pth")
        );
        assert_eq!(args.segtracker_args, SegTrackerArgs::default());
        assert!(args.detector_args.is_some());
    }

    #[test]
    fn test_build_is_deterministic() {
        let a = ModelArgs::build_with(&settings("ckpt"), &full_lister())
            .unwrap()
            .to_json_pretty()
            .unwrap();
        let b = ModelArgs::build_with(&settings("ckpt"), &full_lister())
            .unwrap()
            .to_json_pretty()
            .unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_json_shape() {
        let lister = StaticLister::new([
            "ckpt/sam_vit_h_4b8939.pth",
            "ckpt/SwinB_DeAOTL_PRE_YTB_DAV.pth",
        ]);
        let args = ModelArgs::build_with(&settings("ckpt"), &lister).unwrap();
        let value: serde_json::Value = serde_json::from_str(&args.to_json_pretty().unwrap()).unwrap();

        assert_eq!(value["sam_args"]["model_type"], "vit_h");
        assert_eq!(value["sam_args"]["generator_args"]["points_per_side"], 16);
        assert_eq!(value["sam_args"]["gpu_id"], 0);
        assert_eq!(value["aot_args"]["phase"], "PRE_YTB_DAV");
        assert_eq!(value["aot_args"]["model"], "swinb_deaotl");
        assert_eq!(value["aot_args"]["max_len_long_term"], 9999);
        assert_eq!(value["segtracker_args"]["max_obj_num"], 255);
        assert!(value.get("detector_args").is_none());
    }

    #[test]
    fn test_missing_sam_names_directory() {
        let lister = StaticLister::new(["models/r50_deaotl_pre_ytb_dav.pth"]);
        let err = ModelArgs::build_with(&settings("models"), &lister).unwrap_err();
        assert!(matches!(err, Error::CheckpointNotFound { .. }));
        assert!(err.to_string().contains("models"));
    }

    #[test]
    fn test_missing_aot() {
        let lister = StaticLister::new(["ckpt/sam_vit_b_01ec64.pth", "ckpt/r50_deaotl.pth"]);
        let err = ModelArgs::build_with(&settings("ckpt"), &lister).unwrap_err();
        assert!(matches!(
            err,
            Error::CheckpointNotFound {
                rule: crate::checkpoint::CheckpointRule::Aot,
                ..
            }
        ));
    }

    #[test]
    fn test_unrecognized_sam_variant_is_fatal() {
        let lister = StaticLister::new(["ckpt/sam_hq.pth", "ckpt/r50_deaotl_pre_ytb_dav.pth"]);
        let err = ModelArgs::build_with(&settings("ckpt"), &lister).unwrap_err();
        assert!(matches!(err, Error::UnrecognizedVariant { kind: "SAM", .. }));
    }

    #[test]
    fn test_strict_policy_propagates() {
        let lister = StaticLister::new(["ckpt/sam_vit_b.pth", "ckpt/DeAOTT_PRE_YTB_DAV.pth"]);
        let mut s = settings("ckpt");
        assert!(ModelArgs::build_with(&s, &lister).is_ok());
        s.variant_policy = VariantPolicy::Strict;
        assert!(ModelArgs::build_with(&s, &lister).is_err());
    }

    #[test]
    fn test_gpu_id_from_device() {
        let mut s = settings("ckpt");
        s.device = DeviceConfig::Named("cuda:1".into());
        let args = ModelArgs::build_with(&s, &full_lister()).unwrap();
        assert_eq!(args.sam_args.gpu_id, 1);
        assert_eq!(args.aot_args.gpu_id, 1);
        assert_eq!(args.detector_args.unwrap().device, "cuda:1");
    }

    #[test]
    fn test_build_from_real_directory() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["sam_vit_h_4b8939.pth", "R50_DeAOTL_PRE_YTB_DAV.pth", "notes.txt"] {
            std::fs::write(dir.path().join(name), b"").unwrap();
        }
        let args = ModelArgs::build(dir.path()).unwrap();
        assert_eq!(args.sam_args.model_type, SamModelType::VitH);
        assert_eq!(args.aot_args.model.to_string(), "r50_deaotl");
        assert!(args.to_yaml().unwrap().contains("model_type: vit_h"));
    }
}
