//! Segment-Anything model types

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// SAM image-encoder size
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SamModelType {
    VitH,
    VitL,
    VitB,
}

impl SamModelType {
    pub fn as_str(self) -> &'static str {
        match self {
            SamModelType::VitH => "vit_h",
            SamModelType::VitL => "vit_l",
            SamModelType::VitB => "vit_b",
        }
    }
}

impl fmt::Display for SamModelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Infer the SAM model type from a checkpoint file name.
///
/// Tested in order `vit_h`, `vit_l`, `vit_b`.
pub fn infer_sam_type(path: &Path) -> Result<SamModelType> {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    [SamModelType::VitH, SamModelType::VitL, SamModelType::VitB]
        .into_iter()
        .find(|t| name.contains(t.as_str()))
        .ok_or(Error::UnrecognizedVariant { kind: "SAM", name })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_infer_sam_type() {
        let cases = [
            ("ckpt/sam_vit_h_4b8939.pth", SamModelType::VitH),
            ("ckpt/sam_vit_l_0b3195.pth", SamModelType::VitL),
            ("ckpt/sam_vit_b_01ec64.pth", SamModelType::VitB),
            ("sam_vit_h.pth", SamModelType::VitH),
        ];
        for (path, expected) in cases {
            assert_eq!(infer_sam_type(Path::new(path)).unwrap(), expected, "{path}");
        }
    }

    #[test]
    fn test_first_match_wins() {
        let t = infer_sam_type(Path::new("sam_vit_b_then_vit_h.pth")).unwrap();
        assert_eq!(t, SamModelType::VitH);
    }

    #[test]
    fn test_only_file_name_is_inspected() {
        assert!(infer_sam_type(Path::new("vit_h/sam_hq.pth")).is_err());
    }

    #[test]
    fn test_unrecognized() {
        for name in ["sam_hq.pth", "sam_vit_t.pth", "sam_VIT_H.pth", ""] {
            let err = infer_sam_type(Path::new(name)).unwrap_err();
            assert!(
                matches!(err, Error::UnrecognizedVariant { kind: "SAM", .. }),
                "{name}"
            );
        }
    }

    #[test]
    fn test_display() {
        assert_eq!(SamModelType::VitL.to_string(), "vit_l");
        assert_eq!(
            serde_json::to_string(&SamModelType::VitB).unwrap(),
            "\"vit_b\""
        );
    }
}
