//! Text-prompted object detection
//!
//! [`Detector`] loads a grounding model once and exposes a single
//! inference call: preprocess the frame, run the model's predict step,
//! draw the detections and convert the boxes to pixel corners.
//!
//! The model sits behind [`GroundingModel`]; [`OnnxGroundingDino`] is the
//! ONNX Runtime implementation.

mod annotate;
pub mod boxes;
mod onnx;
pub mod text;
pub mod transform;

pub use annotate::Annotator;
pub use boxes::{cxcywh_to_xyxy, transfer_boxes_format, CornerBox};
pub use onnx::OnnxGroundingDino;

use anyhow::Result;
use image::{DynamicImage, RgbImage};
use ndarray::ArrayView4;

use crate::checkpoint::{CheckpointRule, GlobLister};
use crate::config::{DetectorArgs, Settings};
use crate::error::Error;

/// Tokenizer file expected next to the ONNX export
pub const TOKENIZER_FILE: &str = "tokenizer.json";

/// One detection as returned by the model
#[derive(Debug, Clone, PartialEq)]
pub struct Predicted {
    /// Normalized `[cx, cy, w, h]`
    pub cxcywh: [f32; 4],
    /// Best token score for this box
    pub logit: f32,
    /// Caption words matched by the box
    pub phrase: String,
}

/// The predict step of a text-prompted detector
pub trait GroundingModel {
    /// `image` is the normalized `[1, 3, H, W]` tensor from
    /// [`transform::preprocess`].
    fn predict(
        &self,
        image: ArrayView4<f32>,
        caption: &str,
        box_threshold: f32,
        text_threshold: f32,
    ) -> Result<Vec<Predicted>>;
}

/// Output of [`Detector::run_grounding`]
#[derive(Debug, Clone)]
pub struct Grounding {
    /// The input frame at its original size with detections drawn
    pub annotated: RgbImage,
    /// `[[x0, y0], [x1, y1]]` per detection, in original pixels
    pub boxes: Vec<CornerBox>,
    /// Raw model output, aligned with `boxes`
    pub predictions: Vec<Predicted>,
}

pub struct Detector<M> {
    model: M,
    annotator: Annotator,
}

impl<M: GroundingModel> Detector<M> {
    pub fn new(model: M) -> Self {
        Self {
            model,
            annotator: Annotator::default(),
        }
    }

    pub fn with_annotator(mut self, annotator: Annotator) -> Self {
        self.annotator = annotator;
        self
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    /// Detect the objects named in `caption`.
    ///
    /// Model errors propagate unchanged.
    pub fn run_grounding(
        &self,
        frame: &DynamicImage,
        caption: &str,
        box_threshold: f32,
        text_threshold: f32,
    ) -> Result<Grounding> {
        let rgb = frame.to_rgb8();
        let (width, height) = rgb.dimensions();

        let tensor = transform::preprocess(&rgb);
        let predictions = self
            .model
            .predict(tensor.view(), caption, box_threshold, text_threshold)?;

        let boxes = transfer_boxes_format(predictions.iter().map(|p| &p.cxcywh), width, height);
        let annotated = self.annotator.annotate(&rgb, &predictions, &boxes);

        tracing::debug!("'{}': {} detection(s)", caption, boxes.len());

        Ok(Grounding {
            annotated,
            boxes,
            predictions,
        })
    }
}

impl Detector<OnnxGroundingDino> {
    /// Load the ONNX export paired with the GroundingDINO checkpoint in
    /// `settings.checkpoint_dir`.
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let dir = settings.checkpoint_dir.as_path();
        let not_found = |rule| Error::CheckpointNotFound {
            dir: dir.to_path_buf(),
            rule,
        };

        let args = DetectorArgs::discover(dir, &GlobLister, settings)?
            .ok_or_else(|| not_found(CheckpointRule::GroundingDino))?;
        let model_path = args
            .onnx_model
            .ok_or_else(|| not_found(CheckpointRule::GroundingDinoOnnx))?;
        let tokenizer_path = dir.join(TOKENIZER_FILE);

        let model = OnnxGroundingDino::load(&model_path, &tokenizer_path, &settings.device)?;

        let annotator = match &settings.label_font {
            Some(font) => Annotator::with_font_file(font)?,
            None => Annotator::default(),
        };

        Ok(Self::new(model).with_annotator(annotator))
    }
}
