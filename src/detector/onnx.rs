//! GroundingDINO on ONNX Runtime
//!
//! Expects an export with inputs `img` `[1,3,H,W]` f32, `input_ids`,
//! `attention_mask`, `position_ids`, `token_type_ids` (i64),
//! `text_token_mask` (bool `[1,T,T]`) and outputs `logits` `[1,Q,256]`
//! and `boxes` `[1,Q,4]` (normalized cxcywh). The BERT tokenizer is read
//! from a `tokenizer.json` next to the model.

use std::path::Path;

use anyhow::{anyhow, bail, Result};
use ndarray::{Array2, ArrayView2, ArrayView4, Axis, Ix2};
use ort::session::builder::GraphOptimizationLevel;
use ort::session::Session;
use ort::value::Tensor;
use tokenizers::Tokenizer;

use super::text::{phrase_masks, phrase_token_ids, preprocess_caption, MAX_TEXT_LEN};
use super::{GroundingModel, Predicted};
use crate::config::DeviceConfig;

pub struct OnnxGroundingDino {
    session: Session,
    tokenizer: Tokenizer,
}

impl OnnxGroundingDino {
    /// Load the ONNX model and tokenizer once
    pub fn load(model_path: &Path, tokenizer_path: &Path, device: &DeviceConfig) -> Result<Self> {
        let builder = Session::builder()?.with_optimization_level(GraphOptimizationLevel::Level3)?;

        #[cfg(feature = "cuda")]
        let builder = if device.is_cuda() {
            use ort::execution_providers::CUDAExecutionProvider;
            builder.with_execution_providers([CUDAExecutionProvider::default()
                .with_device_id(device.gpu_id() as i32)
                .build()])?
        } else {
            builder
        };
        if cfg!(not(feature = "cuda")) && device.is_cuda() {
            tracing::warn!("built without the 'cuda' feature, running GroundingDINO on CPU");
        }

        let session = builder.commit_from_file(model_path)?;
        let tokenizer = Tokenizer::from_file(tokenizer_path).map_err(|e| {
            anyhow!(
                "failed to load tokenizer {}: {}",
                tokenizer_path.display(),
                e
            )
        })?;

        tracing::info!(
            "GroundingDINO loaded from {} on {}",
            model_path.display(),
            device.as_device_string()
        );

        Ok(Self { session, tokenizer })
    }
}

impl GroundingModel for OnnxGroundingDino {
    fn predict(
        &self,
        image: ArrayView4<f32>,
        caption: &str,
        box_threshold: f32,
        text_threshold: f32,
    ) -> Result<Vec<Predicted>> {
        let caption = preprocess_caption(caption);
        let encoding = self
            .tokenizer
            .encode(caption.as_str(), true)
            .map_err(|e| anyhow!("failed to tokenize caption: {}", e))?;

        let mut ids = encoding.get_ids().to_vec();
        ids.truncate(MAX_TEXT_LEN);
        let n = ids.len();

        let (text_mask, position_ids) = phrase_masks(&ids);
        let input_ids = Array2::from_shape_fn((1, n), |(_, i)| ids[i] as i64);
        let attention_mask = Array2::from_shape_fn((1, n), |(_, i)| {
            encoding.get_attention_mask().get(i).copied().unwrap_or(1) as i64
        });
        let token_type_ids = Array2::<i64>::zeros((1, n));

        let outputs = self.session.run(ort::inputs![
            "img" => Tensor::from_array(image.to_owned())?,
            "input_ids" => Tensor::from_array(input_ids)?,
            "attention_mask" => Tensor::from_array(attention_mask)?,
            "position_ids" => Tensor::from_array(position_ids)?,
            "token_type_ids" => Tensor::from_array(token_type_ids)?,
            "text_token_mask" => Tensor::from_array(text_mask)?
        ]?)?;

        let logits = outputs["logits"].try_extract_tensor::<f32>()?;
        let boxes = outputs["boxes"].try_extract_tensor::<f32>()?;
        let logits = logits.index_axis(Axis(0), 0).into_dimensionality::<Ix2>()?;
        let boxes = boxes.index_axis(Axis(0), 0).into_dimensionality::<Ix2>()?;

        postprocess(
            logits,
            boxes,
            box_threshold,
            text_threshold,
            &ids,
            |token_ids| {
                self.tokenizer
                    .decode(token_ids, true)
                    .map_err(|e| anyhow!("failed to decode phrase: {}", e))
            },
        )
    }
}

/// Keep queries whose best token score beats `box_threshold` and read a
/// phrase off the tokens scoring above `text_threshold`.
///
/// `raw_logits` are pre-sigmoid `[Q, 256]`, `boxes` are `[Q, 4]`.
pub(crate) fn postprocess<F>(
    raw_logits: ArrayView2<f32>,
    boxes: ArrayView2<f32>,
    box_threshold: f32,
    text_threshold: f32,
    input_ids: &[u32],
    decode: F,
) -> Result<Vec<Predicted>>
where
    F: Fn(&[u32]) -> Result<String>,
{
    if boxes.dim() != (raw_logits.nrows(), 4) {
        bail!(
            "pred_boxes has shape {:?}, expected ({}, 4)",
            boxes.dim(),
            raw_logits.nrows()
        );
    }

    let scores = raw_logits.mapv(|x| 1.0 / (1.0 + (-x).exp()));

    let mut predictions = Vec::new();
    for (q, row) in scores.outer_iter().enumerate() {
        let best = row.iter().copied().fold(f32::MIN, f32::max);
        if best <= box_threshold {
            continue;
        }

        let token_ids = phrase_token_ids(row, text_threshold, input_ids);
        let phrase = decode(&token_ids)?.replace('.', "");
        let b = boxes.row(q);

        predictions.push(Predicted {
            cxcywh: [b[0], b[1], b[2], b[3]],
            logit: best,
            phrase: phrase.trim().to_string(),
        });
    }

    tracing::debug!(
        "{} of {} queries above box threshold {}",
        predictions.len(),
        scores.nrows(),
        box_threshold
    );
    Ok(predictions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn logit(p: f32) -> f32 {
        (p / (1.0 - p)).ln()
    }

    #[test]
    fn test_postprocess_thresholds() {
        // [CLS] swan . water . [SEP]
        let ids = [101u32, 10000, 1012, 2300, 1012, 102];
        let raw = array![
            [logit(0.1), logit(0.8), logit(0.3), logit(0.1), logit(0.1), logit(0.1)],
            [logit(0.1), logit(0.2), logit(0.1), logit(0.2), logit(0.1), logit(0.1)],
            [logit(0.1), logit(0.1), logit(0.1), logit(0.5), logit(0.1), logit(0.1)],
        ];
        let boxes = array![
            [0.5, 0.5, 0.2, 0.2],
            [0.1, 0.1, 0.1, 0.1],
            [0.3, 0.4, 0.1, 0.2],
        ];
        let decode = |t: &[u32]| -> Result<String> {
            Ok(t.iter()
                .map(|id| match id {
                    10000 => "swan",
                    2300 => "water",
                    1012 => ".",
                    _ => "?",
                })
                .collect::<Vec<_>>()
                .join(" "))
        };

        let preds = postprocess(raw.view(), boxes.view(), 0.25, 0.25, &ids, decode).unwrap();

        assert_eq!(preds.len(), 2);
        assert_eq!(preds[0].phrase, "swan");
        assert!((preds[0].logit - 0.8).abs() < 1e-4);
        assert_eq!(preds[0].cxcywh, [0.5, 0.5, 0.2, 0.2]);
        assert_eq!(preds[1].phrase, "water");
        assert_eq!(preds[1].cxcywh, [0.3, 0.4, 0.1, 0.2]);
    }

    #[test]
    fn test_postprocess_rejects_mismatched_boxes() {
        let ids = [101u32, 10000, 102];
        let raw = array![[logit(0.1), logit(0.9), logit(0.1)], [logit(0.9), logit(0.1), logit(0.1)]];
        let decode = |_: &[u32]| -> Result<String> { Ok(String::new()) };

        let short = array![[0.5, 0.5, 0.2, 0.2]];
        let err = postprocess(raw.view(), short.view(), 0.25, 0.25, &ids, decode).unwrap_err();
        assert!(err.to_string().contains("expected (2, 4)"), "{err}");

        let narrow = array![[0.5, 0.5], [0.1, 0.1]];
        assert!(postprocess(raw.view(), narrow.view(), 0.25, 0.25, &ids, decode).is_err());
    }
}
