//! Drawing detections onto frames

use std::path::Path;

use ab_glyph::{FontArc, PxScale};
use anyhow::Result;
use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_filled_rect_mut, draw_hollow_rect_mut, draw_text_mut, text_size};
use imageproc::rect::Rect;

use super::boxes::CornerBox;
use super::Predicted;

const PALETTE: [(u8, u8, u8); 10] = [
    (255, 0, 0),
    (0, 255, 0),
    (0, 0, 255),
    (255, 255, 0),
    (255, 0, 255),
    (0, 255, 255),
    (255, 128, 0),
    (255, 0, 128),
    (128, 255, 0),
    (0, 128, 255),
];

/// Draws boxes and, when a font is loaded, `phrase score` labels.
#[derive(Clone)]
pub struct Annotator {
    font: Option<FontArc>,
    thickness: u32,
    scale: PxScale,
}

impl Default for Annotator {
    fn default() -> Self {
        Self {
            font: None,
            thickness: 2,
            scale: PxScale::from(18.0),
        }
    }
}

impl Annotator {
    /// Annotator with labels rendered in the TrueType font at `path`
    pub fn with_font_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let bytes = std::fs::read(path.as_ref())?;
        let font = FontArc::try_from_vec(bytes)?;
        Ok(Self {
            font: Some(font),
            ..Default::default()
        })
    }

    pub fn thickness(mut self, thickness: u32) -> Self {
        self.thickness = thickness.max(1);
        self
    }

    /// Copy of `image` with each prediction drawn at its pixel box
    pub fn annotate(
        &self,
        image: &RgbImage,
        predictions: &[Predicted],
        boxes: &[CornerBox],
    ) -> RgbImage {
        let mut canvas = image.clone();

        for (i, (pred, &[[x0, y0], [x1, y1]])) in predictions.iter().zip(boxes).enumerate() {
            let (r, g, b) = PALETTE[i % PALETTE.len()];
            let color = Rgb([r, g, b]);

            for t in 0..self.thickness as i32 {
                let w = (x1 - x0 - 2 * t).max(1) as u32;
                let h = (y1 - y0 - 2 * t).max(1) as u32;
                draw_hollow_rect_mut(&mut canvas, Rect::at(x0 + t, y0 + t).of_size(w, h), color);
            }

            if let Some(font) = &self.font {
                let label = format!("{} {:.2}", pred.phrase, pred.logit);
                let (tw, th) = text_size(self.scale, font, &label);
                let ty = (y0 - th as i32).max(0);
                draw_filled_rect_mut(
                    &mut canvas,
                    Rect::at(x0, ty).of_size(tw.max(1), th.max(1)),
                    color,
                );
                draw_text_mut(&mut canvas, Rgb([0, 0, 0]), x0, ty, self.scale, font, &label);
            }
        }

        canvas
    }
}
