//! Grounding detection command

use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::config::{DeviceConfig, Settings};
use crate::detector::Detector;

/// Run detection on one image and print the corner boxes
pub fn detect(
    mut settings: Settings,
    image: PathBuf,
    caption: String,
    box_threshold: Option<f32>,
    text_threshold: Option<f32>,
    output: Option<PathBuf>,
    use_cpu: bool,
) -> Result<()> {
    if use_cpu {
        settings.device = DeviceConfig::Named("cpu".to_string());
    }
    let box_threshold = box_threshold.unwrap_or(settings.box_threshold);
    let text_threshold = text_threshold.unwrap_or(settings.text_threshold);

    let frame =
        image::open(&image).with_context(|| format!("failed to open {}", image.display()))?;
    let detector = Detector::from_settings(&settings)?;

    let grounding = detector.run_grounding(&frame, &caption, box_threshold, text_threshold)?;

    println!("{} detection(s) for \"{}\":", grounding.boxes.len(), caption);
    for (pred, [[x0, y0], [x1, y1]]) in grounding.predictions.iter().zip(&grounding.boxes) {
        println!(
            "  {:<16} {:.3}  [[{}, {}], [{}, {}]]",
            pred.phrase, pred.logit, x0, y0, x1, y1
        );
    }

    if let Some(output) = output {
        grounding
            .annotated
            .save(&output)
            .with_context(|| format!("failed to write {}", output.display()))?;
        println!("\nAnnotated image written to {}", output.display());
    }

    Ok(())
}
