//! List checkpoints command

use anyhow::Result;

use crate::checkpoint::{list_checkpoints, CheckpointEntry, GlobLister};
use crate::config::{Settings, CKPT_DIR_ENV};

/// List checkpoints in the configured directory
pub fn list(settings: &Settings, verbose: bool) -> Result<()> {
    let dir = &settings.checkpoint_dir;

    if !dir.exists() {
        println!("No checkpoint directory found at: {}", dir.display());
        println!(
            "\nSet {} environment variable or create a ./ckpt directory.",
            CKPT_DIR_ENV
        );
        return Ok(());
    }

    println!("Checkpoints in {}:\n", dir.display());

    let entries = list_checkpoints(dir, &GlobLister)?;
    if entries.is_empty() {
        println!("  No checkpoints found.");
        println!("\nExpected names:");
        println!("  - sam_vit_{{h,l,b}}_*.pth");
        println!("  - {{r50,swinb}}_{{aot,deaot}}{{t,s,b,l}}_pre_ytb_dav.pth");
        println!("  - groundingdino_{{swint,swinb}}*.pth (+ .onnx export)");
        return Ok(());
    }

    for entry in &entries {
        if verbose {
            print_details(entry);
        } else {
            println!("  {}", summary(entry));
        }
    }

    Ok(())
}

fn summary(entry: &CheckpointEntry) -> String {
    let name = entry
        .path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    match (&entry.rule, &entry.variant) {
        (Some(rule), Some(variant)) => format!("{} ({}, {})", name, rule, variant),
        (Some(rule), None) => format!("{} ({}, unrecognized variant)", name, rule),
        (None, _) => format!("{} (unmatched)", name),
    }
}

fn print_details(entry: &CheckpointEntry) {
    println!("  {}", summary(entry));
    println!("    Path: {}", entry.path.display());

    if let Ok(metadata) = std::fs::metadata(&entry.path) {
        let size_mb = metadata.len() as f64 / (1024.0 * 1024.0);
        if size_mb > 1024.0 {
            println!("    Size: {:.2} GB", size_mb / 1024.0);
        } else {
            println!("    Size: {:.2} MB", size_mb);
        }
    }

    println!();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checkpoint::CheckpointRule;
    use std::path::PathBuf;

    #[test]
    fn test_summary() {
        let entry = CheckpointEntry {
            path: PathBuf::from("ckpt/sam_vit_b_01ec64.pth"),
            rule: Some(CheckpointRule::Sam),
            variant: Some("vit_b".into()),
        };
        assert_eq!(summary(&entry), "sam_vit_b_01ec64.pth (SAM (sam_*.pth), vit_b)");

        let unmatched = CheckpointEntry {
            path: PathBuf::from("ckpt/other.pth"),
            rule: None,
            variant: None,
        };
        assert_eq!(summary(&unmatched), "other.pth (unmatched)");
    }
}
