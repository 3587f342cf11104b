//! CLI commands

mod args;
mod detect;
mod list;

pub use args::args;
pub use detect::detect;
pub use list::list;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};

use crate::config::Settings;

/// segtrack - checkpoint discovery and model arguments for segment-and-track
#[derive(Parser)]
#[command(name = "segtrack")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Settings file (YAML, or JSON by extension)
    #[arg(long, short, global = true)]
    pub config: Option<PathBuf>,

    /// Checkpoint directory (overrides config and SEGTRACK_CKPT_DIR)
    #[arg(long, short, global = true)]
    pub dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the assembled model arguments
    Args {
        /// Fail on checkpoint names without size/backbone markers
        #[arg(long)]
        strict: bool,

        /// Output format
        #[arg(long, value_enum, default_value = "json")]
        format: OutputFormat,
    },

    /// List checkpoints and their inferred variants
    List {
        /// Show detailed information
        #[arg(long, short)]
        verbose: bool,
    },

    /// Run text-prompted detection on an image
    Detect {
        /// Input image
        image: PathBuf,

        /// Objects to find, separated by '.' (e.g. "swan.water")
        #[arg(long)]
        caption: String,

        /// Box confidence threshold (default from settings)
        #[arg(long)]
        box_threshold: Option<f32>,

        /// Token confidence threshold (default from settings)
        #[arg(long)]
        text_threshold: Option<f32>,

        /// Where to write the annotated image
        #[arg(long, short)]
        output: Option<PathBuf>,

        /// Use CPU instead of GPU
        #[arg(long)]
        cpu: bool,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Yaml,
}

impl Cli {
    /// Settings from the config file and environment, with CLI overrides applied
    pub fn settings(&self) -> Result<Settings> {
        let mut settings = Settings::load(self.config.as_deref())?;
        if let Some(dir) = &self.dir {
            settings.checkpoint_dir = dir.clone();
        }
        Ok(settings)
    }
}
