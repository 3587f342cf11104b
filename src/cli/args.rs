//! Model arguments command

use anyhow::Result;

use super::OutputFormat;
use crate::checkpoint::GlobLister;
use crate::config::{ModelArgs, Settings};
use crate::model::VariantPolicy;

/// Print the assembled model arguments
pub fn args(mut settings: Settings, strict: bool, format: OutputFormat) -> Result<()> {
    if strict {
        settings.variant_policy = VariantPolicy::Strict;
    }

    let model_args = ModelArgs::build_with(&settings, &GlobLister)?;

    let rendered = match format {
        OutputFormat::Json => model_args.to_json_pretty()?,
        OutputFormat::Yaml => model_args.to_yaml()?,
    };
    println!("{}", rendered.trim_end());

    Ok(())
}
