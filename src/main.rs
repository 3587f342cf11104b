use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use segtrack_ckpt::cli::{Cli, Commands};

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "segtrack_ckpt=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let settings = cli.settings()?;

    match cli.command {
        Commands::Args { strict, format } => {
            segtrack_ckpt::cli::args(settings, strict, format)?;
        }
        Commands::List { verbose } => {
            segtrack_ckpt::cli::list(&settings, verbose)?;
        }
        Commands::Detect {
            image,
            caption,
            box_threshold,
            text_threshold,
            output,
            cpu,
        } => {
            segtrack_ckpt::cli::detect(
                settings,
                image,
                caption,
                box_threshold,
                text_threshold,
                output,
                cpu,
            )?;
        }
    }

    Ok(())
}
