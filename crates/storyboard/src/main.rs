//! Storyboard CLI binary.
//!
//! This binary provides command-line access to the storyboard pipeline:
//! - Extract characters and scenes from a script
//! - Break a script into panels
//! - Generate single images and speech clips
//! - Run the whole pipeline into an output directory

use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    use cli::{Cli, Commands, RunOptions, Session, analyze, extract, image, run_pipeline, speech};

    dotenvy::dotenv().ok();

    // Parse command-line arguments
    let cli = Cli::parse();

    // RUST_LOG wins over --verbose
    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let session = Session::open(cli.config.as_deref(), cli.api_key.as_deref())?;

    match cli.command {
        Commands::Extract { script } => {
            extract(&session, &script).await?;
        }

        Commands::Analyze { script, characters } => {
            analyze(&session, &script, characters).await?;
        }

        Commands::Image {
            prompt,
            aspect_ratio,
            out,
        } => {
            image(&session, &prompt, aspect_ratio, &out).await?;
        }

        Commands::Speech { text, voice, out } => {
            speech(&session, &text, voice.as_deref(), &out).await?;
        }

        Commands::Run {
            script,
            out_dir,
            skip_art,
            skip_audio,
        } => {
            let options = RunOptions {
                script,
                out_dir,
                skip_art,
                skip_audio,
            };
            run_pipeline(&session, &options).await?;
        }
    }

    Ok(())
}
