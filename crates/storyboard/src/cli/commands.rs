//! CLI command definitions.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use storyboard::AspectRatio;

/// Storyboard - turn scripts into storyboard art and dialogue audio
#[derive(Parser, Debug)]
#[command(name = "storyboard")]
#[command(about = "Turn scripts into storyboard art and dialogue audio", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file, replacing the default search path
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Gemini API key, overriding GEMINI_API_KEY / API_KEY
    #[arg(long, global = true)]
    pub api_key: Option<String>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Extract characters and scenes from a script, printed as JSON
    Extract {
        /// Path to the script file
        #[arg(long)]
        script: PathBuf,
    },

    /// Break a script into panels, printed as JSON
    Analyze {
        /// Path to the script file
        #[arg(long)]
        script: PathBuf,

        /// Known character names; extracted from the script when omitted
        #[arg(long, value_delimiter = ',')]
        characters: Vec<String>,
    },

    /// Generate a single image
    Image {
        /// Prompt text
        #[arg(long)]
        prompt: String,

        /// Aspect ratio: 1:1, 3:4, 4:3, 9:16, or 16:9
        #[arg(long, default_value = "16:9")]
        aspect_ratio: AspectRatio,

        /// Output file; the extension is chosen from the image type
        #[arg(long)]
        out: PathBuf,
    },

    /// Speak a line of dialogue as WAV
    Speech {
        /// Text to speak
        #[arg(long)]
        text: String,

        /// Preset voice; defaults to the configured voice
        #[arg(long)]
        voice: Option<String>,

        /// Output WAV file
        #[arg(long)]
        out: PathBuf,
    },

    /// Run the full pipeline and write every artifact to a directory
    Run {
        /// Path to the script file
        #[arg(long)]
        script: PathBuf,

        /// Output directory
        #[arg(long, default_value = "storyboard-out")]
        out_dir: PathBuf,

        /// Skip character sheets and scene art
        #[arg(long)]
        skip_art: bool,

        /// Skip dialogue audio
        #[arg(long)]
        skip_audio: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn image_defaults_to_widescreen() {
        let cli = Cli::try_parse_from(["storyboard", "image", "--prompt", "A dock", "--out", "dock"])
            .unwrap();
        match cli.command {
            Commands::Image { aspect_ratio, .. } => assert_eq!(aspect_ratio, AspectRatio::Widescreen),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn aspect_ratio_parses_from_ratio_string() {
        let cli = Cli::try_parse_from([
            "storyboard", "image", "--prompt", "A dock", "--aspect-ratio", "9:16", "--out", "dock",
        ])
        .unwrap();
        assert!(matches!(
            cli.command,
            Commands::Image {
                aspect_ratio: AspectRatio::Tall,
                ..
            }
        ));

        assert!(
            Cli::try_parse_from([
                "storyboard", "image", "--prompt", "A dock", "--aspect-ratio", "2:1", "--out", "dock",
            ])
            .is_err()
        );
    }

    #[test]
    fn analyze_splits_character_list() {
        let cli = Cli::try_parse_from([
            "storyboard", "analyze", "--script", "pilot.txt", "--characters", "Alice,Bob",
        ])
        .unwrap();
        match cli.command {
            Commands::Analyze { characters, .. } => assert_eq!(characters, vec!["Alice", "Bob"]),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn global_flags_follow_the_subcommand() {
        let cli = Cli::try_parse_from([
            "storyboard", "run", "--script", "pilot.txt", "--skip-audio", "-v", "--api-key", "k",
        ])
        .unwrap();
        assert!(cli.verbose);
        assert_eq!(cli.api_key.as_deref(), Some("k"));
        match cli.command {
            Commands::Run {
                out_dir,
                skip_art,
                skip_audio,
                ..
            } => {
                assert_eq!(out_dir, PathBuf::from("storyboard-out"));
                assert!(!skip_art);
                assert!(skip_audio);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
