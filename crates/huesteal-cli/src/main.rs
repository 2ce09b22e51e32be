//! `huesteal` — bake the color grade of sampled video frames into a `.cube` LUT.
//!
//! Frames are still images extracted by an external tool (ffmpeg, a player's
//! snapshot feature, ...). Decoding goes through the `image` crate.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "huesteal")]
#[command(about = "Extract a video's color grade as a 3D LUT", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze frames and write a .cube LUT
    Generate {
        /// Frame images (PNG, JPEG, TIFF, ...)
        #[arg(required = true)]
        frames: Vec<PathBuf>,

        /// Path to the output .cube file
        #[arg(short, long)]
        output: PathBuf,

        /// Samples per LUT axis
        #[arg(short, long)]
        size: Option<usize>,

        /// Title written into the .cube header
        #[arg(short, long)]
        title: Option<String>,

        /// JSON file with `lut` and `quality` settings
        #[arg(long)]
        config: Option<PathBuf>,

        /// Keep dark, blown-out, and flat frames
        #[arg(long)]
        no_filter: bool,
    },

    /// Print frame quality and pooled Lab statistics as JSON
    Inspect {
        /// Frame images
        #[arg(required = true)]
        frames: Vec<PathBuf>,

        /// JSON file whose `quality` settings decide the `accepted` field
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Grade an image through an existing .cube LUT
    Apply {
        /// LUT to apply
        #[arg(short, long)]
        lut: PathBuf,

        /// Input image
        #[arg(short, long)]
        input: PathBuf,

        /// Output image
        #[arg(short, long)]
        output: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let args = Cli::parse();

    match args.command {
        Commands::Generate {
            frames,
            output,
            size,
            title,
            config,
            no_filter,
        } => {
            let mut settings = commands::Settings::load_or_default(config.as_deref())?;
            if let Some(size) = size {
                settings.lut.resolution = size;
            }
            if let Some(title) = title {
                settings.lut.title = title;
            }
            commands::generate(&frames, &output, &settings, !no_filter)
        }
        Commands::Inspect { frames, config } => {
            let settings = commands::Settings::load_or_default(config.as_deref())?;
            commands::inspect(&frames, &settings.quality)
        }
        Commands::Apply { lut, input, output } => commands::apply(&lut, &input, &output),
    }
}
