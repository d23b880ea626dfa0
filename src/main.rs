use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use inktrace::models::{AppConfig, OutputMode};
use inktrace::services::{AssetPipeline, ProcessRequest};

#[derive(Parser)]
#[command(name = "inktrace")]
#[command(about = "Raster-to-vector pipeline for clean SVG icons and logos")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert an image into a clean SVG asset
    Convert {
        /// Input file (PNG, JPEG, GIF, WebP, BMP or SVG)
        input: PathBuf,

        /// Output mode: "icon" (monochrome, themeable) or "logo" (multi-color)
        #[arg(short, long, default_value = "logo")]
        mode: String,

        /// Detect and remove the image background before tracing
        #[arg(long)]
        remove_background: bool,

        /// Component name override (sanitized; derived from the filename otherwise)
        #[arg(short, long)]
        name: Option<String>,

        /// Output SVG file path (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Emit the full result (SVG, palette, name, timing) as JSON
        #[arg(long)]
        json: bool,

        /// Configuration file path
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Extract only the dominant colors of an image
    Palette {
        /// Input file (PNG, JPEG, GIF, WebP, BMP or SVG)
        input: PathBuf,

        /// Number of colors to extract
        #[arg(short, long, default_value_t = 6)]
        colors: usize,

        /// Emit the palette as a JSON array
        #[arg(long)]
        json: bool,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "inktrace=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().without_time())
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Convert {
            input,
            mode,
            remove_background,
            name,
            output,
            json,
            config,
        } => run_convert(
            &input,
            &mode,
            remove_background,
            name.as_deref(),
            output.as_deref(),
            json,
            config.as_deref(),
        ),
        Commands::Palette {
            input,
            colors,
            json,
        } => run_palette(&input, colors, json),
    }
}

#[allow(clippy::too_many_arguments)]
fn run_convert(
    input: &std::path::Path,
    mode: &str,
    remove_background: bool,
    name: Option<&str>,
    output: Option<&std::path::Path>,
    json: bool,
    config_path: Option<&std::path::Path>,
) -> anyhow::Result<()> {
    let mode: OutputMode = mode.parse().map_err(anyhow::Error::msg)?;
    let config = config_path.map(AppConfig::load).unwrap_or_default();
    let pipeline = AssetPipeline::new(config);

    let bytes = std::fs::read(input)?;
    let filename = input
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let result = pipeline.process(&ProcessRequest {
        bytes: &bytes,
        filename: &filename,
        mode,
        remove_background,
        requested_name: name,
    })?;

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        match output {
            Some(path) => {
                std::fs::write(path, &result.svg)?;
                eprintln!(
                    "{} -> {} ({} colors, {}ms)",
                    filename,
                    path.display(),
                    result.detected_colors.len(),
                    result.elapsed_ms
                );
            }
            None => println!("{}", result.svg),
        }
    }
    Ok(())
}

fn run_palette(input: &std::path::Path, colors: usize, json: bool) -> anyhow::Result<()> {
    let pipeline = AssetPipeline::new(AppConfig::default());
    let bytes = std::fs::read(input)?;
    let palette = pipeline.extract_palette(&bytes, colors)?;

    if json {
        println!("{}", serde_json::to_string(&palette)?);
    } else {
        for color in palette {
            println!("{}", color);
        }
    }
    Ok(())
}
