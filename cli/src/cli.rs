use std::path::PathBuf;

use clap::Parser;

use image_batcher_core::config::{ConversionConfig, FailurePolicy, TARGET_WIDTH};
use image_batcher_core::format::OutputFormat;

/// Batch-convert a directory of PNG/JPEG images into resized JPEG, PNG, WebP and AVIF
#[derive(Debug, Parser)]
#[command(name = "image_batcher", version, about)]
pub struct Cli {
    /// Directory containing the source images
    #[arg(default_value = "./img")]
    pub input: PathBuf,

    /// Directory for the converted images (created if missing)
    #[arg(default_value = "./optimized_img")]
    pub output: PathBuf,

    /// Target width in pixels; narrower images are enlarged to it
    #[arg(short, long, default_value_t = TARGET_WIDTH, value_parser = clap::value_parser!(u32).range(1..))]
    pub width: u32,

    /// Output formats to produce (jpg, png, webp, avif)
    #[arg(short, long, value_delimiter = ',', default_values_t = OutputFormat::ALL.to_vec())]
    pub formats: Vec<OutputFormat>,

    /// What to do when an image fails: abort the batch, or continue with the next file
    #[arg(long, value_name = "POLICY", default_value_t = FailurePolicy::Abort)]
    pub on_error: FailurePolicy,

    /// Show what would be written without converting anything
    #[arg(long)]
    pub dry_run: bool,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    pub fn to_config(&self) -> ConversionConfig {
        let mut config = ConversionConfig::default().with_formats(&self.formats);
        config.width = self.width;
        config.failure_policy = self.on_error;
        config
    }
}
