pub mod avif;
pub mod jpg;
pub mod png;
pub mod webp;

use image::DynamicImage;

use crate::config::OutputSettings;
use crate::error::ProcessingError;
use crate::format::OutputFormat;

pub trait ImageProcessor: Send + Sync {
    fn format(&self) -> OutputFormat;
    fn encode(&self, img: &DynamicImage) -> Result<Vec<u8>, ProcessingError>;
}

/// Build the processor for one entry of the settings table.
pub fn for_settings(settings: OutputSettings) -> Box<dyn ImageProcessor> {
    match settings {
        OutputSettings::Jpeg { quality, optimize } => {
            Box::new(jpg::JpgProcessor { quality, optimize })
        }
        OutputSettings::Png {
            compression,
            adaptive_filtering,
        } => Box::new(png::PngProcessor {
            compression,
            adaptive_filtering,
        }),
        OutputSettings::Webp { quality, effort } => {
            Box::new(webp::WebpProcessor { quality, effort })
        }
        OutputSettings::Avif { quality, effort } => {
            Box::new(avif::AvifProcessor { quality, effort })
        }
    }
}
