use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use image::DynamicImage;

use crate::error::ProcessingError;
use crate::format::OutputFormat;
use crate::processor::ImageProcessor;

pub struct PngProcessor {
    /// 0-9
    pub compression: u8,
    pub adaptive_filtering: bool,
}

/// Map a zlib-style 0-9 level onto the encoder's presets.
fn compression_type(level: u8) -> CompressionType {
    match level {
        0..=3 => CompressionType::Fast,
        4..=6 => CompressionType::Default,
        _ => CompressionType::Best,
    }
}

impl ImageProcessor for PngProcessor {
    fn format(&self) -> OutputFormat {
        OutputFormat::Png
    }

    fn encode(&self, img: &DynamicImage) -> Result<Vec<u8>, ProcessingError> {
        let filter = if self.adaptive_filtering {
            FilterType::Adaptive
        } else {
            FilterType::NoFilter
        };

        let mut output = Vec::new();
        let encoder =
            PngEncoder::new_with_quality(&mut output, compression_type(self.compression), filter);
        img.write_with_encoder(encoder)
            .map_err(|e| ProcessingError::encode(OutputFormat::Png, e))?;

        Ok(output)
    }
}
