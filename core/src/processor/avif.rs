use image::codecs::avif::AvifEncoder;
use image::DynamicImage;

use crate::error::ProcessingError;
use crate::format::OutputFormat;
use crate::processor::ImageProcessor;

pub struct AvifProcessor {
    pub quality: u8,
    /// 0-9, higher is slower and smaller
    pub effort: u8,
}

/// Encoder speed 1-10 for an effort of 0-9.
fn speed_for_effort(effort: u8) -> u8 {
    10u8.saturating_sub(effort).clamp(1, 10)
}

impl ImageProcessor for AvifProcessor {
    fn format(&self) -> OutputFormat {
        OutputFormat::Avif
    }

    fn encode(&self, img: &DynamicImage) -> Result<Vec<u8>, ProcessingError> {
        let pixels = if img.color().has_alpha() {
            DynamicImage::ImageRgba8(img.to_rgba8())
        } else {
            DynamicImage::ImageRgb8(img.to_rgb8())
        };

        let mut output = Vec::new();
        let encoder = AvifEncoder::new_with_speed_quality(
            &mut output,
            speed_for_effort(self.effort),
            self.quality,
        );
        pixels
            .write_with_encoder(encoder)
            .map_err(|e| ProcessingError::encode(OutputFormat::Avif, e))?;

        Ok(output)
    }
}
