use image::{DynamicImage, GenericImageView};

use crate::error::ProcessingError;
use crate::format::OutputFormat;
use crate::processor::ImageProcessor;

pub struct WebpProcessor {
    pub quality: u8,
    /// libwebp `method`, 0-6
    pub effort: u8,
}

impl ImageProcessor for WebpProcessor {
    fn format(&self) -> OutputFormat {
        OutputFormat::Webp
    }

    fn encode(&self, img: &DynamicImage) -> Result<Vec<u8>, ProcessingError> {
        let (width, height) = img.dimensions();

        let mut config = libwebp_sys::WebPConfig::new().map_err(|_| {
            ProcessingError::encode(OutputFormat::Webp, "failed to initialise encoder config")
        })?;
        config.quality = self.quality as f32;
        config.method = self.effort as i32;

        // The encoder only takes 8-bit RGB or RGBA
        let encoded = if img.color().has_alpha() {
            let rgba = img.to_rgba8();
            let encoder = ::webp::Encoder::from_rgba(rgba.as_raw(), width, height);
            encoder.encode_advanced(&config)
        } else {
            let rgb = img.to_rgb8();
            let encoder = ::webp::Encoder::from_rgb(rgb.as_raw(), width, height);
            encoder.encode_advanced(&config)
        }
        .map_err(|e| ProcessingError::encode(OutputFormat::Webp, format!("{e:?}")))?;

        Ok(encoded.to_vec())
    }
}
