use std::io::Cursor;

use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, RgbImage};

use crate::error::ProcessingError;
use crate::format::OutputFormat;
use crate::processor::ImageProcessor;

pub struct JpgProcessor {
    pub quality: u8,
    /// Encode through mozjpeg instead of the baseline encoder
    pub optimize: bool,
}

impl ImageProcessor for JpgProcessor {
    fn format(&self) -> OutputFormat {
        OutputFormat::Jpeg
    }

    fn encode(&self, img: &DynamicImage) -> Result<Vec<u8>, ProcessingError> {
        // JPEG has no alpha channel
        let rgb = img.to_rgb8();

        if self.optimize {
            encode_mozjpeg(&rgb, self.quality)
        } else {
            encode_baseline(&rgb, self.quality)
        }
    }
}

fn encode_baseline(rgb: &RgbImage, quality: u8) -> Result<Vec<u8>, ProcessingError> {
    let mut output = Vec::new();
    let mut cursor = Cursor::new(&mut output);
    let mut encoder = JpegEncoder::new_with_quality(&mut cursor, quality);

    encoder
        .encode(
            rgb.as_raw(),
            rgb.width(),
            rgb.height(),
            image::ExtendedColorType::Rgb8,
        )
        .map_err(|e| ProcessingError::encode(OutputFormat::Jpeg, e))?;

    Ok(output)
}

/// Progressive JPEG with optimized Huffman coding and scan optimization.
fn encode_mozjpeg(rgb: &RgbImage, quality: u8) -> Result<Vec<u8>, ProcessingError> {
    let (width, height) = rgb.dimensions();
    let pixels = rgb.as_raw();

    // libjpeg reports fatal errors by unwinding; needs panic = "unwind" (see workspace Cargo.toml)
    let result = std::panic::catch_unwind(|| -> std::io::Result<Vec<u8>> {
        let mut comp = mozjpeg::Compress::new(mozjpeg::ColorSpace::JCS_RGB);
        comp.set_size(width as usize, height as usize);
        comp.set_quality(quality as f32);
        comp.set_progressive_mode();
        comp.set_optimize_coding(true);
        comp.set_optimize_scans(true);

        let mut comp = comp.start_compress(Vec::new())?;
        comp.write_scanlines(pixels)?;
        comp.finish()
    });

    match result {
        Ok(Ok(data)) => Ok(data),
        Ok(Err(e)) => Err(ProcessingError::encode(OutputFormat::Jpeg, e)),
        Err(_) => Err(ProcessingError::encode(
            OutputFormat::Jpeg,
            "mozjpeg aborted while compressing",
        )),
    }
}
