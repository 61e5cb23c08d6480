use std::path::Path;

use image::GenericImageView;

use crate::config::ConversionConfig;
use crate::error::ProcessingError;
use crate::format::{OutputFormat, SourceFormat};
use crate::processor::{self, ImageProcessor};
use crate::resize::resize_to_width;

/// One encoded rendition of a source image.
#[derive(Debug, Clone)]
pub struct EncodedImage {
    pub format: OutputFormat,
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

pub struct Pipeline {
    width: u32,
    processors: Vec<Box<dyn ImageProcessor>>,
}

impl Pipeline {
    pub fn new(width: u32) -> Self {
        Self {
            width,
            processors: Vec::new(),
        }
    }

    /// Build a pipeline with one processor per entry of the settings table.
    pub fn from_config(config: &ConversionConfig) -> Result<Self, ProcessingError> {
        config.validate()?;

        let mut pipeline = Pipeline::new(config.width);
        for &target in &config.targets {
            pipeline.register(processor::for_settings(target));
        }
        Ok(pipeline)
    }

    pub fn register(&mut self, processor: Box<dyn ImageProcessor>) {
        self.processors.push(processor);
    }

    pub fn formats(&self) -> Vec<OutputFormat> {
        self.processors.iter().map(|p| p.format()).collect()
    }

    /// Decode `data` once, resize it, and encode it with every registered processor.
    ///
    /// Nothing is returned unless all renditions encode successfully. `path` is
    /// only used for diagnostics; the decoder sniffs the actual format from the
    /// bytes so a mislabelled `.jpg` holding PNG data still converts.
    pub fn process(&self, path: &Path, data: &[u8]) -> Result<Vec<EncodedImage>, ProcessingError> {
        let img =
            image::load_from_memory(data).map_err(|e| ProcessingError::Decode(e.to_string()))?;

        log::debug!(
            "Decoded {} ({}): {}x{} pixels",
            path.display(),
            SourceFormat::from_path(path).map_or("unknown", |f| f.as_str()),
            img.width(),
            img.height()
        );

        let resized = resize_to_width(img, self.width);
        let (width, height) = resized.dimensions();

        let mut outputs = Vec::with_capacity(self.processors.len());
        for processor in &self.processors {
            let data = processor.encode(&resized)?;
            log::debug!(
                "Encoded {} as {}: {} bytes",
                path.display(),
                processor.format(),
                data.len()
            );
            outputs.push(EncodedImage {
                format: processor.format(),
                width,
                height,
                data,
            });
        }

        Ok(outputs)
    }
}
