use std::fmt;
use std::str::FromStr;

use crate::error::ProcessingError;
use crate::format::OutputFormat;

/// Default target width in pixels for every rendition.
pub const TARGET_WIDTH: u32 = 1080;

/// What to do when a single source image fails to convert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Stop the whole batch on the first error.
    Abort,
    /// Record the failure and move on to the next file.
    Continue,
}

impl fmt::Display for FailurePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Abort => write!(f, "abort"),
            Self::Continue => write!(f, "continue"),
        }
    }
}

impl FromStr for FailurePolicy {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "abort" => Ok(Self::Abort),
            "continue" => Ok(Self::Continue),
            _ => Err(format!("unknown failure policy: {s}")),
        }
    }
}

/// Encoder knobs for one output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputSettings {
    Jpeg {
        /// 1-100
        quality: u8,
        /// Use the mozjpeg encoder (optimized Huffman tables, scan optimization)
        optimize: bool,
    },
    Png {
        /// DEFLATE effort 0-9, lossless at every level
        compression: u8,
        adaptive_filtering: bool,
    },
    Webp {
        /// 0-100
        quality: u8,
        /// Encoder method 0-6 (6 = slowest/smallest)
        effort: u8,
    },
    Avif {
        /// 0-100
        quality: u8,
        /// 0-9 (9 = slowest/smallest)
        effort: u8,
    },
}

impl OutputSettings {
    pub fn format(&self) -> OutputFormat {
        match self {
            Self::Jpeg { .. } => OutputFormat::Jpeg,
            Self::Png { .. } => OutputFormat::Png,
            Self::Webp { .. } => OutputFormat::Webp,
            Self::Avif { .. } => OutputFormat::Avif,
        }
    }

    /// The fixed settings used for `format` by default.
    pub fn default_for(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Jpeg => Self::Jpeg {
                quality: 85,
                optimize: true,
            },
            OutputFormat::Png => Self::Png {
                compression: 9,
                adaptive_filtering: true,
            },
            OutputFormat::Webp => Self::Webp {
                quality: 85,
                effort: 6,
            },
            OutputFormat::Avif => Self::Avif {
                quality: 50,
                effort: 4,
            },
        }
    }

    fn validate(&self) -> Result<(), ProcessingError> {
        let (name, value, range) = match *self {
            Self::Jpeg { quality, .. } => ("JPEG quality", quality, 1..=100),
            Self::Png { compression, .. } => ("PNG compression level", compression, 0..=9),
            Self::Webp { quality, effort } => {
                if effort > 6 {
                    return Err(ProcessingError::InvalidConfig(format!(
                        "WebP effort must be 0-6, got {effort}"
                    )));
                }
                ("WebP quality", quality, 0..=100)
            }
            Self::Avif { quality, effort } => {
                if effort > 9 {
                    return Err(ProcessingError::InvalidConfig(format!(
                        "AVIF effort must be 0-9, got {effort}"
                    )));
                }
                ("AVIF quality", quality, 0..=100)
            }
        };
        if !range.contains(&value) {
            return Err(ProcessingError::InvalidConfig(format!(
                "{name} must be {}-{}, got {value}",
                range.start(),
                range.end()
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct ConversionConfig {
    /// Target width in pixels; every rendition is scaled to exactly this width
    pub width: u32,
    /// Renditions to produce, in output order
    pub targets: Vec<OutputSettings>,
    pub failure_policy: FailurePolicy,
}

impl ConversionConfig {
    /// Keep only the targets whose format is listed in `formats`, preserving table order.
    pub fn with_formats(mut self, formats: &[OutputFormat]) -> Self {
        self.targets.retain(|t| formats.contains(&t.format()));
        self
    }

    pub fn validate(&self) -> Result<(), ProcessingError> {
        if self.width == 0 {
            return Err(ProcessingError::InvalidConfig(
                "target width must be at least 1 pixel".into(),
            ));
        }
        if self.targets.is_empty() {
            return Err(ProcessingError::InvalidConfig(
                "no output formats selected".into(),
            ));
        }
        for target in &self.targets {
            target.validate()?;
        }
        Ok(())
    }
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            width: TARGET_WIDTH,
            targets: OutputFormat::ALL
                .iter()
                .map(|&f| OutputSettings::default_for(f))
                .collect(),
            failure_policy: FailurePolicy::Abort,
        }
    }
}
