use thiserror::Error;

use crate::format::OutputFormat;

#[derive(Debug, Error)]
pub enum ProcessingError {
    #[error("failed to decode image: {0}")]
    Decode(String),

    #[error("{format} encoding failed: {message}")]
    Encode {
        format: OutputFormat,
        message: String,
    },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl ProcessingError {
    pub(crate) fn encode(format: OutputFormat, message: impl std::fmt::Display) -> Self {
        ProcessingError::Encode {
            format,
            message: message.to_string(),
        }
    }
}
