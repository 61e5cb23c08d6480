use std::path::PathBuf;
use thiserror::Error;

use image_batcher_core::error::ProcessingError;

#[derive(Debug, Error)]
pub enum BatchError {
    #[error("failed to read file {path}: {source}")]
    ReadFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to write file {path}: {source}")]
    WriteFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to create directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to list input directory: {0}")]
    ListDir(#[from] walkdir::Error),

    #[error("{path}: {source}")]
    Processing {
        path: PathBuf,
        source: ProcessingError,
    },
}
