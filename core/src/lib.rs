pub mod config;
pub mod error;
pub mod format;
pub mod pipeline;
pub mod processor;
pub mod resize;
