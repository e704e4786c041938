pub mod analyzers;
pub mod cache;
pub mod cli;
pub mod error;
pub mod models;
pub mod processors;
pub mod readers;
pub mod settings;
pub mod utils;
pub mod writers;

pub use settings::{ConfigOverrides, PipelineConfig};
pub use error::{ProcessingError, Result};
