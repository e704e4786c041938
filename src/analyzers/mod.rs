pub mod dataset_analyzer;
pub mod statistics;

pub use dataset_analyzer::{DatasetAnalyzer, DatasetStatistics};
pub use statistics::GaussianKde;
