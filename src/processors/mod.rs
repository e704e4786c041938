pub mod aggregator;
pub mod binner;
pub mod classifier;
pub mod integrity_checker;
pub mod pipeline;
pub mod smoother;

pub use aggregator::MonthlyAggregator;
pub use binner::{BinnedFrame, SpatialBinner};
pub use classifier::{ClassPartition, PowerThresholds};
pub use integrity_checker::{IntegrityChecker, IntegrityReport};
pub use pipeline::{OperatorSummary, Pipeline, RunSummary};
pub use smoother::{FeatureSmoother, SmoothedFrame};
