pub mod constants;
pub mod coordinates;
pub mod filename;
pub mod progress;

pub use constants::*;
pub use coordinates::{haversine_distance, Extent};
pub use filename::{operator_figure_path, slice_file_name, slice_path};
pub use progress::ProgressReporter;
