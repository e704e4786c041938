pub mod csv_writer;
pub mod figure_writer;

pub use csv_writer::CsvWriter;
pub use figure_writer::{DensityCurve, FigureWriter, ScatterLayer};
