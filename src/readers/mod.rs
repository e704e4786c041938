pub mod slice_reader;

pub use slice_reader::SliceReader;
