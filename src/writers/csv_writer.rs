use crate::error::Result;
use crate::models::MeasurementFrame;
use crate::utils::constants::CACHE_DELIMITER;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

/// Writes frames as delimited text with a header row and no index column
pub struct CsvWriter {
    delimiter: u8,
}

impl CsvWriter {
    pub fn new() -> Self {
        Self {
            delimiter: CACHE_DELIMITER,
        }
    }

    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn write_frame(&self, frame: &MeasurementFrame, path: &Path) -> Result<()> {
        let file = File::create(path)?;
        let mut writer = csv::WriterBuilder::new()
            .delimiter(self.delimiter)
            .from_writer(BufWriter::new(file));

        writer.write_record(frame.headers())?;
        for row in frame.rows() {
            writer.write_record(row)?;
        }
        writer.flush()?;

        tracing::debug!(rows = frame.len(), path = %path.display(), "Wrote frame");
        Ok(())
    }
}

impl Default for CsvWriter {
    fn default() -> Self {
        Self::new()
    }
}
