use crate::error::Result;
use crate::models::{MeasurementFrame, MonthLabel};
use crate::utils::constants::{DEFAULT_YEAR_SUFFIX, SLICE_DELIMITER};
use crate::utils::filename::slice_path;
use crate::utils::progress::ProgressReporter;
use encoding_rs::{UTF_8, WINDOWS_1252};
use std::collections::HashMap;
use std::path::Path;

/// Reads delimited measurement files into frames
pub struct SliceReader {
    delimiter: u8,
    year_suffix: String,
}

impl SliceReader {
    pub fn new() -> Self {
        Self {
            delimiter: SLICE_DELIMITER,
            year_suffix: DEFAULT_YEAR_SUFFIX.to_string(),
        }
    }

    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn with_year_suffix(mut self, year_suffix: &str) -> Self {
        self.year_suffix = year_suffix.to_string();
        self
    }

    /// Read the slice for `month` from `dir` (e.g. `lte_Jun_18.csv`)
    pub fn read_slice(&self, dir: &Path, month: MonthLabel) -> Result<MeasurementFrame> {
        let path = slice_path(dir, month, &self.year_suffix);
        let frame = self.read_frame(&path)?;
        tracing::info!(%month, rows = frame.len(), path = %path.display(), "Loaded monthly slice");
        Ok(frame)
    }

    /// Read every listed month, keyed by month label
    pub fn read_months(
        &self,
        dir: &Path,
        months: &[MonthLabel],
        progress: Option<&ProgressReporter>,
    ) -> Result<HashMap<MonthLabel, MeasurementFrame>> {
        let mut month_map = HashMap::with_capacity(months.len());

        for &month in months {
            if let Some(p) = progress {
                p.set_message(&format!("Reading {} slice...", month));
            }
            let frame = self.read_slice(dir, month)?;
            month_map.insert(month, frame);
            if let Some(p) = progress {
                p.increment(1);
            }
        }

        Ok(month_map)
    }

    /// Read any delimited file with a header row
    pub fn read_frame(&self, path: &Path) -> Result<MeasurementFrame> {
        let bytes = std::fs::read(path)?;
        let content = decode_text(&bytes);

        let mut reader = csv::ReaderBuilder::new()
            .delimiter(self.delimiter)
            .has_headers(true)
            .from_reader(content.as_bytes());

        let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
        let mut frame = MeasurementFrame::new(headers);

        for record in reader.records() {
            let record = record?;
            frame.push_row(record.iter().map(str::to_string).collect())?;
        }

        Ok(frame)
    }
}

impl Default for SliceReader {
    fn default() -> Self {
        Self::new()
    }
}

/// UTF-8 (BOM stripped), falling back to Windows-1252 for legacy exports
fn decode_text(bytes: &[u8]) -> String {
    let (text, _, had_errors) = UTF_8.decode(bytes);
    if !had_errors {
        return text.into_owned();
    }

    tracing::debug!("Input is not valid UTF-8, decoding as Windows-1252");
    let (text, _, _) = WINDOWS_1252.decode(bytes);
    text.into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    fn write_file(dir: &Path, name: &str, bytes: &[u8]) -> Result<()> {
        let mut file = std::fs::File::create(dir.join(name))?;
        file.write_all(bytes)?;
        Ok(())
    }

    #[test]
    fn test_read_slice_tab_separated() -> Result<()> {
        let dir = TempDir::new()?;
        write_file(
            dir.path(),
            "lte_Jun_18.csv",
            b"latitude\tlongitude\toperator\ttotal_power\tcell\n\
              53.41\t-2.98\tEE\t-95.5\tA1\n\
              53.80\t-1.55\tO2\t\tB7\n",
        )?;

        let reader = SliceReader::new();
        let frame = reader.read_slice(dir.path(), "Jun".parse()?)?;

        assert_eq!(frame.len(), 2);
        assert_eq!(frame.headers().len(), 5);
        assert_eq!(frame.row(1).unwrap()[4], "B7");
        assert_eq!(
            frame.numeric_column("total_power")?,
            vec![Some(-95.5), None]
        );

        Ok(())
    }

    #[test]
    fn test_missing_slice_is_an_error() {
        let dir = TempDir::new().unwrap();
        let reader = SliceReader::new();
        assert!(reader.read_slice(dir.path(), "Aug".parse().unwrap()).is_err());
    }

    #[test]
    fn test_ragged_rows_are_an_error() -> Result<()> {
        let dir = TempDir::new()?;
        write_file(dir.path(), "lte_Jul_18.csv", b"a\tb\n1\t2\n3\n")?;

        let reader = SliceReader::new();
        assert!(reader.read_slice(dir.path(), "Jul".parse()?).is_err());

        Ok(())
    }

    #[test]
    fn test_bom_and_legacy_encoding() -> Result<()> {
        let dir = TempDir::new()?;
        write_file(dir.path(), "bom.csv", b"\xEF\xBB\xBFoperator,site\nEE,Leeds\n")?;
        write_file(dir.path(), "latin.csv", b"operator,site\nO2,Caf\xE9\n")?;

        let reader = SliceReader::new().with_delimiter(b',');

        let frame = reader.read_frame(&dir.path().join("bom.csv"))?;
        assert_eq!(frame.headers()[0], "operator");

        let frame = reader.read_frame(&dir.path().join("latin.csv"))?;
        assert_eq!(frame.row(0).unwrap()[1], "Café");

        Ok(())
    }

    #[test]
    fn test_read_months_with_year_suffix() -> Result<()> {
        let dir = TempDir::new()?;
        write_file(dir.path(), "lte_Jun_19.csv", b"operator\nEE\nO2\n")?;
        write_file(dir.path(), "lte_Jul_19.csv", b"operator\nThree\n")?;

        let months: Vec<MonthLabel> = vec!["Jun".parse()?, "Jul".parse()?];
        let reader = SliceReader::new().with_year_suffix("19");
        let month_map = reader.read_months(dir.path(), &months, None)?;

        assert_eq!(month_map.len(), 2);
        assert_eq!(month_map[&months[0]].len(), 2);
        assert_eq!(month_map[&months[1]].len(), 1);

        Ok(())
    }
}
