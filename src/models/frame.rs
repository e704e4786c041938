use crate::error::{ProcessingError, Result};
use crate::models::Measurement;
use crate::utils::constants::{
    COL_LATITUDE, COL_LONGITUDE, COL_OPERATOR, COL_TOTAL_POWER, MISSING_MARKERS,
};

/// Tabular measurement data: an ordered header and rows of raw fields.
///
/// Every column is carried through untouched; the position of a row is its
/// sequential index. Typed views are parsed on demand by column name.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MeasurementFrame {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl MeasurementFrame {
    pub fn new(headers: Vec<String>) -> Self {
        Self {
            headers,
            rows: Vec::new(),
        }
    }

    pub fn from_rows(headers: Vec<String>, rows: Vec<Vec<String>>) -> Result<Self> {
        let mut frame = Self::new(headers);
        frame.rows.reserve(rows.len());
        for row in rows {
            frame.push_row(row)?;
        }
        Ok(frame)
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn row(&self, index: usize) -> Option<&[String]> {
        self.rows.get(index).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn push_row(&mut self, row: Vec<String>) -> Result<()> {
        if row.len() != self.headers.len() {
            return Err(ProcessingError::InvalidFormat(format!(
                "Row {} has {} fields, expected {}",
                self.rows.len(),
                row.len(),
                self.headers.len()
            )));
        }
        self.rows.push(row);
        Ok(())
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.headers.iter().any(|h| h == name)
    }

    pub fn column_index(&self, name: &str) -> Result<usize> {
        self.headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| ProcessingError::MissingData(format!("column '{}'", name)))
    }

    /// Parse a column as floats. Missing markers and NaN become `None`.
    pub fn numeric_column(&self, name: &str) -> Result<Vec<Option<f64>>> {
        let idx = self.column_index(name)?;
        self.rows
            .iter()
            .enumerate()
            .map(|(row_idx, row)| {
                parse_numeric(&row[idx]).map_err(|_| {
                    ProcessingError::InvalidFormat(format!(
                        "Invalid number '{}' in column '{}' at row {}",
                        row[idx], name, row_idx
                    ))
                })
            })
            .collect()
    }

    pub fn text_column(&self, name: &str) -> Result<Vec<Option<&str>>> {
        let idx = self.column_index(name)?;
        Ok(self
            .rows
            .iter()
            .map(|row| {
                let value = row[idx].trim();
                if is_missing(value) {
                    None
                } else {
                    Some(value)
                }
            })
            .collect())
    }

    /// Append the rows of `other`, aligning columns by name.
    ///
    /// Columns only present in `other` are added at the end; fields absent from
    /// either side are left empty.
    pub fn append(&mut self, other: MeasurementFrame) {
        if self.headers == other.headers {
            self.rows.extend(other.rows);
            return;
        }

        for header in &other.headers {
            if !self.has_column(header) {
                self.headers.push(header.clone());
                for row in &mut self.rows {
                    row.push(String::new());
                }
            }
        }

        let mapping: Vec<Option<usize>> = self
            .headers
            .iter()
            .map(|h| other.headers.iter().position(|o| o == h))
            .collect();

        self.rows.extend(other.rows.into_iter().map(|row| {
            mapping
                .iter()
                .map(|source| source.map(|i| row[i].clone()).unwrap_or_default())
                .collect()
        }));
    }

    /// New frame holding the given rows, in the given order
    pub fn select(&self, indices: &[usize]) -> MeasurementFrame {
        MeasurementFrame {
            headers: self.headers.clone(),
            rows: indices
                .iter()
                .filter_map(|&i| self.rows.get(i).cloned())
                .collect(),
        }
    }

    /// Typed view of the four required measurement columns
    pub fn measurements(&self) -> Result<Vec<Measurement>> {
        let latitudes = self.numeric_column(COL_LATITUDE)?;
        let longitudes = self.numeric_column(COL_LONGITUDE)?;
        let operators = self.text_column(COL_OPERATOR)?;
        let powers = self.numeric_column(COL_TOTAL_POWER)?;

        Ok(latitudes
            .into_iter()
            .zip(longitudes)
            .zip(operators)
            .zip(powers)
            .map(|(((latitude, longitude), operator), total_power)| Measurement {
                latitude,
                longitude,
                operator: operator.map(str::to_string),
                total_power,
            })
            .collect())
    }
}

fn is_missing(value: &str) -> bool {
    MISSING_MARKERS.contains(&value)
}

fn parse_numeric(raw: &str) -> std::result::Result<Option<f64>, std::num::ParseFloatError> {
    let value = raw.trim();
    if is_missing(value) {
        return Ok(None);
    }
    let parsed = value.parse::<f64>()?;
    Ok(if parsed.is_nan() { None } else { Some(parsed) })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    fn sample_frame() -> MeasurementFrame {
        MeasurementFrame::from_rows(
            strings(&["latitude", "longitude", "operator", "total_power"]),
            vec![
                strings(&["53.41", "-2.98", "EE", "-95.5"]),
                strings(&["53.80", "-1.55", "O2", ""]),
                strings(&["", "-2.10", "Three", "NaN"]),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_numeric_column_missing_values() {
        let frame = sample_frame();
        assert_eq!(
            frame.numeric_column("total_power").unwrap(),
            vec![Some(-95.5), None, None]
        );
        assert_eq!(
            frame.numeric_column("latitude").unwrap(),
            vec![Some(53.41), Some(53.80), None]
        );
    }

    #[test]
    fn test_numeric_column_rejects_garbage() {
        let frame = MeasurementFrame::from_rows(
            strings(&["total_power"]),
            vec![strings(&["-90"]), strings(&["loud"])],
        )
        .unwrap();
        let err = frame.numeric_column("total_power").unwrap_err();
        assert!(err.to_string().contains("row 1"));
    }

    #[test]
    fn test_unknown_column() {
        let frame = sample_frame();
        assert!(matches!(
            frame.numeric_column("rsrp"),
            Err(ProcessingError::MissingData(_))
        ));
    }

    #[test]
    fn test_push_row_checks_width() {
        let mut frame = MeasurementFrame::new(strings(&["a", "b"]));
        assert!(frame.push_row(strings(&["1"])).is_err());
        assert!(frame.push_row(strings(&["1", "2"])).is_ok());
        assert_eq!(frame.len(), 1);
    }

    #[test]
    fn test_append_aligns_columns_by_name() {
        let mut first = MeasurementFrame::from_rows(
            strings(&["latitude", "operator"]),
            vec![strings(&["53.4", "EE"])],
        )
        .unwrap();
        let second = MeasurementFrame::from_rows(
            strings(&["operator", "cell_id", "latitude"]),
            vec![strings(&["O2", "77", "53.9"])],
        )
        .unwrap();

        first.append(second);

        assert_eq!(first.headers(), strings(&["latitude", "operator", "cell_id"]));
        assert_eq!(first.row(0).unwrap(), strings(&["53.4", "EE", ""]));
        assert_eq!(first.row(1).unwrap(), strings(&["53.9", "O2", "77"]));
    }

    #[test]
    fn test_select_and_measurements() {
        let frame = sample_frame();
        let subset = frame.select(&[2, 0]);
        assert_eq!(subset.len(), 2);

        let measurements = subset.measurements().unwrap();
        assert_eq!(measurements[0].operator.as_deref(), Some("Three"));
        assert_eq!(measurements[0].latitude, None);
        assert_eq!(measurements[1].total_power, Some(-95.5));
    }
}
