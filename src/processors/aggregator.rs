use crate::error::{ProcessingError, Result};
use crate::models::{MeasurementFrame, MonthLabel};
use std::collections::HashMap;

/// Fuses monthly slices into one frame
pub struct MonthlyAggregator;

impl MonthlyAggregator {
    pub fn new() -> Self {
        Self
    }

    /// Concatenate the listed months in order, starting from the first.
    ///
    /// Rows keep their within-month order and are re-indexed `0..n`; months in
    /// the map but not in `months` are ignored.
    pub fn aggregate(
        &self,
        month_map: &HashMap<MonthLabel, MeasurementFrame>,
        months: &[MonthLabel],
    ) -> Result<MeasurementFrame> {
        let (first, rest) = months
            .split_first()
            .ok_or_else(|| ProcessingError::Config("No months to aggregate".to_string()))?;

        let mut combined = Self::lookup(month_map, *first)?.clone();

        for &month in rest {
            let frame = Self::lookup(month_map, month)?;
            tracing::debug!(%month, rows = frame.len(), "Appending monthly slice");
            combined.append(frame.clone());
        }

        tracing::info!(
            months = months.len(),
            rows = combined.len(),
            "Aggregated monthly slices"
        );

        Ok(combined)
    }

    fn lookup(
        month_map: &HashMap<MonthLabel, MeasurementFrame>,
        month: MonthLabel,
    ) -> Result<&MeasurementFrame> {
        month_map
            .get(&month)
            .ok_or_else(|| ProcessingError::MissingData(format!("slice for month {}", month)))
    }
}

impl Default for MonthlyAggregator {
    fn default() -> Self {
        Self::new()
    }
}
