use crate::error::Result;
use crate::processors::binner::BinnedFrame;
use std::collections::HashMap;

/// A binned frame with the per-cell mean of one feature joined onto each row
#[derive(Debug, Clone)]
pub struct SmoothedFrame {
    pub binned: BinnedFrame,
    pub feature: String,
    pub mean: Vec<Option<f64>>,
}

impl SmoothedFrame {
    pub fn len(&self) -> usize {
        self.mean.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mean.is_empty()
    }
}

#[derive(Debug, Default, Clone, Copy)]
struct Accumulator {
    sum: f64,
    count: usize,
}

/// Averages a feature within each spatial cell
pub struct FeatureSmoother {
    feature: String,
}

impl FeatureSmoother {
    pub fn new(feature: &str) -> Self {
        Self {
            feature: feature.to_string(),
        }
    }

    pub fn smooth(&self, binned: BinnedFrame) -> Result<SmoothedFrame> {
        let values = binned.frame.numeric_column(&self.feature)?;
        let cell_means = self.cell_means(&binned, &values);

        let mean = (0..binned.len())
            .map(|row| {
                binned
                    .cell(row)
                    .and_then(|cell| cell_means.get(&cell).copied().flatten())
            })
            .collect();

        tracing::debug!(
            feature = %self.feature,
            cells = cell_means.len(),
            rows = binned.len(),
            "Smoothed feature over spatial cells"
        );

        Ok(SmoothedFrame {
            binned,
            feature: self.feature.clone(),
            mean,
        })
    }

    /// Mean of the non-missing feature values per (lat_cut, long_cut); `None`
    /// for cells whose rows all lack the feature.
    fn cell_means(
        &self,
        binned: &BinnedFrame,
        values: &[Option<f64>],
    ) -> HashMap<(usize, usize), Option<f64>> {
        let mut groups: HashMap<(usize, usize), Accumulator> = HashMap::new();

        for (row, value) in values.iter().enumerate() {
            let Some(cell) = binned.cell(row) else {
                continue;
            };
            let acc = groups.entry(cell).or_default();
            if let Some(v) = value {
                acc.sum += v;
                acc.count += 1;
            }
        }

        groups
            .into_iter()
            .map(|(cell, acc)| {
                let mean = (acc.count > 0).then(|| acc.sum / acc.count as f64);
                (cell, mean)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MeasurementFrame;
    use crate::processors::binner::SpatialBinner;
    use pretty_assertions::assert_eq;

    fn binned_frame(rows: &[(f64, f64, &str)], num_bins: usize) -> BinnedFrame {
        let frame = MeasurementFrame::from_rows(
            vec![
                "latitude".to_string(),
                "longitude".to_string(),
                "total_power".to_string(),
            ],
            rows.iter()
                .map(|(lat, long, power)| vec![lat.to_string(), long.to_string(), power.to_string()])
                .collect(),
        )
        .unwrap();
        SpatialBinner::new(num_bins).bin(frame).unwrap()
    }

    #[test]
    fn test_single_bin_mean() {
        let binned = binned_frame(
            &[
                (53.4, -2.9, "10"),
                (53.5, -2.8, "20"),
                (53.6, -2.7, "30"),
                (53.7, -2.6, "40"),
            ],
            1,
        );

        let smoothed = FeatureSmoother::new("total_power").smooth(binned).unwrap();
        assert_eq!(smoothed.mean, vec![Some(25.0); 4]);
    }

    #[test]
    fn test_mean_per_cell() {
        // lat cuts: [0, 0, 1, 1]; long cuts: [0, 1, 0, 1] -> four cells
        let binned = binned_frame(
            &[
                (1.0, 2.0, "-90"),
                (2.0, 4.0, "-100"),
                (3.0, 1.0, "-80"),
                (4.0, 3.0, "-70"),
                (1.5, 1.5, "-94"),
            ],
            2,
        );

        let cells: Vec<Option<(usize, usize)>> = (0..binned.len()).map(|i| binned.cell(i)).collect();
        let values = binned.frame.numeric_column("total_power").unwrap();
        let smoothed = FeatureSmoother::new("total_power").smooth(binned).unwrap();

        for (row, cell) in cells.iter().enumerate() {
            let members: Vec<f64> = cells
                .iter()
                .zip(&values)
                .filter(|(c, _)| *c == cell)
                .filter_map(|(_, v)| *v)
                .collect();
            let expected = members.iter().sum::<f64>() / members.len() as f64;
            assert!((smoothed.mean[row].unwrap() - expected).abs() < 1e-12);
        }
    }

    #[test]
    fn test_missing_feature_values() {
        let binned = binned_frame(
            &[
                (1.0, 1.0, ""),
                (2.0, 2.0, ""),
                (3.0, 3.0, "-80"),
                (4.0, 4.0, "NaN"),
            ],
            2,
        );

        let smoothed = FeatureSmoother::new("total_power").smooth(binned).unwrap();
        // Cell (0, 0) has no valid values; cell (1, 1) averages only -80
        assert_eq!(smoothed.mean, vec![None, None, Some(-80.0), Some(-80.0)]);
    }

    #[test]
    fn test_unbinned_rows_have_no_mean() {
        let frame = MeasurementFrame::from_rows(
            vec![
                "latitude".to_string(),
                "longitude".to_string(),
                "total_power".to_string(),
            ],
            vec![
                vec!["53.4".to_string(), "-2.9".to_string(), "-90".to_string()],
                vec!["".to_string(), "-2.8".to_string(), "-60".to_string()],
                vec!["53.6".to_string(), "-2.7".to_string(), "-100".to_string()],
            ],
        )
        .unwrap();
        let binned = SpatialBinner::new(1).bin(frame).unwrap();

        let smoothed = FeatureSmoother::new("total_power").smooth(binned).unwrap();
        assert_eq!(smoothed.mean, vec![Some(-95.0), None, Some(-95.0)]);
    }

    #[test]
    fn test_reapplying_is_idempotent() {
        let rows = [
            (1.0, 2.0, "-90"),
            (2.0, 4.0, "-100"),
            (3.0, 1.0, "-80"),
            (4.0, 3.0, "-70"),
        ];
        let smoother = FeatureSmoother::new("total_power");

        let first = smoother.smooth(binned_frame(&rows, 2)).unwrap();
        let second = smoother.smooth(first.binned.clone()).unwrap();
        assert_eq!(first.mean, second.mean);
    }

    #[test]
    fn test_unknown_feature() {
        let binned = binned_frame(&[(1.0, 1.0, "1"), (2.0, 2.0, "2")], 1);
        assert!(FeatureSmoother::new("rsrq").smooth(binned).is_err());
    }
}
