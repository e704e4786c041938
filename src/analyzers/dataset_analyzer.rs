use crate::analyzers::statistics::{mean, quantile_sorted, sorted_values};
use crate::error::{ProcessingError, Result};
use crate::models::{MeasurementFrame, Operator};
use crate::processors::PowerThresholds;
use crate::utils::constants::{COL_LATITUDE, COL_LONGITUDE, COL_OPERATOR};
use crate::utils::coordinates::{haversine_distance, Extent};
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Serialize)]
pub struct DatasetStatistics {
    pub total_records: usize,
    pub feature: String,
    pub num_bins: usize,
    pub geographic_bounds: GeographicBounds,
    pub bin_widths: BinWidths,
    pub feature_stats: FeatureStats,
    pub operators: BTreeMap<Operator, OperatorStats>,
}

#[derive(Debug, Serialize)]
pub struct GeographicBounds {
    pub latitude: Extent,
    pub longitude: Extent,
}

/// Average spatial bin widths, in degrees and along the ground at mid-extent
#[derive(Debug, Serialize)]
pub struct BinWidths {
    pub lat_degrees: f64,
    pub long_degrees: f64,
    pub lat_km: f64,
    pub long_km: f64,
}

#[derive(Debug, Serialize)]
pub struct FeatureStats {
    pub valid_values: usize,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub thresholds: PowerThresholds,
}

#[derive(Debug, Default, Serialize)]
pub struct OperatorStats {
    pub records: usize,
    pub valid_values: usize,
    pub mean: Option<f64>,
}

pub struct DatasetAnalyzer {
    feature: String,
    num_bins: usize,
}

impl DatasetAnalyzer {
    pub fn new(feature: &str, num_bins: usize) -> Self {
        Self {
            feature: feature.to_string(),
            num_bins,
        }
    }

    pub fn analyze(&self, frame: &MeasurementFrame) -> Result<DatasetStatistics> {
        if frame.is_empty() {
            return Err(ProcessingError::MissingData(
                "records to analyze".to_string(),
            ));
        }

        let latitudes = frame.numeric_column(COL_LATITUDE)?;
        let longitudes = frame.numeric_column(COL_LONGITUDE)?;
        let values = frame.numeric_column(&self.feature)?;
        let operators = frame.text_column(COL_OPERATOR)?;

        let no_coordinates = || ProcessingError::MissingData("coordinates".to_string());
        let lat_extent = Extent::of(&latitudes).ok_or_else(no_coordinates)?;
        let long_extent = Extent::of(&longitudes).ok_or_else(no_coordinates)?;

        let lat_degrees = lat_extent.bin_width(self.num_bins);
        let long_degrees = long_extent.bin_width(self.num_bins);
        let mid_lat = lat_extent.midpoint();
        let mid_long = long_extent.midpoint();
        let bin_widths = BinWidths {
            lat_degrees,
            long_degrees,
            lat_km: haversine_distance(mid_lat, mid_long, mid_lat + lat_degrees, mid_long),
            long_km: haversine_distance(mid_lat, mid_long, mid_lat, mid_long + long_degrees),
        };

        let sorted = sorted_values(&values);
        let feature_stats = FeatureStats {
            valid_values: sorted.len(),
            min: quantile_sorted(&sorted, 0.0).unwrap_or(f64::NAN),
            max: quantile_sorted(&sorted, 1.0).unwrap_or(f64::NAN),
            mean: mean(&sorted).unwrap_or(f64::NAN),
            thresholds: PowerThresholds::from_values(&values)?,
        };

        let mut per_operator: BTreeMap<Operator, Vec<Option<f64>>> = BTreeMap::new();
        for (label, value) in operators.iter().zip(&values) {
            if let Some(op) = label.and_then(|l| l.parse::<Operator>().ok()) {
                per_operator.entry(op).or_default().push(*value);
            }
        }

        let operators = per_operator
            .into_iter()
            .map(|(op, values)| {
                let valid: Vec<f64> = values.iter().flatten().copied().collect();
                let stats = OperatorStats {
                    records: values.len(),
                    valid_values: valid.len(),
                    mean: mean(&valid),
                };
                (op, stats)
            })
            .collect();

        Ok(DatasetStatistics {
            total_records: frame.len(),
            feature: self.feature.clone(),
            num_bins: self.num_bins,
            geographic_bounds: GeographicBounds {
                latitude: lat_extent,
                longitude: long_extent,
            },
            bin_widths,
            feature_stats,
            operators,
        })
    }
}

impl DatasetStatistics {
    /// Bin width lines as printed before plotting
    pub fn bin_width_summary(&self) -> String {
        format!(
            "LAT bin width: {:.2} degrees\nLONG bin width: {:.2} degrees",
            self.bin_widths.lat_degrees, self.bin_widths.long_degrees
        )
    }

    pub fn summary(&self) -> String {
        let bounds = &self.geographic_bounds;
        format!(
            "Records: {} total\n\
            Coverage: {:.3}..{:.3} lat, {:.3}..{:.3} long\n\
            {}\n\
            Bin size at centre: {:.2} km x {:.2} km ({} bins per axis)",
            self.total_records,
            bounds.latitude.min,
            bounds.latitude.max,
            bounds.longitude.min,
            bounds.longitude.max,
            self.bin_width_summary(),
            self.bin_widths.lat_km,
            self.bin_widths.long_km,
            self.num_bins
        )
    }

    pub fn detailed_summary(&self) -> String {
        let stats = &self.feature_stats;
        let mut text = format!(
            "{}\n\n\
            {} ({} valid values):\n\
            - Range: {:.2} to {:.2}\n\
            - Mean: {:.2}\n\
            - Low threshold (25th percentile): {:.2}\n\
            - High threshold (75th percentile): {:.2}\n\n\
            Operators:",
            self.summary(),
            self.feature,
            stats.valid_values,
            stats.min,
            stats.max,
            stats.mean,
            stats.thresholds.low,
            stats.thresholds.high
        );

        for (op, op_stats) in &self.operators {
            let mean = op_stats
                .mean
                .map(|m| format!("{:.2}", m))
                .unwrap_or_else(|| "n/a".to_string());
            text.push_str(&format!(
                "\n- {:<10} {} records, mean {}",
                op.label(),
                op_stats.records,
                mean
            ));
        }

        text
    }
}
