use crate::analyzers::statistics::{quantile_sorted, sorted_values};
use crate::error::{ProcessingError, Result};
use crate::models::PowerClass;
use crate::processors::smoother::SmoothedFrame;
use crate::utils::constants::{HIGH_QUANTILE, LOW_QUANTILE};
use serde::Serialize;

/// Global interquartile thresholds of a feature
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PowerThresholds {
    pub low: f64,
    pub high: f64,
}

impl PowerThresholds {
    pub fn new(low: f64, high: f64) -> Self {
        Self { low, high }
    }

    /// 25th and 75th percentiles of the non-missing values
    pub fn from_values(values: &[Option<f64>]) -> Result<Self> {
        let sorted = sorted_values(values);
        let low = quantile_sorted(&sorted, LOW_QUANTILE);
        let high = quantile_sorted(&sorted, HIGH_QUANTILE);

        match (low, high) {
            (Some(low), Some(high)) => Ok(Self { low, high }),
            _ => Err(ProcessingError::MissingData(
                "feature values for power thresholds".to_string(),
            )),
        }
    }

    /// Rows with an undefined bin mean count as medium
    pub fn classify(&self, mean: Option<f64>) -> PowerClass {
        match mean {
            Some(m) if m < self.low => PowerClass::Low,
            Some(m) if m > self.high => PowerClass::High,
            _ => PowerClass::Medium,
        }
    }
}

/// Row indices of a smoothed frame split by power class
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ClassPartition {
    pub low: Vec<usize>,
    pub medium: Vec<usize>,
    pub high: Vec<usize>,
}

impl ClassPartition {
    pub fn build(smoothed: &SmoothedFrame, thresholds: &PowerThresholds) -> Self {
        let mut partition = Self::default();
        for (row, mean) in smoothed.mean.iter().enumerate() {
            match thresholds.classify(*mean) {
                PowerClass::Low => partition.low.push(row),
                PowerClass::Medium => partition.medium.push(row),
                PowerClass::High => partition.high.push(row),
            }
        }
        partition
    }

    pub fn rows(&self, class: PowerClass) -> &[usize] {
        match class {
            PowerClass::Low => &self.low,
            PowerClass::Medium => &self.medium,
            PowerClass::High => &self.high,
        }
    }

    pub fn total(&self) -> usize {
        self.low.len() + self.medium.len() + self.high.len()
    }
}
