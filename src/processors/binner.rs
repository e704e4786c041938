use crate::analyzers::statistics::{quantile_sorted, sorted_values};
use crate::error::{ProcessingError, Result};
use crate::models::MeasurementFrame;
use crate::utils::constants::{COL_LATITUDE, COL_LONGITUDE};

/// A frame with every row assigned to a quantile cell along each axis.
///
/// `None` marks a row whose coordinate is missing on that axis; such rows stay
/// in the frame but belong to no spatial bin.
#[derive(Debug, Clone)]
pub struct BinnedFrame {
    pub frame: MeasurementFrame,
    pub lat_cut: Vec<Option<usize>>,
    pub long_cut: Vec<Option<usize>>,
    pub num_bins: usize,
}

impl BinnedFrame {
    pub fn len(&self) -> usize {
        self.frame.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frame.is_empty()
    }

    /// The (lat_cut, long_cut) cell of a row, if it has both
    pub fn cell(&self, row: usize) -> Option<(usize, usize)> {
        match (self.lat_cut.get(row)?, self.long_cut.get(row)?) {
            (Some(lat), Some(long)) => Some((*lat, *long)),
            _ => None,
        }
    }

    /// Subset of rows, keeping their bin assignments
    pub fn select(&self, indices: &[usize]) -> BinnedFrame {
        let indices: Vec<usize> = indices
            .iter()
            .copied()
            .filter(|&i| i < self.frame.len())
            .collect();

        BinnedFrame {
            frame: self.frame.select(&indices),
            lat_cut: indices.iter().map(|&i| self.lat_cut[i]).collect(),
            long_cut: indices.iter().map(|&i| self.long_cut[i]).collect(),
            num_bins: self.num_bins,
        }
    }
}

/// Equal-population binning of latitude and longitude
pub struct SpatialBinner {
    num_bins: usize,
}

impl SpatialBinner {
    pub fn new(num_bins: usize) -> Self {
        Self { num_bins }
    }

    pub fn num_bins(&self) -> usize {
        self.num_bins
    }

    pub fn bin(&self, frame: MeasurementFrame) -> Result<BinnedFrame> {
        let latitudes = frame.numeric_column(COL_LATITUDE)?;
        let longitudes = frame.numeric_column(COL_LONGITUDE)?;

        let lat_cut = self
            .quantile_cut(&latitudes)
            .map_err(|e| Self::axis_error(COL_LATITUDE, e))?;
        let long_cut = self
            .quantile_cut(&longitudes)
            .map_err(|e| Self::axis_error(COL_LONGITUDE, e))?;

        let unbinned = lat_cut
            .iter()
            .zip(&long_cut)
            .filter(|(lat, long)| lat.is_none() || long.is_none())
            .count();
        if unbinned > 0 {
            tracing::warn!(rows = unbinned, "Rows without coordinates left unbinned");
        }

        Ok(BinnedFrame {
            frame,
            lat_cut,
            long_cut,
            num_bins: self.num_bins,
        })
    }

    /// Bin edges at quantiles 0, 1/k, ..., 1 of the non-missing values
    pub fn quantile_edges(&self, values: &[Option<f64>]) -> Result<Vec<f64>> {
        if self.num_bins == 0 {
            return Err(ProcessingError::Config(
                "Number of bins must be at least 1".to_string(),
            ));
        }

        let sorted = sorted_values(values);
        if sorted.is_empty() {
            return Err(ProcessingError::Binning(
                "no values to compute quantile edges from".to_string(),
            ));
        }

        let edges: Vec<f64> = (0..=self.num_bins)
            .filter_map(|i| quantile_sorted(&sorted, i as f64 / self.num_bins as f64))
            .collect();

        if let Some(pair) = edges.windows(2).find(|pair| pair[0] == pair[1]) {
            return Err(ProcessingError::Binning(format!(
                "bin edges must be unique, {} repeats; use fewer bins",
                pair[0]
            )));
        }

        Ok(edges)
    }

    /// Assign each value the label of its right-closed quantile interval,
    /// the lowest edge included.
    pub fn quantile_cut(&self, values: &[Option<f64>]) -> Result<Vec<Option<usize>>> {
        let edges = self.quantile_edges(values)?;
        let last = self.num_bins - 1;

        Ok(values
            .iter()
            .map(|value| {
                value.map(|v| {
                    // number of interior edges strictly below v
                    let label = edges[1..edges.len() - 1].partition_point(|&e| e < v);
                    label.min(last)
                })
            })
            .collect())
    }

    fn axis_error(axis: &str, error: ProcessingError) -> ProcessingError {
        match error {
            ProcessingError::Binning(message) => {
                ProcessingError::Binning(format!("{}: {}", axis, message))
            }
            other => other,
        }
    }
}
