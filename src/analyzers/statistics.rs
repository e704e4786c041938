use crate::error::{ProcessingError, Result};

/// Non-missing values in ascending order
pub fn sorted_values(values: &[Option<f64>]) -> Vec<f64> {
    let mut sorted: Vec<f64> = values.iter().flatten().copied().collect();
    sorted.sort_by(f64::total_cmp);
    sorted
}

/// Quantile `q` in [0, 1] of already-sorted data, linearly interpolating
/// between the two closest order statistics.
pub fn quantile_sorted(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() || !(0.0..=1.0).contains(&q) {
        return None;
    }

    let position = q * (sorted.len() - 1) as f64;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    let fraction = position - lower as f64;

    Some(sorted[lower] + (sorted[upper] - sorted[lower]) * fraction)
}

pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Unbiased sample variance (n - 1 denominator)
pub fn sample_variance(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let mu = mean(values)?;
    let sum_sq: f64 = values.iter().map(|v| (v - mu).powi(2)).sum();
    Some(sum_sq / (values.len() - 1) as f64)
}

/// `count` evenly spaced points from `start` to `end` inclusive
pub fn linspace(start: f64, end: f64, count: usize) -> Vec<f64> {
    match count {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (count - 1) as f64;
            (0..count).map(|i| start + step * i as f64).collect()
        }
    }
}

/// One-dimensional Gaussian kernel density estimate with Scott's rule bandwidth
#[derive(Debug, Clone)]
pub struct GaussianKde {
    samples: Vec<f64>,
    bandwidth: f64,
}

impl GaussianKde {
    pub fn new(samples: Vec<f64>) -> Result<Self> {
        let variance = sample_variance(&samples).ok_or_else(|| {
            ProcessingError::MissingData("at least two samples for density estimate".to_string())
        })?;

        if variance <= 0.0 || !variance.is_finite() {
            return Err(ProcessingError::InvalidFormat(
                "Density estimate needs samples with non-zero variance".to_string(),
            ));
        }

        let scott_factor = (samples.len() as f64).powf(-0.2);
        let bandwidth = variance.sqrt() * scott_factor;

        Ok(Self { samples, bandwidth })
    }

    pub fn bandwidth(&self) -> f64 {
        self.bandwidth
    }

    pub fn evaluate(&self, x: f64) -> f64 {
        let norm = 1.0 / ((2.0 * std::f64::consts::PI).sqrt() * self.bandwidth);
        let total: f64 = self
            .samples
            .iter()
            .map(|s| {
                let z = (x - s) / self.bandwidth;
                (-0.5 * z * z).exp()
            })
            .sum();
        norm * total / self.samples.len() as f64
    }

    /// Density at `count` points spanning the sample range
    pub fn curve(&self, count: usize) -> Vec<(f64, f64)> {
        let min = self.samples.iter().copied().fold(f64::INFINITY, f64::min);
        let max = self.samples.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        linspace(min, max, count)
            .into_iter()
            .map(|x| (x, self.evaluate(x)))
            .collect()
    }
}
