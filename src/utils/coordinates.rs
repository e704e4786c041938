use serde::Serialize;

/// Closed range of observed values along one axis
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Extent {
    pub min: f64,
    pub max: f64,
}

impl Extent {
    /// Extent of the non-missing values, `None` if there are none
    pub fn of(values: &[Option<f64>]) -> Option<Self> {
        values.iter().flatten().fold(None, |acc, &v| match acc {
            None => Some(Extent { min: v, max: v }),
            Some(e) => Some(Extent {
                min: e.min.min(v),
                max: e.max.max(v),
            }),
        })
    }

    pub fn span(&self) -> f64 {
        self.max - self.min
    }

    pub fn midpoint(&self) -> f64 {
        (self.min + self.max) / 2.0
    }

    /// Average width of `num_bins` bins laid over this extent
    pub fn bin_width(&self, num_bins: usize) -> f64 {
        if num_bins == 0 {
            return 0.0;
        }
        self.span() / num_bins as f64
    }

    /// Widen by `fraction` of the span on each side; degenerate extents get a unit margin
    pub fn padded(&self, fraction: f64) -> Self {
        let margin = if self.span() > 0.0 {
            self.span() * fraction
        } else {
            0.5
        };
        Extent {
            min: self.min - margin,
            max: self.max + margin,
        }
    }
}

/// Calculate the distance between two points using the Haversine formula
pub fn haversine_distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    const EARTH_RADIUS_KM: f64 = 6371.0;

    let lat1_rad = lat1.to_radians();
    let lat2_rad = lat2.to_radians();
    let delta_lat = (lat2 - lat1).to_radians();
    let delta_lon = (lon2 - lon1).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().asin();

    EARTH_RADIUS_KM * c
}
