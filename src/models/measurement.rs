use validator::Validate;

use crate::models::Operator;

/// One signal reading, restricted to the columns the analysis depends on
#[derive(Debug, Clone, PartialEq, Validate)]
pub struct Measurement {
    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: Option<f64>,

    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: Option<f64>,

    pub operator: Option<String>,

    pub total_power: Option<f64>,
}

impl Measurement {
    pub fn has_location(&self) -> bool {
        self.latitude.is_some() && self.longitude.is_some()
    }

    /// The network operator, if the label is one of the known networks
    pub fn known_operator(&self) -> Option<Operator> {
        self.operator.as_deref().and_then(|o| o.parse().ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_measurement_validation() {
        let measurement = Measurement {
            latitude: Some(53.41),
            longitude: Some(-2.98),
            operator: Some("EE".to_string()),
            total_power: Some(-92.0),
        };

        assert!(measurement.validate().is_ok());
        assert!(measurement.has_location());
        assert_eq!(measurement.known_operator(), Some(Operator::EE));
    }

    #[test]
    fn test_missing_fields_are_valid() {
        let measurement = Measurement {
            latitude: None,
            longitude: Some(-2.98),
            operator: Some("Tesco Mobile".to_string()),
            total_power: None,
        };

        assert!(measurement.validate().is_ok());
        assert!(!measurement.has_location());
        assert_eq!(measurement.known_operator(), None);
    }

    #[test]
    fn test_invalid_coordinates() {
        let measurement = Measurement {
            latitude: Some(153.4), // Invalid latitude
            longitude: Some(-2.98),
            operator: None,
            total_power: None,
        };

        assert!(measurement.validate().is_err());
    }
}
