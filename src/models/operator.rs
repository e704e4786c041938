use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ProcessingError;

/// Named display colour (CSS names, as used in the figures)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DisplayColor {
    pub name: &'static str,
    pub rgb: (u8, u8, u8),
}

impl DisplayColor {
    pub const DODGER_BLUE: DisplayColor = DisplayColor {
        name: "dodgerblue",
        rgb: (30, 144, 255),
    };
    pub const CRIMSON: DisplayColor = DisplayColor {
        name: "crimson",
        rgb: (220, 20, 60),
    };
    pub const GREEN: DisplayColor = DisplayColor {
        name: "green",
        rgb: (0, 128, 0),
    };
    pub const GOLD: DisplayColor = DisplayColor {
        name: "gold",
        rgb: (255, 215, 0),
    };
}

/// UK mobile network operators present in the measurement slices
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Operator {
    EE,
    O2,
    Three,
    Vodafone,
}

impl Operator {
    pub const ALL: [Operator; 4] = [
        Operator::EE,
        Operator::O2,
        Operator::Three,
        Operator::Vodafone,
    ];

    /// Label as it appears in the `operator` column
    pub fn label(&self) -> &'static str {
        match self {
            Operator::EE => "EE",
            Operator::O2 => "O2",
            Operator::Three => "Three",
            Operator::Vodafone => "Vodafone",
        }
    }

    pub fn color(&self) -> DisplayColor {
        match self {
            Operator::EE => DisplayColor::DODGER_BLUE,
            Operator::O2 => DisplayColor::CRIMSON,
            Operator::Three => DisplayColor::GREEN,
            Operator::Vodafone => DisplayColor::GOLD,
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Operator {
    type Err = ProcessingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Operator::ALL
            .into_iter()
            .find(|op| op.label() == s.trim())
            .ok_or_else(|| ProcessingError::InvalidFormat(format!("Unknown operator: '{}'", s)))
    }
}

/// Signal level of a spatial bin relative to the global interquartile range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PowerClass {
    Low,
    Medium,
    High,
}

impl PowerClass {
    /// Drawing order of the scatter layers
    pub const ALL: [PowerClass; 3] = [PowerClass::Low, PowerClass::Medium, PowerClass::High];

    pub fn color(&self) -> DisplayColor {
        match self {
            PowerClass::Low => DisplayColor::CRIMSON,
            PowerClass::Medium => DisplayColor::GOLD,
            PowerClass::High => DisplayColor::GREEN,
        }
    }
}

impl fmt::Display for PowerClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PowerClass::Low => "low",
            PowerClass::Medium => "medium",
            PowerClass::High => "high",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operator_round_trip_labels() {
        for op in Operator::ALL {
            assert_eq!(op.label().parse::<Operator>().unwrap(), op);
        }
        assert!("Tesco".parse::<Operator>().is_err());
        assert!("ee".parse::<Operator>().is_err());
    }

    #[test]
    fn test_operator_colors() {
        assert_eq!(Operator::EE.color().name, "dodgerblue");
        assert_eq!(Operator::O2.color().name, "crimson");
        assert_eq!(Operator::Three.color().name, "green");
        assert_eq!(Operator::Vodafone.color().name, "gold");
    }

    #[test]
    fn test_power_class_colors() {
        assert_eq!(PowerClass::Low.color(), DisplayColor::CRIMSON);
        assert_eq!(PowerClass::Medium.color(), DisplayColor::GOLD);
        assert_eq!(PowerClass::High.color(), DisplayColor::GREEN);
        assert_eq!(PowerClass::High.to_string(), "high");
    }
}
