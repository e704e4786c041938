use chrono::Month;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ProcessingError;

/// Calendar month keying a monthly slice. Displays as the three-letter
/// abbreviation used in slice file names (`Jun`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MonthLabel(Month);

impl MonthLabel {
    pub fn new(month: Month) -> Self {
        Self(month)
    }

    pub fn month(&self) -> Month {
        self.0
    }

    pub fn abbreviation(&self) -> &'static str {
        &self.0.name()[..3]
    }
}

impl fmt::Display for MonthLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.abbreviation())
    }
}

impl FromStr for MonthLabel {
    type Err = ProcessingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<Month>()
            .map(MonthLabel)
            .map_err(|_| ProcessingError::InvalidFormat(format!("Invalid month label: '{}'", s)))
    }
}

impl TryFrom<String> for MonthLabel {
    type Error = ProcessingError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<MonthLabel> for String {
    fn from(label: MonthLabel) -> Self {
        label.to_string()
    }
}
