//! Fiscal reporting periods.
//!
//! A [`Period`] is a (year, quarter) pair. Full-year periods are labelled by the
//! bare year (`"2023"`), quarterly periods by year and quarter (`"2023Q2"`).
//! Periods order chronologically by year and then quarter rank, never by label.

use derive_more::Display;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::error::MetricsError;

/// Quarter indicator of an observation.
///
/// Variants are declared in chronological rank so the derived ordering
/// places the full year after the fourth quarter.
#[derive(
    Debug, Display, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum Quarter {
    /// First quarter
    Q1,
    /// Second quarter
    Q2,
    /// Third quarter
    Q3,
    /// Fourth quarter
    Q4,
    /// Full fiscal year
    #[display("FY")]
    #[serde(rename = "FY")]
    FullYear,
}

impl Quarter {
    /// The four fiscal quarters in order.
    pub const QUARTERS: [Self; 4] = [Self::Q1, Self::Q2, Self::Q3, Self::Q4];

    /// Quarter number (1-4), `None` for the full year.
    pub const fn number(&self) -> Option<u32> {
        match self {
            Self::Q1 => Some(1),
            Self::Q2 => Some(2),
            Self::Q3 => Some(3),
            Self::Q4 => Some(4),
            Self::FullYear => None,
        }
    }

    /// Chronological rank within a year.
    pub const fn rank(&self) -> u8 {
        match self {
            Self::Q1 => 1,
            Self::Q2 => 2,
            Self::Q3 => 3,
            Self::Q4 => 4,
            Self::FullYear => 5,
        }
    }

    /// Build a quarter from its number.
    pub const fn from_number(n: u32) -> Option<Self> {
        match n {
            1 => Some(Self::Q1),
            2 => Some(Self::Q2),
            3 => Some(Self::Q3),
            4 => Some(Self::Q4),
            _ => None,
        }
    }

    /// Partition this quarter belongs to.
    pub const fn partition(&self) -> Partition {
        match self {
            Self::FullYear => Partition::FullYear,
            _ => Partition::Quarterly,
        }
    }

    /// Whether this is the full-year sentinel.
    pub const fn is_full_year(&self) -> bool {
        matches!(self, Self::FullYear)
    }
}

impl FromStr for Quarter {
    type Err = MetricsError;

    /// Accepts `FY`, `1`..`4` and `Q1`..`Q4`, case-insensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("FY") {
            return Ok(Self::FullYear);
        }

        let digits = trimmed
            .strip_prefix('Q')
            .or_else(|| trimmed.strip_prefix('q'))
            .unwrap_or(trimmed);

        digits
            .parse::<u32>()
            .ok()
            .and_then(Self::from_number)
            .ok_or_else(|| MetricsError::InvalidQuarter(s.to_string()))
    }
}

/// Dataset partition. Full-year and quarterly data are never compared.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Partition {
    /// Observations whose quarter is `FY`
    #[display("Full Year")]
    FullYear,
    /// Observations for Q1..Q4
    #[display("Quarterly")]
    Quarterly,
}

impl Partition {
    /// Whether `quarter` belongs to this partition.
    pub fn contains(&self, quarter: Quarter) -> bool {
        *self == quarter.partition()
    }

    /// Quarters admissible in this partition.
    pub fn quarters(&self) -> Vec<Quarter> {
        match self {
            Self::FullYear => vec![Quarter::FullYear],
            Self::Quarterly => Quarter::QUARTERS.to_vec(),
        }
    }
}

/// A fiscal reporting interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Period {
    /// Fiscal year
    pub year: i32,
    /// Quarter indicator
    pub quarter: Quarter,
}

impl Period {
    /// Create a new period.
    pub const fn new(year: i32, quarter: Quarter) -> Self {
        Self { year, quarter }
    }

    /// Full-year period.
    pub const fn full_year(year: i32) -> Self {
        Self::new(year, Quarter::FullYear)
    }

    /// Canonical label: `"2023"` for a full year, `"2023Q2"` for a quarter.
    pub fn label(&self) -> String {
        self.to_string()
    }

    /// Partition this period belongs to.
    pub const fn partition(&self) -> Partition {
        self.quarter.partition()
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.quarter.number() {
            Some(n) => write!(f, "{}Q{}", self.year, n),
            None => write!(f, "{}", self.year),
        }
    }
}

impl FromStr for Period {
    type Err = MetricsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || MetricsError::InvalidPeriod(s.to_string());
        let trimmed = s.trim();

        let (year, quarter) = match trimmed.find(['Q', 'q']) {
            Some(idx) => {
                let quarter = trimmed[idx..].parse::<Quarter>().map_err(|_| invalid())?;
                (&trimmed[..idx], quarter)
            }
            None => match trimmed.strip_suffix("FY") {
                Some(year) => (year, Quarter::FullYear),
                None => (trimmed, Quarter::FullYear),
            },
        };

        let year = year.parse::<i32>().map_err(|_| invalid())?;
        Ok(Self::new(year, quarter))
    }
}

impl Serialize for Period {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Period {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let label = String::deserialize(deserializer)?;
        label.parse().map_err(serde::de::Error::custom)
    }
}
