use std::fmt;

use serde::Serialize;

pub const METERS_PER_MILE: f64 = 1609.344;
pub const METERS_PER_FOOT: f64 = 0.3048;
pub const METERS_PER_KILOMETER: f64 = 1000.0;

/// Display unit system. One system applies to every file in a run.
#[derive(Clone, Copy, Debug, Default, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum UnitSystem {
    #[default]
    Imperial,
    Metric,
}

impl UnitSystem {
    /// Metres per displayed distance unit.
    pub fn distance_divisor(self) -> f64 {
        match self {
            UnitSystem::Imperial => METERS_PER_MILE,
            UnitSystem::Metric => METERS_PER_KILOMETER,
        }
    }

    /// Metres per displayed elevation unit.
    pub fn length_divisor(self) -> f64 {
        match self {
            UnitSystem::Imperial => METERS_PER_FOOT,
            UnitSystem::Metric => 1.0,
        }
    }

    pub fn distance_unit(self) -> &'static str {
        match self {
            UnitSystem::Imperial => "mi",
            UnitSystem::Metric => "km",
        }
    }

    pub fn length_unit(self) -> &'static str {
        match self {
            UnitSystem::Imperial => "ft",
            UnitSystem::Metric => "m",
        }
    }

    pub fn convert_distance(self, meters: f64) -> f64 {
        meters / self.distance_divisor()
    }

    pub fn convert_length(self, meters: f64) -> f64 {
        meters / self.length_divisor()
    }
}

impl fmt::Display for UnitSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnitSystem::Imperial => write!(f, "imperial"),
            UnitSystem::Metric => write!(f, "metric"),
        }
    }
}
