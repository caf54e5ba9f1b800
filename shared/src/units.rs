//! Display unit handling
//!
//! Everything is stored and computed in kg and cm. The `units`
//! preference only changes what is shown and how user input is read,
//! so conversion happens at the edges and never inside the metrics.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Kilograms per pound
pub const KG_PER_LB: f64 = 0.453592;

/// Centimeters per inch
pub const CM_PER_INCH: f64 = 2.54;

/// Weight unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum WeightUnit {
    #[default]
    Kg,
    Lb,
}

impl WeightUnit {
    pub fn to_kg(&self, value: f64) -> f64 {
        match self {
            WeightUnit::Kg => value,
            WeightUnit::Lb => value * KG_PER_LB,
        }
    }

    pub fn from_kg(&self, kg: f64) -> f64 {
        match self {
            WeightUnit::Kg => kg,
            WeightUnit::Lb => kg / KG_PER_LB,
        }
    }

    pub fn abbreviation(&self) -> &'static str {
        match self {
            WeightUnit::Kg => "kg",
            WeightUnit::Lb => "lb",
        }
    }
}

impl fmt::Display for WeightUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.abbreviation())
    }
}

/// Height unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum HeightUnit {
    #[default]
    Cm,
    In,
}

impl HeightUnit {
    pub fn to_cm(&self, value: f64) -> f64 {
        match self {
            HeightUnit::Cm => value,
            HeightUnit::In => value * CM_PER_INCH,
        }
    }

    pub fn from_cm(&self, cm: f64) -> f64 {
        match self {
            HeightUnit::Cm => cm,
            HeightUnit::In => cm / CM_PER_INCH,
        }
    }

    pub fn abbreviation(&self) -> &'static str {
        match self {
            HeightUnit::Cm => "cm",
            HeightUnit::In => "in",
        }
    }
}

impl fmt::Display for HeightUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.abbreviation())
    }
}

/// The `units` preference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum UnitSystem {
    #[default]
    Metric,
    Imperial,
}

impl UnitSystem {
    pub fn weight_unit(&self) -> WeightUnit {
        match self {
            UnitSystem::Metric => WeightUnit::Kg,
            UnitSystem::Imperial => WeightUnit::Lb,
        }
    }

    pub fn height_unit(&self) -> HeightUnit {
        match self {
            UnitSystem::Metric => HeightUnit::Cm,
            UnitSystem::Imperial => HeightUnit::In,
        }
    }

    /// Stored kg to the display unit
    pub fn display_weight(&self, kg: f64) -> f64 {
        self.weight_unit().from_kg(kg)
    }

    /// User input in the display unit to kg
    pub fn input_weight(&self, value: f64) -> f64 {
        self.weight_unit().to_kg(value)
    }

    pub fn display_height(&self, cm: f64) -> f64 {
        self.height_unit().from_cm(cm)
    }

    pub fn input_height(&self, value: f64) -> f64 {
        self.height_unit().to_cm(value)
    }

    /// Weight with one decimal and its unit, e.g. `70.5 kg`
    pub fn format_weight(&self, kg: f64) -> String {
        format!("{:.1} {}", self.display_weight(kg), self.weight_unit())
    }

    pub fn format_height(&self, cm: f64) -> String {
        format!("{:.1} {}", self.display_height(cm), self.height_unit())
    }
}

impl fmt::Display for UnitSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnitSystem::Metric => f.write_str("metric"),
            UnitSystem::Imperial => f.write_str("imperial"),
        }
    }
}

impl std::str::FromStr for UnitSystem {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "metric" | "kg" | "si" => Ok(UnitSystem::Metric),
            "imperial" | "lb" | "lbs" | "us" => Ok(UnitSystem::Imperial),
            _ => Err(format!("Unknown unit system: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_known_conversions() {
        // 100 lb = 45.3592 kg
        assert!((UnitSystem::Imperial.input_weight(100.0) - 45.3592).abs() < 1e-9);
        // 1 kg = 2.20462 lb
        assert!((UnitSystem::Imperial.display_weight(1.0) - 2.20462).abs() < 0.001);
        // 180 cm = 70.866 in
        assert!((UnitSystem::Imperial.display_height(180.0) - 70.866).abs() < 0.01);
    }

    #[test]
    fn test_metric_is_identity() {
        assert_eq!(UnitSystem::Metric.display_weight(72.4), 72.4);
        assert_eq!(UnitSystem::Metric.input_height(168.0), 168.0);
    }

    #[test]
    fn test_formatting() {
        assert_eq!(UnitSystem::Metric.format_weight(70.46), "70.5 kg");
        assert_eq!(UnitSystem::Imperial.format_weight(45.3592), "100.0 lb");
        assert_eq!(UnitSystem::Imperial.format_height(177.8), "70.0 in");
    }

    #[test]
    fn test_parsing_and_serde() {
        assert_eq!("Imperial".parse::<UnitSystem>().unwrap(), UnitSystem::Imperial);
        assert_eq!("metric".parse::<UnitSystem>().unwrap(), UnitSystem::Metric);
        assert!("stone".parse::<UnitSystem>().is_err());
        assert_eq!(serde_json::to_string(&UnitSystem::Imperial).unwrap(), "\"imperial\"");
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Property: display then input returns the stored weight
        #[test]
        fn prop_weight_display_input_inverse(kg in 30.0f64..300.0) {
            let shown = UnitSystem::Imperial.display_weight(kg);
            prop_assert!((UnitSystem::Imperial.input_weight(shown) - kg).abs() < 1e-9);
        }
    }
}
