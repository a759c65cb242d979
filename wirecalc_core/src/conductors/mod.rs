//! # Conductor Catalog
//!
//! Conductor definitions for building wire under NOM-001-SEDE Article 310.
//!
//! ## Conductor Data
//!
//! - **Calibre**: AWG/kcmil designation, see [`calibres`]
//! - **Material**: copper or aluminum (aluminum only from 12 AWG up)
//! - **Insulation**: THW-LS, THHW-LS, THHN or XHHW-2
//! - **Temperature rating**: the ampacity column (60, 75 or 90 °C)
//!
//! ## Example
//!
//! ```rust
//! use wirecalc_core::conductors::{Calibre, Conductor, ConductorMaterial, Insulation};
//!
//! let c = Conductor::new(Calibre::Awg6, ConductorMaterial::Copper, Insulation::ThhwLs).unwrap();
//! assert_eq!(c.section_mm2, 13.3);
//! ```

pub mod calibres;

pub use calibres::Calibre;

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};
use crate::units::OhmsPerKm;

/// Conductor metal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ConductorMaterial {
    #[default]
    Copper,
    Aluminum,
}

impl ConductorMaterial {
    /// All materials for UI selection
    pub const ALL: [ConductorMaterial; 2] = [ConductorMaterial::Copper, ConductorMaterial::Aluminum];

    /// Display name for reports
    pub fn display_name(&self) -> &'static str {
        match self {
            ConductorMaterial::Copper => "Cu",
            ConductorMaterial::Aluminum => "Al",
        }
    }

    /// Smallest calibre catalogued for this material
    pub fn smallest_calibre(&self) -> Calibre {
        match self {
            ConductorMaterial::Copper => Calibre::Awg14,
            ConductorMaterial::Aluminum => Calibre::Awg12,
        }
    }
}

impl std::fmt::Display for ConductorMaterial {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Insulation type of building wire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Insulation {
    #[serde(rename = "THW-LS")]
    ThwLs,
    #[default]
    #[serde(rename = "THHW-LS")]
    ThhwLs,
    #[serde(rename = "THHN")]
    Thhn,
    #[serde(rename = "XHHW-2")]
    Xhhw2,
}

impl Insulation {
    /// Display name for reports
    pub fn display_name(&self) -> &'static str {
        match self {
            Insulation::ThwLs => "THW-LS",
            Insulation::ThhwLs => "THHW-LS",
            Insulation::Thhn => "THHN",
            Insulation::Xhhw2 => "XHHW-2",
        }
    }

    /// Maximum operating temperature of the insulation
    pub fn max_rating(&self) -> TemperatureRating {
        match self {
            Insulation::ThwLs => TemperatureRating::C75,
            Insulation::ThhwLs | Insulation::Thhn | Insulation::Xhhw2 => TemperatureRating::C90,
        }
    }
}

impl std::fmt::Display for Insulation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Conductor temperature rating (ampacity column)
///
/// Serializes as the plain number of degrees (60, 75, 90).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u16", into = "u16")]
pub enum TemperatureRating {
    C60,
    C75,
    C90,
}

impl TemperatureRating {
    /// All ratings, lowest first
    pub const ALL: [TemperatureRating; 3] = [
        TemperatureRating::C60,
        TemperatureRating::C75,
        TemperatureRating::C90,
    ];

    /// Rating in °C
    pub fn celsius(&self) -> u16 {
        match self {
            TemperatureRating::C60 => 60,
            TemperatureRating::C75 => 75,
            TemperatureRating::C90 => 90,
        }
    }

    /// Validated rating from degrees; only 60, 75 and 90 exist
    pub fn from_celsius(celsius: u16) -> CalcResult<Self> {
        match celsius {
            60 => Ok(TemperatureRating::C60),
            75 => Ok(TemperatureRating::C75),
            90 => Ok(TemperatureRating::C90),
            other => Err(CalcError::invalid_input(
                "temperature_rating",
                other.to_string(),
                "Temperature rating must be 60, 75 or 90 °C",
            )),
        }
    }
}

impl TryFrom<u16> for TemperatureRating {
    type Error = CalcError;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        TemperatureRating::from_celsius(value)
    }
}

impl From<TemperatureRating> for u16 {
    fn from(rating: TemperatureRating) -> Self {
        rating.celsius()
    }
}

impl std::fmt::Display for TemperatureRating {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} °C", self.celsius())
    }
}

/// A catalogued conductor: calibre, material, insulation and dimensions.
///
/// ## JSON Example
///
/// ```json
/// {
///   "calibre": "6 AWG",
///   "material": "Copper",
///   "insulation": "THHW-LS",
///   "section_mm2": 13.3,
///   "outer_diameter_mm": 6.452,
///   "insulated_area_mm2": 32.69
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conductor {
    pub calibre: Calibre,
    pub material: ConductorMaterial,
    pub insulation: Insulation,

    /// Bare metal cross-section (mm²)
    pub section_mm2: f64,

    /// Insulated outer diameter (mm)
    pub outer_diameter_mm: f64,

    /// Insulated total area (mm²)
    pub insulated_area_mm2: f64,

    /// AC resistance at 75 °C, when resolved from an impedance table
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resistance_per_km: Option<OhmsPerKm>,

    /// Reactance at 60 Hz, when resolved from an impedance table
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reactance_per_km: Option<OhmsPerKm>,
}

impl Conductor {
    /// Build a catalogued conductor with its standard dimensions.
    ///
    /// Fails if the calibre is not catalogued for the material
    /// (aluminum below 12 AWG).
    pub fn new(
        calibre: Calibre,
        material: ConductorMaterial,
        insulation: Insulation,
    ) -> CalcResult<Self> {
        if calibre < material.smallest_calibre() {
            return Err(CalcError::invalid_input(
                "calibre",
                calibre.display_name(),
                format!("{} conductors start at {}", material.display_name(), material.smallest_calibre()),
            ));
        }
        Ok(Conductor {
            calibre,
            material,
            insulation,
            section_mm2: calibre.section_mm2(),
            outer_diameter_mm: calibre.outer_diameter_mm(),
            insulated_area_mm2: calibre.insulated_area_mm2(),
            resistance_per_km: None,
            reactance_per_km: None,
        })
    }

    /// Attach per-km resistance and reactance
    pub fn with_impedance(mut self, resistance: OhmsPerKm, reactance: OhmsPerKm) -> Self {
        self.resistance_per_km = Some(resistance);
        self.reactance_per_km = Some(reactance);
        self
    }

    /// Short description, e.g. "6 AWG Cu THHW-LS"
    pub fn designation(&self) -> String {
        format!("{} {} {}", self.calibre, self.material, self.insulation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conductor_dimensions_from_calibre() {
        let c = Conductor::new(Calibre::Awg1_0, ConductorMaterial::Copper, Insulation::Thhn).unwrap();
        assert_eq!(c.section_mm2, 53.5);
        assert_eq!(c.outer_diameter_mm, 12.34);
        assert_eq!(c.designation(), "1/0 AWG Cu THHN");
    }

    #[test]
    fn test_aluminum_14_awg_not_catalogued() {
        let result = Conductor::new(Calibre::Awg14, ConductorMaterial::Aluminum, Insulation::ThhwLs);
        assert!(matches!(result, Err(CalcError::InvalidInput { .. })));
        assert!(Conductor::new(Calibre::Awg12, ConductorMaterial::Aluminum, Insulation::ThhwLs).is_ok());
    }

    #[test]
    fn test_rating_serializes_as_number() {
        let json = serde_json::to_string(&TemperatureRating::C75).unwrap();
        assert_eq!(json, "75");
        let back: TemperatureRating = serde_json::from_str("90").unwrap();
        assert_eq!(back, TemperatureRating::C90);
        assert!(serde_json::from_str::<TemperatureRating>("80").is_err());
    }

    #[test]
    fn test_insulation_rating() {
        assert_eq!(Insulation::ThwLs.max_rating(), TemperatureRating::C75);
        assert_eq!(Insulation::ThhwLs.max_rating(), TemperatureRating::C90);
    }
}
