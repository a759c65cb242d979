//! # NOM Factors and Constants
//!
//! Fixed factors and constants from NOM-001-SEDE-2012 used by the engine.
//! Table-driven factors (ambient temperature correction, grouping) live in
//! [`crate::tables`]; the values here are code constants that do not vary
//! by installation.
//!
//! ## Overview
//!
//! The design current of a circuit is the nominal current corrected by:
//!
//! ```text
//! I_adj = I_nom × F_u / (F_t × F_a)
//! ```
//!
//! ## Factor Summary
//!
//! | Factor | Description              | Source               |
//! |--------|--------------------------|----------------------|
//! | F_u    | Usage (continuous load)  | Equipment category   |
//! | F_t    | Ambient temperature      | Table 310-15(b)(2)(a)|
//! | F_a    | Grouping                 | Table 310-15(b)(3)(a)|
//! | F_r    | Conduit fill             | Chapter 10, Table 1  |

use serde::{Deserialize, Serialize};

// ============================================================================
// NOM Code Section References
// ============================================================================

/// NOM-001-SEDE-2012 references cited in reports and the equation registry.
pub mod nom_ref {
    /// Ampacity, not more than three conductors in raceway
    pub const AMPACITY_RACEWAY: &str = "NOM 310-15(b)(16)";
    /// Ampacity, single conductors in free air
    pub const AMPACITY_FREE_AIR: &str = "NOM 310-15(b)(17)";
    /// Ampacity, triplexed conductors in free air
    pub const AMPACITY_TRIPLEXED: &str = "NOM 310-15(b)(20)";
    /// Ambient temperature correction factors
    pub const TEMPERATURE_FACTOR: &str = "NOM 310-15(b)(2)(a)";
    /// Adjustment for more than three current-carrying conductors
    pub const GROUPING_FACTOR: &str = "NOM 310-15(b)(3)(a)";
    /// Continuous-load sizing of branch circuits and feeders
    pub const USAGE_FACTOR: &str = "NOM 215-2(a)(1)";
    /// Temperature limitations of terminations
    pub const TERMINATION_TEMPERATURE: &str = "NOM 110-14(c)";
    /// Minimum size of equipment grounding conductors
    pub const GROUND_CONDUCTOR: &str = "NOM 250-122";
    /// Conduit fill percentages
    pub const CONDUIT_FILL: &str = "NOM Chapter 10, Table 1";
    /// Conduit dimensions
    pub const CONDUIT_DIMENSIONS: &str = "NOM Chapter 10, Table 4";
    /// Cable tray fill for single conductors
    pub const TRAY_FILL: &str = "NOM 392-22(b)";
    /// AC resistance and reactance of conductors
    pub const IMPEDANCE: &str = "NOM Chapter 10, Table 9";
    /// Voltage drop recommendation for feeders and branch circuits
    pub const VOLTAGE_DROP: &str = "NOM 215-2(a)(1) Nota 2";
}

// ============================================================================
// Fixed Constants
// ============================================================================

/// Above this nominal current terminations are rated 75 °C
pub const TERMINATION_THRESHOLD_A: f64 = 100.0;

/// Center spacing multiple for triangular (triplexed) groups in a tray
pub const TRIANGULAR_SPACING: f64 = 2.15;

/// Default maximum voltage drop (%)
pub const DEFAULT_MAX_VOLTAGE_DROP_PERCENT: f64 = 3.0;

/// Conduit fill factor for one conductor
pub const FILL_ONE_CONDUCTOR: f64 = 0.53;
/// Conduit fill factor for two conductors
pub const FILL_TWO_CONDUCTORS: f64 = 0.31;
/// Conduit fill factor for more than two conductors
pub const FILL_OVER_TWO_CONDUCTORS: f64 = 0.40;

/// Usable fraction of a conduit's interior area for the number of
/// conductors it holds (NOM Chapter 10, Table 1).
pub fn conduit_fill_factor(conductors_in_raceway: u32) -> f64 {
    match conductors_in_raceway {
        1 => FILL_ONE_CONDUCTOR,
        2 => FILL_TWO_CONDUCTORS,
        _ => FILL_OVER_TWO_CONDUCTORS,
    }
}

// ============================================================================
// Usage Factor
// ============================================================================

/// Equipment category for the usage (continuous load) factor F_u
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum EquipmentCategory {
    /// Active/passive harmonic filters: F_u = 1.35
    Filter,
    /// Dry or oil transformers: F_u = 1.25
    Transformer,
    /// Generic continuous load: F_u = 1.25
    #[default]
    Load,
}

impl EquipmentCategory {
    /// All categories for UI selection
    pub const ALL: [EquipmentCategory; 3] = [
        EquipmentCategory::Filter,
        EquipmentCategory::Transformer,
        EquipmentCategory::Load,
    ];

    /// Get the F_u factor value
    pub fn usage_factor(&self) -> f64 {
        match self {
            EquipmentCategory::Filter => 1.35,
            EquipmentCategory::Transformer | EquipmentCategory::Load => 1.25,
        }
    }

    /// Display name for UI
    pub fn display_name(&self) -> &'static str {
        match self {
            EquipmentCategory::Filter => "Filter (1.35)",
            EquipmentCategory::Transformer => "Transformer (1.25)",
            EquipmentCategory::Load => "Load (1.25)",
        }
    }
}

impl std::fmt::Display for EquipmentCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fill_factors() {
        assert_eq!(conduit_fill_factor(1), 0.53);
        assert_eq!(conduit_fill_factor(2), 0.31);
        assert_eq!(conduit_fill_factor(3), 0.40);
        assert_eq!(conduit_fill_factor(12), 0.40);
    }

    #[test]
    fn test_usage_factors() {
        assert_eq!(EquipmentCategory::Filter.usage_factor(), 1.35);
        assert_eq!(EquipmentCategory::Transformer.usage_factor(), 1.25);
        assert_eq!(EquipmentCategory::Load.usage_factor(), 1.25);
    }

    #[test]
    fn test_category_serialization() {
        let json = serde_json::to_string(&EquipmentCategory::Filter).unwrap();
        assert_eq!(json, "\"filter\"");
    }
}
