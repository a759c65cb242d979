//! # Nominal Current
//!
//! Nominal current of a piece of equipment, either read directly from its
//! nameplate amperage or derived from its power rating:
//!
//! ```text
//! single / two-phase:   I = P / (V × pf)
//! delta / wye:          I = P / (V × √3 × pf)
//! ```
//!
//! ## Example
//!
//! ```rust
//! use wirecalc_core::calculations::current::{nominal_current, EquipmentRating};
//! use wirecalc_core::installation::Topology;
//! use wirecalc_core::units::{Volts, Watts};
//!
//! let rating = EquipmentRating::Power { power: Watts(45_000.0), power_factor: 1.0 };
//! let i = nominal_current(&rating, Topology::Wye, Volts(220.0)).unwrap();
//! assert!((i.0 - 118.09).abs() < 0.01);
//! ```

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};
use crate::installation::Topology;
use crate::nom_factors::EquipmentCategory;
use crate::tables::LookupTables;
use crate::units::{Amperes, Volts, Watts};

/// Electrical rating of a piece of equipment.
///
/// ## JSON Example
///
/// ```json
/// { "mode": "amperage", "amperes": 100.0 }
/// { "mode": "power", "power": 45000.0, "power_factor": 0.9 }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "kebab-case")]
pub enum EquipmentRating {
    /// Nameplate current
    Amperage { amperes: Amperes },
    /// Real power (W) and power factor
    Power { power: Watts, power_factor: f64 },
}

impl EquipmentRating {
    /// Power factor carried by the rating, if any
    pub fn power_factor(&self) -> Option<f64> {
        match self {
            EquipmentRating::Amperage { .. } => None,
            EquipmentRating::Power { power_factor, .. } => Some(*power_factor),
        }
    }
}

/// Where the equipment rating comes from.
///
/// ## JSON Example
///
/// ```json
/// { "source": "catalog", "key": "AHF-100" }
/// { "source": "manual", "mode": "amperage", "amperes": 50.0 }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "kebab-case")]
pub enum EquipmentSource {
    /// Catalogued equipment, resolved through [`LookupTables::equipment`]
    Catalog { key: String },
    /// Rating entered by hand
    Manual(EquipmentRating),
}

/// Equipment rating resolved from its source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedEquipment {
    /// Catalog description, or "Manual entry"
    pub description: String,
    pub category: EquipmentCategory,
    pub rating: EquipmentRating,
}

impl EquipmentSource {
    /// Resolve the rating and category. Manual entries use `manual_category`.
    pub fn resolve(
        &self,
        tables: &dyn LookupTables,
        manual_category: EquipmentCategory,
    ) -> CalcResult<ResolvedEquipment> {
        match self {
            EquipmentSource::Catalog { key } => {
                let record = tables
                    .equipment(key)
                    .ok_or_else(|| CalcError::lookup_miss("equipment catalog", key.clone()))?;
                Ok(ResolvedEquipment {
                    description: record.description.clone(),
                    category: record.category,
                    rating: record.rating.clone(),
                })
            }
            EquipmentSource::Manual(rating) => Ok(ResolvedEquipment {
                description: "Manual entry".to_string(),
                category: manual_category,
                rating: rating.clone(),
            }),
        }
    }
}

/// Nominal current drawn by the equipment on the given system.
///
/// `voltage` must be given in the topology's
/// [`supply_reference`](Topology::supply_reference): phase-to-neutral for
/// single-phase, phase-to-phase otherwise. The formula is chosen by topology.
pub fn nominal_current(
    rating: &EquipmentRating,
    topology: Topology,
    voltage: Volts,
) -> CalcResult<Amperes> {
    match rating {
        EquipmentRating::Amperage { amperes } => Amperes::positive(amperes.0),
        EquipmentRating::Power { power, power_factor } => {
            if !power.0.is_finite() || power.0 <= 0.0 {
                return Err(CalcError::InvalidPower { watts: power.0 });
            }
            if !(*power_factor > 0.0 && *power_factor <= 1.0) {
                return Err(CalcError::InvalidPowerFactor {
                    power_factor: *power_factor,
                });
            }
            if voltage.0 <= 0.0 {
                return Err(CalcError::InvalidVoltage {
                    volts: voltage.0,
                    reason: "voltage must be positive".to_string(),
                });
            }

            let phase_multiplier = if topology.is_three_phase() { 3f64.sqrt() } else { 1.0 };
            Ok(Amperes(power.0 / (voltage.0 * phase_multiplier * power_factor)))
        }
    }
}
