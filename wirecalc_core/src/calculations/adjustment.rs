//! # Current Adjustment
//!
//! Corrects the nominal current for continuous use, ambient temperature and
//! grouping of current-carrying conductors:
//!
//! ```text
//! I_adj = I_nom × F_u / (F_t × F_a)
//! ```
//!
//! - F_u: usage factor by equipment category (NOM 215-2(a)(1))
//! - F_t: ambient temperature factor for (ambient, rating) (Table 310-15(b)(2)(a))
//! - F_a: grouping factor by conductors per raceway (Table 310-15(b)(3)(a));
//!   1.0 for cable trays
//!
//! ## Example
//!
//! ```rust
//! use wirecalc_core::calculations::adjustment::{adjust_current, AdjustmentInput};
//! use wirecalc_core::conductors::TemperatureRating;
//! use wirecalc_core::installation::{RacewayMethod, Topology};
//! use wirecalc_core::nom_factors::EquipmentCategory;
//! use wirecalc_core::tables::nom_tables;
//! use wirecalc_core::units::Amperes;
//!
//! let input = AdjustmentInput {
//!     nominal: Amperes(100.0),
//!     state: "Aguascalientes".to_string(),
//!     raceway: RacewayMethod::SpacedTray,
//!     topology: Topology::Wye,
//!     category: EquipmentCategory::Filter,
//!     parallel_per_phase: 1,
//!     raceways: 1,
//!     rating: TemperatureRating::C75,
//! };
//! let result = adjust_current(nom_tables(), &input).unwrap();
//! assert!((result.adjusted.0 - 135.0).abs() < 1e-9);
//! ```

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::conductors::TemperatureRating;
use crate::errors::{CalcError, CalcResult};
use crate::installation::{RacewayMethod, Topology};
use crate::nom_factors::EquipmentCategory;
use crate::tables::LookupTables;
use crate::units::Amperes;

/// Inputs to the current adjustment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdjustmentInput {
    pub nominal: Amperes,
    /// Installation state, keys the ambient temperature table
    pub state: String,
    pub raceway: RacewayMethod,
    pub topology: Topology,
    pub category: EquipmentCategory,
    /// Conductors in parallel per phase (≥ 1)
    pub parallel_per_phase: u32,
    /// Parallel raceways (≥ 1)
    pub raceways: u32,
    /// Selected ampacity column
    pub rating: TemperatureRating,
}

/// Adjusted current with every factor that produced it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdjustmentResult {
    pub nominal: Amperes,
    pub adjusted: Amperes,
    /// F_u
    pub usage_factor: f64,
    /// F_t
    pub temperature_factor: f64,
    /// F_a
    pub grouping_factor: f64,
    /// Design ambient temperature (°C)
    pub ambient_c: i32,
    /// Energized conductors in the circuit
    pub total_conductors: u32,
    /// Energized conductors sharing one raceway
    pub conductors_per_raceway: u32,
}

impl AdjustmentInput {
    /// Validate parallel counts
    pub fn validate(&self) -> CalcResult<()> {
        if self.parallel_per_phase < 1 {
            return Err(CalcError::InvalidParallelCount {
                count: self.parallel_per_phase,
            });
        }
        if self.raceways < 1 {
            return Err(CalcError::InvalidRacewayCount { count: self.raceways });
        }
        Ok(())
    }
}

/// Adjust the nominal current, looking up the ambient temperature of the
/// installation state.
pub fn adjust_current(
    tables: &dyn LookupTables,
    input: &AdjustmentInput,
) -> CalcResult<AdjustmentResult> {
    let ambient_c = resolve_ambient(tables, &input.state)?;
    adjust_current_at(tables, input, ambient_c)
}

/// Design ambient temperature of an installation state
pub fn resolve_ambient(tables: &dyn LookupTables, state: &str) -> CalcResult<i32> {
    tables
        .ambient_temperature(state)
        .ok_or_else(|| CalcError::lookup_miss("ambient temperature", state))
}

/// Adjust the nominal current at an already resolved ambient temperature.
pub fn adjust_current_at(
    tables: &dyn LookupTables,
    input: &AdjustmentInput,
    ambient_c: i32,
) -> CalcResult<AdjustmentResult> {
    input.validate()?;

    let temperature_factor = tables
        .temperature_factor(ambient_c, input.rating)
        .ok_or_else(|| {
            CalcError::lookup_miss("temperature factor", format!("{} °C ambient, {}", ambient_c, input.rating))
        })?;
    ensure_positive("temperature factor", temperature_factor)?;

    let total_conductors = input.topology.conductor_count() * input.parallel_per_phase;

    let (grouping_factor, conductors_per_raceway) = if input.raceway.is_tray() {
        (1.0, total_conductors.div_ceil(input.raceways))
    } else {
        if total_conductors % input.raceways != 0 {
            return Err(CalcError::UnevenDistribution {
                conductors: total_conductors,
                raceways: input.raceways,
            });
        }
        let per_raceway = total_conductors / input.raceways;
        let factor = tables
            .grouping_factor(per_raceway)
            .ok_or_else(|| CalcError::lookup_miss("grouping factor", format!("{} conductors", per_raceway)))?;
        (factor, per_raceway)
    };
    ensure_positive("grouping factor", grouping_factor)?;

    let usage_factor = input.category.usage_factor();
    ensure_positive("usage factor", usage_factor)?;

    let adjusted = Amperes(input.nominal.0 * usage_factor / (temperature_factor * grouping_factor));

    debug!(
        nominal_a = input.nominal.0,
        adjusted_a = adjusted.0,
        usage_factor,
        temperature_factor,
        grouping_factor,
        ambient_c,
        conductors_per_raceway,
        "current adjusted"
    );

    Ok(AdjustmentResult {
        nominal: input.nominal,
        adjusted,
        usage_factor,
        temperature_factor,
        grouping_factor,
        ambient_c,
        total_conductors,
        conductors_per_raceway,
    })
}

fn ensure_positive(factor: &str, value: f64) -> CalcResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(CalcError::non_positive_factor(factor, value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tables::nom_tables;

    fn input(
        raceway: RacewayMethod,
        topology: Topology,
        parallel: u32,
        raceways: u32,
    ) -> AdjustmentInput {
        AdjustmentInput {
            nominal: Amperes(80.0),
            state: "Aguascalientes".to_string(),
            raceway,
            topology,
            category: EquipmentCategory::Load,
            parallel_per_phase: parallel,
            raceways,
            rating: TemperatureRating::C60,
        }
    }

    #[test]
    fn test_adjusted_current_identity() {
        let mut inp = input(RacewayMethod::ConduitPvc, Topology::Wye, 1, 1);
        inp.state = "Sonora".to_string();
        let r = adjust_current(nom_tables(), &inp).unwrap();
        assert_eq!(r.ambient_c, 44);
        assert_eq!(r.temperature_factor, 0.71);
        assert_eq!(r.grouping_factor, 0.60);
        let expected = r.nominal.0 * r.usage_factor / (r.temperature_factor * r.grouping_factor);
        assert_eq!(r.adjusted.0, expected);
        assert!(r.adjusted.0 >= 0.0);
    }

    #[test]
    fn test_tray_has_unity_grouping() {
        let r = adjust_current(nom_tables(), &input(RacewayMethod::SpacedTray, Topology::Wye, 3, 1)).unwrap();
        assert_eq!(r.grouping_factor, 1.0);
        assert_eq!(r.total_conductors, 12);
    }

    #[test]
    fn test_conduit_conductors_split_across_raceways() {
        let r = adjust_current(nom_tables(), &input(RacewayMethod::ConduitPvc, Topology::Delta, 2, 2)).unwrap();
        assert_eq!(r.total_conductors, 6);
        assert_eq!(r.conductors_per_raceway, 3);
        assert_eq!(r.grouping_factor, 0.70);
    }

    #[test]
    fn test_uneven_distribution() {
        let err = adjust_current(nom_tables(), &input(RacewayMethod::ConduitPvc, Topology::Wye, 1, 3)).unwrap_err();
        assert_eq!(err, CalcError::UnevenDistribution { conductors: 4, raceways: 3 });
    }

    #[test]
    fn test_invalid_counts() {
        assert!(matches!(
            adjust_current(nom_tables(), &input(RacewayMethod::ConduitPvc, Topology::Wye, 0, 1)),
            Err(CalcError::InvalidParallelCount { count: 0 })
        ));
        assert!(matches!(
            adjust_current(nom_tables(), &input(RacewayMethod::ConduitPvc, Topology::Wye, 1, 0)),
            Err(CalcError::InvalidRacewayCount { count: 0 })
        ));
    }

    #[test]
    fn test_unknown_state_is_lookup_miss() {
        let mut inp = input(RacewayMethod::ConduitPvc, Topology::Wye, 1, 1);
        inp.state = "Atlantis".to_string();
        assert!(matches!(adjust_current(nom_tables(), &inp), Err(CalcError::LookupMiss { .. })));
    }

    #[test]
    fn test_ambient_without_factor_is_lookup_miss() {
        let inp = input(RacewayMethod::ConduitPvc, Topology::SinglePhase, 1, 1);
        // 60 °C insulation has no factor above 55 °C ambient
        assert!(matches!(
            adjust_current_at(nom_tables(), &inp, 58),
            Err(CalcError::LookupMiss { .. })
        ));
    }
}
