//! # Conductor Selection
//!
//! Feeder (phase) conductor from the ampacity tables and equipment
//! grounding conductor from Table 250-122. Both take the smallest
//! sufficient row of an ascending table.
//!
//! ## Example
//!
//! ```rust
//! use wirecalc_core::calculations::conductor::select_feeder_for;
//! use wirecalc_core::conductors::{Calibre, ConductorMaterial, TemperatureRating};
//! use wirecalc_core::installation::RacewayMethod;
//! use wirecalc_core::tables::nom_tables;
//! use wirecalc_core::units::Amperes;
//!
//! let feeder = select_feeder_for(
//!     nom_tables(),
//!     Amperes(50.0),
//!     1,
//!     RacewayMethod::ConduitPvc,
//!     ConductorMaterial::Copper,
//!     TemperatureRating::C60,
//! )
//! .unwrap();
//! assert_eq!(feeder.conductor.calibre, Calibre::Awg6);
//! assert_eq!(feeder.ampacity_a, 55.0);
//! ```

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::conductors::{Conductor, ConductorMaterial, TemperatureRating};
use crate::errors::{CalcError, CalcResult};
use crate::installation::{AmpacityClass, RacewayMethod};
use crate::nom_factors::nom_ref;
use crate::tables::{first_fit, AmpacityRow, GroundRow, LookupTables};
use crate::units::Amperes;

/// Selected phase conductor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeederResult {
    pub conductor: Conductor,
    /// Tabulated ampacity of the selected conductor (A)
    pub ampacity_a: f64,
    /// Adjusted current shared by each parallel conductor (A)
    pub per_conductor_current: Amperes,
    pub parallel_per_phase: u32,
}

impl FeederResult {
    /// Ampacity covers the per-conductor current
    pub fn is_sufficient(&self) -> bool {
        self.ampacity_a >= self.per_conductor_current.0
    }
}

/// Selected equipment grounding conductor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroundResult {
    pub conductor: Conductor,
    /// Breaker ceiling of the matched table row (A)
    pub breaker_ceiling_a: f64,
    /// Aluminum was requested but the row lists copper only
    pub fell_back_to_copper: bool,
}

fn ampacity_table_name(raceway: RacewayMethod) -> &'static str {
    match raceway.ampacity_class() {
        AmpacityClass::Raceway => nom_ref::AMPACITY_RACEWAY,
        AmpacityClass::FreeAir => nom_ref::AMPACITY_FREE_AIR,
        AmpacityClass::Triplexed => nom_ref::AMPACITY_TRIPLEXED,
    }
}

/// Smallest conductor whose ampacity covers `adjusted / parallel_per_phase`.
pub fn select_feeder(
    rows: &[AmpacityRow],
    adjusted: Amperes,
    parallel_per_phase: u32,
) -> CalcResult<FeederResult> {
    if parallel_per_phase < 1 {
        return Err(CalcError::InvalidParallelCount {
            count: parallel_per_phase,
        });
    }
    let per_conductor = adjusted / parallel_per_phase as f64;
    let row = first_fit(rows, per_conductor.0, |r| r.capacity_a)
        .ok_or_else(|| CalcError::no_sufficient_conductor("ampacity table", per_conductor.0, "A"))?;

    Ok(FeederResult {
        conductor: row.conductor.clone(),
        ampacity_a: row.capacity_a,
        per_conductor_current: per_conductor,
        parallel_per_phase,
    })
}

/// Resolve the ampacity partition for the installation and select from it.
pub fn select_feeder_for(
    tables: &dyn LookupTables,
    adjusted: Amperes,
    parallel_per_phase: u32,
    raceway: RacewayMethod,
    material: ConductorMaterial,
    rating: TemperatureRating,
) -> CalcResult<FeederResult> {
    let table = ampacity_table_name(raceway);
    let rows = tables
        .ampacity_table(raceway, material, rating)
        .ok_or_else(|| CalcError::lookup_miss(table, format!("{} {} at {}", raceway, material, rating)))?;

    let feeder = select_feeder(rows, adjusted, parallel_per_phase).map_err(|e| match e {
        CalcError::NoSufficientConductor { required, unit, .. } => CalcError::NoSufficientConductor {
            table: format!("{} ({}, {})", table, material, rating),
            required,
            unit,
        },
        other => other,
    })?;

    debug!(
        calibre = %feeder.conductor.calibre,
        ampacity_a = feeder.ampacity_a,
        per_conductor_a = feeder.per_conductor_current.0,
        "feeder conductor selected"
    );
    Ok(feeder)
}

/// Grounding conductor for a breaker rating (NOM 250-122).
///
/// Rows without an aluminum size fall back to copper; the result records it.
pub fn select_ground(
    rows: &[GroundRow],
    breaker_a: f64,
    material: ConductorMaterial,
) -> CalcResult<GroundResult> {
    let row = first_fit(rows, breaker_a, |r| r.breaker_ceiling_a)
        .ok_or_else(|| CalcError::no_sufficient_conductor(nom_ref::GROUND_CONDUCTOR, breaker_a, "A"))?;

    let (conductor, fell_back_to_copper) = match (material, &row.aluminum) {
        (ConductorMaterial::Aluminum, Some(al)) => (al.clone(), false),
        (ConductorMaterial::Aluminum, None) => (row.copper.clone(), true),
        (ConductorMaterial::Copper, _) => (row.copper.clone(), false),
    };

    if fell_back_to_copper {
        warn!(
            breaker_a,
            calibre = %conductor.calibre,
            "no aluminum grounding conductor for this rating, using copper"
        );
    }

    Ok(GroundResult {
        conductor,
        breaker_ceiling_a: row.breaker_ceiling_a,
        fell_back_to_copper,
    })
}

/// [`select_ground`] against the table store
pub fn select_ground_for(
    tables: &dyn LookupTables,
    breaker_a: f64,
    material: ConductorMaterial,
) -> CalcResult<GroundResult> {
    if !breaker_a.is_finite() || breaker_a <= 0.0 {
        return Err(CalcError::invalid_input(
            "breaker_a",
            breaker_a.to_string(),
            "Breaker rating must be positive",
        ));
    }
    let ground = select_ground(tables.ground_table(), breaker_a, material)?;
    debug!(
        calibre = %ground.conductor.calibre,
        material = %ground.conductor.material,
        "ground conductor selected"
    );
    Ok(ground)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conductors::Calibre;
    use crate::tables::nom_tables;

    fn cu60() -> &'static [AmpacityRow] {
        nom_tables()
            .ampacity_table(RacewayMethod::ConduitPvc, ConductorMaterial::Copper, TemperatureRating::C60)
            .unwrap()
    }

    #[test]
    fn test_smallest_sufficient_row() {
        let f = select_feeder(cu60(), Amperes(50.0), 1).unwrap();
        assert_eq!(f.conductor.calibre, Calibre::Awg6);
        assert_eq!(f.ampacity_a, 55.0);
        // exact match takes that row
        let f = select_feeder(cu60(), Amperes(55.0), 1).unwrap();
        assert_eq!(f.conductor.calibre, Calibre::Awg6);
    }

    #[test]
    fn test_parallel_divides_current() {
        let f = select_feeder(cu60(), Amperes(400.0), 2).unwrap();
        assert_eq!(f.per_conductor_current, Amperes(200.0));
        assert_eq!(f.conductor.calibre, Calibre::Kcmil250);
        assert!(f.is_sufficient());
    }

    #[test]
    fn test_selection_is_monotonic() {
        let mut last = 0.0;
        for amps in (1..=455).step_by(7) {
            let f = select_feeder(cu60(), Amperes(amps as f64), 1).unwrap();
            assert!(f.ampacity_a >= last);
            assert!(f.is_sufficient());
            last = f.ampacity_a;
        }
    }

    #[test]
    fn test_no_sufficient_conductor() {
        assert!(matches!(
            select_feeder(cu60(), Amperes(456.0), 1),
            Err(CalcError::NoSufficientConductor { .. })
        ));
        assert!(matches!(
            select_feeder(&[], Amperes(1.0), 1),
            Err(CalcError::NoSufficientConductor { .. })
        ));
    }

    #[test]
    fn test_triangular_60c_is_lookup_miss() {
        let result = select_feeder_for(
            nom_tables(),
            Amperes(50.0),
            1,
            RacewayMethod::TriangularTray,
            ConductorMaterial::Copper,
            TemperatureRating::C60,
        );
        assert!(matches!(result, Err(CalcError::LookupMiss { .. })));
    }

    #[test]
    fn test_ground_copper_100a() {
        let g = select_ground_for(nom_tables(), 100.0, ConductorMaterial::Copper).unwrap();
        assert_eq!(g.conductor.calibre, Calibre::Awg8);
        assert_eq!(g.breaker_ceiling_a, 100.0);
        assert!(!g.fell_back_to_copper);
    }

    #[test]
    fn test_ground_aluminum_fallback() {
        let g = select_ground_for(nom_tables(), 40.0, ConductorMaterial::Aluminum).unwrap();
        assert_eq!(g.conductor.material, ConductorMaterial::Copper);
        assert_eq!(g.conductor.calibre, Calibre::Awg10);
        assert!(g.fell_back_to_copper);

        let g = select_ground_for(nom_tables(), 150.0, ConductorMaterial::Aluminum).unwrap();
        assert_eq!(g.conductor.material, ConductorMaterial::Aluminum);
        assert_eq!(g.conductor.calibre, Calibre::Awg4);
    }

    #[test]
    fn test_ground_beyond_table() {
        assert!(matches!(
            select_ground_for(nom_tables(), 7000.0, ConductorMaterial::Copper),
            Err(CalcError::NoSufficientConductor { .. })
        ));
    }
}
