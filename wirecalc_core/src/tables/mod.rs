//! # Lookup Tables
//!
//! The read-only table contract the engine consumes, plus the row types and
//! the single "smallest sufficient row" search every selector shares.
//!
//! ## Architecture
//!
//! - [`LookupTables`] is the capability set: each method is a pure function
//!   of its lookup keys. Tables are handed to the engine by reference; the
//!   engine never caches or mutates them.
//! - [`TableSet`] is the bundled in-memory implementation. It deserializes
//!   from JSON and ships NOM-001-SEDE reference data via [`nom_tables`].
//!
//! ## Example
//!
//! ```rust
//! use wirecalc_core::tables::{nom_tables, LookupTables};
//!
//! let tables = nom_tables();
//! assert_eq!(tables.grouping_factor(1), Some(1.0));
//! assert_eq!(tables.ambient_temperature("Nuevo León"), Some(40));
//! ```

pub mod nom;

pub use nom::{
    nom_tables, AmpacityTable, GroupingFactorRow, ImpedanceColumns, ImpedanceRow, RacewaySizeTable,
    TableSet, TemperatureFactorRow,
};

use serde::{Deserialize, Serialize};

use crate::calculations::current::EquipmentRating;
use crate::conductors::{Calibre, Conductor, ConductorMaterial, TemperatureRating};
use crate::installation::RacewayMethod;
use crate::nom_factors::EquipmentCategory;
use crate::units::OhmsPerKm;

// ============================================================================
// Row Types
// ============================================================================

/// One ampacity table entry: a conductor and the current it carries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmpacityRow {
    /// Allowable ampacity (A)
    pub capacity_a: f64,
    pub conductor: Conductor,
}

/// One grounding-conductor table entry (NOM 250-122).
///
/// Aluminum is optional: small breaker ratings list copper only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroundRow {
    /// Largest overcurrent device rating covered by this row (A)
    pub breaker_ceiling_a: f64,
    pub copper: Conductor,
    #[serde(default)]
    pub aluminum: Option<Conductor>,
}

/// One raceway trade size.
///
/// `capacity` is the interior area (mm²) for conduit and the usable width
/// (mm) for cable trays.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RacewaySizeRow {
    /// Trade designation, e.g. "27 (1\")" or "300 mm"
    pub label: String,
    pub capacity: f64,
}

/// Resistance and reactance per kilometer for one conductor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Impedance {
    pub resistance: OhmsPerKm,
    pub reactance: OhmsPerKm,
}

/// A catalogued piece of equipment that can be referenced by key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquipmentRecord {
    pub key: String,
    pub description: String,
    pub category: EquipmentCategory,
    pub rating: EquipmentRating,
}

// ============================================================================
// Table Contract
// ============================================================================

/// Read-only lookup capabilities consumed by the calculation engine.
///
/// Every table slice is sorted ascending by its selection key (capacity,
/// breaker ceiling, interior area/width). Implementations must be safe to
/// share across threads; distinct calculations may run in parallel against
/// the same tables.
pub trait LookupTables: Send + Sync {
    /// Design ambient temperature (°C) for an installation state
    fn ambient_temperature(&self, state: &str) -> Option<i32>;

    /// Ambient correction factor for a temperature rating
    fn temperature_factor(&self, ambient_c: i32, rating: TemperatureRating) -> Option<f64>;

    /// Grouping factor for a number of current-carrying conductors
    fn grouping_factor(&self, conductor_count: u32) -> Option<f64>;

    /// Ampacity rows for a raceway method, material and rating column
    fn ampacity_table(
        &self,
        raceway: RacewayMethod,
        material: ConductorMaterial,
        rating: TemperatureRating,
    ) -> Option<&[AmpacityRow]>;

    /// Grounding conductor rows
    fn ground_table(&self) -> &[GroundRow];

    /// Trade sizes for a raceway method
    fn raceway_sizes(&self, raceway: RacewayMethod) -> Option<&[RacewaySizeRow]>;

    /// Per-km resistance and reactance of a conductor in a raceway
    fn impedance(
        &self,
        calibre: Calibre,
        raceway: RacewayMethod,
        material: ConductorMaterial,
    ) -> Option<Impedance>;

    /// Catalogued equipment by key
    fn equipment(&self, key: &str) -> Option<&EquipmentRecord>;
}

impl<T: LookupTables + ?Sized> LookupTables for &T {
    fn ambient_temperature(&self, state: &str) -> Option<i32> {
        (**self).ambient_temperature(state)
    }

    fn temperature_factor(&self, ambient_c: i32, rating: TemperatureRating) -> Option<f64> {
        (**self).temperature_factor(ambient_c, rating)
    }

    fn grouping_factor(&self, conductor_count: u32) -> Option<f64> {
        (**self).grouping_factor(conductor_count)
    }

    fn ampacity_table(
        &self,
        raceway: RacewayMethod,
        material: ConductorMaterial,
        rating: TemperatureRating,
    ) -> Option<&[AmpacityRow]> {
        (**self).ampacity_table(raceway, material, rating)
    }

    fn ground_table(&self) -> &[GroundRow] {
        (**self).ground_table()
    }

    fn raceway_sizes(&self, raceway: RacewayMethod) -> Option<&[RacewaySizeRow]> {
        (**self).raceway_sizes(raceway)
    }

    fn impedance(
        &self,
        calibre: Calibre,
        raceway: RacewayMethod,
        material: ConductorMaterial,
    ) -> Option<Impedance> {
        (**self).impedance(calibre, raceway, material)
    }

    fn equipment(&self, key: &str) -> Option<&EquipmentRecord> {
        (**self).equipment(key)
    }
}

// ============================================================================
// First-Fit Search
// ============================================================================

/// Return the first row (in table order) whose key is at least `required`.
///
/// Tables are sorted ascending, so this is the smallest sufficient entry.
/// Shared by feeder selection, ground selection and all raceway sizing.
pub fn first_fit<T, F>(rows: &[T], required: f64, key: F) -> Option<&T>
where
    F: Fn(&T) -> f64,
{
    rows.iter().find(|row| key(row) >= required)
}

/// True when the keys of `rows` never decrease
pub fn is_ascending<T, F>(rows: &[T], key: F) -> bool
where
    F: Fn(&T) -> f64,
{
    rows.windows(2).all(|pair| key(&pair[0]) <= key(&pair[1]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_fit_returns_smallest_sufficient() {
        let rows = [10.0, 20.0, 30.0];
        assert_eq!(first_fit(&rows, 15.0, |r| *r), Some(&20.0));
        assert_eq!(first_fit(&rows, 20.0, |r| *r), Some(&20.0));
        assert_eq!(first_fit(&rows, 5.0, |r| *r), Some(&10.0));
        assert_eq!(first_fit(&rows, 31.0, |r| *r), None);
    }

    #[test]
    fn test_first_fit_empty() {
        let rows: [f64; 0] = [];
        assert_eq!(first_fit(&rows, 0.0, |r| *r), None);
    }

    #[test]
    fn test_is_ascending() {
        assert!(is_ascending(&[1.0, 1.0, 2.0], |r| *r));
        assert!(!is_ascending(&[2.0, 1.0], |r| *r));
    }
}
