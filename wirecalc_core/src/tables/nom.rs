//! NOM-001-SEDE Reference Tables
//!
//! In-memory [`TableSet`] with the reference data shipped with WireCalc:
//!
//! - Ampacity: Tables 310-15(b)(16), (17) and (20), copper and aluminum
//! - Ambient correction: Table 310-15(b)(2)(a), base 30 °C
//! - Grouping: current-carrying conductors per raceway
//! - Grounding conductors: Table 250-122
//! - Conduit interior areas: Chapter 10, Table 4
//! - Cable tray widths: standard trade widths
//! - AC impedance: Chapter 10, Table 9 (600 V, 60 Hz, 75 °C)
//! - Design ambient temperature by state
//!
//! A project can replace any of it with its own snapshot by deserializing a
//! `TableSet` from JSON.

use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use super::{
    is_ascending, AmpacityRow, EquipmentRecord, GroundRow, Impedance, LookupTables, RacewaySizeRow,
};
use crate::calculations::current::EquipmentRating;
use crate::conductors::{Calibre, Conductor, ConductorMaterial, Insulation, TemperatureRating};
use crate::errors::{CalcError, CalcResult};
use crate::installation::{AmpacityClass, ConduitKind, RacewayMethod};
use crate::nom_factors::EquipmentCategory;
use crate::units::{Amperes, OhmsPerKm, Watts};

/// Reference tables, built once and shared read-only
static NOM_TABLES: Lazy<TableSet> = Lazy::new(TableSet::nom_reference);

/// The bundled NOM-001-SEDE reference tables
pub fn nom_tables() -> &'static TableSet {
    &NOM_TABLES
}

// ============================================================================
// Table Shapes
// ============================================================================

/// Ambient correction factors for one temperature range (inclusive)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemperatureFactorRow {
    pub ambient_min_c: i32,
    pub ambient_max_c: i32,
    pub factor_60: Option<f64>,
    pub factor_75: Option<f64>,
    pub factor_90: Option<f64>,
}

impl TemperatureFactorRow {
    fn factor(&self, rating: TemperatureRating) -> Option<f64> {
        match rating {
            TemperatureRating::C60 => self.factor_60,
            TemperatureRating::C75 => self.factor_75,
            TemperatureRating::C90 => self.factor_90,
        }
    }
}

/// Grouping factor for a range of conductor counts; open-ended when
/// `max_conductors` is `None`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupingFactorRow {
    pub min_conductors: u32,
    pub max_conductors: Option<u32>,
    pub factor: f64,
}

impl GroupingFactorRow {
    fn covers(&self, count: u32) -> bool {
        count >= self.min_conductors && self.max_conductors.map_or(true, |max| count <= max)
    }
}

/// One ampacity partition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmpacityTable {
    pub class: AmpacityClass,
    pub material: ConductorMaterial,
    pub rating: TemperatureRating,
    pub rows: Vec<AmpacityRow>,
}

/// Trade sizes for one raceway method
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RacewaySizeTable {
    pub method: RacewayMethod,
    pub rows: Vec<RacewaySizeRow>,
}

/// Per-km values by conduit material column
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ImpedanceColumns {
    pub pvc: f64,
    pub aluminum: f64,
    pub steel: f64,
}

impl ImpedanceColumns {
    /// Column for a raceway; trays behave as non-magnetic (PVC) raceways
    fn for_raceway(&self, raceway: RacewayMethod) -> f64 {
        match raceway.conduit_kind() {
            Some(ConduitKind::Aluminum) => self.aluminum,
            Some(ConduitKind::SteelThick) | Some(ConduitKind::SteelThin) => self.steel,
            Some(ConduitKind::Pvc) | None => self.pvc,
        }
    }
}

/// Impedance data for one calibre
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImpedanceRow {
    pub calibre: Calibre,
    pub reactance: ImpedanceColumns,
    pub copper: ImpedanceColumns,
    #[serde(default)]
    pub aluminum: Option<ImpedanceColumns>,
}

/// Complete in-memory table snapshot.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TableSet {
    #[serde(default)]
    pub ambient_by_state: BTreeMap<String, i32>,
    #[serde(default)]
    pub temperature_factors: Vec<TemperatureFactorRow>,
    #[serde(default)]
    pub grouping_factors: Vec<GroupingFactorRow>,
    #[serde(default)]
    pub ampacity: Vec<AmpacityTable>,
    #[serde(default)]
    pub ground: Vec<GroundRow>,
    #[serde(default)]
    pub raceway_sizes: Vec<RacewaySizeTable>,
    #[serde(default)]
    pub impedance: Vec<ImpedanceRow>,
    #[serde(default)]
    pub equipment: Vec<EquipmentRecord>,
}

/// Lowercase and strip Spanish accents so "Nuevo León" matches "nuevo leon"
fn normalize_key(s: &str) -> String {
    s.trim()
        .chars()
        .map(|c| match c {
            'á' | 'Á' => 'a',
            'é' | 'É' => 'e',
            'í' | 'Í' => 'i',
            'ó' | 'Ó' => 'o',
            'ú' | 'Ú' | 'ü' | 'Ü' => 'u',
            'ñ' | 'Ñ' => 'n',
            other => other.to_ascii_lowercase(),
        })
        .collect()
}

impl TableSet {
    /// Parse a table snapshot from JSON and check its ordering invariants
    pub fn from_json(json: &str) -> CalcResult<Self> {
        let tables: TableSet = serde_json::from_str(json).map_err(|e| {
            CalcError::invalid_input("tables", "json", e.to_string())
        })?;
        tables.validate()?;
        Ok(tables)
    }

    /// Check that every selection table is sorted ascending
    pub fn validate(&self) -> CalcResult<()> {
        for table in &self.ampacity {
            if !is_ascending(&table.rows, |r| r.capacity_a) {
                return Err(CalcError::invalid_input(
                    "ampacity",
                    format!("{:?}/{:?}/{}", table.class, table.material, table.rating),
                    "rows must be sorted by ascending capacity",
                ));
            }
        }
        if !is_ascending(&self.ground, |r| r.breaker_ceiling_a) {
            return Err(CalcError::invalid_input(
                "ground",
                "rows",
                "rows must be sorted by ascending breaker ceiling",
            ));
        }
        for table in &self.raceway_sizes {
            if !is_ascending(&table.rows, |r| r.capacity) {
                return Err(CalcError::invalid_input(
                    "raceway_sizes",
                    format!("{:?}", table.method),
                    "rows must be sorted by ascending capacity",
                ));
            }
        }
        Ok(())
    }

    /// Build the NOM-001-SEDE reference snapshot
    pub fn nom_reference() -> Self {
        TableSet {
            ambient_by_state: ambient_by_state(),
            temperature_factors: temperature_factors(),
            grouping_factors: grouping_factors(),
            ampacity: ampacity_tables(),
            ground: ground_rows(),
            raceway_sizes: raceway_size_tables(),
            impedance: impedance_rows(),
            equipment: equipment_catalog(),
        }
    }
}

impl LookupTables for TableSet {
    fn ambient_temperature(&self, state: &str) -> Option<i32> {
        let wanted = normalize_key(state);
        self.ambient_by_state
            .iter()
            .find(|(name, _)| normalize_key(name) == wanted)
            .map(|(_, t)| *t)
    }

    fn temperature_factor(&self, ambient_c: i32, rating: TemperatureRating) -> Option<f64> {
        self.temperature_factors
            .iter()
            .find(|row| ambient_c >= row.ambient_min_c && ambient_c <= row.ambient_max_c)
            .and_then(|row| row.factor(rating))
    }

    fn grouping_factor(&self, conductor_count: u32) -> Option<f64> {
        self.grouping_factors
            .iter()
            .find(|row| row.covers(conductor_count))
            .map(|row| row.factor)
    }

    fn ampacity_table(
        &self,
        raceway: RacewayMethod,
        material: ConductorMaterial,
        rating: TemperatureRating,
    ) -> Option<&[AmpacityRow]> {
        let class = raceway.ampacity_class();
        self.ampacity
            .iter()
            .find(|t| t.class == class && t.material == material && t.rating == rating)
            .map(|t| t.rows.as_slice())
    }

    fn ground_table(&self) -> &[GroundRow] {
        &self.ground
    }

    fn raceway_sizes(&self, raceway: RacewayMethod) -> Option<&[RacewaySizeRow]> {
        self.raceway_sizes
            .iter()
            .find(|t| t.method == raceway)
            .map(|t| t.rows.as_slice())
    }

    fn impedance(
        &self,
        calibre: Calibre,
        raceway: RacewayMethod,
        material: ConductorMaterial,
    ) -> Option<Impedance> {
        let row = self.impedance.iter().find(|r| r.calibre == calibre)?;
        let resistance = match material {
            ConductorMaterial::Copper => row.copper,
            ConductorMaterial::Aluminum => row.aluminum?,
        };
        Some(Impedance {
            resistance: OhmsPerKm(resistance.for_raceway(raceway)),
            reactance: OhmsPerKm(row.reactance.for_raceway(raceway)),
        })
    }

    fn equipment(&self, key: &str) -> Option<&EquipmentRecord> {
        let wanted = normalize_key(key);
        self.equipment.iter().find(|e| normalize_key(&e.key) == wanted)
    }
}

// ============================================================================
// Reference Data
// ============================================================================

/// Reference tables list building wire as THHW-LS
const TABLE_INSULATION: Insulation = Insulation::ThhwLs;

fn catalog_conductor(calibre: Calibre, material: ConductorMaterial) -> Conductor {
    Conductor {
        calibre,
        material,
        insulation: TABLE_INSULATION,
        section_mm2: calibre.section_mm2(),
        outer_diameter_mm: calibre.outer_diameter_mm(),
        insulated_area_mm2: calibre.insulated_area_mm2(),
        resistance_per_km: None,
        reactance_per_km: None,
    }
}

fn ambient_by_state() -> BTreeMap<String, i32> {
    [
        ("Aguascalientes", 30),
        ("Baja California", 40),
        ("Baja California Sur", 38),
        ("Campeche", 36),
        ("Chiapas", 32),
        ("Chihuahua", 38),
        ("Ciudad de México", 25),
        ("Coahuila", 38),
        ("Colima", 34),
        ("Durango", 32),
        ("Guanajuato", 30),
        ("Guerrero", 34),
        ("Hidalgo", 28),
        ("Jalisco", 32),
        ("Estado de México", 26),
        ("Michoacán", 32),
        ("Morelos", 32),
        ("Nayarit", 34),
        ("Nuevo León", 40),
        ("Oaxaca", 32),
        ("Puebla", 28),
        ("Querétaro", 30),
        ("Quintana Roo", 35),
        ("San Luis Potosí", 32),
        ("Sinaloa", 38),
        ("Sonora", 44),
        ("Tabasco", 36),
        ("Tamaulipas", 38),
        ("Tlaxcala", 26),
        ("Veracruz", 36),
        ("Yucatán", 38),
        ("Zacatecas", 30),
    ]
    .into_iter()
    .map(|(state, t)| (state.to_string(), t))
    .collect()
}

fn temperature_factors() -> Vec<TemperatureFactorRow> {
    // (min, max, 60 °C, 75 °C, 90 °C)
    let data: [(i32, i32, Option<f64>, Option<f64>, Option<f64>); 13] = [
        (-40, 10, Some(1.29), Some(1.20), Some(1.15)),
        (11, 15, Some(1.22), Some(1.15), Some(1.12)),
        (16, 20, Some(1.15), Some(1.11), Some(1.08)),
        (21, 25, Some(1.08), Some(1.05), Some(1.04)),
        (26, 30, Some(1.00), Some(1.00), Some(1.00)),
        (31, 35, Some(0.91), Some(0.94), Some(0.96)),
        (36, 40, Some(0.82), Some(0.88), Some(0.91)),
        (41, 45, Some(0.71), Some(0.82), Some(0.87)),
        (46, 50, Some(0.58), Some(0.75), Some(0.82)),
        (51, 55, Some(0.41), Some(0.67), Some(0.76)),
        (56, 60, None, Some(0.58), Some(0.71)),
        (61, 70, None, Some(0.33), Some(0.58)),
        (71, 80, None, None, Some(0.41)),
    ];
    data.into_iter()
        .map(|(ambient_min_c, ambient_max_c, factor_60, factor_75, factor_90)| TemperatureFactorRow {
            ambient_min_c,
            ambient_max_c,
            factor_60,
            factor_75,
            factor_90,
        })
        .collect()
}

fn grouping_factors() -> Vec<GroupingFactorRow> {
    let data: [(u32, Option<u32>, f64); 9] = [
        (1, Some(1), 1.00),
        (2, Some(2), 0.80),
        (3, Some(3), 0.70),
        (4, Some(6), 0.60),
        (7, Some(9), 0.50),
        (10, Some(20), 0.45),
        (21, Some(30), 0.40),
        (31, Some(40), 0.35),
        (41, None, 0.30),
    ];
    data.into_iter()
        .map(|(min_conductors, max_conductors, factor)| GroupingFactorRow {
            min_conductors,
            max_conductors,
            factor,
        })
        .collect()
}

/// Table 310-15(b)(16), copper, 14 AWG to 1000 kcmil: (60, 75, 90 °C)
const CU_RACEWAY: [(f64, f64, f64); 21] = [
    (15.0, 20.0, 25.0),
    (20.0, 25.0, 30.0),
    (30.0, 35.0, 40.0),
    (40.0, 50.0, 55.0),
    (55.0, 65.0, 75.0),
    (70.0, 85.0, 95.0),
    (85.0, 100.0, 115.0),
    (95.0, 115.0, 130.0),
    (110.0, 130.0, 145.0),
    (125.0, 150.0, 170.0),
    (145.0, 175.0, 195.0),
    (165.0, 200.0, 225.0),
    (195.0, 230.0, 260.0),
    (215.0, 255.0, 290.0),
    (240.0, 285.0, 320.0),
    (260.0, 310.0, 350.0),
    (280.0, 335.0, 380.0),
    (320.0, 380.0, 430.0),
    (350.0, 420.0, 475.0),
    (400.0, 475.0, 535.0),
    (455.0, 545.0, 615.0),
];

/// Table 310-15(b)(16), aluminum, 12 AWG to 1000 kcmil
const AL_RACEWAY: [(f64, f64, f64); 20] = [
    (15.0, 20.0, 25.0),
    (25.0, 30.0, 35.0),
    (35.0, 40.0, 45.0),
    (40.0, 50.0, 55.0),
    (55.0, 65.0, 75.0),
    (65.0, 75.0, 85.0),
    (75.0, 90.0, 100.0),
    (85.0, 100.0, 115.0),
    (100.0, 120.0, 135.0),
    (115.0, 135.0, 150.0),
    (130.0, 155.0, 175.0),
    (150.0, 180.0, 205.0),
    (170.0, 205.0, 230.0),
    (195.0, 230.0, 260.0),
    (210.0, 250.0, 280.0),
    (225.0, 270.0, 305.0),
    (260.0, 310.0, 350.0),
    (285.0, 340.0, 385.0),
    (320.0, 385.0, 435.0),
    (375.0, 445.0, 500.0),
];

/// Table 310-15(b)(17), copper in free air, 14 AWG to 1000 kcmil
const CU_FREE_AIR: [(f64, f64, f64); 21] = [
    (25.0, 30.0, 35.0),
    (30.0, 35.0, 40.0),
    (40.0, 50.0, 55.0),
    (60.0, 70.0, 80.0),
    (80.0, 95.0, 105.0),
    (105.0, 125.0, 140.0),
    (120.0, 145.0, 165.0),
    (140.0, 170.0, 190.0),
    (165.0, 195.0, 220.0),
    (195.0, 230.0, 260.0),
    (225.0, 265.0, 300.0),
    (260.0, 310.0, 350.0),
    (300.0, 360.0, 405.0),
    (340.0, 405.0, 455.0),
    (375.0, 445.0, 500.0),
    (420.0, 505.0, 570.0),
    (455.0, 545.0, 615.0),
    (515.0, 620.0, 700.0),
    (575.0, 690.0, 780.0),
    (655.0, 785.0, 885.0),
    (780.0, 935.0, 1055.0),
];

/// Table 310-15(b)(17), aluminum in free air, 12 AWG to 1000 kcmil
const AL_FREE_AIR: [(f64, f64, f64); 20] = [
    (25.0, 30.0, 35.0),
    (35.0, 40.0, 45.0),
    (45.0, 55.0, 60.0),
    (60.0, 75.0, 85.0),
    (80.0, 100.0, 115.0),
    (95.0, 115.0, 130.0),
    (110.0, 135.0, 150.0),
    (130.0, 155.0, 175.0),
    (150.0, 180.0, 205.0),
    (175.0, 210.0, 235.0),
    (200.0, 240.0, 270.0),
    (235.0, 280.0, 315.0),
    (265.0, 315.0, 355.0),
    (290.0, 350.0, 395.0),
    (330.0, 395.0, 445.0),
    (355.0, 425.0, 480.0),
    (405.0, 485.0, 545.0),
    (455.0, 545.0, 615.0),
    (515.0, 620.0, 700.0),
    (625.0, 750.0, 845.0),
];

/// Table 310-15(b)(20), triplexed in free air, 8 AWG to 1000 kcmil: (75, 90 °C)
const CU_TRIPLEXED: [(f64, f64); 18] = [
    (57.0, 66.0),
    (76.0, 89.0),
    (101.0, 117.0),
    (118.0, 138.0),
    (135.0, 158.0),
    (158.0, 185.0),
    (183.0, 214.0),
    (212.0, 247.0),
    (245.0, 287.0),
    (287.0, 335.0),
    (320.0, 374.0),
    (359.0, 419.0),
    (397.0, 464.0),
    (430.0, 503.0),
    (496.0, 580.0),
    (553.0, 647.0),
    (638.0, 747.0),
    (748.0, 879.0),
];

const AL_TRIPLEXED: [(f64, f64); 18] = [
    (44.0, 51.0),
    (59.0, 69.0),
    (78.0, 91.0),
    (92.0, 107.0),
    (106.0, 123.0),
    (123.0, 144.0),
    (143.0, 167.0),
    (165.0, 193.0),
    (192.0, 224.0),
    (224.0, 262.0),
    (251.0, 292.0),
    (282.0, 328.0),
    (312.0, 364.0),
    (339.0, 395.0),
    (392.0, 458.0),
    (440.0, 514.0),
    (508.0, 593.0),
    (603.0, 702.0),
];

fn build_rows(
    calibres: &[Calibre],
    material: ConductorMaterial,
    capacities: &[f64],
) -> Vec<AmpacityRow> {
    calibres
        .iter()
        .zip(capacities)
        .map(|(calibre, capacity_a)| AmpacityRow {
            capacity_a: *capacity_a,
            conductor: catalog_conductor(*calibre, material),
        })
        .collect()
}

fn three_column_tables(
    class: AmpacityClass,
    material: ConductorMaterial,
    data: &[(f64, f64, f64)],
) -> Vec<AmpacityTable> {
    let calibres = &Calibre::ALL[Calibre::ALL.len() - data.len()..];
    let columns: [(TemperatureRating, Vec<f64>); 3] = [
        (TemperatureRating::C60, data.iter().map(|d| d.0).collect()),
        (TemperatureRating::C75, data.iter().map(|d| d.1).collect()),
        (TemperatureRating::C90, data.iter().map(|d| d.2).collect()),
    ];
    columns
        .into_iter()
        .map(|(rating, caps)| AmpacityTable {
            class,
            material,
            rating,
            rows: build_rows(calibres, material, &caps),
        })
        .collect()
}

fn triplexed_tables(material: ConductorMaterial, data: &[(f64, f64)]) -> Vec<AmpacityTable> {
    let calibres = &Calibre::ALL[Calibre::ALL.len() - data.len()..];
    let columns: [(TemperatureRating, Vec<f64>); 2] = [
        (TemperatureRating::C75, data.iter().map(|d| d.0).collect()),
        (TemperatureRating::C90, data.iter().map(|d| d.1).collect()),
    ];
    columns
        .into_iter()
        .map(|(rating, caps)| AmpacityTable {
            class: AmpacityClass::Triplexed,
            material,
            rating,
            rows: build_rows(calibres, material, &caps),
        })
        .collect()
}

fn ampacity_tables() -> Vec<AmpacityTable> {
    let mut tables = Vec::new();
    tables.extend(three_column_tables(AmpacityClass::Raceway, ConductorMaterial::Copper, &CU_RACEWAY));
    tables.extend(three_column_tables(AmpacityClass::Raceway, ConductorMaterial::Aluminum, &AL_RACEWAY));
    tables.extend(three_column_tables(AmpacityClass::FreeAir, ConductorMaterial::Copper, &CU_FREE_AIR));
    tables.extend(three_column_tables(AmpacityClass::FreeAir, ConductorMaterial::Aluminum, &AL_FREE_AIR));
    tables.extend(triplexed_tables(ConductorMaterial::Copper, &CU_TRIPLEXED));
    tables.extend(triplexed_tables(ConductorMaterial::Aluminum, &AL_TRIPLEXED));
    tables
}

fn ground_rows() -> Vec<GroundRow> {
    use Calibre::*;
    // 700 kcmil Cu (5000 A) and 800 kcmil Cu (6000 A) round up to the next
    // catalogued calibre; aluminum above 1000 kcmil is not catalogued.
    let data: [(f64, Calibre, Option<Calibre>); 19] = [
        (15.0, Awg14, None),
        (20.0, Awg12, None),
        (60.0, Awg10, None),
        (100.0, Awg8, Some(Awg6)),
        (200.0, Awg6, Some(Awg4)),
        (300.0, Awg4, Some(Awg2)),
        (400.0, Awg3, Some(Awg1)),
        (500.0, Awg2, Some(Awg1_0)),
        (600.0, Awg1, Some(Awg2_0)),
        (800.0, Awg1_0, Some(Awg3_0)),
        (1000.0, Awg2_0, Some(Awg4_0)),
        (1200.0, Awg3_0, Some(Kcmil250)),
        (1600.0, Awg4_0, Some(Kcmil350)),
        (2000.0, Kcmil250, Some(Kcmil400)),
        (2500.0, Kcmil350, Some(Kcmil600)),
        (3000.0, Kcmil400, Some(Kcmil600)),
        (4000.0, Kcmil500, Some(Kcmil750)),
        (5000.0, Kcmil750, None),
        (6000.0, Kcmil1000, None),
    ];
    data.into_iter()
        .map(|(breaker_ceiling_a, cu, al)| GroundRow {
            breaker_ceiling_a,
            copper: catalog_conductor(cu, ConductorMaterial::Copper),
            aluminum: al.map(|c| catalog_conductor(c, ConductorMaterial::Aluminum)),
        })
        .collect()
}

fn size_rows(data: &[(&str, f64)]) -> Vec<RacewaySizeRow> {
    data.iter()
        .map(|(label, capacity)| RacewaySizeRow {
            label: label.to_string(),
            capacity: *capacity,
        })
        .collect()
}

fn raceway_size_tables() -> Vec<RacewaySizeTable> {
    // Chapter 10, Table 4: total interior area (mm²)
    let pvc = [
        ("16 (1/2\")", 184.0),
        ("21 (3/4\")", 327.0),
        ("27 (1\")", 535.0),
        ("35 (1-1/4\")", 935.0),
        ("41 (1-1/2\")", 1282.0),
        ("53 (2\")", 2124.0),
        ("63 (2-1/2\")", 3029.0),
        ("78 (3\")", 4693.0),
        ("91 (3-1/2\")", 6277.0),
        ("103 (4\")", 8091.0),
        ("129 (5\")", 12748.0),
        ("155 (6\")", 18433.0),
    ];
    let rigid = [
        ("16 (1/2\")", 204.0),
        ("21 (3/4\")", 353.0),
        ("27 (1\")", 573.0),
        ("35 (1-1/4\")", 984.0),
        ("41 (1-1/2\")", 1333.0),
        ("53 (2\")", 2198.0),
        ("63 (2-1/2\")", 3137.0),
        ("78 (3\")", 4840.0),
        ("91 (3-1/2\")", 6461.0),
        ("103 (4\")", 8316.0),
        ("129 (5\")", 13050.0),
        ("155 (6\")", 18821.0),
    ];
    let thin = [
        ("16 (1/2\")", 196.0),
        ("21 (3/4\")", 343.0),
        ("27 (1\")", 556.0),
        ("35 (1-1/4\")", 968.0),
        ("41 (1-1/2\")", 1314.0),
        ("53 (2\")", 2165.0),
        ("63 (2-1/2\")", 3783.0),
        ("78 (3\")", 5701.0),
        ("91 (3-1/2\")", 7451.0),
        ("103 (4\")", 9521.0),
    ];
    // Usable tray width (mm)
    let trays = [
        ("150 mm", 150.0),
        ("200 mm", 200.0),
        ("300 mm", 300.0),
        ("400 mm", 400.0),
        ("450 mm", 450.0),
        ("600 mm", 600.0),
        ("750 mm", 750.0),
        ("900 mm", 900.0),
    ];

    vec![
        RacewaySizeTable { method: RacewayMethod::ConduitPvc, rows: size_rows(&pvc) },
        RacewaySizeTable { method: RacewayMethod::ConduitAluminum, rows: size_rows(&rigid) },
        RacewaySizeTable { method: RacewayMethod::ConduitSteelThick, rows: size_rows(&rigid) },
        RacewaySizeTable { method: RacewayMethod::ConduitSteelThin, rows: size_rows(&thin) },
        RacewaySizeTable { method: RacewayMethod::SpacedTray, rows: size_rows(&trays) },
        RacewaySizeTable { method: RacewayMethod::TriangularTray, rows: size_rows(&trays) },
    ]
}

fn impedance_rows() -> Vec<ImpedanceRow> {
    // Chapter 10, Table 9 (Ω/km): X (PVC/Al, steel), R Cu (PVC, Al, steel), R Al (PVC, Al, steel)
    type Row = (f64, f64, [f64; 3], Option<[f64; 3]>);
    let data: [Row; 21] = [
        (0.190, 0.240, [10.2, 10.2, 10.2], None),
        (0.177, 0.223, [6.6, 6.6, 6.6], Some([10.5, 10.5, 10.5])),
        (0.164, 0.207, [3.9, 3.9, 3.9], Some([6.6, 6.6, 6.6])),
        (0.171, 0.213, [2.56, 2.56, 2.56], Some([4.3, 4.3, 4.3])),
        (0.167, 0.210, [1.61, 1.61, 1.61], Some([2.66, 2.66, 2.66])),
        (0.157, 0.197, [1.02, 1.02, 1.02], Some([1.67, 1.67, 1.67])),
        (0.154, 0.194, [0.82, 0.82, 0.82], Some([1.31, 1.35, 1.31])),
        (0.148, 0.187, [0.62, 0.66, 0.66], Some([1.05, 1.05, 1.05])),
        (0.151, 0.187, [0.49, 0.52, 0.52], Some([0.82, 0.85, 0.82])),
        (0.144, 0.180, [0.39, 0.43, 0.39], Some([0.66, 0.69, 0.66])),
        (0.141, 0.177, [0.33, 0.33, 0.33], Some([0.52, 0.52, 0.52])),
        (0.138, 0.171, [0.253, 0.269, 0.259], Some([0.43, 0.43, 0.43])),
        (0.135, 0.167, [0.203, 0.220, 0.207], Some([0.33, 0.36, 0.33])),
        (0.135, 0.171, [0.171, 0.187, 0.177], Some([0.279, 0.295, 0.282])),
        (0.135, 0.167, [0.144, 0.161, 0.148], Some([0.233, 0.249, 0.236])),
        (0.131, 0.164, [0.125, 0.141, 0.128], Some([0.200, 0.217, 0.207])),
        (0.131, 0.161, [0.108, 0.125, 0.115], Some([0.177, 0.194, 0.180])),
        (0.128, 0.157, [0.089, 0.105, 0.095], Some([0.141, 0.157, 0.148])),
        (0.128, 0.157, [0.075, 0.092, 0.082], Some([0.118, 0.135, 0.125])),
        (0.125, 0.157, [0.062, 0.079, 0.069], Some([0.095, 0.112, 0.102])),
        (0.121, 0.151, [0.049, 0.062, 0.059], Some([0.075, 0.089, 0.082])),
    ];
    let columns = |[pvc, aluminum, steel]: [f64; 3]| ImpedanceColumns { pvc, aluminum, steel };
    Calibre::ALL
        .iter()
        .zip(data)
        .map(|(calibre, (x_non_magnetic, x_steel, cu, al))| ImpedanceRow {
            calibre: *calibre,
            reactance: ImpedanceColumns {
                pvc: x_non_magnetic,
                aluminum: x_non_magnetic,
                steel: x_steel,
            },
            copper: columns(cu),
            aluminum: al.map(columns),
        })
        .collect()
}

fn equipment_catalog() -> Vec<EquipmentRecord> {
    let amperage = |a: f64| EquipmentRating::Amperage { amperes: Amperes(a) };
    let power = |w: f64, pf: f64| EquipmentRating::Power {
        power: Watts(w),
        power_factor: pf,
    };
    let data = [
        ("AHF-60", "Active harmonic filter 60 A", EquipmentCategory::Filter, amperage(60.0)),
        ("AHF-100", "Active harmonic filter 100 A", EquipmentCategory::Filter, amperage(100.0)),
        ("AHF-150", "Active harmonic filter 150 A", EquipmentCategory::Filter, amperage(150.0)),
        ("AHF-300", "Active harmonic filter 300 A", EquipmentCategory::Filter, amperage(300.0)),
        ("TR-45", "Dry transformer 45 kVA", EquipmentCategory::Transformer, power(45_000.0, 1.0)),
        ("TR-75", "Dry transformer 75 kVA", EquipmentCategory::Transformer, power(75_000.0, 1.0)),
        ("TR-112.5", "Dry transformer 112.5 kVA", EquipmentCategory::Transformer, power(112_500.0, 1.0)),
        ("TR-225", "Dry transformer 225 kVA", EquipmentCategory::Transformer, power(225_000.0, 1.0)),
        ("MOT-50HP", "Induction motor 50 HP", EquipmentCategory::Load, power(37_300.0, 0.86)),
    ];
    data.into_iter()
        .map(|(key, description, category, rating)| EquipmentRecord {
            key: key.to_string(),
            description: description.to_string(),
            category,
            rating,
        })
        .collect()
}
