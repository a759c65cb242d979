//! # Raceway Sizing
//!
//! Three sizing rules, each ending in the smallest sufficient trade size:
//!
//! ## Conduit Fill (Chapter 10, Table 1)
//!
//! One conduit is sized for what it carries: its share of the phase and
//! neutral sets, its own ground, and every control cable.
//!
//! ```text
//! A_raceway   = Σ count × A_insulated      (counts within one conduit)
//! A_required  = A_raceway / F_r            F_r = 0.53 | 0.31 | 0.40
//! ```
//!
//! ## Spaced Tray (392-22(b))
//!
//! ```text
//! W = 2·(n·d_f) + 2·Σd_c + Σd_c + d_t      n = (phases + neutral) × parallel
//! ```
//!
//! ## Triangular Tray
//!
//! ```text
//! W = 2·d_f + (p − 1)·2.15·d_f + 2.15·Σd_c + Σd_c + d_t
//! ```
//!
//! d_f phase diameter, d_c control cable diameters, d_t ground diameter,
//! p parallel conductors per phase.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::conductors::Conductor;
use crate::errors::{CalcError, CalcResult};
use crate::installation::{RacewayMethod, Topology};
use crate::nom_factors::{conduit_fill_factor, nom_ref, TRIANGULAR_SPACING};
use crate::tables::{first_fit, LookupTables, RacewaySizeRow};

/// Conductors of one size inside one conduit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConductorGroup {
    /// What the group is, e.g. "phase + neutral"
    pub label: String,
    /// Conductors of the group in the conduit
    pub count: u32,
    /// Insulated area of one conductor (mm²)
    pub area_mm2: f64,
}

/// How the required size was derived
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum RacewayDetail {
    Conduit {
        /// Σ count × area in the sized conduit (mm²)
        raceway_area_mm2: f64,
        /// Conductors in the sized conduit, ground and control cables included
        conductors_per_raceway: u32,
        fill_factor: f64,
    },
    SpacedTray {
        /// Energized conductors laid side by side in one tray
        conductor_count: u32,
        phase_diameter_mm: f64,
        ground_diameter_mm: f64,
        control_diameter_sum_mm: f64,
    },
    TriangularTray {
        /// Triangular groups per phase in one tray
        parallel_per_tray: u32,
        phase_diameter_mm: f64,
        ground_diameter_mm: f64,
        control_diameter_sum_mm: f64,
    },
}

/// Selected raceway trade size
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RacewayResult {
    pub method: RacewayMethod,
    /// Trade size designation
    pub size_label: String,
    /// Interior area (mm²) for conduit, width (mm) for trays
    pub capacity: f64,
    /// Required area or width, same unit as `capacity`
    pub required: f64,
    pub raceways: u32,
    pub detail: RacewayDetail,
}

/// Everything raceway sizing needs from the rest of the calculation
#[derive(Debug, Clone)]
pub struct RacewaySizingInput<'a> {
    pub method: RacewayMethod,
    pub topology: Topology,
    pub parallel_per_phase: u32,
    pub raceways: u32,
    /// Selected phase (and neutral) conductor
    pub phase: &'a Conductor,
    pub ground: &'a Conductor,
    /// Outer diameters of control cables sharing the raceway (mm)
    pub control_diameters_mm: &'a [f64],
}

fn table_name(method: RacewayMethod) -> &'static str {
    if method.is_tray() {
        nom_ref::TRAY_FILL
    } else {
        nom_ref::CONDUIT_DIMENSIONS
    }
}

fn pick_size(
    rows: &[RacewaySizeRow],
    method: RacewayMethod,
    required: f64,
) -> CalcResult<&RacewaySizeRow> {
    let unit = if method.is_tray() { "mm" } else { "mm²" };
    first_fit(rows, required, |r| r.capacity)
        .ok_or_else(|| CalcError::no_fit(format!("{} ({})", table_name(method), method), required, unit))
}

/// Size a conduit by fill.
///
/// `groups` are the contents of one conduit, its grounding conductor
/// included; `raceways` is carried into the result.
pub fn size_conduit(
    rows: &[RacewaySizeRow],
    method: RacewayMethod,
    groups: &[ConductorGroup],
    raceways: u32,
) -> CalcResult<RacewayResult> {
    if raceways < 1 {
        return Err(CalcError::InvalidRacewayCount { count: raceways });
    }
    if groups.is_empty() || groups.iter().all(|g| g.count == 0) {
        return Err(CalcError::EmptyConductorList);
    }

    let raceway_area_mm2: f64 = groups.iter().map(|g| g.count as f64 * g.area_mm2).sum();
    let conductors_per_raceway: u32 = groups.iter().map(|g| g.count).sum();
    let fill_factor = conduit_fill_factor(conductors_per_raceway);
    let required = raceway_area_mm2 / fill_factor;

    let row = pick_size(rows, method, required)?;

    Ok(RacewayResult {
        method,
        size_label: row.label.clone(),
        capacity: row.capacity,
        required,
        raceways,
        detail: RacewayDetail::Conduit {
            raceway_area_mm2,
            conductors_per_raceway,
            fill_factor,
        },
    })
}

/// Required width (mm) of a tray with spaced single conductors
pub fn spaced_tray_width(
    conductor_count: u32,
    phase_diameter_mm: f64,
    control_diameters_mm: &[f64],
    ground_diameter_mm: f64,
) -> f64 {
    let control: f64 = control_diameters_mm.iter().sum();
    2.0 * (conductor_count as f64 * phase_diameter_mm) + 2.0 * control + control + ground_diameter_mm
}

/// Required width (mm) of a tray with conductors in triangular groups
pub fn triangular_tray_width(
    parallel_per_phase: u32,
    phase_diameter_mm: f64,
    control_diameters_mm: &[f64],
    ground_diameter_mm: f64,
) -> f64 {
    let control: f64 = control_diameters_mm.iter().sum();
    let extra_groups = parallel_per_phase.saturating_sub(1) as f64;
    2.0 * phase_diameter_mm
        + extra_groups * TRIANGULAR_SPACING * phase_diameter_mm
        + TRIANGULAR_SPACING * control
        + control
        + ground_diameter_mm
}

/// Smallest tray whose width covers `required_mm`
pub fn size_tray(
    rows: &[RacewaySizeRow],
    method: RacewayMethod,
    required_mm: f64,
    raceways: u32,
    detail: RacewayDetail,
) -> CalcResult<RacewayResult> {
    let row = pick_size(rows, method, required_mm)?;
    Ok(RacewayResult {
        method,
        size_label: row.label.clone(),
        capacity: row.capacity,
        required: required_mm,
        raceways,
        detail,
    })
}

fn validate_diameters(control_diameters_mm: &[f64]) -> CalcResult<()> {
    match control_diameters_mm.iter().find(|d| !d.is_finite() || **d <= 0.0) {
        Some(d) => Err(CalcError::invalid_input(
            "control_cable_diameters_mm",
            d.to_string(),
            "Control cable diameters must be positive",
        )),
        None => Ok(()),
    }
}

/// Size the raceway for the selected conductors, dispatching on method.
pub fn size_raceway(
    tables: &dyn LookupTables,
    input: &RacewaySizingInput<'_>,
) -> CalcResult<RacewayResult> {
    if input.raceways < 1 {
        return Err(CalcError::InvalidRacewayCount { count: input.raceways });
    }
    if input.parallel_per_phase < 1 {
        return Err(CalcError::InvalidParallelCount {
            count: input.parallel_per_phase,
        });
    }
    validate_diameters(input.control_diameters_mm)?;

    let rows = tables
        .raceway_sizes(input.method)
        .ok_or_else(|| CalcError::lookup_miss(table_name(input.method), input.method.to_string()))?;

    // Parallel sets are spread over the raceways; each carries its own ground.
    let parallel_per_raceway = input.parallel_per_phase.div_ceil(input.raceways);
    let phase_d = input.phase.outer_diameter_mm;
    let ground_d = input.ground.outer_diameter_mm;
    let control_sum: f64 = input.control_diameters_mm.iter().sum();

    let result = match input.method {
        RacewayMethod::SpacedTray => {
            let conductor_count = input.topology.conductor_count() * parallel_per_raceway;
            let width = spaced_tray_width(conductor_count, phase_d, input.control_diameters_mm, ground_d);
            size_tray(
                rows,
                input.method,
                width,
                input.raceways,
                RacewayDetail::SpacedTray {
                    conductor_count,
                    phase_diameter_mm: phase_d,
                    ground_diameter_mm: ground_d,
                    control_diameter_sum_mm: control_sum,
                },
            )?
        }
        RacewayMethod::TriangularTray => {
            let width = triangular_tray_width(parallel_per_raceway, phase_d, input.control_diameters_mm, ground_d);
            size_tray(
                rows,
                input.method,
                width,
                input.raceways,
                RacewayDetail::TriangularTray {
                    parallel_per_tray: parallel_per_raceway,
                    phase_diameter_mm: phase_d,
                    ground_diameter_mm: ground_d,
                    control_diameter_sum_mm: control_sum,
                },
            )?
        }
        _ => {
            let mut groups = vec![
                ConductorGroup {
                    label: format!("{} phase/neutral", input.phase.calibre),
                    count: input.topology.conductor_count() * parallel_per_raceway,
                    area_mm2: input.phase.insulated_area_mm2,
                },
                ConductorGroup {
                    label: format!("{} ground", input.ground.calibre),
                    count: 1,
                    area_mm2: input.ground.insulated_area_mm2,
                },
            ];
            groups.extend(input.control_diameters_mm.iter().map(|d| ConductorGroup {
                label: format!("control cable Ø{:.1} mm", d),
                count: 1,
                area_mm2: std::f64::consts::PI * d * d / 4.0,
            }));
            size_conduit(rows, input.method, &groups, input.raceways)?
        }
    };

    debug!(
        method = %result.method,
        size = %result.size_label,
        required = result.required,
        capacity = result.capacity,
        "raceway sized"
    );
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conductors::{Calibre, ConductorMaterial, Insulation};
    use crate::tables::nom_tables;

    fn conductor(calibre: Calibre) -> Conductor {
        Conductor::new(calibre, ConductorMaterial::Copper, Insulation::ThhwLs).unwrap()
    }

    fn rows(method: RacewayMethod) -> &'static [RacewaySizeRow] {
        nom_tables().raceway_sizes(method).unwrap()
    }

    fn group(count: u32, area_mm2: f64) -> ConductorGroup {
        ConductorGroup {
            label: "test".to_string(),
            count,
            area_mm2,
        }
    }

    #[test]
    fn test_conduit_fill_three_or_more() {
        // 4 × 30 + 1 × 20 = 140 mm², 5 conductors → 0.40 → 350 mm²
        let r = size_conduit(
            rows(RacewayMethod::ConduitPvc),
            RacewayMethod::ConduitPvc,
            &[group(4, 30.0), group(1, 20.0)],
            1,
        )
        .unwrap();
        assert!((r.required - 350.0).abs() < 1e-9);
        assert_eq!(r.capacity, 535.0);
        assert!(r.size_label.starts_with("27"));
    }

    #[test]
    fn test_conduit_fill_single_conductor() {
        let r = size_conduit(rows(RacewayMethod::ConduitPvc), RacewayMethod::ConduitPvc, &[group(1, 53.0)], 1).unwrap();
        match r.detail {
            RacewayDetail::Conduit { fill_factor, .. } => assert_eq!(fill_factor, 0.53),
            _ => panic!("expected conduit detail"),
        }
        assert!((r.required - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_conduit_groups_are_one_raceway() {
        // 4 conductors in the conduit → 0.40; the raceway count does not divide
        let r = size_conduit(rows(RacewayMethod::ConduitPvc), RacewayMethod::ConduitPvc, &[group(4, 100.0)], 2).unwrap();
        match r.detail {
            RacewayDetail::Conduit {
                raceway_area_mm2,
                conductors_per_raceway,
                ..
            } => {
                assert_eq!(raceway_area_mm2, 400.0);
                assert_eq!(conductors_per_raceway, 4);
            }
            _ => panic!("expected conduit detail"),
        }
        assert_eq!(r.raceways, 2);
        assert_eq!(r.capacity, 1282.0);
    }

    #[test]
    fn test_control_cable_charged_in_full_with_parallel_conduits() {
        let phase = conductor(Calibre::Awg4_0);
        let ground = conductor(Calibre::Awg4);
        let input = RacewaySizingInput {
            method: RacewayMethod::ConduitPvc,
            topology: Topology::Wye,
            parallel_per_phase: 2,
            raceways: 2,
            phase: &phase,
            ground: &ground,
            control_diameters_mm: &[20.0],
        };
        let r = size_raceway(nom_tables(), &input).unwrap();
        let control_area = std::f64::consts::PI * 20.0 * 20.0 / 4.0;
        match r.detail {
            RacewayDetail::Conduit {
                raceway_area_mm2,
                conductors_per_raceway,
                fill_factor,
            } => {
                // one set of 4 per conduit, its ground and the whole control cable
                assert_eq!(conductors_per_raceway, 6);
                let expected = 4.0 * phase.insulated_area_mm2 + ground.insulated_area_mm2 + control_area;
                assert!((raceway_area_mm2 - expected).abs() < 1e-9);
                assert_eq!(fill_factor, 0.40);
            }
            _ => panic!("expected conduit detail"),
        }
        assert!(r.capacity >= r.required);
    }

    #[test]
    fn test_conduit_errors() {
        let pvc = rows(RacewayMethod::ConduitPvc);
        assert_eq!(
            size_conduit(pvc, RacewayMethod::ConduitPvc, &[], 1).unwrap_err(),
            CalcError::EmptyConductorList
        );
        assert!(matches!(
            size_conduit(pvc, RacewayMethod::ConduitPvc, &[group(3, 10.0)], 0),
            Err(CalcError::InvalidRacewayCount { count: 0 })
        ));
        assert!(matches!(
            size_conduit(pvc, RacewayMethod::ConduitPvc, &[group(40, 1000.0)], 1),
            Err(CalcError::NoFit { .. })
        ));
    }

    #[test]
    fn test_spaced_tray_width_formula() {
        // 2·(4·10) + 3·(5 + 5) + 8 = 118
        let w = spaced_tray_width(4, 10.0, &[5.0, 5.0], 8.0);
        assert!((w - 118.0).abs() < 1e-9);
    }

    #[test]
    fn test_triangular_tray_width_formula() {
        // 2·20 + 1·2.15·20 + 2.15·6 + 6 + 9 = 110.9
        let w = triangular_tray_width(2, 20.0, &[6.0], 9.0);
        assert!((w - 110.9).abs() < 1e-9);
        // single group, no control cables
        assert!((triangular_tray_width(1, 20.0, &[], 9.0) - 49.0).abs() < 1e-9);
    }

    #[test]
    fn test_size_raceway_conduit_includes_ground() {
        let phase = conductor(Calibre::Awg6);
        let ground = conductor(Calibre::Awg8);
        let input = RacewaySizingInput {
            method: RacewayMethod::ConduitPvc,
            topology: Topology::SinglePhase,
            parallel_per_phase: 1,
            raceways: 1,
            phase: &phase,
            ground: &ground,
            control_diameters_mm: &[],
        };
        let r = size_raceway(nom_tables(), &input).unwrap();
        match r.detail {
            RacewayDetail::Conduit {
                conductors_per_raceway,
                raceway_area_mm2,
                ..
            } => {
                assert_eq!(conductors_per_raceway, 3);
                let expected = 2.0 * phase.insulated_area_mm2 + ground.insulated_area_mm2;
                assert!((raceway_area_mm2 - expected).abs() < 1e-9);
            }
            _ => panic!("expected conduit detail"),
        }
        assert!(r.capacity >= r.required);
    }

    #[test]
    fn test_size_raceway_spaced_tray() {
        let phase = conductor(Calibre::Awg4_0);
        let ground = conductor(Calibre::Awg4);
        let input = RacewaySizingInput {
            method: RacewayMethod::SpacedTray,
            topology: Topology::Wye,
            parallel_per_phase: 2,
            raceways: 1,
            phase: &phase,
            ground: &ground,
            control_diameters_mm: &[],
        };
        let r = size_raceway(nom_tables(), &input).unwrap();
        let expected = 2.0 * (8.0 * phase.outer_diameter_mm) + ground.outer_diameter_mm;
        assert!((r.required - expected).abs() < 1e-9);
        assert!(r.capacity >= r.required);
        assert!(r.size_label.ends_with("mm"));
    }

    #[test]
    fn test_size_raceway_rejects_bad_control_diameter() {
        let phase = conductor(Calibre::Awg6);
        let ground = conductor(Calibre::Awg8);
        let input = RacewaySizingInput {
            method: RacewayMethod::TriangularTray,
            topology: Topology::Delta,
            parallel_per_phase: 1,
            raceways: 1,
            phase: &phase,
            ground: &ground,
            control_diameters_mm: &[-1.0],
        };
        assert!(matches!(size_raceway(nom_tables(), &input), Err(CalcError::InvalidInput { .. })));
    }
}
