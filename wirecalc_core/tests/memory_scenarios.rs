//! End-to-end calculation memories through the public API.

use wirecalc_core::calculations::conductor::{select_feeder, select_feeder_for, select_ground_for};
use wirecalc_core::calculations::current::{nominal_current, EquipmentRating, EquipmentSource};
use wirecalc_core::calculations::raceway::{spaced_tray_width, triangular_tray_width, RacewayDetail};
use wirecalc_core::conductors::{Calibre, ConductorMaterial, TemperatureRating};
use wirecalc_core::equations::Equation;
use wirecalc_core::installation::{RacewayMethod, Topology, VoltageReference};
use wirecalc_core::nom_factors::EquipmentCategory;
use wirecalc_core::units::{Amperes, Volts, Watts};
use wirecalc_core::tables::{GroupingFactorRow, TemperatureFactorRow};
use wirecalc_core::{
    calculate_memory, nom_tables, CalcError, CircuitInput, GlobalSettings, LookupTables, Stage, TableSet,
};

fn circuit(label: &str, equipment: EquipmentSource, topology: Topology, voltage: f64) -> CircuitInput {
    CircuitInput {
        label: label.to_string(),
        equipment,
        category: EquipmentCategory::Load,
        topology,
        voltage: Volts(voltage),
        voltage_reference: None,
        state: "Aguascalientes".to_string(),
        raceway: RacewayMethod::ConduitPvc,
        breaker_a: 100.0,
        length_m: 10.0,
        material: ConductorMaterial::Copper,
        parallel_per_phase: 1,
        raceways: 1,
        max_voltage_drop_percent: None,
        temperature_override: None,
        control_cable_diameters_mm: Vec::new(),
        drop_method: None,
    }
}

fn manual_amperes(a: f64) -> EquipmentSource {
    EquipmentSource::Manual(EquipmentRating::Amperage { amperes: Amperes(a) })
}

fn catalog(key: &str) -> EquipmentSource {
    EquipmentSource::Catalog { key: key.to_string() }
}

fn assert_close(actual: f64, expected: f64, tol: f64) {
    assert!((actual - expected).abs() < tol, "expected {expected}, got {actual}");
}

/// Bundled tables with every temperature and grouping factor at 1.0
fn unity_tables() -> TableSet {
    let mut tables = TableSet::nom_reference();
    tables.temperature_factors = vec![TemperatureFactorRow {
        ambient_min_c: -40,
        ambient_max_c: 80,
        factor_60: Some(1.0),
        factor_75: Some(1.0),
        factor_90: Some(1.0),
    }];
    tables.grouping_factors = vec![GroupingFactorRow {
        min_conductors: 1,
        max_conductors: None,
        factor: 1.0,
    }];
    tables
}

#[test]
fn manual_amperage_50a_pvc() {
    // F_u is fixed by category (1.25 for a load), so a 40 A nameplate gives
    // the 50 A design current once the table factors are unity.
    let tables = unity_tables();
    let input = circuit("C-50", manual_amperes(40.0), Topology::SinglePhase, 127.0);
    let report = calculate_memory(&tables, &input, &GlobalSettings::default()).unwrap();

    assert_eq!(report.nominal_current, Amperes(40.0));
    assert_eq!(report.temperature_rating, TemperatureRating::C60);
    assert_eq!(report.adjustment.usage_factor, 1.25);
    assert_eq!(report.adjustment.temperature_factor, 1.0);
    assert_eq!(report.adjustment.grouping_factor, 1.0);
    assert_close(report.adjustment.adjusted.0, 50.0, 1e-9);

    // the 55 A row is the first to carry 50 A
    assert_eq!(report.feeder.conductor.calibre, Calibre::Awg6);
    assert_eq!(report.feeder.ampacity_a, 55.0);
    assert_eq!(report.ground.conductor.calibre, Calibre::Awg8);
    assert_eq!(report.ground.breaker_ceiling_a, 100.0);
    assert!(!report.ground.fell_back_to_copper);
    assert!(report.compliant);

    // a 50 A nameplate carries the usage factor on top: 62.5 A → 70 A row
    let input = circuit("C-50b", manual_amperes(50.0), Topology::SinglePhase, 127.0);
    let report = calculate_memory(&tables, &input, &GlobalSettings::default()).unwrap();
    assert_close(report.adjustment.adjusted.0, 62.5, 1e-9);
    assert_eq!(report.feeder.conductor.calibre, Calibre::Awg4);
    assert_eq!(report.feeder.ampacity_a, 70.0);
}

#[test]
fn bundled_60c_row_for_50a() {
    let rows = nom_tables()
        .ampacity_table(RacewayMethod::ConduitPvc, ConductorMaterial::Copper, TemperatureRating::C60)
        .unwrap();
    let feeder = select_feeder(rows, Amperes(50.0), 1).unwrap();
    assert_eq!(feeder.conductor.calibre, Calibre::Awg6);
    assert_eq!(feeder.ampacity_a, 55.0);
}

#[test]
fn wye_described_either_way_gives_same_memory() {
    let power = || {
        EquipmentSource::Manual(EquipmentRating::Power {
            power: Watts(37_300.0),
            power_factor: 0.86,
        })
    };
    let mut ff = circuit("M-FF", power(), Topology::Wye, 440.0);
    ff.state = "Querétaro".to_string();
    ff.length_m = 80.0;
    ff.voltage_reference = Some(VoltageReference::PhaseToPhase);
    let mut fn_ = ff.clone();
    fn_.label = "M-FN".to_string();
    fn_.voltage = Volts(254.0);
    fn_.voltage_reference = Some(VoltageReference::PhaseToNeutral);
    let mut unset = ff.clone();
    unset.voltage_reference = None;

    let settings = GlobalSettings::default();
    let a = calculate_memory(nom_tables(), &ff, &settings).unwrap();
    let b = calculate_memory(nom_tables(), &fn_, &settings).unwrap();
    let c = calculate_memory(nom_tables(), &unset, &settings).unwrap();

    // 254 V is 440 / √3 rounded to the volt
    let rel = |x: f64, y: f64| (x - y).abs() / y;
    assert!(rel(b.nominal_current.0, a.nominal_current.0) < 1e-3);
    assert!(rel(b.voltage_drop.percent, a.voltage_drop.percent) < 1e-3);
    assert_eq!(a.feeder.conductor.calibre, b.feeder.conductor.calibre);
    assert_eq!(a.raceway.size_label, b.raceway.size_label);
    assert_eq!(b.voltage_drop.reference, VoltageReference::PhaseToNeutral);
    assert_eq!(a.voltage_drop.reference, VoltageReference::PhaseToNeutral);

    assert_eq!(c.nominal_current, a.nominal_current);
    assert_eq!(c.voltage_drop, a.voltage_drop);
}

#[test]
fn catalog_harmonic_filter() {
    let mut input = circuit("AHF-01", catalog("ahf-100"), Topology::Delta, 480.0);
    input.state = "Nuevo Leon".to_string();
    input.raceway = RacewayMethod::ConduitSteelThin;
    input.breaker_a = 150.0;
    input.length_m = 35.0;

    let report = calculate_memory(nom_tables(), &input, &GlobalSettings::default()).unwrap();

    assert_eq!(report.equipment.category, EquipmentCategory::Filter);
    assert_eq!(report.equipment.description, "Active harmonic filter 100 A");
    assert_eq!(report.nominal_current, Amperes(100.0));
    assert_eq!(report.temperature_rating, TemperatureRating::C60);
    assert_eq!(report.ambient_c, 40);

    let adj = &report.adjustment;
    assert_eq!(adj.usage_factor, 1.35);
    assert_eq!(adj.temperature_factor, 0.82);
    assert_eq!(adj.grouping_factor, 0.70);
    assert_close(adj.adjusted.0, 100.0 * 1.35 / (0.82 * 0.70), 1e-9);

    assert_eq!(report.feeder.conductor.calibre, Calibre::Kcmil300);
    assert_eq!(report.ground.conductor.calibre, Calibre::Awg6);
    assert!(matches!(report.raceway.detail, RacewayDetail::Conduit { .. }));
    assert!(report.raceway.capacity >= report.raceway.required);

    let eqs: Vec<Equation> = report.equations.iter().map(|u| u.equation).collect();
    assert!(!eqs.contains(&Equation::NominalCurrentThreePhase));
    assert!(eqs.contains(&Equation::ConduitFill));
}

#[test]
fn three_phase_power_input() {
    let equipment = EquipmentSource::Manual(EquipmentRating::Power {
        power: Watts(37_300.0),
        power_factor: 0.86,
    });
    let mut input = circuit("M-1", equipment, Topology::Wye, 440.0);
    input.state = "Querétaro".to_string();

    let report = calculate_memory(nom_tables(), &input, &GlobalSettings::default()).unwrap();

    let expected = 37_300.0 / (3f64.sqrt() * 440.0 * 0.86);
    assert_close(report.nominal_current.0, expected, 1e-9);
    assert_eq!(report.adjustment.grouping_factor, 0.60);
    assert!(report.feeder.ampacity_a >= report.feeder.per_conductor_current.0);

    let eqs: Vec<Equation> = report.equations.iter().map(|u| u.equation).collect();
    assert_eq!(eqs.first(), Some(&Equation::NominalCurrentThreePhase));

    let direct = nominal_current(
        &EquipmentRating::Power {
            power: Watts(37_300.0),
            power_factor: 0.86,
        },
        Topology::Wye,
        Volts(440.0),
    )
    .unwrap();
    assert_eq!(direct, report.nominal_current);
}

#[test]
fn spaced_tray_transformer() {
    let mut input = circuit("TR-01", catalog("TR-112.5"), Topology::Delta, 480.0);
    input.state = "Nuevo León".to_string();
    input.raceway = RacewayMethod::SpacedTray;
    input.breaker_a = 175.0;
    input.length_m = 45.0;
    input.control_cable_diameters_mm = vec![12.5];

    let report = calculate_memory(nom_tables(), &input, &GlobalSettings::default()).unwrap();

    // Above 100 A the 75 °C column applies
    assert_eq!(report.temperature_rating, TemperatureRating::C75);
    assert_eq!(report.adjustment.grouping_factor, 1.0);
    assert_eq!(report.adjustment.temperature_factor, 0.88);

    match report.raceway.detail {
        RacewayDetail::SpacedTray {
            conductor_count,
            phase_diameter_mm,
            ground_diameter_mm,
            control_diameter_sum_mm,
        } => {
            assert_eq!(conductor_count, 3);
            assert_eq!(control_diameter_sum_mm, 12.5);
            let width = spaced_tray_width(3, phase_diameter_mm, &[12.5], ground_diameter_mm);
            assert_close(report.raceway.required, width, 1e-9);
        }
        other => panic!("expected spaced tray detail, got {other:?}"),
    }
    assert!(report.raceway.capacity >= report.raceway.required);
    assert!(report
        .equations
        .iter()
        .any(|u| u.equation == Equation::SpacedTrayWidth));
}

#[test]
fn triangular_tray_parallel_sets() {
    let mut input = circuit("AHF-02", catalog("AHF-300"), Topology::Wye, 480.0);
    input.state = "Sonora".to_string();
    input.raceway = RacewayMethod::TriangularTray;
    input.breaker_a = 400.0;
    input.length_m = 60.0;
    input.parallel_per_phase = 2;

    let report = calculate_memory(nom_tables(), &input, &GlobalSettings::default()).unwrap();

    assert_eq!(report.temperature_rating, TemperatureRating::C75);
    assert_close(report.adjustment.adjusted.0, 300.0 * 1.35 / 0.82, 1e-9);
    assert_eq!(report.feeder.parallel_per_phase, 2);
    assert_eq!(report.feeder.conductor.calibre, Calibre::Awg4_0);
    assert_eq!(report.ground.conductor.calibre, Calibre::Awg3);

    match report.raceway.detail {
        RacewayDetail::TriangularTray {
            parallel_per_tray,
            phase_diameter_mm,
            ground_diameter_mm,
            ..
        } => {
            assert_eq!(parallel_per_tray, 2);
            let width = triangular_tray_width(2, phase_diameter_mm, &[], ground_diameter_mm);
            assert_close(report.raceway.required, width, 1e-9);
        }
        other => panic!("expected triangular tray detail, got {other:?}"),
    }
}

#[test]
fn failures_carry_their_stage() {
    let settings = GlobalSettings::default();

    let input = circuit("X", catalog("NOPE-1"), Topology::SinglePhase, 220.0);
    let err = calculate_memory(nom_tables(), &input, &settings).unwrap_err();
    assert_eq!(err.stage(), Some(Stage::NominalCurrent));
    assert!(matches!(err.root_cause(), CalcError::LookupMiss { .. }));

    let mut input = circuit("X", manual_amperes(10.0), Topology::SinglePhase, 220.0);
    input.breaker_a = 7000.0;
    let err = calculate_memory(nom_tables(), &input, &settings).unwrap_err();
    assert_eq!(err.stage(), Some(Stage::GroundConductor));
    assert!(err.to_string().starts_with("step 7 (ground conductor selection):"));

    let mut input = circuit("X", manual_amperes(10.0), Topology::SinglePhase, 220.0);
    input.length_m = 0.0;
    let err = calculate_memory(nom_tables(), &input, &settings).unwrap_err();
    assert_eq!(err.stage(), Some(Stage::Validation));
    assert_eq!(err.error_code(), "INVALID_LENGTH");

    // 1500 A per phase exceeds every single conductor
    let input = circuit("X", manual_amperes(1500.0), Topology::SinglePhase, 220.0);
    let err = calculate_memory(nom_tables(), &input, &settings).unwrap_err();
    assert_eq!(err.stage(), Some(Stage::FeederConductor));
}

#[test]
fn aluminum_ground_falls_back_to_copper() {
    let mut input = circuit("AL-1", manual_amperes(20.0), Topology::SinglePhase, 220.0);
    input.material = ConductorMaterial::Aluminum;
    input.breaker_a = 40.0;

    let report = calculate_memory(nom_tables(), &input, &GlobalSettings::default()).unwrap();
    assert_eq!(report.feeder.conductor.material, ConductorMaterial::Aluminum);
    assert_eq!(report.ground.conductor.material, ConductorMaterial::Copper);
    assert_eq!(report.ground.conductor.calibre, Calibre::Awg10);
    assert!(report.ground.fell_back_to_copper);

    let direct = select_ground_for(nom_tables(), 150.0, ConductorMaterial::Aluminum).unwrap();
    assert_eq!(direct.conductor.material, ConductorMaterial::Aluminum);
    assert!(!direct.fell_back_to_copper);
}

#[test]
fn selected_feeder_carries_its_share() {
    let tables = nom_tables();
    for method in RacewayMethod::ALL {
        for rating in [TemperatureRating::C75, TemperatureRating::C90] {
            let rows = tables
                .ampacity_table(method, ConductorMaterial::Copper, rating)
                .unwrap();
            for parallel in 1..=3u32 {
                for amps in [12.0, 48.0, 99.0, 180.0, 333.0, 760.0] {
                    let Ok(feeder) = select_feeder_for(
                        tables,
                        Amperes(amps),
                        parallel,
                        method,
                        ConductorMaterial::Copper,
                        rating,
                    ) else {
                        continue;
                    };
                    let share = amps / parallel as f64;
                    assert!(feeder.ampacity_a >= share);
                    assert_close(feeder.per_conductor_current.0, share, 1e-9);
                    // No smaller row would have sufficed
                    let index = rows
                        .iter()
                        .position(|r| r.conductor.calibre == feeder.conductor.calibre)
                        .unwrap();
                    if index > 0 {
                        assert!(rows[index - 1].capacity_a < share);
                    }
                }
            }
        }
    }
}

#[test]
fn tables_from_json_give_same_memory() {
    let json = serde_json::to_string(nom_tables()).unwrap();
    let tables = TableSet::from_json(&json).unwrap();
    let input = circuit("C-1", manual_amperes(50.0), Topology::SinglePhase, 220.0);

    let bundled = calculate_memory(nom_tables(), &input, &GlobalSettings::default()).unwrap();
    let loaded = calculate_memory(&tables, &input, &GlobalSettings::default()).unwrap();
    assert_eq!(bundled, loaded);
}

#[test]
fn circuits_share_tables_across_threads() {
    let tables = nom_tables();
    let settings = GlobalSettings::default();
    let currents = [20.0, 45.0, 80.0, 140.0];

    let reports: Vec<_> = std::thread::scope(|scope| {
        let handles: Vec<_> = currents
            .iter()
            .map(|a| {
                let input = circuit("P", manual_amperes(*a), Topology::Wye, 220.0);
                let settings = &settings;
                scope.spawn(move || calculate_memory(tables, &input, settings).unwrap())
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    for (report, a) in reports.iter().zip(currents) {
        let serial = calculate_memory(tables, &circuit("P", manual_amperes(a), Topology::Wye, 220.0), &settings).unwrap();
        assert_eq!(report, &serial);
    }
}
