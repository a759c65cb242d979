//! # PDF Generation Module
//!
//! Renders calculation memories to PDF using Typst.
//!
//! ## Architecture
//!
//! - Typst templates are embedded as string constants
//! - Report values are injected by `{{PLACEHOLDER}}` replacement before compilation
//! - Each circuit gets its own section; the equations applied across all
//!   circuits are listed in a closing appendix
//! - Output is raw PDF bytes (`Vec<u8>`)
//!
//! ## Example
//!
//! ```rust,no_run
//! use wirecalc_core::calculations::memory::{calculate_memory, CircuitInput};
//! use wirecalc_core::pdf::render_memory_pdf;
//! use wirecalc_core::settings::{GlobalSettings, ReportMetadata};
//! use wirecalc_core::tables::nom_tables;
//!
//! let input: CircuitInput = serde_json::from_str(r#"{
//!     "label": "AHF-01",
//!     "equipment": { "source": "catalog", "key": "AHF-100" },
//!     "topology": "delta",
//!     "voltage": 480.0,
//!     "state": "Nuevo León",
//!     "raceway": "conduit-steel-thin",
//!     "breaker_a": 150.0,
//!     "length_m": 35.0
//! }"#).unwrap();
//! let report = calculate_memory(nom_tables(), &input, &GlobalSettings::default()).unwrap();
//! let meta = ReportMetadata::new("Ing. R. Salas", "25-042", "Planta Norte");
//! let pdf_bytes = render_memory_pdf(&report, &meta).unwrap();
//! std::fs::write("memoria.pdf", pdf_bytes).unwrap();
//! ```

use chrono::{DateTime, Datelike, Utc};
use tracing::debug;
use typst::diag::{FileError, FileResult};
use typst::foundations::{Bytes, Datetime};
use typst::syntax::{FileId, Source};
use typst::text::{Font, FontBook};
use typst::utils::LazyHash;
use typst::{Library, LibraryExt, World};
use typst_pdf::PdfOptions;

use crate::calculations::current::EquipmentRating;
use crate::calculations::memory::MemoryReport;
use crate::calculations::raceway::RacewayDetail;
use crate::equations::EquationTracker;
use crate::errors::{CalcError, CalcResult};
use crate::settings::ReportMetadata;

// ============================================================================
// Typst World Implementation
// ============================================================================

/// A minimal Typst world for compiling documents without external files.
struct PdfWorld {
    main: Source,
    book: LazyHash<FontBook>,
    fonts: Vec<Font>,
    library: LazyHash<Library>,
    /// Date reported to `datetime.today()`
    today: DateTime<Utc>,
}

impl PdfWorld {
    fn new(source: String, today: DateTime<Utc>) -> Self {
        let fonts = Self::load_fonts();
        let book = FontBook::from_fonts(&fonts);

        PdfWorld {
            main: Source::detached(source),
            book: LazyHash::new(book),
            fonts,
            library: LazyHash::new(Library::default()),
            today,
        }
    }

    /// Fonts bundled with typst-assets
    fn load_fonts() -> Vec<Font> {
        typst_assets::fonts()
            .flat_map(|data| Font::iter(Bytes::new(data.to_vec())))
            .collect()
    }
}

impl World for PdfWorld {
    fn library(&self) -> &LazyHash<Library> {
        &self.library
    }

    fn book(&self) -> &LazyHash<FontBook> {
        &self.book
    }

    fn main(&self) -> FileId {
        self.main.id()
    }

    fn source(&self, id: FileId) -> FileResult<Source> {
        if id == self.main.id() {
            Ok(self.main.clone())
        } else {
            Err(FileError::NotFound(id.vpath().as_rootless_path().into()))
        }
    }

    fn file(&self, id: FileId) -> FileResult<Bytes> {
        Err(FileError::NotFound(id.vpath().as_rootless_path().into()))
    }

    fn font(&self, index: usize) -> Option<Font> {
        self.fonts.get(index).cloned()
    }

    fn today(&self, _offset: Option<i64>) -> Option<Datetime> {
        Datetime::from_ymd(
            self.today.year(),
            u8::try_from(self.today.month()).ok()?,
            u8::try_from(self.today.day()).ok()?,
        )
    }
}

// ============================================================================
// PDF Templates
// ============================================================================

/// Page setup and title block, once per document
const DOCUMENT_TEMPLATE: &str = r##"
#set page(
  paper: "us-letter",
  margin: (top: 1in, bottom: 1in, left: 0.9in, right: 0.9in),
  header: align(right)[
    #text(size: 9pt, fill: gray)[Wirecalc Electrical Calculation Memory]
  ],
  footer: context [
    #line(length: 100%, stroke: 0.5pt + gray)
    #v(4pt)
    #grid(
      columns: (1fr, 1fr, 1fr),
      align(left)[#text(size: 9pt)[Job: {{JOB_ID}}]],
      align(center)[#text(size: 9pt)[Page #counter(page).display()]],
      align(right)[#text(size: 9pt)[{{DATE}}]],
    )
  ]
)

#set text(size: 10.5pt)

#align(center)[
  #block(width: 100%, fill: rgb("#f0f0f0"), inset: 12pt, radius: 4pt)[
    #text(size: 18pt, weight: "bold")[Calculation Memory]
    #v(4pt)
    #text(size: 12pt)[Conductor, raceway and voltage drop sizing]
  ]
]

#v(12pt)

#grid(
  columns: (1fr, 1fr),
  gutter: 20pt,
  [
    *Project Information*
    #v(4pt)
    #table(
      columns: (auto, 1fr),
      stroke: none,
      row-gutter: 4pt,
      [Engineer:], [{{ENGINEER}}],
      [Job ID:], [{{JOB_ID}}],
      [Client:], [{{CLIENT}}],
      [Date:], [{{DATE}}],
    )
  ],
  [
    *Code Reference*
    #v(4pt)
    {{CODE}} \
    Instalaciones Eléctricas (utilización)
  ]
)

#v(12pt)

== Circuit Summary

#table(
  columns: (auto, 1fr, auto, auto, auto, auto),
  inset: 6pt,
  stroke: 0.5pt,
  align: (center, left, left, left, right, center),
  table.header([*\#*], [*Circuit*], [*Feeder*], [*Raceway*], [*ΔV %*], [*Status*]),
{{SUMMARY_ROWS}}
)
"##;

/// One section per circuit
const CIRCUIT_TEMPLATE: &str = r##"
#pagebreak()

#align(center)[
  #block(width: 100%, fill: rgb("#f0f0f0"), inset: 10pt, radius: 4pt)[
    #text(size: 15pt, weight: "bold")[{{LABEL}}]
    #v(2pt)
    #text(size: 11pt)[{{DESCRIPTION}}]
  ]
]

#v(10pt)

== Installation Data

#table(
  columns: (1fr, auto),
  inset: 6pt,
  stroke: 0.5pt,
  align: (left, right),
  table.header([*Parameter*], [*Value*]),
  [Equipment category], [{{CATEGORY}}],
  [Equipment rating], [{{RATING}}],
  [System], [{{TOPOLOGY}}],
  [Nominal voltage], [{{VOLTAGE}} V {{VOLTAGE_REF}}],
  [State / design ambient], [{{STATE}} / {{AMBIENT}} °C],
  [Installation method], [{{RACEWAY_METHOD}}],
  [Protective device (ITM)], [{{BREAKER}} A],
  [Run length], [{{LENGTH}} m],
  [Sets in parallel per phase], [{{PARALLEL}}],
  [Raceways], [{{RACEWAYS}}],
)

== Nominal Current and Adjustment

{{NOMINAL_BLOCK}}

Ampacity column: *{{RATING_C}}* ({{RATING_SOURCE}}).

#table(
  columns: (1fr, auto),
  inset: 6pt,
  stroke: 0.5pt,
  align: (left, right),
  table.header([*Factor*], [*Value*]),
  [Usage factor F#sub[u]], [{{FU}}],
  [Temperature factor F#sub[t] at {{AMBIENT}} °C], [{{FT}}],
  [Grouping factor F#sub[a] ({{PER_RACEWAY}} conductors per raceway)], [{{FA}}],
)

$ I_"adj" = (I_n F_u) / (F_t F_a) = {{ADJUSTED}} "A" $

== Conductors

#table(
  columns: (1fr, auto, auto),
  inset: 6pt,
  stroke: 0.5pt,
  align: (left, left, right),
  table.header([*Conductor*], [*Selection*], [*Basis*]),
  [Feeder (per phase)], [{{PARALLEL}} × {{FEEDER}}], [{{FEEDER_AMPACITY}} A ≥ {{PER_CONDUCTOR}} A],
  [Equipment ground], [{{GROUND}}], [ITM ≤ {{GROUND_CEILING}} A],
)

{{GROUND_NOTE}}

== Raceway

{{RACEWAY_BLOCK}}

#table(
  columns: (1fr, auto),
  inset: 6pt,
  stroke: 0.5pt,
  align: (left, right),
  [Selected size], [*{{RACEWAY_SIZE}}*],
  [Required], [{{RACEWAY_REQUIRED}}],
  [Available], [{{RACEWAY_CAPACITY}}],
)

== Voltage Drop

#table(
  columns: (1fr, auto),
  inset: 6pt,
  stroke: 0.5pt,
  align: (left, right),
  [R (per set)], [{{R_EFF}} Ω/km],
  [X (per set)], [{{X_EFF}} Ω/km],
  [Impedance term ({{DROP_METHOD}})], [{{Z_TERM}} Ω/km],
  [Topology factor k], [{{DROP_FACTOR}}],
  [Reference voltage], [{{REF_VOLTAGE}} V {{REF_KIND}}],
)

$ Delta V = k dot I_"adj" dot Z dot L = {{DROP_VOLTS}} "V" $

$ Delta V_"%" = (Delta V) / V_"ref" times 100 = {{DROP_PERCENT}} "%" $

#v(12pt)

#let status = "{{STATUS}}"
#align(center)[
  #block(
    width: auto,
    fill: if status == "PASS" { rgb("#d4edda") } else { rgb("#f8d7da") },
    inset: 14pt,
    radius: 4pt
  )[
    #text(size: 14pt, weight: "bold")[
      #if status == "PASS" [
        CIRCUIT COMPLIANT
      ] else [
        CIRCUIT NOT COMPLIANT
      ]
    ]
    #v(4pt)
    #text(size: 11pt)[Voltage drop {{DROP_PERCENT}} % against a {{DROP_LIMIT}} % limit]
  ]
]
"##;

const FOOTER_NOTE: &str = r##"
#v(24pt)
#line(length: 100%, stroke: 0.5pt)
#v(8pt)

#text(size: 9pt, fill: gray)[
  Generated by Wirecalc \
  Calculations should be verified by a licensed electrical engineer.
]
"##;

// ============================================================================
// PDF Rendering Functions
// ============================================================================

/// Render the calculation memory of one circuit to PDF.
pub fn render_memory_pdf(report: &MemoryReport, meta: &ReportMetadata) -> CalcResult<Vec<u8>> {
    render_memories_pdf(std::slice::from_ref(report), meta)
}

/// Render several circuit memories into a single PDF.
///
/// The document opens with a summary table, continues with one section
/// per circuit and closes with the appendix of equations applied.
///
/// # Returns
///
/// * `Ok(Vec<u8>)` - PDF file as bytes
/// * `Err(CalcError::Render)` - If there is nothing to render or Typst fails
pub fn render_memories_pdf(reports: &[MemoryReport], meta: &ReportMetadata) -> CalcResult<Vec<u8>> {
    let first = reports.first().ok_or_else(|| CalcError::Render {
        reason: "no circuits to render".to_string(),
    })?;

    let date = meta.generated.format("%Y-%m-%d").to_string();
    let mut source = DOCUMENT_TEMPLATE
        .replace("{{ENGINEER}}", &escape_typst(&meta.engineer))
        .replace("{{JOB_ID}}", &escape_typst(&meta.job_id))
        .replace("{{CLIENT}}", &escape_typst(&meta.client))
        .replace("{{DATE}}", &date)
        .replace("{{CODE}}", &escape_typst(&first.code))
        .replace("{{SUMMARY_ROWS}}", &build_summary_rows(reports));

    for report in reports {
        source.push_str(&circuit_section(report));
    }
    let tracker = EquationTracker::from(
        reports
            .iter()
            .flat_map(|report| report.equations.iter().cloned())
            .collect::<Vec<_>>(),
    );
    source.push_str(FOOTER_NOTE);
    source.push_str(&tracker.generate_appendix_typst());

    debug!(circuits = reports.len(), bytes = source.len(), "compiling memory document");
    compile_pdf(source, meta.generated)
}

fn compile_pdf(source: String, today: DateTime<Utc>) -> CalcResult<Vec<u8>> {
    let world = PdfWorld::new(source, today);
    let warned = typst::compile(&world);

    let document = warned.output.map_err(|errors| {
        let error_msgs: Vec<String> = errors.iter().map(|e| e.message.to_string()).collect();
        CalcError::Render {
            reason: format!("Typst compilation failed: {}", error_msgs.join("; ")),
        }
    })?;

    typst_pdf::pdf(&document, &PdfOptions::default()).map_err(|errors| {
        let error_msgs: Vec<String> = errors.iter().map(|e| e.message.to_string()).collect();
        CalcError::Render {
            reason: format!("PDF rendering failed: {}", error_msgs.join("; ")),
        }
    })
}

fn circuit_section(report: &MemoryReport) -> String {
    let adjustment = &report.adjustment;
    let feeder = &report.feeder;
    let ground = &report.ground;
    let drop = &report.voltage_drop;

    let rating = match report.equipment.rating {
        EquipmentRating::Amperage { amperes } => format!("{:.2} A", amperes.0),
        EquipmentRating::Power { power, power_factor } => {
            format!("{:.2} kW, pf {:.2}", power.0 / 1000.0, power_factor)
        }
    };

    let supply = report.system_voltage.get(report.topology.supply_reference());
    let nominal_block = match report.equipment.rating {
        EquipmentRating::Amperage { amperes } => {
            format!("Nameplate current: $ I_n = {:.2} \"A\" $", amperes.0)
        }
        EquipmentRating::Power { power, power_factor } if report.topology.is_three_phase() => format!(
            "$ I_n = P / (sqrt(3) V cos phi) = {:.0} / (sqrt(3) times {:.0} times {:.2}) = {:.2} \"A\" $",
            power.0, supply.0, power_factor, report.nominal_current.0
        ),
        EquipmentRating::Power { power, power_factor } => format!(
            "$ I_n = P / (V cos phi) = {:.0} / ({:.0} times {:.2}) = {:.2} \"A\" $",
            power.0, supply.0, power_factor, report.nominal_current.0
        ),
    };

    let rating_source = if report.temperature_overridden {
        "set by the designer"
    } else {
        "termination temperature rule"
    };

    let ground_note = if ground.fell_back_to_copper {
        "_No aluminum grounding conductor is listed for this rating; copper is used._"
    } else {
        ""
    };

    let (raceway_block, unit) = raceway_block(report);

    CIRCUIT_TEMPLATE
        .replace("{{LABEL}}", &escape_typst(&report.label))
        .replace("{{DESCRIPTION}}", &escape_typst(&report.equipment.description))
        .replace("{{CATEGORY}}", report.equipment.category.display_name())
        .replace("{{RATING}}", &rating)
        .replace("{{TOPOLOGY}}", report.topology.display_name())
        .replace("{{VOLTAGE}}", &format!("{:.0}", report.voltage.0))
        .replace("{{VOLTAGE_REF}}", report.voltage_reference.display_name())
        .replace("{{STATE}}", &escape_typst(&report.state))
        .replace("{{AMBIENT}}", &report.ambient_c.to_string())
        .replace("{{RACEWAY_METHOD}}", report.raceway_method.display_name())
        .replace("{{BREAKER}}", &format!("{:.0}", report.breaker_a))
        .replace("{{LENGTH}}", &format!("{:.1}", report.length.0))
        .replace("{{PARALLEL}}", &feeder.parallel_per_phase.to_string())
        .replace("{{RACEWAYS}}", &report.raceway.raceways.to_string())
        .replace("{{NOMINAL_BLOCK}}", &nominal_block)
        .replace("{{RATING_C}}", &report.temperature_rating.to_string())
        .replace("{{RATING_SOURCE}}", rating_source)
        .replace("{{FU}}", &format!("{:.2}", adjustment.usage_factor))
        .replace("{{FT}}", &format!("{:.2}", adjustment.temperature_factor))
        .replace("{{FA}}", &format!("{:.2}", adjustment.grouping_factor))
        .replace("{{PER_RACEWAY}}", &adjustment.conductors_per_raceway.to_string())
        .replace("{{ADJUSTED}}", &format!("{:.2}", adjustment.adjusted.0))
        .replace("{{FEEDER}}", &escape_typst(&feeder.conductor.designation()))
        .replace("{{FEEDER_AMPACITY}}", &format!("{:.0}", feeder.ampacity_a))
        .replace("{{PER_CONDUCTOR}}", &format!("{:.2}", feeder.per_conductor_current.0))
        .replace("{{GROUND}}", &escape_typst(&ground.conductor.designation()))
        .replace("{{GROUND_CEILING}}", &format!("{:.0}", ground.breaker_ceiling_a))
        .replace("{{GROUND_NOTE}}", ground_note)
        .replace("{{RACEWAY_BLOCK}}", &raceway_block)
        .replace("{{RACEWAY_SIZE}}", &escape_typst(&report.raceway.size_label))
        .replace("{{RACEWAY_REQUIRED}}", &format!("{:.1} {}", report.raceway.required, unit))
        .replace("{{RACEWAY_CAPACITY}}", &format!("{:.1} {}", report.raceway.capacity, unit))
        .replace("{{R_EFF}}", &format!("{:.4}", drop.resistance_eff.0))
        .replace("{{X_EFF}}", &format!("{:.4}", drop.reactance_eff.0))
        .replace("{{DROP_METHOD}}", drop.method.display_name())
        .replace("{{Z_TERM}}", &format!("{:.4}", drop.impedance_term))
        .replace("{{DROP_FACTOR}}", &format!("{:.3}", drop.drop_factor))
        .replace("{{REF_VOLTAGE}}", &format!("{:.1}", drop.reference_voltage.0))
        .replace("{{REF_KIND}}", drop.reference.display_name())
        .replace("{{DROP_VOLTS}}", &format!("{:.3}", drop.drop_volts))
        .replace("{{DROP_PERCENT}}", &format!("{:.3}", drop.percent))
        .replace("{{DROP_LIMIT}}", &format!("{:.2}", drop.limit_percent))
        .replace("{{STATUS}}", if report.compliant { "PASS" } else { "FAIL" })
}

/// Method-specific working for the raceway section, and the unit of its
/// capacity figures
fn raceway_block(report: &MemoryReport) -> (String, &'static str) {
    match &report.raceway.detail {
        RacewayDetail::Conduit {
            raceway_area_mm2,
            conductors_per_raceway,
            fill_factor,
        } => (
            format!(
                "{} conductors in the conduit carrying the control cables, fill factor {:.0} %.\n\n\
                 $ A_\"req\" = (sum n_i A_i) / F_r = {:.1} / {:.2} = {:.1} \"mm\"^2 $",
                conductors_per_raceway,
                fill_factor * 100.0,
                raceway_area_mm2,
                fill_factor,
                report.raceway.required,
            ),
            "mm²",
        ),
        RacewayDetail::SpacedTray {
            conductor_count,
            phase_diameter_mm,
            ground_diameter_mm,
            control_diameter_sum_mm,
        } => (
            format!(
                "Single conductors laid side by side, one diameter apart.\n\n\
                 $ W = 2 n d_f + 3 sum d_c + d_t = 2 times {} times {:.2} + 3 times {:.2} + {:.2} = {:.1} \"mm\" $",
                conductor_count,
                phase_diameter_mm,
                control_diameter_sum_mm,
                ground_diameter_mm,
                report.raceway.required,
            ),
            "mm",
        ),
        RacewayDetail::TriangularTray {
            parallel_per_tray,
            phase_diameter_mm,
            ground_diameter_mm,
            control_diameter_sum_mm,
        } => (
            format!(
                "Triplexed groups, {} per tray.\n\n\
                 $ W = 2 d_f + (p - 1) dot 2.15 d_f + 3.15 sum d_c + d_t = {:.1} \"mm\" $\n\n\
                 Phase diameter {:.2} mm, ground {:.2} mm, control cables {:.2} mm.",
                parallel_per_tray,
                report.raceway.required,
                phase_diameter_mm,
                ground_diameter_mm,
                control_diameter_sum_mm,
            ),
            "mm",
        ),
    }
}

/// Escape special Typst characters in user-provided text
fn escape_typst(s: &str) -> String {
    s.chars()
        .map(|c| match c {
            '*' => "\\*".to_string(),
            '_' => "\\_".to_string(),
            '#' => "\\#".to_string(),
            '$' => "\\$".to_string(),
            '@' => "\\@".to_string(),
            '<' => "\\<".to_string(),
            '>' => "\\>".to_string(),
            '[' => "\\[".to_string(),
            ']' => "\\]".to_string(),
            '\\' => "\\\\".to_string(),
            '`' => "\\`".to_string(),
            _ => c.to_string(),
        })
        .collect()
}

/// Build summary table rows for the cover page
fn build_summary_rows(reports: &[MemoryReport]) -> String {
    reports
        .iter()
        .enumerate()
        .map(|(i, report)| {
            format!(
                "  [{}], [{}], [{} × {}], [{}], [{:.2}], [{}],",
                i + 1,
                escape_typst(&report.label),
                report.feeder.parallel_per_phase,
                escape_typst(&report.feeder.conductor.designation()),
                escape_typst(&report.raceway.size_label),
                report.voltage_drop.percent,
                if report.compliant { "OK" } else { "FAIL" },
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculations::current::EquipmentSource;
    use crate::calculations::memory::{calculate_memory, CircuitInput};
    use crate::conductors::ConductorMaterial;
    use crate::installation::{RacewayMethod, Topology};
    use crate::nom_factors::EquipmentCategory;
    use crate::settings::GlobalSettings;
    use crate::tables::nom_tables;
    use crate::units::{Amperes, Volts};

    fn report(label: &str) -> MemoryReport {
        let input = CircuitInput {
            label: label.to_string(),
            equipment: EquipmentSource::Manual(EquipmentRating::Amperage { amperes: Amperes(50.0) }),
            category: EquipmentCategory::Load,
            topology: Topology::Wye,
            voltage: Volts(220.0),
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
        };
        calculate_memory(nom_tables(), &input, &GlobalSettings::default()).unwrap()
    }

    #[test]
    fn test_escape_typst() {
        assert_eq!(escape_typst("A_1 #2 [x]"), "A\\_1 \\#2 \\[x\\]");
        assert_eq!(escape_typst("Planta Norte"), "Planta Norte");
    }

    #[test]
    fn test_summary_rows() {
        let rows = build_summary_rows(&[report("C_1"), report("C-2")]);
        assert_eq!(rows.lines().count(), 2);
        assert!(rows.contains("[C\\_1]"));
        assert!(rows.starts_with("  [1]"));
    }

    #[test]
    fn test_empty_report_list() {
        let err = render_memories_pdf(&[], &ReportMetadata::default()).unwrap_err();
        assert!(matches!(err, CalcError::Render { .. }));
    }

    #[test]
    fn test_pdf_generation() {
        let meta = ReportMetadata::new("Test Engineer", "TEST-001", "ACME");
        let pdf = render_memory_pdf(&report("AHF-01 #1"), &meta);

        assert!(pdf.is_ok(), "PDF generation failed: {:?}", pdf.err());

        let pdf_bytes = pdf.unwrap();
        assert!(pdf_bytes.starts_with(b"%PDF"), "Output is not a valid PDF");
        assert!(pdf_bytes.len() > 1000, "PDF seems too small");
    }
}
