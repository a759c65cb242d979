//! # Equation Registry
//!
//! Every formula the engine applies, with its NOM-001-SEDE reference,
//! plain and typst forms, and variable definitions.
//!
//! ## Usage
//!
//! ```rust
//! use wirecalc_core::equations::registry::{Equation, EquationTracker};
//!
//! let mut tracker = EquationTracker::new();
//! tracker.record_for_circuit(Equation::AdjustedCurrent, "Design current", "AHF-01");
//!
//! let meta = Equation::AdjustedCurrent.metadata();
//! assert_eq!(meta.reference.citation(), "NOM-001-SEDE-2012, 310-15(b)(2)(a), 310-15(b)(3)(a)");
//! ```

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

// ============================================================================
// Code References
// ============================================================================

/// Source of an equation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub enum CodeReference {
    /// NOM-001-SEDE article, section or table
    Nom { edition: u16, section: &'static str },
    /// Circuit theory, no code section
    CircuitTheory,
}

impl CodeReference {
    const fn nom(section: &'static str) -> Self {
        CodeReference::Nom { edition: 2012, section }
    }

    /// Format the reference for display in reports
    pub fn citation(&self) -> String {
        match self {
            CodeReference::Nom { edition, section } => format!("NOM-001-SEDE-{}, {}", edition, section),
            CodeReference::CircuitTheory => "Circuit theory".to_string(),
        }
    }
}

// ============================================================================
// Equation Categories
// ============================================================================

/// Groups for the report appendix, in calculation order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EquationCategory {
    Current,
    AdjustmentFactors,
    ConductorSelection,
    RacewaySizing,
    VoltageDrop,
}

impl EquationCategory {
    /// Display name for the category
    pub fn display_name(&self) -> &'static str {
        match self {
            EquationCategory::Current => "Nominal Current",
            EquationCategory::AdjustmentFactors => "Adjustment Factors",
            EquationCategory::ConductorSelection => "Conductor Selection",
            EquationCategory::RacewaySizing => "Raceway Sizing",
            EquationCategory::VoltageDrop => "Voltage Drop",
        }
    }

    /// Sort order for the appendix (lower = earlier)
    pub fn sort_order(&self) -> u8 {
        match self {
            EquationCategory::Current => 1,
            EquationCategory::AdjustmentFactors => 2,
            EquationCategory::ConductorSelection => 3,
            EquationCategory::RacewaySizing => 4,
            EquationCategory::VoltageDrop => 5,
        }
    }
}

/// Definition of a variable used in an equation.
#[derive(Debug, Clone)]
pub struct Variable {
    pub symbol: &'static str,
    pub description: &'static str,
    pub units: &'static str,
}

impl Variable {
    pub const fn new(symbol: &'static str, description: &'static str, units: &'static str) -> Self {
        Self { symbol, description, units }
    }
}

/// Complete metadata for an equation.
#[derive(Debug, Clone)]
pub struct EquationMetadata {
    pub name: &'static str,
    pub description: &'static str,
    /// Typst math notation for the PDF memory
    pub formula_typst: &'static str,
    /// Plain text form for logs and summaries
    pub formula_plain: &'static str,
    pub reference: CodeReference,
    pub variables: Vec<Variable>,
    pub category: EquationCategory,
}

// ============================================================================
// Equation Enum
// ============================================================================

/// Equations applied by the calculation memory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Equation {
    /// I = P / (V × pf)
    NominalCurrentSinglePhase,
    /// I = P / (√3 × V × pf)
    NominalCurrentThreePhase,
    /// 60 °C up to 100 A, 75 °C above
    TerminationRating,
    /// I_adj = I_nom × F_u / (F_t × F_a)
    AdjustedCurrent,
    /// I_c = I_adj / p, I_tab ≥ I_c
    FeederAmpacity,
    /// ITM ≤ row ceiling
    GroundConductor,
    /// A_req = Σ n·A / F_r, counted in one conduit
    ConduitFill,
    /// W = 2·n·d_f + 3·Σd_c + d_t
    SpacedTrayWidth,
    /// W = 2·d_f + (p − 1)·2.15·d_f + 3.15·Σd_c + d_t
    TriangularTrayWidth,
    /// Z = √(R² + X²)
    ImpedanceMagnitude,
    /// Z = R cosθ + X sinθ
    EffectiveImpedance,
    /// ΔV = k × I × Z × L / 1000
    VoltageDrop,
    /// %ΔV = ΔV / V_ref × 100
    VoltageDropPercent,
}

/// Every equation in the registry, in calculation order
pub const ALL_EQUATIONS: [Equation; 13] = [
    Equation::NominalCurrentSinglePhase,
    Equation::NominalCurrentThreePhase,
    Equation::TerminationRating,
    Equation::AdjustedCurrent,
    Equation::FeederAmpacity,
    Equation::GroundConductor,
    Equation::ConduitFill,
    Equation::SpacedTrayWidth,
    Equation::TriangularTrayWidth,
    Equation::ImpedanceMagnitude,
    Equation::EffectiveImpedance,
    Equation::VoltageDrop,
    Equation::VoltageDropPercent,
];

impl Equation {
    /// Get the full metadata for this equation
    pub fn metadata(&self) -> EquationMetadata {
        match self {
            Equation::NominalCurrentSinglePhase => EquationMetadata {
                name: "Nominal Current, Single/Two-Phase",
                description: "Current drawn by equipment rated by power on a single or two-phase system",
                formula_typst: r#"$I_n = P / (V dot "pf")$"#,
                formula_plain: "I = P / (V x pf)",
                reference: CodeReference::CircuitTheory,
                variables: vec![
                    Variable::new("I_n", "Nominal current", "A"),
                    Variable::new("P", "Real power", "W"),
                    Variable::new("V", "System voltage", "V"),
                    Variable::new("\"pf\"", "Power factor", "-"),
                ],
                category: EquationCategory::Current,
            },
            Equation::NominalCurrentThreePhase => EquationMetadata {
                name: "Nominal Current, Three-Phase",
                description: "Current drawn by equipment rated by power on a delta or wye system",
                formula_typst: r#"$I_n = P / (sqrt(3) dot V dot "pf")$"#,
                formula_plain: "I = P / (sqrt(3) x V x pf)",
                reference: CodeReference::CircuitTheory,
                variables: vec![
                    Variable::new("I_n", "Nominal current", "A"),
                    Variable::new("P", "Real power", "W"),
                    Variable::new("V", "Phase-to-phase voltage", "V"),
                    Variable::new("\"pf\"", "Power factor", "-"),
                ],
                category: EquationCategory::Current,
            },
            Equation::TerminationRating => EquationMetadata {
                name: "Termination Temperature Rating",
                description: "Ampacity column chosen by the temperature limit of the terminations",
                formula_typst: r#"$T = 60 degree "C"$ if $I_n <= 100 "A"$, else $T = 75 degree "C"$"#,
                formula_plain: "T = 60 C if I <= 100 A (75 C in triangular tray), else 75 C",
                reference: CodeReference::nom("110-14(c)"),
                variables: vec![
                    Variable::new("T", "Conductor temperature rating", "°C"),
                    Variable::new("I_n", "Nominal current", "A"),
                ],
                category: EquationCategory::AdjustmentFactors,
            },
            Equation::AdjustedCurrent => EquationMetadata {
                name: "Adjusted Current",
                description: "Nominal current corrected for continuous use, ambient temperature and grouping",
                formula_typst: r#"$I_"adj" = (I_n dot F_u) / (F_t dot F_a)$"#,
                formula_plain: "I_adj = I_nom x F_u / (F_t x F_a)",
                reference: CodeReference::nom("310-15(b)(2)(a), 310-15(b)(3)(a)"),
                variables: vec![
                    Variable::new("I_\"adj\"", "Adjusted current", "A"),
                    Variable::new("F_u", "Usage factor", "-"),
                    Variable::new("F_t", "Ambient temperature factor", "-"),
                    Variable::new("F_a", "Grouping factor", "-"),
                ],
                category: EquationCategory::AdjustmentFactors,
            },
            Equation::FeederAmpacity => EquationMetadata {
                name: "Feeder Ampacity",
                description: "Smallest conductor whose tabulated ampacity carries the current per parallel conductor",
                formula_typst: r#"$I_c = I_"adj" / p$, $I_"tab" >= I_c$"#,
                formula_plain: "I_c = I_adj / p, I_tab >= I_c",
                reference: CodeReference::nom("310-15(b)(16)"),
                variables: vec![
                    Variable::new("I_c", "Current per conductor", "A"),
                    Variable::new("p", "Conductors in parallel per phase", "-"),
                    Variable::new("I_\"tab\"", "Tabulated ampacity", "A"),
                ],
                category: EquationCategory::ConductorSelection,
            },
            Equation::GroundConductor => EquationMetadata {
                name: "Equipment Grounding Conductor",
                description: "Grounding conductor sized by the rating of the overcurrent device",
                formula_typst: r#"$"ITM" <= I_"row"$"#,
                formula_plain: "ITM <= row ceiling",
                reference: CodeReference::nom("250-122"),
                variables: vec![
                    Variable::new("\"ITM\"", "Breaker rating", "A"),
                    Variable::new("I_\"row\"", "Table row ceiling", "A"),
                ],
                category: EquationCategory::ConductorSelection,
            },
            Equation::ConduitFill => EquationMetadata {
                name: "Conduit Fill",
                description: "Interior area required by the conductors and control cables in one conduit",
                formula_typst: r#"$A_"req" = (sum n_i A_i) / F_r$"#,
                formula_plain: "A_req = sum(n x A) / F_r",
                reference: CodeReference::nom("Chapter 10, Tables 1 and 4"),
                variables: vec![
                    Variable::new("n_i", "Conductors of size i in the conduit", "-"),
                    Variable::new("A_i", "Insulated area of size i", "mm²"),
                    Variable::new("F_r", "Fill factor (0.53, 0.31, 0.40)", "-"),
                ],
                category: EquationCategory::RacewaySizing,
            },
            Equation::SpacedTrayWidth => EquationMetadata {
                name: "Spaced Tray Width",
                description: "Tray width for single conductors spaced one diameter apart",
                formula_typst: r#"$W = 2 n d_f + 2 sum d_c + sum d_c + d_t$"#,
                formula_plain: "W = 2(n x d_f) + 2 sum(d_c) + sum(d_c) + d_t",
                reference: CodeReference::nom("392-22(b)"),
                variables: vec![
                    Variable::new("n", "Energized conductors", "-"),
                    Variable::new("d_f", "Phase conductor diameter", "mm"),
                    Variable::new("d_c", "Control cable diameter", "mm"),
                    Variable::new("d_t", "Ground conductor diameter", "mm"),
                ],
                category: EquationCategory::RacewaySizing,
            },
            Equation::TriangularTrayWidth => EquationMetadata {
                name: "Triangular Tray Width",
                description: "Tray width for conductors bundled in triangular groups",
                formula_typst: r#"$W = 2 d_f + (p - 1) dot 2.15 d_f + 2.15 sum d_c + sum d_c + d_t$"#,
                formula_plain: "W = 2 d_f + (p - 1) x 2.15 d_f + 2.15 sum(d_c) + sum(d_c) + d_t",
                reference: CodeReference::nom("392-22(b)"),
                variables: vec![
                    Variable::new("p", "Groups in parallel per phase", "-"),
                    Variable::new("d_f", "Phase conductor diameter", "mm"),
                    Variable::new("d_c", "Control cable diameter", "mm"),
                    Variable::new("d_t", "Ground conductor diameter", "mm"),
                ],
                category: EquationCategory::RacewaySizing,
            },
            Equation::ImpedanceMagnitude => EquationMetadata {
                name: "Impedance Magnitude",
                description: "Impedance per km of one phase with parallel conductors combined",
                formula_typst: r#"$Z = sqrt((R/p)^2 + (X/p)^2)$"#,
                formula_plain: "Z = sqrt((R/p)^2 + (X/p)^2)",
                reference: CodeReference::nom("Chapter 10, Table 9"),
                variables: vec![
                    Variable::new("R", "AC resistance", "Ω/km"),
                    Variable::new("X", "Reactance", "Ω/km"),
                ],
                category: EquationCategory::VoltageDrop,
            },
            Equation::EffectiveImpedance => EquationMetadata {
                name: "Effective Impedance",
                description: "Impedance term at the load power factor",
                formula_typst: r#"$Z_"ef" = R/p cos theta + X/p sin theta$"#,
                formula_plain: "Z_ef = (R/p) cos(theta) + (X/p) sin(theta)",
                reference: CodeReference::nom("Chapter 10, Table 9, Note 2"),
                variables: vec![
                    Variable::new("theta", "Power factor angle", "rad"),
                    Variable::new("R", "AC resistance", "Ω/km"),
                    Variable::new("X", "Reactance", "Ω/km"),
                ],
                category: EquationCategory::VoltageDrop,
            },
            Equation::VoltageDrop => EquationMetadata {
                name: "Voltage Drop",
                description: "Drop along the run; k is 2 single-phase, 1 two-phase and wye, √3 delta",
                formula_typst: r#"$Delta V = k dot I dot Z dot L / 1000$"#,
                formula_plain: "dV = k x I x Z x L / 1000",
                reference: CodeReference::CircuitTheory,
                variables: vec![
                    Variable::new("k", "Topology factor", "-"),
                    Variable::new("I", "Adjusted current", "A"),
                    Variable::new("L", "Run length", "m"),
                ],
                category: EquationCategory::VoltageDrop,
            },
            Equation::VoltageDropPercent => EquationMetadata {
                name: "Voltage Drop Percentage",
                description: "Drop referred to the phase-to-neutral voltage, or phase-to-phase for delta",
                formula_typst: r#"$Delta V_"%" = (Delta V) / V_"ref" dot 100 <= Delta V_"max"$"#,
                formula_plain: "%dV = dV / V_ref x 100 <= limit",
                reference: CodeReference::nom("215-2(a)(1), Note 2"),
                variables: vec![
                    Variable::new("V_\"ref\"", "Reference voltage", "V"),
                    Variable::new("Delta V_\"max\"", "Allowed drop", "%"),
                ],
                category: EquationCategory::VoltageDrop,
            },
        }
    }
}

// ============================================================================
// Usage Tracking
// ============================================================================

/// Record of an equation being used in a calculation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquationUsage {
    pub equation: Equation,
    /// Where it was used, e.g. "Feeder conductor"
    pub context: String,
    /// Circuit the equation was applied to
    pub circuit_label: Option<String>,
}

impl EquationUsage {
    pub fn new(equation: Equation, context: impl Into<String>) -> Self {
        Self {
            equation,
            context: context.into(),
            circuit_label: None,
        }
    }

    pub fn for_circuit(
        equation: Equation,
        context: impl Into<String>,
        label: impl Into<String>,
    ) -> Self {
        Self {
            equation,
            context: context.into(),
            circuit_label: Some(label.into()),
        }
    }
}

/// Collector for equation usage during a calculation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EquationTracker {
    usages: Vec<EquationUsage>,
}

impl EquationTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that an equation was used
    pub fn record(&mut self, equation: Equation, context: impl Into<String>) {
        self.usages.push(EquationUsage::new(equation, context));
    }

    /// Record equation usage for a circuit
    pub fn record_for_circuit(
        &mut self,
        equation: Equation,
        context: impl Into<String>,
        label: impl Into<String>,
    ) {
        self.usages.push(EquationUsage::for_circuit(equation, context, label));
    }

    pub fn usages(&self) -> &[EquationUsage] {
        &self.usages
    }

    pub fn into_usages(self) -> Vec<EquationUsage> {
        self.usages
    }

    /// Unique equations, first use first
    pub fn unique_equations(&self) -> Vec<Equation> {
        let mut seen = HashSet::new();
        self.usages
            .iter()
            .filter(|u| seen.insert(u.equation))
            .map(|u| u.equation)
            .collect()
    }

    /// Unique equations grouped by category, in calculation order
    pub fn by_category(&self) -> Vec<(EquationCategory, Vec<Equation>)> {
        let mut by_cat: HashMap<EquationCategory, Vec<Equation>> = HashMap::new();
        for eq in self.unique_equations() {
            by_cat.entry(eq.metadata().category).or_default().push(eq);
        }
        let mut result: Vec<_> = by_cat.into_iter().collect();
        result.sort_by_key(|(cat, _)| cat.sort_order());
        result
    }
}

impl From<Vec<EquationUsage>> for EquationTracker {
    fn from(usages: Vec<EquationUsage>) -> Self {
        Self { usages }
    }
}

// ============================================================================
// Typst Appendix Generation
// ============================================================================

impl EquationTracker {
    /// Typst markup for the "List of Equations" appendix of the memory.
    pub fn generate_appendix_typst(&self) -> String {
        let mut output = String::new();

        output.push_str(
            r##"
#pagebreak()

#align(center)[
  #block(width: 100%, fill: rgb("#f0f0f0"), inset: 12pt, radius: 4pt)[
    #text(size: 18pt, weight: "bold")[Appendix: List of Equations]
  ]
]

#v(12pt)
"##,
        );

        let by_category = self.by_category();
        if by_category.is_empty() {
            output.push_str("#text(style: \"italic\")[No equations recorded for this calculation.]\n");
            return output;
        }

        for (category, equations) in by_category {
            output.push_str(&format!("\n== {}\n\n", category.display_name()));

            for equation in equations {
                let meta = equation.metadata();
                output.push_str(&format!("=== {}\n\n", meta.name));
                output.push_str(&format!("#text(size: 10pt)[{}]\n\n", meta.description));
                output.push_str(&format!("*Formula:* {}\n\n", meta.formula_typst));
                output.push_str(&format!("*Reference:* {}\n\n", meta.reference.citation()));

                if !meta.variables.is_empty() {
                    output.push_str("#table(\n");
                    output.push_str("  columns: (auto, 1fr, auto),\n");
                    output.push_str("  inset: 6pt,\n");
                    output.push_str("  stroke: 0.5pt,\n");
                    output.push_str("  table.header([*Symbol*], [*Description*], [*Units*]),\n");
                    for var in &meta.variables {
                        output.push_str(&format!("  [${}$], [{}], [{}],\n", var.symbol, var.description, var.units));
                    }
                    output.push_str(")\n\n");
                }

                let contexts: Vec<&str> = self
                    .usages
                    .iter()
                    .filter(|u| u.equation == equation)
                    .map(|u| u.context.as_str())
                    .collect();
                if !contexts.is_empty() {
                    output.push_str(&format!("*Applied in:* {}\n\n", contexts.join(", ")));
                }

                output.push_str("#line(length: 100%, stroke: 0.25pt + gray)\n\n");
            }
        }

        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_equations_have_metadata() {
        for eq in ALL_EQUATIONS {
            let meta = eq.metadata();
            assert!(!meta.name.is_empty());
            assert!(meta.formula_typst.starts_with('$'), "{:?} formula is not math", eq);
        }
    }

    #[test]
    fn test_citation() {
        assert_eq!(CodeReference::nom("250-122").citation(), "NOM-001-SEDE-2012, 250-122");
        assert_eq!(CodeReference::CircuitTheory.citation(), "Circuit theory");
    }

    #[test]
    fn test_tracker_dedup_and_order() {
        let mut tracker = EquationTracker::new();
        tracker.record(Equation::VoltageDrop, "Voltage drop");
        tracker.record(Equation::AdjustedCurrent, "Design current");
        tracker.record(Equation::VoltageDrop, "Voltage drop, second run");

        assert_eq!(tracker.usages().len(), 3);
        assert_eq!(tracker.unique_equations(), vec![Equation::VoltageDrop, Equation::AdjustedCurrent]);

        let cats: Vec<_> = tracker.by_category().into_iter().map(|(c, _)| c).collect();
        assert_eq!(cats, vec![EquationCategory::AdjustmentFactors, EquationCategory::VoltageDrop]);
    }

    #[test]
    fn test_appendix_typst() {
        let mut tracker = EquationTracker::new();
        tracker.record_for_circuit(Equation::ConduitFill, "Raceway sizing", "TR-01");
        let typst = tracker.generate_appendix_typst();
        assert!(typst.contains("Appendix: List of Equations"));
        assert!(typst.contains("Conduit Fill"));
        assert!(typst.contains("NOM-001-SEDE-2012, Chapter 10, Tables 1 and 4"));
        assert!(typst.contains("Raceway sizing"));
    }

    #[test]
    fn test_appendix_empty() {
        let typst = EquationTracker::new().generate_appendix_typst();
        assert!(typst.contains("No equations recorded"));
    }
}
