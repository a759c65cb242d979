//! # WireCalc CLI Application
//!
//! Runs calculation memories from a JSON circuit description, prints a
//! summary and the JSON report, and optionally writes the PDF memory.
//!
//! ```text
//! wirecalc --input circuits.json --pdf memoria.pdf --engineer "Ing. R. Salas" --job 25-042
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use clap::Parser;
use serde::Deserialize;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use wirecalc_core::pdf::render_memories_pdf;
use wirecalc_core::{
    calculate_memory, nom_tables, CircuitInput, GlobalSettings, LookupTables, MemoryReport, ReportMetadata,
    TableSet,
};

/// Command line arguments
#[derive(Parser, Debug)]
#[clap(author, version, about)]
struct Args {
    /// Circuit description (one circuit object or an array of them)
    #[clap(short, long)]
    input: PathBuf,

    /// Lookup tables replacing the bundled NOM data
    #[clap(long)]
    tables: Option<PathBuf>,

    /// Calculation defaults (code edition, voltage drop limit and method)
    #[clap(long)]
    settings: Option<PathBuf>,

    /// Write the PDF calculation memory here
    #[clap(long)]
    pdf: Option<PathBuf>,

    /// Engineer named on the PDF title block
    #[clap(long, env = "WIRECALC_ENGINEER", default_value = "")]
    engineer: String,

    /// Job number on the PDF title block
    #[clap(long, env = "WIRECALC_JOB", default_value = "")]
    job: String,

    /// Client on the PDF title block
    #[clap(long, env = "WIRECALC_CLIENT", default_value = "")]
    client: String,

    /// Print only the JSON report
    #[clap(long)]
    json: bool,
}

/// A single circuit or a batch
#[derive(Deserialize)]
#[serde(untagged)]
enum CircuitFile {
    Many(Vec<CircuitInput>),
    One(Box<CircuitInput>),
}

impl CircuitFile {
    fn into_circuits(self) -> Vec<CircuitInput> {
        match self {
            CircuitFile::Many(circuits) => circuits,
            CircuitFile::One(circuit) => vec![*circuit],
        }
    }
}

fn read_json<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<T> {
    let text = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))
}

fn main() -> ExitCode {
    let args = Args::parse();

    // Logs go to stderr so stdout stays valid JSON
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    match run(&args) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(2),
        Err(e) => {
            error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

/// Returns whether every circuit is compliant.
fn run(args: &Args) -> Result<bool> {
    let circuits = read_json::<CircuitFile>(&args.input)?.into_circuits();
    if circuits.is_empty() {
        bail!("{} contains no circuits", args.input.display());
    }

    let settings: GlobalSettings = match &args.settings {
        Some(path) => read_json(path)?,
        None => GlobalSettings::default(),
    };

    let custom_tables = match &args.tables {
        Some(path) => {
            let text = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
            let tables = TableSet::from_json(&text).with_context(|| format!("loading tables {}", path.display()))?;
            info!(path = %path.display(), "using custom lookup tables");
            Some(tables)
        }
        None => None,
    };
    let tables: &dyn LookupTables = match &custom_tables {
        Some(tables) => tables,
        None => nom_tables(),
    };

    let mut reports = Vec::with_capacity(circuits.len());
    let mut failures = Vec::new();
    for circuit in &circuits {
        match calculate_memory(tables, circuit, &settings) {
            Ok(report) => reports.push(report),
            Err(e) => {
                error!(circuit = %circuit.label, code = e.error_code(), "{}", e);
                failures.push((circuit.label.clone(), e));
            }
        }
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
    } else {
        for report in &reports {
            print_summary(report);
        }
        println!("JSON Output:");
        println!("{}", serde_json::to_string_pretty(&reports)?);
    }

    if !failures.is_empty() {
        let errors: Vec<_> = failures
            .iter()
            .map(|(label, e)| serde_json::json!({ "circuit": label, "error": e }))
            .collect();
        eprintln!("{}", serde_json::to_string_pretty(&errors)?);
    }

    if let Some(path) = &args.pdf {
        if reports.is_empty() {
            bail!("no circuit could be calculated; PDF not written");
        }
        let meta = ReportMetadata::new(&args.engineer, &args.job, &args.client);
        let bytes = render_memories_pdf(&reports, &meta)?;
        fs::write(path, bytes).with_context(|| format!("writing {}", path.display()))?;
        info!(path = %path.display(), circuits = reports.len(), "PDF memory written");
    }

    Ok(failures.is_empty() && reports.iter().all(|r| r.compliant))
}

fn print_summary(report: &MemoryReport) {
    let drop = &report.voltage_drop;
    println!("═══════════════════════════════════════");
    println!("  {}  ({})", report.label, report.equipment.description);
    println!("═══════════════════════════════════════");
    println!(
        "  System:        {} {:.0}/{:.0} V",
        report.topology.display_name(),
        report.system_voltage.phase_to_phase.0,
        report.system_voltage.phase_to_neutral.0
    );
    println!("  Ambient:       {} °C ({})", report.ambient_c, report.state);
    println!("  Nominal:       {:.2} A", report.nominal_current.0);
    println!(
        "  Adjusted:      {:.2} A (Fu {:.2}, Ft {:.2}, Fa {:.2})",
        report.adjustment.adjusted.0,
        report.adjustment.usage_factor,
        report.adjustment.temperature_factor,
        report.adjustment.grouping_factor
    );
    println!(
        "  Feeder:        {} × {} at {} ({:.0} A)",
        report.feeder.parallel_per_phase,
        report.feeder.conductor.designation(),
        report.temperature_rating,
        report.feeder.ampacity_a
    );
    println!("  Ground:        {}", report.ground.conductor.designation());
    println!(
        "  Raceway:       {} × {} ({})",
        report.raceway.raceways,
        report.raceway.size_label,
        report.raceway_method.display_name()
    );
    println!(
        "  Voltage drop:  {:.3} V = {:.3} % (limit {:.2} %) {}",
        drop.drop_volts,
        drop.percent,
        drop.limit_percent,
        status_icon(drop.compliant)
    );
    println!("  RESULT:        {}", if report.compliant { "COMPLIANT" } else { "NOT COMPLIANT" });
    println!();
}

fn status_icon(pass: bool) -> &'static str {
    if pass { "[OK]" } else { "[FAIL]" }
}
