//! Wiring - Domestic Wiring Circuit Analyser
//!
//! Loads a saved circuit document and prints what the analysis engine
//! derives from it.
//!
//! # Usage
//!
//! ```bash
//! wiring kitchen.json --region eu --probe "Supply:L" --probe "Socket 1:L_A"
//! wiring kitchen.json --json > report.json
//! RUST_LOG=debug wiring kitchen.json
//! ```

use std::path::PathBuf;

use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use serde::Serialize;
use tracing_subscriber::EnvFilter;
use wiring_core::{
    circuit::{Circuit, Conductor},
    document,
    error::Result,
    solver::{AnalysisReport, MeterReading, Region, SimulationMode, SocketClass},
    AnalysisConfig, Analyzer,
};

/// Domestic wiring circuit analyser
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the circuit document (.json)
    #[arg(value_name = "CIRCUIT_FILE")]
    circuit_file: PathBuf,

    /// Wiring regulations region
    #[arg(short, long, value_enum, default_value_t = Region::Uk)]
    region: Region,

    /// Simulation mode
    #[arg(short, long, value_enum, default_value_t = SimulationMode::Free)]
    mode: SimulationMode,

    /// Meter probe as COMPONENT:TERMINAL; give exactly two
    #[arg(short, long, value_name = "PROBE")]
    probe: Vec<String>,

    /// Treat a neutral-earth short as dangerous
    #[arg(long)]
    neutral_earth_fatal: bool,

    /// Print the report as JSON instead of text
    #[arg(long)]
    json: bool,
}

#[derive(Serialize)]
struct Output<'a> {
    report: &'a AnalysisReport,
    #[serde(skip_serializing_if = "Option::is_none")]
    meter: Option<&'a MeterReading>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    if !args.probe.is_empty() && args.probe.len() != 2 {
        Args::command()
            .error(
                ErrorKind::WrongNumberOfValues,
                "--probe must be given exactly twice",
            )
            .exit();
    }

    // Load and validate
    let circuit = document::parse_file(&args.circuit_file)?;

    let config = AnalysisConfig::new()
        .with_region(args.region)
        .with_mode(args.mode)
        .with_neutral_earth_fatal(args.neutral_earth_fatal);
    let analyzer = Analyzer::with_config(config);

    let report = analyzer.analyze(&circuit);
    let meter = match args.probe.as_slice() {
        [a, b] => {
            let a = circuit.resolve_probe(a)?;
            let b = circuit.resolve_probe(b)?;
            Some(analyzer.meter(&circuit, a, b))
        }
        _ => None,
    };

    if args.json {
        let output = Output {
            report: &report,
            meter: meter.as_ref(),
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        print_report(&circuit, &report);
        if let Some(meter) = &meter {
            print_meter(&args.probe, meter);
        }
    }

    Ok(())
}

fn name_of(circuit: &Circuit, id: wiring_core::circuit::ComponentId) -> String {
    circuit
        .component(id)
        .map(|c| format!("{} ({})", c.label, c.id))
        .unwrap_or_else(|| id.to_string())
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "yes"
    } else {
        "no"
    }
}

fn print_report(circuit: &Circuit, report: &AnalysisReport) {
    match report.source {
        Some(source) => println!("Source: {}", name_of(circuit, source)),
        None => println!("Source: none (nothing is energised)"),
    }

    let shorts = report.shorts.labels();
    if shorts.is_empty() {
        println!("Shorts: none");
    } else {
        let danger = if report.dangerous { " (dangerous)" } else { "" };
        println!("Shorts: {}{}", shorts.join(", "), danger);
    }

    let rings = &report.rings;
    println!(
        "Rings: L {}  N {}  E {}{}",
        yes_no(rings.rings.line),
        yes_no(rings.rings.neutral),
        yes_no(rings.rings.earth),
        if rings.ring_circuit { "  (ring circuit)" } else { "" }
    );

    if !rings.sockets.is_empty() {
        println!("Sockets:");
        for socket in &rings.sockets {
            let class = match socket.class {
                SocketClass::InRing => "in ring",
                SocketClass::Spur => "spur",
                SocketClass::Isolated => "isolated",
            };
            println!("  {:<40} {}", name_of(circuit, socket.component), class);
        }
    }
    for group in &rings.spur_off_spur {
        let names: Vec<String> = group.iter().map(|id| name_of(circuit, *id)).collect();
        println!("Spur off spur: {}", names.join(" -> "));
    }

    if !report.loads.is_empty() {
        println!("Loads:");
        for load in &report.loads {
            println!(
                "  {:<40} {}, {}",
                name_of(circuit, load.component),
                if load.energised { "on" } else { "off" },
                if load.earth_ok { "earthed" } else { "NOT earthed" }
            );
        }
    }

    if !report.undersized.is_empty() {
        println!("Undersized wires:");
        for issue in &report.undersized {
            println!(
                "  {}  {:.1} mm² < {:.1} mm²",
                issue.wire, issue.size_mm2, issue.required_mm2
            );
        }
    }
}

fn print_meter(probes: &[String], meter: &MeterReading) {
    println!("Meter {} -> {}:", probes[0], probes[1]);
    for c in Conductor::ALL {
        let path = meter.resistance.get(c);
        if path.is_open() {
            println!("  {}: open line", c);
        } else {
            println!("  {}: {:.3} Ω", c, path.resistance);
        }
    }
    let volts = |v: Option<f64>| v.map_or_else(|| "floating".to_string(), |v| format!("{v:.0} V"));
    match meter.voltage {
        Some(v) => println!(
            "  Voltage: A {}  B {}  A-B {}",
            volts(v.va),
            volts(v.vb),
            v.vab.map_or_else(|| "no reading".to_string(), |v| format!("{v:.0} V"))
        ),
        None => println!("  Voltage: no reading (no supply)"),
    }
}
