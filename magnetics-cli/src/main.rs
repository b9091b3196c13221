//! A small demonstration binary over the converter synthesiser and the
//! circuit-simulator adapter, in the style of `ucb-substrate-substrate2`'s
//! `bins/spicemerge`: a `clap`-derive `Args`/`Parser`, `anyhow::Context` for
//! error messages, JSON in, JSON (or SPICE text) out.

use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use converter::boost::BoostRequest;
use converter::buck::BuckRequest;
use converter::Converter;

/// Design magnetics operating points, or preview the circuit-simulator
/// netlist a design would exercise.
#[derive(Parser)]
#[command(version, about, long_about = "Synthesise converter operating points and preview simulator netlists")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Synthesise design requirements and operating points for a buck
    /// converter, reading a `converter::buck::BuckRequest` as JSON.
    Buck(SynthesizeArgs),
    /// Synthesise design requirements and operating points for a boost
    /// converter, reading a `converter::boost::BoostRequest` as JSON.
    Boost(SynthesizeArgs),
    /// Render the SPICE netlist a buck converter's minimum-input-voltage
    /// operating point would exercise, without running ngspice.
    NetlistPreview(NetlistPreviewArgs),
}

#[derive(clap::Args)]
struct SynthesizeArgs {
    /// The request JSON file. Reads stdin when omitted.
    input: Option<PathBuf>,
    /// Where to write the `{ requirements, operating_points }` JSON
    /// result. Writes to stdout when omitted.
    #[arg(short, long)]
    out: Option<PathBuf>,
}

#[derive(clap::Args)]
struct NetlistPreviewArgs {
    /// The buck request JSON file. Reads stdin when omitted.
    input: Option<PathBuf>,
    /// Switching frequency of the previewed netlist, overriding the
    /// request's first operating point if given.
    #[arg(long)]
    frequency: Option<f64>,
    /// Where to write the rendered netlist. Writes to stdout when omitted.
    #[arg(short, long)]
    out: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();
    match cli.command {
        Command::Buck(args) => synthesize_buck(args),
        Command::Boost(args) => synthesize_boost(args),
        Command::NetlistPreview(args) => netlist_preview(args),
    }
}

fn read_input(path: &Option<PathBuf>) -> Result<String> {
    match path {
        Some(path) => fs::read_to_string(path).with_context(|| format!("failed to read {path:?}")),
        None => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer).context("failed to read request from stdin")?;
            Ok(buffer)
        }
    }
}

fn write_output(path: &Option<PathBuf>, contents: &str) -> Result<()> {
    match path {
        Some(path) => fs::write(path, contents).with_context(|| format!("failed to write {path:?}")),
        None => {
            io::stdout().write_all(contents.as_bytes()).context("failed to write to stdout")?;
            io::stdout().write_all(b"\n").ok();
            Ok(())
        }
    }
}

#[derive(serde::Serialize)]
struct SynthesisOutput<'a> {
    requirements: &'a om_core::requirements::DesignRequirements,
    operating_points: &'a [waveform::OperatingPoint],
}

fn synthesize_buck(args: SynthesizeArgs) -> Result<()> {
    let contents = read_input(&args.input)?;
    let request: BuckRequest = serde_json::from_str(&contents).context("failed to parse buck request")?;
    let requirements = request.process_design_requirements().context("failed to derive design requirements")?;
    let operating_points = request
        .process_operating_points(&requirements.turns_ratios, &requirements.magnetizing_inductance)
        .context("failed to synthesise operating points")?;
    let output = SynthesisOutput { requirements: &requirements, operating_points: &operating_points };
    let json = serde_json::to_string_pretty(&output).context("failed to serialise result")?;
    write_output(&args.out, &json)
}

fn synthesize_boost(args: SynthesizeArgs) -> Result<()> {
    let contents = read_input(&args.input)?;
    let request: BoostRequest = serde_json::from_str(&contents).context("failed to parse boost request")?;
    let requirements = request.process_design_requirements().context("failed to derive design requirements")?;
    let operating_points = request
        .process_operating_points(&requirements.turns_ratios, &requirements.magnetizing_inductance)
        .context("failed to synthesise operating points")?;
    let output = SynthesisOutput { requirements: &requirements, operating_points: &operating_points };
    let json = serde_json::to_string_pretty(&output).context("failed to serialise result")?;
    write_output(&args.out, &json)
}

fn netlist_preview(args: NetlistPreviewArgs) -> Result<()> {
    let contents = read_input(&args.input)?;
    let request: BuckRequest = serde_json::from_str(&contents).context("failed to parse buck request")?;
    let requirements = request.process_design_requirements().context("failed to derive design requirements")?;

    let point = request
        .operating_points
        .first()
        .context("buck request needs at least one operating point to preview")?;
    let v_in_max = request
        .input_voltage
        .maximum
        .or(request.input_voltage.nominal)
        .context("buck request needs a maximum or nominal input voltage")?;
    let duty_cycle = (point.output_voltage + request.diode_voltage_drop)
        / ((v_in_max + request.diode_voltage_drop) * request.efficiency);

    let outputs = [ngspice_adapter::OutputSpec { voltage: point.output_voltage, current: point.output_current, turns_ratio: 1.0 }];
    let netlist_request = ngspice_adapter::NetlistRequest {
        topology: om_core::topology::Topology::Buck,
        input_voltage_index: 0,
        operating_point_index: 0,
        input_voltage: v_in_max,
        diode_voltage_drop: request.diode_voltage_drop,
        duty_cycle,
        frequency: args.frequency.unwrap_or(point.frequency),
        outputs: &outputs,
        magnetizing_inductance: requirements.magnetizing_inductance.get_nominal(),
        magnetic: None,
        number_steady_periods: 50,
        number_extract_periods: 2,
        save_signals: &["v(out)".to_string(), "i(vmonprimary)".to_string()],
    };
    let netlist = ngspice_adapter::build_netlist(&netlist_request).context("failed to build netlist")?;
    write_output(&args.out, &netlist)
}
