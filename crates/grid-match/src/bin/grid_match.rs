//! Command-line runner for the grid-correspondence stage.
//!
//! Reads a pipeline model JSON, resolves the named stage's `rects` array,
//! runs the matcher, and prints the diagnostics report as JSON. On stage
//! failure the partial report is still printed and the process exits
//! non-zero.

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use grid_match::input::{points_from_rects, rects_from_model};
use grid_match::{MatchGrid, MatchGridParams, MatchGridReport};
use log::error;

#[derive(Parser, Debug)]
#[command(name = "grid-match", version, about = "Match detected grid points to an ideal planar grid")]
struct Args {
    /// Pipeline model JSON file holding the prior stage's rects.
    #[arg(long)]
    input: PathBuf,

    /// Name of the model stage holding the rects array.
    #[arg(long)]
    model: String,

    /// Physical grid spacing along columns (x).
    #[arg(long, default_value_t = 5.0)]
    sep_x: f64,

    /// Physical grid spacing along rows (y).
    #[arg(long, default_value_t = 5.0)]
    sep_y: f64,

    /// Fractional half-width of the spacing tolerance band.
    #[arg(long, default_value_t = 0.35)]
    tolerance: f64,

    /// Depth assigned to every object point.
    #[arg(long, default_value_t = 0.0)]
    obj_z: f64,

    /// Pretty-print the report.
    #[arg(long)]
    pretty: bool,
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err}");
            eprintln!("grid-match: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let raw = fs::read_to_string(&args.input)?;
    let model: serde_json::Value = serde_json::from_str(&raw)?;
    let rects = rects_from_model(&model, &args.model)?;
    let points = points_from_rects(rects);

    let params = MatchGridParams {
        obj_z: args.obj_z,
        sep_x: args.sep_x,
        sep_y: args.sep_y,
        tolerance: args.tolerance,
    };
    let stage = MatchGrid::new(params)?;

    match stage.match_points(&points) {
        Ok(result) => {
            print_report(&result.report, args.pretty)?;
            Ok(())
        }
        Err(err) => {
            if let Some(report) = err.report() {
                print_report(report, args.pretty)?;
            }
            Err(err.into())
        }
    }
}

fn print_report(report: &MatchGridReport, pretty: bool) -> Result<(), serde_json::Error> {
    let json = if pretty {
        serde_json::to_string_pretty(report)?
    } else {
        serde_json::to_string(report)?
    };
    println!("{json}");
    Ok(())
}
