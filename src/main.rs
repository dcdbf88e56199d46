//! Potentials - 2D Electrostatic Field Solver
//!
//! Solves a built-in parallel-plate arrangement (two full-width conductor
//! plates on the top and bottom edges of the workspace) and writes the
//! solved potential grid as CSV on stdout, with a convergence summary on
//! stderr.
//!
//! # Usage
//!
//! ```bash
//! potentials --rows 65 --cols 65 --plate-voltage 5 > voltage.csv
//! ```

use clap::Parser;
use potentials_core::{
    error::Result, Geometry, Point, Rect, Shape, SolveStatus, SolverConfig, Workspace,
};

/// 2D electrostatic field solver (parallel-plate demonstration)
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Number of grid rows
    #[arg(long, default_value_t = 33)]
    rows: usize,

    /// Number of grid columns
    #[arg(long, default_value_t = 33)]
    cols: usize,

    /// Workspace width and height in real-space units
    #[arg(long, default_value_t = 10.0)]
    extent: f64,

    /// Plate voltage; the plates sit at +V and -V
    #[arg(long, default_value_t = 5.0)]
    plate_voltage: f64,

    /// Relative permittivity of a dielectric slab filling the lower half,
    /// 1.0 for vacuum throughout
    #[arg(long, default_value_t = 1.0)]
    slab_epsilon_r: f64,

    /// Convergence tolerance in volts
    #[arg(long, default_value_t = 1e-6)]
    tolerance: f64,

    /// Maximum number of relaxation sweeps
    #[arg(long, default_value_t = 10_000)]
    max_iterations: usize,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut ws = Workspace::new(
        Rect::new(0.0, 0.0, args.extent, args.extent),
        args.rows,
        args.cols,
    )?;

    // Bottom plate at -V, top plate at +V.
    ws.add_shape(&Shape::conductor(
        -args.plate_voltage,
        Geometry::Line {
            start: Point::new(0.0, 0.0),
            end: Point::new(args.extent, 0.0),
        },
    ))?;
    ws.add_shape(&Shape::conductor(
        args.plate_voltage,
        Geometry::Line {
            start: Point::new(0.0, args.extent),
            end: Point::new(args.extent, args.extent),
        },
    ))?;

    if args.slab_epsilon_r != 1.0 {
        ws.add_shape(&Shape::dielectric(
            args.slab_epsilon_r,
            Geometry::Rectangle {
                center: Point::new(args.extent / 2.0, args.extent / 4.0),
                size: potentials_core::Size::new(args.extent, args.extent / 2.0),
            },
        ))?;
    }

    let config = SolverConfig::new()
        .with_tolerance(args.tolerance)
        .with_max_iterations(args.max_iterations);
    let report = ws.solve_with(config)?;

    match report.status {
        SolveStatus::Solved => eprintln!(
            "converged after {} sweeps (residual {:.3e})",
            report.iterations, report.residual
        ),
        SolveStatus::NotConverged => eprintln!(
            "iteration cap of {} reached (residual {:.3e}); results are best-effort",
            report.iterations, report.residual
        ),
    }
    eprintln!(
        "voltage range [{:.4}, {:.4}], peak field {:.4}",
        ws.resultant_voltage().min(),
        ws.resultant_voltage().max(),
        ws.field_magnitude().max()
    );

    // One CSV row per grid row, bottom row first.
    for r in 0..ws.rows() {
        let line: Vec<String> = (0..ws.cols())
            .map(|c| format!("{:.6}", ws.voltage_at(r, c).unwrap_or(f64::NAN)))
            .collect();
        println!("{}", line.join(","));
    }

    Ok(())
}
