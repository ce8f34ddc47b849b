//! Multires CLI - exercises the multiresolution codec on procedural meshes.
//!
//! Usage: multires <COMMAND> [OPTIONS]
//!
//! Run `multires --help` for available commands.

use std::io::Write;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;

use clap::{Args, Parser, Subcommand, ValueEnum};
use nalgebra::{Isometry3, Point3, Translation3, UnitQuaternion, Vector3};

use multires::algo::multires::{Multimesh, MultiresOptions, NormalSource};
use multires::algo::subdivide::{SubdivisionOperator, SubdivisionScheme};
use multires::algo::Progress;
use multires::mesh::{primitives, LevelMesh};

#[derive(Parser)]
#[command(name = "multires")]
#[command(author, version, about = "Multiresolution mesh CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Display per-level statistics of a subdivided shape
    Info {
        #[command(flatten)]
        stack: StackArgs,
    },

    /// Sculpt the top level, analyse down to the base and synthesize back
    Roundtrip {
        #[command(flatten)]
        stack: StackArgs,

        /// Sculpt amplitude along the vertex normals
        #[arg(short, long, default_value = "0.05")]
        amplitude: f64,
    },

    /// Rigidly move the base level and check the top level follows
    Edit {
        #[command(flatten)]
        stack: StackArgs,

        /// Sculpt amplitude along the vertex normals
        #[arg(short, long, default_value = "0.05")]
        amplitude: f64,

        /// Rotation about the Z axis, in degrees
        #[arg(long, default_value = "30.0")]
        angle: f64,

        /// Translation along the X axis
        #[arg(long, default_value = "1.0")]
        offset: f64,
    },
}

#[derive(Args)]
struct StackArgs {
    /// Base shape
    #[arg(short, long, value_enum, default_value = "icosahedron")]
    shape: Shape,

    /// Total number of levels, base included
    #[arg(short, long, default_value = "4")]
    levels: usize,

    /// Subdivision scheme
    #[arg(long, value_enum, default_value = "loop")]
    scheme: Scheme,

    /// Build frames from the stored fine normals instead of the prediction
    #[arg(long)]
    stored_normals: bool,

    /// Use single-threaded execution (for benchmarking)
    #[arg(long)]
    sequential: bool,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum Shape {
    /// Regular icosahedron (closed)
    Icosahedron,
    /// Tetrahedron (closed)
    Tetrahedron,
    /// 4 x 4 planar grid (open)
    Grid,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum Scheme {
    /// Loop subdivision
    Loop,
    /// Edge midpoints
    Midpoint,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Info { stack } => cmd_info(&stack)?,
        Commands::Roundtrip { stack, amplitude } => cmd_roundtrip(&stack, amplitude)?,
        Commands::Edit {
            stack,
            amplitude,
            angle,
            offset,
        } => cmd_edit(&stack, amplitude, angle, offset)?,
    }

    Ok(())
}

/// Create a progress reporter that displays a progress bar on the terminal.
fn create_progress() -> Progress {
    let max_percent = Arc::new(AtomicUsize::new(0));

    Progress::new(move |current, total, message| {
        if total == 0 {
            return;
        }

        let percent = if current >= total {
            100
        } else {
            ((current * 100) + (total / 2)) / total
        };

        // Only redraw when the bar grows
        let previous = max_percent.fetch_max(percent, Ordering::Relaxed);
        if percent <= previous && percent != 100 {
            return;
        }

        let bar_width = 30;
        let filled = (percent * bar_width) / 100;
        let bar = "=".repeat(filled);
        let space = " ".repeat(bar_width - filled);

        eprint!("\r[{}{}] {:3}% {}", bar, space, percent, message);
        let _ = std::io::stderr().flush();

        if current >= total {
            eprintln!();
            max_percent.store(0, Ordering::Relaxed);
        }
    })
}

/// A level stack whose prediction honours `--sequential`.
type Stack = Multimesh<Box<dyn SubdivisionOperator>>;

fn build_stack(args: &StackArgs) -> Result<Stack, Box<dyn std::error::Error>> {
    if args.levels == 0 {
        return Err("at least one level is required".into());
    }

    let base = match args.shape {
        Shape::Icosahedron => primitives::icosahedron()?,
        Shape::Tetrahedron => primitives::tetrahedron()?,
        Shape::Grid => primitives::grid(4)?,
    };
    let scheme = match args.scheme {
        Scheme::Loop => SubdivisionScheme::Loop,
        Scheme::Midpoint => SubdivisionScheme::Midpoint,
    };
    let normals = if args.stored_normals {
        NormalSource::Stored
    } else {
        NormalSource::Predicted
    };
    let options = MultiresOptions::default()
        .with_parallel(!args.sequential)
        .with_normals(normals);

    let mut stack = Multimesh::new(base, scheme.operator(!args.sequential), options);
    for _ in 1..args.levels {
        stack.add_level()?;
    }
    Ok(stack)
}

/// Displace every vertex along its normal by a smooth wave and paint it
/// with its position.
fn sculpt(level: &mut LevelMesh, amplitude: f64) {
    let normals = level.normals().to_vec();
    for (p, n) in level.positions_mut().iter_mut().zip(&normals) {
        let wave = (5.0 * p.x).sin() * (4.0 * p.y).cos() + (3.0 * p.z).sin();
        *p += n * (amplitude * wave);
    }
    let positions = level.positions().to_vec();
    for (c, p) in level.colors_mut().iter_mut().zip(&positions) {
        *c = p.coords.map(|x| 0.5 + 0.5 * x.tanh());
    }
    level.update_normals();
}

fn max_distance(a: &[Point3<f64>], b: &[Point3<f64>]) -> f64 {
    a.iter().zip(b).map(|(p, q)| (p - q).norm()).fold(0.0, f64::max)
}

fn max_color_distance(a: &[Vector3<f64>], b: &[Vector3<f64>]) -> f64 {
    a.iter().zip(b).map(|(p, q)| (p - q).norm()).fold(0.0, f64::max)
}

fn cmd_info(args: &StackArgs) -> Result<(), Box<dyn std::error::Error>> {
    let stack = build_stack(args)?;

    println!("Levels: {}", stack.num_levels());
    for (i, level) in stack.levels().iter().enumerate() {
        print!("  Level {}: {} vertices, {} faces", i, level.num_vertices(), level.num_faces());
        if let Some(refinement) = level.refinement() {
            let boundary = refinement.edges().iter().filter(|e| e.is_boundary()).count();
            print!(", {} edge vertices ({} on boundary)", refinement.edges().len(), boundary);
        }
        println!();
    }

    let top = stack.selected_level();
    if let Some((min, max)) = top.bounding_box() {
        println!("Bounding box: ({:.3}, {:.3}, {:.3}) to ({:.3}, {:.3}, {:.3})",
            min.x, min.y, min.z, max.x, max.y, max.z);
    }

    Ok(())
}

fn cmd_roundtrip(args: &StackArgs, amplitude: f64) -> Result<(), Box<dyn std::error::Error>> {
    let mut stack = build_stack(args)?;
    let top = stack.num_levels() - 1;

    sculpt(stack.selected_level_mut(), amplitude);
    let positions = stack.selected_level().positions().to_vec();
    let colors = stack.selected_level().colors().to_vec();
    println!("Sculpted level {}: {} vertices", top, positions.len());

    let mode = if args.sequential { "sequential" } else { "parallel" };
    let progress = create_progress();

    println!("Analysing down to level 0 ({})...", mode);
    let start = Instant::now();
    stack.select_resolution_with_progress(0, &progress)?;
    let analysis = start.elapsed();

    for (i, level) in stack.levels().iter().enumerate().skip(1) {
        if let Some(details) = level.details() {
            println!("  Level {}: max detail {:.6}", i, details.max_magnitude());
        }
    }

    println!("Synthesizing up to level {} ({})...", top, mode);
    let start = Instant::now();
    stack.select_resolution_with_progress(top, &progress)?;
    let synthesis = start.elapsed();

    let level = stack.selected_level();
    println!("Max position error: {:.3e}", max_distance(level.positions(), &positions));
    println!("Max color error: {:.3e}", max_color_distance(level.colors(), &colors));
    println!("Analysis: {:.2?}, synthesis: {:.2?}", analysis, synthesis);

    Ok(())
}

fn cmd_edit(
    args: &StackArgs,
    amplitude: f64,
    angle: f64,
    offset: f64,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut stack = build_stack(args)?;
    let top = stack.num_levels() - 1;

    sculpt(stack.selected_level_mut(), amplitude);
    let original = stack.selected_level().positions().to_vec();

    let progress = create_progress();
    stack.select_resolution_with_progress(0, &progress)?;

    let motion = Isometry3::from_parts(
        Translation3::new(offset, 0.0, 0.0),
        UnitQuaternion::from_axis_angle(&Vector3::z_axis(), angle.to_radians()),
    );
    println!("Moving base level: {:.1} degrees about Z, {:.3} along X", angle, offset);
    let base = stack.selected_level_mut();
    for p in base.positions_mut() {
        *p = motion * *p;
    }
    base.update_normals();

    let start = Instant::now();
    stack.select_resolution_with_progress(top, &progress)?;
    let elapsed = start.elapsed();

    let expected: Vec<Point3<f64>> = original.iter().map(|p| motion * p).collect();
    let deviation = max_distance(stack.selected_level().positions(), &expected);
    println!("Level {} deviation from moved original: {:.3e} ({:.2?})", top, deviation, elapsed);

    Ok(())
}
