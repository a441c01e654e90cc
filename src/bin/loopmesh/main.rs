//! loopmesh CLI - edit and subdivide the built-in meshes.
//!
//! Usage: loopmesh [-v] <COMMAND> --shape <SHAPE> [OPTIONS]
//!
//! Run `loopmesh --help` for available commands.

use std::io::Write;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;

use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use loopmesh::algo::subdivide::{self, SubdivideOptions, DEFAULT_MAX_FACES};
use loopmesh::algo::Progress;
use loopmesh::error::MeshError;
use loopmesh::mesh::{primitives, EdgeId, HalfEdgeMesh};

#[derive(Parser)]
#[command(name = "loopmesh")]
#[command(author, version, about = "Half-edge mesh editing and Loop subdivision", long_about = None)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Display mesh information
    Info {
        #[command(flatten)]
        source: Source,
    },

    /// Flip one interior edge
    Flip {
        #[command(flatten)]
        source: Source,

        /// Edge index
        #[arg(short, long)]
        edge: usize,
    },

    /// Split one interior edge at its midpoint
    Split {
        #[command(flatten)]
        source: Source,

        /// Edge index
        #[arg(short, long)]
        edge: usize,
    },

    /// Apply Loop subdivision
    Subdivide {
        #[command(flatten)]
        source: Source,

        /// Number of subdivision iterations
        #[arg(short, long, default_value = "1")]
        iterations: usize,

        /// Use single-threaded execution (for benchmarking)
        #[arg(long)]
        sequential: bool,

        /// Refuse to produce more faces than this
        #[arg(long, default_value_t = DEFAULT_MAX_FACES)]
        max_faces: usize,
    },
}

/// Which built-in mesh to start from.
#[derive(Args)]
struct Source {
    /// Built-in mesh
    #[arg(short, long, value_enum, default_value = "icosahedron")]
    shape: Shape,

    /// Cells per side (grid only)
    #[arg(long, default_value = "4")]
    cells: usize,
}

#[derive(Copy, Clone, PartialEq, Eq, Debug, ValueEnum)]
enum Shape {
    /// Tetrahedron (4 faces)
    Tetrahedron,
    /// Octahedron on the unit axes (8 faces)
    Octahedron,
    /// Icosahedron on the unit sphere (20 faces)
    Icosahedron,
    /// Unit cube (12 faces)
    Cube,
    /// Open planar grid
    Grid,
}

impl Source {
    fn build(&self) -> Result<HalfEdgeMesh, MeshError> {
        debug!(shape = ?self.shape, "building mesh");
        match self.shape {
            Shape::Tetrahedron => primitives::tetrahedron(),
            Shape::Octahedron => primitives::octahedron(),
            Shape::Icosahedron => primitives::icosahedron(),
            Shape::Cube => primitives::cube(),
            Shape::Grid => primitives::grid(self.cells, 1.0),
        }
    }
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Info { source } => cmd_info(&source)?,
        Commands::Flip { source, edge } => cmd_flip(&source, edge)?,
        Commands::Split { source, edge } => cmd_split(&source, edge)?,
        Commands::Subdivide {
            source,
            iterations,
            sequential,
            max_faces,
        } => cmd_subdivide(&source, iterations, sequential, max_faces)?,
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
            (current * 100 + total / 2) / total
        };

        // Only redraw when the bar moves forward.
        let previous = max_percent.fetch_max(percent, Ordering::Relaxed);
        if percent <= previous && percent != 100 {
            return;
        }

        let bar_width = 30;
        let filled = (percent * bar_width) / 100;
        eprint!(
            "\r[{}{}] {:3}% {}",
            "=".repeat(filled),
            " ".repeat(bar_width - filled),
            percent,
            message
        );
        let _ = std::io::stderr().flush();

        if current >= total {
            eprintln!();
        }
    })
}

fn print_summary(mesh: &HalfEdgeMesh) {
    println!("Vertices: {}", mesh.num_vertices());
    println!("Edges: {}", mesh.num_edges());
    println!("Faces: {}", mesh.num_faces());
    println!("Half-edges: {}", mesh.num_halfedges());
    println!("Euler characteristic: {}", mesh.euler_characteristic());
}

fn edge_arg(mesh: &HalfEdgeMesh, edge: usize) -> Result<EdgeId, MeshError> {
    if edge >= mesh.num_edges() {
        return Err(MeshError::invalid_param("edge", edge, "no such edge"));
    }
    Ok(EdgeId::new(edge))
}

fn cmd_info(source: &Source) -> Result<(), Box<dyn std::error::Error>> {
    let mesh = source.build()?;

    println!("Shape: {:?}", source.shape);
    print_summary(&mesh);
    println!("Surface area: {:.6}", mesh.surface_area());

    if let Some((min, max)) = mesh.bounding_box() {
        println!(
            "Bounding box: ({:.3}, {:.3}, {:.3}) to ({:.3}, {:.3}, {:.3})",
            min.x, min.y, min.z, max.x, max.y, max.z
        );
    }

    let lengths: Vec<f64> = mesh.edge_ids().map(|e| mesh.edge_length(e)).collect();
    let avg = lengths.iter().sum::<f64>() / lengths.len().max(1) as f64;
    println!("Average edge length: {:.6}", avg);

    let valences: Vec<usize> = mesh.vertex_ids().map(|v| mesh.valence(v)).collect();
    if let (Some(min), Some(max)) = (valences.iter().min(), valences.iter().max()) {
        println!("Valence range: [{}, {}]", min, max);
    }

    let boundary = mesh.num_boundary_edges();
    if boundary == 0 {
        println!("Topology: Closed (no boundary)");
    } else {
        println!("Topology: Open ({} boundary edges)", boundary);
    }

    mesh.validate()?;
    println!("Invariants: OK");

    Ok(())
}

fn cmd_flip(source: &Source, edge: usize) -> Result<(), Box<dyn std::error::Error>> {
    let mut mesh = source.build()?;
    let e = edge_arg(&mesh, edge)?;

    let [a, b] = mesh.edge_vertices(e);
    match mesh.flip_edge(e) {
        Some(e) => {
            let [c, d] = mesh.edge_vertices(e);
            println!("Flipped {:?}: {:?}-{:?} -> {:?}-{:?}", e, a, b, c, d);
        }
        None => println!("{:?} is a boundary edge; mesh unchanged", e),
    }

    mesh.validate()?;
    print_summary(&mesh);
    Ok(())
}

fn cmd_split(source: &Source, edge: usize) -> Result<(), Box<dyn std::error::Error>> {
    let mut mesh = source.build()?;
    let e = edge_arg(&mesh, edge)?;

    match mesh.split_edge_detailed(e) {
        Some(split) => {
            let p = mesh.position(split.vertex);
            println!(
                "Split {:?}: new vertex {:?} at ({:.3}, {:.3}, {:.3})",
                e, split.vertex, p.x, p.y, p.z
            );
            println!("New faces: {:?}", split.faces);
        }
        None => println!("{:?} is a boundary edge; mesh unchanged", e),
    }

    mesh.validate()?;
    print_summary(&mesh);
    Ok(())
}

fn cmd_subdivide(
    source: &Source,
    iterations: usize,
    sequential: bool,
    max_faces: usize,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut mesh = source.build()?;

    println!("Loaded: {} vertices, {} faces", mesh.num_vertices(), mesh.num_faces());

    let options = SubdivideOptions::new(iterations)
        .with_parallel(!sequential)
        .with_max_faces(max_faces);
    let mode = if sequential { "sequential" } else { "parallel" };
    let progress = create_progress();

    println!("Applying Loop subdivision ({} iterations, {})...", iterations, mode);
    let start = Instant::now();
    let stats = subdivide::loop_subdivide_with_progress(&mut mesh, &options, &progress)?;
    let elapsed = start.elapsed();

    println!(
        "Result: {} vertices, {} edges, {} faces ({:.2?})",
        stats.vertices_after, stats.edges_after, stats.faces_after, elapsed
    );
    println!("Last pass: {} splits, {} flips", stats.splits, stats.flips);

    Ok(())
}
