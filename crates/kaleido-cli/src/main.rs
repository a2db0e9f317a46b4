//! Kaleido CLI - launches the real-time demos

use anyhow::Result;
use clap::{Parser, Subcommand};
use kaleido_core::field::FieldConfig;
use kaleido_render::{BlobConfig, BlobScene, LatticeScene, WindowConfig};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "kaleido")]
#[command(about = "Procedural real-time graphics demos", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Point field with Delaunay edges and pulsing Voronoi cells
    Lattice {
        /// Window width
        #[arg(long, default_value = "1280")]
        width: u32,

        /// Window height
        #[arg(long, default_value = "720")]
        height: u32,

        /// Window title
        #[arg(long)]
        title: Option<String>,

        /// Side length of the sampled scalar field
        #[arg(long, default_value = "512")]
        grid_size: usize,

        /// Number of plane waves summed into the field
        #[arg(long, default_value = "5")]
        waves: usize,
    },

    /// Noise-warped sphere on an orbiting camera
    Blob {
        /// Window width
        #[arg(long, default_value = "1280")]
        width: u32,

        /// Window height
        #[arg(long, default_value = "720")]
        height: u32,

        /// Window title
        #[arg(long)]
        title: Option<String>,

        /// Icosphere subdivision level
        #[arg(short, long, default_value = "5")]
        subdivisions: u32,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Lattice {
            width,
            height,
            title,
            grid_size,
            waves,
        } => {
            let field = FieldConfig::default()
                .with_grid_size(grid_size)
                .with_waves(waves);
            run_lattice(WindowConfig { title, width, height }, field)?;
        }
        Commands::Blob {
            width,
            height,
            title,
            subdivisions,
        } => {
            run_blob(WindowConfig { title, width, height }, BlobConfig { subdivisions })?;
        }
    }

    Ok(())
}

fn run_lattice(window: WindowConfig, field: FieldConfig) -> Result<()> {
    field.validate()?;
    info!(
        grid_size = field.grid_size,
        waves = field.waves,
        "Opening lattice demo"
    );
    println!("{}", kaleido_render::controls_help());

    kaleido_render::run::<LatticeScene>(window, field)
}

fn run_blob(window: WindowConfig, blob: BlobConfig) -> Result<()> {
    if blob.subdivisions > 7 {
        anyhow::bail!(
            "subdivision level {} is too fine, use at most 7",
            blob.subdivisions
        );
    }
    info!(subdivisions = blob.subdivisions, "Opening blob demo");
    println!("{}", kaleido_render::controls_help());

    kaleido_render::run::<BlobScene>(window, blob)
}
