//! Camera calibration helper.
//!
//! Builds a projection either from the imaged corners of a planar marker or
//! from the camera's view angles, then prints the resulting matrices and
//! optionally unprojects screen points back into camera space.

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use glam::{Mat4, Vec2, Vec3};

use log::LevelFilter;
use ocular_projection::{Projection, Quad};

#[derive(Parser)]
#[command(name = "ocular-calib")]
#[command(version, about = "Camera projection calibration", long_about = None)]
struct Cli {
    /// Log filter (env_logger syntax); defaults to RUST_LOG, then "info"
    #[arg(long, global = true, value_name = "FILTER")]
    log: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fit a frustum to four marker corners
    Corners {
        /// Bottom-left corner, camera space
        #[arg(long, value_name = "X,Y,Z", value_parser = parse_vec3, allow_hyphen_values = true)]
        a: Vec3,

        /// Bottom-right corner
        #[arg(long, value_name = "X,Y,Z", value_parser = parse_vec3, allow_hyphen_values = true)]
        b: Vec3,

        /// Top-left corner
        #[arg(long, value_name = "X,Y,Z", value_parser = parse_vec3, allow_hyphen_values = true)]
        c: Vec3,

        /// Top-right corner
        #[arg(long, value_name = "X,Y,Z", value_parser = parse_vec3, allow_hyphen_values = true)]
        d: Vec3,

        #[command(flatten)]
        common: Common,
    },

    /// Symmetric frustum from full view angles
    Angles {
        /// Horizontal view angle in degrees
        #[arg(long, value_name = "DEG")]
        horizontal: f32,

        /// Vertical view angle in degrees
        #[arg(long, value_name = "DEG")]
        vertical: f32,

        #[command(flatten)]
        common: Common,
    },
}

#[derive(Args)]
struct Common {
    /// Rotation about the forward axis in degrees
    #[arg(long, default_value_t = 0.0, value_name = "DEG", allow_hyphen_values = true)]
    rotation: f32,

    /// NDC point to unproject (can be specified multiple times)
    #[arg(long, value_name = "X,Y", value_parser = parse_vec2, allow_hyphen_values = true)]
    unproject: Vec<Vec2>,
}

/// `--log` first, then `RUST_LOG`, then `info`.
fn logger(filter: Option<&str>) -> env_logger::Builder {
    let mut builder = env_logger::Builder::new();
    match filter.map(str::to_owned).or_else(|| std::env::var("RUST_LOG").ok()) {
        Some(filter) => builder.parse_filters(&filter),
        None => builder.filter_level(LevelFilter::Info),
    };
    builder
}

fn parse_components<const N: usize>(s: &str) -> Result<[f32; N]> {
    let parts: Vec<&str> = s.split(',').map(str::trim).collect();
    if parts.len() != N {
        bail!("expected {N} comma-separated numbers, got {}", parts.len());
    }
    let mut out = [0.0; N];
    for (slot, part) in out.iter_mut().zip(parts) {
        *slot = part
            .parse()
            .with_context(|| format!("`{part}` is not a number"))?;
    }
    Ok(out)
}

fn parse_vec3(s: &str) -> Result<Vec3> {
    parse_components::<3>(s).map(Vec3::from_array)
}

fn parse_vec2(s: &str) -> Result<Vec2> {
    parse_components::<2>(s).map(Vec2::from_array)
}

fn print_matrix(label: &str, m: &Mat4) {
    println!("{label}:");
    // Row-major for reading; storage is column-major.
    for row in 0..4 {
        let r = m.row(row);
        println!("  [{:>10.5} {:>10.5} {:>10.5} {:>10.5}]", r.x, r.y, r.z, r.w);
    }
}

fn report(projection: &Projection, points: &[Vec2]) {
    print_matrix("projection", projection.projection_matrix());
    print_matrix("rotation", projection.rotation_matrix());
    print_matrix("view", projection.view_matrix());

    if points.is_empty() {
        return;
    }
    println!("unprojected:");
    for (p, v) in points
        .iter()
        .zip(projection.inverse_view_iter(points.iter().copied()))
    {
        println!("  ({:.4}, {:.4}) -> ({:.5}, {:.5}, {:.5})", p.x, p.y, v.x, v.y, v.z);
    }
}

fn run(command: Commands) -> Result<()> {
    match command {
        Commands::Corners { a, b, c, d, common } => {
            log::debug!("fitting frustum to corners {a} {b} {c} {d}");
            let projection = Projection::from_quad(&Quad::new(a, b, c, d), common.rotation)
                .context("failed to fit projection to marker corners")?;
            report(&projection, &common.unproject);
        }
        Commands::Angles {
            horizontal,
            vertical,
            common,
        } => {
            log::debug!("building frustum from {horizontal}x{vertical} degree view");
            let projection = Projection::from_view_angles(horizontal, vertical, common.rotation)
                .context("failed to build projection from view angles")?;
            report(&projection, &common.unproject);
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    logger(cli.log.as_deref()).init();

    run(cli.command)
}
