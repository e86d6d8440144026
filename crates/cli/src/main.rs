//! lcpath CLI - batch pairwise least-cost-path analysis

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use lcpath_analysis::RunConfig;
use lcpath_core::io::read_geotiff;
use lcpath_core::{LocationFields, LocationSet, Raster};
use lcpath_engine::VerticalFactor;

#[derive(Parser)]
#[command(name = "lcpath")]
#[command(author, version, about = "Pairwise least-cost-path analysis over a DEM", long_about = None)]
struct Cli {
    /// DEM raster (GeoTIFF)
    dem: PathBuf,

    /// First location set (CSV)
    locations_one: PathBuf,

    /// Second location set (CSV). May be the same file as the first.
    locations_two: PathBuf,

    /// Slope/cost vertical factor table
    cost_table: PathBuf,

    /// Output directory
    #[arg(short, long, default_value = "lcpath_output")]
    output: PathBuf,

    /// Repeat the analysis with source/destination roles swapped
    #[arg(short, long)]
    round_trip: bool,

    /// Keep per-pair cost-path rasters and tables
    #[arg(short, long)]
    keep_intermediate: bool,

    /// Douglas-Peucker tolerance for output polylines, in CRS units
    #[arg(short, long, default_value = "1.0")]
    simplify_tolerance: f64,

    /// CSV column holding the short location identifier
    #[arg(long, default_value = "id")]
    id_field: String,

    /// CSV column holding the location display name
    #[arg(long, default_value = "name")]
    name_field: String,

    /// CSV column holding the location x coordinate
    #[arg(long, default_value = "x")]
    x_field: String,

    /// CSV column holding the location y coordinate
    #[arg(long, default_value = "y")]
    y_field: String,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn setup_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");
}

fn spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap(),
    );
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}

fn read_dem(path: &PathBuf) -> Result<Raster<f64>> {
    let pb = spinner("Reading DEM...");
    let raster: Raster<f64> = read_geotiff(path).context("Failed to read DEM")?;
    pb.finish_and_clear();
    info!("DEM: {} x {}, cell size {}", raster.cols(), raster.rows(), raster.cell_size());
    Ok(raster)
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    let dem = read_dem(&cli.dem)?;

    let vf = VerticalFactor::from_path(&cli.cost_table)
        .with_context(|| format!("Failed to read cost table {}", cli.cost_table.display()))?;
    let (lo, hi) = vf.slope_range();
    info!("Cost table: slopes {} to {} degrees", lo, hi);

    let fields = LocationFields {
        id: cli.id_field.clone(),
        name: cli.name_field.clone(),
        x: cli.x_field.clone(),
        y: cli.y_field.clone(),
    };
    let set_one = LocationSet::from_csv_path(&cli.locations_one, &fields)
        .with_context(|| format!("Failed to read locations {}", cli.locations_one.display()))?;
    let set_two = LocationSet::from_csv_path(&cli.locations_two, &fields)
        .with_context(|| format!("Failed to read locations {}", cli.locations_two.display()))?;
    info!(
        "Loaded {} and {} locations ({} ordered pairs per pass)",
        set_one.len(),
        set_two.len(),
        set_one.len() * set_two.len()
    );

    let mut config = RunConfig::new(&cli.output);
    config.round_trip = cli.round_trip;
    config.keep_intermediate = cli.keep_intermediate;
    config.simplify_tolerance = cli.simplify_tolerance;
    config.set_one_label = cli.locations_one.display().to_string();
    config.set_two_label = cli.locations_two.display().to_string();

    let summary = lcpath_analysis::run(&config, &dem, &vf, &set_one, &set_two)
        .context("Analysis run failed")?;

    println!("Done in {:.2?}", summary.elapsed);
    println!("  Rows recorded:   {}", summary.rows_recorded);
    println!("  Surfaces built:  {}", summary.surfaces_built);
    if summary.sources_failed > 0 {
        println!("  Sources failed:  {}", summary.sources_failed);
    }
    if summary.pairs_failed > 0 {
        println!("  Pairs failed:    {}", summary.pairs_failed);
    }
    println!("  Master table:    {}", summary.master_path.display());
    println!("  Run log:         {}", summary.log_path.display());

    Ok(())
}
