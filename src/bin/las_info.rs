use anyhow::{bail, Context, Result};
use clap::Parser;
use std::path::PathBuf;

use geoflow::parsers::Las;
use geoflow::petro::{PorosityParams, ShaleVolumeParams};
use geoflow::section::SectionView;
use geoflow::tracks::TrackKind;
use geoflow::well::Well;

/// Print what the LAS parser makes of a file
#[derive(Parser, Debug)]
#[command(name = "las_info")]
#[command(version)]
struct Args {
    /// LAS file to inspect
    file: PathBuf,

    /// Clean-sand gamma-ray value for the shale volume summary
    #[arg(long, default_value_t = 30.0)]
    gr_clean: f64,

    /// Shale gamma-ray value for the shale volume summary
    #[arg(long, default_value_t = 150.0)]
    gr_shale: f64,

    /// Number of data rows to print
    #[arg(long, default_value_t = 5)]
    rows: usize,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_target(false)
        .init();

    let args = Args::parse();

    println!("Reading file: {}", args.file.display());
    let bytes = std::fs::read(&args.file)
        .with_context(|| format!("failed to read {}", args.file.display()))?;
    println!("File size: {} bytes", bytes.len());
    let contents = Las::decode(&bytes);
    if !Las::detect(&contents) {
        bail!("{} does not start with a ~Version section", args.file.display());
    }

    let well = Well::load(&args.file)
        .with_context(|| format!("failed to parse {}", args.file.display()))?;

    println!("\n=== Parse Results ===");
    println!("Well: {}", well.name);
    println!(
        "LAS version: {}",
        if well.version.is_empty() { "?" } else { &well.version }
    );
    println!("Curves: {}", well.curves().len());
    println!("Samples: {}", well.sample_count());
    match (well.depth_curve_name(), well.depth_extent()) {
        (Some(name), Some((lo, hi))) => {
            println!("Depth: {} {:.2} to {:.2} {}", name, lo, hi, well.depth_unit())
        }
        (Some(name), None) => println!("Depth: {} (no finite samples)", name),
        (None, _) => println!("Depth: none found, using sample index"),
    }

    println!("\n=== Header ===");
    for item in &well.header {
        println!("  {:<6} {:<24} {}", item.mnemonic, item.value, item.description);
    }

    println!("\n=== Curves ===");
    for (i, curve) in well.curves().iter().enumerate() {
        let range = curve
            .finite_range()
            .map(|(lo, hi)| format!("{:.3} .. {:.3}", lo, hi))
            .unwrap_or_else(|| "all null".to_string());
        let nulls = curve.samples.iter().filter(|v| v.is_nan()).count();
        println!(
            "  {:2}. {:<10} [{}] track {:<12} {} ({} null) {}",
            i + 1,
            curve.mnemonic,
            curve.unit,
            TrackKind::for_mnemonic(&curve.mnemonic).to_string(),
            range,
            nulls,
            curve.description
        );
    }

    println!("\n=== Sample Data (first {} rows) ===", args.rows);
    let names = well.curve_names();
    println!("  {}", names.join("\t"));
    for row in 0..well.sample_count().min(args.rows) {
        let values: Vec<String> = well
            .curves()
            .iter()
            .map(|c| {
                let v = c.samples[row];
                if v.is_nan() {
                    "NULL".to_string()
                } else {
                    format!("{:.4}", v)
                }
            })
            .collect();
        println!("  {}", values.join("\t"));
    }

    println!("\n=== Derived Curves ===");
    let shale = ShaleVolumeParams {
        gr_clean: args.gr_clean,
        gr_shale: args.gr_shale,
        ..Default::default()
    };
    match well.shale_volume(&shale) {
        Ok(vsh) => println!("VSH: mean {}", mean(&vsh)),
        Err(e) => println!("VSH: not available ({})", e),
    }
    match well.porosity(&PorosityParams::default()) {
        Ok(phi) => println!("PHI: mean {}", mean(&phi)),
        Err(e) => println!("PHI: not available ({})", e),
    }

    println!("\n=== Default Section Layout ===");
    let mut view = SectionView::new();
    view.bind(&well);
    for track in view.tracks() {
        println!("  {:<12} width {:.1}  {}", track.name, track.width, track.curves.join(", "));
    }

    Ok(())
}

/// Mean of the finite values, formatted
fn mean(values: &[f64]) -> String {
    let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if finite.is_empty() {
        return "n/a".to_string();
    }
    format!("{:.3}", finite.iter().sum::<f64>() / finite.len() as f64)
}
