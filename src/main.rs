use std::process;

use clap::Parser;

use osteon_distributor::export::{export_report, write_csv, write_json};
use osteon_distributor::render::{export_png, RenderOptions};
use osteon_distributor::report::DistributionSummary;
use osteon_distributor::{
    generate_seeded, BoneGeometry, BoneParams, BonePreset, DistributionSeeds, ExportError,
};

#[derive(Parser, Debug)]
#[command(name = "osteon_distributor")]
#[command(about = "Generate a synthetic osteon distribution along a segmented femur")]
struct Args {
    /// Parameter file (JSON); overrides --preset
    #[arg(short, long)]
    params: Option<String>,

    /// Parameter preset: default, cortical, high-variability
    #[arg(long, default_value = "default")]
    preset: String,

    /// Total bone length in cm (overrides the parameter set)
    #[arg(short, long)]
    length: Option<f64>,

    /// Random seed (uses random seed if not specified)
    #[arg(short, long)]
    seed: Option<u64>,

    /// Export structures to CSV, sorted by z
    #[arg(long)]
    csv: Option<String>,

    /// Export geometry and structures to JSON
    #[arg(long)]
    json: Option<String>,

    /// Render a PNG profile
    #[arg(long)]
    png: Option<String>,

    /// Write a full report folder inside this directory
    #[arg(long)]
    report_dir: Option<String>,

    /// Save the resolved parameter set to a JSON file
    #[arg(long)]
    save_params: Option<String>,

    /// Suppress the summary on stdout
    #[arg(short, long)]
    quiet: bool,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let mut params = match args.params {
        Some(ref path) => match BoneParams::from_json_file(path) {
            Ok(p) => p,
            Err(e) => {
                eprintln!("Failed to read parameters from {}: {}", path, e);
                process::exit(1);
            }
        },
        None => match BonePreset::from_str(&args.preset) {
            Some(preset) => preset.params(),
            None => {
                eprintln!("Unknown preset '{}' (expected default, cortical or high-variability)", args.preset);
                process::exit(2);
            }
        },
    };
    if let Some(length) = args.length {
        params.total_length = length;
    }

    let geometry = match BoneGeometry::build(&params) {
        Ok(g) => g,
        Err(e) => {
            eprintln!("{}", e);
            process::exit(1);
        }
    };

    let seed = args.seed.unwrap_or_else(|| rand::random());
    println!("Generating distribution with seed: {}", seed);
    let dist = generate_seeded(&geometry, &DistributionSeeds::from_master(seed));

    if !args.quiet {
        println!();
        print!("{}", DistributionSummary::from_distribution(&dist));
    }

    let mut failed = false;

    if let Some(ref path) = args.save_params {
        failed |= !save_params(&params, path);
    }

    if let Some(ref path) = args.csv {
        failed |= !report_step("export CSV", write_csv(&dist.structures, path).map(|()| {
            format!("Exported {} structures to {}", dist.len(), path)
        }));
    }

    if let Some(ref path) = args.json {
        failed |= !report_step("export JSON", write_json(&dist, path).map(|()| {
            format!("Exported JSON to {}", path)
        }));
    }

    if let Some(ref path) = args.png {
        failed |= !report_step(
            "render PNG",
            export_png(&dist, path, &RenderOptions::default())
                .map(|()| format!("Rendered profile to {}", path)),
        );
    }

    if let Some(ref dir) = args.report_dir {
        failed |= !report_step("generate report", export_report(&dist, dir).map(|folder| {
            format!("Report generated in {}", folder.display())
        }));
    }

    if failed {
        process::exit(1);
    }
}

/// Save the resolved parameter set; returns whether it succeeded
fn save_params(params: &BoneParams, path: &str) -> bool {
    report_step("save parameters", params.to_json_file(path).map(|()| {
        format!("Saved parameters to {}", path)
    }))
}

/// Print the outcome of one output step; returns whether it succeeded
fn report_step(what: &str, result: Result<String, ExportError>) -> bool {
    match result {
        Ok(message) => {
            println!("{}", message);
            true
        }
        Err(e) => {
            eprintln!("Failed to {}: {}", what, e);
            false
        }
    }
}
