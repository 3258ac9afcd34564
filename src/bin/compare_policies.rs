//! Debug tool for comparing placement policies
//! Prints radial and longitudinal histograms for every variability band

use osteon_distributor::policy::{LongitudinalPolicy, RadialPolicy};
use osteon_distributor::sampling::{place_longitudinal, sample_radius};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

const SAMPLES: usize = 100_000;
const BINS: usize = 10;
const BAR_WIDTH: usize = 50;
const SEED: u64 = 42;

fn main() {
    println!("Comparing placement policies ({} samples each, seed {})", SAMPLES, SEED);

    // Full disk and a diaphysis-like cortical shell
    let sections: [(&str, f64, f64); 2] = [("full disk", 0.0, 1.0), ("cortical shell", 0.55, 1.0)];

    for &(name, inner, outer) in &sections {
        for &policy in RadialPolicy::all() {
            let mut rng = ChaCha8Rng::seed_from_u64(SEED);
            let draws: Vec<f64> = (0..SAMPLES)
                .map(|_| sample_radius(&mut rng, inner, outer, policy))
                .collect();
            println!();
            println!("Radius, {} [{:.2}, {:.2}], {}", name, inner, outer, policy);
            print_histogram(&draws, inner, outer);
        }
    }

    let length = 1.0;
    for &policy in LongitudinalPolicy::all() {
        let mut rng = ChaCha8Rng::seed_from_u64(SEED);
        let draws: Vec<f64> = (0..SAMPLES)
            .map(|_| place_longitudinal(&mut rng, length, policy))
            .collect();
        println!();
        println!("Longitudinal, relative position, {}", policy);
        print_histogram(&draws, 0.0, length);
    }
}

fn print_histogram(values: &[f64], lo: f64, hi: f64) {
    let mut bins = [0usize; BINS];
    let span = (hi - lo).max(f64::EPSILON);
    for &v in values {
        let idx = (((v - lo) / span) * BINS as f64) as usize;
        bins[idx.min(BINS - 1)] += 1;
    }

    let max = bins.iter().copied().max().unwrap_or(1).max(1);
    for (i, &count) in bins.iter().enumerate() {
        let a = lo + span * i as f64 / BINS as f64;
        let b = lo + span * (i + 1) as f64 / BINS as f64;
        let bar = "#".repeat(count * BAR_WIDTH / max);
        println!("  {:5.3}-{:5.3} {:6} {}", a, b, count, bar);
    }
}
