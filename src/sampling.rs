//! Random draws for a single structure: cross-section position,
//! longitudinal position and size.
//!
//! Out-of-range normal draws are clamped onto the nearest bound, never
//! rejected, so each call consumes a bounded number of draws and the count
//! of generated structures equals the computed count exactly.

use std::f64::consts::TAU;

use rand::Rng;
use rand_distr::StandardNormal;

use crate::policy::{
    LongitudinalPolicy, RadialPolicy, CENTER_SIGMA_DIVISOR, EDGE_FRACTION_DISK,
    EDGE_FRACTION_SHELL, EDGE_MIXTURE_WEIGHT, MIXTURE_NORMAL_WEIGHT, MIXTURE_SIGMA_DIVISOR,
    NORMAL_SIGMA_DIVISOR,
};

/// Size jitter for structures placed inside a region
pub const REGULAR_SIZE_JITTER: f64 = 0.2;
/// Size jitter for structures placed in a transition zone
pub const TRANSITION_SIZE_JITTER: f64 = 0.1;

/// Draw `(x, y)` inside the annulus `[inner_radius, outer_radius]`
pub fn place_radial<R: Rng>(
    rng: &mut R,
    inner_radius: f64,
    outer_radius: f64,
    policy: RadialPolicy,
) -> (f64, f64) {
    let angle = rng.gen_range(0.0..TAU);
    let r = sample_radius(rng, inner_radius, outer_radius, policy);
    (r * angle.cos(), r * angle.sin())
}

/// Draw a radius in `[inner_radius, outer_radius]` according to `policy`
pub fn sample_radius<R: Rng>(
    rng: &mut R,
    inner_radius: f64,
    outer_radius: f64,
    policy: RadialPolicy,
) -> f64 {
    let inner = inner_radius.max(0.0);
    let outer = outer_radius.max(inner);

    match policy {
        RadialPolicy::UniformArea => uniform_area_radius(rng, inner, outer),
        RadialPolicy::CenterBiased => {
            let mid = 0.5 * (inner + outer);
            let sigma = (outer - inner) / CENTER_SIGMA_DIVISOR;
            let z: f64 = rng.sample(StandardNormal);
            (mid + z * sigma).clamp(inner, outer)
        }
        RadialPolicy::EdgeBiased => {
            if rng.gen_bool(EDGE_MIXTURE_WEIGHT) {
                let edge_start = edge_band_start(inner, outer);
                rng.gen_range(edge_start..=outer)
            } else {
                uniform_area_radius(rng, inner, outer)
            }
        }
    }
}

/// Radius whose points are uniformly dense over the annulus area.
///
/// Inverts the CDF `(r² - inner²) / (outer² - inner²)`; with `inner = 0`
/// this is the familiar `outer * sqrt(u)`.
pub fn uniform_area_radius<R: Rng>(rng: &mut R, inner: f64, outer: f64) -> f64 {
    let u: f64 = rng.gen();
    let r2 = inner * inner + u * (outer * outer - inner * inner);
    r2.sqrt().clamp(inner, outer)
}

/// Inner edge of the outer band used by edge-biased placement
pub fn edge_band_start(inner: f64, outer: f64) -> f64 {
    let fraction = if inner > 0.0 {
        EDGE_FRACTION_SHELL
    } else {
        EDGE_FRACTION_DISK
    };
    (outer * (1.0 - fraction)).max(inner).min(outer)
}

/// Draw a position in `[0, length]`, relative to the region start
pub fn place_longitudinal<R: Rng>(rng: &mut R, length: f64, policy: LongitudinalPolicy) -> f64 {
    if length <= 0.0 {
        return 0.0;
    }

    match policy {
        LongitudinalPolicy::Uniform => rng.gen_range(0.0..=length),
        LongitudinalPolicy::CenterNormal => clamped_normal(rng, length, NORMAL_SIGMA_DIVISOR),
        LongitudinalPolicy::Mixture => {
            if rng.gen_bool(MIXTURE_NORMAL_WEIGHT) {
                clamped_normal(rng, length, MIXTURE_SIGMA_DIVISOR)
            } else {
                rng.gen_range(0.0..=length)
            }
        }
    }
}

fn clamped_normal<R: Rng>(rng: &mut R, length: f64, sigma_divisor: f64) -> f64 {
    let z: f64 = rng.sample(StandardNormal);
    (0.5 * length + z * length / sigma_divisor).clamp(0.0, length)
}

/// `mean_size * (1 + U(-jitter, jitter))`; positive as long as `jitter < 1`
pub fn sample_size<R: Rng>(rng: &mut R, mean_size: f64, jitter: f64) -> f64 {
    let jitter = jitter.abs();
    if jitter == 0.0 {
        return mean_size;
    }
    mean_size * (1.0 + rng.gen_range(-jitter..=jitter))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    const N: usize = 20_000;

    #[test]
    fn test_radius_stays_in_annulus() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        for &policy in RadialPolicy::all() {
            for &(inner, outer) in &[(0.0, 1.0), (0.55, 1.0), (2.25, 2.5)] {
                for _ in 0..N {
                    let (x, y) = place_radial(&mut rng, inner, outer, policy);
                    let r = x.hypot(y);
                    assert!(r >= inner - 1e-9 && r <= outer + 1e-9, "{:?} r={} in [{}, {}]", policy, r, inner, outer);
                }
            }
        }
    }

    #[test]
    fn test_uniform_area_is_area_correct() {
        // For a full disk, half the points fall within radius R/sqrt(2)
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let threshold = 1.0 / 2f64.sqrt();
        let inside = (0..N)
            .filter(|_| uniform_area_radius(&mut rng, 0.0, 1.0) < threshold)
            .count();
        let frac = inside as f64 / N as f64;
        assert!((frac - 0.5).abs() < 0.02, "fraction inside = {}", frac);

        // For an annulus, the median radius splits the ring area in two
        let (inner, outer) = (0.5f64, 1.0f64);
        let median = ((inner * inner + outer * outer) / 2.0).sqrt();
        let inside = (0..N)
            .filter(|_| uniform_area_radius(&mut rng, inner, outer) < median)
            .count();
        let frac = inside as f64 / N as f64;
        assert!((frac - 0.5).abs() < 0.02, "fraction inside = {}", frac);
    }

    #[test]
    fn test_center_biased_concentrates_mid_shell() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let (inner, outer) = (0.6, 1.0);
        let mean = (0..N)
            .map(|_| sample_radius(&mut rng, inner, outer, RadialPolicy::CenterBiased))
            .sum::<f64>()
            / N as f64;
        assert!((mean - 0.8).abs() < 0.01, "mean radius = {}", mean);
    }

    #[test]
    fn test_edge_biased_favors_outer_band() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let in_band = (0..N)
            .filter(|_| sample_radius(&mut rng, 0.0, 1.0, RadialPolicy::EdgeBiased) >= 0.7)
            .count();
        // 0.7 from the band plus 0.3 * (1 - 0.49) from the uniform component
        let expected = 0.7 + 0.3 * 0.51;
        let frac = in_band as f64 / N as f64;
        assert!((frac - expected).abs() < 0.02, "fraction in band = {}", frac);
    }

    #[test]
    fn test_edge_band_start() {
        assert!((edge_band_start(0.0, 2.0) - 1.4).abs() < 1e-12);
        assert!((edge_band_start(1.5, 2.0) - 1.8).abs() < 1e-12);
        // Thin shell: band never reaches inside the inner radius
        assert_eq!(edge_band_start(1.95, 2.0), 1.95);
    }

    #[test]
    fn test_longitudinal_in_range() {
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        for &policy in LongitudinalPolicy::all() {
            for _ in 0..N {
                let z = place_longitudinal(&mut rng, 4.5, policy);
                assert!((0.0..=4.5).contains(&z));
            }
        }
        assert_eq!(place_longitudinal(&mut rng, 0.0, LongitudinalPolicy::Uniform), 0.0);
    }

    #[test]
    fn test_center_normal_spread() {
        let mut rng = ChaCha8Rng::seed_from_u64(13);
        let length = 8.0;
        let draws: Vec<f64> = (0..N)
            .map(|_| place_longitudinal(&mut rng, length, LongitudinalPolicy::CenterNormal))
            .collect();
        let mean = draws.iter().sum::<f64>() / N as f64;
        let var = draws.iter().map(|z| (z - mean).powi(2)).sum::<f64>() / N as f64;
        assert!((mean - 4.0).abs() < 0.05);
        assert!((var.sqrt() - 1.0).abs() < 0.05, "sigma = {}", var.sqrt());
    }

    #[test]
    fn test_size_jitter_bounds() {
        let mut rng = ChaCha8Rng::seed_from_u64(17);
        for _ in 0..N {
            let s = sample_size(&mut rng, 150.0, REGULAR_SIZE_JITTER);
            assert!(s > 0.0 && ((s - 150.0) / 150.0).abs() <= REGULAR_SIZE_JITTER + 1e-12);
            let t = sample_size(&mut rng, 150.0, TRANSITION_SIZE_JITTER);
            assert!(((t - 150.0) / 150.0).abs() <= TRANSITION_SIZE_JITTER + 1e-12);
        }
        assert_eq!(sample_size(&mut rng, 42.0, 0.0), 42.0);
    }

    #[test]
    fn test_mixture_weighting() {
        // length 6 puts the normal component at sigma 1 around 3
        let mut rng = ChaCha8Rng::seed_from_u64(19);
        let length = 6.0;
        let draws: Vec<f64> = (0..N)
            .map(|_| place_longitudinal(&mut rng, length, LongitudinalPolicy::Mixture))
            .collect();

        // 0.6 * P(|z| < 1) + 0.4 * 2/6
        let within_sigma = draws.iter().filter(|z| (**z - 3.0).abs() < 1.0).count() as f64 / N as f64;
        assert!((within_sigma - (0.6 * 0.6827 + 0.4 / 3.0)).abs() < 0.015, "within = {}", within_sigma);

        // 0.6 * P(z < -2) + 0.4 * 1/6
        let low_tail = draws.iter().filter(|z| **z < 1.0).count() as f64 / N as f64;
        assert!((low_tail - (0.6 * 0.0228 + 0.4 / 6.0)).abs() < 0.01, "tail = {}", low_tail);
    }

    #[test]
    fn test_edge_biased_shell_band() {
        let mut rng = ChaCha8Rng::seed_from_u64(23);
        let (inner, outer) = (1.5f64, 2.0f64);
        let in_band = (0..N)
            .filter(|_| sample_radius(&mut rng, inner, outer, RadialPolicy::EdgeBiased) >= 1.8)
            .count();
        // Band is the outer 10%: 0.7 from the band plus the uniform share above 1.8
        let uniform_share = (outer * outer - 1.8 * 1.8) / (outer * outer - inner * inner);
        let expected = 0.7 + 0.3 * uniform_share;
        let frac = in_band as f64 / N as f64;
        assert!((frac - expected).abs() < 0.02, "fraction in band = {}", frac);
    }
}
