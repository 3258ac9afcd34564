//! Structure counts from cortical area and areal density

use std::f64::consts::PI;

use crate::geometry::Region;

/// Largest population a single region or seam may hold.
///
/// Parameter sets that would exceed it are rejected during validation, before
/// anything is allocated.
pub const MAX_STRUCTURES: usize = 10_000_000;

/// Area of the annulus between `inner_radius` and `outer_radius`.
///
/// An inner radius of zero gives the full disk.
pub fn annulus_area(inner_radius: f64, outer_radius: f64) -> f64 {
    let inner = inner_radius.max(0.0);
    if outer_radius <= inner {
        return 0.0;
    }
    PI * (outer_radius * outer_radius - inner * inner)
}

/// Cortical cross-sectional area of a region
pub fn cortical_area(region: &Region) -> f64 {
    annulus_area(region.inner_radius, region.outer_radius)
}

/// Number of structures in an area at a given density, rounded down.
///
/// Saturates at `usize::MAX` for huge inputs; callers compare against
/// `MAX_STRUCTURES` before allocating.
pub fn count_for_area(area: f64, areal_density: f64) -> usize {
    let expected = area * areal_density;
    if expected.is_finite() && expected > 0.0 {
        expected.floor() as usize
    } else {
        0
    }
}

/// Deterministic structure count for a region; only placement is random
pub fn expected_count(region: &Region) -> usize {
    count_for_area(cortical_area(region), region.areal_density)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::BoneGeometry;
    use crate::params::{BoneParams, RegionKind};

    #[test]
    fn test_full_disk_count() {
        let geometry = BoneGeometry::build(&BoneParams::default()).unwrap();
        let diaphysis = geometry.region(RegionKind::Diaphysis);

        assert!((cortical_area(diaphysis) - PI).abs() < 1e-12);
        assert_eq!(expected_count(diaphysis), 6283);
    }

    #[test]
    fn test_shell_count() {
        let geometry = BoneGeometry::build(&BoneParams::cortical_shell()).unwrap();
        let diaphysis = geometry.region(RegionKind::Diaphysis);

        // 2000 * pi * (1.0 - 0.55^2)
        let area = PI * (1.0 - 0.55 * 0.55);
        assert!((cortical_area(diaphysis) - area).abs() < 1e-12);
        assert_eq!(expected_count(diaphysis), (area * 2000.0).floor() as usize);
    }

    #[test]
    fn test_degenerate_area() {
        assert_eq!(annulus_area(1.0, 1.0), 0.0);
        assert_eq!(annulus_area(2.0, 1.0), 0.0);
        assert_eq!(count_for_area(0.0, 2000.0), 0);
        assert_eq!(count_for_area(3.0, 0.0), 0);
    }

    #[test]
    fn test_zero_density_region_is_empty() {
        let mut params = BoneParams::default();
        params.regions[1].areal_density = 0.0;
        let geometry = BoneGeometry::build(&params).unwrap();
        assert_eq!(expected_count(&geometry.regions[1]), 0);
    }
}
