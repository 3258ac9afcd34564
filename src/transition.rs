//! Reduced-density seams between adjacent regions
//!
//! Each internal boundary gets a thin zone populated with structures using
//! the averaged geometry of the two neighbours, so density does not jump
//! abruptly from one region to the next.

use log::debug;
use rand::Rng;
use serde::Serialize;

use crate::density::{annulus_area, count_for_area};
use crate::geometry::Region;
use crate::params::RegionKind;
use crate::policy::RadialPolicy;
use crate::sampling::{place_radial, sample_size, TRANSITION_SIZE_JITTER};
use crate::structure::{Position, Structure, StructureLabel};

/// Half-width of the zone on each side of a boundary (cm)
pub const TRANSITION_HALF_WIDTH: f64 = 0.5;
/// Fraction of the blended density used inside the zone
pub const TRANSITION_DENSITY_FACTOR: f64 = 0.3;
/// Variability used for radial placement inside the zone
pub const TRANSITION_VARIABILITY: f64 = 0.2;

/// Blended geometry of the seam between `before` and `after`
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TransitionZone {
    pub before: RegionKind,
    pub after: RegionKind,
    /// Shared boundary (`before.end == after.start`)
    pub boundary: f64,
    pub start: f64,
    pub end: f64,
    pub outer_radius: f64,
    pub inner_radius: f64,
    pub areal_density: f64,
    pub mean_size: f64,
    /// Length of the region before the boundary, used to scale the count
    pub before_length: f64,
}

impl TransitionZone {
    /// Blend two consecutive regions; `None` when the zone has no length
    pub fn between(a: &Region, b: &Region, total_length: f64) -> Option<Self> {
        let start = (a.end - TRANSITION_HALF_WIDTH).max(0.0);
        let end = (b.start + TRANSITION_HALF_WIDTH).min(total_length);
        if end - start <= 0.0 {
            return None;
        }

        let outer_radius = 0.5 * (a.outer_radius + b.outer_radius);
        let thickness = 0.5 * (a.effective_thickness() + b.effective_thickness());

        Some(Self {
            before: a.kind,
            after: b.kind,
            boundary: a.end,
            start,
            end,
            outer_radius,
            inner_radius: (outer_radius - thickness).max(0.0),
            areal_density: 0.5 * (a.areal_density + b.areal_density),
            mean_size: 0.5 * (a.mean_size + b.mean_size),
            before_length: a.length,
        })
    }

    pub fn length(&self) -> f64 {
        self.end - self.start
    }

    pub fn cortical_area(&self) -> f64 {
        annulus_area(self.inner_radius, self.outer_radius)
    }

    /// `floor(area * density * 0.3 * zone_length / before_length)`
    pub fn expected_count(&self) -> usize {
        if self.before_length <= 0.0 {
            return 0;
        }
        let scale = TRANSITION_DENSITY_FACTOR * self.length() / self.before_length;
        count_for_area(self.cortical_area(), self.areal_density * scale)
    }

    /// Label for a structure at `z`: the side of the boundary it falls on
    pub fn label_at(&self, z: f64) -> StructureLabel {
        if z < self.boundary {
            StructureLabel::transition(self.before)
        } else {
            StructureLabel::transition(self.after)
        }
    }
}

/// Generate the transition structures between `a` and `b`
pub fn blend<R: Rng>(a: &Region, b: &Region, total_length: f64, rng: &mut R) -> Vec<Structure> {
    let Some(zone) = TransitionZone::between(a, b, total_length) else {
        debug!("No transition zone between {} and {}", a.kind, b.kind);
        return Vec::new();
    };
    populate(&zone, rng)
}

/// Generate structures for an already-resolved zone
pub fn populate<R: Rng>(zone: &TransitionZone, rng: &mut R) -> Vec<Structure> {
    let count = zone.expected_count();
    let policy = RadialPolicy::from_variability(TRANSITION_VARIABILITY).unwrap_or(RadialPolicy::UniformArea);

    let mut structures = Vec::with_capacity(count);
    for _ in 0..count {
        let (x, y) = place_radial(rng, zone.inner_radius, zone.outer_radius, policy);
        let z = rng.gen_range(zone.start..=zone.end);
        let size = sample_size(rng, zone.mean_size, TRANSITION_SIZE_JITTER);

        structures.push(Structure {
            label: zone.label_at(z),
            position: Position { x, y, z },
            size,
        });
    }

    debug!(
        "Transition {} / {}: {} structures in [{:.2}, {:.2}]",
        zone.before, zone.after, count, zone.start, zone.end
    );
    structures
}
